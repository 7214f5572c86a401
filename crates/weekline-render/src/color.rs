//! Track color helpers
//!
//! Track colors come straight from user data. Hex colors (`#rgb` or
//! `#rrggbb`) can be tinted; anything else (`rebeccapurple`, `rgb(..)`)
//! is passed through untouched.

/// An opaque sRGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn mix(self, target: u8, amount: f64) -> Self {
        let amount = if amount.is_nan() { 0.0 } else { amount.clamp(0.0, 1.0) };
        let channel =
            |c: u8| (f64::from(c) + (f64::from(target) - f64::from(c)) * amount).round() as u8;
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
        }
    }
}

/// Parse `#rgb` or `#rrggbb`
pub fn parse_hex(value: &str) -> Option<Rgb> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..=i].repeat(2));
            Some(Rgb {
                r: expand(0)?,
                g: expand(1)?,
                b: expand(2)?,
            })
        }
        6 => Some(Rgb {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
        }),
        _ => None,
    }
}

/// `#rrggbbaa` with the given opacity
pub fn with_alpha(color: &str, alpha: f64) -> String {
    match parse_hex(color) {
        Some(rgb) => {
            let alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
            format!("{}{:02x}", rgb.to_hex(), (alpha * 255.0).round() as u8)
        }
        None => color.to_string(),
    }
}

/// Mix toward white by `amount` in `[0, 1]`
pub fn lighten(color: &str, amount: f64) -> String {
    parse_hex(color).map_or_else(|| color.to_string(), |rgb| rgb.mix(255, amount).to_hex())
}

/// Mix toward black by `amount` in `[0, 1]`
pub fn darken(color: &str, amount: f64) -> String {
    parse_hex(color).map_or_else(|| color.to_string(), |rgb| rgb.mix(0, amount).to_hex())
}
