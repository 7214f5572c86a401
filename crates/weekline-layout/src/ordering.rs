//! Track ordering

use std::cmp::Ordering;
use weekline_core::Track;

/// Index of `name` in the priority list; unlisted names sort after all listed ones
pub fn track_order_index(name: &str, priority: &[String]) -> usize {
    priority
        .iter()
        .position(|p| p.trim().eq_ignore_ascii_case(name.trim()))
        .unwrap_or(priority.len())
}

/// Priority index, then case-insensitive name, then exact name
pub fn compare_track_names(a: &str, b: &str, priority: &[String]) -> Ordering {
    track_order_index(a, priority)
        .cmp(&track_order_index(b, priority))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Tracks in display order. The sort is stable, so tracks with equal
/// names keep their input order.
pub fn order_tracks<'a>(tracks: &'a [Track], priority: &[String]) -> Vec<&'a Track> {
    let mut ordered: Vec<&Track> = tracks.iter().collect();
    ordered.sort_by(|a, b| compare_track_names(&a.name, &b.name, priority));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names<'a>(tracks: &[&'a Track]) -> Vec<&'a str> {
        tracks.iter().map(|t| t.name.as_str()).collect()
    }

    fn priority() -> Vec<String> {
        vec!["Platform".into(), "Mobile".into()]
    }

    #[test]
    fn priority_names_come_first_in_list_order() {
        let tracks = vec![
            Track::new("1").name("Zeta"),
            Track::new("2").name("Mobile"),
            Track::new("3").name("alpha"),
            Track::new("4").name("Platform"),
        ];
        let ordered = order_tracks(&tracks, &priority());
        assert_eq!(names(&ordered), vec!["Platform", "Mobile", "alpha", "Zeta"]);
    }

    #[test]
    fn unlisted_names_sort_alphabetically_ignoring_case() {
        let tracks = vec![
            Track::new("1").name("web"),
            Track::new("2").name("Billing"),
            Track::new("3").name("api"),
        ];
        let ordered = order_tracks(&tracks, &[]);
        assert_eq!(names(&ordered), vec!["api", "Billing", "web"]);
    }

    #[test]
    fn equal_names_keep_input_order() {
        let tracks = vec![
            Track::new("first").name("Same"),
            Track::new("second").name("Same"),
        ];
        let ordered = order_tracks(&tracks, &[]);
        assert_eq!(ordered[0].id, "first");
        assert_eq!(ordered[1].id, "second");
    }

    #[test]
    fn case_variants_are_still_totally_ordered() {
        assert_eq!(compare_track_names("API", "api", &[]), Ordering::Less);
        assert_eq!(compare_track_names("api", "API", &[]), Ordering::Greater);
        assert_eq!(compare_track_names("api", "api", &[]), Ordering::Equal);
    }

    #[test]
    fn priority_match_ignores_case() {
        assert_eq!(track_order_index("mobile", &priority()), 1);
        assert_eq!(track_order_index("Desktop", &priority()), 2);
    }
}
