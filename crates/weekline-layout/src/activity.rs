//! Per-day activity counts

use chrono::NaiveDate;
use weekline_core::Track;

/// Day ranges of every dated item, for "how many things are running today"
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DayActivity {
    ranges: Vec<(NaiveDate, NaiveDate)>,
}

impl DayActivity {
    /// Collect ranges from all tracks. Items need a start date; a missing
    /// or unusable end date makes a one-day range.
    pub fn from_tracks(tracks: &[Track]) -> Self {
        let ranges = tracks
            .iter()
            .flat_map(|track| &track.items)
            .filter_map(|item| {
                let start = item.start()?;
                let end = item.end().unwrap_or(start);
                Some((start.min(end), start.max(end)))
            })
            .collect();
        Self { ranges }
    }

    /// Number of ranges containing `day`, bounds inclusive
    pub fn active_count(&self, day: NaiveDate) -> usize {
        self.ranges
            .iter()
            .filter(|(first, last)| (*first..=*last).contains(&day))
            .count()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekline_core::TimelineItem;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_overlapping_ranges() {
        let tracks = vec![
            Track::new("a")
                .item(TimelineItem::new("1").starts("2024-03-01").ends("2024-03-10"))
                .item(TimelineItem::new("2").starts("2024-03-05")),
            Track::new("b").item(TimelineItem::new("3").starts("2024-03-12").ends("2024-03-05")),
        ];
        let activity = DayActivity::from_tracks(&tracks);
        assert_eq!(activity.len(), 3);
        assert_eq!(activity.active_count(date(2024, 3, 5)), 3);
        assert_eq!(activity.active_count(date(2024, 3, 10)), 2);
        assert_eq!(activity.active_count(date(2024, 3, 11)), 1);
        assert_eq!(activity.active_count(date(2024, 2, 29)), 0);
    }

    #[test]
    fn items_without_start_are_ignored() {
        let tracks = vec![Track::new("a")
            .item(TimelineItem::new("1").ends("2024-03-10"))
            .item(TimelineItem::new("2").starts("later"))];
        assert!(DayActivity::from_tracks(&tracks).is_empty());
    }

    #[test]
    fn bad_end_date_means_single_day() {
        let tracks =
            vec![Track::new("a").item(TimelineItem::new("1").starts("2024-03-01").ends("??"))];
        let activity = DayActivity::from_tracks(&tracks);
        assert_eq!(activity.active_count(date(2024, 3, 1)), 1);
        assert_eq!(activity.active_count(date(2024, 3, 2)), 0);
    }
}
