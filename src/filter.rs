//! Date-range selection over an immutable record collection.

use crate::types::DateRange;
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Records selected for one range, borrowed from the source collection in
/// their original order. Aggregators only ever read a snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot<'a, R> {
    pub records: Vec<&'a R>,
    /// Records dropped because their date was missing or unparseable.
    pub skipped: usize,
}

impl<'a, R> Snapshot<'a, R> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.records.iter().copied()
    }
}

/// Keep the records whose date falls inside `range` (both ends inclusive).
///
/// A malformed range (`start > end`) selects nothing and reports nothing
/// skipped. Records without a date are excluded and counted in `skipped`.
pub fn filter_by_date<'a, R, F>(records: &'a [R], range: &DateRange, date_of: F) -> Snapshot<'a, R>
where
    F: Fn(&R) -> Option<NaiveDate>,
{
    if !range.is_well_formed() {
        debug!(
            "Range {} .. {} is inverted; selecting nothing",
            range.start, range.end
        );
        return Snapshot::empty();
    }

    let mut snapshot = Snapshot::empty();
    for record in records {
        match date_of(record) {
            Some(date) if range.contains(date) => snapshot.records.push(record),
            Some(_) => {}
            None => snapshot.skipped += 1,
        }
    }

    if snapshot.skipped > 0 {
        warn!("{} records skipped: missing or unparseable date", snapshot.skipped);
    }
    debug!(
        "Selected {} of {} records for {} .. {}",
        snapshot.len(),
        records.len(),
        range.start,
        range.end
    );
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConnectionRecord;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<ConnectionRecord> {
        vec![
            ConnectionRecord::new(ymd(2021, 3, 1), "Acme", "Engineer"),
            ConnectionRecord::new(ymd(2021, 1, 15), "Globex", "Manager"),
            ConnectionRecord {
                connected_on: None,
                company: "Initech".to_string(),
                position: "Analyst".to_string(),
            },
            ConnectionRecord::new(ymd(2021, 6, 30), "Acme", "Designer"),
        ]
    }

    #[test]
    fn test_bounds_are_inclusive_and_order_is_kept() {
        let records = sample();
        let range = DateRange::new(ymd(2021, 1, 15), ymd(2021, 6, 30));
        let snap = filter_by_date(&records, &range, |r| r.connected_on);

        let companies: Vec<&str> = snap.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(companies, vec!["Acme", "Globex", "Acme"]);
        assert_eq!(snap.skipped, 1);
    }

    #[test]
    fn test_narrow_range() {
        let records = sample();
        let range = DateRange::new(ymd(2021, 2, 1), ymd(2021, 3, 1));
        let snap = filter_by_date(&records, &range, |r| r.connected_on);

        assert_eq!(snap.len(), 1);
        assert_eq!(snap.records[0].company, "Acme");
    }

    #[test]
    fn test_inverted_range_selects_nothing() {
        let records = sample();
        let range = DateRange::new(ymd(2022, 1, 1), ymd(2021, 1, 1));
        let snap = filter_by_date(&records, &range, |r| r.connected_on);

        assert!(snap.is_empty());
        assert_eq!(snap.skipped, 0);
    }

    #[test]
    fn test_full_span_is_a_no_op() {
        let records = sample();
        let range = DateRange::spanning(records.iter().filter_map(|r| r.connected_on)).unwrap();
        let snap = filter_by_date(&records, &range, |r| r.connected_on);

        assert_eq!(snap.len() + snap.skipped, records.len());
        assert_eq!(range, DateRange::new(ymd(2021, 1, 15), ymd(2021, 6, 30)));
    }

    #[test]
    fn test_empty_collection() {
        let records: Vec<ConnectionRecord> = Vec::new();
        let range = DateRange::new(ymd(2021, 1, 1), ymd(2021, 12, 31));
        let snap = filter_by_date(&records, &range, |r| r.connected_on);

        assert!(snap.is_empty());
        assert_eq!(snap.skipped, 0);
    }
}
