use chrono::NaiveDate;
use netreport::reports::MonthFill;
use netreport::types::{DirectionCounts, RankedEntry};
use netreport::{
    ConnectionRecord, Dataset, DateRange, Direction, InvitationRecord, ReportConfig, ReportEngine,
};
use pretty_assertions::assert_eq;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn scenario_dataset() -> Dataset {
    let connections = vec![
        ConnectionRecord::new(ymd(2022, 1, 3), "A", "Software Engineer"),
        ConnectionRecord::new(ymd(2022, 1, 10), "A", "Engineering Manager"),
        ConnectionRecord::new(ymd(2022, 1, 21), "B", "Recruiter"),
        ConnectionRecord::new(ymd(2022, 2, 2), "C", "Software Developer"),
    ];
    let sent = ymd(2022, 1, 15);
    let invitations = vec![
        InvitationRecord::new(sent, Direction::Outgoing),
        InvitationRecord::new(sent, Direction::Outgoing),
        InvitationRecord::new(sent, Direction::Incoming),
    ];
    Dataset::new(connections, invitations)
}

fn both_months() -> DateRange {
    DateRange::new(ymd(2022, 1, 1), ymd(2022, 2, 28))
}

#[test]
fn two_month_scenario() {
    let data = scenario_dataset();
    let engine = ReportEngine::new(
        &data,
        ReportConfig {
            top_n: 3,
            ..ReportConfig::default()
        },
    );
    let report = engine.compute_report(&both_months());

    assert_eq!(report.connection_count, 4);
    assert_eq!(report.distinct_companies, 3);
    assert_eq!(report.invitations, DirectionCounts { incoming: 1, outgoing: 2 });

    let monthly: Vec<(&str, usize)> = report.monthly.iter().map(|m| (m.label, m.count)).collect();
    assert_eq!(monthly, vec![("Jan", 3), ("Feb", 1)]);

    let entry = |key: &str, count| RankedEntry {
        key: key.to_string(),
        count,
    };
    assert_eq!(
        report.top_companies,
        vec![entry("A", 2), entry("B", 1), entry("C", 1)]
    );

    assert_eq!(report.position_words.get("software"), Some(&2));
    assert_eq!(report.position_words.values().sum::<usize>(), 7);
    assert!(report.position_words.values().all(|&c| c > 0));
    assert_eq!(report.skipped.total(), 0);
}

#[test]
fn empty_dataset_gives_zeroed_report() {
    let data = Dataset::default();
    let engine = ReportEngine::new(&data, ReportConfig::default());
    let report = engine.compute_report(&both_months());

    assert_eq!(report.connection_count, 0);
    assert_eq!(report.distinct_companies, 0);
    assert_eq!(report.invitations, DirectionCounts::default());
    assert!(report.monthly.is_empty());
    assert!(report.top_companies.is_empty());
    assert!(report.position_words.is_empty());
}

#[test]
fn inverted_range_zeroes_every_field() {
    let data = scenario_dataset();
    for fill in [MonthFill::Sparse, MonthFill::ZeroFilled] {
        let engine = ReportEngine::new(
            &data,
            ReportConfig {
                month_fill: fill,
                parallel: true,
                ..ReportConfig::default()
            },
        );
        let report = engine.compute_report(&DateRange::new(ymd(2022, 2, 28), ymd(2022, 1, 1)));

        assert_eq!(report.connection_count, 0);
        assert_eq!(report.distinct_companies, 0);
        assert_eq!(report.invitations, DirectionCounts::default());
        assert!(report.monthly.is_empty());
        assert!(report.top_companies.is_empty());
        assert!(report.position_words.is_empty());
        assert_eq!(report.skipped.total(), 0);
    }
}

#[test]
fn full_span_keeps_every_record() {
    let data = scenario_dataset();
    let engine = ReportEngine::new(&data, ReportConfig::default());
    let range = data.full_range().unwrap();
    let report = engine.compute_report(&range);

    assert_eq!(report.connection_count, data.connections.len());
    assert_eq!(
        report.invitations.incoming + report.invitations.outgoing,
        data.invitations.len()
    );
}

#[test]
fn months_stay_in_calendar_order_for_shuffled_input() {
    let months = [11, 4, 8, 2, 12, 1, 9];
    let connections: Vec<ConnectionRecord> = months
        .iter()
        .map(|&m| ConnectionRecord::new(ymd(2021, m, 1), "X", "Y"))
        .collect();
    let data = Dataset::new(connections, Vec::new());
    let engine = ReportEngine::new(&data, ReportConfig::default());
    let report = engine.compute_report(&DateRange::new(ymd(2021, 1, 1), ymd(2021, 12, 31)));

    let order: Vec<u32> = report.monthly.iter().map(|m| m.month).collect();
    assert_eq!(order, vec![1, 2, 4, 8, 9, 11, 12]);
}

#[test]
fn recomputation_is_idempotent() {
    let data = scenario_dataset();
    let engine = ReportEngine::new(&data, ReportConfig::default());
    let first = engine.compute_report(&both_months());
    let second = engine.compute_report(&both_months());

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
