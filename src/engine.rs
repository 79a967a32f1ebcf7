//! Builds a [`Report`] for a date range.
//!
//! Each source collection is filtered exactly once per call; the resulting
//! snapshots are shared read-only by every aggregation. The aggregations do
//! not see each other's output, which is what makes the parallel path safe.

use crate::error::{ReportError, Result};
use crate::filter::{filter_by_date, Snapshot};
use crate::reports::{self, MonthFill, WordPolicy};
use crate::types::{
    ConnectionRecord, DateRange, DirectionCounts, InvitationRecord, MonthCount, RankedEntry,
    Report, SkippedCounts,
};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Both record collections, loaded once and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub connections: Vec<ConnectionRecord>,
    pub invitations: Vec<InvitationRecord>,
}

impl Dataset {
    pub fn new(connections: Vec<ConnectionRecord>, invitations: Vec<InvitationRecord>) -> Self {
        Self {
            connections,
            invitations,
        }
    }

    /// Range covering every dated record in either collection.
    pub fn full_range(&self) -> Option<DateRange> {
        DateRange::spanning(
            self.connections
                .iter()
                .filter_map(|c| c.connected_on)
                .chain(self.invitations.iter().filter_map(|i| i.sent_at)),
        )
    }
}

// Process-wide dataset; set once at startup, read by every recomputation.
static DATASET: OnceCell<Dataset> = OnceCell::new();

/// Install the process-wide dataset. Fails if one is already installed.
pub fn install_dataset(dataset: Dataset) -> Result<&'static Dataset> {
    DATASET
        .set(dataset)
        .map_err(|_| ReportError::DatasetAlreadyLoaded)?;
    DATASET.get().ok_or(ReportError::DatasetAlreadyLoaded)
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// How many companies the ranking keeps.
    pub top_n: usize,
    pub month_fill: MonthFill,
    pub word_policy: WordPolicy,
    /// Fan the aggregations out over the rayon pool.
    pub parallel: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            month_fill: MonthFill::Sparse,
            word_policy: WordPolicy::default(),
            parallel: false,
        }
    }
}

/// Outputs of the connection-side reductions, gathered before assembly.
struct ConnectionAggregates {
    count: usize,
    distinct_companies: usize,
    monthly: Vec<MonthCount>,
    top_companies: Vec<RankedEntry>,
    position_words: BTreeMap<String, usize>,
}

pub struct ReportEngine<'d> {
    dataset: &'d Dataset,
    config: ReportConfig,
}

impl<'d> ReportEngine<'d> {
    pub fn new(dataset: &'d Dataset, config: ReportConfig) -> Self {
        Self { dataset, config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Compute the report for `range`. Never fails: an inverted range or an
    /// empty dataset produce an all-zero report.
    pub fn compute_report(&self, range: &DateRange) -> Report {
        let connections = filter_by_date(&self.dataset.connections, range, |c| c.connected_on);
        let invitations = filter_by_date(&self.dataset.invitations, range, |i| i.sent_at);

        // An inverted range reports no months at all, even when zero-filling.
        let fill = if range.is_well_formed() {
            self.config.month_fill
        } else {
            MonthFill::Sparse
        };

        let (aggregates, (direction_counts, unrecognized)) = if self.config.parallel {
            rayon::join(
                || self.aggregate_connections_parallel(&connections, fill),
                || reports::count_by_direction(&invitations),
            )
        } else {
            (
                self.aggregate_connections(&connections, fill),
                reports::count_by_direction(&invitations),
            )
        };

        let report = self.assemble(
            range,
            aggregates,
            direction_counts,
            SkippedCounts {
                undated_connections: connections.skipped,
                undated_invitations: invitations.skipped,
                unrecognized_directions: unrecognized,
            },
        );
        info!(
            "Report for {} .. {}: {} connections, {} companies, {} in / {} out",
            range.start,
            range.end,
            report.connection_count,
            report.distinct_companies,
            report.invitations.incoming,
            report.invitations.outgoing
        );
        report
    }

    fn aggregate_connections(
        &self,
        snap: &Snapshot<'_, ConnectionRecord>,
        fill: MonthFill,
    ) -> ConnectionAggregates {
        ConnectionAggregates {
            count: reports::count(snap),
            distinct_companies: reports::distinct_count(snap, |c| c.company.as_str()),
            monthly: reports::monthly_counts(snap, |c| c.connected_on, fill),
            top_companies: reports::top_n(snap, |c| c.company.as_str(), self.config.top_n),
            position_words: reports::word_frequencies(
                snap,
                |c| c.position.as_str(),
                &self.config.word_policy,
            ),
        }
    }

    fn aggregate_connections_parallel(
        &self,
        snap: &Snapshot<'_, ConnectionRecord>,
        fill: MonthFill,
    ) -> ConnectionAggregates {
        let ((distinct_companies, monthly), (top_companies, position_words)) = rayon::join(
            || {
                rayon::join(
                    || reports::distinct_count(snap, |c| c.company.as_str()),
                    || reports::monthly_counts(snap, |c| c.connected_on, fill),
                )
            },
            || {
                rayon::join(
                    || reports::top_n(snap, |c| c.company.as_str(), self.config.top_n),
                    || {
                        reports::word_frequencies(
                            snap,
                            |c| c.position.as_str(),
                            &self.config.word_policy,
                        )
                    },
                )
            },
        );
        ConnectionAggregates {
            count: reports::count(snap),
            distinct_companies,
            monthly,
            top_companies,
            position_words,
        }
    }

    fn assemble(
        &self,
        range: &DateRange,
        aggregates: ConnectionAggregates,
        invitations: DirectionCounts,
        skipped: SkippedCounts,
    ) -> Report {
        debug!("Assembling report ({} records skipped)", skipped.total());
        Report {
            range: *range,
            connection_count: aggregates.count,
            distinct_companies: aggregates.distinct_companies,
            invitations,
            monthly: aggregates.monthly,
            top_companies: aggregates.top_companies,
            position_words: aggregates.position_words,
            skipped,
        }
    }
}
