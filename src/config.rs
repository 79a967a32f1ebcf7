use crate::engine::ReportConfig;
use crate::reports::{MonthFill, WordPolicy};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "netreport",
    about = "Summarize network connections and invitations over a date range",
    version,
    long_about = None
)]
pub struct Args {
    /// Connections export
    #[arg(long, default_value = "Connections.csv")]
    pub connections: PathBuf,

    /// Invitations export
    #[arg(long, default_value = "Invitations.csv")]
    pub invitations: PathBuf,

    /// First day of the range (YYYY-MM-DD, inclusive)
    #[arg(long, default_value = "2021-01-01")]
    pub start: NaiveDate,

    /// Last day of the range (YYYY-MM-DD, inclusive)
    #[arg(long, default_value = "2022-06-15")]
    pub end: NaiveDate,

    /// Use the range spanning every dated record instead of --start/--end
    #[arg(long, conflicts_with = "interactive")]
    pub all: bool,

    /// Number of top companies to rank
    #[arg(short, long, default_value_t = 5)]
    pub top: usize,

    /// Always report twelve months, with zero for months without connections
    #[arg(long)]
    pub zero_fill_months: bool,

    /// Drop common English words from the position word counts
    #[arg(long)]
    pub stopwords: bool,

    /// Ignore position words shorter than this many characters
    #[arg(long, default_value_t = 0)]
    pub min_word_len: usize,

    /// Run the aggregations on the rayon thread pool
    #[arg(long)]
    pub parallel: bool,

    /// Write the report as JSON to this file
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write the report tables as CSV files into this directory
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,

    /// Rows to show in each table preview
    #[arg(long, default_value_t = 5)]
    pub preview: usize,

    /// Prompt for date ranges and recompute after each one
    #[arg(short, long)]
    pub interactive: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn report_config(&self) -> ReportConfig {
        let mut word_policy = if self.stopwords {
            WordPolicy::english()
        } else {
            WordPolicy::default()
        };
        word_policy.min_token_len = self.min_word_len;
        ReportConfig {
            top_n: self.top,
            month_fill: if self.zero_fill_months {
                MonthFill::ZeroFilled
            } else {
                MonthFill::Sparse
            },
            word_policy,
            parallel: self.parallel,
        }
    }
}
