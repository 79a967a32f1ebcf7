use crate::error::Result;
use crate::reports::ranked_words;
use crate::types::{CompanyRow, MonthlyRow, Report, WordRow};
use crate::util::format_int;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub const MONTHLY_CSV: &str = "monthly_connections.csv";
pub const COMPANIES_CSV: &str = "top_companies.csv";
pub const WORDS_CSV: &str = "position_words.csv";

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    info!("Wrote {}", path.display());
    Ok(())
}

pub fn monthly_rows(report: &Report) -> Vec<MonthlyRow> {
    report
        .monthly
        .iter()
        .map(|m| MonthlyRow {
            month: m.label.to_string(),
            total_connections: format_int(m.count),
        })
        .collect()
}

pub fn company_rows(report: &Report) -> Vec<CompanyRow> {
    report
        .top_companies
        .iter()
        .enumerate()
        .map(|(idx, e)| CompanyRow {
            rank: idx + 1,
            company: e.key.clone(),
            total_connections: format_int(e.count),
        })
        .collect()
}

/// Every token, most frequent first.
pub fn word_rows(report: &Report) -> Vec<WordRow> {
    ranked_words(&report.position_words, report.position_words.len())
        .into_iter()
        .enumerate()
        .map(|(idx, e)| WordRow {
            rank: idx + 1,
            word: e.key,
            frequency: format_int(e.count),
        })
        .collect()
}

/// Write the three tabular outputs into `dir` and return their paths.
pub fn write_report_csvs(dir: &Path, report: &Report) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let monthly = dir.join(MONTHLY_CSV);
    write_csv(&monthly, &monthly_rows(report))?;
    let companies = dir.join(COMPANIES_CSV);
    write_csv(&companies, &company_rows(report))?;
    let words = dir.join(WORDS_CSV);
    write_csv(&words, &word_rows(report))?;
    info!("Wrote report tables to {}", dir.display());
    Ok(vec![monthly, companies, words])
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

/// Print the number cards followed by previews of each table.
pub fn print_report(report: &Report, max_rows: usize) {
    println!(
        "Network activity {} to {}\n",
        report.range.start, report.range.end
    );
    println!("Connections:      {}", format_int(report.connection_count));
    println!("Companies:        {}", format_int(report.distinct_companies));
    println!("Invites received: {}", format_int(report.invitations.incoming));
    println!("Invites sent:     {}\n", format_int(report.invitations.outgoing));

    println!("Total connections by month\n");
    preview_table_rows(&monthly_rows(report), 12);

    println!("Top {} companies where connections work\n", report.top_companies.len());
    preview_table_rows(&company_rows(report), max_rows);

    println!("Connections by position\n");
    preview_table_rows(&word_rows(report), max_rows);

    if report.skipped.total() > 0 {
        println!(
            "Note: {} undated connections, {} undated invitations, {} unrecognized directions skipped.\n",
            format_int(report.skipped.undated_connections),
            format_int(report.skipped.undated_invitations),
            format_int(report.skipped.unrecognized_directions)
        );
    }
}
