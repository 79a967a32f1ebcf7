// Entry point and high-level CLI flow.
//
// - Both exports are loaded once and installed as the process-wide dataset.
// - A report is computed for the requested range, printed as number cards
//   and table previews, and optionally exported as JSON and CSV.
// - With --interactive, each entered range triggers one recomputation until
//   the user stops.
use clap::Parser;
use netreport::config::Args;
use netreport::engine::{self, Dataset, ReportEngine};
use netreport::error::Result;
use netreport::types::{DateRange, Report};
use netreport::{loader, output, util};
use std::io::{self, Write};
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Print `prompt` and read one trimmed line from stdin.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask until the user gives a valid date or a blank line (`None`).
fn prompt_date(label: &str) -> Option<chrono::NaiveDate> {
    loop {
        let input = read_line(&format!("{} (YYYY-MM-DD, blank to quit): ", label));
        if input.is_empty() {
            return None;
        }
        match util::parse_date_safe(Some(&input)) {
            Some(d) => return Some(d),
            None => println!("Invalid date. Please try again."),
        }
    }
}

/// `Some(true)` for Y, `Some(false)` for N or an empty read (closed stdin),
/// `None` for anything else.
fn parse_yes_no(input: &str) -> Option<bool> {
    match input.to_uppercase().as_str() {
        "Y" => Some(true),
        "N" | "" => Some(false),
        _ => None,
    }
}

fn prompt_another_range() -> bool {
    loop {
        match parse_yes_no(&read_line("Pick another range (Y/N): ")) {
            Some(answer) => return answer,
            None => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn load_dataset(args: &Args) -> Result<&'static Dataset> {
    let (connections, conn_report) = loader::load_connections(&args.connections)?;
    let (invitations, invite_report) = loader::load_invitations(&args.invitations)?;
    println!(
        "Processing dataset... ({} connections, {} invitations loaded)",
        util::format_int(conn_report.loaded_rows),
        util::format_int(invite_report.loaded_rows)
    );
    let rejected = conn_report.parse_errors + invite_report.parse_errors;
    if rejected > 0 {
        println!(
            "Note: {} rows skipped due to parse errors.",
            util::format_int(rejected)
        );
    }
    println!();
    engine::install_dataset(Dataset::new(connections, invitations))
}

fn emit(report: &Report, args: &Args) -> Result<()> {
    output::print_report(report, args.preview);
    if let Some(path) = &args.json {
        output::write_json(path, report)?;
        println!("(Report exported to {})", path.display());
    }
    if let Some(dir) = &args.csv_dir {
        for path in output::write_report_csvs(dir, report)? {
            println!("(Table exported to {})", path.display());
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let dataset = load_dataset(&args)?;
    let engine = ReportEngine::new(dataset, args.report_config());
    debug!("Report config: {:?}", engine.config());

    if args.interactive {
        loop {
            let Some(start) = prompt_date("Start date") else { break };
            let Some(end) = prompt_date("End date") else { break };
            let range = DateRange::new(start, end);
            if !range.is_well_formed() {
                warn!("Start {} is after end {}; the report will be empty", start, end);
            }
            println!();
            emit(&engine.compute_report(&range), &args)?;
            if !prompt_another_range() {
                break;
            }
        }
        println!("Exiting the program.");
        return Ok(());
    }

    let range = if args.all {
        match dataset.full_range() {
            Some(r) => r,
            None => {
                warn!("Dataset has no dated records; using the configured range");
                DateRange::new(args.start, args.end)
            }
        }
    } else {
        DateRange::new(args.start, args.end)
    };
    emit(&engine.compute_report(&range), &args)
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("y"), Some(true));
        assert_eq!(parse_yes_no("N"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }

    #[test]
    fn test_empty_read_ends_the_loop() {
        assert_eq!(parse_yes_no(""), Some(false));
    }
}
