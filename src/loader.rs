use crate::error::{ReportError, Result};
use crate::types::{
    ConnectionRecord, Direction, InvitationRecord, RawConnectionRow, RawInvitationRow,
};
use crate::util::{clean_text, parse_date_safe};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows the CSV reader could not decode at all; these are dropped.
    pub parse_errors: usize,
    /// Rows kept with an absent date.
    pub undated_rows: usize,
    /// Invitation rows kept with an absent direction.
    pub unrecognized_directions: usize,
}

/// Read the rows of `path`, starting at the first line that mentions
/// `header_column`. Network exports sometimes put a free-text notes block
/// above the real header.
fn read_rows<T: DeserializeOwned>(
    path: &Path,
    header_column: &'static str,
) -> Result<(Vec<T>, LoadReport)> {
    let text = std::fs::read_to_string(path)?;
    let mut report = LoadReport::default();
    if text.trim().is_empty() {
        warn!("{} is empty", path.display());
        return Ok((Vec::new(), report));
    }

    let offset = header_offset(&text, header_column).ok_or_else(|| ReportError::MissingHeader {
        path: path.display().to_string(),
        column: header_column,
    })?;
    if offset > 0 {
        debug!("Skipping {} bytes of preamble in {}", offset, path.display());
    }

    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text[offset..].as_bytes());
    let mut rows = Vec::new();
    for result in rdr.deserialize::<T>() {
        report.total_rows += 1;
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                debug!("Row {} of {} rejected: {}", report.total_rows, path.display(), e);
                report.parse_errors += 1;
            }
        }
    }
    Ok((rows, report))
}

fn header_offset(text: &str, column: &str) -> Option<usize> {
    let mut offset = 0usize;
    for line in text.split_inclusive('\n') {
        if line.split(',').any(|cell| cell.trim().trim_matches('"') == column) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

pub fn load_connections(path: &Path) -> Result<(Vec<ConnectionRecord>, LoadReport)> {
    let (rows, mut report) = read_rows::<RawConnectionRow>(path, "Connected On")?;

    let records: Vec<ConnectionRecord> = rows
        .into_iter()
        .map(|row| {
            let connected_on = parse_date_safe(row.connected_on.as_deref());
            if connected_on.is_none() {
                report.undated_rows += 1;
            }
            ConnectionRecord {
                connected_on,
                company: clean_text(row.company),
                position: clean_text(row.position),
            }
        })
        .collect();

    report.loaded_rows = records.len();
    if report.undated_rows > 0 {
        warn!(
            "{} connections have no usable 'Connected On' date",
            report.undated_rows
        );
    }
    info!(
        "Loaded {} connections from {} ({} rows rejected)",
        report.loaded_rows,
        path.display(),
        report.parse_errors
    );
    Ok((records, report))
}

pub fn load_invitations(path: &Path) -> Result<(Vec<InvitationRecord>, LoadReport)> {
    let (rows, mut report) = read_rows::<RawInvitationRow>(path, "Sent At")?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let sent_at = parse_date_safe(row.sent_at.as_deref());
        if sent_at.is_none() {
            report.undated_rows += 1;
        }
        let raw_direction = row.direction.unwrap_or_default();
        let direction = match raw_direction.parse::<Direction>() {
            Ok(d) => Some(d),
            Err(e) => {
                warn!("{}", e);
                report.unrecognized_directions += 1;
                None
            }
        };
        records.push(InvitationRecord { sent_at, direction });
    }

    report.loaded_rows = records.len();
    info!(
        "Loaded {} invitations from {} ({} rows rejected, {} undated)",
        report.loaded_rows,
        path.display(),
        report.parse_errors,
        report.undated_rows
    );
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_connections_with_preamble() {
        let file = write_temp(
            "Notes:\n\
             \"When exporting your connection data, some emails may be missing.\"\n\
             \n\
             First Name,Last Name,URL,Email Address,Company,Position,Connected On\n\
             Ada,L,https://x,,Acme , Senior Engineer ,15 Jun 2022\n\
             Bob,K,https://y,,Globex,Recruiter,not a date\n\
             Cy,M,https://z,,,,01 Jan 2021\n",
        );
        let (records, report) = load_connections(file.path()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            ConnectionRecord::new(
                NaiveDate::from_ymd_opt(2022, 6, 15).unwrap(),
                "Acme",
                "Senior Engineer"
            )
        );
        assert_eq!(records[1].connected_on, None);
        assert_eq!(records[2].company, "");
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.undated_rows, 1);
        assert_eq!(report.parse_errors, 0);
    }

    #[test]
    fn test_load_invitations_flags_unknown_direction() {
        let file = write_temp(
            "From,To,Sent At,Message,Direction\n\
             Me,You,\"6/15/22, 10:15 AM\",hi,OUTGOING\n\
             You,Me,\"6/16/22, 9:00 PM\",,incoming\n\
             Me,Them,\"6/17/22, 9:00 PM\",,SIDEWAYS\n",
        );
        let (records, report) = load_invitations(file.path()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].direction, Some(Direction::Outgoing));
        assert_eq!(records[1].direction, Some(Direction::Incoming));
        assert_eq!(records[2].direction, None);
        assert_eq!(records[2].sent_at, NaiveDate::from_ymd_opt(2022, 6, 17));
        assert_eq!(report.unrecognized_directions, 1);
    }

    #[test]
    fn test_empty_file_yields_empty_collection() {
        let file = write_temp("");
        let (records, report) = load_connections(file.path()).unwrap();
        assert!(records.is_empty());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let file = write_temp("a,b,c\n1,2,3\n");
        assert!(matches!(
            load_connections(file.path()),
            Err(ReportError::MissingHeader { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("Connections.csv");
        assert!(matches!(load_connections(&missing), Err(ReportError::Io(_))));
    }
}
