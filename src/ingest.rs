//! Parsing of `id,lat,lon` text lines, the OpenStreetMap extract format.

use crate::error::{BkdError, Result};
use crate::store::PointStore;
use std::io::BufRead;

/// One successfully parsed input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedLine {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
}

/// Parse `id,lat,lon`. Surrounding whitespace on each field is ignored.
///
/// Range checks happen later, when the point is encoded.
///
/// # Examples
///
/// ```
/// use spatio_bkd::ingest::parse_line;
///
/// let line = parse_line("42,51.5074,-0.1278").unwrap();
/// assert_eq!(line.id, 42);
/// assert!(parse_line("42,north,-0.1278").is_err());
/// ```
pub fn parse_line(line: &str) -> Result<ParsedLine> {
    let mut parts = line.trim().split(',');
    let (Some(id), Some(lat), Some(lon), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(BkdError::Encoding(format!(
            "Expected 3 comma-separated fields: {:?}",
            line
        )));
    };

    let id = id
        .trim()
        .parse::<u64>()
        .map_err(|e| BkdError::Encoding(format!("Bad id {:?}: {}", id, e)))?;
    let lat = parse_degrees(lat, "latitude")?;
    let lon = parse_degrees(lon, "longitude")?;
    Ok(ParsedLine { id, lat, lon })
}

fn parse_degrees(field: &str, what: &str) -> Result<f64> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|e| BkdError::Encoding(format!("Bad {} {:?}: {}", what, field, e)))
}

/// Outcome of [`load_lines`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub accepted: usize,
    pub rejected: usize,
}

/// Feed every line of `reader` into `store`.
///
/// Malformed or out-of-range lines are skipped and counted; blank lines are
/// ignored. I/O errors and a sealed store abort the load.
pub fn load_lines<R: BufRead>(reader: R, store: &mut PointStore) -> Result<IngestReport> {
    let mut report = IngestReport::default();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let appended = parse_line(&line)
            .and_then(|parsed| store.append_with_id(parsed.lat, parsed.lon, parsed.id));
        match appended {
            Ok(()) => {
                report.accepted += 1;
                if report.accepted % 1_000_000 == 0 {
                    log::info!("{} points loaded", report.accepted);
                }
            }
            Err(BkdError::Encoding(reason)) => {
                log::trace!("Skipping line {}: {}", lineno + 1, reason);
                report.rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}
