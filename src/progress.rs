//! Decoding of the worker's per-line progress output.
//!
//! The worker is asked to print one line per progress update using
//! [`PROGRESS_TEMPLATE`], which yields pipe-delimited fields:
//!
//! ```text
//! 45.0%|00:12|1.2MiB/s|10.5MiB
//! ```
//!
//! Anything else the worker prints (destination notices, merger output,
//! warnings) is ignored rather than treated as an error.

/// Progress template passed to the external tool.
pub const PROGRESS_TEMPLATE: &str = "%(progress._percent_str)s|%(progress._eta_str)s|%(progress._speed_str)s|%(progress._total_bytes_estimate_str)s";

const FIELD_SEPARATOR: char = '|';

/// Free-form transfer statistics reported by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DownloadStats {
    /// Estimated time remaining.
    pub eta: String,
    /// Transfer rate.
    pub speed: String,
    /// Total size (or its estimate).
    pub total_size: String,
}

impl DownloadStats {
    /// Placeholder shown before the first stats line arrives.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            eta: "...".to_string(),
            speed: "...".to_string(),
            total_size: "...".to_string(),
        }
    }
}

/// Items decoded from a single line of worker output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedLine {
    /// Completion fraction, `percent / 100`.
    pub fraction: Option<f64>,
    /// Transfer statistics, present when the line carries all four fields.
    pub stats: Option<DownloadStats>,
}

impl ParsedLine {
    /// Returns true when nothing could be decoded from the line.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fraction.is_none() && self.stats.is_none()
    }
}

/// Decodes one line of worker output.
///
/// Malformed or unrelated lines decode to an empty [`ParsedLine`].
#[must_use]
pub fn parse_progress_line(line: &str) -> ParsedLine {
    let fields: Vec<&str> = line.trim().split(FIELD_SEPARATOR).map(str::trim).collect();

    let fraction = fields.first().and_then(|field| parse_percent(field));
    let stats = match fields.as_slice() {
        [_, eta, speed, total_size, ..] => Some(DownloadStats {
            eta: (*eta).to_string(),
            speed: (*speed).to_string(),
            total_size: (*total_size).to_string(),
        }),
        _ => None,
    };

    ParsedLine { fraction, stats }
}

/// Parses a `"45.0%"` style field into a fraction.
fn parse_percent(field: &str) -> Option<f64> {
    field
        .replace('%', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|percent| percent.is_finite())
        .map(|percent| percent / 100.0)
}
