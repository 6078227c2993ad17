//! Historical hashtag record, aligned onto a complete daily calendar.
//!
//! Loaded once at startup and shared read-only by every request.

pub mod calendar;
pub mod dates;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::DatasetConfig;
pub use calendar::DateWindow;
pub use dates::DateParser;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("cannot open dataset '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset has no '{0}' column")]
    MissingDateColumn(String),

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("line {line}: '{value}' does not match any of the formats {formats:?}")]
    UnparsableDate {
        line: u64,
        value: String,
        formats: Vec<String>,
    },

    #[error("line {line}: column '{column}' has non-numeric count '{value}'")]
    InvalidCount {
        line: u64,
        column: String,
        value: String,
    },
}

/// One hashtag's values over the full calendar, paired with its dates.
#[derive(Debug, Clone)]
pub struct DailySeries {
    dates: Arc<[NaiveDate]>,
    values: Arc<[f64]>,
}

impl DailySeries {
    pub fn new(dates: Arc<[NaiveDate]>, values: Arc<[f64]>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self { dates, values }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Left join of the canonical calendar with the historical record.
/// Every date of the window appears exactly once; absent counts are zero.
#[derive(Debug)]
pub struct AlignedTable {
    window: DateWindow,
    dates: Arc<[NaiveDate]>,
    columns: BTreeMap<String, Arc<[f64]>>,
}

impl AlignedTable {
    pub fn window(&self) -> DateWindow {
        self.window
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Column names, sorted, without any `#` prefix.
    pub fn hashtags(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn series(&self, column: &str) -> Option<DailySeries> {
        self.columns
            .get(column)
            .map(|values| DailySeries::new(self.dates.clone(), values.clone()))
    }
}

#[derive(Debug, Default)]
struct LoadStats {
    rows: usize,
    outside_window: usize,
    duplicate_dates: usize,
    ambiguous_dates: usize,
}

/// Read the CSV named by `config.path` and align it onto the configured window.
pub fn load(config: &DatasetConfig) -> Result<AlignedTable, DatasetError> {
    let file = File::open(&config.path).map_err(|source| DatasetError::Open {
        path: config.path.clone(),
        source,
    })?;
    let table = from_reader(file, config)?;
    info!(
        path = %config.path,
        rows = table.len(),
        hashtags = table.columns.len(),
        start_date = %table.window.start,
        end_date = %table.window.end,
        "Dataset loaded"
    );
    Ok(table)
}

pub fn from_reader<R: Read>(reader: R, config: &DatasetConfig) -> Result<AlignedTable, DatasetError> {
    let window = DateWindow::new(config.start_date, config.end_date);
    let parser = DateParser::new(config.date_formats.clone());

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h == config.date_column)
        .ok_or_else(|| DatasetError::MissingDateColumn(config.date_column.clone()))?;

    // (csv index, column name) for every count column
    let mut count_columns: Vec<(usize, String)> = Vec::new();
    for (idx, name) in headers.iter().enumerate() {
        if idx == date_idx || name.is_empty() {
            continue;
        }
        if count_columns.iter().any(|(_, existing)| existing == name) {
            return Err(DatasetError::DuplicateColumn(name.to_string()));
        }
        count_columns.push((idx, name.to_string()));
    }

    let mut values: Vec<Vec<f64>> = vec![vec![0.0; window.len()]; count_columns.len()];
    let mut seen = vec![false; window.len()];
    let mut stats = LoadStats::default();

    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        stats.rows += 1;

        let raw_date = record.get(date_idx).unwrap_or_default();
        let parsed = parser.parse(raw_date).ok_or_else(|| DatasetError::UnparsableDate {
            line,
            value: raw_date.to_string(),
            formats: parser.formats().to_vec(),
        })?;
        if parsed.ambiguous {
            stats.ambiguous_dates += 1;
        }

        let Some(offset) = window.offset(parsed.date) else {
            stats.outside_window += 1;
            continue;
        };
        if std::mem::replace(&mut seen[offset], true) {
            stats.duplicate_dates += 1;
        }

        for (column, (idx, name)) in count_columns.iter().enumerate() {
            let raw = record.get(*idx).unwrap_or_default();
            values[column][offset] += parse_count(raw).ok_or_else(|| DatasetError::InvalidCount {
                line,
                column: name.clone(),
                value: raw.to_string(),
            })?;
        }
    }

    report(&stats, &parser);

    let columns: BTreeMap<String, Arc<[f64]>> = count_columns
        .into_iter()
        .zip(values)
        .map(|((_, name), column)| (name, Arc::from(column)))
        .collect();

    Ok(AlignedTable {
        window,
        dates: Arc::from(window.days()),
        columns,
    })
}

/// Empty and non-finite cells count as missing, i.e. zero.
fn parse_count(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return Some(0.0);
    }
    let value: f64 = raw.parse().ok()?;
    Some(if value.is_finite() { value } else { 0.0 })
}

fn report(stats: &LoadStats, parser: &DateParser) {
    if stats.ambiguous_dates > 0 {
        warn!(
            count = stats.ambiguous_dates,
            formats = ?parser.formats(),
            "Dates valid under more than one format were read with the first matching format"
        );
    }
    if stats.duplicate_dates > 0 {
        warn!(count = stats.duplicate_dates, "Duplicate dates in dataset, counts summed");
    }
    if stats.rows == stats.outside_window {
        warn!(rows = stats.rows, "No dataset rows fall inside the analysis window");
    }
    info!(
        rows = stats.rows,
        outside_window = stats.outside_window,
        "Dataset rows aligned"
    );
}
