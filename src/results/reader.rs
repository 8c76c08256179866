//! CSV ingestion for the raw results produced by the Java benchmark driver.
//!
//! Result files are comma-delimited with `|` as the quote character. The
//! header row declares the column order, so columns are resolved by name and
//! may appear in any order. United files produced by concatenating per-trial
//! outputs contain repeated header rows; those are skipped as data, as are any
//! rows preceding the first header.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

const DELIMITER: char = ',';
const QUOTE: char = '|';

/// Errors surfaced while reading or aggregating a results file.
#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("failed to access results file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no header row found in results file")]
    MissingHeader,
    #[error("line {line}: row has {found} fields, column {column} is out of reach")]
    TruncatedRow {
        line: usize,
        column: &'static str,
        found: usize,
    },
    #[error("line {line}: column {column} holds non-numeric value {value:?}")]
    Malformed {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("configuration {key}: zero elapsed time for {op} operations")]
    ZeroElapsed { key: String, op: &'static str },
}

/// One benchmark trial, with every numeric field parsed eagerly.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub name: String,
    pub workload_threads: u32,
    pub size_threads: u32,
    pub percentage_ratio: String,
    pub init_size: u64,
    pub time: f64,
    pub workload_threads_throughput: u64,
    pub size_threads_throughput: u64,
    pub insert_succeeded: u64,
    pub insert_failed: u64,
    pub delete_succeeded: u64,
    pub delete_failed: u64,
    pub contains_succeeded: u64,
    pub contains_failed: u64,
    pub insert_elapsed: f64,
    pub delete_elapsed: f64,
    pub contains_elapsed: f64,
}

/// Distinct dimension values observed across a results file, in first-seen
/// order. Size-thread counts are only recorded for size-tracking algorithms,
/// since baselines always run with zero size threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dimensions {
    pub workload_threads: Vec<u32>,
    pub size_threads: Vec<u32>,
    pub ratios: Vec<String>,
    pub init_sizes: Vec<u64>,
    pub algorithms: Vec<String>,
}

impl Dimensions {
    fn observe(&mut self, row: &ResultRow) {
        push_unique(&mut self.workload_threads, row.workload_threads);
        if super::key::is_size_tracking(&row.name) {
            push_unique(&mut self.size_threads, row.size_threads);
        }
        push_unique(&mut self.init_sizes, row.init_size);
        if !self.ratios.contains(&row.percentage_ratio) {
            self.ratios.push(row.percentage_ratio.clone());
        }
        if !self.algorithms.contains(&row.name) {
            self.algorithms.push(row.name.clone());
        }
    }
}

fn push_unique<T: PartialEq + Copy>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Parsed rows plus the dimensions they span.
#[derive(Debug, Clone, Default)]
pub struct RawResults {
    pub rows: Vec<ResultRow>,
    pub dimensions: Dimensions,
}

/// Reads and parses a results file from disk.
pub fn read_results(path: &Path) -> Result<RawResults, ResultsError> {
    let content = fs::read_to_string(path).map_err(|source| ResultsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_results(&content)
}

/// Parses results from an in-memory CSV document.
pub fn parse_results(content: &str) -> Result<RawResults, ResultsError> {
    let mut header: Option<HeaderIndex> = None;
    let mut results = RawResults::default();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let cells = split_record(line);

        let index = match &header {
            None => {
                // Rows before the first header carry no usable column map.
                header = HeaderIndex::try_from_row(&cells);
                continue;
            }
            Some(index) => index,
        };

        // Repeated header from a concatenated per-trial file.
        if cells.get(index.name).map(String::as_str) == Some("name") {
            continue;
        }

        let row = index.parse_row(&cells, line_no)?;
        results.dimensions.observe(&row);
        results.rows.push(row);
    }

    if header.is_none() {
        return Err(ResultsError::MissingHeader);
    }

    Ok(results)
}

/// Positions of the named columns within a record, resolved from the header.
#[derive(Debug, Clone)]
struct HeaderIndex {
    name: usize,
    workload_threads: usize,
    size_threads: usize,
    percentage_ratio: usize,
    init_size: usize,
    time: usize,
    workload_threads_throughput: usize,
    size_threads_throughput: usize,
    insert_succeeded: usize,
    insert_failed: usize,
    delete_succeeded: usize,
    delete_failed: usize,
    contains_succeeded: usize,
    contains_failed: usize,
    insert_elapsed: usize,
    delete_elapsed: usize,
    contains_elapsed: usize,
}

impl HeaderIndex {
    /// A row counts as a header only when every required column is present.
    fn try_from_row(cells: &[String]) -> Option<Self> {
        let find = |column: &str| cells.iter().position(|cell| cell == column);
        Some(Self {
            name: find("name")?,
            workload_threads: find("nWorkloadThreads")?,
            size_threads: find("nSizeThreads")?,
            percentage_ratio: find("percentageRatio")?,
            init_size: find("initSize")?,
            time: find("time")?,
            workload_threads_throughput: find("workloadThreadsThroughput")?,
            size_threads_throughput: find("sizeThreadsThroughput")?,
            insert_succeeded: find("ninstrue")?,
            insert_failed: find("ninsfalse")?,
            delete_succeeded: find("ndeltrue")?,
            delete_failed: find("ndelfalse")?,
            contains_succeeded: find("ncontainstrue")?,
            contains_failed: find("ncontainsfalse")?,
            insert_elapsed: find("totalelapsedinstime")?,
            delete_elapsed: find("totalelapseddeltime")?,
            contains_elapsed: find("totalelapsedcontainstime")?,
        })
    }

    fn parse_row(&self, cells: &[String], line: usize) -> Result<ResultRow, ResultsError> {
        Ok(ResultRow {
            name: cell(cells, self.name, "name", line)?.to_string(),
            workload_threads: parse_cell(cells, self.workload_threads, "nWorkloadThreads", line)?,
            size_threads: parse_cell(cells, self.size_threads, "nSizeThreads", line)?,
            percentage_ratio: cell(cells, self.percentage_ratio, "percentageRatio", line)?
                .to_string(),
            init_size: parse_cell(cells, self.init_size, "initSize", line)?,
            time: parse_cell(cells, self.time, "time", line)?,
            workload_threads_throughput: parse_cell(
                cells,
                self.workload_threads_throughput,
                "workloadThreadsThroughput",
                line,
            )?,
            size_threads_throughput: parse_cell(
                cells,
                self.size_threads_throughput,
                "sizeThreadsThroughput",
                line,
            )?,
            insert_succeeded: parse_cell(cells, self.insert_succeeded, "ninstrue", line)?,
            insert_failed: parse_cell(cells, self.insert_failed, "ninsfalse", line)?,
            delete_succeeded: parse_cell(cells, self.delete_succeeded, "ndeltrue", line)?,
            delete_failed: parse_cell(cells, self.delete_failed, "ndelfalse", line)?,
            contains_succeeded: parse_cell(cells, self.contains_succeeded, "ncontainstrue", line)?,
            contains_failed: parse_cell(cells, self.contains_failed, "ncontainsfalse", line)?,
            insert_elapsed: parse_cell(cells, self.insert_elapsed, "totalelapsedinstime", line)?,
            delete_elapsed: parse_cell(cells, self.delete_elapsed, "totalelapseddeltime", line)?,
            contains_elapsed: parse_cell(
                cells,
                self.contains_elapsed,
                "totalelapsedcontainstime",
                line,
            )?,
        })
    }
}

fn cell<'a>(
    cells: &'a [String],
    index: usize,
    column: &'static str,
    line: usize,
) -> Result<&'a str, ResultsError> {
    cells
        .get(index)
        .map(String::as_str)
        .ok_or(ResultsError::TruncatedRow {
            line,
            column,
            found: cells.len(),
        })
}

fn parse_cell<T: FromStr>(
    cells: &[String],
    index: usize,
    column: &'static str,
    line: usize,
) -> Result<T, ResultsError> {
    let value = cell(cells, index, column, line)?;
    value.parse().map_err(|_| ResultsError::Malformed {
        line,
        column,
        value: value.to_string(),
    })
}

/// Splits one record into cells, honoring the `|` quote character so quoted
/// fields may contain the delimiter.
fn split_record(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    for ch in line.chars() {
        if ch == QUOTE {
            quoted = !quoted;
        } else if ch == DELIMITER && !quoted {
            cells.push(std::mem::take(&mut cell));
        } else {
            cell.push(ch);
        }
    }
    cells.push(cell);
    cells
}
