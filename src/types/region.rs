//! The region directory: one record per administrative region, with the column
//! names taken verbatim from the directory table's header row.

use polars::prelude::*;
use std::collections::BTreeMap;

/// One row of the region directory.
///
/// Fields keep the order of the header row they were parsed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRecord {
    fields: Vec<(String, String)>,
}

impl RegionRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Cell text for `column`, if the directory has such a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// The parsed directory table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDirectory {
    headers: Vec<String>,
    records: Vec<RegionRecord>,
}

impl RegionDirectory {
    pub fn new(headers: Vec<String>, records: Vec<RegionRecord>) -> Self {
        Self { headers, records }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[RegionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose `column` cell equals `value`, ignoring surrounding whitespace.
    pub fn find(&self, column: &str, value: &str) -> Option<&RegionRecord> {
        let value = value.trim();
        self.records
            .iter()
            .find(|r| r.get(column).is_some_and(|v| v.trim() == value))
    }

    /// Indexes the records by the text of `column` (e.g. the region name column).
    ///
    /// When several rows share a key the first one is kept.
    pub fn keyed_by(&self, column: &str) -> BTreeMap<&str, &RegionRecord> {
        let mut keyed = BTreeMap::new();
        for record in &self.records {
            if let Some(key) = record.get(column) {
                keyed.entry(key).or_insert(record);
            }
        }
        keyed
    }

    /// Builds a frame with one string column per header, in header order.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let columns = self
            .headers
            .iter()
            .map(|header| {
                let values: Vec<&str> = self
                    .records
                    .iter()
                    .map(|r| r.get(header).unwrap_or_default())
                    .collect();
                Column::new(header.as_str().into(), values)
            })
            .collect::<Vec<_>>();
        DataFrame::new(columns)
    }
}
