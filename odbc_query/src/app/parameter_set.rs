use crate::error::{OdbcError, Result};
use crate::protocol::Value;
use std::ops::Range;

pub type ParameterRow = Vec<Value>;

/// Parameter rows bound to one statement (`SQL_ATTR_PARAMSET_SIZE` rows)
/// plus the "params processed" output slot (`SQL_ATTR_PARAMS_PROCESSED_PTR`).
///
/// All rows carry the same number of parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    rows: Vec<ParameterRow>,
    params_processed: Option<usize>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<ParameterRow>) -> Result<Self> {
        validate_rows(&rows)?;
        Ok(Self {
            rows,
            params_processed: None,
        })
    }

    pub fn push_row(&mut self, row: ParameterRow) -> Result<()> {
        if let Some(first) = self.rows.first() {
            if first.len() != row.len() {
                return Err(OdbcError::ValidationError(format!(
                    "parameter row {} has {} values, expected {}",
                    self.rows.len(),
                    row.len(),
                    first.len()
                )));
            }
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn param_set_size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn params_per_row(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn row(&self, idx: usize) -> Option<&ParameterRow> {
        self.rows.get(idx)
    }

    /// Rows `[begin, end)`; `None` if the range falls outside the set.
    pub fn rows(&self, range: Range<usize>) -> Option<&[ParameterRow]> {
        self.rows.get(range)
    }

    /// Number of rows for which the last execution obtained an outcome.
    /// `None` until an execution has finished.
    pub fn params_processed(&self) -> Option<usize> {
        self.params_processed
    }

    pub(crate) fn set_params_processed(&mut self, processed: usize) {
        self.params_processed = Some(processed);
    }
}

fn validate_rows(rows: &[ParameterRow]) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let width = first.len();
    for (idx, row) in rows.iter().enumerate().skip(1) {
        if row.len() != width {
            return Err(OdbcError::ValidationError(format!(
                "parameter row {} has {} values, expected {}",
                idx,
                row.len(),
                width
            )));
        }
    }
    Ok(())
}
