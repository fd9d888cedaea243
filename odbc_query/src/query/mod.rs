//! Statement kinds behind a shared lifecycle.
//!
//! A query starts not executed. `execute` moves it to executed on success
//! (or success with info); `close` returns it to the initial state from
//! anywhere. Errors never escape as `Err`: every failure is written to the
//! caller's [`Diagnosable`] sink and reported through [`SqlResult`].

pub mod batch;
pub mod type_info;

pub use batch::BatchQuery;
pub use type_info::TypeInfoQuery;

use crate::app::{ApplicationDataBuffer, ColumnBindingMap, ParameterSet};
use crate::diagnostic::{Diagnosable, SqlResult};
use crate::meta::ColumnMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Batch,
    TypeInfo,
}

pub trait Query: Send {
    fn query_type(&self) -> QueryType;

    fn execute(&mut self, diag: &mut dyn Diagnosable) -> SqlResult;

    /// Result column descriptions. Empty for row-less kinds.
    fn meta(&self) -> &[ColumnMeta];

    fn fetch_next_row(
        &mut self,
        bindings: &mut ColumnBindingMap,
        diag: &mut dyn Diagnosable,
    ) -> SqlResult;

    /// Reads column `column_idx` (1-based) of the current row.
    fn get_column(
        &mut self,
        column_idx: u16,
        buffer: &mut dyn ApplicationDataBuffer,
        diag: &mut dyn Diagnosable,
    ) -> SqlResult;

    fn close(&mut self) -> SqlResult;

    fn data_available(&self) -> bool;

    fn affected_rows(&self) -> i64;

    fn next_result_set(&mut self) -> SqlResult;

    /// Parameter array bound to the query, if it takes one.
    fn parameter_set(&self) -> Option<&ParameterSet> {
        None
    }
}
