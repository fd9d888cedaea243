pub mod binding;
pub mod parameter_set;

pub use binding::{ApplicationDataBuffer, BoundBuffer, ColumnBindingMap, ConversionResult};
pub use parameter_set::{ParameterRow, ParameterSet};
