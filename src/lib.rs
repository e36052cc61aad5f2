pub mod data;
pub mod pipeline;

pub use data::error::{Result, TableError};
pub use data::model::{Table, Value};
