//! Table transformations.
//!
//! Every operation takes `&DataFrame` and returns a new frame; the input is
//! never modified. [`flows`] wraps them for single-shot use on an uploaded
//! buffer, and [`dropped`] adds the drop-then-restore cache.

pub mod columns;
pub mod dropped;
pub mod encode;
pub mod flows;
pub mod impute;
pub mod rows;
pub mod scale;
pub mod stats;
pub mod types;

pub use columns::{change_dtypes, drop_columns, rename_columns};
pub use dropped::{DroppedColumnCache, DroppedColumns};
pub use encode::{one_hot, ordinal};
pub use impute::impute;
pub use rows::{drop_duplicates, filter_rows};
pub use scale::scale;
pub use types::{EncodeMethod, FilterSpec, ImputeMethod, ScaleMethod, TargetDtype};

#[cfg(test)]
mod tests;
