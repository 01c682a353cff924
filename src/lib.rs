//! # dataprepper
//!
//! Cleaning and reshaping of uploaded CSV tables, with undoable editing
//! sessions and per-column data-quality diagnostics.
//!
//! ## Quick Start
//!
//! ```
//! use dataprepper::ops::{self, ImputeMethod};
//! use dataprepper::{diagnostics, frame};
//!
//! # fn main() -> dataprepper::error::Result<()> {
//! let df = frame::decode(b"age,city\n30,Oslo\n,Lima\n50,Oslo\n")?;
//! let filled = ops::impute(&df, &["age".to_owned()], ImputeMethod::Mean, None)?;
//! assert_eq!(filled.column("age")?.null_count(), 0);
//!
//! let report = diagnostics::analyze(&df)?;
//! assert_eq!(report.get("age").map(|c| c.count), Some(2));
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`frame`]: CSV codec, output sanitization and previews
//! - [`ops`]: standalone table operations and the dropped-column cache
//! - [`lifecycle`]: session registry and the undoable transformation engine
//! - [`diagnostics`]: column statistics, quality scores, recommendations
//! - [`http`]: axum REST API over all of the above
//! - [`config`], [`logging`], [`error`]: ambient plumbing
//!
//! Every operation takes a `&DataFrame` and returns a new one. Snapshots in
//! a session history are plain `DataFrame` values; polars columns are
//! reference counted, so keeping them costs no copies.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod frame;
pub mod http;
pub mod lifecycle;
pub mod logging;
pub mod ops;
