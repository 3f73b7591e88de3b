//! # sideload-core
//!
//! Foundational types shared across all sideload crates:
//! - Scalar cell values read from tabular input
//! - The nested payload tree and the dotted-key flattener
//! - Tabular records and normalized datasets
//! - Per-path upload results and the run report
//! - Cross-cutting error types

pub mod cell;
pub mod dataset;
pub mod errors;
pub mod payload;
pub mod report;

pub use cell::CellValue;
pub use dataset::{NormalizedDataset, TabularRecord};
pub use errors::CoreError;
pub use payload::{PayloadMap, PayloadNode, flatten};
