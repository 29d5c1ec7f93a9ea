//! Report Layout - From a canvas and a dataset to printable pages
//!
//! This crate holds the tabular data fed to a report (with the viewer's
//! filter and sort steps), localized column labels, and the planner that
//! splits rows into fixed-size pages and decides which canvas elements,
//! headings and footers render on each page.
//!
//! Rendering itself (PDF, DOCX, print, CSV) consumes [`PageRenderSpec`]s and
//! lives outside this crate.

mod error;
pub mod dataset;
pub mod labels;
pub mod pagination;

pub use error::*;
pub use dataset::*;
pub use labels::*;
pub use pagination::*;
