//! Canvas Store - Canvas file format and layout persistence
//!
//! This crate converts canvas documents to and from their portable JSON form,
//! tolerating the historical variants found in stored layouts (quote-wrapped
//! JSON strings, alternate field names, nested geometry objects). It also
//! provides the stored-layout record exchanged with the backend, a file-backed
//! layout repository, and designer settings.

mod error;
mod format;
mod legacy;
mod schema;
mod codec;
mod summary;
mod repository;
mod settings;

pub use error::*;
pub use format::*;
pub use legacy::unwrap_quoted;
pub use codec::*;
pub use summary::*;
pub use repository::*;
pub use settings::*;
