//! Placeholders - `{identifier}` substitution for report text
//!
//! Headings, footers and widget text may contain `{identifier}` tokens. An
//! identifier is any run of characters other than `}` and may be a dotted path
//! (`customer.address.city`) into a nested record. There is no escape syntax
//! for literal braces.
//!
//! Substitution never fails: a token whose path does not resolve is left in
//! the output verbatim.
//!
//! # Example
//!
//! ```rust
//! use placeholders::{extract_placeholders, populate_placeholders};
//! use serde_json::json;
//!
//! assert_eq!(
//!     extract_placeholders("Hello {name}, balance {acct.bal}"),
//!     vec!["name", "acct.bal"]
//! );
//!
//! let record = json!({ "user": { "name": "Ann" } });
//! assert_eq!(populate_placeholders("Hi {user.name}", &record), "Hi Ann");
//! assert_eq!(populate_placeholders("Hi {user.missing}", &record), "Hi {user.missing}");
//! ```

mod scan;
mod source;
mod populate;
pub mod prompt;

pub use scan::{extract_placeholders, format_placeholder_label, strip_placeholders};
pub use source::{resolve_path, PlaceholderSource};
pub use populate::{format_iso_date, populate_placeholders, render_value};
pub use prompt::{PromptField, PromptSpec};
