//! Canvas Model - Positioned widgets on a report page
//!
//! This crate provides the in-memory model for report layouts: a page
//! configuration plus an ordered list of grid-aligned widgets. All geometry
//! operations are pure and never fail; they snap to the 10px grid and clamp
//! sizes to one grid unit.

mod error;
mod grid;
mod widget_id;
pub mod page;
pub mod widget;
pub mod resize;
pub mod document;
pub mod session;

pub use error::*;
pub use grid::*;
pub use widget_id::*;
pub use page::*;
pub use widget::*;
pub use resize::*;
pub use document::*;
pub use session::*;
