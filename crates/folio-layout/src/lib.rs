//! Folio's layout engine.
//!
//! Layout managers turn the content tree into [atoms], the [breaking]
//! algorithm decides where lines and pages end, and the managers then
//! materialize the accepted ranges into areas. Tables distribute their width
//! through [columns] before laying out their rows.

pub mod atoms;
pub mod breaking;
pub mod columns;
pub mod context;
pub mod managers;
mod pages;

pub use self::pages::{Document, InitialPageNumber, layout_document};
