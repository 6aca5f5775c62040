//! Folio's value types, content tree and area tree.
//!
//! This crate holds everything the layout engine consumes and produces but
//! no layout logic itself:
//! - **Diagnostics and engine:** [`diag`] and [`engine`] report problems
//!   without aborting layout.
//! - **Values:** [`layout`] defines absolute and percentage lengths and
//!   their resolution, [`foundations`] the resolved properties and their
//!   keywords.
//! - **Input:** [`model`] is the content tree the layout managers walk.
//! - **Output:** [`area`] is the positioned area tree handed to renderers,
//!   [`introspection`] records on which page an identified node landed.

pub mod area;
pub mod config;
pub mod diag;
pub mod engine;
pub mod foundations;
pub mod introspection;
pub mod layout;
pub mod model;
