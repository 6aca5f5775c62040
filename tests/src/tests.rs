//! End-to-end layout tests.
//!
//! Each test builds a content tree, typesets it into memory and checks the
//! pages that come out.

mod diagnostics;
mod pagination;
mod regions;
mod tables;
mod world;
