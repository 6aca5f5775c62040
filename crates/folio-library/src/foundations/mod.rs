//! Resolved formatting properties.

#[macro_use]
mod keyword;
mod keep;
mod property;

pub use self::keep::*;
pub use self::keyword::*;
pub use self::property::*;
