//! The content tree layout consumes.

mod page;
mod styles;
mod text;
mod tree;

pub use self::page::*;
pub use self::styles::*;
pub use self::text::*;
pub use self::tree::*;
