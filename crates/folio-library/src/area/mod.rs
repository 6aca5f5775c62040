//! The area tree: positioned geometry handed to renderers.

mod block;
mod page;

pub use self::block::*;
pub use self::page::*;
