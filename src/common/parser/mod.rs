mod common;
mod duration;
mod result;
mod string;

// Re-export
pub use common::*;
pub use duration::*;
pub use result::*;
pub use string::*;
