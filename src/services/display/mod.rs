pub mod summary;
pub mod sink;

pub use summary::*;
pub use sink::*;
