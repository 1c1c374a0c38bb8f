pub mod types;
pub mod normalize;
pub mod client;

pub use types::*;
pub use normalize::*;
pub use client::*;
