pub mod display;
pub mod metrics;
pub mod scheduler;
pub mod swipe;
pub mod tracker;
