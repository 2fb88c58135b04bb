//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Stage`: The five pipeline phases, in execution order
//! - `WorkerPace`: Per-worker request pacing for polite crawling

mod pace;
mod stage;

// Re-export main types
pub use pace::WorkerPace;
pub use stage::Stage;
