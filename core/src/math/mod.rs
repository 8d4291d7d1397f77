pub mod filter;
pub mod stats;

pub use filter::FilterHelper;
pub use stats::StatsHelper;
