//! Small statistical helpers shared by the planner and the CLI.
//!
//! - [`descriptive`]: summary statistics (min, max, mean, median, standard
//!   deviation) for a dataset
//! - [`histogram`]: fixed-width frequency binning for simulation reports

pub mod descriptive;
pub mod histogram;
