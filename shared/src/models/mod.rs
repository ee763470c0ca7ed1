//! Domain models for the farm calculators

mod calculation;
mod fertilizer;
mod history;
mod pesticide;
mod profit;

pub use calculation::*;
pub use fertilizer::*;
pub use history::*;
pub use pesticide::*;
pub use profit::*;
