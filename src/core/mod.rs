mod engine;
mod sanitize;
mod types;

pub use engine::{horizon_months, simulate, summarize};
pub use sanitize::{finite_or_zero, parse_number};
pub use types::{CompoundingFrequency, ProjectionSummary, SimulationConfig, YearlySnapshot};
