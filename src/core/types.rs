use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundingFrequency {
    Monthly,
    Annually,
}

/// Inputs for a single projection run. Rates are percentages, so `10.0`
/// means 10% per year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub initial: f64,
    /// Added every month, whatever the compounding frequency.
    pub periodic_contribution: f64,
    pub horizon_years: f64,
    pub annual_return_rate: f64,
    pub annual_inflation_rate: f64,
    pub compounding_frequency: CompoundingFrequency,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySnapshot {
    pub year: u32,
    pub nominal_balance: f64,
    pub real_balance: f64,
    pub cumulative_contributed: f64,
}

/// Headline figures of a projection: the last completed year, or zeros when
/// the horizon never reaches a full year.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub year: u32,
    pub nominal_balance: f64,
    pub real_balance: f64,
    pub cumulative_contributed: f64,
}

impl From<YearlySnapshot> for ProjectionSummary {
    fn from(value: YearlySnapshot) -> Self {
        Self {
            year: value.year,
            nominal_balance: value.nominal_balance,
            real_balance: value.real_balance,
            cumulative_contributed: value.cumulative_contributed,
        }
    }
}
