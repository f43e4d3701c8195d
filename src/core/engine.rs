use super::sanitize::finite_or_zero;
use super::types::{CompoundingFrequency, ProjectionSummary, SimulationConfig, YearlySnapshot};

const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, Copy)]
struct PeriodRates {
    monthly_return: f64,
    annual_return: f64,
    monthly_inflation: f64,
    annual_inflation: f64,
}

impl PeriodRates {
    fn from_config(config: &SimulationConfig) -> Self {
        let annual_return = finite_or_zero(config.annual_return_rate) / 100.0;
        let annual_inflation = finite_or_zero(config.annual_inflation_rate) / 100.0;
        Self {
            monthly_return: annual_return / f64::from(MONTHS_PER_YEAR),
            annual_return,
            monthly_inflation: annual_inflation / f64::from(MONTHS_PER_YEAR),
            annual_inflation,
        }
    }
}

/// Number of simulated months for a horizon in years, never less than one.
pub fn horizon_months(horizon_years: f64) -> u32 {
    let months = (finite_or_zero(horizon_years) * f64::from(MONTHS_PER_YEAR)).round();
    // Float-to-int casts saturate, so negative horizons land on 0 here.
    (months as u32).max(1)
}

/// Steps the balance month by month and records one snapshot per completed
/// year. Monthly compounding grows the balance before each deposit; annual
/// compounding grows it once, after the twelfth deposit of each year.
pub fn simulate(config: &SimulationConfig) -> Vec<YearlySnapshot> {
    let months = horizon_months(config.horizon_years);
    let rates = PeriodRates::from_config(config);
    let compound_monthly = config.compounding_frequency == CompoundingFrequency::Monthly;
    let contribution = finite_or_zero(config.periodic_contribution);

    let mut balance = finite_or_zero(config.initial);
    let mut contributed = balance;
    let mut snapshots = Vec::with_capacity((months / MONTHS_PER_YEAR) as usize);

    for month in 1..=months {
        let year_end = month % MONTHS_PER_YEAR == 0;

        if compound_monthly {
            balance *= 1.0 + rates.monthly_return;
        }
        balance += contribution;
        contributed += contribution;
        if !compound_monthly && year_end {
            balance *= 1.0 + rates.annual_return;
        }

        if year_end {
            let year = month / MONTHS_PER_YEAR;
            let inflation_factor = if compound_monthly {
                (1.0 + rates.monthly_inflation).powf(f64::from(month))
            } else {
                (1.0 + rates.annual_inflation).powf(f64::from(year))
            };
            snapshots.push(YearlySnapshot {
                year,
                nominal_balance: balance,
                real_balance: balance / deflation_divisor(inflation_factor),
                cumulative_contributed: contributed,
            });
        }
    }

    snapshots
}

// -100% inflation collapses the factor to zero.
fn deflation_divisor(inflation_factor: f64) -> f64 {
    if inflation_factor == 0.0 {
        1.0
    } else {
        inflation_factor
    }
}

pub fn summarize(snapshots: &[YearlySnapshot]) -> ProjectionSummary {
    snapshots
        .last()
        .copied()
        .map(ProjectionSummary::from)
        .unwrap_or_default()
}
