mod engine;
mod error;
mod report;
mod types;

pub use engine::{
    build_monthly_series, build_yearly_series, derive_rates, run_projection, scan_break_even,
};
pub use error::ProjectionError;
pub use report::{
    AccumulationSeries, MonthlyRow, ProjectionReport, break_even_summary, build_report,
    format_currency,
};
pub use types::{
    BreakEven, BreakEvenDuration, DerivedRates, InputParameters, MAX_SIMULATION_YEARS,
    MIN_SIMULATION_YEARS, MONTHS_PER_YEAR, MonthlyRecord, Projection, YearlyRecord,
};
