use log::debug;

use super::error::ProjectionError;
use super::types::{
    BreakEven, DerivedRates, InputParameters, MONTHS_PER_YEAR, MonthlyRecord, Projection,
    YearlyRecord,
};

pub fn derive_rates(inputs: &InputParameters) -> DerivedRates {
    let profit_withdrawal = inputs.monthly_profit * (inputs.ownership_percentage / 100.0);
    let stipend_withdrawal = inputs.effective_stipend();
    DerivedRates {
        profit_withdrawal,
        stipend_withdrawal,
        total_monthly_withdrawal: profit_withdrawal + stipend_withdrawal,
    }
}

/// Validates `inputs`, then builds the full monthly and yearly series and
/// locates the first month whose cumulative withdrawals cover the investment.
pub fn run_projection(inputs: &InputParameters) -> Result<Projection, ProjectionError> {
    inputs.validate()?;

    let derived_rates = derive_rates(inputs);
    debug!(
        "derived rates: profit={} stipend={} total={}",
        derived_rates.profit_withdrawal,
        derived_rates.stipend_withdrawal,
        derived_rates.total_monthly_withdrawal
    );

    let monthly_records = build_monthly_series(derived_rates, inputs.simulation_years);
    let yearly_records = build_yearly_series(&monthly_records);
    let break_even = scan_break_even(&monthly_records, inputs.invested_amount);
    let break_even_duration = break_even.duration(inputs.simulation_years);
    debug!("break-even: {break_even:?} ({break_even_duration:?})");

    Ok(Projection {
        inputs: *inputs,
        derived_rates,
        monthly_records,
        yearly_records,
        break_even,
        break_even_duration,
    })
}

pub fn build_monthly_series(rates: DerivedRates, simulation_years: u32) -> Vec<MonthlyRecord> {
    let mut records = Vec::with_capacity((simulation_years * MONTHS_PER_YEAR) as usize);
    for year_index in 0..simulation_years {
        for month_index in 1..=MONTHS_PER_YEAR {
            // Scaled from the elapsed month count rather than summed, so month k
            // carries exactly k withdrawals with no accumulated rounding.
            let elapsed = f64::from(year_index * MONTHS_PER_YEAR + month_index);
            let accumulated_profit = rates.profit_withdrawal * elapsed;
            let accumulated_stipend = rates.stipend_withdrawal * elapsed;
            records.push(MonthlyRecord {
                year_index,
                month_index,
                accumulated_profit,
                accumulated_stipend,
                accumulated_total: accumulated_profit + accumulated_stipend,
            });
        }
    }
    records
}

/// Yearly figures are cumulative to date, taken from each year's last month.
pub fn build_yearly_series(monthly: &[MonthlyRecord]) -> Vec<YearlyRecord> {
    monthly
        .iter()
        .filter(|record| record.month_index == MONTHS_PER_YEAR)
        .map(|record| YearlyRecord {
            year_number: record.year_index + 1,
            accumulated_profit: record.accumulated_profit,
            accumulated_stipend: record.accumulated_stipend,
            accumulated_total: record.accumulated_total,
        })
        .collect()
}

pub fn scan_break_even(monthly: &[MonthlyRecord], invested_amount: f64) -> BreakEven {
    monthly
        .iter()
        .find(|record| record.accumulated_total >= invested_amount)
        .map_or(BreakEven::NotReached, |record| BreakEven::Reached {
            year_index: record.year_index,
            month_index: record.month_index,
        })
}
