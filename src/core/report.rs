use serde::Serialize;

use super::types::{
    BreakEven, BreakEvenDuration, DerivedRates, MonthlyRecord, Projection, YearlyRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRow {
    pub year_index: u32,
    pub month_index: u32,
    pub accumulated_profit: f64,
    pub accumulated_stipend: f64,
    pub accumulated_total: f64,
    pub break_even: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccumulationSeries {
    pub labels: Vec<u32>,
    pub profit: Vec<f64>,
    pub stipend: Vec<f64>,
    pub total: Vec<f64>,
}

impl AccumulationSeries {
    fn push(&mut self, label: u32, profit: f64, stipend: f64, total: f64) {
        self.labels.push(label);
        self.profit.push(profit);
        self.stipend.push(stipend);
        self.total.push(total);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionReport {
    pub derived_rates: DerivedRates,
    pub break_even: BreakEven,
    pub break_even_duration: BreakEvenDuration,
    pub break_even_summary: String,
    pub monthly_rows: Vec<MonthlyRow>,
    pub yearly_rows: Vec<YearlyRecord>,
    /// Month labels 1..=12 for the first simulated year.
    pub first_year_series: AccumulationSeries,
    /// Year-number labels 1..=N.
    pub yearly_series: AccumulationSeries,
}

pub fn build_report(projection: &Projection) -> ProjectionReport {
    let monthly_rows = projection
        .monthly_records
        .iter()
        .map(|record| monthly_row(record, projection.break_even))
        .collect();

    let mut first_year_series = AccumulationSeries::default();
    for record in projection
        .monthly_records
        .iter()
        .filter(|record| record.year_index == 0)
    {
        first_year_series.push(
            record.month_index,
            record.accumulated_profit,
            record.accumulated_stipend,
            record.accumulated_total,
        );
    }

    let mut yearly_series = AccumulationSeries::default();
    for yearly in &projection.yearly_records {
        yearly_series.push(
            yearly.year_number,
            yearly.accumulated_profit,
            yearly.accumulated_stipend,
            yearly.accumulated_total,
        );
    }

    ProjectionReport {
        derived_rates: projection.derived_rates,
        break_even: projection.break_even,
        break_even_duration: projection.break_even_duration,
        break_even_summary: break_even_summary(
            projection.break_even,
            projection.break_even_duration,
        ),
        monthly_rows,
        yearly_rows: projection.yearly_records.clone(),
        first_year_series,
        yearly_series,
    }
}

fn monthly_row(record: &MonthlyRecord, break_even: BreakEven) -> MonthlyRow {
    MonthlyRow {
        year_index: record.year_index,
        month_index: record.month_index,
        accumulated_profit: record.accumulated_profit,
        accumulated_stipend: record.accumulated_stipend,
        accumulated_total: record.accumulated_total,
        break_even: break_even.matches(record),
    }
}

pub fn break_even_summary(break_even: BreakEven, duration: BreakEvenDuration) -> String {
    match break_even {
        BreakEven::Reached { .. } => format!(
            "Break-even in {} years and {} months",
            duration.years, duration.months
        ),
        BreakEven::NotReached => format!(
            "Break-even not reached within {} years ({} months)",
            duration.years, duration.months
        ),
    }
}

/// Two decimals with comma thousands separators, e.g. `1,234,567.89`.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InputParameters, run_projection};

    fn sample_projection(include_stipend: bool, simulation_years: u32) -> Projection {
        run_projection(&InputParameters {
            invested_amount: 1_000_000.0,
            monthly_profit: 400_000.0,
            ownership_percentage: 5.0,
            include_stipend,
            stipend_amount: 12_000.0,
            simulation_years,
        })
        .expect("valid inputs")
    }

    #[test]
    fn only_break_even_row_is_highlighted() {
        let report = build_report(&sample_projection(true, 10));
        let highlighted: Vec<&MonthlyRow> = report
            .monthly_rows
            .iter()
            .filter(|row| row.break_even)
            .collect();

        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].year_index, 2);
        assert_eq!(highlighted[0].month_index, 8);
        assert_eq!(report.monthly_rows.len(), 120);
    }

    #[test]
    fn no_row_is_highlighted_when_not_reached() {
        let report = build_report(&sample_projection(false, 2));
        assert!(report.monthly_rows.iter().all(|row| !row.break_even));
        assert_eq!(
            report.break_even_summary,
            "Break-even not reached within 2 years (24 months)"
        );
    }

    #[test]
    fn series_cover_first_year_and_every_year() {
        let report = build_report(&sample_projection(true, 3));

        assert_eq!(report.first_year_series.labels, (1..=12).collect::<Vec<u32>>());
        assert_eq!(report.first_year_series.total.len(), 12);
        assert_eq!(report.first_year_series.total[11], 384_000.0);
        assert_eq!(report.first_year_series.stipend[0], 12_000.0);

        assert_eq!(report.yearly_series.labels, vec![1, 2, 3]);
        assert_eq!(report.yearly_series.profit, vec![240_000.0, 480_000.0, 720_000.0]);
        assert_eq!(report.yearly_rows.len(), 3);
    }

    #[test]
    fn summary_uses_display_duration() {
        let report = build_report(&sample_projection(false, 10));
        assert_eq!(report.break_even_summary, "Break-even in 4 years and 2 months");
    }

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "0.00");
        assert_eq!(format_currency(999.5), "999.50");
        assert_eq!(format_currency(1_000.0), "1,000.00");
        assert_eq!(format_currency(1_000_000.0), "1,000,000.00");
        assert_eq!(format_currency(23_333.31), "23,333.31");
        assert_eq!(format_currency(-12_345.678), "-12,345.68");
    }

    #[test]
    fn report_serializes_camel_case_fields() {
        let report = build_report(&sample_projection(false, 1));
        let json = serde_json::to_string(&report).expect("report should serialize");
        assert!(json.contains("\"derivedRates\""));
        assert!(json.contains("\"breakEvenDuration\""));
        assert!(json.contains("\"monthlyRows\""));
        assert!(json.contains("\"firstYearSeries\""));
        assert!(json.contains("\"yearNumber\""));
        assert!(json.contains("\"status\":\"not-reached\""));
    }
}
