use serde::Serialize;

use super::error::ProjectionError;

pub const MONTHS_PER_YEAR: u32 = 12;
pub const MIN_SIMULATION_YEARS: u32 = 1;
pub const MAX_SIMULATION_YEARS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputParameters {
    pub invested_amount: f64,
    pub monthly_profit: f64,
    /// Investor's share of profit in percent, 0..=100.
    pub ownership_percentage: f64,
    pub include_stipend: bool,
    /// Ignored unless `include_stipend` is set.
    pub stipend_amount: f64,
    pub simulation_years: u32,
}

impl InputParameters {
    pub fn effective_stipend(&self) -> f64 {
        if self.include_stipend {
            self.stipend_amount
        } else {
            0.0
        }
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        for (field, amount) in [
            ("invested_amount", self.invested_amount),
            ("monthly_profit", self.monthly_profit),
            ("stipend_amount", self.stipend_amount),
        ] {
            if !amount.is_finite() || amount < 0.0 {
                return Err(ProjectionError::invalid(field, "must be a finite amount >= 0"));
            }
        }

        if !self.ownership_percentage.is_finite()
            || !(0.0..=100.0).contains(&self.ownership_percentage)
        {
            return Err(ProjectionError::invalid(
                "ownership_percentage",
                "must be between 0 and 100",
            ));
        }

        if !(MIN_SIMULATION_YEARS..=MAX_SIMULATION_YEARS).contains(&self.simulation_years) {
            return Err(ProjectionError::invalid(
                "simulation_years",
                format!("must be between {MIN_SIMULATION_YEARS} and {MAX_SIMULATION_YEARS}"),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedRates {
    pub profit_withdrawal: f64,
    pub stipend_withdrawal: f64,
    pub total_monthly_withdrawal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    /// 0-based.
    pub year_index: u32,
    /// 1-based, 1..=12.
    pub month_index: u32,
    pub accumulated_profit: f64,
    pub accumulated_stipend: f64,
    pub accumulated_total: f64,
}

impl MonthlyRecord {
    pub fn elapsed_months(&self) -> u32 {
        self.year_index * MONTHS_PER_YEAR + self.month_index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRecord {
    /// 1-based, unlike `MonthlyRecord::year_index`.
    pub year_number: u32,
    pub accumulated_profit: f64,
    pub accumulated_stipend: f64,
    pub accumulated_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum BreakEven {
    Reached { year_index: u32, month_index: u32 },
    NotReached,
}

impl BreakEven {
    pub fn is_reached(&self) -> bool {
        matches!(self, BreakEven::Reached { .. })
    }

    pub fn matches(&self, record: &MonthlyRecord) -> bool {
        match *self {
            BreakEven::Reached {
                year_index,
                month_index,
            } => record.year_index == year_index && record.month_index == month_index,
            BreakEven::NotReached => false,
        }
    }

    /// A miss reports the whole horizon as both `years` and `months`.
    pub fn duration(&self, simulation_years: u32) -> BreakEvenDuration {
        match *self {
            BreakEven::Reached {
                year_index,
                month_index,
            } => {
                let total_months = year_index * MONTHS_PER_YEAR + month_index;
                BreakEvenDuration {
                    years: total_months / MONTHS_PER_YEAR,
                    months: total_months % MONTHS_PER_YEAR,
                }
            }
            BreakEven::NotReached => BreakEvenDuration {
                years: simulation_years,
                months: simulation_years * MONTHS_PER_YEAR,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakEvenDuration {
    pub years: u32,
    pub months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub inputs: InputParameters,
    pub derived_rates: DerivedRates,
    pub monthly_records: Vec<MonthlyRecord>,
    pub yearly_records: Vec<YearlyRecord>,
    pub break_even: BreakEven,
    pub break_even_duration: BreakEvenDuration,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_inputs() -> InputParameters {
        InputParameters {
            invested_amount: 1_000_000.0,
            monthly_profit: 400_000.0,
            ownership_percentage: 5.0,
            include_stipend: false,
            stipend_amount: 12_000.0,
            simulation_years: 10,
        }
    }

    #[test]
    fn validate_accepts_boundary_values() {
        let mut inputs = sample_inputs();
        inputs.ownership_percentage = 100.0;
        inputs.simulation_years = MAX_SIMULATION_YEARS;
        inputs.invested_amount = 0.0;
        assert!(inputs.validate().is_ok());

        inputs.ownership_percentage = 0.0;
        inputs.simulation_years = MIN_SIMULATION_YEARS;
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn validate_names_offending_field() {
        let cases: [(fn(&mut InputParameters), &str); 7] = [
            (|i: &mut InputParameters| i.invested_amount = -1.0, "invested_amount"),
            (|i: &mut InputParameters| i.monthly_profit = f64::NAN, "monthly_profit"),
            (|i: &mut InputParameters| i.stipend_amount = -500.0, "stipend_amount"),
            (|i: &mut InputParameters| i.ownership_percentage = 100.5, "ownership_percentage"),
            (|i: &mut InputParameters| i.ownership_percentage = -0.1, "ownership_percentage"),
            (|i: &mut InputParameters| i.simulation_years = 0, "simulation_years"),
            (|i: &mut InputParameters| i.simulation_years = 11, "simulation_years"),
        ];

        for (mutate, field) in cases {
            let mut inputs = sample_inputs();
            mutate(&mut inputs);
            let err = inputs.validate().expect_err("must reject");
            assert_eq!(err.field(), field);
            assert!(err.to_string().contains(field));
        }
    }

    #[test]
    fn effective_stipend_is_zero_when_disabled() {
        let mut inputs = sample_inputs();
        assert_eq!(inputs.effective_stipend(), 0.0);
        inputs.include_stipend = true;
        assert_eq!(inputs.effective_stipend(), 12_000.0);
    }

    #[test]
    fn duration_splits_elapsed_months() {
        let hit = BreakEven::Reached {
            year_index: 4,
            month_index: 2,
        };
        assert!(hit.is_reached());
        assert_eq!(hit.duration(10), BreakEvenDuration { years: 4, months: 2 });

        let december = BreakEven::Reached {
            year_index: 0,
            month_index: 12,
        };
        assert_eq!(
            december.duration(10),
            BreakEvenDuration { years: 1, months: 0 }
        );
    }

    #[test]
    fn duration_for_miss_reports_full_horizon() {
        assert!(!BreakEven::NotReached.is_reached());
        assert_eq!(
            BreakEven::NotReached.duration(3),
            BreakEvenDuration {
                years: 3,
                months: 36
            }
        );
    }

    #[test]
    fn break_even_serializes_with_status_tag() {
        let json = serde_json::to_string(&BreakEven::Reached {
            year_index: 2,
            month_index: 8,
        })
        .expect("serializes");
        assert_eq!(json, r#"{"status":"reached","yearIndex":2,"monthIndex":8}"#);

        let json = serde_json::to_string(&BreakEven::NotReached).expect("serializes");
        assert_eq!(json, r#"{"status":"not-reached"}"#);
    }
}
