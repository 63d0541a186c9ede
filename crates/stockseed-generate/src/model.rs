use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockseed_core::{
    Contract, DATASET_VERSION, EligibilityPolicy, InventoryMovement, MovementKind, Order,
    ReferenceCatalog,
};

use crate::errors::GenerationError;

/// Upper bound on consumptions generated per receipt.
pub const MAX_CONSUMPTION_RATIO: f64 = 100.0;

/// Options for the generation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Seed for the single pseudo-random source shared by every stage.
    pub seed: u64,
    /// Contract years, ascending. The first is always completed, the last active.
    pub years: Vec<i32>,
    /// Destination of the SQL artifact.
    pub out_path: PathBuf,
    /// Optional destination of the JSON generation report.
    pub report_path: Option<PathBuf>,
    /// Fail on eligibility gaps and dataset check violations.
    pub strict: bool,
    /// How missing or unknown eligible suppliers are handled.
    pub eligibility: EligibilityPolicy,
    /// Consumption movements generated per receipt.
    pub consumption_ratio: f64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            years: vec![2020, 2021, 2022],
            out_path: PathBuf::from("InsertData.sql"),
            report_path: None,
            strict: false,
            eligibility: EligibilityPolicy::Fallback,
            consumption_ratio: 2.0,
        }
    }
}

impl GenerateOptions {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.years.is_empty() {
            return Err(GenerationError::InvalidOptions(
                "at least one contract year is required".to_string(),
            ));
        }
        if self.years.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(GenerationError::InvalidOptions(
                "years must be strictly ascending".to_string(),
            ));
        }
        if !(0.0..=MAX_CONSUMPTION_RATIO).contains(&self.consumption_ratio) {
            return Err(GenerationError::InvalidOptions(format!(
                "consumption_ratio must be between 0 and {MAX_CONSUMPTION_RATIO}, got {}",
                self.consumption_ratio
            )));
        }
        Period::from_years(&self.years)?;
        Ok(())
    }

    /// Eligibility policy in effect; strict runs never fall back.
    pub fn effective_eligibility(&self) -> EligibilityPolicy {
        if self.strict {
            EligibilityPolicy::Strict
        } else {
            self.eligibility
        }
    }
}

/// Inclusive calendar range covered by the generated contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// From January 1 of the first year to December 31 of the last.
    pub fn from_years(years: &[i32]) -> Result<Self, GenerationError> {
        let (Some(first), Some(last)) = (years.first(), years.last()) else {
            return Err(GenerationError::InvalidOptions(
                "at least one contract year is required".to_string(),
            ));
        };
        Ok(Self {
            start: year_start(*first)?,
            end: year_end(*last)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

pub fn year_start(year: i32) -> Result<NaiveDate, GenerationError> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| GenerationError::InvalidOptions(format!("year {year} out of range")))
}

pub fn year_end(year: i32) -> Result<NaiveDate, GenerationError> {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| GenerationError::InvalidOptions(format!("year {year} out of range")))
}

/// Everything produced by one generation pass, in stage order.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub catalog: ReferenceCatalog,
    pub years: Vec<i32>,
    pub period: Period,
    pub contracts: Vec<Contract>,
    pub orders: Vec<Order>,
    /// Sorted ascending by movement date.
    pub movements: Vec<InventoryMovement>,
}

impl Dataset {
    pub fn summary(&self) -> DatasetSummary {
        let receipts = self
            .movements
            .iter()
            .filter(|movement| movement.kind == MovementKind::Receipt)
            .count() as u64;
        let movements = self.movements.len() as u64;
        DatasetSummary {
            suppliers: self.catalog.suppliers.len() as u64,
            materials: self.catalog.materials.len() as u64,
            units: self.catalog.units.len() as u64,
            contracts: self.contracts.len() as u64,
            orders: self.orders.len() as u64,
            receipts,
            consumptions: movements - receipts,
            movements,
            balances: stockseed_core::aggregate_balances(&self.movements).len() as u64,
        }
    }
}

/// Row counts of a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub suppliers: u64,
    pub materials: u64,
    pub units: u64,
    pub contracts: u64,
    pub orders: u64,
    pub receipts: u64,
    pub consumptions: u64,
    pub movements: u64,
    /// Rows the balance aggregation yields once applied.
    pub balances: u64,
}

/// Structured generation issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl GenerationIssue {
    pub fn new(code: impl Into<String>, message: impl Into<String>, path: Option<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path,
        }
    }
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub dataset_version: String,
    pub seed: u64,
    pub summary: DatasetSummary,
    pub fallback_count: u64,
    pub dropped_supplier_ids: Vec<i64>,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
    pub violations: Vec<GenerationIssue>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64) -> Self {
        Self {
            run_id,
            dataset_version: DATASET_VERSION.to_string(),
            seed,
            summary: DatasetSummary::default(),
            fallback_count: 0,
            dropped_supplier_ids: Vec::new(),
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
            violations: Vec::new(),
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn record_fallback(&mut self) {
        self.fallback_count += 1;
    }

    pub fn record_dropped_supplier(&mut self, id: i64) {
        if !self.dropped_supplier_ids.contains(&id) {
            self.dropped_supplier_ids.push(id);
        }
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }

    pub fn record_violation(&mut self, issue: GenerationIssue) {
        self.violations.push(issue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        let options = GenerateOptions::default();

        options.validate().expect("defaults validate");
        assert_eq!(options.seed, 42);
        assert_eq!(options.years, vec![2020, 2021, 2022]);
    }

    #[test]
    fn rejects_unordered_years_and_bad_ratio() {
        let options = GenerateOptions {
            years: vec![2021, 2020],
            ..GenerateOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(GenerationError::InvalidOptions(_))
        ));

        let options = GenerateOptions {
            consumption_ratio: -1.0,
            ..GenerateOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn rejects_oversized_consumption_ratio() {
        for ratio in [1e300, f64::INFINITY, f64::NAN, MAX_CONSUMPTION_RATIO + 0.5] {
            let options = GenerateOptions {
                consumption_ratio: ratio,
                ..GenerateOptions::default()
            };
            assert!(
                matches!(options.validate(), Err(GenerationError::InvalidOptions(_))),
                "ratio {ratio} accepted"
            );
        }

        let options = GenerateOptions {
            consumption_ratio: MAX_CONSUMPTION_RATIO,
            ..GenerateOptions::default()
        };
        options.validate().expect("upper bound is accepted");
    }

    #[test]
    fn strict_overrides_eligibility_policy() {
        let options = GenerateOptions {
            strict: true,
            ..GenerateOptions::default()
        };

        assert_eq!(options.effective_eligibility(), EligibilityPolicy::Strict);
    }

    #[test]
    fn period_spans_first_to_last_year() {
        let period = Period::from_years(&[2020, 2021, 2022]).expect("period");

        assert_eq!(period.start, NaiveDate::from_ymd_opt(2020, 1, 1).expect("date"));
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2022, 12, 31).expect("date"));
        assert!(period.contains(NaiveDate::from_ymd_opt(2021, 6, 1).expect("date")));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: GenerateOptions =
            serde_json::from_str(r#"{"seed": 7, "eligibility": "strict"}"#).expect("parse");

        assert_eq!(options.seed, 7);
        assert_eq!(options.eligibility, EligibilityPolicy::Strict);
        assert_eq!(options.years, vec![2020, 2021, 2022]);
    }
}
