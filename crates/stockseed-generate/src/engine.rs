use std::path::PathBuf;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use stockseed_core::{ReferenceCatalog, validate_catalog};

use crate::checks::{CheckContext, check_dataset};
use crate::errors::GenerationError;
use crate::generators::{generate_contracts, generate_movements, generate_orders};
use crate::model::{Dataset, GenerateOptions, GenerationIssue, GenerationReport, Period};
use crate::output::{render_sql, write_bytes_atomic};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub dataset: Dataset,
    pub report: GenerationReport,
    /// Where the SQL artifact was written, when the run wrote one.
    pub out_path: Option<PathBuf>,
}

/// Entry point for generating the supplier/inventory dataset.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Build and check the dataset in memory without touching the filesystem.
    pub fn generate(&self, catalog: ReferenceCatalog) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        self.options.validate()?;

        let validation = validate_catalog(&catalog);
        for issue in &validation.warnings {
            warn!(code = %issue.code, path = %issue.path, "{}", issue.message);
        }
        if !validation.is_ok() {
            let messages: Vec<String> = validation
                .errors
                .iter()
                .map(|issue| format!("{}: {}", issue.path, issue.message))
                .collect();
            return Err(stockseed_core::Error::InvalidCatalog(messages.join("; ")).into());
        }

        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = GenerationReport::new(run_id.clone(), self.options.seed);
        info!(
            run_id = %run_id,
            seed = self.options.seed,
            years = ?self.options.years,
            strict = self.options.strict,
            "generation started"
        );

        let mut rng = ChaCha8Rng::seed_from_u64(self.options.seed);
        let dataset = build_dataset(catalog, &self.options, &mut rng, &mut report)?;

        let checks = check_dataset(&CheckContext {
            dataset: &dataset,
            consumption_ratio: self.options.consumption_ratio,
        });
        for violation in checks.violations {
            warn!(code = %violation.code, path = ?violation.path, "{}", violation.message);
            report.record_violation(violation);
        }
        report.summary = dataset.summary();
        report.duration_ms = start.elapsed().as_millis() as u64;

        if self.options.strict && !report.violations.is_empty() {
            warn!(run_id = %run_id, violations = report.violations.len(), "generation failed");
            return Err(GenerationError::Failed(Box::new(report)));
        }

        info!(
            run_id = %run_id,
            checked = checks.checked,
            violations = report.violations.len(),
            duration_ms = report.duration_ms,
            "dataset checked"
        );

        Ok(GenerationResult {
            dataset,
            report,
            out_path: None,
        })
    }

    /// Generate, render and atomically write the SQL artifact (and the report
    /// when a report path is configured).
    pub fn run(&self, catalog: ReferenceCatalog) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let mut result = self.generate(catalog)?;

        let sql = render_sql(&result.dataset);
        let out_path = self.options.out_path.clone();
        result.report.bytes_written = write_bytes_atomic(&out_path, sql.as_bytes())?;
        result.report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            path = %out_path.display(),
            bytes = result.report.bytes_written,
            "artifact written"
        );

        if let Some(report_path) = &self.options.report_path {
            write_bytes_atomic(report_path, &serde_json::to_vec_pretty(&result.report)?)?;
            info!(path = %report_path.display(), "report written");
        }

        info!(
            run_id = %result.report.run_id,
            contracts = result.report.summary.contracts,
            orders = result.report.summary.orders,
            movements = result.report.summary.movements,
            duration_ms = result.report.duration_ms,
            "generation completed"
        );
        result.out_path = Some(out_path);
        Ok(result)
    }
}

/// Run the contract, order and movement stages against one random source.
pub fn build_dataset(
    catalog: ReferenceCatalog,
    options: &GenerateOptions,
    rng: &mut impl Rng,
    report: &mut GenerationReport,
) -> Result<Dataset, GenerationError> {
    let period = Period::from_years(&options.years)?;

    let contracts = generate_contracts(
        &catalog,
        &options.years,
        options.effective_eligibility(),
        rng,
        report,
    )?;
    info!(contracts = contracts.len(), fallbacks = report.fallback_count, "contracts generated");

    let orders = generate_orders(&contracts, rng);
    info!(orders = orders.len(), "orders generated");

    let movements = generate_movements(
        &contracts,
        &orders,
        &catalog.unit_material_pairs(),
        period,
        options.consumption_ratio,
        rng,
    )?;
    info!(movements = movements.len(), "movements generated");

    if contracts.is_empty() {
        report.record_warning(GenerationIssue::new(
            "empty_catalog",
            "catalog has no units or materials; no contracts generated",
            None,
        ));
    }

    Ok(Dataset {
        catalog,
        years: options.years.clone(),
        period,
        contracts,
        orders,
        movements,
    })
}
