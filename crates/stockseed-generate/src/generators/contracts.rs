use chrono::Duration;
use rand::Rng;
use tracing::warn;

use stockseed_core::{Contract, ContractId, ContractStatus, EligibilityPolicy, ReferenceCatalog};

use crate::errors::GenerationError;
use crate::generators::{pick, random_amount, scaled_price};
use crate::model::{GenerationIssue, GenerationReport, year_end, year_start};

pub const CONTRACT_ID_BASE: ContractId = 1001;

/// Contract quantity bounds, in hundredths.
const QUANTITY: std::ops::RangeInclusive<i64> = 30_000..=120_000;
/// Price factor bounds over the material base price, in basis points.
const PRICE_FACTOR: std::ops::RangeInclusive<i64> = 9_200..=11_000;
/// Days after the validity start at which supply begins.
const SUPPLY_OFFSET_DAYS: std::ops::RangeInclusive<i64> = 10..=21;

/// One contract per (unit, material, year), units outermost and years innermost.
pub fn generate_contracts(
    catalog: &ReferenceCatalog,
    years: &[i32],
    policy: EligibilityPolicy,
    rng: &mut impl Rng,
    report: &mut GenerationReport,
) -> Result<Vec<Contract>, GenerationError> {
    let known = catalog.supplier_ids();
    let mut contracts = Vec::with_capacity(catalog.units.len() * catalog.materials.len() * years.len());
    let mut next_id = CONTRACT_ID_BASE;

    for unit in &catalog.units {
        for material in &catalog.materials {
            let resolution = catalog
                .eligibility
                .resolve(unit.id, material.id, &known, policy)?;
            let path = Some(format!("eligibility.{}.{}", unit.id, material.id));

            for dropped in &resolution.dropped {
                warn!(
                    unit_id = unit.id,
                    material_id = material.id,
                    supplier_id = dropped,
                    "dropping unknown eligible supplier"
                );
                report.record_dropped_supplier(*dropped);
                report.record_warning(GenerationIssue::new(
                    "unknown_supplier",
                    format!("supplier {dropped} is not registered"),
                    path.clone(),
                ));
            }
            if resolution.fell_back {
                warn!(
                    unit_id = unit.id,
                    material_id = material.id,
                    supplier_id = resolution.suppliers.first().copied(),
                    "falling back to default supplier"
                );
                report.record_fallback();
                report.record_warning(GenerationIssue::new(
                    "eligibility_fallback",
                    "no eligible supplier mapped; default supplier used",
                    path.clone(),
                ));
            }

            for (index, year) in years.iter().copied().enumerate() {
                let supplier_id = pick(&resolution.suppliers, rng).ok_or_else(|| {
                    GenerationError::Inconsistent(format!(
                        "no supplier resolved for unit {} material {}",
                        unit.id, material.id
                    ))
                })?;
                let quantity = random_amount(QUANTITY, rng);
                let price_per_unit = scaled_price(material.base_price, PRICE_FACTOR, rng);
                let start_date = year_start(year)?;
                let end_date = year_end(year)?;
                let supply_date = start_date + Duration::days(rng.random_range(SUPPLY_OFFSET_DAYS));
                let status = contract_status(index, years.len(), rng);

                contracts.push(Contract {
                    id: next_id,
                    supplier_id,
                    material_id: material.id,
                    unit_id: unit.id,
                    quantity,
                    price_per_unit,
                    start_date,
                    end_date,
                    supply_date,
                    status,
                });
                next_id += 1;
            }
        }
    }

    Ok(contracts)
}

/// Earliest year is completed, latest is active, years in between are a coin flip.
fn contract_status(index: usize, year_count: usize, rng: &mut impl Rng) -> ContractStatus {
    if index == 0 {
        ContractStatus::Completed
    } else if index + 1 == year_count {
        ContractStatus::Active
    } else if rng.random_bool(0.5) {
        ContractStatus::Active
    } else {
        ContractStatus::Completed
    }
}
