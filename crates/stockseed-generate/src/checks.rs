//! Referential and temporal checks over a generated dataset.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;

use stockseed_core::{
    Contract, ContractStatus, EligibilityPolicy, InventoryMovement, MaterialId, MovementKind,
    Order, OrderStatus, UnitId, UnitInventoryBalance, aggregate_balances,
};

use crate::generators::movements::consumption_target;
use crate::generators::orders::SHIPPING_GRACE_DAYS;
use crate::model::{Dataset, GenerationIssue};

/// Context for evaluating dataset checks.
#[derive(Debug)]
pub struct CheckContext<'a> {
    pub dataset: &'a Dataset,
    pub consumption_ratio: f64,
}

/// Outcome of a check pass.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub checked: u64,
    pub violations: Vec<GenerationIssue>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    fn require(&mut self, ok: bool, code: &str, path: String, message: impl FnOnce() -> String) {
        self.checked += 1;
        if !ok {
            self.violations
                .push(GenerationIssue::new(code, message(), Some(path)));
        }
    }
}

/// Evaluate every dataset invariant and collect violations.
pub fn check_dataset(ctx: &CheckContext<'_>) -> CheckReport {
    let mut report = CheckReport::default();
    let dataset = ctx.dataset;

    check_contracts(dataset, &mut report);
    let contracts: HashMap<i64, &Contract> = dataset
        .contracts
        .iter()
        .map(|contract| (contract.id, contract))
        .collect();
    check_orders(dataset, &contracts, &mut report);
    check_movements(dataset, &contracts, ctx.consumption_ratio, &mut report);
    check_balances(dataset, &mut report);

    report
}

fn check_contracts(dataset: &Dataset, report: &mut CheckReport) {
    let catalog = &dataset.catalog;
    let known = catalog.supplier_ids();

    let mut triples: BTreeMap<(UnitId, MaterialId, i32), u32> = BTreeMap::new();
    for contract in &dataset.contracts {
        *triples
            .entry((contract.unit_id, contract.material_id, contract.start_date.year()))
            .or_insert(0) += 1;
    }
    for (unit_id, material_id) in catalog.unit_material_pairs() {
        for year in &dataset.years {
            let count = triples
                .get(&(unit_id, material_id, *year))
                .copied()
                .unwrap_or(0);
            report.require(
                count == 1,
                "contract_per_triple",
                format!("contract.{unit_id}.{material_id}.{year}"),
                || format!("expected exactly one contract, found {count}"),
            );
        }
    }
    let pairs: BTreeSet<(UnitId, MaterialId)> = catalog.unit_material_pairs().into_iter().collect();
    for (unit_id, material_id, year) in triples.keys() {
        report.require(
            pairs.contains(&(*unit_id, *material_id)) && dataset.years.contains(year),
            "contract_outside_catalog",
            format!("contract.{unit_id}.{material_id}.{year}"),
            || "contract for a triple outside the configured catalog".to_string(),
        );
    }

    for contract in &dataset.contracts {
        let path = format!("contract.{}", contract.id);
        let offset = (contract.supply_date - contract.start_date).num_days();
        report.require(
            (10..=21).contains(&offset),
            "supply_date_window",
            path.clone(),
            || format!("supply date is {offset} days after start"),
        );
        let year_end = NaiveDate::from_ymd_opt(contract.start_date.year(), 12, 31);
        report.require(
            contract.start_date.ordinal() == 1 && Some(contract.end_date) == year_end,
            "calendar_year_window",
            path.clone(),
            || {
                format!(
                    "window {}..{} is not a calendar year",
                    contract.start_date, contract.end_date
                )
            },
        );
        let eligible = catalog
            .eligibility
            .resolve(
                contract.unit_id,
                contract.material_id,
                &known,
                EligibilityPolicy::Fallback,
            )
            .map(|resolution| resolution.suppliers.contains(&contract.supplier_id))
            .unwrap_or(false);
        report.require(eligible, "supplier_eligibility", path, || {
            format!("supplier {} is not eligible", contract.supplier_id)
        });
    }
}

fn check_orders(dataset: &Dataset, contracts: &HashMap<i64, &Contract>, report: &mut CheckReport) {
    for order in &dataset.orders {
        let path = format!("order.{}", order.id);
        let Some(contract) = contracts.get(&order.contract_id) else {
            report.require(false, "order_contract", path, || {
                format!("unknown contract {}", order.contract_id)
            });
            continue;
        };

        report.require(
            order.unit_id == contract.unit_id,
            "order_unit",
            path.clone(),
            || format!("unit {} differs from contract unit {}", order.unit_id, contract.unit_id),
        );
        report.require(
            order.order_date > contract.start_date + Duration::days(30)
                && order.order_date < contract.end_date - Duration::days(14),
            "order_date_window",
            path.clone(),
            || format!("order date {} outside contract window", order.order_date),
        );
        check_shipment(order, contract, &path, report);
    }
}

fn check_shipment(order: &Order, contract: &Contract, path: &str, report: &mut CheckReport) {
    let limit = contract.end_date + Duration::days(SHIPPING_GRACE_DAYS);
    match (order.status, order.shipped_date) {
        (OrderStatus::Pending, shipped) => {
            report.require(shipped.is_none(), "pending_shipped", path.to_string(), || {
                "pending order has a shipped date".to_string()
            });
            report.require(
                contract.status != ContractStatus::Completed,
                "pending_on_completed_contract",
                path.to_string(),
                || "completed contract has a pending order".to_string(),
            );
        }
        (OrderStatus::Completed, Some(shipped)) => {
            report.require(shipped <= limit, "shipped_after_grace", path.to_string(), || {
                format!("shipped {shipped} after {limit}")
            });
        }
        (OrderStatus::Completed, None) => {
            report.require(false, "completed_unshipped", path.to_string(), || {
                "completed order has no shipped date".to_string()
            });
        }
    }
}

fn check_movements(
    dataset: &Dataset,
    contracts: &HashMap<i64, &Contract>,
    consumption_ratio: f64,
    report: &mut CheckReport,
) {
    let orders: HashMap<i64, &Order> = dataset.orders.iter().map(|order| (order.id, order)).collect();
    let mut ids = HashSet::new();
    let mut receipt_orders = BTreeSet::new();
    let mut receipts = 0_usize;
    let mut consumptions = 0_usize;

    for movement in &dataset.movements {
        let path = format!("movement.{}", movement.id);
        report.require(ids.insert(movement.id), "movement_id_unique", path.clone(), || {
            "duplicate movement id".to_string()
        });

        match movement.kind {
            MovementKind::Receipt => {
                receipts += 1;
                let order = movement.order_id.and_then(|id| orders.get(&id));
                let contract = order.and_then(|order| contracts.get(&order.contract_id));
                let consistent = match (order, contract) {
                    (Some(order), Some(contract)) => {
                        order.status == OrderStatus::Completed
                            && order.shipped_date == Some(movement.movement_date)
                            && movement.supplier_id == Some(contract.supplier_id)
                            && movement.material_id == contract.material_id
                            && movement.unit_id == order.unit_id
                    }
                    _ => false,
                };
                report.require(consistent, "receipt_reference", path, || {
                    "receipt does not match its order and contract".to_string()
                });
                if let Some(order_id) = movement.order_id {
                    receipt_orders.insert(order_id);
                }
            }
            MovementKind::Consumption => {
                consumptions += 1;
                report.require(
                    movement.supplier_id.is_none() && movement.order_id.is_none(),
                    "consumption_reference",
                    path.clone(),
                    || "consumption carries supplier or order".to_string(),
                );
                report.require(
                    dataset.period.contains(movement.movement_date),
                    "consumption_period",
                    path,
                    || format!("date {} outside period", movement.movement_date),
                );
            }
        }
    }

    let shipped = dataset
        .orders
        .iter()
        .filter(|order| order.status == OrderStatus::Completed && order.shipped_date.is_some())
        .count();
    report.require(
        receipts == shipped && receipt_orders.len() == shipped,
        "receipt_per_order",
        "movement".to_string(),
        || format!("{receipts} receipts for {shipped} shipped orders"),
    );
    let expected = consumption_target(receipts, consumption_ratio);
    report.require(
        consumptions == expected,
        "consumption_count",
        "movement".to_string(),
        || format!("{consumptions} consumptions, expected {expected}"),
    );
    report.require(
        dataset
            .movements
            .windows(2)
            .all(|pair| pair[0].movement_date <= pair[1].movement_date),
        "movement_order",
        "movement".to_string(),
        || "movements are not sorted by date".to_string(),
    );
}

fn check_balances(dataset: &Dataset, report: &mut CheckReport) {
    let balances = aggregate_balances(&dataset.movements);
    check_balance_rows(&dataset.movements, &balances, report);
}

/// Balance rows must follow the `GROUP BY unit_id, material_id` shape of the
/// aggregation: one row per movement group, net quantities that add up to the
/// whole log, and the date of the group's last movement in the date-sorted log.
fn check_balance_rows(
    movements: &[InventoryMovement],
    balances: &[UnitInventoryBalance],
    report: &mut CheckReport,
) {
    let mut last_seen: HashMap<(UnitId, MaterialId), NaiveDate> = HashMap::new();
    for movement in movements {
        last_seen.insert((movement.unit_id, movement.material_id), movement.movement_date);
    }

    let groups: BTreeSet<(UnitId, MaterialId)> = last_seen.keys().copied().collect();
    let keys: Vec<(UnitId, MaterialId)> = balances
        .iter()
        .map(|balance| (balance.unit_id, balance.material_id))
        .collect();
    report.require(
        keys.iter().copied().eq(groups.iter().copied()),
        "balance_groups",
        "unit_inventory".to_string(),
        || format!("{} balances for {} movement groups", keys.len(), groups.len()),
    );

    let log_net: Decimal = movements
        .iter()
        .map(|movement| movement.kind.signed(movement.quantity))
        .sum();
    let balance_net: Decimal = balances.iter().map(|balance| balance.quantity).sum();
    report.require(
        balance_net == log_net.round_dp(2),
        "balance_law",
        "unit_inventory".to_string(),
        || format!("balances net {balance_net}, movement log nets {log_net}"),
    );

    for balance in balances {
        let key = (balance.unit_id, balance.material_id);
        report.require(
            last_seen.get(&key) == Some(&balance.last_updated),
            "balance_last_updated",
            format!("unit_inventory.{}.{}", balance.unit_id, balance.material_id),
            || format!("last_updated {} is not the latest movement", balance.last_updated),
        );
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use stockseed_core::ReferenceCatalog;

    use super::*;
    use crate::engine::build_dataset;
    use crate::model::GenerateOptions;

    fn dataset() -> Dataset {
        let options = GenerateOptions::default();
        let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
        let mut report = crate::model::GenerationReport::new("test".to_string(), options.seed);
        build_dataset(ReferenceCatalog::standard(), &options, &mut rng, &mut report)
            .expect("dataset")
    }

    #[test]
    fn generated_dataset_is_clean() {
        let dataset = dataset();
        let report = check_dataset(&CheckContext {
            dataset: &dataset,
            consumption_ratio: 2.0,
        });

        assert!(report.is_clean(), "violations: {:?}", report.violations);
        assert!(report.checked > 1_000);
    }

    #[test]
    fn detects_tampered_shipment() {
        let mut dataset = dataset();
        let index = dataset
            .orders
            .iter()
            .position(|order| order.status == OrderStatus::Completed)
            .expect("completed order");
        dataset.orders[index].status = OrderStatus::Pending;

        let report = check_dataset(&CheckContext {
            dataset: &dataset,
            consumption_ratio: 2.0,
        });

        let codes: BTreeSet<&str> = report
            .violations
            .iter()
            .map(|issue| issue.code.as_str())
            .collect();
        assert!(codes.contains("pending_shipped"));
        assert!(codes.contains("receipt_reference"));
    }

    #[test]
    fn detects_unsorted_movements_and_wrong_supplier() {
        let mut dataset = dataset();
        dataset.movements.reverse();
        let receipt = dataset
            .movements
            .iter_mut()
            .find(|movement| movement.kind == MovementKind::Receipt)
            .expect("receipt");
        receipt.supplier_id = Some(999);

        let report = check_dataset(&CheckContext {
            dataset: &dataset,
            consumption_ratio: 2.0,
        });

        let codes: BTreeSet<&str> = report
            .violations
            .iter()
            .map(|issue| issue.code.as_str())
            .collect();
        assert!(codes.contains("movement_order"));
        assert!(codes.contains("receipt_reference"));
    }

    #[test]
    fn detects_balances_that_drift_from_the_log() {
        let dataset = dataset();
        let mut balances = aggregate_balances(&dataset.movements);
        balances[0].quantity += Decimal::ONE;
        balances[1].last_updated = dataset.period.start;
        balances[2].unit_id = 999;

        let mut report = CheckReport::default();
        check_balance_rows(&dataset.movements, &balances, &mut report);

        let codes: BTreeSet<&str> = report
            .violations
            .iter()
            .map(|issue| issue.code.as_str())
            .collect();
        assert!(codes.contains("balance_groups"));
        assert!(codes.contains("balance_law"));
        assert!(codes.contains("balance_last_updated"));
    }

    #[test]
    fn detects_missing_contract() {
        let mut dataset = dataset();
        dataset.contracts.remove(0);

        let report = check_dataset(&CheckContext {
            dataset: &dataset,
            consumption_ratio: 2.0,
        });

        assert!(
            report
                .violations
                .iter()
                .any(|issue| issue.code == "contract_per_triple")
        );
    }
}
