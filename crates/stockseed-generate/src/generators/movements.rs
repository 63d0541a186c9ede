use std::collections::HashMap;
use std::ops::RangeInclusive;

use rand::Rng;

use stockseed_core::{
    Contract, ContractId, InventoryMovement, MaterialId, MovementId, MovementKind, Order,
    OrderStatus, UnitId,
};

use crate::errors::GenerationError;
use crate::generators::{pick, random_amount, random_date};
use crate::model::Period;

pub const MOVEMENT_ID_BASE: MovementId = 9001;

/// Receipt quantity bounds, in hundredths.
const RECEIPT_QUANTITY: RangeInclusive<i64> = 2_000..=10_000;
/// Consumption quantity bounds, in hundredths.
const CONSUMPTION_QUANTITY: RangeInclusive<i64> = 1_000..=8_000;

pub const RECEIPT_NOTE: &str = "Delivery per order";
pub const CONSUMPTION_NOTE: &str = "Production use";

/// Number of consumptions generated for `receipts` receipts.
pub fn consumption_target(receipts: usize, ratio: f64) -> usize {
    (receipts as f64 * ratio).floor() as usize
}

/// Receipts for shipped orders followed by synthetic consumptions, stable-sorted
/// by date. Ids follow generation order and survive the sort.
pub fn generate_movements(
    contracts: &[Contract],
    orders: &[Order],
    pairs: &[(UnitId, MaterialId)],
    period: Period,
    consumption_ratio: f64,
    rng: &mut impl Rng,
) -> Result<Vec<InventoryMovement>, GenerationError> {
    let by_id: HashMap<ContractId, &Contract> = contracts
        .iter()
        .map(|contract| (contract.id, contract))
        .collect();
    let mut movements = Vec::new();
    let mut next_id = MOVEMENT_ID_BASE;

    for order in orders {
        let Some(shipped_date) = order.shipped_date else {
            continue;
        };
        if order.status != OrderStatus::Completed {
            continue;
        }
        let contract = by_id.get(&order.contract_id).ok_or_else(|| {
            GenerationError::Inconsistent(format!(
                "order {} references unknown contract {}",
                order.id, order.contract_id
            ))
        })?;

        movements.push(InventoryMovement {
            id: next_id,
            unit_id: order.unit_id,
            material_id: contract.material_id,
            supplier_id: Some(contract.supplier_id),
            order_id: Some(order.id),
            kind: MovementKind::Receipt,
            quantity: random_amount(RECEIPT_QUANTITY, rng),
            movement_date: shipped_date,
            notes: RECEIPT_NOTE.to_string(),
        });
        next_id += 1;
    }

    let target = consumption_target(movements.len(), consumption_ratio);
    movements.reserve(target);
    for _ in 0..target {
        let (unit_id, material_id) = pick(pairs, rng).ok_or_else(|| {
            GenerationError::Inconsistent("no (unit, material) pairs to consume from".to_string())
        })?;
        let quantity = random_amount(CONSUMPTION_QUANTITY, rng);
        let movement_date = random_date(period.start, period.end, rng);

        movements.push(InventoryMovement {
            id: next_id,
            unit_id,
            material_id,
            supplier_id: None,
            order_id: None,
            kind: MovementKind::Consumption,
            quantity,
            movement_date,
            notes: CONSUMPTION_NOTE.to_string(),
        });
        next_id += 1;
    }

    movements.sort_by_key(|movement| movement.movement_date);
    Ok(movements)
}
