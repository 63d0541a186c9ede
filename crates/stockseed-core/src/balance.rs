use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::model::{InventoryMovement, MaterialId, UnitId, UnitInventoryBalance};

/// Evaluate the unit inventory aggregation over a movement log.
///
/// Mirrors the `GROUP BY unit_id, material_id` statement handed to the
/// database: signed quantity sum rounded to two decimals and the latest
/// movement date per group. Output is ordered by (unit, material).
pub fn aggregate_balances(movements: &[InventoryMovement]) -> Vec<UnitInventoryBalance> {
    let mut groups: BTreeMap<(UnitId, MaterialId), (Decimal, NaiveDate)> = BTreeMap::new();

    for movement in movements {
        let signed = movement.kind.signed(movement.quantity);
        groups
            .entry((movement.unit_id, movement.material_id))
            .and_modify(|(quantity, last)| {
                *quantity += signed;
                *last = (*last).max(movement.movement_date);
            })
            .or_insert((signed, movement.movement_date));
    }

    groups
        .into_iter()
        .map(
            |((unit_id, material_id), (quantity, last_updated))| UnitInventoryBalance {
                unit_id,
                material_id,
                quantity: quantity.round_dp(2),
                last_updated,
            },
        )
        .collect()
}
