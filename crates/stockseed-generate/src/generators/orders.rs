use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDate};
use rand::Rng;

use stockseed_core::{Contract, ContractStatus, Order, OrderId, OrderStatus};

use crate::generators::random_date;

pub const ORDER_ID_BASE: OrderId = 5001;

const ORDERS_PER_CONTRACT: RangeInclusive<u32> = 18..=28;
/// Order dates stay strictly after `start + 30` and strictly before `end - 14`.
const OPEN_AFTER_START_DAYS: i64 = 30;
const CLOSE_BEFORE_END_DAYS: i64 = 14;
const LEAD_DAYS: RangeInclusive<i64> = 10..=21;
const LATENESS_DAYS: RangeInclusive<i64> = -3..=6;
const CLAMPED_LATENESS_DAYS: RangeInclusive<i64> = 0..=3;
/// Latest shipment accepted after the contract closes.
pub const SHIPPING_GRACE_DAYS: i64 = 30;

/// Purchase orders for every contract, in contract order.
pub fn generate_orders(contracts: &[Contract], rng: &mut impl Rng) -> Vec<Order> {
    let mut orders = Vec::new();
    let mut next_id = ORDER_ID_BASE;

    for contract in contracts {
        let count = rng.random_range(ORDERS_PER_CONTRACT);
        let earliest = contract.start_date + Duration::days(OPEN_AFTER_START_DAYS + 1);
        let latest = contract.end_date - Duration::days(CLOSE_BEFORE_END_DAYS + 1);
        let shipping_limit = contract.end_date + Duration::days(SHIPPING_GRACE_DAYS);

        for _ in 0..count {
            let order_date = random_date(earliest, latest, rng);
            let required_date = order_date + Duration::days(rng.random_range(LEAD_DAYS));
            let shipped = ship_date(required_date, shipping_limit, rng);

            let status = order_status(contract.status, rng);
            let shipped_date = match status {
                OrderStatus::Completed => Some(shipped),
                OrderStatus::Pending => None,
            };

            orders.push(Order {
                id: next_id,
                contract_id: contract.id,
                unit_id: contract.unit_id,
                order_date,
                required_date,
                shipped_date,
                status,
            });
            next_id += 1;
        }
    }

    orders
}

/// Required date plus lateness; lateness is redrawn in `0..=3` days when the
/// first draw ships after `limit`.
fn ship_date(required: NaiveDate, limit: NaiveDate, rng: &mut impl Rng) -> NaiveDate {
    let shipped = required + Duration::days(rng.random_range(LATENESS_DAYS));
    if shipped > limit {
        required + Duration::days(rng.random_range(CLAMPED_LATENESS_DAYS))
    } else {
        shipped
    }
}

/// Orders of completed contracts are completed; otherwise completed 2:1 over pending.
fn order_status(contract_status: ContractStatus, rng: &mut impl Rng) -> OrderStatus {
    match contract_status {
        ContractStatus::Completed => OrderStatus::Completed,
        ContractStatus::Active => {
            if rng.random_range(0..3) < 2 {
                OrderStatus::Completed
            } else {
                OrderStatus::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rust_decimal::Decimal;

    use super::*;

    fn contract(id: i64, year: i32, status: ContractStatus) -> Contract {
        let start_date = NaiveDate::from_ymd_opt(year, 1, 1).expect("start");
        Contract {
            id,
            supplier_id: 1,
            material_id: 1200,
            unit_id: 201,
            quantity: Decimal::new(50_000, 2),
            price_per_unit: Decimal::new(7_500, 2),
            start_date,
            end_date: NaiveDate::from_ymd_opt(year, 12, 31).expect("end"),
            supply_date: start_date + Duration::days(12),
            status,
        }
    }

    #[test]
    fn order_counts_and_ids() {
        let contracts = vec![
            contract(1001, 2020, ContractStatus::Completed),
            contract(1002, 2021, ContractStatus::Active),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let orders = generate_orders(&contracts, &mut rng);

        let mut per_contract: HashMap<i64, u32> = HashMap::new();
        for order in &orders {
            *per_contract.entry(order.contract_id).or_default() += 1;
        }
        for count in per_contract.values() {
            assert!(ORDERS_PER_CONTRACT.contains(count));
        }
        assert_eq!(orders[0].id, ORDER_ID_BASE);
        for pair in orders.windows(2) {
            assert_eq!(pair[1].id, pair[0].id + 1);
        }
    }

    #[test]
    fn dates_follow_contract_window() {
        let contracts = vec![contract(1001, 2021, ContractStatus::Active)];
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for order in generate_orders(&contracts, &mut rng) {
            let c = &contracts[0];
            assert!(order.order_date > c.start_date + Duration::days(30));
            assert!(order.order_date < c.end_date - Duration::days(14));
            let lead = (order.required_date - order.order_date).num_days();
            assert!(LEAD_DAYS.contains(&lead));
            if let Some(shipped) = order.shipped_date {
                assert!(shipped <= c.end_date + Duration::days(SHIPPING_GRACE_DAYS));
                let late = (shipped - order.required_date).num_days();
                assert!(LATENESS_DAYS.contains(&late));
            }
        }
    }

    #[test]
    fn late_shipment_is_redrawn_near_required_date() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let required = NaiveDate::from_ymd_opt(2021, 12, 28).expect("required");
        let limit = required - Duration::days(4);

        for _ in 0..200 {
            let shipped = ship_date(required, limit, &mut rng);
            let late = (shipped - required).num_days();
            assert!(CLAMPED_LATENESS_DAYS.contains(&late), "lateness {late}");
        }
    }

    #[test]
    fn shipment_within_limit_keeps_first_draw() {
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let required = NaiveDate::from_ymd_opt(2021, 6, 1).expect("required");
        let limit = required + Duration::days(60);
        let mut early = false;

        for _ in 0..200 {
            let late = (ship_date(required, limit, &mut rng) - required).num_days();
            assert!(LATENESS_DAYS.contains(&late));
            early |= late < 0;
        }
        assert!(early, "negative lateness never drawn");
    }

    #[test]
    fn completed_contracts_only_yield_completed_orders() {
        let contracts = vec![contract(1001, 2020, ContractStatus::Completed)];
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for order in generate_orders(&contracts, &mut rng) {
            assert_eq!(order.status, OrderStatus::Completed);
            assert!(order.shipped_date.is_some());
        }
    }

    #[test]
    fn pending_orders_have_no_shipment() {
        let contracts: Vec<Contract> = (0..10)
            .map(|offset| contract(1001 + offset, 2022, ContractStatus::Active))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let orders = generate_orders(&contracts, &mut rng);

        let pending: Vec<&Order> = orders
            .iter()
            .filter(|order| order.status == OrderStatus::Pending)
            .collect();
        assert!(!pending.is_empty());
        assert!(pending.iter().all(|order| order.shipped_date.is_none()));
        assert!(
            orders
                .iter()
                .filter(|order| order.status == OrderStatus::Completed)
                .all(|order| order.shipped_date.is_some())
        );
    }
}
