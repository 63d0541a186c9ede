//! Stage generators. Every stage draws from the same `Rng` handle, in stage
//! order, so a seed fully determines the dataset.

pub mod contracts;
pub mod movements;
pub mod orders;

use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;

pub use contracts::{CONTRACT_ID_BASE, generate_contracts};
pub use movements::{MOVEMENT_ID_BASE, generate_movements};
pub use orders::{ORDER_ID_BASE, generate_orders};

/// Uniform date in `[start, end]`, both inclusive.
pub fn random_date(start: NaiveDate, end: NaiveDate, rng: &mut impl Rng) -> NaiveDate {
    let span = (end - start).num_days().max(0);
    start + Duration::days(rng.random_range(0..=span))
}

/// Uniform two-decimal amount in `[min, max]`, bounds given in hundredths.
pub fn random_amount(hundredths: RangeInclusive<i64>, rng: &mut impl Rng) -> Decimal {
    Decimal::new(rng.random_range(hundredths), 2)
}

/// `base` scaled by a uniform factor, factor bounds given in basis points,
/// rounded to two decimals.
pub fn scaled_price(base: Decimal, basis_points: RangeInclusive<i64>, rng: &mut impl Rng) -> Decimal {
    let factor = Decimal::new(rng.random_range(basis_points), 4);
    (base * factor).round_dp(2)
}

/// Uniform pick from a non-empty slice.
pub fn pick<T: Copy>(values: &[T], rng: &mut impl Rng) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    Some(values[rng.random_range(0..values.len())])
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
    }

    #[test]
    fn random_date_stays_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (start, end) = (date("2021-01-31"), date("2021-02-03"));

        for _ in 0..200 {
            let value = random_date(start, end, &mut rng);
            assert!(start <= value && value <= end);
        }
        assert_eq!(random_date(start, start, &mut rng), start);
    }

    #[test]
    fn amounts_have_two_decimals() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        for _ in 0..200 {
            let value = random_amount(2_000..=10_000, &mut rng);
            assert_eq!(value.scale(), 2);
            assert!(value >= Decimal::new(20, 0) && value <= Decimal::new(100, 0));
        }
    }

    #[test]
    fn scaled_price_respects_factor_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let base = Decimal::new(11_500, 2);

        for _ in 0..200 {
            let price = scaled_price(base, 9_200..=11_000, &mut rng);
            assert!(price >= Decimal::new(10_580, 2));
            assert!(price <= Decimal::new(12_650, 2));
        }
    }

    #[test]
    fn pick_handles_empty_slices() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        assert_eq!(pick::<i64>(&[], &mut rng), None);
        assert_eq!(pick(&[7], &mut rng), Some(7));
    }
}
