use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{MaterialId, SupplierId, UnitId};

/// Supplier used when a (unit, material) pair has no usable mapping.
pub const DEFAULT_SUPPLIER_ID: SupplierId = 1;

/// How eligibility gaps are handled during contract generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityPolicy {
    /// Drop unknown supplier ids and fall back to the default supplier.
    #[default]
    Fallback,
    /// Treat unknown ids and missing mappings as hard failures.
    Strict,
}

/// Suppliers allowed to serve each (unit, material) pair, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierEligibility {
    entries: BTreeMap<(UnitId, MaterialId), Vec<SupplierId>>,
    default_supplier: SupplierId,
}

/// Outcome of resolving the eligible suppliers of one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub suppliers: Vec<SupplierId>,
    /// Mapped ids that do not exist in the supplier list.
    pub dropped: Vec<SupplierId>,
    /// True when `suppliers` is the default supplier substituted for a gap.
    pub fell_back: bool,
}

impl Default for SupplierEligibility {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPLIER_ID)
    }
}

impl SupplierEligibility {
    pub fn new(default_supplier: SupplierId) -> Self {
        Self {
            entries: BTreeMap::new(),
            default_supplier,
        }
    }

    pub fn insert(
        &mut self,
        unit_id: UnitId,
        material_id: MaterialId,
        suppliers: impl IntoIterator<Item = SupplierId>,
    ) {
        self.entries
            .insert((unit_id, material_id), suppliers.into_iter().collect());
    }

    pub fn get(&self, unit_id: UnitId, material_id: MaterialId) -> Option<&[SupplierId]> {
        self.entries
            .get(&(unit_id, material_id))
            .map(|suppliers| suppliers.as_slice())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&(UnitId, MaterialId), &Vec<SupplierId>)> {
        self.entries.iter()
    }

    pub fn default_supplier(&self) -> SupplierId {
        self.default_supplier
    }

    /// Resolve the suppliers eligible for a pair against the known supplier ids.
    pub fn resolve(
        &self,
        unit_id: UnitId,
        material_id: MaterialId,
        known: &BTreeSet<SupplierId>,
        policy: EligibilityPolicy,
    ) -> Result<Resolution> {
        let mapped = self.get(unit_id, material_id);
        let (suppliers, dropped): (Vec<SupplierId>, Vec<SupplierId>) = mapped
            .unwrap_or_default()
            .iter()
            .partition(|id| known.contains(*id));

        if policy == EligibilityPolicy::Strict {
            if mapped.is_none() {
                return Err(Error::Eligibility {
                    unit_id,
                    material_id,
                    reason: "no mapping".to_string(),
                });
            }
            if !dropped.is_empty() {
                return Err(Error::Eligibility {
                    unit_id,
                    material_id,
                    reason: format!("unknown supplier ids {dropped:?}"),
                });
            }
        }

        if suppliers.is_empty() {
            if policy == EligibilityPolicy::Strict || !known.contains(&self.default_supplier) {
                return Err(Error::Eligibility {
                    unit_id,
                    material_id,
                    reason: format!(
                        "no known supplier and default {} unavailable",
                        self.default_supplier
                    ),
                });
            }
            return Ok(Resolution {
                suppliers: vec![self.default_supplier],
                dropped,
                fell_back: true,
            });
        }

        Ok(Resolution {
            suppliers,
            dropped,
            fell_back: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> BTreeSet<SupplierId> {
        (1..=10).collect()
    }

    #[test]
    fn unknown_ids_are_dropped_under_fallback() {
        let mut map = SupplierEligibility::default();
        map.insert(202, 1200, [1, 8, 15]);

        let resolution = map
            .resolve(202, 1200, &known(), EligibilityPolicy::Fallback)
            .expect("resolve");

        assert_eq!(resolution.suppliers, vec![1, 8]);
        assert_eq!(resolution.dropped, vec![15]);
        assert!(!resolution.fell_back);
    }

    #[test]
    fn missing_pair_falls_back_to_default() {
        let map = SupplierEligibility::default();

        let resolution = map
            .resolve(201, 1200, &known(), EligibilityPolicy::Fallback)
            .expect("resolve");

        assert_eq!(resolution.suppliers, vec![DEFAULT_SUPPLIER_ID]);
        assert!(resolution.fell_back);
    }

    #[test]
    fn strict_policy_rejects_gaps() {
        let mut map = SupplierEligibility::default();
        map.insert(202, 1200, [1, 15]);

        let unknown = map.resolve(202, 1200, &known(), EligibilityPolicy::Strict);
        assert!(matches!(unknown, Err(Error::Eligibility { .. })));

        let missing = map.resolve(203, 1300, &known(), EligibilityPolicy::Strict);
        assert!(matches!(missing, Err(Error::Eligibility { .. })));
    }

    #[test]
    fn fallback_requires_known_default() {
        let map = SupplierEligibility::new(99);

        let result = map.resolve(201, 1200, &known(), EligibilityPolicy::Fallback);

        assert!(result.is_err());
    }
}
