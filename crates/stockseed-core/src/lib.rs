//! Core contracts and helpers for stockseed.
//!
//! This crate defines the supplier/inventory domain types, the static
//! reference catalog, supplier eligibility and the balance aggregation
//! shared by the generator and its checks.

pub mod balance;
pub mod catalog;
pub mod eligibility;
pub mod error;
pub mod model;
pub mod validation;

pub use balance::aggregate_balances;
pub use catalog::ReferenceCatalog;
pub use eligibility::{DEFAULT_SUPPLIER_ID, EligibilityPolicy, Resolution, SupplierEligibility};
pub use error::{Error, Result};
pub use model::{
    Address, Contract, ContractId, ContractStatus, InventoryMovement, Material, MaterialId,
    MovementId, MovementKind, Order, OrderId, OrderStatus, ProductionUnit, Supplier, SupplierId,
    UnitId, UnitInventoryBalance,
};
pub use validation::{IssueSeverity, ValidationIssue, ValidationReport, validate_catalog};

/// Version of the emitted dataset layout.
pub const DATASET_VERSION: &str = "0.1";
