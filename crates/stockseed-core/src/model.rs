use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type SupplierId = i64;
pub type MaterialId = i64;
pub type UnitId = i64;
pub type ContractId = i64;
pub type OrderId = i64;
pub type MovementId = i64;

/// Postal address shared by suppliers and production units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
}

/// Company that can be contracted to deliver materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub company_name: String,
    pub address: Address,
}

/// Raw material tracked in inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub description: String,
    /// Unit of measure (ex.: Tons, Liters).
    pub unit: String,
    /// Reference price used to derive contract prices.
    pub base_price: Decimal,
}

/// Plant that receives and consumes materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionUnit {
    pub id: UnitId,
    pub name: String,
    pub address: Address,
}

/// Lifecycle state of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractStatus {
    Active,
    Completed,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Active => "Active",
            ContractStatus::Completed => "Completed",
        }
    }
}

/// Yearly supply agreement between one supplier and one production unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub supplier_id: SupplierId,
    pub material_id: MaterialId,
    pub unit_id: UnitId,
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub supply_date: NaiveDate,
    pub status: ContractStatus,
}

/// Lifecycle state of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Completed,
    Pending,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "Completed",
            OrderStatus::Pending => "Pending",
        }
    }
}

/// Purchase order issued against a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub contract_id: ContractId,
    pub unit_id: UnitId,
    pub order_date: NaiveDate,
    pub required_date: NaiveDate,
    /// `None` exactly when the order is still pending.
    pub shipped_date: Option<NaiveDate>,
    pub status: OrderStatus,
}

/// Direction of an inventory movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Receipt,
    Consumption,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Receipt => "RECEIPT",
            MovementKind::Consumption => "CONSUMPTION",
        }
    }

    /// Quantity with the sign it contributes to a stock balance.
    pub fn signed(&self, quantity: Decimal) -> Decimal {
        match self {
            MovementKind::Receipt => quantity,
            MovementKind::Consumption => -quantity,
        }
    }
}

/// Entry of the inventory movement log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub id: MovementId,
    pub unit_id: UnitId,
    pub material_id: MaterialId,
    pub supplier_id: Option<SupplierId>,
    pub order_id: Option<OrderId>,
    pub kind: MovementKind,
    pub quantity: Decimal,
    pub movement_date: NaiveDate,
    pub notes: String,
}

/// Net on-hand quantity per (unit, material), derived from the movement log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInventoryBalance {
    pub unit_id: UnitId,
    pub material_id: MaterialId,
    pub quantity: Decimal,
    pub last_updated: NaiveDate,
}
