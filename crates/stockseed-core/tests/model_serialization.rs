use chrono::NaiveDate;
use rust_decimal::Decimal;

use stockseed_core::{InventoryMovement, MovementKind, ReferenceCatalog};

#[test]
fn serializes_movement_deterministically() {
    let movement = InventoryMovement {
        id: 9001,
        unit_id: 201,
        material_id: 1200,
        supplier_id: Some(1),
        order_id: Some(5001),
        kind: MovementKind::Receipt,
        quantity: Decimal::new(4250, 2),
        movement_date: NaiveDate::from_ymd_opt(2020, 3, 4).expect("date"),
        notes: "Delivery per order".to_string(),
    };

    let json = serde_json::to_string(&movement).expect("serialize movement");
    let expected = r#"{"id":9001,"unit_id":201,"material_id":1200,"supplier_id":1,"order_id":5001,"kind":"RECEIPT","quantity":"42.50","movement_date":"2020-03-04","notes":"Delivery per order"}"#;
    assert_eq!(json, expected);

    let back: InventoryMovement = serde_json::from_str(&json).expect("deserialize movement");
    assert_eq!(back, movement);
}

#[test]
fn consumption_serializes_nulls() {
    let movement = InventoryMovement {
        id: 9100,
        unit_id: 203,
        material_id: 1400,
        supplier_id: None,
        order_id: None,
        kind: MovementKind::Consumption,
        quantity: Decimal::new(1000, 2),
        movement_date: NaiveDate::from_ymd_opt(2022, 12, 31).expect("date"),
        notes: "Production use".to_string(),
    };

    let value = serde_json::to_value(&movement).expect("serialize movement");
    assert!(value["supplier_id"].is_null());
    assert!(value["order_id"].is_null());
    assert_eq!(value["kind"], "CONSUMPTION");
}

#[test]
fn catalog_entities_serialize() {
    let catalog = ReferenceCatalog::standard();

    let value = serde_json::to_value(&catalog.units[2]).expect("serialize unit");
    assert_eq!(value["name"], "AMP JORR-South");
    assert_eq!(value["address"]["country"], "IDN");

    let value = serde_json::to_value(&catalog.materials[0]).expect("serialize material");
    assert_eq!(value["base_price"], "75.00");
}
