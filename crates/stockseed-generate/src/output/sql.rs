use chrono::NaiveDate;
use rust_decimal::Decimal;

use stockseed_core::{
    Address, Contract, DATASET_VERSION, InventoryMovement, Material, Order, ProductionUnit,
    Supplier,
};

use crate::model::{Dataset, DatasetSummary};

/// Populates `unit_inventory` from the movement log. Must run after the
/// `inventory_movement` insert has been applied.
pub const BALANCE_AGGREGATION: &str = "\
INSERT INTO unit_inventory (unit_id, material_id, quantity, last_updated)
SELECT
    unit_id,
    material_id,
    ROUND(SUM(
        CASE movement_type
            WHEN 'RECEIPT'     THEN  quantity
            WHEN 'CONSUMPTION' THEN -quantity
            ELSE 0
        END
    )::NUMERIC, 2)              AS quantity,
    MAX(movement_date)           AS last_updated
FROM inventory_movement
GROUP BY unit_id, material_id;";

const RULE: &str = "-- ============================================================";

/// Literal value rendered into an insert row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
}

impl SqlValue {
    pub fn text(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }

    pub fn render(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Int(value) => value.to_string(),
            SqlValue::Decimal(value) => format!("{value:.2}"),
            SqlValue::Text(value) => format!("'{}'", value.replace('\'', "''")),
            SqlValue::Date(value) => format!("'{}'", value.format("%Y-%m-%d")),
        }
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::Int)
    }
}

impl From<Option<NaiveDate>> for SqlValue {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::Date)
    }
}

/// Render the full SQL artifact: header, one bulk insert per entity group in
/// dependency order, then the balance aggregation.
pub fn render_sql(dataset: &Dataset) -> String {
    let mut lines = Vec::new();
    let catalog = &dataset.catalog;

    insert_block(
        &mut lines,
        "SUPPLIERS",
        "supplier",
        &[
            "supplier_id",
            "company_name",
            "address",
            "city",
            "province",
            "postal_code",
            "country",
        ],
        catalog.suppliers.iter().map(supplier_row),
    );
    insert_block(
        &mut lines,
        "MATERIALS",
        "material",
        &["material_id", "material_name", "description", "unit"],
        catalog.materials.iter().map(material_row),
    );
    insert_block(
        &mut lines,
        "PRODUCTION UNITS",
        "production_unit",
        &[
            "unit_id",
            "unit_name",
            "address",
            "city",
            "province",
            "postal_code",
            "country",
        ],
        catalog.units.iter().map(unit_row),
    );
    insert_block(
        &mut lines,
        "CONTRACTS",
        "contract",
        &[
            "contract_id",
            "supplier_id",
            "material_id",
            "unit_id",
            "quantity",
            "price_per_unit",
            "start_date",
            "end_date",
            "supply_date",
            "status",
        ],
        dataset.contracts.iter().map(contract_row),
    );
    insert_block(
        &mut lines,
        "ORDERS",
        "orders",
        &[
            "order_id",
            "contract_id",
            "unit_id",
            "order_date",
            "required_date",
            "shipped_date",
            "status",
        ],
        dataset.orders.iter().map(order_row),
    );
    insert_block(
        &mut lines,
        "INVENTORY MOVEMENTS",
        "inventory_movement",
        &[
            "movement_id",
            "unit_id",
            "material_id",
            "supplier_id",
            "order_id",
            "movement_type",
            "quantity",
            "movement_date",
            "notes",
        ],
        dataset.movements.iter().map(movement_row),
    );

    lines.push("-- UNIT INVENTORY".to_string());
    lines.push("-- Net stock calculated directly from inventory_movement log".to_string());
    lines.push(BALANCE_AGGREGATION.to_string());
    lines.push(String::new());

    let mut output = header(&dataset.summary());
    output.push_str(&lines.join("\n"));
    output
}

fn header(summary: &DatasetSummary) -> String {
    format!(
        "{RULE}\n\
         -- Sample Data: Supplier-Inventory Database (PostgreSQL)\n\
         -- {} contracts | {} orders | {} receipts | {} consumptions | {} total movements\n\
         -- dataset version {DATASET_VERSION}\n\
         {RULE}\n\n",
        summary.contracts, summary.orders, summary.receipts, summary.consumptions, summary.movements
    )
}

fn insert_block(
    lines: &mut Vec<String>,
    title: &str,
    table: &str,
    columns: &[&str],
    rows: impl Iterator<Item = Vec<SqlValue>>,
) {
    lines.push(format!("-- {title}"));
    let rows: Vec<String> = rows
        .map(|row| {
            let values: Vec<String> = row.iter().map(SqlValue::render).collect();
            format!("({})", values.join(", "))
        })
        .collect();
    if rows.is_empty() {
        lines.push(format!("-- no rows for {table}"));
    } else {
        lines.push(format!("INSERT INTO {table} ({})", columns.join(", ")));
        lines.push("VALUES".to_string());
        lines.push(format!("{};", rows.join(",\n")));
    }
    lines.push(String::new());
}

fn address_values(address: &Address) -> [SqlValue; 5] {
    [
        SqlValue::text(&address.street),
        SqlValue::text(&address.city),
        SqlValue::text(&address.province),
        SqlValue::text(&address.postal_code),
        SqlValue::text(&address.country),
    ]
}

fn supplier_row(supplier: &Supplier) -> Vec<SqlValue> {
    let mut row = vec![SqlValue::Int(supplier.id), SqlValue::text(&supplier.company_name)];
    row.extend(address_values(&supplier.address));
    row
}

fn material_row(material: &Material) -> Vec<SqlValue> {
    vec![
        SqlValue::Int(material.id),
        SqlValue::text(&material.name),
        SqlValue::text(&material.description),
        SqlValue::text(&material.unit),
    ]
}

fn unit_row(unit: &ProductionUnit) -> Vec<SqlValue> {
    let mut row = vec![SqlValue::Int(unit.id), SqlValue::text(&unit.name)];
    row.extend(address_values(&unit.address));
    row
}

fn contract_row(contract: &Contract) -> Vec<SqlValue> {
    vec![
        SqlValue::Int(contract.id),
        SqlValue::Int(contract.supplier_id),
        SqlValue::Int(contract.material_id),
        SqlValue::Int(contract.unit_id),
        SqlValue::Decimal(contract.quantity),
        SqlValue::Decimal(contract.price_per_unit),
        SqlValue::Date(contract.start_date),
        SqlValue::Date(contract.end_date),
        SqlValue::Date(contract.supply_date),
        SqlValue::text(contract.status.as_str()),
    ]
}

fn order_row(order: &Order) -> Vec<SqlValue> {
    vec![
        SqlValue::Int(order.id),
        SqlValue::Int(order.contract_id),
        SqlValue::Int(order.unit_id),
        SqlValue::Date(order.order_date),
        SqlValue::Date(order.required_date),
        order.shipped_date.into(),
        SqlValue::text(order.status.as_str()),
    ]
}

fn movement_row(movement: &InventoryMovement) -> Vec<SqlValue> {
    vec![
        SqlValue::Int(movement.id),
        SqlValue::Int(movement.unit_id),
        SqlValue::Int(movement.material_id),
        movement.supplier_id.into(),
        movement.order_id.into(),
        SqlValue::text(movement.kind.as_str()),
        SqlValue::Decimal(movement.quantity),
        SqlValue::Date(movement.movement_date),
        SqlValue::text(&movement.notes),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_literals() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 4).expect("date");

        assert_eq!(SqlValue::Null.render(), "NULL");
        assert_eq!(SqlValue::Int(9001).render(), "9001");
        assert_eq!(SqlValue::Decimal(Decimal::new(5123, 1)).render(), "512.30");
        assert_eq!(SqlValue::text("O'Brien").render(), "'O''Brien'");
        assert_eq!(SqlValue::Date(date).render(), "'2021-03-04'");
        assert_eq!(SqlValue::from(None::<NaiveDate>).render(), "NULL");
        assert_eq!(SqlValue::from(Some(5001_i64)).render(), "5001");
    }

    #[test]
    fn insert_block_layout() {
        let mut lines = Vec::new();
        insert_block(
            &mut lines,
            "THINGS",
            "thing",
            &["id", "name"],
            vec![
                vec![SqlValue::Int(1), SqlValue::text("a")],
                vec![SqlValue::Int(2), SqlValue::Null],
            ]
            .into_iter(),
        );

        assert_eq!(
            lines.join("\n"),
            "-- THINGS\nINSERT INTO thing (id, name)\nVALUES\n(1, 'a'),\n(2, NULL);\n"
        );
    }

    #[test]
    fn empty_group_emits_comment_only() {
        let mut lines = Vec::new();
        insert_block(&mut lines, "THINGS", "thing", &["id"], std::iter::empty());

        assert_eq!(lines, vec!["-- THINGS", "-- no rows for thing", ""]);
    }
}
