//! Static reference data: suppliers, materials, production units and the
//! supplier eligibility map.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::eligibility::{DEFAULT_SUPPLIER_ID, SupplierEligibility};
use crate::model::{
    Address, Material, MaterialId, ProductionUnit, Supplier, SupplierId, UnitId,
};

const COUNTRY: &str = "IDN";

/// Immutable reference collections consumed by every generation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCatalog {
    pub suppliers: Vec<Supplier>,
    pub materials: Vec<Material>,
    pub units: Vec<ProductionUnit>,
    pub eligibility: SupplierEligibility,
}

impl ReferenceCatalog {
    /// Built-in catalog of asphalt mixing plants and their suppliers.
    pub fn standard() -> Self {
        let suppliers = [
            (1, "PT Karya Agung Mandiri", "Jl. Industri No. 12", "Jakarta", "DKI Jakarta", "10110"),
            (2, "CV Maju Bersama", "Jl. Raya Bekasi No. 45", "Bekasi", "Jawa Barat", "13000"),
            (3, "PT Sumber Alam Sumatera", "Jl. Gatot Subroto No. 8", "Medan", "Sumatra Utara", "20000"),
            (4, "UD Mataram Jaya", "Jl. Pejanggik No. 3", "Mataram", "Nusa Tenggara Barat", "83100"),
            (5, "PT Bumi Aceh Resources", "Jl. T. Nyak Arief No. 1", "Aceh", "NAD", "24300"),
            (6, "PT Riau Konstruksi", "Jl. Sudirman No. 88", "Pekanbaru", "Riau", "28200"),
            (7, "CV Dumai Aspal Utama", "Jl. Nelayan No. 21", "Dumai", "Riau", "28800"),
            (8, "PT Klaten Beton Perkasa", "Jl. Solo-Yogya KM 7", "Klaten", "Jawa Tengah", "57400"),
            (9, "UD Yogyakarta Material", "Jl. Magelang No. 15", "Yogyakarta", "DIY", "55000"),
            (10, "PT Cileungsi Agregat", "Jl. Narogong No. 33", "Cileungsi", "Jawa Barat", "16800"),
        ]
        .into_iter()
        .map(|(id, name, street, city, province, postal)| Supplier {
            id,
            company_name: name.to_string(),
            address: address(street, city, province, postal),
        })
        .collect();

        let materials = [
            (1200, "Bitumen", "Bitumen pen 60/70 for asphalt paving", "Cubic Meters", 7500),
            (1300, "Gravel", "Crushed stone 14mm-20mm for base course", "Tons", 11500),
            (1310, "Coarse Aggregate", "Coarse aggregate for asphalt mix (AC-WC)", "Tons", 9700),
            (1400, "Diesel Fuel", "Industrial diesel for mixing plant units", "Liters", 900),
        ]
        .into_iter()
        .map(|(id, name, description, unit, cents)| Material {
            id,
            name: name.to_string(),
            description: description.to_string(),
            unit: unit.to_string(),
            base_price: Decimal::new(cents, 2),
        })
        .collect();

        let units = [
            (201, "AMP Pekanbaru", "Km 12 Jl. Pekanbaru-Dumai", "Pekanbaru", "Riau", "28200"),
            (202, "AMP Dumai", "Km 5 Jl. Dumai Industrial", "Dumai", "Riau", "28800"),
            (203, "AMP JORR-South", "Jl. JORR Seksi S, Cilandak", "Jakarta", "DKI Jakarta", "12430"),
        ]
        .into_iter()
        .map(|(id, name, street, city, province, postal)| ProductionUnit {
            id,
            name: name.to_string(),
            address: address(street, city, province, postal),
        })
        .collect();

        let mut eligibility = SupplierEligibility::new(DEFAULT_SUPPLIER_ID);
        let mapping: [(UnitId, MaterialId, &[SupplierId]); 12] = [
            (201, 1200, &[1, 2]),
            (201, 1300, &[7, 10]),
            (201, 1310, &[7, 9]),
            (201, 1400, &[3, 4]),
            // 15 is not a registered supplier and gets dropped at resolution time.
            (202, 1200, &[1, 8, 15]),
            (202, 1300, &[4, 10]),
            (202, 1310, &[5, 7]),
            (202, 1400, &[2, 3]),
            (203, 1200, &[1, 6]),
            (203, 1300, &[4, 8]),
            (203, 1310, &[7, 10]),
            (203, 1400, &[2, 3]),
        ];
        for (unit_id, material_id, suppliers) in mapping {
            eligibility.insert(unit_id, material_id, suppliers.iter().copied());
        }

        Self {
            suppliers,
            materials,
            units,
            eligibility,
        }
    }

    pub fn supplier_ids(&self) -> BTreeSet<SupplierId> {
        self.suppliers.iter().map(|supplier| supplier.id).collect()
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.iter().find(|material| material.id == id)
    }

    /// Full cross product of units and materials, units outermost.
    pub fn unit_material_pairs(&self) -> Vec<(UnitId, MaterialId)> {
        self.units
            .iter()
            .flat_map(|unit| self.materials.iter().map(move |material| (unit.id, material.id)))
            .collect()
    }
}

fn address(street: &str, city: &str, province: &str, postal_code: &str) -> Address {
    Address {
        street: street.to_string(),
        city: city.to_string(),
        province: province.to_string(),
        postal_code: postal_code.to_string(),
        country: COUNTRY.to_string(),
    }
}
