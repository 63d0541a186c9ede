use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::catalog::ReferenceCatalog;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// Structured validation issue with a stable code and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: String,
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        severity: IssueSeverity,
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Aggregated validation report with errors and warnings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns true when there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        match issue.severity {
            IssueSeverity::Error => self.errors.push(issue),
            IssueSeverity::Warning => self.warnings.push(issue),
        }
    }
}

/// Validate internal consistency of a reference catalog.
///
/// Errors:
/// - duplicate supplier/material/unit ids
/// - non-positive material base prices
/// - eligibility entries naming unknown units or materials
///
/// Warnings:
/// - eligibility entries naming unknown suppliers
/// - (unit, material) pairs without an eligibility entry
pub fn validate_catalog(catalog: &ReferenceCatalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    let supplier_ids = unique_ids(
        &mut report,
        "suppliers",
        catalog.suppliers.iter().map(|supplier| supplier.id),
    );
    let material_ids = unique_ids(
        &mut report,
        "materials",
        catalog.materials.iter().map(|material| material.id),
    );
    let unit_ids = unique_ids(&mut report, "units", catalog.units.iter().map(|unit| unit.id));

    for material in &catalog.materials {
        if material.base_price <= Decimal::ZERO {
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "non_positive_base_price",
                format!("materials.{}", material.id),
                format!("base price {} must be positive", material.base_price),
            ));
        }
    }

    for ((unit_id, material_id), suppliers) in catalog.eligibility.entries() {
        let path = format!("eligibility.{unit_id}.{material_id}");
        if !unit_ids.contains(unit_id) {
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "unknown_unit",
                &path,
                format!("unit {unit_id} is not in the catalog"),
            ));
        }
        if !material_ids.contains(material_id) {
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "unknown_material",
                &path,
                format!("material {material_id} is not in the catalog"),
            ));
        }
        for supplier_id in suppliers {
            if !supplier_ids.contains(supplier_id) {
                report.push(ValidationIssue::new(
                    IssueSeverity::Warning,
                    "unknown_supplier",
                    &path,
                    format!("supplier {supplier_id} is not in the catalog"),
                ));
            }
        }
    }

    for (unit_id, material_id) in catalog.unit_material_pairs() {
        if catalog.eligibility.get(unit_id, material_id).is_none() {
            report.push(ValidationIssue::new(
                IssueSeverity::Warning,
                "missing_eligibility",
                format!("eligibility.{unit_id}.{material_id}"),
                format!(
                    "no eligible suppliers mapped; supplier {} will be used",
                    catalog.eligibility.default_supplier()
                ),
            ));
        }
    }

    report
}

fn unique_ids(
    report: &mut ValidationReport,
    collection: &str,
    ids: impl Iterator<Item = i64>,
) -> BTreeSet<i64> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "duplicate_id",
                format!("{collection}.{id}"),
                format!("duplicate id {id} in {collection}"),
            ));
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::SupplierEligibility;

    #[test]
    fn standard_catalog_only_warns_about_unknown_supplier() {
        let report = validate_catalog(&ReferenceCatalog::standard());

        assert!(report.is_ok());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, "unknown_supplier");
        assert_eq!(report.warnings[0].path, "eligibility.202.1200");
    }

    #[test]
    fn duplicate_ids_are_errors() {
        let mut catalog = ReferenceCatalog::standard();
        let duplicate = catalog.suppliers[0].clone();
        catalog.suppliers.push(duplicate);

        let report = validate_catalog(&catalog);

        assert!(!report.is_ok());
        assert!(report.errors.iter().any(|issue| issue.code == "duplicate_id"));
    }

    #[test]
    fn unmapped_pairs_and_bad_prices_are_reported() {
        let mut catalog = ReferenceCatalog::standard();
        catalog.materials[0].base_price = Decimal::ZERO;
        catalog.eligibility = without_pair(&catalog.eligibility, (203, 1400));
        catalog.eligibility.insert(999, 1200, [1]);

        let report = validate_catalog(&catalog);

        let codes: Vec<&str> = report.errors.iter().map(|issue| issue.code.as_str()).collect();
        assert!(codes.contains(&"non_positive_base_price"));
        assert!(codes.contains(&"unknown_unit"));
        assert!(report.warnings.iter().any(|issue| {
            issue.code == "missing_eligibility" && issue.path == "eligibility.203.1400"
        }));
    }

    fn without_pair(eligibility: &SupplierEligibility, skip: (i64, i64)) -> SupplierEligibility {
        let mut trimmed = SupplierEligibility::new(eligibility.default_supplier());
        for (key, suppliers) in eligibility.entries() {
            if *key != skip {
                trimmed.insert(key.0, key.1, suppliers.iter().copied());
            }
        }
        trimmed
    }
}
