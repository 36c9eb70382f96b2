//! Land cover classification values for the file and label extensions.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::tables::YearSpan;

/// One raster value and what it means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassValue {
    pub code: u32,
    pub label: String,
}

/// Which value table a dataset uses.
///
/// Yearly maps hold one class per pixel. Change maps hold a from/to pair
/// packed as `from * 100 + to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTable {
    Single,
    Change,
}

impl ValueTable {
    pub fn for_years(years: &YearSpan) -> Self {
        if years.is_range() {
            ValueTable::Change
        } else {
            ValueTable::Single
        }
    }

    pub fn values(&self, classes: &BTreeMap<u32, String>) -> Vec<ClassValue> {
        match self {
            ValueTable::Single => classes
                .iter()
                .map(|(&code, label)| ClassValue {
                    code,
                    label: label.clone(),
                })
                .collect(),
            ValueTable::Change => classes
                .iter()
                .flat_map(|(&from, from_label)| {
                    classes.iter().map(move |(&to, to_label)| ClassValue {
                        code: change_code(from, to),
                        label: format!("{from_label} to {to_label}"),
                    })
                })
                .collect(),
        }
    }

    pub fn codes(&self, classes: &BTreeMap<u32, String>) -> Vec<u32> {
        self.values(classes).into_iter().map(|v| v.code).collect()
    }
}

/// Packs a transition; unique while both codes are below
/// [`MAX_CLASS_CODE`](crate::tables::MAX_CLASS_CODE).
pub fn change_code(from: u32, to: u32) -> u32 {
    from * 100 + to
}

/// `file:values` entries.
pub fn file_values(values: &[ClassValue]) -> Value {
    Value::Array(
        values
            .iter()
            .map(|v| json!({ "values": [v.code], "summary": v.label }))
            .collect(),
    )
}

/// `label:classes` for a raster label: one unnamed class list.
pub fn label_classes(codes: &[u32]) -> Value {
    json!([{ "name": null, "classes": codes }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::Tables;

    #[test]
    fn test_single_year_has_one_value_per_class() {
        let tables = Tables::builtin();
        let values = ValueTable::Single.values(&tables.classes);
        assert_eq!(values.len(), 19);
        assert_eq!(values[0].code, 1);
        assert_eq!(values[17].label, "Water");
    }

    #[test]
    fn test_change_pairs_every_class() {
        let tables = Tables::builtin();
        let values = ValueTable::Change.values(&tables.classes);
        assert_eq!(values.len(), 19 * 19);

        let water_to_urban = values
            .iter()
            .find(|v| v.code == change_code(18, 17))
            .unwrap();
        assert_eq!(water_to_urban.code, 1817);
        assert_eq!(water_to_urban.label, "Water to Urban");
    }

    #[test]
    fn test_change_codes_are_unique() {
        let tables = Tables::builtin();
        let mut codes = ValueTable::Change.codes(&tables.classes);
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 361);
    }

    #[test]
    fn test_value_table_follows_year_span() {
        assert_eq!(
            ValueTable::for_years(&YearSpan::Single(2015)),
            ValueTable::Single
        );
        assert_eq!(
            ValueTable::for_years(&YearSpan::Range(2010, 2015)),
            ValueTable::Change
        );
    }

    #[test]
    fn test_extension_json_shapes() {
        let values = vec![ClassValue {
            code: 18,
            label: "Water".to_string(),
        }];
        assert_eq!(
            file_values(&values),
            json!([{ "values": [18], "summary": "Water" }])
        );
        assert_eq!(
            label_classes(&[1, 2]),
            json!([{ "name": null, "classes": [1, 2] }])
        );
    }
}
