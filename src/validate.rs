//! Structural checks over built or loaded catalogs.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::{StacCatalog, StacCollection, StacItem};
use crate::constants::{EXTENSION_PREFIXES, ITEM_ASSETS_EXTENSION, STAC_VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub id: String,
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    fn error(id: &str, message: impl Into<String>) -> Self {
        ValidationIssue {
            id: id.to_string(),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(id: &str, message: impl Into<String>) -> Self {
        ValidationIssue {
            id: id.to_string(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Report extension fields whose schema is not declared.
fn check_extensions<'a>(
    id: &str,
    declared: &[String],
    fields: impl Iterator<Item = &'a String>,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut missing = BTreeSet::new();
    for field in fields {
        for (prefix, schema) in EXTENSION_PREFIXES {
            if field.starts_with(prefix) && !declared.iter().any(|d| d == schema) {
                missing.insert(schema);
            }
        }
    }
    for schema in missing {
        issues.push(ValidationIssue::error(
            id,
            format!("extension fields used without declaring {schema}"),
        ));
    }
}

fn check_version(id: &str, version: &str, issues: &mut Vec<ValidationIssue>) {
    if version != STAC_VERSION {
        issues.push(ValidationIssue::warning(
            id,
            format!("STAC version is {version}, expected {STAC_VERSION}"),
        ));
    }
}

pub fn validate_item(item: &StacItem) -> Vec<ValidationIssue> {
    let id = item.id.as_str();
    let mut issues = Vec::new();

    if item.type_ != "Feature" {
        issues.push(ValidationIssue::error(id, format!("type is {:?}, expected \"Feature\"", item.type_)));
    }
    check_version(id, &item.stac_version, &mut issues);

    match (&item.geometry, &item.bbox) {
        (None, _) => issues.push(ValidationIssue::warning(id, "Missing geometry")),
        (Some(_), None) => issues.push(ValidationIssue::error(id, "Geometry without bbox")),
        (Some(_), Some(bbox)) if bbox.len() != 4 => {
            issues.push(ValidationIssue::error(id, format!("bbox has {} values", bbox.len())))
        }
        _ => {}
    }

    let has_datetime = item.properties.get("datetime").is_some_and(|v| !v.is_null());
    let has_range = item.properties.contains_key("start_datetime")
        && item.properties.contains_key("end_datetime");
    if !has_datetime && !has_range {
        issues.push(ValidationIssue::error(id, "Missing datetime"));
    }

    if item.assets.is_empty() {
        issues.push(ValidationIssue::warning(id, "No assets"));
    }

    let fields = item
        .properties
        .keys()
        .chain(item.assets.values().flat_map(|a| a.extra.keys()));
    check_extensions(id, &item.stac_extensions, fields, &mut issues);

    issues
}

pub fn validate_collection(collection: &StacCollection) -> Vec<ValidationIssue> {
    let id = collection.id.as_str();
    let mut issues = Vec::new();

    if collection.type_ != "Collection" {
        issues.push(ValidationIssue::error(
            id,
            format!("type is {:?}, expected \"Collection\"", collection.type_),
        ));
    }
    check_version(id, &collection.stac_version, &mut issues);

    if collection.description.trim().is_empty() {
        issues.push(ValidationIssue::error(id, "Empty description"));
    }

    let bboxes = &collection.extent.spatial.bbox;
    if bboxes.len() != 1 {
        issues.push(ValidationIssue::error(id, format!("{} spatial extents, expected 1", bboxes.len())));
    }
    if bboxes.iter().any(|b| b.len() != 4) {
        issues.push(ValidationIssue::error(id, "Spatial extent bbox must have 4 values"));
    }
    if collection.extent.temporal.interval.len() != 1 {
        issues.push(ValidationIssue::error(id, "Expected exactly one temporal interval"));
    }

    if collection.extra.contains_key("item_assets")
        && !collection.stac_extensions.iter().any(|e| e == ITEM_ASSETS_EXTENSION)
    {
        issues.push(ValidationIssue::error(
            id,
            format!("item_assets used without declaring {ITEM_ASSETS_EXTENSION}"),
        ));
    }

    let fields = collection
        .summaries
        .keys()
        .chain(collection.extra.keys())
        .chain(collection.assets.values().flat_map(|a| a.extra.keys()));
    check_extensions(id, &collection.stac_extensions, fields, &mut issues);

    issues
}

/// Validate every document of the catalog.
pub fn validate_catalog(catalog: &StacCatalog) -> Vec<ValidationIssue> {
    let mut issues = validate_collection(&catalog.root);
    for child in &catalog.children {
        issues.extend(validate_collection(&child.collection));
        for item in &child.items {
            issues.extend(validate_item(item));
        }
    }
    issues
}
