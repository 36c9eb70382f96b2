//! STAC Collection construction and catalog assembly.
//!
//! Root, per-region and per-period collections share one builder. They only
//! differ in which dataset keys they aggregate ([`CollectionKind::contains`])
//! and in their texts; the root additionally carries citation, provider and
//! asset metadata.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::assets::item_assets;
use crate::catalog::{
    Asset, ChildCollection, Extent, Provider, SpatialExtent, StacCatalog, StacCollection,
    TemporalExtent,
};
use crate::classes::{label_classes, ValueTable};
use crate::constants::{
    DESCRIPTION, ID, ITEM_ASSETS_EXTENSION, KEYWORDS, LABEL_EXTENSION, LICENSE,
    MEDIA_TYPE_PDF, PROJECTION_EXTENSION, SCIENTIFIC_EXTENSION, STAC_VERSION, TITLE,
};
use crate::error::{Error, Result};
use crate::extent::bounding_extent;
use crate::item::{create_item_for_key, timestamp, year_bounds};
use crate::tables::{DatasetKey, Satellite, Tables, YearSpan};

/// Grouping of datasets by the kind of map they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Yearly,
    Change,
}

impl Period {
    pub const ALL: [Period; 2] = [Period::Yearly, Period::Change];

    pub fn name(&self) -> &'static str {
        match self {
            Period::Yearly => "yearly",
            Period::Change => "change",
        }
    }

    pub fn contains(&self, years: &YearSpan) -> bool {
        match self {
            Period::Yearly => !years.is_range(),
            Period::Change => years.is_range(),
        }
    }
}

/// Which collection to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionKind {
    Root,
    Region(String),
    Period(Period),
}

impl CollectionKind {
    /// Whether `key` is aggregated into this collection.
    pub fn contains(&self, key: &DatasetKey) -> bool {
        match self {
            CollectionKind::Root => true,
            CollectionKind::Region(region) => key.region == *region,
            CollectionKind::Period(period) => period.contains(&key.years),
        }
    }

    pub fn id(&self) -> String {
        match self {
            CollectionKind::Root => ID.to_string(),
            CollectionKind::Region(region) => format!("{ID}-{}", region.to_lowercase()),
            CollectionKind::Period(period) => format!("{ID}-{}", period.name()),
        }
    }

    fn title(&self, tables: &Tables) -> String {
        match self {
            CollectionKind::Root => TITLE.to_string(),
            CollectionKind::Region(region) => {
                format!("NALCMS for {}", tables.region_name(region))
            }
            CollectionKind::Period(Period::Yearly) => "NALCMS land cover".to_string(),
            CollectionKind::Period(Period::Change) => "NALCMS land cover change".to_string(),
        }
    }

    fn description(&self, tables: &Tables) -> String {
        match self {
            CollectionKind::Root => DESCRIPTION.to_string(),
            CollectionKind::Region(region) => {
                format!("Land classification for {}", tables.region_name(region))
            }
            CollectionKind::Period(Period::Yearly) => {
                "Land cover of North America for single years".to_string()
            }
            CollectionKind::Period(Period::Change) => {
                "Land cover transitions in North America between two years".to_string()
            }
        }
    }
}

fn providers() -> Vec<Provider> {
    vec![Provider {
        name: "Natural Resources Canada/ Canada Centre Mapping and Earth Observation".to_string(),
        roles: vec!["producer".into(), "processor".into(), "host".into()],
        url: Some(
            "https://www.nrcan.gc.ca/maps-tools-publications/satellite-imagery-air-photos/application-development/land-cover-products/21759"
                .to_string(),
        ),
    }]
}

/// Flatten one list field over every satellite.
fn satellite_summary(tables: &Tables, field: impl Fn(&Satellite) -> &Vec<String>) -> Value {
    json!(tables
        .satellites
        .values()
        .flat_map(|s| field(s).iter().cloned())
        .collect::<Vec<_>>())
}

/// Build the collection of `kind` over the keys it contains.
///
/// Fails with [`Error::EmptyExtent`] when no key matches.
pub fn create_collection(tables: &Tables, kind: &CollectionKind) -> Result<StacCollection> {
    let keys: Vec<&DatasetKey> = tables.keys().filter(|k| kind.contains(k)).collect();
    let extents: Vec<[f64; 4]> = keys
        .iter()
        .filter_map(|k| tables.dataset(k))
        .map(|d| d.extent)
        .collect();
    let bbox = bounding_extent(&extents)?;

    let start = keys.iter().map(|k| k.years.first()).min().ok_or(Error::EmptyExtent)?;
    let end = keys.iter().map(|k| k.years.last()).max().ok_or(Error::EmptyExtent)?;
    let (start, end) = year_bounds(&YearSpan::Range(start, end))?;

    let mut gsd: Vec<u32> = keys.iter().map(|k| k.resolution).collect();
    gsd.sort_unstable();
    gsd.dedup();

    let mut epsg: Vec<Option<u32>> = keys
        .iter()
        .filter_map(|k| tables.dataset(k))
        .map(|d| d.projection.epsg)
        .collect();
    epsg.sort_unstable();
    epsg.dedup();

    let mut value_tables: Vec<ValueTable> = Vec::new();
    for key in &keys {
        let table = ValueTable::for_years(&key.years);
        if !value_tables.contains(&table) {
            value_tables.push(table);
        }
    }
    let codes: Vec<u32> = value_tables
        .iter()
        .flat_map(|t| t.codes(&tables.classes))
        .collect();

    let mut summaries = BTreeMap::new();
    summaries.insert("platform".to_string(), satellite_summary(tables, |s| &s.platform));
    summaries.insert("instruments".to_string(), satellite_summary(tables, |s| &s.instruments));
    summaries.insert(
        "constellation".to_string(),
        satellite_summary(tables, |s| &s.constellation),
    );
    summaries.insert("gsd".to_string(), json!(gsd));
    summaries.insert("proj:epsg".to_string(), json!(epsg));
    summaries.insert("label:type".to_string(), json!(["raster"]));
    summaries.insert("label:tasks".to_string(), json!(["classification"]));
    summaries.insert("label:classes".to_string(), label_classes(&codes));

    let mut collection = StacCollection {
        type_: "Collection".to_string(),
        id: kind.id(),
        stac_version: STAC_VERSION.to_string(),
        stac_extensions: vec![PROJECTION_EXTENSION.to_string(), LABEL_EXTENSION.to_string()],
        title: Some(kind.title(tables)),
        description: kind.description(tables),
        license: LICENSE.to_string(),
        keywords: Vec::new(),
        providers: Vec::new(),
        extent: Extent {
            spatial: SpatialExtent {
                bbox: vec![bbox.to_vec()],
            },
            temporal: TemporalExtent {
                interval: vec![vec![Some(timestamp(&start)), Some(timestamp(&end))]],
            },
        },
        summaries,
        links: Vec::new(),
        assets: BTreeMap::new(),
        extra: serde_json::Map::new(),
    };

    if *kind == CollectionKind::Root {
        collection.stac_extensions.push(SCIENTIFIC_EXTENSION.to_string());
        collection.stac_extensions.push(ITEM_ASSETS_EXTENSION.to_string());
        collection.keywords = KEYWORDS.iter().map(|k| k.to_string()).collect();
        collection.providers = providers();
        collection
            .extra
            .insert("sci:citation".to_string(), json!(tables.citation));
        if let Some(doi) = &tables.doi {
            collection.extra.insert("sci:doi".to_string(), json!(doi));
        }
        collection.extra.insert("item_assets".to_string(), item_assets());

        for product in tables.metadata.keys() {
            if let Some(href) = tables.metadata_href(product) {
                collection.assets.insert(
                    format!("metadata_{product}"),
                    Asset::new(href, MEDIA_TYPE_PDF, format!("Metadata for {product}"), "metadata"),
                );
            }
        }
    }

    Ok(collection)
}

/// How the root collection's children are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Period,
    Region,
}

/// Build the root collection, its children and every published item.
///
/// `sources` maps item ids to local COG paths used as data asset hrefs.
pub fn build_catalog(
    tables: &Tables,
    grouping: Grouping,
    sources: &BTreeMap<String, String>,
) -> Result<StacCatalog> {
    let root = create_collection(tables, &CollectionKind::Root)?;

    let kinds: Vec<CollectionKind> = match grouping {
        Grouping::Period => Period::ALL.into_iter().map(CollectionKind::Period).collect(),
        Grouping::Region => tables
            .regions
            .keys()
            .cloned()
            .map(CollectionKind::Region)
            .collect(),
    };

    for key in tables.combinations() {
        if tables.dataset(&key).is_none() {
            info!("{} was not published, skipping", key);
        }
    }

    let mut children = Vec::new();
    for kind in kinds {
        let mut items = Vec::new();
        for key in tables.keys().filter(|k| kind.contains(k)) {
            let source = sources.get(&key.item_id()).map(String::as_str);
            items.extend(create_item_for_key(tables, key, source)?);
        }

        if items.is_empty() {
            warn!("No datasets for collection {}, skipping", kind.id());
            continue;
        }

        let collection = create_collection(tables, &kind)?;
        info!("Built collection {} with {} items", collection.id, items.len());
        children.push(ChildCollection { collection, items });
    }

    Ok(StacCatalog { root, children })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_collection_summaries() {
        let tables = Tables::builtin();
        let root = create_collection(&tables, &CollectionKind::Root).unwrap();

        assert_eq!(root.id, "nalcms");
        assert_eq!(
            root.title.as_deref(),
            Some("North American Land Change Monitoring System data")
        );
        assert!(root.description.starts_with("This Land Cover change map shows class transitions"));
        assert_eq!(root.providers.len(), 1);
        assert_eq!(
            root.providers[0].name,
            "Natural Resources Canada/ Canada Centre Mapping and Earth Observation"
        );
        assert_eq!(root.providers[0].roles, vec!["producer", "processor", "host"]);
        assert_eq!(root.summaries["gsd"], json!([30, 250]));
        assert_eq!(root.summaries["proj:epsg"], json!([null]));
        assert_eq!(root.summaries["constellation"], json!(["landsat", "rapideye"]));
        assert!(root.summaries["platform"]
            .as_array()
            .unwrap()
            .contains(&json!("terra")));
        assert!(root.extra.contains_key("sci:citation"));
        assert!(!root.extra.contains_key("sci:doi"));
        assert_eq!(root.extra["item_assets"].as_object().unwrap().len(), 6);
        assert_eq!(root.assets.len(), tables.metadata.len());
        assert!(root.stac_extensions.contains(&SCIENTIFIC_EXTENSION.to_string()));
        assert_eq!(
            root.extent.temporal.interval,
            vec![vec![
                Some("2005-01-01T00:00:00Z".to_string()),
                Some("2015-12-31T00:00:00Z".to_string())
            ]]
        );
    }

    #[test]
    fn test_root_epsg_summary_is_union_of_keys() {
        let mut tables = Tables::builtin();
        let codes = [Some(3978), Some(6350), None];
        for (i, dataset) in tables.datasets.values_mut().enumerate() {
            dataset.projection.epsg = codes[i % codes.len()];
        }

        let root = create_collection(&tables, &CollectionKind::Root).unwrap();
        assert_eq!(root.summaries["proj:epsg"], json!([null, 3978, 6350]));
    }

    #[test]
    fn test_period_collections_filter_by_year_kind() {
        let tables = Tables::builtin();

        let yearly = create_collection(&tables, &CollectionKind::Period(Period::Yearly)).unwrap();
        assert_eq!(yearly.id, "nalcms-yearly");
        let classes = &yearly.summaries["label:classes"][0]["classes"];
        assert_eq!(classes.as_array().unwrap().len(), 19);
        assert!(yearly.summaries.contains_key("proj:epsg"));
        assert!(yearly.summaries.contains_key("label:type"));
        assert!(yearly.summaries.contains_key("label:tasks"));

        let change = create_collection(&tables, &CollectionKind::Period(Period::Change)).unwrap();
        let classes = &change.summaries["label:classes"][0]["classes"];
        assert_eq!(classes.as_array().unwrap().len(), 361);
        assert_eq!(
            change.extent.temporal.interval[0][0].as_deref(),
            Some("2005-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_region_collection_uses_region_extent() {
        let tables = Tables::builtin();
        let mexico = create_collection(&tables, &CollectionKind::Region("MEX".into())).unwrap();
        assert_eq!(mexico.id, "nalcms-mex");
        assert_eq!(mexico.title.as_deref(), Some("NALCMS for Mexico"));
        assert_eq!(mexico.extent.spatial.bbox, vec![vec![-118.4, 14.5, -86.7, 32.7]]);
        assert_eq!(mexico.summaries["gsd"], json!([30]));
    }

    #[test]
    fn test_empty_group_fails() {
        let tables = Tables::builtin();
        let err = create_collection(&tables, &CollectionKind::Region("GRL".into())).unwrap_err();
        assert!(matches!(err, Error::EmptyExtent));
    }

    #[test]
    fn test_build_catalog_by_period() {
        let tables = Tables::builtin();
        let mut sources = BTreeMap::new();
        sources.insert("NA_2015_30m".to_string(), "cogs/NA_2015_30m.tif".to_string());

        let catalog = build_catalog(&tables, Grouping::Period, &sources).unwrap();
        assert_eq!(catalog.children.len(), 2);
        assert_eq!(catalog.item_count(), tables.datasets.len());

        let (_, item) = catalog.items().find(|(_, i)| i.id == "NA_2015_30m").unwrap();
        assert_eq!(item.assets["data"].href, "cogs/NA_2015_30m.tif");

        for (collection, item) in catalog.items() {
            let is_change = item.id.contains('-');
            assert_eq!(collection.id == "nalcms-change", is_change, "{}", item.id);
        }
    }

    #[test]
    fn test_build_catalog_by_region() {
        let tables = Tables::builtin();
        let catalog = build_catalog(&tables, Grouping::Region, &BTreeMap::new()).unwrap();
        assert_eq!(catalog.children.len(), 4);

        let na = catalog
            .children
            .iter()
            .find(|c| c.collection.id == "nalcms-na")
            .unwrap();
        assert_eq!(na.items.len(), 6);
        assert_eq!(na.collection.summaries["gsd"], json!([30, 250]));
    }

    #[test]
    fn test_build_catalog_includes_datasets_outside_listed_years() {
        let mut tables = Tables::builtin();
        let template = DatasetKey::new("NA", 30, "2015").unwrap();
        let dataset = tables.datasets[&template].clone();
        let extra = DatasetKey::new("NA", 30, "2020").unwrap();
        tables.datasets.insert(extra.clone(), dataset);
        assert!(!tables.years.contains(&extra.years));

        let catalog = build_catalog(&tables, Grouping::Period, &BTreeMap::new()).unwrap();
        assert_eq!(catalog.item_count(), tables.datasets.len());
        assert!(catalog.items().any(|(_, i)| i.id == "NA_2020_30m"));
        assert_eq!(
            catalog.root.extent.temporal.interval[0][1].as_deref(),
            Some("2020-12-31T00:00:00Z")
        );
    }
}
