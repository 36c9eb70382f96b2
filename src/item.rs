//! STAC Item construction for one dataset.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::catalog::{Asset, StacItem};
use crate::classes::{file_values, label_classes, ValueTable};
use crate::constants::{
    FILE_EXTENSION, LABEL_EXTENSION, MEDIA_TYPE_COG, MEDIA_TYPE_PDF, MEDIA_TYPE_ZIP,
    PROJECTION_EXTENSION, RASTER_EXTENSION, STAC_VERSION,
};
use crate::error::{Error, Result};
use crate::extent::bbox_to_polygon;
use crate::tables::{DatasetKey, Tables, YearSpan};

/// Build the item for `(region, resolution, year)`.
///
/// Returns `Ok(None)` when the combination was never published. `source` is
/// a local COG path that replaces the remote zip archive as the data asset.
pub fn create_item(
    tables: &Tables,
    region: &str,
    resolution: u32,
    year: &str,
    source: Option<&str>,
) -> Result<Option<StacItem>> {
    let key = DatasetKey::new(region, resolution, year)?;
    create_item_for_key(tables, &key, source)
}

/// Build the item for an already parsed key; `Ok(None)` if the key is absent.
pub fn create_item_for_key(
    tables: &Tables,
    key: &DatasetKey,
    source: Option<&str>,
) -> Result<Option<StacItem>> {
    let Some(dataset) = tables.dataset(key) else {
        debug!("No dataset for {}", key);
        return Ok(None);
    };

    let region_name = tables.region_name(&key.region);
    let change = if key.years.is_range() { "change " } else { "" };
    let (start, end) = year_bounds(&key.years)?;

    let mut properties = Map::new();
    properties.insert(
        "title".into(),
        json!(format!(
            "{} land cover {}({}, {} m)",
            key.region, change, key.years, key.resolution
        )),
    );
    properties.insert(
        "description".into(),
        json!(format!(
            "Land cover {}for {} over {} ({} m)",
            change, key.years, region_name, key.resolution
        )),
    );
    properties.insert("datetime".into(), json!(timestamp(&start)));
    properties.insert("start_datetime".into(), json!(timestamp(&start)));
    properties.insert("end_datetime".into(), json!(timestamp(&end)));
    properties.insert("gsd".into(), json!(key.resolution));

    // Projection
    let proj = &dataset.projection;
    properties.insert("proj:epsg".into(), json!(proj.epsg));
    properties.insert("proj:wkt2".into(), json!(proj.wkt2));
    properties.insert("proj:transform".into(), json!(proj.transform));
    properties.insert("proj:bbox".into(), json!(proj.bbox));
    properties.insert("proj:shape".into(), json!(proj.shape));

    // Label
    let value_table = ValueTable::for_years(&key.years);
    let values = value_table.values(&tables.classes);
    let codes: Vec<u32> = values.iter().map(|v| v.code).collect();
    properties.insert("label:type".into(), json!("raster"));
    properties.insert("label:tasks".into(), json!(["classification"]));
    properties.insert("label:properties".into(), Value::Null);
    let label_description = match value_table {
        ValueTable::Single => "Land cover class",
        ValueTable::Change => "Land cover class transition, coded as from * 100 + to",
    };
    properties.insert("label:description".into(), json!(label_description));
    properties.insert("label:classes".into(), label_classes(&codes));

    let mut assets = BTreeMap::new();

    if let Some(href) = tables.metadata_href(&key.product_id()) {
        assets.insert(
            "metadata".to_string(),
            Asset::new(
                href,
                MEDIA_TYPE_PDF,
                format!("Metadata for land cover {}for {} ({} m)", change, key.years, key.resolution),
                "metadata",
            ),
        );
    }

    let (data_href, media_type) = match source {
        Some(path) => (path.to_string(), MEDIA_TYPE_COG),
        None => (tables.archive_href(dataset), MEDIA_TYPE_ZIP),
    };
    let mut data = Asset::new(
        data_href,
        media_type,
        format!(
            "Land cover {}over {} for {} ({} m)",
            change, region_name, key.years, key.resolution
        ),
        "data",
    );
    data.extra.insert(
        "raster:bands".into(),
        json!([{
            "nodata": dataset.nodata,
            "sampling": "area",
            "data_type": dataset.data_type,
            "spatial_resolution": key.resolution,
        }]),
    );
    data.extra.insert("file:size".into(), json!(dataset.file_size));
    data.extra.insert("file:values".into(), file_values(&values));
    assets.insert("data".to_string(), data);

    Ok(Some(StacItem {
        type_: "Feature".to_string(),
        stac_version: STAC_VERSION.to_string(),
        stac_extensions: vec![
            PROJECTION_EXTENSION.to_string(),
            RASTER_EXTENSION.to_string(),
            FILE_EXTENSION.to_string(),
            LABEL_EXTENSION.to_string(),
        ],
        id: key.item_id(),
        geometry: Some(bbox_to_polygon(&dataset.extent)),
        bbox: Some(dataset.extent.to_vec()),
        properties,
        links: Vec::new(),
        assets,
        collection: None,
    }))
}

/// Midnight UTC on January 1st of the first year and December 31st of the last.
///
/// Fails with [`Error::InvalidYear`] for years chrono cannot represent.
pub fn year_bounds(years: &YearSpan) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    Ok((
        midnight(years.first(), 1, 1)?,
        midnight(years.last(), 12, 31)?,
    ))
}

fn midnight(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| Error::InvalidYear(year.to_string()))
}

pub fn timestamp(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_asset(item: &StacItem) -> &Asset {
        &item.assets["data"]
    }

    #[test]
    fn test_create_item_change_with_cog() {
        let tables = Tables::builtin();
        let item = create_item(&tables, "NA", 30, "2010-2015", Some("cog.tif"))
            .unwrap()
            .unwrap();

        assert_eq!(item.id, "NA_2010-2015_30m");
        assert_eq!(item.properties["start_datetime"], "2010-01-01T00:00:00Z");
        assert_eq!(item.properties["end_datetime"], "2015-12-31T00:00:00Z");

        let data = data_asset(&item);
        assert_eq!(data.href, "cog.tif");
        assert_eq!(data.type_.as_deref(), Some(MEDIA_TYPE_COG));
        assert_eq!(data.roles, vec!["data"]);
        assert_eq!(data.extra["file:values"].as_array().unwrap().len(), 19 * 19);
        assert!(item.assets.contains_key("metadata"));
    }

    #[test]
    fn test_create_item_without_source_uses_remote_archive() {
        let tables = Tables::builtin();
        let key = DatasetKey::new("MEX", 30, "2015").unwrap();
        let item = create_item_for_key(&tables, &key, None).unwrap().unwrap();

        let data = data_asset(&item);
        assert_eq!(data.href, tables.archive_href(tables.dataset(&key).unwrap()));
        assert_eq!(data.type_.as_deref(), Some(MEDIA_TYPE_ZIP));
        assert_eq!(data.extra["file:values"].as_array().unwrap().len(), 19);
        assert_eq!(item.properties["start_datetime"], "2015-01-01T00:00:00Z");
        assert_eq!(item.properties["end_datetime"], "2015-12-31T00:00:00Z");
    }

    #[test]
    fn test_missing_combination_yields_none() {
        let tables = Tables::builtin();
        let item = create_item(&tables, "CAN", 250, "2010", None).unwrap();
        assert!(item.is_none());
    }

    #[test]
    fn test_malformed_year_is_an_error() {
        let tables = Tables::builtin();
        let err = create_item(&tables, "NA", 30, "2010/2015", None).unwrap_err();
        assert!(matches!(err, Error::InvalidYear(_)));
    }

    #[test]
    fn test_every_valid_key_builds_a_complete_item() {
        let tables = Tables::builtin();
        for key in tables.keys() {
            let item = create_item_for_key(&tables, key, None).unwrap().unwrap();
            assert_eq!(
                item.id,
                format!("{}_{}_{}m", key.region, key.years, key.resolution)
            );

            let bands = data_asset(&item).extra["raster:bands"].as_array().unwrap();
            assert_eq!(bands.len(), 1, "{key}");
            assert!(!bands[0]["data_type"].is_null(), "{key}");
            assert_eq!(bands[0]["sampling"], "area");
            assert_eq!(bands[0]["spatial_resolution"], key.resolution);

            let expected = if key.years.is_range() { 361 } else { 19 };
            let classes = &item.properties["label:classes"][0]["classes"];
            assert_eq!(classes.as_array().unwrap().len(), expected, "{key}");

            for field in ["proj:epsg", "proj:bbox", "proj:transform", "proj:shape"] {
                assert!(item.properties.contains_key(field), "{key} {field}");
            }
            for field in ["label:type", "label:tasks", "label:properties", "label:description"] {
                assert!(item.properties.contains_key(field), "{key} {field}");
            }
            assert!(data_asset(&item).extra.contains_key("file:size"));

            let dataset = tables.dataset(key).unwrap();
            assert_eq!(data_asset(&item).href, tables.archive_href(dataset));
            let cog = format!("cogs/{}.tif", key.item_id());
            let with_source = create_item_for_key(&tables, key, Some(cog.as_str()))
                .unwrap()
                .unwrap();
            assert_eq!(data_asset(&with_source).href, cog);
        }
    }

    #[test]
    fn test_item_geometry_matches_bbox() {
        let tables = Tables::builtin();
        let item = create_item(&tables, "CAN", 30, "2010", None).unwrap().unwrap();
        let bbox = item.bbox.clone().unwrap();
        assert_eq!(bbox, vec![-141.0, 41.7, -52.6, 83.1]);

        let geometry = serde_json::to_value(item.geometry.as_ref().unwrap()).unwrap();
        assert_eq!(geometry["type"], "Polygon");
        assert_eq!(geometry["coordinates"][0][0], json!([-141.0, 41.7]));
    }

    #[test]
    fn test_north_america_footprint_follows_metadata_bounds() {
        let tables = Tables::builtin();
        let item = create_item(&tables, "NA", 250, "2005", None).unwrap().unwrap();
        assert_eq!(item.bbox, Some(vec![-170.0, 14.0, -50.0, 84.0]));
    }

    #[test]
    fn test_year_bounds_cover_whole_years() {
        let (start, end) = year_bounds(&YearSpan::Range(2005, 2010)).unwrap();
        assert_eq!(timestamp(&start), "2005-01-01T00:00:00Z");
        assert_eq!(timestamp(&end), "2010-12-31T00:00:00Z");

        let (start, end) = year_bounds(&YearSpan::Single(2015)).unwrap();
        assert!(start < end);
    }

    #[test]
    fn test_year_beyond_chrono_range_is_an_error() {
        let err = year_bounds(&YearSpan::Single(300_000)).unwrap_err();
        assert!(matches!(err, Error::InvalidYear(ref year) if year == "300000"));

        let mut tables = Tables::builtin();
        let key = DatasetKey::new("NA", 30, "2015").unwrap();
        let dataset = tables.datasets[&key].clone();
        let far = DatasetKey {
            years: YearSpan::Range(2015, 300_000),
            ..key
        };
        tables.datasets.insert(far.clone(), dataset);
        assert!(create_item_for_key(&tables, &far, None).is_err());
    }
}
