//! STAC document types and the on-disk catalog layout.
//!
//! A catalog is written as
//!
//! ```text
//! {dest}/collection.json                       root collection
//! {dest}/{child}/collection.json               region or period collection
//! {dest}/{child}/{item}/{item}.json            items
//! ```
//!
//! with relative links between the documents.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use geojson::Geometry;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::constants::{MEDIA_TYPE_GEOJSON, MEDIA_TYPE_JSON};
use crate::error::{Error, Result};

const COLLECTION_FILE: &str = "collection.json";

/// STAC Collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StacCollection {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
    pub stac_version: String,
    #[serde(default)]
    pub stac_extensions: Vec<String>,
    pub title: Option<String>,
    pub description: String,
    pub license: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<Provider>,
    pub extent: Extent,
    #[serde(default)]
    pub summaries: BTreeMap<String, Value>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<String, Asset>,
    /// Extension fields such as `sci:citation` and `item_assets`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// STAC Item (Feature)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StacItem {
    #[serde(rename = "type")]
    pub type_: String,
    pub stac_version: String,
    #[serde(default)]
    pub stac_extensions: Vec<String>,
    pub id: String,
    pub geometry: Option<Geometry>,
    pub bbox: Option<Vec<f64>>,
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

/// STAC Provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// STAC Extent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub spatial: SpatialExtent,
    pub temporal: TemporalExtent,
}

/// Spatial Extent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
    pub bbox: Vec<Vec<f64>>,
}

/// Temporal Extent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalExtent {
    pub interval: Vec<Vec<Option<String>>>,
}

/// STAC Link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    pub fn new(rel: &str, href: impl Into<String>, media_type: &str) -> Self {
        Link {
            rel: rel.to_string(),
            href: href.into(),
            type_: Some(media_type.to_string()),
            title: None,
        }
    }

    pub fn with_title(mut self, title: Option<&str>) -> Self {
        self.title = title.map(str::to_string);
        self
    }
}

/// STAC Asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub href: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Extension fields such as `file:size` and `raster:bands`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Asset {
    pub fn new(href: impl Into<String>, media_type: &str, title: impl Into<String>, role: &str) -> Self {
        Asset {
            href: href.into(),
            type_: Some(media_type.to_string()),
            title: Some(title.into()),
            description: None,
            roles: vec![role.to_string()],
            extra: Map::new(),
        }
    }
}

// =============================================================================
// Catalog tree
// =============================================================================

/// A sub-collection with the items directly below it.
#[derive(Debug, Clone)]
pub struct ChildCollection {
    pub collection: StacCollection,
    pub items: Vec<StacItem>,
}

/// Root collection, its sub-collections and their items.
#[derive(Debug, Clone)]
pub struct StacCatalog {
    pub root: StacCollection,
    pub children: Vec<ChildCollection>,
}

/// Counts of documents written by [`StacCatalog::write_to_dir`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub collections: usize,
    pub items: usize,
}

impl StacCatalog {
    pub fn item_count(&self) -> usize {
        self.children.iter().map(|c| c.items.len()).sum()
    }

    /// Iterate every item with the id of its parent collection.
    pub fn items(&self) -> impl Iterator<Item = (&StacCollection, &StacItem)> {
        self.children
            .iter()
            .flat_map(|c| c.items.iter().map(move |item| (&c.collection, item)))
    }

    /// Write the catalog under `dir`, wiring links between documents.
    ///
    /// `self` links are only written when `base_url` is given, since relative
    /// self links are not allowed.
    pub fn write_to_dir(&self, dir: &Path, base_url: Option<&str>) -> Result<WriteSummary> {
        let self_href = |path: &str| {
            base_url.map(|base| format!("{}/{}", base.trim_end_matches('/'), path))
        };

        let mut root = self.root.clone();
        root.links = vec![Link::new("root", format!("./{COLLECTION_FILE}"), MEDIA_TYPE_JSON)
            .with_title(root.title.as_deref())];
        if let Some(href) = self_href(COLLECTION_FILE) {
            root.links.push(Link::new("self", href, MEDIA_TYPE_JSON));
        }

        let mut items_written = 0;
        for child in &self.children {
            let child_id = &child.collection.id;
            root.links.push(
                Link::new("child", format!("./{child_id}/{COLLECTION_FILE}"), MEDIA_TYPE_JSON)
                    .with_title(child.collection.title.as_deref()),
            );

            let mut collection = child.collection.clone();
            collection.links = vec![
                Link::new("root", format!("../{COLLECTION_FILE}"), MEDIA_TYPE_JSON)
                    .with_title(root.title.as_deref()),
                Link::new("parent", format!("../{COLLECTION_FILE}"), MEDIA_TYPE_JSON)
                    .with_title(root.title.as_deref()),
            ];
            if let Some(href) = self_href(&format!("{child_id}/{COLLECTION_FILE}")) {
                collection.links.push(Link::new("self", href, MEDIA_TYPE_JSON));
            }

            for item in &child.items {
                let item_id = &item.id;
                collection.links.push(Link::new(
                    "item",
                    format!("./{item_id}/{item_id}.json"),
                    MEDIA_TYPE_GEOJSON,
                ));

                let mut item = item.clone();
                item.collection = Some(child_id.clone());
                item.links = vec![
                    Link::new("root", format!("../../{COLLECTION_FILE}"), MEDIA_TYPE_JSON)
                        .with_title(root.title.as_deref()),
                    Link::new("parent", format!("../{COLLECTION_FILE}"), MEDIA_TYPE_JSON)
                        .with_title(collection.title.as_deref()),
                    Link::new("collection", format!("../{COLLECTION_FILE}"), MEDIA_TYPE_JSON)
                        .with_title(collection.title.as_deref()),
                ];
                if let Some(href) = self_href(&format!("{child_id}/{item_id}/{item_id}.json")) {
                    item.links.push(Link::new("self", href, MEDIA_TYPE_GEOJSON));
                }

                let item_path = dir.join(child_id).join(item_id).join(format!("{item_id}.json"));
                write_json(&item_path, &item)?;
                debug!("Wrote item {:?}", item_path);
                items_written += 1;
            }

            write_json(&dir.join(child_id).join(COLLECTION_FILE), &collection)?;
            info!("Wrote collection {} with {} items", child_id, child.items.len());
        }

        write_json(&dir.join(COLLECTION_FILE), &root)?;
        info!("Wrote root collection {} to {:?}", root.id, dir);

        Ok(WriteSummary {
            collections: self.children.len() + 1,
            items: items_written,
        })
    }

    /// Load a catalog written by [`StacCatalog::write_to_dir`], following
    /// `child` and `item` links.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let root_path = dir.join(COLLECTION_FILE);
        info!("Loading catalog from {:?}", root_path);
        let root: StacCollection = read_json(&root_path)?;

        let mut children = Vec::new();
        for link in root.links.iter().filter(|l| l.rel == "child") {
            let child_path = dir.join(&link.href);
            let child_dir = child_path.parent().unwrap_or(dir);
            let collection: StacCollection = read_json(&child_path)?;
            debug!("Loaded collection {}", collection.id);

            let items = collection
                .links
                .iter()
                .filter(|l| l.rel == "item")
                .map(|l| read_json::<StacItem>(&child_dir.join(&l.href)))
                .collect::<Result<Vec<_>>>()?;

            children.push(ChildCollection { collection, items });
        }

        let catalog = StacCatalog { root, children };
        info!(
            "Loaded {} collections with {} items",
            catalog.children.len() + 1,
            catalog.item_count()
        );
        Ok(catalog)
    }
}

/// Serialize `value` as pretty JSON at `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| Error::json(path, e))?;
    fs::write(path, json).map_err(|e| Error::io(path, e))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&json).map_err(|e| Error::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_item() {
        let json = r#"{
            "type": "Feature",
            "stac_version": "1.0.0",
            "id": "NA_2015_30m",
            "geometry": null,
            "bbox": null,
            "properties": {
                "datetime": "2015-01-01T00:00:00Z"
            },
            "links": [],
            "assets": {
                "data": {
                    "href": "land_cover_2015v2_30m_tif.zip",
                    "type": "application/zip",
                    "roles": ["data"],
                    "file:size": 1024
                }
            },
            "collection": "nalcms-yearly"
        }"#;

        let item: StacItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "NA_2015_30m");
        assert_eq!(item.collection, Some("nalcms-yearly".to_string()));
        assert_eq!(item.assets["data"].extra["file:size"], 1024);
    }

    #[test]
    fn test_asset_extension_fields_are_flattened() {
        let mut asset = Asset::new("data.zip", "application/zip", "Data", "data");
        asset.extra.insert("file:size".to_string(), Value::from(42));

        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["file:size"], 42);
        assert_eq!(json["roles"][0], "data");
        assert!(json.get("extra").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_write_json_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("link.json");
        write_json(&path, &Link::new("root", "./collection.json", MEDIA_TYPE_JSON)).unwrap();

        let link: Link = read_json(&path).unwrap();
        assert_eq!(link.rel, "root");
        assert_eq!(link.type_.as_deref(), Some(MEDIA_TYPE_JSON));
    }
}
