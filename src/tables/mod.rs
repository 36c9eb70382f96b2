//! Lookup tables describing every published NALCMS dataset.
//!
//! All tables are plain data keyed by [`DatasetKey`]. They are built once,
//! either from the compiled-in [`Tables::builtin`] data or from a JSON file
//! with the same shape, and then passed by reference to the builders.

mod builtin;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::HREF_DIR;
use crate::error::{Error, Result};

/// Class codes stay below this so that change codes (`from * 100 + to`) are unique.
pub const MAX_CLASS_CODE: u32 = 100;

// =============================================================================
// Keys
// =============================================================================

/// The year component of a dataset: one year, or a `start-end` change range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum YearSpan {
    Single(i32),
    Range(i32, i32),
}

impl YearSpan {
    pub fn first(&self) -> i32 {
        match *self {
            YearSpan::Single(year) | YearSpan::Range(year, _) => year,
        }
    }

    pub fn last(&self) -> i32 {
        match *self {
            YearSpan::Single(year) | YearSpan::Range(_, year) => year,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, YearSpan::Range(..))
    }
}

impl fmt::Display for YearSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearSpan::Single(year) => write!(f, "{year}"),
            YearSpan::Range(start, end) => write!(f, "{start}-{end}"),
        }
    }
}

impl FromStr for YearSpan {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidYear(s.to_string());
        let years = s
            .split('-')
            .map(|part| match part.trim().parse::<i32>() {
                Ok(year) if (1000..=9999).contains(&year) => Ok(year),
                _ => Err(invalid()),
            })
            .collect::<Result<Vec<_>>>()?;

        match years.as_slice() {
            [year] => Ok(YearSpan::Single(*year)),
            [start, end] if start <= end => Ok(YearSpan::Range(*start, *end)),
            _ => Err(invalid()),
        }
    }
}

impl From<YearSpan> for String {
    fn from(span: YearSpan) -> Self {
        span.to_string()
    }
}

impl TryFrom<String> for YearSpan {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Composite key indexing every table: resolution × year span × region.
///
/// The text form is `{resolution}m_{years}_{region}`, e.g. `30m_2010-2015_NA`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DatasetKey {
    pub resolution: u32,
    pub years: YearSpan,
    pub region: String,
}

impl DatasetKey {
    pub fn new(region: &str, resolution: u32, years: &str) -> Result<Self> {
        Ok(DatasetKey {
            resolution,
            years: years.parse()?,
            region: region.to_string(),
        })
    }

    /// STAC item id, `{region}_{years}_{resolution}m`.
    pub fn item_id(&self) -> String {
        format!("{}_{}_{}m", self.region, self.years, self.resolution)
    }

    /// Region-independent product id, `{resolution}m_{years}`.
    pub fn product_id(&self) -> String {
        format!("{}m_{}", self.resolution, self.years)
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m_{}_{}", self.resolution, self.years, self.region)
    }
}

impl FromStr for DatasetKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidKey(s.to_string());
        let mut parts = s.splitn(3, '_');
        let resolution = parts
            .next()
            .and_then(|r| r.strip_suffix('m'))
            .and_then(|r| r.parse().ok())
            .ok_or_else(invalid)?;
        let years = parts.next().ok_or_else(invalid)?.parse()?;
        let region = parts.next().filter(|r| !r.is_empty()).ok_or_else(invalid)?;

        Ok(DatasetKey {
            resolution,
            years,
            region: region.to_string(),
        })
    }
}

impl From<DatasetKey> for String {
    fn from(key: DatasetKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for DatasetKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

// =============================================================================
// Table entries
// =============================================================================

/// Projection parameters of one raster, in the projection extension's terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub epsg: Option<u32>,
    pub wkt2: String,
    /// Affine transform, row-major `[a, b, c, d, e, f, 0, 0, 1]`.
    pub transform: [f64; 9],
    /// Projected bounds `[xmin, ymin, xmax, ymax]` in meters.
    pub bbox: [f64; 4],
    /// Raster size `[rows, cols]`.
    pub shape: [u64; 2],
}

/// Everything known about one published dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Archive path relative to [`HREF_DIR`].
    pub archive: String,
    /// Geographic bounds `[west, south, east, north]` in degrees.
    pub extent: [f64; 4],
    pub projection: Projection,
    pub nodata: i64,
    pub data_type: String,
    /// Size of the data file in bytes.
    pub file_size: u64,
}

/// Source sensor of the classified imagery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    pub platform: Vec<String>,
    pub instruments: Vec<String>,
    pub constellation: Vec<String>,
}

/// The full set of lookup tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    /// Region code to display name.
    pub regions: BTreeMap<String, String>,
    pub resolutions: Vec<u32>,
    pub years: Vec<YearSpan>,
    /// Datasets keyed by [`DatasetKey`]; presence here defines validity.
    pub datasets: BTreeMap<DatasetKey, Dataset>,
    /// Documentation path relative to [`HREF_DIR`], keyed by product id.
    pub metadata: BTreeMap<String, String>,
    /// Land cover class code to label.
    pub classes: BTreeMap<u32, String>,
    pub satellites: BTreeMap<String, Satellite>,
    pub citation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

impl Tables {
    /// Load tables from a JSON file shaped like the serialized built-ins.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let tables: Tables = serde_json::from_str(&content).map_err(|e| Error::json(path, e))?;
        if let Some(code) = tables.classes.keys().find(|&&code| code >= MAX_CLASS_CODE) {
            return Err(Error::InvalidTables {
                path: path.to_path_buf(),
                reason: format!("class code {code} does not fit the two-digit change encoding"),
            });
        }
        info!(
            "Loaded {} datasets from {:?}",
            tables.datasets.len(),
            path
        );
        Ok(tables)
    }

    pub fn dataset(&self, key: &DatasetKey) -> Option<&Dataset> {
        self.datasets.get(key)
    }

    /// All valid keys, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &DatasetKey> {
        self.datasets.keys()
    }

    /// Every region × resolution × year combination, valid or not.
    pub fn combinations(&self) -> Vec<DatasetKey> {
        let mut keys = Vec::new();
        for region in self.regions.keys() {
            for &resolution in &self.resolutions {
                for &years in &self.years {
                    keys.push(DatasetKey {
                        resolution,
                        years,
                        region: region.clone(),
                    });
                }
            }
        }
        keys
    }

    pub fn region_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.regions.get(code).map(String::as_str).unwrap_or(code)
    }

    pub fn archive_href(&self, dataset: &Dataset) -> String {
        join_href(&dataset.archive)
    }

    pub fn metadata_href(&self, product_id: &str) -> Option<String> {
        self.metadata.get(product_id).map(|path| join_href(path))
    }
}

fn join_href(path: &str) -> String {
    format!(
        "{}/{}",
        HREF_DIR.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
