//! Fixed identifiers, texts and schema URLs shared by every document.

pub const STAC_VERSION: &str = "1.0.0";

pub const PROJECTION_EXTENSION: &str =
    "https://stac-extensions.github.io/projection/v1.0.0/schema.json";
pub const RASTER_EXTENSION: &str = "https://stac-extensions.github.io/raster/v1.1.0/schema.json";
pub const FILE_EXTENSION: &str = "https://stac-extensions.github.io/file/v2.1.0/schema.json";
pub const LABEL_EXTENSION: &str = "https://stac-extensions.github.io/label/v1.0.1/schema.json";
pub const SCIENTIFIC_EXTENSION: &str =
    "https://stac-extensions.github.io/scientific/v1.0.0/schema.json";
pub const ITEM_ASSETS_EXTENSION: &str =
    "https://stac-extensions.github.io/item-assets/v1.0.0/schema.json";

/// Field prefix to extension schema, used when checking `stac_extensions`.
pub const EXTENSION_PREFIXES: [(&str, &str); 5] = [
    ("proj:", PROJECTION_EXTENSION),
    ("raster:", RASTER_EXTENSION),
    ("file:", FILE_EXTENSION),
    ("label:", LABEL_EXTENSION),
    ("sci:", SCIENTIFIC_EXTENSION),
];

pub const MEDIA_TYPE_COG: &str = "image/tiff; application=geotiff; profile=cloud-optimized";
pub const MEDIA_TYPE_ZIP: &str = "application/zip";
pub const MEDIA_TYPE_PDF: &str = "application/pdf";
pub const MEDIA_TYPE_JSON: &str = "application/json";
pub const MEDIA_TYPE_GEOJSON: &str = "application/geo+json";

pub const ID: &str = "nalcms";
pub const TITLE: &str = "North American Land Change Monitoring System data";
pub const DESCRIPTION: &str = "This Land Cover change map shows class transitions from 2010 to 2015
over Canada, Alaska, the conterminous United States and Mexico. Changes
have been assessed from Land Cover maps at 30 meters resolution
";
pub const LICENSE: &str = "proprietary";

pub const CITATION: &str = "Commission for Environmental Cooperation (CEC). North American \
Land Change Monitoring System (NALCMS): Land Cover of North America. Canada Centre for \
Mapping and Earth Observation, Natural Resources Canada; U.S. Geological Survey; Comisión \
Nacional para el Conocimiento y Uso de la Biodiversidad; Comisión Nacional Forestal; \
Instituto Nacional de Estadística y Geografía.";

pub const KEYWORDS: [&str; 8] = [
    "Land Cover",
    "Land Cover Change",
    "North America",
    "NALCMS",
    "Landsat",
    "RapidEye",
    "MODIS",
    "CEC",
];

/// Base of every remote archive and documentation href.
pub const HREF_DIR: &str = "http://www.cec.org/files/atlas_layers/1_terrestrial_ecosystems/";
