//! Compiled-in NALCMS tables.

use std::collections::BTreeMap;

use super::{Dataset, DatasetKey, Projection, Satellite, Tables, YearSpan};
use crate::constants::CITATION;

/// Spherical Lambert Azimuthal Equal Area grid shared by every NALCMS raster.
/// It has no EPSG code.
const LAEA_WKT2: &str = r#"PROJCRS["Sphere_ARC_INFO_Lambert_Azimuthal_Equal_Area",BASEGEOGCRS["GCS_Sphere_ARC_INFO",DATUM["D_Sphere_ARC_INFO",ELLIPSOID["Sphere_ARC_INFO",6370997,0,LENGTHUNIT["metre",1]]],PRIMEM["Greenwich",0,ANGLEUNIT["Degree",0.0174532925199433]]],CONVERSION["unnamed",METHOD["Lambert Azimuthal Equal Area (Spherical)",ID["EPSG",1027]],PARAMETER["Latitude of natural origin",45,ANGLEUNIT["Degree",0.0174532925199433],ID["EPSG",8801]],PARAMETER["Longitude of natural origin",-100,ANGLEUNIT["Degree",0.0174532925199433],ID["EPSG",8802]],PARAMETER["False easting",0,LENGTHUNIT["metre",1],ID["EPSG",8806]],PARAMETER["False northing",0,LENGTHUNIT["metre",1],ID["EPSG",8807]]],CS[Cartesian,2],AXIS["easting",east,ORDER[1],LENGTHUNIT["metre",1,ID["EPSG",9001]]],AXIS["northing",north,ORDER[2],LENGTHUNIT["metre",1,ID["EPSG",9001]]]]"#;

/// Level II land cover classes.
const CLASSES: [(u32, &str); 19] = [
    (1, "Temperate or sub-polar needleleaf forest"),
    (2, "Sub-polar taiga needleleaf forest"),
    (3, "Tropical or sub-tropical broadleaf evergreen forest"),
    (4, "Tropical or sub-tropical broadleaf deciduous forest"),
    (5, "Temperate or sub-polar broadleaf deciduous forest"),
    (6, "Mixed forest"),
    (7, "Tropical or sub-tropical shrubland"),
    (8, "Temperate or sub-polar shrubland"),
    (9, "Tropical or sub-tropical grassland"),
    (10, "Temperate or sub-polar grassland"),
    (11, "Sub-polar or polar shrubland-lichen-moss"),
    (12, "Sub-polar or polar grassland-lichen-moss"),
    (13, "Sub-polar or polar barren-lichen-moss"),
    (14, "Wetland"),
    (15, "Cropland"),
    (16, "Barren lands"),
    (17, "Urban"),
    (18, "Water"),
    (19, "Snow and Ice"),
];

/// Geographic bounds per region, `[west, south, east, north]`.
fn region_extent(region: &str) -> [f64; 4] {
    match region {
        "CAN" => [-141.0, 41.7, -52.6, 83.1],
        "USA" => [-179.2, 18.9, -66.9, 71.4],
        "MEX" => [-118.4, 14.5, -86.7, 32.7],
        _ => [-170.0, 14.0, -50.0, 84.0],
    }
}

/// Grid origin (upper left) and size per region and resolution:
/// `(xmin, ymax, rows, cols)`.
fn region_grid(region: &str, resolution: u32) -> (f64, f64, u64, u64) {
    match (region, resolution) {
        ("CAN", _) => (-2_800_000.0, 4_500_000.0, 173_000, 190_000),
        ("USA", _) => (-4_400_000.0, 4_300_000.0, 203_000, 233_000),
        ("MEX", _) => (-1_900_000.0, -1_200_000.0, 80_000, 100_000),
        (_, 250) => (-4_400_000.0, 4_500_000.0, 32_400, 31_200),
        _ => (-4_400_000.0, 4_500_000.0, 270_000, 260_000),
    }
}

fn laea_projection(region: &str, resolution: u32) -> Projection {
    let (xmin, ymax, rows, cols) = region_grid(region, resolution);
    let res = resolution as f64;
    let xmax = xmin + cols as f64 * res;
    let ymin = ymax - rows as f64 * res;

    Projection {
        epsg: None,
        wkt2: LAEA_WKT2.to_string(),
        transform: [res, 0.0, xmin, 0.0, -res, ymax, 0.0, 0.0, 1.0],
        bbox: [xmin, ymin, xmax, ymax],
        shape: [rows, cols],
    }
}

/// `(resolution, years, region, archive, data type, file size)`
const DATASETS: [(u32, YearSpan, &str, &str, &str, u64); 15] = [
    (30, YearSpan::Single(2010), "NA", "1_01_1_land_cover_2010_30m/land_cover_2010v2_30m_tif.zip", "uint8", 1_712_394_226),
    (30, YearSpan::Single(2010), "CAN", "1_01_1_land_cover_2010_30m/can_land_cover_2010v2_30m_tif.zip", "uint8", 803_145_902),
    (30, YearSpan::Single(2010), "USA", "1_01_1_land_cover_2010_30m/usa_land_cover_2010v2_30m_tif.zip", "uint8", 762_419_775),
    (30, YearSpan::Single(2010), "MEX", "1_01_1_land_cover_2010_30m/mex_land_cover_2010v2_30m_tif.zip", "uint8", 214_881_340),
    (30, YearSpan::Single(2015), "NA", "1_01_0_land_cover_2015_30m/land_cover_2015v2_30m_tif.zip", "uint8", 1_804_211_983),
    (30, YearSpan::Single(2015), "CAN", "1_01_0_land_cover_2015_30m/can_land_cover_2015v2_30m_tif.zip", "uint8", 845_030_117),
    (30, YearSpan::Single(2015), "USA", "1_01_0_land_cover_2015_30m/usa_land_cover_2015v2_30m_tif.zip", "uint8", 791_556_402),
    (30, YearSpan::Single(2015), "MEX", "1_01_0_land_cover_2015_30m/mex_land_cover_2015v2_30m_tif.zip", "uint8", 229_674_518),
    (30, YearSpan::Range(2010, 2015), "NA", "1_01_2_land_cover_change_2010_2015_30m/land_cover_change_2010v2_2015v2_30m_tif.zip", "uint16", 412_907_331),
    (30, YearSpan::Range(2010, 2015), "CAN", "1_01_2_land_cover_change_2010_2015_30m/can_land_cover_change_2010v2_2015v2_30m_tif.zip", "uint16", 201_558_460),
    (30, YearSpan::Range(2010, 2015), "USA", "1_01_2_land_cover_change_2010_2015_30m/usa_land_cover_change_2010v2_2015v2_30m_tif.zip", "uint16", 176_290_014),
    (30, YearSpan::Range(2010, 2015), "MEX", "1_01_2_land_cover_change_2010_2015_30m/mex_land_cover_change_2010v2_2015v2_30m_tif.zip", "uint16", 49_872_635),
    (250, YearSpan::Single(2005), "NA", "1_01_3_land_cover_2005_250m/land_cover_2005v3_250m_tif.zip", "uint8", 62_115_408),
    (250, YearSpan::Single(2010), "NA", "1_01_4_land_cover_2010_250m/land_cover_2010v2_250m_tif.zip", "uint8", 63_224_571),
    (250, YearSpan::Range(2005, 2010), "NA", "1_01_5_land_cover_change_2005_2010_250m/land_cover_change_2005_2010_250m_tif.zip", "uint16", 9_418_236),
];

const METADATA: [(&str, &str); 6] = [
    ("30m_2010", "1_01_1_land_cover_2010_30m/land_cover_2010v2_30m_metadata.pdf"),
    ("30m_2015", "1_01_0_land_cover_2015_30m/land_cover_2015v2_30m_metadata.pdf"),
    ("30m_2010-2015", "1_01_2_land_cover_change_2010_2015_30m/land_cover_change_2010v2_2015v2_30m_metadata.pdf"),
    ("250m_2005", "1_01_3_land_cover_2005_250m/land_cover_2005v3_250m_metadata.pdf"),
    ("250m_2010", "1_01_4_land_cover_2010_250m/land_cover_2010v2_250m_metadata.pdf"),
    ("250m_2005-2010", "1_01_5_land_cover_change_2005_2010_250m/land_cover_change_2005_2010_250m_metadata.pdf"),
];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Tables {
    /// The published NALCMS datasets.
    pub fn builtin() -> Self {
        let regions = [
            ("NA", "North America"),
            ("CAN", "Canada"),
            ("USA", "the United States"),
            ("MEX", "Mexico"),
        ]
        .into_iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect();

        let years = [
            YearSpan::Single(2005),
            YearSpan::Single(2010),
            YearSpan::Single(2015),
            YearSpan::Range(2005, 2010),
            YearSpan::Range(2010, 2015),
        ]
        .to_vec();

        let datasets: BTreeMap<DatasetKey, Dataset> = DATASETS
            .iter()
            .map(|&(resolution, years, region, archive, data_type, file_size)| {
                let key = DatasetKey {
                    resolution,
                    years,
                    region: region.to_string(),
                };
                let dataset = Dataset {
                    archive: archive.to_string(),
                    extent: region_extent(region),
                    projection: laea_projection(region, resolution),
                    nodata: 0,
                    data_type: data_type.to_string(),
                    file_size,
                };
                (key, dataset)
            })
            .collect();

        let metadata = METADATA
            .iter()
            .map(|(product, path)| (product.to_string(), path.to_string()))
            .collect();

        let classes = CLASSES
            .iter()
            .map(|&(code, label)| (code, label.to_string()))
            .collect();

        let satellites = [
            (
                "landsat",
                Satellite {
                    platform: strings(&["landsat-5", "landsat-7", "landsat-8"]),
                    instruments: strings(&["tm", "etm+", "oli"]),
                    constellation: strings(&["landsat"]),
                },
            ),
            (
                "rapideye",
                Satellite {
                    platform: strings(&["rapideye"]),
                    instruments: strings(&["reis"]),
                    constellation: strings(&["rapideye"]),
                },
            ),
            (
                "modis",
                Satellite {
                    platform: strings(&["terra", "aqua"]),
                    instruments: strings(&["modis"]),
                    constellation: Vec::new(),
                },
            ),
        ]
        .into_iter()
        .map(|(name, satellite)| (name.to_string(), satellite))
        .collect();

        Tables {
            regions,
            resolutions: vec![30, 250],
            years,
            datasets,
            metadata,
            classes,
            satellites,
            citation: CITATION.to_string(),
            doi: None,
        }
    }
}
