//! `item_assets` definitions for the six NALCMS products.

use serde_json::{json, Map, Value};

use crate::constants::MEDIA_TYPE_COG;

/// `(key, title, description)`
const PRODUCTS: [(&str, &str, &str); 6] = [
    (
        "landcover_change_30m",
        "Land Cover Change 30m, 2010-2015 (Landsat)",
        "This map demonstrates land cover change between 2010 and 2015 in North America at \
a spatial resolution of 30 meters. The dataset shows the 2010-2015 changes between the \
nineteen Level II land cover classes, which were defined using the Land Cover Classification \
System (LCCS) standard developed by the Food and Agriculture Organization (FAO) of United \
Nations.",
    ),
    (
        "landcover_2015_30m",
        "Land Cover 30m, 2015 (Landsat and RapidEye)",
        "This map of North American land cover at a spatial resolution of 30 meters provides \
a harmonized view of the physical cover of Earth’s surface across the continent based on \
2015 Landsat satellite imagery for Canada and the United States, and RapidEye imagery for \
Mexico. Nineteen Level II land cover classes were defined using the Land Cover Classification \
System (LCCS) standard developed by the Food and Agriculture Organization (FAO) of the United \
Nations.",
    ),
    (
        "landcover_2010_30m",
        "Land Cover, 2010 (Landsat, 30m)",
        "This map of North American land cover at a spatial resolution of 30 meters provides \
a harmonized view of the physical cover of Earth’s surface across the continent based on \
2010 Landsat satellite imagery. Nineteen Level II land cover classes were defined using the \
Land Cover Classification System (LCCS) standard developed by the Food and Agriculture \
Organization (FAO) of United Nations.",
    ),
    (
        "landcover_change_250m",
        "Land Cover Change, 2005-2010 (MODIS, 250m)",
        "This map demonstrates land cover change between 2005 and 2010 in North America at \
a spatial resolution of 250 meters. The dataset shows the 2005-2010 changes between the \
nineteen Level II land cover classes, which were defined using the Land Cover Classification \
System (LCCS) standard developed by the Food and Agriculture Organization (FAO) of United \
Nations.",
    ),
    (
        "landcover_2010_250m",
        "Land Cover, 2010 (MODIS, 250m)",
        "This map of North American land cover at a spatial resolution of 250 meters provides \
a harmonized view of the physical cover of Earth’s surface across the continent based on \
2010 Moderate Resolution Imaging Spectroradiometer (MODIS) satellite imagery. Nineteen Level \
II land cover classes were defined using the Land Cover Classification System (LCCS) standard \
developed by the Food and Agriculture Organization (FAO) of United Nations.",
    ),
    (
        "landcover_2005_250m",
        "Land Cover, 2005 (MODIS, 250m)",
        "This map of North American land cover at a spatial resolution of 250 meters provides \
a harmonized view of the physical cover of Earth’s surface across the continent based on \
2005 Moderate Resolution Imaging Spectroradiometer (MODIS) satellite imagery. Nineteen Level \
II land cover classes were defined using the Land Cover Classification System (LCCS) standard \
developed by the Food and Agriculture Organization (FAO) of United Nations.",
    ),
];

pub fn item_assets() -> Value {
    let definitions: Map<String, Value> = PRODUCTS
        .iter()
        .map(|(key, title, description)| {
            (
                key.to_string(),
                json!({
                    "title": title,
                    "description": description,
                    "type": MEDIA_TYPE_COG,
                    "roles": ["data"],
                }),
            )
        })
        .collect();
    Value::Object(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_assets_cover_every_product() {
        let assets = item_assets();
        let assets = assets.as_object().unwrap();
        assert_eq!(assets.len(), 6);
        assert_eq!(assets["landcover_2015_30m"]["roles"][0], "data");
        assert_eq!(assets["landcover_2005_250m"]["type"], MEDIA_TYPE_COG);
        assert_eq!(
            assets["landcover_2010_30m"]["description"],
            "This map of North American land cover at a spatial resolution of 30 meters \
provides a harmonized view of the physical cover of Earth’s surface across the continent \
based on 2010 Landsat satellite imagery. Nineteen Level II land cover classes were defined \
using the Land Cover Classification System (LCCS) standard developed by the Food and \
Agriculture Organization (FAO) of United Nations."
        );
    }
}
