//! Bounding boxes and footprint geometry.

use geojson::{Geometry, Value};

use crate::error::{Error, Result};

/// Union of `[xmin, ymin, xmax, ymax]` boxes.
///
/// An empty list has no meaningful union and is rejected.
pub fn bounding_extent(boxes: &[[f64; 4]]) -> Result<[f64; 4]> {
    if boxes.is_empty() {
        return Err(Error::EmptyExtent);
    }

    Ok([
        boxes.iter().map(|b| b[0]).fold(f64::INFINITY, f64::min),
        boxes.iter().map(|b| b[1]).fold(f64::INFINITY, f64::min),
        boxes.iter().map(|b| b[2]).fold(f64::NEG_INFINITY, f64::max),
        boxes.iter().map(|b| b[3]).fold(f64::NEG_INFINITY, f64::max),
    ])
}

/// Convert bbox to a closed, counter-clockwise GeoJSON Polygon
pub fn bbox_to_polygon(bbox: &[f64; 4]) -> Geometry {
    let [west, south, east, north] = *bbox;
    Geometry::new(Value::Polygon(vec![vec![
        vec![west, south],
        vec![east, south],
        vec![east, north],
        vec![west, north],
        vec![west, south],
    ]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_extent_union() {
        let merged = bounding_extent(&[[0.0, 0.0, 10.0, 10.0], [5.0, -5.0, 15.0, 8.0]]).unwrap();
        assert_eq!(merged, [0.0, -5.0, 15.0, 10.0]);
    }

    #[test]
    fn test_bounding_extent_single_box() {
        let bbox = [-141.0, 41.7, -52.6, 83.1];
        assert_eq!(bounding_extent(&[bbox]).unwrap(), bbox);
    }

    #[test]
    fn test_bounding_extent_empty_fails() {
        assert!(matches!(bounding_extent(&[]), Err(Error::EmptyExtent)));
    }

    #[test]
    fn test_polygon_is_closed() {
        let geometry = bbox_to_polygon(&[-10.0, 20.0, 30.0, 40.0]);
        let Value::Polygon(rings) = geometry.value else {
            panic!("expected a polygon");
        };
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 5);
        assert_eq!(rings[0].first(), rings[0].last());
        assert_eq!(rings[0][2], vec![30.0, 40.0]);
    }
}
