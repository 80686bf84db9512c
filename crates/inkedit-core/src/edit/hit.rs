//! Pointer hit-testing against extracted regions.

use crate::models::region::{Point, TextRegion};

/// Find the region under `point`.
///
/// Containment is inclusive of the boundary. When several regions overlap
/// at the point, the earliest in extraction order wins; no z-order or
/// area-based disambiguation.
pub fn hit_test(regions: &[TextRegion], point: Point) -> Option<&TextRegion> {
    regions.iter().find(|region| region.bounds.contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::region::{FontSpec, Rect, RegionId};

    fn region(id: u64, bounds: Rect) -> TextRegion {
        TextRegion {
            id: RegionId(id),
            text: format!("r{id}"),
            bounds,
            font: FontSpec::default(),
            confidence: None,
        }
    }

    #[test]
    fn test_hit_inside_bounds() {
        let regions = vec![region(0, Rect::new(100.0, 100.0, 50.0, 20.0))];
        let hit = hit_test(&regions, Point::new(110.0, 105.0)).unwrap();
        assert_eq!(hit.id, RegionId(0));
    }

    #[test]
    fn test_miss_returns_none() {
        let regions = vec![region(0, Rect::new(100.0, 100.0, 50.0, 20.0))];
        assert!(hit_test(&regions, Point::new(99.0, 105.0)).is_none());
        assert!(hit_test(&regions, Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_boundary_points_hit() {
        let regions = vec![region(0, Rect::new(100.0, 100.0, 50.0, 20.0))];
        assert!(hit_test(&regions, Point::new(100.0, 100.0)).is_some());
        assert!(hit_test(&regions, Point::new(150.0, 120.0)).is_some());
    }

    #[test]
    fn test_overlap_earliest_in_extraction_order_wins() {
        let regions = vec![
            region(7, Rect::new(0.0, 0.0, 100.0, 100.0)),
            region(8, Rect::new(40.0, 40.0, 100.0, 100.0)),
        ];
        let hit = hit_test(&regions, Point::new(50.0, 50.0)).unwrap();
        assert_eq!(hit.id, RegionId(7));

        // Still holds with the overlap listed the other way around.
        let reversed: Vec<_> = regions.into_iter().rev().collect();
        let hit = hit_test(&reversed, Point::new(50.0, 50.0)).unwrap();
        assert_eq!(hit.id, RegionId(8));
    }
}
