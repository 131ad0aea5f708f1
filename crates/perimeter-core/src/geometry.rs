//! Pure geometry helpers: distances, arcs, and containment tests.
//!
//! Angles are in degrees unless a name says otherwise. Geographic helpers
//! treat (lat, lng) as a flat plane, which is what the perimeter rings use.

use glam::DVec2;

use crate::constants::EARTH_RADIUS_KM;
use crate::types::GeoPoint;

/// Euclidean distance between two planar points.
pub fn planar_distance(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Point at `distance` from `center` along `angle_rad`, using the
/// lat = sin, lng = cos convention of the spawn ring.
pub fn polar_offset(center: GeoPoint, distance: f64, angle_rad: f64) -> GeoPoint {
    GeoPoint::new(
        center.lat + distance * angle_rad.sin(),
        center.lng + distance * angle_rad.cos(),
    )
}

/// Points along an arc from `start_deg` to `end_deg` inclusive, stepping by
/// `step_deg`. The end angle is always emitted even when the step does not
/// divide the sweep.
pub fn arc_points(center: DVec2, radius: f64, start_deg: f64, end_deg: f64, step_deg: f64) -> Vec<DVec2> {
    let mut points = Vec::new();
    if step_deg <= 0.0 || end_deg < start_deg {
        return points;
    }
    let mut angle = start_deg;
    while angle < end_deg {
        points.push(center + DVec2::from_angle(angle.to_radians()) * radius);
        angle += step_deg;
    }
    points.push(center + DVec2::from_angle(end_deg.to_radians()) * radius);
    points
}

/// Closed field-of-view polygon for a directional sensor: apex, arc, apex.
pub fn field_of_view(apex: DVec2, range: f64, heading_deg: f64, fov_deg: f64, step_deg: f64) -> Vec<DVec2> {
    let half = fov_deg / 2.0;
    let mut polygon = Vec::with_capacity(2 + (fov_deg / step_deg.max(1e-9)) as usize + 1);
    polygon.push(apex);
    polygon.extend(arc_points(apex, range, heading_deg - half, heading_deg + half, step_deg));
    polygon.push(apex);
    polygon
}

/// Square containment: |p - center| <= half_extent on both axes.
pub fn square_contains(center: DVec2, half_extent: f64, p: DVec2) -> bool {
    let d = (p - center).abs();
    d.x <= half_extent && d.y <= half_extent
}

/// Corners of the square ring (closed, five points).
pub fn square_outline(center: DVec2, half_extent: f64) -> [DVec2; 5] {
    let h = half_extent;
    [
        center + DVec2::new(h, h),
        center + DVec2::new(h, -h),
        center + DVec2::new(-h, -h),
        center + DVec2::new(-h, h),
        center + DVec2::new(h, h),
    ]
}

/// Axis-aligned box containment with inclusive edges.
pub fn box_contains(min: DVec2, max: DVec2, p: DVec2) -> bool {
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}

/// Inclusive 1-D span test used for beam straddling.
pub fn span_contains(low: f64, high: f64, value: f64) -> bool {
    value >= low && value <= high
}
