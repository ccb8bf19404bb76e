use crate::geo::LonLat;

/// Below this absolute area (deg²) a polygon set is treated as degenerate.
const AREA_EPSILON: f64 = 1e-12;

/// Area-weighted planar centroid of a set of polygons.
///
/// Each polygon is a list of rings; ring 0 is the outer boundary, the rest are
/// holes. Ring orientation does not matter. Falls back to the mean of the outer
/// ring vertices when the total area is degenerate (lines, slivers, points).
pub fn polygons_centroid(polygons: &[Vec<Vec<LonLat>>]) -> Option<LonLat> {
    let mut area = 0.0;
    let mut mx = 0.0;
    let mut my = 0.0;

    for poly in polygons {
        for (ring_idx, ring) in poly.iter().enumerate() {
            let (a, rx, ry) = ring_moments(ring);
            let orient = if a < 0.0 { -1.0 } else { 1.0 };
            let sign = if ring_idx == 0 { orient } else { -orient };
            area += sign * a;
            mx += sign * rx;
            my += sign * ry;
        }
    }

    if area.abs() > AREA_EPSILON {
        let c = LonLat::new(mx / area, my / area);
        if c.is_finite() {
            return Some(c);
        }
    }

    vertex_mean(polygons.iter().filter_map(|p| p.first()).flatten())
}

/// Mean of the given vertices, ignoring non-finite ones.
pub fn vertex_mean<'a>(points: impl IntoIterator<Item = &'a LonLat>) -> Option<LonLat> {
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut n = 0usize;
    for p in points {
        if !p.is_finite() {
            continue;
        }
        sx += p.lon;
        sy += p.lat;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    let n = n as f64;
    Some(LonLat::new(sx / n, sy / n))
}

/// Signed shoelace area and first moments of a ring (closed or open).
fn ring_moments(ring: &[LonLat]) -> (f64, f64, f64) {
    if ring.len() < 3 {
        return (0.0, 0.0, 0.0);
    }
    let mut a = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..ring.len() {
        let p = ring[i];
        let q = ring[(i + 1) % ring.len()];
        let cross = p.lon * q.lat - q.lon * p.lat;
        a += cross;
        cx += (p.lon + q.lon) * cross;
        cy += (p.lat + q.lat) * cross;
    }
    (a * 0.5, cx / 6.0, cy / 6.0)
}

#[cfg(test)]
mod tests {
    use super::{polygons_centroid, vertex_mean};
    use crate::geo::LonLat;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn square(x0: f64, y0: f64, size: f64) -> Vec<LonLat> {
        vec![
            LonLat::new(x0, y0),
            LonLat::new(x0 + size, y0),
            LonLat::new(x0 + size, y0 + size),
            LonLat::new(x0, y0 + size),
            LonLat::new(x0, y0),
        ]
    }

    #[test]
    fn square_centroid_is_its_center() {
        let c = polygons_centroid(&[vec![square(0.0, 0.0, 2.0)]]).unwrap();
        assert_close(c.lon, 1.0, 1e-12);
        assert_close(c.lat, 1.0, 1e-12);
    }

    #[test]
    fn orientation_does_not_matter() {
        let mut ring = square(10.0, -4.0, 2.0);
        ring.reverse();
        let c = polygons_centroid(&[vec![ring]]).unwrap();
        assert_close(c.lon, 11.0, 1e-12);
        assert_close(c.lat, -3.0, 1e-12);
    }

    #[test]
    fn larger_part_dominates_multi_polygon() {
        // A 4x4 square at the origin and a 1x1 islet far east.
        let c = polygons_centroid(&[
            vec![square(0.0, 0.0, 4.0)],
            vec![square(20.0, 0.0, 1.0)],
        ])
        .unwrap();
        // (16 * 2 + 1 * 20.5) / 17
        assert_close(c.lon, 52.5 / 17.0, 1e-9);
    }

    #[test]
    fn holes_shift_the_centroid() {
        let outer = square(0.0, 0.0, 4.0);
        let hole = square(0.0, 0.0, 2.0);
        let c = polygons_centroid(&[vec![outer, hole]]).unwrap();
        assert!(c.lon > 2.0 && c.lat > 2.0);
    }

    #[test]
    fn degenerate_falls_back_to_vertex_mean() {
        let line = vec![LonLat::new(0.0, 0.0), LonLat::new(4.0, 0.0)];
        let c = polygons_centroid(&[vec![line]]).unwrap();
        assert_eq!(c, LonLat::new(2.0, 0.0));
        assert_eq!(polygons_centroid(&[]), None);
        let none: [LonLat; 0] = [];
        assert_eq!(vertex_mean(&none), None);
    }
}
