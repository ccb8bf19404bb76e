use crate::geo::LonLat;

/// Axis-aligned bounding box in lon/lat degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Symmetric box `[-half_w, half_w] x [-half_h, half_h]`.
    pub fn centered(half_w: f64, half_h: f64) -> Self {
        Aabb2 {
            min: [-half_w, -half_h],
            max: [half_w, half_h],
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a LonLat>) -> Option<Self> {
        let mut out: Option<Aabb2> = None;
        for p in points {
            if !p.is_finite() {
                continue;
            }
            match out.as_mut() {
                Some(b) => b.expand(*p),
                None => out = Some(Aabb2::new([p.lon, p.lat], [p.lon, p.lat])),
            }
        }
        out
    }

    pub fn expand(&mut self, p: LonLat) {
        self.min[0] = self.min[0].min(p.lon);
        self.min[1] = self.min[1].min(p.lat);
        self.max[0] = self.max[0].max(p.lon);
        self.max[1] = self.max[1].max(p.lat);
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        )
    }

    pub fn contains(&self, p: LonLat) -> bool {
        p.lon >= self.min[0] && p.lon <= self.max[0] && p.lat >= self.min[1] && p.lat <= self.max[1]
    }

    /// Clamp `p` into the box, axis by axis.
    pub fn clamp(&self, p: LonLat) -> LonLat {
        LonLat::new(
            p.lon.clamp(self.min[0], self.max[0]),
            p.lat.clamp(self.min[1], self.max[1]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::geo::LonLat;

    #[test]
    fn from_points_skips_non_finite() {
        let pts = [
            LonLat::new(1.0, 2.0),
            LonLat::new(f64::NAN, 0.0),
            LonLat::new(-3.0, 5.0),
        ];
        let b = Aabb2::from_points(&pts).unwrap();
        assert_eq!(b.min, [-3.0, 2.0]);
        assert_eq!(b.max, [1.0, 5.0]);
    }

    #[test]
    fn clamp_is_per_axis() {
        let b = Aabb2::centered(10.0, 5.0);
        assert_eq!(b.clamp(LonLat::new(20.0, -1.0)), LonLat::new(10.0, -1.0));
        assert_eq!(b.clamp(LonLat::new(-20.0, -9.0)), LonLat::new(-10.0, -5.0));
        assert!(b.contains(b.clamp(LonLat::new(300.0, 300.0))));
    }
}
