pub mod path;

use glam::DVec2;

/// A closed boundary loop of (lon, lat) points
pub type Ring = Vec<DVec2>;

/// Polygon geometry of one district, decoded once at load time.
///
/// Each polygon is a list of rings: the first is the outer boundary,
/// any following rings are holes.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Shape {
    /// Decode a GeoJSON geometry value. Returns `None` for non-areal geometry.
    pub fn from_geometry(value: &geojson::Value) -> Option<Self> {
        match value {
            geojson::Value::Polygon(rings) => Some(Shape::Polygon(decode_rings(rings))),
            geojson::Value::MultiPolygon(polygons) => Some(Shape::MultiPolygon(
                polygons.iter().map(|rings| decode_rings(rings)).collect(),
            )),
            _ => None,
        }
    }

    /// Uniform view over both variants: a slice of polygons
    pub fn polygons(&self) -> &[Vec<Ring>] {
        match self {
            Shape::Polygon(rings) => std::slice::from_ref(rings),
            Shape::MultiPolygon(polygons) => polygons,
        }
    }

    /// Outer rings only, in input order
    pub fn outer_rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons().iter().filter_map(|rings| rings.first())
    }

    /// Flatten to the outer-ring points of every polygon, concatenated.
    /// Holes are dropped.
    pub fn outline(&self) -> Vec<DVec2> {
        self.outer_rings().flatten().copied().collect()
    }

    /// Bounding box over the outer rings
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.outer_rings().flatten().copied())
    }

    /// Even-odd containment test. A point inside a hole is outside the shape.
    pub fn contains(&self, p: DVec2) -> bool {
        self.polygons().iter().any(|rings| {
            rings
                .iter()
                .filter(|ring| ring_contains(ring, p))
                .count()
                % 2
                == 1
        })
    }
}

fn decode_rings(rings: &[geojson::LineStringType]) -> Vec<Ring> {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter(|c| c.len() >= 2)
                .map(|c| DVec2::new(c[0], c[1]))
                .collect()
        })
        .collect()
}

/// Ray casting towards +x
fn ring_contains(ring: &[DVec2], p: DVec2) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Axis-aligned bounding box in lon/lat degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Single pass over the points. `None` when the iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| match acc {
            None => Some(Bounds { min: p, max: p }),
            Some(b) => Some(Bounds {
                min: b.min.min(p),
                max: b.max.max(p),
            }),
        })
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
