//! Bounding spheres for scene nodes
//!
//! The sphere is centered on the mean of all vertex positions of a node, so
//! positions shared by several triangles are counted once per corner.

use cgmath::{EuclideanSpace, MetricSpace, Point3, Vector3, Zero};

use super::vertex::Vertex;

/// Radius used when every vertex of a node lies on the centroid
pub const MIN_BOUNDING_RADIUS: f32 = 0.1;

/// Object-space sphere enclosing every vertex of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: [f32; 3],
    pub radius: f32,
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self {
            center: [0.0; 3],
            radius: MIN_BOUNDING_RADIUS,
        }
    }
}

impl BoundingSphere {
    /// Computes the sphere around the centroid of `vertices`
    ///
    /// # Returns
    /// The sphere and whether its radius was clamped to
    /// [`MIN_BOUNDING_RADIUS`] because all vertices coincide. An empty slice
    /// yields the default sphere and counts as clamped.
    pub fn from_vertices(vertices: &[Vertex]) -> (Self, bool) {
        if vertices.is_empty() {
            return (Self::default(), true);
        }

        let sum = vertices.iter().fold(Vector3::<f64>::zero(), |sum, v| {
            sum + position(v).to_vec()
        });
        let center = Point3::from_vec(sum / vertices.len() as f64);

        let radius = vertices
            .iter()
            .map(|v| position(v).distance(center))
            .fold(0.0_f64, f64::max);

        let clamped = radius == 0.0;
        let sphere = Self {
            center: [center.x as f32, center.y as f32, center.z as f32],
            radius: if clamped {
                MIN_BOUNDING_RADIUS
            } else {
                radius as f32
            },
        };
        (sphere, clamped)
    }

    /// Test whether a point lies inside the sphere (inclusive)
    pub fn contains(&self, point: [f32; 3]) -> bool {
        let center = Point3::from(self.center);
        Point3::from(point).distance(center) <= self.radius
    }
}

fn position(vertex: &Vertex) -> Point3<f64> {
    Point3::new(
        f64::from(vertex.position[0]),
        f64::from(vertex.position[1]),
        f64::from(vertex.position[2]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32, z: f32) -> Vertex {
        Vertex {
            position: [x, y, z],
            ..Default::default()
        }
    }

    #[test]
    fn test_coincident_vertices_clamped() {
        let vertices = vec![at(2.0, -1.0, 5.0); 3];
        let (sphere, clamped) = BoundingSphere::from_vertices(&vertices);

        assert!(clamped);
        assert_eq!(sphere.radius, 0.1);
        assert_eq!(sphere.center, [2.0, -1.0, 5.0]);
    }

    #[test]
    fn test_right_triangle_radius_reaches_farthest_vertex() {
        let vertices = [at(0.0, 0.0, 0.0), at(3.0, 0.0, 0.0), at(0.0, 4.0, 0.0)];
        let (sphere, clamped) = BoundingSphere::from_vertices(&vertices);

        let center = [1.0_f64, 4.0 / 3.0, 0.0];
        let farthest = vertices
            .iter()
            .map(|v| {
                let dx = f64::from(v.position[0]) - center[0];
                let dy = f64::from(v.position[1]) - center[1];
                let dz = f64::from(v.position[2]) - center[2];
                (dx * dx + dy * dy + dz * dz).sqrt()
            })
            .fold(0.0, f64::max);

        assert!(!clamped);
        assert!((sphere.center[0] - 1.0).abs() < 1e-6);
        assert!((sphere.center[1] - 4.0 / 3.0).abs() < 1e-6);
        assert!((f64::from(sphere.radius) - farthest).abs() < 1e-5);
        assert!(sphere.contains([1.0, 1.0, 0.0]));
        assert!(!sphere.contains([10.0, 0.0, 0.0]));
    }

    #[test]
    fn test_duplicate_corners_weight_the_centroid() {
        // (0,0,0) appears twice, pulling the mean towards the origin
        let vertices = [
            at(0.0, 0.0, 0.0),
            at(4.0, 0.0, 0.0),
            at(0.0, 0.0, 0.0),
        ];
        let (sphere, _) = BoundingSphere::from_vertices(&vertices);
        assert!((sphere.center[0] - 4.0 / 3.0).abs() < 1e-6);
        assert!((sphere.radius - 8.0 / 3.0).abs() < 1e-5);
    }
}
