use log::warn;

use crate::geometry::{ BoundingSphere, TriangleInfo };
use crate::light::Material;
use crate::matrix::Matrix4D;
use crate::shape::Shape;
use crate::vector::Vector3;

/// A triangle soup.
///
/// Every three consecutive entries of `positions` (and `normals`) make one
/// triangle; vertices are never shared between triangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vector3>,
    pub normals: Vec<Vector3>,
}

impl Mesh {
    pub fn new() -> Mesh {
        Default::default()
    }

    pub fn push_triangle(&mut self, p: [Vector3; 3], n: [Vector3; 3]) {
        self.positions.extend_from_slice(&p);
        self.normals.extend_from_slice(&n);
    }

    /// Adds a triangle with its face normal at every vertex.
    pub fn push_flat_triangle(&mut self, p: [Vector3; 3]) {
        let n = TriangleInfo::face_normal(p[0], p[1], p[2]);
        self.push_triangle(p, [n, n, n]);
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A cube spanning `[-0.5, 0.5]` on every axis: twelve flat-shaded,
    /// outward-facing triangles.
    pub fn unit_cube() -> Mesh {
        let mut mesh = Mesh::new();

        // Each face: outward normal, and two in-plane axes with u x v == n.
        let faces = [
            (Vector3::new( 1.0,  0.0,  0.0), Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, 1.0)),
            (Vector3::new(-1.0,  0.0,  0.0), Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 1.0, 0.0)),
            (Vector3::new( 0.0,  1.0,  0.0), Vector3::new(0.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0)),
            (Vector3::new( 0.0, -1.0,  0.0), Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)),
            (Vector3::new( 0.0,  0.0,  1.0), Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)),
            (Vector3::new( 0.0,  0.0, -1.0), Vector3::new(0.0, 1.0, 0.0), Vector3::new(1.0, 0.0, 0.0)),
        ];

        for &(n, u, v) in faces.iter() {
            let c = n * 0.5;
            let (u, v) = (u * 0.5, v * 0.5);
            let corners = [c - u - v, c + u - v, c + u + v, c - u + v];

            mesh.push_triangle([corners[0], corners[1], corners[2]], [n, n, n]);
            mesh.push_triangle([corners[0], corners[2], corners[3]], [n, n, n]);
        }

        mesh
    }

    /// Places the mesh in the world as `Triangle` shapes.
    ///
    /// Positions go through `transform`; normals go through its inverse
    /// transpose so they stay perpendicular under non-uniform scaling.
    pub fn triangles(&self, transform: &Matrix4D, material: Material) -> Vec<Shape> {
        let normal_matrix = match transform.normal_matrix() {
            Some(m) => m,
            None => {
                warn!("singular mesh transform; normals are left untransformed");
                Matrix4D::identity()
            },
        };

        self.positions.chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .map(|(p, n)| {
                let p: Vec<Vector3> = p.iter()
                    .map(|p| transform.transform_point(*p))
                    .collect();
                let n: Vec<Vector3> = n.iter()
                    .map(|n| normal_matrix.transform_vector(*n).normalize())
                    .collect();

                Shape::triangle(TriangleInfo::new(p[0], p[1], p[2], n[0], n[1], n[2]))
                    .with_material(material)
            })
            .collect()
    }

    /// A sphere around the transformed mesh, centered on the vertex
    /// centroid.
    pub fn bounding_sphere(&self, transform: &Matrix4D) -> BoundingSphere {
        let points: Vec<Vector3> = self.positions.iter()
            .map(|p| transform.transform_point(*p))
            .collect();

        BoundingSphere::enclosing(&points)
    }
}

#[test]
fn unit_cube_faces_point_outward() {
    let cube = Mesh::unit_cube();
    assert_eq!(cube.len(), 12);

    for (p, n) in cube.positions.chunks(3).zip(cube.normals.chunks(3)) {
        let winding = TriangleInfo::face_normal(p[0], p[1], p[2]);
        assert_eq!(winding, n[0]);

        let centroid = (p[0] + p[1] + p[2]) / 3.0;
        assert!(centroid.dot(&n[0]) > 0.0);
        assert!(p.iter().all(|v| v.max_component() <= 0.5 && v.min_component() >= -0.5));
    }
}

#[test]
fn triangles_follow_transform() {
    let cube = Mesh::unit_cube();
    let m = Matrix4D::translation(0.0, 0.0, -5.0) * Matrix4D::scaling(2.0, 1.0, 1.0);
    let shapes = cube.triangles(&m, Material::default());

    assert_eq!(shapes.len(), 12);
    for s in shapes.iter() {
        let ti = s.triangle_info().unwrap();
        for p in [ti.p1, ti.p2, ti.p3].iter() {
            assert!((p.x.abs() - 1.0).abs() < 1e-9);
            assert!(p.z <= -4.5 + 1e-9 && p.z >= -5.5 - 1e-9);
        }
    }
}

#[test]
fn normals_use_inverse_transpose() {
    let mut mesh = Mesh::new();
    let n = Vector3::new(1.0, 1.0, 0.0).normalize();
    mesh.push_triangle(
        [Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 1.0, 1.0)],
        [n, n, n],
    );

    let shapes = mesh.triangles(&Matrix4D::scaling(2.0, 1.0, 1.0), Material::default());
    let ti = shapes[0].triangle_info().unwrap();

    // The slanted face x + y = 1 becomes x / 2 + y = 1.
    assert_eq!(ti.n1, Vector3::new(0.5, 1.0, 0.0).normalize());
}

#[test]
fn bounding_sphere_covers_transformed_mesh() {
    let cube = Mesh::unit_cube();
    let m = Matrix4D::translation(3.0, 0.0, 0.0);
    let b = cube.bounding_sphere(&m);

    assert!(b.valid);
    assert_eq!(b.center, Vector3::new(3.0, 0.0, 0.0));
    assert!((b.radius - 0.75f64.sqrt()).abs() < 1e-9);
    assert!(!Mesh::new().bounding_sphere(&m).valid);
}
