use std::fmt;
use std::ops::{ Index, IndexMut, Mul };
use std::convert::From;

use crate::feq;
use crate::vector::Vector3;

/// A 4x4 affine transformation matrix, stored row-major.
///
/// Points and directions are both `Vector3`s, so the homogeneous `w`
/// component is chosen by the method used to apply the matrix:
/// `transform_point` treats the vector as `w == 1` (translation applies),
/// `transform_vector` as `w == 0` (translation ignored).
///
/// For methods which modify matrices, they are provided in pairs; one which
/// modifies the matrix in-place (`transpose`), and one which returns a new
/// matrix (`transposition`).
///
/// # Examples
///
/// Calculating a view transformation (for cameras, etc.):
///
/// ```
/// # use whitted::vector::Vector3;
/// # use whitted::matrix::Matrix4D;
/// let from = Vector3::new(0.0, 0.0, 8.0);
/// let to = Vector3::new(0.0, 0.0, 0.0);
/// let up = Vector3::new(0.0, 1.0, 0.0);
/// let view = Matrix4D::view_transform(from, to, up);
///
/// assert_eq!(view, Matrix4D::translation(0.0, 0.0, -8.0));
/// ```
#[derive(Copy, Clone, Debug, PartialOrd)]
pub struct Matrix4D {
    data: [f64; 16],
}

/// Determines whether two `Matrix4D`s are equal.
///
/// Matrices are compared element-wise. Note that equality is approximate, as
/// `Matrix4D` elements are floating point numbers.
impl PartialEq for Matrix4D {
    fn eq(&self, other: &Matrix4D) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(x, y)| feq(*x, *y))
    }
}

impl Default for Matrix4D {
    fn default() -> Matrix4D {
        Matrix4D::identity()
    }
}

impl Matrix4D {
    /// Creates a new `Matrix4D`. All elements are initialized to `0.0`.
    pub fn new() -> Matrix4D {
        Matrix4D { data: [0.0; 16] }
    }

    /// Instantiates a 4x4 identity matrix.
    pub fn identity() -> Matrix4D {
        let mut buf = [0.0; 16];
        buf[0] = 1.0; buf[5] = 1.0; buf[10] = 1.0; buf[15] = 1.0;

        Matrix4D { data: buf }
    }

    /// Instantiates a translation matrix, offsetting points by `x`, `y`, `z`.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut trans = Self::identity();
        trans[(0, 3)] = x;
        trans[(1, 3)] = y;
        trans[(2, 3)] = z;

        trans
    }

    /// Instantiates a scaling matrix.
    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut scale = Self::identity();
        scale[(0, 0)] = x;
        scale[(1, 1)] = y;
        scale[(2, 2)] = z;

        scale
    }

    /// Rotates about the X axis by `r` radians (right-handed).
    ///
    /// ```
    /// # use whitted::vector::Vector3;
    /// # use whitted::matrix::Matrix4D;
    /// let m = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
    /// assert_eq!(m.transform_point(Vector3::new(0.0, 1.0, 0.0)),
    ///     Vector3::new(0.0, 0.0, 1.0));
    /// ```
    pub fn rotation_x(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(1, 1)] =  r.cos();
        rotate[(1, 2)] = -r.sin();
        rotate[(2, 1)] =  r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Rotates about the Y axis by `r` radians (right-handed).
    pub fn rotation_y(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 2)] =  r.sin();
        rotate[(2, 0)] = -r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Rotates about the Z axis by `r` radians (right-handed).
    pub fn rotation_z(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 1)] = -r.sin();
        rotate[(1, 0)] =  r.sin();
        rotate[(1, 1)] =  r.cos();

        rotate
    }

    /// Rotates by `r` radians about an arbitrary `axis` (Rodrigues' formula).
    ///
    /// The axis does not need to be unit length, but must be non-zero.
    pub fn rotation(r: f64, axis: Vector3) -> Matrix4D {
        let a = axis.normalize();
        let (s, c) = r.sin_cos();
        let t = 1.0 - c;

        let mut rotate = Self::identity();
        rotate[(0, 0)] = t * a.x * a.x + c;
        rotate[(0, 1)] = t * a.x * a.y - s * a.z;
        rotate[(0, 2)] = t * a.x * a.z + s * a.y;

        rotate[(1, 0)] = t * a.x * a.y + s * a.z;
        rotate[(1, 1)] = t * a.y * a.y + c;
        rotate[(1, 2)] = t * a.y * a.z - s * a.x;

        rotate[(2, 0)] = t * a.x * a.z - s * a.y;
        rotate[(2, 1)] = t * a.y * a.z + s * a.x;
        rotate[(2, 2)] = t * a.z * a.z + c;

        rotate
    }

    /// Generates a look-at view transformation.
    ///
    /// The `from` parameter is where the eye is, `to` is where the eye is
    /// looking, and `up` roughly indicates where "up" is in the world. The
    /// resulting matrix moves the *world* into the eye's frame, in which the
    /// eye sits at the origin looking down negative Z.
    pub fn view_transform(from: Vector3, to: Vector3, up: Vector3)
        -> Matrix4D {
        let forward = (to - from).normalize();
        let left = forward.cross(&up.normalize()).normalize();
        let true_up = left.cross(&forward);

        let mut orientation = Matrix4D::identity();
        orientation[(0, 0)] = left.x;
        orientation[(0, 1)] = left.y;
        orientation[(0, 2)] = left.z;

        orientation[(1, 0)] = true_up.x;
        orientation[(1, 1)] = true_up.y;
        orientation[(1, 2)] = true_up.z;

        orientation[(2, 0)] = -forward.x;
        orientation[(2, 1)] = -forward.y;
        orientation[(2, 2)] = -forward.z;

        orientation * Matrix4D::translation(-from.x, -from.y, -from.z)
    }

    /// Transposes a matrix in-place.
    pub fn transpose(&mut self) {
        for r in 0..4 {
            for c in (r+1)..4 {
                let tmp = self[(r, c)];
                self[(r, c)] = self[(c, r)];
                self[(c, r)] = tmp;
            }
        }
    }

    /// Produces the transpose of a matrix, returning a new matrix as a result.
    pub fn transposition(&self) -> Matrix4D {
        let mut buf = *self;
        buf.transpose();
        buf
    }

    /// Returns the minor of a `Matrix4D` at row and column.
    ///
    /// The "minor" is the determinant of the 3x3 matrix left over when `row`
    /// and `col` are removed.
    pub fn minor(&self, row: usize, col: usize) -> f64 {
        let mut sub = [0.0; 9];
        let mut count = 0;

        for r in (0..4).filter(|&r| r != row) {
            for c in (0..4).filter(|&c| c != col) {
                sub[count] = self[(r, c)];
                count += 1;
            }
        }

        sub[0] * (sub[4] * sub[8] - sub[5] * sub[7])
            - sub[1] * (sub[3] * sub[8] - sub[5] * sub[6])
            + sub[2] * (sub[3] * sub[7] - sub[4] * sub[6])
    }

    /// Returns the cofactor of a `Matrix4D` at row and column; the minor,
    /// negated when `row + col` is odd.
    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let m = self.minor(row, col);
        m * if (row + col) % 2 == 0 { 1.0 } else { -1.0 }
    }

    /// Calculates the determinant of a `Matrix4D`.
    pub fn determinant(&self) -> f64 {
        (0..4).map(|c| self[(0, c)] * self.cofactor(0, c)).sum()
    }

    /// Calculates the inverse of a `Matrix4D`, if it exists.
    ///
    /// If the determinant is zero or not finite (the matrix holds NaN or
    /// infinite entries), this function returns `None`.
    pub fn inverse(&self) -> Option<Matrix4D> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let mut inv = Matrix4D::new();
        for r in 0..4 {
            for c in 0..4 {
                inv[(c, r)] = self.cofactor(r, c) / det;
            }
        }

        Some(inv)
    }

    /// The matrix used to carry normals through this transform: the
    /// transpose of the inverse. Returns `None` for singular matrices.
    pub fn normal_matrix(&self) -> Option<Matrix4D> {
        self.inverse().map(|inv| inv.transposition())
    }

    /// Applies this matrix to a point (homogeneous `w == 1`).
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        let w = self[(3, 0)] * p.x + self[(3, 1)] * p.y
            + self[(3, 2)] * p.z + self[(3, 3)];
        let v = Vector3::new(
            self[(0, 0)] * p.x + self[(0, 1)] * p.y + self[(0, 2)] * p.z
                + self[(0, 3)],
            self[(1, 0)] * p.x + self[(1, 1)] * p.y + self[(1, 2)] * p.z
                + self[(1, 3)],
            self[(2, 0)] * p.x + self[(2, 1)] * p.y + self[(2, 2)] * p.z
                + self[(2, 3)],
        );

        // Affine matrices always leave w at 1.
        if w != 1.0 && w != 0.0 { v / w } else { v }
    }

    /// Applies this matrix to a direction (homogeneous `w == 0`).
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            self[(0, 0)] * v.x + self[(0, 1)] * v.y + self[(0, 2)] * v.z,
            self[(1, 0)] * v.x + self[(1, 1)] * v.y + self[(1, 2)] * v.z,
            self[(2, 0)] * v.x + self[(2, 1)] * v.y + self[(2, 2)] * v.z,
        )
    }
}

impl From<[f64; 16]> for Matrix4D {
    fn from(data: [f64; 16]) -> Matrix4D {
        Matrix4D { data }
    }
}

impl Index<(usize, usize)> for Matrix4D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 4) + index.1]
    }
}

impl IndexMut<(usize, usize)> for Matrix4D {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[(index.0 * 4) + index.1]
    }
}

/// Multiplication between two matrices.
///
/// Matrix multiplication is not commutative; `A * B` applies `B` first when
/// the product is applied to a point.
///
/// # Examples
///
/// ```
/// # use whitted::matrix::Matrix4D;
/// let m1 = Matrix4D::scaling(2.0, 3.0, 4.0);
/// let m2 = Matrix4D::scaling(4.0, 3.0, 2.0);
/// assert_eq!(m1 * m2, Matrix4D::scaling(8.0, 9.0, 8.0));
/// ```
impl Mul<Matrix4D> for Matrix4D {
    type Output = Matrix4D;

    fn mul(self, other: Matrix4D) -> Matrix4D {
        let mut res = Matrix4D::new();

        for r in 0..4 {
            for c in 0..4 {
                res[(r, c)] = self[(r, 0)] * other[(0, c)]
                    + self[(r, 1)] * other[(1, c)]
                    + self[(r, 2)] * other[(2, c)]
                    + self[(r, 3)] * other[(3, c)]
            }
        }

        res
    }
}

impl fmt::Display for Matrix4D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            write!(f, "|")?;
            for c in 0..4 {
                write!(f, " {} |", self[(r, c)])?;
            }

            // Don't put a newline on the final row (allow the user to do that)
            if r != 3 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[test]
fn identity() {
    let i = Matrix4D::identity();
    let a: Matrix4D = [ 0.0, 1.0,  2.0,  4.0,
                        1.0, 2.0,  4.0,  8.0,
                        2.0, 4.0,  8.0, 16.0,
                        4.0, 8.0, 16.0, 32.0, ].into();

    assert_eq!(i * a, a);
    assert_eq!(a * i, a);
}

#[test]
fn transpose() {
     let a: Matrix4D = [ 0.0, 9.0, 3.0, 0.0,
                         9.0, 8.0, 0.0, 8.0,
                         1.0, 8.0, 5.0, 3.0,
                         0.0, 0.0, 5.0, 8.0, ].into();

     let t: Matrix4D = [ 0.0, 9.0, 1.0, 0.0,
                         9.0, 8.0, 8.0, 0.0,
                         3.0, 0.0, 5.0, 5.0,
                         0.0, 8.0, 3.0, 8.0, ].into();

     assert_eq!(t, a.transposition());
     assert_eq!(t.transposition(), a);
}

#[test]
fn determinant_4x4() {
    let a: Matrix4D = [ -2.0, -8.0,  3.0,  5.0,
                        -3.0,  1.0,  7.0,  3.0,
                         1.0,  2.0, -9.0,  6.0,
                        -6.0,  7.0,  7.0, -9.0, ].into();

    assert_eq!(a.cofactor(0, 0), 690.0);
    assert_eq!(a.cofactor(0, 1), 447.0);
    assert_eq!(a.cofactor(0, 2), 210.0);
    assert_eq!(a.cofactor(0, 3), 51.0);
    assert_eq!(a.determinant(), -4071.0);
}

#[test]
fn singular_matrix_has_no_inverse() {
    let a: Matrix4D = [ -4.0,  2.0, -2.0, -3.0,
                         9.0,  6.0,  2.0,  6.0,
                         0.0, -5.0,  1.0, -5.0,
                         0.0,  0.0,  0.0,  0.0, ].into();

    assert_eq!(a.determinant(), 0.0);
    assert!(a.inverse().is_none());
}

#[test]
fn product_times_inverse() {
    let a: Matrix4D = [  3.0, -9.0,  7.0,  3.0,
                         3.0, -8.0,  2.0, -9.0,
                        -4.0,  4.0,  4.0,  1.0,
                        -6.0,  5.0, -1.0,  1.0, ].into();
    let b: Matrix4D = [  8.0,  2.0,  2.0,  2.0,
                         3.0, -1.0,  7.0,  0.0,
                         7.0,  0.0,  5.0,  4.0,
                         6.0, -2.0,  0.0,  5.0, ].into();

    let c = a * b;
    assert_eq!(c * b.inverse().unwrap(), a);
}

#[test]
fn translation_moves_points_not_vectors() {
    let m = Matrix4D::translation(5.0, -3.0, 2.0);
    let p = Vector3::new(-3.0, 4.0, 5.0);

    assert_eq!(m.transform_point(p), Vector3::new(2.0, 1.0, 7.0));
    assert_eq!(m.transform_vector(p), p);
    assert_eq!(m.inverse().unwrap().transform_point(p),
        Vector3::new(-8.0, 7.0, 3.0));
}

#[test]
fn rotation_about_axis_matches_principal_rotations() {
    let r = std::f64::consts::PI / 3.0;

    assert_eq!(Matrix4D::rotation(r, Vector3::new(1.0, 0.0, 0.0)),
        Matrix4D::rotation_x(r));
    assert_eq!(Matrix4D::rotation(r, Vector3::new(0.0, 2.0, 0.0)),
        Matrix4D::rotation_y(r));
    assert_eq!(Matrix4D::rotation(r, Vector3::new(0.0, 0.0, 1.0)),
        Matrix4D::rotation_z(r));
}

#[test]
fn view_transform_looking_positive_z() {
    let from = Vector3::new(0.0, 0.0, 0.0);
    let to = Vector3::new(0.0, 0.0, 1.0);
    let up = Vector3::new(0.0, 1.0, 0.0);

    assert_eq!(Matrix4D::view_transform(from, to, up),
        Matrix4D::scaling(-1.0, 1.0, -1.0));
}

#[test]
fn normal_matrix_of_non_uniform_scale() {
    let m = Matrix4D::scaling(2.0, 4.0, 1.0);
    let n = m.normal_matrix().unwrap();

    assert_eq!(n.transform_vector(Vector3::new(1.0, 1.0, 1.0)),
        Vector3::new(0.5, 0.25, 1.0));
}

#[test]
fn non_finite_matrix_has_no_inverse() {
    let mut m = Matrix4D::identity();
    m[(0, 0)] = std::f64::NAN;
    assert_eq!(m.inverse(), None);

    m[(0, 0)] = std::f64::INFINITY;
    assert_eq!(m.inverse(), None);
    assert_eq!(m.normal_matrix(), None);
}
