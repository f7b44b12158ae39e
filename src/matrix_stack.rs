use crate::error::TransformError;
use crate::matrix::Matrix4D;
use crate::vector::Vector3;

/// A LIFO stack of affine transforms.
///
/// The stack always holds at least one matrix (the base, initially the
/// identity). Every operation right-multiplies the top matrix, so the most
/// recently applied transform is the first to act on a point.
///
/// # Examples
///
/// ```
/// # use whitted::matrix_stack::MatrixStack;
/// # use whitted::vector::Vector3;
/// let mut stack = MatrixStack::new();
/// stack.translate(Vector3::new(1.0, 0.0, 0.0));
/// stack.push();
/// stack.scale(Vector3::splat(2.0));
/// assert_eq!(stack.top().transform_point(Vector3::new(1.0, 1.0, 1.0)),
///     Vector3::new(3.0, 2.0, 2.0));
/// stack.pop().unwrap();
/// assert_eq!(stack.top().transform_point(Vector3::new(1.0, 1.0, 1.0)),
///     Vector3::new(2.0, 1.0, 1.0));
/// ```
#[derive(Clone, Debug)]
pub struct MatrixStack {
    stack: Vec<Matrix4D>,
}

impl Default for MatrixStack {
    fn default() -> MatrixStack {
        MatrixStack::new()
    }
}

impl MatrixStack {
    pub fn new() -> MatrixStack {
        MatrixStack { stack: vec![Matrix4D::identity()] }
    }

    /// Duplicates the top matrix.
    pub fn push(&mut self) {
        let top = *self.top();
        self.stack.push(top);
    }

    /// Discards the top matrix. The base matrix can never be popped.
    pub fn pop(&mut self) -> Result<(), TransformError> {
        if self.stack.len() <= 1 {
            return Err(TransformError::StackUnderflow);
        }

        self.stack.pop();
        Ok(())
    }

    /// Number of matrices on the stack, including the base.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn top(&self) -> &Matrix4D {
        // The base matrix is never removed, so the stack is never empty.
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Matrix4D {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Replaces the top matrix with the identity.
    pub fn load_identity(&mut self) {
        *self.top_mut() = Matrix4D::identity();
    }

    pub fn multiply(&mut self, m: &Matrix4D) {
        let top = self.top_mut();
        *top = *top * *m;
    }

    pub fn translate(&mut self, t: Vector3) {
        self.multiply(&Matrix4D::translation(t.x, t.y, t.z));
    }

    pub fn scale(&mut self, s: Vector3) {
        self.multiply(&Matrix4D::scaling(s.x, s.y, s.z));
    }

    /// Rotates by `angle` radians about `axis`.
    pub fn rotate(&mut self, angle: f64, axis: Vector3) {
        self.multiply(&Matrix4D::rotation(angle, axis));
    }

    /// Rotates about X, then Y, then Z, in the order the calls are made, so
    /// points see the Z rotation first.
    pub fn rotate_xyz(&mut self, angles: Vector3) {
        self.multiply(&Matrix4D::rotation_x(angles.x));
        self.multiply(&Matrix4D::rotation_y(angles.y));
        self.multiply(&Matrix4D::rotation_z(angles.z));
    }
}

#[test]
fn new_stack_is_identity() {
    let stack = MatrixStack::new();

    assert_eq!(stack.depth(), 1);
    assert_eq!(*stack.top(), Matrix4D::identity());
}

#[test]
fn pop_base_underflows() {
    let mut stack = MatrixStack::new();

    assert_eq!(stack.pop(), Err(TransformError::StackUnderflow));

    stack.push();
    assert_eq!(stack.pop(), Ok(()));
    assert_eq!(stack.pop(), Err(TransformError::StackUnderflow));
}

#[test]
fn push_pop_restores_top() {
    let mut stack = MatrixStack::new();
    stack.translate(Vector3::new(0.0, 1.0, -10.0));
    let saved = *stack.top();

    stack.push();
    stack.rotate(1.0, Vector3::new(0.0, 1.0, 0.0));
    stack.scale(Vector3::new(2.0, 3.0, 4.0));
    assert_ne!(*stack.top(), saved);

    stack.pop().unwrap();
    assert_eq!(*stack.top(), saved);
}

#[test]
fn later_transforms_act_first() {
    let mut stack = MatrixStack::new();
    stack.translate(Vector3::new(5.0, 0.0, 0.0));
    stack.scale(Vector3::splat(2.0));

    // Scaled first, then translated.
    assert_eq!(stack.top().transform_point(Vector3::new(1.0, 0.0, 0.0)),
        Vector3::new(7.0, 0.0, 0.0));
}

#[test]
fn rotate_xyz_matches_separate_rotations() {
    let mut a = MatrixStack::new();
    a.rotate_xyz(Vector3::new(0.1, 0.2, 0.3));

    let mut b = MatrixStack::new();
    b.rotate(0.1, Vector3::new(1.0, 0.0, 0.0));
    b.rotate(0.2, Vector3::new(0.0, 1.0, 0.0));
    b.rotate(0.3, Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(*a.top(), *b.top());
}

#[test]
fn load_identity_resets_top_only() {
    let mut stack = MatrixStack::new();
    stack.translate(Vector3::new(1.0, 2.0, 3.0));
    stack.push();
    stack.load_identity();

    assert_eq!(*stack.top(), Matrix4D::identity());
    stack.pop().unwrap();
    assert_eq!(*stack.top(), Matrix4D::translation(1.0, 2.0, 3.0));
}
