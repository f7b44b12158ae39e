use crate::error::TransformError;
use crate::matrix::Matrix4D;
use crate::matrix_stack::MatrixStack;
use crate::vector::Vector3;

/// Handle to a `Component` inside a `SceneGraph`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentId(pub usize);

/// One rigid part of an articulated body.
///
/// A component is placed relative to its parent: it moves to its joint,
/// rotates about it, then offsets and sizes its mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    pub trans_joint: Vector3,

    /// Joint rotation about X, Y and Z, in radians.
    pub rotate_joint: Vector3,

    pub trans_mesh: Vector3,
    pub scale: Vector3,

    pub children: Vec<ComponentId>,
}

impl Default for Component {
    fn default() -> Component {
        Component {
            trans_joint: Vector3::zero(),
            rotate_joint: Vector3::zero(),
            trans_mesh: Vector3::zero(),
            scale: Vector3::splat(1.0),
            children: Vec::new(),
        }
    }
}

impl Component {
    pub fn new(trans_joint: Vector3, rotate_joint: Vector3, trans_mesh: Vector3,
        scale: Vector3) -> Component {
        Component {
            trans_joint,
            rotate_joint,
            trans_mesh,
            scale,
            children: Vec::new(),
        }
    }
}

/// An arena of components forming a tree under `root`.
///
/// Components are only ever created as the root or as the child of an
/// existing component, so the graph cannot contain cycles.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    components: Vec<Component>,
    root: ComponentId,
}

impl SceneGraph {
    pub fn new(root: Component) -> SceneGraph {
        SceneGraph {
            components: vec![root],
            root: ComponentId(0),
        }
    }

    pub fn root(&self) -> ComponentId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id.0)
    }

    /// Adds `child` under `parent`. Returns `None` if `parent` isn't in
    /// this graph.
    pub fn add_child(&mut self, parent: ComponentId, child: Component)
        -> Option<ComponentId> {
        if parent.0 >= self.components.len() {
            return None;
        }

        let id = ComponentId(self.components.len());
        self.components.push(child);
        self.components[parent.0].children.push(id);
        Some(id)
    }

    /// Walks the tree depth-first from the root, calling `visit` with each
    /// component's full model matrix.
    ///
    /// The stack is left as it was found. Children see their parent's joint
    /// and mesh placement but not its scale.
    pub fn traverse<F>(&self, stack: &mut MatrixStack, mut visit: F)
        -> Result<(), TransformError>
        where F: FnMut(ComponentId, &Matrix4D) {
        self.traverse_from(self.root, stack, &mut visit)
    }

    fn traverse_from<F>(&self, id: ComponentId, stack: &mut MatrixStack, visit: &mut F)
        -> Result<(), TransformError>
        where F: FnMut(ComponentId, &Matrix4D) {
        let c = match self.get(id) {
            Some(c) => c,
            None => return Ok(()),
        };

        stack.push();
        stack.translate(c.trans_joint);
        stack.rotate_xyz(c.rotate_joint);
        stack.translate(c.trans_mesh);
        stack.scale(c.scale);

        visit(id, stack.top());

        for &child in c.children.iter() {
            stack.push();
            stack.scale(Vector3::splat(1.0) / c.scale);
            self.traverse_from(child, stack, visit)?;
            stack.pop()?;
        }

        stack.pop()
    }

    /// A ten-part humanoid: torso, head, and two-segment arms and legs.
    pub fn figure() -> SceneGraph {
        let v = Vector3::new;
        let zero = Vector3::zero();

        let mut graph = SceneGraph::new(
            Component::new(zero, v(0.1, 0.0, 0.0), zero, v(1.5, 2.5, 1.0)));
        let torso = graph.root();

        graph.add_child(torso,
            Component::new(v(0.0, 1.55, 0.0), zero, zero, v(0.75, 0.75, 0.75)));

        let limbs = [
            // Arms
            ((v(-0.75, 0.95, 0.0), v(-0.75, 0.0, 0.0), v(1.5, 0.5, 0.5)),
             (v(-0.8, 0.0, 0.0), v(-0.6, 0.0, 0.0), v(1.35, 0.4, 0.4))),
            ((v(0.75, 0.95, 0.0), v(0.75, 0.0, 0.0), v(1.5, 0.5, 0.5)),
             (v(0.8, 0.0, 0.0), v(0.6, 0.0, 0.0), v(1.35, 0.4, 0.4))),
            // Legs
            ((v(-0.35, -1.25, 0.0), v(0.0, -0.75, 0.0), v(0.6, 1.6, 0.6)),
             (v(0.0, -0.75, 0.0), v(0.0, -0.75, 0.0), v(0.5, 1.5, 0.5))),
            ((v(0.35, -1.25, 0.0), v(0.0, -0.75, 0.0), v(0.6, 1.6, 0.6)),
             (v(0.0, -0.75, 0.0), v(0.0, -0.75, 0.0), v(0.5, 1.5, 0.5))),
        ];

        for &((joint, mesh, scale), (lower_joint, lower_mesh, lower_scale)) in limbs.iter() {
            if let Some(upper) = graph.add_child(torso,
                Component::new(joint, zero, mesh, scale)) {
                graph.add_child(upper,
                    Component::new(lower_joint, zero, lower_mesh, lower_scale));
            }
        }

        graph
    }
}

#[cfg(test)]
fn collect(graph: &SceneGraph) -> Vec<(ComponentId, Matrix4D)> {
    let mut stack = MatrixStack::new();
    let mut visited = Vec::new();
    graph.traverse(&mut stack, |id, m| visited.push((id, *m))).unwrap();

    assert_eq!(stack.depth(), 1);
    visited
}

#[test]
fn single_component_model_matrix() {
    let graph = SceneGraph::new(Component::new(
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::zero(),
        Vector3::new(0.0, 2.0, 0.0),
        Vector3::new(3.0, 3.0, 3.0),
    ));

    let visited = collect(&graph);
    assert_eq!(visited.len(), 1);
    assert_eq!(visited[0].1.transform_point(Vector3::new(1.0, 1.0, 1.0)),
        Vector3::new(4.0, 5.0, 3.0));
}

#[test]
fn children_do_not_inherit_scale() {
    let mut graph = SceneGraph::new(Component::new(
        Vector3::zero(),
        Vector3::zero(),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(4.0, 2.0, 1.0),
    ));
    let root = graph.root();
    let child = graph.add_child(root, Component::new(
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::zero(),
        Vector3::zero(),
        Vector3::splat(1.0),
    )).unwrap();

    let visited = collect(&graph);
    assert_eq!(visited[1].0, child);

    // Parent's mesh offset carries over, its scale does not.
    let m = visited[1].1;
    assert_eq!(m.transform_point(Vector3::zero()), Vector3::new(1.0, 1.0, 0.0));
    assert_eq!(m.transform_vector(Vector3::new(1.0, 1.0, 1.0)), Vector3::new(1.0, 1.0, 1.0));
}

#[test]
fn joint_rotation_carries_to_children() {
    let mut graph = SceneGraph::new(Component::new(
        Vector3::zero(),
        Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2),
        Vector3::zero(),
        Vector3::splat(1.0),
    ));
    let root = graph.root();
    graph.add_child(root, Component::new(
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::zero(),
        Vector3::zero(),
        Vector3::splat(1.0),
    ));

    let visited = collect(&graph);
    assert_eq!(visited[1].1.transform_point(Vector3::zero()), Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn traversal_is_depth_first() {
    let graph = SceneGraph::figure();
    let order: Vec<usize> = collect(&graph).iter().map(|(id, _)| id.0).collect();

    assert_eq!(graph.len(), 10);
    // torso, head, then each upper limb followed by its lower limb
    assert_eq!(order, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn figure_head_sits_above_torso() {
    let graph = SceneGraph::figure();
    let visited = collect(&graph);
    let head = visited[1].1;

    let expected = Matrix4D::rotation_x(0.1).transform_point(Vector3::new(0.0, 1.55, 0.0));
    assert_eq!(head.transform_point(Vector3::zero()), expected);

    // The head keeps its own size, not the torso's.
    assert!((head.transform_vector(Vector3::new(1.0, 0.0, 0.0)).magnitude() - 0.75).abs() < 1e-9);
}

#[test]
fn bad_parent_is_rejected() {
    let mut graph = SceneGraph::new(Component::default());

    assert_eq!(graph.add_child(ComponentId(7), Component::default()), None);
    assert_eq!(graph.len(), 1);
}
