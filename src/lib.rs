pub mod consts;
pub mod error;

pub mod vector;
pub mod matrix;
pub mod matrix_stack;
pub mod ray;

pub mod geometry;
pub mod intersect;
pub mod shape;
pub mod texture;
pub mod light;
pub mod world;
pub mod camera;

pub mod color;
pub mod canvas;

pub mod mesh;
pub mod obj;
pub mod scene_graph;
pub mod scene;

use consts::FEQ_EPSILON;

pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
