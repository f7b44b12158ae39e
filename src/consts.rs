// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Offset applied to secondary ray origins, and the minimum accepted hit
// distance along any ray.
pub const RAY_EPSILON: f64 = 1e-5;

// Rays closer to parallel than this never hit planes or triangles.
pub const PARALLEL_EPSILON: f64 = 1e-8;

// Maximum recursion depth for reflected rays
pub const MAX_TRACE_DEPTH: usize = 7;

// Ambient occlusion estimator
pub const AO_SAMPLES: usize = 64;
pub const AO_MAX_DISTANCE: f64 = 2.0;
pub const AO_REFLECTION_WEIGHT: f64 = 0.3;

// Default pinhole camera
pub const DEFAULT_FOV_DEGREES: f64 = 45.0;
pub const DEFAULT_Z_PLANE: f64 = 4.0;
