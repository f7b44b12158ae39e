use std::path::PathBuf;

use thiserror::Error;

use crate::vector::Vector3;

/// Errors raised by the matrix stack.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TransformError {
    #[error("cannot pop the base matrix of a matrix stack")]
    StackUnderflow,
}

/// Errors that end a render before (or instead of) writing an image.
///
/// Geometric degeneracy is never reported here; a ray that misses, grazes
/// or runs parallel to a surface is simply a miss.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unknown scene id {0}")]
    UnknownScene(u32),

    #[error("image size must be at least 1 pixel, got {0}")]
    InvalidImageSize(u32),

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode or encode image {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("malformed OBJ file {path:?} at line {line}: {message}")]
    Obj {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("mesh {0:?} contains no triangles")]
    EmptyMesh(PathBuf),

    #[error("camera at {eye:?} cannot look at {target:?} with up {up:?}")]
    DegenerateCamera {
        eye: Vector3,
        target: Vector3,
        up: Vector3,
    },

    #[error("invalid scene file {path:?}: {source}")]
    SceneFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Transform(#[from] TransformError),
}

pub type RenderResult<T> = Result<T, RenderError>;
