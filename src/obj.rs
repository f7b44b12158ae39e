use std::fs::File;
use std::io::{ self, BufRead, BufReader };
use std::path::{ Path, PathBuf };

use log::{ info, warn };

use crate::error::{ RenderError, RenderResult };
use crate::mesh::Mesh;
use crate::vector::Vector3;

/// One corner of a face: a vertex index, plus an optional normal index.
/// Indices are zero-based once parsed.
type ObjCorner = (usize, Option<usize>);

/// A parser for Wavefront OBJ files.
///
/// Only geometry is read: `v`, `vn` and `f` records. Faces may reference
/// vertices as `v`, `v/t`, `v//n` or `v/t/n`; texture indices are skipped.
/// Polygons are fan triangulated into `mesh`.
#[derive(Clone, Debug)]
pub struct ObjParser {
    pub path: PathBuf,
    pub ignored_lines: usize,

    pub vertices: Vec<Vector3>,
    pub normals: Vec<Vector3>,
    pub mesh: Mesh,
}

impl ObjParser {
    /// Creates a new `ObjParser` to parse the OBJ file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> ObjParser {
        ObjParser {
            path: path.as_ref().into(),
            ignored_lines: 0,

            vertices: Vec::new(),
            normals: Vec::new(),
            mesh: Mesh::new(),
        }
    }

    /// Parses a mesh file, failing if it can't be read, is malformed, or
    /// contains no triangles.
    pub fn load<P: AsRef<Path>>(path: P) -> RenderResult<Mesh> {
        let mut parser = ObjParser::new(path);
        parser.parse()?;

        if parser.mesh.is_empty() {
            return Err(RenderError::EmptyMesh(parser.path));
        }

        info!("loaded mesh {} ({} triangles)", parser.path.display(), parser.mesh.len());
        Ok(parser.mesh)
    }

    /// Parses the OBJ file at `path`.
    ///
    /// Unsupported commands are ignored. Each ignored command increments
    /// `ignored_lines` by 1; blank lines and comments are skipped silently.
    pub fn parse(&mut self) -> RenderResult<()> {
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        self.parse_reader(BufReader::new(file))
    }

    /// Parses OBJ records from any buffered reader.
    pub fn parse_reader<R: BufRead>(&mut self, reader: R) -> RenderResult<()> {
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            self.handle_command(&line)
                .map_err(|message| RenderError::Obj {
                    path: self.path.clone(),
                    line: i + 1,
                    message,
                })?;
        }

        if self.ignored_lines > 0 {
            warn!("{}: ignored {} unsupported lines",
                self.path.display(), self.ignored_lines);
        }

        Ok(())
    }

    fn io_error(&self, source: io::Error) -> RenderError {
        RenderError::Io { path: self.path.clone(), source }
    }

    /// Parses a line of an OBJ file.
    ///
    /// A sample OBJ file may look like the following:
    ///
    /// ```obj
    /// v -1 1 0
    /// v -1 0 0
    /// v 1 0 0
    /// v 1 1 0
    /// vn 0 0 1
    ///
    /// f 1//1 2//1 3//1
    /// f 1 3 4
    /// ```
    ///
    /// The first word of each line names a command, and the rest are its
    /// arguments.
    fn handle_command(&mut self, line: &str) -> Result<(), String> {
        let mut params = line.split_whitespace();

        match params.next() {
            None => (),
            Some(c) if c.starts_with('#') => (),
            Some("v") => {
                let v = Self::parse_vector(params)?;
                self.vertices.push(v);
            },
            Some("vn") => {
                let n = Self::parse_vector(params)?;
                self.normals.push(n);
            },
            Some("f") => {
                let face = params
                    .map(|corner| self.parse_corner(corner))
                    .collect::<Result<Vec<_>, _>>()?;

                if face.len() < 3 {
                    return Err(format!("face has {} vertices", face.len()));
                }

                self.fan_triangulation(&face);
            },
            Some(_) => self.ignored_lines += 1,
        }

        Ok(())
    }

    fn parse_vector<'a, I: Iterator<Item = &'a str>>(params: I)
        -> Result<Vector3, String> {
        let xyz = params.take(3)
            .map(|p| p.parse::<f64>().map_err(|e| format!("{:?}: {}", p, e)))
            .collect::<Result<Vec<_>, _>>()?;

        if xyz.len() < 3 {
            return Err(format!("expected 3 coordinates, got {}", xyz.len()));
        }

        Ok(Vector3::new(xyz[0], xyz[1], xyz[2]))
    }

    /// Parses `v`, `v/t`, `v//n` or `v/t/n`.
    fn parse_corner(&self, corner: &str) -> Result<ObjCorner, String> {
        let mut attributes = corner.split('/');

        let v = match attributes.next() {
            Some(v) => Self::resolve_index(v, self.vertices.len())?,
            None => return Err(format!("empty face vertex {:?}", corner)),
        };

        // Texture coordinates are not used.
        let _ = attributes.next();

        let n = match attributes.next() {
            Some(n) if !n.is_empty() => Some(Self::resolve_index(n, self.normals.len())?),
            _ => None,
        };

        Ok((v, n))
    }

    /// Turns a one-based (or negative, relative) OBJ index into a
    /// zero-based index, checking it against the records read so far.
    fn resolve_index(index: &str, count: usize) -> Result<usize, String> {
        let i: i64 = index.parse().map_err(|e| format!("{:?}: {}", index, e))?;

        let resolved = if i > 0 {
            i - 1
        } else {
            count as i64 + i
        };

        if i == 0 || resolved < 0 || resolved >= count as i64 {
            return Err(format!("index {} out of range (have {})", i, count));
        }

        Ok(resolved as usize)
    }

    /// Partitions a polygon into triangles.
    ///
    /// ```text
    ///         B *
    ///          / \
    ///         /   \
    ///     A *       * C
    ///       |       |
    ///     E * ----- * D
    /// ```
    ///
    /// Starting from `A`, the fan is `A-B-C`, `A-C-D`, `A-D-E`. Faces which
    /// give a normal for every corner keep them; otherwise each triangle gets
    /// its flat face normal.
    fn fan_triangulation(&mut self, face: &[ObjCorner]) {
        for i in 1..(face.len() - 1) {
            let corners = [face[0], face[i], face[i + 1]];
            let p = [
                self.vertices[corners[0].0],
                self.vertices[corners[1].0],
                self.vertices[corners[2].0],
            ];

            match (corners[0].1, corners[1].1, corners[2].1) {
                (Some(n1), Some(n2), Some(n3)) => {
                    let n = [self.normals[n1], self.normals[n2], self.normals[n3]];
                    self.mesh.push_triangle(p, n);
                },
                _ => self.mesh.push_flat_triangle(p),
            }
        }
    }
}

#[cfg(test)]
fn parse_model(name: &str) -> ObjParser {
    let mut obj_parser = ObjParser::new(format!("./models/{}", name));
    obj_parser.parse().unwrap();
    obj_parser
}

#[test]
fn ignoring_unrecognized_lines() {
    let obj_parser = parse_model("gibberish.obj");

    assert_eq!(obj_parser.ignored_lines, 5);
    assert!(obj_parser.mesh.is_empty());
}

#[test]
fn vertex_records() {
    let obj_parser = parse_model("vertices.obj");

    assert_eq!(obj_parser.vertices[0], Vector3::new(-1.0, 1.0, 0.0));
    assert_eq!(obj_parser.vertices[1], Vector3::new(-1.0, 0.5, 0.0));
    assert_eq!(obj_parser.vertices[2], Vector3::new( 1.0, 0.0, 0.0));
    assert_eq!(obj_parser.vertices[3], Vector3::new( 1.0, 1.0, 0.0));
}

#[test]
fn parsing_triangle_faces() {
    let obj_parser = parse_model("vertices-and-faces.obj");
    let mesh = &obj_parser.mesh;
    let v = &obj_parser.vertices;

    assert_eq!(mesh.len(), 2);
    assert_eq!(mesh.positions, vec![v[0], v[1], v[2], v[0], v[2], v[3]]);

    // No normals in the file: flat normals facing +Z.
    assert!(mesh.normals.iter().all(|n| *n == Vector3::new(0.0, 0.0, 1.0)));
}

#[test]
fn triangulating_polygons() {
    let obj_parser = parse_model("vertices-and-polygon.obj");
    let mesh = &obj_parser.mesh;
    let v = &obj_parser.vertices;

    assert_eq!(mesh.len(), 3);
    assert_eq!(mesh.positions, vec![
        v[0], v[1], v[2],
        v[0], v[2], v[3],
        v[0], v[3], v[4],
    ]);
}

#[test]
fn vertex_normal_records() {
    let obj_parser = parse_model("normal-record.obj");

    assert_eq!(obj_parser.normals[0], Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(obj_parser.normals[1], Vector3::new(0.707, 0.0, -0.707));
    assert_eq!(obj_parser.normals[2], Vector3::new(1.0, 2.0, 3.0));
}

#[test]
fn faces_with_normals() {
    let obj_parser = parse_model("faces-with-normals.obj");
    let mesh = &obj_parser.mesh;
    let n = &obj_parser.normals;

    assert_eq!(mesh.len(), 2);
    assert_eq!(&mesh.normals[0..3], &[n[2], n[0], n[1]]);
    assert_eq!(mesh.positions[0..3], mesh.positions[3..6]);
    assert_eq!(mesh.normals[0..3], mesh.normals[3..6]);
}

#[test]
fn relative_indices() {
    let mut obj_parser = ObjParser::new("inline.obj");
    obj_parser.parse_reader("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n".as_bytes())
        .unwrap();

    assert_eq!(obj_parser.mesh.positions, obj_parser.vertices);
}

#[test]
fn out_of_range_index_is_an_error() {
    let mut obj_parser = ObjParser::new("./models/bad-index.obj");

    match obj_parser.parse() {
        Err(RenderError::Obj { line, .. }) => assert_eq!(line, 5),
        other => panic!("expected an OBJ error, got {:?}", other),
    }
}

#[test]
fn malformed_number_is_an_error() {
    let mut obj_parser = ObjParser::new("inline.obj");
    let result = obj_parser.parse_reader("v 1 2 3\nv 1 x 3\n".as_bytes());

    match result {
        Err(RenderError::Obj { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected an OBJ error, got {:?}", other),
    }
}

#[test]
fn missing_and_empty_meshes_fail_to_load() {
    match ObjParser::load("./models/no-such-model.obj") {
        Err(RenderError::Io { .. }) => (),
        other => panic!("expected an IO error, got {:?}", other),
    }

    match ObjParser::load("./models/vertices.obj") {
        Err(RenderError::EmptyMesh(_)) => (),
        other => panic!("expected an empty mesh error, got {:?}", other),
    }

    assert_eq!(ObjParser::load("./models/tetrahedron.obj").unwrap().len(), 4);
}
