use std::{fs, path::Path, str::FromStr};

use index_vec::IndexVec;
use indexmap::IndexMap;
use itertools::Itertools as _;
use thiserror::Error;

use crate::geometry::{Triangle, WorldPoint};

index_vec::define_index_type! {
    pub struct VertexIdx = u32;
}

index_vec::define_index_type! {
    pub struct TriangleIdx = u32;
}

/// Indexed triangle mesh.
/// All faces are guaranteed to reference existing vertices.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: IndexVec<VertexIdx, WorldPoint>,
    faces: IndexVec<TriangleIdx, Triangle<VertexIdx>>,
}

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse OBJ file: {0}")]
    ObjParseError(#[from] wavefront_obj::ParseError),

    #[error("Missing OFF header")]
    MissingOffHeader,

    #[error("Unexpected end of file, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("Invalid number {token:?} in {context}")]
    InvalidNumber {
        token: String,
        context: &'static str,
    },

    #[error("Face {face} has {vertex_count} vertices, only triangles are supported")]
    NonTriangularFace { face: usize, vertex_count: usize },

    #[error("Face {face} references vertex {index}, but the mesh only has {vertex_count} vertices")]
    VertexIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("Unsupported mesh file extension: {0:?}")]
    UnsupportedFormat(Option<String>),
}

impl Mesh {
    /// Creates a mesh from vertex and face buffers, validating the face indices.
    pub fn new(vertices: Vec<WorldPoint>, faces: Vec<[usize; 3]>) -> Result<Mesh, MeshError> {
        let vertex_count = vertices.len();
        let faces = faces
            .into_iter()
            .enumerate()
            .map(|(face, indices)| {
                match indices.iter().find(|&&index| index >= vertex_count) {
                    Some(&index) => Err(MeshError::VertexIndexOutOfRange {
                        face,
                        index,
                        vertex_count,
                    }),
                    None => Ok(Triangle::from(indices.map(VertexIdx::from_usize))),
                }
            })
            .collect::<Result<IndexVec<_, _>, _>>()?;

        Ok(Mesh {
            vertices: IndexVec::from_vec(vertices),
            faces,
        })
    }

    /// Loads a mesh file, picking the format based on the file extension (.off or .obj).
    pub fn load(path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let mesh = match extension.as_deref() {
            Some("off") => Self::with_off(path),
            Some("obj") => Self::with_obj(path),
            _ => Err(MeshError::UnsupportedFormat(extension)),
        }?;

        log::info!(
            "Loaded {}: {} vertices, {} triangles",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        Ok(mesh)
    }

    pub fn with_off(path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
        Self::parse_off(&fs::read_to_string(path)?)
    }

    pub fn with_obj(path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
        Self::parse_obj(&fs::read_to_string(path)?)
    }

    /// Parses the Object File Format:
    /// `OFF` header, vertex, face and edge counts, vertex coordinates and `3 a b c` faces.
    /// Comments starting with `#` are ignored.
    pub fn parse_off(content: &str) -> Result<Mesh, MeshError> {
        let mut tokens = content
            .lines()
            .map(|line| line.split_once('#').map_or(line, |(before, _comment)| before))
            .flat_map(str::split_whitespace);

        if tokens.next() != Some("OFF") {
            return Err(MeshError::MissingOffHeader);
        }

        let (vertex_count, face_count, _edge_count) = tokens
            .next_tuple()
            .ok_or(MeshError::UnexpectedEnd { expected: "element counts" })?;
        let vertex_count: usize = parse_token(vertex_count, "vertex count")?;
        let face_count: usize = parse_token(face_count, "face count")?;

        let vertices = (0..vertex_count)
            .map(|_| {
                let (x, y, z) = tokens
                    .next_tuple()
                    .ok_or(MeshError::UnexpectedEnd { expected: "vertex coordinates" })?;
                Ok(WorldPoint::new(
                    parse_token(x, "vertex coordinates")?,
                    parse_token(y, "vertex coordinates")?,
                    parse_token(z, "vertex coordinates")?,
                ))
            })
            .collect::<Result<Vec<_>, MeshError>>()?;

        let faces = (0..face_count)
            .map(|face| {
                let size = tokens
                    .next()
                    .ok_or(MeshError::UnexpectedEnd { expected: "face" })?;
                let size: usize = parse_token(size, "face vertex count")?;
                if size != 3 {
                    return Err(MeshError::NonTriangularFace {
                        face,
                        vertex_count: size,
                    });
                }
                let (a, b, c) = tokens
                    .next_tuple()
                    .ok_or(MeshError::UnexpectedEnd { expected: "face indices" })?;
                Ok([
                    parse_token(a, "face indices")?,
                    parse_token(b, "face indices")?,
                    parse_token(c, "face indices")?,
                ])
            })
            .collect::<Result<Vec<_>, MeshError>>()?;

        Self::new(vertices, faces)
    }

    /// Parses a Wavefront OBJ file, merging all objects into a single mesh.
    /// Texture coordinates and normals are ignored.
    pub fn parse_obj(content: &str) -> Result<Mesh, MeshError> {
        let parsed = wavefront_obj::obj::parse(content)?;

        let mut faces = Vec::new();
        // (object index, vertex index within object) -> merged vertex
        let mut vertices = IndexMap::new();

        for (object_index, o) in parsed.objects.iter().enumerate() {
            for geometry in &o.geometry {
                for shape in &geometry.shapes {
                    let wavefront_obj::obj::Primitive::Triangle(a, b, c) = shape.primitive else {
                        log::warn!("Skipping non-triangle primitive in object {:?}", o.name);
                        continue;
                    };

                    let mut handle_vertex = |vtindex: wavefront_obj::obj::VTNIndex| {
                        let entry = vertices.entry((object_index, vtindex.0));
                        let index = entry.index();
                        entry.or_insert_with(|| {
                            let vertex = &o.vertices[vtindex.0];
                            WorldPoint::new(vertex.x, vertex.y, vertex.z)
                        });
                        index
                    };

                    faces.push([handle_vertex(a), handle_vertex(b), handle_vertex(c)]);
                }
            }
        }

        Self::new(vertices.into_values().collect(), faces)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn vertices(&self) -> &IndexVec<VertexIdx, WorldPoint> {
        &self.vertices
    }

    pub fn faces(&self) -> &IndexVec<TriangleIdx, Triangle<VertexIdx>> {
        &self.faces
    }

    /// Geometry of a single face
    pub fn triangle(&self, index: TriangleIdx) -> Triangle<WorldPoint> {
        self.faces[index].map(|v| self.vertices[*v])
    }

    pub fn triangles(&self) -> impl Iterator<Item = (TriangleIdx, Triangle<WorldPoint>)> + '_ {
        self.faces.indices().map(|i| (i, self.triangle(i)))
    }
}

fn parse_token<T: FromStr>(token: &str, context: &'static str) -> Result<T, MeshError> {
    token.parse().map_err(|_| MeshError::InvalidNumber {
        token: token.to_owned(),
        context,
    })
}
