//! The capability contracts connecting the codec to mesh storage.
//!
//! The codec never owns mesh data. The [`Writer`][crate::Writer] pulls
//! geometry out of a [`MeshSource`] and the [`Reader`][crate::Reader]
//! pushes parsed geometry into a [`MeshSink`]. Both traits speak in
//! *mesh-local*, zero-based, contiguous indices; the cumulative file-wide
//! numbering of the OBJ format never leaks through them.

use cgmath::{Point2, Point3, Vector3};


/// A triangular face, described by three corner index triples.
///
/// All indices are local to the owning mesh: zero-based and assigned in
/// push order. `normals`/`texcoords` are `None` if the face doesn't
/// reference the respective pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Vertex index of each corner.
    pub vertices: [usize; 3],

    /// Vertex-normal index of each corner, if any.
    pub normals: Option<[usize; 3]>,

    /// Texture-coordinate index of each corner, if any.
    pub texcoords: Option<[usize; 3]>,
}

impl Face {
    /// Creates a face from vertex indices only.
    pub fn new(vertices: [usize; 3]) -> Self {
        Self {
            vertices,
            normals: None,
            texcoords: None,
        }
    }
}


// ===========================================================================
// ===== MeshSource
// ===========================================================================

/// A read-only view of one triangle mesh, consumed by the writer.
///
/// All indices are local to this mesh and zero-based. Implementations must
/// hand out faces whose indices lie within the respective counts; the
/// writer trusts this and does not re-validate.
pub trait MeshSource {
    /// The object name written as the `o` record. May be empty.
    fn name(&self) -> &str;

    fn vertex_count(&self) -> usize;
    fn normal_count(&self) -> usize;
    fn texcoord_count(&self) -> usize;
    fn face_count(&self) -> usize;

    fn vertex(&self, i: usize) -> Point3<f64>;
    fn normal(&self, i: usize) -> Vector3<f64>;
    fn texcoord(&self, i: usize) -> Point2<f64>;
    fn face(&self, i: usize) -> Face;
}


// ===========================================================================
// ===== MeshSink
// ===========================================================================

/// A write-only mesh builder, driven by the reader.
///
/// The reader calls the methods in this order for every mesh in the file:
/// `begin_mesh`, then any number of `push_*` calls interleaved with face
/// groups (`begin_face`, `set_face_vertices`, optionally
/// `set_face_normals`/`set_face_texcoords`, `end_face`), then `end_mesh`.
/// The `push_*` methods return the local index assigned to the pushed
/// element, which is always the number of elements of that kind pushed so
/// far for the current mesh.
///
/// Sinks that don't care about normals or texture coordinates can rely on
/// the defaulted no-op methods.
pub trait MeshSink {
    /// Called when a new mesh starts. `name` is empty for geometry that
    /// appears before any `o`/`g` directive.
    fn begin_mesh(&mut self, name: &str);

    /// Appends a vertex and returns its local index.
    fn push_vertex(&mut self, position: Point3<f64>) -> usize;

    /// Appends a vertex normal and returns its local index.
    fn push_normal(&mut self, _normal: Vector3<f64>) -> usize {
        0
    }

    /// Appends a texture coordinate and returns its local index.
    fn push_texcoord(&mut self, _texcoord: Point2<f64>) -> usize {
        0
    }

    /// Called before the corner indices of a face are set. The reader only
    /// ever passes `3`; implementations may assert this.
    fn begin_face(&mut self, corner_count: usize);

    /// Sets the vertex index of each corner of the current face.
    fn set_face_vertices(&mut self, indices: [usize; 3]);

    /// Sets the normal index of each corner of the current face.
    fn set_face_normals(&mut self, _indices: [usize; 3]) {}

    /// Sets the texture-coordinate index of each corner of the current
    /// face.
    fn set_face_texcoords(&mut self, _indices: [usize; 3]) {}

    /// Called after all indices of the current face are set.
    fn end_face(&mut self) {}

    /// Called when the current mesh is complete (next name directive or
    /// end of input).
    fn end_mesh(&mut self) {}
}


// ===========================================================================
// ===== Convenience implementations
// ===========================================================================

/// A plain in-memory mesh buffer.
///
/// This is the trivial [`MeshSource`]: handy for tests, small tools and as
/// the element type collected by [`MeshCollector`]. It performs no
/// validation; faces with out-of-range indices are the caller's problem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Point3<f64>>,
    pub normals: Vec<Vector3<f64>>,
    pub texcoords: Vec<Point2<f64>>,
    pub faces: Vec<Face>,
}

impl MeshData {
    /// Returns an empty mesh with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            .. Self::default()
        }
    }
}

impl MeshSource for MeshData {
    fn name(&self) -> &str {
        &self.name
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
    fn normal_count(&self) -> usize {
        self.normals.len()
    }
    fn texcoord_count(&self) -> usize {
        self.texcoords.len()
    }
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, i: usize) -> Point3<f64> {
        self.vertices[i]
    }
    fn normal(&self, i: usize) -> Vector3<f64> {
        self.normals[i]
    }
    fn texcoord(&self, i: usize) -> Point2<f64> {
        self.texcoords[i]
    }
    fn face(&self, i: usize) -> Face {
        self.faces[i]
    }
}

/// A sink that collects every mesh of the file into a [`MeshData`].
#[derive(Debug, Default)]
pub struct MeshCollector {
    /// The collected meshes, in file order.
    pub meshes: Vec<MeshData>,
}

impl MeshCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self) -> &mut MeshData {
        // The reader guarantees `begin_mesh` before any push/face call.
        self.meshes.last_mut().unwrap()
    }
}

impl MeshSink for MeshCollector {
    fn begin_mesh(&mut self, name: &str) {
        self.meshes.push(MeshData::new(name));
    }

    fn push_vertex(&mut self, position: Point3<f64>) -> usize {
        let mesh = self.current();
        mesh.vertices.push(position);
        mesh.vertices.len() - 1
    }

    fn push_normal(&mut self, normal: Vector3<f64>) -> usize {
        let mesh = self.current();
        mesh.normals.push(normal);
        mesh.normals.len() - 1
    }

    fn push_texcoord(&mut self, texcoord: Point2<f64>) -> usize {
        let mesh = self.current();
        mesh.texcoords.push(texcoord);
        mesh.texcoords.len() - 1
    }

    fn begin_face(&mut self, corner_count: usize) {
        assert_eq!(corner_count, 3);
        self.current().faces.push(Face::new([0; 3]));
    }

    fn set_face_vertices(&mut self, indices: [usize; 3]) {
        self.current().faces.last_mut().unwrap().vertices = indices;
    }

    fn set_face_normals(&mut self, indices: [usize; 3]) {
        self.current().faces.last_mut().unwrap().normals = Some(indices);
    }

    fn set_face_texcoords(&mut self, indices: [usize; 3]) {
        self.current().faces.last_mut().unwrap().texcoords = Some(indices);
    }
}

/// A sink that only counts what it is fed.
///
/// Useful to inspect a file without storing any geometry.
#[derive(Debug, Default)]
pub struct CountingSink {
    /// Names of all meshes seen so far, in file order.
    pub mesh_names: Vec<String>,
    pub vertex_count: u64,
    pub normal_count: u64,
    pub texcoord_count: u64,
    pub face_count: u64,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeshSink for CountingSink {
    fn begin_mesh(&mut self, name: &str) {
        self.mesh_names.push(name.to_string());
    }

    fn push_vertex(&mut self, _: Point3<f64>) -> usize {
        self.vertex_count += 1;
        (self.vertex_count - 1) as usize
    }

    fn push_normal(&mut self, _: Vector3<f64>) -> usize {
        self.normal_count += 1;
        (self.normal_count - 1) as usize
    }

    fn push_texcoord(&mut self, _: Point2<f64>) -> usize {
        self.texcoord_count += 1;
        (self.texcoord_count - 1) as usize
    }

    fn begin_face(&mut self, _: usize) {}

    fn set_face_vertices(&mut self, _: [usize; 3]) {}

    fn end_face(&mut self) {
        self.face_count += 1;
    }
}
