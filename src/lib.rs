//! Reading and writing the triangle-mesh subset of the Wavefront OBJ
//! format.
//!
//! This crate is a codec, not a mesh library: it doesn't define any mesh
//! data structure of its own. Instead, the [`Writer`] pulls geometry from
//! anything implementing [`MeshSource`] and the [`Reader`] feeds parsed
//! geometry into anything implementing [`MeshSink`]. The simple buffer
//! types [`MeshData`], [`MeshCollector`] and [`CountingSink`] implement
//! these traits for the common cases.
//!
//! OBJ numbers vertices, normals and texture coordinates cumulatively
//! across the *whole file*, even when it contains several named objects.
//! The codec hides this completely: sources and sinks only ever deal with
//! indices local to one mesh, zero-based and contiguous. Only triangular
//! faces are supported; anything else is a format error (faces are never
//! triangulated by this crate).
//!
//! # Example
//!
//! ```
//! use cgmath::Point3;
//! use objio::{Face, MeshCollector, MeshData, Reader, Writer};
//!
//! # fn main() -> Result<(), objio::Error> {
//! let mut mesh = MeshData::new("triangle");
//! mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 1.0, 0.0));
//! mesh.faces.push(Face::new([0, 1, 2]));
//!
//! // Serialize (to memory here; see `Writer::create` for files).
//! let mut out = Vec::new();
//! let mut writer = Writer::new(&mut out);
//! writer.write(&mesh)?;
//! writer.close()?;
//!
//! // ... and parse it back.
//! let mut collector = MeshCollector::new();
//! Reader::new(&out[..]).read_into(&mut collector)?;
//!
//! assert_eq!(collector.meshes.len(), 1);
//! assert_eq!(collector.meshes[0], mesh);
//! # Ok(())
//! # }
//! ```

mod error;
mod mesh;
mod parse;
mod read;
mod write;

#[cfg(test)]
mod tests;

pub use crate::{
    error::Error,
    mesh::{CountingSink, Face, MeshCollector, MeshData, MeshSink, MeshSource},
    read::Reader,
    write::Writer,
};
