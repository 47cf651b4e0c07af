//! Writing [`MeshSource`]s as OBJ files.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{error::Error, mesh::MeshSource};


/// A writer for the triangle-mesh subset of the OBJ format.
///
/// One writer instance exclusively owns one output stream.
/// [`write`][`Writer::write`] can be called any number of times to append meshes to
/// the same file; the writer keeps track of the cumulative file-wide
/// numbering that OBJ uses, so every mesh's local indices are offset by
/// the counts of all previously written meshes. [`close`][`Writer::close`]
/// flushes and releases the stream; any call after that fails with
/// [`Error::StreamClosed`] without touching the stream.
///
/// # Numeric format
///
/// Coordinates are written with `f64`'s `Display` implementation, which
/// produces the shortest decimal string that parses back to the exact same
/// value. Reading a written file therefore reproduces every coordinate
/// bit for bit; no precision is ever silently dropped.
#[derive(Debug)]
pub struct Writer<W: io::Write> {
    /// `None` once the writer is closed.
    out: Option<W>,
    offsets: Offsets,
}

/// Running counts of all elements written to the stream so far, per index
/// kind.
#[derive(Debug, Clone, Copy, Default)]
struct Offsets {
    vertices: usize,
    normals: usize,
    texcoords: usize,
}

impl Writer<BufWriter<File>> {
    /// Creates a new `Writer` writing to the given path. An existing file
    /// is truncated.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: io::Write> Writer<W> {
    /// Creates a new `Writer` emitting to the given `io::Write` instance.
    /// To write to a file, rather use [`Writer::create`].
    pub fn new(writer: W) -> Self {
        Self {
            out: Some(writer),
            offsets: Offsets::default(),
        }
    }

    /// Appends one mesh to the stream.
    ///
    /// The mesh's faces must reference positions/normals/texcoords that
    /// the mesh actually contains; the writer relies on the [`MeshSource`]
    /// contract and does not re-validate indices.
    pub fn write(&mut self, mesh: &impl MeshSource) -> Result<(), Error> {
        let out = self.out.as_mut().ok_or(Error::StreamClosed)?;
        let offsets = self.offsets;

        writeln!(out, "o {}", mesh.name())?;

        for i in 0..mesh.vertex_count() {
            let v = mesh.vertex(i);
            writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for i in 0..mesh.normal_count() {
            let n = mesh.normal(i);
            writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
        }
        for i in 0..mesh.texcoord_count() {
            let t = mesh.texcoord(i);
            writeln!(out, "vt {} {}", t.x, t.y)?;
        }

        for i in 0..mesh.face_count() {
            let face = mesh.face(i);
            write!(out, "f")?;
            for corner in 0..3 {
                // OBJ indices are 1-based and cumulative over the file.
                // Relative (negative) indices are never emitted.
                let v = face.vertices[corner] + 1 + offsets.vertices;
                match (face.texcoords, face.normals) {
                    (None, None) => write!(out, " {}", v)?,
                    (Some(ts), None) => {
                        write!(out, " {}/{}", v, ts[corner] + 1 + offsets.texcoords)?;
                    }
                    (None, Some(ns)) => {
                        write!(out, " {}//{}", v, ns[corner] + 1 + offsets.normals)?;
                    }
                    (Some(ts), Some(ns)) => {
                        write!(
                            out,
                            " {}/{}/{}",
                            v,
                            ts[corner] + 1 + offsets.texcoords,
                            ns[corner] + 1 + offsets.normals,
                        )?;
                    }
                }
            }
            writeln!(out)?;
        }

        self.offsets.vertices += mesh.vertex_count();
        self.offsets.normals += mesh.normal_count();
        self.offsets.texcoords += mesh.texcoord_count();

        Ok(())
    }

    /// Flushes all buffered output and releases the stream.
    ///
    /// Subsequent `write` or `close` calls fail with
    /// [`Error::StreamClosed`].
    pub fn close(&mut self) -> Result<(), Error> {
        let mut out = self.out.take().ok_or(Error::StreamClosed)?;
        out.flush()?;
        Ok(())
    }
}
