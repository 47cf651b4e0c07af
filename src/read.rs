//! Reading OBJ files into a [`MeshSink`].

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use cgmath::{Point2, Point3, Vector3};
use smallvec::SmallVec;

use crate::{
    error::Error,
    mesh::MeshSink,
    parse::{self, Corner},
};


/// A reader for the triangle-mesh subset of the OBJ format.
///
/// The reader performs a single forward pass over the input and drives the
/// given [`MeshSink`] through one `begin_mesh`/`end_mesh` lifecycle per
/// object in the file. OBJ numbers vertices, normals and texture
/// coordinates cumulatively across the whole file; the reader re-bases
/// every face index so the sink only ever sees indices local to the
/// current mesh, starting at 0.
///
/// Records with unknown keywords (comments, `mtllib`, `usemtl`, smoothing
/// groups, ...) are skipped. The first format error aborts the parse: a
/// partially built mesh is never silently handed to the sink as complete.
#[derive(Debug)]
pub struct Reader<R: io::Read> {
    reader: R,
}

impl Reader<File> {
    /// Creates a new `Reader` reading from the given file. The file must
    /// exist and be readable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: io::Read> Reader<R> {
    /// Creates a new `Reader` from the given `io::Read` instance. To read
    /// from a file, rather use [`Reader::open`].
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads the whole input, feeding every mesh into the given sink.
    ///
    /// Consumes the reader: one reader instance is bound to one stream for
    /// its entire lifetime.
    pub fn read_into(self, sink: &mut impl MeshSink) -> Result<(), Error> {
        let mut input = BufReader::new(self.reader);
        let mut state = ReadState::new();

        let mut line_buf = String::new();
        loop {
            line_buf.clear();
            if input.read_line(&mut line_buf)? == 0 {
                break;
            }
            state.line_no += 1;

            // Trimming also takes care of `\r\n` line endings.
            let line = line_buf.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let keyword = tokens.next().unwrap();
            match keyword {
                // A name directive ends the active mesh and begins the
                // next one. Object names may contain spaces, so the name
                // is the rest of the line, not just the next token.
                "o" | "g" => {
                    if state.mesh_bases.is_some() {
                        sink.end_mesh();
                    }
                    let name = line[keyword.len()..].trim();
                    sink.begin_mesh(name);
                    state.mesh_bases = Some(state.pools);
                }
                "v" => {
                    state.ensure_mesh(sink);
                    let [x, y, z] = state.float3(&mut tokens)?;
                    sink.push_vertex(Point3::new(x, y, z));
                    state.pools.vertices += 1;
                }
                "vn" => {
                    state.ensure_mesh(sink);
                    let [x, y, z] = state.float3(&mut tokens)?;
                    sink.push_normal(Vector3::new(x, y, z));
                    state.pools.normals += 1;
                }
                "vt" => {
                    state.ensure_mesh(sink);
                    let [u, v] = state.float2(&mut tokens)?;
                    sink.push_texcoord(Point2::new(u, v));
                    state.pools.texcoords += 1;
                }
                "f" => {
                    state.ensure_mesh(sink);
                    state.face(tokens, sink)?;
                }
                // Anything else (`mtllib`, `usemtl`, `s`, ...) is valid
                // OBJ that this codec doesn't care about.
                _ => {}
            }
        }

        if state.mesh_bases.is_some() {
            sink.end_mesh();
        }

        Ok(())
    }
}


// ===========================================================================
// ===== Reader state
// ===========================================================================

/// The file-global element counts of one index kind each.
#[derive(Debug, Clone, Copy, Default)]
struct Pools {
    vertices: usize,
    normals: usize,
    texcoords: usize,
}

struct ReadState {
    /// 1-based number of the line currently being parsed.
    line_no: u64,

    /// Cumulative counts of all elements seen so far in the file.
    pools: Pools,

    /// `Some` while a mesh is active; holds a snapshot of `pools` taken
    /// when the mesh began. Subtracting it re-bases file-global indices to
    /// mesh-local ones.
    mesh_bases: Option<Pools>,
}

impl ReadState {
    fn new() -> Self {
        Self {
            line_no: 0,
            pools: Pools::default(),
            mesh_bases: None,
        }
    }

    /// Begins an implicit anonymous mesh if geometry shows up before any
    /// `o`/`g` directive.
    fn ensure_mesh(&mut self, sink: &mut impl MeshSink) {
        if self.mesh_bases.is_none() {
            sink.begin_mesh("");
            self.mesh_bases = Some(self.pools);
        }
    }

    /// Parses the next float token of the current record.
    fn float<'a>(
        &self,
        tokens: &mut impl Iterator<Item = &'a str>,
    ) -> Result<f64, Error> {
        let token = tokens.next().ok_or_else(|| {
            Error::format(self.line_no, "truncated record: expected another number")
        })?;
        parse::float(token, self.line_no)
    }

    /// Parses exactly two float tokens and requires the record to end
    /// there.
    fn float2<'a>(
        &self,
        tokens: &mut impl Iterator<Item = &'a str>,
    ) -> Result<[f64; 2], Error> {
        let out = [self.float(tokens)?, self.float(tokens)?];
        self.require_end(tokens)?;
        Ok(out)
    }

    /// Parses exactly three float tokens and requires the record to end
    /// there.
    fn float3<'a>(
        &self,
        tokens: &mut impl Iterator<Item = &'a str>,
    ) -> Result<[f64; 3], Error> {
        let out = [self.float(tokens)?, self.float(tokens)?, self.float(tokens)?];
        self.require_end(tokens)?;
        Ok(out)
    }

    fn require_end<'a>(
        &self,
        tokens: &mut impl Iterator<Item = &'a str>,
    ) -> Result<(), Error> {
        match tokens.next() {
            None => Ok(()),
            Some(token) => Err(Error::format(
                self.line_no,
                format!("unexpected trailing token `{}`", token),
            )),
        }
    }

    /// Parses and emits one face record. `tokens` holds the corner tokens
    /// (the `f` keyword is already consumed).
    fn face<'a>(
        &mut self,
        tokens: impl Iterator<Item = &'a str>,
        sink: &mut impl MeshSink,
    ) -> Result<(), Error> {
        let corners = tokens
            .map(|token| {
                parse::corner(
                    token,
                    self.pools.vertices,
                    self.pools.texcoords,
                    self.pools.normals,
                    self.line_no,
                )
            })
            .collect::<Result<SmallVec<[Corner; 4]>, _>>()?;

        // Non-triangular faces are rejected, not triangulated.
        if corners.len() != 3 {
            return Err(Error::format(self.line_no, format!(
                "only triangular faces are supported, found {} corners",
                corners.len(),
            )));
        }

        // All three corners must agree on which optional index kinds they
        // carry, otherwise the triple-based sink setters can't represent
        // the face.
        let has_texcoords = corners[0].texcoord.is_some();
        let has_normals = corners[0].normal.is_some();
        let consistent = corners.iter().all(|c| {
            c.texcoord.is_some() == has_texcoords && c.normal.is_some() == has_normals
        });
        if !consistent {
            return Err(Error::format(
                self.line_no,
                "face corners use inconsistent index forms",
            ));
        }

        let bases = self.mesh_bases.unwrap();
        let vertices = self.localize(
            [corners[0].vertex, corners[1].vertex, corners[2].vertex],
            bases.vertices,
            "vertex",
        )?;
        let texcoords = if has_texcoords {
            Some(self.localize(
                [
                    corners[0].texcoord.unwrap(),
                    corners[1].texcoord.unwrap(),
                    corners[2].texcoord.unwrap(),
                ],
                bases.texcoords,
                "texcoord",
            )?)
        } else {
            None
        };
        let normals = if has_normals {
            Some(self.localize(
                [
                    corners[0].normal.unwrap(),
                    corners[1].normal.unwrap(),
                    corners[2].normal.unwrap(),
                ],
                bases.normals,
                "normal",
            )?)
        } else {
            None
        };

        sink.begin_face(3);
        sink.set_face_vertices(vertices);
        if let Some(texcoords) = texcoords {
            sink.set_face_texcoords(texcoords);
        }
        if let Some(normals) = normals {
            sink.set_face_normals(normals);
        }
        sink.end_face();

        Ok(())
    }

    /// Converts file-global zero-based indices into mesh-local ones by
    /// subtracting the pool size recorded when the mesh began. Indices
    /// below the base belong to a previous mesh and can't be expressed
    /// locally.
    fn localize(
        &self,
        global: [usize; 3],
        base: usize,
        kind: &str,
    ) -> Result<[usize; 3], Error> {
        let mut local = [0; 3];
        for (slot, &index) in local.iter_mut().zip(&global) {
            if index < base {
                return Err(Error::format(self.line_no, format!(
                    "face references a {} belonging to a previous object",
                    kind,
                )));
            }
            *slot = index - base;
        }
        Ok(local)
    }
}
