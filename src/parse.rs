//! Token-level parsing shared by the reader: float literals, index
//! resolution against the file-global pools and face corner triples.

use crate::error::Error;


/// Parses one ASCII float token via `<f64 as FromStr>::parse`.
pub(crate) fn float(token: &str, line: u64) -> Result<f64, Error> {
    token.parse::<f64>().map_err(|e| {
        Error::format(line, format!("invalid float literal `{}`: {}", token, e))
    })
}

/// Resolves one OBJ index token against a pool of `pool_len` elements.
///
/// OBJ indices are 1-based; negative indices count backwards from the
/// current end of the pool (`-1` is the most recently added element). The
/// returned index is file-global and zero-based. Zero and out-of-range
/// indices are format errors.
pub(crate) fn resolve_index(
    token: &str,
    pool_len: usize,
    kind: &str,
    line: u64,
) -> Result<usize, Error> {
    let raw = token.parse::<i64>().map_err(|e| {
        Error::format(line, format!("invalid {} index `{}`: {}", kind, token, e))
    })?;

    if raw > 0 {
        let resolved = (raw - 1) as usize;
        if resolved >= pool_len {
            return Err(Error::format(line, format!(
                "{} index {} out of range (only {} in file so far)",
                kind, raw, pool_len,
            )));
        }
        Ok(resolved)
    } else if raw < 0 {
        let from_end = raw.unsigned_abs() as usize;
        if from_end > pool_len {
            return Err(Error::format(line, format!(
                "relative {} index {} out of range (only {} in file so far)",
                kind, raw, pool_len,
            )));
        }
        Ok(pool_len - from_end)
    } else {
        Err(Error::format(
            line,
            format!("{} index is 0, but OBJ indices are 1-based", kind),
        ))
    }
}

/// One corner of a face record with all indices resolved to file-global
/// zero-based positions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Corner {
    pub(crate) vertex: usize,
    pub(crate) texcoord: Option<usize>,
    pub(crate) normal: Option<usize>,
}

/// Parses one face corner token: `a`, `a/b`, `a//c` or `a/b/c` where `a`
/// is the vertex index, `b` the texcoord index and `c` the normal index.
pub(crate) fn corner(
    token: &str,
    vertex_pool: usize,
    texcoord_pool: usize,
    normal_pool: usize,
    line: u64,
) -> Result<Corner, Error> {
    let mut parts = token.splitn(4, '/');

    // `splitn` always yields at least one element, but it can be empty
    // (e.g. for the token `/2`).
    let vertex_part = parts.next().unwrap();
    if vertex_part.is_empty() {
        return Err(Error::format(
            line,
            format!("face corner `{}` is missing its vertex index", token),
        ));
    }
    let vertex = resolve_index(vertex_part, vertex_pool, "vertex", line)?;

    let texcoord = match parts.next() {
        None | Some("") => None,
        Some(part) => Some(resolve_index(part, texcoord_pool, "texcoord", line)?),
    };

    let normal = match parts.next() {
        None => None,
        Some("") => {
            return Err(Error::format(
                line,
                format!("face corner `{}` has a trailing `/`", token),
            ));
        }
        Some(part) => Some(resolve_index(part, normal_pool, "normal", line)?),
    };

    if parts.next().is_some() {
        return Err(Error::format(
            line,
            format!("face corner `{}` has too many `/` separators", token),
        ));
    }

    Ok(Corner {
        vertex,
        texcoord,
        normal,
    })
}
