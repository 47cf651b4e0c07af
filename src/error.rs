//! The error type used by [`Reader`][crate::Reader] and
//! [`Writer`][crate::Writer].

use std::io;

use failure::Fail;


/// Everything that can go wrong while reading or writing an OBJ file.
#[derive(Debug, Fail)]
pub enum Error {
    /// The underlying stream failed. Never retried: a failed stream is
    /// handed back to the caller immediately.
    #[fail(display = "IO error: {}", _0)]
    Io(io::Error),

    /// The input violates the OBJ grammar or the triangle-mesh constraints
    /// of this codec (non-numeric token, wrong corner count, zero or
    /// out-of-range index, truncated record). Parsing stops at the first
    /// such error; no partial mesh is handed to the sink.
    #[fail(display = "format error in line {}: {}", line, msg)]
    Format {
        /// 1-based line number of the offending input line.
        line: u64,
        msg: String,
    },

    /// An operation was called on a writer whose stream is already closed.
    #[fail(display = "stream is already closed")]
    StreamClosed,
}

impl Error {
    pub(crate) fn format(line: u64, msg: impl Into<String>) -> Self {
        Error::Format {
            line,
            msg: msg.into(),
        }
    }

    /// Returns `true` if this is a `Format` error. Mostly useful in tests.
    pub fn is_format_error(&self) -> bool {
        match self {
            Error::Format { .. } => true,
            _ => false,
        }
    }
}

impl From<io::Error> for Error {
    fn from(src: io::Error) -> Self {
        Error::Io(src)
    }
}
