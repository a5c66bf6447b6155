use std::fmt;

/// Errors that can occur while tokenizing an HTTP request.
///
/// Every variant except [`ParseError::UnexpectedEof`] is fatal for the
/// reader: once reported, the reader stays in its failed state and further
/// [`advance`](crate::Reader::advance) calls return the same error.
/// `UnexpectedEof` is produced only by the one-shot
/// [`tokenize`](crate::tokenize) helper when its input ends before the
/// message does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// An unexpected byte was encountered during tokenizing.
    UnexpectedByte {
        /// Human-readable description of what was expected.
        expected: &'static str,
        /// The actual byte value found.
        found: u8,
    },
    /// The `Content-Length` value is not a valid decimal number, or the
    /// header appeared more than once.
    InvalidContentLength,
    /// The `Content-Length` value does not fit in 64 bits.
    ContentLengthOverflow,
    /// `chunked` is missing, is not the final coding, or appears twice in
    /// `Transfer-Encoding`.
    InvalidTransferEncoding,
    /// A chunk size does not fit in 64 bits.
    ChunkSizeOverflow,
    /// An HTTP/1.1 request arrived without a `Host` header.
    MissingHost,
    /// The input ended before a complete request was tokenized.
    UnexpectedEof,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedByte { expected, found } => {
                write!(f, "unexpected byte 0x{found:02X} (expected {expected})")
            }
            Self::InvalidContentLength => {
                write!(f, "invalid or repeated Content-Length header")
            }
            Self::ContentLengthOverflow => {
                write!(f, "Content-Length value does not fit in 64 bits")
            }
            Self::InvalidTransferEncoding => {
                write!(f, "Transfer-Encoding must end with a single chunked coding")
            }
            Self::ChunkSizeOverflow => write!(f, "chunk size does not fit in 64 bits"),
            Self::MissingHost => write!(f, "HTTP/1.1 request without a Host header"),
            Self::UnexpectedEof => write!(f, "input ended before the request was complete"),
        }
    }
}

impl std::error::Error for ParseError {}
