//! # tokenwire
//!
//! A **zero-copy, pull-based HTTP/1.x request tokenizer** implemented as a
//! resumable state machine, usable as a Rust library and as a CLI tool.
//!
//! The [`Reader`] consumes bytes of an HTTP/1.0 or HTTP/1.1 request from a
//! caller-owned buffer and reports one token per [`Reader::advance`] call:
//! method, request-target, version, field names and values, body chunks, and
//! end markers. Tokens are spans into the caller's buffer; the reader never
//! copies input bytes and never allocates. Input may be fragmented at any
//! byte boundary, and pipelined requests tokenize back to back from the same
//! stream.
//!
//! Syntax follows RFC 7230, and the framing headers (`Content-Length`,
//! `Transfer-Encoding: chunked`) are decoded to drive body tokenizing.
//!
//! ## Quick start - one-shot tokenizing
//!
//! ```rust
//! use tokenwire::{tokenize, Token};
//!
//! let raw = b"GET /hello HTTP/1.1\r\nHost: example.com\r\n\r\n";
//! let tokens = tokenize(raw).expect("valid request");
//! assert_eq!(tokens[0].kind, Token::Method);
//! assert_eq!(tokens[0].bytes, b"GET");
//! ```
//!
//! ## Quick start - pull-style streaming
//!
//! ```rust
//! use tokenwire::{Reader, Status, Token};
//!
//! let mut reader = Reader::new();
//! reader.set_buffer(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n");
//!
//! assert_eq!(reader.advance(), Ok(Status::Token(Token::Method)));
//! assert_eq!(reader.token_text(), Some("GET"));
//!
//! // Keep advancing until EndOfMessage; on Status::Incomplete, refill the
//! // buffer (keeping the tentative prefix at its start) and advance again.
//! ```

mod chars;
mod decode;
mod error;
mod output;
mod reader;
mod token;

// Re-export public API.
pub use error::ParseError;
pub use output::{format_debug, format_json, format_summary, records, TokenRecord};
pub use reader::Reader;
pub use token::{Framing, RawToken, Status, Token};

/// Tokenize a **complete** HTTP request held in a byte slice.
///
/// This is a convenience wrapper around [`Reader`] that collects every token
/// through the first [`Token::EndOfMessage`]. Token spans are raw, so
/// concatenating them reproduces the consumed bytes exactly; any bytes after
/// the first message (pipelining) are left untouched.
///
/// # Errors
///
/// Returns [`ParseError`] if the data is malformed, or
/// [`ParseError::UnexpectedEof`] if it ends before the message does.
pub fn tokenize(data: &[u8]) -> Result<Vec<RawToken<'_>>, ParseError> {
    let mut reader = Reader::new();
    reader.set_buffer(data);

    let mut tokens = Vec::new();
    loop {
        match reader.advance()? {
            Status::Token(kind) => {
                tokens.push(RawToken {
                    kind,
                    offset: reader.token_offset(),
                    bytes: reader.token_bytes(),
                });
                if kind == Token::EndOfMessage {
                    return Ok(tokens);
                }
            }
            Status::Incomplete => return Err(ParseError::UnexpectedEof),
        }
    }
}
