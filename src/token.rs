use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// The kinds of token a [`Reader`](crate::Reader) reports.
///
/// Trailer names and values reuse [`Token::FieldName`] and
/// [`Token::FieldValue`]; their position after [`Token::EndOfBody`] tells
/// them apart from header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Token {
    /// The request method, e.g. `GET`.
    Method,
    /// The request-target, e.g. `/api/users?page=1`.
    RequestTarget,
    /// The HTTP minor version digit after the `HTTP/1.` literal.
    Version,
    /// A header or trailer field name.
    FieldName,
    /// A header or trailer field value (span keeps trailing OWS; the
    /// accessor strips it).
    FieldValue,
    /// The empty line terminating the header section.
    EndOfHeaders,
    /// A run of message-body bytes.
    BodyChunk,
    /// The body is complete.
    EndOfBody,
    /// The request is complete; the reader is ready for the next one.
    EndOfMessage,
    /// A syntactic delimiter (SP, CRLF, colon plus OWS, the version
    /// literal, chunk-size lines). Surfaced so the caller can reassemble
    /// the request byte for byte.
    Skip,
}

impl Token {
    /// Return the token kind as a static string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::RequestTarget => "request-target",
            Self::Version => "version",
            Self::FieldName => "field-name",
            Self::FieldValue => "field-value",
            Self::EndOfHeaders => "end-of-headers",
            Self::BodyChunk => "body-chunk",
            Self::EndOfBody => "end-of-body",
            Self::EndOfMessage => "end-of-message",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Outcome of a [`Reader::advance`](crate::Reader::advance) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The next token was recognized; read it through the typed accessors.
    Token(Token),
    /// The buffer ended before the next token completed. Refill the buffer,
    /// keeping the tentative prefix bytes at its start, and advance again.
    Incomplete,
}

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

/// How the message body is framed, as decided by the framing headers seen
/// so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// No framing header seen; the request has no body.
    None,
    /// A `Content-Length` name was recognized; its value is still being
    /// scanned.
    ReadingContentLength,
    /// The body length is fixed by `Content-Length`.
    ContentLength,
    /// A `Transfer-Encoding` name was recognized; its value is still being
    /// scanned.
    ReadingTransferEncoding,
    /// The body uses the chunked transfer coding.
    Chunked,
    /// A `Transfer-Encoding` without a final `chunked` coding; rejected at
    /// the end of the header section.
    UnsupportedCoding,
}

// ---------------------------------------------------------------------------
// RawToken
// ---------------------------------------------------------------------------

/// One token of a request, borrowed from the input buffer.
///
/// Produced by [`tokenize`](crate::tokenize). `bytes` is the raw span:
/// concatenating the spans of a message's tokens reproduces the consumed
/// input exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
    /// The token kind.
    pub kind: Token,
    /// Byte offset of the span within the tokenized input.
    pub offset: usize,
    /// The raw token bytes.
    pub bytes: &'a [u8],
}
