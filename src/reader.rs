use crate::chars::{
    is_chunk_ext_char, is_field_value_char, is_ows, is_request_target_char, is_tchar,
};
use crate::decode::{self, Chunking, DecodeError};
use crate::error::ParseError;
use crate::token::{Framing, Status, Token};

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    // ---- Request line ----
    Method,
    MethodSp,
    Target,
    VersionPrefix,
    Version,
    VersionCrlf,

    // ---- Header section ----
    HeaderName,
    HeaderColon,
    HeaderOws,
    HeaderValue,
    HeaderCrlf,
    EndHeadersCrlf,

    // ---- Fixed-length body ----
    Body,

    // ---- Chunked transfer coding ----
    ChunkSize,
    ChunkExt,
    ChunkHeadCrlf,
    ChunkData,
    ChunkDataCrlf,

    // ---- Chunked trailers ----
    TrailerName,
    TrailerColon,
    TrailerOws,
    TrailerValue,
    TrailerCrlf,
    EndTrailersCrlf,

    // ---- Virtual (consume no input) ----
    BodyEnd,
    MessageEnd,

    // ---- Terminal ----
    Failed,
}

/// Whether the request requires a `Host` header and whether one was seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostState {
    NotRequired,
    Missing,
    Present,
}

/// Progress of a resumable literal match.
enum Scan {
    Done,
    More,
    Mismatch(u8),
}

const CRLF: &[u8] = b"\r\n";
const VERSION_PREFIX: &[u8] = b" HTTP/1.";

fn unexpected(found: u8, expected: &'static str) -> ParseError {
    ParseError::UnexpectedByte { expected, found }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// An incremental, pull-style HTTP/1.x request tokenizer.
///
/// The reader borrows a caller-owned buffer and reports one token per
/// [`advance`](Reader::advance) call as a span into that buffer. It copies
/// nothing and allocates nothing; input may be fragmented at any byte
/// boundary.
///
/// # Usage
///
/// ```rust
/// use tokenwire::{Reader, Status, Token};
///
/// let mut reader = Reader::new();
/// reader.set_buffer(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
///
/// loop {
///     match reader.advance().unwrap() {
///         Status::Token(Token::Method) => {
///             assert_eq!(reader.token_text(), Some("GET"));
///         }
///         Status::Token(Token::EndOfMessage) => break,
///         Status::Token(_) => {}
///         Status::Incomplete => unreachable!("complete request in buffer"),
///     }
/// }
/// ```
///
/// When `advance` returns [`Status::Incomplete`], the span
/// `[token_offset(), token_offset() + token_size())` holds the tentatively
/// consumed prefix of the next token. Refill the buffer keeping those bytes
/// at its start, re-attach it with [`set_buffer`](Reader::set_buffer), and
/// advance again.
#[derive(Debug)]
pub struct Reader<'a> {
    state: State,
    code: Result<Status, ParseError>,
    buf: &'a [u8],
    offset: usize,
    size: usize,
    framing: Framing,
    body_remaining: u64,
    host: HostState,
}

impl<'a> Reader<'a> {
    /// Create a reader in its initial state, with no buffer attached.
    pub fn new() -> Self {
        Self {
            state: State::Method,
            code: Ok(Status::Incomplete),
            buf: &[],
            offset: 0,
            size: 0,
            framing: Framing::None,
            body_remaining: 0,
            host: HostState::NotRequired,
        }
    }

    /// Return the reader to its initial state and detach the buffer.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Attach a new input window and restart scanning at its first byte.
    ///
    /// The current token (or tentative prefix, after
    /// [`Status::Incomplete`]) must be placed at the start of the new
    /// window: its length is kept, only the offset is rewound.
    pub fn set_buffer(&mut self, buf: &'a [u8]) {
        self.buf = buf;
        self.offset = 0;
    }

    /// Recognize the next token.
    ///
    /// Consumes the previously reported token, then scans from the current
    /// position. Returns the token kind on success, `Ok(Status::Incomplete)`
    /// when the buffer ends first, or a fatal [`ParseError`]. After a fatal
    /// error every further call returns the same error and changes nothing.
    pub fn advance(&mut self) -> Result<Status, ParseError> {
        match self.code {
            Err(err) => return Err(err),
            Ok(Status::Token(_)) => {
                self.offset += self.size;
                self.size = 0;
            }
            Ok(Status::Incomplete) => {}
        }

        loop {
            match self.state {
                // ===================== REQUEST LINE =====================
                State::Method => match self.scan_while(is_tchar) {
                    None => return self.incomplete(),
                    Some(b) => {
                        if self.size == 0 {
                            return self.fail(unexpected(b, "token character in method"));
                        }
                        return self.emit(Token::Method, State::MethodSp);
                    }
                },

                State::MethodSp => {
                    let Some(b) = self.peek() else {
                        return self.incomplete();
                    };
                    if b != b' ' {
                        return self.fail(unexpected(b, "space after method"));
                    }
                    self.size = 1;
                    return self.emit(Token::Skip, State::Target);
                }

                State::Target => match self.scan_while(is_request_target_char) {
                    None => return self.incomplete(),
                    Some(b) => {
                        if self.size == 0 {
                            return self.fail(unexpected(b, "request-target character"));
                        }
                        return self.emit(Token::RequestTarget, State::VersionPrefix);
                    }
                },

                State::VersionPrefix => match self.scan_literal(VERSION_PREFIX) {
                    Scan::More => return self.incomplete(),
                    Scan::Mismatch(b) => {
                        return self.fail(unexpected(b, "\" HTTP/1.\" after request-target"));
                    }
                    Scan::Done => return self.emit(Token::Skip, State::Version),
                },

                State::Version => {
                    let Some(b) = self.peek() else {
                        return self.incomplete();
                    };
                    if !b.is_ascii_digit() {
                        return self.fail(unexpected(b, "HTTP minor version digit"));
                    }
                    self.host = if b == b'0' {
                        HostState::NotRequired
                    } else {
                        HostState::Missing
                    };
                    self.size = 1;
                    return self.emit(Token::Version, State::VersionCrlf);
                }

                State::VersionCrlf => match self.scan_literal(CRLF) {
                    Scan::More => return self.incomplete(),
                    Scan::Mismatch(b) => {
                        return self.fail(unexpected(b, "CRLF after HTTP version"));
                    }
                    Scan::Done => return self.emit(Token::Skip, State::HeaderName),
                },

                // ===================== HEADERS =====================
                State::HeaderName => match self.scan_while(is_tchar) {
                    None => return self.incomplete(),
                    Some(b'\r') if self.size == 0 => {
                        self.state = State::EndHeadersCrlf;
                        continue;
                    }
                    Some(b) => {
                        if self.size == 0 {
                            return self.fail(unexpected(b, "header name character"));
                        }
                        if let Err(err) = self.note_field_name() {
                            return self.fail(err);
                        }
                        return self.emit(Token::FieldName, State::HeaderColon);
                    }
                },

                State::HeaderColon => {
                    let Some(b) = self.peek() else {
                        return self.incomplete();
                    };
                    if b != b':' {
                        return self.fail(unexpected(b, "colon after header name"));
                    }
                    self.size = 1;
                    // Fold any directly visible OWS into the same skip.
                    return match self.scan_while(is_ows) {
                        None => self.emit(Token::Skip, State::HeaderOws),
                        Some(_) => self.emit(Token::Skip, State::HeaderValue),
                    };
                }

                State::HeaderOws => match self.scan_while(is_ows) {
                    None => {
                        if self.size > 0 {
                            return self.emit(Token::Skip, State::HeaderOws);
                        }
                        return self.incomplete();
                    }
                    Some(_) => {
                        if self.size > 0 {
                            return self.emit(Token::Skip, State::HeaderValue);
                        }
                        self.state = State::HeaderValue;
                        continue;
                    }
                },

                State::HeaderValue => match self.scan_while(is_field_value_char) {
                    None => return self.incomplete(),
                    Some(b) => {
                        if self.size == 0 {
                            return self.fail(unexpected(b, "header value character"));
                        }
                        if let Err(err) = self.note_field_value() {
                            return self.fail(err);
                        }
                        return self.emit(Token::FieldValue, State::HeaderCrlf);
                    }
                },

                State::HeaderCrlf => match self.scan_literal(CRLF) {
                    Scan::More => return self.incomplete(),
                    Scan::Mismatch(b) => {
                        return self.fail(unexpected(b, "CRLF after header value"));
                    }
                    Scan::Done => return self.emit(Token::Skip, State::HeaderName),
                },

                // ===================== END OF HEADERS =====================
                State::EndHeadersCrlf => match self.scan_literal(CRLF) {
                    Scan::More => return self.incomplete(),
                    Scan::Mismatch(b) => {
                        return self.fail(unexpected(b, "CRLF ending the header section"));
                    }
                    Scan::Done => {
                        if self.host == HostState::Missing {
                            return self.fail(ParseError::MissingHost);
                        }
                        let next = match self.framing {
                            Framing::None => State::BodyEnd,
                            Framing::ContentLength => State::Body,
                            Framing::Chunked => State::ChunkSize,
                            Framing::UnsupportedCoding => {
                                return self.fail(ParseError::InvalidTransferEncoding);
                            }
                            Framing::ReadingContentLength | Framing::ReadingTransferEncoding => {
                                unreachable!("framing is settled when the field value is read")
                            }
                        };
                        return self.emit(Token::EndOfHeaders, next);
                    }
                },

                // ===================== FIXED-LENGTH BODY =====================
                State::Body => {
                    if self.body_remaining == 0 {
                        self.state = State::BodyEnd;
                        continue;
                    }
                    let avail = self.buf.len().saturating_sub(self.cursor());
                    if avail == 0 {
                        return self.incomplete();
                    }
                    let take = self.body_remaining.min(avail as u64) as usize;
                    self.size = take;
                    self.body_remaining -= take as u64;
                    let next = if self.body_remaining == 0 {
                        State::BodyEnd
                    } else {
                        State::Body
                    };
                    return self.emit(Token::BodyChunk, next);
                }

                // ===================== CHUNKED TRANSFER CODING =====================
                State::ChunkSize => match self.scan_while(|b| b.is_ascii_hexdigit()) {
                    None => return self.incomplete(),
                    Some(b) => {
                        if self.size == 0 {
                            return self.fail(unexpected(b, "hex digit in chunk size"));
                        }
                        return match decode::parse_hex(self.token_bytes()) {
                            Ok(n) => {
                                self.body_remaining = n;
                                self.emit(Token::Skip, State::ChunkExt)
                            }
                            Err(DecodeError::Overflow) => self.fail(ParseError::ChunkSizeOverflow),
                            Err(DecodeError::Invalid) => {
                                self.fail(unexpected(b, "hex digit in chunk size"))
                            }
                        };
                    }
                },

                State::ChunkExt => match self.scan_while(is_chunk_ext_char) {
                    None => return self.incomplete(),
                    Some(b'\r') => {
                        if self.size > 0 {
                            return self.emit(Token::Skip, State::ChunkHeadCrlf);
                        }
                        self.state = State::ChunkHeadCrlf;
                        continue;
                    }
                    Some(b) => {
                        return self.fail(unexpected(b, "chunk extension byte or CR"));
                    }
                },

                State::ChunkHeadCrlf => match self.scan_literal(CRLF) {
                    Scan::More => return self.incomplete(),
                    Scan::Mismatch(b) => {
                        return self.fail(unexpected(b, "CRLF after chunk size"));
                    }
                    Scan::Done => {
                        if self.body_remaining != 0 {
                            return self.emit(Token::Skip, State::ChunkData);
                        }
                        // Last chunk: the body is over, trailers follow.
                        return self.emit(Token::EndOfBody, State::TrailerName);
                    }
                },

                State::ChunkData => {
                    let avail = self.buf.len().saturating_sub(self.cursor());
                    if avail == 0 {
                        return self.incomplete();
                    }
                    let take = self.body_remaining.min(avail as u64) as usize;
                    self.size = take;
                    self.body_remaining -= take as u64;
                    let next = if self.body_remaining == 0 {
                        State::ChunkDataCrlf
                    } else {
                        State::ChunkData
                    };
                    return self.emit(Token::BodyChunk, next);
                }

                State::ChunkDataCrlf => match self.scan_literal(CRLF) {
                    Scan::More => return self.incomplete(),
                    Scan::Mismatch(b) => {
                        return self.fail(unexpected(b, "CRLF after chunk data"));
                    }
                    Scan::Done => return self.emit(Token::Skip, State::ChunkSize),
                },

                // ===================== TRAILER SECTION =====================
                State::TrailerName => match self.scan_while(is_tchar) {
                    None => return self.incomplete(),
                    Some(b'\r') if self.size == 0 => {
                        self.state = State::EndTrailersCrlf;
                        continue;
                    }
                    Some(b) => {
                        if self.size == 0 {
                            return self.fail(unexpected(b, "trailer name character"));
                        }
                        return self.emit(Token::FieldName, State::TrailerColon);
                    }
                },

                State::TrailerColon => {
                    let Some(b) = self.peek() else {
                        return self.incomplete();
                    };
                    if b != b':' {
                        return self.fail(unexpected(b, "colon after trailer name"));
                    }
                    self.size = 1;
                    return match self.scan_while(is_ows) {
                        None => self.emit(Token::Skip, State::TrailerOws),
                        Some(_) => self.emit(Token::Skip, State::TrailerValue),
                    };
                }

                State::TrailerOws => match self.scan_while(is_ows) {
                    None => {
                        if self.size > 0 {
                            return self.emit(Token::Skip, State::TrailerOws);
                        }
                        return self.incomplete();
                    }
                    Some(_) => {
                        if self.size > 0 {
                            return self.emit(Token::Skip, State::TrailerValue);
                        }
                        self.state = State::TrailerValue;
                        continue;
                    }
                },

                State::TrailerValue => match self.scan_while(is_field_value_char) {
                    None => return self.incomplete(),
                    Some(b) => {
                        if self.size == 0 {
                            return self.fail(unexpected(b, "trailer value character"));
                        }
                        return self.emit(Token::FieldValue, State::TrailerCrlf);
                    }
                },

                State::TrailerCrlf => match self.scan_literal(CRLF) {
                    Scan::More => return self.incomplete(),
                    Scan::Mismatch(b) => {
                        return self.fail(unexpected(b, "CRLF after trailer value"));
                    }
                    Scan::Done => return self.emit(Token::Skip, State::TrailerName),
                },

                State::EndTrailersCrlf => match self.scan_literal(CRLF) {
                    Scan::More => return self.incomplete(),
                    Scan::Mismatch(b) => {
                        return self.fail(unexpected(b, "CRLF ending the trailer section"));
                    }
                    Scan::Done => {
                        self.framing = Framing::None;
                        self.host = HostState::NotRequired;
                        return self.emit(Token::EndOfMessage, State::Method);
                    }
                },

                // ===================== VIRTUAL STATES =====================
                State::BodyEnd => return self.emit(Token::EndOfBody, State::MessageEnd),

                State::MessageEnd => {
                    self.framing = Framing::None;
                    self.host = HostState::NotRequired;
                    return self.emit(Token::EndOfMessage, State::Method);
                }

                // Failed readers return their error before dispatch.
                State::Failed => return self.code,
            }
        }
    }

    // ----- scanning helpers ------------------------------------------------

    /// First unexamined byte, if the buffer still has one.
    fn peek(&self) -> Option<u8> {
        self.buf.get(self.cursor()).copied()
    }

    fn cursor(&self) -> usize {
        self.offset + self.size
    }

    /// Extend the current token over bytes matching `keep`. Returns the
    /// first rejected byte, or `None` when the buffer ran out first.
    fn scan_while(&mut self, keep: impl Fn(u8) -> bool) -> Option<u8> {
        let mut c = self.cursor();
        while c < self.buf.len() {
            let b = self.buf[c];
            if !keep(b) {
                self.size = c - self.offset;
                return Some(b);
            }
            c += 1;
        }
        self.size = c - self.offset;
        None
    }

    /// Match `literal` byte by byte, keeping progress in the token size so
    /// the match survives a buffer refill.
    fn scan_literal(&mut self, literal: &[u8]) -> Scan {
        while self.size < literal.len() {
            let c = self.cursor();
            if c >= self.buf.len() {
                return Scan::More;
            }
            let b = self.buf[c];
            if b != literal[self.size] {
                return Scan::Mismatch(b);
            }
            self.size += 1;
        }
        Scan::Done
    }

    // ----- outcome helpers -------------------------------------------------

    fn emit(&mut self, kind: Token, next: State) -> Result<Status, ParseError> {
        self.state = next;
        self.code = Ok(Status::Token(kind));
        self.code
    }

    fn incomplete(&mut self) -> Result<Status, ParseError> {
        self.code = Ok(Status::Incomplete);
        self.code
    }

    fn fail(&mut self, err: ParseError) -> Result<Status, ParseError> {
        self.state = State::Failed;
        self.code = Err(err);
        self.code
    }

    // ----- framing-header side effects -------------------------------------

    /// React to a completed header field name before it is reported.
    fn note_field_name(&mut self) -> Result<(), ParseError> {
        let name = self.token_bytes();
        if name.eq_ignore_ascii_case(b"host") {
            if self.host == HostState::Missing {
                self.host = HostState::Present;
            }
        } else if name.eq_ignore_ascii_case(b"content-length") {
            self.framing = match self.framing {
                Framing::None => Framing::ReadingContentLength,
                Framing::ContentLength => return Err(ParseError::InvalidContentLength),
                // Transfer-Encoding already decided the framing.
                other => other,
            };
        } else if name.eq_ignore_ascii_case(b"transfer-encoding") {
            self.framing = match self.framing {
                Framing::Chunked => return Err(ParseError::InvalidTransferEncoding),
                _ => Framing::ReadingTransferEncoding,
            };
        }
        Ok(())
    }

    /// React to a completed header field value before it is reported.
    fn note_field_value(&mut self) -> Result<(), ParseError> {
        match self.framing {
            Framing::ReadingContentLength => match decode::parse_decimal(self.token_bytes()) {
                Ok(n) => {
                    self.body_remaining = n;
                    self.framing = Framing::ContentLength;
                    Ok(())
                }
                Err(DecodeError::Invalid) => Err(ParseError::InvalidContentLength),
                Err(DecodeError::Overflow) => Err(ParseError::ContentLengthOverflow),
            },
            Framing::ReadingTransferEncoding => {
                match decode::classify_transfer_encoding(self.token_bytes()) {
                    Chunking::Invalid => Err(ParseError::InvalidTransferEncoding),
                    Chunking::Absent => {
                        self.framing = Framing::UnsupportedCoding;
                        Ok(())
                    }
                    Chunking::Final => {
                        self.framing = Framing::Chunked;
                        Ok(())
                    }
                }
            }
            _ => Ok(()),
        }
    }

    // ----- public queries --------------------------------------------------

    /// The stored outcome of the last [`advance`](Reader::advance) call.
    pub fn status(&self) -> Result<Status, ParseError> {
        self.code
    }

    /// The current token kind, if the last advance produced one.
    pub fn token(&self) -> Option<Token> {
        match self.code {
            Ok(Status::Token(t)) => Some(t),
            _ => None,
        }
    }

    /// Byte offset of the current token (or tentative prefix) within the
    /// attached buffer.
    pub fn token_offset(&self) -> usize {
        self.offset
    }

    /// Byte length of the current token, or of the tentative prefix after
    /// [`Status::Incomplete`].
    pub fn token_size(&self) -> usize {
        self.size
    }

    /// The token kind the reader is currently seeking. Syntactic positions
    /// report [`Token::Skip`]; a failed reader reports `None`.
    pub fn expected(&self) -> Option<Token> {
        Some(match self.state {
            State::Method => Token::Method,
            State::Target => Token::RequestTarget,
            State::Version => Token::Version,
            State::HeaderName | State::TrailerName => Token::FieldName,
            State::HeaderValue | State::TrailerValue => Token::FieldValue,
            State::EndHeadersCrlf => Token::EndOfHeaders,
            State::Body | State::ChunkData => Token::BodyChunk,
            State::BodyEnd => Token::EndOfBody,
            State::ChunkHeadCrlf if self.body_remaining == 0 => Token::EndOfBody,
            State::MessageEnd | State::EndTrailersCrlf => Token::EndOfMessage,
            State::Failed => return None,
            _ => Token::Skip,
        })
    }

    /// How the message body is framed, as far as the headers seen so far
    /// have decided it.
    pub fn framing(&self) -> Framing {
        self.framing
    }

    // ----- typed token views -----------------------------------------------

    /// Raw bytes of the current token, or of the tentative prefix after
    /// [`Status::Incomplete`]. These are the exact bytes the caller must
    /// keep at the front of a refilled buffer.
    pub fn token_bytes(&self) -> &'a [u8] {
        &self.buf[self.offset..self.offset + self.size]
    }

    /// The method, request-target, or field/trailer name as a string slice.
    /// `None` when the current token is of another kind.
    pub fn token_text(&self) -> Option<&'a str> {
        match self.token()? {
            Token::Method | Token::RequestTarget | Token::FieldName => {
                std::str::from_utf8(self.token_bytes()).ok()
            }
            _ => None,
        }
    }

    /// The minor version digit of a [`Token::Version`] token.
    pub fn version(&self) -> Option<u8> {
        match self.token()? {
            Token::Version => Some(self.buf[self.offset] - b'0'),
            _ => None,
        }
    }

    /// A field or trailer value with trailing OWS stripped. Leading OWS was
    /// already consumed during tokenizing, so this is the semantic value.
    pub fn value_bytes(&self) -> Option<&'a [u8]> {
        match self.token()? {
            Token::FieldValue => {
                let mut v = self.token_bytes();
                while let [rest @ .., b' ' | b'\t'] = v {
                    v = rest;
                }
                Some(v)
            }
            _ => None,
        }
    }

    /// The raw bytes of a [`Token::BodyChunk`] token.
    pub fn chunk_bytes(&self) -> Option<&'a [u8]> {
        match self.token()? {
            Token::BodyChunk => Some(self.token_bytes()),
            _ => None,
        }
    }
}

impl Default for Reader<'_> {
    fn default() -> Self {
        Self::new()
    }
}
