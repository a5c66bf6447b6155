use serde::Serialize;

use crate::token::{RawToken, Token};

// ---------------------------------------------------------------------------
// TokenRecord
// ---------------------------------------------------------------------------

/// An owned, serializable snapshot of one token.
///
/// [`RawToken`] borrows from the input buffer; a `TokenRecord` copies the
/// span into an owned (lossily UTF-8 decoded) string so token streams can
/// outlive the buffer and be serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRecord {
    /// The token kind.
    pub kind: Token,
    /// Byte offset of the span within the tokenized input.
    pub offset: usize,
    /// Byte length of the span.
    pub len: usize,
    /// The span bytes, lossily decoded as UTF-8.
    pub text: String,
}

impl TokenRecord {
    /// Snapshot a borrowed token.
    pub fn from_raw(raw: &RawToken<'_>) -> Self {
        Self {
            kind: raw.kind,
            offset: raw.offset,
            len: raw.bytes.len(),
            text: String::from_utf8_lossy(raw.bytes).into_owned(),
        }
    }
}

/// Snapshot a whole token stream.
pub fn records(tokens: &[RawToken<'_>]) -> Vec<TokenRecord> {
    tokens.iter().map(TokenRecord::from_raw).collect()
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Serialize a token stream to a JSON string.
///
/// When `pretty` is `true` the output is indented for readability.
pub fn format_json(records: &[TokenRecord], pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(records).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    } else {
        serde_json::to_string(records).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Render a token stream as one aligned, escaped line per token.
pub fn format_debug(records: &[TokenRecord]) -> String {
    let mut out = String::with_capacity(records.len() * 48);
    out.push_str("offset  len  kind             text\n");
    for record in records {
        out.push_str(&format!(
            "{:>6}  {:>3}  {:<15}  \"{}\"\n",
            record.offset,
            record.len,
            record.kind,
            record.text.escape_default()
        ));
    }
    out
}

/// Reassemble a token stream into a human-readable request summary.
pub fn format_summary(records: &[TokenRecord]) -> String {
    let mut out = String::with_capacity(256);

    let mut method = "";
    let mut target = "";
    let mut version = "";
    let mut headers: Vec<(&str, &str)> = Vec::new();
    let mut trailers: Vec<(&str, &str)> = Vec::new();
    let mut body = String::new();
    let mut body_len = 0usize;
    let mut in_trailers = false;
    let mut pending_name: Option<&str> = None;

    for record in records {
        match record.kind {
            Token::Method => method = &record.text,
            Token::RequestTarget => target = &record.text,
            Token::Version => version = &record.text,
            Token::FieldName => pending_name = Some(&record.text),
            Token::FieldValue => {
                if let Some(name) = pending_name.take() {
                    let value = record.text.trim_end_matches([' ', '\t']);
                    if in_trailers {
                        trailers.push((name, value));
                    } else {
                        headers.push((name, value));
                    }
                }
            }
            Token::BodyChunk => {
                body_len += record.len;
                body.push_str(&record.text);
            }
            Token::EndOfBody => in_trailers = true,
            _ => {}
        }
    }

    out.push_str("=== HTTP Request ===\n");
    out.push_str(&format!("Method:  {method}\n"));
    out.push_str(&format!("Target:  {target}\n"));
    out.push_str(&format!("Version: HTTP/1.{version}\n"));

    out.push_str(&format!("\n--- Headers ({}) ---\n", headers.len()));
    for (name, value) in &headers {
        out.push_str(&format!("  {name}: {value}\n"));
    }

    if body_len > 0 {
        out.push_str(&format!("\n--- Body ({body_len} bytes) ---\n"));
        out.push_str(&body);
        out.push('\n');
    } else {
        out.push_str("\n--- No Body ---\n");
    }

    if !trailers.is_empty() {
        out.push_str(&format!("\n--- Trailers ({}) ---\n", trailers.len()));
        for (name, value) in &trailers {
            out.push_str(&format!("  {name}: {value}\n"));
        }
    }

    out.push_str("====================\n");
    out
}
