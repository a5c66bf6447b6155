//! Byte classification predicates from RFC 7230 / RFC 5234.
//!
//! The tokenizer never looks at more than one byte at a time, so every
//! syntactic class it needs reduces to a predicate over `u8`.

/// `tchar` - characters allowed in HTTP tokens (method, field names,
/// transfer codings).
///
/// ```text
/// tchar = "!" / "#" / "$" / "%" / "&" / "'" / "*" / "+" / "-" / "." /
///         "^" / "_" / "`" / "|" / "~" / DIGIT / ALPHA
/// ```
#[inline]
pub(crate) fn is_tchar(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~'
            | b'0'..=b'9'
            | b'a'..=b'z'
            | b'A'..=b'Z'
    )
}

/// VCHAR - visible ASCII (0x21..=0x7E).
#[inline]
pub(crate) fn is_vchar(b: u8) -> bool {
    (0x21..=0x7E).contains(&b)
}

/// obs-text - the high half of the byte range (0x80..=0xFF), tolerated in
/// field values.
#[inline]
pub(crate) fn is_obs_text(b: u8) -> bool {
    b >= 0x80
}

/// OWS - optional whitespace, SP or HTAB.
#[inline]
pub(crate) fn is_ows(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Bytes permitted inside a header field value:
/// `SP / HTAB / VCHAR / obs-text`.
#[inline]
pub(crate) fn is_field_value_char(b: u8) -> bool {
    is_vchar(b) || is_obs_text(b) || is_ows(b)
}

/// Bytes accepted in the request-target: unreserved, sub-delims, and the
/// path/query punctuation, plus `%` for percent escapes.
#[inline]
pub(crate) fn is_request_target_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'?' | b'/'
                | b'-'
                | b'.'
                | b'_'
                | b'~'
                | b'%'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'@'
        )
}

/// Bytes tolerated inside a chunk extension, up to the terminating CR.
///
/// The grammar unions token, quoted-string, and separator bytes; the union
/// collapses to the same set as field-value bytes.
#[inline]
pub(crate) fn is_chunk_ext_char(b: u8) -> bool {
    is_vchar(b) || is_obs_text(b) || is_ows(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tchar_accepts_valid_bytes() {
        for &b in b"abcXYZ019!#$%&'*+-.^_`|~" {
            assert!(is_tchar(b), "expected tchar for byte 0x{b:02X}");
        }
    }

    #[test]
    fn tchar_rejects_invalid_bytes() {
        for &b in b" \t\r\n:@[]{}" {
            assert!(!is_tchar(b), "expected non-tchar for byte 0x{b:02X}");
        }
    }

    #[test]
    fn field_value_char_accepts_sp_htab_vchar_obstext() {
        assert!(is_field_value_char(b' '));
        assert!(is_field_value_char(b'\t'));
        assert!(is_field_value_char(b'A'));
        assert!(is_field_value_char(0x80));
        assert!(is_field_value_char(0xFF));
    }

    #[test]
    fn field_value_char_rejects_ctl() {
        assert!(!is_field_value_char(0x00));
        assert!(!is_field_value_char(0x1F));
        assert!(!is_field_value_char(b'\r'));
        assert!(!is_field_value_char(b'\n'));
        assert!(!is_field_value_char(0x7F)); // DEL
    }

    #[test]
    fn request_target_char_covers_path_and_query() {
        for &b in b"/api/users?page=1&limit=10%20,;:@~" {
            assert!(is_request_target_char(b), "byte 0x{b:02X}");
        }
        assert!(!is_request_target_char(b' '));
        assert!(!is_request_target_char(b'\r'));
        assert!(!is_request_target_char(b'#'));
    }

    #[test]
    fn chunk_ext_char_stops_at_line_endings() {
        assert!(is_chunk_ext_char(b';'));
        assert!(is_chunk_ext_char(b'='));
        assert!(is_chunk_ext_char(b'"'));
        assert!(is_chunk_ext_char(b' '));
        assert!(!is_chunk_ext_char(b'\r'));
        assert!(!is_chunk_ext_char(b'\n'));
    }
}
