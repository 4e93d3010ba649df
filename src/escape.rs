//! HTML entity escaping and href percent-encoding.
//!
//! Both scan-and-flush literal runs rather than copying byte by byte, and
//! both are no-ops on bytes outside ASCII, so valid UTF-8 in stays valid
//! UTF-8 out. Re-escaping already-escaped output must not double-escape.

use crate::buffer::Buffer;

/// Escape `< > & " '` as named/numeric entities. `'` maps to `&#39;` rather
/// than `&apos;`, which is undefined in HTML4 but universally safe.
pub fn escape_html(out: &mut Buffer, bytes: &[u8]) {
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let entity: &[u8] = match b {
            b'<' => b"&lt;",
            b'>' => b"&gt;",
            b'&' => b"&amp;",
            b'"' => b"&quot;",
            b'\'' => b"&#39;",
            _ => continue,
        };
        out.push_bytes(&bytes[start..i]);
        out.push_bytes(entity);
        start = i + 1;
    }
    out.push_bytes(&bytes[start..]);
}

/// Same as [`escape_html`] but returns an owned `String`, for call sites
/// that need an intermediate value rather than a buffer append (e.g.
/// whitelist attribute name/value comparisons).
pub fn escape_html_to_string(bytes: &[u8]) -> String {
    let mut buf = Buffer::new();
    escape_html(&mut buf, bytes);
    buf.into_string_lossy()
}

/// Percent-encode bytes unsafe in an `href` context. Preserves
/// alphanumerics and `/ : ? # & = + , - . _ ~ ( ) @ ! * ' ; $` verbatim
/// (houdini's `HREF_SAFE` table); anything else (including all non-ASCII
/// bytes) is percent-encoded byte-by-byte.
pub fn escape_href(out: &mut Buffer, bytes: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if is_href_safe(b) {
            continue;
        }
        out.push_bytes(&bytes[start..i]);
        out.push_byte(b'%');
        out.push_byte(HEX[(b >> 4) as usize]);
        out.push_byte(HEX[(b & 0x0f) as usize]);
        start = i + 1;
    }
    out.push_bytes(&bytes[start..]);
}

fn is_href_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'/' | b':' | b'?' | b'#' | b'&' | b'=' | b'+' | b',' | b'-' | b'.' | b'_' | b'~' | b'(' | b')' | b'@' | b'!' | b'*' | b'\'' | b';' | b'$'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_five() {
        assert_eq!(escape_html_to_string(b"<>&\"'"), "&lt;&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn idempotent_on_plain_text() {
        let once = escape_html_to_string(b"hello world");
        let twice = escape_html_to_string(once.as_bytes());
        assert_eq!(once, twice);
    }

    #[test]
    fn href_preserves_safe_set_and_encodes_rest() {
        let mut buf = Buffer::new();
        escape_href(&mut buf, b"http://a.b/c?d=1&e=2 f");
        assert_eq!(buf.as_bytes(), b"http://a.b/c?d=1&e=2%20f");
    }

    #[test]
    fn href_keeps_balanced_parens_unescaped() {
        let mut buf = Buffer::new();
        escape_href(&mut buf, b"http://www.pokemon.com/Pikachu_(Electric)");
        assert_eq!(buf.as_bytes(), b"http://www.pokemon.com/Pikachu_(Electric)");
    }

    #[test]
    fn href_keeps_mailto_at_sign_unescaped() {
        let mut buf = Buffer::new();
        escape_href(&mut buf, b"mailto:foo@x.com");
        assert_eq!(buf.as_bytes(), b"mailto:foo@x.com");
    }
}
