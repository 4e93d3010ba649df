//! Recognizes a `scheme://...` autolink.

use super::delim::trim_delimiters;
use super::domain::check_domain;
use super::{is_safe, AutolinkKind, AutolinkMatch};

/// `pos` must point at the `:` of a `://` sequence; callers (the inline
/// scanner's scheme-letter handlers) find it by scanning forward from the
/// scheme's first letter.
pub fn recognize_url(full: &[u8], pos: usize, allow_short_domains: bool) -> Option<AutolinkMatch> {
    let data = &full[pos..];
    if data.len() < 4 || data[1] != b'/' || data[2] != b'/' {
        return None;
    }

    let mut rewind = 0;
    while rewind < pos && full[pos - rewind - 1].is_ascii_alphabetic() {
        rewind += 1;
    }

    let candidate = &full[pos - rewind..];
    if !is_safe(candidate) {
        return None;
    }

    let mut link_end = 3; // "://"
    let domain_len = check_domain(&data[link_end..], allow_short_domains);
    if domain_len == 0 {
        return None;
    }
    link_end += domain_len;
    while link_end < data.len() && !data[link_end].is_ascii_whitespace() {
        link_end += 1;
    }

    let link_end = trim_delimiters(data, link_end);
    if link_end == 0 {
        return None;
    }

    Some(AutolinkMatch {
        consumed: link_end,
        rewind,
        link: full[pos - rewind..pos + link_end].to_vec(),
        kind: AutolinkKind::Url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_plain_http_url() {
        let text = b"look at http://www.pokemon.com/Pikachu_(Electric) ok";
        let pos = text.windows(3).position(|w| w == b"://").unwrap();
        let m = recognize_url(text, pos, false).unwrap();
        assert_eq!(m.link, b"http://www.pokemon.com/Pikachu_(Electric)");
    }

    #[test]
    fn rejects_unsafe_scheme() {
        let text = b"javascript://alert(1)";
        let pos = text.windows(3).position(|w| w == b"://").unwrap();
        assert!(recognize_url(text, pos, false).is_none());
    }
}
