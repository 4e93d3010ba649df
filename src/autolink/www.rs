//! Recognizes bare `www.` autolinks.

use super::delim::trim_delimiters;
use super::domain::check_domain;
use super::{AutolinkKind, AutolinkMatch};

/// `pos` points at the `w` of `www.`. Requires the preceding byte (if any)
/// to be punctuation or whitespace — unlike the URL recognizer, `www.`
/// autolinks never rewind over a scheme, so `rewind` is always `0`.
pub fn recognize_www(full: &[u8], pos: usize) -> Option<AutolinkMatch> {
    if pos > 0 {
        let prev = full[pos - 1];
        if !prev.is_ascii_punctuation() && !prev.is_ascii_whitespace() {
            return None;
        }
    }

    let data = &full[pos..];
    if data.len() < 4 || &data[0..4] != b"www." {
        return None;
    }

    let link_end = check_domain(data, false);
    if link_end == 0 {
        return None;
    }

    let mut link_end = link_end;
    while link_end < data.len() && !data[link_end].is_ascii_whitespace() {
        link_end += 1;
    }

    let link_end = trim_delimiters(data, link_end);
    if link_end == 0 {
        return None;
    }

    Some(AutolinkMatch {
        consumed: link_end,
        rewind: 0,
        link: data[..link_end].to_vec(),
        kind: AutolinkKind::Www,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_bare_www() {
        let text = b"see www.example.com/a today";
        let pos = 4;
        let m = recognize_www(text, pos).unwrap();
        assert_eq!(m.link, b"www.example.com/a");
    }

    #[test]
    fn requires_boundary_before() {
        let text = b"seewww.example.com";
        assert!(recognize_www(text, 3).is_none());
    }
}
