//! Recognizes a `/u/username` autolink.

use super::boundary::word_boundary;
use super::{AutolinkKind, AutolinkMatch};

/// `pos` points at the trigger `/` (the one following `u`, as in `/u/foo`
/// or the bare `u/foo` form). Returns `None` if this isn't on a word
/// boundary or the body is empty/invalid.
pub fn recognize_username(full: &[u8], pos: usize) -> Option<AutolinkMatch> {
    if full.len() - pos < 3 {
        return None;
    }

    let rewind = word_boundary(full, pos, b'u');
    if rewind == 0 {
        return None;
    }

    let data = &full[pos..];
    let first = data[1];
    if !(first.is_ascii_alphanumeric() || first == b'_' || first == b'-') {
        return None;
    }

    let mut link_end = 2;
    while link_end < data.len()
        && (data[link_end].is_ascii_alphanumeric()
            || matches!(data[link_end], b'_' | b'/' | b'-'))
    {
        link_end += 1;
    }

    Some(AutolinkMatch {
        consumed: link_end,
        rewind,
        link: full[pos - rewind..pos + link_end].to_vec(),
        kind: AutolinkKind::Username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_slash_u_username() {
        let text = b"ask /u/spez about it";
        let pos = text.iter().position(|&b| b == b'u').unwrap() + 1; // the second '/'
        assert_eq!(text[pos], b'/');
        let m = recognize_username(text, pos).unwrap();
        assert_eq!(m.link, b"/u/spez");
    }

    #[test]
    fn matches_bare_u_form() {
        let text = b"(u/spez)";
        let pos = 2;
        let m = recognize_username(text, pos).unwrap();
        assert_eq!(m.link, b"u/spez");
    }
}
