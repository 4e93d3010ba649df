//! Stateless autolink recognizers: one function per link kind, each scanning
//! forward (and sometimes backward) from a trigger byte.
//!
//! A recognizer takes a `(full slice, cursor)` pair rather than a pointer
//! into the middle of a buffer with negative-offset rewind/lookbehind
//! counts: it reads to either side of `cursor` within the slice's own
//! bounds, so there's no pointer arithmetic and no unsafe.
//!
//! Each recognizer is its own module, one file per syntax feature, entered
//! from a dispatch table keyed by trigger byte in
//! [`crate::parser::inline`].

mod boundary;
mod delim;
mod domain;
mod email;
mod subreddit;
mod url;
mod username;
mod www;

pub use email::recognize_email;
pub use subreddit::recognize_subreddit;
pub use url::recognize_url;
pub use username::recognize_username;
pub use www::recognize_www;

/// The kind of autolink recognized, mirroring `enum mkd_autolink` from the
/// original (`MKDA_NOT_AUTOLINK`/`MKDA_NORMAL`/`MKDA_EMAIL`/...). The HTML
/// renderer needs to distinguish email links (for the `mailto:` prefix and
/// the safelink bypass) from everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutolinkKind {
    Url,
    Www,
    Email,
    Subreddit,
    Username,
}

/// Result of a successful recognizer call.
#[derive(Debug, Clone)]
pub struct AutolinkMatch {
    /// Bytes consumed forward from the trigger position (exclusive of any
    /// rewound prefix).
    pub consumed: usize,
    /// Bytes consumed backward from the trigger position, already included
    /// as a prefix of `link`.
    pub rewind: usize,
    /// The exact span that should be treated as a single autolink, i.e.
    /// `full[pos - rewind .. pos + consumed]`.
    pub link: Vec<u8>,
    pub kind: AutolinkKind,
}

/// The fourteen schemes accepted as safe, each requiring the byte right
/// after the prefix to be alphanumeric, `#`, `/`, or `?` — a bare
/// `http://` with nothing following is therefore unsafe.
const SAFE_SCHEMES: &[&str] = &[
    "http://",
    "https://",
    "ftp://",
    "mailto://",
    "/",
    "git://",
    "steam://",
    "irc://",
    "news://",
    "mumble://",
    "ssh://",
    "ircs://",
    "ts3server://",
    "#",
];

/// Is `link` a scheme on the fixed safelist, immediately followed by an
/// alphanumeric, `#`, `/`, or `?`?
pub fn is_safe(link: &[u8]) -> bool {
    for scheme in SAFE_SCHEMES {
        let scheme = scheme.as_bytes();
        if link.len() > scheme.len() && link[..scheme.len()].eq_ignore_ascii_case(scheme) {
            let next = link[scheme.len()];
            if next.is_ascii_alphanumeric() || matches!(next, b'#' | b'/' | b'?') {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_scheme_with_nothing_after_is_unsafe() {
        assert!(!is_safe(b"http://"));
    }

    #[test]
    fn scheme_followed_by_domain_is_safe() {
        assert!(is_safe(b"http://example.com"));
        assert!(is_safe(b"/r/rust"));
        assert!(is_safe(b"#fragment"));
    }

    #[test]
    fn unknown_scheme_is_unsafe() {
        assert!(!is_safe(b"javascript://alert(1)"));
    }
}
