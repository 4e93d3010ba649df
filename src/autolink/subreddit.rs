//! Recognizes a `/r/subreddit` autolink.
//!
//! Roughly: `(/|(?<=\b))r/(all-)?%subreddit%([-+]%subreddit%)*(/[\w\-/]*)?`
//! where `%subreddit% == ((t:)?\w{2,24}|reddit\.com)`.

use super::boundary::word_boundary;
use super::{AutolinkKind, AutolinkMatch};

/// `pos` points at the trigger `/` (the one following `r`, as in `/r/foo`
/// or the bare `r/foo` form).
pub fn recognize_subreddit(full: &[u8], pos: usize) -> Option<AutolinkMatch> {
    let rewind = word_boundary(full, pos, b'r');
    if rewind == 0 {
        return None;
    }

    let data = &full[pos..];
    let size = data.len();
    let mut link_end = 1; // past the leading '/'

    let is_allminus = size >= link_end + 4 && data[link_end..link_end + 4].eq_ignore_ascii_case(b"all-");

    loop {
        let start = link_end;
        let mut max_length = 24;

        if size >= link_end + 10 && data[link_end..link_end + 10].eq_ignore_ascii_case(b"reddit.com") {
            link_end += 10;
            max_length = 10;
        } else {
            if size > link_end + 2 && data[link_end..link_end + 2].eq_ignore_ascii_case(b"t:") {
                link_end += 2;
            }
            if link_end >= size || !data[link_end].is_ascii_alphanumeric() {
                return None;
            }
            link_end += 1;
        }

        while link_end < size && (data[link_end].is_ascii_alphanumeric() || data[link_end] == b'_') {
            link_end += 1;
        }

        if link_end - start < 2 || link_end - start > max_length {
            return None;
        }

        let more = link_end < size && (data[link_end] == b'+' || (is_allminus && data[link_end] == b'-'));
        if !more {
            break;
        }
        link_end += 1;
    }

    if link_end < size && data[link_end] == b'/' {
        while link_end < size
            && (data[link_end].is_ascii_alphanumeric()
                || matches!(data[link_end], b'_' | b'/' | b'-'))
        {
            link_end += 1;
        }
    }

    Some(AutolinkMatch {
        consumed: link_end,
        rewind,
        link: full[pos - rewind..pos + link_end].to_vec(),
        kind: AutolinkKind::Subreddit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &[u8]) -> Option<AutolinkMatch> {
        let pos = text.windows(2).position(|w| w == b"r/").map(|i| i + 1)?;
        recognize_subreddit(text, pos)
    }

    #[test]
    fn matches_plain_subreddit() {
        let m = run(b"/r/learnprogramming").unwrap();
        assert_eq!(m.link, b"/r/learnprogramming");
    }

    #[test]
    fn rejects_too_short_name() {
        assert!(run(b"/r/a").is_none());
    }

    #[test]
    fn matches_multireddit() {
        let m = run(b"/r/pics+aww more").unwrap();
        assert_eq!(m.link, b"/r/pics+aww");
    }

    #[test]
    fn matches_all_minus_exclusions() {
        let m = run(b"/r/all-pics-aww more").unwrap();
        assert_eq!(m.link, b"/r/all-pics-aww");
    }

    #[test]
    fn matches_reddit_dot_com_special_case() {
        let m = run(b"/r/reddit.com rest").unwrap();
        assert_eq!(m.link, b"/r/reddit.com");
    }

    #[test]
    fn matches_timereddit_prefix() {
        let m = run(b"/r/t:when end").unwrap();
        assert_eq!(m.link, b"/r/t:when");
    }

    #[test]
    fn matches_trailing_path() {
        let m = run(b"/r/rust/wiki/faq end").unwrap();
        assert_eq!(m.link, b"/r/rust/wiki/faq");
    }
}
