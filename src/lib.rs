//! `snoomark`: a forum-flavoured Markdown to HTML transformer.
//!
//! Three rendering modes cover the places a forum turns user-authored
//! markdown into markup: `usertext` (comments and self-post bodies),
//! `usertext-without-links` (the same, but with links/images suppressed),
//! and `wiki` (subreddit wiki pages — raw HTML whitelisting and a table
//! of contents). See [`Mode`] and [`Options`].
//!
//! ```
//! use snoomark::{render, Mode, Options};
//!
//! let html = render(b"Hello, *world*!", &Options::new(Mode::UserText)).unwrap();
//! assert_eq!(html, "<p>Hello, <em>world</em>!</p>\n");
//! ```
//!
//! Autolinking of bare URLs, `www.` addresses, email addresses, and the
//! forum-specific `/r/subreddit` and `/u/username` references happens
//! inline, without `[text](url)` syntax. Links and images are gated
//! through a fixed safe-scheme list so `javascript:` and friends never
//! reach an `href`/`src`.
#![forbid(unsafe_code)]
#![deny(clippy::pedantic)]
#![allow(clippy::too_many_lines)]

mod autolink;
mod buffer;
mod callbacks;
mod error;
mod escape;
mod modes;
mod parser;
mod render;

pub use error::Error;
pub use modes::{render, render_with_toc, Mode, Options};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_render_matches_modes_render() {
        let options = Options::new(Mode::UserText);
        let out = render(b"# hi\n", &options).unwrap();
        assert_eq!(out, "<h1>hi</h1>\n");
    }
}
