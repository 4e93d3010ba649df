//! The renderer mode harness: binds a [`Mode`] and [`Options`] to a
//! concrete [`Callbacks`] table and [`RenderState`], the way the
//! teacher's `Constructs`/`CompileOptions`/`Options` triad configures a
//! compile rather than selecting between hand-written renderer structs.
//!
//! Three presets are built in: `usertext` (comments and self-post
//! bodies — full formatting, safelinked), `usertext-without-links`
//! (same as `usertext` but with links and images suppressed — used for
//! contexts where a rendered link would be misleading, such as message
//! notification previews), and `wiki` (subreddit wiki pages — adds the
//! raw-HTML whitelist, and is the one mode that ever turns `skip_html`
//! off). The table of contents is not mode-specific: any mode produces
//! one when the caller sets `Options::enable_toc`.
//!
//! Each mode gets its own independent [`RenderState`] rather than a
//! shared one: `usertext` and `usertext-without-links` look similar
//! enough that sharing state between them would be tempting, but a
//! shared render counter (header numbering, table-of-contents position)
//! would leak between otherwise-unrelated renders of the two modes if
//! the harness cached a `RenderState` by name.

use crate::callbacks::Callbacks;
use crate::error::Error;
use crate::parser::{Parser, DEFAULT_MAX_NESTING};
use crate::render::{html_callbacks, toc_callbacks, wiki_html_callbacks, RenderFlags, RenderState};

/// The three renderer presets, identified the way the original's C API
/// identifies them: a small integer mode index coming in from outside
/// Rust. [`Mode::from_index`] is the only fallible entry point in the
/// crate — everything else takes an already-resolved `Mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    UserText,
    Wiki,
    UserTextWithoutLinks,
}

impl Mode {
    pub fn from_index(index: i32) -> Result<Self, Error> {
        match index {
            0 => Ok(Mode::UserText),
            1 => Ok(Mode::Wiki),
            2 => Ok(Mode::UserTextWithoutLinks),
            other => Err(Error::InvalidMode(other)),
        }
    }
}

/// Render-time options layered on top of a [`Mode`]'s fixed defaults —
/// the parts of configuration callers are expected to vary per-render
/// (nofollow/target policy, a TOC id namespace, max nesting) rather than
/// per-deployment.
#[derive(Debug, Clone)]
pub struct Options {
    pub mode: Mode,
    pub nofollow: bool,
    pub target: Option<String>,
    pub toc_id_prefix: Option<String>,
    pub enable_toc: bool,
    pub max_nesting: usize,
}

impl Options {
    pub fn new(mode: Mode) -> Self {
        Options {
            mode,
            nofollow: false,
            target: None,
            toc_id_prefix: None,
            enable_toc: false,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    pub fn with_nofollow(mut self, nofollow: bool) -> Self {
        self.nofollow = nofollow;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_toc_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.toc_id_prefix = Some(prefix.into());
        self
    }

    pub fn with_enable_toc(mut self, enable: bool) -> Self {
        self.enable_toc = enable;
        self
    }
}

/// A mode resolved into the concrete pieces a render needs: the
/// callback table to drive the parser with, and the render flags that
/// seed a fresh [`RenderState`] for every call.
struct ModeProfile {
    callbacks: Callbacks,
    flags: RenderFlags,
}

/// Builds a mode's fixed defaults. `toc` is always `false` here: whether a
/// TOC pass runs is `Options::enable_toc`, an independent per-render knob
/// per §4.5 of the spec, not something baked into a mode.
fn profile_for(mode: Mode) -> ModeProfile {
    match mode {
        Mode::UserText => ModeProfile {
            callbacks: html_callbacks(),
            flags: RenderFlags {
                skip_html: true,
                skip_images: false,
                skip_links: false,
                safe_links_only: true,
                hard_wrap: false,
                xhtml: true,
                toc: false,
            },
        },
        Mode::UserTextWithoutLinks => ModeProfile {
            callbacks: Callbacks {
                link: None,
                autolink: None,
                image: None,
                ..html_callbacks()
            },
            flags: RenderFlags {
                skip_html: true,
                skip_images: true,
                skip_links: true,
                safe_links_only: true,
                hard_wrap: false,
                xhtml: true,
                toc: false,
            },
        },
        Mode::Wiki => ModeProfile {
            callbacks: wiki_html_callbacks(),
            flags: RenderFlags {
                skip_html: false,
                skip_images: false,
                skip_links: false,
                safe_links_only: true,
                hard_wrap: false,
                xhtml: true,
                toc: false,
            },
        },
    }
}

/// Renders `input` under `options`, returning the body markup. When
/// `options.enable_toc` is set, a second pass additionally runs with the
/// table-of-contents callback table; callers that need the TOC separately
/// should use [`render_with_toc`] instead.
pub fn render(input: &[u8], options: &Options) -> Result<String, Error> {
    let (body, _toc) = render_with_toc(input, options)?;
    Ok(body)
}

/// Renders `input` under `options`, returning `(body, toc)`. `toc` is
/// `None` unless the resolved mode enables it (currently: wiki mode
/// only); a caller who doesn't ask for a TOC-enabled mode never pays for
/// the second pass.
pub fn render_with_toc(input: &[u8], options: &Options) -> Result<(String, Option<String>), Error> {
    let mut profile = profile_for(options.mode);
    profile.flags.toc = options.enable_toc;

    let mut state = RenderState::new(profile.flags);
    state.nofollow = options.nofollow;
    state.target = options.target.clone();
    state.toc_id_prefix = options.toc_id_prefix.clone();

    let mut parser = Parser::new(&profile.callbacks, options.max_nesting);
    let body = parser.render(input, &mut state).into_string_lossy();

    if !options.enable_toc {
        return Ok((body, None));
    }

    let toc_callbacks = toc_callbacks();
    let mut toc_state = RenderState::new(profile.flags);
    toc_state.toc_id_prefix = options.toc_id_prefix.clone();
    let mut toc_parser = Parser::new(&toc_callbacks, options.max_nesting);
    let toc = toc_parser.render(input, &mut toc_state).into_string_lossy();

    Ok((body, Some(toc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_mode_index_is_an_error() {
        assert!(matches!(Mode::from_index(7), Err(Error::InvalidMode(7))));
    }

    #[test]
    fn usertext_escapes_raw_html() {
        let out = render(b"<script>bad</script>", &Options::new(Mode::UserText)).unwrap();
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn usertext_without_links_drops_anchors() {
        let out = render(b"[click](http://example.com)", &Options::new(Mode::UserTextWithoutLinks)).unwrap();
        assert!(!out.contains("<a "));
        assert!(out.contains("click"));
    }

    #[test]
    fn wiki_mode_passes_whitelisted_html() {
        let out = render(br#"<table><tr><td colspan="2">a</td></tr></table>"#, &Options::new(Mode::Wiki)).unwrap();
        assert!(out.contains(r#"<td colspan="2">"#));
        assert!(!out.contains("onclick"));
    }

    #[test]
    fn wiki_mode_produces_a_toc_when_enabled() {
        let options = Options::new(Mode::Wiki).with_enable_toc(true);
        let (_, toc) = render_with_toc(b"# One\n\ntext\n\n## Two\n", &options).unwrap();
        let toc = toc.unwrap();
        assert!(toc.contains("href=\"#toc_0\""));
        assert!(toc.contains("href=\"#toc_1\""));
    }

    #[test]
    fn toc_is_off_by_default_even_in_wiki_mode() {
        let (_, toc) = render_with_toc(b"# One\n", &Options::new(Mode::Wiki)).unwrap();
        assert!(toc.is_none());
    }

    #[test]
    fn usertext_mode_can_also_enable_toc() {
        let options = Options::new(Mode::UserText).with_enable_toc(true);
        let (body, toc) = render_with_toc(b"# One\n", &options).unwrap();
        assert!(body.contains("id=\"toc_0\""));
        assert!(toc.unwrap().contains("href=\"#toc_0\""));
    }
}
