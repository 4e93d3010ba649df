//! HTML rendering: the callback implementations that turn parsed
//! constructs into markup, plus the per-render state they share.

mod html;
mod toc;
mod whitelist;

pub use html::{html_callbacks, link_attributes_nofollow_target, wiki_html_callbacks};
pub use toc::{toc_callbacks, TocState};
pub use whitelist::{filter_raw_html, AttributeWhitelist, ElementWhitelist};

/// Flags a mode turns on or off; read by the callback implementations
/// rather than baked into separate functions per flag combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFlags {
    pub skip_html: bool,
    pub skip_images: bool,
    pub skip_links: bool,
    pub safe_links_only: bool,
    pub hard_wrap: bool,
    pub xhtml: bool,
    pub toc: bool,
}

impl Default for RenderFlags {
    fn default() -> Self {
        RenderFlags {
            skip_html: false,
            skip_images: false,
            skip_links: false,
            safe_links_only: true,
            hard_wrap: false,
            xhtml: false,
            toc: false,
        }
    }
}

/// Everything a callback needs beyond the text in front of it. One
/// instance is created per render and threaded mutably through every
/// block and inline callback, taking the place of the original's
/// `void *opaque` renderer handle.
pub struct RenderState {
    pub flags: RenderFlags,
    pub nofollow: bool,
    pub target: Option<String>,
    pub toc_id_prefix: Option<String>,
    pub element_whitelist: ElementWhitelist,
    pub attr_whitelist: AttributeWhitelist,
    pub toc_state: TocState,
}

impl RenderState {
    pub fn new(flags: RenderFlags) -> Self {
        RenderState {
            flags,
            nofollow: false,
            target: None,
            toc_id_prefix: None,
            element_whitelist: ElementWhitelist::default(),
            attr_whitelist: AttributeWhitelist::default(),
            toc_state: TocState::default(),
        }
    }
}
