//! Drives a document through the three parsing phases (reference
//! collection, block decomposition, inline scanning), invoking a
//! [`Callbacks`] table as it goes rather than building an intermediate
//! tree. One [`Parser`] is built per render and is immutable for the
//! whole pass; only [`crate::render::RenderState`], threaded through as
//! `&mut`, changes as parsing proceeds.

mod block;
mod inline;
mod pool;
mod refs;

use std::collections::HashMap;

use crate::buffer::Buffer;
use crate::callbacks::Callbacks;
use crate::render::RenderState;

pub use pool::BufferPool;
pub(crate) use refs::LinkRef;

/// How deeply blockquotes/lists/spoiler-blocks may nest before the
/// parser stops recursing and treats the remainder as a literal
/// paragraph, guarding against pathological input driving the recursive
/// descent into a stack overflow.
pub const DEFAULT_MAX_NESTING: usize = 16;

pub struct Parser<'cb> {
    pub(crate) callbacks: &'cb Callbacks,
    pub(crate) refmap: HashMap<String, LinkRef>,
    pub(crate) max_nesting: usize,
    pub(crate) pool: BufferPool,
}

impl<'cb> Parser<'cb> {
    pub fn new(callbacks: &'cb Callbacks, max_nesting: usize) -> Self {
        Parser {
            callbacks,
            refmap: HashMap::new(),
            max_nesting,
            pool: BufferPool::new(),
        }
    }

    /// Render `input` end to end: normalize line endings, collect
    /// reference definitions, then walk the block structure emitting
    /// through `callbacks`.
    pub fn render(&mut self, input: &[u8], state: &mut RenderState) -> Buffer {
        log::debug!("phase: reference prepass over {} bytes", input.len());
        let normalized = normalize_newlines(input);
        self.refmap = refs::collect_references(&normalized);
        log::trace!("phase: collected {} reference definitions", self.refmap.len());

        let mut ob = Buffer::new();
        if let Some(f) = self.callbacks.pre_document {
            f(&mut ob, state);
        }
        log::debug!("phase: block decomposition");
        block::parse_blocks(self, &normalized, 0, &mut ob, state);
        if let Some(f) = self.callbacks.post_document {
            f(&mut ob, state);
        }
        log::debug!("phase: done, {} bytes rendered", ob.len());
        ob
    }

    #[cfg(test)]
    pub(crate) fn for_test(callbacks: &'cb Callbacks) -> Self {
        Parser::new(callbacks, DEFAULT_MAX_NESTING)
    }
}

/// Collapses `\r\n` and bare `\r` to `\n` up front so every later phase
/// can assume a single line-ending convention.
fn normalize_newlines(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            b'\r' => {
                out.push(b'\n');
                if input.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{html_callbacks, RenderFlags};

    #[test]
    fn renders_a_simple_paragraph() {
        let callbacks = html_callbacks();
        let mut parser = Parser::new(&callbacks, DEFAULT_MAX_NESTING);
        let mut state = RenderState::new(RenderFlags::default());
        let out = parser.render(b"hello *world*", &mut state);
        assert_eq!(out.into_string_lossy(), "<p>hello <em>world</em></p>\n");
    }

    #[test]
    fn crlf_is_normalized_before_parsing() {
        let callbacks = html_callbacks();
        let mut parser = Parser::new(&callbacks, DEFAULT_MAX_NESTING);
        let mut state = RenderState::new(RenderFlags::default());
        let out = parser.render(b"a\r\nb\r\n", &mut state);
        assert_eq!(out.into_string_lossy(), "<p>a\nb</p>\n");
    }

    #[test]
    fn heading_gets_its_own_tag() {
        let callbacks = html_callbacks();
        let mut parser = Parser::new(&callbacks, DEFAULT_MAX_NESTING);
        let mut state = RenderState::new(RenderFlags::default());
        let out = parser.render(b"# Title\n\nbody text", &mut state);
        assert_eq!(out.into_string_lossy(), "<h1>Title</h1>\n\n<p>body text</p>\n");
    }
}
