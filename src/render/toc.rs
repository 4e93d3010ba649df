//! Table-of-contents generation.
//!
//! A document that wants a TOC gets parsed twice with two different
//! callback tables — once with [`super::html_callbacks`] to produce the
//! body, once with the callbacks built here to produce the `<ul>` tree of
//! links. Both passes see headers in the same order, so as long as each
//! assigns anchor ids by a plain running counter, the ids the body
//! attaches to its `<hN>` tags and the ids the TOC links to line up
//! without the two passes sharing any state beyond that counter's
//! starting value.

use crate::buffer::Buffer;
use crate::callbacks::Callbacks;

use super::RenderState;

#[derive(Debug, Default)]
pub struct TocState {
    pub header_count: u32,
    entries: Vec<TocEntry>,
}

#[derive(Debug)]
struct TocEntry {
    level: u32,
    id: String,
    title: Vec<u8>,
}

/// Builds the anchor id for the `n`th header (1-based), honoring a
/// mode-configured prefix so ids can't collide with the rest of the page.
pub fn anchor_id(prefix: &Option<String>, n: u32) -> String {
    match prefix {
        Some(p) => format!("{}toc_{}", p, n),
        None => format!("toc_{}", n),
    }
}

fn toc_header(_ob: &mut Buffer, text: Option<&[u8]>, level: u32, state: &mut RenderState) {
    let id = anchor_id(&state.toc_id_prefix, state.toc_state.header_count);
    state.toc_state.header_count += 1;
    state.toc_state.entries.push(TocEntry {
        level,
        id,
        title: text.unwrap_or(&[]).to_vec(),
    });
}

fn toc_pre_document(_ob: &mut Buffer, state: &mut RenderState) {
    state.toc_state.entries.clear();
    state.toc_state.header_count = 0;
}

fn toc_post_document(ob: &mut Buffer, state: &mut RenderState) {
    if state.toc_state.entries.is_empty() {
        return;
    }
    ob.push_str("<div class=\"toc\">\n");
    render_nested(ob, &state.toc_state.entries);
    ob.push_str("</div>\n");
}

fn render_nested(ob: &mut Buffer, entries: &[TocEntry]) {
    let base = entries.iter().map(|e| e.level).min().unwrap_or(1);
    let mut stack = vec![base];
    ob.push_str("<ul>\n");
    for entry in entries {
        while *stack.last().unwrap() < entry.level {
            ob.push_str("<ul>\n");
            stack.push(stack.last().unwrap() + 1);
        }
        while stack.len() > 1 && *stack.last().unwrap() > entry.level {
            ob.push_str("</ul>\n");
            stack.pop();
        }
        ob.push_str("<li><a href=\"#");
        ob.push_str(&entry.id);
        ob.push_str("\">");
        crate::escape::escape_html(ob, &entry.title);
        ob.push_str("</a></li>\n");
    }
    while stack.len() > 1 {
        ob.push_str("</ul>\n");
        stack.pop();
    }
    ob.push_str("</ul>\n");
}

/// A callback table that records headers into a TOC instead of emitting
/// body markup; `post_document` flushes the collected tree.
pub fn toc_callbacks() -> Callbacks {
    Callbacks {
        header: Some(toc_header),
        pre_document: Some(toc_pre_document),
        post_document: Some(toc_post_document),
        ..Callbacks::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_id_respects_prefix() {
        assert_eq!(anchor_id(&None, 3), "toc_3");
        assert_eq!(anchor_id(&Some("wiki_".to_string()), 3), "wiki_toc_3");
    }

    #[test]
    fn nested_levels_open_and_close_lists() {
        let mut ob = Buffer::new();
        let entries = vec![
            TocEntry { level: 1, id: "toc_1".into(), title: b"Intro".to_vec() },
            TocEntry { level: 2, id: "toc_2".into(), title: b"Sub".to_vec() },
            TocEntry { level: 1, id: "toc_3".into(), title: b"Next".to_vec() },
        ];
        render_nested(&mut ob, &entries);
        let out = ob.into_string_lossy();
        assert_eq!(out.matches("<ul>").count(), 2);
        assert_eq!(out.matches("</ul>").count(), 2);
    }

    #[test]
    fn post_document_wraps_entries_in_a_toc_div() {
        let mut ob = Buffer::new();
        let mut state = RenderState::new(super::super::RenderFlags::default());
        toc_header(&mut Buffer::new(), Some(b"Intro"), 1, &mut state);
        toc_post_document(&mut ob, &mut state);
        let out = ob.into_string_lossy();
        assert!(out.starts_with("<div class=\"toc\">\n"));
        assert!(out.trim_end().ends_with("</div>"));
    }

    #[test]
    fn post_document_emits_nothing_when_no_headers_seen() {
        let mut ob = Buffer::new();
        let mut state = RenderState::new(super::super::RenderFlags::default());
        toc_post_document(&mut ob, &mut state);
        assert!(ob.is_empty());
    }
}
