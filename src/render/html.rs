//! The default HTML callback table: every block and inline construct
//! rendered as the tag repertoire forum comments actually need, with
//! safelink gating on every href/src the renderer touches.

use crate::autolink::{is_safe, AutolinkKind};
use crate::buffer::Buffer;
use crate::callbacks::{Align, Callbacks};
use crate::escape::{escape_href, escape_html};

use super::RenderState;

/// Splits `lang` on whitespace, stripping one leading `.` from every
/// token, and writes `md-code-language-<first> <rest...>` as the class
/// value (the `md-code-language-` prefix is written once, directly
/// against the first token; later tokens are space-separated but not
/// reprefixed), matching `rndr_blockcode`'s token loop.
fn push_code_language_class(ob: &mut Buffer, lang: &[u8]) {
    ob.push_str(" class=\"md-code-language-");
    let mut first = true;
    for token in lang.split(|&b| b.is_ascii_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let token = token.strip_prefix(b".").unwrap_or(token);
        if !first {
            ob.push_byte(b' ');
        }
        escape_html(ob, token);
        first = false;
    }
    ob.push_byte(b'"');
}

fn block_code(ob: &mut Buffer, text: Option<&[u8]>, lang: Option<&[u8]>, _state: &mut RenderState) {
    if !ob.is_empty() {
        ob.push_byte(b'\n');
    }
    ob.push_str("<pre><code");
    if let Some(lang) = lang {
        if !lang.is_empty() {
            push_code_language_class(ob, lang);
        }
    }
    ob.push_byte(b'>');
    if let Some(text) = text {
        escape_html(ob, text);
    }
    ob.push_str("</code></pre>\n");
}

fn block_quote(ob: &mut Buffer, text: Option<&[u8]>, _state: &mut RenderState) {
    if !ob.is_empty() {
        ob.push_byte(b'\n');
    }
    ob.push_str("<blockquote>\n");
    if let Some(text) = text {
        ob.push_bytes(text);
    }
    ob.push_str("</blockquote>\n");
}

fn block_spoiler(ob: &mut Buffer, text: Option<&[u8]>, _state: &mut RenderState) {
    if !ob.is_empty() {
        ob.push_byte(b'\n');
    }
    ob.push_str("<blockquote class=\"md-spoiler-text\">\n");
    if let Some(text) = text {
        ob.push_bytes(text);
    }
    ob.push_str("</blockquote>\n");
}

fn raw_block(ob: &mut Buffer, text: Option<&[u8]>, state: &mut RenderState) {
    let Some(text) = text else { return };
    let trimmed = trim_trailing_newline(text);
    let start = trimmed.iter().take_while(|&&b| b == b'\n').count();
    if start >= trimmed.len() {
        return;
    }
    let body = &trimmed[start..];
    if !ob.is_empty() {
        ob.push_byte(b'\n');
    }
    // Escape wins over skip-html in every preset mode's flag combination
    // (§4.4's priority chain: whitelist, then escape, then skip-html,
    // then element-level skip, then verbatim) — mirrors `raw_html_inline`
    // rather than dropping the block outright.
    if state.flags.skip_html {
        escape_html(ob, body);
    } else {
        ob.push_bytes(body);
    }
    ob.push_byte(b'\n');
}

fn header(ob: &mut Buffer, text: Option<&[u8]>, level: u32, state: &mut RenderState) {
    if !ob.is_empty() {
        ob.push_byte(b'\n');
    }
    let level = level.clamp(1, 6);
    ob.push_str("<h");
    ob.push_byte(b'0' + level as u8);
    if state.flags.toc {
        let id = super::toc::anchor_id(&state.toc_id_prefix, state.toc_state.header_count);
        state.toc_state.header_count += 1;
        ob.push_str(" id=\"");
        ob.push_str(&id);
        ob.push_byte(b'"');
    }
    ob.push_byte(b'>');
    if let Some(text) = text {
        ob.push_bytes(text);
    }
    ob.push_str("</h");
    ob.push_byte(b'0' + level as u8);
    ob.push_str(">\n");
}

fn hrule(ob: &mut Buffer, state: &mut RenderState) {
    if !ob.is_empty() {
        ob.push_byte(b'\n');
    }
    ob.push_str(if state.flags.xhtml { "<hr/>\n" } else { "<hr>\n" });
}

fn list(ob: &mut Buffer, text: Option<&[u8]>, ordered: bool, _state: &mut RenderState) {
    if !ob.is_empty() {
        ob.push_byte(b'\n');
    }
    let tag: &str = if ordered { "ol" } else { "ul" };
    ob.push_byte(b'<');
    ob.push_str(tag);
    ob.push_str(">\n");
    if let Some(text) = text {
        ob.push_bytes(text);
    }
    ob.push_str("</");
    ob.push_str(tag);
    ob.push_str(">\n");
}

fn list_item(ob: &mut Buffer, text: Option<&[u8]>, _state: &mut RenderState) {
    ob.push_str("<li>");
    if let Some(text) = text {
        let trimmed = trim_trailing_newline(text);
        ob.push_bytes(trimmed);
    }
    ob.push_str("</li>\n");
}

fn trim_trailing_newline(text: &[u8]) -> &[u8] {
    let mut end = text.len();
    while end > 0 && (text[end - 1] == b'\n' || text[end - 1] == b'\r') {
        end -= 1;
    }
    &text[..end]
}

fn paragraph(ob: &mut Buffer, text: Option<&[u8]>, _state: &mut RenderState) {
    if !ob.is_empty() {
        ob.push_byte(b'\n');
    }
    ob.push_str("<p>");
    if let Some(text) = text {
        ob.push_bytes(text);
    }
    ob.push_str("</p>\n");
}

fn table(ob: &mut Buffer, head: Option<&[u8]>, body: Option<&[u8]>, _state: &mut RenderState) {
    if !ob.is_empty() {
        ob.push_byte(b'\n');
    }
    ob.push_str("<table><thead>\n");
    if let Some(head) = head {
        ob.push_bytes(head);
    }
    ob.push_str("</thead><tbody>\n");
    if let Some(body) = body {
        ob.push_bytes(body);
    }
    ob.push_str("</tbody></table>\n");
}

fn table_row(ob: &mut Buffer, text: Option<&[u8]>, _state: &mut RenderState) {
    ob.push_str("<tr>\n");
    if let Some(text) = text {
        ob.push_bytes(text);
    }
    ob.push_str("</tr>\n");
}

fn table_cell(
    ob: &mut Buffer,
    text: Option<&[u8]>,
    is_header: bool,
    align: Align,
    col_span: u32,
    _state: &mut RenderState,
) {
    let tag = if is_header { "th" } else { "td" };
    ob.push_byte(b'<');
    ob.push_str(tag);
    match align {
        Align::Left => ob.push_str(" align=\"left\""),
        Align::Right => ob.push_str(" align=\"right\""),
        Align::Center => ob.push_str(" align=\"center\""),
        Align::None => {}
    }
    if col_span > 1 {
        ob.push_str(" colspan=\"");
        ob.push_str(&col_span.to_string());
        ob.push_byte(b'"');
    }
    ob.push_byte(b'>');
    if let Some(text) = text {
        ob.push_bytes(text);
    }
    ob.push_str("</");
    ob.push_str(tag);
    ob.push_str(">\n");
}

fn autolink(ob: &mut Buffer, link: &[u8], kind: AutolinkKind, state: &mut RenderState) -> bool {
    if state.flags.skip_links {
        escape_html(ob, link);
        return true;
    }
    let (href_prefix, display_prefix): (&[u8], &[u8]) = match kind {
        AutolinkKind::Url => (b"", b""),
        AutolinkKind::Www => (b"http://", b""),
        AutolinkKind::Email => (b"mailto:", b""),
        AutolinkKind::Subreddit | AutolinkKind::Username => (b"", b""),
    };
    if kind == AutolinkKind::Url && state.flags.safe_links_only && !is_safe(link) {
        escape_html(ob, link);
        return true;
    }
    ob.push_str("<a href=\"");
    escape_href(ob, href_prefix);
    escape_href(ob, link);
    ob.push_str("\">");
    escape_html(ob, display_prefix);
    escape_html(ob, link);
    ob.push_str("</a>");
    true
}

fn codespan(ob: &mut Buffer, text: &[u8], _state: &mut RenderState) -> bool {
    ob.push_str("<code>");
    escape_html(ob, text);
    ob.push_str("</code>");
    true
}

fn spoiler_span(ob: &mut Buffer, text: &[u8], _state: &mut RenderState) -> bool {
    ob.push_str("<span class=\"md-spoiler-text\">");
    ob.push_bytes(text);
    ob.push_str("</span>");
    true
}

fn double_emphasis(ob: &mut Buffer, text: &[u8], _state: &mut RenderState) -> bool {
    ob.push_str("<strong>");
    ob.push_bytes(text);
    ob.push_str("</strong>");
    true
}

fn emphasis(ob: &mut Buffer, text: &[u8], _state: &mut RenderState) -> bool {
    ob.push_str("<em>");
    ob.push_bytes(text);
    ob.push_str("</em>");
    true
}

fn triple_emphasis(ob: &mut Buffer, text: &[u8], _state: &mut RenderState) -> bool {
    ob.push_str("<strong><em>");
    ob.push_bytes(text);
    ob.push_str("</em></strong>");
    true
}

fn strikethrough(ob: &mut Buffer, text: &[u8], _state: &mut RenderState) -> bool {
    ob.push_str("<del>");
    ob.push_bytes(text);
    ob.push_str("</del>");
    true
}

fn superscript(ob: &mut Buffer, text: &[u8], _state: &mut RenderState) -> bool {
    ob.push_str("<sup>");
    ob.push_bytes(text);
    ob.push_str("</sup>");
    true
}

fn image(ob: &mut Buffer, link: &[u8], title: Option<&[u8]>, alt: &[u8], state: &mut RenderState) -> bool {
    if state.flags.skip_images {
        return false;
    }
    if state.flags.safe_links_only && !is_safe(link) {
        return false;
    }
    ob.push_str("<img src=\"");
    escape_href(ob, link);
    ob.push_str("\" alt=\"");
    escape_html(ob, alt);
    ob.push_byte(b'"');
    if let Some(title) = title {
        ob.push_str(" title=\"");
        escape_html(ob, title);
        ob.push_byte(b'"');
    }
    ob.push_str(if state.flags.xhtml { "/>" } else { ">" });
    true
}

fn line_break(ob: &mut Buffer, state: &mut RenderState) -> bool {
    ob.push_str(if state.flags.xhtml { "<br/>\n" } else { "<br>\n" });
    true
}

fn link(ob: &mut Buffer, href: Option<&[u8]>, title: Option<&[u8]>, content: &[u8], state: &mut RenderState) -> bool {
    if state.flags.skip_links {
        ob.push_bytes(content);
        return true;
    }
    let href = match href {
        Some(h) => h,
        None => {
            ob.push_bytes(content);
            return true;
        }
    };
    if state.flags.safe_links_only && !is_safe(href) {
        ob.push_bytes(content);
        return true;
    }
    ob.push_str("<a href=\"");
    escape_href(ob, href);
    ob.push_byte(b'"');
    if let Some(title) = title {
        ob.push_str(" title=\"");
        escape_html(ob, title);
        ob.push_byte(b'"');
    }
    link_attributes_nofollow_target(ob, href, state);
    ob.push_str(">");
    ob.push_bytes(content);
    ob.push_str("</a>");
    true
}

/// Appends `rel="nofollow"` / `target="<value>"` when the active render's
/// options ask for them. Kept as a free function (rather than inlined
/// twice) since both the reference-link path and the bare-autolink path
/// for ordinary `http(s)` URLs share it.
pub fn link_attributes_nofollow_target(ob: &mut Buffer, _href: &[u8], state: &RenderState) {
    if state.nofollow {
        ob.push_str(" rel=\"nofollow\"");
    }
    if let Some(target) = &state.target {
        ob.push_str(" target=\"");
        escape_html(ob, target.as_bytes());
        ob.push_byte(b'"');
    }
}

fn raw_html_inline(ob: &mut Buffer, text: &[u8], state: &mut RenderState) -> bool {
    if state.flags.skip_html {
        escape_html(ob, text);
    } else {
        ob.push_bytes(text);
    }
    true
}

/// Wiki mode's `raw_html_inline`: the tag passes through only if the
/// element/attribute whitelist accepts it, otherwise it is escaped like
/// any other text.
fn raw_html_inline_whitelisted(ob: &mut Buffer, text: &[u8], state: &mut RenderState) -> bool {
    match super::filter_raw_html(text, &state.element_whitelist, &state.attr_whitelist) {
        Some(rewritten) => ob.push_bytes(&rewritten),
        None => escape_html(ob, text),
    }
    true
}

/// Wiki mode's `raw_block`: same whitelist gating as
/// [`raw_html_inline_whitelisted`], applied tag-by-tag to a block of raw
/// HTML rather than a single inline tag.
fn raw_block_whitelisted(ob: &mut Buffer, text: Option<&[u8]>, state: &mut RenderState) {
    let text = match text {
        Some(t) => t,
        None => return,
    };
    let mut i = 0;
    while i < text.len() {
        match text[i..].iter().position(|&b| b == b'<') {
            Some(rel) => {
                let start = i + rel;
                escape_html(ob, &text[i..start]);
                match text[start..].iter().position(|&b| b == b'>') {
                    Some(rel_end) => {
                        let tag = &text[start..start + rel_end + 1];
                        match super::filter_raw_html(tag, &state.element_whitelist, &state.attr_whitelist) {
                            Some(rewritten) => ob.push_bytes(&rewritten),
                            None => escape_html(ob, tag),
                        }
                        i = start + rel_end + 1;
                    }
                    None => {
                        escape_html(ob, &text[start..]);
                        i = text.len();
                    }
                }
            }
            None => {
                escape_html(ob, &text[i..]);
                i = text.len();
            }
        }
    }
}

/// Builds the whitelisted variant of the default callback table, used by
/// wiki mode: every callback is shared with [`html_callbacks`] except the
/// two raw-HTML hooks.
pub fn wiki_html_callbacks() -> Callbacks {
    Callbacks {
        raw_html_inline: Some(raw_html_inline_whitelisted),
        raw_block: Some(raw_block_whitelisted),
        ..html_callbacks()
    }
}

fn entity(ob: &mut Buffer, text: &[u8], _state: &mut RenderState) {
    ob.push_bytes(text);
}

fn normal_text(ob: &mut Buffer, text: &[u8], _state: &mut RenderState) {
    escape_html(ob, text);
}

/// The full callback set used by `usertext` and `usertext-without-links`
/// (the latter built from this plus `link`/`autolink`/`image` suppressed
/// by a mode's render flags, not a different table).
pub fn html_callbacks() -> Callbacks {
    Callbacks {
        block_code: Some(block_code),
        block_quote: Some(block_quote),
        block_spoiler: Some(block_spoiler),
        raw_block: Some(raw_block),
        header: Some(header),
        hrule: Some(hrule),
        list: Some(list),
        list_item: Some(list_item),
        paragraph: Some(paragraph),
        table: Some(table),
        table_row: Some(table_row),
        table_cell: Some(table_cell),

        autolink: Some(autolink),
        codespan: Some(codespan),
        spoiler_span: Some(spoiler_span),
        double_emphasis: Some(double_emphasis),
        emphasis: Some(emphasis),
        image: Some(image),
        line_break: Some(line_break),
        link: Some(link),
        raw_html_inline: Some(raw_html_inline),
        triple_emphasis: Some(triple_emphasis),
        strikethrough: Some(strikethrough),
        superscript: Some(superscript),

        entity: Some(entity),
        normal_text: Some(normal_text),

        pre_document: None,
        post_document: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderFlags;

    fn state() -> RenderState {
        RenderState::new(RenderFlags::default())
    }

    #[test]
    fn block_code_adds_language_class_from_all_tokens() {
        let mut ob = Buffer::new();
        block_code(&mut ob, Some(b"let x = 1;"), Some(b"rust ignore"), &mut state());
        assert_eq!(ob.into_string_lossy(), "<pre><code class=\"md-code-language-rust ignore\">let x = 1;</code></pre>\n");
    }

    #[test]
    fn block_code_strips_leading_dot_from_every_token() {
        let mut ob = Buffer::new();
        block_code(&mut ob, Some(b"x"), Some(b".py .extra"), &mut state());
        assert_eq!(ob.into_string_lossy(), "<pre><code class=\"md-code-language-py extra\">x</code></pre>\n");
    }

    #[test]
    fn autolink_rejects_unsafe_scheme_by_escaping() {
        let mut ob = Buffer::new();
        autolink(&mut ob, b"javascript:alert(1)", AutolinkKind::Url, &mut state());
        assert!(!ob.into_string_lossy().contains("<a"));
    }

    #[test]
    fn link_falls_back_to_content_when_unsafe() {
        let mut ob = Buffer::new();
        link(&mut ob, Some(b"javascript:alert(1)"), None, b"click me", &mut state());
        assert_eq!(ob.into_string_lossy(), "click me");
    }

    #[test]
    fn raw_block_escapes_rather_than_drops_when_skip_html_is_set() {
        let mut ob = Buffer::new();
        let mut st = state();
        st.flags.skip_html = true;
        raw_block(&mut ob, Some(b"<div>hi</div>\n"), &mut st);
        assert_eq!(ob.into_string_lossy(), "&lt;div&gt;hi&lt;/div&gt;\n");
    }

    #[test]
    fn nofollow_and_target_appended_when_set() {
        let mut ob = Buffer::new();
        let mut st = state();
        st.nofollow = true;
        st.target = Some("_blank".to_string());
        link_attributes_nofollow_target(&mut ob, b"https://example.com", &st);
        assert_eq!(ob.into_string_lossy(), " rel=\"nofollow\" target=\"_blank\"");
    }
}
