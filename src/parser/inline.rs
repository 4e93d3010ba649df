//! Phase C: inline scanning.
//!
//! A single pass over a block's text, byte by byte, with a dispatch on
//! the current byte rather than a grammar of inline productions: most
//! bytes are just accumulated into a pending plain-text run, and only a
//! small set of trigger bytes (`` ` *_~^[!<&\> `` plus the autolink
//! triggers `: @ / w`) ever interrupt that run to attempt a construct. A
//! construct attempt that fails falls back to treating the trigger byte
//! as ordinary text and advancing by one.
//!
//! Inline spoilers (`>!hidden text!<`) mirror the block-level `>!`
//! spoiler's own delimiter rather than inventing a new one, closed by the
//! matching `!<`.
//!
//! Autolink recognizers can match bytes *before* the trigger position (a
//! scheme's letters before the `:` of `://`, the `r`/`u` before a
//! reddit-link `/`). `AutolinkMatch::rewind` reports how many of those
//! already-pending bytes belong to the match, so the loop un-flushes
//! them before handing the whole span to the `autolink` callback instead
//! of emitting them twice.

use crate::autolink::{self, AutolinkKind, AutolinkMatch};
use crate::buffer::Buffer;
use crate::render::RenderState;

use super::Parser;

pub(crate) fn render_inline(parser: &Parser, data: &[u8], ob: &mut Buffer, state: &mut RenderState) {
    let mut i = 0;
    let mut pending_start = 0;
    let n = data.len();

    while i < n {
        let b = data[i];

        if b == b'\\' {
            if let Some(next) = data.get(i + 1).copied() {
                if next.is_ascii_punctuation() {
                    flush(parser, data, pending_start, i, ob, state);
                    emit_normal_text(parser, &data[i + 1..i + 2], ob, state);
                    i += 2;
                    pending_start = i;
                    continue;
                }
            }
            i += 1;
            continue;
        }

        let autolink_hit = match b {
            b':' if data[i..].starts_with(b"://") => autolink::recognize_url(data, i, false),
            b'w' => autolink::recognize_www(data, i),
            b'@' => autolink::recognize_email(data, i),
            b'/' if i > 0 && data[i - 1] == b'r' => autolink::recognize_subreddit(data, i),
            b'/' if i > 0 && data[i - 1] == b'u' => autolink::recognize_username(data, i),
            _ => None,
        };
        if let Some(m) = autolink_hit {
            let flush_end = i - m.rewind;
            if let Some(f) = parser.callbacks.autolink {
                flush(parser, data, pending_start, flush_end, ob, state);
                if f(ob, &m.link, m.kind, state) {
                    i = i + m.consumed;
                    pending_start = i;
                    continue;
                }
            }
            i += 1;
            continue;
        }

        let consumed = match b {
            b'`' => scan_codespan(parser, data, i, ob, state),
            b'*' | b'_' => scan_emphasis(parser, data, i, ob, state),
            b'~' => scan_strikethrough(parser, data, i, ob, state),
            b'^' => scan_superscript(parser, data, i, ob, state),
            b'[' => scan_link(parser, data, i, false, ob, state),
            b'!' if data.get(i + 1) == Some(&b'[') => scan_link(parser, data, i + 1, true, ob, state).map(|c| c + 1),
            b'>' if data.get(i + 1) == Some(&b'!') => scan_spoiler_span(parser, data, i, ob, state),
            b'<' => scan_angle(parser, data, i, ob, state),
            b'&' => scan_entity(parser, data, i, ob, state),
            b'\n' => scan_linebreak(parser, ob, state),
            _ => None,
        };

        match consumed {
            Some(used) => {
                log::trace!("inline dispatch: trigger {:?} matched, {used} bytes consumed", b as char);
                flush(parser, data, pending_start, i, ob, state);
                i += used.max(1);
                pending_start = i;
            }
            None => i += 1,
        }
    }

    flush(parser, data, pending_start, n, ob, state);
}

fn flush(parser: &Parser, data: &[u8], start: usize, end: usize, ob: &mut Buffer, state: &mut RenderState) {
    if end > start {
        emit_normal_text(parser, &data[start..end], ob, state);
    }
}

fn emit_normal_text(parser: &Parser, text: &[u8], ob: &mut Buffer, state: &mut RenderState) {
    match parser.callbacks.normal_text {
        Some(f) => f(ob, text, state),
        None => ob.push_bytes(text),
    }
}

fn scan_codespan(parser: &Parser, data: &[u8], i: usize, ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let run = run_length(data, i, b'`');
    let open_end = i + run;
    let mut j = open_end;
    while j + run <= data.len() {
        if data[j..j + run] == data[i..open_end] && (j + run == data.len() || data[j + run] != b'`') {
            let mut content = &data[open_end..j];
            if content.len() >= 2 && content[0] == b' ' && content[content.len() - 1] == b' ' {
                content = &content[1..content.len() - 1];
            }
            let f = parser.callbacks.codespan?;
            return if f(ob, content, state) { Some(j + run - i) } else { None };
        }
        j += 1;
    }
    None
}

fn run_length(data: &[u8], i: usize, byte: u8) -> usize {
    let mut n = 0;
    while data.get(i + n) == Some(&byte) {
        n += 1;
    }
    n
}

fn scan_emphasis(parser: &Parser, data: &[u8], i: usize, ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let ch = data[i];
    let run = run_length(data, i, ch).min(3);
    if run == 0 {
        return None;
    }
    let after_open = data.get(i + run).copied();
    if after_open.map_or(true, |c| (c as char).is_whitespace()) {
        return None;
    }

    let mut j = i + run;
    while j < data.len() {
        if data[j] == ch {
            let close_run = run_length(data, j, ch);
            if close_run >= run {
                let before_close = data[j - 1];
                if (before_close as char).is_whitespace() {
                    j += close_run;
                    continue;
                }
                if ch == b'_' && data.get(j + run).map_or(false, |c| c.is_ascii_alphanumeric()) {
                    j += close_run;
                    continue;
                }
                let content = &data[i + run..j];
                let mut inner = parser.pool.acquire();
                render_inline(parser, content, &mut inner, state);
                let cb = match run {
                    3 => parser.callbacks.triple_emphasis,
                    2 => parser.callbacks.double_emphasis,
                    _ => parser.callbacks.emphasis,
                };
                let f = cb?;
                return if f(ob, inner.as_bytes(), state) { Some(j + run - i) } else { None };
            }
        }
        j += 1;
    }
    None
}

fn scan_strikethrough(parser: &Parser, data: &[u8], i: usize, ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    if data.get(i + 1) != Some(&b'~') {
        return None;
    }
    let mut j = i + 2;
    while j + 1 < data.len() {
        if data[j] == b'~' && data[j + 1] == b'~' {
            let content = &data[i + 2..j];
            if content.is_empty() {
                return None;
            }
            let mut inner = parser.pool.acquire();
            render_inline(parser, content, &mut inner, state);
            let f = parser.callbacks.strikethrough?;
            return if f(ob, inner.as_bytes(), state) { Some(j + 2 - i) } else { None };
        }
        j += 1;
    }
    None
}

/// `>!hidden text!<`, closed by the first `!<` that follows. Empty bodies
/// (`>!!<`) don't match, matching the other zero-width-content rejections
/// in this file (e.g. strikethrough's `~~~~`).
fn scan_spoiler_span(parser: &Parser, data: &[u8], i: usize, ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let content_start = i + 2;
    let mut j = content_start;
    while j + 1 < data.len() {
        if data[j] == b'!' && data[j + 1] == b'<' {
            let content = &data[content_start..j];
            if content.is_empty() {
                return None;
            }
            let mut inner = parser.pool.acquire();
            render_inline(parser, content, &mut inner, state);
            let f = parser.callbacks.spoiler_span?;
            return if f(ob, inner.as_bytes(), state) { Some(j + 2 - i) } else { None };
        }
        j += 1;
    }
    None
}

fn scan_superscript(parser: &Parser, data: &[u8], i: usize, ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let rest = &data[i + 1..];
    let (content, total) = if rest.first() == Some(&b'(') {
        let close = rest.iter().position(|&b| b == b')')?;
        (&rest[1..close], close + 2)
    } else {
        let end = rest.iter().position(|&b| (b as char).is_whitespace()).unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        (&rest[..end], end + 1)
    };
    let mut inner = parser.pool.acquire();
    render_inline(parser, content, &mut inner, state);
    let f = parser.callbacks.superscript?;
    if f(ob, inner.as_bytes(), state) {
        Some(total)
    } else {
        None
    }
}

fn scan_entity(parser: &Parser, data: &[u8], i: usize, ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let rest = &data[i..];
    let scan_window = &rest[..rest.len().min(32)];
    let semi = scan_window.iter().position(|&b| b == b';')?;
    if semi < 2 {
        return None;
    }
    let body = &rest[1..semi];
    let valid = if body[0] == b'#' {
        let digits = &body[1..];
        !digits.is_empty()
            && (digits.iter().all(|b| b.is_ascii_digit())
                || (digits[0] == b'x' && digits.len() > 1 && digits[1..].iter().all(|b| b.is_ascii_hexdigit())))
    } else {
        !body.is_empty() && body.iter().all(|b| b.is_ascii_alphanumeric())
    };
    if !valid {
        return None;
    }
    let text = &rest[..=semi];
    let f = parser.callbacks.entity?;
    f(ob, text, state);
    Some(text.len())
}

fn scan_linebreak(parser: &Parser, ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    if !state.flags.hard_wrap {
        return None;
    }
    let f = parser.callbacks.line_break?;
    if f(ob, state) {
        Some(1)
    } else {
        None
    }
}

fn scan_angle(parser: &Parser, data: &[u8], i: usize, ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let close = data[i..].iter().position(|&b| b == b'>')?;
    let tag = &data[i..=i + close];
    let inner = &data[i + 1..i + close];

    if let Some(kind) = classify_bracket_autolink(inner) {
        let f = parser.callbacks.autolink?;
        return if f(ob, inner, kind, state) { Some(close + 1) } else { None };
    }

    if looks_like_tag(inner) {
        let f = parser.callbacks.raw_html_inline?;
        if f(ob, tag, state) {
            return Some(close + 1);
        }
    }
    None
}

fn classify_bracket_autolink(inner: &[u8]) -> Option<AutolinkKind> {
    if inner.is_empty() || inner.iter().any(|b| (*b as char).is_whitespace()) {
        return None;
    }
    if inner.windows(3).any(|w| w == b"://") {
        return Some(AutolinkKind::Url);
    }
    if inner.contains(&b'@') && inner.contains(&b'.') {
        return Some(AutolinkKind::Email);
    }
    None
}

fn looks_like_tag(inner: &[u8]) -> bool {
    let inner = inner.strip_prefix(b"/").unwrap_or(inner);
    inner.first().map_or(false, |b| b.is_ascii_alphabetic())
}

fn scan_link(parser: &Parser, data: &[u8], i: usize, is_image: bool, ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let close = find_matching_bracket(data, i)?;
    let label_text = &data[i + 1..close];
    let mut cursor = close + 1;

    let (href, title, label_consumed_extra) = if data.get(cursor) == Some(&b'(') {
        let (href, title, used) = parse_inline_destination(&data[cursor..])?;
        (Some(href), title, used)
    } else if data.get(cursor) == Some(&b'[') {
        let ref_close = find_matching_bracket(data, cursor)?;
        let raw_label = &data[cursor + 1..ref_close];
        let label = if raw_label.is_empty() { label_text } else { raw_label };
        let key = super::refs::normalize_label(label);
        match parser.refmap.get(&key) {
            Some(r) => (Some(r.href.clone().into_bytes()), r.title.clone(), ref_close + 1 - cursor),
            None => return None,
        }
    } else {
        let key = super::refs::normalize_label(label_text);
        match parser.refmap.get(&key) {
            Some(r) => (Some(r.href.clone().into_bytes()), r.title.clone(), 0),
            None => return None,
        }
    };
    cursor += label_consumed_extra;
    let href = href?;

    if is_image {
        let f = parser.callbacks.image?;
        if !f(ob, &href, title.as_deref().map(str::as_bytes), label_text, state) {
            return None;
        }
    } else {
        let mut inner = parser.pool.acquire();
        render_inline(parser, label_text, &mut inner, state);
        let f = parser.callbacks.link?;
        if !f(ob, Some(&href), title.as_deref().map(str::as_bytes), inner.as_bytes(), state) {
            return None;
        }
    }
    Some(cursor - i)
}

fn find_matching_bracket(data: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut j = open;
    while j < data.len() {
        match data[j] {
            b'\\' => j += 1,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
        j += 1;
    }
    None
}

/// Parses `(dest "title")` starting at `rest[0] == '('`. Returns the
/// destination, optional title, and the number of bytes consumed
/// including both parens.
fn parse_inline_destination(rest: &[u8]) -> Option<(Vec<u8>, Option<String>, usize)> {
    let mut j = 1;
    while rest.get(j) == Some(&b' ') {
        j += 1;
    }
    let dest_start = j;
    if rest.get(j) == Some(&b'<') {
        j += 1;
        let dest_start_inner = j;
        while rest.get(j).map_or(false, |&b| b != b'>') {
            j += 1;
        }
        let dest = rest[dest_start_inner..j].to_vec();
        j += 1;
        return finish_destination(rest, j, dest);
    }
    while rest.get(j).map_or(false, |&b| b != b' ' && b != b')') {
        j += 1;
    }
    let dest = rest[dest_start..j].to_vec();
    finish_destination(rest, j, dest)
}

fn finish_destination(rest: &[u8], mut j: usize, dest: Vec<u8>) -> Option<(Vec<u8>, Option<String>, usize)> {
    while rest.get(j) == Some(&b' ') {
        j += 1;
    }
    let mut title = None;
    if matches!(rest.get(j), Some(&b'"') | Some(&b'\'')) {
        let quote = rest[j];
        j += 1;
        let title_start = j;
        while rest.get(j).map_or(false, |&b| b != quote) {
            j += 1;
        }
        title = Some(String::from_utf8_lossy(&rest[title_start..j]).into_owned());
        j += 1;
    }
    while rest.get(j) == Some(&b' ') {
        j += 1;
    }
    if rest.get(j) != Some(&b')') {
        return None;
    }
    j += 1;
    Some((dest, title, j))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{html_callbacks, RenderFlags};

    fn render(text: &[u8]) -> String {
        let callbacks = html_callbacks();
        let parser = Parser::for_test(&callbacks);
        let mut state = RenderState::new(RenderFlags::default());
        let mut ob = Buffer::new();
        render_inline(&parser, text, &mut ob, &mut state);
        ob.into_string_lossy()
    }

    #[test]
    fn plain_text_is_escaped() {
        assert_eq!(render(b"a < b"), "a &lt; b");
    }

    #[test]
    fn emphasis_wraps_em() {
        assert_eq!(render(b"*hi*"), "<em>hi</em>");
    }

    #[test]
    fn strong_wraps_strong() {
        assert_eq!(render(b"**hi**"), "<strong>hi</strong>");
    }

    #[test]
    fn underscore_emphasis_rejects_intraword() {
        assert_eq!(render(b"foo_bar_baz"), "foo_bar_baz");
    }

    #[test]
    fn codespan_is_literal() {
        assert_eq!(render(b"`<a>`"), "<code>&lt;a&gt;</code>");
    }

    #[test]
    fn bare_url_autolinks() {
        assert_eq!(render(b"see http://example.com now"), "see <a href=\"http://example.com\">http://example.com</a> now");
    }

    #[test]
    fn subreddit_trigger_autolinks() {
        assert_eq!(render(b"visit /r/rust today"), "visit <a href=\"/r/rust\">/r/rust</a> today");
    }

    #[test]
    fn escaped_punctuation_is_literal() {
        assert_eq!(render(br"\*not emphasis\*"), "*not emphasis*");
    }

    #[test]
    fn unmatched_emphasis_marker_is_literal() {
        assert_eq!(render(b"2 * 3 = 6"), "2 * 3 = 6");
    }

    #[test]
    fn spoiler_span_wraps_in_span() {
        assert_eq!(render(b"it was >!Snape!< all along"), "it was <span class=\"md-spoiler-text\">Snape</span> all along");
    }

    #[test]
    fn empty_spoiler_span_is_literal() {
        assert_eq!(render(b">!!<"), "&gt;!!&lt;");
    }

    #[test]
    fn unterminated_spoiler_span_is_literal() {
        assert_eq!(render(b">!never closes"), "&gt;!never closes");
    }
}
