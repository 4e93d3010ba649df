//! Phase B: block decomposition.
//!
//! Walks the document line by line, trying each block construct in a
//! fixed precedence order at the start of every remaining chunk: fenced
//! code, ATX header, setext header, thematic break, indented code,
//! raw HTML block, blockquote, spoiler block, list, table, and finally
//! paragraph as the catch-all. Each construct recognizes its own extent,
//! recurses into [`super::inline::render_inline`] (or, for quotes/lists,
//! back into `parse_blocks` itself) for its content, and returns how many
//! bytes of `data` it consumed so the caller can continue from there.

use crate::buffer::Buffer;
use crate::callbacks::Align;
use crate::render::RenderState;

use super::Parser;

const BLOCK_HTML_TAGS: &[&str] = &[
    "div", "p", "table", "blockquote", "pre", "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6",
    "hr", "center", "form", "iframe", "dl",
];

pub(crate) fn parse_blocks(parser: &Parser, data: &[u8], depth: usize, ob: &mut Buffer, state: &mut RenderState) {
    if depth > parser.max_nesting {
        log::warn!("nesting cap ({}) hit at depth {depth}, flushing remainder as raw text", parser.max_nesting);
        return;
    }
    let mut i = 0;
    let n = data.len();
    while i < n {
        let rest = &data[i..];
        if is_blank_line(rest) {
            i += line_len(rest) + 1;
            continue;
        }
        if let Some(used) = try_reference_definition(rest) {
            i += used;
            continue;
        }
        if let Some(used) = try_fenced_code(parser, rest, ob, state) {
            log::trace!("block recognizer matched: fenced code ({used} bytes)");
            i += used;
            continue;
        }
        if let Some(used) = try_atx_header(parser, rest, ob, state) {
            log::trace!("block recognizer matched: atx header ({used} bytes)");
            i += used;
            continue;
        }
        if let Some(used) = try_hrule(parser, rest, ob, state) {
            log::trace!("block recognizer matched: hrule ({used} bytes)");
            i += used;
            continue;
        }
        if let Some(used) = try_indented_code(parser, rest, ob, state) {
            log::trace!("block recognizer matched: indented code ({used} bytes)");
            i += used;
            continue;
        }
        if let Some(used) = try_html_block(parser, rest, ob, state) {
            log::trace!("block recognizer matched: html block ({used} bytes)");
            i += used;
            continue;
        }
        if let Some(used) = try_blockquote(parser, rest, depth, ob, state) {
            log::trace!("block recognizer matched: blockquote ({used} bytes)");
            i += used;
            continue;
        }
        if let Some(used) = try_spoiler_block(parser, rest, depth, ob, state) {
            log::trace!("block recognizer matched: spoiler block ({used} bytes)");
            i += used;
            continue;
        }
        if let Some(used) = try_list(parser, rest, depth, ob, state) {
            log::trace!("block recognizer matched: list ({used} bytes)");
            i += used;
            continue;
        }
        if let Some(used) = try_table(parser, rest, ob, state) {
            log::trace!("block recognizer matched: table ({used} bytes)");
            i += used;
            continue;
        }
        let (used, setext_level) = paragraph_extent(rest);
        if let Some(level) = setext_level {
            log::trace!("block recognizer matched: setext header ({used} bytes)");
            emit_header(parser, trim(&rest[..line_len(rest)]), level, ob, state);
        } else {
            log::trace!("block recognizer matched: paragraph ({used} bytes)");
            emit_paragraph(parser, trim(&rest[..used]), ob, state);
        }
        i += used;
    }
}

fn line_len(data: &[u8]) -> usize {
    data.iter().position(|&b| b == b'\n').unwrap_or(data.len())
}

fn is_blank_line(data: &[u8]) -> bool {
    let line = &data[..line_len(data)];
    line.iter().all(|&b| b == b' ' || b == b'\t' || b == b'\r')
}

fn trim(data: &[u8]) -> &[u8] {
    let start = data.iter().position(|&b| !b.is_ascii_whitespace()).unwrap_or(data.len());
    let end = data.iter().rposition(|&b| !b.is_ascii_whitespace()).map(|p| p + 1).unwrap_or(start);
    &data[start..end]
}

fn leading_spaces(data: &[u8]) -> usize {
    data.iter().take_while(|&&b| b == b' ').count()
}

fn try_reference_definition(data: &[u8]) -> Option<usize> {
    let line = &data[..line_len(data)];
    let trimmed_start = leading_spaces(line);
    if trimmed_start >= 4 || line.get(trimmed_start) != Some(&b'[') {
        return None;
    }
    // The actual collection happened in the refs prepass; here we just
    // need to recognize and skip a well-formed definition line so it
    // doesn't fall through to paragraph handling.
    let rest = &line[trimmed_start..];
    let close = rest.iter().position(|&b| b == b']')?;
    if rest.get(close + 1) != Some(&b':') {
        return None;
    }
    Some(line_len(data) + 1)
}

fn try_atx_header(parser: &Parser, data: &[u8], ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let line = &data[..line_len(data)];
    let indent = leading_spaces(line);
    if indent >= 4 {
        return None;
    }
    let line = &line[indent..];
    let level = line.iter().take_while(|&&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    if line.get(level).map_or(false, |&b| b != b' ' && b != b'\t') {
        return None;
    }
    let mut text = trim(&line[level..]);
    while text.last() == Some(&b'#') {
        text = &text[..text.len() - 1];
    }
    text = trim(text);
    emit_header(parser, text, level as u32, ob, state);
    Some(line_len(data) + 1)
}

fn try_hrule(parser: &Parser, data: &[u8], ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let line = trim(&data[..line_len(data)]);
    if line.len() < 3 {
        return None;
    }
    let ch = line[0];
    if !matches!(ch, b'-' | b'*' | b'_') {
        return None;
    }
    let mut count = 0;
    for &b in line {
        if b == ch {
            count += 1;
        } else if b != b' ' {
            return None;
        }
    }
    if count < 3 {
        return None;
    }
    if let Some(f) = parser.callbacks.hrule {
        f(ob, state);
    }
    Some(line_len(data) + 1)
}

fn try_fenced_code(parser: &Parser, data: &[u8], ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let first_line_len = line_len(data);
    let line = &data[..first_line_len];
    let indent = leading_spaces(line);
    if indent >= 4 {
        return None;
    }
    let line = &line[indent..];
    let fence_char = *line.first()?;
    if fence_char != b'`' && fence_char != b'~' {
        return None;
    }
    let fence_len = line.iter().take_while(|&&b| b == fence_char).count();
    if fence_len < 3 {
        return None;
    }
    let lang = trim(&line[fence_len..]);
    let lang = if lang.is_empty() { None } else { Some(lang) };

    let mut cursor = first_line_len + 1;
    let content_start = cursor;
    let mut content_end = data.len();
    let mut total_consumed = data.len();
    while cursor <= data.len() {
        let rest = &data[cursor..];
        let l = line_len(rest);
        let candidate = trim(&rest[..l]);
        if candidate.len() >= fence_len && candidate.iter().all(|&b| b == fence_char) {
            content_end = cursor.saturating_sub(1).max(content_start);
            if cursor == content_start {
                content_end = content_start;
            } else {
                content_end = cursor - 1;
            }
            total_consumed = cursor + l + 1;
            break;
        }
        if cursor + l >= data.len() {
            break;
        }
        cursor += l + 1;
    }

    let content = &data[content_start..content_end.min(data.len())];
    if let Some(f) = parser.callbacks.block_code {
        f(ob, Some(content), lang, state);
    }
    Some(total_consumed)
}

fn try_indented_code(parser: &Parser, data: &[u8], ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    if leading_spaces(data) < 4 {
        return None;
    }
    let mut cursor = 0;
    let mut content = Vec::new();
    loop {
        let rest = &data[cursor..];
        let l = line_len(rest);
        let line = &rest[..l];
        if is_blank_line(line) {
            // A run of blank lines inside an indented block is kept only
            // if another indented line follows; otherwise it ends the
            // block here.
            let after = cursor + l + 1;
            if after >= data.len() || leading_spaces(&data[after..]) < 4 {
                break;
            }
            content.push(b'\n');
            cursor = after;
            continue;
        }
        if leading_spaces(line) < 4 {
            break;
        }
        content.extend_from_slice(&line[4..]);
        content.push(b'\n');
        cursor += l + 1;
        if cursor >= data.len() {
            break;
        }
    }
    if let Some(f) = parser.callbacks.block_code {
        f(ob, Some(&content), None, state);
    }
    Some(cursor)
}

fn try_html_block(parser: &Parser, data: &[u8], ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let line = &data[..line_len(data)];
    let indent = leading_spaces(line);
    if indent >= 4 || line.get(indent) != Some(&b'<') {
        return None;
    }
    let rest = &line[indent + 1..];
    let rest = rest.strip_prefix(b"/").unwrap_or(rest);
    let name_end = rest.iter().position(|&b| !b.is_ascii_alphanumeric()).unwrap_or(rest.len());
    let name = std::str::from_utf8(&rest[..name_end]).ok()?.to_ascii_lowercase();
    if !BLOCK_HTML_TAGS.contains(&name.as_str()) {
        return None;
    }

    let mut cursor = 0;
    loop {
        let l = line_len(&data[cursor..]);
        cursor += l + 1;
        if cursor >= data.len() || is_blank_line(&data[cursor..]) {
            break;
        }
    }
    let content = &data[..cursor.min(data.len())];
    if let Some(f) = parser.callbacks.raw_block {
        f(ob, Some(content), state);
    }
    Some(cursor)
}

fn try_blockquote(parser: &Parser, data: &[u8], depth: usize, ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let line = &data[..line_len(data)];
    if leading_spaces(line) >= 4 || line.get(leading_spaces(line)) != Some(&b'>') {
        return None;
    }
    // A `>!` line belongs to the spoiler-block construct, not a quote.
    if line.get(leading_spaces(line) + 1) == Some(&b'!') {
        return None;
    }

    let mut cursor = 0;
    let mut inner = Vec::new();
    loop {
        let rest = &data[cursor..];
        let l = line_len(rest);
        let line = &rest[..l];
        let indent = leading_spaces(line);
        if indent < 4 && line.get(indent) == Some(&b'>') {
            let mut start = indent + 1;
            if line.get(start) == Some(&b' ') {
                start += 1;
            }
            inner.extend_from_slice(&line[start..]);
            inner.push(b'\n');
            cursor += l + 1;
        } else if is_blank_line(line) {
            inner.push(b'\n');
            cursor += l + 1;
            let next = &data[cursor..];
            if next.is_empty() || leading_spaces(next) >= 4 || next.first() != Some(&b'>') {
                break;
            }
        } else {
            break;
        }
        if cursor >= data.len() {
            break;
        }
    }

    let mut body = parser.pool.acquire();
    parse_blocks(parser, &inner, depth + 1, &mut body, state);
    if let Some(f) = parser.callbacks.block_quote {
        f(ob, Some(body.as_bytes()), state);
    }
    Some(cursor)
}

fn try_spoiler_block(parser: &Parser, data: &[u8], depth: usize, ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let line = &data[..line_len(data)];
    let indent = leading_spaces(line);
    if indent >= 4 || line.get(indent) != Some(&b'>') || line.get(indent + 1) != Some(&b'!') {
        return None;
    }

    let mut cursor = 0;
    let mut inner = Vec::new();
    loop {
        let rest = &data[cursor..];
        let l = line_len(rest);
        let line = &rest[..l];
        let indent = leading_spaces(line);
        if indent < 4 && line.get(indent) == Some(&b'>') && line.get(indent + 1) == Some(&b'!') {
            let mut start = indent + 2;
            if line.get(start) == Some(&b' ') {
                start += 1;
            }
            inner.extend_from_slice(&line[start..]);
            inner.push(b'\n');
            cursor += l + 1;
        } else {
            break;
        }
        if cursor >= data.len() {
            break;
        }
    }

    let mut body = parser.pool.acquire();
    parse_blocks(parser, &inner, depth + 1, &mut body, state);
    if let Some(f) = parser.callbacks.block_spoiler {
        f(ob, Some(body.as_bytes()), state);
    }
    Some(cursor)
}

fn try_list(parser: &Parser, data: &[u8], depth: usize, ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let line = &data[..line_len(data)];
    let indent = leading_spaces(line);
    if indent >= 4 {
        return None;
    }
    let marker = &line[indent..];
    let ordered = marker.first().map_or(false, |b| b.is_ascii_digit());
    let bullet_len = if ordered {
        let digits = marker.iter().take_while(|b| b.is_ascii_digit()).count();
        if marker.get(digits) != Some(&b'.') && marker.get(digits) != Some(&b')') {
            return None;
        }
        digits + 1
    } else {
        if !matches!(marker.first(), Some(&b'-') | Some(&b'*') | Some(&b'+')) {
            return None;
        }
        1
    };
    if marker.get(bullet_len) != Some(&b' ') {
        return None;
    }

    let mut cursor = 0;
    let mut items: Vec<Vec<u8>> = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut in_item = false;

    loop {
        if cursor >= data.len() {
            break;
        }
        let rest = &data[cursor..];
        let l = line_len(rest);
        let line = &rest[..l];
        let line_indent = leading_spaces(line);

        let starts_item = line_indent < 4 && {
            let m = &line[line_indent..];
            if ordered {
                let digits = m.iter().take_while(|b| b.is_ascii_digit()).count();
                digits > 0 && (m.get(digits) == Some(&b'.') || m.get(digits) == Some(&b')')) && m.get(digits + 1) == Some(&b' ')
            } else {
                matches!(m.first(), Some(&b'-') | Some(&b'*') | Some(&b'+')) && m.get(1) == Some(&b' ')
            }
        };

        if starts_item {
            if in_item {
                items.push(std::mem::take(&mut current));
            }
            in_item = true;
            let m = &line[line_indent..];
            let skip = if ordered {
                m.iter().take_while(|b| b.is_ascii_digit()).count() + 2
            } else {
                2
            };
            current.extend_from_slice(trim(&m[skip.min(m.len())..]));
            current.push(b'\n');
            cursor += l + 1;
            continue;
        }

        if is_blank_line(line) {
            current.push(b'\n');
            cursor += l + 1;
            continue;
        }

        if line_indent >= bullet_len + indent || line_indent >= 2 {
            current.extend_from_slice(trim(line));
            current.push(b'\n');
            cursor += l + 1;
            continue;
        }

        break;
    }
    if in_item {
        items.push(current);
    }
    if items.is_empty() {
        return None;
    }

    let mut list_body = parser.pool.acquire();
    for item in &items {
        let mut item_body = parser.pool.acquire();
        let trimmed = trim(item);
        if trimmed.contains(&b'\n') {
            parse_blocks(parser, item, depth + 1, &mut item_body, state);
        } else {
            emit_paragraph_inline_only(parser, trimmed, &mut item_body, state);
        }
        if let Some(f) = parser.callbacks.list_item {
            f(&mut list_body, Some(item_body.as_bytes()), state);
        }
    }
    if let Some(f) = parser.callbacks.list {
        f(ob, Some(list_body.as_bytes()), ordered, state);
    }
    Some(cursor)
}

fn try_table(parser: &Parser, data: &[u8], ob: &mut Buffer, state: &mut RenderState) -> Option<usize> {
    let header_len = line_len(data);
    let header_line = &data[..header_len];
    if !header_line.contains(&b'|') {
        return None;
    }
    let delim_start = header_len + 1;
    if delim_start >= data.len() {
        return None;
    }
    let delim_len = line_len(&data[delim_start..]);
    let delim_line = trim(&data[delim_start..delim_start + delim_len]);
    let aligns = parse_table_delimiter(delim_line)?;

    let header_cells = split_table_row(header_line);
    let mut head = parser.pool.acquire();
    emit_table_row(parser, &header_cells, &aligns, true, &mut head, state);

    let mut cursor = delim_start + delim_len + 1;
    let mut body = parser.pool.acquire();
    while cursor < data.len() {
        let rest = &data[cursor..];
        let l = line_len(rest);
        let line = &rest[..l];
        if is_blank_line(line) || !line.contains(&b'|') {
            break;
        }
        let cells = split_table_row(line);
        emit_table_row(parser, &cells, &aligns, false, &mut body, state);
        cursor += l + 1;
    }

    if let Some(f) = parser.callbacks.table {
        f(ob, Some(head.as_bytes()), Some(body.as_bytes()), state);
    }
    Some(cursor)
}

fn parse_table_delimiter(line: &[u8]) -> Option<Vec<Align>> {
    if line.is_empty() {
        return None;
    }
    let mut aligns = Vec::new();
    for cell in line.split(|&b| b == b'|') {
        let cell = trim(cell);
        if cell.is_empty() {
            continue;
        }
        if !cell.iter().all(|&b| matches!(b, b'-' | b':')) {
            return None;
        }
        let left = cell.first() == Some(&b':');
        let right = cell.last() == Some(&b':');
        aligns.push(match (left, right) {
            (true, true) => Align::Center,
            (true, false) => Align::Left,
            (false, true) => Align::Right,
            (false, false) => Align::None,
        });
    }
    if aligns.is_empty() {
        None
    } else {
        Some(aligns)
    }
}

fn split_table_row(line: &[u8]) -> Vec<Vec<u8>> {
    let trimmed = trim(line);
    let trimmed = trimmed.strip_prefix(b"|").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(b"|").unwrap_or(trimmed);
    trimmed.split(|&b| b == b'|').map(|c| trim(c).to_vec()).collect()
}

fn emit_table_row(parser: &Parser, cells: &[Vec<u8>], aligns: &[Align], is_header: bool, ob: &mut Buffer, state: &mut RenderState) {
    let mut row = parser.pool.acquire();
    for (idx, cell) in cells.iter().enumerate() {
        let align = aligns.get(idx).copied().unwrap_or(Align::None);
        let mut cell_body = parser.pool.acquire();
        super::inline::render_inline(parser, cell, &mut cell_body, state);
        if let Some(f) = parser.callbacks.table_cell {
            f(&mut row, Some(cell_body.as_bytes()), is_header, align, 1, state);
        }
    }
    if let Some(f) = parser.callbacks.table_row {
        f(ob, Some(row.as_bytes()), state);
    }
}

/// Determines how many bytes of `data` a paragraph consumes (up to the
/// first blank line or another block's start) and whether its last line
/// is actually a setext header underline, in which case the level (1 for
/// `===`, 2 for `---`) is returned alongside the consumed length of just
/// the title line.
fn paragraph_extent(data: &[u8]) -> (usize, Option<u32>) {
    let mut cursor = 0;
    let first_len = line_len(data);
    loop {
        let rest = &data[cursor..];
        let l = line_len(rest);
        if cursor > 0 {
            if is_blank_line(rest) || begins_new_block(rest) {
                return (cursor, None);
            }
            if let Some(level) = setext_level(rest, l) {
                return (first_len, Some(level));
            }
        }
        cursor += l + 1;
        if cursor >= data.len() {
            return (data.len().min(cursor), None);
        }
    }
}

fn setext_level(line: &[u8], len: usize) -> Option<u32> {
    let candidate = trim(&line[..len]);
    if candidate.is_empty() {
        return None;
    }
    if candidate.iter().all(|&b| b == b'=') {
        Some(1)
    } else if candidate.iter().all(|&b| b == b'-') && candidate.len() >= 1 {
        Some(2)
    } else {
        None
    }
}

fn begins_new_block(rest: &[u8]) -> bool {
    let line = &rest[..line_len(rest)];
    let indent = leading_spaces(line);
    if indent >= 4 {
        return false;
    }
    let trimmed = &line[indent..];
    trimmed.first() == Some(&b'#')
        || trimmed.first() == Some(&b'>')
        || matches!(trimmed.first(), Some(&b'-') | Some(&b'*') | Some(&b'+'))
        || trimmed.first().map_or(false, |b| b.is_ascii_digit())
}

fn emit_paragraph(parser: &Parser, text: &[u8], ob: &mut Buffer, state: &mut RenderState) {
    let mut inner = parser.pool.acquire();
    super::inline::render_inline(parser, text, &mut inner, state);
    if let Some(f) = parser.callbacks.paragraph {
        f(ob, Some(inner.as_bytes()), state);
    }
}

fn emit_paragraph_inline_only(parser: &Parser, text: &[u8], ob: &mut Buffer, state: &mut RenderState) {
    super::inline::render_inline(parser, text, ob, state);
}

fn emit_header(parser: &Parser, text: &[u8], level: u32, ob: &mut Buffer, state: &mut RenderState) {
    let mut inner = parser.pool.acquire();
    super::inline::render_inline(parser, text, &mut inner, state);
    if let Some(f) = parser.callbacks.header {
        f(ob, Some(inner.as_bytes()), level, state);
    }
}
