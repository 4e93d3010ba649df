//! Phase A: a prepass that collects link reference definitions
//! (`[label]: /url "title"`) before block parsing proper begins, so a
//! reference used above its definition still resolves.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct LinkRef {
    pub href: String,
    pub title: Option<String>,
}

/// Reference labels are matched case-and-whitespace-insensitively:
/// collapse runs of whitespace and lowercase (ASCII only — this dialect's
/// labels are expected to be plain identifiers, not arbitrary Unicode).
pub fn normalize_label(label: &[u8]) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_space = true;
    for &b in label {
        if (b as char).is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(b.to_ascii_lowercase() as char);
            in_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Scans the whole document for `[label]: dest "title"` lines, returning
/// a map from normalized label to its resolved destination. Lines that
/// match are not otherwise removed from the block stream here — the
/// block parser recognizes and skips them again when it reaches them,
/// the same definition just yielding no output the second time.
pub fn collect_references(data: &[u8]) -> HashMap<String, LinkRef> {
    let mut map = HashMap::new();
    let mut i = 0;
    let n = data.len();
    while i < n {
        let line_start = i;
        let line_end = data[i..].iter().position(|&b| b == b'\n').map(|p| i + p).unwrap_or(n);
        let line = &data[line_start..line_end];
        if let Some((label, ref_def, consumed)) = parse_reference_line(line) {
            map.insert(label, ref_def);
            i = line_start + consumed;
            if i <= line_end {
                i = line_end + 1;
            }
            continue;
        }
        i = line_end + 1;
    }
    map
}

fn parse_reference_line(line: &[u8]) -> Option<(String, LinkRef, usize)> {
    let mut i = 0;
    let n = line.len();
    while i < n && line[i] == b' ' {
        i += 1;
    }
    if i >= n || line[i] != b'[' {
        return None;
    }
    i += 1;
    let label_start = i;
    while i < n && line[i] != b']' {
        i += 1;
    }
    if i >= n {
        return None;
    }
    let label = &line[label_start..i];
    if label.is_empty() {
        return None;
    }
    i += 1;
    if i >= n || line[i] != b':' {
        return None;
    }
    i += 1;
    while i < n && line[i] == b' ' {
        i += 1;
    }
    let href_start = i;
    while i < n && line[i] != b' ' {
        i += 1;
    }
    if i == href_start {
        return None;
    }
    let href = String::from_utf8_lossy(&line[href_start..i]).into_owned();

    while i < n && line[i] == b' ' {
        i += 1;
    }
    let mut title = None;
    if i < n && (line[i] == b'"' || line[i] == b'\'') {
        let quote = line[i];
        i += 1;
        let title_start = i;
        while i < n && line[i] != quote {
            i += 1;
        }
        title = Some(String::from_utf8_lossy(&line[title_start..i]).into_owned());
        if i < n {
            i += 1;
        }
    }

    Some((normalize_label(label), LinkRef { href, title }, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_simple_reference() {
        let map = collect_references(b"para\n\n[foo]: /bar \"Title\"\n\nmore");
        let r = map.get("foo").unwrap();
        assert_eq!(r.href, "/bar");
        assert_eq!(r.title.as_deref(), Some("Title"));
    }

    #[test]
    fn label_normalization_folds_case_and_space() {
        assert_eq!(normalize_label(b"Foo  Bar"), "foo bar");
    }

    #[test]
    fn reference_without_title_has_none() {
        let map = collect_references(b"[x]: /y\n");
        assert_eq!(map.get("x").unwrap().title, None);
    }
}
