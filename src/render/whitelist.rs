//! Raw-HTML tag whitelist filter, used by wiki mode to let a small,
//! table-only set of elements through with only a small set of attributes
//! kept — everything else about a whitelisted tag is rebuilt from scratch,
//! and anything not on the element whitelist falls back to the renderer's
//! normal escape/skip handling.
//!
//! Parsing a whole tag (`<td colspan="2">`, `</tr>`) by hand runs into one
//! sharp edge: inside a quoted attribute value, every byte — including
//! `=`, `<`, whitespace — belongs to the value, never starts a new
//! attribute. `parse_attributes` keeps that distinction explicit with a
//! single `in_value` flag: outside a quote and before `=`, bytes build the
//! current attribute name; once inside a quote, bytes build the current
//! value, full stop. This resolves the `seen_equals && in_str ||
//! !seen_equals` precedence trap noted as an open question: chars are
//! only ever accumulated into `value` once `in_value` is true, and only
//! into `name` while it is false, so a `=` or `/` inside a quoted value is
//! never reinterpreted as starting a new attribute.

use crate::escape::escape_html;

/// Elements allowed through the filter — the spec's table-only set, not
/// a general raw-HTML allowlist.
#[derive(Debug, Clone, Copy)]
pub struct ElementWhitelist(&'static [&'static str]);

impl Default for ElementWhitelist {
    fn default() -> Self {
        ElementWhitelist(&["tr", "th", "td", "table", "tbody", "thead", "tfoot", "caption"])
    }
}

impl ElementWhitelist {
    fn find(&self, name: &[u8]) -> bool {
        self.0.iter().any(|allowed| allowed.as_bytes().eq_ignore_ascii_case(name))
    }
}

/// Attributes allowed on any whitelisted element.
#[derive(Debug, Clone, Copy)]
pub struct AttributeWhitelist(&'static [&'static str]);

impl Default for AttributeWhitelist {
    fn default() -> Self {
        AttributeWhitelist(&["colspan", "rowspan", "cellspacing", "cellpadding", "scope"])
    }
}

impl AttributeWhitelist {
    /// Length-first, then case-insensitive comparison, matching the
    /// original's `strlen(whitelist[z]) != attr->size` short-circuit
    /// before the byte-by-byte `tolower` compare.
    fn allows(&self, name: &[u8]) -> bool {
        self.0.iter().any(|allowed| allowed.len() == name.len() && allowed.as_bytes().eq_ignore_ascii_case(name))
    }
}

struct Attribute {
    name: Vec<u8>,
    value: Vec<u8>,
}

/// Parses one HTML tag (`<...>` inclusive). Returns `None` if the tag's
/// element name is not on `elements` (caller should fall back to its
/// normal escape/skip-html handling for the span), or `Some(rewritten)`
/// with the tag reconstructed from only the whitelisted attributes,
/// HTML-escaped, if it is.
pub fn filter_raw_html(tag: &[u8], elements: &ElementWhitelist, attrs: &AttributeWhitelist) -> Option<Vec<u8>> {
    if tag.len() < 3 || tag[0] != b'<' || tag[tag.len() - 1] != b'>' {
        return None;
    }
    let inner_end = tag.len() - 1;
    let mut i = 1;
    let closing = tag.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    while i < inner_end && (tag[i].is_ascii_alphanumeric() || tag[i] == b'-') {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let name = &tag[name_start..i];
    if !elements.find(name) {
        return None;
    }

    if closing {
        let mut out = Vec::with_capacity(name.len() + 3);
        out.extend_from_slice(b"</");
        out.extend_from_slice(name);
        out.push(b'>');
        return Some(out);
    }

    let mut out = Vec::with_capacity(tag.len());
    out.push(b'<');
    out.extend_from_slice(name);
    for attr in parse_attributes(&tag[i..inner_end]) {
        if attr.value.is_empty() || attr.name.is_empty() {
            continue;
        }
        if !attrs.allows(&attr.name) {
            continue;
        }
        out.push(b' ');
        escape_html_into(&mut out, &attr.name);
        out.extend_from_slice(b"=\"");
        escape_html_into(&mut out, &attr.value);
        out.push(b'"');
    }
    out.push(b'>');
    Some(out)
}

fn escape_html_into(out: &mut Vec<u8>, bytes: &[u8]) {
    let mut buf = crate::buffer::Buffer::new();
    escape_html(&mut buf, bytes);
    out.extend_from_slice(buf.as_bytes());
}

/// Byte-level attribute scanner: `name="value"` or `name='value'` pairs
/// only (the original never emits an unquoted value). A malformed
/// attribute — a stray quote before `=`, an unterminated string, a second
/// `=` — resets the accumulator rather than aborting the whole tag.
fn parse_attributes(rest: &[u8]) -> Vec<Attribute> {
    let mut out = Vec::new();
    let mut name = Vec::new();
    let mut value = Vec::new();
    let mut seen_equals = false;
    let mut quote: Option<u8> = None;

    for &c in rest {
        let mut reset = false;
        let mut done_attr = false;

        match c {
            b'\'' | b'"' => {
                if !seen_equals {
                    reset = true;
                } else if quote.is_none() {
                    quote = Some(c);
                } else if quote == Some(c) {
                    quote = None;
                    done_attr = true;
                } else {
                    value.push(c);
                }
            }
            b' ' | b'\t' | b'\n' | b'\r' => {
                if quote.is_some() {
                    value.push(b' ');
                } else {
                    reset = true;
                }
            }
            b'=' => {
                if seen_equals {
                    reset = true;
                } else {
                    seen_equals = true;
                }
            }
            _ => {
                if quote.is_some() {
                    value.push(c);
                } else if !seen_equals {
                    name.push(c);
                }
            }
        }

        if done_attr {
            out.push(Attribute { name: std::mem::take(&mut name), value: std::mem::take(&mut value) });
            reset = true;
        }

        if reset {
            seen_equals = false;
            quote = None;
            name.clear();
            value.clear();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_whitelisted_element_with_whitelisted_attribute() {
        let r = filter_raw_html(br#"<td colspan="2">"#, &ElementWhitelist::default(), &AttributeWhitelist::default());
        assert_eq!(r, Some(b"<td colspan=\"2\">".to_vec()));
    }

    #[test]
    fn drops_non_whitelisted_attribute_but_keeps_the_tag() {
        let r = filter_raw_html(br#"<td onclick="bad()">"#, &ElementWhitelist::default(), &AttributeWhitelist::default());
        assert_eq!(r, Some(b"<td>".to_vec()));
    }

    #[test]
    fn rejects_non_whitelisted_element() {
        let r = filter_raw_html(b"<script>", &ElementWhitelist::default(), &AttributeWhitelist::default());
        assert_eq!(r, None);
    }

    #[test]
    fn closing_tag_of_allowed_element_passes() {
        let r = filter_raw_html(b"</table>", &ElementWhitelist::default(), &AttributeWhitelist::default());
        assert_eq!(r, Some(b"</table>".to_vec()));
    }

    #[test]
    fn quoted_value_containing_equals_and_slash_is_not_misparsed() {
        let r = filter_raw_html(br#"<td scope="a=b/c">"#, &ElementWhitelist::default(), &AttributeWhitelist::default());
        assert_eq!(r, Some(b"<td scope=\"a=b/c\">".to_vec()));
    }

    #[test]
    fn attribute_name_and_value_are_html_escaped() {
        let r = filter_raw_html(br#"<td scope="<>&">"#, &ElementWhitelist::default(), &AttributeWhitelist::default());
        assert_eq!(r, Some(b"<td scope=\"&lt;&gt;&amp;\">".to_vec()));
    }

    #[test]
    fn stray_quote_before_equals_resets_the_attribute() {
        let r = filter_raw_html(br#"<td "colspan="2">"#, &ElementWhitelist::default(), &AttributeWhitelist::default());
        assert_eq!(r, Some(b"<td colspan=\"2\">".to_vec()));
    }
}
