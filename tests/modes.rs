use pretty_assertions::assert_eq;
use snoomark::{render, Error, Mode, Options};

#[test]
fn usertext_renders_basic_markup() {
    let out = render(b"Hello, *world*!", &Options::new(Mode::UserText)).unwrap();
    assert_eq!(out, "<p>Hello, <em>world</em>!</p>\n");
}

#[test]
fn usertext_without_links_never_emits_an_anchor() {
    let out = render(b"see [reddit](https://reddit.com) here", &Options::new(Mode::UserTextWithoutLinks)).unwrap();
    assert!(!out.contains("<a "));
    assert!(out.contains("reddit"));
}

#[test]
fn usertext_without_links_never_emits_an_img_tag() {
    let out = render(b"![alt](https://example.com/a.png)", &Options::new(Mode::UserTextWithoutLinks)).unwrap();
    assert!(!out.contains("<img"));
}

#[test]
fn usertext_renders_inline_spoiler_span() {
    let out = render(b"it was >!Snape!< all along", &Options::new(Mode::UserText)).unwrap();
    assert_eq!(out, "<p>it was <span class=\"md-spoiler-text\">Snape</span> all along</p>\n");
}

#[test]
fn usertext_keeps_balanced_parens_in_autolinked_url() {
    let out = render(b"look at http://www.pokemon.com/Pikachu_(Electric) ok", &Options::new(Mode::UserText)).unwrap();
    assert_eq!(
        out,
        "<p>look at <a href=\"http://www.pokemon.com/Pikachu_(Electric)\">http://www.pokemon.com/Pikachu_(Electric)</a> ok</p>\n"
    );
}

#[test]
fn wiki_mode_keeps_whitelisted_raw_html() {
    let out = render(br#"<table><tr><td onclick="x">a</td></tr></table>"#, &Options::new(Mode::Wiki)).unwrap();
    assert!(out.contains("<table>"));
    assert!(out.contains("<tr>"));
    assert!(out.contains("<td>"));
    assert!(!out.contains("onclick"));
}

#[test]
fn invalid_mode_index_reports_the_offending_value() {
    let err = Mode::from_index(99).unwrap_err();
    assert!(matches!(err, Error::InvalidMode(99)));
}

#[test]
fn nofollow_and_target_are_per_call_options() {
    let mut options = Options::new(Mode::UserText);
    options.nofollow = true;
    options.target = Some("_blank".to_string());
    let out = render(b"[x](https://example.com)", &options).unwrap();
    assert!(out.contains(r#"rel="nofollow""#));
    assert!(out.contains(r#"target="_blank""#));
}

#[test]
fn enable_toc_works_regardless_of_mode() {
    let options = Options::new(Mode::UserText).with_enable_toc(true).with_toc_id_prefix("p_");
    let (body, toc) = snoomark::render_with_toc(b"# A\n## B\n# C\n", &options).unwrap();
    let toc = toc.unwrap();
    assert!(toc.contains("href=\"#p_toc_0\""));
    assert!(toc.contains("href=\"#p_toc_1\""));
    assert!(toc.contains("href=\"#p_toc_2\""));
    assert!(body.contains("id=\"p_toc_0\""));
    assert!(body.contains("id=\"p_toc_1\""));
    assert!(body.contains("id=\"p_toc_2\""));
}
