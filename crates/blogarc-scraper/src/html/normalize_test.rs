use super::*;
use crate::html::tree::Element;

fn normalized(html: &str) -> String {
    normalize_html(html).content
}

/// Walks the tree and fails on any element that is text-empty and
/// attribute-empty.
fn assert_no_vacuous_elements(nodes: &[Node]) {
    for node in nodes {
        if let Node::Element(element) = node {
            assert!(
                !(element.attrs.is_empty() && element.text_content().trim().is_empty()),
                "vacuous <{}> survived normalization",
                element.name
            );
            assert_no_vacuous_elements(&element.children);
        }
    }
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

#[test]
fn removes_empty_and_whitespace_only_elements() {
    assert_eq!(
        normalized("<p>Keep</p><p></p><div>  \n </div><span>&nbsp;</span>"),
        "<p>Keep</p>"
    );
}

#[test]
fn removes_nested_empty_chains_in_one_pass() {
    assert_eq!(
        normalized("<div><div><span><b> </b></span></div></div><p>Text</p>"),
        "<p>Text</p>"
    );
}

#[test]
fn keeps_elements_with_attributes_even_when_empty() {
    assert_eq!(
        normalized(r#"<a href="https://x.example.com/"></a><div class="gap"></div>"#),
        r#"<a href="https://x.example.com/"></a><div class="gap"></div>"#
    );
}

#[test]
fn keeps_parent_of_image_and_drops_its_empty_siblings() {
    assert_eq!(
        normalized(r#"<div><span></span><img src="p.jpg"><br></div>"#),
        r#"<div><img src="p.jpg"></div>"#
    );
}

#[test]
fn keeps_whitespace_text_inside_surviving_elements() {
    assert_eq!(
        normalized("<p>one <i></i> two</p>"),
        "<p>one  two</p>"
    );
}

#[test]
fn comment_only_element_is_removed() {
    assert_eq!(normalized("<div><!-- tracking --></div><p>x</p>"), "<p>x</p>");
}

#[test]
fn no_vacuous_element_survives_mixed_input() {
    let mut fragment = Fragment::parse(
        r#"<div><p><span> </span>Hello</p><ul><li></li><li>item</li></ul>
           <table><tr><td></td></tr></table><a href="/x"><b></b></a></div>"#,
    );
    normalize_fragment(&mut fragment);
    assert_no_vacuous_elements(&fragment.children);
}

#[test]
fn normalization_is_idempotent() {
    let input = r#"<h1>Title</h1><div><p></p><p>Body <b></b>text</p>
                   <a href="/i"><img src="i.png"></a><div><span> </span></div></div>"#;
    let once = normalize_html(input);
    let twice = normalize_html(&once.content);
    assert_eq!(once, twice);
}

#[test]
fn leading_newlines_in_preformatted_text_survive_repeated_runs() {
    for input in [
        "<pre>\n\ncode</pre>",
        "<textarea>\n\nnotes</textarea>",
        "<pre>\n\n  indented\n</pre>",
    ] {
        let once = normalize_html(input);
        let twice = normalize_html(&once.content);
        let thrice = normalize_html(&twice.content);
        assert_eq!(once.content, input);
        assert_eq!(once, twice, "second run changed {input:?}");
        assert_eq!(twice, thrice, "third run changed {input:?}");
    }
}

#[test]
fn pre_without_leading_newline_gains_none() {
    assert_eq!(normalized("<pre>code\n</pre>"), "<pre>code\n</pre>");
}

// ---------------------------------------------------------------------------
// Headings
// ---------------------------------------------------------------------------

#[test]
fn top_level_heading_becomes_next_level_with_same_text() {
    let mut fragment = Fragment::parse(r#"<h1>Harvest <em>notes</em></h1><p>x</p>"#);
    normalize_fragment(&mut fragment);

    let mut h1_count = 0;
    let mut h2_text = Vec::new();
    fragment.for_each_element(&mut |element: &Element| match element.name.as_str() {
        "h1" => h1_count += 1,
        "h2" => h2_text.push(element.text_content()),
        _ => {}
    });
    assert_eq!(h1_count, 0);
    assert_eq!(h2_text, vec!["Harvest notes".to_string()]);
}

#[test]
fn nested_h1_is_demoted_and_h2_left_alone() {
    assert_eq!(
        normalized("<div><h1>A</h1><h2>B</h2></div>"),
        "<div><h2>A</h2><h2>B</h2></div>"
    );
}

#[test]
fn empty_h1_is_pruned_rather_than_demoted() {
    assert_eq!(normalized("<h1> </h1><p>x</p>"), "<p>x</p>");
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

#[test]
fn preview_joins_text_nodes_without_separators_and_trims() {
    let fragment = Fragment::parse("  <p>Hello</p><p>world</p>  ");
    assert_eq!(preview_text(&fragment), "Helloworld");
}

#[test]
fn preview_is_capped_at_300_characters() {
    let long = "a".repeat(450);
    let fragment = Fragment::parse(&format!("<p>{long}</p>"));
    let preview = preview_text(&fragment);
    assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
    assert!(long.starts_with(&preview));
}

#[test]
fn preview_cuts_mid_word_at_the_character_boundary() {
    // 295 filler chars followed by "Hello wonderful world": the cut lands
    // inside "wonderful".
    let filler = "x".repeat(295);
    let fragment = Fragment::parse(&format!("<p>{filler}Hello wonderful world</p>"));
    let preview = preview_text(&fragment);
    assert_eq!(preview, format!("{filler}Hello"));

    let fragment = Fragment::parse(&format!("<p>{}Hello wonderful world</p>", "x".repeat(290)));
    assert!(preview_text(&fragment).ends_with("Hello wond"));
}

#[test]
fn preview_counts_characters_not_bytes() {
    let text = "é".repeat(310);
    let fragment = Fragment::parse(&format!("<p>{text}</p>"));
    let preview = preview_text(&fragment);
    assert_eq!(preview.chars().count(), 300);
    assert!(text.starts_with(&preview));
}

#[test]
fn preview_of_short_text_is_the_whole_text() {
    let result = normalize_html("<p> Hello wonderful world </p>");
    assert_eq!(result.preview, "Hello wonderful world");
}
