use docviewer_engine::markdown::{
    MARKDOWN_TRANSFORMERS, convert_from_markdown_string, convert_to_markdown_string,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn round_trip(markdown: &str) -> String {
    let state = convert_from_markdown_string(markdown, &MARKDOWN_TRANSFORMERS).unwrap();
    convert_to_markdown_string(&state, &MARKDOWN_TRANSFORMERS)
}

#[rstest]
#[case("---")]
#[case("***")]
#[case("___")]
#[case("--- ")]
#[case("*** ")]
#[case("___ ")]
fn horizontal_rules_export_as_stars(#[case] rule: &str) {
    assert_eq!(round_trip(rule), "***");
}

#[test]
fn rule_between_paragraphs() {
    assert_eq!(round_trip("above\n---\nbelow"), "above\n\n***\n\nbelow");
}

#[test]
fn documentation_page() {
    let markdown = round_trip(
        "# Guide\n\nIntro with **bold** and `code`.\n\n- one\n    - nested\n- two\n\n> quoted\n\n---\n\n```go\nfmt.Println()\n```\n\nSee [docs](https://example.com).",
    );
    insta::assert_snapshot!(markdown, @r"
# Guide

Intro with **bold** and `code`.

- one
    - nested
- two

> quoted

***

```go
fmt.Println()
```

See [docs](https://example.com).
");
}

#[test]
fn blank_lines_collapse() {
    assert_eq!(round_trip("\n\nfirst\n\n\n\nsecond\n\n"), "first\n\nsecond");
}

#[test]
fn numbered_lists_keep_their_start() {
    assert_eq!(round_trip("3. three\n4. four"), "3. three\n4. four");
}

#[test]
fn check_lists() {
    assert_eq!(round_trip("- [x] done\n- [ ] todo"), "- [x] done\n- [ ] todo");
}

#[rstest]
#[case("**abc***def*")]
#[case("**é***x*")]
#[case("**a *b***")]
fn adjacent_emphasis_keeps_its_delimiters(#[case] markdown: &str) {
    assert_eq!(round_trip(markdown), markdown);
}

#[rstest]
#[case("1. a\n    - b\n2. c")]
#[case("- a\n    1. b\n    2. c\n- d")]
#[case("- [ ] a\n    - b\n        1. c\n- [x] d")]
fn mixed_nested_lists_keep_their_shape(#[case] markdown: &str) {
    assert_eq!(round_trip(markdown), markdown);
}

#[test]
fn oversized_list_number_survives_unchanged() {
    let markdown = "99999999999999999999. x";
    assert_eq!(round_trip(markdown), markdown);
}

#[test]
fn unterminated_fence_is_escaped_text() {
    assert_eq!(round_trip("```go\nfmt"), "\\`\\`\\`go\nfmt");
}
