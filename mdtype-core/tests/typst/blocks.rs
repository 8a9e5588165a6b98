use insta::assert_snapshot;
use mdtype_core::convert_markdown;

fn body(markdown: &str) -> String {
    let frontmatter = "---\nprevent_heading_orphans: false\nstyle_code_blocks: false\nheading_spacing: false\n---\n";
    convert_markdown(&format!("{frontmatter}{markdown}"))
        .expect("conversion")
        .markup
}

#[test]
fn test_auto_title_requires_single_leading_h1() {
    let single = body("# Title\n\n## Section\n");
    assert!(single.contains("#heading(level: 1, outlined: false)[Title]"));

    let nested_first = body("## Intro\n\n# Title\n");
    assert!(nested_first.contains("= Title\n"));
    assert!(!nested_first.contains("outlined: false"));

    let two = body("# One\n\n# Two\n");
    assert!(!two.contains("outlined: false"));
}

#[test]
fn test_explicit_title_mode_overrides_derivation() {
    let output = convert_markdown("---\ntreat_top_level_as_title: true\n---\n# One\n\n# Two\n")
        .unwrap()
        .markup;
    assert_eq!(output.matches("#heading(level: 1, outlined: false)").count(), 2);

    let output = convert_markdown("---\ntreat_top_level_as_title: false\n---\n# Only\n")
        .unwrap()
        .markup;
    assert!(output.contains("= Only\n"));
    assert!(!output.contains("outlined: false"));
}

#[test]
fn test_chapter_and_section_share_one_break() {
    assert_snapshot!(body("Intro\n\n# Chapter\n\n## Section\n\nText\n"), @r"
Intro

#pagebreak(weak: true)
#heading(level: 1, outlined: false)[Chapter]

== Section

Text
");
}

#[test]
fn test_page_break_level_from_frontmatter() {
    let output = convert_markdown(
        "---\npage_break_before_heading: 3\n---\nIntro\n\n### Deep\n\nText\n\n#### Deeper\n",
    )
    .unwrap()
    .markup;
    assert_eq!(output.matches("#pagebreak(weak: true)").count(), 1);
    assert!(output.contains("#pagebreak(weak: true)\n=== Deep"));
}

#[test]
fn test_keep_code_with_previous_disabled() {
    let output = convert_markdown(
        "---\nkeep_code_with_previous: false\n---\nExample:\n\n```\nls\n```\n",
    )
    .unwrap()
    .markup;
    assert!(!output.contains("#block(breakable: false)"));
    assert!(output.ends_with("Example:\n\n```\nls\n```\n\n"));
}

#[test]
fn test_unmatched_keep_together() {
    assert_snapshot!(body("<!-- keep-together -->\n\nOne\n\nTwo\n"), @r"
One

Two
");
}

#[test]
fn test_nested_keep_together() {
    let output = body(
        "<!-- keep-together -->\n\nA\n\n<!-- keep-together -->\n\nB\n\n<!-- /keep-together -->\n\nC\n\n<!-- /keep-together -->\n\nD\n",
    );
    assert_eq!(
        output,
        "#block(breakable: false)[\nA\n\nB\n\nC\n\n]\n\nD\n\n"
    );
}

#[test]
fn test_dropped_comment_between_headings() {
    let output = body("Intro\n\n## A\n\n<!-- note to self -->\n\n## B\n\nText\n");
    assert_eq!(output.matches("#pagebreak(weak: true)").count(), 1);
    assert!(output.contains("#pagebreak(weak: true)\n== A\n\n== B\n\n"));
}

#[test]
fn test_huge_toc_depth_does_not_overflow() {
    let output = convert_markdown("---\ntoc_depth: 4294967295\n---\n# Title\n\n<!-- toc -->\n\n## A\n")
        .expect("conversion")
        .markup;
    assert!(output.contains("#outline(depth: 4294967295)"));
}

#[test]
fn test_unknown_html_is_dropped() {
    assert_eq!(body("<div>hidden</div>\n\nShown\n"), "Shown\n\n");
}
