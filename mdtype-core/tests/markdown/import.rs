use mdtype_core::formats::markdown::parse_markdown;
use mdtype_core::ir::nodes::{List, Node};

const KITCHENSINK: &str = include_str!("../fixtures/kitchensink.md");

#[test]
fn test_kitchensink_frontmatter_is_split_off() {
    let parsed = parse_markdown(KITCHENSINK).expect("Failed to parse markdown");
    let frontmatter = parsed.frontmatter.expect("frontmatter");
    assert!(frontmatter.starts_with("title: Kitchen Sink"));
    assert!(!frontmatter.contains("---"));
    assert!(matches!(parsed.document.children[0], Node::FrontMatter(_)));
}

#[test]
fn test_kitchensink_headings_in_order() {
    let parsed = parse_markdown(KITCHENSINK).unwrap();
    assert_eq!(parsed.document.heading_depths(), vec![1, 2, 2, 2]);
}

#[test]
fn test_kitchensink_diagrams() {
    let parsed = parse_markdown(KITCHENSINK).unwrap();
    assert_eq!(parsed.diagrams.len(), 1);
    assert_eq!(parsed.diagrams[0].id, "diagram-0");
    assert_eq!(parsed.diagrams[0].source, "graph TD; A-->B");
}

#[test]
fn test_kitchensink_markers_are_raw_blocks() {
    let parsed = parse_markdown(KITCHENSINK).unwrap();
    let markers: Vec<&str> = parsed
        .document
        .children
        .iter()
        .filter_map(|node| match node {
            Node::Raw(raw) => Some(raw.trim()),
            _ => None,
        })
        .collect();
    assert_eq!(
        markers,
        vec![
            "<!-- toc -->",
            "<!-- pagebreak -->",
            "<!-- keep-together -->",
            "<!-- /keep-together -->",
        ]
    );
}

#[test]
fn test_nested_list_structure() {
    let parsed = parse_markdown("- a\n- b\n  1. c\n").unwrap();
    let Node::List(List { ordered, items }) = &parsed.document.children[0] else {
        panic!("expected a list");
    };
    assert!(!ordered);
    assert_eq!(items.len(), 2);
    let Node::ListItem(children) = &items[1] else {
        panic!("expected a list item");
    };
    assert!(matches!(
        &children[1],
        Node::List(List { ordered: true, .. })
    ));
}

#[test]
fn test_display_math_paragraph_is_block_math() {
    let parsed = parse_markdown("$$E = mc^2$$\n").unwrap();
    assert_eq!(
        parsed.document.children,
        vec![Node::BlockMath("E = mc^2".to_string())]
    );
}

#[test]
fn test_strikethrough_and_autolink() {
    let parsed = parse_markdown("~~old~~ https://typst.app\n").unwrap();
    let Node::Paragraph(children) = &parsed.document.children[0] else {
        panic!("expected a paragraph");
    };
    assert!(matches!(children[0], Node::Strikethrough(_)));
    assert!(children
        .iter()
        .any(|node| matches!(node, Node::Link(link) if link.url == "https://typst.app")));
}
