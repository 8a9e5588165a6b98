use mdtype_core::diagram::RenderedDiagram;
use mdtype_core::formats::markdown::parse_markdown;
use mdtype_core::formats::typst::{convert_to_typst, ConvertContext};
use mdtype_core::DocumentConfig;
use std::path::{Path, PathBuf};

const KITCHENSINK: &str = include_str!("../fixtures/kitchensink.md");

fn convert(diagrams: Vec<RenderedDiagram>) -> String {
    let parsed = parse_markdown(KITCHENSINK).expect("Failed to parse markdown");
    let context = ConvertContext {
        output_dir: PathBuf::from("/book"),
        source_dir: PathBuf::from("/book/src"),
        diagrams,
        config: DocumentConfig::from_frontmatter(parsed.frontmatter.as_deref()),
        ..ConvertContext::default()
    };
    convert_to_typst(&parsed.document, &context).markup
}

/// Asserts that every fragment occurs, in the given order.
fn assert_in_order(output: &str, fragments: &[&str]) {
    let mut offset = 0;
    for fragment in fragments {
        match output[offset..].find(fragment) {
            Some(position) => offset += position + fragment.len(),
            None => panic!("missing or out of order: {fragment:?}\n\n{output}"),
        }
    }
}

#[test]
fn test_kitchensink_preamble() {
    let output = convert(Vec::new());
    assert_in_order(
        &output,
        &[
            "#set text(font: \"New Computer Modern\")\n\n",
            "#set block(sticky: true)\n\n",
            "#show heading: set block(above: 2.5em, below: 1.5em)\n\n",
            "#show raw.where(block: true)",
            "#show raw.where(block: false)",
            "#set page(\n  header: grid(",
            "    [*Kitchen Sink*],\n    [],\n    [#datetime.today().display(\"[day]/[month]/[year]\")]\n  ),",
            "  footer: grid(",
            "    context [Page #counter(page).display() of #counter(page).final().last()],",
            "#set heading(numbering: (..nums) => {",
            "#show heading.where(level: 1): set heading(hanging-indent: 0pt)\n\n",
        ],
    );
}

#[test]
fn test_kitchensink_body() {
    let output = convert(Vec::new());
    assert_in_order(
        &output,
        &[
            "#pagebreak(weak: true)\n#heading(level: 1, outlined: false)[Kitchen Sink]\n\n",
            "#outline(depth: 3)\n\n== Text\n\n",
            "Plain text with _emphasis_, *strong*, #strike[strike] and `code`.\n",
            "Prices like \\$5 and handles like \\@someone are escaped.\n\n",
            "A #link(\"https://typst.app\")[link] and inline math $x^2$.\n\n",
            "#pagebreak(weak: true)\n== Structure\n\n",
            "- First\n- Second\n  + Nested one\n  + Nested two\n\n",
            "#quote[\nQuoted text\n\n]\n\n",
            "#line(length: 100%)\n\n",
            "#figure(\n  table(\n    columns: 2,\n    [*Name*],\n    [*Value*],\n    [a],\n    [1],\n  )\n)\n\n",
            "$ E = mc^2 $\n\n",
            "#pagebreak()\n\n",
            "#pagebreak(weak: true)\n== Code\n\n",
            "#block(breakable: false)[\nHere is a snippet:\n\n```rust\nfn main() {}\n```\n\n]\n\n",
            "#block(breakable: false)[\nKept paragraph one.\n\nKept paragraph two.\n\n]\n\n",
        ],
    );
    assert_eq!(output.matches("#pagebreak(weak: true)").count(), 3);
    assert!(!output.contains("<!--"));
    assert!(!output.contains("#figure(\n  image("));
}

#[test]
fn test_kitchensink_diagram_is_embedded() {
    let output = convert(vec![RenderedDiagram {
        id: "diagram-0".to_string(),
        image_path: Path::new("/book/diagrams/diagram-0.png").to_path_buf(),
    }]);
    assert!(output.ends_with("#figure(\n  image(\"diagrams/diagram-0.png\", width: 80%),\n)\n\n"));
}

#[test]
fn test_kitchensink_conversion_is_deterministic() {
    assert_eq!(convert(Vec::new()), convert(Vec::new()));
}
