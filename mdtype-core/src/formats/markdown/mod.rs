//! Markdown input
//!
//! # Library Choice
//!
//! We use the `comrak` crate for Markdown parsing. It covers everything the converter needs in
//! one crate: CommonMark, the GFM table and strikethrough extensions, `$`/`$$` math and `---`
//! frontmatter.
//!
//! # Element Mapping Table
//!
//! | Markdown                 | Comrak node              | Document tree node         |
//! |--------------------------|--------------------------|----------------------------|
//! | `---` yaml `---`         | FrontMatter              | FrontMatter (delimiters stripped) |
//! | `#` .. `######`          | Heading                  | Heading { depth }          |
//! | Paragraph                | Paragraph                | Paragraph                  |
//! | `$$ x $$` on its own     | Paragraph > Math         | BlockMath                  |
//! | `$x$`                    | Math                     | InlineMath                 |
//! | Fenced / indented code   | CodeBlock                | CodeBlock { language }     |
//! | `- item` / `1. item`     | List / Item              | List { ordered } / ListItem |
//! | `> quote`                | BlockQuote               | BlockQuote                 |
//! | GFM table                | Table / TableRow / Cell  | Table / TableRow / TableCell |
//! | `***`                    | ThematicBreak            | ThematicBreak              |
//! | Raw HTML                 | HtmlBlock / HtmlInline   | Raw                        |
//! | Soft break               | SoftBreak                | Text("\n")                 |
//! | Hard break               | LineBreak                | LineBreak                  |
//!
//! Comrak nodes without a counterpart (footnotes, description lists, ...) are dropped.

pub mod parser;

pub use parser::{parse_markdown, ParsedMarkdown};
