//! Header and footer placeholder expansion.
//!
//! A header/footer cell is plain text with light emphasis (`**bold**`, `*italic*`) and the
//! tokens below. Emphasis is translated first, then the string is scanned once from left to
//! right into literal segments and placeholders, which are rendered independently.
//!
//! | Token                 | Typst                                               |
//! |-----------------------|-----------------------------------------------------|
//! | `{page}`              | `#counter(page).display()`                          |
//! | `{total-pages}`       | `#counter(page).final().last()`                     |
//! | `{date}`              | `#datetime.today().display("[year]-[month]-[day]")` |
//! | `{date:FMT}`          | `FMT` with `YYYY`/`MM`/`DD` mapped to Typst fields  |
//! | `{logo:PATH}`         | `#image("…", height: 1em)`                          |
//! | `{logo:PATH:HEIGHT}`  | `#image("…", height: HEIGHT)`                       |
//!
//! Page counters are only known at layout time, so a cell using them is wrapped in a Typst
//! `context` block.

use crate::assets::AssetCopy;
use crate::paths::relative_path;
use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_LOGO_HEIGHT: &str = "1em";
const BOLD_SENTINEL: &str = "\u{0}BOLD\u{0}";

/// Directories needed to resolve `{logo:…}` tokens.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderContext<'a> {
    /// Directory the Typst file is written to.
    pub output_dir: &'a Path,
    /// Directory of the Markdown source; logo paths are relative to it.
    pub source_dir: &'a Path,
    /// Name of the asset directory inside `output_dir`.
    pub asset_dir: &'a str,
}

/// A resolved header/footer cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Markup that can be placed in a content block as-is.
    Plain(String),
    /// Markup that depends on page counters and must be evaluated in a `context`.
    Deferred(String),
}

impl Resolved {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Resolved::Deferred(_))
    }

    /// The markup without any wrapper.
    pub fn markup(&self) -> &str {
        match self {
            Resolved::Plain(text) | Resolved::Deferred(text) => text,
        }
    }

    /// The cell as a grid argument: `[…]`, or `context […]` when deferred.
    pub fn to_grid_cell(&self) -> String {
        match self {
            Resolved::Plain(text) => format!("[{text}]"),
            Resolved::Deferred(_) => self.to_string(),
        }
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Plain(text) => f.write_str(text),
            Resolved::Deferred(text) => write!(f, "context [{text}]"),
        }
    }
}

/// A piece of a header/footer cell.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Page,
    TotalPages,
    Date(Option<&'a str>),
    Logo { path: &'a str, height: Option<&'a str> },
}

/// Resolve a header/footer cell, returning the markup and the logo copies it needs.
pub fn resolve_placeholders(
    text: &str,
    context: &PlaceholderContext<'_>,
) -> (Resolved, Vec<AssetCopy>) {
    let text = convert_inline_emphasis(text);
    let segments = tokenize(&text);

    let mut output = String::with_capacity(text.len());
    let mut assets = Vec::new();
    let mut deferred = false;

    for segment in &segments {
        match segment {
            Segment::Literal(literal) => output.push_str(literal),
            Segment::Page => {
                deferred = true;
                output.push_str("#counter(page).display()");
            }
            Segment::TotalPages => {
                deferred = true;
                output.push_str("#counter(page).final().last()");
            }
            Segment::Date(format) => {
                let pattern = format.map_or_else(
                    || "[year]-[month]-[day]".to_string(),
                    |format| convert_date_format(format),
                );
                output.push_str(&format!("#datetime.today().display(\"{pattern}\")"));
            }
            Segment::Logo { path, height } => {
                let (image, copy) = logo_image(path, height.unwrap_or(DEFAULT_LOGO_HEIGHT), context);
                output.push_str(&image);
                assets.push(copy);
            }
        }
    }

    let resolved = if deferred {
        Resolved::Deferred(output)
    } else {
        Resolved::Plain(output)
    };
    (resolved, assets)
}

/// Translate `**bold**` and `*italic*` into Typst `*bold*` and `_italic_`.
///
/// Bold spans are set aside first so the single-asterisk pass cannot match inside them.
pub fn convert_inline_emphasis(text: &str) -> String {
    let mut bold_spans = Vec::new();
    let without_bold = replace_delimited(text, "**", |content| {
        bold_spans.push(content.to_string());
        format!("{BOLD_SENTINEL}{}{BOLD_SENTINEL}", bold_spans.len() - 1)
    });

    let mut output = replace_delimited(&without_bold, "*", |content| format!("_{content}_"));

    for (index, content) in bold_spans.iter().enumerate() {
        let placeholder = format!("{BOLD_SENTINEL}{index}{BOLD_SENTINEL}");
        output = output.replace(&placeholder, &format!("*{content}*"));
    }
    output
}

/// Replace every `DELIM content DELIM` span (shortest non-empty content on one line).
fn replace_delimited(text: &str, delimiter: &str, mut replace: impl FnMut(&str) -> String) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(delimiter) {
        let after_open = &rest[start + delimiter.len()..];
        let closing = after_open
            .char_indices()
            .nth(1)
            .and_then(|(offset, _)| after_open[offset..].find(delimiter).map(|pos| pos + offset));

        match closing {
            Some(end) if !after_open[..end].contains('\n') => {
                output.push_str(&rest[..start]);
                output.push_str(&replace(&after_open[..end]));
                rest = &after_open[end + delimiter.len()..];
            }
            _ => {
                // No span opens here; keep one character and retry after it.
                let skip = rest[start..].chars().next().map_or(1, char::len_utf8);
                output.push_str(&rest[..start + skip]);
                rest = &rest[start + skip..];
            }
        }
    }

    output.push_str(rest);
    output
}

fn tokenize(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('{') {
        let brace = cursor + offset;
        match parse_placeholder(&text[brace..]) {
            Some((segment, len)) => {
                if literal_start < brace {
                    segments.push(Segment::Literal(&text[literal_start..brace]));
                }
                segments.push(segment);
                cursor = brace + len;
                literal_start = cursor;
            }
            None => cursor = brace + 1,
        }
    }

    if literal_start < text.len() {
        segments.push(Segment::Literal(&text[literal_start..]));
    }
    segments
}

/// Parse a placeholder at the start of `text` (which begins with `{`).
/// Returns the segment and the number of bytes it spans.
fn parse_placeholder(text: &str) -> Option<(Segment<'_>, usize)> {
    if text.starts_with("{page}") {
        return Some((Segment::Page, "{page}".len()));
    }
    if text.starts_with("{total-pages}") {
        return Some((Segment::TotalPages, "{total-pages}".len()));
    }
    if text.starts_with("{date}") {
        return Some((Segment::Date(None), "{date}".len()));
    }

    let close = text.find('}')?;
    let inner = &text[1..close];
    let len = close + 1;

    if let Some(format) = inner.strip_prefix("date:") {
        if !format.is_empty() {
            return Some((Segment::Date(Some(format)), len));
        }
        return None;
    }

    if let Some(spec) = inner.strip_prefix("logo:") {
        let (path, height) = match spec.split_once(':') {
            Some((path, height)) => (path, Some(height).filter(|h| !h.is_empty())),
            None => (spec, None),
        };
        if path.is_empty() || (height.is_none() && spec.ends_with(':')) {
            return None;
        }
        return Some((Segment::Logo { path, height }, len));
    }

    None
}

fn convert_date_format(format: &str) -> String {
    let mut output = String::with_capacity(format.len() + 16);
    let mut rest = format;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("YYYY") {
            output.push_str("[year]");
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("MM") {
            output.push_str("[month]");
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("DD") {
            output.push_str("[day]");
            rest = tail;
        } else {
            let ch = rest.chars().next().unwrap_or_default();
            output.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    output
}

fn logo_image(path: &str, height: &str, context: &PlaceholderContext<'_>) -> (String, AssetCopy) {
    let file_name = Path::new(path)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(path));
    let destination = context.output_dir.join(context.asset_dir).join(file_name);
    let source = context.source_dir.join(path);
    let relative = relative_path(&destination, context.output_dir);

    (
        format!("#image(\"{relative}\", height: {height})"),
        AssetCopy::new(source, destination),
    )
}
