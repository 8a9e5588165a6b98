//! Document-level configuration read from the YAML frontmatter.
//!
//! The YAML text is parsed with `serde_yaml` into a dynamic [`Value`] and then interpreted key
//! by key. Interpretation is lenient: a key holding a value of the wrong type falls back to that
//! key's default instead of rejecting the whole block. A block that is not valid YAML is
//! reported with a warning and ignored.
//!
//! Recognized keys and defaults:
//!
//! | Key                         | Type                                   | Default                 |
//! |-----------------------------|----------------------------------------|-------------------------|
//! | `title`, `author`, `date`   | string                                 | unset                   |
//! | `numbered_headings`         | bool                                   | `false`                 |
//! | `toc_depth`                 | integer                                | `3`                     |
//! | `font`                      | string (`serif`, `sans` are aliases)   | unset                   |
//! | `prevent_heading_orphans`   | bool                                   | `true`                  |
//! | `style_code_blocks`         | bool                                   | `true`                  |
//! | `treat_top_level_as_title`  | bool or `"auto"`                       | `auto`                  |
//! | `page_break_before_heading` | integer or `false`                     | `2`                     |
//! | `heading_spacing`           | `false`, string, or `{before, after}`  | `2.5em` / `1.5em`       |
//! | `keep_code_with_previous`   | bool                                   | `true`                  |
//! | `header`, `footer`          | `{left, center, right}`                | unset                   |

use crate::ir::nodes::Document;
use serde_yaml::{Mapping, Value};
use tracing::warn;

pub const DEFAULT_TOC_DEPTH: u32 = 3;
pub const DEFAULT_PAGE_BREAK_LEVEL: u8 = 2;
pub const DEFAULT_SPACING_BEFORE: &str = "2.5em";
pub const DEFAULT_SPACING_AFTER: &str = "1.5em";

/// Whether a lone top-level heading is rendered as the document title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleMode {
    On,
    Off,
    /// Decide from the document structure, see [`derive_title_mode`].
    #[default]
    Auto,
}

/// Vertical space around headings. `None` on a side suppresses that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingSpacing {
    pub before: Option<String>,
    pub after: Option<String>,
}

impl HeadingSpacing {
    pub fn disabled() -> Self {
        Self {
            before: None,
            after: None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

impl Default for HeadingSpacing {
    fn default() -> Self {
        Self {
            before: Some(DEFAULT_SPACING_BEFORE.to_string()),
            after: Some(DEFAULT_SPACING_AFTER.to_string()),
        }
    }
}

/// The three cells of a page header or footer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageBand {
    pub left: Option<String>,
    pub center: Option<String>,
    pub right: Option<String>,
}

impl PageBand {
    /// A band counts as configured only when one of its cells has text.
    pub fn is_empty(&self) -> bool {
        [&self.left, &self.center, &self.right]
            .iter()
            .all(|cell| cell.as_deref().map_or(true, str::is_empty))
    }
}

/// Fully resolved document configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentConfig {
    pub title: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub numbered_headings: bool,
    pub toc_depth: u32,
    pub font: Option<String>,
    pub prevent_heading_orphans: bool,
    pub style_code_blocks: bool,
    pub treat_top_level_as_title: TitleMode,
    /// Deepest heading level that starts on a new page; `None` disables page breaks.
    pub page_break_before_heading: Option<u8>,
    pub heading_spacing: HeadingSpacing,
    pub keep_code_with_previous: bool,
    pub header: Option<PageBand>,
    pub footer: Option<PageBand>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            date: None,
            numbered_headings: false,
            toc_depth: DEFAULT_TOC_DEPTH,
            font: None,
            prevent_heading_orphans: true,
            style_code_blocks: true,
            treat_top_level_as_title: TitleMode::Auto,
            page_break_before_heading: Some(DEFAULT_PAGE_BREAK_LEVEL),
            heading_spacing: HeadingSpacing::default(),
            keep_code_with_previous: true,
            header: None,
            footer: None,
        }
    }
}

impl DocumentConfig {
    /// Build the configuration from raw frontmatter text, if any.
    ///
    /// Malformed YAML never aborts the conversion: it is logged and the defaults apply.
    pub fn from_frontmatter(text: Option<&str>) -> Self {
        let Some(text) = text else {
            return Self::default();
        };
        if text.trim().is_empty() {
            return Self::default();
        }

        match serde_yaml::from_str::<Value>(text) {
            Ok(value) => Self::from_yaml_value(&value),
            Err(err) => {
                warn!("Failed to parse YAML frontmatter: {err}");
                Self::default()
            }
        }
    }

    /// Interpret an already-parsed YAML value. Anything but a mapping yields the defaults.
    pub fn from_yaml_value(value: &Value) -> Self {
        let Some(map) = value.as_mapping() else {
            return Self::default();
        };

        let defaults = Self::default();
        Self {
            title: get(map, "title").and_then(scalar_string),
            author: get(map, "author").and_then(scalar_string),
            date: get(map, "date").and_then(scalar_string),
            numbered_headings: get_bool(map, "numbered_headings", defaults.numbered_headings),
            toc_depth: get(map, "toc_depth")
                .and_then(Value::as_u64)
                .and_then(|depth| u32::try_from(depth).ok())
                .unwrap_or(defaults.toc_depth),
            font: get(map, "font").and_then(scalar_string),
            prevent_heading_orphans: get_bool(
                map,
                "prevent_heading_orphans",
                defaults.prevent_heading_orphans,
            ),
            style_code_blocks: get_bool(map, "style_code_blocks", defaults.style_code_blocks),
            treat_top_level_as_title: get(map, "treat_top_level_as_title")
                .map(title_mode)
                .unwrap_or_default(),
            page_break_before_heading: get(map, "page_break_before_heading")
                .map(page_break_level)
                .unwrap_or(defaults.page_break_before_heading),
            heading_spacing: get(map, "heading_spacing")
                .map(heading_spacing)
                .unwrap_or_default(),
            keep_code_with_previous: get_bool(
                map,
                "keep_code_with_previous",
                defaults.keep_code_with_previous,
            ),
            header: get(map, "header").and_then(page_band),
            footer: get(map, "footer").and_then(page_band),
        }
    }

    /// Resolve [`TitleMode`] against a document. Called once, before translation.
    pub fn title_mode_for(&self, document: &Document) -> bool {
        match self.treat_top_level_as_title {
            TitleMode::On => true,
            TitleMode::Off => false,
            TitleMode::Auto => derive_title_mode(document),
        }
    }

    pub fn has_page_bands(&self) -> bool {
        self.header.as_ref().is_some_and(|band| !band.is_empty())
            || self.footer.as_ref().is_some_and(|band| !band.is_empty())
    }
}

/// True iff the document holds exactly one depth-1 heading and it is the first heading.
pub fn derive_title_mode(document: &Document) -> bool {
    let depths = document.heading_depths();
    let top_level = depths.iter().filter(|depth| **depth == 1).count();
    top_level == 1 && depths.first() == Some(&1)
}

fn get<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

fn get_bool(map: &Mapping, key: &str, default: bool) -> bool {
    get(map, key).and_then(Value::as_bool).unwrap_or(default)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        _ => None,
    }
}

fn title_mode(value: &Value) -> TitleMode {
    match value {
        Value::Bool(true) => TitleMode::On,
        Value::Bool(false) => TitleMode::Off,
        _ => TitleMode::Auto,
    }
}

fn page_break_level(value: &Value) -> Option<u8> {
    match value {
        Value::Bool(false) => None,
        Value::Number(number) => Some(
            number
                .as_u64()
                .map_or(DEFAULT_PAGE_BREAK_LEVEL, |level| {
                    u8::try_from(level).unwrap_or(u8::MAX)
                }),
        ),
        _ => Some(DEFAULT_PAGE_BREAK_LEVEL),
    }
}

fn heading_spacing(value: &Value) -> HeadingSpacing {
    match value {
        Value::Bool(false) => HeadingSpacing::disabled(),
        Value::String(_) | Value::Number(_) => HeadingSpacing {
            before: Some(DEFAULT_SPACING_BEFORE.to_string()),
            after: scalar_string(value),
        },
        Value::Mapping(map) => HeadingSpacing {
            before: spacing_side(map, "before", DEFAULT_SPACING_BEFORE),
            after: spacing_side(map, "after", DEFAULT_SPACING_AFTER),
        },
        _ => HeadingSpacing::default(),
    }
}

fn spacing_side(map: &Mapping, key: &str, default: &str) -> Option<String> {
    match get(map, key) {
        None => Some(default.to_string()),
        Some(Value::Bool(false)) => None,
        Some(value) => scalar_string(value).or_else(|| Some(default.to_string())),
    }
}

fn page_band(value: &Value) -> Option<PageBand> {
    let map = value.as_mapping()?;
    Some(PageBand {
        left: get(map, "left").and_then(scalar_string),
        center: get(map, "center").and_then(scalar_string),
        right: get(map, "right").and_then(scalar_string),
    })
}
