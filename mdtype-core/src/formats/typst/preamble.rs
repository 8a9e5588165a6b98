//! Global style directives placed before the document body.
//!
//! Directives are emitted in a fixed order, each followed by a blank line:
//!
//! 1. font
//! 2. sticky blocks (keeps headings with what follows)
//! 3. heading spacing
//! 4. code block styling
//! 5. page header/footer
//! 6. heading numbering

use super::placeholder::{resolve_placeholders, PlaceholderContext};
use crate::assets::AssetCopy;
use crate::frontmatter::{DocumentConfig, PageBand};

const SERIF_FONT: &str = "New Computer Modern";
const SANS_FONT: &str = "New Computer Modern Sans";

const BLOCK_CODE_STYLE: &str = "#show raw.where(block: true): block.with(
  fill: luma(240),
  inset: 10pt,
  radius: 4pt,
)

";

const INLINE_CODE_STYLE: &str = "#show raw.where(block: false): box.with(
  fill: luma(240),
  inset: (x: 3pt, y: 0pt),
  outset: (y: 3pt),
  radius: 2pt,
)

";

const TITLE_AWARE_NUMBERING: &str = "#set heading(numbering: (..nums) => {
  if nums.pos().len() == 1 {
    none
  } else {
    numbering(\"1.1\", ..nums.pos().slice(1))
  }
})

#show heading.where(level: 1): set heading(hanging-indent: 0pt)

";

/// Build the preamble and collect the asset copies its header/footer logos need.
pub fn generate_preamble(
    config: &DocumentConfig,
    title_mode: bool,
    placeholders: &PlaceholderContext<'_>,
) -> (String, Vec<AssetCopy>) {
    let mut output = String::new();
    output.push_str(&font_setup(config));
    output.push_str(&pagination_setup(config));
    output.push_str(&heading_spacing(config));
    output.push_str(&code_block_styling(config));
    let (page_setup, assets) = page_setup(config, placeholders);
    output.push_str(&page_setup);
    output.push_str(&heading_numbering(config, title_mode));
    (output, assets)
}

fn font_setup(config: &DocumentConfig) -> String {
    let Some(font) = config.font.as_deref() else {
        return String::new();
    };

    let name = match font.to_lowercase().as_str() {
        "serif" => SERIF_FONT,
        "sans" | "sans-serif" => SANS_FONT,
        _ => font,
    };
    format!("#set text(font: \"{name}\")\n\n")
}

fn pagination_setup(config: &DocumentConfig) -> String {
    if config.prevent_heading_orphans {
        "#set block(sticky: true)\n\n".to_string()
    } else {
        String::new()
    }
}

fn heading_spacing(config: &DocumentConfig) -> String {
    let spacing = &config.heading_spacing;
    let mut params = Vec::new();
    if let Some(before) = &spacing.before {
        params.push(format!("above: {before}"));
    }
    if let Some(after) = &spacing.after {
        params.push(format!("below: {after}"));
    }

    if params.is_empty() {
        return String::new();
    }
    format!("#show heading: set block({})\n\n", params.join(", "))
}

fn code_block_styling(config: &DocumentConfig) -> String {
    if !config.style_code_blocks {
        return String::new();
    }
    format!("{BLOCK_CODE_STYLE}{INLINE_CODE_STYLE}")
}

fn page_setup(
    config: &DocumentConfig,
    placeholders: &PlaceholderContext<'_>,
) -> (String, Vec<AssetCopy>) {
    let mut assets = Vec::new();
    let mut bands = Vec::new();

    for (name, band) in [("header", &config.header), ("footer", &config.footer)] {
        if let Some(band) = band.as_ref().filter(|band| !band.is_empty()) {
            bands.push(page_band(name, band, placeholders, &mut assets));
        }
    }

    if bands.is_empty() {
        return (String::new(), assets);
    }
    (format!("#set page(\n{}\n)\n\n", bands.join(",\n")), assets)
}

fn page_band(
    name: &str,
    band: &PageBand,
    placeholders: &PlaceholderContext<'_>,
    assets: &mut Vec<AssetCopy>,
) -> String {
    let cells: Vec<String> = [&band.left, &band.center, &band.right]
        .into_iter()
        .map(|cell| match cell.as_deref() {
            Some(text) if !text.is_empty() => {
                let (resolved, copies) = resolve_placeholders(text, placeholders);
                assets.extend(copies);
                resolved.to_grid_cell()
            }
            _ => "[]".to_string(),
        })
        .collect();

    format!(
        "  {name}: grid(\n    columns: (1fr, 1fr, 1fr),\n    align: (left + horizon, center + horizon, right + horizon),\n    {},\n    {},\n    {}\n  )",
        cells[0], cells[1], cells[2]
    )
}

fn heading_numbering(config: &DocumentConfig, title_mode: bool) -> String {
    if !config.numbered_headings {
        return String::new();
    }
    if title_mode {
        TITLE_AWARE_NUMBERING.to_string()
    } else {
        "#set heading(numbering: \"1.1\")\n\n".to_string()
    }
}
