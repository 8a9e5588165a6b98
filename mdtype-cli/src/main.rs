// Command-line interface for mdtype
//
// Converts a Markdown file (with optional YAML frontmatter and mermaid diagrams) to Typst, and
// optionally compiles the result to PDF.
//
// Usage:
//  mdtype <input.md>                 - Writes <input>.typ next to the input
//  mdtype <input.md> <output.typ>    - Writes the given Typst file
//  mdtype <input.md> <output.pdf>    - Writes <output>.typ beside the PDF, then runs typst compile
//
// Application settings (renderer command, typst binary, asset directory) come from
// mdtype-config: built-in defaults, then ./mdtype.toml, then --config, then flags.
//
// Progress goes to stdout, diagnostics go through tracing on stderr (filter with MDTYPE_LOG).

mod targets;

use clap::{Arg, ArgAction, Command, ValueHint};
use mdtype_config::{ConfigError, Loader, MdtypeConfig, LOCAL_CONFIG_FILE};
use mdtype_core::publish::{publish, PublishEvent, PublishSpec};
use std::path::{Path, PathBuf};
use targets::Targets;
use tracing::debug;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;

const LOG_ENV_VAR: &str = "MDTYPE_LOG";

fn build_cli() -> Command {
    Command::new("mdtype")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Markdown with Mermaid diagrams to Typst")
        .long_about(
            "mdtype converts a Markdown document to Typst markup.\n\n\
            Mermaid code blocks are rendered to PNG with the Mermaid CLI (mmdc) and embedded as\n\
            figures. Document settings (font, numbering, headers and footers, page breaks) are\n\
            read from the YAML frontmatter.\n\n\
            Examples:\n  \
            mdtype document.md              # Creates document.typ\n  \
            mdtype document.md output.typ   # Creates output.typ\n  \
            mdtype document.md output.pdf   # Creates output.typ and compiles to output.pdf\n  \
            mdtype README.md report.pdf     # Creates report.typ and report.pdf"
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Input Markdown file")
                .required(true)
                .index(1)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output")
                .help("Output Typst file, or a PDF to compile to")
                .long_help(
                    "Output path.\n\n\
                    Defaults to the input name with a .typ extension. When the path ends in .pdf,\n\
                    the Typst file is written beside it and compiled with typst."
                )
                .required(false)
                .index(2)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a mdtype.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("asset-dir")
                .long("asset-dir")
                .value_name("NAME")
                .help("Directory, next to the output, for diagrams and logos")
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("no-diagrams")
                .long("no-diagrams")
                .help("Do not render mermaid diagrams")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only print errors")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let matches = build_cli().get_matches();
    init_tracing();

    let input = matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            eprintln!("Error: an input file is required");
            std::process::exit(1);
        });
    let output = matches.get_one::<String>("output").map(PathBuf::from);

    let config = load_cli_config(
        matches.get_one::<String>("config").map(|s| s.as_str()),
        matches.get_one::<String>("asset-dir").map(|s| s.as_str()),
        matches.get_flag("no-diagrams"),
    );
    let progress = config.output.progress && !matches.get_flag("quiet");

    handle_convert_command(&input, output.as_deref(), &config, progress);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();
    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}

fn load_cli_config(
    explicit_path: Option<&str>,
    asset_dir: Option<&str>,
    no_diagrams: bool,
) -> MdtypeConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    let result = apply_overrides(loader, asset_dir, no_diagrams).and_then(Loader::build);
    let config = result.unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    });
    debug!(?config, "loaded configuration");
    config
}

fn apply_overrides(
    loader: Loader,
    asset_dir: Option<&str>,
    no_diagrams: bool,
) -> Result<Loader, ConfigError> {
    let loader = match asset_dir {
        Some(name) => loader.set_override("output.asset_dir", name)?,
        None => loader,
    };
    if no_diagrams {
        loader.set_override("diagrams.enabled", false)
    } else {
        Ok(loader)
    }
}

/// Handle a conversion: publish, printing progress as it happens.
fn handle_convert_command(
    input: &Path,
    output: Option<&Path>,
    config: &MdtypeConfig,
    progress: bool,
) {
    let targets = Targets::resolve(input, output);

    let mut spec = PublishSpec::new(input, &targets.typst).with_asset_dir(&config.output.asset_dir);
    spec = if config.diagrams.enabled {
        spec.with_render_options((&config.diagrams).into())
    } else {
        spec.without_diagrams()
    };
    if let Some(pdf) = &targets.pdf {
        spec = spec.with_pdf(pdf);
    }
    if let Some(typst) = &config.compile.typst {
        spec = spec.with_typst(typst);
    }

    if progress {
        println!("Converting: {}", input.display());
        match &targets.pdf {
            Some(pdf) => println!(
                "Output to: {} (via {})\n",
                pdf.display(),
                file_name(&targets.typst)
            ),
            None => println!("Output to: {}\n", targets.typst.display()),
        }
    }

    let mut written = false;
    let result = publish(&spec, |event| {
        if matches!(event, PublishEvent::Written(_)) {
            written = true;
        }
        if progress {
            report(&event);
        }
    });

    match result {
        Ok(_) => {}
        Err(err) if written => {
            eprintln!("✗ PDF compilation failed: {err}");
            eprintln!("  Make sure Typst is installed: https://github.com/typst/typst/releases");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn report(event: &PublishEvent<'_>) {
    match event {
        PublishEvent::Parsing(_) => println!("Parsing markdown..."),
        PublishEvent::Parsed {
            diagrams,
            has_page_bands,
        } => {
            println!("Found {diagrams} mermaid diagram(s)\n");
            if *has_page_bands {
                println!("Found header/footer configuration in frontmatter\n");
            }
        }
        PublishEvent::Rendering { .. } => println!("Rendering mermaid diagrams..."),
        PublishEvent::DiagramRendered(diagram) => {
            println!("✓ Rendered {}", file_name(&diagram.image_path));
        }
        PublishEvent::DiagramFailed { block, error } => {
            eprintln!("✗ Failed to render {}: {error}", block.id);
        }
        PublishEvent::DiagramsSkipped { count, reason } => {
            eprintln!("✗ Skipped {count} mermaid diagram(s): {reason}");
        }
        PublishEvent::RenderFinished { .. } => println!(),
        PublishEvent::Converting => println!("Converting to Typst..."),
        PublishEvent::Written(path) => println!("✓ Typst file created: {}", path.display()),
        PublishEvent::Compiling(_) => println!("\nCompiling to PDF..."),
        PublishEvent::Compiled(path) => println!("✓ PDF generated: {}", path.display()),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
