use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of build_cli() in src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("mdtype")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Markdown with Mermaid diagrams to Typst")
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
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "mdtype", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "mdtype", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "mdtype", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
