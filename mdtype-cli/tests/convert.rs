use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const DOC: &str = "---
title: Quarterly report
numbered_headings: true
footer:
  center: \"Page {page} of {total-pages}\"
---
# Quarterly report

<!-- toc -->

## Summary

Revenue grew by $5.

```sh
echo done
```
";

#[test]
fn writes_typ_next_to_input_by_default() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.md");
    fs::write(&input, DOC).unwrap();

    let mut cmd = cargo_bin_cmd!("mdtype");
    let assert = cmd.arg(&input).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    let mut offset = 0;
    for line in [
        "Converting:",
        "Output to:",
        "Parsing markdown...",
        "Found 0 mermaid diagram(s)",
        "Found header/footer configuration in frontmatter",
        "Converting to Typst...",
        "✓ Typst file created:",
    ] {
        let position = stdout[offset..]
            .find(line)
            .unwrap_or_else(|| panic!("missing or out of order: {line:?}\n\n{stdout}"));
        offset += position + line.len();
    }
    assert!(!stdout.contains("Rendering mermaid diagrams..."));

    let typst = fs::read_to_string(dir.path().join("report.typ")).unwrap();
    assert!(typst.contains("#heading(level: 1, outlined: false)[Quarterly report]"));
    assert!(typst.contains("#outline(depth: 4)"));
    assert!(typst.contains("Revenue grew by \\$5."));
    assert!(typst.contains("context [Page #counter(page).display() of #counter(page).final().last()]"));
    assert!(typst.contains("numbering(\"1.1\", ..nums.pos().slice(1))"));
    assert!(typst.contains("#block(breakable: false)[\n"));
}

#[test]
fn explicit_typ_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.md");
    let output = dir.path().join("out.typ");
    fs::write(&input, "Hello *world*\n").unwrap();

    cargo_bin_cmd!("mdtype")
        .arg(&input)
        .arg(&output)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let typst = fs::read_to_string(output).unwrap();
    assert!(typst.ends_with("Hello _world_\n\n"));
    assert!(!dir.path().join("notes.typ").exists());
}

#[test]
fn missing_input_fails() {
    let dir = tempdir().unwrap();
    cargo_bin_cmd!("mdtype")
        .arg(dir.path().join("absent.md"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
    assert!(!dir.path().join("absent.typ").exists());
}

#[test]
fn malformed_frontmatter_still_converts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.md");
    fs::write(&input, "---\ntitle: [unclosed\n---\nBody text\n").unwrap();

    cargo_bin_cmd!("mdtype")
        .arg(&input)
        .arg("-q")
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to parse YAML frontmatter"));

    let typst = fs::read_to_string(dir.path().join("broken.typ")).unwrap();
    assert!(typst.contains("Body text"));
    assert!(typst.starts_with("#set block(sticky: true)"));
}

#[test]
fn no_arguments_prints_help() {
    cargo_bin_cmd!("mdtype")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
