//! Output path selection.
//!
//! | Arguments                | Typst file          | PDF        |
//! |--------------------------|---------------------|------------|
//! | `doc.md`                 | `doc.typ` beside it | none       |
//! | `doc.md out/report.typ`  | `out/report.typ`    | none       |
//! | `doc.md out/report.pdf`  | `out/report.typ`    | `out/report.pdf` |

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets {
    pub typst: PathBuf,
    pub pdf: Option<PathBuf>,
}

impl Targets {
    pub fn resolve(input: &Path, output: Option<&Path>) -> Self {
        match output {
            Some(output) if is_pdf(output) => Targets {
                typst: output.with_extension("typ"),
                pdf: Some(output.to_path_buf()),
            },
            Some(output) => Targets {
                typst: output.to_path_buf(),
                pdf: None,
            },
            None => Targets {
                typst: input.with_extension("typ"),
                pdf: None,
            },
        }
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
