//! Driver behind the `rengo` binary: read a package's files, resolve the
//! requested occurrence, rename, and write the result back or print it.

pub mod args;
pub mod tracing_config;

use std::fs;

use anyhow::{bail, Context, Result};
use tracing::info;

use rengo_common::LineMap;
use rengo_emitter::print_file;
use rengo_parser::parser::parse_file;
use rengo_rename::{rename, Package, ScopeKind, SourceFile};

use crate::args::CliArgs;

pub fn run(args: CliArgs) -> Result<()> {
    let mut sources = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        sources.push(text);
    }

    let mut pkg = Package::default();
    for (path, text) in args.files.iter().zip(&sources) {
        let ast = parse_file(text).with_context(|| format!("parsing {}", path.display()))?;
        if pkg.files.is_empty() {
            pkg.name = ast.package.name.clone();
        } else if ast.package.name != pkg.name {
            bail!(
                "{} declares package {}, expected {}",
                path.display(),
                ast.package.name,
                pkg.name
            );
        }
        pkg.add_file(SourceFile::new(path.display().to_string(), ast));
    }

    let line_map = LineMap::build(&sources[0]);
    let pos = args
        .at
        .resolve(&line_map)
        .with_context(|| format!("position is outside {}", args.files[0].display()))?;

    let scope = rename(&mut pkg, 0, &args.name, pos, &args.to)
        .with_context(|| format!("renaming `{}`", args.name))?;
    match scope {
        ScopeKind::Function(_) => info!(name = %args.name, to = %args.to, "renamed local binding"),
        ScopeKind::Package => {
            info!(name = %args.name, to = %args.to, files = pkg.files.len(), "renamed package binding")
        }
    }

    if args.write {
        for (path, file) in args.files.iter().zip(&pkg.files) {
            fs::write(path, print_file(&file.ast))
                .with_context(|| format!("writing {}", path.display()))?;
        }
    } else {
        let mut out = String::new();
        for file in &pkg.files {
            if pkg.files.len() > 1 {
                out.push_str("// ");
                out.push_str(&file.file_name);
                out.push('\n');
            }
            out.push_str(&print_file(&file.ast));
        }
        print!("{out}");
    }
    Ok(())
}

#[cfg(test)]
mod run_tests {
    use super::*;
    use crate::args::Location;
    use std::path::PathBuf;

    fn write_temp(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).expect("write fixture");
        path
    }

    fn args(files: Vec<PathBuf>, name: &str, to: &str, at: Location) -> CliArgs {
        CliArgs {
            name: name.into(),
            to: to.into(),
            at,
            write: true,
            files,
        }
    }

    #[test]
    fn rewrites_a_package_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = write_temp(&dir, "a.go", "package p\n\nvar total int\n");
        let b = write_temp(
            &dir,
            "b.go",
            "package p\n\nfunc add(n int) {\n\ttotal += n\n}\n",
        );
        // line 3, column 5: the `total` in `var total int`
        let cli = args(vec![a.clone(), b.clone()], "total", "sum", Location::LineColumn(rengo_common::Position::new(3, 5)));
        run(cli).expect("run");
        assert_eq!(
            fs::read_to_string(&a).unwrap(),
            "package p\n\nvar sum int\n"
        );
        assert_eq!(
            fs::read_to_string(&b).unwrap(),
            "package p\n\nfunc add(n int) {\n\tsum += n\n}\n"
        );
    }

    #[test]
    fn refuses_files_from_different_packages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = write_temp(&dir, "a.go", "package p\n\nvar x int\n");
        let b = write_temp(&dir, "b.go", "package q\n\nvar y int\n");
        let err = run(args(vec![a, b], "x", "z", Location::Offset(15))).unwrap_err();
        assert!(err.to_string().contains("expected p"));
    }

    #[test]
    fn surfaces_rename_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = write_temp(&dir, "a.go", "package p\n\nvar x int\n");
        let before = fs::read_to_string(&a).unwrap();
        let err = run(args(vec![a.clone()], "ghost", "spirit", Location::Offset(0))).unwrap_err();
        assert!(format!("{err:#}").contains("ghost"));
        assert_eq!(fs::read_to_string(&a).unwrap(), before);
    }
}
