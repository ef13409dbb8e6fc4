//! End-to-end rename behaviour through parse -> rename -> print.

use rengo_common::Pos;
use rengo_emitter::print_file;
use rengo_parser::parser::parse_file;
use rengo_rename::{rename, Package, RenameError, ScopeKind, SourceFile};

fn package_of(sources: &[&str]) -> Package {
    let mut pkg = Package::new("p");
    for (index, src) in sources.iter().enumerate() {
        let ast = parse_file(src).expect("source should parse");
        pkg.add_file(SourceFile::new(format!("file{index}.go"), ast));
    }
    pkg
}

fn pos_in(src: &str, needle: &str) -> Pos {
    Pos::new(src.find(needle).expect("needle not in source") as u32)
}

fn printed(pkg: &Package) -> Vec<String> {
    pkg.files.iter().map(|f| print_file(&f.ast)).collect()
}

#[test]
fn local_rename_stays_inside_its_function() {
    let src = "package p\n\nfunc a() {\n\tn := 1\n\tuse(n)\n}\n\nfunc b() {\n\tn := 2\n\tuse(n)\n}\n";
    let mut pkg = package_of(&[src]);
    let scope = rename(&mut pkg, 0, "n", pos_in(src, "n := 1"), "count").expect("rename");
    assert_eq!(scope, ScopeKind::Function(0));
    assert_eq!(
        printed(&pkg)[0],
        "package p\n\nfunc a() {\n\tcount := 1\n\tuse(count)\n}\n\nfunc b() {\n\tn := 2\n\tuse(n)\n}\n"
    );
}

#[test]
fn package_rename_spans_files_and_skips_shadowing_signatures() {
    let a = "package p\n\nvar version = 1\n\nfunc bump() {\n\tversion++\n}\n";
    let b = "package p\n\nfunc report() int {\n\treturn version\n}\n";
    let c = "package p\n\nfunc describe(version string) string {\n\treturn version\n}\n";
    let mut pkg = package_of(&[a, b, c]);
    let scope = rename(&mut pkg, 1, "version", pos_in(b, "return version"), "release")
        .expect("rename");
    assert_eq!(scope, ScopeKind::Package);
    let out = printed(&pkg);
    assert_eq!(
        out[0],
        "package p\n\nvar release = 1\n\nfunc bump() {\n\trelease++\n}\n"
    );
    assert_eq!(
        out[1],
        "package p\n\nfunc report() int {\n\treturn release\n}\n"
    );
    // the parameter is a different binding with the same spelling
    assert_eq!(out[2], c);
}

#[test]
fn receiver_rename_covers_every_use_in_the_method() {
    let src = "package p\n\ntype counter struct {\n\ttotal int\n}\n\nfunc (c *counter) add(n int) {\n\tc.total += n\n\tif n > 0 {\n\t\tc.total++\n\t}\n}\n";
    let mut pkg = package_of(&[src]);
    let scope = rename(&mut pkg, 0, "c", pos_in(src, "c.total +="), "self").expect("rename");
    assert_eq!(scope, ScopeKind::Function(1));
    assert_eq!(
        printed(&pkg)[0],
        "package p\n\ntype counter struct {\n\ttotal int\n}\n\nfunc (self *counter) add(n int) {\n\tself.total += n\n\tif n > 0 {\n\t\tself.total++\n\t}\n}\n"
    );
}

#[test]
fn renaming_a_function_updates_call_sites_in_other_files() {
    let a = "package p\n\nfunc parse(s string) int {\n\treturn len(s)\n}\n";
    let b = "package p\n\nfunc handle(s string) {\n\tuse(parse(s))\n}\n";
    let mut pkg = package_of(&[a, b]);
    let scope = rename(&mut pkg, 0, "parse", pos_in(a, "parse(s string)"), "decode").expect("rename");
    assert_eq!(scope, ScopeKind::Package);
    let out = printed(&pkg);
    assert_eq!(out[0], "package p\n\nfunc decode(s string) int {\n\treturn len(s)\n}\n");
    assert_eq!(out[1], "package p\n\nfunc handle(s string) {\n\tuse(decode(s))\n}\n");
}

#[test]
fn failed_rename_leaves_every_file_untouched() {
    let a = "package p\n\nvar x int\n";
    let b = "package p\n\nfunc f() {\n\tuse(x)\n}\n";
    let mut pkg = package_of(&[a, b]);
    let before = printed(&pkg);
    let err = rename(&mut pkg, 1, "ghost", pos_in(b, "use"), "spirit").unwrap_err();
    assert!(matches!(err, RenameError::NotFound { .. }));
    assert_eq!(printed(&pkg), before);
}

#[test]
fn renamed_output_reparses_to_the_same_text() {
    let src = "package p\n\nvar registry = map[string]int{}\n\nfunc record(key string) {\n\tif n, ok := registry[key]; ok {\n\t\tregistry[key] = n + 1\n\t} else {\n\t\tregistry[key] = 1\n\t}\n}\n";
    let mut pkg = package_of(&[src]);
    rename(&mut pkg, 0, "registry", pos_in(src, "registry[key]; ok"), "index")
        .expect("rename");
    let first = printed(&pkg)[0].clone();
    let reparsed = parse_file(&first).expect("renamed output should parse");
    assert_eq!(print_file(&reparsed), first);
    assert!(first.contains("var index = map[string]int{}"));
    assert!(!first.contains("registry"));
}

#[test]
fn renamed_binding_is_locatable_at_the_same_position() {
    let src = "package p\n\nfunc f() {\n\ttotal := 0\n\ttotal++\n}\n";
    let mut pkg = package_of(&[src]);
    let pos = pos_in(src, "total := 0");
    let scope = rename(&mut pkg, 0, "total", pos, "sum").expect("rename");
    assert_eq!(scope, ScopeKind::Function(0));
    // the new name resolves at the very same position in the reprinted file
    let reprinted = printed(&pkg)[0].clone();
    let mut pkg = package_of(&[&reprinted]);
    let scope = rename(&mut pkg, 0, "sum", pos, "sum").expect("relocate");
    assert_eq!(scope, ScopeKind::Function(0));
}

#[test]
fn method_with_receiver_named_like_the_target_keeps_its_body() {
    let a = "package p\n\nvar count int\n\nfunc bump() {\n\tcount++\n}\n";
    let b = "package p\n\ntype box struct{}\n\nfunc (count box) show() {\n\tprint(count)\n}\n";
    let mut pkg = package_of(&[a, b]);
    let scope = rename(&mut pkg, 0, "count", pos_in(a, "count++"), "total").expect("rename");
    assert_eq!(scope, ScopeKind::Package);
    let out = printed(&pkg);
    assert_eq!(
        out[0],
        "package p\n\nvar total int\n\nfunc bump() {\n\ttotal++\n}\n"
    );
    assert_eq!(out[1], b);
}

#[test]
fn shadowed_region_survives_a_package_rename() {
    let src = "package p\n\nvar state = 0\n\nfunc step() {\n\tstate = 1\n\tstate := 2\n\tuse(state)\n}\n";
    let mut pkg = package_of(&[src]);
    rename(&mut pkg, 0, "state", pos_in(src, "var state"), "phase").expect("rename");
    assert_eq!(
        printed(&pkg)[0],
        "package p\n\nvar phase = 0\n\nfunc step() {\n\tphase = 1\n\tstate := 2\n\tuse(state)\n}\n"
    );
}
