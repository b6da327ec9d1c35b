use std::path::{Path, PathBuf};

use crate::{errors::errors::ErrorImpl, parse_module};

use super::{graph::normalize, graph::ModuleGraph, module::Module, order::compilation_order};

fn parsed(path: &str, source: &str) -> Module {
    let (module, errors) = parse_module(PathBuf::from(path), source);
    assert!(errors.is_empty(), "{:?}", errors);
    module
}

#[test]
fn test_module_indexes_declarations() {
    let module = parsed(
        "/virtual/main.syn",
        r#"
        import "geo";
        import io;
        type Point struct { x: i32 }
        fn main(): i32 { return 0; }
        extern fn puts(s: string): i32;
        let x = 1;
        "#,
    );

    assert_eq!(module.num_stmts(), 6);
    assert_eq!(module.num_imports(), 2);
    assert_eq!(module.num_functions(), 2);
    assert_eq!(module.num_structs(), 1);

    assert_eq!(module.import_at(0).unwrap().path, "geo.syn");
    assert_eq!(module.import_at(1).unwrap().alias, "io");
    assert_eq!(module.function_at(1).unwrap().name, "puts");
    assert!(module.function_at(1).unwrap().is_extern);
    assert_eq!(module.struct_at(0).unwrap().name, "Point");
    assert!(module.import_at(2).is_none());
    assert_eq!(module.get_name(), "main");
}

#[test]
fn test_set_stmt_at_keeps_kind() {
    let mut module = parsed("/virtual/a.syn", "let x = 1; type S struct {}");
    let replacement = module.stmt_at(1).unwrap().clone();

    assert!(!module.set_stmt_at(0, replacement.clone()));
    assert!(module.set_stmt_at(1, replacement));
    let first = module.stmt_at(0).unwrap().clone();
    assert!(!module.set_stmt_at(5, first));
}

#[test]
fn test_graph_indices() {
    let mut graph = ModuleGraph::with_capacity(2);
    let a = graph.add(parsed("/virtual/a.syn", ""));
    let b = graph.add(parsed("/virtual/b.syn", ""));

    assert_eq!((a, b), (0, 1));
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.get(b).unwrap().get_idx(), Some(1));
    assert_eq!(graph.by_path(Path::new("/virtual/./a.syn")), Some(0));
    assert_eq!(graph.add(parsed("/virtual/a.syn", "")), 0);
    assert_eq!(graph.len(), 2);
}

#[test]
fn test_normalize() {
    assert_eq!(
        normalize(Path::new("/virtual/lib/../geo.syn")),
        PathBuf::from("/virtual/geo.syn")
    );
    assert_eq!(normalize(Path::new("./a/./b")), PathBuf::from("a/b"));
    assert_eq!(normalize(Path::new("../a")), PathBuf::from("../a"));
    assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
}

#[test]
fn test_resolve_import_relative_to_importer() {
    let mut graph = ModuleGraph::new();
    let main = graph.add(parsed("/virtual/app/main.syn", r#"import "../lib/geo";"#));
    let geo = graph.add(parsed("/virtual/lib/geo.syn", ""));

    let path = &graph.get(main).unwrap().import_at(0).unwrap().path;
    assert_eq!(graph.resolve_import(main, path), Ok(geo));
}

#[test]
fn test_resolve_missing_import() {
    let mut graph = ModuleGraph::new();
    let main = graph.add(parsed("/virtual/main.syn", ""));

    match graph.resolve_import(main, "missing.syn") {
        Err(ErrorImpl::ImportError { path, reason }) => {
            assert_eq!(path, "/virtual/missing.syn");
            assert!(!reason.is_empty());
        }
        other => panic!("expected an import error, got {:?}", other),
    }
}

#[test]
fn test_resolve_import_not_compiled() {
    let dir = std::env::temp_dir().join(format!("synthium-graph-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("other.syn"), "").unwrap();

    let mut graph = ModuleGraph::new();
    let main = graph.add(Module::new(dir.join("main.syn")));

    let result = graph.resolve_import(main, "other.syn");
    std::fs::remove_dir_all(&dir).unwrap();

    assert!(
        matches!(result, Err(ErrorImpl::ModuleNotCompiled { ref path }) if path.ends_with("other.syn")),
        "{:?}",
        result
    );
}

#[test]
fn test_compilation_order_by_import_count() {
    let mut graph = ModuleGraph::new();
    graph.add(parsed("/virtual/a.syn", r#"import "b"; import "c";"#));
    graph.add(parsed("/virtual/b.syn", r#"import "c";"#));
    graph.add(parsed("/virtual/c.syn", ""));
    graph.add(parsed("/virtual/d.syn", ""));

    assert_eq!(compilation_order(&graph), vec![2, 3, 1, 0]);
}

#[test]
fn test_compilation_order_empty() {
    assert!(compilation_order(&ModuleGraph::new()).is_empty());
}
