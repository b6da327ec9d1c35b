use std::path::PathBuf;

use crate::{
    ast::ast::{ExprKind, StmtKind},
    errors::errors::ErrorImpl,
    module::graph::ModuleGraph,
    parse_module,
};

use super::{
    scope::{Scope, ScopeStack},
    ty::{Layout, StructState, Ty, TyArena},
    type_checker::TypeChecker,
    waiting::{WaitingKind, WaitingRequest, WaitingRequestMap},
};

fn graph(sources: &[(&str, &str)]) -> ModuleGraph {
    let mut graph = ModuleGraph::new();
    for (path, source) in sources {
        let (module, errors) = parse_module(PathBuf::from(path), source);
        assert!(errors.is_empty(), "{}: {:?}", path, errors);
        graph.add(module);
    }
    graph
}

fn check(sources: &[(&str, &str)]) -> TypeChecker {
    let mut checker = TypeChecker::new(graph(sources));
    checker.check();
    checker
}

fn check_one(source: &str) -> TypeChecker {
    check(&[("/virtual/main.syn", source)])
}

fn error_names(checker: &TypeChecker) -> Vec<&str> {
    checker
        .errors()
        .iter()
        .map(|error| error.get_error_name())
        .collect()
}

fn assert_clean(checker: &TypeChecker) {
    let messages: Vec<String> = checker.errors().iter().map(|e| e.to_string()).collect();
    assert!(messages.is_empty(), "{:?}", messages);
}

#[test]
fn test_layouts() {
    let checker = check_one(
        r#"
        type Empty struct {}
        type Point struct { x: i32, y: i32 }
        type Node struct { value: i32, name: string, next: *Node }
        "#,
    );

    assert_clean(&checker);
    assert_eq!(
        checker.struct_layout(0, "Empty"),
        Some(Layout { width: 0, align: 1 })
    );
    assert_eq!(
        checker.struct_layout(0, "Point"),
        Some(Layout { width: 8, align: 4 })
    );
    assert_eq!(
        checker.struct_layout(0, "Node"),
        Some(Layout {
            width: 20,
            align: 8
        })
    );
}

#[test]
fn test_forward_reference_either_order() {
    for source in [
        "type A struct { b: B } type B struct { x: i32 }",
        "type B struct { x: i32 } type A struct { b: B }",
    ] {
        let checker = check_one(source);

        assert_clean(&checker);
        assert_eq!(
            checker.struct_layout(0, "A"),
            Some(Layout { width: 4, align: 4 }),
            "{}",
            source
        );
        assert!(checker.waiting_map(0).map_or(true, |map| map.is_empty()));
    }
}

#[test]
fn test_forward_reference_patches_field() {
    let checker = check_one("type A struct { b: B } type B struct { x: i32 }");

    let a = checker.lookup_in_module(0, "A").unwrap();
    let b = checker.lookup_in_module(0, "B").unwrap();
    let fields = &checker.types().as_struct(a).unwrap().fields;

    assert_eq!(fields[0].name, "b");
    assert_eq!(fields[0].ty, b);
}

#[test]
fn test_chain_resolves_in_one_pass() {
    let checker = check_one(
        r#"
        type A struct { b: B, c: C }
        type B struct { c: C, d: D }
        type C struct { d: D }
        type D struct { x: i32 }
        "#,
    );

    assert_clean(&checker);
    assert_eq!(checker.struct_layout(0, "D").unwrap().width, 4);
    assert_eq!(checker.struct_layout(0, "C").unwrap().width, 4);
    assert_eq!(checker.struct_layout(0, "B").unwrap().width, 8);
    assert_eq!(checker.struct_layout(0, "A").unwrap().width, 12);
}

#[test]
fn test_cycle_is_reported() {
    let checker = check_one(
        r#"
        type A struct { b: B }
        type B struct { c: C }
        type C struct { a: A }
        "#,
    );

    assert_eq!(error_names(&checker), vec!["UnresolvedStruct"; 3]);
    assert_eq!(checker.waiting_map(0).unwrap().len(), 3);
    assert!(checker.struct_layout(0, "A").is_none());

    let expected = ErrorImpl::UnresolvedStruct {
        name: String::from("A"),
        field: String::from("b"),
        waiting_for: String::from("B"),
    };
    assert_eq!(checker.errors()[0].get_impl(), &expected);
}

#[test]
fn test_self_embedding() {
    let checker = check_one("type List struct { value: i32, rest: List }");

    assert_eq!(
        checker.errors()[0].to_string(),
        "struct 'List' never resolved: field 'rest' waits on 'List'"
    );
    assert_eq!(checker.errors().len(), 1);
}

/// `S0` is 16 bytes and every `Sn` holds sixteen `S(n-1)` by value, so
/// `S7` is 2^32 bytes wide.
fn nested_structs(levels: usize, reversed: bool) -> String {
    let mut decls = vec![String::from("type S0 struct { a: i32, b: i32, c: i32, d: i32 }")];
    for level in 1..=levels {
        let fields: Vec<String> = (0..16).map(|i| format!("f{}: S{}", i, level - 1)).collect();
        decls.push(format!("type S{} struct {{ {} }}", level, fields.join(", ")));
    }
    if reversed {
        decls.reverse();
    }
    decls.join("\n")
}

#[test]
fn test_struct_too_large() {
    for reversed in [false, true] {
        let checker = check_one(&nested_structs(8, reversed));

        assert_eq!(error_names(&checker), vec!["StructTooLarge"]);
        assert_eq!(
            checker.errors()[0].get_impl(),
            &ErrorImpl::StructTooLarge {
                name: String::from("S7")
            }
        );
        assert_eq!(checker.struct_layout(0, "S6").unwrap().width, 1 << 28);
        assert!(checker.struct_layout(0, "S7").is_none());
        assert!(checker.struct_layout(0, "S8").is_none());

        let s8 = checker.lookup_in_module(0, "S8").unwrap();
        assert_eq!(
            checker.types().as_struct(s8).unwrap().state,
            StructState::Errored
        );
    }
}

#[test]
fn test_local_cycle_is_reported() {
    let checker = check_one("fn f() { type L struct { l: L } }");

    assert_eq!(error_names(&checker), vec!["UnresolvedStruct"]);
    assert_eq!(
        checker.errors()[0].to_string(),
        "struct 'L' never resolved: field 'l' waits on 'L'"
    );
}

#[test]
fn test_local_and_module_structs_are_swept_in_order() {
    let checker = check_one(
        r#"
        type A struct { a: A }
        fn f() { type B struct { b: B } }
        "#,
    );

    let names: Vec<String> = checker
        .errors()
        .iter()
        .filter_map(|error| match error.get_impl() {
            ErrorImpl::UnresolvedStruct { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_cycle_without_sweep() {
    let mut checker = TypeChecker::new(graph(&[(
        "/virtual/main.syn",
        "type A struct { b: B } type B struct { a: A }",
    )]))
    .with_sweep(false);

    assert_eq!(checker.check(), 0);
    assert_eq!(checker.waiting_map(0).unwrap().len(), 2);
}

#[test]
fn test_pointer_breaks_cycle() {
    let checker = check_one("type A struct { b: *B } type B struct { a: A }");

    assert_clean(&checker);
    assert_eq!(
        checker.struct_layout(0, "B"),
        Some(Layout { width: 8, align: 8 })
    );
}

#[test]
fn test_error_in_awaited_struct_does_not_cascade() {
    for source in [
        "type A struct { b: B } type B struct { x: Missing }",
        "type B struct { x: Missing } type A struct { b: B }",
    ] {
        let checker = check_one(source);

        assert_eq!(error_names(&checker), vec!["IdentifierNotFound"], "{}", source);
        let a = checker.lookup_in_module(0, "A").unwrap();
        assert_eq!(
            checker.types().as_struct(a).unwrap().state,
            StructState::Errored
        );
    }
}

#[test]
fn test_struct_already_declared() {
    let checker = check_one("type P struct { x: i32 } type P struct { y: i32 }");

    assert_eq!(error_names(&checker), vec!["StructAlreadyDeclared"]);
    assert_eq!(checker.struct_layout(0, "P").unwrap().width, 4);
}

#[test]
fn test_field_of_non_type() {
    let checker = check_one("fn f() {} type P struct { x: f }");

    assert_eq!(error_names(&checker), vec!["NotAType"]);
}

#[test]
fn test_let_binds_value_type() {
    let checker = check_one(r#"let x = "hi"; let y: i32 = x;"#);

    assert_eq!(
        checker.errors()[0].to_string(),
        "types do not match: expected 'i32', found 'string'"
    );

    let module = checker.graph().get(0).unwrap();
    let StmtKind::VarDecl(decl) = &module.stmt_at(0).unwrap().kind else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.ty, Some(checker.builtins().string));

    let StmtKind::VarDecl(decl) = &module.stmt_at(1).unwrap().kind else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.value.as_ref().unwrap().ty, Some(checker.builtins().string));
    assert_eq!(decl.ty, Some(checker.builtins().int32));
}

#[test]
fn test_lookup_is_stable() {
    let checker = check_one("type P struct { x: i32 } let a: P; let b: P; a; a;");

    assert_clean(&checker);
    assert_eq!(
        checker.lookup_in_module(0, "P"),
        checker.lookup_in_module(0, "P")
    );

    let module = checker.graph().get(0).unwrap();
    let ty_of = |idx: usize| match &module.stmt_at(idx).unwrap().kind {
        StmtKind::Expression(stmt) => stmt.expression.ty,
        StmtKind::VarDecl(decl) => decl.ty,
        _ => None,
    };

    assert_eq!(ty_of(1), checker.lookup_in_module(0, "P"));
    assert_eq!(ty_of(1), ty_of(2));
    assert_eq!(ty_of(3), ty_of(4));
}

#[test]
fn test_qualified_name_without_import() {
    let checker = check_one("let p: geo.Point;");

    assert_eq!(
        checker.errors()[0].get_impl(),
        &ErrorImpl::UnknownModule {
            alias: String::from("geo")
        }
    );
}

#[test]
fn test_qualified_name_missing_in_module() {
    let checker = check(&[
        ("/virtual/main.syn", r#"import "geo"; let p: geo.Line;"#),
        ("/virtual/geo.syn", "type Point struct { x: i32 }"),
    ]);

    assert_eq!(
        checker.errors()[0].get_impl(),
        &ErrorImpl::NotFoundInModule {
            ident: String::from("Line"),
            module: String::from("geo")
        }
    );
}

#[test]
fn test_imported_struct_by_value() {
    let checker = check(&[
        (
            "/virtual/a.syn",
            r#"import "b"; type Line struct { from: b.Point, to: b.Point }"#,
        ),
        ("/virtual/b.syn", "type Point struct { x: i32, y: i32 }"),
    ]);

    assert_clean(&checker);
    assert_eq!(checker.order(), &[1, 0]);
    assert_eq!(
        checker.struct_layout(0, "Line"),
        Some(Layout {
            width: 16,
            align: 4
        })
    );
}

#[test]
fn test_mutual_imports() {
    let checker = check(&[
        ("/virtual/a.syn", r#"import "b"; type A struct { b: *b.B }"#),
        ("/virtual/b.syn", r#"import "a"; type B struct { a: a.A }"#),
    ]);

    assert_clean(&checker);
    assert_eq!(checker.struct_layout(1, "B").unwrap().width, 8);
}

#[test]
fn test_module_functions() {
    let checker = check(&[
        ("/virtual/main.syn", r#"import "math"; let x: i32 = math.add(1, 2);"#),
        (
            "/virtual/math.syn",
            "fn add(a: i32, b: i32): i32 { return a + b; }",
        ),
    ]);

    assert_clean(&checker);
}

#[test]
fn test_check_mod_is_memoized() {
    let mut checker = TypeChecker::new(graph(&[("/virtual/main.syn", "type P struct {}")]));

    let first = checker.check_mod(0);
    let second = checker.check_mod(0);
    assert!(first.is_some());
    assert_eq!(first, second);
    assert!(checker.check_mod(7).is_none());
}

#[test]
fn test_function_calls() {
    let cases = [
        ("add(1, 2);", vec![]),
        ("add(1);", vec!["MissingArguments"]),
        ("add(1, 2, 3);", vec!["UnexpectedArguments"]),
        (r#"add("one", 2);"#, vec!["TypeMatchError"]),
        (r#"printf("%d %d", 1, 2);"#, vec![]),
        ("printf();", vec!["MissingArguments"]),
        ("let x = 1; x();", vec!["NotCallable"]),
        ("missing();", vec!["IdentifierNotFound"]),
    ];

    for (call, expected) in cases {
        let source = format!(
            "fn add(a: i32, b: i32): i32 {{ return a + b; }} extern fn printf(fmt: string, ...): i32; {}",
            call
        );
        let checker = check_one(&source);
        assert_eq!(error_names(&checker), expected, "{}", call);
    }
}

#[test]
fn test_returns() {
    let cases = [
        ("fn f(): i32 { return 1; }", vec![]),
        (r#"fn f(): i32 { return "s"; }"#, vec!["TypeMatchError"]),
        ("fn f(): i32 { return; }", vec!["TypeMatchError"]),
        ("fn f() { return; }", vec![]),
        ("return 1;", vec!["ReturnOutsideFunction"]),
        ("fn f(): i32 { if 1 { return 1; } return 0; }", vec![]),
    ];

    for (source, expected) in cases {
        assert_eq!(error_names(&check_one(source)), expected, "{}", source);
    }
}

#[test]
fn test_recursive_function() {
    let checker = check_one("fn fact(n: i32): i32 { if n < 2 { return 1; } return n * fact(n - 1); }");

    assert_clean(&checker);
}

#[test]
fn test_structs_in_expressions() {
    let prelude = "type P struct { x: i32, next: *P }";
    let cases = [
        ("let p = P { x: 1 }; let y: i32 = p.x;", vec![]),
        ("let p = P { x: 1 }; p.z;", vec!["NoSuchField"]),
        ("let p = P { q: 1 };", vec!["NoSuchField"]),
        (r#"let p = P { x: "s" };"#, vec!["TypeMatchError"]),
        ("let p = new P { x: 1 }; let q: P = *p; let n: *P = q.next;", vec![]),
        ("let x = 1; x.y;", vec!["NotScoped"]),
        ("let x = 1; let y = x { a: 1 };", vec!["NotAStruct"]),
    ];

    for (body, expected) in cases {
        let source = format!("{} {}", prelude, body);
        assert_eq!(error_names(&check_one(&source)), expected, "{}", body);
    }
}

#[test]
fn test_operators() {
    let cases = [
        ("let x = 1 + 2 * 3 % 4;", vec![]),
        (r#"let x = "a" + 1;"#, vec!["OperandTypeError"]),
        (r#"let x = 1 == "a";"#, vec!["TypeMatchError"]),
        (r#"let x = "a" != "b";"#, vec![]),
        ("let x = -1; let y = !x;", vec![]),
        (r#"let x = -"a";"#, vec!["OperandTypeError"]),
        ("1 = 2;", vec!["NotAssignable"]),
        (r#"let x = 1; x = "s";"#, vec!["TypeMatchError"]),
        ("let x = 1; let p = &x; *p = 2; let q: **i32 = &p;", vec![]),
        ("let x = 1; *x;", vec!["OperandTypeError"]),
        (r#"let x: i32 = "s" as i32;"#, vec![]),
    ];

    for (source, expected) in cases {
        assert_eq!(error_names(&check_one(source)), expected, "{}", source);
    }
}

#[test]
fn test_statements() {
    let cases = [
        ("let x = 1; if x { let y = x; } else { let z = x; }", vec![]),
        (r#"if "s" { }"#, vec!["TypeMatchError"]),
        ("let p = new 1; while p { delete p; }", vec![]),
        ("let x = 1; delete x;", vec!["OperandTypeError"]),
        ("{ let inner = 1; } inner;", vec!["IdentifierNotFound"]),
        (
            "fn f() { type Local struct { x: i32 } let l = Local { x: 1 }; }",
            vec![],
        ),
        (r#"if "s" { missing; }"#, vec!["TypeMatchError", "IdentifierNotFound"]),
    ];

    for (source, expected) in cases {
        assert_eq!(error_names(&check_one(source)), expected, "{}", source);
    }
}

#[test]
fn test_expression_types_are_recorded() {
    let checker = check_one("let x = 1; let p = &x;");
    let module = checker.graph().get(0).unwrap();

    let StmtKind::VarDecl(decl) = &module.stmt_at(1).unwrap().kind else {
        panic!("expected a variable declaration");
    };
    let value = decl.value.as_ref().unwrap();
    assert!(matches!(value.kind, ExprKind::Prefix(_)));
    assert_eq!(checker.types().ty_to_string(value.ty.unwrap()), "*i32");
}

#[test]
fn test_arena_pointers() {
    let mut types = TyArena::new();
    let int = types.alloc(Ty::Int32);

    let one = types.pointer(int, 1);
    let three = types.pointer(one, 2);
    assert_eq!(types.ty_to_string(three), "***i32");
    let spelled_out = types.pointer(int, 3);
    assert!(types.types_equal(spelled_out, three));
    assert!(!types.types_equal(one, three));

    let two = types.deref(three).unwrap();
    assert_eq!(types.ty_to_string(two), "**i32");
    assert_eq!(types.deref(one), Some(int));
    assert_eq!(types.deref(int), None);
    assert_eq!(types.pointer(int, 0), int);

    let deep = types.pointer(int, u32::MAX);
    let deeper = types.pointer(deep, 1);
    assert!(matches!(types[deeper], Ty::Pointer { count: u32::MAX, .. }));
}

#[test]
fn test_arena_fill_width_align() {
    let mut types = TyArena::new();
    let int = types.alloc(Ty::Int32);
    assert_eq!(types.fill_width_align(int), Ok(true));

    let unknown = types.alloc(Ty::Unknown);
    assert_eq!(types.fill_width_align(unknown), Ok(false));
    assert!(types.is_initialized(unknown));
}

#[test]
fn test_scope_stack() {
    let mut types = TyArena::new();
    let int = types.alloc(Ty::Int32);
    let string = types.alloc(Ty::String);

    let mut globals = Scope::new();
    globals.bind("i32", int);

    let mut stack = ScopeStack::for_module(string);
    assert_eq!(stack.depth(), 3);
    assert_eq!(stack.lookup("i32", &globals, &types), Some(int));

    stack.open();
    assert_eq!(stack.bind("x", int), Some(false));
    assert_eq!(stack.bind("x", string), Some(true));
    assert_eq!(stack.lookup("x", &globals, &types), Some(string));

    assert!(stack.close().is_some());
    assert!(stack.close().is_some());
    assert_eq!(stack.lookup("x", &globals, &types), None);

    // Shared scopes stay
    assert!(stack.close().is_none());
    assert_eq!(stack.depth(), 2);
    assert_eq!(stack.bind("y", int), None);
    assert_eq!(stack.module(), Some(string));
}

#[test]
fn test_waiting_map_order() {
    let mut types = TyArena::new();
    let a = types.alloc(Ty::Int32);
    let b = types.alloc(Ty::Int32);
    let c = types.alloc(Ty::Int32);

    let request = |field_idx, to_fill, waiting_for| WaitingRequest {
        kind: WaitingKind::StructField,
        field_idx,
        to_fill,
        to_fill_mod: 0,
        waiting_for,
        waiting_for_mod: 0,
    };

    let mut map = WaitingRequestMap::new();
    map.add("B", request(0, a, b));
    map.add("B", request(1, a, b));
    map.add("B", request(0, c, a));
    map.add("C", request(2, a, c));
    assert_eq!(map.len(), 4);
    assert_eq!(map.get("B").len(), 3);
    assert!(map.get("Z").is_empty());

    let taken = map.take("B", b);
    assert_eq!(
        taken.iter().map(|r| r.field_idx).collect::<Vec<_>>(),
        vec![0, 1]
    );
    assert_eq!(map.get("B").len(), 1);
    assert!(map.take("B", b).is_empty());
    assert_eq!(map.len(), 2);
}
