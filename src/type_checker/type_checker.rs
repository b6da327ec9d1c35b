use std::collections::{HashMap, VecDeque};

use crate::{
    ast::{
        ast::{Expr, ExprKind, Stmt, StmtKind},
        expressions::{
            AssignmentExpr, BinaryExpr, CallExpr, MemberExpr, PrefixExpr, PrefixOp,
            StructInitExpr,
        },
        statements::{
            BlockStmt, DeleteStmt, FnDeclStmt, IfStmt, ImportStmt, ReturnStmt, StructDeclStmt,
            VarDeclStmt, WhileStmt,
        },
        types::TypeAnnotation,
    },
    errors::errors::{Error, ErrorImpl},
    module::{graph::ModuleGraph, order::compilation_order},
    Span,
};

use super::{
    scope::{Scope, ScopeStack},
    ty::{
        FunctionTy, Layout, LayoutOverflow, ModuleTy, StructField, StructState, StructTy, Ty,
        TyArena, TyId,
    },
    waiting::{WaitingKind, WaitingRequest, WaitingRequestMap},
};

/// Types every module can name without importing anything.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    pub unknown: TyId,
    pub int32: TyId,
    pub string: TyId,
}

/// State of the module currently being checked.
#[derive(Debug, Default)]
struct Context {
    module: Option<usize>,
    /// Import alias to module index
    imports: HashMap<String, usize>,
    scopes: ScopeStack,
    /// Return type of each enclosing function
    returns: Vec<TyId>,
}

impl Context {
    fn for_module(module: usize, module_ty: TyId) -> Self {
        Context {
            module: Some(module),
            imports: HashMap::new(),
            scopes: ScopeStack::for_module(module_ty),
            returns: vec![],
        }
    }
}

/// Checks every module of a [`ModuleGraph`].
///
/// Modules are visited in [`compilation_order`]; an import checks the
/// imported module on the spot, and a module is never checked twice.
/// Structs that embed structs whose layout is not known yet are parked in
/// a [`WaitingRequestMap`] of the awaited struct's module and completed as
/// soon as it resolves.
#[derive(Debug)]
pub struct TypeChecker {
    graph: ModuleGraph,
    types: TyArena,
    globals: Scope,
    builtins: Builtins,
    order: Vec<usize>,
    /// One map per module, created on first use
    waiting: Vec<Option<WaitingRequestMap>>,
    ctx: Context,
    errors: Vec<Error>,
    /// Every struct declared so far, local ones included
    structs: Vec<TyId>,
    sweep: bool,
}

impl TypeChecker {
    pub fn new(graph: ModuleGraph) -> Self {
        let mut types = TyArena::new();
        let builtins = Builtins {
            unknown: types.alloc(Ty::Unknown),
            int32: types.alloc(Ty::Int32),
            string: types.alloc(Ty::String),
        };

        let mut globals = Scope::new();
        globals.bind("i32", builtins.int32);
        globals.bind("string", builtins.string);

        let order = compilation_order(&graph);
        let waiting = (0..graph.len()).map(|_| None).collect();

        TypeChecker {
            graph,
            types,
            globals,
            builtins,
            order,
            waiting,
            ctx: Context::default(),
            errors: vec![],
            structs: vec![],
            sweep: true,
        }
    }

    /// Whether to report structs that never resolved once all modules have
    /// been checked. On by default.
    pub fn with_sweep(mut self, sweep: bool) -> Self {
        self.sweep = sweep;
        self
    }

    /// Checks every module and returns the number of errors found.
    pub fn check(&mut self) -> usize {
        for idx in self.order.clone() {
            self.check_mod(idx);
        }

        if self.sweep {
            self.sweep_unresolved();
        }

        self.errors.len()
    }

    /// Checks module `idx` unless it has been checked already, and returns
    /// its type.
    ///
    /// The module is checked in a context of its own, so this can be called
    /// in the middle of checking another module.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn check_mod(&mut self, idx: usize) -> Option<TyId> {
        if let Some(ty) = self.graph.get(idx)?.ty {
            tracing::trace!("already checked");
            return Some(ty);
        }

        let module_ty = self.declare_module(idx)?;
        let mut statements = self.graph.get_mut(idx)?.take_statements();

        let outer = std::mem::replace(&mut self.ctx, Context::for_module(idx, module_ty));
        for stmt in statements.iter_mut() {
            if let Err(error) = self.check_stmt(stmt, true) {
                self.errors.push(error);
            }
        }
        self.ctx = outer;

        if let Some(module) = self.graph.get_mut(idx) {
            module.restore_statements(statements);
        }

        tracing::debug!(errors = self.errors.len(), "module checked");
        Some(module_ty)
    }

    /// Creates the type of module `idx`: a scope with a placeholder for
    /// every struct it declares.
    fn declare_module(&mut self, idx: usize) -> Option<TyId> {
        let module = self.graph.get(idx)?;
        let name = module.get_name();
        let decls: Vec<(String, Span)> = (0..module.num_structs())
            .filter_map(|i| module.struct_at(i))
            .map(|decl| (decl.name.clone(), decl.name_span.clone()))
            .collect();

        let mut scope = Scope::new();
        let mut ids = Vec::with_capacity(decls.len());
        for (struct_name, span) in decls {
            if scope.contains(&struct_name) {
                self.errors.push(Error::new(
                    ErrorImpl::StructAlreadyDeclared { name: struct_name },
                    span,
                ));
                ids.push(None);
                continue;
            }

            let id = self.types.alloc(Ty::Struct(StructTy::placeholder(
                struct_name.clone(),
                idx,
                span,
            )));
            scope.bind(struct_name, id);
            self.structs.push(id);
            ids.push(Some(id));
        }

        let module_ty = self.types.alloc(Ty::Module(ModuleTy {
            module: idx,
            name,
            scope,
        }));

        let module = self.graph.get_mut(idx)?;
        module.ty = Some(module_ty);
        for (i, id) in ids.into_iter().enumerate() {
            if let Some(decl) = module.struct_at_mut(i) {
                decl.ty = id;
            }
        }

        Some(module_ty)
    }

    fn check_stmt(&mut self, stmt: &mut Stmt, top_level: bool) -> Result<(), Error> {
        let span = stmt.span.clone();

        match &mut stmt.kind {
            StmtKind::Import(import) => self.check_import(import, span),
            StmtKind::StructDecl(decl) => {
                self.check_struct_decl(decl, top_level);
                Ok(())
            }
            StmtKind::VarDecl(decl) => self.check_var_decl(decl),
            StmtKind::FnDecl(decl) => self.check_fn_decl(decl, top_level),
            StmtKind::Expression(stmt) => self.check_expr(&mut stmt.expression).map(|_| ()),
            StmtKind::Block(block) => {
                self.check_block(block);
                Ok(())
            }
            StmtKind::If(stmt) => {
                self.check_if(stmt);
                Ok(())
            }
            StmtKind::While(stmt) => {
                self.check_while(stmt);
                Ok(())
            }
            StmtKind::Return(stmt) => self.check_return(stmt, span),
            StmtKind::Delete(stmt) => self.check_delete(stmt),
        }
    }

    fn check_block(&mut self, block: &mut BlockStmt) {
        self.ctx.scopes.open();
        for stmt in block.iter_mut() {
            if let Err(error) = self.check_stmt(stmt, false) {
                self.errors.push(error);
            }
        }

        if let Some(scope) = self.ctx.scopes.close() {
            tracing::trace!(bindings = scope.len(), "block closed");
        }
    }

    fn check_import(&mut self, import: &ImportStmt, span: Span) -> Result<(), Error> {
        let Some(importer) = self.ctx.module else {
            return Ok(());
        };

        let target = self
            .graph
            .resolve_import(importer, &import.path)
            .map_err(|error| Error::new(error, span))?;
        tracing::debug!(alias = %import.alias, module = target, "import");

        let Some(module_ty) = self.check_mod(target) else {
            return Ok(());
        };

        self.ctx.imports.insert(import.alias.clone(), target);
        self.ctx.scopes.bind(import.alias.clone(), module_ty);
        Ok(())
    }

    fn check_struct_decl(&mut self, decl: &mut StructDeclStmt, top_level: bool) {
        let id = match decl.ty {
            Some(id) => id,
            // Duplicate declaration, reported when the module was declared
            None if top_level => return,
            None => {
                let Some(module) = self.ctx.module else {
                    return;
                };

                let id = self.types.alloc(Ty::Struct(StructTy::placeholder(
                    decl.name.clone(),
                    module,
                    decl.name_span.clone(),
                )));
                self.ctx.scopes.bind(decl.name.clone(), id);
                self.structs.push(id);
                decl.ty = Some(id);
                id
            }
        };

        self.fill_struct(id, decl);
    }

    /// Resolves the fields of struct `id` and computes its layout.
    ///
    /// A field that embeds a struct without a layout gets a provisional
    /// placeholder type and the struct is parked until the embedded struct
    /// resolves. Pointer fields never wait.
    #[tracing::instrument(level = "debug", skip(self, decl), fields(name = %decl.name))]
    fn fill_struct(&mut self, id: TyId, decl: &StructDeclStmt) {
        let Some(owner) = self.types.as_struct(id).map(|s| s.module) else {
            return;
        };

        let mut fields = Vec::with_capacity(decl.fields.len());
        let mut pending = vec![];
        let mut errored = false;

        for (field_idx, field) in decl.fields.iter().enumerate() {
            let base = match self.resolve_type_name(&field.annotation) {
                Ok(base) => base,
                Err(error) => {
                    self.errors.push(error);
                    errored = true;
                    fields.push(StructField {
                        name: field.name.clone(),
                        ty: self.builtins.unknown,
                    });
                    continue;
                }
            };

            let ty = if field.annotation.is_pointer() {
                self.types.pointer(base, field.annotation.pointer_count)
            } else if self.types.is_initialized(base) {
                base
            } else {
                match self.types.as_struct(base).cloned() {
                    Some(awaited) if awaited.state == StructState::Errored => {
                        errored = true;
                        base
                    }
                    Some(awaited) => {
                        pending.push(WaitingRequest {
                            kind: WaitingKind::StructField,
                            field_idx,
                            to_fill: id,
                            to_fill_mod: owner,
                            waiting_for: base,
                            waiting_for_mod: awaited.module,
                        });
                        self.types.alloc(Ty::Struct(StructTy::placeholder(
                            awaited.name,
                            awaited.module,
                            awaited.span,
                        )))
                    }
                    None => base,
                }
            };

            fields.push(StructField {
                name: field.name.clone(),
                ty,
            });
        }

        let Some(ty) = self.types.as_struct_mut(id) else {
            return;
        };
        ty.fields = fields;

        if errored {
            ty.state = StructState::Errored;
            tracing::debug!("struct errored");
            self.propagate(id);
            return;
        }

        if !pending.is_empty() {
            for request in pending {
                self.add_waiting_request(request);
            }
            return;
        }

        match self.types.fill_width_align(id) {
            Ok(true) => {
                tracing::debug!(layout = ?self.types.layout(id), "struct resolved");
                self.propagate(id);
            }
            Ok(false) => {}
            Err(LayoutOverflow) => {
                self.struct_too_large(id);
                self.propagate(id);
            }
        }
    }

    fn struct_too_large(&mut self, id: TyId) {
        let Some(s) = self.types.as_struct(id) else {
            return;
        };

        let error = Error::new(
            ErrorImpl::StructTooLarge {
                name: s.name.clone(),
            },
            s.span.clone(),
        );
        self.errors.push(error);
    }

    fn add_waiting_request(&mut self, request: WaitingRequest) {
        let Some(name) = self
            .types
            .as_struct(request.waiting_for)
            .map(|s| s.name.clone())
        else {
            return;
        };

        if let Some(slot) = self.waiting.get_mut(request.waiting_for_mod) {
            slot.get_or_insert_with(WaitingRequestMap::new)
                .add(&name, request);
        }
    }

    /// Completes every struct waiting on `settled`, which has just resolved
    /// or errored.
    ///
    /// Structs that resolve in turn are queued, so chains of embedded
    /// structs settle in one call. Every struct settles at most once, which
    /// bounds the loop.
    fn propagate(&mut self, settled: TyId) {
        let mut worklist = VecDeque::from([settled]);

        while let Some(id) = worklist.pop_front() {
            let Some((name, module, errored)) = self
                .types
                .as_struct(id)
                .map(|s| (s.name.clone(), s.module, s.state == StructState::Errored))
            else {
                continue;
            };

            let requests = match self.waiting.get_mut(module).and_then(Option::as_mut) {
                Some(map) => map.take(&name, id),
                None => continue,
            };

            for request in requests {
                let Some(to_fill) = self.types.as_struct_mut(request.to_fill) else {
                    continue;
                };

                if errored {
                    if to_fill.state != StructState::Errored {
                        to_fill.state = StructState::Errored;
                        worklist.push_back(request.to_fill);
                    }
                    continue;
                }

                if let Some(field) = to_fill.fields.get_mut(request.field_idx) {
                    field.ty = id;
                }
                tracing::trace!(field = request.field_idx, "patched '{}'", to_fill.name);

                if !to_fill.is_placeholder() {
                    continue;
                }

                match self.types.fill_width_align(request.to_fill) {
                    Ok(true) => worklist.push_back(request.to_fill),
                    Ok(false) => {}
                    Err(LayoutOverflow) => {
                        self.struct_too_large(request.to_fill);
                        worklist.push_back(request.to_fill);
                    }
                }
            }
        }
    }

    /// Reports every declared struct that is still a placeholder, in
    /// declaration order.
    fn sweep_unresolved(&mut self) {
        for &id in &self.structs {
            let Some(s) = self.types.as_struct(id) else {
                continue;
            };
            if !s.is_placeholder() {
                continue;
            }

            let (field, waiting_for) = s
                .fields
                .iter()
                .find(|field| self.types.layout(field.ty).is_none())
                .map(|field| (field.name.clone(), self.types.ty_to_string(field.ty)))
                .unwrap_or_default();

            self.errors.push(Error::new(
                ErrorImpl::UnresolvedStruct {
                    name: s.name.clone(),
                    field,
                    waiting_for,
                },
                s.span.clone(),
            ));
        }
    }

    fn check_var_decl(&mut self, decl: &mut VarDeclStmt) -> Result<(), Error> {
        let declared = match &decl.annotation {
            Some(annotation) => Some(self.resolve_annotation(annotation)?),
            None => None,
        };

        let value = match &mut decl.value {
            Some(value) => Some((self.check_expr(value)?, value.span.clone())),
            None => None,
        };

        let ty = match (declared, value) {
            (Some(declared), Some((value, span))) => {
                if !self.types.types_equal(declared, value) {
                    let error = self.type_match_error(declared, value, span);
                    self.errors.push(error);
                }
                declared
            }
            (Some(declared), None) => declared,
            (None, Some((value, _))) => value,
            (None, None) => return Ok(()),
        };

        decl.ty = Some(ty);
        self.ctx.scopes.bind(decl.name.clone(), ty);
        Ok(())
    }

    fn check_fn_decl(&mut self, decl: &mut FnDeclStmt, top_level: bool) -> Result<(), Error> {
        let mut params = Vec::with_capacity(decl.parameters.len());
        for param in &decl.parameters {
            params.push(self.resolve_annotation(&param.annotation)?);
        }

        let ret = match &decl.return_type {
            Some(annotation) => self.resolve_annotation(annotation)?,
            None => self.builtins.unknown,
        };

        let ty = self.types.alloc(Ty::Function(FunctionTy {
            name: decl.name.clone(),
            params: params.clone(),
            ret,
            is_var_args: decl.is_var_args,
        }));
        decl.ty = Some(ty);

        // Module level functions are visible through the module's alias
        let module_ty = self.ctx.scopes.module().filter(|_| top_level);
        match module_ty.and_then(|id| self.types.as_module_mut(id)) {
            Some(module) => {
                module.scope.bind(decl.name.clone(), ty);
            }
            None => {
                self.ctx.scopes.bind(decl.name.clone(), ty);
            }
        }

        let Some(body) = &mut decl.body else {
            return Ok(());
        };

        self.ctx.scopes.open();
        for (param, ty) in decl.parameters.iter().zip(params) {
            self.ctx.scopes.bind(param.name.clone(), ty);
        }
        self.ctx.returns.push(ret);

        for stmt in body.iter_mut() {
            if let Err(error) = self.check_stmt(stmt, false) {
                self.errors.push(error);
            }
        }

        self.ctx.returns.pop();
        self.ctx.scopes.close();
        Ok(())
    }

    fn check_if(&mut self, stmt: &mut IfStmt) {
        if let Err(error) = self.check_condition(&mut stmt.condition) {
            self.errors.push(error);
        }

        self.check_block(&mut stmt.consequent);

        if let Some(alternate) = &mut stmt.alternate {
            if let Err(error) = self.check_stmt(alternate, false) {
                self.errors.push(error);
            }
        }
    }

    fn check_while(&mut self, stmt: &mut WhileStmt) {
        if let Err(error) = self.check_condition(&mut stmt.condition) {
            self.errors.push(error);
        }

        self.check_block(&mut stmt.body);
    }

    /// Conditions are integers or pointers.
    fn check_condition(&mut self, condition: &mut Expr) -> Result<(), Error> {
        let ty = self.check_expr(condition)?;

        match self.types[ty] {
            Ty::Int32 | Ty::Pointer { .. } => Ok(()),
            _ => Err(self.type_match_error(self.builtins.int32, ty, condition.span.clone())),
        }
    }

    fn check_return(&mut self, stmt: &mut ReturnStmt, span: Span) -> Result<(), Error> {
        let Some(&expected) = self.ctx.returns.last() else {
            return Err(Error::new(ErrorImpl::ReturnOutsideFunction, span));
        };

        let (received, span) = match &mut stmt.value {
            Some(value) => (self.check_expr(value)?, value.span.clone()),
            None => (self.builtins.unknown, span),
        };

        if !self.types.types_equal(expected, received) {
            return Err(self.type_match_error(expected, received, span));
        }

        Ok(())
    }

    fn check_delete(&mut self, stmt: &mut DeleteStmt) -> Result<(), Error> {
        let ty = self.check_expr(&mut stmt.value)?;

        if !self.types[ty].is_pointer() {
            return Err(Error::new(
                ErrorImpl::OperandTypeError {
                    operator: String::from("delete"),
                    expected: String::from("pointer"),
                    received: self.types.ty_to_string(ty),
                },
                stmt.value.span.clone(),
            ));
        }

        Ok(())
    }

    /// Checks `expr`, records its type on the node and returns it.
    pub fn check_expr(&mut self, expr: &mut Expr) -> Result<TyId, Error> {
        let span = expr.span.clone();

        let ty = match &mut expr.kind {
            ExprKind::Number(_) | ExprKind::Char(_) => self.builtins.int32,
            ExprKind::String(_) => self.builtins.string,
            ExprKind::Symbol(symbol) => self.lookup(None, &symbol.value, &span)?,
            ExprKind::Binary(binary) => self.check_binary(binary)?,
            ExprKind::Prefix(prefix) => self.check_prefix(prefix)?,
            ExprKind::Assignment(assignment) => self.check_assignment(assignment)?,
            ExprKind::Call(call) => self.check_call(call, &span)?,
            ExprKind::StructInit(init) => self.check_struct_init(init)?,
            ExprKind::Member(member) => self.check_member(member)?,
            ExprKind::Cast(cast) => {
                self.check_expr(&mut cast.value)?;
                self.resolve_annotation(&cast.target)?
            }
            ExprKind::New(new) => {
                let ty = self.check_expr(&mut new.value)?;
                self.types.pointer(ty, 1)
            }
        };

        expr.ty = Some(ty);
        Ok(ty)
    }

    fn check_binary(&mut self, binary: &mut BinaryExpr) -> Result<TyId, Error> {
        let left = self.check_expr(&mut binary.left)?;
        let right = self.check_expr(&mut binary.right)?;

        if binary.operator.is_equality() {
            if !self.types.types_equal(left, right) {
                return Err(self.type_match_error(left, right, binary.right.span.clone()));
            }
            return Ok(self.builtins.int32);
        }

        for (ty, operand) in [(left, &binary.left), (right, &binary.right)] {
            if !self.types[ty].is_int() {
                return Err(self.operand_error(binary.operator.to_string(), "i32", ty, operand));
            }
        }

        Ok(self.builtins.int32)
    }

    fn check_prefix(&mut self, prefix: &mut PrefixExpr) -> Result<TyId, Error> {
        let ty = self.check_expr(&mut prefix.right)?;

        match prefix.operator {
            PrefixOp::AddressOf => Ok(self.types.pointer(ty, 1)),
            PrefixOp::Deref => match self.types.deref(ty) {
                Some(inner) => Ok(inner),
                None => Err(self.operand_error(String::from("*"), "pointer", ty, &prefix.right)),
            },
            PrefixOp::Not | PrefixOp::Negate => {
                if !self.types[ty].is_int() {
                    return Err(self.operand_error(
                        prefix.operator.to_string(),
                        "i32",
                        ty,
                        &prefix.right,
                    ));
                }
                Ok(self.builtins.int32)
            }
        }
    }

    fn check_assignment(&mut self, assignment: &mut AssignmentExpr) -> Result<TyId, Error> {
        if !assignment.assignee.is_assignable() {
            return Err(Error::new(
                ErrorImpl::NotAssignable,
                assignment.assignee.span.clone(),
            ));
        }

        let target = self.check_expr(&mut assignment.assignee)?;
        let value = self.check_expr(&mut assignment.value)?;

        if !self.types.types_equal(target, value) {
            return Err(self.type_match_error(target, value, assignment.value.span.clone()));
        }

        Ok(target)
    }

    fn check_call(&mut self, call: &mut CallExpr, span: &Span) -> Result<TyId, Error> {
        let callee = self.check_expr(&mut call.callee)?;
        let Some(function) = self.types.as_function(callee).cloned() else {
            return Err(Error::new(
                ErrorImpl::NotCallable {
                    found: self.types.ty_to_string(callee),
                },
                call.callee.span.clone(),
            ));
        };

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in call.arguments.iter_mut() {
            arguments.push((self.check_expr(argument)?, argument.span.clone()));
        }

        let expected = function.params.len();
        if arguments.len() < expected {
            return Err(Error::new(
                ErrorImpl::MissingArguments {
                    expected,
                    received: arguments.len(),
                },
                span.clone(),
            ));
        }
        if arguments.len() > expected && !function.is_var_args {
            return Err(Error::new(
                ErrorImpl::UnexpectedArguments {
                    expected,
                    received: arguments.len(),
                },
                arguments[expected].1.clone(),
            ));
        }

        for ((argument, argument_span), param) in arguments.into_iter().zip(&function.params) {
            if !self.types.types_equal(*param, argument) {
                return Err(self.type_match_error(*param, argument, argument_span));
            }
        }

        Ok(function.ret)
    }

    fn check_struct_init(&mut self, init: &mut StructInitExpr) -> Result<TyId, Error> {
        let ty = self.lookup(init.module.as_deref(), &init.name, &init.name_span)?;
        let Some(target) = self.types.as_struct(ty) else {
            return Err(Error::new(
                ErrorImpl::NotAStruct {
                    ident: init.name.clone(),
                    found: self.types.ty_to_string(ty),
                },
                init.name_span.clone(),
            ));
        };

        let struct_name = target.name.clone();
        let fields: Vec<(String, TyId)> = target
            .fields
            .iter()
            .map(|field| (field.name.clone(), field.ty))
            .collect();

        for field in init.fields.iter_mut() {
            let Some(&(_, field_ty)) = fields.iter().find(|(name, _)| *name == field.name) else {
                return Err(Error::new(
                    ErrorImpl::NoSuchField {
                        field: field.name.clone(),
                        ty: struct_name,
                    },
                    field.span.clone(),
                ));
            };

            let value = self.check_expr(&mut field.value)?;
            if !self.types.types_equal(field_ty, value) {
                return Err(self.type_match_error(field_ty, value, field.value.span.clone()));
            }
        }

        Ok(ty)
    }

    /// `.` reads a field of a struct or a name declared by a module.
    fn check_member(&mut self, member: &mut MemberExpr) -> Result<TyId, Error> {
        let left = self.check_expr(&mut member.left)?;

        match &self.types[left] {
            Ty::Struct(s) => s
                .field(&member.member)
                .map(|(_, field)| field.ty)
                .ok_or_else(|| {
                    Error::new(
                        ErrorImpl::NoSuchField {
                            field: member.member.clone(),
                            ty: s.name.clone(),
                        },
                        member.member_span.clone(),
                    )
                }),
            Ty::Module(module) => module.scope.get(&member.member).ok_or_else(|| {
                Error::new(
                    ErrorImpl::NotFoundInModule {
                        ident: member.member.clone(),
                        module: module.name.clone(),
                    },
                    member.member_span.clone(),
                )
            }),
            _ => Err(Error::new(
                ErrorImpl::NotScoped {
                    found: self.types.ty_to_string(left),
                },
                member.left.span.clone(),
            )),
        }
    }

    /// Resolves a written type to an arena type.
    pub fn resolve_annotation(&mut self, annotation: &TypeAnnotation) -> Result<TyId, Error> {
        let base = self.resolve_type_name(annotation)?;
        Ok(self.types.pointer(base, annotation.pointer_count))
    }

    /// Resolves the name of an annotation, ignoring its pointer levels.
    fn resolve_type_name(&self, annotation: &TypeAnnotation) -> Result<TyId, Error> {
        let ty = self.lookup(
            annotation.module.as_deref(),
            &annotation.name,
            &annotation.span,
        )?;

        if !self.types[ty].is_type() {
            let ident = match &annotation.module {
                Some(module) => format!("{}.{}", module, annotation.name),
                None => annotation.name.clone(),
            };
            return Err(Error::new(
                ErrorImpl::NotAType {
                    ident,
                    found: self.types.ty_to_string(ty),
                },
                annotation.span.clone(),
            ));
        }

        Ok(ty)
    }

    /// Looks up `name`, or `module.name` when a module alias is given.
    ///
    /// Unqualified names are searched from the innermost scope outwards.
    /// Qualified names go through the import aliases of the current module.
    fn lookup(&self, module: Option<&str>, name: &str, span: &Span) -> Result<TyId, Error> {
        let Some(alias) = module else {
            return self
                .ctx
                .scopes
                .lookup(name, &self.globals, &self.types)
                .ok_or_else(|| {
                    Error::new(
                        ErrorImpl::IdentifierNotFound {
                            ident: name.to_string(),
                        },
                        span.clone(),
                    )
                });
        };

        let module_ty = self
            .ctx
            .imports
            .get(alias)
            .and_then(|&idx| self.graph.get(idx))
            .and_then(|module| module.ty)
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::UnknownModule {
                        alias: alias.to_string(),
                    },
                    span.clone(),
                )
            })?;

        self.types
            .as_module(module_ty)
            .and_then(|module| module.scope.get(name))
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::NotFoundInModule {
                        ident: name.to_string(),
                        module: alias.to_string(),
                    },
                    span.clone(),
                )
            })
    }

    fn type_match_error(&self, expected: TyId, received: TyId, span: Span) -> Error {
        Error::new(
            ErrorImpl::TypeMatchError {
                expected: self.types.ty_to_string(expected),
                received: self.types.ty_to_string(received),
            },
            span,
        )
    }

    fn operand_error(&self, operator: String, expected: &str, ty: TyId, operand: &Expr) -> Error {
        Error::new(
            ErrorImpl::OperandTypeError {
                operator,
                expected: expected.to_string(),
                received: self.types.ty_to_string(ty),
            },
            operand.span.clone(),
        )
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    pub fn types(&self) -> &TyArena {
        &self.types
    }

    pub fn globals(&self) -> &Scope {
        &self.globals
    }

    pub fn builtins(&self) -> Builtins {
        self.builtins
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    /// Requests still parked on structs of module `idx`.
    pub fn waiting_map(&self, idx: usize) -> Option<&WaitingRequestMap> {
        self.waiting.get(idx)?.as_ref()
    }

    /// Looks `name` up in the scope of module `idx`, once it is checked.
    pub fn lookup_in_module(&self, idx: usize, name: &str) -> Option<TyId> {
        let module_ty = self.graph.get(idx)?.ty?;
        self.types.as_module(module_ty)?.scope.get(name)
    }

    /// Layout of struct `name` of module `idx`, if it resolved.
    pub fn struct_layout(&self, idx: usize, name: &str) -> Option<Layout> {
        self.types.layout(self.lookup_in_module(idx, name)?)
    }
}
