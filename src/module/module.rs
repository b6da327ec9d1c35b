use std::path::{Path, PathBuf};

use crate::{
    ast::{
        ast::{Stmt, StmtKind},
        statements::{FnDeclStmt, ImportStmt, StructDeclStmt},
    },
    type_checker::ty::TyId,
};

/// One source file and its top level statements.
///
/// Besides the statements themselves the module keeps the indices of its
/// imports, functions and struct declarations so they can be visited
/// without walking the whole file.
#[derive(Debug)]
pub struct Module {
    path: PathBuf,
    statements: Vec<Stmt>,
    imports: Vec<usize>,
    functions: Vec<usize>,
    structs: Vec<usize>,
    /// Type of the module, set once the type checker has visited it
    pub ty: Option<TyId>,
    idx: Option<usize>,
}

impl Module {
    pub fn new(path: PathBuf) -> Self {
        Module {
            path,
            statements: vec![],
            imports: vec![],
            functions: vec![],
            structs: vec![],
            ty: None,
            idx: None,
        }
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    /// The name imports bind this module to: the file stem of its path.
    pub fn get_name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Index in the owning graph, `None` until the module has been added.
    pub fn get_idx(&self) -> Option<usize> {
        self.idx
    }

    pub(crate) fn set_idx(&mut self, idx: usize) {
        self.idx = Some(idx);
    }

    /// Appends a top level statement, indexing imports, functions and
    /// struct declarations.
    pub fn push_stmt(&mut self, stmt: Stmt) {
        let idx = self.statements.len();
        match &stmt.kind {
            StmtKind::Import(_) => self.imports.push(idx),
            StmtKind::FnDecl(_) => self.functions.push(idx),
            StmtKind::StructDecl(_) => self.structs.push(idx),
            _ => {}
        }

        self.statements.push(stmt);
    }

    pub fn stmt_at(&self, idx: usize) -> Option<&Stmt> {
        self.statements.get(idx)
    }

    /// Replaces the statement at `idx`. The statement must be of the same
    /// kind, otherwise the declaration indices would go stale.
    pub fn set_stmt_at(&mut self, idx: usize, stmt: Stmt) -> bool {
        match self.statements.get_mut(idx) {
            Some(slot) if slot.get_stmt_type() == stmt.get_stmt_type() => {
                *slot = stmt;
                true
            }
            _ => false,
        }
    }

    pub fn num_stmts(&self) -> usize {
        self.statements.len()
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }

    /// The `i`th import statement of the module.
    pub fn import_at(&self, i: usize) -> Option<&ImportStmt> {
        let stmt = self.statements.get(*self.imports.get(i)?)?;
        match &stmt.kind {
            StmtKind::Import(import) => Some(import),
            _ => None,
        }
    }

    pub fn num_imports(&self) -> usize {
        self.imports.len()
    }

    pub fn function_at(&self, i: usize) -> Option<&FnDeclStmt> {
        let stmt = self.statements.get(*self.functions.get(i)?)?;
        match &stmt.kind {
            StmtKind::FnDecl(function) => Some(function),
            _ => None,
        }
    }

    pub fn num_functions(&self) -> usize {
        self.functions.len()
    }

    pub fn struct_at(&self, i: usize) -> Option<&StructDeclStmt> {
        let stmt = self.statements.get(*self.structs.get(i)?)?;
        match &stmt.kind {
            StmtKind::StructDecl(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn struct_at_mut(&mut self, i: usize) -> Option<&mut StructDeclStmt> {
        let stmt = self.statements.get_mut(*self.structs.get(i)?)?;
        match &mut stmt.kind {
            StmtKind::StructDecl(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn num_structs(&self) -> usize {
        self.structs.len()
    }

    /// Moves the statements out so they can be walked mutably while the
    /// rest of the graph is borrowed. Must be paired with
    /// [`Module::restore_statements`].
    pub(crate) fn take_statements(&mut self) -> Vec<Stmt> {
        std::mem::take(&mut self.statements)
    }

    pub(crate) fn restore_statements(&mut self, statements: Vec<Stmt>) {
        self.statements = statements;
    }

    /// Logs the shape of the module.
    pub fn debug(&self) {
        tracing::debug!(
            path = %self.path.display(),
            statements = self.num_stmts(),
            imports = self.num_imports(),
            functions = self.num_functions(),
            structs = self.num_structs(),
            "module"
        );
    }
}
