/// AST module for the concrete syntax tree.
/// Contains all definitions related to the parser's output, before
/// semantic decoration.
///
/// Submodules:
/// - ast: the closed Stmt/Expr variant enums and operator kinds
/// - expressions: definitions for the expression node structs
/// - statements: definitions for the statement node structs
pub mod ast;
pub mod expressions;
pub mod statements;
