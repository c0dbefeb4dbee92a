/// Parser module producing the concrete syntax tree.
///
/// A Pratt parser: statement keywords dispatch through a statement
/// lookup table, expressions through NUD (prefix) and LED (infix)
/// handler tables keyed by token kind with explicit binding powers.
///
/// Submodules:
/// - parser: the Parser state plus the Matcher entry point
/// - lookups: binding powers and handler registration
/// - stmt: statement handlers
/// - expr: expression handlers
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
