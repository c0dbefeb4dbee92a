pub mod analyzer;
pub mod context;
pub mod stdlib;
pub mod typed_ast;
pub mod types;
