//! Lexical scope resolution.
//!
//! Scopes form a chain from innermost to root. The whole chain lives in
//! a [`ScopeArena`] owned by one compile call: scopes are records in a
//! `Vec` linked by parent indices, so the entire structure is freed when
//! the compile ends.
//!
//! Redeclaration is rejected if the name is bound anywhere in the
//! active chain, not just the innermost scope. Variables and functions
//! occupy separate namespaces.

use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::errors::{Error, ErrorKind};
use crate::Span;

use super::typed_ast::{Function, Variable};
use super::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

struct Scope {
    parent: Option<ScopeId>,
    variables: HashMap<String, Rc<Variable>>,
    functions: HashMap<String, Rc<Function>>,
    in_loop: bool,
    in_function: bool,
}

pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    /// Creates the arena with its root scope.
    pub fn new() -> ScopeArena {
        ScopeArena {
            scopes: vec![Scope {
                parent: None,
                variables: HashMap::new(),
                functions: HashMap::new(),
                in_loop: false,
                in_function: false,
            }],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Opens a child scope. Flags default to the parent's and may be
    /// overridden only when entering a loop or function body.
    pub fn child(
        &mut self,
        parent: ScopeId,
        in_loop: Option<bool>,
        in_function: Option<bool>,
    ) -> ScopeId {
        let parent_scope = &self.scopes[parent.0];
        let scope = Scope {
            parent: Some(parent),
            variables: HashMap::new(),
            functions: HashMap::new(),
            in_loop: in_loop.unwrap_or(parent_scope.in_loop),
            in_function: in_function.unwrap_or(parent_scope.in_function),
        };
        self.scopes.push(scope);
        ScopeId(self.scopes.len() - 1)
    }

    fn chain(&self, from: ScopeId) -> impl Iterator<Item = &Scope> {
        let mut current = Some(from);
        std::iter::from_fn(move || {
            let scope = &self.scopes[current?.0];
            current = scope.parent;
            Some(scope)
        })
    }

    pub fn declare_variable(
        &mut self,
        scope: ScopeId,
        name: &str,
        mutable: bool,
        ty: Type,
        span: Span,
    ) -> Result<Rc<Variable>, Error> {
        if self.chain(scope).any(|s| s.variables.contains_key(name)) {
            return Err(Error::new(
                ErrorKind::DuplicateDeclaration {
                    name: name.to_string(),
                },
                span,
            ));
        }
        let variable = Rc::new(Variable {
            name: name.to_string(),
            mutable,
            ty,
        });
        self.scopes[scope.0]
            .variables
            .insert(name.to_string(), Rc::clone(&variable));
        Ok(variable)
    }

    pub fn declare_function(
        &mut self,
        scope: ScopeId,
        function: Rc<Function>,
        span: Span,
    ) -> Result<(), Error> {
        let name = function.name.clone();
        if self.chain(scope).any(|s| s.functions.contains_key(&name)) {
            return Err(Error::new(ErrorKind::DuplicateFunction { name }, span));
        }
        self.scopes[scope.0].functions.insert(name, function);
        Ok(())
    }

    pub fn lookup_variable(
        &self,
        scope: ScopeId,
        name: &str,
        span: Span,
    ) -> Result<Rc<Variable>, Error> {
        self.chain(scope)
            .find_map(|s| s.variables.get(name))
            .cloned()
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::UndeclaredIdentifier {
                        name: name.to_string(),
                    },
                    span,
                )
            })
    }

    /// Walks the chain for a user function; a miss is not an error here
    /// because calls fall back to the intrinsic registry.
    pub fn lookup_function(&self, scope: ScopeId, name: &str) -> Option<Rc<Function>> {
        self.chain(scope).find_map(|s| s.functions.get(name)).cloned()
    }

    pub fn require_in_loop(
        &self,
        scope: ScopeId,
        operation: &'static str,
        span: Span,
    ) -> Result<(), Error> {
        if self.scopes[scope.0].in_loop {
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::InvalidControlFlow {
                    operation,
                    construct: "loop",
                },
                span,
            ))
        }
    }

    pub fn require_in_function(
        &self,
        scope: ScopeId,
        operation: &'static str,
        span: Span,
    ) -> Result<(), Error> {
        if self.scopes[scope.0].in_function {
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::InvalidControlFlow {
                    operation,
                    construct: "function",
                },
                span,
            ))
        }
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        ScopeArena::new()
    }
}
