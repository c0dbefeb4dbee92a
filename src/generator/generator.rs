//! JavaScript code generation.
//!
//! A single recursive emission pass over the optimized typed AST. Each
//! named entity (variable, function, struct, field) gets a stable
//! mangled name, `<name>_<n>` with a 1-based first-seen index, so
//! shadow-free output names never collide; the constant π renames to
//! the target's own `Math.PI`. Expressions are fully parenthesized to
//! make source precedence explicit in the output.

use std::collections::HashMap;
use std::rc::Rc;

use crate::analyzer::stdlib::Intrinsic;
use crate::analyzer::typed_ast::{
    Alternate, Callee, Function, Literal, TypedExpr, TypedIf, TypedProgram, TypedStmt, Variable,
};
use crate::analyzer::types::{Field, StructType};
use crate::ast::ast::BinaryOp;
use crate::errors::errors::{Error, ErrorKind};
use crate::Span;

/// Lowers a typed program to JavaScript source text.
pub fn generate(program: &TypedProgram) -> Result<String, Error> {
    let mut generator = Generator::new();
    let lines = generator.statements(&program.statements)?;
    Ok(lines.join("\n"))
}

struct Generator {
    /// Entity address to first-seen mangling index.
    mangle: HashMap<usize, usize>,
    /// Total names issued, including hidden loop counters.
    issued: usize,
}

impl Generator {
    fn new() -> Self {
        Generator {
            mangle: HashMap::new(),
            issued: 0,
        }
    }

    fn index_for(&mut self, key: usize) -> usize {
        if let Some(&index) = self.mangle.get(&key) {
            index
        } else {
            self.issued += 1;
            self.mangle.insert(key, self.issued);
            self.issued
        }
    }

    /// A fresh name that no source entity maps to, for generated loop
    /// counters. It consumes a mangling index like any other name.
    fn fresh_name(&mut self, base: &str) -> String {
        self.issued += 1;
        format!("{}_{}", base, self.issued)
    }

    fn variable_name(&mut self, variable: &Rc<Variable>) -> String {
        if variable.name == "π" {
            return "Math.PI".to_string();
        }
        let index = self.index_for(Rc::as_ptr(variable) as usize);
        format!("{}_{}", variable.name, index)
    }

    fn function_name(&mut self, function: &Rc<Function>) -> String {
        let index = self.index_for(Rc::as_ptr(function) as usize);
        format!("{}_{}", function.name, index)
    }

    fn struct_name(&mut self, struct_type: &Rc<StructType>) -> String {
        let index = self.index_for(Rc::as_ptr(struct_type) as usize);
        format!("{}_{}", struct_type.name, index)
    }

    fn field_name(&mut self, field: &Rc<Field>) -> String {
        let index = self.index_for(Rc::as_ptr(field) as usize);
        format!("{}_{}", field.name, index)
    }

    fn statements(&mut self, statements: &[TypedStmt]) -> Result<Vec<String>, Error> {
        statements.iter().map(|s| self.stmt(s)).collect()
    }

    /// Emits a brace-delimited body, indenting every nested line.
    fn block(&mut self, header: String, body: &[TypedStmt]) -> Result<String, Error> {
        let mut result = header;
        result.push_str(" {");
        for stmt in self.statements(body)? {
            for line in stmt.lines() {
                result.push_str("\n  ");
                result.push_str(line);
            }
        }
        result.push_str("\n}");
        Ok(result)
    }

    fn stmt(&mut self, stmt: &TypedStmt) -> Result<String, Error> {
        match stmt {
            TypedStmt::VarDecl {
                variable,
                initializer,
            } => {
                let initializer = self.expr(initializer)?;
                Ok(format!(
                    "let {} = {};",
                    self.variable_name(variable),
                    initializer
                ))
            }
            TypedStmt::Assign { target, source } => {
                let source = self.expr(source)?;
                Ok(format!("{} = {};", self.variable_name(target), source))
            }
            TypedStmt::FnDecl { function } => {
                let name = self.function_name(function);
                let params: Vec<String> = function
                    .params
                    .iter()
                    .map(|p| self.variable_name(p))
                    .collect();
                let header = format!("function {}({})", name, params.join(", "));
                let body = function.body.borrow();
                self.block(header, &body)
            }
            TypedStmt::StructDecl { struct_type } => {
                let name = self.struct_name(struct_type);
                let fields: Vec<String> = struct_type
                    .fields
                    .iter()
                    .map(|f| self.field_name(f))
                    .collect();
                let mut result = format!("class {} {{\n", name);
                result.push_str(&format!("constructor({}) {{\n", fields.join(", ")));
                for field in &fields {
                    result.push_str(&format!("this[\"{field}\"] = {field};\n"));
                }
                result.push_str("}\n}");
                Ok(result)
            }
            TypedStmt::Print { value } => Ok(format!("console.log({});", self.expr(value)?)),
            TypedStmt::Break => Ok("break;".to_string()),
            TypedStmt::Return { value } => Ok(format!("return {};", self.expr(value)?)),
            TypedStmt::ShortReturn => Ok("return;".to_string()),
            TypedStmt::If(if_stmt) => self.if_stmt(if_stmt),
            TypedStmt::While { test, body } => {
                let header = format!("while ({})", self.expr(test)?);
                self.block(header, body)
            }
            TypedStmt::Repeat { count, body } => {
                let counter = self.fresh_name("i");
                let count = self.expr(count)?;
                let header =
                    format!("for (let {counter} = 0; {counter} < {count}; {counter}++)");
                self.block(header, body)
            }
            TypedStmt::ForRange {
                iterator,
                start,
                inclusive,
                end,
                body,
            } => {
                let name = self.variable_name(iterator);
                let start = self.expr(start)?;
                let end = self.expr(end)?;
                let op = if *inclusive { "<=" } else { "<" };
                let header =
                    format!("for (let {name} = {start}; {name} {op} {end}; {name}++)");
                self.block(header, body)
            }
            TypedStmt::ForEach {
                iterator,
                collection,
                body,
            } => {
                let name = self.variable_name(iterator);
                let collection = self.expr(collection)?;
                let header = format!("for (let {name} of {collection})");
                self.block(header, body)
            }
            TypedStmt::ArrayPush { array, element } => {
                let element = self.expr(element)?;
                Ok(format!("{}.push({});", self.variable_name(array), element))
            }
            TypedStmt::ArrayPop { array } => {
                Ok(format!("{}.pop();", self.variable_name(array)))
            }
            TypedStmt::Increment { target } => {
                Ok(format!("{}++;", self.variable_name(target)))
            }
            TypedStmt::Decrement { target } => {
                Ok(format!("{}--;", self.variable_name(target)))
            }
            TypedStmt::Expression { expression } => Ok(format!("{};", self.expr(expression)?)),
        }
    }

    fn if_stmt(&mut self, if_stmt: &TypedIf) -> Result<String, Error> {
        let header = format!("if ({})", self.expr(&if_stmt.test)?);
        let mut result = self.block(header, &if_stmt.consequent)?;
        match &if_stmt.alternate {
            Alternate::Empty => {}
            Alternate::Block(block) => {
                result.push_str(" else");
                let tail = self.block(String::new(), block)?;
                result.push_str(&tail);
            }
            Alternate::ElseIf(nested) => {
                result.push_str(" else ");
                result.push_str(&self.if_stmt(nested)?);
            }
        }
        Ok(result)
    }

    fn expr(&mut self, expr: &TypedExpr) -> Result<String, Error> {
        match expr {
            TypedExpr::Literal(literal) => Ok(match literal {
                Literal::Int(n) => n.to_string(),
                Literal::Float(f) => f.to_string(),
                Literal::Bool(b) => b.to_string(),
                Literal::Str(s) => format!("\"{s}\""),
            }),
            TypedExpr::Variable(variable) => Ok(self.variable_name(variable)),
            TypedExpr::Binary {
                op, left, right, ..
            } => {
                let left = self.expr(left)?;
                let right = self.expr(right)?;
                // Equality must not coerce in the target.
                let op = match op {
                    BinaryOp::Eq => "===",
                    BinaryOp::NotEq => "!==",
                    other => other.token(),
                };
                Ok(format!("({left} {op} {right})"))
            }
            TypedExpr::Unary { op, operand, .. } => {
                let operand = self.expr(operand)?;
                Ok(format!("({}({}))", op.token(), operand))
            }
            TypedExpr::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                let test = self.expr(test)?;
                let consequent = self.expr(consequent)?;
                let alternate = self.expr(alternate)?;
                Ok(format!("(({test}) ? ({consequent}) : ({alternate}))"))
            }
            TypedExpr::Call { callee, args, .. } => {
                let args: Vec<String> = args
                    .iter()
                    .map(|a| self.expr(a))
                    .collect::<Result<_, _>>()?;
                match callee {
                    Callee::User(function) => {
                        Ok(format!("{}({})", self.function_name(function), args.join(", ")))
                    }
                    Callee::Intrinsic(intrinsic) => self.intrinsic_call(*intrinsic, &args),
                }
            }
            TypedExpr::ConstructorCall { struct_type, args } => {
                let args: Vec<String> = args
                    .iter()
                    .map(|a| self.expr(a))
                    .collect::<Result<_, _>>()?;
                Ok(format!(
                    "new {}({})",
                    self.struct_name(struct_type),
                    args.join(", ")
                ))
            }
            TypedExpr::Member { object, field } => {
                let object = self.expr(object)?;
                Ok(format!("({}[\"{}\"])", object, self.field_name(field)))
            }
            TypedExpr::OptionalMember { object, field } => {
                let object = self.expr(object)?;
                Ok(format!("({}?.[\"{}\"])", object, self.field_name(field)))
            }
            TypedExpr::Subscript { array, index, .. } => {
                let array = self.expr(array)?;
                let index = self.expr(index)?;
                Ok(format!("{array}[{index}]"))
            }
            TypedExpr::Array { elements, .. } => {
                let elements: Vec<String> = elements
                    .iter()
                    .map(|e| self.expr(e))
                    .collect::<Result<_, _>>()?;
                Ok(format!("[{}]", elements.join(",")))
            }
            TypedExpr::EmptyArray { .. } => Ok("[]".to_string()),
            TypedExpr::EmptyOptional { .. } => Ok("undefined".to_string()),
        }
    }

    fn intrinsic_call(&mut self, intrinsic: Intrinsic, args: &[String]) -> Result<String, Error> {
        let one_arg = || -> Result<&String, Error> {
            args.first().ok_or_else(|| {
                Error::new(
                    ErrorKind::CodegenError {
                        construct: "intrinsic call".to_string(),
                    },
                    Span::null(),
                )
            })
        };
        Ok(match intrinsic {
            Intrinsic::Sin => format!("Math.sin({})", one_arg()?),
            Intrinsic::Cos => format!("Math.cos({})", one_arg()?),
            Intrinsic::Exp => format!("Math.exp({})", one_arg()?),
            Intrinsic::Ln => format!("Math.log({})", one_arg()?),
            Intrinsic::Sqrt => format!("Math.sqrt({})", one_arg()?),
            Intrinsic::Hypot => match args {
                [x, y] => format!("Math.hypot({x},{y})"),
                _ => {
                    return Err(Error::new(
                        ErrorKind::CodegenError {
                            construct: "intrinsic call".to_string(),
                        },
                        Span::null(),
                    ))
                }
            },
            Intrinsic::Bytes => format!("[...Buffer.from({}, \"utf8\")]", one_arg()?),
            Intrinsic::Codepoints => {
                format!("[...({})].map(s=>s.codePointAt(0))", one_arg()?)
            }
            Intrinsic::Random => {
                format!("((a=>a[~~(Math.random()*a.length)])({}))", one_arg()?)
            }
        })
    }
}
