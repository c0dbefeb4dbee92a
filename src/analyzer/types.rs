use std::rc::Rc;

/// The language's static types.
///
/// Equality is structural except for `Function` and `Struct`, which
/// compare by identity of their declaration. `Any` is the universal
/// parameter type; it satisfies every operand check through
/// [`Type::matches`], never through `==`.
#[derive(Debug, Clone)]
pub enum Type {
    Void,
    Any,
    Boolean,
    Int,
    Float,
    String,
    Array(Box<Type>),
    Optional(Box<Type>),
    Function(Rc<FunctionType>),
    Struct(Rc<StructType>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub param_types: Vec<Type>,
    pub return_type: Type,
}

#[derive(Debug, PartialEq)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<Rc<Field>>,
}

#[derive(Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Void, Type::Void) => true,
            (Type::Any, Type::Any) => true,
            (Type::Boolean, Type::Boolean) => true,
            (Type::Int, Type::Int) => true,
            (Type::Float, Type::Float) => true,
            (Type::String, Type::String) => true,
            (Type::Array(a), Type::Array(b)) => a == b,
            (Type::Optional(a), Type::Optional(b)) => a == b,
            (Type::Function(a), Type::Function(b)) => Rc::ptr_eq(a, b),
            (Type::Struct(a), Type::Struct(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Type::Any)
    }

    /// Compatibility check with `Any` as a wildcard on either side.
    /// Used wherever two types must agree (conditional branches, array
    /// elements, comparison operands).
    pub fn matches(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Any, _) | (_, Type::Any) => true,
            (Type::Array(a), Type::Array(b)) => a.matches(b),
            (Type::Optional(a), Type::Optional(b)) => a.matches(b),
            _ => self == other,
        }
    }
}
