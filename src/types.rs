use crate::environment::Environment;
use crate::evaluator;
use derive_more::{Deref, DerefMut};
use itertools::Itertools;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

#[derive(Deref, DerefMut, Debug, Default)]
pub struct List(pub Vec<Value>);

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.into())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    name: String,
    expected: Arity,
    got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} expects {} arguments, but received {}",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub fn validate_for(&self, n: usize, name: &str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name: name.into(),
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

/// A native procedure from the standard library table.
pub struct PrimitiveFn {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&[Value]) -> evaluator::Result,
}

impl fmt::Debug for PrimitiveFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "primitive function #<{}>", self.name)
    }
}

/// A native procedure installed by the embedding host. Unlike a [`PrimitiveFn`]
/// it may capture state, e.g. a handle on the session's listeners.
pub struct HostFn {
    pub name: String,
    pub arity: Arity,
    pub func: Box<dyn Fn(&[Value]) -> evaluator::Result>,
}

impl fmt::Debug for HostFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "host function #<{}>", self.name)
    }
}

/// Parameter names, body forms and the captured environment. Shared by
/// `lambda` functions and `defmacro` macros.
pub struct Closure {
    pub parameters: Vec<Symbol>,
    pub body: Vec<Value>,
    pub parent: Rc<Environment>,
}

impl fmt::Debug for Closure {
    // Not derived because we want to skip the parent: the parent may well contain this Closure!
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Closure{{parameters: ({}), body: {:?}}}",
            self.parameters.iter().join(" "),
            self.body
        )
    }
}

#[derive(Debug, Clone)]
pub enum Callable {
    Primitive(&'static PrimitiveFn),
    Host(Rc<HostFn>),
    Closure(Rc<Closure>),
}

#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    String(String),
    Symbol(Symbol),
    List(Rc<List>),
    Bool(bool),
    Function(Callable),
    Macro(Rc<Closure>),
}

/// `nil` and the empty list are the only false values.
pub(crate) fn truthy(value: &Value) -> bool {
    use Value::*;
    match value {
        Bool(b) => *b,
        List(elements) => !elements.is_empty(),
        Number(_) | String(_) | Symbol(_) | Function(_) | Macro(_) => true,
    }
}

/// Equality as seen by `eq`: scalars compare by value, lists and procedures
/// only match themselves.
pub(crate) fn identical(lhs: &Value, rhs: &Value) -> bool {
    use Value::*;
    match (lhs, rhs) {
        (Number(x), Number(y)) => x == y,
        (String(x), String(y)) => x == y,
        (Symbol(x), Symbol(y)) => x == y,
        (Bool(x), Bool(y)) => x == y,
        (List(x), List(y)) => Rc::ptr_eq(x, y),
        (Function(x), Function(y)) => same_callable(x, y),
        (Macro(x), Macro(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

fn same_callable(lhs: &Callable, rhs: &Callable) -> bool {
    match (lhs, rhs) {
        (Callable::Primitive(x), Callable::Primitive(y)) => std::ptr::eq(*x, *y),
        (Callable::Host(x), Callable::Host(y)) => Rc::ptr_eq(x, y),
        (Callable::Closure(x), Callable::Closure(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

#[derive(Debug)]
pub enum TypeMismatch {
    NotANumber,
    NotAList,
    NotASymbol,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let expected = match self {
            TypeMismatch::NotANumber => "a number",
            TypeMismatch::NotAList => "a list",
            TypeMismatch::NotASymbol => "a symbol",
        };
        write!(f, "expected {}", expected)
    }
}

impl Value {
    pub fn nil() -> Self {
        Self::Bool(false)
    }
    pub fn new_list() -> Self {
        Self::List(Rc::new(List::default()))
    }
    pub fn wrap_list(elements: Vec<Value>) -> Self {
        Self::List(Rc::new(List(elements)))
    }
    pub fn new_symbol(name: &str) -> Self {
        Self::Symbol(Symbol::from(name))
    }

    pub(crate) fn as_number(&self) -> Result<f64, TypeMismatch> {
        match self {
            Value::Number(x) => Ok(*x),
            _ => Err(TypeMismatch::NotANumber),
        }
    }

    pub(crate) fn as_list(&self) -> Result<&List, TypeMismatch> {
        match self {
            Value::List(x) => Ok(x),
            _ => Err(TypeMismatch::NotAList),
        }
    }

    pub(crate) fn as_symbol(&self) -> Result<&Symbol, TypeMismatch> {
        match self {
            Value::Symbol(s) => Ok(s),
            _ => Err(TypeMismatch::NotASymbol),
        }
    }

    pub fn is_macro(&self) -> bool {
        matches!(self, Value::Macro(_))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (List(x), List(y)) => equal_sequences(x, y),
            (Number(x), Number(y)) => x == y,
            (Bool(x), Bool(y)) => x == y,
            (String(x), String(y)) => x == y,
            (Symbol(x), Symbol(y)) => x == y,
            (Function(x), Function(y)) => same_callable(x, y),
            (Macro(x), Macro(y)) => Rc::ptr_eq(x, y),
            (_, _) => false,
        }
    }
}

fn equal_sequences(xs: &[Value], ys: &[Value]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| x == y)
}
