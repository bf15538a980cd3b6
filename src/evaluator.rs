use crate::environment::{Environment, UnknownSymbol};
use crate::special_forms;
use crate::types::{BadArgCount, Callable, Closure, HostFn, PrimitiveFn, TypeMismatch, Value};
use crate::MAX_EVAL_DEPTH;
use itertools::Itertools;

use std::fmt;
use std::rc::Rc;

pub type Result<T = Value> = std::result::Result<T, Error>;
#[derive(Debug)]
pub enum Error {
    UnknownSymbol(UnknownSymbol),
    TypeMismatch(TypeMismatch),
    BadArgCount(BadArgCount),
    NotCallable(Value),
    Def(special_forms::DefError),
    Fn(special_forms::FnError),
    Defmacro(special_forms::DefmacroError),
    RecursionLimit,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownSymbol(e) => write!(f, "{}", e),
            Error::TypeMismatch(e) => write!(f, "type mismatch: {}", e),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::NotCallable(obj) if obj.is_macro() => write!(
                f,
                "cannot call a macro as a function; define it in an earlier top-level form"
            ),
            Error::NotCallable(obj) => write!(f, "{} is not a function", obj),
            Error::Def(e) => write!(f, "def: {}", e),
            Error::Fn(e) => write!(f, "lambda: {}", e),
            Error::Defmacro(e) => write!(f, "defmacro: {}", e),
            Error::RecursionLimit => write!(
                f,
                "maximum recursion depth exceeded (max: {})",
                MAX_EVAL_DEPTH
            ),
        }
    }
}

impl From<TypeMismatch> for Error {
    fn from(t: TypeMismatch) -> Self {
        Self::TypeMismatch(t)
    }
}

impl From<UnknownSymbol> for Error {
    fn from(e: UnknownSymbol) -> Self {
        Self::UnknownSymbol(e)
    }
}

/// Evaluates an already macro-expanded form.
pub fn eval(ast: &Value, env: &Rc<Environment>) -> Result {
    eval_nested(ast, env, 0)
}

/// `depth` counts the evaluations (and macro expansions) this one is nested
/// inside. Past [`MAX_EVAL_DEPTH`] evaluation stops with
/// [`Error::RecursionLimit`] instead of exhausting the native stack.
pub(crate) fn eval_nested(ast: &Value, env: &Rc<Environment>, depth: usize) -> Result {
    if depth >= MAX_EVAL_DEPTH {
        return Err(Error::RecursionLimit);
    }
    use Value::*;
    match ast {
        Symbol(s) => env.fetch(s).map_err(Error::UnknownSymbol),
        Number(_) | String(_) | Bool(_) | Function(_) | Macro(_) => Ok(ast.clone()),
        List(list) => match list.split_first() {
            None => Ok(ast.clone()),
            Some((head, args)) => {
                if let Symbol(name) = head {
                    match name.as_str() {
                        "quote" => return special_forms::apply_quote(args),
                        "def" | "define" => return special_forms::apply_def(args, env, depth),
                        "if" => return special_forms::apply_if(args, env, depth),
                        "lambda" => return special_forms::apply_lambda(args, env),
                        "defmacro" => return special_forms::apply_defmacro(args, env),
                        // Any other initial symbol will be interpreted as a function call and
                        // handled below
                        _ => (),
                    }
                }
                let callable = eval_nested(head, env, depth + 1)?;
                if !matches!(callable, Function(_)) {
                    return Err(Error::NotCallable(callable));
                }
                let args = evaluate_sequence_elementwise(args, env, depth + 1)?;
                apply(&callable, &args, depth)
            }
        },
    }
}

fn evaluate_sequence_elementwise(
    seq: &[Value],
    env: &Rc<Environment>,
    depth: usize,
) -> Result<Vec<Value>> {
    seq.iter().map(|obj| eval_nested(obj, env, depth)).collect()
}

/// Evaluates `body` in order and returns the last value, or `nil` for an empty body.
pub(crate) fn evaluate_body(body: &[Value], env: &Rc<Environment>, depth: usize) -> Result {
    body.iter()
        .try_fold(Value::nil(), |_, form| eval_nested(form, env, depth))
}

fn apply(callable: &Value, args: &[Value], depth: usize) -> Result {
    match callable {
        Value::Function(Callable::Primitive(f)) => call_primitive(f, args),
        Value::Function(Callable::Host(f)) => call_host(f, args),
        Value::Function(Callable::Closure(f)) => call_closure(f, args, depth),
        _ => Err(Error::NotCallable(callable.clone())),
    }
}

pub(crate) fn pretty_print_args(args: &[Value]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

pub fn call_primitive(func: &PrimitiveFn, args: &[Value]) -> Result {
    func.arity
        .validate_for(args.len(), func.name)
        .map_err(Error::BadArgCount)?;
    log::trace!("Call {} with {}", func.name, pretty_print_args(args));
    let result = (func.fn_ptr)(args);
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("Call to {} failed: {}", func.name, e),
    }
    result
}

fn call_host(func: &HostFn, args: &[Value]) -> Result {
    func.arity
        .validate_for(args.len(), &func.name)
        .map_err(Error::BadArgCount)?;
    log::trace!("Call host {} with {}", func.name, pretty_print_args(args));
    (func.func)(args)
}

// Arguments are matched up positionally. Extras are dropped and a parameter
// without an argument stays unbound until something looks it up.
fn call_closure(func: &Closure, args: &[Value], depth: usize) -> Result {
    log::trace!("Call {:?} with {}", func, pretty_print_args(args));
    let env = Environment::spawn_from(&func.parent);
    for (key, value) in func.parameters.iter().zip(args) {
        env.set(key.clone(), value.clone());
    }
    evaluate_body(&func.body, &env, depth + 1)
}
