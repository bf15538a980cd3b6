use crate::environment::Environment;
use crate::evaluator::{eval_nested, Error, Result};
use crate::types::{truthy, Arity, Callable, Closure, Symbol, Value};

use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub enum DefError {
    WrongArgCount(usize),
    KeyNotASymbol,
}

impl fmt::Display for DefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefError::WrongArgCount(n) => write!(f, "expected a name and a value, got {} forms", n),
            DefError::KeyNotASymbol => write!(f, "definition must start with a symbol"),
        }
    }
}

#[derive(Debug)]
pub enum FnError {
    MissingParameters,
    ParametersNotGivenAsList,
    ParameterNotASymbol,
}

impl fmt::Display for FnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FnError::MissingParameters => write!(f, "missing parameter list"),
            FnError::ParametersNotGivenAsList => write!(f, "parameters must be given as a list"),
            FnError::ParameterNotASymbol => write!(f, "every parameter must be a symbol"),
        }
    }
}

#[derive(Debug)]
pub enum DefmacroError {
    MissingSignature,
    NameNotASymbol,
    BadParameters(FnError),
}

impl fmt::Display for DefmacroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefmacroError::MissingSignature => write!(f, "expected a name and parameter list"),
            DefmacroError::NameNotASymbol => write!(f, "macro name must be a symbol"),
            DefmacroError::BadParameters(e) => write!(f, "{}", e),
        }
    }
}

pub fn apply_quote(args: &[Value]) -> Result {
    Arity::exactly(1)
        .validate_for(args.len(), "quote")
        .map_err(Error::BadArgCount)?;
    Ok(args[0].clone())
}

/// Binds in the current frame and hands back the bound name, not the value.
pub fn apply_def(args: &[Value], env: &Rc<Environment>, depth: usize) -> Result {
    let (key, value) = match args {
        [key, value] => Ok((key, value)),
        _ => Err(Error::Def(DefError::WrongArgCount(args.len()))),
    }?;
    let key = key
        .as_symbol()
        .or(Err(Error::Def(DefError::KeyNotASymbol)))?;
    let value = eval_nested(value, env, depth + 1)?;
    log::debug!("define {} as {}", key, value);
    env.set(key.clone(), value);
    Ok(Value::Symbol(key.clone()))
}

pub fn apply_if(args: &[Value], env: &Rc<Environment>, depth: usize) -> Result {
    Arity::Between(2..=3)
        .validate_for(args.len(), "if")
        .map_err(Error::BadArgCount)?;
    let condition = eval_nested(&args[0], env, depth + 1)?;
    if truthy(&condition) {
        eval_nested(&args[1], env, depth + 1)
    } else if args.len() == 3 {
        eval_nested(&args[2], env, depth + 1)
    } else {
        Ok(Value::nil())
    }
}

pub fn apply_lambda(args: &[Value], env: &Rc<Environment>) -> Result {
    let (parameters, body) = args
        .split_first()
        .ok_or(Error::Fn(FnError::MissingParameters))?;
    let closure = Closure {
        parameters: extract_parameters(parameters).map_err(Error::Fn)?,
        body: body.to_vec(),
        parent: env.clone(),
    };
    Ok(Value::Function(Callable::Closure(Rc::new(closure))))
}

/// Accepts both `(defmacro name (params...) body...)` and
/// `(defmacro (name params...) body...)`.
pub fn apply_defmacro(args: &[Value], env: &Rc<Environment>) -> Result {
    let (name, parameters, body) = match args {
        [Value::Symbol(name), parameters, body @ ..] => {
            let parameters = extract_parameters(parameters)
                .map_err(|e| Error::Defmacro(DefmacroError::BadParameters(e)))?;
            (name, parameters, body)
        }
        [Value::List(signature), body @ ..] => {
            let (name, parameters) = signature
                .split_first()
                .ok_or(Error::Defmacro(DefmacroError::MissingSignature))?;
            let name = match name {
                Value::Symbol(s) => s,
                _ => return Err(Error::Defmacro(DefmacroError::NameNotASymbol)),
            };
            let parameters = symbols(parameters)
                .map_err(|e| Error::Defmacro(DefmacroError::BadParameters(e)))?;
            (name, parameters, body)
        }
        [Value::Symbol(_)] | [] => return Err(Error::Defmacro(DefmacroError::MissingSignature)),
        [_, ..] => return Err(Error::Defmacro(DefmacroError::NameNotASymbol)),
    };
    let closure = Closure {
        parameters,
        body: body.to_vec(),
        parent: env.clone(),
    };
    log::debug!("define macro {} {:?}", name, closure);
    env.set(name.clone(), Value::Macro(Rc::new(closure)));
    Ok(Value::Symbol(name.clone()))
}

fn extract_parameters(parameters: &Value) -> std::result::Result<Vec<Symbol>, FnError> {
    match parameters {
        Value::List(list) => symbols(list),
        _ => Err(FnError::ParametersNotGivenAsList),
    }
}

fn symbols(objs: &[Value]) -> std::result::Result<Vec<Symbol>, FnError> {
    objs.iter()
        .map(|obj| match obj {
            Value::Symbol(s) => Ok(s.clone()),
            _ => Err(FnError::ParameterNotASymbol),
        })
        .collect()
}
