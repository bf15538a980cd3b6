use crate::environment::Environment;
use crate::printer::{pr_str, PrintMode};
use crate::types::{Arity, Callable, HostFn, Value};
use crate::{evaluator, expander, reader, tokens};
use derive_more::From;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub type Result<T = Value> = std::result::Result<T, Error>;
#[derive(Debug, From)]
pub enum Error {
    Read(reader::Error),
    Eval(evaluator::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorKind {
    Syntax,
    Name,
    Type,
    Range,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "SyntaxError"),
            ErrorKind::Name => write!(f, "NameError"),
            ErrorKind::Type => write!(f, "TypeError"),
            ErrorKind::Range => write!(f, "RangeError"),
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Read(_) => ErrorKind::Syntax,
            Error::Eval(evaluator::Error::UnknownSymbol(_)) => ErrorKind::Name,
            Error::Eval(evaluator::Error::RecursionLimit) => ErrorKind::Range,
            Error::Eval(_) => ErrorKind::Type,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "{}: {}", self.kind(), e),
            Error::Eval(e) => write!(f, "{}: {}", self.kind(), e),
        }
    }
}

/// What a session reports to its listeners, in order: the submitted code,
/// any `print` output, then either the printed result or the error.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Input(String),
    Stdout(String),
    Result(String),
    Error(String),
}

pub type ListenerId = usize;

#[derive(Default)]
struct Listeners {
    next_id: ListenerId,
    registered: Vec<(ListenerId, Box<dyn FnMut(&Event)>)>,
}

impl Listeners {
    fn notify(&mut self, event: &Event) {
        for (_, listener) in self.registered.iter_mut() {
            listener(event);
        }
    }
}

/// One interpreter instance. Definitions made by a submission stay visible to
/// later submissions on the same session.
pub struct Session {
    env: Rc<Environment>,
    listeners: Rc<RefCell<Listeners>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let session = Self {
            env: Environment::standard(),
            listeners: Rc::new(RefCell::new(Listeners::default())),
        };
        let listeners = Rc::clone(&session.listeners);
        session.define_native("print", Arity::at_least(1), move |args| {
            let text = pr_str(&args[0], PrintMode::Directly);
            log::info!("print: {}", text);
            listeners.borrow_mut().notify(&Event::Stdout(text));
            Ok(args[0].clone())
        });
        session
    }

    /// Installs a native procedure in the session's global frame.
    pub fn define_native<F>(&self, name: &str, arity: Arity, func: F)
    where
        F: Fn(&[Value]) -> evaluator::Result + 'static,
    {
        let host = HostFn {
            name: name.into(),
            arity,
            func: Box::new(func),
        };
        self.env
            .set(name, Value::Function(Callable::Host(Rc::new(host))));
    }

    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + 'static,
    {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.registered.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.registered.len();
        listeners.registered.retain(|(registered, _)| *registered != id);
        listeners.registered.len() != before
    }

    /// Reads, expands and evaluates every top-level form in `code`, returning
    /// the value of the last one (`nil` if there were none). Work done by
    /// earlier forms is kept even if a later one fails.
    pub fn submit(&mut self, code: &str) -> Result {
        self.notify(Event::Input(code.into()));
        let outcome = self.evaluate(code);
        match &outcome {
            Ok(value) => self.notify(Event::Result(value.to_string())),
            Err(e) => self.notify(Event::Error(e.to_string())),
        }
        outcome
    }

    /// Read-eval-print: like [`Session::submit`] but rendered as text, with
    /// failures as `Error: ...`.
    pub fn rep(&mut self, code: &str) -> String {
        match self.submit(code) {
            Ok(value) => value.to_string(),
            Err(e) => format!("Error: {}", e),
        }
    }

    fn evaluate(&self, code: &str) -> Result {
        let tokens = tokens::tokenize(code);
        let mut reader = tokens.iter().peekable();
        let mut last = Value::nil();
        while reader.peek().is_some() {
            let ast = reader::read_form(&mut reader)?;
            log::debug!("read {}", ast);
            let ast = expander::expand(&ast, &self.env)?;
            log::trace!("expanded to {}", ast);
            last = evaluator::eval(&ast, &self.env)?;
            log::debug!("evaluated to {}", last);
        }
        Ok(last)
    }

    fn notify(&self, event: Event) {
        self.listeners.borrow_mut().notify(&event);
    }
}

/// Runs one submission in a fresh session.
pub fn run(code: &str) -> String {
    Session::new().rep(code)
}
