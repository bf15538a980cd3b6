use crate::stdlib;
use crate::types::{Callable, Symbol, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// One scope frame plus a link to the enclosing frame.
///
/// Frames are shared: every closure created in a frame holds an `Rc` to it, so
/// a later `def` in that frame is visible to all of them.
#[derive(Default)]
pub struct Environment {
    data: RefCell<HashMap<Symbol, Value>>,
    outer: Option<Rc<Environment>>,
}

#[derive(Debug)]
pub struct UnknownSymbol(pub Symbol);

impl fmt::Display for UnknownSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol '{}' not found", self.0)
    }
}

impl Environment {
    /// A root frame holding the standard library.
    pub fn standard() -> Rc<Self> {
        let env = Self::default();
        for (&name, &func) in stdlib::CORE.iter() {
            env.set(name, Value::Function(Callable::Primitive(func)));
        }
        Rc::new(env)
    }

    pub fn spawn_from(outer: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            data: RefCell::new(HashMap::new()),
            outer: Some(outer.clone()),
        })
    }

    /// Binds in this frame only; an ancestor's binding of the same name is shadowed.
    pub fn set<T>(&self, key: T, value: Value) -> Option<Value>
    where
        T: Into<Symbol>,
    {
        self.data.borrow_mut().insert(key.into(), value)
    }

    pub fn get(&self, key: &Symbol) -> Option<Value> {
        match self.data.borrow().get(key) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.get(key)),
        }
    }

    pub fn fetch(&self, key: &Symbol) -> Result<Value, UnknownSymbol> {
        self.get(key).ok_or_else(|| UnknownSymbol(key.clone()))
    }

    pub fn depth(&self) -> usize {
        match &self.outer {
            None => 0,
            Some(outer) => 1 + outer.depth(),
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        let mut names: Vec<&str> = data.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        write!(f, "Environment{{depth: {}, names: {:?}}}", self.depth(), names)
    }
}
