use crate::tokens::tokenize;
use crate::types::Value;
use crate::MAX_READ_DEPTH;
use std::fmt;
use std::iter::Peekable;
use std::slice;

/// Cursor over a token stream. It is shared between successive calls to
/// [`read_form`], so one submission can hold several top-level forms.
pub type Reader<'a> = Peekable<slice::Iter<'a, String>>;

pub type Result<T = Value> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq)]
pub enum Error {
    UnexpectedEof,
    UnexpectedCloseParen,
    TooDeeplyNested,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedEof => write!(f, "unexpected end of input"),
            Error::UnexpectedCloseParen => write!(f, "unexpected ')'"),
            Error::TooDeeplyNested => {
                write!(f, "too deeply nested (max depth: {})", MAX_READ_DEPTH)
            }
        }
    }
}

/// Reads every top-level form in `input`.
pub fn read_str(input: &str) -> Result<Vec<Value>> {
    let tokens = tokenize(input);
    let mut reader = tokens.iter().peekable();
    let mut forms = Vec::new();
    while reader.peek().is_some() {
        forms.push(read_form(&mut reader)?);
    }
    Ok(forms)
}

pub fn read_form(reader: &mut Reader) -> Result {
    read_nested(reader, 0)
}

fn read_nested(reader: &mut Reader, depth: usize) -> Result {
    if depth >= MAX_READ_DEPTH {
        return Err(Error::TooDeeplyNested);
    }
    match reader.next().map(String::as_str) {
        None => Err(Error::UnexpectedEof),
        Some("(") => read_list(reader, depth),
        Some(")") => Err(Error::UnexpectedCloseParen),
        Some("'") => {
            let quoted = read_nested(reader, depth + 1)?;
            Ok(Value::wrap_list(vec![Value::new_symbol("quote"), quoted]))
        }
        Some(token) => Ok(read_atom(token)),
    }
}

fn read_list(reader: &mut Reader, depth: usize) -> Result {
    let mut elements = Vec::new();
    loop {
        match reader.peek().map(|token| token.as_str()) {
            None => return Err(Error::UnexpectedEof),
            Some(")") => {
                reader.next();
                break;
            }
            Some(_) => elements.push(read_nested(reader, depth + 1)?),
        }
    }
    Ok(Value::wrap_list(elements))
}

fn read_atom(token: &str) -> Value {
    match token {
        "t" => Value::Bool(true),
        "nil" => Value::nil(),
        _ if is_string_literal(token) => Value::String(token[1..token.len() - 1].into()),
        _ => match read_number(token) {
            Some(x) => Value::Number(x),
            None => Value::new_symbol(token),
        },
    }
}

fn is_string_literal(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('"') && token.ends_with('"')
}

// A leading letter keeps `inf`, `nan` and friends as symbols, while signed
// forms such as `-inf` still read as numbers.
fn read_number(token: &str) -> Option<f64> {
    match token.chars().next() {
        Some(c) if c.is_alphabetic() => None,
        _ => token.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_one(input: &str) -> Value {
        let mut forms = read_str(input).unwrap();
        assert_eq!(forms.len(), 1, "expected one form in {:?}", input);
        forms.remove(0)
    }

    #[test]
    fn atoms() {
        assert_eq!(read_one("42"), Value::Number(42.0));
        assert_eq!(read_one("-1.5"), Value::Number(-1.5));
        assert_eq!(read_one("1e3"), Value::Number(1000.0));
        assert_eq!(read_one("t"), Value::Bool(true));
        assert_eq!(read_one("nil"), Value::Bool(false));
        assert_eq!(read_one(r#""hi""#), Value::String("hi".into()));
        assert_eq!(read_one("+"), Value::new_symbol("+"));
        assert_eq!(read_one("-"), Value::new_symbol("-"));
        assert_eq!(read_one("inf"), Value::new_symbol("inf"));
        assert_eq!(read_one("NaN"), Value::new_symbol("NaN"));
        assert_eq!(read_one("-inf"), Value::Number(f64::NEG_INFINITY));
        assert_eq!(read_one("+1"), Value::Number(1.0));
        assert_eq!(read_one(".5"), Value::Number(0.5));
        assert_eq!(read_one("x1"), Value::new_symbol("x1"));
    }

    #[test]
    fn nil_and_empty_list_stay_distinct() {
        assert_eq!(read_one("()"), Value::new_list());
        assert_ne!(read_one("()"), read_one("nil"));
    }

    #[test]
    fn quote_shorthand() {
        assert_eq!(
            read_one("'(1 a)"),
            Value::wrap_list(vec![
                Value::new_symbol("quote"),
                Value::wrap_list(vec![Value::Number(1.0), Value::new_symbol("a")]),
            ])
        );
    }

    #[test]
    fn several_top_level_forms() {
        let forms = read_str("(def x 1) x 'y").unwrap();
        assert_eq!(forms.len(), 3);
        assert_eq!(forms[1], Value::new_symbol("x"));
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(read_str("(+ 1 2").unwrap_err(), Error::UnexpectedEof);
        assert_eq!(read_str(")").unwrap_err(), Error::UnexpectedCloseParen);
        assert_eq!(read_str("(1))").unwrap_err(), Error::UnexpectedCloseParen);
        assert_eq!(read_str("'").unwrap_err(), Error::UnexpectedEof);
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let shallow = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert!(read_str(&shallow).is_ok());

        let deep = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(read_str(&deep).unwrap_err(), Error::TooDeeplyNested);
        let quotes = format!("{}x", "'".repeat(100_000));
        assert_eq!(read_str(&quotes).unwrap_err(), Error::TooDeeplyNested);
    }
}
