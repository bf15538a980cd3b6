use crate::types::Value;
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrintMode {
    /// Strings keep their quotes, so literal values read back unchanged.
    ReadableRepresentation,
    /// Strings are written bare. Used for `print` output.
    Directly,
}

pub fn pr_str(object: &Value, mode: PrintMode) -> String {
    match object {
        Value::Number(x) => x.to_string(),
        Value::String(s) => match mode {
            PrintMode::ReadableRepresentation => format!("\"{}\"", s),
            PrintMode::Directly => s.clone(),
        },
        Value::Symbol(name) => name.to_string(),
        Value::Bool(true) => String::from("t"),
        Value::Bool(false) => String::from("nil"),
        Value::List(elements) => format!(
            "({})",
            elements.iter().map(|obj| pr_str(obj, mode)).join(" ")
        ),
        Value::Function(_) => String::from("<function>"),
        Value::Macro(_) => String::from("<macro>"),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", pr_str(self, PrintMode::ReadableRepresentation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str;

    fn round_trip(source: &str) -> String {
        let forms = read_str(source).unwrap();
        pr_str(&forms[0], PrintMode::ReadableRepresentation)
    }

    #[test]
    fn literals_print_as_they_were_read() {
        for source in &[
            "486",
            "-2.5",
            "t",
            "nil",
            "()",
            "foo",
            r#""bar""#,
            r#"(1 (2 "x") nil t sym ())"#,
        ] {
            assert_eq!(&round_trip(source), source);
        }
    }

    #[test]
    fn numbers_use_shortest_form() {
        assert_eq!(Value::Number(486.0).to_string(), "486");
        assert_eq!(Value::Number(0.1 + 0.2).to_string(), "0.30000000000000004");
    }

    #[test]
    fn quote_shorthand_prints_long_form() {
        assert_eq!(round_trip("'x"), "(quote x)");
    }

    #[test]
    fn direct_mode_drops_string_quotes() {
        let list = Value::wrap_list(vec![Value::String("a b".into()), Value::Number(1.0)]);
        assert_eq!(pr_str(&list, PrintMode::Directly), "(a b 1)");
        assert_eq!(list.to_string(), r#"("a b" 1)"#);
    }
}
