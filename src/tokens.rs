use regex::Regex;

/// Splits source text into tokens. Parentheses and the quote shorthand are
/// always tokens of their own; everything else is split on whitespace.
///
/// String literals are not recognised here, so `"a b"` becomes the two
/// tokens `"a` and `b"`.
pub fn tokenize(input: &str) -> Vec<String> {
    lazy_static! {
        static ref DELIMITER_RE: Regex = Regex::new(r"[()']").unwrap();
    }
    DELIMITER_RE
        .replace_all(input, " ${0} ")
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// Whether `code` has no unclosed `(`. Parens inside double-quoted strings
/// don't count and a backslash escapes the following character. Surplus `)`
/// still counts as balanced so that the reader gets to report it.
pub fn is_balanced(code: &str) -> bool {
    let mut depth: isize = 0;
    let mut in_string = false;
    let mut escaped = false;
    for c in code.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth <= 0
}
