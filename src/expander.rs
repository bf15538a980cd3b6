//! Macro expansion.
//!
//! Every top-level form is rewritten once before it is evaluated. A macro body
//! is ordinary code run by the evaluator, with its parameters bound to the
//! *unevaluated* argument forms; whatever it returns replaces the call and is
//! expanded again. Nothing is renamed, so an expansion sees (and can shadow)
//! whatever names are in scope where it lands.

use crate::environment::Environment;
use crate::evaluator::{self, Error, Result};
use crate::types::{Closure, Value};
use crate::MAX_EVAL_DEPTH;
use std::rc::Rc;

pub fn expand(ast: &Value, env: &Rc<Environment>) -> Result {
    expand_nested(ast, env, 0)
}

// Macro bodies are evaluated mid-expansion, so both draw on one depth budget.
fn expand_nested(ast: &Value, env: &Rc<Environment>, depth: usize) -> Result {
    if depth >= MAX_EVAL_DEPTH {
        return Err(Error::RecursionLimit);
    }
    let list = match ast {
        Value::List(list) if !list.is_empty() => list,
        _ => return Ok(ast.clone()),
    };

    if let Value::Symbol(head) = &list[0] {
        match head.as_str() {
            "quote" => return Ok(ast.clone()),
            // The body of a macro definition is expanded at each call site instead.
            "defmacro" => return Ok(ast.clone()),
            // Leave the bound name or the parameter list alone.
            "def" | "define" | "lambda" => return expand_after(list, 2, env, depth),
            _ => (),
        }
        if let Some(Value::Macro(closure)) = env.get(head) {
            let expansion = apply_macro(&closure, &list[1..], depth)?;
            log::trace!("macroexpand {} produced {}", ast, expansion);
            return expand_nested(&expansion, env, depth + 1);
        }
    }

    expand_after(list, 0, env, depth)
}

/// Runs a macro body against the raw argument forms. Parameters without a
/// matching argument are bound to `nil`.
fn apply_macro(closure: &Closure, args: &[Value], depth: usize) -> Result {
    let env = Environment::spawn_from(&closure.parent);
    for (i, key) in closure.parameters.iter().enumerate() {
        let form = args.get(i).cloned().unwrap_or_else(Value::nil);
        env.set(key.clone(), form);
    }
    evaluator::evaluate_body(&closure.body, &env, depth + 1)
}

fn expand_after(list: &[Value], keep: usize, env: &Rc<Environment>, depth: usize) -> Result {
    let mut elements = list.iter().take(keep).cloned().collect::<Vec<_>>();
    for form in list.iter().skip(keep) {
        elements.push(expand_nested(form, env, depth + 1)?);
    }
    Ok(Value::wrap_list(elements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::eval;
    use crate::reader::read_str;

    fn read_one(source: &str) -> Value {
        read_str(source).unwrap().remove(0)
    }

    fn session_with(definitions: &str) -> Rc<Environment> {
        let env = Environment::standard();
        for form in read_str(definitions).unwrap() {
            let form = expand(&form, &env).unwrap();
            eval(&form, &env).unwrap();
        }
        env
    }

    fn expand_str(source: &str, env: &Rc<Environment>) -> String {
        expand(&read_one(source), env).unwrap().to_string()
    }

    #[test]
    fn forms_without_macros_are_unchanged() {
        let env = Environment::standard();
        for source in &["1", "x", "()", "(+ 1 (* 2 3))", "(if a b c)"] {
            assert_eq!(&expand_str(source, &env), source);
        }
    }

    #[test]
    fn macro_call_is_replaced_by_its_expansion() {
        let env = session_with("(defmacro (infix a op b) (list op a b))");
        assert_eq!(expand_str("(infix 10 + 20)", &env), "(+ 10 20)");
        assert_eq!(
            expand_str("(* 2 (infix 1 - 3))", &env),
            "(* 2 (- 1 3))"
        );
    }

    #[test]
    fn arguments_are_not_evaluated() {
        let env = session_with("(defmacro (first-form a b) a)");
        assert_eq!(expand_str("(first-form (undefined 1) 2)", &env), "(undefined 1)");
    }

    #[test]
    fn missing_macro_arguments_are_nil() {
        let env = session_with("(defmacro (pair a b) (list 'list a b))");
        assert_eq!(expand_str("(pair 1)", &env), "(list 1 nil)");
    }

    #[test]
    fn expansion_is_repeated() {
        let env = session_with(
            "(defmacro (infix a op b) (list op a b))
             (defmacro (twice-infix x) (list 'infix x '+ x))",
        );
        assert_eq!(expand_str("(twice-infix 4)", &env), "(+ 4 4)");
    }

    #[test]
    fn quoted_data_is_left_alone() {
        let env = session_with("(defmacro (infix a op b) (list op a b))");
        assert_eq!(expand_str("'(infix 1 + 2)", &env), "(quote (infix 1 + 2))");
    }

    #[test]
    fn def_and_lambda_keep_their_names() {
        let env = session_with("(defmacro (infix a op b) (list op a b))");
        assert_eq!(
            expand_str("(def infix (infix 1 + 2))", &env),
            "(def infix (+ 1 2))"
        );
        assert_eq!(
            expand_str("(lambda (infix) (infix 1 + 2))", &env),
            "(lambda (infix) (+ 1 2))"
        );
    }

    #[test]
    fn defmacro_bodies_are_not_expanded_at_definition() {
        let env = session_with("(defmacro (infix a op b) (list op a b))");
        let source = "(defmacro (m) (infix 1 + 2))";
        assert_eq!(&expand_str(source, &env), source);
    }

    #[test]
    fn unbound_and_non_macro_heads_fall_through() {
        let env = session_with("(def f (lambda (x) x))");
        assert_eq!(expand_str("(g 1)", &env), "(g 1)");
        assert_eq!(expand_str("(f 1)", &env), "(f 1)");
    }

    #[test]
    fn macro_bodies_can_compute() {
        let env = session_with(
            "(defmacro (unless c then else) (list 'if c else then))",
        );
        assert_eq!(
            expand_str("(unless t 1 2)", &env),
            "(if t 2 1)"
        );
    }

    #[test]
    fn self_expanding_macros_hit_the_depth_limit() {
        let env = session_with("(defmacro (again x) (list 'again x))");
        assert!(matches!(
            expand(&read_one("(again 1)"), &env),
            Err(Error::RecursionLimit)
        ));
    }

    #[test]
    fn errors_in_macro_bodies_propagate() {
        let env = session_with("(defmacro (broken x) (car x))");
        assert!(expand(&read_one("(broken 1)"), &env).is_err());
    }
}
