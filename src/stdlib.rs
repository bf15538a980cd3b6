use crate::evaluator;
use crate::types::{identical, Arity, PrimitiveFn, Value};
use std::collections::HashMap;

fn grab_numbers(args: &[Value]) -> evaluator::Result<Vec<f64>> {
    let type_check: Result<Vec<_>, _> = args.iter().map(Value::as_number).collect();
    type_check.map_err(evaluator::Error::TypeMismatch)
}

const SUM: PrimitiveFn = PrimitiveFn {
    name: "+",
    fn_ptr: sum_,
    arity: Arity::at_least(0),
};

fn sum_(args: &[Value]) -> evaluator::Result {
    let value = grab_numbers(args)?.iter().fold(0.0, |acc, x| acc + x);
    Ok(Value::Number(value))
}

// Without a second operand this subtracts 0, so `(- 5)` is 5 rather than -5.
const SUB: PrimitiveFn = PrimitiveFn {
    name: "-",
    fn_ptr: sub_,
    arity: Arity::Between(1..=2),
};

fn sub_(args: &[Value]) -> evaluator::Result {
    match grab_numbers(args)?.as_slice() {
        [x] => Ok(Value::Number(x - 0.0)),
        [x, y] => Ok(Value::Number(x - y)),
        _ => unreachable!(),
    }
}

const MUL: PrimitiveFn = PrimitiveFn {
    name: "*",
    fn_ptr: mul_,
    arity: Arity::at_least(0),
};

fn mul_(args: &[Value]) -> evaluator::Result {
    let value = grab_numbers(args)?.iter().fold(1.0, |acc, x| acc * x);
    Ok(Value::Number(value))
}

const DIV: PrimitiveFn = PrimitiveFn {
    name: "/",
    fn_ptr: div_,
    arity: Arity::exactly(2),
};

fn div_(args: &[Value]) -> evaluator::Result {
    match grab_numbers(args)?.as_slice() {
        [x, y] => Ok(Value::Number(x / y)),
        _ => unreachable!(),
    }
}

const LIST: PrimitiveFn = PrimitiveFn {
    name: "list",
    fn_ptr: list_,
    arity: Arity::at_least(0),
};

fn list_(args: &[Value]) -> evaluator::Result {
    Ok(Value::wrap_list(args.to_vec()))
}

const CAR: PrimitiveFn = PrimitiveFn {
    name: "car",
    fn_ptr: car_,
    arity: Arity::exactly(1),
};

fn car_(args: &[Value]) -> evaluator::Result {
    let list = args[0].as_list()?;
    Ok(list.first().cloned().unwrap_or_else(Value::nil))
}

const CDR: PrimitiveFn = PrimitiveFn {
    name: "cdr",
    fn_ptr: cdr_,
    arity: Arity::exactly(1),
};

fn cdr_(args: &[Value]) -> evaluator::Result {
    let list = args[0].as_list()?;
    let rest = list.iter().skip(1).cloned().collect();
    Ok(Value::wrap_list(rest))
}

const CONS: PrimitiveFn = PrimitiveFn {
    name: "cons",
    fn_ptr: cons_,
    arity: Arity::exactly(2),
};

// There are no dotted pairs: consing onto a non-list makes a two element list.
fn cons_(args: &[Value]) -> evaluator::Result {
    let head = &args[0];
    let mut elements = vec![head.clone()];
    match &args[1] {
        Value::List(tail) => elements.extend(tail.iter().cloned()),
        other => elements.push(other.clone()),
    }
    Ok(Value::wrap_list(elements))
}

const EQ: PrimitiveFn = PrimitiveFn {
    name: "eq",
    fn_ptr: eq_,
    arity: Arity::exactly(2),
};

fn eq_(args: &[Value]) -> evaluator::Result {
    Ok(Value::Bool(identical(&args[0], &args[1])))
}

const BEGIN: PrimitiveFn = PrimitiveFn {
    name: "begin",
    fn_ptr: last_,
    arity: Arity::at_least(0),
};

const PROGN: PrimitiveFn = PrimitiveFn {
    name: "progn",
    fn_ptr: last_,
    arity: Arity::at_least(0),
};

// The arguments were already evaluated in order by the caller.
fn last_(args: &[Value]) -> evaluator::Result {
    Ok(args.last().cloned().unwrap_or_else(Value::nil))
}

const PRIMITIVES: &[PrimitiveFn] = &[
    // Arithmetic
    SUM,
    SUB,
    MUL,
    DIV,
    // Working with lists
    LIST,
    CAR,
    CDR,
    CONS,
    // Comparison
    EQ,
    // Sequencing
    BEGIN,
    PROGN,
];

type Namespace = HashMap<&'static str, &'static PrimitiveFn>;
lazy_static! {
    pub static ref CORE: Namespace = {
        let mut map = Namespace::new();
        for func in PRIMITIVES {
            map.insert(func.name, func);
        }
        map
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> evaluator::Result {
        let func = CORE[name];
        func.arity
            .validate_for(args.len(), func.name)
            .map_err(evaluator::Error::BadArgCount)?;
        (func.fn_ptr)(args)
    }

    fn numbers(xs: &[f64]) -> Vec<Value> {
        xs.iter().copied().map(Value::Number).collect()
    }

    #[test]
    fn sum_and_product_fold_from_identity() {
        assert_eq!(call("+", &[]).unwrap(), Value::Number(0.0));
        assert_eq!(call("*", &[]).unwrap(), Value::Number(1.0));
        let xs = [1.5, -2.0, 10.0, 0.25];
        assert_eq!(
            call("+", &numbers(&xs)).unwrap(),
            Value::Number(xs.iter().fold(0.0, |a, x| a + x))
        );
        assert_eq!(
            call("*", &numbers(&xs)).unwrap(),
            Value::Number(xs.iter().fold(1.0, |a, x| a * x))
        );
    }

    #[test]
    fn unary_minus_is_identity() {
        assert_eq!(call("-", &numbers(&[5.0])).unwrap(), Value::Number(5.0));
        assert_eq!(call("-", &numbers(&[5.0, 7.0])).unwrap(), Value::Number(-2.0));
    }

    #[test]
    fn division_needs_two_operands() {
        assert_eq!(call("/", &numbers(&[1.0, 4.0])).unwrap(), Value::Number(0.25));
        assert!(matches!(
            call("/", &numbers(&[1.0])),
            Err(evaluator::Error::BadArgCount(_))
        ));
    }

    #[test]
    fn arithmetic_rejects_non_numbers() {
        assert!(matches!(
            call("+", &[Value::Number(1.0), Value::String("2".into())]),
            Err(evaluator::Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn car_and_cdr() {
        let list = Value::wrap_list(numbers(&[1.0, 2.0, 3.0]));
        assert_eq!(call("car", &[list.clone()]).unwrap(), Value::Number(1.0));
        assert_eq!(
            call("cdr", &[list]).unwrap(),
            Value::wrap_list(numbers(&[2.0, 3.0]))
        );
        assert_eq!(call("car", &[Value::new_list()]).unwrap(), Value::nil());
        assert_eq!(call("cdr", &[Value::new_list()]).unwrap(), Value::new_list());
        assert!(call("car", &[Value::Number(1.0)]).is_err());
        assert!(call("cdr", &[Value::nil()]).is_err());
    }

    #[test]
    fn cons_prepends_or_pairs() {
        let tail = Value::wrap_list(numbers(&[2.0, 3.0]));
        assert_eq!(
            call("cons", &[Value::Number(1.0), tail]).unwrap(),
            Value::wrap_list(numbers(&[1.0, 2.0, 3.0]))
        );
        assert_eq!(
            call("cons", &numbers(&[1.0, 2.0])).unwrap(),
            Value::wrap_list(numbers(&[1.0, 2.0]))
        );
        assert!(call("cons", &numbers(&[1.0])).is_err());
    }

    #[test]
    fn begin_returns_last_or_nil() {
        assert_eq!(call("begin", &[]).unwrap(), Value::nil());
        assert_eq!(call("progn", &numbers(&[1.0, 2.0])).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn print_is_left_to_the_session() {
        // Output goes to session listeners, so the shared namespace has no `print`.
        assert!(!CORE.contains_key("print"));
    }
}
