use crate::types::Value;

pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Null, Value::Null) => true,
        // Arrays: shallow equality by elements
        (Value::Array(ax), Value::Array(ay)) => {
            ax.len() == ay.len() && ax.iter().zip(ay.iter()).all(|(u, v)| values_equal(u, v))
        }
        (Value::Lambda(x), Value::Lambda(y)) => x == y,
        _ => false,
    }
}

/// Collect the numbers in `values`, descending into arrays.
pub fn collect_numbers(values: &[Value]) -> Vec<f64> {
    fn visit(v: &Value, out: &mut Vec<f64>) {
        match v {
            Value::Number(n) => out.push(*n),
            Value::Array(items) => items.iter().for_each(|it| visit(it, out)),
            _ => {}
        }
    }
    let mut out = Vec::new();
    values.iter().for_each(|v| visit(v, &mut out));
    out
}

/// Count the non-null leaves of `values`, descending into arrays.
pub fn count_present(values: &[Value]) -> usize {
    values
        .iter()
        .map(|v| match v {
            Value::Null => 0,
            Value::Array(items) => count_present(items),
            _ => 1,
        })
        .sum()
}

/// Wrap a scalar as a one-element list; arrays are returned as-is.
pub fn into_list(v: Value) -> Vec<Value> {
    match v {
        Value::Array(items) => items,
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_arrays_are_flattened() {
        let values = vec![
            Value::Number(1.0),
            Value::Array(vec![Value::Number(2.0), Value::String("x".into()), Value::Null]),
        ];
        assert_eq!(collect_numbers(&values), vec![1.0, 2.0]);
        assert_eq!(count_present(&values), 3);
    }

    #[test]
    fn scalar_becomes_single_item_list() {
        assert_eq!(into_list(Value::Number(5.0)), vec![Value::Number(5.0)]);
        assert_eq!(into_list(Value::Array(vec![])), Vec::<Value>::new());
    }
}
