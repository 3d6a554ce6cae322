//! Pretty-printing serializer.
//!
//! Output is deterministic and not configurable:
//!
//! - objects span several lines, one `"key": value` member per line, indented
//!   with tabs, members separated by `,`, and `{}` when empty;
//! - arrays stay on one line as `[ a, b, c ]`, or `[]` when empty;
//! - strings are written between quotes exactly as stored, without escaping;
//! - numbers use the shortest decimal form, with no exponent and no `.0` on
//!   integral values.
//!
//! The nest level is the number of tabs in front of an object's members. Each
//! nested object adds one level; arrays pass the level through unchanged.

use super::types::{Array, Object, Value};

/// Serialize a value with the default nest level of 1.
pub fn to_string(value: &Value) -> String {
    to_string_at(value, 1)
}

/// Serialize a value whose object members (if any) sit at `nest_level` tabs.
pub fn to_string_at(value: &Value, nest_level: usize) -> String {
    let mut output = String::new();
    serialize_value(value, nest_level, &mut output);
    output
}

/// Serialize an object as a document root.
pub fn object_to_string(object: &Object) -> String {
    let mut output = String::new();
    serialize_object(object, 1, &mut output);
    output
}

/// Serialize an array on one line.
pub fn array_to_string(array: &Array) -> String {
    let mut output = String::new();
    serialize_array(array, 1, &mut output);
    output
}

/// Format a number.
///
/// `f64`'s `Display` already gives the shortest digits that read back to the
/// same value and never switches to exponent notation. Fractions are not
/// rounded to a fixed number of decimal places, so `0.1234567` prints in
/// full. Non-finite values have no JSON spelling and print as `null`; the
/// parser never produces them.
pub fn format_number(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        "null".to_string()
    }
}

fn serialize_value(value: &Value, nest_level: usize, output: &mut String) {
    match value {
        Value::String(s) => serialize_string(s, output),
        Value::Number(n) => output.push_str(&format_number(*n)),
        Value::Bool(true) => output.push_str("true"),
        Value::Bool(false) => output.push_str("false"),
        Value::Null => output.push_str("null"),
        Value::Object(object) => serialize_object(object, nest_level, output),
        Value::Array(array) => serialize_array(array, nest_level, output),
    }
}

fn serialize_string(s: &str, output: &mut String) {
    output.push('"');
    output.push_str(s);
    output.push('"');
}

fn serialize_array(array: &[Value], nest_level: usize, output: &mut String) {
    if array.is_empty() {
        output.push_str("[]");
        return;
    }

    output.push_str("[ ");
    for (i, value) in array.iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        serialize_value(value, nest_level, output);
    }
    output.push_str(" ]");
}

fn serialize_object(object: &Object, nest_level: usize, output: &mut String) {
    if object.is_empty() {
        output.push_str("{}");
        return;
    }

    output.push_str("{\n");
    for (i, (key, value)) in object.iter().enumerate() {
        if i > 0 {
            output.push_str(",\n");
        }
        indent(nest_level, output);
        serialize_string(key, output);
        output.push_str(": ");
        serialize_value(value, nest_level + 1, output);
    }
    output.push('\n');
    indent(nest_level.saturating_sub(1), output);
    output.push('}');
}

fn indent(level: usize, output: &mut String) {
    output.extend(std::iter::repeat('\t').take(level));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(members: Vec<(&str, Value)>) -> Object {
        members
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(3.100), "3.1");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.1234567), "0.1234567");
        assert_eq!(format_number(f64::NAN), "null");
        assert_eq!(format_number(f64::INFINITY), "null");
    }

    #[test]
    fn test_serialize_scalars() {
        assert_eq!(to_string(&Value::Null), "null");
        assert_eq!(to_string(&Value::Bool(true)), "true");
        assert_eq!(to_string(&Value::Bool(false)), "false");
        assert_eq!(to_string(&Value::Number(42.0)), "42");
        assert_eq!(to_string(&Value::from("hello")), "\"hello\"");
    }

    #[test]
    fn test_strings_are_not_escaped() {
        assert_eq!(to_string(&Value::from("a\"b\nc")), "\"a\"b\nc\"");
    }

    #[test]
    fn test_serialize_arrays() {
        assert_eq!(array_to_string(&vec![]), "[]");
        let array = vec![Value::from(1), Value::from(2), Value::from(3)];
        assert_eq!(array_to_string(&array), "[ 1, 2, 3 ]");
        let nested = Value::from(vec![Value::from(Array::new()), Value::from("x")]);
        assert_eq!(to_string(&nested), "[ [], \"x\" ]");
    }

    #[test]
    fn test_serialize_empty_object() {
        assert_eq!(object_to_string(&Object::new()), "{}");
    }

    #[test]
    fn test_serialize_single_member() {
        let obj = object(vec![("a", Value::from(1))]);
        assert_eq!(object_to_string(&obj), "{\n\t\"a\": 1\n}");
    }

    #[test]
    fn test_serialize_members_in_insertion_order() {
        let obj = object(vec![
            ("b", Value::from(2)),
            ("a", Value::from("x")),
            ("c", Value::Null),
        ]);
        assert_eq!(
            object_to_string(&obj),
            "{\n\t\"b\": 2,\n\t\"a\": \"x\",\n\t\"c\": null\n}"
        );
    }

    #[test]
    fn test_nested_objects_indent_one_more_tab() {
        let inner = object(vec![("x", Value::from(true))]);
        let outer = object(vec![("inner", Value::from(inner)), ("y", Value::from(1))]);
        assert_eq!(
            object_to_string(&outer),
            "{\n\t\"inner\": {\n\t\t\"x\": true\n\t},\n\t\"y\": 1\n}"
        );
    }

    #[test]
    fn test_object_inside_array_keeps_level() {
        let inner = object(vec![("k", Value::from(1))]);
        let outer = object(vec![("list", Value::from(vec![Value::from(inner)]))]);
        assert_eq!(
            object_to_string(&outer),
            "{\n\t\"list\": [ {\n\t\t\"k\": 1\n\t} ]\n}"
        );
    }

    #[test]
    fn test_to_string_at_custom_level() {
        let obj = Value::from(object(vec![("a", Value::from(1))]));
        assert_eq!(to_string_at(&obj, 2), "{\n\t\t\"a\": 1\n\t}");
        assert_eq!(to_string(&obj), object_to_string(obj.as_object().unwrap()));
    }

    #[test]
    fn test_duplicate_members_all_written() {
        let mut obj = Object::new();
        obj.insert("a".to_string(), Value::from(1));
        obj.insert("a".to_string(), Value::from(2));
        assert_eq!(object_to_string(&obj), "{\n\t\"a\": 1,\n\t\"a\": 2\n}");
    }
}
