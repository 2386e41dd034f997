//! Schema declarations for request options.

use std::fmt;

use serde_json::Value;

/// Runtime type tag of a JSON option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Bool,
    /// A number without a fractional part.
    Int,
    Float,
    String,
    Array,
    Object,
}

impl ValueType {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Int,
            Value::Number(_) => Self::Float,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constant value an option may be compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Str(&'static str),
    Int(i64),
    Bool(bool),
}

impl Literal {
    /// Value equality against a JSON value. No coercion: `"1"` is not `1`.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Str(s), Value::String(v)) => s == v,
            (Self::Int(i), Value::Number(n)) => n.as_i64() == Some(*i),
            (Self::Bool(b), Value::Bool(v)) => b == v,
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// A named check over an option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// The value is an array and every element has the given type.
    EachElement(ValueType),
}

impl Predicate {
    /// Evaluate against a value.
    pub fn holds(&self, value: &Value) -> bool {
        match self {
            Self::EachElement(ty) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|item| ValueType::of(item) == *ty)),
        }
    }

    /// Human-readable statement of what the predicate requires.
    pub fn describe(&self) -> String {
        match self {
            Self::EachElement(ty) => format!("every element must be of type {ty}"),
        }
    }
}

/// The value constraint of an option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRule {
    /// The value must equal one of the listed literals.
    OneOf(&'static [Literal]),
    /// The value must satisfy the predicate.
    Predicate(Predicate),
}

impl ValueRule {
    pub fn allows(&self, value: &Value) -> bool {
        match self {
            Self::OneOf(literals) => literals.iter().any(|l| l.matches(value)),
            Self::Predicate(p) => p.holds(value),
        }
    }

    /// Reason reported when a value is rejected.
    pub fn describe(&self) -> String {
        match self {
            Self::OneOf(literals) => {
                let accepted = literals
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("accepted values are: {accepted}")
            }
            Self::Predicate(p) => p.describe(),
        }
    }
}

/// One recognised option of an operation.
///
/// Built with `const` builder methods so schemas can live in constants:
///
/// ```
/// use gitlabapi::options::{Literal, OptionSchema, ValueRule};
///
/// const STATE: OptionSchema = OptionSchema::defined("state")
///     .allowed_values(ValueRule::OneOf(&[Literal::Str("opened"), Literal::Str("closed")]));
/// assert!(!STATE.required);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionSchema {
    pub name: &'static str,
    pub required: bool,
    pub allowed_types: Option<&'static [ValueType]>,
    pub allowed_values: Option<ValueRule>,
}

impl OptionSchema {
    /// An optional, unconstrained option.
    pub const fn defined(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            allowed_types: None,
            allowed_values: None,
        }
    }

    /// A required, unconstrained option.
    pub const fn required(name: &'static str) -> Self {
        Self {
            required: true,
            ..Self::defined(name)
        }
    }

    pub const fn allowed_types(self, types: &'static [ValueType]) -> Self {
        Self {
            allowed_types: Some(types),
            ..self
        }
    }

    pub const fn allowed_values(self, rule: ValueRule) -> Self {
        Self {
            allowed_values: Some(rule),
            ..self
        }
    }
}

/// The full set of options an operation accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schema {
    options: &'static [OptionSchema],
}

impl Schema {
    /// A schema with no options at all.
    pub const EMPTY: Schema = Schema::new(&[]);

    /// Declare a schema.
    ///
    /// # Panics
    ///
    /// Panics if two options share a name. In a `const` this is a
    /// compile-time error.
    pub const fn new(options: &'static [OptionSchema]) -> Self {
        let mut i = 0;
        while i < options.len() {
            let mut j = i + 1;
            while j < options.len() {
                if str_eq(options[i].name, options[j].name) {
                    panic!("duplicate option name in schema");
                }
                j += 1;
            }
            i += 1;
        }
        Self { options }
    }

    pub fn get(&self, name: &str) -> Option<&OptionSchema> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn options(&self) -> &'static [OptionSchema] {
        self.options
    }

    /// Declared option names, in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.options.iter().map(|o| o.name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_type_of() {
        assert_eq!(ValueType::of(&json!(null)), ValueType::Null);
        assert_eq!(ValueType::of(&json!(true)), ValueType::Bool);
        assert_eq!(ValueType::of(&json!(3)), ValueType::Int);
        assert_eq!(ValueType::of(&json!(-3)), ValueType::Int);
        assert_eq!(ValueType::of(&json!(1.5)), ValueType::Float);
        assert_eq!(ValueType::of(&json!("x")), ValueType::String);
        assert_eq!(ValueType::of(&json!([1])), ValueType::Array);
        assert_eq!(ValueType::of(&json!({"a": 1})), ValueType::Object);
    }

    #[test]
    fn test_float_with_integral_value_is_not_int() {
        assert_eq!(ValueType::of(&json!(1.0)), ValueType::Float);
    }

    #[test]
    fn test_literal_matches_without_coercion() {
        assert!(Literal::Str("opened").matches(&json!("opened")));
        assert!(!Literal::Str("1").matches(&json!(1)));
        assert!(Literal::Int(1).matches(&json!(1)));
        assert!(!Literal::Int(1).matches(&json!("1")));
        assert!(Literal::Bool(false).matches(&json!(false)));
    }

    #[test]
    fn test_each_element_predicate() {
        let p = Predicate::EachElement(ValueType::Int);
        assert!(p.holds(&json!([1, 2, 3])));
        assert!(p.holds(&json!([])));
        assert!(!p.holds(&json!([1, "x"])));
        assert!(!p.holds(&json!([1, 2.5])));
        assert!(!p.holds(&json!(1)));
        assert!(!p.holds(&json!({"0": 1})));
    }

    #[test]
    fn test_rule_descriptions() {
        let rule = ValueRule::OneOf(&[Literal::Str("all"), Literal::Str("closed")]);
        assert_eq!(rule.describe(), "accepted values are: \"all\", \"closed\"");

        let rule = ValueRule::Predicate(Predicate::EachElement(ValueType::Int));
        assert_eq!(rule.describe(), "every element must be of type int");
    }

    #[test]
    fn test_schema_lookup() {
        const SCHEMA: Schema = Schema::new(&[
            OptionSchema::defined("search"),
            OptionSchema::required("title").allowed_types(&[ValueType::String]),
        ]);

        assert_eq!(SCHEMA.names(), vec!["search", "title"]);
        assert!(SCHEMA.contains("title"));
        assert!(SCHEMA.get("title").is_some_and(|o| o.required));
        assert!(!SCHEMA.contains("state"));
        assert!(Schema::EMPTY.is_empty());
    }

    #[test]
    #[should_panic(expected = "duplicate option name")]
    fn test_schema_rejects_duplicate_names() {
        static OPTIONS: [OptionSchema; 2] =
            [OptionSchema::defined("state"), OptionSchema::defined("state")];
        let _ = Schema::new(&OPTIONS);
    }
}
