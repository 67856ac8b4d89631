//! Typed get-with-default access into decoded JSON.

use serde_json::Value;

/// Conversion from an optional JSON node into a concrete value
///
/// Implementations must not fail: a missing node or a node of the wrong type
/// yields the type's zero value.
pub trait FromField: Sized {
    fn from_field(value: Option<&Value>) -> Self;
}

/// Walk a dotted path (`"header.height"`, `"validators.0.account_id"`)
///
/// Numeric segments index into arrays. An empty path returns the value itself.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    path.split('.').try_fold(value, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Typed lookup with a zero-value fallback
///
/// # Example
/// ```
/// use near_rpc_tables::normalize::get;
/// use serde_json::json;
///
/// let raw = json!({"header": {"height": 42}});
/// let height: Option<i64> = get(&raw, "header.height");
/// let author: String = get(&raw, "author");
/// assert_eq!(height, Some(42));
/// assert_eq!(author, "");
/// ```
pub fn get<T: FromField>(value: &Value, path: &str) -> T {
    T::from_field(lookup(value, path))
}

/// Strings pass through; numbers keep their exact decimal text
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl FromField for Option<String> {
    fn from_field(value: Option<&Value>) -> Self {
        value.and_then(as_text)
    }
}

impl FromField for String {
    fn from_field(value: Option<&Value>) -> Self {
        value.and_then(as_text).unwrap_or_default()
    }
}

impl FromField for Option<i64> {
    fn from_field(value: Option<&Value>) -> Self {
        match value? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromField for Option<u64> {
    fn from_field(value: Option<&Value>) -> Self {
        match value? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromField for Option<f64> {
    fn from_field(value: Option<&Value>) -> Self {
        match value? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromField for Option<bool> {
    fn from_field(value: Option<&Value>) -> Self {
        value.and_then(Value::as_bool)
    }
}

impl FromField for Vec<Value> {
    fn from_field(value: Option<&Value>) -> Self {
        value
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }
}

impl FromField for Value {
    fn from_field(value: Option<&Value>) -> Self {
        value.cloned().unwrap_or(Value::Null)
    }
}

/// `None` for both a missing node and an explicit `null`
impl FromField for Option<Value> {
    fn from_field(value: Option<&Value>) -> Self {
        value.filter(|v| !v.is_null()).cloned()
    }
}
