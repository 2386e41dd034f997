//! Query string encoding in the form GitLab expects.
//!
//! Arrays are sent as repeated `key[]=value` pairs and objects as
//! `key[field]=value`. Booleans are sent as `1` and `0`.

use serde_json::Value;

use crate::transport::Payload;

/// Encode a payload as a query string, without the leading `?`.
///
/// ```
/// use serde_json::json;
///
/// let payload = json!({"iids": [1, 2], "state": "opened"});
/// let query = gitlabapi::encode_query(payload.as_object().unwrap());
/// assert_eq!(query, "iids%5B%5D=1&iids%5B%5D=2&state=opened");
/// ```
pub fn encode_query(payload: &Payload) -> String {
    let mut pairs = Vec::new();
    for (key, value) in payload {
        push_pairs(&mut pairs, key.clone(), value);
    }
    pairs.join("&")
}

fn push_pairs(pairs: &mut Vec<String>, prefix: String, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                push_pairs(pairs, format!("{prefix}[]"), item);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                push_pairs(pairs, format!("{prefix}[{field}]"), item);
            }
        }
        scalar => pairs.push(format!(
            "{}={}",
            urlencoding::encode(&prefix),
            urlencoding::encode(&scalar_text(scalar))
        )),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
