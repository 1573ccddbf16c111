//! Provider documents and dot-path traversal.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, error::InvalidDataError, response::PathSpec};

/// Raw payload handed to [`UserResponse::set_data`](crate::response::UserResponse::set_data).
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseData {
	/// JSON text exactly as the provider sent it.
	Text(String),
	/// Raw response body; must be UTF-8 encoded JSON.
	Bytes(Vec<u8>),
	/// Already decoded JSON.
	Decoded(Value),
}
impl From<&str> for ResponseData {
	fn from(text: &str) -> Self {
		Self::Text(text.to_owned())
	}
}
impl From<String> for ResponseData {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}
impl From<&[u8]> for ResponseData {
	fn from(bytes: &[u8]) -> Self {
		Self::Bytes(bytes.to_vec())
	}
}
impl From<Vec<u8>> for ResponseData {
	fn from(bytes: Vec<u8>) -> Self {
		Self::Bytes(bytes)
	}
}
impl From<Value> for ResponseData {
	fn from(value: Value) -> Self {
		Self::Decoded(value)
	}
}

/// Decoded provider document (a JSON object or array).
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseDocument(Value);
impl ResponseDocument {
	/// Validates and decodes `data`. Only objects and arrays are accepted.
	pub fn parse(data: ResponseData) -> Result<Self, InvalidDataError> {
		let value = match data {
			ResponseData::Text(text) => serde_json::from_str::<Value>(&text)
				.map_err(|source| InvalidDataError::Malformed { source })?,
			ResponseData::Bytes(bytes) => serde_json::from_slice::<Value>(&bytes)
				.map_err(|source| InvalidDataError::Malformed { source })?,
			ResponseData::Decoded(value) => value,
		};

		match value {
			Value::Object(_) | Value::Array(_) => Ok(Self(value)),
			other => Err(InvalidDataError::NotAContainer { kind: kind_of(&other) }),
		}
	}

	/// The decoded document.
	pub fn as_value(&self) -> &Value {
		&self.0
	}

	/// Consumes the document, returning the decoded value.
	pub fn into_value(self) -> Value {
		self.0
	}

	/// Follows a dot path (`images.0.url`); object keys and array indices are both segments.
	///
	/// Returns `None` as soon as a segment does not resolve. A JSON `null` at the end of the
	/// path also counts as missing.
	pub fn get(&self, path: &str) -> Option<&Value> {
		let mut node = &self.0;

		for segment in path.split('.') {
			node = match node {
				Value::Object(map) => map.get(segment)?,
				Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
				_ => return None,
			};
		}

		(!node.is_null()).then_some(node)
	}

	/// Resolves a path to its string form (see [`scalar_to_string`]).
	pub fn get_string(&self, path: &str) -> Option<String> {
		self.get(path).and_then(scalar_to_string)
	}

	/// Resolves a [`PathSpec`].
	///
	/// Composite specs resolve every path, drop the ones that are missing, and join the rest
	/// with a single space. When nothing resolves the result is `None`, never an empty string.
	pub fn resolve(&self, spec: &PathSpec) -> Option<String> {
		match spec {
			PathSpec::Absent => None,
			PathSpec::Single(path) => self.get_string(path),
			PathSpec::Composite(paths) => {
				let parts = paths.iter().filter_map(|path| self.get_string(path)).collect::<Vec<_>>();

				if parts.is_empty() { None } else { Some(parts.join(" ")) }
			},
		}
	}
}
impl Default for ResponseDocument {
	fn default() -> Self {
		Self(Value::Object(Map::new()))
	}
}

/// Coerces a JSON scalar into the string shape user getters expose.
///
/// Numbers keep their JSON rendering (`666` → `"666"`), booleans become `"true"`/`"false"`.
/// Objects, arrays, and `null` have no string form.
pub fn scalar_to_string(value: &Value) -> Option<String> {
	match value {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		Value::Null | Value::Array(_) | Value::Object(_) => None,
	}
}

fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn document(value: Value) -> ResponseDocument {
		ResponseDocument::parse(value.into()).expect("Fixture document should be accepted.")
	}

	#[test]
	fn traverses_objects_and_arrays() {
		let doc = document(json!({
			"id": "wizzler",
			"images": [{ "url": "https://img", "height": null }],
			"followers": { "total": 3829 },
		}));

		assert_eq!(doc.get_string("images.0.url"), Some("https://img".into()));
		assert_eq!(doc.get_string("followers.total"), Some("3829".into()));
		assert_eq!(doc.get("images.0.height"), None);
		assert_eq!(doc.get("images.1.url"), None);
		assert_eq!(doc.get("images.first.url"), None);
		assert_eq!(doc.get("id.nested"), None);
		assert_eq!(doc.get_string("images"), None, "Containers have no string form.");
	}

	#[test]
	fn top_level_arrays_are_indexable() {
		let doc = document(json!([{ "name": "first" }]));

		assert_eq!(doc.get_string("0.name"), Some("first".into()));
	}

	#[test]
	fn composite_specs_join_in_order_and_skip_missing() {
		let spec = PathSpec::from(["first_name", "middle_name", "last_name"]);
		let doc = document(json!({ "first_name": "foo", "last_name": "bar" }));

		assert_eq!(doc.resolve(&spec), Some("foo bar".into()));

		let doc = document(json!({ "first_name": null, "last_name": "bar" }));

		assert_eq!(doc.resolve(&spec), Some("bar".into()));

		let doc = document(json!({ "unrelated": true }));

		assert_eq!(doc.resolve(&spec), None);
		assert_eq!(doc.resolve(&PathSpec::Absent), None);
	}

	#[test]
	fn rejects_invalid_payloads() {
		assert!(matches!(
			ResponseDocument::parse("not_json".into()),
			Err(InvalidDataError::Malformed { .. })
		));
		assert!(matches!(
			ResponseDocument::parse("42".into()),
			Err(InvalidDataError::NotAContainer { kind: "number" })
		));
		assert!(matches!(
			ResponseDocument::parse(Value::Null.into()),
			Err(InvalidDataError::NotAContainer { kind: "null" })
		));
	}

	#[test]
	fn rejects_non_utf8_bodies() {
		let body: &[u8] = b"{\"id\":\"1\",\"name\":\"Jo\xffe\"}";

		assert!(matches!(
			ResponseDocument::parse(body.into()),
			Err(InvalidDataError::Malformed { .. })
		));

		let doc = ResponseDocument::parse(br#"{"id":"1","name":"Jo\u00e9"}"#.to_vec().into())
			.expect("UTF-8 bodies should parse.");

		assert_eq!(doc.get("name"), Some(&json!("Jo\u{e9}")));
	}

	#[test]
	fn scalars_coerce_to_strings() {
		assert_eq!(scalar_to_string(&json!(666)), Some("666".into()));
		assert_eq!(scalar_to_string(&json!(1.5)), Some("1.5".into()));
		assert_eq!(scalar_to_string(&json!(true)), Some("true".into()));
		assert_eq!(scalar_to_string(&json!({})), None);
	}
}
