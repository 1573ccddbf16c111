//! Field-to-path mappings used to read user attributes out of provider documents.

// std
use std::collections::btree_map::{self, BTreeMap as Map};
// crates.io
use serde::{Deserializer, Serializer, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Logical user attributes every resource owner can map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserField {
	/// Stable, provider-unique identifier. Must always resolve.
	Identifier,
	/// Display handle.
	Nickname,
	/// Given name.
	FirstName,
	/// Family name.
	LastName,
	/// Full name, often a composite of first and last name.
	RealName,
	/// Email address.
	Email,
	/// Avatar URL.
	ProfilePicture,
}
impl UserField {
	/// Every known field, in canonical order.
	pub const ALL: [UserField; 7] = [
		UserField::Identifier,
		UserField::Nickname,
		UserField::FirstName,
		UserField::LastName,
		UserField::RealName,
		UserField::Email,
		UserField::ProfilePicture,
	];

	/// Returns the key used in path maps and configuration.
	pub const fn as_str(self) -> &'static str {
		match self {
			UserField::Identifier => "identifier",
			UserField::Nickname => "nickname",
			UserField::FirstName => "firstname",
			UserField::LastName => "lastname",
			UserField::RealName => "realname",
			UserField::Email => "email",
			UserField::ProfilePicture => "profilepicture",
		}
	}
}
impl Display for UserField {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl AsRef<str> for UserField {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}

/// How one field is located inside a provider document.
///
/// Deserializes from `null` ([`Absent`](Self::Absent)), a dot path string
/// ([`Single`](Self::Single)), or a list of dot paths ([`Composite`](Self::Composite)).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PathSpec {
	/// Field is not mapped; it always resolves to nothing.
	#[default]
	Absent,
	/// A single dot-separated path such as `images.0.url`.
	Single(String),
	/// Several paths whose values are joined with a space, in order.
	Composite(Vec<String>),
}
impl PathSpec {
	/// Returns `true` for [`PathSpec::Absent`].
	pub fn is_absent(&self) -> bool {
		matches!(self, Self::Absent)
	}
}
impl From<&str> for PathSpec {
	fn from(path: &str) -> Self {
		Self::Single(path.to_owned())
	}
}
impl From<String> for PathSpec {
	fn from(path: String) -> Self {
		Self::Single(path)
	}
}
impl<S, const N: usize> From<[S; N]> for PathSpec
where
	S: Into<String>,
{
	fn from(paths: [S; N]) -> Self {
		Self::Composite(paths.into_iter().map(Into::into).collect())
	}
}
impl<T> From<Option<T>> for PathSpec
where
	T: Into<PathSpec>,
{
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or_default()
	}
}
impl Serialize for PathSpec {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self {
			Self::Absent => serializer.serialize_none(),
			Self::Single(path) => serializer.serialize_str(path),
			Self::Composite(paths) => {
				let mut seq = serializer.serialize_seq(Some(paths.len()))?;

				for path in paths {
					seq.serialize_element(path)?;
				}

				seq.end()
			},
		}
	}
}
impl<'de> Deserialize<'de> for PathSpec {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Single(String),
			Composite(Vec<String>),
		}

		Ok(match Option::<Raw>::deserialize(deserializer)? {
			None => Self::Absent,
			Some(Raw::Single(path)) => Self::Single(path),
			Some(Raw::Composite(paths)) => Self::Composite(paths),
		})
	}
}

/// Mapping from field name to [`PathSpec`].
///
/// Maps only grow: [`PathMap::extend`] and [`PathMap::merge`] add or override the entries they
/// are given and never drop existing ones. [`PathMap::with_defaults`] seeds every [`UserField`]
/// with [`PathSpec::Absent`], which is what user responses start from.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Map<String, PathSpec>", into = "Map<String, PathSpec>")]
pub struct PathMap(Map<String, PathSpec>);
impl PathMap {
	/// Empty map.
	pub fn new() -> Self {
		Self(Map::new())
	}

	/// Map with every known field present and unmapped.
	pub fn with_defaults() -> Self {
		Self::from_entries(UserField::ALL.iter().map(|field| (field.as_str(), PathSpec::Absent)))
	}

	/// Builds a map holding exactly `entries`.
	pub fn from_entries<I, K, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<PathSpec>,
	{
		let mut map = Self::new();

		map.extend(entries);

		map
	}

	/// Adds or overrides entries, keeping every other entry untouched.
	pub fn extend<I, K, V>(&mut self, entries: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<PathSpec>,
	{
		for (field, spec) in entries {
			self.0.insert(field.into(), spec.into());
		}
	}

	/// Merges another map over this one.
	pub fn merge(&mut self, other: &PathMap) {
		self.extend(other.iter().map(|(field, spec)| (field.to_owned(), spec.clone())));
	}

	/// Sets a single entry.
	pub fn set(&mut self, field: impl Into<String>, spec: impl Into<PathSpec>) {
		self.0.insert(field.into(), spec.into());
	}

	/// Returns the spec for `field`, if the map knows the field at all.
	pub fn get(&self, field: &str) -> Option<&PathSpec> {
		self.0.get(field)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no field is mapped.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over `(field, spec)` pairs in field-name order.
	pub fn iter(&self) -> btree_map::Iter<'_, String, PathSpec> {
		self.0.iter()
	}
}
impl Default for PathMap {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for PathMap {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_map().entries(self.0.iter()).finish()
	}
}
impl From<Map<String, PathSpec>> for PathMap {
	fn from(entries: Map<String, PathSpec>) -> Self {
		Self(entries)
	}
}
impl From<PathMap> for Map<String, PathSpec> {
	fn from(value: PathMap) -> Self {
		value.0
	}
}
impl<'a> IntoIterator for &'a PathMap {
	type IntoIter = btree_map::Iter<'a, String, PathSpec>;
	type Item = (&'a String, &'a PathSpec);

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
