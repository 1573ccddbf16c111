//! Default user response reading every field through a path map.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{OAuthToken, ProviderId},
	response::{PathMap, ResponseData, ResponseDocument, UserResponse},
};

/// [`UserResponse`] that reads every field through its [`PathMap`].
#[derive(Clone, Debug)]
pub struct PathUserResponse {
	paths: PathMap,
	document: ResponseDocument,
	token: Option<OAuthToken>,
	resource_owner: Option<ProviderId>,
}
impl PathUserResponse {
	/// Response with default paths merged with `paths`.
	pub fn with_paths(paths: &PathMap) -> Self {
		let mut response = Self::default();

		response.paths.merge(paths);

		response
	}

	/// The decoded document.
	pub fn document(&self) -> &ResponseDocument {
		&self.document
	}
}
impl Default for PathUserResponse {
	fn default() -> Self {
		Self {
			paths: PathMap::with_defaults(),
			document: ResponseDocument::default(),
			token: None,
			resource_owner: None,
		}
	}
}
impl UserResponse for PathUserResponse {
	fn set_data(&mut self, data: ResponseData) -> Result<()> {
		self.document = ResponseDocument::parse(data)?;

		Ok(())
	}

	fn data(&self) -> &Value {
		self.document.as_value()
	}

	fn set_paths(&mut self, paths: &PathMap) {
		self.paths.merge(paths);
	}

	fn paths(&self) -> &PathMap {
		&self.paths
	}

	fn set_oauth_token(&mut self, token: OAuthToken) {
		self.token = Some(token);
	}

	fn oauth_token(&self) -> Option<&OAuthToken> {
		self.token.as_ref()
	}

	fn set_resource_owner(&mut self, owner: ProviderId) {
		self.resource_owner = Some(owner);
	}

	fn resource_owner(&self) -> Option<&ProviderId> {
		self.resource_owner.as_ref()
	}

	fn value_for(&self, field: &str) -> Option<String> {
		self.document.resolve(self.paths.get(field)?)
	}
}
