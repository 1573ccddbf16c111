//! Normalized user responses built from provider profile documents.
//!
//! `path` holds the field-to-path mapping ([`PathMap`]), `document` the decoded provider
//! payload and its dot-path traversal, and `path_user` the default [`UserResponse`]
//! implementation. Deployments that need different extraction logic implement
//! [`UserResponse`] themselves and register a [`UserResponseFactory`] under a class identifier
//! in a [`UserResponseRegistry`].

pub mod document;
pub mod path;
pub mod path_user;

pub use document::*;
pub use path::*;
pub use path_user::*;

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{OAuthToken, ProviderId},
	error::RequiredField,
};

/// Capability set consumed by the host's authentication pipeline.
///
/// Getters are recomputed on every call from the current paths and document. Only
/// [`user_identifier`](Self::user_identifier) may fail; every other field is simply `None`
/// when its path does not resolve.
pub trait UserResponse
where
	Self: Debug + Send + Sync,
{
	/// Replaces the provider document. Text must decode to a JSON object or array.
	fn set_data(&mut self, data: ResponseData) -> Result<()>;

	/// The current provider document.
	fn data(&self) -> &Value;

	/// Merges `paths` over the configured mapping.
	fn set_paths(&mut self, paths: &PathMap);

	/// The merged field-to-path mapping.
	fn paths(&self) -> &PathMap;

	/// Attaches the token the document was fetched with.
	fn set_oauth_token(&mut self, token: OAuthToken);

	/// The attached token, if any.
	fn oauth_token(&self) -> Option<&OAuthToken>;

	/// Records which configured resource owner produced the response.
	fn set_resource_owner(&mut self, owner: ProviderId);

	/// The resource owner that produced the response, if recorded.
	fn resource_owner(&self) -> Option<&ProviderId>;

	/// Resolves any mapped field, including deployment-specific extensions.
	fn value_for(&self, field: &str) -> Option<String>;

	/// Stable user identifier; its absence is a provider contract violation.
	fn user_identifier(&self) -> Result<String> {
		self.value_for(UserField::Identifier.as_str())
			.ok_or(Error::MissingRequiredField { field: RequiredField::Identifier })
	}

	/// Legacy accessor that reports a missing identifier as `None`.
	fn username(&self) -> Option<String> {
		self.user_identifier().ok()
	}

	/// Display handle.
	fn nickname(&self) -> Option<String> {
		self.value_for(UserField::Nickname.as_str())
	}

	/// Given name.
	fn first_name(&self) -> Option<String> {
		self.value_for(UserField::FirstName.as_str())
	}

	/// Family name.
	fn last_name(&self) -> Option<String> {
		self.value_for(UserField::LastName.as_str())
	}

	/// Full name.
	fn real_name(&self) -> Option<String> {
		self.value_for(UserField::RealName.as_str())
	}

	/// Email address.
	fn email(&self) -> Option<String> {
		self.value_for(UserField::Email.as_str())
	}

	/// Avatar URL.
	fn profile_picture(&self) -> Option<String> {
		self.value_for(UserField::ProfilePicture.as_str())
	}

	/// Access token of the attached token.
	fn access_token(&self) -> Option<&str> {
		self.oauth_token().map(|token| token.access_token.expose())
	}

	/// Refresh token of the attached token.
	fn refresh_token(&self) -> Option<&str> {
		self.oauth_token().and_then(|token| token.refresh_token.as_ref()).map(|secret| secret.expose())
	}

	/// OAuth 1.0a token secret of the attached token.
	fn token_secret(&self) -> Option<&str> {
		self.oauth_token().and_then(|token| token.token_secret.as_ref()).map(|secret| secret.expose())
	}

	/// Announced lifetime of the attached token.
	fn expires_in(&self) -> Option<Duration> {
		self.oauth_token().and_then(|token| token.expires_in)
	}
}

/// Produces fresh [`UserResponse`] instances for a resource owner.
pub trait UserResponseFactory
where
	Self: Send + Sync,
{
	/// Builds an empty response; the resource owner fills paths, token, and data afterwards.
	fn create(&self) -> Box<dyn UserResponse>;
}
impl<F> UserResponseFactory for F
where
	F: Fn() -> Box<dyn UserResponse> + Send + Sync,
{
	fn create(&self) -> Box<dyn UserResponse> {
		self()
	}
}

/// Factory for [`PathUserResponse`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PathUserResponseFactory;
impl UserResponseFactory for PathUserResponseFactory {
	fn create(&self) -> Box<dyn UserResponse> {
		Box::new(PathUserResponse::default())
	}
}

/// Class identifier → factory lookup used when wiring resource owners from configuration.
#[derive(Clone)]
pub struct UserResponseRegistry {
	factories: HashMap<String, Arc<dyn UserResponseFactory>>,
}
impl UserResponseRegistry {
	/// Class identifier of the built-in [`PathUserResponse`].
	pub const PATH_USER_RESPONSE: &'static str = "path";

	/// Registry holding only the built-in path response.
	pub fn new() -> Self {
		let mut factories: HashMap<String, Arc<dyn UserResponseFactory>> = HashMap::new();

		factories.insert(Self::PATH_USER_RESPONSE.into(), Arc::new(PathUserResponseFactory));

		Self { factories }
	}

	/// Registers (or replaces) a factory under `class`.
	pub fn register(
		mut self,
		class: impl Into<String>,
		factory: impl 'static + UserResponseFactory,
	) -> Self {
		self.factories.insert(class.into(), Arc::new(factory));

		self
	}

	/// Looks up the factory registered under `class`.
	pub fn get(&self, class: &str) -> Option<Arc<dyn UserResponseFactory>> {
		self.factories.get(class).cloned()
	}

	/// Returns `true` when `class` is registered.
	pub fn contains(&self, class: &str) -> bool {
		self.factories.contains_key(class)
	}
}
impl Default for UserResponseRegistry {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for UserResponseRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut classes = self.factories.keys().collect::<Vec<_>>();

		classes.sort();

		f.debug_struct("UserResponseRegistry").field("classes", &classes).finish()
	}
}
