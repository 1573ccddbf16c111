//! Deployment configuration: the entry point plus the configured resource owners.
//!
//! ```json
//! {
//!   "entry_point": { "login_path": "/login", "use_forward": false },
//!   "resource_owners": {
//!     "spotify": {
//!       "type": "spotify",
//!       "client_id": "id",
//!       "client_secret": "secret",
//!       "paths": { "nickname": "display_name" },
//!       "options": { "authorization_params": { "show_dialog": "true" } }
//!     }
//!   }
//! }
//! ```

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, ProviderType, ScopeSet},
	error::ConfigError,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	owner::{ResourceOwner, ResourceOwnerMap},
	provider::{ProviderRegistry, ProviderStrategy, ResourceOwnerDescriptor},
	response::{PathMap, UserResponseRegistry},
};

/// Root configuration document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialConfig {
	/// Unauthenticated-access responder settings.
	pub entry_point: EntryPointConfig,
	/// Resource owners keyed by name.
	#[serde(default)]
	pub resource_owners: BTreeMap<String, ResourceOwnerConfig>,
}
impl SocialConfig {
	/// Parses a JSON document, reporting the path of the first invalid node.
	pub fn from_json_str(raw: &str) -> Result<Self> {
		let mut de = serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(&mut de).map_err(|err| ConfigError::from(err).into())
	}

	/// Byte-slice variant of [`from_json_str`](Self::from_json_str).
	pub fn from_json_slice(raw: &[u8]) -> Result<Self> {
		let mut de = serde_json::Deserializer::from_slice(raw);

		serde_path_to_error::deserialize(&mut de).map_err(|err| ConfigError::from(err).into())
	}

	/// Builds every configured resource owner over a shared transport.
	pub fn build_resource_owners<C, M>(
		&self,
		providers: &ProviderRegistry,
		responses: &UserResponseRegistry,
		strategy: Arc<dyn ProviderStrategy>,
		http_client: Arc<C>,
		mapper: Arc<M>,
	) -> Result<ResourceOwnerMap<C, M>>
	where
		C: ?Sized + ProviderHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let mut owners = ResourceOwnerMap::new();

		for (name, config) in &self.resource_owners {
			let owner = config.build_owner(
				name,
				providers,
				responses,
				strategy.clone(),
				http_client.clone(),
				mapper.clone(),
			)?;

			owners.insert(owner);
		}

		Ok(owners)
	}
}

/// Entry point settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryPointConfig {
	/// Login path, absolute URL, or route name.
	pub login_path: String,
	/// Forward to the login path instead of redirecting.
	#[serde(default)]
	pub use_forward: bool,
}

/// One configured resource owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceOwnerConfig {
	/// Provider type registered in the [`ProviderRegistry`].
	#[serde(rename = "type")]
	pub kind: ProviderType,
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	#[serde(default)]
	pub client_secret: Option<String>,
	/// Replaces the preset scope.
	#[serde(default)]
	pub scope: Option<ScopeSet>,
	/// Overrides the authorization endpoint.
	#[serde(default)]
	pub authorization_url: Option<Url>,
	/// Overrides the token endpoint.
	#[serde(default)]
	pub access_token_url: Option<Url>,
	/// Overrides the profile endpoint.
	#[serde(default)]
	pub infos_url: Option<Url>,
	/// Field paths merged over the preset's.
	#[serde(default)]
	pub paths: PathMap,
	/// Option overrides.
	#[serde(default)]
	pub options: ResourceOwnerOptionsConfig,
	/// Class identifier registered in the [`UserResponseRegistry`].
	#[serde(default)]
	pub user_response_class: Option<String>,
}
impl ResourceOwnerConfig {
	/// Resolves the preset for `kind` and applies this entry's overrides.
	pub fn descriptor(&self, providers: &ProviderRegistry) -> Result<ResourceOwnerDescriptor> {
		let mut builder = providers.builder(&self.kind)?.paths(&self.paths);

		if let Some(scope) = &self.scope {
			builder = builder.scope(scope.clone());
		}
		if let Some(url) = &self.authorization_url {
			builder = builder.authorization_endpoint(url.clone());
		}
		if let Some(url) = &self.access_token_url {
			builder = builder.access_token_endpoint(url.clone());
		}
		if let Some(url) = &self.infos_url {
			builder = builder.infos_endpoint(url.clone());
		}
		if let Some(class) = &self.user_response_class {
			builder = builder.user_response_class(class.clone());
		}

		self.options.apply(&mut builder.options);

		builder.build().map_err(|err| ConfigError::from(err).into())
	}

	/// Builds the resource owner named `name`.
	pub fn build_owner<C, M>(
		&self,
		name: &str,
		providers: &ProviderRegistry,
		responses: &UserResponseRegistry,
		strategy: Arc<dyn ProviderStrategy>,
		http_client: Arc<C>,
		mapper: Arc<M>,
	) -> Result<ResourceOwner<C, M>>
	where
		C: ?Sized + ProviderHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let invalid = |reason: String| ConfigError::InvalidResourceOwner {
			owner: name.to_owned(),
			reason,
		};
		let owner_name = ProviderId::new(name).map_err(|err| invalid(err.to_string()))?;

		if self.client_id.trim().is_empty() {
			return Err(invalid("client_id must not be empty".into()).into());
		}

		let descriptor = self.descriptor(providers)?;
		let class =
			descriptor.user_response_class.as_deref().unwrap_or(UserResponseRegistry::PATH_USER_RESPONSE);
		let factory = responses
			.get(class)
			.ok_or_else(|| ConfigError::UnknownUserResponseClass { class: class.to_owned() })?;
		let mut owner = ResourceOwner::with_http_client(
			owner_name,
			descriptor,
			strategy,
			self.client_id.clone(),
			http_client,
			mapper,
		)
		.with_user_response_factory(factory);

		if let Some(secret) = &self.client_secret {
			owner = owner.with_client_secret(secret.clone());
		}

		Ok(owner)
	}
}

/// Partial option overrides; unset fields keep the preset's value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceOwnerOptionsConfig {
	/// Forces PKCE on the authorization request.
	#[serde(default)]
	pub pkce_required: Option<bool>,
	/// Header (`true`) vs `access_token` query parameter (`false`) for the profile call.
	#[serde(default)]
	pub use_bearer_authorization: Option<bool>,
	/// Scope delimiter.
	#[serde(default)]
	pub scope_delimiter: Option<char>,
	/// Parameters merged into every authorization URL.
	#[serde(default)]
	pub authorization_params: BTreeMap<String, String>,
}
impl ResourceOwnerOptionsConfig {
	fn apply(&self, options: &mut crate::provider::ResourceOwnerOptions) {
		if let Some(value) = self.pkce_required {
			options.pkce_required = value;
		}
		if let Some(value) = self.use_bearer_authorization {
			options.use_bearer_authorization = value;
		}
		if let Some(value) = self.scope_delimiter {
			options.scope_delimiter = value;
		}

		options
			.authorization_params
			.extend(self.authorization_params.iter().map(|(k, v)| (k.clone(), v.clone())));
	}
}
