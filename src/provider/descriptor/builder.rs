// std
use std::iter::IntoIterator;
// self
use crate::{
	_prelude::*,
	auth::{ProviderType, ScopeSet},
	provider::{
		ClientAuthMethod, GrantType, ResourceOwnerDescriptor, ResourceOwnerEndpoints,
		ResourceOwnerOptions, SupportedGrants,
	},
	response::{PathMap, PathSpec, UserField},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ResourceOwnerDescriptorError {
	/// Authorization endpoint is required for the login redirect.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Token endpoint is mandatory for code exchanges.
	#[error("Missing access token endpoint.")]
	MissingAccessTokenEndpoint,
	/// Profile endpoint is mandatory for user information.
	#[error("Missing user information endpoint.")]
	MissingInfosEndpoint,
	/// Social login needs the authorization code grant.
	#[error("Descriptor must enable the authorization_code grant.")]
	AuthorizationCodeDisabled,
	/// Without a custom user response, the identifier must be mapped to a path.
	#[error("The `identifier` field must be mapped to a path.")]
	MissingIdentifierPath,
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Reject scope delimiters that are control characters.
	#[error("Scope delimiter must be a printable character.")]
	InvalidScopeDelimiter {
		/// Invalid delimiter that was supplied.
		delimiter: char,
	},
}

/// Builder for [`ResourceOwnerDescriptor`] values.
#[derive(Debug)]
pub struct ResourceOwnerDescriptorBuilder {
	/// Provider type for the descriptor being constructed.
	pub kind: ProviderType,
	/// Authorization endpoint.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint used for exchanges and refreshes.
	pub access_token_endpoint: Option<Url>,
	/// Profile endpoint.
	pub infos_endpoint: Option<Url>,
	/// Grants enabled for the provider.
	pub supported_grants: SupportedGrants,
	/// Preferred client authentication method for the token endpoint.
	pub preferred_client_auth_method: ClientAuthMethod,
	/// Scope requested by default.
	pub scope: ScopeSet,
	/// Field-to-path mapping.
	pub paths: PathMap,
	/// Provider-specific options.
	pub options: ResourceOwnerOptions,
	/// Class identifier of an alternative user response.
	pub user_response_class: Option<String>,
}
impl ResourceOwnerDescriptorBuilder {
	/// Creates a new builder seeded with the provided provider type and the authorization code
	/// grant.
	pub fn new(kind: ProviderType) -> Self {
		Self {
			kind,
			authorization_endpoint: None,
			access_token_endpoint: None,
			infos_endpoint: None,
			supported_grants: SupportedGrants::default().enable(GrantType::AuthorizationCode),
			preferred_client_auth_method: ClientAuthMethod::default(),
			scope: ScopeSet::default(),
			paths: PathMap::new(),
			options: ResourceOwnerOptions::default(),
			user_response_class: None,
		}
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn access_token_endpoint(mut self, url: Url) -> Self {
		self.access_token_endpoint = Some(url);

		self
	}

	/// Sets the profile endpoint.
	pub fn infos_endpoint(mut self, url: Url) -> Self {
		self.infos_endpoint = Some(url);

		self
	}

	/// Marks a single grant type as supported.
	pub fn support_grant(mut self, grant: GrantType) -> Self {
		self.supported_grants = self.supported_grants.enable(grant);

		self
	}

	/// Marks multiple grants as supported.
	pub fn support_grants<I>(mut self, grants: I) -> Self
	where
		I: IntoIterator<Item = GrantType>,
	{
		for grant in grants.into_iter() {
			self.supported_grants = self.supported_grants.enable(grant);
		}

		self
	}

	/// Overrides the preferred client authentication method.
	pub fn preferred_client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.preferred_client_auth_method = method;

		self
	}

	/// Replaces the default scope.
	pub fn scope(mut self, scope: ScopeSet) -> Self {
		self.scope = scope;

		self
	}

	/// Merges field paths over the ones already configured.
	pub fn paths(mut self, paths: &PathMap) -> Self {
		self.paths.merge(paths);

		self
	}

	/// Maps a single field.
	pub fn path(mut self, field: impl Into<String>, spec: impl Into<PathSpec>) -> Self {
		self.paths.set(field, spec);

		self
	}

	/// Overrides the provider options.
	pub fn options(mut self, options: ResourceOwnerOptions) -> Self {
		self.options = options;

		self
	}

	/// Adds a parameter appended to every authorization URL.
	pub fn authorization_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.options.authorization_params.insert(key.into(), value.into());

		self
	}

	/// Selects an alternative user response class.
	pub fn user_response_class(mut self, class: impl Into<String>) -> Self {
		self.user_response_class = Some(class.into());

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ResourceOwnerDescriptor, ResourceOwnerDescriptorError> {
		let authorization = self
			.authorization_endpoint
			.ok_or(ResourceOwnerDescriptorError::MissingAuthorizationEndpoint)?;
		let access_token = self
			.access_token_endpoint
			.ok_or(ResourceOwnerDescriptorError::MissingAccessTokenEndpoint)?;
		let infos = self.infos_endpoint.ok_or(ResourceOwnerDescriptorError::MissingInfosEndpoint)?;
		let descriptor = ResourceOwnerDescriptor {
			kind: self.kind,
			endpoints: ResourceOwnerEndpoints { authorization, access_token, infos },
			supported_grants: self.supported_grants,
			preferred_client_auth_method: self.preferred_client_auth_method,
			scope: self.scope,
			paths: self.paths,
			options: self.options,
			user_response_class: self.user_response_class,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ResourceOwnerDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ResourceOwnerDescriptorError> {
		if !self.supports(GrantType::AuthorizationCode) {
			return Err(ResourceOwnerDescriptorError::AuthorizationCodeDisabled);
		}
		if self.user_response_class.is_none()
			&& self.paths.get(UserField::Identifier.as_str()).is_none_or(PathSpec::is_absent)
		{
			return Err(ResourceOwnerDescriptorError::MissingIdentifierPath);
		}

		validate_endpoint("authorization", &self.endpoints.authorization)?;
		validate_endpoint("access_token", &self.endpoints.access_token)?;
		validate_endpoint("infos", &self.endpoints.infos)?;
		validate_scope_delimiter(self.options.scope_delimiter)?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ResourceOwnerDescriptorError> {
	if url.scheme() != "https" {
		Err(ResourceOwnerDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}

fn validate_scope_delimiter(delimiter: char) -> Result<(), ResourceOwnerDescriptorError> {
	if delimiter.is_control() {
		Err(ResourceOwnerDescriptorError::InvalidScopeDelimiter { delimiter })
	} else {
		Ok(())
	}
}
