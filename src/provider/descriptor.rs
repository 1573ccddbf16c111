//! Resource-owner descriptor data structures and helpers.
//!
//! The module exposes validated metadata, supporting builder utilities, and grant helpers so
//! every provider is described as data and driven by one generic
//! [`ResourceOwner`](crate::owner::ResourceOwner).

/// Builder API for assembling resource-owner descriptors.
pub mod builder;
/// Grant helpers wired into descriptors.
pub mod grant;
/// Provider-specific option toggles.
pub mod options;

pub use builder::*;
pub use grant::*;
pub use options::*;

// self
use crate::{
	_prelude::*,
	auth::{ProviderType, ScopeSet},
	response::PathMap,
};

/// Preferred client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
	/// Public clients that prove possession via PKCE.
	NoneWithPkce,
}

/// Endpoint set declared by a resource-owner descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOwnerEndpoints {
	/// Authorization endpoint the end user is redirected to.
	pub authorization: Url,
	/// Token endpoint used for code exchanges and refreshes.
	pub access_token: Url,
	/// Profile endpoint returning the user document.
	pub infos: Url,
}

/// Immutable resource-owner descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOwnerDescriptor {
	/// Provider type the descriptor describes.
	pub kind: ProviderType,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ResourceOwnerEndpoints,
	/// Supported grant flags.
	pub supported_grants: SupportedGrants,
	/// Preferred client authentication mechanism.
	pub preferred_client_auth_method: ClientAuthMethod,
	/// Scope requested when building authorization URLs.
	pub scope: ScopeSet,
	/// Field-to-path mapping applied to profile documents.
	pub paths: PathMap,
	/// Provider-specific options.
	pub options: ResourceOwnerOptions,
	/// Class identifier of an alternative user response, if any.
	pub user_response_class: Option<String>,
}
impl ResourceOwnerDescriptor {
	/// Creates a new builder for the provided provider type.
	pub fn builder(kind: ProviderType) -> ResourceOwnerDescriptorBuilder {
		ResourceOwnerDescriptorBuilder::new(kind)
	}

	/// Checks whether the descriptor supports a given grant.
	pub fn supports(&self, grant: GrantType) -> bool {
		self.supported_grants.supports(grant)
	}

	/// Reopens the descriptor for per-deployment overrides.
	pub fn to_builder(&self) -> ResourceOwnerDescriptorBuilder {
		ResourceOwnerDescriptorBuilder {
			kind: self.kind.clone(),
			authorization_endpoint: Some(self.endpoints.authorization.clone()),
			access_token_endpoint: Some(self.endpoints.access_token.clone()),
			infos_endpoint: Some(self.endpoints.infos.clone()),
			supported_grants: self.supported_grants,
			preferred_client_auth_method: self.preferred_client_auth_method,
			scope: self.scope.clone(),
			paths: self.paths.clone(),
			options: self.options.clone(),
			user_response_class: self.user_response_class.clone(),
		}
	}
}
