//! Resource owners: one generic implementation driven by a [`ResourceOwnerDescriptor`].
//!
//! A [`ResourceOwner`] couples a descriptor with client credentials, a transport, a provider
//! strategy, and the [`UserResponseFactory`] used to normalize profiles. Operations are split by
//! stage: `authorization` builds the redirect and state, `exchange` talks to the token
//! endpoint, and `user_info` fetches and maps the profile document.

pub mod authorization;
pub mod exchange;
pub mod map;
pub mod user_info;

pub use authorization::*;
pub use map::*;

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	error::ConfigError,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	provider::{GrantType, ProviderStrategy, ResourceOwnerDescriptor},
	response::{PathUserResponseFactory, UserResponseFactory},
};
#[cfg(feature = "reqwest")]
use crate::{
	http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper,
	provider::DefaultProviderStrategy,
};

#[cfg(feature = "reqwest")]
/// Resource owner specialized for the crate's default reqwest transport stack.
pub type ReqwestResourceOwner = ResourceOwner<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// A configured identity provider.
#[derive(Clone)]
pub struct ResourceOwner<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Configured name (e.g. `spotify`), used in callback routing and on user responses.
	pub name: ProviderId,
	/// Endpoints, grants, scope, and field paths.
	pub descriptor: ResourceOwnerDescriptor,
	/// Request augmentation and error classification.
	pub strategy: Arc<dyn ProviderStrategy>,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret for confidential client authentication.
	pub client_secret: Option<String>,
	/// Transport shared by token and profile requests.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors.
	pub transport_mapper: Arc<M>,
	/// Factory producing the user response for every profile fetch.
	pub user_response_factory: Arc<dyn UserResponseFactory>,
}
impl<C, M> ResourceOwner<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a resource owner that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		name: ProviderId,
		descriptor: ResourceOwnerDescriptor,
		strategy: Arc<dyn ProviderStrategy>,
		client_id: impl Into<String>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			name,
			descriptor,
			strategy,
			client_id: client_id.into(),
			client_secret: None,
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			user_response_factory: Arc::new(PathUserResponseFactory),
		}
	}

	/// Sets or replaces the client secret.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Replaces the user response implementation.
	pub fn with_user_response_factory(mut self, factory: Arc<dyn UserResponseFactory>) -> Self {
		self.user_response_factory = factory;

		self
	}

	/// Returns `true` when `callback` carries an authorization `code` for this flow.
	pub fn handles(&self, callback: &Url) -> bool {
		callback.query_pairs().any(|(key, _)| key == "code")
	}

	fn ensure_grant(&self, grant: GrantType) -> Result<()> {
		if self.descriptor.supports(grant) {
			Ok(())
		} else {
			Err(ConfigError::UnsupportedGrant {
				descriptor: self.name.to_string(),
				grant: grant.as_str(),
			}
			.into())
		}
	}
}
#[cfg(feature = "reqwest")]
impl ResourceOwner<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a resource owner with its own reqwest transport and the default strategy.
	pub fn new(
		name: ProviderId,
		descriptor: ResourceOwnerDescriptor,
		client_id: impl Into<String>,
	) -> Self {
		Self::with_http_client(
			name,
			descriptor,
			Arc::new(DefaultProviderStrategy),
			client_id,
			ReqwestHttpClient::default(),
			ReqwestTransportErrorMapper,
		)
	}
}
impl<C, M> Debug for ResourceOwner<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResourceOwner")
			.field("name", &self.name)
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.finish()
	}
}
