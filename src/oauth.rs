//! Internal facade over the `oauth2` crate plus the error mapping shared by every provider call.

pub use oauth2;

// std
use std::borrow::Cow;
// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, PkceCodeVerifier, RedirectUrl, RefreshToken, RequestTokenError,
	TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::OAuthToken,
	error::{ConfigError, InvalidDataError, TransientError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::{
		ClientAuthMethod, GrantType, ProviderErrorContext, ProviderErrorKind, ProviderOperation,
		ProviderStrategy, ResourceOwnerDescriptor,
	},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type FacadeTokenResponse = oauth2::basic::BasicTokenResponse;
type FacadeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(
		&self,
		strategy: &dyn ProviderStrategy,
		operation: ProviderOperation,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		strategy: &dyn ProviderStrategy,
		operation: ProviderOperation,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(strategy, operation, meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => transient(
				operation,
				format!("HTTP client error occurred while calling the provider: {message}"),
				meta,
			),
			_ => transient(operation, "HTTP client error occurred while calling the provider", meta),
		}
	}
}

pub(crate) trait OAuth2Facade {
	fn exchange_authorization_code<'a>(
		&'a self,
		strategy: &'a dyn ProviderStrategy,
		code: &'a str,
		pkce_verifier: Option<&'a str>,
		redirect_uri: &'a Url,
	) -> FacadeFuture<'a, OAuthToken>;

	fn refresh_token<'a>(
		&'a self,
		strategy: &'a dyn ProviderStrategy,
		refresh_token: &'a str,
	) -> FacadeFuture<'a, OAuthToken>;
}

pub(crate) struct BasicFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> BasicFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn from_descriptor(
		descriptor: &ResourceOwnerDescriptor,
		client_id: &str,
		client_secret: Option<&str>,
		http_client: Arc<C>,
		error_mapper: Arc<M>,
	) -> Result<Self> {
		let auth_url = AuthUrl::new(descriptor.endpoints.authorization.to_string())
			.map_err(|source| ConfigError::InvalidDescriptor { source })?;
		let token_url = TokenUrl::new(descriptor.endpoints.access_token.to_string())
			.map_err(|source| ConfigError::InvalidDescriptor { source })?;
		let mut oauth_client = BasicClient::new(ClientId::new(client_id.to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url);
		let secret =
			if matches!(descriptor.preferred_client_auth_method, ClientAuthMethod::NoneWithPkce) {
				None
			} else {
				client_secret.map(|value| ClientSecret::new(value.to_owned()))
			};

		if let Some(secret) = secret {
			oauth_client = oauth_client.set_client_secret(secret);
		}
		if !matches!(descriptor.preferred_client_auth_method, ClientAuthMethod::ClientSecretBasic) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self { oauth_client, http_client, error_mapper })
	}
}
impl<C, M> OAuth2Facade for BasicFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn exchange_authorization_code<'a>(
		&'a self,
		strategy: &'a dyn ProviderStrategy,
		code: &'a str,
		pkce_verifier: Option<&'a str>,
		redirect_uri: &'a Url,
	) -> FacadeFuture<'a, OAuthToken> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.with_metadata(meta.clone());
			let redirect_url = RedirectUrl::new(redirect_uri.to_string())
				.map_err(|source| ConfigError::InvalidRedirect { source })?;
			let mut request = self
				.oauth_client
				.exchange_code(AuthorizationCode::new(code.to_owned()))
				.set_redirect_uri(Cow::Owned(redirect_url));

			if let Some(verifier) = pkce_verifier {
				request = request.set_pkce_verifier(PkceCodeVerifier::new(verifier.to_owned()));
			}

			let mut form = BTreeMap::new();

			strategy.augment_token_request(GrantType::AuthorizationCode, &mut form);

			for (key, value) in form {
				request = request.add_extra_param(key, value);
			}

			let response = request.request_async(&instrumented).await.map_err(|err| {
				map_request_error(
					strategy,
					ProviderOperation::AuthorizationCode,
					meta.take(),
					err,
					self.error_mapper.as_ref(),
				)
			})?;

			map_token_response(response)
		})
	}

	fn refresh_token<'a>(
		&'a self,
		strategy: &'a dyn ProviderStrategy,
		refresh_token: &'a str,
	) -> FacadeFuture<'a, OAuthToken> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.with_metadata(meta.clone());
			let refresh_secret = RefreshToken::new(refresh_token.to_owned());
			let mut request = self.oauth_client.exchange_refresh_token(&refresh_secret);
			let mut form = BTreeMap::new();

			strategy.augment_token_request(GrantType::RefreshToken, &mut form);

			for (key, value) in form {
				request = request.add_extra_param(key, value);
			}

			let response = request.request_async(&instrumented).await.map_err(|err| {
				map_request_error(
					strategy,
					ProviderOperation::RefreshToken,
					meta.take(),
					err,
					self.error_mapper.as_ref(),
				)
			})?;

			map_token_response(response)
		})
	}
}

/// Classifies a non-success provider response through the strategy.
pub(crate) fn map_status_error(
	strategy: &dyn ProviderStrategy,
	operation: ProviderOperation,
	status: u16,
	body: &[u8],
	meta: Option<&ResponseMetadata>,
) -> Error {
	let mut ctx = ProviderErrorContext::new(operation).with_http_status(status);
	let text = String::from_utf8_lossy(body);

	if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(body) {
		match map.get("error") {
			Some(serde_json::Value::String(code)) => ctx = ctx.with_oauth_error(code.clone()),
			Some(serde_json::Value::Object(nested)) =>
				if let Some(serde_json::Value::String(message)) = nested.get("message") {
					ctx = ctx.with_error_description(message.clone());
				},
			_ => (),
		}

		if let Some(serde_json::Value::String(description)) = map.get("error_description") {
			ctx = ctx.with_error_description(description.clone());
		}
	}
	if !text.trim().is_empty() {
		ctx = ctx.with_body_preview(text.trim());
	}

	let message = ctx
		.error_description
		.clone()
		.or_else(|| ctx.oauth_error.clone())
		.unwrap_or_else(|| format!("provider answered with status {status}"));

	classify(strategy.classify_error(&ctx), operation, message, Some(status), meta)
}

fn map_token_response(response: FacadeTokenResponse) -> Result<OAuthToken> {
	if let Some(lifetime) = response.expires_in() {
		i64::try_from(lifetime.as_secs()).map_err(|_| ConfigError::ExpiresInOutOfRange)?;
	}

	let raw = serde_json::to_value(&response)
		.map_err(|source| InvalidDataError::Malformed { source })?;

	OAuthToken::from_raw(raw).map_err(|err| ConfigError::from(err).into())
}

fn map_request_error<E, M>(
	strategy: &dyn ProviderStrategy,
	operation: ProviderOperation,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> Error
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta_ref = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response_error(strategy, operation, response, meta_ref),
		RequestTokenError::Request(error) =>
			mapper.map_transport_error(strategy, operation, meta_ref, error),
		RequestTokenError::Parse(error, _body) =>
			TransientError::TokenResponseParse { source: error, status: meta_status(meta_ref) }
				.into(),
		RequestTokenError::Other(message) => transient(
			operation,
			format!("Token endpoint returned an unexpected response: {message}"),
			meta_ref,
		),
	}
}

fn map_server_response_error(
	strategy: &dyn ProviderStrategy,
	operation: ProviderOperation,
	response: BasicErrorResponse,
	meta: Option<&ResponseMetadata>,
) -> Error {
	let mut ctx = ProviderErrorContext::new(operation)
		.with_oauth_error(response.error().as_ref().to_string());

	if let Some(description) = response.error_description() {
		ctx = ctx.with_error_description(description.clone());
	}
	if let Some(status) = meta_status(meta) {
		ctx = ctx.with_http_status(status);
	}

	let message = match response.error_description() {
		Some(description) => format!("Token endpoint returned an OAuth error: {description}"),
		None => format!("Token endpoint returned an OAuth error: {}", response.error().as_ref()),
	};

	classify(strategy.classify_error(&ctx), operation, message, meta_status(meta), meta)
}

fn classify(
	kind: ProviderErrorKind,
	operation: ProviderOperation,
	message: String,
	status: Option<u16>,
	meta: Option<&ResponseMetadata>,
) -> Error {
	match kind {
		ProviderErrorKind::InvalidGrant => Error::InvalidGrant { reason: message },
		ProviderErrorKind::InvalidClient => Error::InvalidClient { reason: message },
		ProviderErrorKind::InsufficientScope => Error::InsufficientScope { reason: message },
		ProviderErrorKind::Transient => match operation {
			ProviderOperation::UserInformation => TransientError::UserInformation {
				message,
				status,
				retry_after: meta_retry_after(meta),
			}
			.into(),
			_ => TransientError::TokenEndpoint {
				message,
				status,
				retry_after: meta_retry_after(meta),
			}
			.into(),
		},
	}
}

fn transient(
	operation: ProviderOperation,
	message: impl Into<String>,
	meta: Option<&ResponseMetadata>,
) -> Error {
	classify(ProviderErrorKind::Transient, operation, message.into(), meta_status(meta), meta)
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(
	strategy: &dyn ProviderStrategy,
	operation: ProviderOperation,
	meta: Option<&ResponseMetadata>,
	err: ReqwestError,
) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		let status = meta_status(meta).or_else(|| err.status().map(|code| code.as_u16()));

		return classify(
			ProviderErrorKind::Transient,
			operation,
			"Request timed out while calling the provider".into(),
			status,
			meta,
		);
	}

	let kind = strategy.classify_error(&ProviderErrorContext::network_failure(operation));

	match kind {
		ProviderErrorKind::Transient => TransportError::from(err).into(),
		other => classify(other, operation, err.to_string(), meta_status(meta), meta),
	}
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{auth::ProviderType, http::ReqwestHttpClient, provider::DefaultProviderStrategy};

	fn descriptor(method: ClientAuthMethod) -> ResourceOwnerDescriptor {
		ResourceOwnerDescriptor::builder(
			ProviderType::new("oauth2").expect("Provider type fixture should be valid."),
		)
		.authorization_endpoint(
			Url::parse("https://example.com/oauth2/authorize")
				.expect("Failed to parse authorization endpoint URL."),
		)
		.access_token_endpoint(
			Url::parse("https://example.com/oauth2/token")
				.expect("Failed to parse token endpoint URL."),
		)
		.infos_endpoint(
			Url::parse("https://example.com/me").expect("Failed to parse infos endpoint URL."),
		)
		.path("identifier", "id")
		.preferred_client_auth_method(method)
		.build()
		.expect("Failed to build resource owner descriptor.")
	}

	fn facade(
		method: ClientAuthMethod,
	) -> Result<BasicFacade<ReqwestHttpClient, ReqwestTransportErrorMapper>> {
		BasicFacade::from_descriptor(
			&descriptor(method),
			"client-id",
			Some("secret"),
			Arc::new(ReqwestHttpClient::default()),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}

	#[test]
	fn builds_clients_for_every_auth_method() {
		assert!(facade(ClientAuthMethod::ClientSecretBasic).is_ok());
		assert!(facade(ClientAuthMethod::ClientSecretPost).is_ok());
		assert!(facade(ClientAuthMethod::NoneWithPkce).is_ok());
	}

	#[test]
	fn token_responses_become_oauth_tokens() {
		let response = serde_json::from_value::<FacadeTokenResponse>(serde_json::json!({
			"access_token": "access",
			"token_type": "Bearer",
			"refresh_token": "refresh",
			"expires_in": 3600,
		}))
		.expect("Token response fixture should deserialize.");
		let token = map_token_response(response).expect("Token response should map.");

		assert_eq!(token.access_token.expose(), "access");
		assert_eq!(token.expires_in, Some(Duration::hours(1)));
		assert_eq!(token.refresh_token.as_ref().map(|secret| secret.expose()), Some("refresh"));
	}

	#[test]
	fn user_information_statuses_are_classified() {
		let strategy = DefaultProviderStrategy;
		let err = map_status_error(
			&strategy,
			ProviderOperation::UserInformation,
			401,
			br#"{"error":{"status":401,"message":"The access token expired"}}"#,
			None,
		);

		assert!(
			matches!(err, Error::InvalidGrant { ref reason } if reason == "The access token expired")
		);

		let err = map_status_error(
			&strategy,
			ProviderOperation::UserInformation,
			503,
			b"upstream unavailable",
			Some(&ResponseMetadata { status: Some(503), retry_after: Some(Duration::seconds(5)) }),
		);

		assert!(matches!(
			err,
			Error::Transient(TransientError::UserInformation {
				status: Some(503),
				retry_after: Some(_),
				..
			})
		));
	}
}
