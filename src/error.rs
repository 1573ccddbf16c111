//! Crate-level error types shared by resource owners, user responses, and the entry point.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider response could not be ingested; the login attempt must be rejected.
	#[error("Authentication failed: {0}")]
	InvalidData(#[from] InvalidDataError),

	/// A field the provider contract guarantees could not be resolved from the response.
	#[error("{field} was not found in response.")]
	MissingRequiredField {
		/// Field that failed to resolve.
		field: RequiredField,
	},
	/// Requested scopes exceed what was granted.
	#[error("Token lacks the required scopes: {reason}.")]
	InsufficientScope {
		/// Provider- or crate-supplied reason string.
		reason: String,
	},
	/// Provider rejected the grant (e.g., bad code or refresh token).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider- or crate-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider- or crate-supplied reason string.
		reason: String,
	},
}
impl Error {
	/// Returns `true` when the host pipeline should treat the error as a rejected login attempt
	/// rather than an operational fault.
	pub fn is_authentication_failure(&self) -> bool {
		matches!(
			self,
			Self::InvalidData(_)
				| Self::InvalidGrant { .. }
				| Self::InvalidClient { .. }
				| Self::InsufficientScope { .. }
		)
	}
}

/// Fields whose absence violates the provider contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequiredField {
	/// The stable user identifier.
	Identifier,
}
impl Display for RequiredField {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Identifier => f.write_str("User identifier"),
		}
	}
}

/// Reasons a provider payload is rejected at ingestion time.
#[derive(Debug, ThisError)]
pub enum InvalidDataError {
	/// Text payload is not valid JSON.
	#[error("Response is not valid JSON.")]
	Malformed {
		/// Underlying JSON parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Payload decoded to something other than an object or array.
	#[error("Response must be a JSON object or array, got {kind}.")]
	NotAContainer {
		/// JSON kind that was received.
		kind: &'static str,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Resource owner descriptor contains an invalid URL.
	#[error("Descriptor contains an invalid URL.")]
	InvalidDescriptor {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Configuration document could not be decoded.
	#[error("Configuration is invalid at `{path}`.")]
	InvalidDocument {
		/// Path of the offending configuration node.
		path: String,
		/// Structured decoding failure.
		#[source]
		source: serde_json::Error,
	},
	/// Resource owner descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ResourceOwnerDescriptorError),
	/// Resource owner entry is unusable.
	#[error("Resource owner `{owner}` is misconfigured: {reason}.")]
	InvalidResourceOwner {
		/// Configured resource owner name.
		owner: String,
		/// What is wrong with the entry.
		reason: String,
	},
	/// Resource owner references a provider type nobody registered.
	#[error("Resource owner type `{kind}` is not registered.")]
	UnknownProviderType {
		/// Requested provider type.
		kind: String,
	},
	/// Resource owner references a user response class nobody registered.
	#[error("User response class `{class}` is not registered.")]
	UnknownUserResponseClass {
		/// Requested class identifier.
		class: String,
	},
	/// Descriptor does not enable the requested grant.
	#[error("Descriptor `{descriptor}` does not enable the {grant} grant.")]
	UnsupportedGrant {
		/// Provider identifier string.
		descriptor: String,
		/// Disabled grant label.
		grant: &'static str,
	},
	/// A route name was used but no URL generator was configured.
	#[error("A URL generator is required to resolve the route `{route}`.")]
	MissingUrlGenerator {
		/// Route name that could not be resolved.
		route: String,
	},
	/// URL generator does not know the route.
	#[error("Route `{route}` does not exist.")]
	UnknownRoute {
		/// Route name that could not be resolved.
		route: String,
	},
	/// Generated URI is not a valid HTTP URI.
	#[error("Generated URI `{uri}` is invalid.")]
	InvalidUri {
		/// Offending URI text.
		uri: String,
	},
	/// Request scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Token payload could not be turned into an [`OAuthToken`](crate::auth::OAuthToken).
	#[error("Unable to build OAuth token.")]
	Token(#[from] crate::auth::OAuthTokenError),
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::InvalidDocument { path, source: e.into_inner() }
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Token endpoint returned an unexpected but non-fatal response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Provider- or crate-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// User information request failed in a way that may succeed on retry.
	#[error("User information request failed: {message}.")]
	UserInformation {
		/// Short description of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn missing_identifier_message_is_fixed() {
		let err = Error::MissingRequiredField { field: RequiredField::Identifier };

		assert_eq!(err.to_string(), "User identifier was not found in response.");
		assert!(!err.is_authentication_failure());
	}

	#[test]
	fn invalid_data_counts_as_authentication_failure() {
		let source = serde_json::from_str::<serde_json::Value>("not_json")
			.expect_err("Plain text must not parse as JSON.");
		let err = Error::from(InvalidDataError::Malformed { source });

		assert!(err.is_authentication_failure());
		assert!(err.to_string().starts_with("Authentication failed"));
	}
}
