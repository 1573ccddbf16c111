//! Provider-issued token model carried alongside user responses.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, token::secret::TokenSecret},
};

/// Errors produced while turning a raw token payload into an [`OAuthToken`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum OAuthTokenError {
	/// Neither `access_token` nor `oauth_token` was present.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// `expires_in` was present but not a non-negative integer.
	#[error("The expires_in value must be a non-negative integer.")]
	InvalidExpiresIn,
}

/// Tokens returned by a resource owner, plus the raw payload they were read from.
///
/// OAuth 2.0 providers populate the access/refresh pair and usually `expires_in`; OAuth 1.0a
/// providers populate `oauth_token` + `oauth_token_secret`, which map onto
/// [`access_token`](Self::access_token) and [`token_secret`](Self::token_secret).
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthToken {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// OAuth 1.0a token secret, if present.
	pub token_secret: Option<TokenSecret>,
	/// Lifetime announced by the provider, if any.
	pub expires_in: Option<Duration>,
	/// Scopes granted with the token, when the provider echoed them.
	pub scope: Option<ScopeSet>,
	/// Instant the token was received.
	pub issued_at: OffsetDateTime,
	/// Untouched provider payload.
	pub raw: Value,
}
impl OAuthToken {
	/// Wraps a bare access token string.
	pub fn new(access_token: impl Into<String>) -> Self {
		let access_token = access_token.into();
		let mut raw = Map::new();

		raw.insert("access_token".into(), Value::String(access_token.clone()));

		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: None,
			token_secret: None,
			expires_in: None,
			scope: None,
			issued_at: OffsetDateTime::now_utc(),
			raw: Value::Object(raw),
		}
	}

	/// Reads a provider token payload (a JSON object, or a JSON string holding the access token).
	pub fn from_raw(raw: Value) -> Result<Self, OAuthTokenError> {
		let map = match &raw {
			Value::String(token) if !token.is_empty() => return Ok(Self::new(token.clone())),
			Value::Object(map) => map,
			_ => return Err(OAuthTokenError::MissingAccessToken),
		};
		let access_token = string_field(map, "access_token")
			.or_else(|| string_field(map, "oauth_token"))
			.ok_or(OAuthTokenError::MissingAccessToken)?;
		let expires_in = match map.get("expires_in").or_else(|| map.get("expires")) {
			None | Some(Value::Null) => None,
			Some(value) => Some(parse_expires_in(value)?),
		};
		let scope = string_field(map, "scope").and_then(|value| ScopeSet::from_str(&value).ok());

		Ok(Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: string_field(map, "refresh_token").map(TokenSecret::new),
			token_secret: string_field(map, "oauth_token_secret").map(TokenSecret::new),
			expires_in,
			scope,
			issued_at: OffsetDateTime::now_utc(),
			raw,
		})
	}

	/// Overrides the receipt instant.
	pub fn with_issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = instant;

		self
	}

	/// Expiry instant derived from `issued_at + expires_in`.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_in.map(|lifetime| self.issued_at + lifetime)
	}

	/// Returns `true` if the token carries an expiry that has passed at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at().is_some_and(|expires_at| instant >= expires_at)
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for OAuthToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthToken")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
			.field("expires_in", &self.expires_in)
			.field("scope", &self.scope)
			.field("issued_at", &self.issued_at)
			.finish()
	}
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
	match map.get(key)? {
		Value::String(value) if !value.is_empty() => Some(value.clone()),
		_ => None,
	}
}

fn parse_expires_in(value: &Value) -> Result<Duration, OAuthTokenError> {
	let secs = match value {
		Value::Number(number) => number.as_u64(),
		Value::String(text) => text.trim().parse::<u64>().ok(),
		_ => None,
	}
	.ok_or(OAuthTokenError::InvalidExpiresIn)?;
	let secs = i64::try_from(secs).map_err(|_| OAuthTokenError::InvalidExpiresIn)?;

	Ok(Duration::seconds(secs))
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros;
	// self
	use super::*;

	#[test]
	fn reads_oauth2_payload() {
		let token = OAuthToken::from_raw(json!({
			"access_token": "access",
			"refresh_token": "refresh",
			"expires_in": 3600,
			"scope": "email profile",
		}))
		.expect("OAuth 2.0 payload should be accepted.")
		.with_issued_at(macros::datetime!(2025-01-01 00:00 UTC));

		assert_eq!(token.access_token.expose(), "access");
		assert_eq!(token.refresh_token.as_ref().map(TokenSecret::expose), Some("refresh"));
		assert_eq!(token.expires_at(), Some(macros::datetime!(2025-01-01 01:00 UTC)));
		assert!(token.is_expired_at(macros::datetime!(2025-01-01 01:00 UTC)));
		assert!(!token.is_expired_at(macros::datetime!(2025-01-01 00:59 UTC)));
		assert!(token.scope.is_some_and(|scope| scope.contains("email")));
	}

	#[test]
	fn reads_oauth1_payload_and_string_expiry() {
		let token = OAuthToken::from_raw(json!({
			"oauth_token": "token",
			"oauth_token_secret": "secret",
			"expires": "60",
		}))
		.expect("OAuth 1.0a payload should be accepted.");

		assert_eq!(token.access_token.expose(), "token");
		assert_eq!(token.token_secret.as_ref().map(TokenSecret::expose), Some("secret"));
		assert_eq!(token.expires_in, Some(Duration::minutes(1)));
	}

	#[test]
	fn bare_string_and_missing_fields() {
		let token =
			OAuthToken::from_raw(json!("token")).expect("Bare token strings should be accepted.");

		assert_eq!(token.access_token.expose(), "token");
		assert!(token.refresh_token.is_none());
		assert!(token.expires_in.is_none());
		assert!(!token.is_expired());
		assert_eq!(
			OAuthToken::from_raw(json!({ "refresh_token": "r" })).map(|_| ()),
			Err(OAuthTokenError::MissingAccessToken)
		);
		assert_eq!(
			OAuthToken::from_raw(json!({ "access_token": "a", "expires_in": -5 })).map(|_| ()),
			Err(OAuthTokenError::InvalidExpiresIn)
		);
	}

	#[test]
	fn debug_redacts_secrets() {
		let token = OAuthToken::new("super-secret");
		let rendered = format!("{token:?}");

		assert!(!rendered.contains("super-secret"));
		assert!(rendered.contains("<redacted>"));
	}
}
