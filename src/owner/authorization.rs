//! Authorization redirect construction: opaque state plus optional PKCE.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	owner::ResourceOwner,
	provider::ClientAuthMethod,
};

const STATE_LEN: usize = 32;
const PKCE_VERIFIER_LEN: usize = 64;

/// Supported PKCE challenge methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PkceCodeChallengeMethod {
	/// SHA-256 based PKCE (RFC 7636 S256).
	S256,
}
impl PkceCodeChallengeMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub fn as_str(self) -> &'static str {
		match self {
			PkceCodeChallengeMethod::S256 => "S256",
		}
	}
}

/// Everything the host must remember between the login redirect and the callback.
#[derive(Clone)]
pub struct AuthorizationRequest {
	/// Resource owner that issued the request.
	pub owner: ProviderId,
	/// Opaque state value that must round-trip via the callback.
	pub state: String,
	/// Redirect URI sent to the provider; the code exchange must repeat it.
	pub redirect_uri: Url,
	/// Provider authorization URL the end user is sent to.
	pub authorize_url: Url,
	pkce: Option<PkcePair>,
}
impl AuthorizationRequest {
	/// PKCE code challenge, when the provider requires PKCE.
	pub fn code_challenge(&self) -> Option<&str> {
		self.pkce.as_ref().map(|pkce| pkce.challenge.as_str())
	}

	/// PKCE challenge method, when the provider requires PKCE.
	pub fn code_challenge_method(&self) -> Option<PkceCodeChallengeMethod> {
		self.pkce.as_ref().map(|pkce| pkce.method)
	}

	/// Validates the `state` parameter returned on the callback.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state {
			Ok(())
		} else {
			Err(Error::InvalidGrant { reason: "Authorization state mismatch.".into() })
		}
	}

	pub(crate) fn pkce_verifier(&self) -> Option<&str> {
		self.pkce.as_ref().map(|pkce| pkce.verifier.as_str())
	}
}
impl Debug for AuthorizationRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationRequest")
			.field("owner", &self.owner)
			.field("state", &self.state)
			.field("redirect_uri", &self.redirect_uri)
			.field("authorize_url", &self.authorize_url)
			.field("code_challenge", &self.code_challenge())
			.finish()
	}
}

#[derive(Clone)]
struct PkcePair {
	verifier: String,
	challenge: String,
	method: PkceCodeChallengeMethod,
}
impl PkcePair {
	fn generate() -> Self {
		let verifier = random_string(PKCE_VERIFIER_LEN);
		let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));

		Self { verifier, challenge, method: PkceCodeChallengeMethod::S256 }
	}
}

impl<C, M> ResourceOwner<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the provider authorization URL the end user is redirected to.
	///
	/// Query order is `response_type`, `client_id`, `scope`, `state`, `redirect_uri`, the PKCE
	/// pair (when required), the descriptor's authorization parameters, then `extra_params`.
	pub fn authorization_url(
		&self,
		redirect_uri: Url,
		extra_params: &[(&str, &str)],
	) -> AuthorizationRequest {
		const KIND: FlowKind = FlowKind::AuthorizationUrl;

		let _guard = FlowSpan::new(KIND, "authorization_url").with_owner(&self.name).entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let state = encode_state(&random_string(STATE_LEN));
		let pkce = (self.descriptor.options.pkce_required
			|| matches!(self.descriptor.preferred_client_auth_method, ClientAuthMethod::NoneWithPkce))
		.then(PkcePair::generate);
		let mut authorize_url = self.descriptor.endpoints.authorization.clone();
		let mut pairs = authorize_url.query_pairs_mut();

		pairs.append_pair("response_type", "code");
		pairs.append_pair("client_id", &self.client_id);

		if let Some(scope) = self.descriptor.scope.join(self.descriptor.options.scope_delimiter) {
			pairs.append_pair("scope", &scope);
		}

		pairs.append_pair("state", &state);
		pairs.append_pair("redirect_uri", redirect_uri.as_str());

		if let Some(pkce) = &pkce {
			pairs.append_pair("code_challenge", &pkce.challenge);
			pairs.append_pair("code_challenge_method", pkce.method.as_str());
		}
		for (key, value) in &self.descriptor.options.authorization_params {
			pairs.append_pair(key, value);
		}
		for (key, value) in extra_params {
			pairs.append_pair(key, value);
		}

		drop(pairs);
		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		AuthorizationRequest { owner: self.name.clone(), state, redirect_uri, authorize_url, pkce }
	}
}

/// Decodes the nonce carried by a state value produced by
/// [`ResourceOwner::authorization_url`].
pub fn decode_state(state: &str) -> Option<String> {
	#[derive(Deserialize)]
	struct StatePayload {
		state: String,
	}

	let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;

	serde_json::from_slice::<StatePayload>(&bytes).ok().map(|payload| payload.state)
}

fn encode_state(nonce: &str) -> String {
	// The nonce is alphanumeric, so no JSON escaping is needed.
	URL_SAFE_NO_PAD.encode(format!(r#"{{"state":"{nonce}"}}"#))
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::ProviderType,
		owner::ReqwestResourceOwner,
		provider::{ProviderRegistry, ResourceOwnerOptions},
	};

	fn owner(kind: &str, pkce_required: bool) -> ReqwestResourceOwner {
		let registry = ProviderRegistry::new();
		let kind = ProviderType::new(kind).expect("Provider type should be valid.");
		let preset = registry.descriptor(&kind).expect("Preset should build.");
		let descriptor = preset
			.to_builder()
			.options(ResourceOwnerOptions { pkce_required, ..preset.options.clone() })
			.authorization_param("show_dialog", "true")
			.build()
			.expect("Descriptor overrides should build.");

		ResourceOwner::new(
			ProviderId::new(kind.as_ref()).expect("Owner name should be valid."),
			descriptor,
			"client-id",
		)
	}

	fn redirect() -> Url {
		Url::parse("https://app.example/login/check-spotify").expect("Redirect URL should parse.")
	}

	#[test]
	fn parameters_follow_the_documented_order() {
		let request = owner("google", false).authorization_url(redirect(), &[("prompt", "consent")]);
		let keys = request
			.authorize_url
			.query_pairs()
			.map(|(key, _)| key.into_owned())
			.collect::<Vec<_>>();

		assert_eq!(keys, [
			"response_type",
			"client_id",
			"scope",
			"state",
			"redirect_uri",
			"show_dialog",
			"prompt"
		]);
		assert!(
			request
				.authorize_url
				.query_pairs()
				.any(|(key, value)| key == "scope" && value == "openid email profile")
		);
		assert!(request.code_challenge().is_none());
	}

	#[test]
	fn state_wraps_a_random_nonce() {
		let request = owner("spotify", false).authorization_url(redirect(), &[]);
		let nonce = decode_state(&request.state).expect("State should decode.");

		assert_eq!(nonce.len(), STATE_LEN);
		assert!(request.validate_state(&request.state).is_ok());
		assert!(matches!(request.validate_state("forged"), Err(Error::InvalidGrant { .. })));
		assert_eq!(decode_state("%%%"), None);
	}

	#[test]
	fn pkce_is_added_when_required() {
		let request = owner("spotify", true).authorization_url(redirect(), &[]);
		let challenge = request.code_challenge().expect("PKCE challenge should be present.");
		let verifier = request.pkce_verifier().expect("PKCE verifier should be present.");

		assert_eq!(verifier.len(), PKCE_VERIFIER_LEN);
		assert_eq!(challenge, URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes())));
		assert!(
			request
				.authorize_url
				.query_pairs()
				.any(|(key, value)| key == "code_challenge_method" && value == "S256")
		);
		assert!(!format!("{request:?}").contains(verifier));
	}
}
