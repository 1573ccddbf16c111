// std
use std::collections::BTreeMap;
// crates.io
use url::Url;
// self
use oauth2_social::{
	auth::ProviderType,
	provider::{
		ClientAuthMethod, DefaultProviderStrategy, GrantType, ProviderErrorContext,
		ProviderErrorKind, ProviderOperation, ProviderStrategy, ResourceOwnerDescriptor,
		ResourceOwnerDescriptorBuilder, ResourceOwnerDescriptorError, ResourceOwnerOptions,
	},
	response::PathSpec,
};

fn url(value: &str) -> Url {
	Url::parse(value).expect("Failed to parse mock provider URL.")
}

fn builder(kind: &str) -> ResourceOwnerDescriptorBuilder {
	let kind =
		ProviderType::new(kind).expect("Failed to build provider type for mock descriptor.");

	ResourceOwnerDescriptor::builder(kind)
}

fn with_endpoints(builder: ResourceOwnerDescriptorBuilder) -> ResourceOwnerDescriptorBuilder {
	builder
		.authorization_endpoint(url("https://example.com/auth"))
		.access_token_endpoint(url("https://example.com/token"))
		.infos_endpoint(url("https://example.com/me"))
}

#[test]
fn descriptor_rejects_insecure_endpoints_and_missing_paths() {
	let err = with_endpoints(builder("mock-unmapped"))
		.build()
		.expect_err("Descriptor builder should require an identifier path.");

	assert_eq!(err, ResourceOwnerDescriptorError::MissingIdentifierPath);

	let err = builder("mock-insecure")
		.authorization_endpoint(url("https://example.com/auth"))
		.access_token_endpoint(url("https://example.com/token"))
		.infos_endpoint(url("http://example.com/me"))
		.path("identifier", "id")
		.build()
		.expect_err("Descriptor builder should reject insecure profile endpoints.");

	assert!(matches!(err, ResourceOwnerDescriptorError::InsecureEndpoint { endpoint: "infos", .. }));

	let err = builder("mock-missing")
		.authorization_endpoint(url("https://example.com/auth"))
		.path("identifier", "id")
		.build()
		.expect_err("Descriptor builder should require a token endpoint.");

	assert_eq!(err, ResourceOwnerDescriptorError::MissingAccessTokenEndpoint);
}

#[test]
fn custom_user_responses_may_skip_the_identifier_path() {
	let descriptor = with_endpoints(builder("custom"))
		.user_response_class("custom")
		.build()
		.expect("A custom user response resolves the identifier itself.");

	assert_eq!(descriptor.user_response_class.as_deref(), Some("custom"));
	assert!(descriptor.paths.is_empty());
}

#[test]
fn descriptor_support_helpers_cover_flags() {
	let options = ResourceOwnerOptions {
		use_bearer_authorization: false,
		scope_delimiter: ',',
		..ResourceOwnerOptions::default()
	};
	let descriptor = with_endpoints(builder("grants"))
		.support_grants([GrantType::AuthorizationCode, GrantType::RefreshToken])
		.preferred_client_auth_method(ClientAuthMethod::ClientSecretPost)
		.path("identifier", "id")
		.path("realname", ["first_name", "last_name"])
		.options(options)
		.authorization_param("display", "popup")
		.build()
		.expect("Descriptor builder should succeed for secure endpoints.");

	assert!(descriptor.supports(GrantType::AuthorizationCode));
	assert!(descriptor.supports(GrantType::RefreshToken));
	assert_eq!(descriptor.endpoints.authorization.as_str(), "https://example.com/auth");
	assert_eq!(descriptor.endpoints.access_token.as_str(), "https://example.com/token");
	assert_eq!(descriptor.endpoints.infos.as_str(), "https://example.com/me");
	assert_eq!(descriptor.preferred_client_auth_method, ClientAuthMethod::ClientSecretPost);
	assert_eq!(
		descriptor.paths.get("realname"),
		Some(&PathSpec::from(["first_name", "last_name"]))
	);
	assert!(!descriptor.options.pkce_required);
	assert!(!descriptor.options.use_bearer_authorization);
	assert_eq!(descriptor.options.scope_delimiter, ',');
	assert_eq!(
		descriptor.options.authorization_params.get("display").map(String::as_str),
		Some("popup")
	);
}

#[test]
fn control_characters_are_not_scope_delimiters() {
	let options = ResourceOwnerOptions { scope_delimiter: '\n', ..ResourceOwnerOptions::default() };
	let err = with_endpoints(builder("delimiter"))
		.path("identifier", "id")
		.options(options)
		.build()
		.expect_err("Control characters should be rejected.");

	assert_eq!(err, ResourceOwnerDescriptorError::InvalidScopeDelimiter { delimiter: '\n' });
}

#[test]
fn default_strategy_prefers_oauth_error_fields() {
	let strategy = DefaultProviderStrategy;
	let ctx = ProviderErrorContext::new(GrantType::AuthorizationCode)
		.with_http_status(400)
		.with_oauth_error("invalid_grant");

	assert_eq!(strategy.classify_error(&ctx), ProviderErrorKind::InvalidGrant);

	let ctx = ProviderErrorContext::new(GrantType::AuthorizationCode)
		.with_http_status(401)
		.with_oauth_error("invalid_client");

	assert_eq!(strategy.classify_error(&ctx), ProviderErrorKind::InvalidClient);
}

#[test]
fn default_strategy_falls_back_to_status_and_body() {
	let strategy = DefaultProviderStrategy;
	let ctx = ProviderErrorContext::new(GrantType::RefreshToken).with_http_status(401);

	assert_eq!(strategy.classify_error(&ctx), ProviderErrorKind::InvalidClient);

	let ctx = ProviderErrorContext::new(ProviderOperation::UserInformation).with_http_status(401);

	assert_eq!(strategy.classify_error(&ctx), ProviderErrorKind::InvalidGrant);

	let body_ctx = ProviderErrorContext::new(GrantType::RefreshToken)
		.with_body_preview("error=insufficient_scope");

	assert_eq!(strategy.classify_error(&body_ctx), ProviderErrorKind::InsufficientScope);

	let network_ctx = ProviderErrorContext::network_failure(ProviderOperation::UserInformation);

	assert_eq!(strategy.classify_error(&network_ctx), ProviderErrorKind::Transient);
}

#[test]
fn custom_strategy_can_augment_token_requests() {
	struct AudienceStrategy;
	impl ProviderStrategy for AudienceStrategy {
		fn classify_error(&self, _ctx: &ProviderErrorContext) -> ProviderErrorKind {
			ProviderErrorKind::InvalidGrant
		}

		fn augment_token_request(&self, grant: GrantType, form: &mut BTreeMap<String, String>) {
			form.insert("audience".into(), format!("for:{grant}"));
		}
	}

	let strategy = AudienceStrategy;
	let mut form = BTreeMap::new();

	form.insert("grant_type".into(), "refresh_token".into());
	strategy.augment_token_request(GrantType::RefreshToken, &mut form);

	assert_eq!(form.get("audience").map(String::as_str), Some("for:refresh_token"));
}
