#![cfg(feature = "reqwest")]

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use serde_json::Value;
use url::Url;
// self
use oauth2_social::{
	auth::{OAuthToken, ProviderId},
	config::SocialConfig,
	error::{ConfigError, Error, Result},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	owner::ResourceOwnerMap,
	provider::{DefaultProviderStrategy, ProviderRegistry},
	response::{
		PathMap, PathUserResponse, ResponseData, UserResponse, UserResponseRegistry,
	},
};

const CONFIG: &str = r#"{
	"entry_point": { "login_path": "/login", "use_forward": true },
	"resource_owners": {
		"spotify": {
			"type": "spotify",
			"client_id": "spotify-id",
			"client_secret": "spotify-secret",
			"paths": { "foo": "bar" }
		},
		"corporate": {
			"type": "oauth2",
			"client_id": "corp-id",
			"authorization_url": "https://sso.corp.example/authorize",
			"access_token_url": "https://sso.corp.example/token",
			"infos_url": "https://sso.corp.example/userinfo",
			"scope": "openid email",
			"paths": { "identifier": "sub", "realname": ["given_name", "family_name"] },
			"user_response_class": "uppercase"
		}
	}
}"#;

fn uppercase_response() -> Box<dyn UserResponse> {
	#[derive(Debug)]
	struct Uppercase(PathUserResponse);
	impl UserResponse for Uppercase {
		fn set_data(&mut self, data: ResponseData) -> Result<()> {
			self.0.set_data(data)
		}

		fn data(&self) -> &Value {
			self.0.data()
		}

		fn set_paths(&mut self, paths: &PathMap) {
			self.0.set_paths(paths)
		}

		fn paths(&self) -> &PathMap {
			self.0.paths()
		}

		fn set_oauth_token(&mut self, token: OAuthToken) {
			self.0.set_oauth_token(token)
		}

		fn oauth_token(&self) -> Option<&OAuthToken> {
			self.0.oauth_token()
		}

		fn set_resource_owner(&mut self, owner: ProviderId) {
			self.0.set_resource_owner(owner)
		}

		fn resource_owner(&self) -> Option<&ProviderId> {
			self.0.resource_owner()
		}

		fn value_for(&self, field: &str) -> Option<String> {
			self.0.value_for(field).map(|value| value.to_uppercase())
		}
	}

	Box::new(Uppercase(PathUserResponse::default()))
}

fn build(
	config: &SocialConfig,
	responses: &UserResponseRegistry,
) -> Result<ResourceOwnerMap<ReqwestHttpClient, ReqwestTransportErrorMapper>> {
	config.build_resource_owners(
		&ProviderRegistry::new(),
		responses,
		Arc::new(DefaultProviderStrategy),
		Arc::new(ReqwestHttpClient::default()),
		Arc::new(ReqwestTransportErrorMapper),
	)
}

#[test]
fn configured_owners_are_built_by_name() {
	let config = SocialConfig::from_json_str(CONFIG).expect("Config fixture should parse.");
	let responses = UserResponseRegistry::new().register("uppercase", uppercase_response);
	let owners = build(&config, &responses).expect("Configured owners should build.");

	assert!(config.entry_point.use_forward);
	assert_eq!(owners.len(), 2);
	assert_eq!(
		owners.names().map(|name| name.to_string()).collect::<Vec<_>>(),
		vec!["corporate".to_owned(), "spotify".to_owned()]
	);

	let spotify = owners.get("spotify").expect("Spotify owner should be registered.");

	assert_eq!(spotify.client_id, "spotify-id");
	assert_eq!(spotify.client_secret.as_deref(), Some("spotify-secret"));
	assert_eq!(spotify.descriptor.endpoints.infos.as_str(), "https://api.spotify.com/v1/me");

	let corporate = owners.get("corporate").expect("Corporate owner should be registered.");
	let request = corporate.authorization_url(
		Url::parse("https://app.example/login/check-corporate").expect("Redirect URI should parse."),
		&[],
	);
	let pairs = request.authorize_url.query_pairs().into_owned().collect::<HashMap<_, _>>();

	assert_eq!(pairs.get("scope").map(String::as_str), Some("openid email"));
	assert_eq!(pairs.get("client_id").map(String::as_str), Some("corp-id"));
	assert_eq!(corporate.client_secret, None);

	let mut response = corporate.user_response_factory.create();

	response.set_paths(&corporate.descriptor.paths);
	response
		.set_data(r#"{"sub":"u-1","given_name":"ada","family_name":"lovelace"}"#.into())
		.expect("Profile fixture should be valid.");

	assert_eq!(response.real_name().as_deref(), Some("ADA LOVELACE"));
}

#[test]
fn misconfigured_owners_are_rejected() {
	let responses = UserResponseRegistry::new();
	let config = SocialConfig::from_json_str(CONFIG).expect("Config fixture should parse.");
	let err = build(&config, &responses).expect_err("The uppercase class is not registered.");

	assert!(matches!(
		err,
		Error::Config(ConfigError::UnknownUserResponseClass { ref class }) if class == "uppercase"
	));

	let config = SocialConfig::from_json_str(
		r#"{
			"entry_point": { "login_path": "/login" },
			"resource_owners": { "myspace": { "type": "myspace", "client_id": "id" } }
		}"#,
	)
	.expect("Config fixture should parse.");
	let err = build(&config, &responses).expect_err("Unknown provider types must be rejected.");

	assert!(matches!(err, Error::Config(ConfigError::UnknownProviderType { .. })));

	let config = SocialConfig::from_json_str(
		r#"{
			"entry_point": { "login_path": "/login" },
			"resource_owners": { "github": { "type": "github", "client_id": " " } }
		}"#,
	)
	.expect("Config fixture should parse.");
	let err = build(&config, &responses).expect_err("Blank client identifiers must be rejected.");

	assert!(matches!(err, Error::Config(ConfigError::InvalidResourceOwner { ref owner, .. }) if owner == "github"));
}

#[test]
fn generic_owners_need_endpoints() {
	let config = SocialConfig::from_json_str(
		r#"{
			"entry_point": { "login_path": "/login" },
			"resource_owners": {
				"corporate": { "type": "oauth2", "client_id": "id", "paths": { "identifier": "sub" } }
			}
		}"#,
	)
	.expect("Config fixture should parse.");
	let err = build(&config, &UserResponseRegistry::new())
		.expect_err("Generic owners without endpoints must be rejected.");

	assert!(matches!(err, Error::Config(ConfigError::Descriptor(_))));
}
