//! Drives a Spotify login from configuration: prints the authorization URL, reads the redirected
//! callback URL from stdin, then exchanges the code and prints the normalized profile.
//!
//! ```sh
//! SPOTIFY_CLIENT_ID=... SPOTIFY_CLIENT_SECRET=... cargo run --example spotify_login
//! ```

// std
use std::{env, io, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
use url::Url;
// self
use oauth2_social::{
	config::SocialConfig,
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::{DefaultProviderStrategy, ProviderRegistry},
	response::UserResponseRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let client_id = env::var("SPOTIFY_CLIENT_ID").unwrap_or_else(|_| "demo-client".into());
	let client_secret = env::var("SPOTIFY_CLIENT_SECRET").unwrap_or_else(|_| "demo-secret".into());
	let config = SocialConfig::from_json_str(&format!(
		r#"{{
			"entry_point": {{ "login_path": "/login" }},
			"resource_owners": {{
				"spotify": {{
					"type": "spotify",
					"client_id": "{client_id}",
					"client_secret": "{client_secret}",
					"scope": "user-read-email user-read-private",
					"options": {{ "authorization_params": {{ "show_dialog": "true" }} }}
				}}
			}}
		}}"#
	))?;
	let owners = config.build_resource_owners(
		&ProviderRegistry::new(),
		&UserResponseRegistry::new(),
		Arc::new(DefaultProviderStrategy),
		Arc::new(ReqwestHttpClient::default()),
		Arc::new(ReqwestTransportErrorMapper),
	)?;
	let spotify = owners.get("spotify").ok_or_else(|| eyre!("Spotify is not configured."))?;
	let request = spotify.authorization_url(
		Url::parse("http://127.0.0.1:8000/login/check-spotify")?,
		&[],
	);

	println!("Open {} and paste the redirected URL here:", &request.authorize_url);

	let mut line = String::new();

	io::stdin().read_line(&mut line)?;

	let callback = Url::parse(line.trim())?;

	if !spotify.handles(&callback) {
		return Err(eyre!("The callback does not carry an authorization code."));
	}

	let pairs = callback.query_pairs().into_owned().collect::<Vec<_>>();
	let lookup = |key: &str| {
		pairs.iter().find(|(name, _)| name == key).map(|(_, value)| value.clone()).unwrap_or_default()
	};

	request.validate_state(&lookup("state"))?;

	let token = spotify.get_access_token(&request, &lookup("code")).await?;
	let user = spotify.get_user_information(token).await?;

	println!("Logged in as {} ({:?}).", user.user_identifier()?, user.real_name());
	println!("Email: {:?}, picture: {:?}.", user.email(), user.profile_picture());

	Ok(())
}
