//! Plugs [`OAuthEntryPoint`] into a toy request pipeline and shows both challenge modes.

// std
use std::convert::Infallible;
// crates.io
use color_eyre::Result;
use oauth2::http::{Request, Response, StatusCode};
// self
use oauth2_social::{
	config::SocialConfig,
	security::{
		HttpKernel, HttpRequest, HttpUtils, KernelFuture, OAuthEntryPoint, RequestKind,
	},
};

/// Serves the login page and nothing else.
struct App;
impl HttpKernel for App {
	type Error = Infallible;

	fn handle(&self, request: HttpRequest, kind: RequestKind) -> KernelFuture<'_, Self::Error> {
		Box::pin(async move {
			let (status, body) = if request.uri().path() == "/login" {
				(StatusCode::OK, format!("<h1>Sign in</h1><p>{kind:?} {}</p>", request.uri()))
			} else {
				(StatusCode::NOT_FOUND, "Not found".to_owned())
			};

			Ok(Response::builder()
				.status(status)
				.body(body.into_bytes())
				.unwrap_or_else(|_| Response::new(Vec::new())))
		})
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let unauthenticated = Request::builder()
		.uri("https://app.example/account/settings?tab=security")
		.body(Vec::new())?;

	for use_forward in [false, true] {
		let config = SocialConfig::from_json_str(&format!(
			r#"{{ "entry_point": {{ "login_path": "/login", "use_forward": {use_forward} }} }}"#
		))?;
		let entry_point = OAuthEntryPoint::from_config(App, HttpUtils::new(), &config.entry_point);
		let response = entry_point.start(&unauthenticated).await?;

		println!("use_forward={use_forward}: {}", response.status());

		for (name, value) in response.headers() {
			println!("  {name}: {}", value.to_str().unwrap_or("<binary>"));
		}

		println!("  {}", String::from_utf8_lossy(response.body()));
	}

	Ok(())
}
