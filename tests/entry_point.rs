// std
use std::sync::Arc;
// crates.io
use oauth2::http::{Request, Response, StatusCode, header::LOCATION};
use parking_lot::Mutex;
use thiserror::Error as ThisError;
// self
use oauth2_social::{
	config::EntryPointConfig,
	security::{
		EntryPointError, HttpKernel, HttpRequest, HttpUtils, KernelFuture, OAuthEntryPoint,
		RequestKind, X_STATUS_CODE,
	},
};

#[derive(Debug, ThisError)]
#[error("Login page is unavailable.")]
struct LoginPageDown;

struct LoginPage {
	status: Option<StatusCode>,
	seen: Mutex<Vec<(HttpRequest, RequestKind)>>,
}
impl LoginPage {
	fn answering(status: StatusCode) -> Arc<Self> {
		Arc::new(Self { status: Some(status), seen: Mutex::new(Vec::new()) })
	}

	fn failing() -> Arc<Self> {
		Arc::new(Self { status: None, seen: Mutex::new(Vec::new()) })
	}
}
impl HttpKernel for LoginPage {
	type Error = LoginPageDown;

	fn handle(&self, request: HttpRequest, kind: RequestKind) -> KernelFuture<'_, Self::Error> {
		self.seen.lock().push((request, kind));

		let status = self.status;

		Box::pin(async move {
			let status = status.ok_or(LoginPageDown)?;

			Ok(Response::builder()
				.status(status)
				.body(b"<form>login</form>".to_vec())
				.expect("Login page response should build."))
		})
	}
}

fn request(uri: &str) -> HttpRequest {
	Request::builder()
		.uri(uri)
		.header("cookie", "session=abc")
		.body(Vec::new())
		.expect("Request fixture should build.")
}

#[tokio::test]
async fn redirect_mode_points_at_the_login_path() {
	let kernel = LoginPage::answering(StatusCode::OK);
	let entry_point = OAuthEntryPoint::new(kernel.clone(), HttpUtils::new(), "/login");
	let response = entry_point
		.start(&request("https://app.example/secured?page=2"))
		.await
		.expect("Redirect should build.");

	assert_eq!(response.status(), StatusCode::FOUND);
	assert_eq!(
		response.headers().get(LOCATION).and_then(|value| value.to_str().ok()),
		Some("https://app.example/login")
	);
	assert!(response.headers().get(X_STATUS_CODE).is_none());
	assert!(kernel.seen.lock().is_empty());
}

#[tokio::test]
async fn forward_mode_flags_successful_login_pages() {
	let kernel = LoginPage::answering(StatusCode::OK);
	let config = EntryPointConfig { login_path: "/login".into(), use_forward: true };
	let entry_point = OAuthEntryPoint::from_config(kernel.clone(), HttpUtils::new(), &config);
	let response = entry_point
		.start(&request("https://app.example/secured?page=2&lang=en"))
		.await
		.expect("Forward should succeed.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.body().as_slice(), b"<form>login</form>");
	assert_eq!(
		response.headers().get(X_STATUS_CODE).and_then(|value| value.to_str().ok()),
		Some("401")
	);

	let seen = kernel.seen.lock();
	let (sub_request, kind) = seen.first().expect("Kernel should receive the sub-request.");

	assert_eq!(*kind, RequestKind::Sub);
	assert_eq!(sub_request.uri(), "https://app.example/login?page=2&lang=en");
	assert_eq!(
		sub_request.headers().get("cookie").and_then(|value| value.to_str().ok()),
		Some("session=abc")
	);
}

#[tokio::test]
async fn forward_mode_passes_other_statuses_through() {
	for status in [StatusCode::NO_CONTENT, StatusCode::FOUND, StatusCode::INTERNAL_SERVER_ERROR] {
		let kernel = LoginPage::answering(status);
		let entry_point =
			OAuthEntryPoint::new(kernel, HttpUtils::new(), "/login").with_forward(true);
		let response = entry_point
			.start(&request("https://app.example/secured"))
			.await
			.expect("Forward should succeed.");

		assert_eq!(response.status(), status);
		assert!(response.headers().get(X_STATUS_CODE).is_none());
	}
}

#[tokio::test]
async fn route_names_resolve_through_the_generator() {
	let kernel = LoginPage::answering(StatusCode::OK);
	let utils = HttpUtils::new().with_url_generator(Arc::new(|route: &str| {
		(route == "social_login").then(|| "/connect".to_owned())
	}));
	let entry_point = OAuthEntryPoint::new(kernel, utils, "social_login");
	let response = entry_point
		.start(&request("https://app.example/secured"))
		.await
		.expect("Route names should resolve.");

	assert_eq!(
		response.headers().get(LOCATION).and_then(|value| value.to_str().ok()),
		Some("https://app.example/connect")
	);

	let err = OAuthEntryPoint::new(LoginPage::answering(StatusCode::OK), HttpUtils::new(), "login")
		.start(&request("https://app.example/secured"))
		.await
		.expect_err("Route names need a generator.");

	assert!(matches!(err, EntryPointError::Uri(_)));
}

#[tokio::test]
async fn kernel_failures_surface_unchanged() {
	let entry_point =
		OAuthEntryPoint::new(LoginPage::failing(), HttpUtils::new(), "/login").with_forward(true);
	let err = entry_point
		.start(&request("https://app.example/secured"))
		.await
		.expect_err("Kernel failures should propagate.");

	assert!(matches!(err, EntryPointError::Dispatch(LoginPageDown)));
	assert_eq!(err.to_string(), "Login page is unavailable.");
}
