//! Challenge responses for requests that reach a protected area without authentication.

// crates.io
use oauth2::{
	HttpRequest, HttpResponse,
	http::{HeaderName, HeaderValue, StatusCode},
};
// self
use crate::{
	_prelude::*,
	config::EntryPointConfig,
	obs::{self, ChallengeMode, FlowKind, FlowOutcome, FlowSpan},
	security::{
		HttpKernel, HttpUtils, RequestKind,
		http_utils::{merge_query, parse_uri},
	},
};

/// Header added to forwarded login pages to signal the missing authentication.
pub const X_STATUS_CODE: &str = "x-status-code";

/// Failures raised while answering an unauthenticated request.
#[derive(Debug, ThisError)]
pub enum EntryPointError<E>
where
	E: 'static + StdError,
{
	/// The login path could not be turned into a URI.
	#[error(transparent)]
	Uri(#[from] Error),
	/// The forwarded sub-request failed inside the host pipeline.
	#[error(transparent)]
	Dispatch(E),
}

/// Challenges unauthenticated requests by redirecting or forwarding to the login path.
pub struct OAuthEntryPoint<K>
where
	K: HttpKernel,
{
	kernel: K,
	http_utils: HttpUtils,
	login_path: String,
	use_forward: bool,
}
impl<K> OAuthEntryPoint<K>
where
	K: HttpKernel,
{
	/// Redirecting entry point for `login_path`.
	pub fn new(kernel: K, http_utils: HttpUtils, login_path: impl Into<String>) -> Self {
		Self { kernel, http_utils, login_path: login_path.into(), use_forward: false }
	}

	/// Entry point configured from `config`.
	pub fn from_config(kernel: K, http_utils: HttpUtils, config: &EntryPointConfig) -> Self {
		Self::new(kernel, http_utils, config.login_path.clone()).with_forward(config.use_forward)
	}

	/// Forwards to the login path instead of redirecting.
	pub fn with_forward(mut self, use_forward: bool) -> Self {
		self.use_forward = use_forward;

		self
	}

	/// Configured login path.
	pub fn login_path(&self) -> &str {
		&self.login_path
	}

	/// Whether the entry point forwards instead of redirecting.
	pub fn uses_forward(&self) -> bool {
		self.use_forward
	}

	/// Produces the challenge response for an unauthenticated `request`.
	///
	/// Redirect mode answers `302 Found` to the login path. Forward mode dispatches a
	/// sub-request for the login path carrying the original query parameters and returns the
	/// sub-response as-is, adding `X-Status-Code: 401` only when its status is exactly `200`.
	pub async fn start(
		&self,
		request: &HttpRequest,
	) -> Result<HttpResponse, EntryPointError<K::Error>> {
		const KIND: FlowKind = FlowKind::EntryPoint;

		let span = FlowSpan::new(KIND, if self.use_forward { "forward" } else { "redirect" });

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.challenge(request)).await;

		if let Err(EntryPointError::Uri(err)) = &result {
			obs::log_failure(KIND, err);
		}

		obs::record_result(KIND, &result);

		result
	}

	async fn challenge(
		&self,
		request: &HttpRequest,
	) -> Result<HttpResponse, EntryPointError<K::Error>> {
		if !self.use_forward {
			let response = self.http_utils.create_redirect_response(request, &self.login_path)?;

			obs::record_challenge(ChallengeMode::Redirect);

			return Ok(response);
		}

		let mut sub_request = self.http_utils.create_request(request, &self.login_path)?;
		let target = merge_query(&sub_request.uri().to_string(), request.uri().query());

		*sub_request.uri_mut() = parse_uri(&target)?;

		let mut response = self
			.kernel
			.handle(sub_request, RequestKind::Sub)
			.await
			.map_err(EntryPointError::Dispatch)?;

		if response.status() == StatusCode::OK {
			response
				.headers_mut()
				.insert(HeaderName::from_static(X_STATUS_CODE), HeaderValue::from_static("401"));
			obs::record_challenge(ChallengeMode::ForwardFlagged);
		} else {
			obs::record_challenge(ChallengeMode::Forward);
		}

		Ok(response)
	}
}
impl<K> Debug for OAuthEntryPoint<K>
where
	K: HttpKernel,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthEntryPoint")
			.field("http_utils", &self.http_utils)
			.field("login_path", &self.login_path)
			.field("use_forward", &self.use_forward)
			.finish()
	}
}
