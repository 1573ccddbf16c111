//! URI generation and request/response construction for the entry point.

// crates.io
use oauth2::{
	HttpRequest, HttpResponse,
	http::{
		HeaderValue, Method, Request, Response, StatusCode, Uri,
		header::{CONTENT_LENGTH, CONTENT_TYPE, HOST, LOCATION, TRANSFER_ENCODING},
	},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
};

/// Resolves route names into paths or absolute URLs.
pub trait UrlGenerator
where
	Self: Send + Sync,
{
	/// Returns the URL for `route`, or `None` if the route does not exist.
	fn generate(&self, route: &str) -> Option<String>;
}
impl<F> UrlGenerator for F
where
	F: Send + Sync + Fn(&str) -> Option<String>,
{
	fn generate(&self, route: &str) -> Option<String> {
		self(route)
	}
}

/// Builds URIs, sub-requests, and redirects relative to an incoming request.
#[derive(Clone, Default)]
pub struct HttpUtils {
	url_generator: Option<Arc<dyn UrlGenerator>>,
}
impl HttpUtils {
	/// Utilities without route-name support.
	pub fn new() -> Self {
		Self::default()
	}

	/// Enables route-name resolution through `generator`.
	pub fn with_url_generator(mut self, generator: Arc<dyn UrlGenerator>) -> Self {
		self.url_generator = Some(generator);

		self
	}

	/// Turns `path` into a URI for `request`.
	///
	/// `http://` and `https://` values are returned as-is. Values starting with `/` are made
	/// absolute with the request's scheme and authority (falling back to the `Host` header) and
	/// stay relative when neither is known. Anything else is a route name.
	pub fn generate_uri(&self, request: &HttpRequest, path: &str) -> Result<String> {
		if is_absolute(path) {
			return Ok(path.to_owned());
		}
		if path.starts_with('/') {
			return Ok(absolutize(request, path));
		}

		let generator = self
			.url_generator
			.as_ref()
			.ok_or_else(|| ConfigError::MissingUrlGenerator { route: path.to_owned() })?;
		let generated = generator
			.generate(path)
			.ok_or_else(|| ConfigError::UnknownRoute { route: path.to_owned() })?;

		if generated.starts_with('/') { Ok(absolutize(request, &generated)) } else { Ok(generated) }
	}

	/// Builds a GET sub-request for `path` carrying the original request's headers.
	///
	/// Body framing headers are dropped because the sub-request has no body.
	pub fn create_request(&self, request: &HttpRequest, path: &str) -> Result<HttpRequest> {
		let uri = parse_uri(&self.generate_uri(request, path)?)?;
		let mut sub_request = Request::new(Vec::new());

		*sub_request.method_mut() = Method::GET;
		*sub_request.uri_mut() = uri;
		*sub_request.version_mut() = request.version();
		*sub_request.headers_mut() = request.headers().clone();

		for name in [CONTENT_LENGTH, CONTENT_TYPE, TRANSFER_ENCODING] {
			sub_request.headers_mut().remove(name);
		}

		Ok(sub_request)
	}

	/// Builds a `302 Found` redirect to `path`.
	pub fn create_redirect_response(&self, request: &HttpRequest, path: &str) -> Result<HttpResponse> {
		let location = self.generate_uri(request, path)?;
		let location = HeaderValue::from_str(&location)
			.map_err(|_| ConfigError::InvalidUri { uri: location.clone() })?;

		Response::builder()
			.status(StatusCode::FOUND)
			.header(LOCATION, location)
			.body(Vec::new())
			.map_err(|err| ConfigError::from(err).into())
	}

	/// Returns `true` when `request` targets the path `path` resolves to.
	pub fn check_request_path(&self, request: &HttpRequest, path: &str) -> bool {
		let Ok(uri) = self.generate_uri(request, path) else {
			return false;
		};

		match parse_uri(&uri) {
			Ok(target) => target.path() == request.uri().path(),
			Err(_) => false,
		}
	}
}
impl Debug for HttpUtils {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpUtils")
			.field("url_generator_set", &self.url_generator.is_some())
			.finish()
	}
}

/// Overlays the query of `original` onto `target`.
///
/// Keys present in `original` replace same-named keys of `target`; other `target` pairs keep
/// their order and come first.
pub fn merge_query(target: &str, original: Option<&str>) -> String {
	let Some(original) = original.filter(|query| !query.is_empty()) else {
		return target.to_owned();
	};
	let (base, fragment) = match target.split_once('#') {
		Some((base, fragment)) => (base, Some(fragment)),
		None => (target, None),
	};
	let (path, query) = base.split_once('?').unwrap_or((base, ""));
	let overrides = form_urlencoded::parse(original.as_bytes()).collect::<Vec<_>>();
	let mut serializer = form_urlencoded::Serializer::new(String::new());

	for (key, value) in form_urlencoded::parse(query.as_bytes()) {
		if !overrides.iter().any(|(override_key, _)| *override_key == key) {
			serializer.append_pair(&key, &value);
		}
	}
	for (key, value) in &overrides {
		serializer.append_pair(key, value);
	}

	let mut merged = format!("{path}?{}", serializer.finish());

	if let Some(fragment) = fragment {
		merged.push('#');
		merged.push_str(fragment);
	}

	merged
}

pub(crate) fn parse_uri(raw: &str) -> Result<Uri> {
	raw.parse::<Uri>().map_err(|_| ConfigError::InvalidUri { uri: raw.to_owned() }.into())
}

fn is_absolute(path: &str) -> bool {
	path.starts_with("http://") || path.starts_with("https://")
}

fn absolutize(request: &HttpRequest, path: &str) -> String {
	let uri = request.uri();

	if let Some(authority) = uri.authority() {
		let scheme = uri.scheme_str().unwrap_or("http");

		return format!("{scheme}://{authority}{path}");
	}

	match request.headers().get(HOST).and_then(|host| host.to_str().ok()) {
		Some(host) if !host.is_empty() => format!("http://{host}{path}"),
		_ => path.to_owned(),
	}
}
