//! Seam through which the entry point dispatches sub-requests into the host application.

// crates.io
use oauth2::{HttpRequest, HttpResponse};
// self
use crate::_prelude::*;

/// Boxed future returned by [`HttpKernel::handle`].
pub type KernelFuture<'a, E> =
	Pin<Box<dyn Future<Output = std::result::Result<HttpResponse, E>> + 'a + Send>>;

/// Whether a request came from the client or was issued internally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
	/// Client-visible request.
	Main,
	/// Internal sub-request; never visible to the client.
	Sub,
}

/// The host's request-handling pipeline.
pub trait HttpKernel
where
	Self: 'static + Send + Sync,
{
	/// Failure raised by the pipeline; surfaced to callers unchanged.
	type Error: 'static + Send + Sync + StdError;

	/// Dispatches `request` through the pipeline.
	fn handle(&self, request: HttpRequest, kind: RequestKind) -> KernelFuture<'_, Self::Error>;
}
impl<K> HttpKernel for Arc<K>
where
	K: ?Sized + HttpKernel,
{
	type Error = K::Error;

	fn handle(&self, request: HttpRequest, kind: RequestKind) -> KernelFuture<'_, Self::Error> {
		(**self).handle(request, kind)
	}
}
