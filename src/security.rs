//! Host-framework integration: URI generation, the request-handling seam, and the
//! unauthenticated-access entry point.
//!
//! Requests and responses are plain [`http`](oauth2::http) values with byte bodies, the same
//! types the transport layer uses, so any server stack can adapt to them. The host supplies an
//! [`HttpKernel`] able to dispatch internal sub-requests and, optionally, a [`UrlGenerator`]
//! resolving route names.

pub mod entry_point;
pub mod http_utils;
pub mod kernel;

pub use entry_point::*;
pub use http_utils::*;
pub use kernel::*;
pub use oauth2::{HttpRequest, HttpResponse};
