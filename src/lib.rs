//! Social login on top of OAuth 2.0: resource-owner presets, path-mapped user profiles, and a
//! login entry point that plugs into any HTTP stack.
//!
//! A [`ResourceOwner`](owner::ResourceOwner) drives the authorization-code flow for one
//! provider and normalizes the profile it returns into a
//! [`UserResponse`](response::UserResponse) through a [`PathMap`](response::PathMap).
//! [`OAuthEntryPoint`](security::OAuthEntryPoint) answers unauthenticated requests by
//! redirecting or forwarding to the login page.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod owner;
pub mod provider;
pub mod response;
pub mod security;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::ProviderId,
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
		owner::{ResourceOwner, ReqwestResourceOwner},
		provider::{DefaultProviderStrategy, ProviderStrategy, ResourceOwnerDescriptor},
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`ResourceOwner`] with the default provider strategy and the reqwest
	/// transport used across integration tests.
	pub fn build_reqwest_test_owner(
		name: &str,
		descriptor: ResourceOwnerDescriptor,
		client_id: &str,
		client_secret: &str,
	) -> ReqwestResourceOwner {
		let strategy: Arc<dyn ProviderStrategy> = Arc::new(DefaultProviderStrategy);
		let name = ProviderId::new(name).expect("Test owner name should be valid.");

		ResourceOwner::with_http_client(
			name,
			descriptor,
			strategy,
			client_id,
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
		.with_client_secret(client_secret)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		hash::Hash,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _, tokio as _};
