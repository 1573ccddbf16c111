//! Profile fetch and normalization.

// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION},
	},
};
// self
use crate::{
	_prelude::*,
	auth::OAuthToken,
	error::ConfigError,
	http::{ProviderHttpClient, ResponseMetadataSlot},
	oauth::{self, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	owner::ResourceOwner,
	provider::ProviderOperation,
	response::{ResponseData, UserResponse},
};

impl<C, M> ResourceOwner<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Fetches the user profile with `token` and maps it through the configured user response.
	///
	/// The response carries the descriptor's paths, `token`, and this owner's name. A body that
	/// is not a JSON object or array fails with [`Error::InvalidData`].
	pub async fn get_user_information(&self, token: OAuthToken) -> Result<Box<dyn UserResponse>> {
		const KIND: FlowKind = FlowKind::UserInformation;

		let span = FlowSpan::new(KIND, "get_user_information").with_owner(&self.name);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let body = self.fetch_profile(&token).await?;
				let mut response = self.user_response_factory.create();

				response.set_paths(&self.descriptor.paths);
				response.set_oauth_token(token);
				response.set_resource_owner(self.name.clone());
				response.set_data(ResponseData::from(body))?;

				Ok(response)
			})
			.await;

		if let Err(err) = &result {
			obs::log_failure(KIND, err);
		}

		obs::record_result(KIND, &result);

		result
	}

	async fn fetch_profile(&self, token: &OAuthToken) -> Result<Vec<u8>> {
		let access_token = token.access_token.expose();
		let mut url = self.descriptor.endpoints.infos.clone();
		let mut builder = Request::builder().method(Method::GET).header(ACCEPT, "application/json");

		if self.descriptor.options.use_bearer_authorization {
			builder = builder.header(AUTHORIZATION, format!("Bearer {access_token}"));
		} else {
			url.query_pairs_mut().append_pair("access_token", access_token);
		}

		let request = builder.uri(url.as_str()).body(Vec::new()).map_err(ConfigError::from)?;
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());
		let response = handle.call(request).await.map_err(|err| {
			self.transport_mapper.map_transport_error(
				self.strategy.as_ref(),
				ProviderOperation::UserInformation,
				meta.take().as_ref(),
				err,
			)
		})?;
		let status = response.status();

		if !status.is_success() {
			return Err(oauth::map_status_error(
				self.strategy.as_ref(),
				ProviderOperation::UserInformation,
				status.as_u16(),
				response.body(),
				meta.take().as_ref(),
			));
		}

		Ok(response.into_body())
	}
}
