//! Token endpoint operations: authorization code exchange and refresh.

// self
use crate::{
	_prelude::*,
	auth::{OAuthToken, TokenSecret},
	http::ProviderHttpClient,
	oauth::{BasicFacade, OAuth2Facade, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	owner::{AuthorizationRequest, ResourceOwner},
	provider::GrantType,
};

impl<C, M> ResourceOwner<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges the callback `code` for a token.
	///
	/// `request` must be the [`AuthorizationRequest`] this owner issued for the same login
	/// attempt; its redirect URI and PKCE verifier are replayed. Callers validate the returned
	/// state with [`AuthorizationRequest::validate_state`] first.
	pub async fn get_access_token(
		&self,
		request: &AuthorizationRequest,
		code: &str,
	) -> Result<OAuthToken> {
		const KIND: FlowKind = FlowKind::AccessToken;

		let span = FlowSpan::new(KIND, "get_access_token").with_owner(&self.name);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				if request.owner != self.name {
					return Err(Error::InvalidGrant {
						reason: format!(
							"Authorization request was issued by `{}`, not `{}`.",
							request.owner, self.name
						),
					});
				}

				self.ensure_grant(GrantType::AuthorizationCode)?;

				self.facade()?
					.exchange_authorization_code(
						self.strategy.as_ref(),
						code,
						request.pkce_verifier(),
						&request.redirect_uri,
					)
					.await
			})
			.await;

		if let Err(err) = &result {
			obs::log_failure(KIND, err);
		}

		obs::record_result(KIND, &result);

		result
	}

	/// Trades `refresh_token` for a new token.
	///
	/// Providers that do not rotate refresh tokens keep the one that was sent.
	pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<OAuthToken> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_access_token").with_owner(&self.name);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.ensure_grant(GrantType::RefreshToken)?;

				let mut token =
					self.facade()?.refresh_token(self.strategy.as_ref(), refresh_token).await?;

				if token.refresh_token.is_none() {
					token.refresh_token = Some(TokenSecret::new(refresh_token));
				}

				Ok(token)
			})
			.await;

		if let Err(err) = &result {
			obs::log_failure(KIND, err);
		}

		obs::record_result(KIND, &result);

		result
	}

	fn facade(&self) -> Result<BasicFacade<C, M>> {
		BasicFacade::from_descriptor(
			&self.descriptor,
			&self.client_id,
			self.client_secret.as_deref(),
			self.http_client.clone(),
			self.transport_mapper.clone(),
		)
	}
}
