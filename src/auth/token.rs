//! Token secrets and the provider-issued token model.

pub mod oauth_token;
pub mod secret;
