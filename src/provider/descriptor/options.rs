// self
use crate::_prelude::*;

/// Provider-specific options that influence how resource-owner flows behave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceOwnerOptions {
	/// Indicates whether PKCE must be supplied even for confidential clients.
	pub pkce_required: bool,
	/// Sends the access token as `Authorization: Bearer` when fetching user information;
	/// otherwise it is appended as the `access_token` query parameter.
	pub use_bearer_authorization: bool,
	/// Character used to join scopes when constructing `scope` parameters.
	pub scope_delimiter: char,
	/// Extra parameters appended to every authorization URL (e.g. `show_dialog`).
	pub authorization_params: BTreeMap<String, String>,
}
impl Default for ResourceOwnerOptions {
	fn default() -> Self {
		Self {
			pkce_required: false,
			use_bearer_authorization: true,
			scope_delimiter: ' ',
			authorization_params: BTreeMap::new(),
		}
	}
}
