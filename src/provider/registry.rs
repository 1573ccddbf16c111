//! Provider presets looked up by type name.
//!
//! Every supported provider is plain data: endpoints, grants, default scope, and default field
//! paths. [`ProviderRegistry::builder`] turns a preset into a
//! [`ResourceOwnerDescriptorBuilder`] that deployments can still override before building.

// self
use crate::{
	_prelude::*,
	auth::{ProviderType, ScopeSet},
	error::ConfigError,
	provider::{
		ClientAuthMethod, GrantType, ResourceOwnerDescriptor, ResourceOwnerDescriptorBuilder,
		ResourceOwnerOptions,
	},
};

/// Static description of a well-known provider.
#[derive(Clone, Copy, Debug)]
pub struct ProviderPreset {
	/// Provider type name (e.g. `spotify`).
	pub kind: &'static str,
	/// Authorization endpoint.
	pub authorization_url: &'static str,
	/// Token endpoint.
	pub access_token_url: &'static str,
	/// Profile endpoint.
	pub infos_url: &'static str,
	/// Scope requested by default.
	pub scope: &'static [&'static str],
	/// Grants the provider supports.
	pub grants: &'static [GrantType],
	/// Client authentication the token endpoint expects.
	pub client_auth: ClientAuthMethod,
	/// Whether the profile endpoint takes a bearer header.
	pub use_bearer_authorization: bool,
	/// Scope delimiter the provider expects.
	pub scope_delimiter: char,
	/// Default field paths.
	pub paths: &'static [(&'static str, &'static str)],
}
impl ProviderPreset {
	fn to_builder(&self) -> Result<ResourceOwnerDescriptorBuilder> {
		let kind = ProviderType::new(self.kind).map_err(|err| ConfigError::InvalidResourceOwner {
			owner: self.kind.into(),
			reason: err.to_string(),
		})?;
		let options = ResourceOwnerOptions {
			use_bearer_authorization: self.use_bearer_authorization,
			scope_delimiter: self.scope_delimiter,
			..Default::default()
		};
		let mut builder = ResourceOwnerDescriptor::builder(kind)
			.authorization_endpoint(parse_url(self.authorization_url)?)
			.access_token_endpoint(parse_url(self.access_token_url)?)
			.infos_endpoint(parse_url(self.infos_url)?)
			.support_grants(self.grants.iter().copied())
			.preferred_client_auth_method(self.client_auth)
			.scope(ScopeSet::new(self.scope.iter().copied()).map_err(ConfigError::from)?)
			.options(options);

		for (field, path) in self.paths {
			builder = builder.path(*field, *path);
		}

		Ok(builder)
	}
}

/// Spotify Web API.
pub const SPOTIFY: ProviderPreset = ProviderPreset {
	kind: "spotify",
	authorization_url: "https://accounts.spotify.com/authorize",
	access_token_url: "https://accounts.spotify.com/api/token",
	infos_url: "https://api.spotify.com/v1/me",
	scope: &[],
	grants: &[GrantType::AuthorizationCode, GrantType::RefreshToken],
	client_auth: ClientAuthMethod::ClientSecretBasic,
	use_bearer_authorization: true,
	scope_delimiter: ' ',
	paths: &[
		("identifier", "id"),
		("nickname", "id"),
		("realname", "display_name"),
		("email", "email"),
		("profilepicture", "images.0.url"),
	],
};

/// Facebook Graph API.
pub const FACEBOOK: ProviderPreset = ProviderPreset {
	kind: "facebook",
	authorization_url: "https://www.facebook.com/v3.1/dialog/oauth",
	access_token_url: "https://graph.facebook.com/v3.1/oauth/access_token",
	infos_url: "https://graph.facebook.com/v3.1/me?fields=id,name,first_name,last_name,email,picture.type(large)",
	scope: &["email"],
	grants: &[GrantType::AuthorizationCode],
	client_auth: ClientAuthMethod::ClientSecretPost,
	use_bearer_authorization: false,
	scope_delimiter: ',',
	paths: &[
		("identifier", "id"),
		("nickname", "name"),
		("firstname", "first_name"),
		("lastname", "last_name"),
		("realname", "name"),
		("email", "email"),
		("profilepicture", "picture.data.url"),
	],
};

/// GitHub OAuth apps.
pub const GITHUB: ProviderPreset = ProviderPreset {
	kind: "github",
	authorization_url: "https://github.com/login/oauth/authorize",
	access_token_url: "https://github.com/login/oauth/access_token",
	infos_url: "https://api.github.com/user",
	scope: &["user:email"],
	grants: &[GrantType::AuthorizationCode],
	client_auth: ClientAuthMethod::ClientSecretPost,
	use_bearer_authorization: true,
	scope_delimiter: ' ',
	paths: &[
		("identifier", "id"),
		("nickname", "login"),
		("realname", "name"),
		("email", "email"),
		("profilepicture", "avatar_url"),
	],
};

/// Google OAuth 2.0.
pub const GOOGLE: ProviderPreset = ProviderPreset {
	kind: "google",
	authorization_url: "https://accounts.google.com/o/oauth2/auth",
	access_token_url: "https://oauth2.googleapis.com/token",
	infos_url: "https://www.googleapis.com/oauth2/v1/userinfo",
	scope: &["openid", "email", "profile"],
	grants: &[GrantType::AuthorizationCode, GrantType::RefreshToken],
	client_auth: ClientAuthMethod::ClientSecretPost,
	use_bearer_authorization: true,
	scope_delimiter: ' ',
	paths: &[
		("identifier", "id"),
		("nickname", "name"),
		("firstname", "given_name"),
		("lastname", "family_name"),
		("realname", "name"),
		("email", "email"),
		("profilepicture", "picture"),
	],
};

#[derive(Clone, Debug)]
enum RegistryEntry {
	Preset(ProviderPreset),
	Descriptor(Box<ResourceOwnerDescriptor>),
	Generic,
}

/// Provider type → preset lookup, populated once at startup.
#[derive(Clone, Debug)]
pub struct ProviderRegistry {
	entries: HashMap<String, RegistryEntry>,
}
impl ProviderRegistry {
	/// Type name for providers whose endpoints come entirely from configuration.
	pub const GENERIC_OAUTH2: &'static str = "oauth2";

	/// Registry holding the built-in presets and the generic `oauth2` type.
	pub fn new() -> Self {
		let mut entries = HashMap::new();

		entries.insert(Self::GENERIC_OAUTH2.to_owned(), RegistryEntry::Generic);

		for preset in [SPOTIFY, FACEBOOK, GITHUB, GOOGLE] {
			entries.insert(preset.kind.to_owned(), RegistryEntry::Preset(preset));
		}

		Self { entries }
	}

	/// Registers (or replaces) a static preset.
	pub fn register_preset(mut self, preset: ProviderPreset) -> Self {
		self.entries.insert(preset.kind.to_owned(), RegistryEntry::Preset(preset));

		self
	}

	/// Registers (or replaces) a fully built descriptor under its own type name.
	pub fn register_descriptor(mut self, descriptor: ResourceOwnerDescriptor) -> Self {
		self.entries
			.insert(descriptor.kind.to_string(), RegistryEntry::Descriptor(Box::new(descriptor)));

		self
	}

	/// Returns `true` when `kind` is registered.
	pub fn contains(&self, kind: &str) -> bool {
		self.entries.contains_key(kind)
	}

	/// Registered type names, sorted.
	pub fn kinds(&self) -> Vec<&str> {
		let mut kinds = self.entries.keys().map(String::as_str).collect::<Vec<_>>();

		kinds.sort_unstable();

		kinds
	}

	/// Returns a builder seeded from the entry registered under `kind`.
	///
	/// The generic `oauth2` type yields a builder with both grants enabled and nothing else;
	/// callers must supply endpoints and paths.
	pub fn builder(&self, kind: &ProviderType) -> Result<ResourceOwnerDescriptorBuilder> {
		match self.entries.get(kind.as_ref()) {
			Some(RegistryEntry::Preset(preset)) => preset.to_builder(),
			Some(RegistryEntry::Descriptor(descriptor)) => Ok(descriptor.to_builder()),
			Some(RegistryEntry::Generic) => Ok(ResourceOwnerDescriptor::builder(kind.clone())
				.support_grant(GrantType::RefreshToken)),
			None => Err(ConfigError::UnknownProviderType { kind: kind.to_string() }.into()),
		}
	}

	/// Builds the unmodified descriptor registered under `kind`.
	pub fn descriptor(&self, kind: &ProviderType) -> Result<ResourceOwnerDescriptor> {
		self.builder(kind)?.build().map_err(|err| ConfigError::from(err).into())
	}
}
impl Default for ProviderRegistry {
	fn default() -> Self {
		Self::new()
	}
}

fn parse_url(raw: &str) -> Result<Url> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidDescriptor { source }.into())
}
