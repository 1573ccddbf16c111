//! Name → resource owner lookup shared by the login routes.

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	owner::ResourceOwner,
};

/// Configured resource owners keyed by name.
pub struct ResourceOwnerMap<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	owners: BTreeMap<ProviderId, Arc<ResourceOwner<C, M>>>,
}
impl<C, M> ResourceOwnerMap<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Empty map.
	pub fn new() -> Self {
		Self { owners: BTreeMap::new() }
	}

	/// Adds `owner` under its own name, returning the owner it replaced.
	pub fn insert(&mut self, owner: ResourceOwner<C, M>) -> Option<Arc<ResourceOwner<C, M>>> {
		self.owners.insert(owner.name.clone(), Arc::new(owner))
	}

	/// Looks up an owner by name.
	pub fn get(&self, name: &str) -> Option<Arc<ResourceOwner<C, M>>> {
		self.owners.get(name).cloned()
	}

	/// Returns `true` when an owner named `name` is configured.
	pub fn contains(&self, name: &str) -> bool {
		self.owners.contains_key(name)
	}

	/// Configured names in sorted order.
	pub fn names(&self) -> impl Iterator<Item = &ProviderId> {
		self.owners.keys()
	}

	/// Iterates over the configured owners in name order.
	pub fn iter(&self) -> impl Iterator<Item = &Arc<ResourceOwner<C, M>>> {
		self.owners.values()
	}

	/// Number of configured owners.
	pub fn len(&self) -> usize {
		self.owners.len()
	}

	/// Returns `true` when no owner is configured.
	pub fn is_empty(&self) -> bool {
		self.owners.is_empty()
	}
}
impl<C, M> Default for ResourceOwnerMap<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn default() -> Self {
		Self::new()
	}
}
impl<C, M> Clone for ResourceOwnerMap<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self { owners: self.owners.clone() }
	}
}
impl<C, M> Debug for ResourceOwnerMap<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_list().entries(self.owners.values()).finish()
	}
}
