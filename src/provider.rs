//! Resource-owner descriptors (data), the preset registry, and strategies (behavior).
//!
//! `descriptor` exposes validated metadata ([`ResourceOwnerDescriptor`]) covering HTTPS-only
//! endpoints, supported grants, client authentication preferences, the default scope and field
//! paths, and provider options (PKCE, bearer authorization, extra authorize parameters).
//! `registry` maps provider type names to preset descriptors. `strategy` defines
//! [`ProviderStrategy`], an HTTP-client-agnostic hook used to augment outgoing token requests
//! and map provider failures into the crate error taxonomy.

pub mod descriptor;
pub mod registry;
pub mod strategy;

pub use descriptor::*;
pub use registry::*;
pub use strategy::*;
