//! Provider-facing descriptors (data) and adapters (behavior).
//!
//! `descriptor` exposes validated endpoint metadata ([`ProviderDescriptor`]) covering the
//! profile and emails base URLs plus explicit override configuration. `adapter` defines
//! [`ProviderAdapter`], the hook each provider implements to declare its wire shapes and map
//! them onto the canonical identity model. `bitbucket` ships the Bitbucket Cloud adapter.

pub mod adapter;
pub mod bitbucket;
pub mod descriptor;

pub use adapter::*;
pub use bitbucket::*;
pub use descriptor::*;
