//! Behavior hook implemented by each user-info provider.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	error::DecodeError,
	identity::{EmailCollection, Profile},
};

/// Capability set implemented by providers that expose a primary profile endpoint plus a
/// secondary emails endpoint.
///
/// Adapters declare the provider's wire shapes and map them onto the canonical identity model;
/// the generic [`Resolver`](crate::resolver::Resolver) supplies the shared fetch and
/// orchestration scaffolding, so new providers compose with it instead of reimplementing the
/// pipeline.
pub trait ProviderAdapter
where
	Self: 'static + Send + Sync,
{
	/// Wire shape returned by the provider's profile endpoint.
	type ProfileWire: DeserializeOwned + Send;
	/// Wire shape returned by the provider's emails endpoint.
	type EmailsWire: DeserializeOwned + Send;

	/// Path of the profile endpoint relative to the configured base.
	fn profile_path(&self) -> &'static str;

	/// Path of the emails endpoint relative to the configured base.
	fn emails_path(&self) -> &'static str;

	/// Maps the decoded profile wire shape onto the canonical [`Profile`].
	///
	/// A required field that parsed but is unusable (an empty subject, say) is a
	/// [`DecodeError`], not a silent default.
	fn canonical_profile(&self, wire: Self::ProfileWire) -> Result<Profile, DecodeError>;

	/// Maps the decoded emails wire shape onto an ordered [`EmailCollection`].
	///
	/// An empty collection is a valid outcome meaning "no email available", never an error.
	fn canonical_emails(&self, wire: Self::EmailsWire) -> EmailCollection;
}
