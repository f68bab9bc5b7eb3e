//! Bitbucket Cloud provider adapter.
//!
//! Bitbucket's `/user` response carries no email address, so resolution also queries
//! `/user/emails` and selects the confirmed primary record from the returned page.

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	error::DecodeError,
	identity::{EmailCollection, EmailRecord, Profile},
	provider::{EndpointOverrides, ProviderAdapter, ProviderDescriptor, ProviderDescriptorError},
};

/// Base URL of the public Bitbucket Cloud 2.0 API.
pub const BITBUCKET_API_BASE: &str = "https://api.bitbucket.org/2.0";

/// Bitbucket Cloud adapter for the generic resolver.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bitbucket;
impl Bitbucket {
	/// Descriptor rooted at the public Bitbucket Cloud API for both endpoints.
	pub fn descriptor() -> ProviderDescriptor {
		let base =
			Url::parse(BITBUCKET_API_BASE).expect("Bitbucket API base URL is statically valid.");
		let id =
			ProviderId::new("bitbucket").expect("Bitbucket provider identifier is statically valid.");

		ProviderDescriptor::builder(id)
			.profile_endpoint(base.clone())
			.emails_endpoint(base)
			.build()
			.expect("Bitbucket descriptor is statically valid.")
	}

	/// Descriptor with endpoint overrides applied from the process environment.
	pub fn descriptor_from_env() -> Result<ProviderDescriptor, ProviderDescriptorError> {
		Self::descriptor().with_overrides(EndpointOverrides::from_env()?)
	}
}
impl ProviderAdapter for Bitbucket {
	type EmailsWire = BitbucketEmailPage;
	type ProfileWire = BitbucketAccount;

	fn profile_path(&self) -> &'static str {
		"user"
	}

	fn emails_path(&self) -> &'static str {
		"user/emails"
	}

	fn canonical_profile(&self, wire: Self::ProfileWire) -> Result<Profile, DecodeError> {
		if wire.username.is_empty() {
			return Err(DecodeError::MissingField { field: "username" });
		}

		let display_name = wire
			.display_name
			.filter(|name| !name.is_empty())
			.unwrap_or_else(|| wire.username.clone());

		Ok(Profile { subject: wire.username, display_name, extra: wire.extra })
	}

	fn canonical_emails(&self, wire: Self::EmailsWire) -> EmailCollection {
		wire.values
			.into_iter()
			.map(|record| EmailRecord {
				address: record.email,
				confirmed: record.is_confirmed,
				primary: record.is_primary,
			})
			.collect()
	}
}

/// Wire shape of the Bitbucket `/user` response.
#[derive(Clone, Debug, Deserialize)]
pub struct BitbucketAccount {
	/// Account username; becomes the canonical subject identifier.
	pub username: String,
	/// Human-readable display name.
	#[serde(default)]
	pub display_name: Option<String>,
	/// Remaining provider-specific fields (`uuid`, `links`, and friends).
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Wire shape of one Bitbucket `/user/emails` page.
///
/// Page metadata (`page`, `pagelen`, `size`) is intentionally not modeled; only the record
/// values matter to resolution.
#[derive(Clone, Debug, Deserialize)]
pub struct BitbucketEmailPage {
	/// Email records in response order.
	#[serde(default)]
	pub values: Vec<BitbucketEmail>,
}

/// Single email entry within a Bitbucket emails page.
#[derive(Clone, Debug, Deserialize)]
pub struct BitbucketEmail {
	/// Email address.
	pub email: String,
	/// Whether Bitbucket verified ownership of the address.
	#[serde(default)]
	pub is_confirmed: bool,
	/// Whether Bitbucket designates the address as primary.
	#[serde(default)]
	pub is_primary: bool,
}
