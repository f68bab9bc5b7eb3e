//! Canonical identity data model produced by the resolver.
//!
//! All types here are provider-agnostic: adapters map whatever field names their upstream uses
//! onto these shapes, and the resolver combines them into a [`ResolvedIdentity`].

// self
use crate::_prelude::*;

/// Canonical profile mapped from a provider's profile endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
	/// Stable unique subject identifier.
	pub subject: String,
	/// Human-readable display name.
	pub display_name: String,
	/// Provider-specific fields outside the canonical contract.
	#[serde(default)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Single email record as reported by a provider's emails endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
	/// Email address.
	pub address: String,
	/// Whether the provider verified ownership of the address.
	pub confirmed: bool,
	/// Whether the provider designates the address as the user's main contact.
	pub primary: bool,
}

/// Ordered email records, insertion order matching the remote response.
///
/// Order carries no meaning beyond acting as the tie-break for the selection rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCollection(Vec<EmailRecord>);
impl EmailCollection {
	/// Collects records preserving their order.
	pub fn new(records: impl IntoIterator<Item = EmailRecord>) -> Self {
		Self(records.into_iter().collect())
	}

	/// Returns the records in response order.
	pub fn records(&self) -> &[EmailRecord] {
		&self.0
	}

	/// Whether the provider reported no email records at all.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Number of records reported by the provider.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Selection rule: the first record that is both confirmed and primary wins.
	///
	/// Returns [`None`] when no record qualifies. Records that are primary-but-unconfirmed or
	/// confirmed-but-non-primary are never selected. When a malformed upstream flags several
	/// confirmed-primary records, response order decides deterministically.
	pub fn primary_address(&self) -> Option<&str> {
		self.0
			.iter()
			.find(|record| record.confirmed && record.primary)
			.map(|record| record.address.as_str())
	}
}
impl FromIterator<EmailRecord> for EmailCollection {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = EmailRecord>,
	{
		Self::new(iter)
	}
}

/// Resolver output combining the canonical profile with the selected email.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
	/// Stable unique subject identifier.
	pub subject: String,
	/// Human-readable display name.
	pub display_name: String,
	/// Confirmed primary email address; empty when the provider reported none.
	pub email: String,
}

/// Verbatim profile endpoint response body, returned for caller-side auditing.
///
/// The resolver never parses this beyond the typed decode; the bytes are exactly what the
/// remote sent.
#[derive(Clone, PartialEq, Eq)]
pub struct RawProfile(Vec<u8>);
impl RawProfile {
	/// Wraps the captured response body.
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Self(bytes.into())
	}

	/// Returns the body bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Consumes the wrapper, returning the body bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}

	/// Returns the body as UTF-8, replacing invalid sequences.
	pub fn to_string_lossy(&self) -> std::borrow::Cow<'_, str> {
		String::from_utf8_lossy(&self.0)
	}
}
impl AsRef<[u8]> for RawProfile {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}
impl Debug for RawProfile {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "RawProfile({} bytes)", self.0.len())
	}
}
