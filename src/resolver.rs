//! Identity resolution pipeline built on the generic fetcher.

// std
#[cfg(feature = "reqwest")] use std::time::Duration;
// self
use crate::{
	_prelude::*,
	auth::TokenInfo,
	http::{UserApiClient, fetch_json},
	identity::{EmailCollection, Profile, RawProfile, ResolvedIdentity},
	obs::{StageKind, StageOutcome, StageSpan, record_stage_outcome},
	provider::{ProviderAdapter, ProviderDescriptor},
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Resolver specialized for the crate's default reqwest transport.
pub type ReqwestResolver<P> = Resolver<ReqwestHttpClient, P>;

/// Resolves canonical identities against a single provider descriptor.
///
/// The resolver owns the HTTP client, descriptor, and adapter so the stage implementations can
/// focus on sequencing and mapping. Each call to
/// [`resolve_identity`](Self::resolve_identity) is independent and stateless; no session or
/// cache state survives between calls, so a single resolver is safe to share across concurrent
/// callers resolving different tokens.
pub struct Resolver<C, P>
where
	C: ?Sized + UserApiClient,
	P: ProviderAdapter,
{
	/// HTTP client used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Provider descriptor defining the endpoint bases.
	pub descriptor: ProviderDescriptor,
	/// Adapter mapping provider wire shapes onto the canonical model.
	pub adapter: P,
}
impl<C, P> Resolver<C, P>
where
	C: ?Sized + UserApiClient,
	P: ProviderAdapter,
{
	/// Creates a resolver that reuses a caller-provided transport.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		adapter: P,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { http_client: http_client.into(), descriptor, adapter }
	}

	/// Resolves the canonical identity for `token`.
	///
	/// Stages run strictly in sequence: the emails endpoint is consulted only after the profile
	/// stage succeeded, and an error in either stage aborts the whole resolution, so callers
	/// never observe a profile-only identity. On success the identity is returned together with
	/// the verbatim profile response bytes for caller-side auditing.
	pub async fn resolve_identity(
		&self,
		token: &TokenInfo,
	) -> Result<(ResolvedIdentity, RawProfile)> {
		let (profile, raw_profile) = self.fetch_profile(token).await?;
		let emails = self.fetch_emails(token).await?;
		let email = emails.primary_address().unwrap_or_default().to_owned();
		let identity = ResolvedIdentity {
			subject: profile.subject,
			display_name: profile.display_name,
			email,
		};

		Ok((identity, raw_profile))
	}

	/// Fetches and canonicalizes the provider profile.
	///
	/// Fetcher errors propagate unchanged so callers can distinguish transport, status,
	/// content-type, and decode failures.
	pub async fn fetch_profile(&self, token: &TokenInfo) -> Result<(Profile, RawProfile)> {
		let span = StageSpan::new(StageKind::Profile, &self.descriptor.id);

		record_stage_outcome(StageKind::Profile, StageOutcome::Attempt);

		let outcome = span.instrument(self.profile_stage(token)).await;

		record_stage_outcome(
			StageKind::Profile,
			if outcome.is_ok() { StageOutcome::Success } else { StageOutcome::Failure },
		);

		outcome
	}

	/// Fetches the ordered email records.
	///
	/// An empty collection is a valid, non-error outcome signaling "no email available";
	/// fetcher errors propagate unchanged.
	pub async fn fetch_emails(&self, token: &TokenInfo) -> Result<EmailCollection> {
		let span = StageSpan::new(StageKind::Emails, &self.descriptor.id);

		record_stage_outcome(StageKind::Emails, StageOutcome::Attempt);

		let outcome = span.instrument(self.emails_stage(token)).await;

		record_stage_outcome(
			StageKind::Emails,
			if outcome.is_ok() { StageOutcome::Success } else { StageOutcome::Failure },
		);

		outcome
	}

	async fn profile_stage(&self, token: &TokenInfo) -> Result<(Profile, RawProfile)> {
		let (wire, raw): (P::ProfileWire, _) = fetch_json(
			self.http_client.as_ref(),
			&self.descriptor.endpoints.profile,
			self.adapter.profile_path(),
			token,
			StageKind::Profile.as_str(),
		)
		.await?;
		let profile = self.adapter.canonical_profile(wire)?;

		Ok((profile, RawProfile::new(raw)))
	}

	async fn emails_stage(&self, token: &TokenInfo) -> Result<EmailCollection> {
		let (wire, _): (P::EmailsWire, _) = fetch_json(
			self.http_client.as_ref(),
			&self.descriptor.endpoints.emails,
			self.adapter.emails_path(),
			token,
			StageKind::Emails.as_str(),
		)
		.await?;

		Ok(self.adapter.canonical_emails(wire))
	}
}
#[cfg(feature = "reqwest")]
impl<P> Resolver<ReqwestHttpClient, P>
where
	P: ProviderAdapter,
{
	/// Creates a resolver with the crate's default reqwest transport.
	pub fn new(descriptor: ProviderDescriptor, adapter: P) -> Self {
		Self::with_http_client(descriptor, adapter, ReqwestHttpClient::default())
	}

	/// Creates a resolver whose transport applies `timeout` as the per-call deadline.
	pub fn with_timeout(
		descriptor: ProviderDescriptor,
		adapter: P,
		timeout: Duration,
	) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(descriptor, adapter, ReqwestHttpClient::with_timeout(timeout)?))
	}
}
impl<C, P> Clone for Resolver<C, P>
where
	C: ?Sized + UserApiClient,
	P: Clone + ProviderAdapter,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			descriptor: self.descriptor.clone(),
			adapter: self.adapter.clone(),
		}
	}
}
impl<C, P> Debug for Resolver<C, P>
where
	C: ?Sized + UserApiClient,
	P: ProviderAdapter,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Resolver").field("descriptor", &self.descriptor).finish()
	}
}
