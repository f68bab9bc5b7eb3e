//! Provider descriptor data structures and endpoint configuration.

// std
use std::env;
// self
use crate::{_prelude::*, auth::ProviderId};

/// Environment variable overriding the profile endpoint base URL.
pub const PROFILE_URL_ENV: &str = "OAUTH2_USERINFO_PROFILE_URL";
/// Environment variable overriding the emails endpoint base URL.
pub const EMAILS_URL_ENV: &str = "OAUTH2_USERINFO_EMAILS_URL";

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Profile endpoint base is required.
	#[error("Missing profile endpoint base URL.")]
	MissingProfileEndpoint,
	/// Emails endpoint base is required.
	#[error("Missing emails endpoint base URL.")]
	MissingEmailsEndpoint,
	/// Non-loopback endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// An override variable held an unparsable URL.
	#[error("The `{var}` override is not a valid URL.")]
	InvalidOverride {
		/// Environment variable name.
		var: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Endpoint base URLs declared by a provider descriptor.
///
/// The two bases are independent so each endpoint can be redirected separately, for instance
/// at a local stub server during tests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Base URL for the user profile endpoint.
	pub profile: Url,
	/// Base URL for the user emails endpoint.
	pub emails: Url,
}

/// Immutable provider descriptor consumed by resolvers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Applies endpoint overrides, revalidating the result.
	pub fn with_overrides(
		mut self,
		overrides: EndpointOverrides,
	) -> Result<Self, ProviderDescriptorError> {
		if let Some(url) = overrides.profile {
			self.endpoints.profile = url;
		}
		if let Some(url) = overrides.emails {
			self.endpoints.emails = url;
		}

		self.validate()?;

		Ok(self)
	}

	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("profile", &self.endpoints.profile)?;
		validate_endpoint("emails", &self.endpoints.emails)?;

		Ok(())
	}
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Optional profile endpoint base.
	pub profile_endpoint: Option<Url>,
	/// Optional emails endpoint base.
	pub emails_endpoint: Option<Url>,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self { id, profile_endpoint: None, emails_endpoint: None }
	}

	/// Sets the profile endpoint base.
	pub fn profile_endpoint(mut self, url: Url) -> Self {
		self.profile_endpoint = Some(url);

		self
	}

	/// Sets the emails endpoint base.
	pub fn emails_endpoint(mut self, url: Url) -> Self {
		self.emails_endpoint = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let profile =
			self.profile_endpoint.ok_or(ProviderDescriptorError::MissingProfileEndpoint)?;
		let emails = self.emails_endpoint.ok_or(ProviderDescriptorError::MissingEmailsEndpoint)?;
		let descriptor = ProviderDescriptor {
			id: self.id,
			endpoints: ProviderEndpoints { profile, emails },
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

/// Optional endpoint overrides sourced from explicit configuration.
///
/// Modeled as a value passed into descriptor construction instead of mutable process globals,
/// so concurrent resolvers and parallel tests never interfere with each other.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointOverrides {
	/// Replacement profile endpoint base, when set.
	pub profile: Option<Url>,
	/// Replacement emails endpoint base, when set.
	pub emails: Option<Url>,
}
impl EndpointOverrides {
	/// Reads overrides from the process environment.
	pub fn from_env() -> Result<Self, ProviderDescriptorError> {
		Self::from_vars(|var| env::var(var).ok())
	}

	/// Reads overrides through a caller-provided variable lookup.
	pub fn from_vars<F>(lookup: F) -> Result<Self, ProviderDescriptorError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let parse = |var: &'static str| -> Result<Option<Url>, ProviderDescriptorError> {
			lookup(var)
				.map(|raw| {
					Url::parse(&raw)
						.map_err(|source| ProviderDescriptorError::InvalidOverride { var, source })
				})
				.transpose()
		};

		Ok(Self { profile: parse(PROFILE_URL_ENV)?, emails: parse(EMAILS_URL_ENV)? })
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() == "https" || is_loopback_host(url) {
		Ok(())
	} else {
		Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

// Stub servers in tests listen on plain-HTTP loopback addresses; everything else must be HTTPS.
fn is_loopback_host(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
		Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		None => false,
	}
}
