//! Caller-supplied bearer credentials with log-safe wrappers.

// self
use crate::_prelude::*;

/// Redacted access token wrapper keeping bearer material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenSecret(String);
impl AccessTokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for AccessTokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AccessTokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessTokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for AccessTokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Bearer credentials for outbound user API calls.
///
/// Immutable and supplied by the caller per resolution; the resolver never refreshes, persists,
/// or mutates it. The token is assumed to have been obtained upstream (authorization-code
/// exchange is out of scope here).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
	access_token: AccessTokenSecret,
	token_type: Option<String>,
	scope: Option<String>,
}
impl TokenInfo {
	/// Creates token info for a bearer access token.
	pub fn bearer(access_token: impl Into<String>) -> Self {
		Self { access_token: AccessTokenSecret::new(access_token), token_type: None, scope: None }
	}

	/// Attaches the token type reported by the provider.
	pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = Some(token_type.into());

		self
	}

	/// Attaches the granted scope string.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Returns the wrapped access token.
	pub fn access_token(&self) -> &AccessTokenSecret {
		&self.access_token
	}

	/// Returns the token type, when the caller supplied one.
	pub fn token_type(&self) -> Option<&str> {
		self.token_type.as_deref()
	}

	/// Returns the granted scope, when the caller supplied one.
	pub fn scope(&self) -> Option<&str> {
		self.scope.as_deref()
	}
}
