//! Transport primitives for authenticated user API fetches.
//!
//! [`UserApiClient`] is the crate's only coupling to an HTTP stack: implementations perform an
//! authenticated GET and hand back a [`RawResponse`] whenever the exchange completed at the
//! HTTP level, reserving [`TransportError`] for failures below that (DNS, TCP, TLS, deadline
//! expiry, cancellation). [`fetch_json`] layers the fixed validation order on top of whatever
//! transport the caller plugs in: transport, then HTTP status, then declared content type, then
//! decode. Tests can force a failure at exactly one layer and observe the matching error kind.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
#[cfg(feature = "reqwest")] use std::time::Duration;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenInfo,
	error::{ConfigError, DecodeError, TransportError},
};

/// Raw response handed back by a transport once the HTTP exchange completed.
#[derive(Clone, Debug, Default)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Declared `Content-Type` header value, when present.
	pub content_type: Option<String>,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Whether the status code is in the 2xx success range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP transports capable of authenticated GETs against a user API.
///
/// Implementations must be `Send + Sync + 'static` so resolvers can share them behind `Arc`
/// across concurrent callers, and the returned future must be `Send`. A transport makes exactly
/// one attempt per call: no retries, no caching. Timeouts are the transport's responsibility
/// and must surface as [`TransportError::TimedOut`] rather than a hang; transports that can
/// observe cancellation should raise [`TransportError::Cancelled`] instead of a generic
/// network failure.
pub trait UserApiClient
where
	Self: 'static + Send + Sync,
{
	/// Performs an authenticated GET against `url`, carrying the bearer token.
	fn get(
		&self,
		url: Url,
		token: &TokenInfo,
	) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The token travels as an `Authorization: Bearer` header. Configure per-call deadlines through
/// [`with_timeout`](Self::with_timeout); expiry surfaces as [`TransportError::TimedOut`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client applying `timeout` as the per-call deadline.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl UserApiClient for ReqwestHttpClient {
	fn get(
		&self,
		url: Url,
		token: &TokenInfo,
	) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
		let request = self.0.get(url).bearer_auth(token.access_token().expose());

		async move {
			let response = request.send().await?;
			let status = response.status().as_u16();
			let content_type = response
				.headers()
				.get(reqwest::header::CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);
			let body = response.bytes().await?.to_vec();

			Ok(RawResponse { status, content_type, body })
		}
	}
}

/// Fetches `path` under `base` and decodes the JSON body into `T`.
///
/// Input constraints: `base` must be a URL that can carry path segments and the access token
/// must be non-empty (an empty token is a caller error, not a network error). Checks run in a
/// fixed order: transport, then HTTP status, then declared content type, then decode. The
/// content type is inspected before decode even when the body would parse, because an upstream
/// can return an error page with status 200. On success the typed value is returned together
/// with the verbatim body bytes.
pub async fn fetch_json<T, C>(
	client: &C,
	base: &Url,
	path: &str,
	token: &TokenInfo,
	endpoint: &'static str,
) -> Result<(T, Vec<u8>)>
where
	T: DeserializeOwned,
	C: ?Sized + UserApiClient,
{
	if token.access_token().expose().is_empty() {
		return Err(ConfigError::EmptyAccessToken.into());
	}

	let url = join_endpoint(base, path)?;
	let response = client.get(url, token).await?;

	if !response.is_success() {
		return Err(Error::remote_status(endpoint, response.status, &response.body));
	}

	let content_type = response.content_type.unwrap_or_default();

	if !is_json_media_type(&content_type) {
		return Err(Error::UnexpectedContentType { endpoint, content_type });
	}

	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
	let value = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Json { endpoint, source })?;

	Ok((value, response.body))
}

/// Appends `path` segments to `base`, preserving any path prefix the base carries.
fn join_endpoint(base: &Url, path: &str) -> Result<Url, ConfigError> {
	let mut url = base.clone();

	{
		let mut segments = url
			.path_segments_mut()
			.map_err(|()| ConfigError::EndpointNotABase { url: base.to_string() })?;

		segments.pop_if_empty();

		for segment in path.split('/').filter(|segment| !segment.is_empty()) {
			segments.push(segment);
		}
	}

	Ok(url)
}

/// Whether a declared content type is a JSON media type.
///
/// Accepts `application/json` and any `+json` structured syntax suffix; parameters such as
/// `charset` are ignored and matching is case-insensitive.
fn is_json_media_type(content_type: &str) -> bool {
	let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

	essence == "application/json" || essence.ends_with("+json")
}
