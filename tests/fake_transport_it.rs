//! Exercises the transport seam with a scripted [`UserApiClient`] implementation, proving the
//! resolver works against custom HTTP stacks and preserves stage ordering and error kinds.

// std
use std::{
	future::Future,
	io,
	sync::{Arc, Mutex},
};
// self
use oauth2_userinfo::{
	auth::{ProviderId, TokenInfo},
	error::{Error, TransportError},
	http::{RawResponse, UserApiClient},
	provider::{Bitbucket, ProviderDescriptor},
	resolver::Resolver,
	url::Url,
};

const PROFILE_BODY: &str = r#"{"username": "tutorials", "display_name": "tutorials account"}"#;
const EMAILS_BODY: &str =
	r#"{"values": [{"email": "tutorials@bitbucket.com", "is_confirmed": true, "is_primary": true}]}"#;

#[derive(Clone, Copy, Debug)]
enum ScriptedFailure {
	Cancelled,
	TimedOut,
}

#[derive(Clone, Default)]
struct ScriptedClient {
	paths: Arc<Mutex<Vec<String>>>,
	profile_failure: Option<ScriptedFailure>,
}
impl ScriptedClient {
	fn failing_profile(failure: ScriptedFailure) -> Self {
		Self { paths: Arc::default(), profile_failure: Some(failure) }
	}

	fn recorded_paths(&self) -> Vec<String> {
		self.paths.lock().expect("Path log lock should not be poisoned.").clone()
	}
}
impl UserApiClient for ScriptedClient {
	fn get(
		&self,
		url: Url,
		token: &TokenInfo,
	) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
		let paths = self.paths.clone();
		let profile_failure = self.profile_failure;
		let token = token.access_token().expose().to_owned();

		async move {
			assert_eq!(token, "secret", "The bearer token must reach the transport unchanged.");

			paths
				.lock()
				.expect("Path log lock should not be poisoned.")
				.push(url.path().to_owned());

			let json = |body: &str| RawResponse {
				status: 200,
				content_type: Some("application/json".into()),
				body: body.as_bytes().to_vec(),
			};

			match url.path() {
				"/user" => match profile_failure {
					Some(ScriptedFailure::Cancelled) => Err(TransportError::Cancelled),
					Some(ScriptedFailure::TimedOut) => Err(TransportError::timed_out(
						io::Error::new(io::ErrorKind::TimedOut, "deadline elapsed"),
					)),
					None => Ok(json(PROFILE_BODY)),
				},
				"/user/emails" => Ok(json(EMAILS_BODY)),
				other => panic!("Unexpected request path: {other}."),
			}
		}
	}
}

fn build_descriptor() -> ProviderDescriptor {
	let id = ProviderId::new("scripted-bitbucket")
		.expect("Provider identifier should be valid for fake transport tests.");
	let base = Url::parse("https://provider.invalid/")
		.expect("Fake provider base URL should parse successfully.");

	ProviderDescriptor::builder(id)
		.profile_endpoint(base.clone())
		.emails_endpoint(base)
		.build()
		.expect("Provider descriptor should build successfully.")
}

#[tokio::test]
async fn stages_run_strictly_in_order() {
	let client = ScriptedClient::default();
	let resolver = Resolver::with_http_client(build_descriptor(), Bitbucket, client.clone());
	let (identity, _) = resolver
		.resolve_identity(&TokenInfo::bearer("secret"))
		.await
		.expect("Scripted resolution should succeed.");

	assert_eq!(identity.email, "tutorials@bitbucket.com");
	assert_eq!(client.recorded_paths(), ["/user", "/user/emails"]);
}

#[tokio::test]
async fn cancelled_profile_call_short_circuits_with_its_own_kind() {
	let client = ScriptedClient::failing_profile(ScriptedFailure::Cancelled);
	let resolver = Resolver::with_http_client(build_descriptor(), Bitbucket, client.clone());
	let err = resolver
		.resolve_identity(&TokenInfo::bearer("secret"))
		.await
		.expect_err("Cancelled transport must abort the resolution.");

	assert!(matches!(err, Error::Transport(TransportError::Cancelled)));
	// The emails endpoint was never contacted.
	assert_eq!(client.recorded_paths(), ["/user"]);
}

#[tokio::test]
async fn deadline_expiry_is_distinct_from_generic_network_failure() {
	let client = ScriptedClient::failing_profile(ScriptedFailure::TimedOut);
	let resolver = Resolver::with_http_client(build_descriptor(), Bitbucket, client);
	let err = resolver
		.resolve_identity(&TokenInfo::bearer("secret"))
		.await
		.expect_err("Deadline expiry must abort the resolution.");

	assert!(matches!(err, Error::Transport(TransportError::TimedOut { .. })));
}
