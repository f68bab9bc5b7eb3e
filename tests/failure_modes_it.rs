//! Failure injection across both endpoints.
//!
//! Each endpoint is driven through the same table of failure modes: a non-JSON content type, a
//! non-success status, an unparsable (empty) body, and a transport-level connection failure.
//! Earlier pipeline stages always succeed so every case observes exactly one error kind.

// std
use std::net::TcpListener;
// crates.io
use httpmock::{Mock, prelude::*};
// self
use oauth2_userinfo::{
	auth::{ProviderId, TokenInfo},
	error::{ConfigError, DecodeError, Error, TransportError},
	provider::{Bitbucket, ProviderDescriptor},
	resolver::{ReqwestResolver, Resolver},
	url::Url,
};

const PROFILE_BODY: &str = r#"{"username": "tutorials", "display_name": "tutorials account"}"#;
const EMAILS_BODY: &str =
	r#"{"values": [{"email": "tutorials@bitbucket.com", "is_confirmed": true, "is_primary": true}]}"#;

#[derive(Clone, Copy, Debug)]
enum FailureMode {
	WrongContentType,
	ConflictStatus,
	EmptyBody,
	ConnectionRefused,
}

const FAILURE_MODES: [FailureMode; 4] = [
	FailureMode::WrongContentType,
	FailureMode::ConflictStatus,
	FailureMode::EmptyBody,
	FailureMode::ConnectionRefused,
];

fn build_descriptor(profile_base: Url, emails_base: Url) -> ProviderDescriptor {
	let id = ProviderId::new("mock-bitbucket")
		.expect("Provider identifier should be valid for failure tests.");

	ProviderDescriptor::builder(id)
		.profile_endpoint(profile_base)
		.emails_endpoint(emails_base)
		.build()
		.expect("Provider descriptor should build successfully.")
}

fn server_base(server: &MockServer) -> Url {
	Url::parse(&server.base_url()).expect("Mock server base URL should parse successfully.")
}

/// Base URL whose port was bound once and released, so connections are refused.
fn refused_base() -> Url {
	let listener =
		TcpListener::bind("127.0.0.1:0").expect("Binding an ephemeral port should succeed.");
	let port = listener
		.local_addr()
		.expect("Ephemeral listener should expose a local address.")
		.port();

	drop(listener);

	Url::parse(&format!("http://127.0.0.1:{port}/"))
		.expect("Refused base URL should parse successfully.")
}

async fn mount_failure(server: &MockServer, path: &'static str, mode: FailureMode) {
	server
		.mock_async(move |when, then| {
			when.method(GET).path(path);

			match mode {
				FailureMode::WrongContentType => {
					then.status(200)
						.header("content-type", "text/html; charset=utf-8")
						.body("<html>surprise</html>");
				},
				FailureMode::ConflictStatus => {
					then.status(409)
						.header("content-type", "application/json; charset=utf-8")
						.body(r#"{"error": "conflict"}"#);
				},
				FailureMode::EmptyBody => {
					then.status(200)
						.header("content-type", "application/json; charset=utf-8")
						.body("");
				},
				FailureMode::ConnectionRefused => {
					unreachable!("Connection failures are injected via a closed port, not a mock.")
				},
			}
		})
		.await;
}

async fn mount_success<'a>(
	server: &'a MockServer,
	path: &'static str,
	body: &'static str,
) -> Mock<'a> {
	server
		.mock_async(move |when, then| {
			when.method(GET).path(path);
			then.status(200).header("content-type", "application/json; charset=utf-8").body(body);
		})
		.await
}

fn assert_expected_kind(mode: FailureMode, err: Error) {
	match (mode, err) {
		(FailureMode::WrongContentType, Error::UnexpectedContentType { content_type, .. }) => {
			assert!(content_type.starts_with("text/html"));
		},
		(FailureMode::ConflictStatus, Error::RemoteStatus { status, body, .. }) => {
			assert_eq!(status, 409);
			assert!(body.contains("conflict"));
		},
		(FailureMode::EmptyBody, Error::Decode(DecodeError::Json { .. })) => {},
		(FailureMode::ConnectionRefused, Error::Transport(TransportError::Network { .. })) => {},
		(mode, other) => panic!("Unexpected error kind for {mode:?}: {other:?}."),
	}
}

#[tokio::test]
async fn profile_failures_abort_before_the_emails_stage() {
	for mode in FAILURE_MODES {
		let server = MockServer::start_async().await;
		let emails_mock = mount_success(&server, "/user/emails", EMAILS_BODY).await;
		let profile_base = match mode {
			FailureMode::ConnectionRefused => refused_base(),
			_ => {
				mount_failure(&server, "/user", mode).await;

				server_base(&server)
			},
		};
		let descriptor = build_descriptor(profile_base, server_base(&server));
		let resolver: ReqwestResolver<Bitbucket> = Resolver::new(descriptor, Bitbucket);
		let err = resolver
			.resolve_identity(&TokenInfo::bearer("secret"))
			.await
			.expect_err("Profile failure must abort the resolution.");

		assert_expected_kind(mode, err);

		// Short-circuit: the emails endpoint is never consulted after a profile failure.
		emails_mock.assert_calls_async(0).await;
	}
}

#[tokio::test]
async fn email_failures_never_yield_a_partial_identity() {
	for mode in FAILURE_MODES {
		let server = MockServer::start_async().await;
		let profile_mock = mount_success(&server, "/user", PROFILE_BODY).await;
		let emails_base = match mode {
			FailureMode::ConnectionRefused => refused_base(),
			_ => {
				mount_failure(&server, "/user/emails", mode).await;

				server_base(&server)
			},
		};
		let descriptor = build_descriptor(server_base(&server), emails_base);
		let resolver: ReqwestResolver<Bitbucket> = Resolver::new(descriptor, Bitbucket);
		let err = resolver
			.resolve_identity(&TokenInfo::bearer("secret"))
			.await
			.expect_err("Email failure must abort the resolution despite a valid profile.");

		assert_expected_kind(mode, err);

		profile_mock.assert_calls_async(1).await;
	}
}

#[tokio::test]
async fn direct_email_stage_failure_reports_the_remote_status() {
	let server = MockServer::start_async().await;

	mount_failure(&server, "/user/emails", FailureMode::ConflictStatus).await;

	let descriptor = build_descriptor(server_base(&server), server_base(&server));
	let resolver: ReqwestResolver<Bitbucket> = Resolver::new(descriptor, Bitbucket);
	let err = resolver
		.fetch_emails(&TokenInfo::bearer("secret"))
		.await
		.expect_err("Conflict status must surface as RemoteStatus.");

	assert!(matches!(err, Error::RemoteStatus { endpoint: "emails", status: 409, .. }));
}

#[tokio::test]
async fn empty_token_is_a_caller_error_before_any_network_call() {
	let server = MockServer::start_async().await;
	let profile_mock = mount_success(&server, "/user", PROFILE_BODY).await;
	let descriptor = build_descriptor(server_base(&server), server_base(&server));
	let resolver: ReqwestResolver<Bitbucket> = Resolver::new(descriptor, Bitbucket);
	let err = resolver
		.resolve_identity(&TokenInfo::bearer(""))
		.await
		.expect_err("An empty access token must be rejected locally.");

	assert!(matches!(err, Error::Config(ConfigError::EmptyAccessToken)));

	profile_mock.assert_calls_async(0).await;
}
