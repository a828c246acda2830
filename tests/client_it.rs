// std
use std::time::Duration as StdDuration;
// crates.io
use httpmock::{Mock, prelude::*};
// self
use keycloak_provider::{
	_preludet::*,
	auth::Credentials,
	client::{KeycloakClient, KeycloakVersion},
	error::ConfigError,
	resources::RealmRepresentation,
};

async fn mock_login<'a>(server: &'a MockServer, access: &str, refresh: Option<&str>) -> Mock<'a> {
	let body = token_body(access, refresh);

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(token_path())
				.header("content-type", "application/x-www-form-urlencoded")
				.form_urlencoded_tuple("grant_type", "client_credentials")
				.form_urlencoded_tuple("client_id", TEST_CLIENT_ID)
				.form_urlencoded_tuple("client_secret", TEST_CLIENT_SECRET);
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

#[tokio::test]
async fn first_request_logs_in_and_sends_bearer() {
	let server = MockServer::start_async().await;
	let login = mock_login(&server, "access-1", None).await;
	let realm = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/admin/realms/test")
				.header("authorization", "Bearer access-1")
				.header("accept", "application/json");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"realm\":\"test\",\"enabled\":true,\"unknownField\":1}");
		})
		.await;
	let client = test_client(&server.base_url()).await;

	assert!(!client.is_logged_in());

	let fetched = client.get_realm("test").await.expect("Realm should be fetched.");

	assert_eq!(fetched.realm, "test");
	assert_eq!(fetched.enabled, Some(true));
	assert!(client.is_logged_in());

	client.get_realm("test").await.expect("Second read should reuse the token.");

	login.assert_calls_async(1).await;
	realm.assert_calls_async(2).await;
}

#[tokio::test]
async fn rejected_token_is_refreshed_and_request_retried_once() {
	let server = MockServer::start_async().await;
	let login = mock_login(&server, "access-1", Some("refresh-1")).await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(token_path())
				.form_urlencoded_tuple("grant_type", "refresh_token")
				.form_urlencoded_tuple("refresh_token", "refresh-1");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("access-2", Some("refresh-2")));
		})
		.await;
	let stale = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/realms/test").header("authorization", "Bearer access-1");
			then.status(401);
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/realms/test").header("authorization", "Bearer access-2");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"realm\":\"test\"}");
		})
		.await;
	let client = test_client(&server.base_url()).await;

	client.get_realm("test").await.expect("Retried request should succeed.");

	login.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;
	stale.assert_calls_async(1).await;
	fresh.assert_calls_async(1).await;
}

#[tokio::test]
async fn persistent_forbidden_is_reported_after_one_retry() {
	let server = MockServer::start_async().await;
	let login = mock_login(&server, "access-1", None).await;
	let forbidden = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/realms/test");
			then.status(403).body("{\"error\":\"unknown_error\"}");
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let err = client.get_realm("test").await.expect_err("Forbidden should surface.");

	assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
	// One initial login plus one re-login for the retry.
	login.assert_calls_async(2).await;
	forbidden.assert_calls_async(2).await;
}

#[tokio::test]
async fn missing_entities_map_to_not_found() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server, "access-1", None).await;
	let missing = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/realms/gone");
			then.status(404).body("{\"error\":\"Realm not found.\"}");
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let err = client.get_realm("gone").await.expect_err("Missing realm should fail.");

	assert!(err.is_not_found());
	assert!(err.to_string().contains("Realm not found."));
	assert_eq!(client.find_realm("gone").await.expect("Lookup should succeed."), None);

	missing.assert_calls_async(2).await;
}

#[tokio::test]
async fn flaky_deletes_are_attempted_twice() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server, "access-1", None).await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/admin/realms/test");
			then.status(500);
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let err = client.delete_realm("test").await.expect_err("Both attempts fail.");

	assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));

	delete.assert_calls_async(2).await;
}

#[tokio::test]
async fn initial_login_reads_server_version() {
	let server = MockServer::start_async().await;
	let login = mock_login(&server, "access-1", None).await;
	let info = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/serverinfo");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"systemInfo\":{\"version\":\"24.0.5\"}}");
		})
		.await;
	let config = test_config_builder(&server.base_url())
		.initial_login(true)
		.build()
		.expect("Config should build.");
	let client = KeycloakClient::new(config).await.expect("Client should log in.");

	assert!(client.is_logged_in());
	assert!(
		client
			.version_is_at_least(KeycloakVersion::new(24, 0, 0))
			.await
			.expect("Version should be cached.")
	);
	assert!(
		!client
			.version_is_at_least(KeycloakVersion::new(25, 0, 0))
			.await
			.expect("Version should be cached.")
	);

	login.assert_calls_async(1).await;
	info.assert_calls_async(1).await;
}

#[tokio::test]
async fn new_realm_is_created_without_location() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server, "access-1", None).await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/admin/realms")
				.header("content-type", "application/json")
				.json_body_includes("{\"realm\":\"test\"}");
			then.status(201);
		})
		.await;
	let client = test_client(&server.base_url()).await;

	client
		.create_realm(&RealmRepresentation::new("test"))
		.await
		.expect("Realm should be created.");

	create.assert_async().await;
}

async fn mock_short_lived_login(server: &MockServer) -> Mock<'_> {
	let body = serde_json::json!({
		"access_token": "access-1",
		"token_type": "Bearer",
		"expires_in": 1,
		"refresh_token": "refresh-1",
	});

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(token_path())
				.form_urlencoded_tuple("grant_type", "client_credentials");
			then.status(200).header("content-type", "application/json").json_body(body);
		})
		.await
}

async fn mock_realm_for<'a>(server: &'a MockServer, access: &str) -> Mock<'a> {
	let bearer = format!("Bearer {access}");

	server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/realms/test").header("authorization", bearer);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"realm\":\"test\"}");
		})
		.await
}

#[tokio::test]
async fn password_grant_sends_user_credentials() {
	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(token_path())
				.form_urlencoded_tuple("grant_type", "password")
				.form_urlencoded_tuple("username", "admin")
				.form_urlencoded_tuple("password", "admin-pw")
				.form_urlencoded_tuple("client_id", "admin-cli");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("access-1", None));
		})
		.await;
	let realm = mock_realm_for(&server, "access-1").await;
	let credentials = Credentials::password("admin-cli", "admin", "admin-pw")
		.expect("Password credentials should build.");
	let config = test_config_builder(&server.base_url())
		.credentials(credentials)
		.build()
		.expect("Config should build.");
	let client = KeycloakClient::new(config).await.expect("Client should build.");

	client.get_realm("test").await.expect("Realm should be fetched.");

	login.assert_async().await;
	realm.assert_async().await;
}

#[tokio::test]
async fn expired_token_is_refreshed_before_sending() {
	let server = MockServer::start_async().await;
	let login = mock_short_lived_login(&server).await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(token_path())
				.form_urlencoded_tuple("grant_type", "refresh_token")
				.form_urlencoded_tuple("refresh_token", "refresh-1");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("access-2", Some("refresh-2")));
		})
		.await;
	let first = mock_realm_for(&server, "access-1").await;
	let second = mock_realm_for(&server, "access-2").await;
	let client = test_client(&server.base_url()).await;

	client.get_realm("test").await.expect("First read should succeed.");
	tokio::time::sleep(StdDuration::from_millis(1_200)).await;
	client.get_realm("test").await.expect("Read after expiry should succeed.");

	login.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;
	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;
}

#[tokio::test]
async fn rejected_refresh_token_falls_back_to_login() {
	let server = MockServer::start_async().await;
	let login = mock_short_lived_login(&server).await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(token_path())
				.form_urlencoded_tuple("grant_type", "refresh_token");
			then.status(400)
				.header("content-type", "application/json")
				.json_body(serde_json::json!({
					"error": "invalid_grant",
					"error_description": "Token is not active"
				}));
		})
		.await;
	let realm = mock_realm_for(&server, "access-1").await;
	let client = test_client(&server.base_url()).await;

	client.get_realm("test").await.expect("First read should succeed.");
	tokio::time::sleep(StdDuration::from_millis(1_200)).await;
	client.get_realm("test").await.expect("Read after a rejected refresh should succeed.");

	login.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;
	realm.assert_calls_async(2).await;
}

#[tokio::test]
async fn concurrent_requests_share_one_login() {
	let server = MockServer::start_async().await;
	let login = mock_login(&server, "access-1", None).await;
	let realm = mock_realm_for(&server, "access-1").await;
	let client = test_client(&server.base_url()).await;
	let (a, b, c) =
		tokio::join!(client.get_realm("test"), client.get_realm("test"), client.get_realm("test"));

	a.expect("First read should succeed.");
	b.expect("Second read should succeed.");
	c.expect("Third read should succeed.");

	login.assert_calls_async(1).await;
	realm.assert_calls_async(3).await;
}

#[tokio::test]
async fn additional_headers_and_user_agent_are_sent() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server, "access-1", None).await;
	let realm = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/admin/realms/test")
				.header("x-tenant", "acme")
				.header("user-agent", "terraform-provider-keycloak/test");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"realm\":\"test\"}");
		})
		.await;
	let config = test_config_builder(&server.base_url())
		.additional_header("x-tenant", "acme")
		.user_agent("terraform-provider-keycloak/test")
		.build()
		.expect("Config should build.");
	let client = KeycloakClient::new(config).await.expect("Client should build.");

	client.get_realm("test").await.expect("Realm should be fetched.");

	realm.assert_async().await;
}

#[tokio::test]
async fn token_response_without_usable_expiry_is_a_config_error() {
	for body in [
		serde_json::json!({ "access_token": "access-1", "token_type": "Bearer" }),
		serde_json::json!({ "access_token": "access-1", "token_type": "Bearer", "expires_in": 0 }),
	] {
		let server = MockServer::start_async().await;
		let _login = server
			.mock_async(|when, then| {
				when.method(POST).path(token_path());
				then.status(200).header("content-type", "application/json").json_body(body);
			})
			.await;
		let client = test_client(&server.base_url()).await;
		let err = client.get_realm("test").await.expect_err("Login should fail.");

		assert!(
			matches!(
				err,
				Error::Config(ConfigError::MissingExpiresIn | ConfigError::NonPositiveExpiresIn)
			),
			"unexpected error: {err:?}"
		);
		assert!(!client.is_logged_in());
	}
}
