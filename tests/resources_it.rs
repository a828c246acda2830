// crates.io
use httpmock::{Mock, prelude::*};
// self
use keycloak_provider::{
	_preludet::*,
	resources::{
		ClientRepresentation, GroupRepresentation, IdentityProviderRepresentation,
		ProtocolMapperParent, ProtocolMapperRepresentation, RoleContainer, RoleRepresentation,
		ScopeBinding, UserRepresentation,
	},
};

async fn mock_login(server: &MockServer) -> Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(token_path());
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("access-1", None));
		})
		.await
}

#[tokio::test]
async fn client_create_returns_id_from_location() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let location = server.url("/admin/realms/test/clients/0c2e9f7a-5d1b");
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/admin/realms/test/clients")
				.json_body_includes("{\"clientId\":\"web\",\"protocol\":\"openid-connect\"}");
			then.status(201).header("location", location);
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let id = client
		.create_client("test", &ClientRepresentation::openid("web"))
		.await
		.expect("Client should be created.");

	assert_eq!(id, "0c2e9f7a-5d1b");

	create.assert_async().await;
}

#[tokio::test]
async fn create_without_location_is_an_error() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let _create = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/realms/test/users");
			then.status(201);
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let err = client
		.create_user("test", &UserRepresentation::new("alice"))
		.await
		.expect_err("A create without Location should fail.");

	assert!(matches!(err, Error::MissingLocation { ref path } if path == "/realms/test/users"));
}

#[tokio::test]
async fn client_lookup_and_scope_binding_use_expected_paths() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/realms/test/clients").query_param("clientId", "web");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"id\":\"c-1\",\"clientId\":\"web\"}]");
		})
		.await;
	let attach = server
		.mock_async(|when, then| {
			when.method(PUT).path("/admin/realms/test/clients/c-1/optional-client-scopes/s-1");
			then.status(204);
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let found = client
		.find_client_by_client_id("test", "web")
		.await
		.expect("Lookup should succeed.")
		.expect("Client should exist.");

	assert_eq!(found.id.as_deref(), Some("c-1"));

	client
		.attach_client_scope("test", "c-1", ScopeBinding::Optional, "s-1")
		.await
		.expect("Scope should attach.");

	lookup.assert_async().await;
	attach.assert_async().await;
}

#[tokio::test]
async fn role_create_reads_the_role_back_by_name() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/admin/realms/test/clients/c-1/roles")
				.json_body_includes("{\"name\":\"reader\"}");
			then.status(201);
		})
		.await;
	let read = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/realms/test/clients/c-1/roles/reader");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(serde_json::json!({
					"id": "r-1",
					"name": "reader",
					"clientRole": true,
					"containerId": "c-1"
				}));
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let role = client
		.create_role("test", RoleContainer::Client("c-1"), &RoleRepresentation::new("reader"))
		.await
		.expect("Role should be created.");

	assert_eq!(role.id.as_deref(), Some("r-1"));
	assert_eq!(role.client_role, Some(true));

	create.assert_async().await;
	read.assert_async().await;
}

#[tokio::test]
async fn composites_are_removed_with_a_delete_body() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let remove = server
		.mock_async(|when, then| {
			when.method(DELETE)
				.path("/admin/realms/test/roles-by-id/r-1/composites")
				.json_body(serde_json::json!([{ "id": "r-2", "name": "writer" }]));
			then.status(204);
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let composite =
		RoleRepresentation { id: Some("r-2".into()), ..RoleRepresentation::new("writer") };

	client
		.remove_composites("test", "r-1", &[composite])
		.await
		.expect("Composite should be removed.");

	remove.assert_async().await;
}

#[tokio::test]
async fn child_groups_are_created_under_their_parent() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let location = server.url("/admin/realms/test/groups/g-2");
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/admin/realms/test/groups/g-1/children")
				.json_body_includes("{\"name\":\"child\"}");
			then.status(201).header("location", location);
		})
		.await;
	let default_group = server
		.mock_async(|when, then| {
			when.method(PUT).path("/admin/realms/test/default-groups/g-2");
			then.status(204);
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let id = client
		.create_group("test", Some("g-1"), &GroupRepresentation::new("child"))
		.await
		.expect("Group should be created.");

	client.add_default_group("test", &id).await.expect("Group should become a default.");

	assert_eq!(id, "g-2");

	create.assert_async().await;
	default_group.assert_async().await;
}

#[tokio::test]
async fn user_lookup_is_exact_and_password_reset_sends_a_credential() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/admin/realms/test/users")
				.query_param("username", "alice")
				.query_param("exact", "true");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"id\":\"u-1\",\"username\":\"alice\",\"enabled\":true}]");
		})
		.await;
	let reset = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/admin/realms/test/users/u-1/reset-password")
				.json_body(serde_json::json!({
					"type": "password",
					"value": "s3cret",
					"temporary": false
				}));
			then.status(204);
		})
		.await;
	let membership = server
		.mock_async(|when, then| {
			when.method(PUT).path("/admin/realms/test/users/u-1/groups/g-1");
			then.status(204);
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let user = client
		.find_user_by_username("test", "alice")
		.await
		.expect("Lookup should succeed.")
		.expect("User should exist.");
	let id = user.id.expect("User should carry an ID.");

	client
		.reset_user_password("test", &id, "s3cret", false)
		.await
		.expect("Password should reset.");
	client.add_user_to_group("test", &id, "g-1").await.expect("User should join the group.");

	lookup.assert_async().await;
	reset.assert_async().await;
	membership.assert_async().await;
}

#[tokio::test]
async fn identity_providers_are_addressed_by_alias() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/admin/realms/test/identity-provider/instances")
				.json_body_includes("{\"alias\":\"corp\",\"providerId\":\"oidc\"}");
			then.status(201);
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/admin/realms/test/identity-provider/instances/corp");
			then.status(204);
		})
		.await;
	let client = test_client(&server.base_url()).await;

	client
		.create_identity_provider("test", &IdentityProviderRepresentation::new("corp", "oidc"))
		.await
		.expect("Provider should be created.");
	client.delete_identity_provider("test", "corp").await.expect("Provider should be deleted.");

	create.assert_async().await;
	delete.assert_async().await;
}

#[tokio::test]
async fn protocol_mapper_update_fills_in_the_id() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let update = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/admin/realms/test/client-scopes/s-1/protocol-mappers/models/m-1")
				.json_body_includes(
					"{\"id\":\"m-1\",\"protocolMapper\":\"oidc-hardcoded-claim-mapper\"}",
				);
			then.status(204);
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let mapper = ProtocolMapperRepresentation::openid("tier", "oidc-hardcoded-claim-mapper");

	client
		.update_protocol_mapper("test", ProtocolMapperParent::ClientScope("s-1"), "m-1", &mapper)
		.await
		.expect("Mapper should update.");

	update.assert_async().await;
}
