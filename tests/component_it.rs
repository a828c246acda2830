// crates.io
use httpmock::{Mock, prelude::*};
// self
use keycloak_provider::{
	_preludet::*,
	component::{
		ComponentConfigError, ComponentModel, EcdsaGeneratedKey, EllipticCurve, KeySettings,
		LDAP_MAPPER_PROVIDER_TYPE, LdapFullNameMapper, LdapHardcodedRoleMapper,
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
async fn mappers_are_listed_by_parent_and_filtered_by_provider() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let list = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/admin/realms/test/components")
				.query_param("parent", "fed-1")
				.query_param("type", LDAP_MAPPER_PROVIDER_TYPE);
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!([
					{
						"id": "m-1",
						"name": "full name",
						"providerId": "full-name-ldap-mapper",
						"providerType": LDAP_MAPPER_PROVIDER_TYPE,
						"parentId": "fed-1",
						"config": {
							"ldap.full.name.attribute": ["cn"],
							"read.only": ["true"],
							"write.only": ["false"]
						}
					},
					{
						"id": "m-2",
						"name": "admins",
						"providerId": "hardcoded-ldap-role-mapper",
						"providerType": LDAP_MAPPER_PROVIDER_TYPE,
						"parentId": "fed-1",
						"config": { "role": ["admin"] }
					}
				]),
			);
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let mappers = client
		.list_models::<LdapFullNameMapper>("test", "fed-1")
		.await
		.expect("Mappers should be listed.");

	assert_eq!(mappers.len(), 1);
	assert_eq!(mappers[0].id.as_deref(), Some("m-1"));
	assert_eq!(mappers[0].ldap_user_federation_id, "fed-1");
	assert!(mappers[0].read_only);

	list.assert_async().await;
}

#[tokio::test]
async fn reading_a_component_as_the_wrong_model_fails() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let _read = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/realms/test/components/m-1");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({
					"id": "m-1",
					"name": "full name",
					"providerId": "full-name-ldap-mapper",
					"providerType": LDAP_MAPPER_PROVIDER_TYPE,
					"parentId": "fed-1",
					"config": { "ldap.full.name.attribute": ["cn"] }
				}),
			);
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let err = client
		.get_model::<LdapHardcodedRoleMapper>("test", "m-1")
		.await
		.expect_err("Provider mismatch should fail.");

	assert!(matches!(
		err,
		Error::Component(ComponentConfigError::ProviderMismatch { expected, ref found })
			if expected == "hardcoded-ldap-role-mapper" && found == "full-name-ldap-mapper"
	));
}

#[tokio::test]
async fn key_provider_is_created_and_updated_with_its_id() {
	let server = MockServer::start_async().await;
	let _login = mock_login(&server).await;
	let location = server.url("/admin/realms/test/components/k-1");
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/realms/test/components").json_body_includes(
				serde_json::json!({
					"name": "ecdsa",
					"providerId": "ecdsa-generated",
					"providerType": "org.keycloak.keys.KeyProvider",
					"parentId": "test",
					"config": { "ecdsaEllipticCurveKey": ["P-384"] }
				})
				.to_string(),
			);
			then.status(201).header("location", location);
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/admin/realms/test/components/k-1")
				.json_body_includes("{\"id\":\"k-1\",\"config\":{\"priority\":[\"100\"]}}");
			then.status(204);
		})
		.await;
	let client = test_client(&server.base_url()).await;
	let mut key = EcdsaGeneratedKey {
		settings: KeySettings::new("ecdsa", "test"),
		elliptic_curve: EllipticCurve::P384,
	};
	let id = client.create_model("test", &key).await.expect("Key provider should be created.");

	key.settings.priority = 100;

	client.update_model("test", &id, &key).await.expect("Key provider should update.");

	assert_eq!(key.to_component().provider_id, "ecdsa-generated");

	create.assert_async().await;
	update.assert_async().await;
}
