// std
use std::fs;
// crates.io
use tempfile::TempDir;
// self
use keycloak_provider::{docs, schema::ProviderSchema};

#[test]
fn registry_pages_are_written_under_resources() {
	let dir = TempDir::new().expect("Temporary directory should be created.");
	let schema = ProviderSchema::registry().expect("Registry should build.");
	let written = docs::write_all(&schema, dir.path()).expect("Docs should be written.");

	assert_eq!(written.len(), schema.resources.len() + 1);
	assert!(dir.path().join("index.md").is_file());

	let realm = fs::read_to_string(dir.path().join("resources/realm.md"))
		.expect("Realm page should exist.");

	assert!(realm.contains("# keycloak_realm (Resource)"));
	assert!(realm.contains("terraform import keycloak_realm.example {{realm}}"));

	let key = fs::read_to_string(dir.path().join("resources/realm_keystore_rsa.md"))
		.expect("RSA keystore page should exist.");

	assert!(key.contains("- `private_key` - (Required, string, Sensitive)"));
}

#[test]
fn every_resource_can_be_imported_by_its_id() {
	let schema = ProviderSchema::registry().expect("Registry should build.");

	for resource in &schema.resources {
		let format = resource
			.import
			.unwrap_or_else(|| panic!("{} lacks an import format", resource.type_name));

		assert!(resource.attribute("id").is_some(), "{} lacks an id", resource.type_name);

		let sample = format.parts().iter().map(|_| "x").collect::<Vec<_>>().join("/");
		let parsed = format.parse(&sample).expect("Sample import ID should parse.");

		assert_eq!(parsed.iter().count(), format.parts().len());
	}
}
