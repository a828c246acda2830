//! Realm key providers.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	component::{
		ComponentConfig, ComponentConfigError, ComponentModel, ComponentRepresentation, config_enum,
	},
	schema::{
		Attribute, AttributeKind, ImportFormat, ResourceSchema, ResourceSchemaBuilder, SchemaError,
	},
};

/// Provider type shared by every key provider.
pub const KEY_PROVIDER_TYPE: &str = "org.keycloak.keys.KeyProvider";

config_enum! {
	/// Signature algorithm of RSA keys.
	#[derive(Default)]
	pub enum RsaAlgorithm {
		/// RSASSA-PKCS1-v1_5 with SHA-256.
		#[default]
		Rs256 => "RS256",
		/// RSASSA-PKCS1-v1_5 with SHA-384.
		Rs384 => "RS384",
		/// RSASSA-PKCS1-v1_5 with SHA-512.
		Rs512 => "RS512",
		/// RSASSA-PSS with SHA-256.
		Ps256 => "PS256",
		/// RSASSA-PSS with SHA-384.
		Ps384 => "PS384",
		/// RSASSA-PSS with SHA-512.
		Ps512 => "PS512",
	}
}

config_enum! {
	/// Signature algorithm of HMAC secrets.
	#[derive(Default)]
	pub enum HmacAlgorithm {
		/// HMAC with SHA-256.
		#[default]
		Hs256 => "HS256",
		/// HMAC with SHA-384.
		Hs384 => "HS384",
		/// HMAC with SHA-512.
		Hs512 => "HS512",
	}
}

config_enum! {
	/// Curve used by generated ECDSA keys.
	#[derive(Default)]
	pub enum EllipticCurve {
		/// NIST P-256.
		#[default]
		P256 => "P-256",
		/// NIST P-384.
		P384 => "P-384",
		/// NIST P-521.
		P521 => "P-521",
	}
}

/// Settings shared by every key provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySettings {
	/// Component ID, once created.
	pub id: Option<String>,
	/// Display name.
	pub name: String,
	/// Owning realm ID.
	pub realm_id: String,
	/// Whether the keys are used for signing.
	pub active: bool,
	/// Whether the keys are loaded at all.
	pub enabled: bool,
	/// Selection order among providers; higher wins.
	pub priority: i32,
}
impl KeySettings {
	/// Creates active, enabled settings with priority `0`.
	pub fn new(name: impl Into<String>, realm_id: impl Into<String>) -> Self {
		Self {
			id: None,
			name: name.into(),
			realm_id: realm_id.into(),
			active: true,
			enabled: true,
			priority: 0,
		}
	}

	fn to_component<M>(&self) -> ComponentRepresentation
	where
		M: ComponentModel,
	{
		let mut component = ComponentRepresentation::for_model::<M>(&self.name, &self.realm_id);

		component.id = self.id.clone();
		component
			.config
			.set("active", self.active)
			.set("enabled", self.enabled)
			.set("priority", self.priority);

		component
	}

	fn from_component<M>(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError>
	where
		M: ComponentModel,
	{
		component.ensure_provider::<M>()?;

		let config = &component.config;

		Ok(Self {
			id: component.id.clone(),
			name: component.name.clone(),
			realm_id: component.parent(),
			active: config.bool_or("active", true)?,
			enabled: config.bool_or("enabled", true)?,
			priority: config.int_or("priority", 0)?,
		})
	}
}

/// Generated RSA key pair (`rsa-generated`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaGeneratedKey {
	/// Shared settings.
	pub settings: KeySettings,
	/// Signature algorithm.
	pub algorithm: RsaAlgorithm,
	/// Key size in bits.
	pub key_size: u32,
}
impl ComponentModel for RsaGeneratedKey {
	const PROVIDER_ID: &'static str = "rsa-generated";
	const PROVIDER_TYPE: &'static str = KEY_PROVIDER_TYPE;

	fn to_component(&self) -> ComponentRepresentation {
		let mut component = self.settings.to_component::<Self>();

		component.config.set_value("algorithm", self.algorithm).set("keySize", self.key_size);

		component
	}

	fn from_component(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError> {
		let settings = KeySettings::from_component::<Self>(component)?;
		let config = &component.config;

		Ok(Self {
			settings,
			algorithm: config.value_or("algorithm", RsaAlgorithm::default())?,
			key_size: key_size(config, "keySize", &[1024, 2048, 4096], 2048)?,
		})
	}
}

/// Imported RSA key pair (`rsa`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaKey {
	/// Shared settings.
	pub settings: KeySettings,
	/// Signature algorithm.
	pub algorithm: RsaAlgorithm,
	/// PEM-encoded private key; the server returns a mask on reads.
	pub private_key: Secret,
	/// PEM-encoded certificate.
	pub certificate: Option<String>,
}
impl ComponentModel for RsaKey {
	const PROVIDER_ID: &'static str = "rsa";
	const PROVIDER_TYPE: &'static str = KEY_PROVIDER_TYPE;

	fn to_component(&self) -> ComponentRepresentation {
		let mut component = self.settings.to_component::<Self>();

		component
			.config
			.set_value("algorithm", self.algorithm)
			.set("privateKey", self.private_key.expose())
			.set_opt("certificate", self.certificate.as_deref());

		component
	}

	fn from_component(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError> {
		let settings = KeySettings::from_component::<Self>(component)?;
		let config = &component.config;

		Ok(Self {
			settings,
			algorithm: config.value_or("algorithm", RsaAlgorithm::default())?,
			private_key: Secret::from(config.require("privateKey")?),
			certificate: config.string("certificate"),
		})
	}
}

/// Generated HMAC secret (`hmac-generated`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HmacGeneratedKey {
	/// Shared settings.
	pub settings: KeySettings,
	/// Signature algorithm.
	pub algorithm: HmacAlgorithm,
	/// Secret size in bytes.
	pub secret_size: u32,
}
impl ComponentModel for HmacGeneratedKey {
	const PROVIDER_ID: &'static str = "hmac-generated";
	const PROVIDER_TYPE: &'static str = KEY_PROVIDER_TYPE;

	fn to_component(&self) -> ComponentRepresentation {
		let mut component = self.settings.to_component::<Self>();

		component.config.set_value("algorithm", self.algorithm).set("secretSize", self.secret_size);

		component
	}

	fn from_component(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError> {
		let settings = KeySettings::from_component::<Self>(component)?;
		let config = &component.config;

		Ok(Self {
			settings,
			algorithm: config.value_or("algorithm", HmacAlgorithm::default())?,
			secret_size: key_size(config, "secretSize", &[16, 24, 32, 64, 128, 256, 512], 64)?,
		})
	}
}

/// Generated AES secret (`aes-generated`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AesGeneratedKey {
	/// Shared settings.
	pub settings: KeySettings,
	/// Secret size in bytes.
	pub secret_size: u32,
}
impl ComponentModel for AesGeneratedKey {
	const PROVIDER_ID: &'static str = "aes-generated";
	const PROVIDER_TYPE: &'static str = KEY_PROVIDER_TYPE;

	fn to_component(&self) -> ComponentRepresentation {
		let mut component = self.settings.to_component::<Self>();

		component.config.set("secretSize", self.secret_size);

		component
	}

	fn from_component(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError> {
		Ok(Self {
			settings: KeySettings::from_component::<Self>(component)?,
			secret_size: key_size(&component.config, "secretSize", &[16, 24, 32], 16)?,
		})
	}
}

/// Generated ECDSA key pair (`ecdsa-generated`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaGeneratedKey {
	/// Shared settings.
	pub settings: KeySettings,
	/// Elliptic curve.
	pub elliptic_curve: EllipticCurve,
}
impl ComponentModel for EcdsaGeneratedKey {
	const PROVIDER_ID: &'static str = "ecdsa-generated";
	const PROVIDER_TYPE: &'static str = KEY_PROVIDER_TYPE;

	fn to_component(&self) -> ComponentRepresentation {
		let mut component = self.settings.to_component::<Self>();

		component.config.set_value("ecdsaEllipticCurveKey", self.elliptic_curve);

		component
	}

	fn from_component(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError> {
		Ok(Self {
			settings: KeySettings::from_component::<Self>(component)?,
			elliptic_curve: component
				.config
				.value_or("ecdsaEllipticCurveKey", EllipticCurve::default())?,
		})
	}
}

/// Schema of `keycloak_realm_keystore_rsa_generated`.
pub fn rsa_generated_schema() -> Result<ResourceSchema, SchemaError> {
	keystore_schema("keycloak_realm_keystore_rsa_generated", "Generates an RSA key pair.")
		.attribute(
			Attribute::optional("algorithm", AttributeKind::String, "`RS256` to `PS512`.")
				.default_value("RS256"),
		)
		.attribute(
			Attribute::optional("key_size", AttributeKind::Int, "`1024`, `2048` or `4096` bits.")
				.default_value("2048"),
		)
		.build()
}

/// Schema of `keycloak_realm_keystore_rsa`.
pub fn rsa_schema() -> Result<ResourceSchema, SchemaError> {
	keystore_schema("keycloak_realm_keystore_rsa", "Imports an existing RSA key pair.")
		.attribute(
			Attribute::optional("algorithm", AttributeKind::String, "`RS256` to `PS512`.")
				.default_value("RS256"),
		)
		.attribute(
			Attribute::required("private_key", AttributeKind::String, "PEM-encoded private key.")
				.sensitive(),
		)
		.attribute(Attribute::optional(
			"certificate",
			AttributeKind::String,
			"PEM-encoded certificate; self-signed when unset.",
		))
		.build()
}

/// Schema of `keycloak_realm_keystore_hmac_generated`.
pub fn hmac_generated_schema() -> Result<ResourceSchema, SchemaError> {
	keystore_schema("keycloak_realm_keystore_hmac_generated", "Generates an HMAC secret.")
		.attribute(
			Attribute::optional("algorithm", AttributeKind::String, "`HS256`, `HS384` or `HS512`.")
				.default_value("HS256"),
		)
		.attribute(
			Attribute::optional("secret_size", AttributeKind::Int, "Secret size in bytes.")
				.default_value("64"),
		)
		.build()
}

/// Schema of `keycloak_realm_keystore_aes_generated`.
pub fn aes_generated_schema() -> Result<ResourceSchema, SchemaError> {
	keystore_schema("keycloak_realm_keystore_aes_generated", "Generates an AES secret.")
		.attribute(
			Attribute::optional("secret_size", AttributeKind::Int, "`16`, `24` or `32` bytes.")
				.default_value("16"),
		)
		.build()
}

/// Schema of `keycloak_realm_keystore_ecdsa_generated`.
pub fn ecdsa_generated_schema() -> Result<ResourceSchema, SchemaError> {
	keystore_schema("keycloak_realm_keystore_ecdsa_generated", "Generates an ECDSA key pair.")
		.attribute(
			Attribute::optional(
				"elliptic_curve_key",
				AttributeKind::String,
				"`P-256`, `P-384` or `P-521`.",
			)
			.default_value("P-256"),
		)
		.build()
}

fn keystore_schema(type_name: &str, description: &str) -> ResourceSchemaBuilder {
	ResourceSchema::builder(type_name)
		.description(description)
		.attribute(Attribute::computed("id", AttributeKind::String, "Component ID."))
		.attribute(Attribute::required("realm_id", AttributeKind::String, "Owning realm."))
		.attribute(Attribute::required("name", AttributeKind::String, "Display name."))
		.attribute(
			Attribute::optional("active", AttributeKind::Bool, "Uses the keys for signing.")
				.default_value("true"),
		)
		.attribute(
			Attribute::optional("enabled", AttributeKind::Bool, "Loads the keys.")
				.default_value("true"),
		)
		.attribute(
			Attribute::optional("priority", AttributeKind::Int, "Selection order; higher wins.")
				.default_value("0"),
		)
		.import(ImportFormat::new(&["realm_id", "id"]))
}

fn key_size(
	config: &ComponentConfig,
	key: &str,
	allowed: &[u32],
	default: u32,
) -> Result<u32, ComponentConfigError> {
	let size = config.int_or(key, default)?;

	if allowed.contains(&size) {
		Ok(size)
	} else {
		Err(ComponentConfigError::Invalid {
			key: key.into(),
			value: size.to_string(),
			expected: "a supported key size",
		})
	}
}
