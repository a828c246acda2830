//! Resource schemas: attribute descriptions, import ID formats, and the provider registry.
//!
//! The registry is the single source the documentation generator reads; every resource wrapper
//! contributes one [`ResourceSchema`].

// self
use crate::{_prelude::*, component, config::ProviderConfig, resources};

/// Errors raised while parsing an import ID against its [`ImportFormat`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ImportIdError {
	/// The ID has a different number of `/`-separated parts than the format.
	#[error("Import ID `{id}` must have the format {format}.")]
	WrongPartCount {
		/// Expected format.
		format: String,
		/// Rejected ID.
		id: String,
	},
	/// One of the parts is empty.
	#[error("Import ID `{id}` has an empty `{part}`.")]
	EmptyPart {
		/// Rejected ID.
		id: String,
		/// Name of the empty part.
		part: &'static str,
	},
}

/// Errors raised by [`ResourceSchemaBuilder::build`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SchemaError {
	/// Two attributes share a name.
	#[error("Resource `{type_name}` declares `{attribute}` twice.")]
	DuplicateAttribute {
		/// Resource type name.
		type_name: String,
		/// Duplicated attribute name.
		attribute: &'static str,
	},
	/// The import format references an attribute the resource does not have.
	#[error("Import format of `{type_name}` references unknown attribute `{part}`.")]
	UnknownImportPart {
		/// Resource type name.
		type_name: String,
		/// Unknown part name.
		part: &'static str,
	},
}

/// Value type of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeKind {
	/// Single string.
	String,
	/// Boolean.
	Bool,
	/// Integer.
	Int,
	/// Ordered list of strings.
	List,
	/// Unordered set of strings.
	Set,
	/// String-to-string map.
	Map,
}
impl AttributeKind {
	/// Returns the type name used in rendered documentation.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Bool => "bool",
			Self::Int => "number",
			Self::List => "list(string)",
			Self::Set => "set(string)",
			Self::Map => "map(string)",
		}
	}
}

/// Whether an attribute is set by the user, the server, or either.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
	/// Must be set in configuration.
	Required,
	/// May be set in configuration.
	Optional,
	/// Read back from the server only.
	Computed,
}

/// One attribute of a resource or of the provider block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
	/// Attribute name.
	pub name: &'static str,
	/// Value type.
	pub kind: AttributeKind,
	/// Who sets the value.
	pub presence: Presence,
	/// Whether the value is hidden from plan output.
	pub sensitive: bool,
	/// Human-readable description.
	pub description: &'static str,
	/// Default value applied when unset.
	pub default: Option<&'static str>,
}
impl Attribute {
	/// Declares a required attribute.
	pub fn required(name: &'static str, kind: AttributeKind, description: &'static str) -> Self {
		Self::new(name, kind, Presence::Required, description)
	}

	/// Declares an optional attribute.
	pub fn optional(name: &'static str, kind: AttributeKind, description: &'static str) -> Self {
		Self::new(name, kind, Presence::Optional, description)
	}

	/// Declares a server-computed attribute.
	pub fn computed(name: &'static str, kind: AttributeKind, description: &'static str) -> Self {
		Self::new(name, kind, Presence::Computed, description)
	}

	/// Marks the attribute as sensitive.
	pub fn sensitive(mut self) -> Self {
		self.sensitive = true;

		self
	}

	/// Sets the default value shown in documentation.
	pub fn default_value(mut self, value: &'static str) -> Self {
		self.default = Some(value);

		self
	}

	fn new(
		name: &'static str,
		kind: AttributeKind,
		presence: Presence,
		description: &'static str,
	) -> Self {
		Self { name, kind, presence, sensitive: false, description, default: None }
	}
}

/// `/`-separated template of a resource's import ID, e.g. `{{realm_id}}/{{client_id}}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportFormat(&'static [&'static str]);
impl ImportFormat {
	/// Declares the part names in order.
	pub const fn new(parts: &'static [&'static str]) -> Self {
		Self(parts)
	}

	/// Returns the part names.
	pub fn parts(&self) -> &'static [&'static str] {
		self.0
	}

	/// Splits `id` into its named parts.
	pub fn parse<'a>(&self, id: &'a str) -> Result<ImportId<'a>, ImportIdError> {
		let values = id.split('/').collect::<Vec<_>>();

		if values.len() != self.0.len() {
			return Err(ImportIdError::WrongPartCount { format: self.to_string(), id: id.into() });
		}
		if let Some((part, _)) = self.0.iter().zip(&values).find(|(_, value)| value.is_empty()) {
			return Err(ImportIdError::EmptyPart { id: id.into(), part: *part });
		}

		Ok(ImportId(self.0.iter().copied().zip(values).collect()))
	}
}
impl Display for ImportFormat {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		for (i, part) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str("/")?;
			}

			write!(f, "{{{{{part}}}}}")?;
		}

		Ok(())
	}
}

/// Named parts of a parsed import ID.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportId<'a>(Vec<(&'static str, &'a str)>);
impl<'a> ImportId<'a> {
	/// Returns the value of part `name`.
	pub fn get(&self, name: &str) -> Option<&'a str> {
		self.0.iter().find(|(part, _)| *part == name).map(|(_, value)| *value)
	}

	/// Iterates over `(name, value)` pairs in format order.
	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'a str)> + '_ {
		self.0.iter().copied()
	}
}

/// Schema of the provider block or of one resource type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceSchema {
	/// Resource type name, e.g. `keycloak_realm`.
	pub type_name: String,
	/// Human-readable description.
	pub description: String,
	/// Attributes in declaration order.
	pub attributes: Vec<Attribute>,
	/// Import ID format, if the resource can be imported.
	pub import: Option<ImportFormat>,
}
impl ResourceSchema {
	/// Returns a builder for `type_name`.
	pub fn builder(type_name: impl Into<String>) -> ResourceSchemaBuilder {
		ResourceSchemaBuilder::new(type_name)
	}

	/// Returns the attribute called `name`.
	pub fn attribute(&self, name: &str) -> Option<&Attribute> {
		self.attributes.iter().find(|attribute| attribute.name == name)
	}

	/// Attributes the user may set.
	pub fn arguments(&self) -> impl Iterator<Item = &Attribute> {
		self.attributes.iter().filter(|attribute| attribute.presence != Presence::Computed)
	}

	/// Attributes only the server sets.
	pub fn computed(&self) -> impl Iterator<Item = &Attribute> {
		self.attributes.iter().filter(|attribute| attribute.presence == Presence::Computed)
	}

	/// Parses an import ID with this resource's format.
	pub fn parse_import_id<'a>(&self, id: &'a str) -> Result<Option<ImportId<'a>>> {
		self.import.map(|format| format.parse(id)).transpose().map_err(Error::from)
	}
}

/// Builder for [`ResourceSchema`].
#[derive(Clone, Debug)]
pub struct ResourceSchemaBuilder {
	type_name: String,
	description: String,
	attributes: Vec<Attribute>,
	import: Option<ImportFormat>,
}
impl ResourceSchemaBuilder {
	/// Creates an empty builder for `type_name`.
	pub fn new(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			description: String::new(),
			attributes: Vec::new(),
			import: None,
		}
	}

	/// Sets the description.
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();

		self
	}

	/// Appends an attribute.
	pub fn attribute(mut self, attribute: Attribute) -> Self {
		self.attributes.push(attribute);

		self
	}

	/// Sets the import ID format.
	pub fn import(mut self, format: ImportFormat) -> Self {
		self.import = Some(format);

		self
	}

	/// Validates and produces the schema.
	pub fn build(self) -> Result<ResourceSchema, SchemaError> {
		for (i, attribute) in self.attributes.iter().enumerate() {
			if self.attributes[..i].iter().any(|earlier| earlier.name == attribute.name) {
				return Err(SchemaError::DuplicateAttribute {
					type_name: self.type_name,
					attribute: attribute.name,
				});
			}
		}
		if let Some(format) = self.import
			&& let Some(part) = format
				.parts()
				.iter()
				.find(|part| !self.attributes.iter().any(|attribute| attribute.name == **part))
		{
			return Err(SchemaError::UnknownImportPart { type_name: self.type_name, part: *part });
		}

		Ok(ResourceSchema {
			type_name: self.type_name,
			description: self.description,
			attributes: self.attributes,
			import: self.import,
		})
	}
}

/// Provider block schema plus every resource schema.
#[derive(Clone, Debug)]
pub struct ProviderSchema {
	/// Schema of the provider configuration block.
	pub provider: ResourceSchema,
	/// Resource schemas sorted by type name.
	pub resources: Vec<ResourceSchema>,
}
impl ProviderSchema {
	/// Collects the provider block and every resource schema.
	pub fn registry() -> Result<Self, SchemaError> {
		let mut resources = vec![
			resources::realm::schema()?,
			resources::client::schema()?,
			resources::client_scope::schema()?,
			resources::role::schema()?,
			resources::group::schema()?,
			resources::user::schema()?,
			resources::identity_provider::schema()?,
			resources::identity_provider::mapper_schema()?,
			resources::protocol_mapper::schema()?,
			component::ldap::federation_schema()?,
			component::ldap::user_attribute_mapper_schema()?,
			component::ldap::full_name_mapper_schema()?,
			component::ldap::group_mapper_schema()?,
			component::ldap::hardcoded_role_mapper_schema()?,
			component::ldap::msad_user_account_control_mapper_schema()?,
			component::keys::rsa_generated_schema()?,
			component::keys::rsa_schema()?,
			component::keys::hmac_generated_schema()?,
			component::keys::aes_generated_schema()?,
			component::keys::ecdsa_generated_schema()?,
		];

		resources.sort_by(|a, b| a.type_name.cmp(&b.type_name));

		Ok(Self { provider: ProviderConfig::schema()?, resources })
	}

	/// Returns the resource called `type_name`.
	pub fn resource(&self, type_name: &str) -> Option<&ResourceSchema> {
		self.resources.iter().find(|schema| schema.type_name == type_name)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const CLIENT_IMPORT: ImportFormat = ImportFormat::new(&["realm_id", "client_id"]);

	#[test]
	fn import_ids_split_into_named_parts() {
		let id = CLIENT_IMPORT.parse("test/8e8f7fe1").expect("Import ID should parse.");

		assert_eq!(id.get("realm_id"), Some("test"));
		assert_eq!(id.get("client_id"), Some("8e8f7fe1"));
		assert_eq!(id.iter().count(), 2);
		assert_eq!(CLIENT_IMPORT.to_string(), "{{realm_id}}/{{client_id}}");
	}

	#[test]
	fn import_ids_reject_wrong_shapes() {
		assert_eq!(
			CLIENT_IMPORT.parse("test"),
			Err(ImportIdError::WrongPartCount {
				format: "{{realm_id}}/{{client_id}}".into(),
				id: "test".into(),
			})
		);
		assert_eq!(
			CLIENT_IMPORT.parse("/8e8f7fe1"),
			Err(ImportIdError::EmptyPart { id: "/8e8f7fe1".into(), part: "realm_id" })
		);
		assert!(CLIENT_IMPORT.parse("a/b/c").is_err());
	}

	#[test]
	fn builder_rejects_duplicates_and_unknown_import_parts() {
		let duplicate = ResourceSchema::builder("keycloak_thing")
			.attribute(Attribute::required("name", AttributeKind::String, "Name."))
			.attribute(Attribute::optional("name", AttributeKind::String, "Name again."))
			.build();

		assert!(matches!(duplicate, Err(SchemaError::DuplicateAttribute { attribute: "name", .. })));

		let unknown = ResourceSchema::builder("keycloak_thing")
			.attribute(Attribute::required("realm_id", AttributeKind::String, "Realm."))
			.import(CLIENT_IMPORT)
			.build();

		assert!(matches!(unknown, Err(SchemaError::UnknownImportPart { part: "client_id", .. })));
	}

	#[test]
	fn registry_covers_every_resource() {
		let registry = ProviderSchema::registry().expect("Registry should build.");

		assert_eq!(registry.resources.len(), 20);
		assert!(registry.resources.windows(2).all(|pair| pair[0].type_name < pair[1].type_name));
		assert!(registry.provider.attribute("url").is_some());

		let realm = registry.resource("keycloak_realm").expect("Realm schema should exist.");

		assert_eq!(
			realm.attribute("realm").map(|attribute| attribute.presence),
			Some(Presence::Required)
		);
		assert!(registry.resources.iter().all(|schema| !schema.description.is_empty()));
		assert!(registry.resources.iter().all(|schema| {
			schema.attribute("id").is_some_and(|id| id.presence == Presence::Computed)
		}));
	}
}
