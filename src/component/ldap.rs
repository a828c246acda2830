//! LDAP user federation and its attribute/group/role mappers.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	component::{ComponentConfigError, ComponentModel, ComponentRepresentation, config_enum},
	schema::{
		Attribute, AttributeKind, ImportFormat, ResourceSchema, ResourceSchemaBuilder, SchemaError,
	},
};

/// Provider type shared by every user storage provider.
pub const USER_STORAGE_PROVIDER_TYPE: &str = "org.keycloak.storage.UserStorageProvider";
/// Provider type shared by every LDAP mapper.
pub const LDAP_MAPPER_PROVIDER_TYPE: &str = "org.keycloak.storage.ldap.mappers.LDAPStorageMapper";

config_enum! {
	/// How imported users may be changed.
	#[derive(Default)]
	pub enum EditMode {
		/// Changes are rejected.
		#[default]
		ReadOnly => "READ_ONLY",
		/// Changes are written back to LDAP.
		Writable => "WRITABLE",
		/// Changes stay local.
		Unsynced => "UNSYNCED",
	}
}

config_enum! {
	/// Depth of the user search below `usersDn`.
	#[derive(Default)]
	pub enum SearchScope {
		/// Direct children only.
		#[default]
		OneLevel => "1",
		/// Whole subtree.
		Subtree => "2",
	}
}

config_enum! {
	/// When the server's trust store is consulted for LDAPS connections.
	#[derive(Default)]
	pub enum UseTruststoreSpi {
		/// Only for `ldaps://` URLs.
		#[default]
		LdapsOnly => "ldapsOnly",
		/// Always.
		Always => "always",
		/// Never.
		Never => "never",
	}
}

config_enum! {
	/// Cache policy of the federation provider.
	#[derive(Default)]
	pub enum CachePolicy {
		/// Realm default.
		#[default]
		Default => "DEFAULT",
		/// Evicted once a day.
		EvictDaily => "EVICT_DAILY",
		/// Evicted once a week.
		EvictWeekly => "EVICT_WEEKLY",
		/// Evicted after a maximum lifespan.
		MaxLifespan => "MAX_LIFESPAN",
		/// Not cached.
		NoCache => "NO_CACHE",
	}
}

config_enum! {
	/// Synchronisation mode of the group mapper.
	#[derive(Default)]
	pub enum GroupMapperMode {
		/// Groups are read from LDAP and cannot be changed.
		#[default]
		ReadOnly => "READ_ONLY",
		/// Group memberships are stored in LDAP only.
		LdapOnly => "LDAP_ONLY",
		/// Groups are imported and kept locally.
		Import => "IMPORT",
	}
}

config_enum! {
	/// How members are referenced in a group's membership attribute.
	#[derive(Default)]
	pub enum MembershipAttributeType {
		/// Full DN of the member.
		#[default]
		Dn => "DN",
		/// UID of the member.
		Uid => "UID",
	}
}

config_enum! {
	/// How a user's groups are looked up.
	#[derive(Default)]
	pub enum UserGroupsRetrieveStrategy {
		/// Search groups by member attribute.
		#[default]
		LoadByMemberAttribute => "LOAD_GROUPS_BY_MEMBER_ATTRIBUTE",
		/// Read the user's `memberOf` attribute.
		FromMemberOf => "GET_GROUPS_FROM_USER_MEMBEROF_ATTRIBUTE",
		/// Search groups by member attribute, following nested groups.
		LoadByMemberAttributeRecursively => "LOAD_GROUPS_BY_MEMBER_ATTRIBUTE_RECURSIVELY",
	}
}

/// LDAP user federation provider (`ldap`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LdapUserFederation {
	/// Component ID, once created.
	pub id: Option<String>,
	/// Display name.
	pub name: String,
	/// Owning realm ID.
	pub realm_id: String,
	/// Whether the provider is consulted.
	pub enabled: bool,
	/// Lookup order among providers; lower runs first.
	pub priority: i32,
	/// Whether users are imported into the local store.
	pub import_enabled: bool,
	/// How imported users may be changed.
	pub edit_mode: EditMode,
	/// Whether new users are created in LDAP.
	pub sync_registrations: bool,
	/// LDAP vendor hint, e.g. `ad` or `other`.
	pub vendor: Option<String>,
	/// Attribute mapped to the username.
	pub username_ldap_attribute: String,
	/// Attribute used as the RDN of user entries.
	pub rdn_ldap_attribute: String,
	/// Attribute holding a stable unique ID.
	pub uuid_ldap_attribute: String,
	/// Object classes of user entries.
	pub user_object_classes: Vec<String>,
	/// LDAP connection URL.
	pub connection_url: String,
	/// Base DN of user entries.
	pub users_dn: String,
	/// DN used to bind.
	pub bind_dn: Option<String>,
	/// Bind password; the server returns a mask on reads.
	pub bind_credential: Option<Secret>,
	/// Extra LDAP filter applied to user searches.
	pub custom_user_search_filter: Option<String>,
	/// Depth of the user search.
	pub search_scope: SearchScope,
	/// Whether the realm password policy is checked before updating LDAP.
	pub validate_password_policy: bool,
	/// Whether LDAP emails are treated as verified.
	pub trust_email: bool,
	/// Trust store usage.
	pub use_truststore_spi: UseTruststoreSpi,
	/// Connection timeout in milliseconds.
	pub connection_timeout: Option<u32>,
	/// Read timeout in milliseconds.
	pub read_timeout: Option<u32>,
	/// Whether the server supports paged results.
	pub pagination: bool,
	/// Page size used while syncing.
	pub batch_size_for_sync: u32,
	/// Full sync period in seconds; `None` disables it.
	pub full_sync_period: Option<u32>,
	/// Changed-users sync period in seconds; `None` disables it.
	pub changed_sync_period: Option<u32>,
	/// Cache policy.
	pub cache_policy: CachePolicy,
}
impl LdapUserFederation {
	/// Creates a provider with the server's defaults.
	pub fn new(
		name: impl Into<String>,
		realm_id: impl Into<String>,
		connection_url: impl Into<String>,
		users_dn: impl Into<String>,
	) -> Self {
		Self {
			id: None,
			name: name.into(),
			realm_id: realm_id.into(),
			enabled: true,
			priority: 0,
			import_enabled: true,
			edit_mode: EditMode::default(),
			sync_registrations: false,
			vendor: None,
			username_ldap_attribute: "uid".into(),
			rdn_ldap_attribute: "uid".into(),
			uuid_ldap_attribute: "entryUUID".into(),
			user_object_classes: vec!["inetOrgPerson".into(), "organizationalPerson".into()],
			connection_url: connection_url.into(),
			users_dn: users_dn.into(),
			bind_dn: None,
			bind_credential: None,
			custom_user_search_filter: None,
			search_scope: SearchScope::default(),
			validate_password_policy: false,
			trust_email: false,
			use_truststore_spi: UseTruststoreSpi::default(),
			connection_timeout: None,
			read_timeout: None,
			pagination: true,
			batch_size_for_sync: 1000,
			full_sync_period: None,
			changed_sync_period: None,
			cache_policy: CachePolicy::default(),
		}
	}
}
impl ComponentModel for LdapUserFederation {
	const PROVIDER_ID: &'static str = "ldap";
	const PROVIDER_TYPE: &'static str = USER_STORAGE_PROVIDER_TYPE;

	fn to_component(&self) -> ComponentRepresentation {
		let mut component = ComponentRepresentation::for_model::<Self>(&self.name, &self.realm_id);

		component.id = self.id.clone();
		component
			.config
			.set("enabled", self.enabled)
			.set("priority", self.priority)
			.set("importEnabled", self.import_enabled)
			.set_value("editMode", self.edit_mode)
			.set("syncRegistrations", self.sync_registrations)
			.set_opt("vendor", self.vendor.as_deref())
			.set("usernameLDAPAttribute", &self.username_ldap_attribute)
			.set("rdnLDAPAttribute", &self.rdn_ldap_attribute)
			.set("uuidLDAPAttribute", &self.uuid_ldap_attribute)
			.set_list("userObjectClasses", &self.user_object_classes)
			.set("connectionUrl", &self.connection_url)
			.set("usersDn", &self.users_dn)
			.set_opt("bindDn", self.bind_dn.as_deref())
			.set_opt("bindCredential", self.bind_credential.as_ref().map(Secret::expose))
			.set_opt("customUserSearchFilter", self.custom_user_search_filter.as_deref())
			.set_value("searchScope", self.search_scope)
			.set("validatePasswordPolicy", self.validate_password_policy)
			.set("trustEmail", self.trust_email)
			.set_value("useTruststoreSpi", self.use_truststore_spi)
			.set_opt("connectionTimeout", self.connection_timeout)
			.set_opt("readTimeout", self.read_timeout)
			.set("pagination", self.pagination)
			.set("batchSizeForSync", self.batch_size_for_sync)
			.set_period("fullSyncPeriod", self.full_sync_period)
			.set_period("changedSyncPeriod", self.changed_sync_period)
			.set_value("cachePolicy", self.cache_policy);

		component
	}

	fn from_component(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError> {
		component.ensure_provider::<Self>()?;

		let config = &component.config;

		Ok(Self {
			id: component.id.clone(),
			name: component.name.clone(),
			realm_id: component.parent(),
			enabled: config.bool_or("enabled", true)?,
			priority: config.int_or("priority", 0)?,
			import_enabled: config.bool_or("importEnabled", true)?,
			edit_mode: config.value_or("editMode", EditMode::default())?,
			sync_registrations: config.bool_or("syncRegistrations", false)?,
			vendor: config.string("vendor"),
			username_ldap_attribute: config.require("usernameLDAPAttribute")?.into(),
			rdn_ldap_attribute: config.require("rdnLDAPAttribute")?.into(),
			uuid_ldap_attribute: config.require("uuidLDAPAttribute")?.into(),
			user_object_classes: config.list("userObjectClasses"),
			connection_url: config.require("connectionUrl")?.into(),
			users_dn: config.require("usersDn")?.into(),
			bind_dn: config.string("bindDn"),
			bind_credential: config.string("bindCredential").map(Secret::from),
			custom_user_search_filter: config.string("customUserSearchFilter"),
			search_scope: config.value_or("searchScope", SearchScope::default())?,
			validate_password_policy: config.bool_or("validatePasswordPolicy", false)?,
			trust_email: config.bool_or("trustEmail", false)?,
			use_truststore_spi: config.value_or("useTruststoreSpi", UseTruststoreSpi::default())?,
			connection_timeout: config.int("connectionTimeout")?,
			read_timeout: config.int("readTimeout")?,
			pagination: config.bool_or("pagination", true)?,
			batch_size_for_sync: config.int_or("batchSizeForSync", 1000)?,
			full_sync_period: config.period("fullSyncPeriod")?,
			changed_sync_period: config.period("changedSyncPeriod")?,
			cache_policy: config.value_or("cachePolicy", CachePolicy::default())?,
		})
	}
}

/// Maps an LDAP attribute onto a user attribute (`user-attribute-ldap-mapper`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LdapUserAttributeMapper {
	/// Component ID, once created.
	pub id: Option<String>,
	/// Display name.
	pub name: String,
	/// Owning LDAP federation component ID.
	pub ldap_user_federation_id: String,
	/// User model attribute.
	pub user_model_attribute: String,
	/// LDAP attribute.
	pub ldap_attribute: String,
	/// Whether the attribute is never written to LDAP.
	pub read_only: bool,
	/// Whether the value is always read from LDAP instead of the local copy.
	pub always_read_value_from_ldap: bool,
	/// Whether the attribute must be present when creating LDAP users.
	pub is_mandatory_in_ldap: bool,
	/// Value written when the attribute is mandatory and missing.
	pub attribute_default_value: Option<String>,
}
impl ComponentModel for LdapUserAttributeMapper {
	const PROVIDER_ID: &'static str = "user-attribute-ldap-mapper";
	const PROVIDER_TYPE: &'static str = LDAP_MAPPER_PROVIDER_TYPE;

	fn to_component(&self) -> ComponentRepresentation {
		let mut component =
			ComponentRepresentation::for_model::<Self>(&self.name, &self.ldap_user_federation_id);

		component.id = self.id.clone();
		component
			.config
			.set("user.model.attribute", &self.user_model_attribute)
			.set("ldap.attribute", &self.ldap_attribute)
			.set("read.only", self.read_only)
			.set("always.read.value.from.ldap", self.always_read_value_from_ldap)
			.set("is.mandatory.in.ldap", self.is_mandatory_in_ldap)
			.set_opt("attribute.default.value", self.attribute_default_value.as_deref());

		component
	}

	fn from_component(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError> {
		component.ensure_provider::<Self>()?;

		let config = &component.config;

		Ok(Self {
			id: component.id.clone(),
			name: component.name.clone(),
			ldap_user_federation_id: component.parent(),
			user_model_attribute: config.require("user.model.attribute")?.into(),
			ldap_attribute: config.require("ldap.attribute")?.into(),
			read_only: config.bool_or("read.only", false)?,
			always_read_value_from_ldap: config.bool_or("always.read.value.from.ldap", false)?,
			is_mandatory_in_ldap: config.bool_or("is.mandatory.in.ldap", false)?,
			attribute_default_value: config.string("attribute.default.value"),
		})
	}
}

/// Maps one LDAP attribute onto first and last name (`full-name-ldap-mapper`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LdapFullNameMapper {
	/// Component ID, once created.
	pub id: Option<String>,
	/// Display name.
	pub name: String,
	/// Owning LDAP federation component ID.
	pub ldap_user_federation_id: String,
	/// LDAP attribute holding the full name.
	pub ldap_full_name_attribute: String,
	/// Whether the name is never written to LDAP.
	pub read_only: bool,
	/// Whether the name is only written, never read.
	pub write_only: bool,
}
impl ComponentModel for LdapFullNameMapper {
	const PROVIDER_ID: &'static str = "full-name-ldap-mapper";
	const PROVIDER_TYPE: &'static str = LDAP_MAPPER_PROVIDER_TYPE;

	fn to_component(&self) -> ComponentRepresentation {
		let mut component =
			ComponentRepresentation::for_model::<Self>(&self.name, &self.ldap_user_federation_id);

		component.id = self.id.clone();
		component
			.config
			.set("ldap.full.name.attribute", &self.ldap_full_name_attribute)
			.set("read.only", self.read_only)
			.set("write.only", self.write_only);

		component
	}

	fn from_component(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError> {
		component.ensure_provider::<Self>()?;

		let config = &component.config;

		Ok(Self {
			id: component.id.clone(),
			name: component.name.clone(),
			ldap_user_federation_id: component.parent(),
			ldap_full_name_attribute: config.require("ldap.full.name.attribute")?.into(),
			read_only: config.bool_or("read.only", false)?,
			write_only: config.bool_or("write.only", false)?,
		})
	}
}

/// Maps LDAP groups onto realm groups (`group-ldap-mapper`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LdapGroupMapper {
	/// Component ID, once created.
	pub id: Option<String>,
	/// Display name.
	pub name: String,
	/// Owning LDAP federation component ID.
	pub ldap_user_federation_id: String,
	/// Base DN of group entries.
	pub ldap_groups_dn: String,
	/// Attribute holding the group name.
	pub group_name_ldap_attribute: String,
	/// Object classes of group entries.
	pub group_object_classes: Vec<String>,
	/// Whether nested LDAP groups become nested realm groups.
	pub preserve_group_inheritance: bool,
	/// Whether missing groups in the hierarchy are ignored.
	pub ignore_missing_groups: bool,
	/// Attribute listing group members.
	pub membership_ldap_attribute: String,
	/// How members are referenced.
	pub membership_attribute_type: MembershipAttributeType,
	/// User attribute referenced by the membership attribute.
	pub membership_user_ldap_attribute: String,
	/// Extra LDAP filter applied to group searches.
	pub groups_ldap_filter: Option<String>,
	/// Synchronisation mode.
	pub mode: GroupMapperMode,
	/// Group lookup strategy.
	pub user_roles_retrieve_strategy: UserGroupsRetrieveStrategy,
	/// Attribute read by the `memberOf` strategy.
	pub memberof_ldap_attribute: String,
	/// LDAP attributes copied onto realm groups.
	pub mapped_group_attributes: Vec<String>,
	/// Whether realm groups missing from LDAP are removed on sync.
	pub drop_non_existing_groups_during_sync: bool,
	/// Realm group path that receives the LDAP groups.
	pub groups_path: Option<String>,
}
impl LdapGroupMapper {
	/// Creates a mapper with the server's defaults.
	pub fn new(
		name: impl Into<String>,
		ldap_user_federation_id: impl Into<String>,
		ldap_groups_dn: impl Into<String>,
	) -> Self {
		Self {
			id: None,
			name: name.into(),
			ldap_user_federation_id: ldap_user_federation_id.into(),
			ldap_groups_dn: ldap_groups_dn.into(),
			group_name_ldap_attribute: "cn".into(),
			group_object_classes: vec!["groupOfNames".into()],
			preserve_group_inheritance: true,
			ignore_missing_groups: false,
			membership_ldap_attribute: "member".into(),
			membership_attribute_type: MembershipAttributeType::default(),
			membership_user_ldap_attribute: "cn".into(),
			groups_ldap_filter: None,
			mode: GroupMapperMode::default(),
			user_roles_retrieve_strategy: UserGroupsRetrieveStrategy::default(),
			memberof_ldap_attribute: "memberOf".into(),
			mapped_group_attributes: Vec::new(),
			drop_non_existing_groups_during_sync: false,
			groups_path: None,
		}
	}
}
impl ComponentModel for LdapGroupMapper {
	const PROVIDER_ID: &'static str = "group-ldap-mapper";
	const PROVIDER_TYPE: &'static str = LDAP_MAPPER_PROVIDER_TYPE;

	fn to_component(&self) -> ComponentRepresentation {
		let mut component =
			ComponentRepresentation::for_model::<Self>(&self.name, &self.ldap_user_federation_id);

		component.id = self.id.clone();
		component
			.config
			.set("groups.dn", &self.ldap_groups_dn)
			.set("group.name.ldap.attribute", &self.group_name_ldap_attribute)
			.set_list("group.object.classes", &self.group_object_classes)
			.set("preserve.group.inheritance", self.preserve_group_inheritance)
			.set("ignore.missing.groups", self.ignore_missing_groups)
			.set("membership.ldap.attribute", &self.membership_ldap_attribute)
			.set_value("membership.attribute.type", self.membership_attribute_type)
			.set("membership.user.ldap.attribute", &self.membership_user_ldap_attribute)
			.set_opt("groups.ldap.filter", self.groups_ldap_filter.as_deref())
			.set_value("mode", self.mode)
			.set_value("user.roles.retrieve.strategy", self.user_roles_retrieve_strategy)
			.set("memberof.ldap.attribute", &self.memberof_ldap_attribute)
			.set_list("mapped.group.attributes", &self.mapped_group_attributes)
			.set("drop.non.existing.groups.during.sync", self.drop_non_existing_groups_during_sync)
			.set_opt("groups.path", self.groups_path.as_deref());

		component
	}

	fn from_component(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError> {
		component.ensure_provider::<Self>()?;

		let config = &component.config;

		Ok(Self {
			id: component.id.clone(),
			name: component.name.clone(),
			ldap_user_federation_id: component.parent(),
			ldap_groups_dn: config.require("groups.dn")?.into(),
			group_name_ldap_attribute: config.require("group.name.ldap.attribute")?.into(),
			group_object_classes: config.list("group.object.classes"),
			preserve_group_inheritance: config.bool_or("preserve.group.inheritance", true)?,
			ignore_missing_groups: config.bool_or("ignore.missing.groups", false)?,
			membership_ldap_attribute: config.require("membership.ldap.attribute")?.into(),
			membership_attribute_type: config
				.value_or("membership.attribute.type", MembershipAttributeType::default())?,
			membership_user_ldap_attribute: config
				.require("membership.user.ldap.attribute")?
				.into(),
			groups_ldap_filter: config.string("groups.ldap.filter"),
			mode: config.value_or("mode", GroupMapperMode::default())?,
			user_roles_retrieve_strategy: config
				.value_or("user.roles.retrieve.strategy", UserGroupsRetrieveStrategy::default())?,
			memberof_ldap_attribute: config
				.string("memberof.ldap.attribute")
				.unwrap_or_else(|| "memberOf".into()),
			mapped_group_attributes: config.list("mapped.group.attributes"),
			drop_non_existing_groups_during_sync: config
				.bool_or("drop.non.existing.groups.during.sync", false)?,
			groups_path: config.string("groups.path"),
		})
	}
}

/// Grants a fixed role to every LDAP user (`hardcoded-ldap-role-mapper`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LdapHardcodedRoleMapper {
	/// Component ID, once created.
	pub id: Option<String>,
	/// Display name.
	pub name: String,
	/// Owning LDAP federation component ID.
	pub ldap_user_federation_id: String,
	/// Role name; client roles use `clientId.roleName`.
	pub role: String,
}
impl ComponentModel for LdapHardcodedRoleMapper {
	const PROVIDER_ID: &'static str = "hardcoded-ldap-role-mapper";
	const PROVIDER_TYPE: &'static str = LDAP_MAPPER_PROVIDER_TYPE;

	fn to_component(&self) -> ComponentRepresentation {
		let mut component =
			ComponentRepresentation::for_model::<Self>(&self.name, &self.ldap_user_federation_id);

		component.id = self.id.clone();
		component.config.set("role", &self.role);

		component
	}

	fn from_component(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError> {
		component.ensure_provider::<Self>()?;

		Ok(Self {
			id: component.id.clone(),
			name: component.name.clone(),
			ldap_user_federation_id: component.parent(),
			role: component.config.require("role")?.into(),
		})
	}
}

/// Maps Active Directory's `userAccountControl` flags (`msad-user-account-control-mapper`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LdapMsadUserAccountControlMapper {
	/// Component ID, once created.
	pub id: Option<String>,
	/// Display name.
	pub name: String,
	/// Owning LDAP federation component ID.
	pub ldap_user_federation_id: String,
	/// Whether AD password policy hints are requested.
	pub ldap_password_policy_hints_enabled: bool,
}
impl ComponentModel for LdapMsadUserAccountControlMapper {
	const PROVIDER_ID: &'static str = "msad-user-account-control-mapper";
	const PROVIDER_TYPE: &'static str = LDAP_MAPPER_PROVIDER_TYPE;

	fn to_component(&self) -> ComponentRepresentation {
		let mut component =
			ComponentRepresentation::for_model::<Self>(&self.name, &self.ldap_user_federation_id);

		component.id = self.id.clone();
		component
			.config
			.set("ldap.password.policy.hints.enabled", self.ldap_password_policy_hints_enabled);

		component
	}

	fn from_component(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError> {
		component.ensure_provider::<Self>()?;

		Ok(Self {
			id: component.id.clone(),
			name: component.name.clone(),
			ldap_user_federation_id: component.parent(),
			ldap_password_policy_hints_enabled: component
				.config
				.bool_or("ldap.password.policy.hints.enabled", false)?,
		})
	}
}

/// Schema of `keycloak_ldap_user_federation`.
pub fn federation_schema() -> Result<ResourceSchema, SchemaError> {
	ResourceSchema::builder("keycloak_ldap_user_federation")
		.description("Manages an LDAP user federation provider of a realm.")
		.attribute(Attribute::computed("id", AttributeKind::String, "Component ID."))
		.attribute(Attribute::required("realm_id", AttributeKind::String, "Owning realm."))
		.attribute(Attribute::required("name", AttributeKind::String, "Display name."))
		.attribute(
			Attribute::optional("enabled", AttributeKind::Bool, "Whether the provider is used.")
				.default_value("true"),
		)
		.attribute(
			Attribute::optional("priority", AttributeKind::Int, "Lookup order; lower runs first.")
				.default_value("0"),
		)
		.attribute(
			Attribute::optional(
				"import_enabled",
				AttributeKind::Bool,
				"Imports users into the local store.",
			)
			.default_value("true"),
		)
		.attribute(
			Attribute::optional(
				"edit_mode",
				AttributeKind::String,
				"`READ_ONLY`, `WRITABLE` or `UNSYNCED`.",
			)
			.default_value("READ_ONLY"),
		)
		.attribute(Attribute::optional(
			"sync_registrations",
			AttributeKind::Bool,
			"Creates new users in LDAP.",
		))
		.attribute(Attribute::optional("vendor", AttributeKind::String, "LDAP vendor hint."))
		.attribute(Attribute::required(
			"username_ldap_attribute",
			AttributeKind::String,
			"Attribute mapped to the username.",
		))
		.attribute(Attribute::required(
			"rdn_ldap_attribute",
			AttributeKind::String,
			"RDN attribute of user entries.",
		))
		.attribute(Attribute::required(
			"uuid_ldap_attribute",
			AttributeKind::String,
			"Attribute holding a stable unique ID.",
		))
		.attribute(Attribute::required(
			"user_object_classes",
			AttributeKind::List,
			"Object classes of user entries.",
		))
		.attribute(Attribute::required(
			"connection_url",
			AttributeKind::String,
			"LDAP connection URL.",
		))
		.attribute(Attribute::required("users_dn", AttributeKind::String, "Base DN of users."))
		.attribute(Attribute::optional("bind_dn", AttributeKind::String, "DN used to bind."))
		.attribute(
			Attribute::optional("bind_credential", AttributeKind::String, "Bind password.")
				.sensitive(),
		)
		.attribute(Attribute::optional(
			"custom_user_search_filter",
			AttributeKind::String,
			"Extra filter applied to user searches.",
		))
		.attribute(
			Attribute::optional("search_scope", AttributeKind::String, "`ONE_LEVEL` or `SUBTREE`.")
				.default_value("ONE_LEVEL"),
		)
		.attribute(Attribute::optional(
			"validate_password_policy",
			AttributeKind::Bool,
			"Checks the realm password policy before updating LDAP.",
		))
		.attribute(Attribute::optional(
			"trust_email",
			AttributeKind::Bool,
			"Treats LDAP e-mail addresses as verified.",
		))
		.attribute(
			Attribute::optional(
				"use_truststore_spi",
				AttributeKind::String,
				"`ldapsOnly`, `always` or `never`.",
			)
			.default_value("ldapsOnly"),
		)
		.attribute(Attribute::optional(
			"connection_timeout",
			AttributeKind::Int,
			"Connection timeout in milliseconds.",
		))
		.attribute(Attribute::optional(
			"read_timeout",
			AttributeKind::Int,
			"Read timeout in milliseconds.",
		))
		.attribute(
			Attribute::optional("pagination", AttributeKind::Bool, "Uses paged results.")
				.default_value("true"),
		)
		.attribute(
			Attribute::optional("batch_size_for_sync", AttributeKind::Int, "Sync page size.")
				.default_value("1000"),
		)
		.attribute(Attribute::optional(
			"full_sync_period",
			AttributeKind::Int,
			"Full sync period in seconds; `-1` disables it.",
		))
		.attribute(Attribute::optional(
			"changed_sync_period",
			AttributeKind::Int,
			"Changed-users sync period in seconds; `-1` disables it.",
		))
		.attribute(
			Attribute::optional("cache_policy", AttributeKind::String, "Cache policy.")
				.default_value("DEFAULT"),
		)
		.import(ImportFormat::new(&["realm_id", "id"]))
		.build()
}

/// Schema of `keycloak_ldap_user_attribute_mapper`.
pub fn user_attribute_mapper_schema() -> Result<ResourceSchema, SchemaError> {
	mapper_schema(
		"keycloak_ldap_user_attribute_mapper",
		"Maps an LDAP attribute onto a user attribute.",
	)
	.attribute(Attribute::required(
		"user_model_attribute",
		AttributeKind::String,
		"User model attribute.",
	))
	.attribute(Attribute::required("ldap_attribute", AttributeKind::String, "LDAP attribute."))
	.attribute(Attribute::optional("read_only", AttributeKind::Bool, "Never writes to LDAP."))
	.attribute(Attribute::optional(
		"always_read_value_from_ldap",
		AttributeKind::Bool,
		"Ignores the locally imported value.",
	))
	.attribute(Attribute::optional(
		"is_mandatory_in_ldap",
		AttributeKind::Bool,
		"Requires the attribute when creating LDAP users.",
	))
	.attribute(Attribute::optional(
		"attribute_default_value",
		AttributeKind::String,
		"Value written when a mandatory attribute is missing.",
	))
	.build()
}

/// Schema of `keycloak_ldap_full_name_mapper`.
pub fn full_name_mapper_schema() -> Result<ResourceSchema, SchemaError> {
	mapper_schema(
		"keycloak_ldap_full_name_mapper",
		"Maps one LDAP attribute onto the first and last name.",
	)
	.attribute(Attribute::required(
		"ldap_full_name_attribute",
		AttributeKind::String,
		"LDAP attribute holding the full name.",
	))
	.attribute(Attribute::optional("read_only", AttributeKind::Bool, "Never writes to LDAP."))
	.attribute(Attribute::optional("write_only", AttributeKind::Bool, "Never reads from LDAP."))
	.build()
}

/// Schema of `keycloak_ldap_group_mapper`.
pub fn group_mapper_schema() -> Result<ResourceSchema, SchemaError> {
	mapper_schema("keycloak_ldap_group_mapper", "Maps LDAP groups onto realm groups.")
		.attribute(Attribute::required(
			"ldap_groups_dn",
			AttributeKind::String,
			"Base DN of group entries.",
		))
		.attribute(Attribute::required(
			"group_name_ldap_attribute",
			AttributeKind::String,
			"Attribute holding the group name.",
		))
		.attribute(Attribute::required(
			"group_object_classes",
			AttributeKind::List,
			"Object classes of group entries.",
		))
		.attribute(
			Attribute::optional(
				"preserve_group_inheritance",
				AttributeKind::Bool,
				"Keeps the LDAP group hierarchy.",
			)
			.default_value("true"),
		)
		.attribute(Attribute::optional(
			"ignore_missing_groups",
			AttributeKind::Bool,
			"Skips missing groups in the hierarchy.",
		))
		.attribute(Attribute::required(
			"membership_ldap_attribute",
			AttributeKind::String,
			"Attribute listing group members.",
		))
		.attribute(
			Attribute::optional(
				"membership_attribute_type",
				AttributeKind::String,
				"`DN` or `UID`.",
			)
				.default_value("DN"),
		)
		.attribute(Attribute::required(
			"membership_user_ldap_attribute",
			AttributeKind::String,
			"User attribute referenced by the membership attribute.",
		))
		.attribute(Attribute::optional(
			"groups_ldap_filter",
			AttributeKind::String,
			"Extra filter applied to group searches; must start with `(`.",
		))
		.attribute(
			Attribute::optional(
				"mode",
				AttributeKind::String,
				"`READ_ONLY`, `IMPORT` or `LDAP_ONLY`.",
			)
				.default_value("READ_ONLY"),
		)
		.attribute(
			Attribute::optional(
				"user_roles_retrieve_strategy",
				AttributeKind::String,
				"Group lookup strategy.",
			)
			.default_value("LOAD_GROUPS_BY_MEMBER_ATTRIBUTE"),
		)
		.attribute(
			Attribute::optional(
				"memberof_ldap_attribute",
				AttributeKind::String,
				"Attribute read by the `memberOf` strategy.",
			)
			.default_value("memberOf"),
		)
		.attribute(Attribute::optional(
			"mapped_group_attributes",
			AttributeKind::List,
			"LDAP attributes copied onto realm groups.",
		))
		.attribute(Attribute::optional(
			"drop_non_existing_groups_during_sync",
			AttributeKind::Bool,
			"Removes realm groups missing from LDAP on sync.",
		))
		.attribute(Attribute::optional(
			"groups_path",
			AttributeKind::String,
			"Realm group path receiving the LDAP groups.",
		))
		.build()
}

/// Schema of `keycloak_ldap_hardcoded_role_mapper`.
pub fn hardcoded_role_mapper_schema() -> Result<ResourceSchema, SchemaError> {
	mapper_schema("keycloak_ldap_hardcoded_role_mapper", "Grants a fixed role to every LDAP user.")
		.attribute(Attribute::required(
			"role",
			AttributeKind::String,
			"Role name; client roles use `clientId.roleName`.",
		))
		.build()
}

/// Schema of `keycloak_ldap_msad_user_account_control_mapper`.
pub fn msad_user_account_control_mapper_schema() -> Result<ResourceSchema, SchemaError> {
	mapper_schema(
		"keycloak_ldap_msad_user_account_control_mapper",
		"Maps Active Directory `userAccountControl` flags onto user state.",
	)
	.attribute(Attribute::optional(
		"ldap_password_policy_hints_enabled",
		AttributeKind::Bool,
		"Requests AD password policy hints.",
	))
	.build()
}

fn mapper_schema(type_name: &str, description: &str) -> ResourceSchemaBuilder {
	ResourceSchema::builder(type_name)
		.description(description)
		.attribute(Attribute::computed("id", AttributeKind::String, "Component ID."))
		.attribute(Attribute::required("realm_id", AttributeKind::String, "Owning realm."))
		.attribute(Attribute::required(
			"ldap_user_federation_id",
			AttributeKind::String,
			"ID of the owning LDAP user federation.",
		))
		.attribute(Attribute::required("name", AttributeKind::String, "Display name."))
		.import(ImportFormat::new(&["realm_id", "ldap_user_federation_id", "id"]))
}
