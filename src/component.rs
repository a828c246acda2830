//! Generic components and the helpers that fold their config maps into typed models.
//!
//! The server stores LDAP federation, LDAP mappers, key providers and other extension points
//! as components: a name, a provider ID, a provider type, a parent and a config map whose values
//! are always lists of strings. [`ComponentConfig`] gives typed access to that map and
//! [`ComponentModel`] ties a typed struct to its provider.

pub mod keys;
pub mod ldap;

pub use keys::*;
pub use ldap::*;

// self
use crate::{
	_prelude::*,
	client::{KeycloakClient, escape},
	resources::realm_path,
};

/// Errors raised while folding a component config into a typed model.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ComponentConfigError {
	/// A required key is absent or empty.
	#[error("Component config is missing `{key}`.")]
	MissingKey {
		/// Config key.
		key: String,
	},
	/// A value could not be parsed into the expected type.
	#[error("Component config `{key}` has invalid value `{value}`, expected {expected}.")]
	Invalid {
		/// Config key.
		key: String,
		/// Raw value found in the map.
		value: String,
		/// Human-readable description of the accepted values.
		expected: &'static str,
	},
	/// The component belongs to a different provider than the requested model.
	#[error("Component provider `{found}` does not match `{expected}`.")]
	ProviderMismatch {
		/// Provider ID of the requested model.
		expected: &'static str,
		/// Provider ID reported by the server.
		found: String,
	},
}
impl ComponentConfigError {
	fn invalid(key: &str, value: &str, expected: &'static str) -> Self {
		Self::Invalid { key: key.into(), value: value.into(), expected }
	}
}

/// Server-side component representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRepresentation {
	/// Server-assigned ID.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Display name.
	pub name: String,
	/// Provider implementation, e.g. `ldap` or `rsa-generated`.
	pub provider_id: String,
	/// Extension point, e.g. `org.keycloak.keys.KeyProvider`.
	pub provider_type: String,
	/// Owning realm ID or parent component ID.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_id: Option<String>,
	/// Optional provider sub type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sub_type: Option<String>,
	/// Multi-valued config map.
	#[serde(default)]
	pub config: ComponentConfig,
}
impl ComponentRepresentation {
	/// Creates a representation for `M` with an empty config.
	pub fn for_model<M>(name: impl Into<String>, parent_id: impl Into<String>) -> Self
	where
		M: ComponentModel,
	{
		Self {
			id: None,
			name: name.into(),
			provider_id: M::PROVIDER_ID.into(),
			provider_type: M::PROVIDER_TYPE.into(),
			parent_id: Some(parent_id.into()),
			sub_type: None,
			config: ComponentConfig::default(),
		}
	}

	/// Fails unless the component was created by `M`'s provider.
	pub fn ensure_provider<M>(&self) -> Result<(), ComponentConfigError>
	where
		M: ComponentModel,
	{
		if self.provider_id == M::PROVIDER_ID {
			Ok(())
		} else {
			Err(ComponentConfigError::ProviderMismatch {
				expected: M::PROVIDER_ID,
				found: self.provider_id.clone(),
			})
		}
	}

	/// Returns the parent ID or an empty string.
	pub fn parent(&self) -> String {
		self.parent_id.clone().unwrap_or_default()
	}
}

/// Config values that map onto a fixed set of strings.
pub trait ConfigValue: Sized {
	/// Description used in [`ComponentConfigError::Invalid`].
	const EXPECTED: &'static str;

	/// Parses the raw config string.
	fn from_config(raw: &str) -> Option<Self>;

	/// Returns the raw config string.
	fn as_config(&self) -> &'static str;
}

/// Defines a `Copy` enum whose variants map onto fixed config strings.
macro_rules! config_enum {
	(
		$(#[$meta:meta])*
		$vis:vis enum $name:ident {
			$($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Clone, Copy, Debug, PartialEq, Eq)]
		$vis enum $name {
			$($(#[$vmeta])* $variant),+
		}
		impl $crate::component::ConfigValue for $name {
			const EXPECTED: &'static str = concat!("one of:", $(" ", $value),+);

			fn from_config(raw: &str) -> Option<Self> {
				match raw {
					$($value => Some(Self::$variant),)+
					_ => None,
				}
			}

			fn as_config(&self) -> &'static str {
				match self {
					$(Self::$variant => $value),+
				}
			}
		}
		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
				f.write_str($crate::component::ConfigValue::as_config(self))
			}
		}
	};
}
pub(crate) use config_enum;

/// String-keyed, multi-valued component config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentConfig(BTreeMap<String, Vec<String>>);
impl ComponentConfig {
	/// Returns the first value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).and_then(|values| values.first()).map(String::as_str)
	}

	/// Returns the first value under `key` when it is non-empty.
	pub fn non_empty(&self, key: &str) -> Option<&str> {
		self.get(key).filter(|value| !value.is_empty())
	}

	/// Returns the first value under `key`, failing when absent or empty.
	pub fn require(&self, key: &str) -> Result<&str, ComponentConfigError> {
		self.non_empty(key).ok_or_else(|| ComponentConfigError::MissingKey { key: key.into() })
	}

	/// Returns the first non-empty value under `key` as an owned string.
	pub fn string(&self, key: &str) -> Option<String> {
		self.non_empty(key).map(ToOwned::to_owned)
	}

	/// Returns every value stored under `key`.
	pub fn multi(&self, key: &str) -> &[String] {
		self.0.get(key).map(Vec::as_slice).unwrap_or_default()
	}

	/// Splits the first value under `key` on commas, trimming and skipping empty items.
	pub fn list(&self, key: &str) -> Vec<String> {
		self.get(key)
			.map(|raw| {
				raw.split(',')
					.map(str::trim)
					.filter(|item| !item.is_empty())
					.map(ToOwned::to_owned)
					.collect()
			})
			.unwrap_or_default()
	}

	/// Parses a boolean, falling back to `default` when absent or empty.
	pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ComponentConfigError> {
		match self.non_empty(key) {
			None => Ok(default),
			Some(raw) if raw.eq_ignore_ascii_case("true") => Ok(true),
			Some(raw) if raw.eq_ignore_ascii_case("false") => Ok(false),
			Some(raw) => Err(ComponentConfigError::invalid(key, raw, "true or false")),
		}
	}

	/// Parses an integer, falling back to `default` when absent or empty.
	pub fn int_or<T>(&self, key: &str, default: T) -> Result<T, ComponentConfigError>
	where
		T: FromStr,
	{
		Ok(self.int(key)?.unwrap_or(default))
	}

	/// Parses an optional integer.
	pub fn int<T>(&self, key: &str) -> Result<Option<T>, ComponentConfigError>
	where
		T: FromStr,
	{
		self.non_empty(key)
			.map(|raw| {
				raw.trim().parse().map_err(|_| ComponentConfigError::invalid(key, raw, "an integer"))
			})
			.transpose()
	}

	/// Parses a sync period in seconds; `-1` (or absence) disables the sync.
	pub fn period(&self, key: &str) -> Result<Option<u32>, ComponentConfigError> {
		match self.non_empty(key).map(str::trim) {
			None | Some("-1") => Ok(None),
			Some(raw) => raw
				.parse()
				.map(Some)
				.map_err(|_| ComponentConfigError::invalid(key, raw, "a period in seconds or -1")),
		}
	}

	/// Parses an enumerated value, falling back to `default` when absent or empty.
	pub fn value_or<T>(&self, key: &str, default: T) -> Result<T, ComponentConfigError>
	where
		T: ConfigValue,
	{
		Ok(self.value(key)?.unwrap_or(default))
	}

	/// Parses an optional enumerated value.
	pub fn value<T>(&self, key: &str) -> Result<Option<T>, ComponentConfigError>
	where
		T: ConfigValue,
	{
		self.non_empty(key)
			.map(|raw| {
				T::from_config(raw).ok_or_else(|| ComponentConfigError::invalid(key, raw, T::EXPECTED))
			})
			.transpose()
	}

	/// Stores a single value.
	pub fn set(&mut self, key: &str, value: impl ToString) -> &mut Self {
		self.0.insert(key.into(), vec![value.to_string()]);

		self
	}

	/// Stores a single value when present; `None` leaves the map untouched.
	pub fn set_opt<V>(&mut self, key: &str, value: Option<V>) -> &mut Self
	where
		V: ToString,
	{
		if let Some(value) = value {
			self.set(key, value);
		}

		self
	}

	/// Stores an enumerated value.
	pub fn set_value<T>(&mut self, key: &str, value: T) -> &mut Self
	where
		T: ConfigValue,
	{
		self.set(key, value.as_config())
	}

	/// Stores a sync period, writing `-1` for `None`.
	pub fn set_period(&mut self, key: &str, period: Option<u32>) -> &mut Self {
		match period {
			Some(secs) => self.set(key, secs),
			None => self.set(key, "-1"),
		}
	}

	/// Joins `items` with commas into a single value.
	pub fn set_list<S>(&mut self, key: &str, items: &[S]) -> &mut Self
	where
		S: AsRef<str>,
	{
		let joined = items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");

		self.set(key, joined)
	}

	/// Stores every value of `values` under `key`.
	pub fn set_multi(&mut self, key: &str, values: Vec<String>) -> &mut Self {
		self.0.insert(key.into(), values);

		self
	}

	/// Returns `true` if `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Iterates over the raw entries.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.0.iter().map(|(key, values)| (key.as_str(), values.as_slice()))
	}
}
impl From<BTreeMap<String, Vec<String>>> for ComponentConfig {
	fn from(map: BTreeMap<String, Vec<String>>) -> Self {
		Self(map)
	}
}
impl<K, V> FromIterator<(K, V)> for ComponentConfig
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self(iter.into_iter().map(|(key, value)| (key.into(), vec![value.into()])).collect())
	}
}

/// Typed view of one component provider.
pub trait ComponentModel: Sized {
	/// Provider implementation ID (`providerId`).
	const PROVIDER_ID: &'static str;
	/// Extension point the provider plugs into (`providerType`).
	const PROVIDER_TYPE: &'static str;

	/// Unfolds the model into a component representation.
	fn to_component(&self) -> ComponentRepresentation;

	/// Folds a component representation into the model.
	fn from_component(component: &ComponentRepresentation) -> Result<Self, ComponentConfigError>;
}

impl KeycloakClient {
	/// Creates a component and returns its ID.
	pub async fn create_component(
		&self,
		realm: &str,
		component: &ComponentRepresentation,
	) -> Result<String> {
		self.post(&components_path(realm), component).await
	}

	/// Reads a component by ID.
	pub async fn get_component(&self, realm: &str, id: &str) -> Result<ComponentRepresentation> {
		self.get(&component_path(realm, id)).await
	}

	/// Replaces a component.
	pub async fn update_component(
		&self,
		realm: &str,
		id: &str,
		component: &ComponentRepresentation,
	) -> Result<()> {
		self.put(&component_path(realm, id), component).await
	}

	/// Deletes a component.
	pub async fn delete_component(&self, realm: &str, id: &str) -> Result<()> {
		self.delete(&component_path(realm, id)).await
	}

	/// Lists components, optionally filtered by parent ID and provider type.
	pub async fn list_components(
		&self,
		realm: &str,
		parent: Option<&str>,
		provider_type: Option<&str>,
	) -> Result<Vec<ComponentRepresentation>> {
		let mut query = Vec::new();

		if let Some(parent) = parent {
			query.push(("parent", parent));
		}
		if let Some(provider_type) = provider_type {
			query.push(("type", provider_type));
		}

		self.get_query(&components_path(realm), &query).await
	}

	/// Creates the component described by `model` and returns its ID.
	pub async fn create_model<M>(&self, realm: &str, model: &M) -> Result<String>
	where
		M: ComponentModel,
	{
		self.create_component(realm, &model.to_component()).await
	}

	/// Reads a component and folds it into `M`.
	pub async fn get_model<M>(&self, realm: &str, id: &str) -> Result<M>
	where
		M: ComponentModel,
	{
		let component = self.get_component(realm, id).await?;

		Ok(M::from_component(&component)?)
	}

	/// Replaces the component `id` with `model`.
	pub async fn update_model<M>(&self, realm: &str, id: &str, model: &M) -> Result<()>
	where
		M: ComponentModel,
	{
		let mut component = model.to_component();

		component.id = Some(id.into());

		self.update_component(realm, id, &component).await
	}

	/// Lists every `M` under `parent`, skipping components of other providers.
	pub async fn list_models<M>(&self, realm: &str, parent: &str) -> Result<Vec<M>>
	where
		M: ComponentModel,
	{
		self.list_components(realm, Some(parent), Some(M::PROVIDER_TYPE))
			.await?
			.iter()
			.filter(|component| component.provider_id == M::PROVIDER_ID)
			.map(|component| M::from_component(component).map_err(Error::from))
			.collect()
	}
}

fn components_path(realm: &str) -> String {
	format!("{}/components", realm_path(realm))
}

fn component_path(realm: &str, id: &str) -> String {
	format!("{}/components/{}", realm_path(realm), escape(id))
}
