//! Strongly typed identifiers used when building admin paths and token requests.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 255;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (realm, client).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (realm, client).
		kind: &'static str,
	},
	/// The identifier contains a path separator and would escape its URL segment.
	#[error("{kind} identifier contains a '/'.")]
	ContainsSlash {
		/// Kind of identifier (realm, client).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (realm, client).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { RealmName, "Name of a realm, used both for login and in admin paths.", "Realm" }
def_id! { AdminClientId, "OAuth client identifier the provider logs in with.", "Client" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.contains('/') {
		return Err(IdentifierError::ContainsSlash { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_path_breaking_values() {
		assert!(RealmName::new("").is_err());
		assert!(RealmName::new(" master").is_err());
		assert!(matches!(
			RealmName::new("a/b"),
			Err(IdentifierError::ContainsSlash { kind: "Realm" })
		));

		let realm = RealmName::new("master").expect("Realm fixture should be valid.");

		assert_eq!(realm.as_ref(), "master");
		assert_eq!(format!("{realm:?}"), "Realm(master)");
	}

	#[test]
	fn serde_enforces_validation() {
		let client: AdminClientId =
			serde_json::from_str("\"admin-cli\"").expect("Client id should deserialize.");

		assert_eq!(&*client, "admin-cli");
		assert!(serde_json::from_str::<AdminClientId>("\"admin cli\"").is_err());
	}

	#[test]
	fn length_limit_is_inclusive() {
		RealmName::new("r".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert!(RealmName::new("r".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}

	#[test]
	fn borrow_supports_lookup_by_str() {
		let map: HashMap<RealmName, u8> = HashMap::from_iter([(
			RealmName::new("master").expect("Realm used for lookup should be valid."),
			1_u8,
		)]);

		assert_eq!(map.get("master"), Some(&1));
	}
}
