//! Per-entity CRUD wrappers over the admin API.
//!
//! Each submodule mirrors one family of server representations (`camelCase` on the wire,
//! unknown fields ignored, unset options omitted) and adds inherent async methods to
//! [`KeycloakClient`](crate::client::KeycloakClient). Paths are relative to the admin root.
//! Every caller-supplied path segment (realm names, role names, aliases, IDs) is percent-encoded.

pub mod client;
pub mod client_scope;
pub mod group;
pub mod identity_provider;
pub mod protocol_mapper;
pub mod realm;
pub mod role;
pub mod user;

pub use client::{ClientRepresentation, CredentialRepresentation, ScopeBinding};
pub use client_scope::ClientScopeRepresentation;
pub use group::GroupRepresentation;
pub use identity_provider::{IdentityProviderMapperRepresentation, IdentityProviderRepresentation};
pub use protocol_mapper::{ProtocolMapperParent, ProtocolMapperRepresentation};
pub use realm::RealmRepresentation;
pub use role::{RoleContainer, RoleRepresentation};
pub use user::UserRepresentation;

// self
use crate::client::escape;

pub(crate) fn realm_path(realm: &str) -> String {
	format!("/realms/{}", escape(realm))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn reserved_characters_stay_inside_one_segment() {
		assert_eq!(realm_path("acme"), "/realms/acme");
		assert_eq!(realm_path("ops#1/eu west"), "/realms/ops%231%2Feu%20west");
		assert_eq!(group::group_path("ops", "a?b"), "/realms/ops/groups/a%3Fb");
	}
}
