//! Server version discovery used to gate version-dependent behavior.

// std
use std::cmp::Ordering;
// self
use crate::_prelude::*;

/// Subset of `GET /admin/serverinfo` the client relies on.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
	/// System information block.
	#[serde(default)]
	pub system_info: SystemInfo,
}

/// `systemInfo` block of the server info response.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
	/// Version string such as `24.0.4` or `7.6.0.GA`.
	#[serde(default)]
	pub version: String,
	/// Server time as rendered by the server.
	#[serde(default)]
	pub server_time: Option<String>,
}

/// Error returned when a version string cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unrecognized server version `{0}`.")]
pub struct VersionParseError(pub String);

/// Numeric `major.minor.patch` server version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeycloakVersion {
	/// Major component.
	pub major: u64,
	/// Minor component.
	pub minor: u64,
	/// Patch component.
	pub patch: u64,
}
impl KeycloakVersion {
	/// Creates a version from its components.
	pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
		Self { major, minor, patch }
	}

	/// Parses a version string, ignoring qualifiers such as `-SNAPSHOT`, `.Final`, or
	/// `.redhat-00001`. Missing minor/patch components default to zero.
	pub fn parse(raw: &str) -> Result<Self, VersionParseError> {
		let mut parts = [0_u64; 3];
		let mut seen = 0;

		for (idx, piece) in raw.trim().split(['.', '-']).take(3).enumerate() {
			match piece.parse::<u64>() {
				Ok(value) => {
					parts[idx] = value;
					seen += 1;
				},
				Err(_) => break,
			}
		}

		if seen == 0 {
			return Err(VersionParseError(raw.to_owned()));
		}

		Ok(Self::new(parts[0], parts[1], parts[2]))
	}

	/// Parses a Red Hat SSO version and maps it to the upstream release it is built from.
	///
	/// Non-`7.x` versions are returned unchanged.
	pub fn parse_red_hat_sso(raw: &str) -> Result<Self, VersionParseError> {
		let version = Self::parse(raw)?;

		if version.major != 7 {
			return Ok(version);
		}

		let upstream = match version.minor {
			0..=3 => Self::new(4, 8, 3),
			4 => Self::new(9, 0, 3),
			5 => Self::new(15, 0, 2),
			_ => Self::new(18, 0, 0),
		};

		Ok(upstream)
	}

	/// Returns `true` if `self >= other`.
	pub fn is_at_least(&self, other: KeycloakVersion) -> bool {
		self.cmp(&other) != Ordering::Less
	}
}
impl Display for KeycloakVersion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
	}
}
impl FromStr for KeycloakVersion {
	type Err = VersionParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parse_ignores_qualifiers() {
		assert_eq!(KeycloakVersion::parse("24.0.4"), Ok(KeycloakVersion::new(24, 0, 4)));
		assert_eq!(KeycloakVersion::parse("26.1.0-SNAPSHOT"), Ok(KeycloakVersion::new(26, 1, 0)));
		assert_eq!(KeycloakVersion::parse("11.0.3.Final"), Ok(KeycloakVersion::new(11, 0, 3)));
		assert_eq!(KeycloakVersion::parse("999"), Ok(KeycloakVersion::new(999, 0, 0)));
		assert!(KeycloakVersion::parse("nightly").is_err());
	}

	#[test]
	fn red_hat_sso_maps_to_upstream() {
		assert_eq!(
			KeycloakVersion::parse_red_hat_sso("7.6.0.GA"),
			Ok(KeycloakVersion::new(18, 0, 0))
		);
		assert_eq!(
			KeycloakVersion::parse_red_hat_sso("7.4.2.GA"),
			Ok(KeycloakVersion::new(9, 0, 3))
		);
		assert_eq!(
			KeycloakVersion::parse_red_hat_sso("24.0.1"),
			Ok(KeycloakVersion::new(24, 0, 1))
		);
	}

	#[test]
	fn comparisons_are_component_wise() {
		let v = KeycloakVersion::new(21, 1, 2);

		assert!(v.is_at_least(KeycloakVersion::new(21, 1, 2)));
		assert!(v.is_at_least(KeycloakVersion::new(20, 9, 9)));
		assert!(!v.is_at_least(KeycloakVersion::new(21, 2, 0)));
	}
}
