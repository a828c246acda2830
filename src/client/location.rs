//! Entity IDs carried by `Location` headers of create responses.

// std
use std::borrow::Cow;

/// Extracts the created entity's ID from a `Location` header value.
///
/// The ID is the last non-empty `/`-separated segment once any query string or fragment is
/// removed, so a bare relative value such as `u-1` is its own ID. Values without a non-empty
/// segment yield `None`.
pub fn id_from_location(location: &str) -> Option<&str> {
	let end = location.find(['?', '#']).unwrap_or(location.len());
	let path = location[..end].trim();

	path.trim_end_matches('/').rsplit('/').next().filter(|segment| !segment.is_empty())
}

/// Percent-encodes a value for use as a single path segment.
///
/// Unreserved characters (`A-Z a-z 0-9 - . _ ~`) pass through; every other byte is encoded.
pub fn escape(segment: &str) -> Cow<'_, str> {
	urlencoding::encode(segment)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn location_yields_last_segment() {
		assert_eq!(
			id_from_location(
				"https://sso.example.com/admin/realms/test/clients/0c2e9f7a-5d1b-4d9a-9a43-0d6e6c5b1f12"
			),
			Some("0c2e9f7a-5d1b-4d9a-9a43-0d6e6c5b1f12")
		);
		assert_eq!(id_from_location("/admin/realms/test/groups/g-1/"), Some("g-1"));
		assert_eq!(id_from_location("/admin/realms/test/users/u-1?first=0#top"), Some("u-1"));
	}

	#[test]
	fn relative_location_is_its_own_id() {
		assert_eq!(id_from_location("u-1"), Some("u-1"));
		assert_eq!(id_from_location("u-1/"), Some("u-1"));
	}

	#[test]
	fn location_without_segments_is_rejected() {
		assert_eq!(id_from_location(""), None);
		assert_eq!(id_from_location("?first=0"), None);
		assert_eq!(id_from_location("/"), None);
		assert_eq!(id_from_location("//"), None);
	}

	#[test]
	fn escape_encodes_reserved_bytes_only() {
		assert_eq!(escape("offline_access"), "offline_access");
		assert_eq!(escape("realm admin/ops"), "realm%20admin%2Fops");
		assert_eq!(escape("ü"), "%C3%BC");
		assert_eq!(escape("ops#1?x%"), "ops%231%3Fx%25");
	}
}
