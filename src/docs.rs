//! Markdown rendering of the provider schema.
//!
//! Pages follow the registry layout: `index.md` documents the provider block and
//! `resources/<name>.md` documents each resource, where `<name>` drops the `keycloak_` prefix.

// std
use std::{
	fs, io,
	path::{Path, PathBuf},
};
// self
use crate::schema::{Attribute, Presence, ProviderSchema, ResourceSchema};

const TYPE_PREFIX: &str = "keycloak_";

/// Renders the provider index page.
pub fn render_index(provider: &ResourceSchema) -> String {
	let mut page = front_matter("Provider: Keycloak", &provider.description);

	push_line(&mut page, "# Keycloak Provider");
	push_line(&mut page, "");
	push_line(&mut page, &provider.description);
	push_line(&mut page, "");
	push_line(&mut page, "## Example Usage");
	push_line(&mut page, "");
	push_line(&mut page, "```hcl");
	push_line(&mut page, "provider \"keycloak\" {");

	for attribute in provider.arguments() {
		if attribute.presence == Presence::Required {
			push_line(&mut page, &format!("  {} = \"...\"", attribute.name));
		}
	}

	push_line(&mut page, "}");
	push_line(&mut page, "```");
	push_line(&mut page, "");
	render_arguments(&mut page, provider);

	page
}

/// Renders the page of one resource.
pub fn render_resource(resource: &ResourceSchema) -> String {
	let mut page = front_matter(&resource.type_name, &resource.description);

	push_line(&mut page, &format!("# {} (Resource)", resource.type_name));
	push_line(&mut page, "");
	push_line(&mut page, &resource.description);
	push_line(&mut page, "");
	render_arguments(&mut page, resource);

	let mut computed = resource.computed().peekable();

	if computed.peek().is_some() {
		push_line(&mut page, "## Attributes Reference");
		push_line(&mut page, "");

		for attribute in computed {
			let line = format!(
				"- `{}` ({}) {}",
				attribute.name,
				attribute.kind.as_str(),
				attribute.description
			);

			push_line(&mut page, &line);
		}

		push_line(&mut page, "");
	}
	if let Some(format) = resource.import {
		push_line(&mut page, "## Import");
		push_line(&mut page, "");
		push_line(&mut page, &format!("Resources can be imported using the format `{format}`."));
		push_line(&mut page, "");
		push_line(&mut page, "```shell");
		push_line(&mut page, &format!("terraform import {}.example {format}", resource.type_name));
		push_line(&mut page, "```");
	}

	page
}

/// Returns the page file name of a resource, e.g. `realm.md` for `keycloak_realm`.
pub fn page_name(resource: &ResourceSchema) -> String {
	let name = resource.type_name.strip_prefix(TYPE_PREFIX).unwrap_or(&resource.type_name);

	format!("{name}.md")
}

/// Writes every page under `dir` and returns the written paths.
pub fn write_all(schema: &ProviderSchema, dir: &Path) -> io::Result<Vec<PathBuf>> {
	let resources_dir = dir.join("resources");

	fs::create_dir_all(&resources_dir)?;

	let mut written = Vec::with_capacity(schema.resources.len() + 1);
	let index = dir.join("index.md");

	fs::write(&index, render_index(&schema.provider))?;
	written.push(index);

	for resource in &schema.resources {
		let path = resources_dir.join(page_name(resource));

		fs::write(&path, render_resource(resource))?;
		written.push(path);
	}

	Ok(written)
}

fn front_matter(title: &str, description: &str) -> String {
	let summary = description.lines().next().unwrap_or_default().replace('"', "\\\"");

	format!("---\npage_title: \"{title}\"\ndescription: \"{summary}\"\n---\n\n")
}

fn render_arguments(page: &mut String, schema: &ResourceSchema) {
	push_line(page, "## Argument Reference");
	push_line(page, "");

	for attribute in schema.arguments() {
		push_line(page, &argument_line(attribute));
	}

	push_line(page, "");
}

fn argument_line(attribute: &Attribute) -> String {
	let presence = if attribute.presence == Presence::Required { "Required" } else { "Optional" };
	let mut line = format!("- `{}` - ({presence}, {}", attribute.name, attribute.kind.as_str());

	if attribute.sensitive {
		line.push_str(", Sensitive");
	}

	line.push_str(&format!(") {}", attribute.description));

	if let Some(default) = attribute.default {
		line.push_str(&format!(" Defaults to `{default}`."));
	}

	line
}

fn push_line(page: &mut String, line: &str) {
	page.push_str(line);
	page.push('\n');
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::schema::{AttributeKind, ImportFormat};

	fn sample() -> ResourceSchema {
		ResourceSchema::builder("keycloak_sample")
			.description("Manages a sample.")
			.attribute(Attribute::computed("id", AttributeKind::String, "Sample ID."))
			.attribute(Attribute::required("realm_id", AttributeKind::String, "Owning realm."))
			.attribute(
				Attribute::optional("secret", AttributeKind::String, "Shared secret.").sensitive(),
			)
			.attribute(
				Attribute::optional("enabled", AttributeKind::Bool, "Whether it is on.")
					.default_value("true"),
			)
			.import(ImportFormat::new(&["realm_id", "id"]))
			.build()
			.expect("Sample schema should build.")
	}

	#[test]
	fn resource_page_lists_arguments_attributes_and_import() {
		let page = render_resource(&sample());

		assert!(page.starts_with("---\npage_title: \"keycloak_sample\"\n"));
		assert!(page.contains("# keycloak_sample (Resource)"));
		assert!(page.contains("- `realm_id` - (Required, string) Owning realm."));
		assert!(page.contains("- `secret` - (Optional, string, Sensitive) Shared secret."));
		assert!(
			page.contains("- `enabled` - (Optional, bool) Whether it is on. Defaults to `true`.")
		);
		assert!(page.contains("## Attributes Reference\n\n- `id` (string) Sample ID."));
		assert!(page.contains("terraform import keycloak_sample.example {{realm_id}}/{{id}}"));
		assert!(!page.contains("- `id` - ("));
	}

	#[test]
	fn page_names_drop_the_type_prefix() {
		assert_eq!(page_name(&sample()), "sample.md");
	}

	#[test]
	fn index_shows_required_provider_arguments() {
		let schema = ProviderSchema::registry().expect("Registry should build.");
		let page = render_index(&schema.provider);

		assert!(
			page.contains("provider \"keycloak\" {\n  url = \"...\"\n  client_id = \"...\"\n}")
		);
		assert!(page.contains("- `client_secret` - (Optional, string, Sensitive)"));
		assert!(!page.contains("## Import"));
	}
}
