//! Writes the provider and resource reference pages as markdown.
//!
//! ```sh
//! cargo run --features docsgen --bin docsgen -- --output docs
//! ```

// std
use std::path::PathBuf;
// crates.io
use clap::Parser;
use color_eyre::{Result, eyre::WrapErr};
// self
use keycloak_provider::{docs, schema::ProviderSchema};

/// Markdown reference generator for the Keycloak provider.
#[derive(Debug, Parser)]
#[command(name = "docsgen", version, about)]
struct Args {
	/// Directory receiving `index.md` and `resources/*.md`.
	#[arg(long, short, env = "DOCSGEN_OUTPUT", default_value = "docs")]
	output: PathBuf,
	/// Prints the page paths instead of writing them.
	#[arg(long)]
	dry_run: bool,
}

fn main() -> Result<()> {
	color_eyre::install()?;

	let args = Args::parse();
	let schema = ProviderSchema::registry()?;

	if args.dry_run {
		println!("{}", args.output.join("index.md").display());

		for resource in &schema.resources {
			println!("{}", args.output.join("resources").join(docs::page_name(resource)).display());
		}

		return Ok(());
	}

	let written = docs::write_all(&schema, &args.output)
		.wrap_err_with(|| format!("failed to write docs under {}", args.output.display()))?;

	println!("Wrote {} pages under {}.", written.len(), args.output.display());

	Ok(())
}
