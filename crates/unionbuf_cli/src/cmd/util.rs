use std::path::Path;

use unionbuf::union::{BuildOptions, BuildPolicy, Result, Schema};

/// Shared description-loading flags.
#[derive(clap::Args, Debug, Clone)]
pub struct DescArgs {
	/// JSON aggregate description.
	pub path: std::path::PathBuf,
	/// Accept handle/dynamic-size field kinds as opaque words.
	#[arg(long)]
	pub permissive: bool,
}

impl DescArgs {
	/// Build options selected by the flags.
	pub(crate) fn build_options(&self) -> BuildOptions {
		BuildOptions {
			policy: if self.permissive { BuildPolicy::Permissive } else { BuildPolicy::Strict },
			..BuildOptions::default()
		}
	}

	/// Load and build the schema.
	pub(crate) fn load(&self) -> Result<Schema> {
		load_schema(&self.path, &self.build_options())
	}
}

fn load_schema(path: &Path, opt: &BuildOptions) -> Result<Schema> {
	log::debug!("loading description {}", path.display());
	Schema::from_path(path, opt)
}

/// Render bytes as space-separated lowercase hex.
pub(crate) fn hex(bytes: &[u8]) -> String {
	bytes.iter().map(|byte| format!("{byte:02x}")).collect::<Vec<_>>().join(" ")
}

/// Derive a wrapper type name from the schema name.
pub(crate) fn default_wrapper_name(schema: &Schema) -> String {
	format!("{}Union", schema.name().unwrap_or("Anonymous"))
}
