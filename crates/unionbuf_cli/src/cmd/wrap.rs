use std::fs;
use std::path::PathBuf;

use unionbuf::union::{RenderOptions, Result, generate, render};

use crate::cmd::util::{DescArgs, default_wrapper_name};

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub desc: DescArgs,
	/// Wrapper type name (defaults to `<Name>Union`).
	#[arg(long)]
	pub name: Option<String>,
	/// Crate path used by the generated code.
	#[arg(long = "crate-path", default_value = "::unionbuf")]
	pub crate_path: String,
	/// Write the source to a file instead of stdout.
	#[arg(long)]
	pub out: Option<PathBuf>,
}

/// Render accessor declarations for a description.
pub fn run(args: Args) -> Result<()> {
	let Args {
		desc,
		name,
		crate_path,
		out,
	} = args;
	let schema = desc.load()?;
	let type_name = name.unwrap_or_else(|| default_wrapper_name(&schema));

	let decl = generate(&schema, &type_name);
	let source = render(
		&decl,
		&RenderOptions {
			crate_path,
			..RenderOptions::default()
		},
	);

	match out {
		Some(path) => {
			fs::write(&path, source)?;
			log::info!("wrote {} ({} getters, {} setters)", path.display(), decl.getters.len(), decl.setters.len());
		}
		None => print!("{source}"),
	}

	Ok(())
}
