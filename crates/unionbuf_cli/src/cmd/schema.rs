use unionbuf::union::Result;

use crate::cmd::util::DescArgs;

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub desc: DescArgs,
	/// Emit JSON instead of the text table.
	#[arg(long)]
	pub json: bool,
}

/// Print the schema derived from a description.
pub fn run(args: Args) -> Result<()> {
	let Args { desc, json } = args;
	let schema = desc.load()?;

	if json {
		println!("{}", serde_json::to_string_pretty(&schema)?);
		return Ok(());
	}

	println!("path: {}", desc.path.display());
	println!("name: {}", schema.name().unwrap_or("<anonymous>"));
	println!("buffer_size: {}", schema.buffer_size());
	println!("field_count: {}", schema.len());
	for field in schema.fields() {
		let vis = if field.exported { "exported" } else { "private" };
		println!("  {} {} kind={} size={} align={} {vis}", field.name, field.ty, field.kind, field.byte_size, field.align);
	}

	Ok(())
}
