#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "unionbuf", about = "C-style union schema, access, and accessor generation tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the schema derived from a description.
	Schema(cmd::schema::Args),
	/// Render a typed accessor wrapper as Rust source.
	Wrap(cmd::wrap::Args),
	/// Apply writes to a fresh union and print reads.
	Poke(cmd::poke::Args),
}

fn main() {
	env_logger::init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> unionbuf::union::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Schema(args) => cmd::schema::run(args),
		Commands::Wrap(args) => cmd::wrap::run(args),
		Commands::Poke(args) => cmd::poke::run(args),
	}
}
