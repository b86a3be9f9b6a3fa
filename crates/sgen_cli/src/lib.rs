use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct SgenCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Print processing detail to stderr.
	#[arg(short, long, global = true)]
	pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Expand a shader template and print (or write) the result.
	Expand {
		#[command(flatten)]
		template: TemplateArgs,

		/// Write the expanded source here instead of stdout.
		#[arg(short, long, value_name = "FILE")]
		output: Option<PathBuf>,
	},
	/// Run the expansion pipeline and report diagnostics only.
	Check {
		#[command(flatten)]
		template: TemplateArgs,
	},
}

/// The template plus its property environment, shared by both subcommands.
#[derive(Args)]
pub struct TemplateArgs {
	/// The shader template to expand.
	pub input: PathBuf,

	/// Property definition, `name` or `name=value` (bare names default
	/// to 1). May be given multiple times; overrides config values.
	#[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]")]
	pub defines: Vec<String>,

	/// Piece file collected before the main template, in order. May be
	/// given multiple times.
	#[arg(short, long = "piece", value_name = "FILE")]
	pub pieces: Vec<PathBuf>,

	/// Config file declaring starting properties and piece files.
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,
}
