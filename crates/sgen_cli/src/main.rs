use std::path::PathBuf;
use std::process;

use clap::Parser;
use sgen::AnyEmptyResult;
use sgen::AnyResult;
use sgen::PropertyMap;
use sgen::SgenConfig;
use sgen::generate;
use sgen_cli::Commands;
use sgen_cli::SgenCli;
use sgen_cli::TemplateArgs;

fn main() {
	let args = SgenCli::parse();

	let result = match args.command {
		Some(Commands::Expand { template, output }) => {
			run_expand(&template, output.as_deref(), args.verbose)
		}
		Some(Commands::Check { template }) => run_check(&template, args.verbose),
		None => {
			eprintln!("No subcommand specified. Run `sgen --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		eprintln!("error: {e}");
		process::exit(1);
	}
}

fn run_expand(
	template: &TemplateArgs,
	output: Option<&std::path::Path>,
	verbose: bool,
) -> AnyEmptyResult {
	let source = std::fs::read_to_string(&template.input)?;
	let (mut properties, piece_files) = load_environment(template)?;

	let generated = generate(&source, &mut properties, &piece_files);
	if let Some(error) = generated.error {
		return Err(error.into());
	}

	if verbose {
		eprintln!(
			"{}: {} bytes in, {} bytes out, {} piece file(s), {} properties",
			template.input.display(),
			source.len(),
			generated.source.len(),
			piece_files.len(),
			properties.len()
		);
	}

	match output {
		Some(path) => std::fs::write(path, generated.source)?,
		None => print!("{}", generated.source),
	}

	Ok(())
}

fn run_check(template: &TemplateArgs, verbose: bool) -> AnyEmptyResult {
	let source = std::fs::read_to_string(&template.input)?;
	let (mut properties, piece_files) = load_environment(template)?;

	let generated = generate(&source, &mut properties, &piece_files);
	if let Some(error) = generated.error {
		if verbose {
			eprintln!("partial output was {} bytes", generated.source.len());
		}
		return Err(error.into());
	}

	println!(
		"{}: expands cleanly ({} bytes)",
		template.input.display(),
		generated.source.len()
	);

	Ok(())
}

/// Build the property environment and piece-file contents for a run: config
/// file first (when given), then `-D` overrides, then the config's piece
/// paths followed by `--piece` arguments.
fn load_environment(template: &TemplateArgs) -> AnyResult<(PropertyMap, Vec<String>)> {
	let mut properties = PropertyMap::new();
	let mut piece_paths: Vec<PathBuf> = Vec::new();

	if let Some(config_path) = &template.config {
		let config = SgenConfig::load_file(config_path)?;
		properties = config.property_map();

		// Piece paths are relative to the config file's directory.
		let base = config_path.parent().unwrap_or_else(|| std::path::Path::new("."));
		piece_paths.extend(config.pieces.paths.iter().map(|path| base.join(path)));
	}

	for define in &template.defines {
		let (name, value) = parse_define(define)?;
		properties.set(name, value);
	}

	piece_paths.extend(template.pieces.iter().cloned());

	let mut piece_files = Vec::with_capacity(piece_paths.len());
	for path in &piece_paths {
		piece_files.push(std::fs::read_to_string(path)?);
	}

	Ok((properties, piece_files))
}

/// Split a `-D` definition into name and value. A bare name defaults to 1.
fn parse_define(text: &str) -> AnyResult<(&str, i32)> {
	match text.split_once('=') {
		Some((name, value)) => {
			let value = value
				.parse()
				.map_err(|_| format!("invalid value in definition `{text}` (expected an integer)"))?;
			Ok((name, value))
		}
		None => Ok((text, 1)),
	}
}
