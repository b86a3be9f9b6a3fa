use crate::error::SgenError;
use crate::error::SgenResult;
use crate::passes::collect_pieces;
use crate::passes::insert_pieces;
use crate::passes::parse_counter;
use crate::passes::parse_foreach;
use crate::passes::parse_math;
use crate::passes::parse_properties;
use crate::properties::PiecesMap;
use crate::properties::PropertyMap;

/// Outcome of a [`generate`] run. On failure `source` holds the output of
/// the last pass that completed, so callers can still inspect (or log) the
/// partially expanded text alongside the diagnostic.
#[derive(Debug)]
pub struct Generated {
	/// The expanded source, or the partially transformed buffer on failure.
	pub source: String,
	/// The first diagnostic reported by a pass, if any.
	pub error: Option<SgenError>,
}

impl Generated {
	fn ok(source: String) -> Self {
		Self {
			source,
			error: None,
		}
	}

	fn failed(source: String, error: SgenError) -> Self {
		Self {
			source,
			error: Some(error),
		}
	}

	/// Returns true when every pass completed without a diagnostic.
	pub fn is_ok(&self) -> bool {
		self.error.is_none()
	}

	/// Collapse into a plain result, discarding the partial output on
	/// failure.
	pub fn into_result(self) -> SgenResult<String> {
		match self.error {
			None => Ok(self.source),
			Some(error) => Err(error),
		}
	}
}

/// Expand a shader template against a property environment.
///
/// Each piece file contributes `@piece` bodies (but no output text), then
/// the main buffer runs the full pipeline: arithmetic, loops, conditional
/// blocks, piece collection, piece insertion, and finally the emitting
/// counter family. The pass order is load-bearing: `@pset` arithmetic is
/// visible to `@foreach` bounds and `@property` expressions, pieces are
/// collected before they can be inserted, and `@counter`/`@value` observe
/// the cumulative property state.
///
/// The first failing pass stops the pipeline; the outcome then carries the
/// last completed buffer plus the diagnostic.
pub fn generate(source: &str, properties: &mut PropertyMap, piece_files: &[String]) -> Generated {
	let mut pieces = PiecesMap::default();

	for piece_file in piece_files {
		if let Err(error) = collect_pieces_from(piece_file, properties, &mut pieces) {
			return Generated::failed(source.to_string(), error);
		}
	}

	let current = source.to_string();
	let current = match parse_math(&current, properties) {
		Ok(next) => next,
		Err(error) => return Generated::failed(current, error),
	};
	let current = match parse_foreach(&current, properties) {
		Ok(next) => next,
		Err(error) => return Generated::failed(current, error),
	};
	let current = match parse_properties(&current, properties) {
		Ok(next) => next,
		Err(error) => return Generated::failed(current, error),
	};
	let current = match collect_pieces(&current, &mut pieces) {
		Ok(next) => next,
		Err(error) => return Generated::failed(current, error),
	};
	let current = match insert_pieces(&current, &pieces) {
		Ok(next) => next,
		Err(error) => return Generated::failed(current, error),
	};
	let current = match parse_counter(&current, properties) {
		Ok(next) => next,
		Err(error) => return Generated::failed(current, error),
	};

	Generated::ok(current)
}

/// Run the piece-file pipeline: the file's arithmetic, loops and
/// conditional blocks are expanded first, so piece bodies are captured
/// post-expansion.
fn collect_pieces_from(
	source: &str,
	properties: &mut PropertyMap,
	pieces: &mut PiecesMap,
) -> SgenResult<()> {
	let buffer = parse_math(source, properties)?;
	let buffer = parse_foreach(&buffer, properties)?;
	let buffer = parse_properties(&buffer, properties)?;
	collect_pieces(&buffer, pieces)?;

	Ok(())
}
