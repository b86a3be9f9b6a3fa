//! The pass transformers. Each pass consumes the whole buffer, copies
//! everything outside its own directives verbatim, and produces a fresh
//! buffer; the property map and piece library are the only shared state.

use crate::error::SgenError;
use crate::error::SgenResult;
use crate::expression::evaluate_expression;
use crate::properties::IdString;
use crate::properties::PiecesMap;
use crate::properties::PropertyMap;
use crate::scanner::find_block_end;
use crate::scanner::parse_args;
use crate::substr::SubStr;

/// Integer operation applied to a destination property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithOp {
	Set,
	Add,
	Sub,
	Mul,
	Div,
	Mod,
}

impl ArithOp {
	/// Apply the operation. Arithmetic wraps; a zero divisor yields `None`.
	fn apply(self, op1: i32, op2: i32) -> Option<i32> {
		match self {
			Self::Set => Some(op2),
			Self::Add => Some(op1.wrapping_add(op2)),
			Self::Sub => Some(op1.wrapping_sub(op2)),
			Self::Mul => Some(op1.wrapping_mul(op2)),
			Self::Div => (op2 != 0).then(|| op1.wrapping_div(op2)),
			Self::Mod => (op2 != 0).then(|| op1.wrapping_rem(op2)),
		}
	}
}

/// The silent arithmetic family, handled before `@foreach` so loop bounds
/// see the mutations.
const MATH_OPS: [(&str, ArithOp); 6] = [
	("pset", ArithOp::Set),
	("padd", ArithOp::Add),
	("psub", ArithOp::Sub),
	("pmul", ArithOp::Mul),
	("pdiv", ArithOp::Div),
	("pmod", ArithOp::Mod),
];

#[derive(Clone, Copy)]
enum CounterOp {
	Counter,
	Value,
	Arith(ArithOp),
}

/// The emitting family, handled last so `@counter`/`@value` reflect the
/// cumulative property state.
const COUNTER_OPS: [(&str, CounterOp); 8] = [
	("counter", CounterOp::Counter),
	("value", CounterOp::Value),
	("set", CounterOp::Arith(ArithOp::Set)),
	("add", CounterOp::Arith(ArithOp::Add)),
	("sub", CounterOp::Arith(ArithOp::Sub)),
	("mul", CounterOp::Arith(ArithOp::Mul)),
	("div", CounterOp::Arith(ArithOp::Div)),
	("mod", CounterOp::Arith(ArithOp::Mod)),
];

/// Find the next `@keyword` whose name (the text between `@` and the first
/// space, tab or `(`) exactly matches a table entry. Returns the offset of
/// the `@` relative to the window start, the matched name, and the table
/// payload. Non-matching `@` words are skipped and copied through verbatim
/// by the caller.
fn next_directive<T: Copy>(
	sub: &SubStr<'_>,
	table: &[(&'static str, T)],
) -> Option<(usize, &'static str, T)> {
	let mut from = 0;

	while let Some(pos) = sub.find_from("@", from) {
		let word_end = sub.find_first_of(b" \t(", pos + 1).unwrap_or(sub.len());
		let word = SubStr::bounded(sub.buffer(), sub.start() + pos + 1, sub.start() + word_end);

		if let Some(&(name, payload)) = table.iter().find(|(name, _)| word.matches(name)) {
			return Some((pos, name, payload));
		}
		from = pos + 1;
	}

	None
}

/// A signed decimal literal, or the value of the named property when the
/// text is not a number.
fn resolve_operand(text: &str, properties: &PropertyMap) -> i32 {
	text.parse::<i32>().unwrap_or_else(|_| properties.get(text))
}

/// Execute one arithmetic directive: with two arguments `(dst, op2)` the
/// destination doubles as the source; with three it is `(dst, src, op2)`.
fn apply_arith(
	op: ArithOp,
	directive: &'static str,
	args: &[String],
	line: usize,
	properties: &mut PropertyMap,
) -> SgenResult<()> {
	let dst = &args[0];
	let (src, operand) = if args.len() == 3 {
		(&args[1], &args[2])
	} else {
		(&args[0], &args[1])
	};

	let op1 = properties.get(src);
	let op2 = resolve_operand(operand, properties);
	let Some(value) = op.apply(op1, op2) else {
		return Err(SgenError::DivisionByZero { line, directive });
	};
	properties.set(dst.as_str(), value);

	Ok(())
}

/// `@pset`/`@padd`/`@psub`/`@pmul`/`@pdiv`/`@pmod`: mutate the property
/// map, emit nothing.
pub fn parse_math(input: &str, properties: &mut PropertyMap) -> SgenResult<String> {
	let mut out = String::with_capacity(input.len());
	let mut sub = SubStr::new(input);

	while let Some((pos, name, op)) = next_directive(&sub, &MATH_OPS) {
		out.push_str(&sub.as_str()[..pos]);
		sub.set_start(sub.start() + pos + name.len() + 2);
		let line = sub.line_number();

		let args = parse_args(&mut sub)?;
		if args.len() < 2 || args.len() > 3 {
			return Err(SgenError::WrongArity {
				line,
				directive: name,
				expected: "two or three parameters",
			});
		}
		apply_arith(op, name, &args, line, properties)?;
	}

	out.push_str(sub.as_str());
	Ok(out)
}

/// Emit one loop iteration: the block body with every `@var` replaced by
/// the decimal index. The match is a plain prefix match on the text after
/// `@` with no word-boundary check, so with variable `i` an `@index` is
/// rewritten too.
fn emit_repeat(out: &mut String, body: &str, var: &str, index: i32) {
	if var.is_empty() {
		out.push_str(body);
		return;
	}

	let bytes = body.as_bytes();
	let mut copied = 0;
	let mut pos = 0;

	while pos < bytes.len() {
		if bytes[pos] == b'@' && body[pos + 1..].starts_with(var) {
			out.push_str(&body[copied..pos]);
			out.push_str(&index.to_string());
			pos += var.len() + 1;
			copied = pos;
		} else {
			pos += 1;
		}
	}

	out.push_str(&body[copied..]);
}

/// `@foreach(var, start, count) ... @end`: repeat the body for each index
/// in the half-open range `[start, count)`. The third argument is an
/// exclusive upper bound despite its historical name. Bounds are integer
/// literals or property lookups.
pub fn parse_foreach(input: &str, properties: &PropertyMap) -> SgenResult<String> {
	let mut out = String::with_capacity(input.len());
	let mut sub = SubStr::new(input);

	while let Some(pos) = sub.find("@foreach") {
		out.push_str(&sub.as_str()[..pos]);
		sub.set_start(sub.start() + pos + "@foreach(".len());
		let line = sub.line_number();

		let args = parse_args(&mut sub)?;
		if args.len() != 3 {
			return Err(SgenError::WrongArity {
				line,
				directive: "foreach",
				expected: "three parameters",
			});
		}

		let mut block = sub;
		find_block_end(&mut block)?;

		let var = &args[0];
		let start = resolve_operand(&args[1], properties);
		let count = resolve_operand(&args[2], properties);
		for index in start..count {
			emit_repeat(&mut out, block.as_str(), var, index);
		}

		sub.set_start(block.end() + "@end".len() + 1);
	}

	out.push_str(sub.as_str());
	Ok(out)
}

/// Re-run cap for the fixpoint passes. Property expansion strictly shrinks
/// the directive count each pass; the cap only bites on cyclic piece
/// graphs, which are a hard error rather than divergence.
fn fixpoint_cap(input: &str) -> usize {
	input.len().max(1)
}

/// `@property(expr) ... @end`: keep the body when the expression holds,
/// drop it otherwise. Re-runs until no `@property` remains so that bodies
/// revealed by an outer block are expanded too.
pub fn parse_properties(input: &str, properties: &PropertyMap) -> SgenResult<String> {
	let mut out = properties_pass(input, properties)?;
	let mut passes = 1;
	let max_passes = fixpoint_cap(input);

	while out.contains("@property") {
		if passes >= max_passes {
			return Err(SgenError::ExpansionOverflow {
				directive: "@property",
				passes,
			});
		}
		out = properties_pass(&out, properties)?;
		passes += 1;
	}

	Ok(out)
}

fn properties_pass(input: &str, properties: &PropertyMap) -> SgenResult<String> {
	let mut out = String::with_capacity(input.len());
	let mut sub = SubStr::new(input);

	while let Some(pos) = sub.find("@property") {
		out.push_str(&sub.as_str()[..pos]);
		sub.set_start(sub.start() + pos + "@property(".len());

		let result = evaluate_expression(&mut sub, properties)?;

		let mut block = sub;
		find_block_end(&mut block)?;
		if result {
			out.push_str(block.as_str());
		}

		sub.set_start(block.end() + "@end".len());
	}

	out.push_str(sub.as_str());
	Ok(out)
}

/// `@piece(name) ... @end`: register the body in the piece library and emit
/// nothing. Redefining a name is an error.
pub fn collect_pieces(input: &str, pieces: &mut PiecesMap) -> SgenResult<String> {
	let mut out = String::with_capacity(input.len());
	let mut sub = SubStr::new(input);

	while let Some(pos) = sub.find("@piece") {
		out.push_str(&sub.as_str()[..pos]);
		sub.set_start(sub.start() + pos + "@piece(".len());
		let line = sub.line_number();

		let args = parse_args(&mut sub)?;
		if args.len() != 1 {
			return Err(SgenError::WrongArity {
				line,
				directive: "piece",
				expected: "one parameter",
			});
		}

		let name = IdString::new(&args[0]);
		if pieces.contains_key(&name) {
			return Err(SgenError::DuplicatePiece {
				line,
				name: args[0].clone(),
			});
		}

		let mut block = sub;
		find_block_end(&mut block)?;
		pieces.insert(name, block.as_str().to_string());

		sub.set_start(block.end() + "@end".len() + 1);
	}

	out.push_str(sub.as_str());
	Ok(out)
}

/// `@insertpiece(name)`: splice in the named piece body, or nothing when
/// the piece is unknown. Re-runs until no `@insertpiece` remains so pieces
/// may reference other pieces; a reference cycle trips the pass cap.
pub fn insert_pieces(input: &str, pieces: &PiecesMap) -> SgenResult<String> {
	let mut out = insert_pass(input, pieces)?;
	let mut passes = 1;
	let max_passes = fixpoint_cap(input);

	while out.contains("@insertpiece") {
		if passes >= max_passes {
			return Err(SgenError::ExpansionOverflow {
				directive: "@insertpiece",
				passes,
			});
		}
		out = insert_pass(&out, pieces)?;
		passes += 1;
	}

	Ok(out)
}

fn insert_pass(input: &str, pieces: &PiecesMap) -> SgenResult<String> {
	let mut out = String::with_capacity(input.len());
	let mut sub = SubStr::new(input);

	while let Some(pos) = sub.find("@insertpiece") {
		out.push_str(&sub.as_str()[..pos]);
		sub.set_start(sub.start() + pos + "@insertpiece(".len());
		let line = sub.line_number();

		let args = parse_args(&mut sub)?;
		if args.len() != 1 {
			return Err(SgenError::WrongArity {
				line,
				directive: "insertpiece",
				expected: "one parameter",
			});
		}

		if let Some(body) = pieces.get(&IdString::new(&args[0])) {
			out.push_str(body);
		}
	}

	out.push_str(sub.as_str());
	Ok(out)
}

/// `@counter(x)`/`@value(x)` emit the decimal property value (`@counter`
/// post-increments); `@set`/`@add`/`@sub`/`@mul`/`@div`/`@mod` mutate
/// silently like their `p`-prefixed twins.
pub fn parse_counter(input: &str, properties: &mut PropertyMap) -> SgenResult<String> {
	let mut out = String::with_capacity(input.len());
	let mut sub = SubStr::new(input);

	while let Some((pos, name, op)) = next_directive(&sub, &COUNTER_OPS) {
		out.push_str(&sub.as_str()[..pos]);
		sub.set_start(sub.start() + pos + name.len() + 2);
		let line = sub.line_number();

		let args = parse_args(&mut sub)?;
		match op {
			CounterOp::Counter | CounterOp::Value => {
				if args.len() != 1 {
					return Err(SgenError::WrongArity {
						line,
						directive: name,
						expected: "one parameter",
					});
				}

				let value = properties.get(args[0].as_str());
				out.push_str(&value.to_string());
				if matches!(op, CounterOp::Counter) {
					properties.set(args[0].as_str(), value.wrapping_add(1));
				}
			}
			CounterOp::Arith(arith) => {
				if args.len() < 2 || args.len() > 3 {
					return Err(SgenError::WrongArity {
						line,
						directive: name,
						expected: "two or three parameters",
					});
				}
				apply_arith(arith, name, &args, line, properties)?;
			}
		}
	}

	out.push_str(sub.as_str());
	Ok(out)
}
