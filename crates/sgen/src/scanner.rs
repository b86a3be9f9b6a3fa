use crate::error::SgenError;
use crate::error::SgenResult;
use crate::substr::SubStr;

/// Directives that open a block closed by `@end`.
const BLOCK_NAMES: [&str; 3] = ["foreach", "property", "piece"];

/// Find the `@end` closing the block that `sub` starts inside, honoring
/// nested `@foreach`/`@property`/`@piece` blocks. On success the window is
/// truncated to end just before the closing `@end`; the text after it is
/// left unconsumed for the caller.
pub(crate) fn find_block_end(sub: &mut SubStr<'_>) -> SgenResult<()> {
	let bytes = sub.buffer().as_bytes();
	let mut pos = sub.start();
	let mut nesting: i32 = 0;

	while pos < sub.end() && nesting >= 0 {
		if bytes[pos] == b'@' {
			let rest = &sub.buffer()[pos + 1..sub.end()];
			if rest.starts_with("end") {
				nesting -= 1;
				pos += "end".len();
			} else if let Some(name) = BLOCK_NAMES.iter().find(|name| rest.starts_with(**name)) {
				nesting += 1;
				pos += name.len() + 1;
			}
		}
		pos += 1;
	}

	if nesting < 0 {
		sub.set_end(pos - "@end".len());
		Ok(())
	} else {
		Err(SgenError::UnclosedBlock {
			line: sub.line_number(),
		})
	}
}

/// Offset, relative to the window start, of the `)` that closes the
/// argument list or expression the window is positioned inside. The window
/// starts just past the opening `(`, so the depth count begins at zero.
pub(crate) fn find_closing_paren(sub: &SubStr<'_>) -> SgenResult<usize> {
	let mut nesting: i32 = 0;

	for (pos, byte) in sub.as_str().bytes().enumerate() {
		match byte {
			b'(' => nesting += 1,
			b')' => {
				nesting -= 1;
				if nesting < 0 {
					return Ok(pos);
				}
			}
			_ => {}
		}
	}

	Err(SgenError::UnbalancedParenthesis {
		line: sub.line_number(),
	})
}

#[derive(PartialEq, Eq)]
enum ArgState {
	Empty,
	InToken,
	AfterToken,
}

/// Parse the comma-separated argument list the window is positioned inside
/// (just past the opening `(`). Advances the window past the matching `)`.
/// Arguments come back whitespace-trimmed; `(`, `)`, `@`, `&` and `|` are
/// rejected inside the list, as is a token following another token without
/// a separator.
pub(crate) fn parse_args(sub: &mut SubStr<'_>) -> SgenResult<Vec<String>> {
	let close = find_closing_paren(sub)?;
	let inner = SubStr::bounded(sub.buffer(), sub.start(), sub.start() + close);
	sub.set_start(sub.start() + close + 1);

	let mut args = vec![String::new()];
	let mut state = ArgState::Empty;

	for byte in inner.as_str().bytes() {
		match byte {
			b'(' | b')' | b'@' | b'&' | b'|' => {
				return Err(SgenError::ForbiddenArgumentChar {
					line: inner.line_number(),
					ch: byte as char,
				});
			}
			b' ' | b'\t' | b'\n' | b'\r' => {
				if state == ArgState::InToken {
					state = ArgState::AfterToken;
				}
			}
			b',' => {
				state = ArgState::Empty;
				args.push(String::new());
			}
			_ => {
				if state == ArgState::AfterToken {
					return Err(SgenError::ArgumentSeparatorExpected {
						line: inner.line_number(),
					});
				}
				if let Some(arg) = args.last_mut() {
					arg.push(byte as char);
				}
				state = ArgState::InToken;
			}
		}
	}

	Ok(args)
}
