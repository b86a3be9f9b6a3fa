use crate::error::SgenError;
use crate::error::SgenResult;
use crate::properties::PropertyMap;
use crate::scanner::find_closing_paren;
use crate::substr::SubStr;

/// One node of a parsed boolean expression: either a token (`a`, `&&`,
/// `||`) or a parenthesized group holding its children.
#[derive(Debug, Default)]
struct ExprNode {
	value: String,
	negated: bool,
	children: Vec<ExprNode>,
}

enum ExprKind {
	Var,
	And,
	Or,
	Object,
}

fn classify(node: &ExprNode) -> ExprKind {
	if node.value == "&&" {
		ExprKind::And
	} else if node.value == "||" {
		ExprKind::Or
	} else if !node.children.is_empty() {
		ExprKind::Object
	} else {
		ExprKind::Var
	}
}

/// Evaluate the boolean expression the window is positioned inside (just
/// past the opening `(` of `@property(...)`). Advances the window past the
/// matching `)`.
///
/// Operators have no precedence: siblings fold left-to-right with a latched
/// AND/OR mode, so `a || b && c` evaluates as `((a || b) && c)`. This is a
/// documented contract of the directive language; changing it would
/// silently alter the meaning of existing shader templates.
pub(crate) fn evaluate_expression(
	sub: &mut SubStr<'_>,
	properties: &PropertyMap,
) -> SgenResult<bool> {
	let close = find_closing_paren(sub)?;
	let inner = SubStr::bounded(sub.buffer(), sub.start(), sub.start() + close);
	sub.set_start(sub.start() + close + 1);

	let line = inner.line_number();
	let children = parse_nodes(inner.as_str(), line)?;

	// The whole expression evaluates as a single root group. An empty
	// expression is then a lookup of the empty property name, which reads 0.
	let root = ExprNode {
		children,
		..ExprNode::default()
	};
	evaluate_nodes(std::slice::from_ref(&root), properties, line)
}

/// Structural pass: split the text into sibling tokens, descending into
/// parenthesized groups. `!` negates the next token or group; `&&`/`||`
/// coalesce by repeated-character matching, so any other operator-character
/// run becomes an ordinary (and later rejected) token.
fn parse_nodes(text: &str, line: usize) -> SgenResult<Vec<ExprNode>> {
	let mut frames: Vec<(Vec<ExprNode>, bool)> = Vec::new();
	let mut current: Vec<ExprNode> = Vec::new();
	let mut text_started = false;
	let mut negate_next = false;

	for byte in text.bytes() {
		match byte {
			b'(' => {
				frames.push((std::mem::take(&mut current), negate_next));
				text_started = false;
				negate_next = false;
			}
			b')' => {
				let Some((mut parent, negated)) = frames.pop() else {
					return Err(SgenError::UnbalancedParenthesis { line });
				};
				parent.push(ExprNode {
					negated,
					children: std::mem::take(&mut current),
					..ExprNode::default()
				});
				current = parent;
				text_started = false;
			}
			b' ' | b'\t' | b'\n' | b'\r' => text_started = false,
			b'!' => negate_next = true,
			_ => {
				if !text_started {
					text_started = true;
					current.push(ExprNode {
						negated: negate_next,
						..ExprNode::default()
					});
				}
				if byte == b'&' || byte == b'|' {
					if negate_next {
						return Err(SgenError::InvalidExpression {
							line,
							token: (byte as char).to_string(),
						});
					}
					// `&&`/`||` grow the previous token only while the
					// character repeats; `&|` starts a new token.
					let split = current.last().is_some_and(|node| {
						!node.value.is_empty() && node.value.as_bytes().last() != Some(&byte)
					});
					if split {
						current.push(ExprNode::default());
					}
				}
				if let Some(node) = current.last_mut() {
					node.value.push(byte as char);
				}
				negate_next = false;
			}
		}
	}

	if !frames.is_empty() {
		return Err(SgenError::UnbalancedParenthesis { line });
	}

	Ok(current)
}

enum FoldItem {
	Operator { and_mode: bool },
	Operand(bool),
}

/// Validate a sibling list (operands and operators must alternate, starting
/// and ending with an operand), resolve each operand against the property
/// map, then fold left-to-right with the latched AND/OR mode.
fn evaluate_nodes(
	nodes: &[ExprNode],
	properties: &PropertyMap,
	line: usize,
) -> SgenResult<bool> {
	let mut items = Vec::with_capacity(nodes.len());
	let mut last_was_operator = true;

	for node in nodes {
		match classify(node) {
			kind @ (ExprKind::And | ExprKind::Or) => {
				if last_was_operator {
					return Err(SgenError::InvalidExpression {
						line,
						token: node.value.clone(),
					});
				}
				items.push(FoldItem::Operator {
					and_mode: matches!(kind, ExprKind::And),
				});
				last_was_operator = true;
			}
			kind @ (ExprKind::Var | ExprKind::Object) => {
				if !last_was_operator {
					return Err(SgenError::InvalidExpression {
						line,
						token: node.value.clone(),
					});
				}
				let result = match kind {
					ExprKind::Var => properties.get(node.value.as_str()) != 0,
					_ => evaluate_nodes(&node.children, properties, line)?,
				};
				items.push(FoldItem::Operand(node.negated != result));
				last_was_operator = false;
			}
		}
	}

	if last_was_operator && !nodes.is_empty() {
		let token = nodes.last().map(|node| node.value.clone()).unwrap_or_default();
		return Err(SgenError::InvalidExpression { line, token });
	}

	let mut result = true;
	let mut and_mode = true;

	for item in items {
		match item {
			FoldItem::Operator { and_mode: mode } => and_mode = mode,
			FoldItem::Operand(value) => {
				result = if and_mode {
					result && value
				} else {
					result || value
				};
			}
		}
	}

	Ok(result)
}
