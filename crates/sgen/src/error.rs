use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
pub enum SgenError {
	#[error(transparent)]
	#[diagnostic(code(sgen::io_error))]
	Io(#[from] std::io::Error),

	#[error("syntax error at line {line}: start block (e.g. @foreach, @property) without matching @end")]
	#[diagnostic(code(sgen::unclosed_block))]
	UnclosedBlock { line: usize },
	#[error("syntax error at line {line}: opening parenthesis without matching closure")]
	#[diagnostic(code(sgen::unbalanced_parenthesis))]
	UnbalancedParenthesis { line: usize },
	#[error("syntax error at line {line}: unrecognized token `{token}`")]
	#[diagnostic(code(sgen::invalid_expression))]
	InvalidExpression { line: usize, token: String },
	#[error("syntax error at line {line}: `{ch}` is not allowed in an argument list")]
	#[diagnostic(code(sgen::forbidden_argument_char))]
	ForbiddenArgumentChar { line: usize, ch: char },
	#[error("syntax error at line {line}: ',' or ')' expected")]
	#[diagnostic(code(sgen::argument_separator_expected))]
	ArgumentSeparatorExpected { line: usize },
	#[error("syntax error at line {line}: @{directive} expects {expected}")]
	#[diagnostic(code(sgen::wrong_arity))]
	WrongArity {
		line: usize,
		directive: &'static str,
		expected: &'static str,
	},
	#[error("error at line {line}: @piece `{name}` already defined")]
	#[diagnostic(code(sgen::duplicate_piece))]
	DuplicatePiece { line: usize, name: String },
	#[error("error at line {line}: @{directive} divides by zero")]
	#[diagnostic(code(sgen::division_by_zero))]
	DivisionByZero { line: usize, directive: &'static str },
	#[error("expansion did not settle after {passes} passes over `{directive}` (cyclic pieces?)")]
	#[diagnostic(code(sgen::expansion_overflow))]
	ExpansionOverflow {
		directive: &'static str,
		passes: usize,
	},
	#[error("failed to parse config file: {0}")]
	#[diagnostic(code(sgen::config_parse))]
	ConfigParse(String),
}

pub type SgenResult<T> = Result<T, SgenError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
