use std::hash::Hash;
use std::hash::Hasher;

use rustc_hash::FxHashMap;
use rustc_hash::FxHasher;

/// An interned identifier: a stable 64-bit hash of a name. Property and
/// piece names are hashed once when an argument list is parsed and compared
/// as integers afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdString(u64);

impl IdString {
	pub fn new(name: &str) -> Self {
		let mut hasher = FxHasher::default();
		name.as_bytes().hash(&mut hasher);
		Self(hasher.finish())
	}
}

impl From<&str> for IdString {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<&String> for IdString {
	fn from(name: &String) -> Self {
		Self::new(name)
	}
}

/// The integer environment the preprocessor evaluates against. Keys are
/// interned names; reading an undefined key yields 0.
#[derive(Debug, Default, Clone)]
pub struct PropertyMap {
	values: FxHashMap<IdString, i32>,
}

impl PropertyMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// The value of `key`, or 0 when the property was never set.
	pub fn get(&self, key: impl Into<IdString>) -> i32 {
		self.values.get(&key.into()).copied().unwrap_or(0)
	}

	pub fn set(&mut self, key: impl Into<IdString>, value: i32) {
		self.values.insert(key.into(), value);
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// The piece library: bodies captured by `@piece`, keyed by interned name,
/// spliced back in by `@insertpiece`.
pub type PiecesMap = FxHashMap<IdString, String>;
