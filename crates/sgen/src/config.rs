use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::PropertyMap;
use crate::SgenError;
use crate::SgenResult;

/// Configuration loaded from an `sgen.toml` file.
///
/// ```toml
/// [properties]
/// diffuse_map = 1
/// num_lights = 4
///
/// [pieces]
/// paths = ["pieces/common.any", "pieces/lighting.any"]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SgenConfig {
	/// Starting property environment. Command-line definitions override
	/// these values.
	#[serde(default)]
	pub properties: HashMap<String, i32>,
	/// Piece file configuration.
	#[serde(default)]
	pub pieces: PiecesConfig,
}

/// Configuration for the piece files collected before the main buffer.
#[derive(Debug, Default, Deserialize)]
pub struct PiecesConfig {
	/// Paths to piece files, in collection order.
	/// These are relative to the config file's directory.
	#[serde(default)]
	pub paths: Vec<PathBuf>,
}

impl SgenConfig {
	/// Load the config from `sgen.toml` at the given root directory.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> SgenResult<Option<SgenConfig>> {
		let config_path = root.join("sgen.toml");

		if !config_path.exists() {
			return Ok(None);
		}

		Self::load_file(&config_path).map(Some)
	}

	/// Load the config from an explicit file path.
	pub fn load_file(path: &Path) -> SgenResult<SgenConfig> {
		let content = std::fs::read_to_string(path)?;
		let config: SgenConfig =
			toml::from_str(&content).map_err(|e| SgenError::ConfigParse(e.to_string()))?;

		Ok(config)
	}

	/// Seed a property map with the configured values.
	pub fn property_map(&self) -> PropertyMap {
		let mut properties = PropertyMap::new();
		for (name, value) in &self.properties {
			properties.set(name.as_str(), *value);
		}

		properties
	}
}
