use std::path::Path;
use std::path::PathBuf;

use chrono::FixedOffset;
use serde::Deserialize;
use serde::Serialize;

use crate::StencilError;
use crate::StencilResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["stencil.toml", ".stencil.toml", ".config/stencil.toml"];

/// Default plural locale when a config file does not set one.
pub const DEFAULT_LOCALE: &str = "en";

/// Defaults applied by the template functions when a call leaves an argument
/// out.
///
/// ```toml
/// [plural]
/// default_locale = "fr"
///
/// [sort]
/// collation = "sv"
///
/// [datetime]
/// utc_offset_minutes = 120
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StencilConfig {
	#[serde(default)]
	pub plural: PluralConfig,
	#[serde(default)]
	pub sort: SortConfig,
	#[serde(default)]
	pub datetime: DateTimeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluralConfig {
	/// Locale used by `pluralSelect` when no locale is passed.
	#[serde(default = "default_locale")]
	pub default_locale: String,
}

impl Default for PluralConfig {
	fn default() -> Self {
		Self {
			default_locale: default_locale(),
		}
	}
}

fn default_locale() -> String {
	DEFAULT_LOCALE.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortConfig {
	/// BCP 47 tag used for string ordering when a call passes none.
	#[serde(default)]
	pub collation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateTimeConfig {
	/// Minutes east of UTC to render dates in. When absent dates render in
	/// the host's local time zone.
	#[serde(default)]
	pub utc_offset_minutes: Option<i32>,
}

impl StencilConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> StencilResult<Option<Self>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded stencil config");

		Ok(Some(config))
	}

	/// Parse a config from TOML text.
	pub fn from_toml(content: &str) -> StencilResult<Self> {
		let config: Self = toml::from_str(content).map_err(|e| StencilError::ConfigParse(e.to_string()))?;

		if let (Some(minutes), None) = (config.datetime.utc_offset_minutes, config.utc_offset()) {
			return Err(StencilError::ConfigParse(format!(
				"`datetime.utc_offset_minutes` must be between -1439 and 1439, got {minutes}"
			)));
		}

		Ok(config)
	}

	/// The configured fixed offset, or `None` to use the host time zone.
	pub fn utc_offset(&self) -> Option<FixedOffset> {
		self.datetime
			.utc_offset_minutes
			.and_then(|minutes| minutes.checked_mul(60))
			.and_then(FixedOffset::east_opt)
	}

	/// The configured collation tag, if any.
	pub fn collation(&self) -> Option<&str> {
		self.sort.collation.as_deref()
	}
}
