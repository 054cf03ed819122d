//! Renderer configuration.
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Flags consumed by [`crate::lower`]. Loadable from a JSON file; every
/// field is optional there.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Render optional string (and time-as-string) fields as `*string`
    /// instead of relying on the zero value.
    pub string_pointers_when_key_missing: bool,
    /// Render timestamp fields as `string` instead of `time.Time`.
    pub time_as_str: bool,
    /// Struct tag key, `json` in `` `json:"key"` ``.
    pub tag_name: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            string_pointers_when_key_missing: false,
            time_as_str: false,
            tag_name: "json".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        crate::path_de::from_str_with_path(&src)
    }

    #[must_use]
    pub fn string_pointers_when_key_missing(mut self, value: bool) -> Self {
        self.string_pointers_when_key_missing = value;
        self
    }

    #[must_use]
    pub fn time_as_str(mut self, value: bool) -> Self {
        self.time_as_str = value;
        self
    }

    #[must_use]
    pub fn tag_name(mut self, value: impl Into<String>) -> Self {
        self.tag_name = value.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"time_as_str": true, "tag_name": "yaml"}}"#).unwrap();
        let config = RenderConfig::load(file.path()).unwrap();
        assert_eq!(config, RenderConfig::new().time_as_str(true).tag_name("yaml"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"omit_empty": true}}"#).unwrap();
        assert!(matches!(RenderConfig::load(file.path()), Err(Error::JsonPath { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RenderConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
