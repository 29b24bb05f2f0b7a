use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One allow-listed channel. Matching is done on the display name, or on the
/// identifier when one is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub name: String,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelList {
    pub channels: Vec<ChannelEntry>,
}

impl ChannelList {
    /// Flattens the list into the selectors accepted by the report's
    /// channel allow-list (names plus any ids).
    #[must_use]
    pub fn selectors(&self) -> Vec<String> {
        self.channels
            .iter()
            .flat_map(|c| std::iter::once(c.name.clone()).chain(c.id.clone()))
            .collect()
    }
}

/// Load and validate a channel allow-list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_channel_list(path: &Path) -> Result<ChannelList, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ChannelsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let list: ChannelList = serde_yaml::from_str(&content)?;
    validate_channels(&list)?;
    Ok(list)
}

fn validate_channels(list: &ChannelList) -> Result<(), ConfigError> {
    if list.channels.is_empty() {
        return Err(ConfigError::Validation(
            "channel list must name at least one channel".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    for channel in &list.channels {
        let name = channel.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "channel name must be non-empty".to_string(),
            ));
        }
        if channel.id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "channel '{name}' has an empty id; omit the field instead"
            )));
        }
        if !seen_names.insert(name.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate channel name: '{name}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write yaml");
        file
    }

    #[test]
    fn loads_valid_channel_list() {
        let file = write_yaml(
            "channels:\n  - name: Alpha\n    id: https://youtube.com/@alpha\n  - name: Beta\n",
        );
        let list = load_channel_list(file.path()).unwrap();
        assert_eq!(list.channels.len(), 2);
        assert_eq!(list.channels[0].name, "Alpha");
        assert_eq!(
            list.channels[0].id.as_deref(),
            Some("https://youtube.com/@alpha")
        );
        assert!(list.channels[1].id.is_none());
    }

    #[test]
    fn selectors_include_names_and_ids() {
        let list = ChannelList {
            channels: vec![
                ChannelEntry {
                    name: "Alpha".to_string(),
                    id: Some("c1".to_string()),
                },
                ChannelEntry {
                    name: "Beta".to_string(),
                    id: None,
                },
            ],
        };
        assert_eq!(list.selectors(), vec!["Alpha", "c1", "Beta"]);
    }

    #[test]
    fn rejects_empty_list() {
        let file = write_yaml("channels: []\n");
        let err = load_channel_list(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got: {err:?}");
    }

    #[test]
    fn rejects_blank_name() {
        let file = write_yaml("channels:\n  - name: \"  \"\n");
        let err = load_channel_list(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got: {err:?}");
    }

    #[test]
    fn rejects_duplicate_names() {
        let file = write_yaml("channels:\n  - name: Alpha\n  - name: Alpha\n");
        let err = load_channel_list(file.path()).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")),
            "got: {err:?}"
        );
    }

    #[test]
    fn rejects_malformed_yaml() {
        let file = write_yaml("channels: [unterminated\n");
        let err = load_channel_list(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ChannelsFileParse(_)), "got: {err:?}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_channel_list(Path::new("/nonexistent/channels.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ChannelsFileIo { .. }), "got: {err:?}");
    }
}
