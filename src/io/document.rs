use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};

use crate::service::MemoryStore;

use super::DocumentFormat;

/// Parse a config document into a store.
pub fn parse_store(contents: &str, format: DocumentFormat) -> Result<MemoryStore> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str(contents).context("failed to parse JSON config document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str(contents).context("failed to parse YAML config document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            toml::from_str(contents).context("failed to parse TOML config document")
        }
    }
}

pub fn render_store(store: &MemoryStore, format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Json => {
            serde_json::to_string_pretty(store).context("failed to serialize JSON")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(store).context("failed to serialize YAML"),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::to_string_pretty(store).context("failed to serialize TOML"),
    }
}

fn format_of(path: &Path) -> Result<DocumentFormat> {
    DocumentFormat::from_path(path)
        .ok_or_else(|| anyhow!("unsupported config document format: {}", path.display()))
}

pub fn load_store(path: &Path) -> Result<MemoryStore> {
    let format = format_of(path)?;
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_store(&contents, format).with_context(|| format!("in {}", path.display()))
}

/// Write the store, replacing the file in one rename.
pub fn write_store(path: &Path, store: &MemoryStore) -> Result<()> {
    let format = format_of(path)?;
    let mut payload = render_store(store, format)?;
    if !payload.ends_with('\n') {
        payload.push('\n');
    }
    let staging = path.with_extension(format!("{format}.tmp"));
    fs::write(&staging, payload)
        .with_context(|| format!("failed to write {}", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("failed to replace {}", path.display()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::FieldType;

    #[test]
    fn parses_namespaces_presets_and_model_groups() {
        let store = parse_store(
            r#"{
                "namespaces": {
                    "system": [
                        {"key": "name", "type": "str", "value": "bot", "required": true}
                    ]
                },
                "presets": [{"id": 1, "title": "Helper"}],
                "model_groups": {"chat": {"model_type": "chat", "models": ["a"]}}
            }"#,
            DocumentFormat::Json,
        )
        .unwrap();
        let item = &store.namespaces["system"][0];
        assert_eq!(item.kind, FieldType::Str);
        assert_eq!(item.value, json!("bot"));
        assert!(item.required);
        assert_eq!(store.presets[0].title, "Helper");
        assert_eq!(store.model_groups["chat"].models, vec!["a".to_string()]);
    }

    #[test]
    fn written_documents_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = parse_store(
            r#"{"namespaces": {"system": [{"key": "port", "type": "int", "value": 80}]}}"#,
            DocumentFormat::Json,
        )
        .unwrap();
        write_store(&path, &store).unwrap();
        assert_eq!(load_store(&path).unwrap(), store);
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        let err = load_store(Path::new("config.ini")).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }
}
