//! Render configuration files (YAML, or JSON by extension).

use std::path::Path;

use anyhow::{Context, Result};

use renderer::RenderConfig;

/// Load a [`RenderConfig`] from a `.yaml`/`.yml` or `.json` file.
///
/// Missing keys keep their defaults.
pub fn load_render_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        return RenderConfig::from_file(path)
            .with_context(|| format!("Failed to load render config from {:?}", path));
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read render config from {:?}", path))?;
    parse_render_config_yaml(&content)
        .with_context(|| format!("Failed to parse render config from {:?}", path))
}

pub fn parse_render_config_yaml(content: &str) -> Result<RenderConfig> {
    // An empty document means "all defaults".
    if content.trim().is_empty() {
        return Ok(RenderConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_overrides() {
        let yaml = r##"
boost: 0.75
weights_adjustment_enabled: true
grouping:
  merge_distance: 6.0
ramp:
  stops:
    - { position: 0.0, color: "#00000000" }
    - { position: 1.0, color: "#FFFFFF" }
"##;
        let config = parse_render_config_yaml(yaml).unwrap();
        assert_eq!(config.boost, 0.75);
        assert!(config.weights_adjustment_enabled);
        assert!(config.grouping_enabled);
        assert_eq!(config.grouping.merge_distance, 6.0);
        assert_eq!(config.ramp.unwrap().stops.len(), 2);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(parse_render_config_yaml("\n").unwrap(), RenderConfig::default());
    }

    #[test]
    fn test_bad_yaml() {
        assert!(parse_render_config_yaml("boost: [1, 2").is_err());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("render.JSON");
        std::fs::write(&json_path, r#"{ "boost": 0.4, "grouping_enabled": false }"#).unwrap();
        let config = load_render_config(&json_path).unwrap();
        assert_eq!(config.boost, 0.4);
        assert!(!config.grouping_enabled);

        let yaml_path = dir.path().join("render.yaml");
        std::fs::write(&yaml_path, "boost: 0.6\n").unwrap();
        assert_eq!(load_render_config(&yaml_path).unwrap().boost, 0.6);

        assert!(load_render_config(dir.path().join("missing.json")).is_err());
    }
}
