//! # Configuration Loader / 配置加载器
//!
//! Reads a TOML file into a [`ChooserConfig`] DTO. No defaults are computed
//! here; [`wiring`](super::wiring) applies them.
//!
//! 只负责读取和解析，默认值由 wiring 决定。

use std::path::Path;

use anyhow::Context;
use fc_core::ChooserConfig;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// **NO validation is performed**: empty strings and missing sections map to
/// empty values.
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
/// 无法读取文件或内容不是有效 TOML 时返回错误。
pub fn load_config(config_path: impl AsRef<Path>) -> anyhow::Result<ChooserConfig> {
    let config_path = config_path.as_ref();
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    ChooserConfig::from_toml(&toml_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    /// Test that valid TOML is parsed correctly
    /// 测试有效 TOML 被正确解析
    #[test]
    fn test_load_config_reads_valid_toml() {
        let toml_content = r#"
            [chooser]
            package_id = "com.pichs.app"
            authority = "com.pichs.app.files"
            crop_size = 400

            [request_codes]
            camera = 33

            [platform]
            api_level = 19
            pictures_dir = "/sdcard/Pictures/app"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.package_id, "com.pichs.app");
        assert_eq!(config.authority, "com.pichs.app.files");
        assert_eq!(config.crop_size, Some(400));
        assert_eq!(config.camera_code, Some(33));
        assert_eq!(config.api_level, Some(19));
        assert_eq!(config.pictures_dir, PathBuf::from("/sdcard/Pictures/app"));
    }

    #[test]
    fn test_load_config_missing_file_reports_path() {
        let err = load_config("/nonexistent/filechooser.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/filechooser.toml"));
    }

    #[test]
    fn test_load_config_rejects_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[chooser\npackage_id = ").unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }
}
