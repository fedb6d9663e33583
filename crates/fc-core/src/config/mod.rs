//! # Configuration DTO / 配置 DTO
//!
//! Maps a TOML document onto [`ChooserConfig`]. Data only: missing keys become
//! empty strings, empty paths or `None`. Defaults are applied by whoever builds
//! the application from it.
//!
//! 只做 TOML → DTO 映射，不做校验，不计算默认值。

use std::path::PathBuf;

use crate::acquisition::{RequestCodes, SessionDefaults};

/// Chooser configuration DTO (pure data, no logic)
/// 选择器配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserConfig {
    /// Host package id (may be empty)
    pub package_id: String,

    /// File-provider authority override (empty means "derive from package id")
    pub authority: String,

    pub crop_size: Option<u32>,

    pub as_image: bool,

    pub gallery_code: Option<i32>,
    pub camera_code: Option<i32>,
    pub crop_code: Option<i32>,
    pub file_code: Option<i32>,

    /// Capability tier, as a platform API level
    pub api_level: Option<u32>,

    /// Directory layout overrides (path info only, no existence check)
    /// 目录覆盖（仅路径信息，不检查是否存在）
    pub storage_root: PathBuf,
    pub volumes_root: PathBuf,
    pub pictures_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub private_data_dir: PathBuf,
}

fn str_at<'a>(value: &'a toml::Value, section: &str, key: &str) -> Option<&'a str> {
    value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_str())
}

fn int_at(value: &toml::Value, section: &str, key: &str) -> Option<i64> {
    value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_integer())
}

fn path_at(value: &toml::Value, section: &str, key: &str) -> PathBuf {
    PathBuf::from(str_at(value, section, key).unwrap_or(""))
}

impl ChooserConfig {
    /// Create ChooserConfig from TOML value
    /// 从 TOML 值创建 ChooserConfig
    ///
    /// Out-of-range integers are treated as missing.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let code = |key: &str| int_at(toml_value, "request_codes", key).and_then(|v| i32::try_from(v).ok());

        Ok(Self {
            package_id: str_at(toml_value, "chooser", "package_id")
                .unwrap_or("")
                .to_string(),
            authority: str_at(toml_value, "chooser", "authority")
                .unwrap_or("")
                .to_string(),
            crop_size: int_at(toml_value, "chooser", "crop_size").and_then(|v| u32::try_from(v).ok()),
            as_image: toml_value
                .get("chooser")
                .and_then(|c| c.get("as_image"))
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            gallery_code: code("gallery"),
            camera_code: code("camera"),
            crop_code: code("crop"),
            file_code: code("file"),
            api_level: int_at(toml_value, "platform", "api_level").and_then(|v| u32::try_from(v).ok()),
            storage_root: path_at(toml_value, "platform", "storage_root"),
            volumes_root: path_at(toml_value, "platform", "volumes_root"),
            pictures_dir: path_at(toml_value, "platform", "pictures_dir"),
            cache_dir: path_at(toml_value, "platform", "cache_dir"),
            private_data_dir: path_at(toml_value, "platform", "private_data_dir"),
        })
    }

    /// Session defaults carried by this config. Missing codes keep the builtin ones.
    pub fn session_defaults(&self) -> SessionDefaults {
        let builtin = RequestCodes::default();
        SessionDefaults {
            crop_size: self.crop_size,
            as_image: self.as_image,
            codes: RequestCodes {
                gallery: self.gallery_code.unwrap_or(builtin.gallery),
                camera: self.camera_code.unwrap_or(builtin.camera),
                crop: self.crop_code.unwrap_or(builtin.crop),
                file: self.file_code.unwrap_or(builtin.file),
            },
            authority: Some(self.authority.clone()).filter(|a| !a.is_empty()),
        }
    }

    /// Create empty ChooserConfig (all empty/default values)
    /// 创建空的 ChooserConfig
    pub fn empty() -> Self {
        Self {
            package_id: String::new(),
            authority: String::new(),
            crop_size: None,
            as_image: false,
            gallery_code: None,
            camera_code: None,
            crop_code: None,
            file_code: None,
            api_level: None,
            storage_root: PathBuf::new(),
            volumes_root: PathBuf::new(),
            pictures_dir: PathBuf::new(),
            cache_dir: PathBuf::new(),
            private_data_dir: PathBuf::new(),
        }
    }
}
