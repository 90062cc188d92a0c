//! 对 `myo-berry::dataset` 的更一层封装. 提供病例目录与配置的加载.

use myo_berry::aha::SegmentConfig;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置文件加载错误.
#[derive(Error, Debug)]
pub enum LoadConfigError {
    /// 无法读取文件.
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    /// 不是合法的 TOML 配置.
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// 获取病例根目录.
///
/// 1. 若环境变量 `$MYO_CASE_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/heart`.
pub fn case_dir_from_env_or_home() -> Option<PathBuf> {
    match env::var("MYO_CASE_DIR") {
        Ok(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => myo_berry::dataset::home_dataset_dir_with(["heart"]),
    }
}

/// 从 TOML 文本解析配置. 缺失的字段取默认值.
pub fn parse_config(text: &str) -> Result<SegmentConfig, LoadConfigError> {
    Ok(toml::from_str(text)?)
}

/// 从 TOML 文件加载配置. `path` 为 `None` 时使用默认配置.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<SegmentConfig, LoadConfigError> {
    match path {
        Some(p) => parse_config(&std::fs::read_to_string(p)?),
        None => Ok(SegmentConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let cfg = parse_config(
            r#"
            myocardium_thickness_mm = 6.5
            optimiser_verbose = true
            roi_margin_mm = [10.0, 10.0, 20.0]

            [labels]
            right_ventricle = "RV"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.myocardium_thickness_mm, 6.5);
        assert!(cfg.optimiser_verbose);
        assert_eq!(cfg.roi_margin_mm, [10.0, 10.0, 20.0]);
        assert_eq!(cfg.labels.right_ventricle, "RV");
        assert_eq!(cfg.labels.left_ventricle, "LEFTVENTRICLE");
        assert_eq!(cfg.optimiser_max_iter, 10);
        assert_eq!(cfg.hole_fill_mm, 3.0);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("segment17.toml");
        std::fs::write(&path, "hole_fill_mm = 0.0\n").unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().hole_fill_mm, 0.0);
        assert_eq!(load_config::<&Path>(None).unwrap(), SegmentConfig::default());

        std::fs::write(&path, "hole_fill_mm = \"three\"\n").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(LoadConfigError::Parse(_))));
        assert!(matches!(
            load_config(Some(dir.path().join("missing.toml"))),
            Err(LoadConfigError::Io(_))
        ));
    }
}
