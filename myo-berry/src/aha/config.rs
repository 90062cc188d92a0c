//! 流水线配置.

use crate::consts::{label, DEFAULT_ROI_MARGIN_MM};
use crate::{Result, SegmentError};

/// 五个输入解剖结构在掩膜集合中的名称.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Labels {
    /// 左心室.
    pub left_ventricle: String,
    /// 左心房.
    pub left_atrium: String,
    /// 右心室.
    pub right_ventricle: String,
    /// 二尖瓣.
    pub mitral_valve: String,
    /// 全心.
    pub whole_heart: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            left_ventricle: label::LEFT_VENTRICLE.to_string(),
            left_atrium: label::LEFT_ATRIUM.to_string(),
            right_ventricle: label::RIGHT_VENTRICLE.to_string(),
            mitral_valve: label::MITRAL_VALVE.to_string(),
            whole_heart: label::WHOLE_HEART.to_string(),
        }
    }
}

impl Labels {
    /// 全部五个名称, 顺序固定.
    pub fn all(&self) -> [&str; 5] {
        [
            &self.left_ventricle,
            &self.left_atrium,
            &self.right_ventricle,
            &self.mitral_valve,
            &self.whole_heart,
        ]
    }
}

/// 17 节段划分的配置. 显式传入 [`super::generate_left_ventricle_segments`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SegmentConfig {
    /// 结构名称.
    pub labels: Labels,
    /// 心肌壁厚度 (毫米), 用于腐蚀左心室.
    pub myocardium_thickness_mm: f64,
    /// 闭运算填洞半径 (毫米). `0` 表示不填洞.
    pub hole_fill_mm: f64,
    /// 长轴精化的收敛容差 (角度).
    pub optimiser_tol_degrees: f64,
    /// 长轴精化的最大迭代次数. `0` 表示只做主轴对齐.
    pub optimiser_max_iter: usize,
    /// 是否以 `info` 级别输出每次迭代.
    pub optimiser_verbose: bool,
    /// ROI 包围盒向外扩展的边距 `(x, y, z)`, 以毫米为单位.
    pub roi_margin_mm: [f64; 3],
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            labels: Labels::default(),
            myocardium_thickness_mm: 10.0,
            hole_fill_mm: 3.0,
            optimiser_tol_degrees: 1.0,
            optimiser_max_iter: 10,
            optimiser_verbose: false,
            roi_margin_mm: DEFAULT_ROI_MARGIN_MM,
        }
    }
}

impl SegmentConfig {
    /// 收敛容差 (弧度).
    #[inline]
    pub fn optimiser_tol_radians(&self) -> f64 {
        self.optimiser_tol_degrees.to_radians()
    }

    /// 检查配置是否合法.
    pub fn validate(&self) -> Result<()> {
        fn non_negative(name: &str, v: f64) -> Result<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(SegmentError::InvalidConfig(format!("`{name}` = {v}")))
            }
        }

        if !(self.myocardium_thickness_mm.is_finite() && self.myocardium_thickness_mm > 0.0) {
            return Err(SegmentError::InvalidConfig(format!(
                "`myocardium_thickness_mm` = {}",
                self.myocardium_thickness_mm
            )));
        }
        non_negative("hole_fill_mm", self.hole_fill_mm)?;
        non_negative("optimiser_tol_degrees", self.optimiser_tol_degrees)?;
        for m in self.roi_margin_mm {
            non_negative("roi_margin_mm", m)?;
        }
        if let Some(empty) = self.labels.all().iter().position(|s| s.is_empty()) {
            return Err(SegmentError::InvalidConfig(format!("结构名称 #{empty} 为空")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = SegmentConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.labels.all()[0], "LEFTVENTRICLE");
        assert_eq!(cfg.optimiser_max_iter, 10);
        assert!((cfg.optimiser_tol_radians() - std::f64::consts::PI / 180.0).abs() < 1e-15);
    }

    #[test]
    fn test_invalid_config() {
        let cfg = SegmentConfig {
            myocardium_thickness_mm: 0.0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(SegmentError::InvalidConfig(_))));

        let cfg = SegmentConfig {
            hole_fill_mm: f64::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let mut cfg = SegmentConfig::default();
        cfg.labels.mitral_valve.clear();
        assert!(cfg.validate().is_err());
    }
}
