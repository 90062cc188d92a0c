//! AHA 17 节段划分.
//!
//! 入口为 [`generate_left_ventricle_segments`]. 各阶段也单独公开, 便于检查中间结果:
//!
//! 1. [`crop::crop_to_roi`]: 以全心掩膜裁剪;
//! 2. [`align::align_long_axis`]: 长轴对齐;
//! 3. [`myocardium::extract_myocardium`]: 提取心肌壁;
//! 4. [`axial::partition_axial`]: 轴向分带;
//! 5. [`angular::reference_angles`], [`angular::assign_segments`]: 角度划分;
//! 6. [`reproject::reproject`]: 逆变换回原始空间.

use itertools::Itertools;
use log::debug;

pub mod align;
pub mod angular;
pub mod axial;
mod config;
pub mod crop;
mod masks;
pub mod myocardium;
pub mod reproject;
mod segment;
mod segments;

pub use config::{Labels, SegmentConfig};
pub use masks::AnatomicalMasks;
pub use segment::{Band, SegmentId};
pub use segments::{SegmentSummary, Segments};

use crate::Result;

/// 计算左心室心肌的 AHA 17 节段划分.
///
/// `masks` 必须包含 `config.labels` 指定的五个二值掩膜, 集合中的全部掩膜须几何兼容.
/// 返回的 17 个掩膜与输入几何兼容. 输入不会被修改.
///
/// # 错误
///
/// - 缺少结构: [`SegmentError::MissingStructure`](crate::SegmentError::MissingStructure);
/// - 几何信息不一致: [`SegmentError::GeometryMismatch`](crate::SegmentError::GeometryMismatch);
/// - 需要标志点的结构没有前景: [`SegmentError::EmptyMask`](crate::SegmentError::EmptyMask);
/// - 配置非法: [`SegmentError::InvalidConfig`](crate::SegmentError::InvalidConfig).
///
/// 长轴精化未收敛不是错误.
pub fn generate_left_ventricle_segments(
    masks: &AnatomicalMasks,
    config: &SegmentConfig,
) -> Result<Segments> {
    config.validate()?;
    let labels = &config.labels;
    let original = masks
        .check_geometry(&labels.all(), &labels.whole_heart)?
        .clone();

    let (cropped, roi) = crop::crop_to_roi(masks, &labels.whole_heart, config.roi_margin_mm)?;
    let aligned = align::align_long_axis(&cropped, config)?;
    let work = &aligned.masks;
    let lv = work.get(&labels.left_ventricle)?;

    let myo = myocardium::extract_myocardium(lv, config.myocardium_thickness_mm);
    let bands = axial::partition_axial(
        &myo.inner,
        work.get(&labels.mitral_valve)?,
        &labels.left_ventricle,
        &labels.mitral_valve,
    )?;
    let refs = angular::reference_angles(
        lv,
        work.get(&labels.right_ventricle)?,
        &bands,
        &labels.right_ventricle,
    )?;
    let rotated = angular::assign_segments(&myo, &bands, &refs);
    debug!(
        "旋转空间中的节段体素数: [{}]",
        rotated.iter().map(|m| m.count()).join(", ")
    );

    let segments = reproject::reproject(
        &rotated,
        &aligned.transforms,
        &roi,
        &original,
        config.hole_fill_mm,
    );
    Ok(Segments::new(segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phantom::PhantomHeart;
    use crate::{Geometry, Mask, SegmentError};

    fn config() -> SegmentConfig {
        SegmentConfig {
            myocardium_thickness_mm: 4.0,
            roi_margin_mm: [4.0, 4.0, 4.0],
            ..Default::default()
        }
    }

    fn overlap(segs: &[&Mask]) -> usize {
        let total: usize = segs.iter().map(|m| m.count()).sum();
        let union = segs
            .iter()
            .skip(1)
            .fold(segs[0].clone(), |acc, m| acc.union(m));
        total - union.count()
    }

    #[test]
    fn test_pipeline_upright() {
        let _ = simple_logger::init_with_level(log::Level::Debug);
        let cfg = SegmentConfig {
            hole_fill_mm: 0.0,
            ..config()
        };
        let masks = PhantomHeart::default().build(&cfg.labels);
        let segs = generate_left_ventricle_segments(&masks, &cfg).unwrap();

        let reference = masks.get(&cfg.labels.whole_heart).unwrap().geometry();
        assert!(segs.geometry().is_compatible(reference));
        let all: Vec<&Mask> = segs.iter().map(|(_, m)| m).collect();
        assert_eq!(overlap(&all), 0);
        for (id, m) in segs.iter() {
            assert!(m.count() > 0, "segment {id} is empty");
        }

        // 所有节段都位于左心室内.
        let lv = masks.get(&cfg.labels.left_ventricle).unwrap();
        for (_, m) in segs.iter() {
            assert_eq!(m.difference(lv).count(), 0);
        }

        // 右心室插入点逆时针方向 30° 的中段体素属于 8 号节段.
        let phantom = PhantomHeart::default();
        let (cy, cx) = phantom.center;
        let z = 33;
        let y = (cy - 10.0 * 0.5).round() as usize;
        let x = (cx + 10.0 * (3f64.sqrt() / 2.0)).round() as usize;
        assert_eq!(segs.get(SegmentId::new(8).unwrap())[(z, y, x)], 1);
        // 与之相对 (210°) 的体素属于 11 号节段.
        let y = (cy + 10.0 * 0.5).round() as usize;
        let x = (cx - 10.0 * (3f64.sqrt() / 2.0)).round() as usize;
        assert_eq!(segs.get(SegmentId::new(11).unwrap())[(z, y, x)], 1);
    }

    #[test]
    fn test_pipeline_hole_fill_keeps_geometry() {
        let cfg = config();
        let masks = PhantomHeart::default().build(&cfg.labels);
        let segs = generate_left_ventricle_segments(&masks, &cfg).unwrap();
        let map = segs.label_map();
        assert_eq!(map.shape(), masks.get(&cfg.labels.left_ventricle).unwrap().data().shape());
        assert!(map.iter().all(|&v| v <= 17));
        let summary = segs.summary();
        assert!(summary.iter().all(|s| s.voxels > 0));
    }

    /// 整体旋转输入后再将输出转回, 节段划分与未旋转时基本一致.
    #[test]
    fn test_pipeline_rotation_invariance() {
        let cfg = SegmentConfig {
            hole_fill_mm: 0.0,
            ..config()
        };
        let phantom = PhantomHeart::default();
        let upright = generate_left_ventricle_segments(&phantom.build(&cfg.labels), &cfg).unwrap();

        let angle = 0.2;
        let tilted_masks = phantom.build_tilted(&cfg.labels, angle);
        let tilted = generate_left_ventricle_segments(&tilted_masks, &cfg).unwrap();
        let mut seq = crate::TransformSequence::new();
        seq.push(phantom.tilt(angle));
        let back = seq.compose().inverse();
        let a = upright.label_map();
        let b = Segments::new(
            tilted
                .iter()
                .map(|(_, m)| m.resample(&back))
                .collect::<Vec<_>>(),
        )
        .label_map();

        // 边界体素受最近邻误差影响, 只比较两者都有标签的体素.
        let upright_count = a.iter().filter(|&&x| x != 0).count();
        let both = a
            .iter()
            .zip(b.iter())
            .filter(|(&x, &y)| x != 0 && y != 0)
            .count();
        let agree = a
            .iter()
            .zip(b.iter())
            .filter(|(&x, &y)| x != 0 && x == y)
            .count();
        assert!(both * 10 > upright_count * 7, "{both} / {upright_count}");
        assert!(agree * 5 > both * 4, "agreement {agree} / {both}");
    }

    #[test]
    fn test_pipeline_errors() {
        let cfg = config();
        let phantom = PhantomHeart::default();

        let mut masks = phantom.build(&cfg.labels);
        let geo = Geometry::with_spacing([4, 4, 4], [1.0; 3]);
        masks.insert(cfg.labels.right_ventricle.clone(), Mask::zeros(geo));
        assert!(matches!(
            generate_left_ventricle_segments(&masks, &cfg),
            Err(SegmentError::GeometryMismatch { .. })
        ));

        // 额外结构的网格不一致同样是错误.
        let mut masks = phantom.build(&cfg.labels);
        let geo = Geometry::with_spacing([10, 10, 10], [1.0; 3]);
        masks.insert("AORTA", Mask::zeros(geo));
        assert!(matches!(
            generate_left_ventricle_segments(&masks, &cfg),
            Err(SegmentError::GeometryMismatch { label, .. }) if label == "AORTA"
        ));

        let partial: AnatomicalMasks = phantom
            .build(&cfg.labels)
            .iter()
            .filter(|(k, _)| *k != cfg.labels.left_atrium)
            .map(|(k, v)| (k, v.clone()))
            .collect();
        assert!(matches!(
            generate_left_ventricle_segments(&partial, &cfg),
            Err(SegmentError::MissingStructure(l)) if l == cfg.labels.left_atrium
        ));

        let mut masks = phantom.build(&cfg.labels);
        let empty = masks.get(&cfg.labels.right_ventricle).unwrap().zeros_like();
        masks.insert(cfg.labels.right_ventricle.clone(), empty);
        assert!(matches!(
            generate_left_ventricle_segments(&masks, &cfg),
            Err(SegmentError::EmptyMask(l)) if l == cfg.labels.right_ventricle
        ));

        let bad = SegmentConfig {
            optimiser_tol_degrees: -1.0,
            ..config()
        };
        assert!(matches!(
            generate_left_ventricle_segments(&phantom.build(&bad.labels), &bad),
            Err(SegmentError::InvalidConfig(_))
        ));
    }
}
