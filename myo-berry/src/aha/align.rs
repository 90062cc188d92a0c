//! 长轴对齐.
//!
//! 先用 (左心室 ∪ 左心房) 的第一主轴做初始对齐, 再以 "二尖瓣质心 -> 心尖"
//! 向量迭代精化, 直到残余角度不超过容差或用尽迭代次数.
//! 用尽迭代次数不是错误, 流程以当前的对齐结果继续.

use log::{log, warn, Level};
use nalgebra::{Point3, Vector3};

use super::config::SegmentConfig;
use super::masks::AnatomicalMasks;
use crate::transform::{RigidTransform, TransformSequence};
use crate::{Mask, Result, SegmentError};

/// 长轴对齐的结果.
#[derive(Clone, Debug)]
pub struct Alignment {
    /// 旋转后的掩膜集合.
    pub masks: AnatomicalMasks,
    /// 依次施加的全部刚体变换, 第一个为主轴对齐.
    pub transforms: TransformSequence,
    /// 实际执行的精化次数.
    pub iterations: usize,
    /// 最后一次计算得到的残余角度 (弧度).
    pub residual: f64,
}

impl Alignment {
    /// 残余角度是否在容差 `tol` (弧度) 以内?
    #[inline]
    pub fn converged(&self, tol: f64) -> bool {
        self.residual.abs() <= tol
    }
}

/// 将 `masks` 的左心室长轴对齐到网格的切片轴, 心尖朝向切片索引较小的一侧.
pub fn align_long_axis(masks: &AnatomicalMasks, config: &SegmentConfig) -> Result<Alignment> {
    let labels = &config.labels;
    let level = if config.optimiser_verbose {
        Level::Info
    } else {
        Level::Debug
    };

    let lv = masks.get(&labels.left_ventricle)?;
    let union = lv.union(masks.get(&labels.left_atrium)?);
    let stats = union
        .shape_statistics()
        .ok_or_else(|| SegmentError::EmptyMask(labels.left_ventricle.clone()))?;
    let slice_axis = lv.geometry().slice_axis().into_inner();
    let mut axis = stats.principal_axis().into_inner();
    if axis.dot(&slice_axis) < 0.0 {
        axis = -axis;
    }

    let initial = RigidTransform::aligning(*stats.centroid(), &axis, &slice_axis);
    log!(
        level,
        "主轴对齐: 主轴 = {:.4?}, 角度 = {:.4}°",
        axis.as_slice(),
        initial.angle().to_degrees()
    );
    let mut masks = masks.map(|m| m.resample(&initial));
    let mut transforms = TransformSequence::new();
    transforms.push(initial);

    let tol = config.optimiser_tol_radians();
    let target = -slice_axis;
    let mut residual = initial.angle();
    let mut iterations = 0;
    while iterations < config.optimiser_max_iter && residual.abs() > tol {
        let apex = apex_point(masks.get(&labels.left_ventricle)?)
            .ok_or_else(|| SegmentError::EmptyMask(labels.left_ventricle.clone()))?;
        let mv = masks
            .get(&labels.mitral_valve)?
            .centroid()
            .ok_or_else(|| SegmentError::EmptyMask(labels.mitral_valve.clone()))?;

        let t = RigidTransform::aligning(nalgebra::center(&mv, &apex), &(apex - mv), &target);
        residual = t.angle();
        iterations += 1;
        log!(
            level,
            "长轴精化 #{iterations}: 心尖 = {:.2?}, 二尖瓣 = {:.2?}, 残余角度 = {:.4}°",
            apex.coords.as_slice(),
            mv.coords.as_slice(),
            residual.to_degrees()
        );

        masks = masks.map(|m| m.resample(&t));
        transforms.push(t);
    }

    if config.optimiser_max_iter > 0 && residual.abs() > tol {
        warn!(
            "长轴精化在 {iterations} 次迭代后未收敛, 残余角度 {:.4}°",
            residual.to_degrees()
        );
    }

    Ok(Alignment {
        masks,
        transforms,
        iterations,
        residual,
    })
}

/// 心尖: 含左心室体素的最低切片上, 左心室像素质心的物理坐标.
fn apex_point(lv: &Mask) -> Option<Point3<f64>> {
    let z = lv.slice_iter().position(|s| !s.is_empty())?;
    let (y, x) = lv.slice_at(z).centroid()?;
    Some(lv.geometry().index_to_physical(&Vector3::new(x, y, z as f64)))
}
