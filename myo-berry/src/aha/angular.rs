//! 以右心室为参考的角度划分.
//!
//! 基底段与中段的参考角为右心室插入角: 从中段/基底段分界起连续 5 个切片上,
//! 右心室像素相对左心室质心极角的最小值, 取中位数. 心尖段的参考角为心尖段内
//! 左心室与右心室平均质心连线的极角. 两者与逐体素划分使用同一极角约定.

use std::ops::Range;

use log::debug;
use ndarray::{Array3, ArrayViewMut2, Axis, Zip};
use ordered_float::OrderedFloat;

use super::axial::AxialBands;
use super::myocardium::Myocardium;
use super::segment::{Band, SegmentId};
use crate::consts::gray::is_foreground;
use crate::consts::BASAL_REFERENCE_SLICES;
use crate::sector::{normalize_arc, polar_arc};
use crate::{Idx2dF, Mask, Result, SegmentError};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
    }
}

/// 两个参考角 (弧度, `[0, 2 * PI)`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReferenceAngles {
    /// 基底段与中段的参考角.
    pub basal: f64,
    /// 心尖段的参考角. 心尖段为空时为 `None`.
    pub apical: Option<f64>,
}

impl ReferenceAngles {
    /// 分带使用的参考角. 心尖帽没有参考角.
    pub fn for_band(&self, band: Band) -> Option<f64> {
        match band {
            Band::Apex => None,
            Band::Apical => self.apical,
            Band::Mid | Band::Basal => Some(self.basal),
        }
    }
}

#[inline]
fn to_f(p: (usize, usize)) -> Idx2dF {
    (p.0 as f64, p.1 as f64)
}

fn median(sorted: &[OrderedFloat<f64>]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2].0
    } else {
        (sorted[n / 2 - 1].0 + sorted[n / 2].0) / 2.0
    }
}

/// 从切片 `start` 起最多 [`BASAL_REFERENCE_SLICES`] 个切片计算右心室插入角.
///
/// 不含左心室或右心室的切片被跳过; 全部被跳过时返回 `EmptyMask(rv_label)`.
pub fn basal_reference(lv: &Mask, rv: &Mask, start: usize, rv_label: &str) -> Result<f64> {
    let end = (start + BASAL_REFERENCE_SLICES).min(lv.len_z());
    let mut minima: Vec<OrderedFloat<f64>> = (start.min(end)..end)
        .filter_map(|z| {
            let c = lv.slice_at(z).centroid()?;
            rv.slice_at(z)
                .positions()
                .into_iter()
                .map(|p| OrderedFloat(normalize_arc(polar_arc(c, to_f(p)))))
                .min()
        })
        .collect();
    if minima.is_empty() {
        return Err(SegmentError::EmptyMask(rv_label.to_string()));
    }
    minima.sort_unstable();
    debug!("基底参考角: 每切片最小值 {minima:?}");
    Ok(median(&minima))
}

/// 以 `range` 内左心室与右心室的平均质心计算心尖段参考角.
///
/// `range` 为空时返回 `None`. 缺少任一结构的切片被跳过, 全部被跳过时返回错误.
pub fn apical_reference(
    lv: &Mask,
    rv: &Mask,
    range: Range<usize>,
    rv_label: &str,
) -> Result<Option<f64>> {
    if range.is_empty() {
        return Ok(None);
    }
    let pairs: Vec<(Idx2dF, Idx2dF)> = range
        .filter(|&z| z < lv.len_z())
        .filter_map(|z| Some((lv.slice_at(z).centroid()?, rv.slice_at(z).centroid()?)))
        .collect();
    if pairs.is_empty() {
        return Err(SegmentError::EmptyMask(rv_label.to_string()));
    }
    let n = pairs.len() as f64;
    let (lv_sum, rv_sum) = pairs.iter().fold(
        ((0.0, 0.0), (0.0, 0.0)),
        |((ly, lx), (ry, rx)), ((a, b), (c, d))| ((ly + a, lx + b), (ry + c, rx + d)),
    );
    let lv_mean = (lv_sum.0 / n, lv_sum.1 / n);
    let rv_mean = (rv_sum.0 / n, rv_sum.1 / n);
    Ok(Some(normalize_arc(polar_arc(lv_mean, rv_mean))))
}

/// 计算两个参考角.
pub fn reference_angles(
    lv: &Mask,
    rv: &Mask,
    bands: &AxialBands,
    rv_label: &str,
) -> Result<ReferenceAngles> {
    let basal = basal_reference(lv, rv, bands.mid_end(), rv_label)?;
    let apical = apical_reference(lv, rv, bands.range(Band::Apical), rv_label)?;
    debug!(
        "参考角: 基底 {:.3}°, 心尖 {:?}°",
        basal.to_degrees(),
        apical.map(f64::to_degrees)
    );
    Ok(ReferenceAngles { basal, apical })
}

/// 对单个切片的心肌体素赋予节段编号.
fn label_slice(
    z: usize,
    mut out: ArrayViewMut2<u8>,
    myo: &Myocardium,
    bands: &AxialBands,
    refs: &ReferenceAngles,
) {
    let Some(band) = bands.band_of(z) else {
        return;
    };
    if band == Band::Apex {
        let id = SegmentId::APEX.get();
        Zip::from(&mut out)
            .and(&myo.full_wall.slice_at(z).array_view())
            .for_each(|o, &p| {
                if is_foreground(p) {
                    *o = id;
                }
            });
        return;
    }

    let Some(reference) = refs.for_band(band) else {
        return;
    };
    let sli = myo.wall.slice_at(z);
    let Some(c) = sli.centroid() else {
        return;
    };
    for p in sli.positions() {
        let theta = normalize_arc(polar_arc(c, to_f(p)) - reference);
        if let Some(id) = band.classify(theta) {
            out[p] = id.get();
        }
    }
}

/// 在对齐后的裁剪空间中划分 17 个节段, 按编号顺序返回.
///
/// 1-16 号节段取自正则化后的心肌壁, 17 号取自完整心肌壁的心尖帽部分.
/// 各节段两两不相交.
pub fn assign_segments(myo: &Myocardium, bands: &AxialBands, refs: &ReferenceAngles) -> Vec<Mask> {
    let geometry = myo.wall.geometry();
    let mut labels = Array3::<u8>::zeros(geometry.shape());

    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            labels
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .enumerate()
                .for_each(|(z, out)| label_slice(z, out, myo, bands, refs));
        } else {
            labels
                .axis_iter_mut(Axis(0))
                .enumerate()
                .for_each(|(z, out)| label_slice(z, out, myo, bands, refs));
        }
    }

    SegmentId::all()
        .map(|id| {
            let data = labels.mapv(|l| u8::from(l == id.get()));
            Mask::new(geometry.clone(), data)
        })
        .collect()
}
