//! 逆变换并粘贴回原始空间.

use log::debug;

use crate::transform::TransformSequence;
use crate::{Geometry, Mask, RoiBox};

/// 将对齐后裁剪空间中的节段逐个变换回原始空间.
///
/// 整个变换序列复合后整体求逆; 每个节段经最近邻重采样,
/// 若 `hole_fill_mm > 0` 再做闭运算, 最后粘贴到 `original` 网格上 `roi` 所在的位置.
pub fn reproject(
    segments: &[Mask],
    transforms: &TransformSequence,
    roi: &RoiBox,
    original: &Geometry,
    hole_fill_mm: f64,
) -> Vec<Mask> {
    let inverse = transforms.compose().inverse();
    debug!(
        "逆变换: {} 个刚体变换, 总角度 {:.4}°",
        transforms.len(),
        inverse.angle().to_degrees()
    );
    segments
        .iter()
        .map(|seg| {
            let mut m = seg.resample(&inverse);
            if hole_fill_mm > 0.0 {
                m = m.close(m.geometry().radius_in_voxels(hole_fill_mm));
            }
            roi.paste(&m, original)
        })
        .collect()
}
