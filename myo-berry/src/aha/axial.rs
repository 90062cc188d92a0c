//! 沿长轴的分带.

use std::ops::Range;

use log::debug;

use super::segment::Band;
use crate::{Mask, Result, SegmentError};

/// 对齐后裁剪空间中的分带边界 (切片索引).
///
/// - 心尖帽: `[0, inf_limit)`;
/// - 心尖段: `[inf_limit, apical_end)`;
/// - 中段: `[apical_end, mid_end)`;
/// - 基底段: `[mid_end, basal_end)`, 其中 `basal_end` 为二尖瓣质心所在切片.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AxialBands {
    inf_limit: usize,
    apical_end: usize,
    mid_end: usize,
    basal_end: usize,
}

impl AxialBands {
    /// 以三等分 (整除) `[inf_limit, mv_coord)` 的方式创建.
    /// `mv_coord <= inf_limit` 时三个分带均为空.
    pub fn new(inf_limit: usize, mv_coord: usize) -> Self {
        let third = mv_coord.saturating_sub(inf_limit) / 3;
        Self {
            inf_limit,
            apical_end: inf_limit + third,
            mid_end: inf_limit + 2 * third,
            basal_end: mv_coord.max(inf_limit + 2 * third),
        }
    }

    /// 血池的最下端切片.
    #[inline]
    pub fn inf_limit(&self) -> usize {
        self.inf_limit
    }

    /// 心尖段终止 (不含) 切片.
    #[inline]
    pub fn apical_end(&self) -> usize {
        self.apical_end
    }

    /// 中段终止 (不含) 切片, 也是基底参考角的起始切片.
    #[inline]
    pub fn mid_end(&self) -> usize {
        self.mid_end
    }

    /// 基底段终止 (不含) 切片.
    #[inline]
    pub fn basal_end(&self) -> usize {
        self.basal_end
    }

    /// 分带的切片范围.
    pub fn range(&self, band: Band) -> Range<usize> {
        match band {
            Band::Apex => 0..self.inf_limit,
            Band::Apical => self.inf_limit..self.apical_end,
            Band::Mid => self.apical_end..self.mid_end,
            Band::Basal => self.mid_end..self.basal_end,
        }
    }

    /// 切片 `z` 所属分带. 位于二尖瓣质心以上时返回 `None`.
    pub fn band_of(&self, z: usize) -> Option<Band> {
        [Band::Apex, Band::Apical, Band::Mid, Band::Basal]
            .into_iter()
            .find(|&b| self.range(b).contains(&z))
    }
}

/// 由血池 `inner` 的最下端与二尖瓣 `mv` 质心所在切片计算分带.
pub fn partition_axial(
    inner: &Mask,
    mv: &Mask,
    lv_label: &str,
    mv_label: &str,
) -> Result<AxialBands> {
    let inf_limit = inner
        .shape_statistics()
        .ok_or_else(|| SegmentError::EmptyMask(lv_label.to_string()))?
        .bbox_min()
        .0;
    let mv_stats = mv
        .shape_statistics()
        .ok_or_else(|| SegmentError::EmptyMask(mv_label.to_string()))?;
    let mv_coord = mv_stats.centroid_index().z.floor() as usize;

    let bands = AxialBands::new(inf_limit, mv_coord);
    debug!("轴向分带: {bands:?}");
    Ok(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Geometry;

    #[test]
    fn test_bands() {
        let b = AxialBands::new(4, 20);
        assert_eq!(b.range(Band::Apex), 0..4);
        assert_eq!(b.range(Band::Apical), 4..9);
        assert_eq!(b.range(Band::Mid), 9..14);
        assert_eq!(b.range(Band::Basal), 14..20);
        assert_eq!(b.band_of(3), Some(Band::Apex));
        assert_eq!(b.band_of(9), Some(Band::Mid));
        assert_eq!(b.band_of(19), Some(Band::Basal));
        assert_eq!(b.band_of(20), None);

        let degenerate = AxialBands::new(10, 8);
        assert!(degenerate.range(Band::Apical).is_empty());
        assert!(degenerate.range(Band::Basal).is_empty());
    }

    #[test]
    fn test_partition_axial() {
        let geo = Geometry::with_spacing([5, 5, 30], [1.0; 3]);
        let mut inner = Mask::zeros(geo.clone());
        for z in 6..20 {
            inner[(z, 2, 2)] = 1;
        }
        let mut mv = Mask::zeros(geo);
        mv[(24, 2, 2)] = 1;
        mv[(25, 2, 2)] = 1;

        let b = partition_axial(&inner, &mv, "LV", "MV").unwrap();
        assert_eq!(b, AxialBands::new(6, 24));
        assert_eq!(b.mid_end(), 18);

        let empty = inner.zeros_like();
        assert!(matches!(
            partition_axial(&inner, &empty, "LV", "MV"),
            Err(SegmentError::EmptyMask(l)) if l == "MV"
        ));
    }
}
