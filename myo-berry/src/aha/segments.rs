//! 17 节段输出集合.

use ndarray::{Array3, Zip};

use super::segment::SegmentId;
use crate::consts::gray::is_foreground;
use crate::consts::SEGMENT_COUNT;
use crate::{Geometry, Mask};

/// 以节段编号索引的 17 个掩膜, 几何信息相同.
#[derive(Clone, Debug)]
pub struct Segments {
    masks: Vec<Mask>,
}

/// 单个节段的统计摘要.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentSummary {
    /// 节段编号.
    pub id: SegmentId,
    /// 前景体素个数.
    pub voxels: usize,
    /// 体积 (毫升).
    pub volume_ml: f64,
}

impl Segments {
    /// 由按编号顺序排列的 17 个掩膜创建.
    ///
    /// 掩膜个数不为 17 或几何信息不一致时, 程序 panic.
    pub fn new(masks: Vec<Mask>) -> Self {
        assert_eq!(masks.len(), SEGMENT_COUNT);
        assert!(masks.windows(2).all(|w| w[0].is_compatible(&w[1])));
        Self { masks }
    }

    /// 共同的几何信息.
    #[inline]
    pub fn geometry(&self) -> &Geometry {
        self.masks[0].geometry()
    }

    /// 获取 `id` 号节段.
    #[inline]
    pub fn get(&self, id: SegmentId) -> &Mask {
        &self.masks[id.index()]
    }

    /// 按编号顺序迭代.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (SegmentId, &Mask)> + ExactSizeIterator {
        SegmentId::all().zip(self.masks.iter())
    }

    /// 合并为单个标签体积, 体素值为节段编号, 背景为 `0`.
    /// 多个节段重叠时 (只可能由填洞引起) 编号较小者获胜.
    pub fn label_map(&self) -> Array3<u8> {
        let mut out = Array3::<u8>::zeros(self.geometry().shape());
        for (id, mask) in self.iter().rev() {
            Zip::from(&mut out).and(&mask.data()).for_each(|o, &p| {
                if is_foreground(p) {
                    *o = id.get();
                }
            });
        }
        out
    }

    /// 各节段的体素个数与体积.
    pub fn summary(&self) -> Vec<SegmentSummary> {
        let ml = self.geometry().voxel_volume() / 1000.0;
        self.iter()
            .map(|(id, mask)| {
                let voxels = mask.count();
                SegmentSummary {
                    id,
                    voxels,
                    volume_ml: voxels as f64 * ml,
                }
            })
            .collect()
    }
}
