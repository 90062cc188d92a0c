//! 感兴趣区域 (ROI) 的裁剪与回贴.

use ndarray::s;

use super::{Geometry, Mask};

/// 描述裁剪后体积在原体积索引空间中位置的包围盒.
///
/// `index` 与 `size` 均按 `(x, y, z)` 排列, 以体素为单位.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RoiBox {
    index: [usize; 3],
    size: [usize; 3],
}

impl RoiBox {
    /// 直接创建 ROI. 调用者负责保证其不越界.
    #[inline]
    pub fn new(index: [usize; 3], size: [usize; 3]) -> Self {
        Self { index, size }
    }

    /// 计算 `mask` 前景的包围盒, 每个方向以 `margin_mm` (毫米, `(x, y, z)`)
    /// 向外扩展, 并截断在网格范围内. 如果不存在前景则返回 `None`.
    pub fn around(mask: &Mask, margin_mm: [f64; 3]) -> Option<Self> {
        let stats = mask.shape_statistics()?;
        let (z0, y0, x0) = stats.bbox_min();
        let (z1, y1, x1) = stats.bbox_max();
        let (lo, hi) = ([x0, y0, z0], [x1, y1, z1]);

        let geometry = mask.geometry();
        let spacing = geometry.spacing();
        let grid = geometry.size();

        let mut index = [0; 3];
        let mut size = [0; 3];
        for k in 0..3 {
            let expand = (margin_mm[k].max(0.0) / spacing[k]) as usize;
            let start = lo[k].saturating_sub(expand);
            let end = (hi[k] + expand + 1).min(grid[k]);
            index[k] = start;
            size[k] = end - start;
        }
        Some(Self { index, size })
    }

    /// 偏移 `(x, y, z)`.
    #[inline]
    pub fn index(&self) -> [usize; 3] {
        self.index
    }

    /// 大小 `(x, y, z)`.
    #[inline]
    pub fn size(&self) -> [usize; 3] {
        self.size
    }

    /// 检查 ROI 是否完全位于 `geometry` 描述的网格内.
    pub fn fits(&self, geometry: &Geometry) -> bool {
        let grid = geometry.size();
        (0..3).all(|k| self.index[k] + self.size[k] <= grid[k])
    }

    /// 将 `mask` 裁剪到该 ROI. 结果的几何信息由原几何信息推导.
    ///
    /// ROI 越界时程序 panic.
    pub fn crop(&self, mask: &Mask) -> Mask {
        assert!(self.fits(mask.geometry()), "ROI 越界");
        let [x, y, z] = self.index;
        let [w, h, d] = self.size;
        let data = mask
            .data()
            .slice(s![z..z + d, y..y + h, x..x + w])
            .to_owned();
        Mask::new(mask.geometry().sub_geometry(self.index, self.size), data)
    }

    /// 创建几何信息为 `geometry` 的全背景掩膜, 并将 `sub` 粘贴到该 ROI 所描述的位置.
    ///
    /// `sub` 的形状必须与 ROI 大小一致, 否则程序 panic.
    pub fn paste(&self, sub: &Mask, geometry: &Geometry) -> Mask {
        assert!(self.fits(geometry), "ROI 越界");
        assert_eq!(sub.geometry().size(), self.size, "子体积大小与 ROI 不一致");
        let [x, y, z] = self.index;
        let [w, h, d] = self.size;
        let mut ans = Mask::zeros(geometry.clone());
        ans.data_mut()
            .slice_mut(s![z..z + d, y..y + h, x..x + w])
            .assign(&sub.data());
        ans
    }
}
