//! 掩膜水平切片.

use ndarray::{ArrayView2, ArrayViewMut2};
use std::ops::Index;

use crate::consts::gray::*;
use crate::{Idx2d, Idx2dF};

/// 不可变、借用的二维水平掩膜切片.
pub struct MaskSlice<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::Mask`].
    data: ArrayView2<'a, u8>,
}

impl Index<Idx2d> for MaskSlice<'_> {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl<'a> MaskSlice<'a> {
    /// 直接初始化.
    #[inline]
    pub(crate) fn new(data: ArrayView2<'a, u8>) -> Self {
        Self { data }
    }

    /// 获得 **底层** 数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<u8> {
        self.data.view()
    }

    /// 切片的分辨率 `(y, x)`.
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 该切片是否不含前景?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.iter().copied().all(is_background)
    }

    /// 统计前景像素个数.
    #[inline]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|p| is_foreground(**p)).count()
    }

    /// 收集所有前景像素对应的下标 `(y, x)`, 结果按行优先存储.
    pub fn positions(&self) -> Vec<Idx2d> {
        self.data
            .indexed_iter()
            .filter_map(|(pos, p)| is_foreground(*p).then_some(pos))
            .collect()
    }

    /// 前景像素的质心 `(y, x)`. 如果不存在前景则返回 `None`.
    pub fn centroid(&self) -> Option<Idx2dF> {
        let (mut n, mut sy, mut sx) = (0usize, 0.0, 0.0);
        for ((y, x), _) in self.data.indexed_iter().filter(|(_, p)| is_foreground(**p)) {
            n += 1;
            sy += y as f64;
            sx += x as f64;
        }
        (n != 0).then(|| (sy / n as f64, sx / n as f64))
    }
}

/// 可变、借用的二维水平掩膜切片.
pub struct MaskSliceMut<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::Mask`].
    data: ArrayViewMut2<'a, u8>,
}

impl<'a> MaskSliceMut<'a> {
    /// 直接初始化.
    #[inline]
    pub(crate) fn new(data: ArrayViewMut2<'a, u8>) -> Self {
        Self { data }
    }

    /// 获得 **底层** 数据的一份可变 shallow copy.
    #[inline]
    pub fn array_view_mut(&mut self) -> ArrayViewMut2<u8> {
        self.data.view_mut()
    }

    /// 将 `it` 给出的所有位置设置为前景.
    ///
    /// 如果存在越界索引, 则程序 panic.
    pub fn fill_batch<I: IntoIterator<Item = Idx2d>>(&mut self, it: I) {
        for pos in it {
            self.data[pos] = FOREGROUND;
        }
    }

    /// 将整张切片设置为背景.
    #[inline]
    pub fn clear(&mut self) {
        self.data.fill(BACKGROUND);
    }
}

#[cfg(test)]
mod tests {
    use crate::{Geometry, Mask};

    #[test]
    fn test_slice_centroid() {
        let mut m = Mask::zeros(Geometry::with_spacing([6, 4, 2], [1.0; 3]));
        assert!(m.slice_at(1).centroid().is_none());

        m.slice_at_mut(1).fill_batch([(0, 0), (2, 4), (1, 5)]);
        let sli = m.slice_at(1);
        assert_eq!(sli.count(), 3);
        assert_eq!(sli.positions(), vec![(0, 0), (1, 5), (2, 4)]);
        let (y, x) = sli.centroid().unwrap();
        assert!((y - 1.0).abs() < 1e-12);
        assert!((x - 3.0).abs() < 1e-12);
        assert!(m.slice_at(0).is_empty());

        m.slice_at_mut(1).clear();
        assert!(m.is_empty());
    }
}
