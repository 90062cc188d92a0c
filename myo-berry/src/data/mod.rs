use std::ops::{Index, IndexMut, Range};

use ndarray::{Array3, ArrayView, ArrayViewMut, Axis, Ix3, Zip};

use crate::consts::gray::*;
use crate::Idx3d;

mod geometry;
mod io;
pub mod morph_3d;
mod roi;
pub mod sector;
mod slice;
mod stats;

pub use geometry::{Geometry, Radius};
pub use roi::RoiBox;
pub use slice::{MaskSlice, MaskSliceMut};
pub use stats::ShapeStatistics;

/// 带几何信息的三维二值掩膜. 体素值以 `u8` 保存, 非零即前景.
///
/// 数据按 `(z, y, x)` 访问, 几何信息按 `(x, y, z)` 描述, 见 [`Geometry`].
#[derive(Debug, Clone)]
pub struct Mask {
    geometry: Geometry,
    data: Array3<u8>,
}

impl Index<Idx3d> for Mask {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx3d> for Mask {
    #[inline]
    fn index_mut(&mut self, index: Idx3d) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl Mask {
    /// 以几何信息和 `(z, y, x)` 组织的数据直接创建掩膜.
    ///
    /// 如果 `data` 的形状与 `geometry` 不一致, 则程序 panic.
    pub fn new(geometry: Geometry, data: Array3<u8>) -> Self {
        let (z, y, x) = geometry.shape();
        assert_eq!(data.shape(), &[z, y, x], "掩膜形状与几何信息不一致");
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().to_owned()
        };
        Self { geometry, data }
    }

    /// 创建全背景掩膜.
    #[inline]
    pub fn zeros(geometry: Geometry) -> Self {
        let data = Array3::zeros(geometry.shape());
        Self { geometry, data }
    }

    /// 创建与 `self` 几何兼容的全背景掩膜.
    #[inline]
    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.geometry.clone())
    }

    /// 获取几何信息.
    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// 获取数据形状 `(z, y, x)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.geometry.shape()
    }

    /// 获取水平切片个数.
    #[inline]
    pub fn len_z(&self) -> usize {
        self.geometry.len_z()
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView<'_, u8, Ix3> {
        self.data.view()
    }

    /// 获得数据的一份可变 shallow copy.
    #[inline]
    pub fn data_mut(&mut self) -> ArrayViewMut<'_, u8, Ix3> {
        self.data.view_mut()
    }

    /// 检查索引是否合法.
    #[inline]
    pub fn check(&self, pos: &Idx3d) -> bool {
        self.geometry.check(pos)
    }

    /// 位置 `pos` 是否为前景? 越界时返回 `false`.
    #[inline]
    pub fn is_set(&self, pos: Idx3d) -> bool {
        self.data.get(pos).is_some_and(|&p| is_foreground(p))
    }

    /// 获取前景体素个数.
    #[inline]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|p| is_foreground(**p)).count()
    }

    /// 掩膜是否不含任何前景?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.iter().copied().all(is_background)
    }

    /// 收集所有前景体素对应的下标. 结果按行优先存储.
    pub fn positions(&self) -> Vec<Idx3d> {
        self.data
            .indexed_iter()
            .filter_map(|(pos, p)| is_foreground(*p).then_some(pos))
            .collect()
    }

    /// 将所有非零体素统一为 [`FOREGROUND`].
    pub fn binarize(&mut self) {
        self.data.mapv_inplace(|p| if is_foreground(p) { FOREGROUND } else { BACKGROUND });
    }

    /// 判断是否与 `other` 几何兼容.
    #[inline]
    pub fn is_compatible(&self, other: &Mask) -> bool {
        self.geometry.is_compatible(&other.geometry)
    }

    /// 逐体素组合两个几何兼容的掩膜.
    fn combine(&self, other: &Mask, op: fn(bool, bool) -> bool) -> Mask {
        debug_assert!(self.is_compatible(other));
        let mut ans = self.zeros_like();
        Zip::from(&mut ans.data)
            .and(&self.data)
            .and(&other.data)
            .for_each(|o, &a, &b| {
                if op(is_foreground(a), is_foreground(b)) {
                    *o = FOREGROUND;
                }
            });
        ans
    }

    /// 并集 `self ∪ other`.
    #[inline]
    pub fn union(&self, other: &Mask) -> Mask {
        self.combine(other, |a, b| a || b)
    }

    /// 差集 `self - other`.
    #[inline]
    pub fn difference(&self, other: &Mask) -> Mask {
        self.combine(other, |a, b| a && !b)
    }

    /// 交集, 即以 `region` 为范围对 `self` 取掩膜.
    #[inline]
    pub fn intersection(&self, region: &Mask) -> Mask {
        self.combine(region, |a, b| a && b)
    }

    /// 只保留水平切片索引位于 `range` 内的前景, 其余切片清空.
    pub fn retain_z(&mut self, range: Range<usize>) {
        for (z, mut sli) in self.data.axis_iter_mut(Axis(0)).enumerate() {
            if !range.contains(&z) {
                sli.fill(BACKGROUND);
            }
        }
    }

    /// 获取 3D 掩膜 z 空间的第 `z_index` 层不可变切片.
    ///
    /// 当 `z_index` 越界时 panic.
    #[inline]
    pub fn slice_at(&self, z_index: usize) -> MaskSlice<'_> {
        MaskSlice::new(self.data.index_axis(Axis(0), z_index))
    }

    /// 获取 3D 掩膜 z 空间的第 `z_index` 层可变切片.
    ///
    /// 当 `z_index` 越界时 panic.
    #[inline]
    pub fn slice_at_mut(&mut self, z_index: usize) -> MaskSliceMut<'_> {
        MaskSliceMut::new(self.data.index_axis_mut(Axis(0), z_index))
    }

    /// 获取能按升序迭代 3D 掩膜水平不可变切片的迭代器.
    #[inline]
    pub fn slice_iter(&self) -> impl ExactSizeIterator<Item = MaskSlice<'_>> {
        self.data.axis_iter(Axis(0)).map(MaskSlice::new)
    }
}

#[cfg(test)]
mod tests {
    use super::{Geometry, Mask};
    use crate::consts::gray::FOREGROUND;

    fn line(xs: &[usize]) -> Mask {
        let mut m = Mask::zeros(Geometry::with_spacing([5, 1, 1], [1.0; 3]));
        for &x in xs {
            m[(0, 0, x)] = 7;
        }
        m
    }

    #[test]
    fn test_set_operations() {
        let a = line(&[0, 1, 2]);
        let b = line(&[2, 3]);

        assert_eq!(a.union(&b).positions().len(), 4);
        assert_eq!(a.difference(&b).positions(), vec![(0, 0, 0), (0, 0, 1)]);
        assert_eq!(a.intersection(&b).positions(), vec![(0, 0, 2)]);
        assert_eq!(a.intersection(&b)[(0, 0, 2)], FOREGROUND);
    }

    #[test]
    fn test_retain_and_binarize() {
        let mut m = Mask::zeros(Geometry::with_spacing([2, 2, 4], [1.0; 3]));
        m.data_mut().fill(3);
        m.retain_z(1..3);
        assert_eq!(m.count(), 8);
        assert!(m.slice_at(0).is_empty());
        assert!(!m.slice_at(2).is_empty());

        m.binarize();
        assert!(m.data().iter().all(|p| *p <= FOREGROUND));
    }

    #[test]
    #[should_panic]
    fn test_shape_mismatch() {
        let g = Geometry::with_spacing([2, 3, 4], [1.0; 3]);
        Mask::new(g, ndarray::Array3::zeros((2, 3, 4)));
    }
}
