//! 刚体变换下的最近邻重采样.

use nalgebra::{Matrix3, Vector3};
use ndarray::{ArrayView3, ArrayViewMut2, Axis};

use super::Transform3d;
use crate::consts::gray::BACKGROUND;
use crate::Mask;

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
    }
}

/// 最近邻取整 (四舍五入, `.5` 向上), 越界返回 `None`.
#[inline]
fn nearest(v: &Vector3<f64>, size: [usize; 3]) -> Option<(usize, usize, usize)> {
    let mut idx = [0usize; 3];
    for k in 0..3 {
        let r = (v[k] + 0.5).floor();
        if !(0.0..size[k] as f64).contains(&r) {
            return None;
        }
        idx[k] = r as usize;
    }
    let [x, y, z] = idx;
    Some((z, y, x))
}

impl Mask {
    /// 在同一网格上用变换 `t` 移动掩膜内容, 即 `out(p) = in(t^-1(p))`.
    ///
    /// 采用最近邻插值, 落在网格以外的体素填充背景.
    pub fn resample<T: Transform3d + ?Sized>(&self, t: &T) -> Mask {
        let geo = self.geometry();
        let m = geo.index_matrix();
        // `Geometry::new` 保证索引矩阵可逆.
        let m_inv = m.try_inverse().unwrap_or_else(|| unreachable!());
        let inv = t.to_isometry().inverse();
        let r: Matrix3<f64> = inv.rotation.to_rotation_matrix().into_inner();
        let o = geo.origin().coords;

        // 输出索引 i -> 输入连续索引 a * i + b.
        let a = m_inv * r * m;
        let b = m_inv * (r * o + inv.translation.vector - o);
        let size = geo.size();
        let src = self.data();

        let mut out = self.zeros_like();
        let body = |z: usize, plane: ArrayViewMut2<u8>| fill_plane(z, plane, &src, &a, &b, size);

        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                out.data_mut()
                    .axis_iter_mut(Axis(0))
                    .into_par_iter()
                    .enumerate()
                    .for_each(|(z, plane)| body(z, plane));
            } else {
                out.data_mut()
                    .axis_iter_mut(Axis(0))
                    .enumerate()
                    .for_each(|(z, plane)| body(z, plane));
            }
        }
        out
    }
}

fn fill_plane(
    z: usize,
    mut plane: ArrayViewMut2<u8>,
    src: &ArrayView3<u8>,
    a: &Matrix3<f64>,
    b: &Vector3<f64>,
    size: [usize; 3],
) {
    for ((y, x), v) in plane.indexed_iter_mut() {
        let i = Vector3::new(x as f64, y as f64, z as f64);
        *v = match nearest(&(a * i + b), size) {
            Some(p) => src[p],
            None => BACKGROUND,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geometry, RigidTransform, TransformSequence};
    use itertools::iproduct;
    use nalgebra::{Point3, Unit};
    use std::f64::consts::FRAC_PI_2;

    fn block() -> Mask {
        let geo = Geometry::with_spacing([9, 9, 9], [1.0, 1.0, 1.0]);
        let mut mask = Mask::zeros(geo);
        for x in 5..8 {
            mask[(4, 4, x)] = 1;
        }
        mask
    }

    /// 绕体积中心的 z 轴旋转 90 度: `+x` 方向的线段转到 `+y` 方向.
    #[test]
    fn test_resample_rotate_z() {
        let mask = block();
        let t = RigidTransform::new(Point3::new(4.0, 4.0, 4.0), nalgebra::Vector3::z_axis(), FRAC_PI_2);
        let out = mask.resample(&t);
        assert_eq!(out.count(), 3);
        for y in 5..8 {
            assert_eq!(out[(4, y, 4)], 1);
        }
    }

    #[test]
    fn test_resample_out_of_grid() {
        let mask = block();
        // 绕 (0, 0, 0) 转半圈, 所有内容移出网格.
        let axis = Unit::new_normalize(nalgebra::Vector3::new(0.0, 0.0, 1.0));
        let t = RigidTransform::new(Point3::origin(), axis, std::f64::consts::PI);
        assert!(mask.resample(&t).is_empty());
    }

    /// 变换后再逆变换应当复原 (最近邻误差以内).
    #[test]
    fn test_round_trip() {
        let geo = Geometry::with_spacing([32, 32, 32], [1.0, 1.0, 1.5]);
        let mut mask = Mask::zeros(geo);
        for p in iproduct!(8..24, 8..24, 8..24) {
            mask[p] = 1;
        }
        let c = Point3::new(16.0, 16.0, 24.0);
        let mut seq = TransformSequence::new();
        seq.push(RigidTransform::new(c, nalgebra::Vector3::x_axis(), 0.3));
        seq.push(RigidTransform::new(c, nalgebra::Vector3::y_axis(), -0.2));
        let comp = seq.compose();
        let back = mask.resample(&comp).resample(&comp.inverse());

        let diff = back.difference(&mask).count() + mask.difference(&back).count();
        assert!(diff * 4 < mask.count(), "{diff} / {}", mask.count());
    }
}
