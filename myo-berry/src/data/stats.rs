//! 掩膜形状统计.

use nalgebra::{Matrix3, Point3, SymmetricEigen, Unit, Vector3};

use super::Mask;
use crate::consts::gray::is_foreground;
use crate::Idx3d;

/// 单个掩膜前景区域的形状统计信息.
#[derive(Clone, Debug)]
pub struct ShapeStatistics {
    count: usize,
    bbox_min: Idx3d,
    bbox_max: Idx3d,
    centroid_index: Vector3<f64>,
    centroid: Point3<f64>,
    principal_axis: Unit<Vector3<f64>>,
}

impl ShapeStatistics {
    /// 前景体素个数. 总是大于 0.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// 包围盒最小索引 `(z, y, x)`, 含.
    #[inline]
    pub fn bbox_min(&self) -> Idx3d {
        self.bbox_min
    }

    /// 包围盒最大索引 `(z, y, x)`, 含.
    #[inline]
    pub fn bbox_max(&self) -> Idx3d {
        self.bbox_max
    }

    /// 质心的连续索引 `(x, y, z)`.
    #[inline]
    pub fn centroid_index(&self) -> &Vector3<f64> {
        &self.centroid_index
    }

    /// 质心的物理坐标.
    #[inline]
    pub fn centroid(&self) -> &Point3<f64> {
        &self.centroid
    }

    /// 第一主轴, 即物理坐标协方差矩阵最大特征值对应的单位特征向量.
    /// 符号没有保证.
    #[inline]
    pub fn principal_axis(&self) -> &Unit<Vector3<f64>> {
        &self.principal_axis
    }
}

impl Mask {
    /// 计算前景区域的形状统计信息. 如果不存在前景则返回 `None`.
    pub fn shape_statistics(&self) -> Option<ShapeStatistics> {
        let mut count = 0usize;
        let mut lo = (usize::MAX, usize::MAX, usize::MAX);
        let mut hi = (0usize, 0usize, 0usize);
        let mut sum = Vector3::<f64>::zeros();
        let mut sum_sq = Matrix3::<f64>::zeros();

        for ((z, y, x), _) in self.data.indexed_iter().filter(|(_, p)| is_foreground(**p)) {
            count += 1;
            lo = (lo.0.min(z), lo.1.min(y), lo.2.min(x));
            hi = (hi.0.max(z), hi.1.max(y), hi.2.max(x));
            let v = Vector3::new(x as f64, y as f64, z as f64);
            sum += v;
            sum_sq += v * v.transpose();
        }
        if count == 0 {
            return None;
        }

        let n = count as f64;
        let mean = sum / n;
        let cov_index = sum_sq / n - mean * mean.transpose();
        let m = self.geometry.index_matrix();
        let cov = m * cov_index * m.transpose();

        let eigen = SymmetricEigen::new(cov);
        let (k, _) = eigen
            .eigenvalues
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |acc, (i, &v)| {
                if v > acc.1 {
                    (i, v)
                } else {
                    acc
                }
            });
        let principal_axis = Unit::new_normalize(eigen.eigenvectors.column(k).into_owned());

        Some(ShapeStatistics {
            count,
            bbox_min: lo,
            bbox_max: hi,
            centroid_index: mean,
            centroid: self.geometry.index_to_physical(&mean),
            principal_axis,
        })
    }

    /// 前景质心的物理坐标. 如果不存在前景则返回 `None`.
    #[inline]
    pub fn centroid(&self) -> Option<Point3<f64>> {
        self.shape_statistics().map(|s| s.centroid)
    }
}
