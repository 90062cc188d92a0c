//! 体积的几何信息.
//!
//! 所有三元数组均按 ITK 惯例以 `(x, y, z)` 排列, 与 nifti 文件的轴序一致.
//! 底层 `ndarray` 数据则按 `(z, y, x)` 访问, 见 [`crate::Idx3d`].

use nalgebra::{Matrix3, Point3, Unit, Vector3};

use crate::consts::GEOMETRY_TOLERANCE;
use crate::Idx3d;

/// 体素每轴的整数半径 `(x, y, z)`.
pub type Radius = [usize; 3];

/// 三维网格的几何信息.
///
/// 连续索引 `i = (x, y, z)` 对应的物理坐标为 `origin + direction * diag(spacing) * i`,
/// 单位为毫米.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    size: [usize; 3],
    spacing: Vector3<f64>,
    origin: Point3<f64>,
    direction: Matrix3<f64>,
}

impl Geometry {
    /// 创建几何信息.
    ///
    /// `spacing` 的每个分量必须为正有限数, `direction` 必须可逆, 否则程序 panic.
    pub fn new(
        size: [usize; 3],
        spacing: [f64; 3],
        origin: [f64; 3],
        direction: Matrix3<f64>,
    ) -> Self {
        assert!(
            spacing.iter().all(|s| s.is_finite() && *s > 0.0),
            "体素分辨率 `{spacing:?}` 非法"
        );
        assert!(Self::is_valid_direction(&direction), "方向矩阵不可逆");
        Self {
            size,
            spacing: Vector3::from(spacing),
            origin: Point3::from(origin),
            direction,
        }
    }

    /// `direction` 是否有限且可逆?
    #[inline]
    pub fn is_valid_direction(direction: &Matrix3<f64>) -> bool {
        let det = direction.determinant();
        det.is_finite() && det.abs() > 1e-12
    }

    /// 创建原点为 `0`, 方向为单位矩阵的几何信息.
    #[inline]
    pub fn with_spacing(size: [usize; 3], spacing: [f64; 3]) -> Self {
        Self::new(size, spacing, [0.0; 3], Matrix3::identity())
    }

    /// 体素个数 `(x, y, z)`.
    #[inline]
    pub fn size(&self) -> [usize; 3] {
        self.size
    }

    /// 体素分辨率 `(x, y, z)`, 以毫米为单位.
    #[inline]
    pub fn spacing(&self) -> &Vector3<f64> {
        &self.spacing
    }

    /// 索引 `(0, 0, 0)` 体素中心的物理坐标.
    #[inline]
    pub fn origin(&self) -> &Point3<f64> {
        &self.origin
    }

    /// 方向矩阵. 第 `k` 列是第 `k` 个索引轴在物理空间中的单位方向.
    #[inline]
    pub fn direction(&self) -> &Matrix3<f64> {
        &self.direction
    }

    /// 底层数据形状 `(z, y, x)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        let [x, y, z] = self.size;
        (z, y, x)
    }

    /// 水平切片个数.
    #[inline]
    pub fn len_z(&self) -> usize {
        self.size[2]
    }

    /// 体素总个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.size.iter().product()
    }

    /// 网格是否为空?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 单个体素的体积, 以立方毫米为单位.
    #[inline]
    pub fn voxel_volume(&self) -> f64 {
        self.spacing.iter().product::<f64>() * self.direction.determinant().abs()
    }

    /// 索引到物理坐标的线性部分 `direction * diag(spacing)`.
    #[inline]
    pub fn index_matrix(&self) -> Matrix3<f64> {
        self.direction * Matrix3::from_diagonal(&self.spacing)
    }

    /// 连续索引 `(x, y, z)` 转换为物理坐标.
    #[inline]
    pub fn index_to_physical(&self, index: &Vector3<f64>) -> Point3<f64> {
        self.origin + self.index_matrix() * index
    }

    /// 体素索引 `(z, y, x)` 转换为其中心的物理坐标.
    #[inline]
    pub fn idx3d_to_physical(&self, (z, y, x): Idx3d) -> Point3<f64> {
        self.index_to_physical(&Vector3::new(x as f64, y as f64, z as f64))
    }

    /// 物理坐标转换为连续索引 `(x, y, z)`.
    #[inline]
    pub fn physical_to_index(&self, point: &Point3<f64>) -> Vector3<f64> {
        // `new` 保证 spacing 为正, 方向矩阵可逆.
        let inv = self
            .index_matrix()
            .try_inverse()
            .unwrap_or_else(|| unreachable!());
        inv * (point - self.origin)
    }

    /// `z` 索引轴 (切片法向) 在物理空间中的单位方向.
    /// 方向矩阵为单位矩阵时即 `(0, 0, 1)`.
    #[inline]
    pub fn slice_axis(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.direction.column(2).into_owned())
    }

    /// 判断两者是否几何兼容, 即 size, spacing, origin, direction 四者均一致.
    pub fn is_compatible(&self, other: &Geometry) -> bool {
        self.size == other.size
            && (self.spacing - other.spacing).amax() <= GEOMETRY_TOLERANCE
            && (self.origin - other.origin).amax() <= GEOMETRY_TOLERANCE
            && (self.direction - other.direction).amax() <= GEOMETRY_TOLERANCE
    }

    /// 以体素偏移 `index` 和大小 `size` (均为 `(x, y, z)`) 描述的子网格的几何信息.
    pub fn sub_geometry(&self, index: [usize; 3], size: [usize; 3]) -> Geometry {
        let [x, y, z] = index;
        Self {
            size,
            spacing: self.spacing,
            origin: self.idx3d_to_physical((z, y, x)),
            direction: self.direction,
        }
    }

    /// 将毫米长度转换为每轴的整数体素半径 (截断取整).
    pub fn radius_in_voxels(&self, mm: f64) -> Radius {
        debug_assert!(mm >= 0.0);
        self.spacing.map(|s| (mm / s) as usize).into()
    }

    /// 检查索引 `(z, y, x)` 是否合法.
    #[inline]
    pub fn check(&self, (z0, y0, x0): &Idx3d) -> bool {
        let (z, y, x) = self.shape();
        *z0 < z && *y0 < y && *x0 < x
    }
}
