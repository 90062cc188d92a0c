//! 刚体变换, 变换序列与最近邻重采样.
//!
//! 所有变换都作用在物理坐标 (毫米) 上. 刚体变换一旦创建就不可变;
//! 多次纠正得到的变换追加到 [`TransformSequence`] 中, 只在最后复合一次.

use nalgebra::{Isometry3, Point3, Translation3, Unit, UnitQuaternion, Vector3};

mod resample;

/// 可转换为物理空间等距变换的对象.
pub trait Transform3d {
    /// 对应的等距变换 `p -> R * p + t`.
    fn to_isometry(&self) -> Isometry3<f64>;

    /// 变换单个物理点.
    #[inline]
    fn transform_point(&self, p: &Point3<f64>) -> Point3<f64> {
        self.to_isometry().transform_point(p)
    }
}

/// 两个向量之间的夹角, 位于 `[0, PI]`. 任一向量为零时返回 `0`.
#[inline]
pub fn vector_angle(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.angle(b)
}

/// 绕物理点 `center` 的刚体旋转.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RigidTransform {
    center: Point3<f64>,
    axis: Unit<Vector3<f64>>,
    angle: f64,
}

impl RigidTransform {
    /// 绕 `center`, 以 `axis` 为转轴 (右手定则) 旋转 `angle` 弧度.
    #[inline]
    pub fn new(center: Point3<f64>, axis: Unit<Vector3<f64>>, angle: f64) -> Self {
        Self {
            center,
            axis,
            angle,
        }
    }

    /// 创建将方向 `from` 旋转到方向 `to` 的刚体变换, 旋转中心为 `center`.
    ///
    /// 转轴为 `from x to`, 角度为两者夹角. 两者平行时退化为恒等旋转;
    /// 两者反向时绕任一与 `from` 垂直的轴旋转半圈.
    pub fn aligning(center: Point3<f64>, from: &Vector3<f64>, to: &Vector3<f64>) -> Self {
        let angle = vector_angle(from, to);
        match Unit::try_new(from.cross(to), 1e-12) {
            Some(axis) => Self::new(center, axis, angle),
            None if angle < std::f64::consts::FRAC_PI_2 => Self::new(center, Vector3::z_axis(), 0.0),
            None => Self::new(center, perpendicular(from), std::f64::consts::PI),
        }
    }

    /// 旋转中心.
    #[inline]
    pub fn center(&self) -> &Point3<f64> {
        &self.center
    }

    /// 转轴.
    #[inline]
    pub fn axis(&self) -> &Unit<Vector3<f64>> {
        &self.axis
    }

    /// 旋转角度 (弧度).
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// 旋转部分.
    #[inline]
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&self.axis, self.angle)
    }
}

impl Transform3d for RigidTransform {
    /// `p -> R (p - c) + c`.
    fn to_isometry(&self) -> Isometry3<f64> {
        let r = self.rotation();
        let c = self.center.coords;
        Isometry3::from_parts(Translation3::from(c - r * c), r)
    }
}

/// 与 `v` 垂直的任一单位向量.
fn perpendicular(v: &Vector3<f64>) -> Unit<Vector3<f64>> {
    let helper = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
        Vector3::x()
    } else if v.y.abs() <= v.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    Unit::new_normalize(v.cross(&helper))
}

/// 只追加的刚体变换序列. 先追加的变换先作用.
#[derive(Clone, Debug, Default)]
pub struct TransformSequence {
    items: Vec<RigidTransform>,
}

impl TransformSequence {
    /// 空序列.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加变换.
    #[inline]
    pub fn push(&mut self, t: RigidTransform) {
        self.items.push(t);
    }

    /// 变换个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 是否为空?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 按追加顺序迭代.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, RigidTransform> {
        self.items.iter()
    }

    /// 最近追加的变换.
    #[inline]
    pub fn last(&self) -> Option<&RigidTransform> {
        self.items.last()
    }

    /// 复合为单个变换 `T_n ∘ ... ∘ T_1`.
    pub fn compose(&self) -> CompositeTransform {
        let iso = self
            .items
            .iter()
            .fold(Isometry3::identity(), |acc, t| t.to_isometry() * acc);
        CompositeTransform { iso }
    }
}

impl<'a> IntoIterator for &'a TransformSequence {
    type Item = &'a RigidTransform;
    type IntoIter = std::slice::Iter<'a, RigidTransform>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// 复合后的刚体变换. 只能作为整体求逆.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeTransform {
    iso: Isometry3<f64>,
}

impl CompositeTransform {
    /// 整体的逆变换.
    #[inline]
    pub fn inverse(&self) -> Self {
        Self {
            iso: self.iso.inverse(),
        }
    }

    /// 总旋转角度 (弧度).
    #[inline]
    pub fn angle(&self) -> f64 {
        self.iso.rotation.angle()
    }
}

impl Transform3d for CompositeTransform {
    #[inline]
    fn to_isometry(&self) -> Isometry3<f64> {
        self.iso
    }
}
