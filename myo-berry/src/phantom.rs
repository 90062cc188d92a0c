//! 合成心脏体模, 用于测试和演示.
//!
//! 左心室是一段沿 `z` 轴的圆柱, 下端接半椭球形的心尖帽 (心尖位于切片索引较小的一侧);
//! 其上依次为二尖瓣圆盘和左心房圆柱. 右心室是左心室外侧的一段月牙形,
//! 按 "图像向上" 的极角约定覆盖 `[rv_arc.0, rv_arc.1]`. 全心为以上结构的并集.
//!
//! 所有长度以体素为单位.

use std::f64::consts::PI;

use nalgebra::{Point3, Vector3};
use ndarray::Array3;

use crate::aha::{AnatomicalMasks, Labels};
use crate::sector::{normalize_arc, polar_arc};
use crate::transform::RigidTransform;
use crate::{Geometry, Mask};

/// 体模参数.
#[derive(Clone, Debug, PartialEq)]
pub struct PhantomHeart {
    /// 网格大小 `(x, y, z)`.
    pub size: [usize; 3],
    /// 体素分辨率 `(x, y, z)`.
    pub spacing: [f64; 3],
    /// 长轴在水平切片上的位置 `(y, x)`.
    pub center: (f64, f64),
    /// 左心室外半径.
    pub lv_radius: f64,
    /// 心尖所在切片.
    pub apex_z: usize,
    /// 心尖帽高度.
    pub cap_height: usize,
    /// 左心室最上端切片 (含).
    pub base_z: usize,
    /// 二尖瓣厚度 (切片数) 与半径.
    pub mv: (usize, f64),
    /// 左心房高度 (切片数) 与半径.
    pub la: (usize, f64),
    /// 右心室的内外半径.
    pub rv_radius: (f64, f64),
    /// 右心室覆盖的极角范围 (弧度).
    pub rv_arc: (f64, f64),
}

impl Default for PhantomHeart {
    fn default() -> Self {
        Self {
            size: [56, 56, 72],
            spacing: [1.0; 3],
            center: (28.0, 28.0),
            lv_radius: 12.0,
            apex_z: 12,
            cap_height: 8,
            base_z: 50,
            mv: (2, 8.0),
            la: (10, 9.0),
            rv_radius: (13.0, 18.0),
            rv_arc: (0.0, 2.0 * PI / 3.0),
        }
    }
}

impl PhantomHeart {
    /// 体模网格.
    pub fn geometry(&self) -> Geometry {
        Geometry::with_spacing(self.size, self.spacing)
    }

    fn draw<F: Fn(usize, f64, f64) -> bool>(&self, pred: F) -> Mask {
        let geometry = self.geometry();
        let (cy, cx) = self.center;
        let data = Array3::from_shape_fn(geometry.shape(), |(z, y, x)| {
            u8::from(pred(z, y as f64 - cy, x as f64 - cx))
        });
        Mask::new(geometry, data)
    }

    /// 左心室 (含血池).
    pub fn left_ventricle(&self) -> Mask {
        let r2 = self.lv_radius * self.lv_radius;
        let cyl_start = self.apex_z + self.cap_height;
        let h = self.cap_height as f64;
        self.draw(|z, dy, dx| {
            let d2 = dy * dy + dx * dx;
            if (cyl_start..=self.base_z).contains(&z) {
                d2 <= r2
            } else if (self.apex_z..cyl_start).contains(&z) {
                let t = (cyl_start - z) as f64 / h;
                d2 <= r2 * (1.0 - t * t)
            } else {
                false
            }
        })
    }

    /// 二尖瓣圆盘, 紧接左心室之上.
    pub fn mitral_valve(&self) -> Mask {
        let (n, r) = self.mv;
        let zs = self.base_z + 1..self.base_z + 1 + n;
        self.draw(|z, dy, dx| zs.contains(&z) && dy * dy + dx * dx <= r * r)
    }

    /// 左心房圆柱, 紧接二尖瓣之上.
    pub fn left_atrium(&self) -> Mask {
        let (n, r) = self.la;
        let start = self.base_z + 1 + self.mv.0;
        let zs = start..start + n;
        self.draw(|z, dy, dx| zs.contains(&z) && dy * dy + dx * dx <= r * r)
    }

    /// 右心室月牙, 与左心室圆柱部分等高.
    pub fn right_ventricle(&self) -> Mask {
        let (r0, r1) = self.rv_radius;
        let (a0, a1) = self.rv_arc;
        let zs = self.apex_z + self.cap_height..=self.base_z;
        self.draw(|z, dy, dx| {
            let d2 = dy * dy + dx * dx;
            let arc = normalize_arc(polar_arc((0.0, 0.0), (dy, dx)));
            zs.contains(&z) && (r0 * r0..=r1 * r1).contains(&d2) && (a0..=a1).contains(&arc)
        })
    }

    /// 以 `labels` 命名的五个掩膜.
    pub fn build(&self, labels: &Labels) -> AnatomicalMasks {
        let lv = self.left_ventricle();
        let la = self.left_atrium();
        let rv = self.right_ventricle();
        let mv = self.mitral_valve();
        let heart = lv.union(&la).union(&rv).union(&mv);
        [
            (labels.left_ventricle.as_str(), lv),
            (labels.left_atrium.as_str(), la),
            (labels.right_ventricle.as_str(), rv),
            (labels.mitral_valve.as_str(), mv),
            (labels.whole_heart.as_str(), heart),
        ]
        .into_iter()
        .collect()
    }

    /// 绕穿过网格中心的 `x` 轴旋转 `angle` 弧度的刚体变换.
    pub fn tilt(&self, angle: f64) -> RigidTransform {
        let geometry = self.geometry();
        let mid = Vector3::from(self.size.map(|n| (n as f64 - 1.0) / 2.0));
        let center: Point3<f64> = geometry.index_to_physical(&mid);
        RigidTransform::new(center, Vector3::x_axis(), angle)
    }

    /// 以 [`Self::tilt`] 倾斜后的五个掩膜.
    pub fn build_tilted(&self, labels: &Labels, angle: f64) -> AnatomicalMasks {
        let t = self.tilt(angle);
        self.build(labels).map(|m| m.resample(&t))
    }
}
