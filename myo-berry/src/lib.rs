#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 从一组共享同一三维网格的二值解剖掩膜 (左心室, 左心房, 右心室,
//! 二尖瓣, 全心) 出发, 计算左心室心肌的 AHA 17 节段划分, 并将结果投影回原始图像空间.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 该 crate 不负责生成掩膜本身 (例如多图谱配准), 也不检查输入在解剖学上是否合理.
//! 2. 所有依赖输入数据的失败都以 [`SegmentError`] 返回, 不会 panic.
//!   程序内部不变量被破坏时才会 panic.
//!
//! # 开发计划
//!
//! ### 体积与几何基础结构 ✅
//!
//! 带有 `{size, spacing, origin, direction}` 几何信息的二值体积 [`Mask`],
//! 以及索引坐标与物理坐标的互相转换.
//!
//! 实现位于 `myo-berry/src/data`.
//!
//! ### 三维形态学操作 ✅
//!
//! 基于可分离各向异性欧氏距离变换的椭球结构元腐蚀, 膨胀和闭运算.
//!
//! 实现位于 `myo-berry/src/data/morph_3d`.
//!
//! ### 刚体变换与最近邻重采样 ✅
//!
//! 不可变的刚体旋转 [`RigidTransform`], 只追加的变换序列, 复合与求逆.
//!
//! 实现位于 `myo-berry/src/transform`.
//!
//! ### 判断一个像素是否在一个角度窗口内 ✅
//!
//! 半开区间窗口与跨越 0 弧度的 "环绕" 窗口.
//!
//! 实现位于 `myo-berry/src/data/sector.rs`.
//!
//! ### AHA 17 节段划分 ✅
//!
//! 1. 以全心掩膜裁剪 ROI;
//! 2. 主轴对齐, 然后以 "二尖瓣质心 -> 心尖" 向量迭代精化长轴;
//! 3. 以腐蚀差提取心肌壁;
//! 4. 沿长轴三等分为心尖段, 中段, 基底段, 外加心尖帽;
//! 5. 以右心室插入角为参考逐切片进行角度划分;
//! 6. 逆变换回裁剪空间, 闭运算填洞, 粘贴回原始空间.
//!
//! 实现位于 `myo-berry/src/aha`.
//!
//! ### nifti 读写与病例加载 ✅
//!
//! 实现位于 `myo-berry/src/dataset`.
//!
//! ### 合成体模 ✅
//!
//! 用于测试的圆柱形左心室体模.
//!
//! 实现位于 `myo-berry/src/phantom.rs`.

/// 二维索引 `(y, x)`, 同时也可一定程度上用作非负整数向量.
pub type Idx2d = (usize, usize);

/// 三维索引 `(z, y, x)`, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

/// 高精度二维坐标 `(y, x)`.
pub type Idx2dF = (f64, f64);

/// 带几何信息的二值体积.
mod data;

pub use data::{Geometry, Mask, MaskSlice, MaskSliceMut, Radius, RoiBox, ShapeStatistics};

pub use data::sector;

pub mod aha;

pub mod consts;

pub mod dataset;

mod error;

pub use error::{Result, SegmentError};

pub mod phantom;

pub mod prelude;

pub mod transform;

pub use transform::{CompositeTransform, RigidTransform, Transform3d, TransformSequence};
