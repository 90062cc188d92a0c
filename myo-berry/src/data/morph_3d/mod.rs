//! 3D 形态学操作.
//!
//! 结构元为以体素为单位的椭球: 位移 `o` 属于结构元当且仅当
//! `sum((o_k / r_k)^2) <= 1`. 半径为 0 的轴只允许 `o_k = 0`.
//! 腐蚀时网格外的体素视作前景, 膨胀时视作背景.

use crate::consts::gray::*;
use crate::{Mask, Radius};

mod edt;

/// 判定距离是否落在结构元内时使用的容差.
const EPS: f64 = 1e-9;

/// 3D 形态学实现块
impl Mask {
    /// 以每轴半径为 `radius` (`(x, y, z)`, 体素) 的椭球结构元进行二值腐蚀.
    pub fn erode(&self, radius: Radius) -> Mask {
        let dist = edt::scaled_squared_distance(self.data(), false, radius);
        let mut ans = self.zeros_like();
        ndarray::Zip::from(ans.data_mut())
            .and(self.data())
            .and(&dist)
            .for_each(|o, &p, &d| {
                if is_foreground(p) && d > 1.0 + EPS {
                    *o = FOREGROUND;
                }
            });
        ans
    }

    /// 以每轴半径为 `radius` (`(x, y, z)`, 体素) 的椭球结构元进行二值膨胀.
    pub fn dilate(&self, radius: Radius) -> Mask {
        let dist = edt::scaled_squared_distance(self.data(), true, radius);
        let mut ans = self.zeros_like();
        ndarray::Zip::from(ans.data_mut())
            .and(&dist)
            .for_each(|o, &d| {
                if d <= 1.0 + EPS {
                    *o = FOREGROUND;
                }
            });
        ans
    }

    /// 二值闭运算 (先膨胀后腐蚀), 用于填充小空洞.
    #[inline]
    pub fn close(&self, radius: Radius) -> Mask {
        self.dilate(radius).erode(radius)
    }
}
