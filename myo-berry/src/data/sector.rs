//! 水平切片上的角度窗口.
//!
//! 我们一般使用行优先编码存储二维切片, 行 `y` 向下增长, 列 `x` 向右增长.
//! 为了与常规平面直角坐标系一致, 计算极角时将 `y` 取反 ("图像向上"),
//! 即 `arc = atan2(-(p_y - c_y), p_x - c_x)`. 这样 `x` 增加的方向弧度为 `0`,
//! 图像向上的方向弧度为 `pi / 2`, 逆时针为正方向.
//!
//! 所有弧度都通过归一化保证位于 `[0, 2 * PI)` 内.

use std::fmt::Formatter;

use crate::Idx2dF;

/// `2 * PI`.
pub const PI_2: f64 = std::f64::consts::PI * 2.0;

/// 弧度转换为角度.
#[inline]
pub fn arc_to_angle(arc: f64) -> f64 {
    arc * 180.0 * std::f64::consts::FRAC_1_PI
}

/// 将任意有限弧度归一化到 `[0, 2 * PI)`.
#[inline]
pub fn normalize_arc(arc: f64) -> f64 {
    let r = arc.rem_euclid(PI_2);
    // `rem_euclid` 在极小负数上可能返回 `2 * PI` 本身.
    if r >= PI_2 {
        0.0
    } else {
        r
    }
}

/// 获取点 `point` 相对于 `center` 的 "图像向上" 极角 (未归一化, 位于 `(-PI, PI]`).
///
/// 两者均为 `(y, x)` 坐标.
#[inline]
pub fn polar_arc((cy, cx): Idx2dF, (py, px): Idx2dF) -> f64 {
    f64::atan2(cy - py, px - cx)
}

/// 一个弧度窗口.
///
/// 普通窗口选择半开区间 `[min, max)`; "环绕" 窗口用于跨越 `0` 的唯一扇区,
/// 选择 `theta <= min` 或 `theta >= max`.
#[derive(Copy, Clone, PartialEq)]
pub struct AngularWindow {
    /// [0, 2 * pi]
    min: f64,
    /// [0, 2 * pi]; `min < max`
    max: f64,
    wrap: bool,
}

/// `AngularWindow` 初始化错误.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InitWindowError {
    /// 弧度超出表示范围.
    ArcOutOfRange,
    /// 空范围或倒置范围.
    EmptyRange,
}

/// 内部会将弧度转换为角度, 因为角度更加直观. 另外压缩到一行.
impl std::fmt::Debug for AngularWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.wrap {
            f.write_fmt(format_args!(
                "AngularWindow {{ <= {:.4}° or >= {:.4}° }}",
                arc_to_angle(self.min),
                arc_to_angle(self.max)
            ))
        } else {
            f.write_fmt(format_args!(
                "AngularWindow {{ [{:.4}°, {:.4}°) }}",
                arc_to_angle(self.min),
                arc_to_angle(self.max)
            ))
        }
    }
}

impl AngularWindow {
    /// 创建半开窗口 `[min, max)`.
    ///
    /// # 返回值
    ///
    /// - 当 `min` 或 `max` 不在 `[0, 2 * PI]` 范围内时, 返回 `Err(InitWindowError::ArcOutOfRange)`;
    /// - 当 `min >= max` 时, 返回 `Err(InitWindowError::EmptyRange)`;
    /// - 其他情况下成功.
    pub fn new(min: f64, max: f64) -> Result<Self, InitWindowError> {
        Self::check(min, max)?;
        Ok(Self {
            min,
            max,
            wrap: false,
        })
    }

    /// 创建环绕窗口, 选择 `theta <= min` 或 `theta >= max`.
    /// 参数约束与 [`Self::new`] 相同.
    pub fn new_wrap(min: f64, max: f64) -> Result<Self, InitWindowError> {
        Self::check(min, max)?;
        Ok(Self {
            min,
            max,
            wrap: true,
        })
    }

    /// 常量表专用的构造器, 不做检查.
    pub(crate) const fn new_unchecked(min: f64, max: f64, wrap: bool) -> Self {
        Self { min, max, wrap }
    }

    fn check(min: f64, max: f64) -> Result<(), InitWindowError> {
        const R: std::ops::RangeInclusive<f64> = 0.0..=PI_2;
        if !R.contains(&min) || !R.contains(&max) {
            return Err(InitWindowError::ArcOutOfRange);
        }
        if min >= max {
            return Err(InitWindowError::EmptyRange);
        }
        Ok(())
    }

    /// 下界.
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 上界.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// 是否为环绕窗口?
    #[inline]
    pub fn is_wrap(&self) -> bool {
        self.wrap
    }

    /// 判断弧度 `theta` 是否位于窗口内. 非有限值总是返回 `false`.
    #[inline]
    pub fn contains(&self, theta: f64) -> bool {
        if !theta.is_finite() {
            return false;
        }
        if self.wrap {
            theta <= self.min || theta >= self.max
        } else {
            self.min <= theta && theta < self.max
        }
    }

    /// 获取窗口在 `[0, 2 * PI)` 上覆盖的弧度.
    pub fn arc(&self) -> f64 {
        if self.wrap {
            self.min + (PI_2 - self.max)
        } else {
            self.max - self.min
        }
    }

    /// 获取窗口覆盖的角度.
    #[inline]
    pub fn angle(&self) -> f64 {
        arc_to_angle(self.arc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::*;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-8
    }

    /// 测试基本初始化错误问题.
    #[test]
    fn test_window_init_err() {
        assert_eq!(
            AngularWindow::new(-0.01, 1.0).unwrap_err(),
            InitWindowError::ArcOutOfRange
        );
        assert_eq!(
            AngularWindow::new(1.0, PI_2 + 0.1).unwrap_err(),
            InitWindowError::ArcOutOfRange
        );
        assert_eq!(
            AngularWindow::new(1.2, 1.2).unwrap_err(),
            InitWindowError::EmptyRange
        );
        assert_eq!(
            AngularWindow::new_wrap(2.0, 1.0).unwrap_err(),
            InitWindowError::EmptyRange
        );
    }

    fn assert_arc(center: (f64, f64), to: (f64, f64), arc: f64) {
        assert!(f64_eq(arc, normalize_arc(polar_arc(center, to))));
    }

    /// 测试基本角度的正确性. 注意 `y` 向下增长.
    #[test]
    fn test_polar_arc() {
        assert_arc((1.0, 1.0), (1.0, 2.0), 0.0);
        assert_arc((1.0, 1.0), (0.0, 2.0), FRAC_PI_4);
        assert_arc((1.0, 1.0), (0.0, 1.0), FRAC_PI_2);
        assert_arc((1.0, 1.0), (1.0, 0.0), PI);
        assert_arc((1.0, 1.0), (2.0, 1.0), PI + FRAC_PI_2);
        assert_arc((1.0, 1.0), (2.0, 2.0), PI_2 - FRAC_PI_4);
    }

    #[test]
    fn test_normalize_arc() {
        assert!(f64_eq(normalize_arc(-FRAC_PI_2), 3.0 * FRAC_PI_2));
        assert!(f64_eq(normalize_arc(5.0 * PI), PI));
        // 比一次 `+ 2 * PI` 更负的情况也要落入范围内.
        assert!(f64_eq(normalize_arc(-3.0 * PI - 1.0), PI - 1.0));
        assert_eq!(normalize_arc(-1e-18), 0.0);
        assert!((0.0..PI_2).contains(&normalize_arc(-1e-300)));
    }

    #[test]
    fn test_window_contains() {
        let w = AngularWindow::new(FRAC_PI_3, 2.0 * FRAC_PI_3).unwrap();
        assert!(w.contains(FRAC_PI_3));
        assert!(!w.contains(2.0 * FRAC_PI_3));
        assert!(!w.contains(f64::NAN));
        assert!(f64_eq(w.angle(), 60.0));

        let w = AngularWindow::new_wrap(FRAC_PI_4, 7.0 * FRAC_PI_4).unwrap();
        assert!(w.contains(0.0));
        assert!(w.contains(FRAC_PI_4));
        assert!(w.contains(7.0 * FRAC_PI_4));
        assert!(!w.contains(PI));
        assert!(f64_eq(w.arc(), FRAC_PI_2));
    }
}
