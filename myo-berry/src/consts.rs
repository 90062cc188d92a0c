//! 通用常量.

/// 二值掩膜的体素值.
pub mod gray {
    /// 背景体素值.
    pub const BACKGROUND: u8 = 0;

    /// 前景体素值.
    pub const FOREGROUND: u8 = 1;

    /// 体素是否是前景? 任何非零值都被当做前景.
    #[inline]
    pub const fn is_foreground(p: u8) -> bool {
        p != BACKGROUND
    }

    /// 体素是否是背景?
    #[inline]
    pub const fn is_background(p: u8) -> bool {
        p == BACKGROUND
    }
}

/// 默认结构名.
pub mod label {
    /// 左心室.
    pub const LEFT_VENTRICLE: &str = "LEFTVENTRICLE";

    /// 左心房.
    pub const LEFT_ATRIUM: &str = "LEFTATRIUM";

    /// 右心室.
    pub const RIGHT_VENTRICLE: &str = "RIGHTVENTRICLE";

    /// 二尖瓣.
    pub const MITRAL_VALVE: &str = "MITRALVALVE";

    /// 全心.
    pub const WHOLE_HEART: &str = "WHOLEHEART";
}

/// AHA 模型的节段个数.
pub const SEGMENT_COUNT: usize = 17;

/// 计算基底参考角时使用的切片个数 (从中段/基底段分界处开始).
pub const BASAL_REFERENCE_SLICES: usize = 5;

/// 默认 ROI 扩展量 `(x, y, z)`, 以毫米为单位.
pub const DEFAULT_ROI_MARGIN_MM: [f64; 3] = [30.0, 30.0, 60.0];

/// 几何信息比较时使用的容差.
pub const GEOMETRY_TOLERANCE: f64 = 1e-6;
