//! 运行时错误.

use thiserror::Error;

/// 17 节段划分流程中的错误. 任何错误都会立即终止流程, 不会返回部分结果.
#[derive(Error, Debug)]
pub enum SegmentError {
    /// 输入中缺少必需的结构.
    #[error("missing required structure `{0}`")]
    MissingStructure(String),

    /// 必需结构在需要质心, 包围盒或极值切片的位置上没有前景体素.
    #[error("structure `{0}` has no foreground voxels where a landmark is required")]
    EmptyMask(String),

    /// 输入掩膜之间几何信息 (size, spacing, origin, direction) 不一致.
    #[error("structure `{label}` is not geometry-compatible with `{reference}`")]
    GeometryMismatch {
        /// 不一致的结构.
        label: String,
        /// 作为参照的结构.
        reference: String,
    },

    /// 配置取值非法.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// 读入的体积无法解释为三维数据.
    #[error("volume is not three-dimensional: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// 文件系统错误.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// nifti 读写错误.
    #[error(transparent)]
    Nifti(#[from] nifti::error::NiftiError),
}

/// 本 crate 通用的 `Result`.
pub type Result<T> = std::result::Result<T, SegmentError>;
