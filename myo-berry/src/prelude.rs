//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx2dF, Idx3d};

pub use crate::data::{Geometry, Mask, MaskSlice, MaskSliceMut, Radius, RoiBox, ShapeStatistics};

pub use crate::aha::{
    generate_left_ventricle_segments, AnatomicalMasks, Band, Labels, SegmentConfig, SegmentId,
    SegmentSummary, Segments,
};

pub use crate::consts::gray::{BACKGROUND, FOREGROUND};
pub use crate::consts::SEGMENT_COUNT;

pub use crate::dataset::{self, home_dataset_dir_with, load_case, save_segments};

pub use crate::sector::AngularWindow;

pub use crate::transform::{CompositeTransform, RigidTransform, Transform3d, TransformSequence};

pub use crate::{Result, SegmentError};
