//! AHA 17 节段的编号, 轴向分带和角度窗口.
//!
//! 角度窗口均相对于所在分带的参考角, 按 "图像向上" 的极角约定 (见 [`crate::sector`]).
//! 同一分带的窗口按表中顺序匹配, 第一个命中的窗口获胜;
//! 在这一规则下每个分带的窗口恰好划分 `[0, 2 * PI)`.

use std::f64::consts::PI;
use std::fmt;

use crate::consts::SEGMENT_COUNT;
use crate::sector::{AngularWindow, PI_2};

/// 节段编号, 取值 `1..=17`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentId(u8);

/// 沿长轴的分带.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    /// 心尖帽, 不再做角度划分.
    Apex,
    /// 心尖段.
    Apical,
    /// 中段.
    Mid,
    /// 基底段.
    Basal,
}

const fn window(min: f64, max: f64) -> AngularWindow {
    AngularWindow::new_unchecked(min, max, false)
}

const APICAL: [(u8, AngularWindow); 4] = [
    (14, AngularWindow::new_unchecked(PI / 4.0, 7.0 * PI / 4.0, true)),
    (13, window(5.0 * PI / 4.0, 7.0 * PI / 4.0)),
    (16, window(3.0 * PI / 4.0, 5.0 * PI / 4.0)),
    (15, window(PI / 4.0, 3.0 * PI / 4.0)),
];

const MID: [(u8, AngularWindow); 6] = [
    (7, window(5.0 * PI / 3.0, PI_2)),
    (8, window(0.0, PI / 3.0)),
    (9, window(PI / 3.0, 2.0 * PI / 3.0)),
    (10, window(2.0 * PI / 3.0, PI)),
    (11, window(PI, 4.0 * PI / 3.0)),
    (12, window(4.0 * PI / 3.0, 5.0 * PI / 3.0)),
];

const BASAL: [(u8, AngularWindow); 6] = [
    (1, window(5.0 * PI / 3.0, PI_2)),
    (2, window(0.0, PI / 3.0)),
    (3, window(PI / 3.0, 2.0 * PI / 3.0)),
    (4, window(2.0 * PI / 3.0, PI)),
    (5, window(PI, 4.0 * PI / 3.0)),
    (6, window(4.0 * PI / 3.0, 5.0 * PI / 3.0)),
];

const NAMES: [&str; SEGMENT_COUNT] = [
    "basal anterior",
    "basal anteroseptal",
    "basal inferoseptal",
    "basal inferior",
    "basal inferolateral",
    "basal anterolateral",
    "mid anterior",
    "mid anteroseptal",
    "mid inferoseptal",
    "mid inferior",
    "mid inferolateral",
    "mid anterolateral",
    "apical anterior",
    "apical septal",
    "apical inferior",
    "apical lateral",
    "apex",
];

impl Band {
    /// 本分带的角度窗口表, 按匹配顺序排列. 心尖帽为空表.
    pub fn windows(&self) -> &'static [(u8, AngularWindow)] {
        match self {
            Band::Apex => &[],
            Band::Apical => &APICAL,
            Band::Mid => &MID,
            Band::Basal => &BASAL,
        }
    }

    /// 本分带包含的节段, 按窗口表顺序排列.
    pub fn segments(&self) -> Vec<SegmentId> {
        match self {
            Band::Apex => vec![SegmentId::APEX],
            _ => self.windows().iter().map(|&(id, _)| SegmentId(id)).collect(),
        }
    }

    /// 将相对参考角的弧度 `theta` (`[0, 2 * PI)`) 归入本分带的某个节段.
    ///
    /// 心尖帽总是返回 [`SegmentId::APEX`]. 非有限的 `theta` 返回 `None`.
    pub fn classify(&self, theta: f64) -> Option<SegmentId> {
        match self {
            Band::Apex => Some(SegmentId::APEX),
            _ => self
                .windows()
                .iter()
                .find(|(_, w)| w.contains(theta))
                .map(|&(id, _)| SegmentId(id)),
        }
    }
}

impl SegmentId {
    /// 心尖帽, 即 17 号节段.
    pub const APEX: SegmentId = SegmentId(17);

    /// 从编号创建. 编号不在 `1..=17` 时返回 `None`.
    #[inline]
    pub fn new(id: u8) -> Option<Self> {
        (1..=SEGMENT_COUNT as u8).contains(&id).then_some(Self(id))
    }

    /// 按编号顺序迭代全部 17 个节段.
    pub fn all() -> impl DoubleEndedIterator<Item = SegmentId> + ExactSizeIterator {
        (1..=SEGMENT_COUNT as u8).map(SegmentId)
    }

    /// 编号.
    #[inline]
    pub fn get(&self) -> u8 {
        self.0
    }

    /// 从 `0` 开始的下标.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize - 1
    }

    /// 所在分带.
    pub fn band(&self) -> Band {
        match self.0 {
            1..=6 => Band::Basal,
            7..=12 => Band::Mid,
            13..=16 => Band::Apical,
            _ => Band::Apex,
        }
    }

    /// 相对参考角的角度窗口. 心尖帽没有窗口.
    pub fn window(&self) -> Option<AngularWindow> {
        self.band()
            .windows()
            .iter()
            .find(|(id, _)| *id == self.0)
            .map(|&(_, w)| w)
    }

    /// AHA 名称, 例如 `"basal anterior"`.
    #[inline]
    pub fn name(&self) -> &'static str {
        NAMES[self.index()]
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
