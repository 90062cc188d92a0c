//! 以全心掩膜裁剪 ROI.

use log::debug;

use super::masks::AnatomicalMasks;
use crate::{Result, RoiBox, SegmentError};

/// 计算全心掩膜 `whole_heart` 前景的包围盒, 以 `margin_mm` 扩展后裁剪集合中的每个掩膜.
///
/// 返回裁剪后的新集合以及记录裁剪位置的 [`RoiBox`]. 输入集合不会被修改.
pub fn crop_to_roi(
    masks: &AnatomicalMasks,
    whole_heart: &str,
    margin_mm: [f64; 3],
) -> Result<(AnatomicalMasks, RoiBox)> {
    let roi = RoiBox::around(masks.get(whole_heart)?, margin_mm)
        .ok_or_else(|| SegmentError::EmptyMask(whole_heart.to_string()))?;
    debug!("ROI: index = {:?}, size = {:?}", roi.index(), roi.size());
    Ok((masks.map(|m| roi.crop(m)), roi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geometry, Mask};

    #[test]
    fn test_crop_to_roi() {
        let geo = Geometry::with_spacing([10, 10, 10], [1.0, 1.0, 2.0]);
        let mut heart = Mask::zeros(geo.clone());
        heart[(4, 4, 4)] = 1;
        let mut other = Mask::zeros(geo);
        other[(4, 4, 5)] = 1;
        other[(0, 0, 0)] = 1;
        let masks: AnatomicalMasks = [("H", heart), ("O", other)].into_iter().collect();

        let (cropped, roi) = crop_to_roi(&masks, "H", [1.0, 1.0, 2.0]).unwrap();
        assert_eq!(roi.index(), [3, 3, 3]);
        assert_eq!(roi.size(), [3, 3, 3]);
        let o = cropped.get("O").unwrap();
        assert_eq!(o.count(), 1);
        assert_eq!(o[(1, 1, 2)], 1);
        // 原集合不变.
        assert_eq!(masks.get("O").unwrap().count(), 2);
    }

    #[test]
    fn test_crop_empty_heart() {
        let geo = Geometry::with_spacing([4, 4, 4], [1.0; 3]);
        let masks: AnatomicalMasks = [("H", Mask::zeros(geo))].into_iter().collect();
        assert!(matches!(
            crop_to_roi(&masks, "H", [0.0; 3]),
            Err(SegmentError::EmptyMask(l)) if l == "H"
        ));
        assert!(matches!(
            crop_to_roi(&masks, "X", [0.0; 3]),
            Err(SegmentError::MissingStructure(_))
        ));
    }
}
