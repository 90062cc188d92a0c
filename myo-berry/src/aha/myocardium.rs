//! 心肌壁提取.

use log::debug;

use crate::Mask;

/// 左心室心肌壁.
#[derive(Clone, Debug)]
pub struct Myocardium {
    /// 正则化后的心肌壁, 用于 1-16 号节段.
    pub wall: Mask,
    /// 未经正则化的心肌壁 (左心室减去腐蚀结果), 用于心尖帽.
    pub full_wall: Mask,
    /// 腐蚀后的左心室, 即心内膜以内的血池.
    pub inner: Mask,
}

/// 以厚度 `thickness_mm` 腐蚀左心室得到血池, 两者之差为心肌壁.
/// 再将心肌壁限制在血池以同一半径膨胀的范围内, 去除腐蚀在边界处留下的零散体素.
pub fn extract_myocardium(lv: &Mask, thickness_mm: f64) -> Myocardium {
    let radius = lv.geometry().radius_in_voxels(thickness_mm);
    let inner = lv.erode(radius);
    let full_wall = lv.difference(&inner);
    let wall = full_wall.intersection(&inner.dilate(radius));
    debug!(
        "心肌壁: 半径 {radius:?}, 血池 {} 体素, 心肌 {} / {} 体素",
        inner.count(),
        wall.count(),
        full_wall.count()
    );
    Myocardium {
        wall,
        full_wall,
        inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Geometry;
    use itertools::iproduct;

    /// 长方体左心室, 腐蚀结果与心肌壁均可精确写出.
    #[test]
    fn test_box_wall() {
        let geo = Geometry::with_spacing([40, 40, 50], [1.0; 3]);
        let mut lv = Mask::zeros(geo);
        for p in iproduct!(10..40, 10..30, 10..30) {
            lv[p] = 1;
        }
        let myo = extract_myocardium(&lv, 3.0);

        let mut expected_inner = lv.zeros_like();
        for p in iproduct!(13..37, 13..27, 13..27) {
            expected_inner[p] = 1;
        }
        assert_eq!(myo.inner.data(), expected_inner.data());
        assert_eq!(myo.full_wall.data(), lv.difference(&expected_inner).data());

        // 面中心保留, 棱与角被正则化去除.
        assert_eq!(myo.wall[(20, 20, 10)], 1);
        assert_eq!(myo.wall[(10, 20, 20)], 1);
        assert_eq!(myo.wall[(20, 10, 10)], 0);
        assert_eq!(myo.wall[(10, 10, 10)], 0);
        assert_eq!(myo.wall.difference(&myo.full_wall).count(), 0);
    }
}
