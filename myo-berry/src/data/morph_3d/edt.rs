use ndarray::{Array3, ArrayView3, ArrayViewMut1, Axis, Zip};

use crate::consts::gray::is_foreground;
use crate::Radius;

/// 按 `radius` 归一化后的平方欧氏距离变换.
///
/// 对每个体素, 计算其到最近 "目标" 体素 (前景性等于 `target` 的体素) 的
/// 平方距离, 其中第 `k` 轴的位移以 `radius[k]` 为单位. 半径为 0 的轴不参与传播,
/// 相当于该方向的距离为无穷大. 网格内不存在可达目标时值为 `f64::INFINITY`.
///
/// 数据按 `(z, y, x)` 访问, `radius` 按 `(x, y, z)` 排列.
pub(super) fn scaled_squared_distance(
    data: ArrayView3<u8>,
    target: bool,
    radius: Radius,
) -> Array3<f64> {
    let mut dist = data.mapv(|p| {
        if is_foreground(p) == target {
            0.0
        } else {
            f64::INFINITY
        }
    });

    // (x, y, z) 分别对应 ndarray 的第 2, 1, 0 轴.
    for (k, axis) in [(0, 2), (1, 1), (2, 0)] {
        if radius[k] == 0 {
            continue;
        }
        let w2 = (radius[k] as f64).powi(-2);
        let pass = move |mut lane: ArrayViewMut1<f64>| {
            let f = lane.to_vec();
            let mut d = vec![0.0; f.len()];
            lower_envelope(&f, w2, &mut d);
            lane.iter_mut().zip(d).for_each(|(o, v)| *o = v);
        };

        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                Zip::from(dist.lanes_mut(Axis(axis))).par_for_each(pass);
            } else {
                Zip::from(dist.lanes_mut(Axis(axis))).for_each(pass);
            }
        }
    }
    dist
}

/// 一维抛物线下包络 (Felzenszwalb & Huttenlocher).
///
/// 计算 `d[q] = min_p (w2 * (q - p)^2 + f[p])`. `f` 中的无穷大值不参与构造包络.
fn lower_envelope(f: &[f64], w2: f64, d: &mut [f64]) {
    debug_assert_eq!(f.len(), d.len());

    // v: 包络上的抛物线顶点; z[j]: 第 j 条抛物线起作用的左边界.
    let mut v: Vec<usize> = Vec::with_capacity(f.len());
    let mut z: Vec<f64> = Vec::with_capacity(f.len());

    for (q, &fq) in f.iter().enumerate() {
        if !fq.is_finite() {
            continue;
        }
        let hq = fq + w2 * (q as f64).powi(2);
        let mut s = f64::NEG_INFINITY;
        while let Some(&p) = v.last() {
            let hp = f[p] + w2 * (p as f64).powi(2);
            s = (hq - hp) / (2.0 * w2 * (q - p) as f64);
            if s <= z[z.len() - 1] {
                v.pop();
                z.pop();
                s = f64::NEG_INFINITY;
            } else {
                break;
            }
        }
        v.push(q);
        z.push(s);
    }

    if v.is_empty() {
        d.fill(f64::INFINITY);
        return;
    }

    let mut j = 0;
    for (q, out) in d.iter_mut().enumerate() {
        while j + 1 < v.len() && z[j + 1] < q as f64 {
            j += 1;
        }
        let p = v[j];
        *out = w2 * (q as f64 - p as f64).powi(2) + f[p];
    }
}
