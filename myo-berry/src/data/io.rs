//! nifti 文件读写.

use std::path::Path;

use log::debug;
use nalgebra::{Matrix3, Quaternion, UnitQuaternion, Vector3};
use ndarray::{Axis, Ix3};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};

use super::{Geometry, Mask};
use crate::Result;

/// 从 nifti header 中读取 `dim` 和 `pixdim` 的空间部分.
fn spatial_dims(h: &NiftiHeader) -> ([usize; 3], [f64; 3]) {
    let [_, nx, ny, nz, ..] = h.dim;
    let size = [nx, ny, nz].map(|n| usize::from(n.max(1)));
    let [_, px, py, pz, ..] = h.pixdim;
    let spacing = [px, py, pz].map(|p| match (p as f64).abs() {
        p if p > 0.0 && p.is_finite() => p,
        _ => 1.0,
    });
    (size, spacing)
}

/// 由 sform 的三行仿射矩阵构建几何信息. 矩阵不可用时返回 `None`.
fn sform_geometry(h: &NiftiHeader, size: [usize; 3], pix: [f64; 3]) -> Option<Geometry> {
    let rows = [h.srow_x, h.srow_y, h.srow_z].map(|r| r.map(f64::from));
    let m = Matrix3::from_fn(|i, j| rows[i][j]);
    let spacing: [f64; 3] = std::array::from_fn(|k| match m.column(k).norm() {
        n if n.is_finite() && n > 0.0 => n,
        _ => pix[k],
    });
    let direction = Matrix3::from_fn(|i, j| m[(i, j)] / spacing[j]);
    let origin = [rows[0][3], rows[1][3], rows[2][3]];
    (Geometry::is_valid_direction(&direction) && origin.iter().all(|v| v.is_finite()))
        .then(|| Geometry::new(size, spacing, origin, direction))
}

impl Geometry {
    /// 从 nifti header 构建几何信息.
    ///
    /// 优先使用 sform, 其次 qform; 二者都缺失时只使用 `pixdim`.
    /// sform 矩阵奇异或含非有限值时视为缺失.
    /// 物理坐标沿用 nifti 的 RAS 约定, 不做 LPS 翻转.
    pub fn from_nifti_header(h: &NiftiHeader) -> Geometry {
        let (size, pix) = spatial_dims(h);

        if h.sform_code > 0 {
            if let Some(geo) = sform_geometry(h, size, pix) {
                return geo;
            }
            debug!("sform 矩阵奇异, 改用 qform 或 pixdim");
        }

        if h.qform_code > 0 {
            let (b, c, d) = (h.quatern_b as f64, h.quatern_c as f64, h.quatern_d as f64);
            let a = (1.0 - (b * b + c * c + d * d)).max(0.0).sqrt();
            let q = UnitQuaternion::from_quaternion(Quaternion::new(a, b, c, d));
            let mut direction = q.to_rotation_matrix().into_inner();
            if h.pixdim[0] < 0.0 {
                direction.column_mut(2).neg_mut();
            }
            if Geometry::is_valid_direction(&direction) {
                let origin = [h.quatern_x, h.quatern_y, h.quatern_z].map(f64::from);
                return Geometry::new(size, pix, origin, direction);
            }
        }

        Geometry::with_spacing(size, pix)
    }

    /// 生成只携带几何信息的 nifti header (sform).
    pub fn to_nifti_header(&self) -> NiftiHeader {
        let mut h = NiftiHeader::default();
        let [nx, ny, nz] = self.size();
        h.dim = [3, nx as u16, ny as u16, nz as u16, 1, 1, 1, 1];
        let s = self.spacing();
        h.pixdim = [1.0, s.x as f32, s.y as f32, s.z as f32, 1.0, 1.0, 1.0, 1.0];
        h.xyzt_units = 2; // 毫米

        let m = self.index_matrix();
        let o: &Vector3<f64> = &self.origin().coords;
        let row = |i: usize| [m[(i, 0)], m[(i, 1)], m[(i, 2)], o[i]].map(|v| v as f32);
        h.sform_code = 1;
        h.qform_code = 0;
        (h.srow_x, h.srow_y, h.srow_z) = (row(0), row(1), row(2));
        h
    }
}

impl Mask {
    /// 打开 nii 文件格式的二值掩膜. 非零体素被统一为前景.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let obj = ReaderOptions::new().read_file(path.as_ref())?;
        let geometry = Geometry::from_nifti_header(obj.header());

        let mut volume = obj.into_volume().into_ndarray::<f32>()?;
        // 丢弃 t 等多余维度.
        while volume.ndim() > 3 {
            let last = volume.ndim() - 1;
            volume = volume.index_axis_move(Axis(last), 0);
        }
        while volume.ndim() < 3 {
            let n = volume.ndim();
            volume.insert_axis_inplace(Axis(n));
        }

        // [x, y, z] -> [z, y, x].
        let data = volume
            .into_dimensionality::<Ix3>()?
            .reversed_axes()
            .mapv(|p| u8::from(p != 0.0 && !p.is_nan()));

        Ok(Self::new(geometry, data))
    }

    /// 以 `u8` 格式将掩膜写入 nii 文件. 文件名以 `.gz` 结尾时自动压缩.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let header = self.geometry.to_nifti_header();
        // [z, y, x] -> [x, y, z].
        WriterOptions::new(path.as_ref())
            .reference_header(&header)
            .write_nifti(&self.data.view().reversed_axes())?;
        Ok(())
    }
}
