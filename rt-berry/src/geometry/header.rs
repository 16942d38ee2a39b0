//! 从 nifti header 构建参考体积几何信息.
//!
//! nifti 使用 RAS+ 物理坐标系, 而 RTSTRUCT 轮廓点位于 DICOM 病人坐标系 (LPS+).
//! 这里统一将结果转换到 LPS+, 使轮廓点可以直接代入 [`ReferenceVolume::world_to_voxel`].

use nifti::NiftiHeader;

use super::{ReferenceVolume, IDENTITY_DIRECTION};
use crate::error::{LoadResult, LoadVolumeError};
use crate::Matrix3;

impl ReferenceVolume {
    /// 从 nifti header 构建参考体积.
    ///
    /// 方向与原点优先取 sform (`sform_code > 0`), 其次取 qform 四元数
    /// (`qform_code > 0`), 都不存在时使用单位方向和零原点.
    ///
    /// # 返回值
    ///
    /// - 如果 `dim[0]` 不在 `2..=7` 内, 返回 `Err(LoadVolumeError::InvalidFileFormat)`;
    /// - 如果几何参数不合法, 返回 `Err(LoadVolumeError::Geometry)`.
    pub fn from_nifti_header(h: &NiftiHeader) -> LoadResult<Self> {
        let [ndim, nx, ny, nz, ..] = h.dim;
        if !(2..=7).contains(&ndim) {
            return Err(LoadVolumeError::InvalidFileFormat(format!(
                "nifti 维度 `{ndim}` 不受支持"
            )));
        }
        // 二维图像视为只有一层的体积.
        let nz = if ndim == 2 { 1 } else { nz };
        let size = (nx as usize, ny as usize, nz as usize);

        let [qfac, px, py, pz, ..] = h.pixdim;
        let mut spacing = (px.abs() as f64, py.abs() as f64, pz.abs() as f64);
        if ndim == 2 && spacing.2 == 0.0 {
            spacing.2 = 1.0;
        }

        let (mut direction, mut origin) = if h.sform_code > 0 {
            let (direction, sform_spacing) = sform_direction(h);
            spacing = sform_spacing;
            let origin = (h.srow_x[3] as f64, h.srow_y[3] as f64, h.srow_z[3] as f64);
            (direction, origin)
        } else if h.qform_code > 0 {
            let qfac = if qfac < 0.0 { -1.0 } else { 1.0 };
            let direction = quatern_direction(h.quatern_b, h.quatern_c, h.quatern_d, qfac);
            let origin = (h.quatern_x as f64, h.quatern_y as f64, h.quatern_z as f64);
            (direction, origin)
        } else {
            (IDENTITY_DIRECTION, (0.0, 0.0, 0.0))
        };

        // RAS -> LPS.
        for row in direction.iter_mut().take(2) {
            row.iter_mut().for_each(|v| *v = -*v);
        }
        origin.0 = -origin.0;
        origin.1 = -origin.1;

        Ok(Self::new(size, spacing, origin, direction)?)
    }
}

/// 由 sform 仿射矩阵分解出方向矩阵和体素间距 (列向量的模).
fn sform_direction(h: &NiftiHeader) -> (Matrix3, (f64, f64, f64)) {
    let rows = [h.srow_x, h.srow_y, h.srow_z];
    let mut direction = [[0.0f64; 3]; 3];
    let mut norms = [0.0f64; 3];
    for (j, norm) in norms.iter_mut().enumerate() {
        *norm = rows
            .iter()
            .map(|r| (r[j] as f64).powi(2))
            .sum::<f64>()
            .sqrt();
    }
    for (i, row) in rows.iter().enumerate() {
        for j in 0..3 {
            direction[i][j] = if norms[j] > 0.0 {
                row[j] as f64 / norms[j]
            } else {
                0.0
            };
        }
    }
    (direction, (norms[0], norms[1], norms[2]))
}

/// 由 qform 四元数 `(b, c, d)` 计算旋转矩阵. `qfac` 为 `±1`, 作用于第三列.
fn quatern_direction(b: f32, c: f32, d: f32, qfac: f64) -> Matrix3 {
    let (mut b, mut c, mut d) = (b as f64, c as f64, d as f64);
    let aa = 1.0 - (b * b + c * c + d * d);
    let a = if aa < 1e-7 {
        // 特殊情况: 180 度旋转, 需要重新归一化 (b, c, d).
        let n = (b * b + c * c + d * d).sqrt();
        (b, c, d) = (b / n, c / n, d / n);
        0.0
    } else {
        aa.sqrt()
    };

    [
        [
            a * a + b * b - c * c - d * d,
            2.0 * (b * c - a * d),
            2.0 * (b * d + a * c) * qfac,
        ],
        [
            2.0 * (b * c + a * d),
            a * a + c * c - b * b - d * d,
            2.0 * (c * d - a * b) * qfac,
        ],
        [
            2.0 * (b * d - a * c),
            2.0 * (c * d + a * b),
            (a * a + d * d - c * c - b * b) * qfac,
        ],
    ]
}
