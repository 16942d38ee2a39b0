//! 轮廓到标签体积的转换流程.
//!
//! 同一次转换中的轮廓必须按输入顺序依次处理; 不同 ROI 之间互不共享可变状态,
//! 可以并行转换.

use crate::consts::MIN_POLYGON_POINTS;
use crate::contour::{accept, Contour, ContourSet};
use crate::diagnostic::DiagnosticSink;
use crate::error::{ConvertError, ConvertResult, MalformedContour, OutOfBounds};
use crate::geometry::{world_to_voxel, GeometryAttr, ReferenceVolume, SpatialTransform};
use crate::mask::{Mask, MaskAccumulator, MaskLabels};
use crate::raster::{rasterize_polygon, round_half_even};

/// 将有序轮廓序列转换为与 `volume` 对齐的标签体积.
///
/// 对每个轮廓依次执行: 类型过滤 -> 坐标变换 -> 栅格化 -> 写入.
/// 目标切片只由 **第一个** 轮廓点的 `fz` 取最近整数决定 (恰在两层正中时取偶数层),
/// 其余点的 z 坐标被忽略.
/// 不支持的轮廓类型会被跳过, 并向 `sink` 发出事件.
///
/// # 返回值
///
/// - `background == foreground` 时, 返回 `Err(ConvertError::IdenticalLabels)`;
/// - 任一轮廓的切片或像素索引越界时, 立即中止并返回
///   `Err(ConvertError::ContourOutOfBounds)`, 后续轮廓不再处理;
/// - 任一轮廓顶点不足 3 个, 或变换后坐标不是有限值时, 返回
///   `Err(ConvertError::MalformedContour)`.
///
/// 出错时不会返回任何部分结果.
pub fn convert(
    contours: &[Contour],
    volume: &ReferenceVolume,
    background: u8,
    foreground: u8,
    transform: Option<&dyn SpatialTransform>,
    sink: &mut dyn DiagnosticSink,
) -> ConvertResult<Mask> {
    let labels =
        MaskLabels::new(background, foreground).ok_or(ConvertError::IdenticalLabels(background))?;
    let mut acc = MaskAccumulator::new(volume, labels);

    for (idx, contour) in contours.iter().enumerate() {
        if !accept(contour, &mut *sink) {
            continue;
        }
        write_contour(&mut acc, contour, transform, foreground).map_err(|e| e.at(idx))?;
    }
    Ok(acc.finalize())
}

/// 转换一个 ROI 的全部轮廓.
#[inline]
pub fn convert_set(
    roi: &ContourSet,
    volume: &ReferenceVolume,
    labels: MaskLabels,
    transform: Option<&dyn SpatialTransform>,
    sink: &mut dyn DiagnosticSink,
) -> ConvertResult<Mask> {
    convert(
        &roi.contours,
        volume,
        labels.background(),
        labels.foreground(),
        transform,
        sink,
    )
}

/// 单个轮廓的失败原因, 之后再附上轮廓序号.
enum ContourError {
    OutOfBounds(OutOfBounds),
    Malformed(MalformedContour),
}

impl From<OutOfBounds> for ContourError {
    #[inline]
    fn from(value: OutOfBounds) -> Self {
        Self::OutOfBounds(value)
    }
}

impl From<MalformedContour> for ContourError {
    #[inline]
    fn from(value: MalformedContour) -> Self {
        Self::Malformed(value)
    }
}

impl ContourError {
    fn at(self, contour: usize) -> ConvertError {
        match self {
            Self::OutOfBounds(source) => ConvertError::ContourOutOfBounds { contour, source },
            Self::Malformed(source) => ConvertError::MalformedContour { contour, source },
        }
    }
}

fn write_contour(
    acc: &mut MaskAccumulator,
    contour: &Contour,
    transform: Option<&dyn SpatialTransform>,
    foreground: u8,
) -> Result<usize, ContourError> {
    if contour.len() < MIN_POLYGON_POINTS {
        return Err(MalformedContour::TooFewPoints(contour.len()).into());
    }

    let volume = acc.geometry();
    let n = contour.len();
    let (mut xs, mut ys) = (Vec::with_capacity(n), Vec::with_capacity(n));
    let mut first_z = 0.0;
    for (point, &p) in contour.points().iter().enumerate() {
        let (fx, fy, fz) = world_to_voxel(p, volume, transform);
        if !(fx.is_finite() && fy.is_finite() && fz.is_finite()) {
            return Err(MalformedContour::NonFinite { point }.into());
        }
        if point == 0 {
            first_z = fz;
        }
        xs.push(fx);
        ys.push(fy);
    }

    // 饱和转换: 极大值同样落在范围之外.
    let z = round_half_even(first_z) as i64;
    let len_z = volume.len_z();
    if !(0..len_z as i64).contains(&z) {
        return Err(OutOfBounds::Slice { z, len_z }.into());
    }

    let interior = rasterize_polygon(&xs, &ys, volume.slice_shape())?;
    Ok(acc.write_slice(z, interior.view(), foreground)?)
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use crate::diagnostic::SkippedContour;
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
    }
}

/// 单个 ROI 的并行转换结果.
#[cfg(feature = "rayon")]
#[derive(Debug)]
pub struct RoiOutcome {
    /// ROI 名称.
    pub name: Option<String>,

    /// 转换结果.
    pub mask: ConvertResult<Mask>,

    /// 该 ROI 中被跳过的轮廓.
    pub skipped: Vec<SkippedContour>,
}

/// 借助 `rayon`, 并行地转换多个 ROI.
///
/// 每个 ROI 使用各自的累加器和事件列表, 某个 ROI 出错不影响其他 ROI.
/// 结果顺序与 `rois` 一致.
#[cfg(feature = "rayon")]
pub fn par_convert(
    rois: &[ContourSet],
    volume: &ReferenceVolume,
    labels: MaskLabels,
    transform: Option<&(dyn SpatialTransform + Sync)>,
) -> Vec<RoiOutcome> {
    rois.par_iter()
        .map(|roi| {
            let mut skipped: Vec<SkippedContour> = Vec::new();
            let transform = transform.map(|t| t as &dyn SpatialTransform);
            let mask = convert_set(roi, volume, labels, transform, &mut skipped);
            RoiOutcome {
                name: roi.name.clone(),
                mask,
                skipped,
            }
        })
        .collect()
}
