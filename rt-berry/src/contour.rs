//! RTSTRUCT 轮廓数据, 以及按几何类型过滤轮廓的分类器.

use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itertools::izip;

use crate::consts::{CLOSED_PLANAR, INTERPOLATED_PLANAR};
use crate::diagnostic::{DiagnosticSink, SkippedContour};
use crate::error::MalformedContour;
use crate::Point3d;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 轮廓几何类型 (DICOM `ContourGeometricType`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ContourType {
    /// `CLOSED_PLANAR`.
    ClosedPlanar,

    /// `INTERPOLATED_PLANAR`.
    InterpolatedPlanar,

    /// 其他类型 (如 `POINT`, `OPEN_PLANAR`, `OPEN_NONPLANAR`). 保留原始标签.
    Other(String),
}

impl ContourType {
    /// 该类型能否被栅格化?
    #[inline]
    pub fn is_rasterizable(&self) -> bool {
        matches!(self, Self::ClosedPlanar | Self::InterpolatedPlanar)
    }

    /// 获取类型标签.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClosedPlanar => CLOSED_PLANAR,
            Self::InterpolatedPlanar => INTERPOLATED_PLANAR,
            Self::Other(s) => s.as_str(),
        }
    }
}

/// 大小写不敏感. 不认识的标签原样保存在 `ContourType::Other` 中, 因此不会失败.
impl FromStr for ContourType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.eq_ignore_ascii_case(CLOSED_PLANAR) {
            Self::ClosedPlanar
        } else if s.eq_ignore_ascii_case(INTERPOLATED_PLANAR) {
            Self::InterpolatedPlanar
        } else {
            Self::Other(s.to_owned())
        })
    }
}

impl From<&str> for ContourType {
    #[inline]
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(t) => t,
            Err(e) => match e {},
        }
    }
}

impl Display for ContourType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个轮廓: 一个水平切片上的有序多边形边界, 使用病人物理坐标.
///
/// 多边形首尾隐式相连.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    kind: ContourType,
    name: Option<String>,
    points: Vec<Point3d>,
}

impl Contour {
    /// 直接初始化.
    #[inline]
    pub fn new(kind: impl Into<ContourType>, points: Vec<Point3d>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            points,
        }
    }

    /// 从分离的 x, y, z 坐标列表构建轮廓.
    ///
    /// 三个列表长度不一致时返回 `Err(MalformedContour::LengthMismatch)`.
    pub fn from_xyz(
        kind: impl Into<ContourType>,
        xs: &[f64],
        ys: &[f64],
        zs: &[f64],
    ) -> Result<Self, MalformedContour> {
        if xs.len() != ys.len() || xs.len() != zs.len() {
            return Err(MalformedContour::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
                z: zs.len(),
            });
        }
        let points = izip!(xs, ys, zs).map(|(x, y, z)| (*x, *y, *z)).collect();
        Ok(Self::new(kind, points))
    }

    /// 设置显示名称.
    #[inline]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 几何类型.
    #[inline]
    pub fn kind(&self) -> &ContourType {
        &self.kind
    }

    /// 显示名称.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 有序顶点.
    #[inline]
    pub fn points(&self) -> &[Point3d] {
        &self.points
    }

    /// 顶点个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 是否没有顶点?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 属于同一个 ROI 的有序轮廓序列.
///
/// 顺序是有意义的: 后面的轮廓在前面的之后写入.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContourSet {
    /// ROI 名称.
    pub name: Option<String>,

    /// 轮廓序列.
    pub contours: Vec<Contour>,
}

impl ContourSet {
    /// 以 ROI 名称和轮廓序列初始化.
    #[inline]
    pub fn new(name: impl Into<String>, contours: Vec<Contour>) -> Self {
        Self {
            name: Some(name.into()),
            contours,
        }
    }
}

impl FromIterator<Contour> for ContourSet {
    fn from_iter<I: IntoIterator<Item = Contour>>(iter: I) -> Self {
        Self {
            name: None,
            contours: iter.into_iter().collect(),
        }
    }
}

/// 判断轮廓是否应被栅格化.
///
/// 仅接受 `CLOSED_PLANAR` 和 `INTERPOLATED_PLANAR`. 其他类型会向 `sink`
/// 发出一条跳过事件并返回 `false`; 这不是错误.
pub fn accept<S: DiagnosticSink + ?Sized>(contour: &Contour, sink: &mut S) -> bool {
    if contour.kind.is_rasterizable() {
        return true;
    }
    sink.contour_skipped(&SkippedContour {
        name: contour.name.clone(),
        kind: contour.kind.as_str().to_owned(),
    });
    false
}
