#![warn(missing_docs)]
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 将放疗结构集 (RTSTRUCT) 中的平面轮廓转换为与参考影像对齐的三维标签体积.
//!
//! 该 crate 只提供 `safe` 接口, 且不读取 DICOM 结构集本身: 调用方负责把结构集解析为
//! [`Contour`] 序列, 本库负责几何变换、栅格化和体积累加.
//!
//! # 注意
//!
//! 1. 体积数据一律按 `(z, h, w)` 存储, 对应体素索引 `(z, y, x)`.
//! 2. 每个轮廓只落在一层切片上, 该层由轮廓 **第一个点** 的 z 坐标取最近整数决定
//!   (恰好位于正中时取偶数).
//!   对非轴位 (倾斜) 轮廓而言这可能不准确, 但这是既定行为.
//! 3. 越界判定完全基于显式预检查: 任一轮廓越界都会使整个转换失败, 不会返回部分结果.
//! 4. 转换核心不直接写日志, 跳过的轮廓通过 [`DiagnosticSink`] 通知调用方.
//!
//! # 功能概览
//!
//! ### 几何变换 ✅
//!
//! 物理坐标 (LPS+, 毫米) 到连续体素索引的转换, 支持任意方向矩阵和可选的空间变换.
//!
//! 实现位于 `rt-berry/src/geometry`.
//!
//! ### 切片栅格化 ✅
//!
//! 奇偶规则, 像素中心采样, 越界直接报错而非截断.
//!
//! 实现位于 `rt-berry/src/raster.rs`.
//!
//! ### 体积累加与转换流程 ✅
//!
//! 实现位于 `rt-berry/src/mask` 与 `rt-berry/src/convert.rs`.
//! 开启 `rayon` feature 后可按 ROI 并行转换.
//!
//! ### 参考体积加载 ✅
//!
//! 从 nifti header 读取参考影像几何信息, 并转换到 DICOM 病人坐标系.
//!
//! 实现位于 `rt-berry/src/dataset`.

/// 二维索引 `(h, w)`.
pub type Idx2d = (usize, usize);

/// 三维索引 `(z, h, w)`.
pub type Idx3d = (usize, usize, usize);

/// 连续 (未取整) 体素索引 `(fx, fy, fz)`.
pub type Idx3dF = (f64, f64, f64);

/// 物理坐标点 `(x, y, z)`, 单位毫米.
pub type Point3d = (f64, f64, f64);

/// 行优先存储的 3x3 矩阵.
pub type Matrix3 = [[f64; 3]; 3];

pub mod consts;
pub mod contour;
pub mod convert;
pub mod dataset;
pub mod diagnostic;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod prelude;
pub mod raster;

pub use contour::{Contour, ContourSet, ContourType};
pub use convert::{convert, convert_set};
pub use diagnostic::{DiagnosticSink, LogSink, NullSink, SkippedContour};
pub use error::{ConvertError, LoadVolumeError, OutOfBounds};
pub use geometry::{GeometryAttr, Identity, ReferenceVolume, SpatialTransform};
pub use mask::{ImgWriteVis, Mask, MaskAccumulator, MaskLabels, MaskSlice, MaskSliceMut};

#[cfg(feature = "rayon")]
pub use convert::{par_convert, RoiOutcome};
