//! 运行时错误.
//!
//! 越界判定全部基于对体积范围的显式预检查, 不依赖任何底层错误信息的文本内容.

use thiserror::Error;

/// 越界发生在哪个二维轴上.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis2d {
    /// 高 (自然图像的垂直方向, 体素坐标 y).
    Height,

    /// 宽 (自然图像的水平方向, 体素坐标 x).
    Width,
}

/// 轮廓在体素空间中越界.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum OutOfBounds {
    /// 目标水平切片索引不在 `[0, len_z)` 内.
    #[error("切片索引 {z} 越界 (共 {len_z} 层)")]
    Slice {
        /// 由首个轮廓点取最近整数 (正中取偶) 得到的切片索引.
        z: i64,

        /// 参考体积的切片个数.
        len_z: usize,
    },

    /// 多边形顶点对应的像素索引不在 `[0, len)` 内.
    #[error("{axis:?} 方向坐标 {coord:.3} 越界 (长度 {len})")]
    Pixel {
        /// 越界的轴.
        axis: Axis2d,

        /// 越界的连续体素坐标.
        coord: f64,

        /// 该轴的像素个数.
        len: usize,
    },
}

/// 轮廓数据本身不合法. 属于数据/编程错误, 不会被归类为越界.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum MalformedContour {
    /// 多边形顶点不足 3 个.
    #[error("多边形至少需要 3 个顶点, 实际只有 {0} 个")]
    TooFewPoints(usize),

    /// x, y, z 坐标列表长度不一致.
    #[error("坐标列表长度不一致: x {x}, y {y}, z {z}")]
    LengthMismatch {
        /// x 列表长度.
        x: usize,
        /// y 列表长度.
        y: usize,
        /// z 列表长度.
        z: usize,
    },

    /// 第 `point` 个点 (变换后) 的体素坐标不是有限值.
    #[error("第 {point} 个点的体素坐标不是有限值")]
    NonFinite {
        /// 点在轮廓中的序号.
        point: usize,
    },
}

/// 轮廓转换错误.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// 第 `contour` 个轮廓越界. 整个转换因此中止, 不返回任何部分结果.
    #[error("第 {contour} 个轮廓越界: {source}")]
    ContourOutOfBounds {
        /// 轮廓在输入序列中的序号.
        contour: usize,
        /// 具体越界信息.
        #[source]
        source: OutOfBounds,
    },

    /// 第 `contour` 个轮廓数据不合法.
    #[error("第 {contour} 个轮廓数据不合法: {source}")]
    MalformedContour {
        /// 轮廓在输入序列中的序号.
        contour: usize,
        /// 具体原因.
        #[source]
        source: MalformedContour,
    },

    /// 背景标签与前景标签相同.
    #[error("背景标签与前景标签相同: {0}")]
    IdenticalLabels(u8),
}

impl ConvertError {
    /// 是否是越界错误?
    #[inline]
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::ContourOutOfBounds { .. })
    }
}

/// 构建 [`crate::ReferenceVolume`] 时的几何参数错误.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum GeometryError {
    /// 某一维体素个数为 0.
    #[error("体积尺寸 {0:?} 存在空维度")]
    EmptyExtent((usize, usize, usize)),

    /// 体素间距非正或不是有限值.
    #[error("体素间距 {0:?} 不合法")]
    InvalidSpacing((f64, f64, f64)),

    /// 方向余弦矩阵奇异 (或含非有限值), 无法求逆.
    #[error("方向矩阵不可逆")]
    SingularDirection,
}

/// 加载参考体积错误.
#[derive(Debug, Error)]
pub enum LoadVolumeError {
    /// 给定位置不存在可用的影像序列 (序列号不匹配, 或目录为空/非影像).
    #[error("无效的文件格式: {0}")]
    InvalidFileFormat(String),

    /// 底层 I/O 错误.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// 读取 nifti header 错误.
    #[error(transparent)]
    Nifti(#[from] nifti::NiftiError),

    /// header 描述的几何信息不合法.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// 轮廓转换结果.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// 加载参考体积结果.
pub type LoadResult<T> = Result<T, LoadVolumeError>;
