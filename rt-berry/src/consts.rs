//! 通用常量.

/// 单通道颜色.
pub mod gray {
    /// 默认背景标签.
    pub const MASK_BACKGROUND: u8 = 0;

    /// 默认前景标签.
    pub const MASK_FOREGROUND: u8 = 1;

    /// 单通道黑色.
    pub const BLACK: u8 = 0b_0000_0000;

    /// 单通道灰色.
    pub const GRAY: u8 = 0b_1000_0000;

    /// 单通道白色.
    pub const WHITE: u8 = 0b_1111_1111;
}

/// 可栅格化的闭合平面轮廓类型标签.
pub const CLOSED_PLANAR: &str = "CLOSED_PLANAR";

/// 可栅格化的插值平面轮廓类型标签.
pub const INTERPOLATED_PLANAR: &str = "INTERPOLATED_PLANAR";

/// 构成多边形所需的最少顶点个数.
pub const MIN_POLYGON_POINTS: usize = 3;

/// 体素类型.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ElemType {
    /// 背景.
    Background,

    /// 前景.
    Foreground,

    /// 既非背景标签也非前景标签.
    Unknown,
}

impl ElemType {
    /// 是否为前景.
    #[inline]
    pub fn is_foreground(&self) -> bool {
        matches!(self, Self::Foreground)
    }

    /// 是否为背景.
    #[inline]
    pub fn is_background(&self) -> bool {
        matches!(self, Self::Background)
    }
}
