//! 三维标签体积及其累加器.
//!
//! 数据按 `(z, h, w)` 存储, 与参考体积的 `(nz, ny, nx)` 一一对应.

mod iter;
mod save;
mod slice;

use std::ops::Index;

use ndarray::{Array3, ArrayView, ArrayView2, Axis, Ix3};
use num::ToPrimitive;

use crate::consts::gray::{MASK_BACKGROUND, MASK_FOREGROUND};
use crate::consts::ElemType;
use crate::error::OutOfBounds;
use crate::geometry::{GeometryAttr, ReferenceVolume};
use crate::Idx3d;

pub(crate) use iter::PosIter;
pub use save::ImgWriteVis;
pub use slice::{MaskSlice, MaskSliceMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 标签体积中仅有的两种取值. 两者必须不同.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MaskLabels {
    background: u8,
    foreground: u8,
}

impl MaskLabels {
    /// 构建标签对. 若 `background == foreground` 则返回 `None`.
    #[inline]
    pub const fn new(background: u8, foreground: u8) -> Option<Self> {
        if background == foreground {
            None
        } else {
            Some(Self {
                background,
                foreground,
            })
        }
    }

    /// 背景标签.
    #[inline]
    pub const fn background(&self) -> u8 {
        self.background
    }

    /// 前景标签.
    #[inline]
    pub const fn foreground(&self) -> u8 {
        self.foreground
    }

    /// 判断像素值 `pix` 的类型.
    #[inline]
    pub fn classify(&self, pix: u8) -> ElemType {
        if pix == self.background {
            ElemType::Background
        } else if pix == self.foreground {
            ElemType::Foreground
        } else {
            ElemType::Unknown
        }
    }
}

/// 背景为 0, 前景为 1.
impl Default for MaskLabels {
    #[inline]
    fn default() -> Self {
        Self {
            background: MASK_BACKGROUND,
            foreground: MASK_FOREGROUND,
        }
    }
}

/// 与参考体积对齐的三维标签体积.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    geometry: ReferenceVolume,
    labels: MaskLabels,
    data: Array3<u8>,
}

impl GeometryAttr for Mask {
    #[inline]
    fn geometry(&self) -> &ReferenceVolume {
        &self.geometry
    }
}

impl Index<Idx3d> for Mask {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl Mask {
    /// 标签对.
    #[inline]
    pub fn labels(&self) -> MaskLabels {
        self.labels
    }

    /// 获取 z 空间的第 `z_index` 层切片视图.
    ///
    /// 当 `z_index` 越界时 panic.
    #[inline]
    pub fn slice_at(&self, z_index: usize) -> MaskSlice<'_> {
        MaskSlice::new(self.data.index_axis(Axis(0), z_index))
    }

    /// 获取能按升序迭代水平切片的迭代器.
    #[inline]
    pub fn slice_iter(&self) -> impl ExactSizeIterator<Item = MaskSlice<'_>> {
        self.data.axis_iter(Axis(0)).map(MaskSlice::new)
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView<'_, u8, Ix3> {
        self.data.view()
    }

    /// 直接获得底层 `(z, h, w)` 数据.
    #[inline]
    pub fn into_raw(self) -> Array3<u8> {
        self.data
    }

    /// 获取值为 `label` 的体素个数.
    #[inline]
    pub fn count(&self, label: u8) -> usize {
        self.data.iter().filter(|p| **p == label).count()
    }

    /// 获取前景体素个数.
    #[inline]
    pub fn foreground_count(&self) -> usize {
        self.count(self.labels.foreground)
    }

    /// 是否全部为背景?
    #[inline]
    pub fn is_background(&self) -> bool {
        self.data.iter().all(|p| *p == self.labels.background)
    }

    /// 收集所有前景体素的 `(z, h, w)` 下标. 结果按行优先存储.
    pub fn foreground_pos(&self) -> Vec<Idx3d> {
        let fg = self.labels.foreground;
        self.data
            .indexed_iter()
            .filter_map(|(pos, pixel)| (*pixel == fg).then_some(pos))
            .collect()
    }
}

/// 单次转换专用的三维标签累加器.
///
/// 创建时全部填充为背景, 之后只会把前景写入指定切片, 从不回写背景.
/// 调用 [`MaskAccumulator::finalize`] 后被消耗.
#[derive(Debug)]
pub struct MaskAccumulator {
    mask: Mask,
}

impl MaskAccumulator {
    /// 以 `volume` 的形状和 `labels.background()` 初始化.
    pub fn new(volume: &ReferenceVolume, labels: MaskLabels) -> Self {
        let data = Array3::from_elem(volume.shape(), labels.background);
        Self {
            mask: Mask {
                geometry: volume.clone(),
                labels,
                data,
            },
        }
    }

    /// 获取第 `z_index` 层可变切片. 越界时返回 `None`.
    #[inline]
    pub fn slice_at_mut(&mut self, z_index: usize) -> Option<MaskSliceMut<'_>> {
        (z_index < self.mask.len_z())
            .then(|| MaskSliceMut::new(self.mask.data.index_axis_mut(Axis(0), z_index)))
    }

    /// 将 `interior` 中为 `true` 的位置在第 `z_index` 层写为 `foreground`.
    ///
    /// 返回写入的体素个数.
    ///
    /// # 返回值
    ///
    /// `z_index` 不在 `[0, len_z)` 内时返回 `Err(OutOfBounds::Slice)`, 且不写入任何数据.
    ///
    /// # 注意
    ///
    /// `interior` 的形状必须等于 `self.slice_shape()`, 否则程序 panic.
    pub fn write_slice(
        &mut self,
        z_index: i64,
        interior: ArrayView2<bool>,
        foreground: u8,
    ) -> Result<usize, OutOfBounds> {
        let len_z = self.mask.len_z();
        let mut sli = z_index
            .to_usize()
            .and_then(|z| self.slice_at_mut(z))
            .ok_or(OutOfBounds::Slice {
                z: z_index,
                len_z,
            })?;
        Ok(sli.paint(interior, foreground))
    }

    /// 完成累加, 返回标签体积.
    #[inline]
    pub fn finalize(self) -> Mask {
        self.mask
    }
}

impl GeometryAttr for MaskAccumulator {
    #[inline]
    fn geometry(&self) -> &ReferenceVolume {
        &self.mask.geometry
    }
}
