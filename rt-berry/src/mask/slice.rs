use super::PosIter;
use crate::Idx2d;
use ndarray::iter::Iter;
use ndarray::{ArrayView2, ArrayViewMut2, Ix2, Zip};
use std::ops::{Index, IndexMut};

/// 不可变、借用的二维水平标签切片, 形状为 `(h, w)`.
pub struct MaskSlice<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::Mask`].
    data: ArrayView2<'a, u8>,
}

impl Index<Idx2d> for MaskSlice<'_> {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

/// 可变、借用的二维水平标签切片.
pub struct MaskSliceMut<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::MaskAccumulator`].
    data: ArrayViewMut2<'a, u8>,
}

impl<'a> MaskSliceMut<'a> {
    /// 将 `interior` 中为 `true` 的位置写为 `label`, 其余位置保持不变.
    ///
    /// 返回写入的像素个数. 如果 `interior` 形状与切片不符, 则程序 panic.
    pub fn paint(&mut self, interior: ArrayView2<bool>, label: u8) -> usize {
        assert_eq!(self.data.dim(), interior.dim(), "内部掩码形状与切片不符");
        let mut cnt = 0usize;
        Zip::from(&mut self.data)
            .and(&interior)
            .for_each(|pix, &inside| {
                if inside {
                    *pix = label;
                    cnt += 1;
                }
            });
        cnt
    }
}

impl Index<Idx2d> for MaskSliceMut<'_> {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx2d> for MaskSliceMut<'_> {
    #[inline]
    fn index_mut(&mut self, index: Idx2d) -> &mut Self::Output {
        &mut self.data[index]
    }
}

/// 不可变方法集合.
macro_rules! impl_mask_slice_immut {
    ($life: lifetime, $slice: ty, $array: ty) => {
        impl<$life> $slice {
            /// 直接初始化.
            #[inline]
            pub(crate) fn new(data: $array) -> Self {
                Self { data }
            }

            /// 获得 **底层** 数据的一份不可变 shallow copy.
            #[inline]
            pub fn array_view(&self) -> ArrayView2<u8> {
                self.data.view()
            }

            /// 获取可以迭代图像像素的迭代器.
            #[inline]
            pub fn iter(&self) -> Iter<'_, u8, Ix2> {
                self.data.iter()
            }

            /// 获取给定位置 (高, 宽) 的像素值. 越界时返回 `None`.
            #[inline]
            pub fn get(&self, pos: Idx2d) -> Option<&u8> {
                self.data.get(pos)
            }

            /// 图像的分辨率 (高, 宽).
            #[inline]
            pub fn shape(&self) -> Idx2d {
                self.data.dim()
            }

            /// 图像的像素个数.
            #[inline]
            pub fn size(&self) -> usize {
                let (h, w) = self.shape();
                h * w
            }

            /// 判断一个索引是否合法 (未越界).
            #[inline]
            pub fn check(&self, (h, w): Idx2d) -> bool {
                let (h_len, w_len) = self.shape();
                h < h_len && w < w_len
            }

            /// 统计图像中值为 `label` 的像素总个数.
            #[inline]
            pub fn count(&self, label: u8) -> usize {
                self.data.iter().filter(|&p| *p == label).count()
            }

            /// 图像是否全部为 `background`?
            #[inline]
            pub fn is_all(&self, background: u8) -> bool {
                self.data.iter().all(|&p| p == background)
            }

            /// 以行优先规则, 获取能迭代图像所有索引的迭代器.
            #[inline]
            pub fn pos_iter(&self) -> PosIter {
                PosIter::new(self.shape())
            }

            /// 以行优先规则, 获取能迭代图像所有 `(索引, 像素值)` 的迭代器.
            #[inline]
            pub fn indexed_iter(&self) -> impl Iterator<Item = (Idx2d, &u8)> {
                self.data.indexed_iter()
            }

            /// 获取所有值为 `label` 的像素索引, 按行优先排列.
            pub fn positions<B: FromIterator<Idx2d>>(&self, label: u8) -> B {
                self.pos_iter().filter(|pos| self[*pos] == label).collect()
            }
        }
    };
}

impl_mask_slice_immut!('a, MaskSlice<'a>, ArrayView2<'a, u8>);
impl_mask_slice_immut!('a, MaskSliceMut<'a>, ArrayViewMut2<'a, u8>);
