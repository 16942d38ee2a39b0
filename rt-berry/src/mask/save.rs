//! 标签切片的可视化存储.

use super::{MaskSlice, MaskSliceMut};
use crate::consts::ElemType;
use crate::MaskLabels;
use image::ImageResult;
use std::path::Path;

/// 表明一个可以通过 **可视化友好** 模式持久化存储的图像对象.
///
/// 标签值本身通常很小 (例如 0 和 1), 直接保存几乎看不出区别,
/// 因此保存时会映射为肉眼容易区分的灰度.
pub trait ImgWriteVis {
    /// 按照 `labels` 的可视化规则将图片保存到 `path` 路径.
    fn save<P: AsRef<Path>>(&self, path: P, labels: MaskLabels) -> ImageResult<()>;
}

/// 使像素更有利于单通道可视化.
#[inline]
pub(crate) fn pretty(labels: MaskLabels, pix: u8) -> u8 {
    use crate::consts::gray::*;
    match labels.classify(pix) {
        // 背景为黑色
        ElemType::Background => BLACK,

        // 前景为白色
        ElemType::Foreground => WHITE,

        // 其他值介于两者之间
        ElemType::Unknown => GRAY,
    }
}

macro_rules! impl_mask_vis {
    ($($slice: ty),+) => {
        $(
            /// 会将背景/前景/其他像素分别映射为黑色/白色/灰色.
            impl ImgWriteVis for $slice {
                fn save<P: AsRef<Path>>(&self, path: P, labels: MaskLabels) -> ImageResult<()> {
                    let (height, width) = self.shape();
                    let mut buf = image::GrayImage::new(width as u32, height as u32);
                    for ((h, w), &pix) in self.indexed_iter() {
                        buf.put_pixel(w as u32, h as u32, image::Luma([pretty(labels, pix)]));
                    }
                    buf.save(path)
                }
            }
        )+
    };
}

impl_mask_vis!(MaskSlice<'_>, MaskSliceMut<'_>);
