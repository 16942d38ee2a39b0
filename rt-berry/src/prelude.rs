//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx3d, Point3d};

pub use crate::contour::{Contour, ContourSet, ContourType};
pub use crate::convert::{convert, convert_set};
pub use crate::diagnostic::{DiagnosticSink, LogSink, NullSink, SkippedContour};
pub use crate::error::{ConvertError, ConvertResult, LoadResult, LoadVolumeError, OutOfBounds};
pub use crate::geometry::{world_to_voxel, GeometryAttr, Identity, ReferenceVolume, SpatialTransform};
pub use crate::mask::{ImgWriteVis, Mask, MaskAccumulator, MaskLabels, MaskSlice};

pub use crate::consts::gray::{MASK_BACKGROUND, MASK_FOREGROUND};
pub use crate::consts::ElemType;

pub use crate::dataset::{self, load_volume, VolumeSource};

#[cfg(feature = "rayon")]
pub use crate::convert::{par_convert, RoiOutcome};
