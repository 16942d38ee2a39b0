//! 参考体积的几何信息, 以及物理坐标与体素坐标之间的转换.
//!
//! 约定与 ITK 一致: 方向矩阵的第 `j` 列是体素索引第 `j` 轴在物理空间中的方向,
//! 因此 `physical = origin + direction * diag(spacing) * index`.
//! 体素中心位于整数索引处.
//!
//! 注意体素索引 `(x, y, z)` 与数组访问顺序 `(z, h, w)` 不同,
//! 二者的关系是 `(z, h, w) == (z, y, x)`.

mod header;

use crate::error::GeometryError;
use crate::{Idx2d, Idx3d, Idx3dF, Matrix3, Point3d};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 单位方向矩阵.
pub const IDENTITY_DIRECTION: Matrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// 参考影像网格 (仅几何信息).
///
/// 该结构由卷加载器一次性生成, 转换期间只读.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceVolume {
    /// 体素个数 `(nx, ny, nz)`.
    size: (usize, usize, usize),

    /// 体素间距 `(sx, sy, sz)`, 单位毫米.
    spacing: (f64, f64, f64),

    /// 索引 `(0, 0, 0)` 体素中心的物理坐标.
    origin: Point3d,

    /// 方向余弦矩阵, 行优先存储.
    direction: Matrix3,

    /// 缓存的 `diag(1 / spacing) * direction^-1`.
    physical_to_index: Matrix3,
}

impl ReferenceVolume {
    /// 从体素个数、体素间距、原点和方向矩阵构建参考体积.
    ///
    /// # 返回值
    ///
    /// - 任一维体素个数为 0 时, 返回 `Err(GeometryError::EmptyExtent)`;
    /// - 任一体素间距非正或不是有限值时, 返回 `Err(GeometryError::InvalidSpacing)`;
    /// - 方向矩阵奇异时, 返回 `Err(GeometryError::SingularDirection)`.
    pub fn new(
        size: (usize, usize, usize),
        spacing: (f64, f64, f64),
        origin: Point3d,
        direction: Matrix3,
    ) -> Result<Self, GeometryError> {
        let (nx, ny, nz) = size;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(GeometryError::EmptyExtent(size));
        }
        let (sx, sy, sz) = spacing;
        if [sx, sy, sz].iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(GeometryError::InvalidSpacing(spacing));
        }
        let inv = invert3(&direction).ok_or(GeometryError::SingularDirection)?;
        let scale = [sx, sy, sz];
        let mut physical_to_index = inv;
        for (row, s) in physical_to_index.iter_mut().zip(scale) {
            row.iter_mut().for_each(|v| *v /= s);
        }

        Ok(Self {
            size,
            spacing,
            origin,
            direction,
            physical_to_index,
        })
    }

    /// 构建方向矩阵为单位阵的 (轴位) 参考体积.
    #[inline]
    pub fn axial(
        size: (usize, usize, usize),
        spacing: (f64, f64, f64),
        origin: Point3d,
    ) -> Result<Self, GeometryError> {
        Self::new(size, spacing, origin, IDENTITY_DIRECTION)
    }

    /// 体素个数 `(nx, ny, nz)`.
    #[inline]
    pub fn extents(&self) -> (usize, usize, usize) {
        self.size
    }

    /// 原点.
    #[inline]
    pub fn origin(&self) -> Point3d {
        self.origin
    }

    /// 方向余弦矩阵.
    #[inline]
    pub fn direction(&self) -> &Matrix3 {
        &self.direction
    }

    /// 将物理坐标 `point` 转换为连续 (不取整) 的体素索引 `(fx, fy, fz)`.
    pub fn world_to_voxel(&self, (px, py, pz): Point3d) -> Idx3dF {
        let (ox, oy, oz) = self.origin;
        let d = [px - ox, py - oy, pz - oz];
        let [a, b, c] = mul3(&self.physical_to_index, d);
        (a, b, c)
    }

    /// 将连续体素索引 `index` 转换为物理坐标.
    pub fn voxel_to_world(&self, (fx, fy, fz): Idx3dF) -> Point3d {
        let (sx, sy, sz) = self.spacing;
        let [a, b, c] = mul3(&self.direction, [fx * sx, fy * sy, fz * sz]);
        let (ox, oy, oz) = self.origin;
        (ox + a, oy + b, oz + c)
    }
}

/// 将物理坐标点 `point` 转换为 `volume` 中的连续体素索引.
///
/// 若给出 `transform`, 则先对 `point` 施加该空间变换.
#[inline]
pub fn world_to_voxel(
    point: Point3d,
    volume: &ReferenceVolume,
    transform: Option<&dyn SpatialTransform>,
) -> Idx3dF {
    let point = match transform {
        Some(t) => t.transform_point(point),
        None => point,
    };
    volume.world_to_voxel(point)
}

/// 物理空间到物理空间的坐标变换 (例如配准结果).
pub trait SpatialTransform {
    /// 变换一个物理坐标点.
    fn transform_point(&self, point: Point3d) -> Point3d;
}

impl<F> SpatialTransform for F
where
    F: Fn(Point3d) -> Point3d,
{
    #[inline]
    fn transform_point(&self, point: Point3d) -> Point3d {
        self(point)
    }
}

/// 恒等变换.
#[derive(Copy, Clone, Debug, Default)]
pub struct Identity;

impl SpatialTransform for Identity {
    #[inline]
    fn transform_point(&self, point: Point3d) -> Point3d {
        point
    }
}

/// 三维网格几何信息的共用属性和部分通用操作.
pub trait GeometryAttr {
    /// 获取几何信息.
    fn geometry(&self) -> &ReferenceVolume;

    /// 获取数据形状大小, 按 `(z, h, w)` 排列.
    #[inline]
    fn shape(&self) -> Idx3d {
        let (nx, ny, nz) = self.geometry().size;
        (nz, ny, nx)
    }

    /// 获取数据水平切片形状大小 `(h, w)`.
    #[inline]
    fn slice_shape(&self) -> Idx2d {
        let (_, h, w) = self.shape();
        (h, w)
    }

    /// 获取水平切片个数.
    #[inline]
    fn len_z(&self) -> usize {
        self.shape().0
    }

    /// 获取数据体素个数.
    #[inline]
    fn size(&self) -> usize {
        let (z, h, w) = self.shape();
        z * h * w
    }

    /// 检查 `(z, h, w)` 索引是否合法.
    #[inline]
    fn check(&self, (z0, h0, w0): &Idx3d) -> bool {
        let (z, h, w) = self.shape();
        *z0 < z && *h0 < h && *w0 < w
    }

    /// 获取单个体素分辨率, 以毫米为单位, 按 `(z, h, w)` 排列.
    #[inline]
    fn pix_dim(&self) -> [f64; 3] {
        let (sx, sy, sz) = self.geometry().spacing;
        [sz, sy, sx]
    }

    /// 获取体素间距 `(sx, sy, sz)`.
    #[inline]
    fn spacing(&self) -> (f64, f64, f64) {
        self.geometry().spacing
    }

    /// 体素分辨率在三个维度上是否是各向同的?
    #[inline]
    fn is_isotropic(&self) -> bool {
        let [z, h, w] = self.pix_dim();
        z == h && z == w
    }

    /// 获取体素的实际体积值, 以立方毫米为单位.
    #[inline]
    fn voxel(&self) -> f64 {
        self.pix_dim().iter().product()
    }

    /// 获取水平切片方向的像素实际面积值, 以平方毫米为单位.
    #[inline]
    fn slice_pixel(&self) -> f64 {
        self.pix_dim().iter().skip(1).product()
    }
}

impl GeometryAttr for ReferenceVolume {
    #[inline]
    fn geometry(&self) -> &ReferenceVolume {
        self
    }
}

#[inline]
fn mul3(m: &Matrix3, v: [f64; 3]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (o, row) in out.iter_mut().zip(m) {
        *o = row.iter().zip(v).map(|(a, b)| a * b).sum();
    }
    out
}

/// 伴随矩阵法求 3x3 矩阵的逆. 奇异或含非有限值时返回 `None`.
fn invert3(m: &Matrix3) -> Option<Matrix3> {
    let [[a, b, c], [d, e, f], [g, h, i]] = *m;
    let co = [
        [e * i - f * h, c * h - b * i, b * f - c * e],
        [f * g - d * i, a * i - c * g, c * d - a * f],
        [d * h - e * g, b * g - a * h, a * e - b * d],
    ];
    let det = a * co[0][0] + b * co[1][0] + c * co[2][0];
    if !det.is_finite() || det.abs() < 1e-12 {
        return None;
    }
    let mut inv = co;
    inv.iter_mut().flatten().for_each(|v| *v /= det);
    Some(inv)
}
