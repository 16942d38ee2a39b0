//! 二维多边形栅格化.
//!
//! 输入为连续体素坐标 `(x, y)` 下的多边形顶点, 输出为 `(h, w)` 形状的内部掩码,
//! 其中 `h` 对应 y, `w` 对应 x. 像素 `(row, col)` 的中心位于 `(x, y) = (col, row)`.

use ndarray::Array2;
use num::ToPrimitive;

use crate::error::{Axis2d, OutOfBounds};
use crate::mask::PosIter;
use crate::Idx2d;

/// 将首尾隐式相连的多边形 `(xs[i], ys[i])` 栅格化到 `(h, w)` 网格上.
///
/// 像素中心按奇偶规则 (半开交叉测试) 落在多边形内部时, 该像素为 `true`.
/// 自相交多边形同样按奇偶规则填充, 不做特殊处理.
///
/// # 返回值
///
/// 任一顶点取最近整数 (正中时取偶数, 见 [`round_half_even`]) 后的像素索引
/// 不在 `[0, w)` (x) 或 `[0, h)` (y) 内时,
/// 返回 `Err(OutOfBounds::Pixel)`; 非有限坐标同样视为越界.
/// 该检查在填充之前完成, 不会截断多边形.
///
/// # 注意
///
/// `xs` 与 `ys` 长度必须一致, 否则程序 panic.
pub fn rasterize_polygon(
    xs: &[f64],
    ys: &[f64],
    (h, w): Idx2d,
) -> Result<Array2<bool>, OutOfBounds> {
    assert_eq!(xs.len(), ys.len(), "顶点坐标长度不一致");
    check_axis(xs, w, Axis2d::Width)?;
    check_axis(ys, h, Axis2d::Height)?;

    let mut interior = Array2::from_elem((h, w), false);
    let (Some((c0, c1)), Some((r0, r1))) = (pixel_span(xs), pixel_span(ys)) else {
        return Ok(interior);
    };

    for pos @ (r, c) in PosIter::window((r0, c0), (r1 + 1, c1 + 1)) {
        interior[pos] = point_in_polygon(xs, ys, c as f64, r as f64);
    }
    Ok(interior)
}

/// 取最近整数, 恰好位于两整数正中时取偶数 (银行家舍入).
///
/// 例如 `0.5 -> 0`, `1.5 -> 2`, `2.5 -> 2`, `-0.5 -> -0`. 非有限值原样返回.
#[inline]
pub(crate) fn round_half_even(v: f64) -> f64 {
    if (v - v.trunc()).abs() == 0.5 {
        2.0 * (v / 2.0).round()
    } else {
        v.round()
    }
}

/// 检查所有坐标取最近整数后都位于 `[0, len)` 内.
fn check_axis(coords: &[f64], len: usize, axis: Axis2d) -> Result<(), OutOfBounds> {
    let range = 0.0..len as f64;
    match coords.iter().find(|c| !range.contains(&round_half_even(**c))) {
        Some(&coord) => Err(OutOfBounds::Pixel { axis, coord, len }),
        None => Ok(()),
    }
}

/// 多边形在某一轴上覆盖的像素中心闭区间. 区间为空时返回 `None`.
///
/// 调用前坐标已通过 [`check_axis`], 因此区间必然位于网格内.
fn pixel_span(coords: &[f64]) -> Option<(usize, usize)> {
    let lo = coords.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = coords.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lo = lo.ceil().max(0.0).to_usize()?;
    let hi = hi.floor().to_usize()?;
    (lo <= hi).then_some((lo, hi))
}

/// 奇偶规则判断点 `(x, y)` 是否在多边形内.
///
/// 边 `(i, j)` 只在 `y` 位于 `[min(y_i, y_j), max(y_i, y_j))` 且交点严格位于 `x`
/// 右侧时计数, 因此恰好落在左/下边界上的点算作内部, 右/上边界上的点算作外部.
pub fn point_in_polygon(xs: &[f64], ys: &[f64], x: f64, y: f64) -> bool {
    let n = xs.len();
    if n == 0 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi, xj, yj) = (xs[i], ys[i], xs[j], ys[j]);
        if ((yi <= y && y < yj) || (yj <= y && y < yi))
            && x < (xj - xi) * (y - yi) / (yj - yi) + xi
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(mask: &Array2<bool>) -> Vec<Idx2d> {
        mask.indexed_iter()
            .filter_map(|(pos, &v)| v.then_some(pos))
            .collect()
    }

    #[test]
    fn test_unit_square() {
        // 仅左下角像素中心落在半开区间内.
        let m = rasterize_polygon(&[2.0, 3.0, 3.0, 2.0], &[2.0, 2.0, 3.0, 3.0], (10, 10)).unwrap();
        assert_eq!(positions(&m), vec![(2, 2)]);
    }

    #[test]
    fn test_rectangle_fractional() {
        // x in [1.5, 4.5], y in [0.5, 2.5] -> 列 2..=4, 行 1..=2.
        let m = rasterize_polygon(&[1.5, 4.5, 4.5, 1.5], &[0.5, 0.5, 2.5, 2.5], (5, 6)).unwrap();
        let expected: Vec<Idx2d> = (1..=2)
            .flat_map(|r| (2..=4).map(move |c| (r, c)))
            .collect();
        assert_eq!(positions(&m), expected);
        assert_eq!(m.shape(), &[5, 6]);
    }

    #[test]
    fn test_triangle() {
        let m = rasterize_polygon(&[0.0, 4.0, 0.0], &[0.0, 0.0, 4.0], (6, 6)).unwrap();
        for (r, c) in positions(&m) {
            assert!(r + c < 4, "({r}, {c})");
        }
        assert!(m[(0, 0)] && m[(1, 2)] && m[(3, 0)]);
        assert!(!m[(2, 2)] && !m[(4, 0)]);
    }

    #[test]
    fn test_self_intersecting_even_odd() {
        // 五角星: 中心五边形被穿越两次, 按奇偶规则为外部.
        let (cx, cy, r) = (10.0f64, 10.0f64, 9.0f64);
        let (xs, ys): (Vec<f64>, Vec<f64>) = (0..5)
            .map(|k| {
                let a = std::f64::consts::PI * (0.5 + 0.8 * k as f64);
                (cx + r * a.cos(), cy - r * a.sin())
            })
            .unzip();
        let m = rasterize_polygon(&xs, &ys, (21, 21)).unwrap();
        assert!(!m[(10, 10)]);
        // 上方尖角内部.
        assert!(m[(4, 10)]);
    }

    #[test]
    fn test_degenerate() {
        let m = rasterize_polygon(&[1.0, 5.0, 3.0], &[2.0, 2.0, 2.0], (8, 8)).unwrap();
        assert!(positions(&m).is_empty());

        let m = rasterize_polygon(&[], &[], (3, 3)).unwrap();
        assert!(positions(&m).is_empty());
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let e = rasterize_polygon(&[1.0, 10.0, 1.0], &[1.0, 1.0, 3.0], (10, 10)).unwrap_err();
        assert_eq!(
            e,
            OutOfBounds::Pixel {
                axis: Axis2d::Width,
                coord: 10.0,
                len: 10
            }
        );

        let e = rasterize_polygon(&[1.0, 2.0, 1.0], &[1.0, 1.0, -0.6], (10, 10)).unwrap_err();
        assert!(matches!(e, OutOfBounds::Pixel { axis: Axis2d::Height, .. }));

        // 取整后仍在网格内.
        assert!(rasterize_polygon(&[-0.4, 9.4, 9.4], &[0.0, 0.0, 9.4], (10, 10)).is_ok());

        let e = rasterize_polygon(&[f64::NAN, 2.0, 1.0], &[1.0, 1.0, 2.0], (10, 10)).unwrap_err();
        assert!(matches!(e, OutOfBounds::Pixel { axis: Axis2d::Width, .. }));
    }

    #[test]
    fn test_round_half_even() {
        for (v, expected) in [
            (0.5, 0.0),
            (1.5, 2.0),
            (2.5, 2.0),
            (3.5, 4.0),
            (-0.5, 0.0),
            (-1.5, -2.0),
            (2.4, 2.0),
            (2.6, 3.0),
            (-2.6, -3.0),
            (7.0, 7.0),
        ] {
            assert_eq!(round_half_even(v), expected, "{v}");
        }
        assert!(round_half_even(f64::NAN).is_nan());
        assert_eq!(round_half_even(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_pixel_half_boundary() {
        // -0.5 取偶为 0, 位于网格内.
        let m = rasterize_polygon(&[-0.5, 2.0, 2.0, -0.5], &[-0.5, -0.5, 2.0, 2.0], (4, 4)).unwrap();
        let expected: Vec<Idx2d> = (0..=1)
            .flat_map(|r| (0..=1).map(move |c| (r, c)))
            .collect();
        assert_eq!(positions(&m), expected);

        // w - 0.5 = 8.5 取偶为 8, 位于 9 列网格内.
        assert!(rasterize_polygon(&[6.0, 8.5, 8.5], &[1.0, 1.0, 3.0], (9, 9)).is_ok());

        // w - 0.5 = 9.5 取偶为 10, 越出 10 列网格.
        let e = rasterize_polygon(&[6.0, 9.5, 9.5], &[1.0, 1.0, 3.0], (10, 10)).unwrap_err();
        assert_eq!(
            e,
            OutOfBounds::Pixel {
                axis: Axis2d::Width,
                coord: 9.5,
                len: 10
            }
        );

        // -1.5 取偶为 -2.
        let e = rasterize_polygon(&[1.0, 2.0, 1.0], &[1.0, 1.0, -1.5], (10, 10)).unwrap_err();
        assert!(matches!(e, OutOfBounds::Pixel { axis: Axis2d::Height, .. }));
    }
}
