use crate::Idx2d;

/// 行优先的二维矩形窗口索引迭代器.
///
/// 相比 `(0..h).flat_map(|r| (0..w).map(move |c| (r, c)))`,
/// 手写迭代器体积更小, 且能直接描述不从 `(0, 0)` 开始的窗口.
#[derive(Debug, Clone)]
pub struct PosIter {
    cur: Idx2d,
    start_w: usize,
    end: Idx2d,
}

impl PosIter {
    /// 迭代 `[0, h) x [0, w)`.
    #[inline]
    pub fn new((h, w): Idx2d) -> Self {
        Self::window((0, 0), (h, w))
    }

    /// 迭代 `[h0, h1) x [w0, w1)`.
    #[inline]
    pub fn window((h0, w0): Idx2d, (h1, w1): Idx2d) -> Self {
        // 空窗口直接置为结束状态.
        let h0 = if w0 >= w1 { h1 } else { h0 };
        Self {
            cur: (h0, w0),
            start_w: w0,
            end: (h1, w1),
        }
    }
}

impl Iterator for PosIter {
    type Item = Idx2d;

    fn next(&mut self) -> Option<Self::Item> {
        let (h, w) = self.cur;
        if h >= self.end.0 {
            return None;
        }
        self.cur = if w + 1 == self.end.1 {
            (h + 1, self.start_w)
        } else {
            (h, w + 1)
        };
        Some((h, w))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (h, w) = self.cur;
        let n = if h >= self.end.0 {
            0
        } else {
            let row_len = self.end.1 - self.start_w;
            (self.end.0 - h - 1) * row_len + (self.end.1 - w)
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for PosIter {}
