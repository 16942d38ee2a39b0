//! 诊断事件.
//!
//! 转换流程本身不调用任何日志宏, 而是把事件交给调用方注入的 [`DiagnosticSink`].

use std::fmt::{Display, Formatter};

/// 一个因几何类型不受支持而被跳过的轮廓.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SkippedContour {
    /// 轮廓显示名称 (若有).
    pub name: Option<String>,

    /// 轮廓几何类型标签.
    pub kind: String,
}

/// 可读的单行描述, [`LogSink`] 即以此为日志内容.
impl Display for SkippedContour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "跳过轮廓 `{name}`, 不支持的类型: {}", self.kind),
            None => write!(f, "跳过未命名轮廓, 不支持的类型: {}", self.kind),
        }
    }
}

/// 单向的诊断事件接收端. 仅用于通知, 不会导致转换失败.
pub trait DiagnosticSink {
    /// 接收一条 "轮廓被跳过" 事件.
    fn contour_skipped(&mut self, event: &SkippedContour);
}

/// 丢弃所有事件.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    #[inline]
    fn contour_skipped(&mut self, _: &SkippedContour) {}
}

/// 将事件以 `info` 级别转发到 `log` 门面.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    #[inline]
    fn contour_skipped(&mut self, event: &SkippedContour) {
        log::info!("{event}");
    }
}

/// 收集所有事件.
impl DiagnosticSink for Vec<SkippedContour> {
    #[inline]
    fn contour_skipped(&mut self, event: &SkippedContour) {
        self.push(event.clone());
    }
}
