//! 影像数据位置与参考体积加载.

use std::env;
use std::path::{Path, PathBuf};

mod provider;

pub use provider::{list_series, load_volume, Series, VolumeSource};

/// 影像序列目录的环境变量名.
pub const SERIES_DIR_ENV: &str = "RT_BERRY_SERIES_DIR";

/// 获取 `{用户主目录}/dataset` 目录.
pub fn home_dataset_dir() -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("dataset");
    Some(ans)
}

/// 获取 `{用户主目录}/dataset` 目录下给定继续项组成的全路径.
pub fn home_dataset_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = home_dataset_dir()?;
    ans.extend(it);
    Some(ans)
}

/// 获取影像序列目录.
///
/// 1. 若环境变量 `$RT_BERRY_SERIES_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/series`. 无法确定用户主目录时返回 `None`.
pub fn series_dir_from_env_or_home() -> Option<PathBuf> {
    match env::var(SERIES_DIR_ENV) {
        Ok(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => home_dataset_dir_with(["series"]),
    }
}
