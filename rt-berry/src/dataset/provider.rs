//! 参考体积加载器.
//!
//! 一个序列对应一个 `.nii` / `.nii.gz` 文件, 序列号为去掉扩展名后的文件名.
//! 只读取 header, 不读取体素数据.

use std::fs;
use std::path::{Path, PathBuf};

use nifti::NiftiHeader;

use crate::error::{LoadResult, LoadVolumeError};
use crate::ReferenceVolume;

/// 可识别的影像文件扩展名. 较长者在前.
const SERIES_EXTENSIONS: [&str; 2] = [".nii.gz", ".nii"];

/// 影像输入位置.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VolumeSource {
    /// 目录. 其中 (不递归) 的每个 nifti 文件都是一个序列.
    Directory(PathBuf),

    /// 显式文件列表.
    Files(Vec<PathBuf>),
}

impl VolumeSource {
    /// 目录返回 `Directory`, 其他路径视为单个文件.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if path.is_dir() {
            Self::Directory(path.to_owned())
        } else {
            Self::Files(vec![path.to_owned()])
        }
    }
}

/// 一个可加载的影像序列.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Series {
    /// 序列号.
    pub id: String,

    /// 文件路径.
    pub path: PathBuf,
}

impl Series {
    /// 若 `path` 的文件名带有 nifti 扩展名, 则构建序列.
    fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let id = SERIES_EXTENSIONS
            .iter()
            .find_map(|ext| name.strip_suffix(ext))
            .filter(|id| !id.is_empty())?
            .to_owned();
        Some(Self { id, path })
    }
}

/// 列出目录 `dir` 下的全部序列, 按序列号升序排列.
///
/// 子目录和非 nifti 文件会被忽略.
pub fn list_series<P: AsRef<Path>>(dir: P) -> LoadResult<Vec<Series>> {
    let mut series = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() {
            series.extend(Series::from_path(path));
        }
    }
    series.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(series)
}

fn collect_series(source: &VolumeSource) -> LoadResult<Vec<Series>> {
    match source {
        VolumeSource::Directory(dir) => list_series(dir),
        VolumeSource::Files(files) => {
            let mut series: Vec<Series> = files
                .iter()
                .filter(|p| p.is_file())
                .filter_map(|p| Series::from_path(p.clone()))
                .collect();
            series.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(series)
        }
    }
}

/// 从 `source` 加载参考体积.
///
/// 给出 `series_id` 时加载对应序列, 否则加载序列号最小的序列.
///
/// # 返回值
///
/// - 给出了 `series_id` 但不存在该序列时, 返回 `Err(LoadVolumeError::InvalidFileFormat)`;
/// - `source` 下不存在任何序列时, 返回 `Err(LoadVolumeError::InvalidFileFormat)`;
/// - 目录无法读取时返回 `Err(LoadVolumeError::Io)`, header 无法解析时返回
///   `Err(LoadVolumeError::Nifti)`.
pub fn load_volume(source: &VolumeSource, series_id: Option<&str>) -> LoadResult<ReferenceVolume> {
    let series = collect_series(source)?;
    let chosen = match series_id {
        Some(id) => series.iter().find(|s| s.id == id).ok_or_else(|| {
            LoadVolumeError::InvalidFileFormat(format!("不存在序列 `{id}`"))
        })?,
        None => series.first().ok_or_else(|| {
            LoadVolumeError::InvalidFileFormat("未找到任何影像序列".to_owned())
        })?,
    };
    log::debug!("加载序列 `{}`: {}", chosen.id, chosen.path.display());

    let header = NiftiHeader::from_file(&chosen.path)?;
    ReferenceVolume::from_nifti_header(&header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryAttr;
    use std::io::Write;

    /// 在系统临时目录下创建一个空目录.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rt-berry-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// 写出一个只有 header 的 nifti-1 单文件, 不含 sform/qform.
    fn write_header(path: &Path, dim: [i16; 4], pixdim: [f32; 3]) {
        let mut buf = vec![0u8; 352];
        buf[0..4].copy_from_slice(&348i32.to_le_bytes());
        for (i, d) in dim.iter().enumerate() {
            let at = 40 + 2 * i;
            buf[at..at + 2].copy_from_slice(&d.to_le_bytes());
        }
        // datatype = uint8, bitpix = 8.
        buf[70..72].copy_from_slice(&2i16.to_le_bytes());
        buf[72..74].copy_from_slice(&8i16.to_le_bytes());
        buf[76..80].copy_from_slice(&1f32.to_le_bytes());
        for (i, p) in pixdim.iter().enumerate() {
            let at = 80 + 4 * i;
            buf[at..at + 4].copy_from_slice(&p.to_le_bytes());
        }
        buf[108..112].copy_from_slice(&352f32.to_le_bytes());
        buf[112..116].copy_from_slice(&1f32.to_le_bytes());
        buf[344..348].copy_from_slice(b"n+1\0");

        let mut f = fs::File::create(path).unwrap();
        f.write_all(&buf).unwrap();
    }

    #[test]
    fn test_series_from_path() {
        let s = Series::from_path(PathBuf::from("/tmp/ct_1.nii.gz")).unwrap();
        assert_eq!(s.id, "ct_1");
        let s = Series::from_path(PathBuf::from("a/b.nii")).unwrap();
        assert_eq!(s.id, "b");
        assert!(Series::from_path(PathBuf::from("a/b.dcm")).is_none());
        assert!(Series::from_path(PathBuf::from("a/.nii")).is_none());
    }

    #[test]
    fn test_list_and_load() {
        let dir = scratch_dir("list-and-load");
        write_header(&dir.join("b.nii"), [3, 4, 5, 6], [0.5, 0.5, 2.0]);
        write_header(&dir.join("a.nii"), [3, 8, 8, 2], [1.0, 1.0, 1.0]);
        fs::write(dir.join("notes.txt"), "not an image").unwrap();
        fs::create_dir_all(dir.join("sub.nii")).unwrap();

        let ids: Vec<_> = list_series(&dir).unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let source = VolumeSource::from_path(&dir);
        assert_eq!(source, VolumeSource::Directory(dir.clone()));

        let first = load_volume(&source, None).unwrap();
        assert_eq!(first.extents(), (8, 8, 2));

        let b = load_volume(&source, Some("b")).unwrap();
        assert_eq!(b.extents(), (4, 5, 6));
        assert_eq!(b.spacing(), (0.5, 0.5, 2.0));
        assert_eq!(b.shape(), (6, 5, 4));

        let files = VolumeSource::Files(vec![dir.join("b.nii"), dir.join("notes.txt")]);
        assert_eq!(load_volume(&files, None).unwrap().extents(), (4, 5, 6));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_invalid_file_format() {
        let dir = scratch_dir("invalid-format");
        let source = VolumeSource::Directory(dir.clone());
        assert!(matches!(
            load_volume(&source, None),
            Err(LoadVolumeError::InvalidFileFormat(_))
        ));

        fs::write(dir.join("scan.txt"), "not an image").unwrap();
        assert!(matches!(
            load_volume(&source, None),
            Err(LoadVolumeError::InvalidFileFormat(_))
        ));

        write_header(&dir.join("ct.nii"), [3, 2, 2, 2], [1.0, 1.0, 1.0]);
        assert!(load_volume(&source, Some("ct")).is_ok());
        assert!(matches!(
            load_volume(&source, Some("mr")),
            Err(LoadVolumeError::InvalidFileFormat(_))
        ));

        let files = VolumeSource::Files(vec![dir.join("missing.nii")]);
        assert!(matches!(
            load_volume(&files, None),
            Err(LoadVolumeError::InvalidFileFormat(_))
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_errors_propagate() {
        let dir = scratch_dir("propagate");
        assert!(matches!(
            load_volume(&VolumeSource::Directory(dir.join("nope")), None),
            Err(LoadVolumeError::Io(_))
        ));

        fs::write(dir.join("broken.nii"), [0u8; 16]).unwrap();
        let e = load_volume(&VolumeSource::Directory(dir.clone()), None).unwrap_err();
        assert!(matches!(e, LoadVolumeError::Nifti(_)));

        let _ = fs::remove_dir_all(&dir);
    }
}
