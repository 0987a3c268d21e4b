use crate::error::{BundlerError, BundlerResult};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// 压缩包中的条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub is_dir: bool,
}

impl ArchiveEntry {
    /// 若条目是压缩包根目录下的一级目录，返回目录名
    ///
    /// 同时兼容 `/` 和 `\` 分隔符。
    pub fn top_level_dir(&self) -> Option<&str> {
        if !self.is_dir {
            return None;
        }
        let slashes = self.name.matches('/').count();
        let backslashes = self.name.matches('\\').count();
        if slashes != 1 && backslashes != 1 {
            return None;
        }
        let name = self.name.trim_end_matches(['/', '\\']);
        if name.is_empty() || name.contains(['/', '\\']) {
            return None;
        }
        Some(name)
    }
}

/// 解压结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOutcome {
    pub target_dir: PathBuf,
    /// 被提升到根目录的一级目录名
    pub flattened: Option<String>,
}

/// 列出压缩包中的所有条目
pub fn list_entries(archive_path: &Path) -> BundlerResult<Vec<ArchiveEntry>> {
    let mut archive = open_archive(archive_path)?;
    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let file = archive
            .by_index(i)
            .map_err(|e| BundlerError::archive(archive_path, format!("读取 ZIP 文件项失败: {e}")))?;
        entries.push(ArchiveEntry {
            name: file.name().to_string(),
            is_dir: file.is_dir(),
        });
    }
    Ok(entries)
}

/// 解压到目标目录，可选地把唯一的一级目录内容提升到根目录
///
/// 存在两个及以上一级目录时无法判断应提升哪一个，返回冲突错误；
/// 没有一级目录时不做移动。
pub fn extract(
    archive_path: &Path,
    target_dir: &Path,
    flatten_top_level: bool,
) -> BundlerResult<ExtractOutcome> {
    if !target_dir.exists() {
        fs::create_dir_all(target_dir).map_err(|e| BundlerError::io(target_dir, e))?;
    }

    extract_all(archive_path, target_dir)?;
    log::info!("已解压 {} 到 {}", archive_path.display(), target_dir.display());

    let not_flattened = || ExtractOutcome {
        target_dir: target_dir.to_path_buf(),
        flattened: None,
    };
    if !flatten_top_level {
        return Ok(not_flattened());
    }

    let mut top_level_dirs: Vec<String> = list_entries(archive_path)?
        .iter()
        .filter_map(|entry| entry.top_level_dir().map(str::to_string))
        .collect();
    top_level_dirs.dedup();

    match top_level_dirs.as_slice() {
        [] => {
            log::info!("压缩包没有一级目录，跳过目录提升");
            Ok(not_flattened())
        }
        [dir] => {
            let folder = target_dir.join(dir);
            if !folder.is_dir() {
                log::warn!("解压后找不到一级目录 {}，跳过目录提升", folder.display());
                return Ok(not_flattened());
            }
            move_directory_content(&folder, target_dir)?;
            log::info!("已将 {dir} 中的内容移动到 {}", target_dir.display());
            Ok(ExtractOutcome {
                target_dir: target_dir.to_path_buf(),
                flattened: Some(dir.clone()),
            })
        }
        many => Err(BundlerError::conflict(
            archive_path,
            format!("压缩包包含多个一级目录 ({})，无法确定要提升的目录", many.join(", ")),
        )),
    }
}

/// 逐项解压，`\` 分隔的条目名按目录层级写出
fn extract_all(archive_path: &Path, target_dir: &Path) -> BundlerResult<()> {
    let mut archive = open_archive(archive_path)?;
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| BundlerError::archive(archive_path, format!("读取 ZIP 文件项失败: {e}")))?;
        let relative = entry_path(file.name()).ok_or_else(|| {
            BundlerError::archive(archive_path, format!("条目路径不安全: {}", file.name()))
        })?;
        if relative.as_os_str().is_empty() {
            continue;
        }

        let out_path = target_dir.join(&relative);
        if file.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| BundlerError::io(&out_path, e))?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BundlerError::io(parent, e))?;
        }
        let mut out_file = fs::File::create(&out_path).map_err(|e| BundlerError::io(&out_path, e))?;
        io::copy(&mut file, &mut out_file).map_err(|e| {
            BundlerError::archive(archive_path, format!("解压 {} 失败: {e}", file.name()))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode() {
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                    .map_err(|e| BundlerError::io(&out_path, e))?;
            }
        }
    }
    Ok(())
}

/// 把条目名转换为相对路径，两种分隔符都视为目录分隔
///
/// 包含 `..`、盘符或空字符的条目返回 `None`。
fn entry_path(name: &str) -> Option<PathBuf> {
    if name.contains('\0') {
        return None;
    }
    let mut path = PathBuf::new();
    for part in name.split(['/', '\\']) {
        match part {
            "" | "." => continue,
            ".." => return None,
            part => {
                if !Path::new(part)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)))
                {
                    return None;
                }
                path.push(part);
            }
        }
    }
    Some(path)
}

/// 把 `folder` 中的所有内容移动到 `destination`，然后删除 `folder`
///
/// 使用重命名而不是复制，避免大体积运行时占用双倍磁盘空间。
/// 移动前先检查冲突，冲突时目录结构保持解压后的样子。
fn move_directory_content(folder: &Path, destination: &Path) -> BundlerResult<()> {
    let children = read_children(folder)?;
    for child in &children {
        let target = destination.join(child);
        // 与父目录同名的子项会在父目录移走后放回原位
        if target != folder && target.exists() {
            return Err(BundlerError::conflict(
                &target,
                "目标目录中已存在同名文件或目录",
            ));
        }
    }

    // 先换成唯一的临时名，避免子项与父目录同名时冲突
    let staging = destination.join(format!(".flatten-{}", uuid::Uuid::new_v4()));
    fs::rename(folder, &staging).map_err(|e| BundlerError::io(folder, e))?;

    for child in &children {
        let source = staging.join(child);
        let target = destination.join(child);
        if let Err(e) = fs::rename(&source, &target) {
            // 尽量恢复原目录名，已移动的子项保留在目标目录
            if !folder.exists() {
                let _ = fs::rename(&staging, folder);
            }
            return Err(BundlerError::io(&source, e));
        }
    }

    fs::remove_dir(&staging).map_err(|e| BundlerError::io(&staging, e))
}

fn read_children(folder: &Path) -> BundlerResult<Vec<std::ffi::OsString>> {
    let entries = fs::read_dir(folder).map_err(|e| BundlerError::io(folder, e))?;
    entries
        .map(|entry| {
            entry
                .map(|e| e.file_name())
                .map_err(|e| BundlerError::io(folder, e))
        })
        .collect()
}

fn open_archive(archive_path: &Path) -> BundlerResult<zip::ZipArchive<fs::File>> {
    let file = fs::File::open(archive_path).map_err(|e| BundlerError::io(archive_path, e))?;
    zip::ZipArchive::new(file)
        .map_err(|e| BundlerError::archive(archive_path, format!("读取 ZIP 文件失败: {e}")))
}
