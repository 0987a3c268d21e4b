use crate::error::{BundlerError, BundlerResult};

/// Windows 文件名中不允许出现的字符
const WINDOWS_INVALID_CHARS: [char; 6] = ['<', '>', '"', '|', '?', '*'];

/// 验证路径模板在语法上是否合法
///
/// 只检查路径本身能否被操作系统接受，`{{变量}}` 占位符是允许的。
pub fn validate_path(field: &str, path: &str) -> BundlerResult<()> {
    if path.trim().is_empty() {
        return Err(BundlerError::validation(field, "路径不能为空"));
    }

    if path.contains('\0') {
        return Err(BundlerError::validation(field, format!("路径包含空字符: {path:?}")));
    }

    if cfg!(target_os = "windows") {
        if let Some(ch) = path.chars().find(|c| WINDOWS_INVALID_CHARS.contains(c)) {
            return Err(BundlerError::validation(
                field,
                format!("路径包含无效字符 '{ch}': {path}"),
            ));
        }
    }

    Ok(())
}

/// 验证输出文件名，文件名不能表示一个目录
pub fn validate_file_name(field: &str, name: &str) -> BundlerResult<()> {
    if name.ends_with('/') || name.ends_with('\\') {
        return Err(BundlerError::validation(field, format!("输出文件名不能是目录: {name}")));
    }
    validate_path(field, name)
}
