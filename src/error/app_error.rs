use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 打包流程中的错误类型
#[derive(Error, Debug)]
pub enum BundlerError {
    /// 配置不合法，在任何网络或磁盘操作之前检测
    #[error("参数校验失败: {field} - {reason}")]
    Validation { field: String, reason: String },

    /// 配置文件无法读取或解析
    #[error("配置错误: {message}")]
    Config { message: String },

    /// 发布目录没有返回任何匹配的版本
    #[error("未找到匹配的发布版本: {query}")]
    NotFound { query: String },

    /// 发布目录可达，但返回了错误状态或无法解析的响应
    #[error("发布目录响应异常: {url} (状态码: {}) - {message}", display_status(.status))]
    Upstream {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// 下载地址返回了非成功状态码
    #[error("下载失败: {url} 返回状态码 {status}: {body}")]
    Transfer { url: String, status: u16, body: String },

    /// 请求在建立连接或读取数据时失败
    #[error("网络错误: {url} - {message}")]
    Network { url: String, message: String },

    /// 压缩包结构存在歧义，无法整理
    #[error("目录结构冲突: {} - {reason}", .path.display())]
    Conflict { path: PathBuf, reason: String },

    /// 压缩包无法读取或已损坏
    #[error("压缩包错误: {} - {message}", .path.display())]
    Archive { path: PathBuf, message: String },

    #[error("IO 错误: {} - {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn display_status(status: &Option<u16>) -> String {
    status
        .map(|code| code.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// 应用程序 Result 类型
pub type BundlerResult<T> = Result<T, BundlerError>;

/// 便捷的错误创建函数
impl BundlerError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn network(url: &str, error: impl std::fmt::Display) -> Self {
        Self::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    pub fn conflict(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Conflict {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn archive(path: impl AsRef<Path>, error: impl std::fmt::Display) -> Self {
        Self::Archive {
            path: path.as_ref().to_path_buf(),
            message: error.to_string(),
        }
    }

    /// 错误类别的简短名称，用于 JSON 输出
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Config { .. } => "config",
            Self::NotFound { .. } => "not_found",
            Self::Upstream { .. } => "upstream",
            Self::Transfer { .. } => "transfer",
            Self::Network { .. } => "network",
            Self::Conflict { .. } => "conflict",
            Self::Archive { .. } => "archive",
            Self::Io { .. } => "io",
        }
    }
}
