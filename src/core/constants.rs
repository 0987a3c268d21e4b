//! 应用程序常量定义
//!
//! 本模块包含全局使用的常量，避免魔数并提供统一的配置值。

/// 网络相关常量
pub mod network {
    /// Adoptium API 默认地址
    pub const DEFAULT_API_BASE_URL: &str = "https://api.adoptium.net";
    /// 默认连接超时时间（秒）
    pub const DEFAULT_CONNECT_TIMEOUT_SEC: u64 = 30;
    /// 发布目录查询的请求超时时间（秒）
    pub const DEFAULT_TIMEOUT_SEC: u64 = 60;
    /// 下载时等待响应或下一个数据块的最长时间（秒）
    pub const DEFAULT_READ_TIMEOUT_SEC: u64 = 120;
    /// 最大重定向次数
    pub const MAX_REDIRECTS: usize = 10;
    /// 请求使用的 User-Agent
    pub const USER_AGENT: &str = concat!("jre-bundler/", env!("CARGO_PKG_VERSION"));
}

/// 下载相关常量
pub mod download {
    /// 默认进度回调间隔（字节）
    pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1024 * 1024; // 1MB
    /// 下载过程中使用的临时文件后缀
    pub const PARTIAL_SUFFIX: &str = "downloading";
}

/// 压缩包相关常量
pub mod archive {
    /// 下载文件的扩展名
    pub const ARCHIVE_EXTENSION: &str = ".zip";
}

/// 默认配置值
pub mod defaults {
    /// 默认下载目录
    pub const OUTPUT_DIR: &str = "target/jre";
    /// 当前目录下的配置文件名
    pub const CONFIG_FILE_NAME: &str = "jre-bundler.toml";
    /// 用户目录下的配置目录名
    pub const USER_CONFIG_DIR: &str = ".jre-bundler";
    /// 用户目录下的配置文件名
    pub const USER_CONFIG_FILE: &str = "config.toml";
}
