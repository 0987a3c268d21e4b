use crate::core::constants::{defaults, download, network};
use crate::error::{BundlerError, BundlerResult};
use crate::infrastructure::remote::platform::{
    Architecture, ImageType, JvmImpl, OperatingSystem, ReleaseQuery, Vendor,
};
use crate::utils::validation::{validate_file_name, validate_path};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件结构，所有字段可选，命令行参数以同样的结构覆盖
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub feature_version: Option<u32>,
    pub jvm_impl: Option<JvmImpl>,
    pub architecture: Option<Architecture>,
    pub image_type: Option<ImageType>,
    pub os: Option<OperatingSystem>,
    pub vendor: Option<Vendor>,
    /// 下载目录，可以包含 `{{变量}}`
    pub output_dir: Option<String>,
    /// 下载文件名，默认使用发布版本名
    pub output_filename: Option<String>,
    /// 解压目录，未设置时不解压
    pub unzip_to: Option<String>,
    /// 是否把压缩包中唯一的一级目录内容移动到解压根目录
    pub move_to_root: Option<bool>,
    #[serde(default)]
    pub network: NetworkSection,
}

/// `[network]` 配置段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSection {
    pub api_base_url: Option<String>,
    pub connect_timeout_sec: Option<u64>,
    pub timeout_sec: Option<u64>,
    pub read_timeout_sec: Option<u64>,
    pub progress_interval_bytes: Option<u64>,
}

/// 网络配置
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkConfig {
    pub api_base_url: String,
    pub connect_timeout_sec: u64,
    /// 发布目录查询的超时时间
    pub timeout_sec: u64,
    /// 下载时两次收到数据之间的最长间隔，下载总时长不受限制
    pub read_timeout_sec: u64,
    pub progress_interval_bytes: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_base_url: network::DEFAULT_API_BASE_URL.to_string(),
            connect_timeout_sec: network::DEFAULT_CONNECT_TIMEOUT_SEC,
            timeout_sec: network::DEFAULT_TIMEOUT_SEC,
            read_timeout_sec: network::DEFAULT_READ_TIMEOUT_SEC,
            progress_interval_bytes: download::DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// 一次打包运行的完整配置，构建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleConfig {
    pub query: ReleaseQuery,
    pub output_dir: String,
    pub output_filename: Option<String>,
    pub unzip_to: Option<String>,
    pub move_to_root: bool,
    pub network: NetworkConfig,
}

impl ConfigFile {
    /// 从文件加载配置
    pub fn load(path: &Path) -> BundlerResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BundlerError::config(format!("无法读取配置文件 {}: {e}", path.display()))
        })?;

        toml::from_str(&content).map_err(|e| {
            BundlerError::config(format!("解析配置文件 {} 失败: {e}", path.display()))
        })
    }

    /// 查找并加载配置文件
    ///
    /// 顺序：显式指定的路径（必须存在）、当前目录的 `jre-bundler.toml`、
    /// `~/.jre-bundler/config.toml`。都不存在时返回空配置。
    pub fn discover(explicit: Option<&Path>) -> BundlerResult<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(BundlerError::config(format!(
                    "配置文件不存在: {}",
                    path.display()
                )));
            }
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        for candidate in default_config_paths() {
            if candidate.is_file() {
                log::debug!("使用配置文件: {}", candidate.display());
                return Ok((Self::load(&candidate)?, Some(candidate)));
            }
        }

        Ok((Self::default(), None))
    }

    /// 用 `overrides` 中设置了的字段覆盖当前配置
    pub fn merge(self, overrides: ConfigFile) -> ConfigFile {
        ConfigFile {
            feature_version: overrides.feature_version.or(self.feature_version),
            jvm_impl: overrides.jvm_impl.or(self.jvm_impl),
            architecture: overrides.architecture.or(self.architecture),
            image_type: overrides.image_type.or(self.image_type),
            os: overrides.os.or(self.os),
            vendor: overrides.vendor.or(self.vendor),
            output_dir: overrides.output_dir.or(self.output_dir),
            output_filename: overrides.output_filename.or(self.output_filename),
            unzip_to: overrides.unzip_to.or(self.unzip_to),
            move_to_root: overrides.move_to_root.or(self.move_to_root),
            network: NetworkSection {
                api_base_url: overrides.network.api_base_url.or(self.network.api_base_url),
                connect_timeout_sec: overrides
                    .network
                    .connect_timeout_sec
                    .or(self.network.connect_timeout_sec),
                timeout_sec: overrides.network.timeout_sec.or(self.network.timeout_sec),
                read_timeout_sec: overrides
                    .network
                    .read_timeout_sec
                    .or(self.network.read_timeout_sec),
                progress_interval_bytes: overrides
                    .network
                    .progress_interval_bytes
                    .or(self.network.progress_interval_bytes),
            },
        }
    }
}

impl TryFrom<ConfigFile> for BundleConfig {
    type Error = BundlerError;

    /// 填充默认值，空字符串视为未设置
    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let feature_version = file.feature_version.ok_or_else(|| {
            BundlerError::validation("feature_version", "必须指定 Java 主版本号 (例如 17、21)")
        })?;
        if feature_version == 0 {
            return Err(BundlerError::validation("feature_version", "主版本号必须大于 0"));
        }

        let fallback = NetworkConfig::default();
        let network = NetworkConfig {
            api_base_url: non_empty(file.network.api_base_url).unwrap_or(fallback.api_base_url),
            connect_timeout_sec: file
                .network
                .connect_timeout_sec
                .unwrap_or(fallback.connect_timeout_sec),
            timeout_sec: file.network.timeout_sec.unwrap_or(fallback.timeout_sec),
            read_timeout_sec: file
                .network
                .read_timeout_sec
                .unwrap_or(fallback.read_timeout_sec),
            progress_interval_bytes: file
                .network
                .progress_interval_bytes
                .unwrap_or(fallback.progress_interval_bytes),
        };

        Ok(BundleConfig {
            query: ReleaseQuery {
                feature_version,
                jvm_impl: file.jvm_impl.unwrap_or(JvmImpl::Hotspot),
                architecture: file.architecture.unwrap_or(Architecture::X64),
                image_type: file.image_type.unwrap_or(ImageType::Jre),
                os: file.os.unwrap_or(OperatingSystem::Windows),
                vendor: file.vendor.unwrap_or(Vendor::Eclipse),
            },
            output_dir: non_empty(file.output_dir)
                .unwrap_or_else(|| defaults::OUTPUT_DIR.to_string()),
            output_filename: non_empty(file.output_filename),
            unzip_to: non_empty(file.unzip_to),
            move_to_root: file.move_to_root.unwrap_or(true),
            network,
        })
    }
}

impl BundleConfig {
    /// 校验路径参数，在任何网络或磁盘操作之前调用
    pub fn validate(&self) -> BundlerResult<()> {
        if let Some(unzip_to) = &self.unzip_to {
            validate_path("unzip_to", unzip_to)?;
        }
        validate_path("output_dir", &self.output_dir)?;
        if let Some(file_name) = &self.output_filename {
            validate_file_name("output_filename", file_name)?;
        }
        Ok(())
    }

    /// 逐行描述配置，用于运行开始时的日志
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        vec![
            ("Version", self.query.feature_version.to_string()),
            ("JVM Implementation", self.query.jvm_impl.to_string()),
            ("Architecture", self.query.architecture.to_string()),
            ("OS", self.query.os.to_string()),
            ("Image Type", self.query.image_type.to_string()),
            ("Vendor", self.query.vendor.to_string()),
            ("Output directory", self.output_dir.clone()),
            ("Output filename", optional(&self.output_filename)),
            ("Unzip to", optional(&self.unzip_to)),
            ("Move to root", self.move_to_root.to_string()),
        ]
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 默认配置文件查找路径
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(defaults::CONFIG_FILE_NAME)];
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(
            home_dir
                .join(defaults::USER_CONFIG_DIR)
                .join(defaults::USER_CONFIG_FILE),
        );
    }
    paths
}
