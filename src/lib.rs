// 核心模块
pub mod cli;
pub mod core;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use error::*;
// 使用命名空间导入常量，避免与 infrastructure 的子模块重名
pub use core::constants as app_constants;
pub use core::pipeline::{BundleOutcome, BundlePipeline, PipelineState};
pub use infrastructure::config::{BundleConfig, ConfigFile, NetworkConfig};
pub use infrastructure::remote::{
    AdoptiumClient, Architecture, Downloader, ImageType, JvmImpl, OperatingSystem, Release,
    ReleaseQuery, Vendor,
};
pub use utils::template::{render, VariableMap};
