use crate::infrastructure::config::{ConfigFile, NetworkSection};
use crate::infrastructure::remote::platform::{
    Architecture, ImageType, JvmImpl, OperatingSystem, Vendor,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// jre-bundler CLI 应用程序
#[derive(Parser, Debug)]
#[command(name = "jre-bundler")]
#[command(about = "从 Adoptium 下载 Java 运行时并打包到构建目录", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 顶级命令
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 下载并（可选）解压 Java 运行时
    Bundle {
        #[command(flatten)]
        query: QueryArgs,
        /// 下载目录，支持 {{变量}}
        #[arg(short, long)]
        output_dir: Option<String>,
        /// 下载文件名，默认使用发布版本名
        #[arg(short = 'f', long)]
        output_filename: Option<String>,
        /// 解压目录，未指定时只下载
        #[arg(short, long)]
        unzip_to: Option<String>,
        /// 保留压缩包中的一级目录
        #[arg(long)]
        no_move_to_root: bool,
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 解析并显示最新的发布版本
    Resolve {
        #[command(flatten)]
        query: QueryArgs,
        /// 列出所有可在路径模板中使用的变量
        #[arg(long)]
        vars: bool,
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
}

/// 发布版本查询参数，未指定的字段使用配置文件或默认值
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Java 主版本号 (例如 17、21)
    #[arg(short = 'v', long = "feature-version")]
    pub feature_version: Option<u32>,
    /// JVM 实现
    #[arg(long, value_enum)]
    pub jvm_impl: Option<JvmImpl>,
    /// CPU 架构
    #[arg(short, long, value_enum)]
    pub architecture: Option<Architecture>,
    /// 镜像类型
    #[arg(short, long, value_enum)]
    pub image_type: Option<ImageType>,
    /// 操作系统
    #[arg(long, value_enum)]
    pub os: Option<OperatingSystem>,
    /// 发行商
    #[arg(long, value_enum)]
    pub vendor: Option<Vendor>,
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Adoptium API 地址
    #[arg(long)]
    pub api_base_url: Option<String>,
}

impl QueryArgs {
    /// 转换为覆盖配置文件的配置
    pub fn to_overrides(&self) -> ConfigFile {
        ConfigFile {
            feature_version: self.feature_version,
            jvm_impl: self.jvm_impl,
            architecture: self.architecture,
            image_type: self.image_type,
            os: self.os,
            vendor: self.vendor,
            network: NetworkSection {
                api_base_url: self.api_base_url.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

impl Commands {
    pub fn query(&self) -> &QueryArgs {
        match self {
            Commands::Bundle { query, .. } | Commands::Resolve { query, .. } => query,
        }
    }

    /// 命令行参数对应的配置覆盖项
    pub fn to_overrides(&self) -> ConfigFile {
        let mut overrides = self.query().to_overrides();
        if let Commands::Bundle {
            output_dir,
            output_filename,
            unzip_to,
            no_move_to_root,
            ..
        } = self
        {
            overrides.output_dir = output_dir.clone();
            overrides.output_filename = output_filename.clone();
            overrides.unzip_to = unzip_to.clone();
            // 未指定时交给配置文件决定
            overrides.move_to_root = no_move_to_root.then_some(false);
        }
        overrides
    }

    pub fn json(&self) -> bool {
        match self {
            Commands::Bundle { json, .. } | Commands::Resolve { json, .. } => *json,
        }
    }
}
