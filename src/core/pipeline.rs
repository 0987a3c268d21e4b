use crate::core::constants::archive::ARCHIVE_EXTENSION;
use crate::error::{BundlerError, BundlerResult, ExecutionError};
use crate::infrastructure::config::BundleConfig;
use crate::infrastructure::installer::archive;
use crate::infrastructure::remote::{
    AdoptiumClient, DownloadOptions, Downloader, HttpClient, Release,
};
use crate::utils::template::render;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 打包流水线的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    ParamsValidated,
    Resolved,
    PathsRendered,
    Downloaded,
    Extracted,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::ParamsValidated => "params_validated",
            PipelineState::Resolved => "resolved",
            PipelineState::PathsRendered => "paths_rendered",
            PipelineState::Downloaded => "downloaded",
            PipelineState::Extracted => "extracted",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// 一次成功运行的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleOutcome {
    pub release_name: String,
    /// 下载的压缩包路径，解压后该文件已被删除
    pub archive_path: PathBuf,
    pub archive_size: u64,
    pub extracted_to: Option<PathBuf>,
    /// 被提升到解压根目录的一级目录
    pub flattened: Option<String>,
    /// 依次经过的阶段
    pub states: Vec<PipelineState>,
}

/// 记录流水线到达过的阶段
#[derive(Debug)]
struct StateTracker {
    states: Vec<PipelineState>,
}

impl StateTracker {
    fn new() -> Self {
        Self {
            states: vec![PipelineState::Idle],
        }
    }

    fn advance(&mut self, state: PipelineState) {
        log::debug!("流水线阶段: {state}");
        self.states.push(state);
    }

    fn current(&self) -> PipelineState {
        self.states.last().copied().unwrap_or(PipelineState::Idle)
    }

    /// 进入 `Failed` 并把错误包装为带最后到达阶段的执行错误
    fn fail(&mut self, error: BundlerError) -> ExecutionError {
        let reached = self.current();
        log::debug!("流水线在 {reached} 阶段之后失败: {error}");
        self.states.push(PipelineState::Failed);
        ExecutionError::new(reached, error).with_states(self.states.clone())
    }
}

/// JRE 打包流水线：解析、下载、可选的解压
pub struct BundlePipeline {
    config: BundleConfig,
    catalog: AdoptiumClient,
    downloader: Downloader,
}

impl BundlePipeline {
    /// 根据配置创建流水线
    ///
    /// 查询使用有总超时的客户端，下载只限制连接和读取的空闲时间。
    pub fn new(config: BundleConfig) -> BundlerResult<Self> {
        let catalog = AdoptiumClient::new(
            HttpClient::new(&config.network)?,
            &config.network.api_base_url,
        )?;
        let downloader = Downloader::new(
            HttpClient::for_downloads(&config.network)?,
            DownloadOptions {
                progress_interval: config.network.progress_interval_bytes,
                read_timeout: Duration::from_secs(config.network.read_timeout_sec),
            },
        );
        Ok(Self {
            config,
            catalog,
            downloader,
        })
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// 只解析发布版本，不下载
    pub async fn resolve(&self) -> BundlerResult<Release> {
        self.catalog.resolve(&self.config.query).await
    }

    /// 执行完整流程
    ///
    /// `progress` 的参数为 (已接收字节, 预期总字节)。任何一步失败都会终止运行，
    /// 已写入的文件不会回滚。
    pub async fn run(
        &self,
        progress: impl Fn(u64, u64),
    ) -> Result<BundleOutcome, ExecutionError> {
        let mut tracker = StateTracker::new();

        log::info!("JRE 打包配置:");
        for (key, value) in self.config.describe() {
            log::info!("  {key}: {value}");
        }

        self.config.validate().map_err(|e| tracker.fail(e))?;
        tracker.advance(PipelineState::ParamsValidated);

        let release = self.resolve().await.map_err(|e| tracker.fail(e))?;
        tracker.advance(PipelineState::Resolved);

        let package = release.package().ok_or_else(|| {
            tracker.fail(BundlerError::Upstream {
                url: self.catalog.latest_assets_url(&self.config.query).to_string(),
                status: None,
                message: "发布版本缺少下载包信息".to_string(),
            })
        })?;
        let release_name = release.release_name.clone().unwrap_or_default();

        let archive_path = self
            .archive_path(&release, &release_name)
            .map_err(|e| tracker.fail(e))?;
        tracker.advance(PipelineState::PathsRendered);

        log::info!("下载 {} -> {}", package.link, archive_path.display());
        let archive_size = self
            .downloader
            .download(&package.link, &archive_path, package.size, progress)
            .await
            .map_err(|e| tracker.fail(e))?;
        tracker.advance(PipelineState::Downloaded);

        let mut extracted_to = None;
        let mut flattened = None;
        if let Some(unzip_to) = &self.config.unzip_to {
            // 解压目录只能使用与发布版本无关的变量
            let target = PathBuf::from(render(unzip_to, &Release::default()));
            let outcome = archive::extract(&archive_path, &target, self.config.move_to_root)
                .map_err(|e| tracker.fail(e))?;
            remove_archive(&archive_path).map_err(|e| tracker.fail(e))?;
            tracker.advance(PipelineState::Extracted);

            extracted_to = Some(outcome.target_dir);
            flattened = outcome.flattened;
        }

        tracker.advance(PipelineState::Done);
        log::info!("JRE 打包完成: {release_name}");

        Ok(BundleOutcome {
            release_name,
            archive_path,
            archive_size,
            extracted_to,
            flattened,
            states: tracker.states,
        })
    }

    /// 计算下载文件路径：`<output_dir>/<output_filename>.zip`，两者都按发布版本渲染
    fn archive_path(&self, release: &Release, release_name: &str) -> BundlerResult<PathBuf> {
        let file_name = match &self.config.output_filename {
            Some(name) => name.clone(),
            None if !release_name.is_empty() => release_name.to_string(),
            None => {
                return Err(BundlerError::validation(
                    "output_filename",
                    "发布版本没有名称，必须显式指定输出文件名",
                ))
            }
        };
        let file_name = if file_name.ends_with(ARCHIVE_EXTENSION) {
            file_name
        } else {
            format!("{file_name}{ARCHIVE_EXTENSION}")
        };

        let output_dir = render(&self.config.output_dir, release);
        let file_name = render(&file_name, release);
        Ok(Path::new(&output_dir).join(file_name))
    }
}

fn remove_archive(path: &Path) -> BundlerResult<()> {
    fs::remove_file(path).map_err(|e| BundlerError::io(path, e))?;
    log::info!("已删除压缩包 {}", path.display());
    Ok(())
}
