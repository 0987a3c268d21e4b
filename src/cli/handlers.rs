use crate::cli::commands::Commands;
use crate::cli::output::{OutputFormat, FORMATTER};
use crate::core::pipeline::{BundlePipeline, PipelineState};
use crate::error::{BundlerError, ExecutionError};
use crate::infrastructure::config::{BundleConfig, ConfigFile};
use crate::infrastructure::installer::{create_progress_bar, update_progress_bar};
use indicatif::ProgressBar;

/// 命令处理器
pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        Self
    }

    /// 处理命令，失败时返回面向用户的错误消息
    pub async fn handle_command(&self, command: Commands) -> Result<(), String> {
        let format = OutputFormat::from(command.json());
        let result = match &command {
            Commands::Bundle { .. } => self.handle_bundle(&command, format).await,
            Commands::Resolve { vars, .. } => self.handle_resolve(&command, *vars, format).await,
        };

        result.map_err(|e| {
            log::debug!("错误类型: {}", e.error.kind());
            FORMATTER.format_error(&e.user_message(), format)
        })
    }

    async fn handle_bundle(
        &self,
        command: &Commands,
        format: OutputFormat,
    ) -> Result<(), ExecutionError> {
        let pipeline = build_pipeline(command)?;

        let pb = match format {
            OutputFormat::Text => create_progress_bar(0),
            OutputFormat::Json => ProgressBar::hidden(),
        };
        let result = pipeline
            .run(|received, total| update_progress_bar(&pb, received, total))
            .await;
        pb.finish_and_clear();

        let outcome = result?;
        let output = FORMATTER
            .format_outcome(&outcome, format)
            .map_err(|e| ExecutionError::new(PipelineState::Done, BundlerError::config(e)))?;
        print!("{output}");
        Ok(())
    }

    async fn handle_resolve(
        &self,
        command: &Commands,
        with_vars: bool,
        format: OutputFormat,
    ) -> Result<(), ExecutionError> {
        let pipeline = build_pipeline(command)?;
        pipeline
            .config()
            .validate()
            .map_err(|e| ExecutionError::new(PipelineState::Idle, e))?;

        if format == OutputFormat::Text {
            println!("🔍 查询 {}", pipeline.config().query);
        }
        let release = pipeline
            .resolve()
            .await
            .map_err(|e| ExecutionError::new(PipelineState::ParamsValidated, e))?;

        let output = FORMATTER
            .format_release(&release, with_vars, format)
            .map_err(|e| ExecutionError::new(PipelineState::Resolved, BundlerError::config(e)))?;
        print!("{output}");
        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// 合并配置文件和命令行参数
pub fn load_config(command: &Commands) -> Result<BundleConfig, BundlerError> {
    let (file, path) = ConfigFile::discover(command.query().config.as_deref())?;
    if let Some(path) = path {
        log::info!("已加载配置文件: {}", path.display());
    }
    BundleConfig::try_from(file.merge(command.to_overrides()))
}

fn build_pipeline(command: &Commands) -> Result<BundlePipeline, ExecutionError> {
    load_config(command)
        .and_then(BundlePipeline::new)
        .map_err(|e| ExecutionError::new(PipelineState::Idle, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::Cli;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_cli_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bundle.toml");
        fs::write(&path, "feature_version = 17\nos = \"linux\"\nunzip_to = \"runtime\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "jre-bundler",
            "bundle",
            "--config",
            path.to_str().unwrap(),
            "-v",
            "21",
        ])
        .unwrap();

        let config = load_config(&cli.command).unwrap();
        assert_eq!(config.query.feature_version, 21);
        assert_eq!(config.query.os.as_str(), "linux");
        assert_eq!(config.unzip_to.as_deref(), Some("runtime"));
        assert!(config.move_to_root);
    }

    #[tokio::test]
    async fn test_missing_config_file_is_reported() {
        let cli = Cli::try_parse_from([
            "jre-bundler",
            "resolve",
            "--config",
            "/nonexistent/jre-bundler.toml",
            "-v",
            "21",
        ])
        .unwrap();

        let err = CommandHandler::new()
            .handle_command(cli.command)
            .await
            .unwrap_err();
        assert!(err.contains("配置文件不存在"));
    }
}
