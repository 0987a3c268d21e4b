use crate::core::pipeline::BundleOutcome;
use crate::infrastructure::remote::models::Release;
use crate::utils::format::bytes_to_human;
use crate::utils::template::VariableMap;
use serde::Serialize;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<bool> for OutputFormat {
    fn from(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// 输出格式化器
pub struct OutputFormatter;

impl OutputFormatter {
    /// 格式化打包结果
    pub fn format_outcome(
        &self,
        outcome: &BundleOutcome,
        format: OutputFormat,
    ) -> Result<String, String> {
        match format {
            OutputFormat::Text => {
                let mut output = format!("✅ 已获取 {}\n", outcome.release_name);
                output.push_str(&format!(
                    "  压缩包: {} ({})\n",
                    outcome.archive_path.display(),
                    bytes_to_human(outcome.archive_size)
                ));
                match &outcome.extracted_to {
                    Some(dir) => {
                        output.push_str(&format!("  解压到: {}\n", dir.display()));
                        if let Some(flattened) = &outcome.flattened {
                            output.push_str(&format!("  已提升目录: {flattened}\n"));
                        }
                    }
                    None => output.push_str("  未解压\n"),
                }
                Ok(output)
            }
            OutputFormat::Json => to_json(outcome),
        }
    }

    /// 格式化发布版本，`with_vars` 时附带所有模板变量
    pub fn format_release(
        &self,
        release: &Release,
        with_vars: bool,
        format: OutputFormat,
    ) -> Result<String, String> {
        let vars = with_vars.then(|| VariableMap::from_release(release));
        match format {
            OutputFormat::Text => {
                let mut output = format!(
                    "📦 {}\n",
                    release.release_name.as_deref().unwrap_or("(unnamed)")
                );
                if let Some(package) = release.package() {
                    output.push_str(&format!(
                        "  下载地址: {}\n  大小: {}\n",
                        package.link,
                        bytes_to_human(package.size)
                    ));
                }
                if let Some(vars) = &vars {
                    output.push_str("  模板变量:\n");
                    for (key, value) in vars.iter() {
                        output.push_str(&format!("    {{{{{key}}}}} = {value}\n"));
                    }
                }
                Ok(output)
            }
            OutputFormat::Json => {
                let json_output = match &vars {
                    Some(vars) => serde_json::json!({
                        "release": release,
                        "variables": vars.iter().collect::<std::collections::BTreeMap<_, _>>(),
                    }),
                    None => serde_json::json!({ "release": release }),
                };
                to_json(&json_output)
            }
        }
    }

    /// 格式化错误信息
    pub fn format_error(&self, error: &str, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => format!("{error}\n"),
            OutputFormat::Json => {
                let json_output = serde_json::json!({
                    "error": error,
                    "success": false
                });
                to_json(&json_output).unwrap_or_else(|_| error.to_string())
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON 序列化失败: {e}"))
}

/// 默认输出格式化器实例
pub static FORMATTER: OutputFormatter = OutputFormatter;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::PipelineState;
    use crate::infrastructure::remote::models::fixtures::RELEASE_JSON;
    use std::path::PathBuf;

    fn outcome() -> BundleOutcome {
        BundleOutcome {
            release_name: "jdk-21.0.4+7".to_string(),
            archive_path: PathBuf::from("target/jre/jdk-21.0.4+7.zip"),
            archive_size: 1536,
            extracted_to: Some(PathBuf::from("target/runtime")),
            flattened: Some("jdk-21.0.4+7-jre".to_string()),
            states: vec![PipelineState::Idle, PipelineState::Done],
        }
    }

    #[test]
    fn test_format_outcome_text() {
        let output = FORMATTER.format_outcome(&outcome(), OutputFormat::Text).unwrap();
        assert!(output.contains("jdk-21.0.4+7"));
        assert!(output.contains("1.5 KiB"));
        assert!(output.contains("target/runtime"));
    }

    #[test]
    fn test_format_outcome_json() {
        let output = FORMATTER.format_outcome(&outcome(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["archive_size"], 1536);
        assert_eq!(value["states"], serde_json::json!(["idle", "done"]));
    }

    #[test]
    fn test_format_release_with_vars() {
        let release: Release = serde_json::from_str(RELEASE_JSON).unwrap();

        let text = FORMATTER.format_release(&release, true, OutputFormat::Text).unwrap();
        assert!(text.contains("{{binary.package.size}} = 47775043"));

        let json = FORMATTER.format_release(&release, true, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["variables"]["version.major"], "21");
        assert_eq!(value["release"]["release_name"], "jdk-21.0.4+7");
    }

    #[test]
    fn test_format_release_without_vars() {
        let release: Release = serde_json::from_str(RELEASE_JSON).unwrap();
        let json = FORMATTER.format_release(&release, false, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("variables").is_none());
    }
}
