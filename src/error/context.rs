use crate::core::pipeline::PipelineState;
use crate::error::BundlerError;
use thiserror::Error;

/// 流水线执行失败：携带失败前到达的阶段和原始错误
#[derive(Error, Debug)]
pub struct ExecutionError {
    /// 失败前最后到达的阶段
    pub state: PipelineState,
    #[source]
    pub error: BundlerError,
    /// 经过的阶段，以 `Failed` 结尾
    pub states: Vec<PipelineState>,
}

impl std::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JRE 打包失败 (阶段: {}): {}", self.state, self.error)
    }
}

impl ExecutionError {
    pub fn new(state: PipelineState, error: BundlerError) -> Self {
        Self {
            state,
            error,
            states: vec![state, PipelineState::Failed],
        }
    }

    /// 替换完整的阶段记录
    pub fn with_states(mut self, states: Vec<PipelineState>) -> Self {
        self.states = states;
        self
    }

    /// 获取用户友好的错误消息
    pub fn user_message(&self) -> String {
        let mut msg = format!("❌ JRE 打包在 {} 阶段之后失败\n", self.state);
        msg.push_str(&format!("原因: {}\n", self.error));

        let suggestions = suggestions_for(&self.error);
        if !suggestions.is_empty() {
            msg.push_str("💡 建议:\n");
            for suggestion in suggestions {
                msg.push_str(&format!("  • {}\n", suggestion));
            }
        }

        msg
    }
}

fn suggestions_for(error: &BundlerError) -> Vec<&'static str> {
    match error {
        BundlerError::Validation { .. } | BundlerError::Config { .. } => {
            vec!["检查配置文件和命令行参数"]
        }
        BundlerError::NotFound { .. } => vec![
            "确认该主版本在 Adoptium 上存在对应的操作系统和架构",
            "尝试更换 image_type (jdk/jre)",
        ],
        BundlerError::Upstream { .. } | BundlerError::Network { .. } => {
            vec!["检查网络连接", "确认 api_base_url 配置正确"]
        }
        BundlerError::Transfer { .. } => vec!["下载地址可能已失效，稍后重新运行"],
        BundlerError::Conflict { .. } => vec!["使用 --no-move-to-root 保留压缩包原始目录结构"],
        BundlerError::Archive { .. } | BundlerError::Io { .. } => {
            vec!["检查磁盘空间和目录权限"]
        }
    }
}

impl From<ExecutionError> for String {
    fn from(error: ExecutionError) -> Self {
        error.user_message()
    }
}
