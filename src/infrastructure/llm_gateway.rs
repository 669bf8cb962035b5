//! LLM 网关 - 基础设施层
//!
//! 持有唯一的外部评判连接，只暴露「文本补全」能力

use std::sync::Arc;
use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use futures::future::BoxFuture;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, JudgeError};

/// 文本补全能力
///
/// 请求是提示词，响应是原始文本。任何一次调用都可能失败或返回无法解析的内容，
/// 调用方必须自备兜底路径。
pub trait CompletionService: Send + Sync {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        system: Option<&'a str>,
    ) -> BoxFuture<'a, AppResult<String>>;

    fn model_name(&self) -> &str;
}

/// LLM 网关
///
/// 职责：
/// - 持有唯一的 API 客户端
/// - 用信号量限制同时进行的调用数
/// - 每次调用受超时约束，超时即返回错误而不是挂起
/// - 不认识题目 / 学生
pub struct LlmGateway {
    client: Client<OpenAIConfig>,
    model_name: String,
    permits: Arc<Semaphore>,
    timeout: Duration,
    enabled: bool,
}

impl LlmGateway {
    /// 创建新的网关
    ///
    /// 未配置 API Key 或关闭了远程评判时网关处于禁用状态，所有调用直接返回
    /// [`JudgeError::Disabled`]。
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let enabled = config.use_remote_judge && !config.llm_api_key.trim().is_empty();
        if config.use_remote_judge && !enabled {
            warn!("未配置 LLM_API_KEY，远程评判已禁用，将只使用本地评分");
        }

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            permits: Arc::new(Semaphore::new(config.max_concurrent_judge_calls.max(1))),
            timeout: config.judge_timeout(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, user_message: &str, system_message: Option<&str>) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.0)
            .max_tokens(1024u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::judge_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| JudgeError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

impl CompletionService for LlmGateway {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        system: Option<&'a str>,
    ) -> BoxFuture<'a, AppResult<String>> {
        Box::pin(async move {
            if !self.enabled {
                return Err(JudgeError::Disabled.into());
            }

            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| AppError::Other(format!("评判调用信号量已关闭: {}", e)))?;

            match tokio::time::timeout(self.timeout, self.send(prompt, system)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        "LLM API 调用超时 ({} 秒)，模型: {}",
                        self.timeout.as_secs(),
                        self.model_name
                    );
                    Err(JudgeError::Timeout {
                        model: self.model_name.clone(),
                        timeout_secs: self.timeout.as_secs(),
                    }
                    .into())
                }
            }
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_gateway_short_circuits() {
        let config = Config {
            llm_api_key: String::new(),
            ..Config::default()
        };
        let gateway = LlmGateway::new(&config);
        assert!(!gateway.is_enabled());

        let err = gateway.complete("2 + 2 = ?", None).await.unwrap_err();
        assert!(matches!(err, AppError::Judge(JudgeError::Disabled)));
    }

    #[test]
    fn test_remote_judge_switch() {
        let config = Config {
            llm_api_key: "key".to_string(),
            use_remote_judge: false,
            ..Config::default()
        };
        assert!(!LlmGateway::new(&config).is_enabled());

        let config = Config {
            llm_api_key: "key".to_string(),
            ..Config::default()
        };
        let gateway = LlmGateway::new(&config);
        assert!(gateway.is_enabled());
        assert_eq!(gateway.model_name(), config.llm_model_name);
    }

    /// 需要真实的 API Key：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_live_completion -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_live_completion() {
        let _ = tracing_subscriber::fmt::try_init();

        let gateway = LlmGateway::new(&Config::from_env());
        let response = gateway
            .complete("Reply with the number 3 and nothing else.", None)
            .await
            .unwrap();
        println!("LLM 响应: {}", response);
        assert!(!response.is_empty());
    }
}
