//! 基础设施层
//!
//! 只有这一层持有外部评判连接（客户端、并发上限、超时）。

pub mod llm_gateway;

pub use llm_gateway::{CompletionService, LlmGateway};

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use futures::future::BoxFuture;

    use super::CompletionService;
    use crate::error::{AppError, AppResult, JudgeError};

    /// 按顺序返回预设响应的补全服务，预设用完后返回错误
    pub struct ScriptedCompletion {
        responses: Mutex<VecDeque<AppResult<String>>>,
        calls: AtomicUsize,
    }

    impl ScriptedCompletion {
        pub fn new(responses: impl IntoIterator<Item = AppResult<String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn replying(texts: &[&str]) -> Self {
            Self::new(texts.iter().map(|t| Ok(t.to_string())))
        }

        pub fn failing() -> Self {
            Self::new(Vec::new())
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CompletionService for ScriptedCompletion {
        fn complete<'a>(
            &'a self,
            _prompt: &'a str,
            _system: Option<&'a str>,
        ) -> BoxFuture<'a, AppResult<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self
                .responses
                .lock()
                .map_err(|e| AppError::Other(e.to_string()))
                .and_then(|mut queue| {
                    queue.pop_front().unwrap_or_else(|| {
                        Err(JudgeError::Timeout {
                            model: "scripted".to_string(),
                            timeout_secs: 0,
                        }
                        .into())
                    })
                });
            Box::pin(async move { next })
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }
}
