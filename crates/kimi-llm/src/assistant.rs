use async_trait::async_trait;

use kimi_core::prompt::Task;

use crate::client::KimiClient;
use crate::error::Result;

/// The four assistant operations as a plain interface, so any frontend
/// (CLI, editor plugin, service) can bind to them without knowing the
/// transport.
///
/// The `*_text` wrappers reproduce the in-band behavior UI surfaces
/// expect: they never fail, degrading errors to a readable string with a
/// task-specific prefix.
#[async_trait]
pub trait CodeAssistant: Send + Sync {
    async fn complete(&self, prompt: &str, context: &str) -> Result<String>;
    async fn analyze(&self, code: &str, language: &str) -> Result<String>;
    async fn generate_tests(&self, code: &str, language: &str, framework: &str) -> Result<String>;
    async fn explain(&self, code: &str, language: &str) -> Result<String>;

    async fn complete_text(&self, prompt: &str, context: &str) -> String {
        degrade(Task::Completion, self.complete(prompt, context).await)
    }

    async fn analyze_text(&self, code: &str, language: &str) -> String {
        degrade(Task::Analysis, self.analyze(code, language).await)
    }

    async fn generate_tests_text(&self, code: &str, language: &str, framework: &str) -> String {
        degrade(
            Task::TestGeneration,
            self.generate_tests(code, language, framework).await,
        )
    }

    async fn explain_text(&self, code: &str, language: &str) -> String {
        degrade(Task::Explanation, self.explain(code, language).await)
    }
}

fn degrade(task: Task, result: Result<String>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => format!("{}{}", task.error_prefix(), e),
    }
}

#[async_trait]
impl CodeAssistant for KimiClient {
    async fn complete(&self, prompt: &str, context: &str) -> Result<String> {
        KimiClient::complete(self, prompt, context).await
    }

    async fn analyze(&self, code: &str, language: &str) -> Result<String> {
        KimiClient::analyze(self, code, language).await
    }

    async fn generate_tests(&self, code: &str, language: &str, framework: &str) -> Result<String> {
        KimiClient::generate_tests(self, code, language, framework).await
    }

    async fn explain(&self, code: &str, language: &str) -> Result<String> {
        KimiClient::explain(self, code, language).await
    }
}
