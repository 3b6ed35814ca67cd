//! Named prompt templates.
//!
//! The persona and per-task prompt text live here as data so they can be
//! tuned without touching the client. Every task prompt is routed through
//! the completion wrapper, so the wire system message is always
//! [`CODER_PERSONA`].

/// System persona attached to every request
pub const CODER_PERSONA: &str = "You are Kimi K2, a world-class programming assistant. \
    Generate clean, efficient, and well-documented code. \
    Focus on best practices and modern coding standards.";

/// Returned in place of content when the API answers with zero choices
pub const NO_RESPONSE_SENTINEL: &str = "No response generated";

/// The four assistant tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Completion,
    Analysis,
    TestGeneration,
    Explanation,
}

impl Task {
    /// Prefix used when a failure is degraded to in-band text
    pub fn error_prefix(&self) -> &'static str {
        match self {
            Task::Completion => "Error: ",
            Task::Analysis => "Error analyzing code: ",
            Task::TestGeneration => "Error generating tests: ",
            Task::Explanation => "Error explaining code: ",
        }
    }
}

/// User message for a completion request
pub fn completion(prompt: &str, context: &str) -> String {
    format!("Context: {context}\n\nRequest: {prompt}")
}

/// User prompt asking for a four-section code review
pub fn analysis(code: &str, language: &str) -> String {
    format!(
        "Language: {language}\n\nCode to analyze:\n```{language}\n{code}\n```\n\n\
         Please provide:\n1. Bug analysis\n2. Performance suggestions\n\
         3. Code quality improvements\n4. Security considerations"
    )
}

/// User prompt asking for unit tests
pub fn test_generation(code: &str, language: &str, framework: &str) -> String {
    format!(
        "Language: {language}\nFramework: {framework}\n\n\
         Generate unit tests for this code:\n```{language}\n{code}\n```\n\n\
         Include:\n1. Happy path tests\n2. Edge cases\n3. Error conditions\n4. Mocking if needed"
    )
}

/// User prompt asking for an explanation
pub fn explanation(code: &str, language: &str) -> String {
    format!(
        "Language: {language}\n\nExplain this code:\n```{language}\n{code}\n```\n\n\
         Provide:\n1. High-level overview\n2. Step-by-step breakdown\n\
         3. Key concepts used\n4. Potential use cases"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_wrapper() {
        let text = completion("Write a function", "");
        assert!(text.contains("Context: "));
        assert!(text.contains("Request: Write a function"));
    }

    #[test]
    fn test_analysis_sections() {
        let text = analysis("def f(): pass", "python");
        assert!(text.starts_with("Language: python"));
        assert!(text.contains("```python\ndef f(): pass\n```"));
        assert!(text.contains("1. Bug analysis"));
        assert!(text.contains("4. Security considerations"));
    }

    #[test]
    fn test_test_generation_sections() {
        let text = test_generation("fn add() {}", "rust", "cargo test");
        assert!(text.contains("Framework: cargo test"));
        assert!(text.contains("2. Edge cases"));
        assert!(text.contains("4. Mocking if needed"));
    }

    #[test]
    fn test_explanation_sections() {
        let text = explanation("SELECT 1", "sql");
        assert!(text.contains("Explain this code:"));
        assert!(text.contains("1. High-level overview"));
        assert!(text.contains("4. Potential use cases"));
    }

    #[test]
    fn test_error_prefixes() {
        assert_eq!(Task::Completion.error_prefix(), "Error: ");
        assert_eq!(Task::Analysis.error_prefix(), "Error analyzing code: ");
        assert_eq!(Task::TestGeneration.error_prefix(), "Error generating tests: ");
        assert_eq!(Task::Explanation.error_prefix(), "Error explaining code: ");
    }
}
