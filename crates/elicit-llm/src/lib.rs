//! Elicit LLM crate - requirement inference backends.
//!
//! - `InferenceService` is the trait the pipeline programs against.
//! - `OpenAiInference` calls an OpenAI-compatible chat-completions endpoint.
//!   This is the production backend for API mode.
//! - `MockInference` returns a canned requirements list for testing and for
//!   runs without network access.

pub mod openai;

use elicit_core::error::Result;

pub use openai::OpenAiInference;

/// Service for inferring requirement suggestions from an assembled prompt.
///
/// Implementations take the full prompt text and return the model's answer
/// verbatim; prompt construction and answer interpretation live upstream.
pub trait InferenceService: Send + Sync {
    /// Send the prompt and return the model's response text.
    fn infer(&self, prompt: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Object-safe version of [`InferenceService`] for dynamic dispatch.
///
/// Because `InferenceService::infer` returns `impl Future` it is not
/// object-safe. This trait uses a boxed future instead, allowing
/// `Box<dyn DynInferenceService>` to be stored in structs without generics.
///
/// A blanket implementation is provided so that every `InferenceService`
/// automatically implements `DynInferenceService`.
pub trait DynInferenceService: Send + Sync {
    /// Send the prompt and return the model's response text (boxed future).
    fn infer_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String>> + Send + 'a>>;
}

/// Blanket impl: any `InferenceService` automatically implements `DynInferenceService`.
impl<T: InferenceService> DynInferenceService for T {
    fn infer_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(self.infer(prompt))
    }
}

// ---------------------------------------------------------------------------
// MockInference - canned responses for testing
// ---------------------------------------------------------------------------

/// Canned response returned by [`MockInference::new`].
const MOCK_RESPONSE: &str = "\
1. Requirement: Add a clear visual cue or tooltip to the widget.
   - Target UI Element: Widget 'X' on Page 'Y'
   - Rationale: The user clicked repeatedly, suggesting they expected a response or the button state was unclear.

2. Requirement: Optimize the response time or add a loading spinner.
   - Target UI Element: System Feedback Mechanism
   - Rationale: The user's repetitive clicking indicates frustration with lack of immediate feedback.
";

/// Mock inference service returning a fixed requirements list.
///
/// Identical prompts always produce identical output, so pipeline tests can
/// assert on exact artifact contents.
#[derive(Debug, Clone)]
pub struct MockInference {
    response: String,
    fail: bool,
}

impl MockInference {
    /// Create a mock that answers every prompt with the canned list.
    pub fn new() -> Self {
        Self {
            response: MOCK_RESPONSE.to_string(),
            fail: false,
        }
    }

    /// Create a mock that answers with the given text.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            fail: false,
        }
    }

    /// Create a mock whose every call fails.
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            fail: true,
        }
    }
}

impl Default for MockInference {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceService for MockInference {
    async fn infer(&self, _prompt: &str) -> Result<String> {
        if self.fail {
            return Err(elicit_core::error::ElicitError::Inference(
                "mock inference failure".to_string(),
            ));
        }
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_inference_is_deterministic() {
        let service = MockInference::new();
        let a = service.infer("prompt").await.unwrap();
        let b = service.infer("prompt").await.unwrap();
        assert_eq!(a, b);
        assert!(a.contains("1. Requirement:"));
    }

    #[tokio::test]
    async fn test_mock_inference_custom_response() {
        let service = MockInference::with_response("custom");
        assert_eq!(service.infer("anything").await.unwrap(), "custom");
    }

    #[tokio::test]
    async fn test_failing_mock_inference() {
        let service = MockInference::failing();
        assert!(service.infer("prompt").await.is_err());
    }

    #[tokio::test]
    async fn test_dyn_dispatch_through_box() {
        let boxed: Box<dyn DynInferenceService> = Box::new(MockInference::with_response("boxed"));
        assert_eq!(boxed.infer_boxed("prompt").await.unwrap(), "boxed");
    }
}
