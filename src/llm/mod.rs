//! Boundary to the generative-content service.

pub mod client;
pub mod factory;
pub mod gemini;

pub use client::{GenerateRequest, LlmClient, MockLlmClient, ScriptedLlmClient};
pub use gemini::GeminiClient;
