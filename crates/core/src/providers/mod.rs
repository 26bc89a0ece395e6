pub mod traits;

// Text-generation backends
pub mod gemini;
