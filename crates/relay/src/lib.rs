pub mod error;
pub mod gemini;
pub mod images;
pub mod prompt;

pub use error::{GenerationError, InputValidationError};
pub use gemini::{extract_text, GeminiClient, GeminiConfig, StoryGenerator};
pub use images::{validate_request, ImageLimits, ImagePart, REQUIRED_IMAGES};
pub use prompt::build_story_prompt;
