mod openai;

pub use openai::OpenAiRecognizer;

use axum::async_trait;
use bytes::Bytes;

use crate::error::MealError;

/// Instruction sent with every image. The model answers with free text,
/// one food name per line.
pub const FOOD_PROMPT: &str =
    "What food items are in this image? Please list them separately, one per line.";

/// External vision boundary: image bytes in, the model's raw text out.
/// No retries here; a transport or auth failure surfaces as
/// `RecognitionFailed` and the caller decides what to do with it.
#[async_trait]
pub trait FoodRecognizer: Send + Sync {
    async fn describe_foods(&self, image: Bytes, content_type: &str)
        -> Result<String, MealError>;
}

/// Split recognizer output into candidate food names: one per line,
/// trimmed, empty lines dropped, order preserved, duplicates kept.
pub fn parse_food_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
