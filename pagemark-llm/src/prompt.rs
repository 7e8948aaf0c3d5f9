//! Prompt construction for reader-style models.
//!
//! The cleaned HTML is embedded verbatim in a ```html fence under a short
//! instruction line. Chat templating and tokenization are the provider
//! client's concern, not ours.

/// Instruction used when the caller supplies none.
pub const DEFAULT_MARKDOWN_INSTRUCTION: &str =
    "Extract the main content from the given HTML and convert it to Markdown format.";

/// Instruction used whenever a JSON schema is supplied; it replaces any
/// caller-chosen instruction.
pub const SCHEMA_INSTRUCTION: &str =
    "Extract the specified information from a list of news threads and present it in a structured JSON format.";

/// Format the single instruction-plus-content string handed to the model.
///
/// A supplied `schema` switches to schema-directed extraction: the schema
/// instruction takes over and the schema itself is appended in a ```json
/// fence.
pub fn build_prompt(html: &str, instruction: Option<&str>, schema: Option<&str>) -> String {
    if let Some(schema) = schema {
        format!(
            "{SCHEMA_INSTRUCTION}\n```html\n{html}\n```\nThe JSON schema is as follows:```json\n{schema}\n```"
        )
    } else {
        let instruction = instruction.unwrap_or(DEFAULT_MARKDOWN_INSTRUCTION);
        format!("{instruction}\n```html\n{html}\n```")
    }
}
