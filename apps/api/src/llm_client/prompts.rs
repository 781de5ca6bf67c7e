// Shared prompt fragments. Feature modules keep their own prompts.rs next to them;
// this file only holds the pieces every JSON-returning call needs.

/// Closing instruction appended to every prompt that expects a JSON object back.
/// Providers without a schema channel rely on this alone.
pub const JSON_ONLY_INSTRUCTION: &str = "IMPORTANT: Respond ONLY with the JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences like ```json. \
    Do NOT include explanations or apologies.";
