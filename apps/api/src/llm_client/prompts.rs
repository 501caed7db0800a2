// Cross-cutting prompt fragments. Each service that calls the LLM keeps its
// own prompts.rs alongside it.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for answers that are plain newline-separated lists.
pub const PLAIN_LIST_SYSTEM: &str = "You are a precise, structured assistant. \
    Respond with one item per line and nothing else. \
    Do NOT number the lines or add commentary.";
