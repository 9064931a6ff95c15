// Shared prompt constants and prompt-building utilities.
// Each module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt used for every call routed through `ChatModel::invoke`.
/// Task-specific format rules live in the user prompt, not here.
pub const DEFAULT_SYSTEM: &str = "You are a precise assistant helping a job seeker \
    with recruiter outreach. Follow the output format in each request exactly. \
    Do NOT add explanations, apologies, or commentary outside the requested format.";

/// Fragment appended to prompts whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY the JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Fragment that keeps generated outreach grounded in the candidate's background.
pub const GROUNDING_INSTRUCTION: &str = "Use ONLY facts present in the candidate \
    background below. Do NOT invent employers, schools, metrics, or skills.";
