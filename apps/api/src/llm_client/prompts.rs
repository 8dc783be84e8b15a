// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file only holds cross-cutting pieces.

/// Instruction shared by the generation and repair prompts: no invented facts.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every claim you generate must be traceable to the candidate profile or the \
    candidate corpus provided below. Do NOT invent employers, titles, dates, metrics, \
    certifications, or tools the candidate has not used.";
