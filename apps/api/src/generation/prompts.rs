// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume generation and repair. Enforces JSON-only output.
pub const GENERATION_SYSTEM: &str = "You are an expert resume writer tailoring a candidate's \
    resume to a specific job description. \
    You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent facts not present in the candidate material.";

/// Resume generation prompt template.
/// Replace: {grounding_instruction}, {years}, {role_count}, {roles_json},
///          {jd_text}, {corpus_text}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Tailor the candidate's resume to the job description below.

NON-NEGOTIABLE RULES:
1. SUMMARY must start with exactly "{years} years of experience" and contain 4-5 sentences.
2. EXPERIENCE must contain exactly {role_count} entries, one per base role, in the SAME ORDER as BASE ROLES.
   Copy "company", "title", and "dates" from each base role EXACTLY. Never rename, merge, split, or reorder roles.
3. Each experience entry must have 5-6 bullets.
4. NO personal data anywhere: no email addresses, phone numbers, or URLs in the summary or bullets.
5. Wrap the single most relevant skill term in each bullet in **double asterisks** (at most one per bullet).
6. SKILLS must be 3-6 lines, each formatted "Category: item, item, item" with 5-8 comma-separated items.
7. In any frontend category, list at most 2 of React, Angular, and Vue, preferring the ones the job description names.
8. Only list skills that are relevant to the job description AND supported by the candidate material.

BASE ROLES (source of truth for experience identity):
{roles_json}

Return a JSON object with EXACTLY these keys:
{
  "summary": "{years} years of experience ...",
  "skills": ["Category: item, item, item, item, item"],
  "experience": [
    {"company": "...", "title": "...", "dates": "...", "bullets": ["...", "..."]}
  ]
}

JOB DESCRIPTION:
{jd_text}

CANDIDATE MATERIAL:
{corpus_text}"#;

/// Repair prompt template.
/// Replace: {original_prompt}, {issues}, {previous_output}
pub const REPAIR_PROMPT_TEMPLATE: &str = r#"{original_prompt}

Your previous response violated the rules above. Fix EVERY issue listed:
{issues}

PREVIOUS RESPONSE:
{previous_output}

Return ONLY the corrected JSON object. Keep everything that was already correct."#;
