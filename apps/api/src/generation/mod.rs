// Resume generation pipeline.
// prompt_builder → transport → sanitizer → validator → orchestrator loop
// → skill_filter → emphasis. All model calls go through llm_client.

pub mod emphasis;
pub mod handlers;
pub mod orchestrator;
pub mod prompt_builder;
pub mod prompts;
pub mod sanitizer;
pub mod skill_filter;
pub mod validator;
