//! Request composer: turns (keyword, category, options) into the system + user
//! prompt pair. Pure string assembly; cannot fail.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::persona::prompts::{
    MCN_CLAUSE, NO_BIO_REQUIREMENTS, PERSONA_PROMPT_TEMPLATE, PERSONA_SYSTEM, SHAREHOLDERS_CLAUSE,
    STATS_CLAUSE,
};
use crate::persona::types::{EnhancementFlag, GenerationOptions, PersonaCategory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub system: &'static str,
    pub user: String,
}

/// The bio instruction added when `flag` is enabled.
pub fn bio_clause(flag: EnhancementFlag) -> &'static str {
    match flag {
        EnhancementFlag::Mcn => MCN_CLAUSE,
        EnhancementFlag::Shareholders => SHAREHOLDERS_CLAUSE,
        EnhancementFlag::Stats => STATS_CLAUSE,
    }
}

pub fn compose(
    keyword: &str,
    category: PersonaCategory,
    options: GenerationOptions,
) -> ComposedPrompt {
    let clauses: Vec<&str> = options.enabled_flags().map(bio_clause).collect();
    let bio_requirements = if clauses.is_empty() {
        NO_BIO_REQUIREMENTS.to_string()
    } else {
        clauses.join("\n")
    };

    // Keyword goes in last so placeholder-looking text in it is left alone.
    let user = PERSONA_PROMPT_TEMPLATE
        .replace("{persona_label}", category.prompt_label())
        .replace("{bio_requirements}", &bio_requirements)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{keyword}", keyword);

    ComposedPrompt {
        system: PERSONA_SYSTEM,
        user,
    }
}
