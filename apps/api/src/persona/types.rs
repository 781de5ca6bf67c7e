//! Persona data model: the request options and the profile the model must return.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The archetype that drives tone and vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaCategory {
    /// Corporate elite, "霸总".
    #[serde(alias = "CEO", alias = "ceo")]
    Executive,
    /// Independence and wealth, "名媛".
    #[serde(alias = "SOCIALITE")]
    Socialite,
}

impl PersonaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaCategory::Executive => "executive",
            PersonaCategory::Socialite => "socialite",
        }
    }

    /// How the category is named inside the user prompt. Matches the template
    /// headings in the style guide.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            PersonaCategory::Executive => "CEO (霸总)",
            PersonaCategory::Socialite => "Socialite (名媛)",
        }
    }
}

/// An optional bio requirement. `ALL` is the order clauses appear in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnhancementFlag {
    Mcn,
    Shareholders,
    Stats,
}

impl EnhancementFlag {
    pub const ALL: [EnhancementFlag; 3] = [
        EnhancementFlag::Mcn,
        EnhancementFlag::Shareholders,
        EnhancementFlag::Stats,
    ];
}

/// Independent toggles chosen by the caller. Any subset may be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(rename = "includeMCN", default)]
    pub include_mcn: bool,
    #[serde(rename = "includeShareholders", default)]
    pub include_shareholders: bool,
    #[serde(rename = "includeStats", default)]
    pub include_stats: bool,
}

impl GenerationOptions {
    pub fn is_enabled(&self, flag: EnhancementFlag) -> bool {
        match flag {
            EnhancementFlag::Mcn => self.include_mcn,
            EnhancementFlag::Shareholders => self.include_shareholders,
            EnhancementFlag::Stats => self.include_stats,
        }
    }

    /// Enabled flags in prompt order.
    pub fn enabled_flags(self) -> impl Iterator<Item = EnhancementFlag> {
        EnhancementFlag::ALL
            .into_iter()
            .filter(move |flag| self.is_enabled(*flag))
    }
}

/// One fabricated post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub content: String,
    /// Short English description, meant for image generation.
    pub image_description: String,
    pub hashtags: Vec<String>,
    /// Display text such as "1.2w", not a count.
    pub likes: String,
}

/// The generated profile. Every field is required: a reply missing any of them
/// fails deserialization as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaProfile {
    pub id_name: String,
    pub title: String,
    pub tags: Vec<String>,
    pub bio: String,
    pub location: String,
    pub posts: Vec<Post>,
}

pub const EXPECTED_TAGS: std::ops::RangeInclusive<usize> = 3..=4;
pub const EXPECTED_POSTS: usize = 3;

impl PersonaProfile {
    /// Response schema in the OpenAPI-subset form taken by schema-constrained providers.
    pub fn response_schema() -> Value {
        let string = json!({"type": "STRING"});
        let string_array = json!({"type": "ARRAY", "items": {"type": "STRING"}});

        json!({
            "type": "OBJECT",
            "properties": {
                "idName": string,
                "title": string,
                "tags": string_array,
                "bio": string,
                "location": string,
                "posts": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "content": string,
                            "imageDescription": string,
                            "hashtags": string_array,
                            "likes": string
                        },
                        "required": ["content", "imageDescription", "hashtags", "likes"]
                    }
                }
            },
            "required": ["idName", "title", "tags", "bio", "location", "posts"]
        })
    }
}
