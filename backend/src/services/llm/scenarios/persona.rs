//! Persona Scenario - instruction text steering the tutor's conversation
//!
//! The instruction is assembled from fixed sections in a fixed order:
//! persona, language separation, proficiency calibration, brevity and the
//! role-specific behavior block. Templates and level markers are plain data
//! so wording changes never add code paths.

use std::fmt;

pub const TUTOR_NAME: &str = "Deng";

const DEFAULT_TARGET_LANGUAGE: &str = "English";
const DEFAULT_SOURCE_LANGUAGE: &str = "Turkish";

const PERSONA_TEMPLATE: &str =
    "Your name is {name}. You are a language partner helping the user learn {target}.";

const LANGUAGE_RULE_TEMPLATE: &str = "Always hold the conversation in {target}. \
Use {source} only to explain grammar or correct a mistake, and only when the user explicitly \
asks for an explanation or is clearly confused. Never mix {source} into ordinary replies.";

const BREVITY_RULE: &str = "Keep every reply short: never more than 2-3 sentences.";

// Checked in order: a level matching both lists is a beginner.
const BEGINNER_MARKERS: &[&str] = &["a1", "a2", "beginner", "basic", "elementary"];
const INTERMEDIATE_MARKERS: &[&str] = &["b1", "b2", "intermediate"];

// ============================================================================
// Role
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonaRole {
    Teacher,
    Friend,
    Interviewer,
    Generic,
}

impl PersonaRole {
    /// Case-insensitive; anything unrecognized becomes `Generic`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "teacher" => Self::Teacher,
            "friend" => Self::Friend,
            "interviewer" => Self::Interviewer,
            _ => Self::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Friend => "friend",
            Self::Interviewer => "interviewer",
            Self::Generic => "generic",
        }
    }

    fn behavior_template(&self) -> &'static str {
        match self {
            Self::Teacher => {
                "Act as a patient teacher. When the user makes a mistake, correct it gently and \
                 show the right form. Use instructional emoji such as 📚 ✏️ ✅ 💡. Open the \
                 conversation by asking whether the user is ready for today's lesson."
            },
            Self::Friend => {
                "Act as a close friend. Ignore minor mistakes and keep the conversation flowing. \
                 Speak casually and use everyday slang in {target}. Greet the user casually, like \
                 an old friend."
            },
            Self::Interviewer => {
                "Act as a professional job interviewer holding an interview in {target}. Keep a \
                 formal, professional register. Ask exactly one question at a time and wait for \
                 the user's answer before asking the next one."
            },
            Self::Generic => "Be a neutral, friendly and helpful conversation partner.",
        }
    }
}

// ============================================================================
// Proficiency
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProficiencyTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyTier {
    /// Lenient substring classification; unknown levels fall through to `Advanced`
    pub fn classify(level: &str) -> Self {
        let level = level.to_lowercase();
        if BEGINNER_MARKERS.iter().any(|m| level.contains(m)) {
            Self::Beginner
        } else if INTERMEDIATE_MARKERS.iter().any(|m| level.contains(m)) {
            Self::Intermediate
        } else {
            Self::Advanced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    fn calibration(&self) -> &'static str {
        match self {
            Self::Beginner => {
                "The user is a beginner. Use only very simple, high-frequency words and short \
                 present-tense sentences, and avoid idioms."
            },
            Self::Intermediate => {
                "The user is at an intermediate level. Use everyday vocabulary and common grammar \
                 structures, and introduce a new expression now and then."
            },
            Self::Advanced => {
                "The user is advanced. Speak naturally with rich vocabulary, idioms and complex \
                 structures, as you would with a native speaker."
            },
        }
    }
}

// ============================================================================
// Context & composition
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptContext {
    pub role: PersonaRole,
    pub target_language: String,
    pub source_language: String,
    pub level: ProficiencyTier,
}

impl PromptContext {
    /// Build from raw request fields, falling back to defaults for blank languages
    pub fn from_request(role: &str, target_language: &str, source_language: &str, level: &str) -> Self {
        Self {
            role: PersonaRole::parse(role),
            target_language: non_blank_or(target_language, DEFAULT_TARGET_LANGUAGE),
            source_language: non_blank_or(source_language, DEFAULT_SOURCE_LANGUAGE),
            level: ProficiencyTier::classify(level),
        }
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() { fallback.to_string() } else { value.to_string() }
}

/// Instruction text handed to the generation model as its first turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedInstruction(String);

impl ComposedInstruction {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ComposedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn compose(ctx: &PromptContext) -> ComposedInstruction {
    let fill = |template: &str| {
        template
            .replace("{name}", TUTOR_NAME)
            .replace("{target}", &ctx.target_language)
            .replace("{source}", &ctx.source_language)
    };

    let sections = [
        fill(PERSONA_TEMPLATE),
        fill(LANGUAGE_RULE_TEMPLATE),
        ctx.level.calibration().to_string(),
        BREVITY_RULE.to_string(),
        fill(ctx.role.behavior_template()),
    ];

    ComposedInstruction(sections.join("\n\n"))
}
