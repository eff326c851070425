//! Domain types shared by prompts, the service and the stores.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClueError;

pub const MAX_ANSWER_LENGTH: usize = 25;
pub const MAX_DEFINITION_LENGTH: usize = 80;
pub const MAX_THEME_LENGTH: usize = 50;

/// A generated clue and its parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub clue: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClueDevice {
    Any,
    Anagram,
    Charade,
    Container,
    Reversal,
    Homophone,
    DoubleDefinition,
    Deletion,
    Palindrome,
    HiddenWord,
    Literal,
    Composite,
    Spoonerism,
    CrypticDefinition,
    Initialism,
    Alternation,
    OddEvenLetters,
    SoundChange,
    Rebus,
    Backsolver,
    Anthropophagism,
    LetterBank,
    LetterPair,
}

impl ClueDevice {
    pub const ALL: [ClueDevice; 23] = [
        ClueDevice::Any,
        ClueDevice::Anagram,
        ClueDevice::Charade,
        ClueDevice::Container,
        ClueDevice::Reversal,
        ClueDevice::Homophone,
        ClueDevice::DoubleDefinition,
        ClueDevice::Deletion,
        ClueDevice::Palindrome,
        ClueDevice::HiddenWord,
        ClueDevice::Literal,
        ClueDevice::Composite,
        ClueDevice::Spoonerism,
        ClueDevice::CrypticDefinition,
        ClueDevice::Initialism,
        ClueDevice::Alternation,
        ClueDevice::OddEvenLetters,
        ClueDevice::SoundChange,
        ClueDevice::Rebus,
        ClueDevice::Backsolver,
        ClueDevice::Anthropophagism,
        ClueDevice::LetterBank,
        ClueDevice::LetterPair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClueDevice::Any => "ANY",
            ClueDevice::Anagram => "ANAGRAM",
            ClueDevice::Charade => "CHARADE",
            ClueDevice::Container => "CONTAINER",
            ClueDevice::Reversal => "REVERSAL",
            ClueDevice::Homophone => "HOMOPHONE",
            ClueDevice::DoubleDefinition => "DOUBLE_DEFINITION",
            ClueDevice::Deletion => "DELETION",
            ClueDevice::Palindrome => "PALINDROME",
            ClueDevice::HiddenWord => "HIDDEN_WORD",
            ClueDevice::Literal => "LITERAL",
            ClueDevice::Composite => "COMPOSITE",
            ClueDevice::Spoonerism => "SPOONERISM",
            ClueDevice::CrypticDefinition => "CRYPTIC_DEFINITION",
            ClueDevice::Initialism => "INITIALISM",
            ClueDevice::Alternation => "ALTERNATION",
            ClueDevice::OddEvenLetters => "ODD_EVEN_LETTERS",
            ClueDevice::SoundChange => "SOUND_CHANGE",
            ClueDevice::Rebus => "REBUS",
            ClueDevice::Backsolver => "BACKSOLVER",
            ClueDevice::Anthropophagism => "ANTHROPOPHAGISM",
            ClueDevice::LetterBank => "LETTER_BANK",
            ClueDevice::LetterPair => "LETTER_PAIR",
        }
    }

    /// Human label, e.g. "Double Definition".
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let lower = word.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ClueDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for ClueDevice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        ClueDevice::ALL
            .iter()
            .find(|device| device.as_str() == normalized)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Unknown clue device: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" | "toughie" => Ok(Difficulty::Hard),
            _ => anyhow::bail!("Unknown difficulty: {}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Persona {
    #[default]
    GuardianMasterSetter,
    WittyPunster,
    ConciseXimenean,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::GuardianMasterSetter => "Guardian Master Setter",
            Persona::WittyPunster => "Witty Punster",
            Persona::ConciseXimenean => "Concise Ximenean",
        }
    }
}

impl FromStr for Persona {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "guardian" | "guardianmastersetter" => Ok(Persona::GuardianMasterSetter),
            "punster" | "wittypunster" => Ok(Persona::WittyPunster),
            "ximenean" | "conciseximenean" => Ok(Persona::ConciseXimenean),
            _ => anyhow::bail!("Unknown persona: {}", s),
        }
    }
}

/// Everything needed to ask for clues for one answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClueRequest {
    pub answer: String,
    pub definition: String,
    pub wordplay: Option<String>,
    pub device: Option<ClueDevice>,
    pub difficulty: Difficulty,
    pub persona: Persona,
    pub setter: Option<String>,
    pub theme: Option<String>,
}

impl ClueRequest {
    pub fn new(answer: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            definition: definition.into(),
            ..Self::default()
        }
    }

    pub fn device(&self) -> ClueDevice {
        self.device.unwrap_or(ClueDevice::Any)
    }

    /// Theme text, ignoring blanks and the "None" sentinel.
    pub fn theme(&self) -> Option<&str> {
        self.theme
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("none"))
    }

    pub fn validate(&self) -> Result<(), ClueError> {
        if self.answer.trim().is_empty() || self.definition.trim().is_empty() {
            return Err(ClueError::InvalidInput(
                "Please provide both an answer and a definition.".to_string(),
            ));
        }
        if self.answer.chars().count() > MAX_ANSWER_LENGTH {
            return Err(ClueError::InvalidInput(format!(
                "Answer cannot exceed {} characters.",
                MAX_ANSWER_LENGTH
            )));
        }
        if self.definition.chars().count() > MAX_DEFINITION_LENGTH {
            return Err(ClueError::InvalidInput(format!(
                "Definition cannot exceed {} characters.",
                MAX_DEFINITION_LENGTH
            )));
        }
        if let Some(theme) = self.theme() {
            if theme.chars().count() > MAX_THEME_LENGTH {
                return Err(ClueError::InvalidInput(format!(
                    "Theme cannot exceed {} characters.",
                    MAX_THEME_LENGTH
                )));
            }
        }
        Ok(())
    }
}
