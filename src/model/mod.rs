use std::fmt;

use serde::{Deserialize, Serialize};

/// Question kind as reported by the question bank.
///
/// Values outside the known set are kept verbatim so a malformed record still
/// reaches the table instead of failing the whole response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    Multiple,
    Boolean,
    Other(String),
}

impl QuestionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Multiple => "multiple",
            Self::Boolean => "boolean",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Sort rank: multiple before boolean, anything unknown last.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Multiple => 1,
            Self::Boolean => 2,
            Self::Other(_) => u8::MAX,
        }
    }
}

impl From<String> for QuestionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "multiple" => Self::Multiple,
            "boolean" => Self::Boolean,
            _ => Self::Other(value),
        }
    }
}

impl From<QuestionType> for String {
    fn from(value: QuestionType) -> Self {
        match value {
            QuestionType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Default for QuestionType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Other(raw) => raw.as_str(),
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
            Self::Other(_) => u8::MAX,
        }
    }
}

impl From<String> for Difficulty {
    fn from(value: String) -> Self {
        match value.as_str() {
            "easy" => Self::Easy,
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            _ => Self::Other(value),
        }
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        match value {
            Difficulty::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record exactly as delivered by the API, text still entity-encoded.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RawTriviaItem {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub difficulty: Difficulty,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// A display-ready record with every text field decoded.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TriviaItem {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub difficulty: Difficulty,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl TriviaItem {
    pub fn incorrect_answers_joined(&self) -> String {
        self.incorrect_answers.join(", ")
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub response_code: u8,
    pub results: Vec<RawTriviaItem>,
}
