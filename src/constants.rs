//! # Domain Constants
//!
//! Roles, question classifications and paper parts shared by the data layer,
//! the web API and the paper generator. Every enum here is persisted as text
//! and round-trips through `as_str` / `FromStr`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QbankError;

/// Content type of generated `.docx` papers
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Heading printed at the top of every generated paper unless configured otherwise
pub const DEFAULT_INSTITUTION_HEADING: &str = "DEPARTMENT OF INFORMATION SCIENCE AND ENGINEERING";

/// Department name reported for courses and faculty without a department
pub const UNASSIGNED_DEPARTMENT: &str = "Not Assigned";

/// Question defaults applied when a question is created without explicit values
pub mod question_defaults {
    pub const CO: &str = "CO1";
    pub const BT: &str = "BT1";
    pub const MARKS: i32 = 2;
    pub const UNIT_NUMBER: i32 = 1;
}

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Faculty,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Faculty => "faculty",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = QbankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "faculty" => Ok(Role::Faculty),
            other => Err(QbankError::ValidationError(format!("Unknown role: {other}"))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = QbankError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Question type as stored in `questions.type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QuestionType {
    Quiz,
    #[default]
    Test,
    #[serde(rename = "MCQ")]
    Mcq,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Quiz => "Quiz",
            QuestionType::Test => "Test",
            QuestionType::Mcq => "MCQ",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = QbankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Quiz" => Ok(QuestionType::Quiz),
            "Test" => Ok(QuestionType::Test),
            "MCQ" => Ok(QuestionType::Mcq),
            other => Err(QbankError::ValidationError(format!(
                "Invalid question type '{other}' (expected Quiz, Test or MCQ)"
            ))),
        }
    }
}

impl TryFrom<String> for QuestionType {
    type Error = QbankError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Question difficulty as stored in `questions.difficulty_level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DifficultyLevel {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Medium => "Medium",
            DifficultyLevel::Hard => "Hard",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = QbankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(DifficultyLevel::Easy),
            "Medium" => Ok(DifficultyLevel::Medium),
            "Hard" => Ok(DifficultyLevel::Hard),
            other => Err(QbankError::ValidationError(format!(
                "Invalid difficulty level '{other}' (expected Easy, Medium or Hard)"
            ))),
        }
    }
}

impl TryFrom<String> for DifficultyLevel {
    type Error = QbankError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Section of a paper a selected question belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperPart {
    A,
    B,
    #[serde(rename = "none")]
    Unassigned,
}

impl PaperPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperPart::A => "A",
            PaperPart::B => "B",
            PaperPart::Unassigned => "none",
        }
    }

    /// Heading printed above the part's question table
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            PaperPart::A => Some("Part- A"),
            PaperPart::B => Some("Part- B"),
            PaperPart::Unassigned => None,
        }
    }
}

impl FromStr for PaperPart {
    type Err = QbankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(PaperPart::A),
            "B" => Ok(PaperPart::B),
            "none" => Ok(PaperPart::Unassigned),
            other => Err(QbankError::ValidationError(format!("Unknown paper part: {other}"))),
        }
    }
}

impl TryFrom<String> for PaperPart {
    type Error = QbankError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
