use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A generated question with its answer, as stored and as fed to a deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
  pub question: String,
  pub answer: String,
}

impl QaPair {
  pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
    Self {
      question: question.into(),
      answer: answer.into(),
    }
  }
}

/// 24-bit RGB colour attached to a card for visual variety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorToken(u32);

impl ColorToken {
  pub const GREEN: ColorToken = ColorToken(0x2ECC71);
  pub const BLUE: ColorToken = ColorToken(0x3498DB);
  pub const GOLD: ColorToken = ColorToken(0xF1C40F);

  pub fn new(rgb: u32) -> Self {
    Self(rgb & 0xFF_FFFF)
  }

  pub fn random<R: Rng>(rng: &mut R) -> Self {
    Self::new(rng.random::<u32>())
  }

  pub fn rgb(self) -> u32 {
    self.0
  }
}

impl fmt::Display for ColorToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{:06x}", self.0)
  }
}

/// Which flashcards a play session draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashcardSource {
  All,
  Pdf(i64),
}

impl FlashcardSource {
  /// Parse the play argument: "all" (any case) or a PDF index
  pub fn parse(s: &str) -> Option<Self> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("all") {
      return Some(Self::All);
    }
    s.parse::<i64>().ok().map(Self::Pdf)
  }
}

/// A PDF registered for a guild
#[derive(Debug, Clone, Serialize)]
pub struct PdfRecord {
  pub id: i64,
  pub guild_id: i64,
  pub path: String,
  pub title: String,
  pub uploaded_at: DateTime<Utc>,
}
