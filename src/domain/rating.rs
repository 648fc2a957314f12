use serde::{Deserialize, Serialize};

/// One of the five self-assessment buttons shown under a question.
///
/// The scale has no 0 or 1: the lowest button means "forgot" and subtracts
/// a point, the others add their face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rating {
  Forgot = -1,
  Two = 2,
  Three = 3,
  Four = 4,
  Five = 5,
}

impl Rating {
  pub const ALL: [Rating; 5] = [Self::Forgot, Self::Two, Self::Three, Self::Four, Self::Five];

  pub fn from_score(score: i32) -> Option<Self> {
    match score {
      -1 => Some(Self::Forgot),
      2 => Some(Self::Two),
      3 => Some(Self::Three),
      4 => Some(Self::Four),
      5 => Some(Self::Five),
      _ => None,
    }
  }

  pub fn score(self) -> i32 {
    self as i32
  }

  /// Button label used by chat front-ends
  pub fn emoji(self) -> &'static str {
    match self {
      Self::Forgot => "💀",
      Self::Two => "2️⃣",
      Self::Three => "3️⃣",
      Self::Four => "4️⃣",
      Self::Five => "👑",
    }
  }
}

impl TryFrom<i32> for Rating {
  type Error = String;

  fn try_from(value: i32) -> Result<Self, Self::Error> {
    Self::from_score(value).ok_or_else(|| format!("invalid rating score: {}", value))
  }
}

impl From<Rating> for i32 {
  fn from(rating: Rating) -> Self {
    rating.score()
  }
}
