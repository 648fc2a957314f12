use std::fmt;

/// Errors raised by deck construction and rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckError {
  /// A deck needs at least one question/answer pair
  EmptyDeck,
  /// Score outside the five rating buttons
  InvalidRating(i32),
  /// Mutation attempted after every card was mastered
  Stale,
}

impl fmt::Display for DeckError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::EmptyDeck => write!(f, "cannot build a deck from zero flashcards"),
      Self::InvalidRating(score) => {
        write!(f, "rating {} is not one of -1, 2, 3, 4, 5", score)
      }
      Self::Stale => write!(f, "deck is already complete"),
    }
  }
}

impl std::error::Error for DeckError {}
