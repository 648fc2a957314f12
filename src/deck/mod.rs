pub mod engine;
pub mod error;

pub use engine::{
  AnswerView, Card, CardView, Deck, DeckView, MASTERY_THRESHOLD, RatingOutcome, RevealView,
};
pub use error::DeckError;
