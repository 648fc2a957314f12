//! Mastery-driven review queue.
//!
//! A deck holds the cards that are not mastered yet. Every rating adds to the
//! rated card's score; cards at or above [`MASTERY_THRESHOLD`] leave the deck
//! for good, all others are re-queued at a depth equal to their score, so
//! well-known cards come back later and forgotten ones come back sooner.

use rand::Rng;
use serde::Serialize;

use super::error::DeckError;
use crate::domain::{ColorToken, QaPair, Rating};

/// Score at which a card counts as mastered and is retired
pub const MASTERY_THRESHOLD: i32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
  question: String,
  answer: String,
  position: usize,
  mastery: i32,
  color: ColorToken,
}

impl Card {
  pub fn question(&self) -> &str {
    &self.question
  }

  pub fn answer(&self) -> &str {
    &self.answer
  }

  /// 1-based index in the batch the deck was built from
  pub fn position(&self) -> usize {
    self.position
  }

  pub fn mastery(&self) -> i32 {
    self.mastery
  }

  pub fn color(&self) -> ColorToken {
    self.color
  }
}

/// What the front-end should show for the card under the cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
  pub remaining_count: usize,
  pub card_number: usize,
  pub question_text: String,
  pub color: ColorToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeckView {
  Card(CardView),
  Completed,
}

impl DeckView {
  pub fn is_completed(&self) -> bool {
    matches!(self, Self::Completed)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerView {
  pub card_number: usize,
  pub answer_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RevealView {
  Answer(AnswerView),
  Completed,
}

/// Result of applying one rating, for the caller's logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingOutcome {
  pub card_number: usize,
  pub mastery: i32,
  pub retired: bool,
  pub completed: bool,
}

/// Ordered queue of unmastered cards plus the cursor into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
  cards: Vec<Card>,
  cursor: usize,
}

impl Deck {
  /// Build a deck with colours drawn from the thread RNG
  pub fn new(pairs: Vec<QaPair>) -> Result<Self, DeckError> {
    Self::with_rng(pairs, &mut rand::rng())
  }

  pub fn with_rng<R: Rng>(pairs: Vec<QaPair>, rng: &mut R) -> Result<Self, DeckError> {
    if pairs.is_empty() {
      return Err(DeckError::EmptyDeck);
    }

    let cards = pairs
      .into_iter()
      .enumerate()
      .map(|(i, pair)| Card {
        question: pair.question,
        answer: pair.answer,
        position: i + 1,
        mastery: 0,
        color: ColorToken::random(rng),
      })
      .collect();

    Ok(Self { cards, cursor: 0 })
  }

  pub fn is_complete(&self) -> bool {
    self.cards.is_empty()
  }

  /// Number of cards still to master
  pub fn remaining(&self) -> usize {
    self.cards.len()
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  /// Active cards in queue order
  pub fn cards(&self) -> &[Card] {
    &self.cards
  }

  /// Validate a raw button score, then apply it
  pub fn submit_score(&mut self, score: i32) -> Result<RatingOutcome, DeckError> {
    let rating = Rating::from_score(score).ok_or(DeckError::InvalidRating(score))?;
    self.submit_rating(rating)
  }

  /// Apply a rating to the card under the cursor.
  ///
  /// The cursor keeps its numeric value, so the next view shows whichever
  /// card now occupies that slot. It only moves when a retirement leaves it
  /// past the end, in which case it wraps to the front.
  pub fn submit_rating(&mut self, rating: Rating) -> Result<RatingOutcome, DeckError> {
    if self.is_complete() {
      return Err(DeckError::Stale);
    }

    let len_before = self.cards.len();
    let mut card = self.cards.remove(self.cursor);
    card.mastery += rating.score();
    let card_number = card.position;

    if card.mastery >= MASTERY_THRESHOLD {
      if self.cursor >= self.cards.len() {
        self.cursor = 0;
      }
      return Ok(RatingOutcome {
        card_number,
        mastery: card.mastery,
        retired: true,
        completed: self.cards.is_empty(),
      });
    }

    card.mastery = card.mastery.max(0);
    let insert_at = (card.mastery as usize).min(len_before - 1);
    let mastery = card.mastery;
    self.cards.insert(insert_at, card);

    Ok(RatingOutcome {
      card_number,
      mastery,
      retired: false,
      completed: false,
    })
  }

  pub fn current_view(&self) -> DeckView {
    match self.cards.get(self.cursor) {
      Some(card) => DeckView::Card(CardView {
        remaining_count: self.cards.len(),
        card_number: card.position,
        question_text: card.question.clone(),
        color: card.color,
      }),
      None => DeckView::Completed,
    }
  }

  pub fn reveal_answer(&self) -> RevealView {
    match self.cards.get(self.cursor) {
      Some(card) => RevealView::Answer(AnswerView {
        card_number: card.position,
        answer_text: card.answer.clone(),
      }),
      None => RevealView::Completed,
    }
  }
}
