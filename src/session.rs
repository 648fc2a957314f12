//! In-memory registry of play sessions.
//!
//! Holds one [`Deck`] per (guild, user). Entries expire after a configurable
//! period without any interaction; a new play for the same key replaces the
//! previous deck.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::config;
use crate::deck::{Deck, DeckError, DeckView, RatingOutcome, RevealView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
  pub guild_id: i64,
  pub user_id: i64,
}

impl SessionKey {
  pub fn new(guild_id: i64, user_id: i64) -> Self {
    Self { guild_id, user_id }
  }
}

impl fmt::Display for SessionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.guild_id, self.user_id)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
  NotFound,
  Deck(DeckError),
}

impl fmt::Display for SessionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotFound => write!(f, "no active flashcard session"),
      Self::Deck(e) => write!(f, "{}", e),
    }
  }
}

impl std::error::Error for SessionError {}

impl From<DeckError> for SessionError {
  fn from(e: DeckError) -> Self {
    Self::Deck(e)
  }
}

/// Session entry with last access time for expiration
struct SessionEntry {
  deck: Deck,
  last_access: DateTime<Utc>,
}

pub struct SessionRegistry {
  sessions: Mutex<HashMap<SessionKey, SessionEntry>>,
  expiry: Duration,
}

impl SessionRegistry {
  pub fn new(expiry: Duration) -> Self {
    Self {
      sessions: Mutex::new(HashMap::new()),
      expiry,
    }
  }

  /// Install a fresh deck for the key, replacing any previous one
  pub fn start(&self, key: SessionKey, deck: Deck) -> DeckView {
    let view = deck.current_view();
    let mut sessions = self.lock();
    let replaced = sessions
      .insert(
        key,
        SessionEntry {
          deck,
          last_access: Utc::now(),
        },
      )
      .is_some();

    if replaced {
      tracing::debug!("Replaced existing session for {}", key);
    }
    view
  }

  pub fn view(&self, key: SessionKey) -> Result<DeckView, SessionError> {
    self.with_deck(key, |deck| Ok(deck.current_view()))
  }

  /// The current view together with its answer
  pub fn reveal(&self, key: SessionKey) -> Result<(DeckView, RevealView), SessionError> {
    self.with_deck(key, |deck| Ok((deck.current_view(), deck.reveal_answer())))
  }

  /// Apply a raw button score and return the outcome with the next view
  pub fn rate(&self, key: SessionKey, score: i32) -> Result<(RatingOutcome, DeckView), SessionError> {
    self.with_deck(key, |deck| {
      let outcome = deck.submit_score(score)?;
      Ok((outcome, deck.current_view()))
    })
  }

  pub fn remove(&self, key: SessionKey) -> bool {
    self.lock().remove(&key).is_some()
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Drop sessions idle since before `now - expiry`, returning how many
  pub fn cleanup_expired(&self, now: DateTime<Utc>) -> usize {
    let cutoff = self.cutoff(now);
    let mut sessions = self.lock();
    Self::purge(&mut sessions, cutoff)
  }

  /// Oldest access time still considered live
  fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
    now
      .checked_sub_signed(self.expiry)
      .unwrap_or(DateTime::<Utc>::MIN_UTC)
  }

  fn with_deck<T>(
    &self,
    key: SessionKey,
    f: impl FnOnce(&mut Deck) -> Result<T, SessionError>,
  ) -> Result<T, SessionError> {
    let now = Utc::now();
    let cutoff = self.cutoff(now);
    let mut sessions = self.lock();

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      Self::purge(&mut sessions, cutoff);
    }

    let expired = match sessions.get(&key) {
      Some(entry) => entry.last_access < cutoff,
      None => return Err(SessionError::NotFound),
    };
    if expired {
      sessions.remove(&key);
      return Err(SessionError::NotFound);
    }

    let entry = sessions.get_mut(&key).ok_or(SessionError::NotFound)?;
    entry.last_access = now;
    f(&mut entry.deck)
  }

  fn purge(sessions: &mut HashMap<SessionKey, SessionEntry>, cutoff: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| entry.last_access >= cutoff);
    let purged = before - sessions.len();
    if purged > 0 {
      tracing::debug!("Purged {} expired session(s)", purged);
    }
    purged
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<SessionKey, SessionEntry>> {
    // Entries are plain data, so a poisoned map is still consistent
    self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl Default for SessionRegistry {
  fn default() -> Self {
    Self::new(Duration::minutes(config::DEFAULT_SESSION_EXPIRY_MINUTES))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::QaPair;

  fn deck(n: usize) -> Deck {
    let pairs = (1..=n)
      .map(|i| QaPair::new(format!("Q{}", i), format!("A{}", i)))
      .collect();
    Deck::new(pairs).unwrap()
  }

  fn card_number(view: &DeckView) -> usize {
    match view {
      DeckView::Card(card) => card.card_number,
      DeckView::Completed => panic!("unexpected completion"),
    }
  }

  #[test]
  fn test_start_returns_first_card() {
    let registry = SessionRegistry::default();
    let view = registry.start(SessionKey::new(1, 1), deck(3));
    assert_eq!(card_number(&view), 1);
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn test_unknown_session_not_found() {
    let registry = SessionRegistry::default();
    let key = SessionKey::new(1, 1);
    assert_eq!(registry.view(key), Err(SessionError::NotFound));
    assert_eq!(registry.reveal(key), Err(SessionError::NotFound));
    assert_eq!(registry.rate(key, 3), Err(SessionError::NotFound));
  }

  #[test]
  fn test_sessions_are_isolated_per_user_and_guild() {
    let registry = SessionRegistry::default();
    let alice = SessionKey::new(1, 100);
    let bob = SessionKey::new(1, 200);
    let alice_elsewhere = SessionKey::new(2, 100);
    registry.start(alice, deck(2));
    registry.start(bob, deck(2));
    registry.start(alice_elsewhere, deck(2));

    let (_, view) = registry.rate(alice, 5).unwrap();
    assert_eq!(card_number(&view), 2);
    assert_eq!(card_number(&registry.view(bob).unwrap()), 1);
    assert_eq!(card_number(&registry.view(alice_elsewhere).unwrap()), 1);
  }

  #[test]
  fn test_start_replaces_previous_deck() {
    let registry = SessionRegistry::default();
    let key = SessionKey::new(1, 1);
    registry.start(key, deck(2));
    registry.rate(key, 5).unwrap();

    registry.start(key, deck(4));
    match registry.view(key).unwrap() {
      DeckView::Card(card) => {
        assert_eq!(card.remaining_count, 4);
        assert_eq!(card.card_number, 1);
      }
      DeckView::Completed => panic!("fresh deck reported complete"),
    }
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn test_invalid_score_passes_through() {
    let registry = SessionRegistry::default();
    let key = SessionKey::new(1, 1);
    registry.start(key, deck(1));
    assert_eq!(
      registry.rate(key, 1),
      Err(SessionError::Deck(DeckError::InvalidRating(1)))
    );
  }

  #[test]
  fn test_completed_session_stays_viewable_but_stale() {
    let registry = SessionRegistry::default();
    let key = SessionKey::new(1, 1);
    registry.start(key, deck(1));
    registry.rate(key, 4).unwrap();
    let (outcome, view) = registry.rate(key, 4).unwrap();
    assert!(outcome.completed);
    assert!(view.is_completed());

    assert_eq!(registry.view(key), Ok(DeckView::Completed));
    assert_eq!(
      registry.reveal(key),
      Ok((DeckView::Completed, RevealView::Completed))
    );
    assert_eq!(
      registry.rate(key, 2),
      Err(SessionError::Deck(DeckError::Stale))
    );
  }

  #[test]
  fn test_cleanup_expired() {
    let registry = SessionRegistry::new(Duration::minutes(30));
    registry.start(SessionKey::new(1, 1), deck(1));
    registry.start(SessionKey::new(1, 2), deck(1));

    assert_eq!(registry.cleanup_expired(Utc::now()), 0);
    assert_eq!(registry.cleanup_expired(Utc::now() + Duration::minutes(31)), 2);
    assert!(registry.is_empty());
  }

  #[test]
  fn test_expired_session_dropped_on_access() {
    let registry = SessionRegistry::new(Duration::seconds(-1));
    let key = SessionKey::new(1, 1);
    registry.start(key, deck(1));
    assert_eq!(registry.view(key), Err(SessionError::NotFound));
    assert!(!registry.remove(key));
  }

  #[test]
  fn test_remove() {
    let registry = SessionRegistry::default();
    let key = SessionKey::new(1, 1);
    registry.start(key, deck(1));
    assert!(registry.remove(key));
    assert!(registry.is_empty());
  }

  #[test]
  fn test_huge_expiry_does_not_overflow() {
    let registry = SessionRegistry::new(Duration::days(1_000_000_000));
    let key = SessionKey::new(1, 1);
    registry.start(key, deck(1));
    assert!(registry.view(key).is_ok());
    assert_eq!(registry.cleanup_expired(Utc::now()), 0);
  }
}
