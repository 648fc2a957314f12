//! Embed payloads for chat front-ends.
//!
//! An [`Embed`] is a titled, coloured card with named fields. Front-ends post
//! them as-is; the deck itself never produces user-facing text.

use serde::Serialize;

use crate::config::{PDF_INDEX_WIDTH, PDF_TITLE_WIDTH};
use crate::deck::{AnswerView, CardView, DeckView, RevealView};
use crate::domain::{ColorToken, PdfRecord, Rating};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
  pub name: String,
  pub value: String,
  pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
  pub title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub color: ColorToken,
  pub fields: Vec<EmbedField>,
}

impl Embed {
  fn new(title: impl Into<String>, color: ColorToken) -> Self {
    Self {
      title: title.into(),
      description: None,
      color,
      fields: Vec::new(),
    }
  }

  fn description(mut self, text: impl Into<String>) -> Self {
    self.description = Some(text.into());
    self
  }

  fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.fields.push(EmbedField {
      name: name.into(),
      value: value.into(),
      inline: false,
    });
    self
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStyle {
  Danger,
  Secondary,
  Success,
}

/// A button under the play message. `score` is what the rate endpoint
/// expects; the reveal button has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
  pub score: Option<Rating>,
  pub label: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub emoji: Option<&'static str>,
  pub style: ControlStyle,
  pub enabled: bool,
}

/// Message body for a play session: the embeds plus the rating and reveal
/// buttons, which stop being clickable once the deck is complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayMessage {
  pub embeds: Vec<Embed>,
  pub controls_enabled: bool,
  pub controls: Vec<Control>,
  pub view: DeckView,
}

/// Five rating buttons followed by "Show Answer"
pub fn play_controls(enabled: bool) -> Vec<Control> {
  let ratings = Rating::ALL.iter().map(|&rating| Control {
    score: Some(rating),
    label: "",
    emoji: Some(rating.emoji()),
    style: match rating {
      Rating::Forgot => ControlStyle::Danger,
      Rating::Five => ControlStyle::Success,
      _ => ControlStyle::Secondary,
    },
    enabled,
  });

  ratings
    .chain(std::iter::once(Control {
      score: None,
      label: "Show Answer",
      emoji: None,
      style: ControlStyle::Secondary,
      enabled,
    }))
    .collect()
}

pub fn question_embed(card: &CardView) -> Embed {
  Embed::new(format!("{} questions remaining..", card.remaining_count), card.color)
    .field(format!("Question #: {}", card.card_number), card.question_text.clone())
}

pub fn answer_embed(answer: &AnswerView) -> Embed {
  Embed::new(format!("Answer Question: {}", answer.card_number), ColorToken::GREEN)
    .field("Answer", answer.answer_text.clone())
}

pub fn completion_embed() -> Embed {
  Embed::new("Congratulations! 🎉", ColorToken::GOLD)
    .description("You've completed all the flashcards!")
    .field(
      "Great job!",
      "You've mastered all the questions. Keep up the good work!",
    )
}

/// The message shown after play, a rating, or a refresh
pub fn play_message(view: DeckView) -> PlayMessage {
  let embeds = match &view {
    DeckView::Card(card) => vec![question_embed(card)],
    DeckView::Completed => return completed_message(),
  };
  PlayMessage {
    embeds,
    controls_enabled: true,
    controls: play_controls(true),
    view,
  }
}

/// The question with its answer underneath
pub fn reveal_message(view: DeckView, reveal: &RevealView) -> PlayMessage {
  let embeds = match (&view, reveal) {
    (DeckView::Card(card), RevealView::Answer(answer)) => {
      vec![question_embed(card), answer_embed(answer)]
    }
    _ => return completed_message(),
  };
  PlayMessage {
    embeds,
    controls_enabled: true,
    controls: play_controls(true),
    view,
  }
}

fn completed_message() -> PlayMessage {
  PlayMessage {
    embeds: vec![completion_embed()],
    controls_enabled: false,
    controls: play_controls(false),
    view: DeckView::Completed,
  }
}

/// Fixed-width table of a guild's PDFs
pub fn pdf_list_embed(pdfs: &[PdfRecord]) -> Embed {
  let mut table = String::from("```\n");
  table.push_str(&format!(
    "{:<tw$} : {:<iw$}\n",
    "Filename",
    "Index",
    tw = PDF_TITLE_WIDTH,
    iw = PDF_INDEX_WIDTH
  ));
  table.push_str(&"-".repeat(PDF_TITLE_WIDTH + PDF_INDEX_WIDTH + 2));
  table.push('\n');

  for pdf in pdfs {
    let title: String = pdf.title.chars().take(PDF_TITLE_WIDTH).collect();
    table.push_str(&format!(
      "{:<tw$} : {:<iw$}\n",
      title,
      pdf.id,
      tw = PDF_TITLE_WIDTH,
      iw = PDF_INDEX_WIDTH
    ));
  }
  table.push_str("```");

  Embed::new("Uploaded PDFs", ColorToken::BLUE).description(table)
}

pub fn pdf_deleted_embed(pdf: &PdfRecord) -> Embed {
  Embed::new("PDF Deleted", ColorToken::GREEN)
    .field("PDF Name", pdf.title.clone())
    .field("Index", pdf.id.to_string())
    .field("Status", "PDF and associated flashcards have been deleted.")
}

/// Command overview listing every endpoint
pub fn help_embed() -> Embed {
  Embed::new("Bot Help", ColorToken::BLUE)
    .description("Here are the available commands:")
    .field("POST /guilds/{guild}/pdfs", "Upload a PDF file (multipart field `file`).")
    .field("GET /guilds/{guild}/pdfs", "List all uploaded PDFs.")
    .field(
      "POST /guilds/{guild}/pdfs/{index}/flashcards",
      "Store flashcards generated from a stored PDF.",
    )
    .field("DELETE /guilds/{guild}/pdfs/{index}", "Delete a PDF and its associated flashcards.")
    .field(
      "POST /guilds/{guild}/users/{user}/play",
      "Play a flashcard game using stored flashcards (`all` or a PDF index).",
    )
    .field("GET /guilds/{guild}/users/{user}/session", "Show the current flashcard.")
    .field(
      "POST /guilds/{guild}/users/{user}/rate",
      "Rate the current flashcard: -1, 2, 3, 4 or 5.",
    )
    .field("POST /guilds/{guild}/users/{user}/reveal", "Show the answer to the current flashcard.")
    .field("GET /help", "Show this help message.")
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn card_view() -> CardView {
    CardView {
      remaining_count: 4,
      card_number: 2,
      question_text: "What is ownership?".into(),
      color: ColorToken::new(0x123456),
    }
  }

  fn pdf(id: i64, title: &str) -> PdfRecord {
    PdfRecord {
      id,
      guild_id: 1,
      path: format!("/tmp/{}", title),
      title: title.into(),
      uploaded_at: Utc::now(),
    }
  }

  #[test]
  fn test_question_embed() {
    let embed = question_embed(&card_view());
    assert_eq!(embed.title, "4 questions remaining..");
    assert_eq!(embed.color, ColorToken::new(0x123456));
    assert_eq!(embed.fields.len(), 1);
    assert_eq!(embed.fields[0].name, "Question #: 2");
    assert_eq!(embed.fields[0].value, "What is ownership?");
  }

  #[test]
  fn test_reveal_message_has_question_and_answer() {
    let answer = RevealView::Answer(AnswerView {
      card_number: 2,
      answer_text: "Each value has one owner".into(),
    });
    let message = reveal_message(DeckView::Card(card_view()), &answer);
    assert!(message.controls_enabled);
    assert_eq!(message.embeds.len(), 2);
    assert_eq!(message.embeds[1].title, "Answer Question: 2");
    assert_eq!(message.embeds[1].color, ColorToken::GREEN);
    assert_eq!(message.embeds[1].fields[0].value, "Each value has one owner");
  }

  #[test]
  fn test_completed_message_disables_controls() {
    let message = play_message(DeckView::Completed);
    assert!(!message.controls_enabled);
    assert_eq!(message.embeds, vec![completion_embed()]);
    assert_eq!(message.embeds[0].title, "Congratulations! 🎉");
    assert_eq!(
      message.embeds[0].description.as_deref(),
      Some("You've completed all the flashcards!")
    );

    let revealed = reveal_message(DeckView::Completed, &RevealView::Completed);
    assert_eq!(revealed, message);
  }

  #[test]
  fn test_pdf_list_layout() {
    let embed = pdf_list_embed(&[pdf(1, "intro.pdf"), pdf(7, "chapter-two.pdf")]);
    let table = embed.description.unwrap();
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines[0], "```");
    assert!(lines[1].starts_with("Filename"));
    assert_eq!(lines[1].find(':'), Some(51));
    assert_eq!(lines[2], "-".repeat(62));
    assert!(lines[3].starts_with("intro.pdf "));
    assert!(lines[4].contains(": 7"));
    assert_eq!(lines[5], "```");
  }

  #[test]
  fn test_pdf_list_truncates_long_titles() {
    let long = format!("{}.pdf", "x".repeat(80));
    let embed = pdf_list_embed(&[pdf(3, &long)]);
    let table = embed.description.unwrap();
    let row = table.lines().nth(3).unwrap();
    assert!(row.starts_with(&"x".repeat(50)));
    assert!(!row.contains(".pdf"));
  }

  #[test]
  fn test_pdf_deleted_embed() {
    let embed = pdf_deleted_embed(&pdf(5, "old.pdf"));
    assert_eq!(embed.title, "PDF Deleted");
    let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["PDF Name", "Index", "Status"]);
    assert_eq!(embed.fields[1].value, "5");
  }

  #[test]
  fn test_play_controls_match_rating_scale() {
    let message = play_message(DeckView::Card(card_view()));
    let controls = &message.controls;
    assert_eq!(controls.len(), 6);

    let scores: Vec<Option<i32>> = controls.iter().map(|c| c.score.map(Rating::score)).collect();
    assert_eq!(
      scores,
      vec![Some(-1), Some(2), Some(3), Some(4), Some(5), None]
    );
    assert_eq!(controls[0].emoji, Some("💀"));
    assert_eq!(controls[0].style, ControlStyle::Danger);
    assert_eq!(controls[2].style, ControlStyle::Secondary);
    assert_eq!(controls[4].emoji, Some("👑"));
    assert_eq!(controls[4].style, ControlStyle::Success);
    assert_eq!(controls[5].label, "Show Answer");
    assert!(controls.iter().all(|c| c.enabled));
  }

  #[test]
  fn test_completed_controls_are_disabled() {
    let message = play_message(DeckView::Completed);
    assert_eq!(message.controls.len(), 6);
    assert!(message.controls.iter().all(|c| !c.enabled));
  }

  #[test]
  fn test_help_lists_every_endpoint() {
    let embed = help_embed();
    assert_eq!(embed.title, "Bot Help");
    assert_eq!(embed.color, ColorToken::BLUE);
    assert_eq!(embed.fields.len(), 9);
    assert!(embed.fields.iter().any(|f| f.name.ends_with("/rate")));
    assert_eq!(embed.fields.last().unwrap().name, "GET /help");
  }
}
