pub mod flashcard;
pub mod rating;

pub use flashcard::{ColorToken, FlashcardSource, PdfRecord, QaPair};
pub use rating::Rating;
