//! Splits a tokenized menu into per-day food text.
//!
//! Weekday labels act as section delimiters. Everything before the first
//! label is header noise; everything after the last label belongs to that
//! day. A label that appears again starts its day over.

use super::language::WeekdaySet;
use super::tokenizer::{Token, Tokenizer};
use crate::models::Menu;

/// Shortest token length kept. Shorter tokens are OCR debris or abbreviation fragments.
const MIN_WORD_CHARS: usize = 2;

/// Cursor over the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState<'a> {
    /// No weekday label seen yet; tokens are discarded.
    Seeking,
    /// Tokens are appended to this day.
    Accumulating(&'a str),
}

/// What to do with the token just consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentAction<'a> {
    Discard,
    /// A label: this day's text starts over from here.
    Restart(&'a str),
    Append(&'a str),
}

impl<'a> SegmentState<'a> {
    /// Transition on one token.
    pub fn step(self, token: &str, weekdays: &'a WeekdaySet) -> (Self, SegmentAction<'a>) {
        if let Some(day) = weekdays.find(token) {
            return (SegmentState::Accumulating(day), SegmentAction::Restart(day));
        }
        match self {
            SegmentState::Seeking => (SegmentState::Seeking, SegmentAction::Discard),
            SegmentState::Accumulating(day) => (self, SegmentAction::Append(day)),
        }
    }
}

/// Keep only alphabetic tokens of at least two characters.
pub fn is_menu_word(token: &Token) -> bool {
    token.is_word && token.len() >= MIN_WORD_CHARS
}

/// Walk already-tokenized words and build the menu.
pub fn generate_menu<'t, I>(words: I, weekdays: &WeekdaySet) -> Menu
where
    I: IntoIterator<Item = &'t Token>,
{
    let mut menu = Menu::empty(weekdays);
    let mut state = SegmentState::Seeking;

    for word in words.into_iter().filter(|t| is_menu_word(t)) {
        let (next, action) = state.step(&word.text, weekdays);
        state = next;
        match action {
            SegmentAction::Discard => {}
            // A recurring label drops whatever that day collected before.
            SegmentAction::Restart(day) => {
                if let Some(entry) = menu.entry_mut(day) {
                    entry.clear();
                }
            }
            SegmentAction::Append(day) => {
                if let Some(entry) = menu.entry_mut(day) {
                    entry.push_str(&word.text);
                    entry.push(' ');
                }
            }
        }
    }

    menu.trim_entries();
    menu
}

/// Tokenize filtered text and segment it by weekday.
pub fn segment_text(text: &str, tokenizer: &dyn Tokenizer, weekdays: &WeekdaySet) -> Menu {
    let tokens = tokenizer.tokenize(text);
    generate_menu(&tokens, weekdays)
}
