//! Text surfaces: where the nameplate and the dialogue text end up.

/// Something that displays a string and can hide everything past a number of characters.
///
/// The character count is whatever the surface considers a character. A
/// surface that understands markup may report fewer characters than the raw
/// string length, and the typewriter will reveal exactly that many.
pub trait TextSurface: Send + Sync + 'static {
    /// Replaces the displayed text.
    fn set_text(&mut self, text: &str);

    /// Number of revealable characters in the current text.
    fn character_count(&self) -> usize;

    /// Shows only the first `count` characters.
    fn set_max_visible_characters(&mut self, count: usize);

    /// How many characters are currently allowed to be visible.
    fn max_visible_characters(&self) -> usize;
}

/// A [`TextSurface`] over plain text, counting Unicode scalar values.
///
/// ```
/// use bevy_dialogue_window::prelude::*;
///
/// let mut surface = PlainTextSurface::default();
/// surface.set_text("héllo");
/// surface.set_max_visible_characters(2);
/// assert_eq!(surface.character_count(), 5);
/// assert_eq!(surface.visible_text(), "hé");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlainTextSurface {
    /// The full text.
    text: String,
    /// Cached number of chars in `text`.
    characters: usize,
    /// Number of characters allowed to be visible.
    max_visible: usize,
}

impl PlainTextSurface {
    /// The full text, visible or not.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The visible prefix of the text.
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.max_visible) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }
}

impl TextSurface for PlainTextSurface {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.characters = self.text.chars().count();
        self.max_visible = self.characters;
    }

    fn character_count(&self) -> usize {
        self.characters
    }

    fn set_max_visible_characters(&mut self, count: usize) {
        self.max_visible = count;
    }

    fn max_visible_characters(&self) -> usize {
        self.max_visible
    }
}
