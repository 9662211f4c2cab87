pub mod curriculum;
pub mod drill_text;
pub mod letters;

pub use curriculum::Curriculum;

/// Supplies the material a session types. Sessions never call this
/// directly; the caller builds a stream from it before starting one.
pub trait ContentProvider {
    /// `count` single symbols for falling mode, no symbol twice in a row.
    /// Empty when the level has no content.
    fn letters_for_falling(&mut self, level: u32, count: usize) -> Vec<char>;

    /// A text block for text mode; lines are separated by `'\n'`.
    fn text_for_level(&mut self, level: u32) -> String;

    fn new_symbols_for_level(&self, level: u32) -> Vec<char>;

    fn learned_symbols_up_to(&self, level: u32) -> Vec<char>;

    fn has_content(&mut self, level: u32) -> bool {
        !self.letters_for_falling(level, 1).is_empty()
    }
}

impl<P: ContentProvider + ?Sized> ContentProvider for Box<P> {
    fn letters_for_falling(&mut self, level: u32, count: usize) -> Vec<char> {
        (**self).letters_for_falling(level, count)
    }

    fn text_for_level(&mut self, level: u32) -> String {
        (**self).text_for_level(level)
    }

    fn new_symbols_for_level(&self, level: u32) -> Vec<char> {
        (**self).new_symbols_for_level(level)
    }

    fn learned_symbols_up_to(&self, level: u32) -> Vec<char> {
        (**self).learned_symbols_up_to(level)
    }

    fn has_content(&mut self, level: u32) -> bool {
        (**self).has_content(level)
    }
}
