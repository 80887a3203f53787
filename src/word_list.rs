use smallvec::SmallVec;
use std::collections::HashMap;

use crate::MAX_SLOT_LENGTH;

/// An identifier for a given letter or whatever, based on its index in the WordList's `glyphs`
/// field.
pub type GlyphId = usize;

/// An identifier for a given word, based on its index in the WordList's `words` field.
pub type WordId = usize;

/// A struct representing a word that can be chosen for a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[GlyphId; MAX_SLOT_LENGTH]>,
}

impl Word {
    /// Length in symbols, which is what has to match a slot's length (not the byte length).
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }
}

/// The candidate vocabulary, with each distinct symbol mapped to a small integer so that crossing
/// checks compare ids instead of chars. Words are compared exactly; any case folding is up to the
/// caller.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    pub glyphs: Vec<char>,
    pub words: Vec<Word>,
    glyph_ids_by_char: HashMap<char, GlyphId>,
    word_ids_by_string: HashMap<String, WordId>,
}

impl WordList {
    /// Build a word list from strings in any order. Duplicates collapse into a single entry and
    /// empty strings are dropped, since no slot can hold them.
    pub fn new<I, S>(strings: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut word_list = WordList::default();
        for string in strings {
            word_list.add_word(string.as_ref());
        }
        word_list
    }

    /// Add a word if it isn't already present, returning its id either way.
    pub fn add_word(&mut self, string: &str) -> Option<WordId> {
        if string.is_empty() {
            return None;
        }
        if let Some(&word_id) = self.word_ids_by_string.get(string) {
            return Some(word_id);
        }

        let glyphs = string.chars().map(|c| self.glyph_id_for_char(c)).collect();
        let word_id = self.words.len();
        self.words.push(Word {
            string: string.to_string(),
            glyphs,
        });
        self.word_ids_by_string.insert(string.to_string(), word_id);

        Some(word_id)
    }

    fn glyph_id_for_char(&mut self, c: char) -> GlyphId {
        if let Some(&glyph_id) = self.glyph_ids_by_char.get(&c) {
            return glyph_id;
        }
        let glyph_id = self.glyphs.len();
        self.glyphs.push(c);
        self.glyph_ids_by_char.insert(c, glyph_id);
        glyph_id
    }

    pub fn word_id(&self, string: &str) -> Option<WordId> {
        self.word_ids_by_string.get(string).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::WordList;

    #[test]
    fn test_duplicates_and_empty_strings_are_dropped() {
        let word_list = WordList::new(["CAT", "DOG", "", "CAT"]);

        assert_eq!(word_list.len(), 2);
        assert_eq!(word_list.word_id("CAT"), Some(0));
        assert_eq!(word_list.word_id("DOG"), Some(1));
        assert_eq!(word_list.word_id(""), None);
        assert!(WordList::new(["", ""]).is_empty());
    }

    #[test]
    fn test_shared_letters_share_glyph_ids() {
        let word_list = WordList::new(["CAT", "ACT"]);

        let cat = &word_list.words[0];
        let act = &word_list.words[1];
        assert_eq!(cat.glyphs[0], act.glyphs[1]);
        assert_eq!(cat.glyphs[1], act.glyphs[0]);
        assert_eq!(cat.glyphs[2], act.glyphs[2]);
        assert_eq!(word_list.glyphs, vec!['C', 'A', 'T']);
    }

    #[test]
    fn test_length_counts_symbols_not_bytes() {
        let word_list = WordList::new(["ÉTÉ"]);
        assert_eq!(word_list.words[0].len(), 3);
    }
}
