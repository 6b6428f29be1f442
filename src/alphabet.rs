use std::collections::HashMap;

use lazy_static::lazy_static;

/// Placeholder for indices that fall outside of the alphabet
pub const UNKNOWN: char = '?';

lazy_static! {
    /// Russian alphabet, 33 letters including Ё
    pub static ref RUSSIAN: Alphabet = Alphabet::new("АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ");
}

/// Ordered set of symbols, mapping characters to their positions and back
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Duplicate characters keep their first position
    pub fn new(symbols: &str) -> Self {
        let symbols: Vec<char> = symbols.chars().collect();
        let mut index = HashMap::with_capacity(symbols.len());
        for (i, &c) in symbols.iter().enumerate() {
            index.entry(c).or_insert(i);
        }
        Self { symbols, index }
    }

    /// Number of symbols `N`
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn char_to_index(&self, c: char) -> Option<usize> {
        self.index.get(&c).copied()
    }

    pub fn index_to_char(&self, i: usize) -> Option<char> {
        self.symbols.get(i).copied()
    }

    /// Upper-cases `text` and maps it to indices, skipping characters that
    /// are not in the alphabet
    pub fn to_indices(&self, text: &str) -> Vec<usize> {
        text.chars()
            .flat_map(char::to_uppercase)
            .filter_map(|c| self.char_to_index(c))
            .collect()
    }

    /// Maps indices back to text, writing [`UNKNOWN`] for out-of-range ones
    pub fn from_indices(&self, indices: &[usize]) -> String {
        indices
            .iter()
            .map(|&i| self.index_to_char(i).unwrap_or(UNKNOWN))
            .collect()
    }
}
