//! Signal text normalization and trigram vectorization.
//!
//! All classification happens over normalized text: lowercase, diacritics
//! stripped via canonical decomposition, `_ - / .` turned into spaces and
//! whitespace collapsed. Features are padded character n-grams counted over a
//! fixed [`Vocabulary`].

use crate::vector::NGramVector;
use ahash::AHashMap;
use std::iter;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Default n-gram length
pub const DEFAULT_NGRAM_SIZE: usize = 3;

/// Marker padded onto both ends of the text before windowing
pub const BOUNDARY_MARKER: char = '_';

const SEPARATORS: [char; 4] = ['_', '-', '/', '.'];

/// Normalize free text into signal text.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if SEPARATORS.contains(&c) { ' ' } else { c })
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Character n-grams of the normalized text, padded with [`BOUNDARY_MARKER`].
///
/// `"email"` becomes `"_email_"` and yields `_em ema mai ail il_`. Empty
/// input yields nothing.
pub fn char_ngrams(text: &str, n: usize) -> Vec<String> {
    let normalized = normalize(text);
    if n == 0 || normalized.is_empty() {
        return Vec::new();
    }

    let padded: Vec<char> = iter::once(BOUNDARY_MARKER)
        .chain(normalized.chars())
        .chain(iter::once(BOUNDARY_MARKER))
        .collect();

    if padded.len() < n {
        return Vec::new();
    }

    padded.windows(n).map(|w| w.iter().collect()).collect()
}

/// Ordered n-gram vocabulary. Terms keep the index of their first appearance.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    index: AHashMap<String, usize>,
    terms: Vec<String>,
    ngram_size: usize,
}

impl Vocabulary {
    pub fn new(ngram_size: usize) -> Self {
        Self {
            index: AHashMap::new(),
            terms: Vec::new(),
            ngram_size,
        }
    }

    /// Build a vocabulary from every n-gram of `texts`, in first-seen order
    pub fn from_texts<'a, I>(texts: I, ngram_size: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut vocabulary = Self::new(ngram_size);
        for text in texts {
            vocabulary.insert_text(text);
        }
        vocabulary
    }

    pub fn insert_text(&mut self, text: &str) {
        for gram in char_ngrams(text, self.ngram_size) {
            if !self.index.contains_key(&gram) {
                self.index.insert(gram.clone(), self.terms.len());
                self.terms.push(gram);
            }
        }
    }

    #[inline]
    pub fn index_of(&self, gram: &str) -> Option<usize> {
        self.index.get(gram).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn ngram_size(&self) -> usize {
        self.ngram_size
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Term-frequency vector of `text` over `vocabulary`, L2-normalized.
///
/// N-grams outside the vocabulary are dropped. When nothing matches the
/// zero vector is returned as is.
pub fn vectorize(text: &str, vocabulary: &Vocabulary) -> NGramVector {
    let mut vector = NGramVector::zeros(vocabulary.len());
    let slots = vector.as_mut_slice();
    for gram in char_ngrams(text, vocabulary.ngram_size()) {
        if let Some(i) = vocabulary.index_of(&gram) {
            slots[i] += 1.0;
        }
    }
    vector.normalize();
    vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_strips_diacritics_and_separators() {
        assert_eq!(normalize("Código_Postal"), "codigo postal");
        assert_eq!(normalize("  E-mail / Correo.Electrónico  "), "e mail correo electronico");
        assert_eq!(normalize("Endereço\t\nCOMPLETO"), "endereco completo");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" _-/. "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("Número do Cartão - CVV");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_char_ngrams_email() {
        assert_eq!(char_ngrams("email", 3), vec!["_em", "ema", "mai", "ail", "il_"]);
    }

    #[test]
    fn test_char_ngrams_empty_input() {
        assert!(char_ngrams("", 3).is_empty());
        assert!(char_ngrams("   ", 3).is_empty());
    }

    #[test]
    fn test_char_ngrams_single_char() {
        assert_eq!(char_ngrams("a", 3), vec!["_a_"]);
        assert_eq!(char_ngrams("É", 3), vec!["_e_"]);
    }

    #[test]
    fn test_vocabulary_keeps_first_seen_order() {
        let vocab = Vocabulary::from_texts(["ab", "ba"], 3);
        assert_eq!(vocab.terms(), &["_ab", "ab_", "_ba", "ba_"]);
        assert_eq!(vocab.index_of("_ba"), Some(2));
        assert_eq!(vocab.index_of("zzz"), None);
    }

    #[test]
    fn test_vectorize_counts_and_normalizes() {
        let vocab = Vocabulary::from_texts(["email"], 3);
        let v = vectorize("email", &vocab);
        assert_eq!(v.dim(), 5);
        assert!((v.norm() - 1.0).abs() < 1e-6);
        assert!((v.dot(&v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_vectorize_unknown_text_is_zero() {
        let vocab = Vocabulary::from_texts(["email"], 3);
        let v = vectorize("xyz", &vocab);
        assert_eq!(v.dim(), vocab.len());
        assert!(v.is_zero());
    }

    proptest! {
        #[test]
        fn prop_vectorize_norm_is_zero_or_one(text in "\\PC{0,40}") {
            let vocab = Vocabulary::from_texts(["zip code address", "email", "cpf número"], 3);
            let v = vectorize(&text, &vocab);
            let norm = v.norm();
            prop_assert!(!norm.is_nan());
            prop_assert!(norm.abs() < 1e-5 || (norm - 1.0).abs() < 1e-5);
        }
    }
}
