//! Sentence-greedy text chunking with word overlap

use crate::types::Chunk;

/// Sentence delimiters
const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Text chunker with configurable size and overlap, both in words
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    /// Maximum words per chunk (single oversized sentences still form one chunk)
    max_words: usize,
    /// Words carried from the end of the previous chunk
    overlap_words: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(max_words: usize, overlap_words: usize) -> Self {
        Self {
            max_words,
            overlap_words,
        }
    }

    /// Split text into ordered chunks with dense indices starting at 0
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let mut closed: Vec<String> = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_words = 0usize;

        for sentence in split_sentences(text) {
            let sentence_words = sentence.split_whitespace().count();

            if current_words + sentence_words <= self.max_words {
                current.push(sentence.to_string());
                current_words += sentence_words;
                continue;
            }

            if !current.is_empty() {
                closed.push(current.join(" "));
            }

            current.clear();
            current_words = 0;

            if self.overlap_words > 0 {
                if let Some(previous) = closed.last() {
                    let words: Vec<&str> = previous.split_whitespace().collect();
                    let tail = &words[words.len().saturating_sub(self.overlap_words)..];
                    current.extend(tail.iter().map(|w| w.to_string()));
                    current_words = tail.len();
                }
            }

            current.push(sentence.to_string());
            current_words += sentence_words;
        }

        if !current.is_empty() {
            closed.push(current.join(" "));
        }

        closed
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk::new(index, text))
            .collect()
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(500, 50)
    }
}

/// Split on terminal punctuation, trimming and dropping empty units
fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(&SENTENCE_TERMINATORS[..])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Rejoin chunk texts with single spaces
pub fn rejoin(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_small_animals_scenario() {
        let chunker = TextChunker::new(4, 1);
        let chunks = chunker.chunk("Cats are small. Dogs are big. Birds can fly.");

        assert_eq!(
            texts(&chunks),
            vec!["Cats are small", "small Dogs are big", "big Birds can fly"]
        );
        assert_eq!(
            chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_fits_in_one_chunk() {
        let chunker = TextChunker::new(50, 5);
        let chunks = chunker.chunk("One sentence here! Another one? Yes.");
        assert_eq!(texts(&chunks), vec!["One sentence here Another one Yes"]);
        assert_eq!(chunks[0].word_count, 6);
    }

    #[test]
    fn test_no_overlap() {
        let chunker = TextChunker::new(4, 0);
        let chunks = chunker.chunk("Cats are small. Dogs are big. Birds can fly.");
        assert_eq!(
            texts(&chunks),
            vec!["Cats are small", "Dogs are big", "Birds can fly"]
        );
    }

    #[test]
    fn test_oversized_sentence_kept_whole() {
        let chunker = TextChunker::new(3, 1);
        let chunks = chunker.chunk("This sentence is far too long for the bound. Short.");

        assert_eq!(chunks[0].text, "This sentence is far too long for the bound");
        assert_eq!(chunks[0].word_count, 9);
        assert_eq!(chunks[1].text, "bound Short");
    }

    #[test]
    fn test_overlap_larger_than_previous_chunk() {
        let chunker = TextChunker::new(2, 10);
        let chunks = chunker.chunk("Hi there. Go now.");
        assert_eq!(texts(&chunks), vec!["Hi there", "Hi there Go now"]);
    }

    #[test]
    fn test_seed_counts_real_words() {
        // Seed "small Dogs are big" holds 4 words, so the next 1-word sentence overflows
        let chunker = TextChunker::new(4, 1);
        let chunks = chunker.chunk("Cats are small. Dogs are big. Yes.");
        assert_eq!(
            texts(&chunks),
            vec!["Cats are small", "small Dogs are big", "big Yes"]
        );
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        let chunker = TextChunker::default();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("  ...!?  \n ").is_empty());
    }

    #[test]
    fn test_rejoin() {
        let chunker = TextChunker::new(4, 0);
        let chunks = chunker.chunk("Cats are small. Dogs are big.");
        assert_eq!(rejoin(&chunks), "Cats are small Dogs are big");
    }

    fn sentence() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z]{1,8}", 1..12).prop_map(|words| words.join(" "))
    }

    fn document() -> impl Strategy<Value = String> {
        prop::collection::vec(sentence(), 0..30).prop_map(|s| {
            s.into_iter()
                .map(|sentence| format!("{}.", sentence))
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    proptest! {
        #[test]
        fn prop_indices_are_dense(text in document(), max in 1usize..40, overlap in 0usize..10) {
            let chunks = TextChunker::new(max, overlap).chunk(&text);
            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.index, i);
                prop_assert!(!chunk.text.trim().is_empty());
            }
        }

        #[test]
        fn prop_overlap_prefix_matches_previous_tail(
            text in document(),
            max in 1usize..40,
            overlap in 1usize..10,
        ) {
            let chunks = TextChunker::new(max, overlap).chunk(&text);
            for pair in chunks.windows(2) {
                let prev: Vec<&str> = pair[0].text.split_whitespace().collect();
                let next: Vec<&str> = pair[1].text.split_whitespace().collect();
                let expected = overlap.min(prev.len());
                prop_assert!(next.len() > expected);
                prop_assert_eq!(&next[..expected], &prev[prev.len() - expected..]);
            }
        }

        #[test]
        fn prop_without_overlap_all_words_survive(text in document(), max in 1usize..40) {
            let chunks = TextChunker::new(max, 0).chunk(&text);
            let total: usize = chunks.iter().map(|c| c.word_count).sum();
            prop_assert_eq!(total, text.split_whitespace().count());
        }
    }
}
