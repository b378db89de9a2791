//! Document metadata derived from reconstructed text

use chrono::Utc;

use crate::types::DocumentMetadata;

/// Lines of text kept in `first_lines`
const FIRST_LINES: usize = 5;

/// Builds [`DocumentMetadata`] for one upload
pub struct MetadataBuilder;

impl MetadataBuilder {
    /// Build metadata stamped with the current UTC time
    pub fn build(file_name: &str, file_size: u64, file_type: &str, text: &str) -> DocumentMetadata {
        DocumentMetadata {
            file_name: file_name.to_string(),
            file_size,
            file_type: file_type.to_string(),
            processed_date: Utc::now().to_rfc3339(),
            total_chars: text.chars().count(),
            total_words: text.split_whitespace().count(),
            first_lines: text
                .split('\n')
                .take(FIRST_LINES)
                .map(str::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_unicode_scalars_and_words() {
        let meta = MetadataBuilder::build("résumé.txt", 14, ".txt", "héllo wörld  again");
        assert_eq!(meta.total_chars, 18);
        assert_eq!(meta.total_words, 3);
        assert_eq!(meta.file_type, ".txt");
        assert_eq!(meta.first_lines, vec!["héllo wörld  again"]);
    }

    #[test]
    fn test_first_lines_bounded() {
        let text = "1\n2\n3\n4\n5\n6\n7";
        let meta = MetadataBuilder::build("n.txt", 13, ".txt", text);
        assert_eq!(meta.first_lines, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let meta = MetadataBuilder::build("a.txt", 1, ".txt", "a");
        assert!(chrono::DateTime::parse_from_rfc3339(&meta.processed_date).is_ok());
    }
}
