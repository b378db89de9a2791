//! Document ingestion: extraction, chunking, metadata and identity

mod chunker;
pub mod identity;
mod metadata;
mod parser;

pub use chunker::{rejoin, TextChunker};
pub use identity::point_id;
pub use metadata::MetadataBuilder;
pub use parser::{
    file_extension, normalize_extension, CsvExtractor, ExtractorRegistry, PdfExtractor,
    PlainTextExtractor, RichTextExtractor, SlideDeckExtractor, SpreadsheetExtractor,
    TextExtractor,
};
