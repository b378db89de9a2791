//! Multi-format text extraction
//!
//! Every supported format is a [`TextExtractor`] registered in an
//! [`ExtractorRegistry`] under its extensions. Adding a format means
//! registering another extractor.

use calamine::Reader as _;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::error::{BoxError, Error, Result};

/// Data rows rendered for tabular formats
const TABLE_PREVIEW_ROWS: usize = 10;

/// Converts raw bytes of one format into plain text
pub trait TextExtractor: Send + Sync {
    /// Extensions handled, lower-cased with a leading dot
    fn extensions(&self) -> &[&'static str];

    /// Extract the text content
    fn extract(&self, data: &[u8]) -> std::result::Result<String, BoxError>;
}

/// Registry of extractors keyed by extension
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry with every built-in format
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PlainTextExtractor);
        registry.register(CsvExtractor);
        registry.register(SpreadsheetExtractor);
        registry.register(PdfExtractor);
        registry.register(SlideDeckExtractor);
        registry.register(RichTextExtractor);
        registry
    }

    /// Register an extractor for all of its extensions, replacing earlier ones
    pub fn register<E: TextExtractor + 'static>(&mut self, extractor: E) {
        let extractor: Arc<dyn TextExtractor> = Arc::new(extractor);
        for ext in extractor.extensions() {
            self.extractors
                .insert(normalize_extension(ext), Arc::clone(&extractor));
        }
    }

    /// Extractor for a type tag (`pdf`, `.PDF` and `.pdf` are equivalent)
    pub fn get(&self, type_tag: &str) -> Option<Arc<dyn TextExtractor>> {
        self.extractors.get(&normalize_extension(type_tag)).cloned()
    }

    /// Whether a type tag has an extractor
    pub fn supports(&self, type_tag: &str) -> bool {
        self.extractors.contains_key(&normalize_extension(type_tag))
    }

    /// Registered extensions, sorted
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self.extractors.keys().cloned().collect();
        exts.sort();
        exts
    }

    /// Extract text from `data`, dispatching on `type_tag`
    pub fn extract(&self, file_name: &str, type_tag: &str, data: &[u8]) -> Result<String> {
        let extractor = self
            .get(type_tag)
            .ok_or_else(|| Error::UnsupportedFormat(normalize_extension(type_tag)))?;

        extractor
            .extract(data)
            .map_err(|e| Error::extraction(file_name, e))
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Lower-case a type tag and make sure it carries a leading dot
pub fn normalize_extension(type_tag: &str) -> String {
    let tag = type_tag.trim().to_lowercase();
    if tag.is_empty() || tag.starts_with('.') {
        tag
    } else {
        format!(".{}", tag)
    }
}

/// Extension of a file name as `.ext`, or empty when there is none
pub fn file_extension(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(normalize_extension)
        .unwrap_or_default()
}

/// `.txt`: strict UTF-8
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extensions(&self) -> &[&'static str] {
        &[".txt"]
    }

    fn extract(&self, data: &[u8]) -> std::result::Result<String, BoxError> {
        Ok(String::from_utf8(data.to_vec())?)
    }
}

/// `.csv`: header row plus the first data rows
pub struct CsvExtractor;

impl TextExtractor for CsvExtractor {
    fn extensions(&self) -> &[&'static str] {
        &[".csv"]
    }

    fn extract(&self, data: &[u8]) -> std::result::Result<String, BoxError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records().take(TABLE_PREVIEW_ROWS) {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(render_table(&headers, &rows))
    }
}

/// `.xlsx` / `.xls`: first worksheet, first row as header
pub struct SpreadsheetExtractor;

impl TextExtractor for SpreadsheetExtractor {
    fn extensions(&self) -> &[&'static str] {
        &[".xlsx", ".xls"]
    }

    fn extract(&self, data: &[u8]) -> std::result::Result<String, BoxError> {
        let mut workbook =
            calamine::open_workbook_auto_from_rs(Cursor::new(data)).map_err(|e| e.to_string())?;

        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or("workbook has no worksheets")?;
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| e.to_string())?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());

        let headers = rows.next().unwrap_or_default();
        let body: Vec<Vec<String>> = rows.take(TABLE_PREVIEW_ROWS).collect();

        Ok(render_table(&headers, &body))
    }
}

fn cell_text(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!("Columns: {}", headers.join(", ")));
    for (idx, row) in rows.iter().enumerate() {
        lines.push(format!("Row {}: {}", idx, row.join(", ")));
    }
    lines.join("\n")
}

/// `.pdf`: page-by-page text with a whole-document fallback
pub struct PdfExtractor;

impl PdfExtractor {
    fn extract_pages(data: &[u8]) -> std::result::Result<String, BoxError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| e.to_string())?;

        let mut pages = Vec::new();
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) if !text.trim().is_empty() => pages.push(text),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Skipping PDF page {}: {}", page_number, e);
                }
            }
        }

        Ok(pages.join("\n"))
    }

    /// pdf-extract can panic on unusual fonts
    fn extract_whole(data: &[u8]) -> std::result::Result<String, BoxError> {
        catch_decoder_panic("pdf-extract", || {
            pdf_extract::extract_text_from_mem(data).map_err(|e| e.to_string().into())
        })
    }
}

/// Run a decoder, reporting a panic as an extraction error
///
/// Relies on the unwinding panic strategy; the release profile keeps it.
fn catch_decoder_panic<T>(
    decoder: &str,
    decode: impl FnOnce() -> std::result::Result<T, BoxError>,
) -> std::result::Result<T, BoxError> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(decode)).unwrap_or_else(|_| {
        Err(format!("{} panicked while decoding the document", decoder).into())
    })
}

impl TextExtractor for PdfExtractor {
    fn extensions(&self) -> &[&'static str] {
        &[".pdf"]
    }

    fn extract(&self, data: &[u8]) -> std::result::Result<String, BoxError> {
        let text = Self::extract_pages(data)?;
        if !text.trim().is_empty() {
            return Ok(text);
        }

        tracing::warn!("Per-page PDF extraction produced no text, trying fallback");
        match Self::extract_whole(data) {
            Ok(fallback) => Ok(fallback),
            Err(e) => {
                tracing::warn!("PDF fallback failed: {}", e);
                Ok(text)
            }
        }
    }
}

/// `.pptx`: text of every shape, slide by slide
pub struct SlideDeckExtractor;

const SLIDE_PREFIX: &str = "ppt/slides/slide";

impl SlideDeckExtractor {
    fn slide_number(name: &str) -> u32 {
        name.trim_start_matches(SLIDE_PREFIX)
            .trim_end_matches(".xml")
            .parse()
            .unwrap_or(0)
    }

    /// Non-blank shape texts of one slide, paragraphs joined with `\n`
    fn shape_texts(xml: &str) -> std::result::Result<Vec<String>, BoxError> {
        use quick_xml::events::Event;

        let mut reader = quick_xml::Reader::from_str(xml);
        let mut shapes = Vec::new();
        let mut paragraphs: Option<Vec<String>> = None;
        let mut in_text = false;

        loop {
            match reader.read_event().map_err(|e| e.to_string())? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"sp" => paragraphs = Some(Vec::new()),
                    b"p" => {
                        if let Some(paras) = paragraphs.as_mut() {
                            paras.push(String::new());
                        }
                    }
                    b"t" => in_text = paragraphs.is_some(),
                    _ => {}
                },
                Event::Empty(e) => {
                    if e.local_name().as_ref() == b"p" {
                        if let Some(paras) = paragraphs.as_mut() {
                            paras.push(String::new());
                        }
                    }
                }
                Event::Text(e) if in_text => {
                    let text = e.unescape().map_err(|e| e.to_string())?;
                    if let Some(paras) = paragraphs.as_mut() {
                        match paras.last_mut() {
                            Some(last) => last.push_str(&text),
                            None => paras.push(text.into_owned()),
                        }
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"sp" => {
                        if let Some(paras) = paragraphs.take() {
                            let text = paras.join("\n");
                            if !text.trim().is_empty() {
                                shapes.push(text);
                            }
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(shapes)
    }
}

impl TextExtractor for SlideDeckExtractor {
    fn extensions(&self) -> &[&'static str] {
        &[".pptx"]
    }

    fn extract(&self, data: &[u8]) -> std::result::Result<String, BoxError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;

        let mut slide_names: Vec<String> = archive
            .file_names()
            .filter(|name| name.starts_with(SLIDE_PREFIX) && name.ends_with(".xml"))
            .map(str::to_string)
            .collect();
        slide_names.sort_by_key(|name| Self::slide_number(name));

        let mut texts = Vec::new();
        for name in slide_names {
            let mut xml = String::new();
            archive.by_name(&name)?.read_to_string(&mut xml)?;
            texts.extend(Self::shape_texts(&xml)?);
        }

        Ok(texts.join("\n"))
    }
}

/// `.docx`: non-blank paragraphs
pub struct RichTextExtractor;

impl TextExtractor for RichTextExtractor {
    fn extensions(&self) -> &[&'static str] {
        &[".docx"]
    }

    fn extract(&self, data: &[u8]) -> std::result::Result<String, BoxError> {
        let doc = docx_rs::read_docx(data).map_err(|e| e.to_string())?;

        let mut paragraphs = Vec::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                let mut text = String::new();
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
                if !text.trim().is_empty() {
                    paragraphs.push(text);
                }
            }
        }

        Ok(paragraphs.join("\n"))
    }
}
