//! Document loading.
//!
//! Turns uploaded files into text segments tagged with their origin. Files
//! are parsed from memory by declared type: PDF (one segment per page), DOCX
//! (one segment per document) and plain text.

use scholar_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declared type of an uploaded file, derived from its extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
    /// Any other extension (lowercased, possibly empty)
    Unknown(String),
}

impl DocumentKind {
    /// Classify a filename by its extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "txt" | "text" | "md" => Self::PlainText,
            _ => Self::Unknown(extension),
        }
    }
}

/// An uploaded file: original name plus raw content.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read a file from disk. The path as given becomes the filename.
    pub fn read(path: &Path) -> AppResult<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::new(path.to_string_lossy(), bytes))
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_filename(&self.filename)
    }
}

/// Where a piece of text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Original filename as uploaded
    pub filename: String,

    /// 1-based page number (PDF only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl SourceMetadata {
    pub fn file(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            page: None,
        }
    }

    pub fn page(filename: impl Into<String>, page: u32) -> Self {
        Self {
            filename: filename.into(),
            page: Some(page),
        }
    }
}

/// Extracted text plus its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    pub source: SourceMetadata,
}

impl TextSegment {
    pub fn new(text: impl Into<String>, source: SourceMetadata) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// A file that produced output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedFile {
    pub filename: String,
    pub segments: usize,
}

/// A file that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub filename: String,
    pub reason: String,
}

/// Outcome of a batch load, for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub loaded: Vec<LoadedFile>,
    pub skipped: Vec<SkippedFile>,
}

impl LoadReport {
    /// Total number of segments across loaded files.
    pub fn segment_count(&self) -> usize {
        self.loaded.iter().map(|f| f.segments).sum()
    }
}

/// Extract the text segments of a single document.
///
/// Segments that are empty after trimming are dropped, so a readable but
/// blank file yields an empty vector rather than an error.
///
/// # Errors
/// * `AppError::UnsupportedFormat` - extension is not pdf, docx, txt, text or md
/// * `AppError::Load` - content cannot be parsed for its declared type
pub fn load_document(document: &Document) -> AppResult<Vec<TextSegment>> {
    let filename = document.filename.as_str();

    let segments = match document.kind() {
        DocumentKind::Pdf => load_pdf(filename, &document.bytes)?,
        DocumentKind::Docx => load_docx(filename, &document.bytes)?,
        DocumentKind::PlainText => load_plain_text(filename, &document.bytes),
        DocumentKind::Unknown(extension) => {
            return Err(AppError::UnsupportedFormat {
                file: filename.to_string(),
                extension,
            })
        }
    };

    Ok(segments
        .into_iter()
        .filter(|segment| !segment.text.trim().is_empty())
        .collect())
}

/// Load every document in order, skipping those that fail.
///
/// Per-file failures are logged and recorded in the report. The documents
/// are consumed and their bytes released before this returns.
///
/// # Errors
/// * `AppError::NoDocuments` - no file produced any text
pub fn load_documents(documents: Vec<Document>) -> AppResult<(Vec<TextSegment>, LoadReport)> {
    let mut segments = Vec::new();
    let mut report = LoadReport::default();

    for document in documents {
        match load_document(&document) {
            Ok(extracted) => {
                tracing::debug!(
                    "Loaded '{}': {} segment(s)",
                    document.filename,
                    extracted.len()
                );
                report.loaded.push(LoadedFile {
                    filename: document.filename.clone(),
                    segments: extracted.len(),
                });
                segments.extend(extracted);
            }
            Err(e) if e.is_load_error() => {
                tracing::warn!("Skipping '{}': {}", document.filename, e);
                report.skipped.push(SkippedFile {
                    filename: document.filename.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    if segments.is_empty() {
        return Err(AppError::NoDocuments);
    }

    tracing::info!(
        "Loaded {} segment(s) from {} file(s), skipped {}",
        segments.len(),
        report.loaded.len(),
        report.skipped.len()
    );

    Ok((segments, report))
}

fn load_pdf(filename: &str, bytes: &[u8]) -> AppResult<Vec<TextSegment>> {
    let pdf = lopdf::Document::load_mem(bytes)
        .map_err(|e| AppError::load(filename, format!("invalid PDF: {}", e)))?;
    let page_numbers: Vec<u32> = pdf.get_pages().keys().copied().collect();

    let pages = match pdf_extract::extract_text_from_mem_by_pages(bytes) {
        Ok(pages) => pages,
        Err(e) => {
            tracing::debug!(
                "pdf-extract failed for '{}' ({}), falling back to lopdf",
                filename,
                e
            );
            page_numbers
                .iter()
                .map(|number| {
                    pdf.extract_text(&[*number]).map_err(|e| {
                        AppError::load(filename, format!("page {}: {}", number, e))
                    })
                })
                .collect::<AppResult<Vec<String>>>()?
        }
    };

    Ok(pages
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let page = page_numbers.get(i).copied().unwrap_or(i as u32 + 1);
            TextSegment::new(text.replace('\0', ""), SourceMetadata::page(filename, page))
        })
        .collect())
}

fn load_docx(filename: &str, bytes: &[u8]) -> AppResult<Vec<TextSegment>> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| AppError::load(filename, format!("invalid DOCX: {}", e)))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(p) => paragraphs.push(paragraph_text(p)),
            docx_rs::DocumentChild::Table(table) => collect_table_text(table, &mut paragraphs),
            _ => {}
        }
    }

    Ok(vec![TextSegment::new(
        paragraphs.join("\n"),
        SourceMetadata::file(filename),
    )])
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    docx_rs::RunChild::Text(t) => text.push_str(&t.text),
                    docx_rs::RunChild::Tab(_) => text.push('\t'),
                    _ => {}
                }
            }
        }
    }
    text
}

#[allow(irrefutable_let_patterns)]
fn collect_table_text(table: &docx_rs::Table, paragraphs: &mut Vec<String>) {
    for row in &table.rows {
        let docx_rs::TableChild::TableRow(row) = row else {
            continue;
        };
        for cell in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            for content in &cell.children {
                match content {
                    docx_rs::TableCellContent::Paragraph(p) => paragraphs.push(paragraph_text(p)),
                    docx_rs::TableCellContent::Table(inner) => collect_table_text(inner, paragraphs),
                    _ => {}
                }
            }
        }
    }
}

fn load_plain_text(filename: &str, bytes: &[u8]) -> Vec<TextSegment> {
    vec![TextSegment::new(
        String::from_utf8_lossy(bytes),
        SourceMetadata::file(filename),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docx_bytes(docx: docx_rs::Docx) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    /// A PDF with one Helvetica text line per page.
    fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Object, Stream};

        let mut pdf = lopdf::Document::with_version("1.5");
        let pages_id = pdf.new_object_id();
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = pdf.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let kids: Vec<Object> = pages
            .iter()
            .map(|text| {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 24.into()]),
                        Operation::new("Td", vec![72.into(), 700.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*text)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    pdf.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                Object::Reference(pdf.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                }))
            })
            .collect();

        let count = kids.len() as i64;
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        pdf.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        pdf.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_filename("paper.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("notes.Docx"), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_filename("a/b/readme.md"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_filename("x.text"), DocumentKind::PlainText);
        assert_eq!(
            DocumentKind::from_filename("data.xyz"),
            DocumentKind::Unknown("xyz".to_string())
        );
        assert_eq!(
            DocumentKind::from_filename("Makefile"),
            DocumentKind::Unknown(String::new())
        );
    }

    #[test]
    fn test_plain_text_is_one_segment() {
        let doc = Document::new("lecture.txt", b"Line one\nLine two\n".to_vec());
        let segments = load_document(&doc).unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Line one\nLine two\n");
        assert_eq!(segments[0].source, SourceMetadata::file("lecture.txt"));
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let doc = Document::new("bad.txt", vec![b'o', b'k', 0xff, b'!']);
        let segments = load_document(&doc).unwrap();
        assert_eq!(segments[0].text, "ok\u{fffd}!");
    }

    #[test]
    fn test_blank_text_yields_no_segments() {
        let doc = Document::new("blank.txt", b"  \n\t ".to_vec());
        assert!(load_document(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        let doc = Document::new("data.xyz", b"whatever".to_vec());
        match load_document(&doc) {
            Err(AppError::UnsupportedFormat { file, extension }) => {
                assert_eq!(file, "data.xyz");
                assert_eq!(extension, "xyz");
            }
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_pdf_yields_one_segment_per_page() {
        let doc = Document::new("lecture.pdf", pdf_bytes(&["Mitosis", "Meiosis"]));
        let segments = load_document(&doc).unwrap();

        assert_eq!(segments.len(), 2);
        assert!(segments[0].text.contains("Mitosis"), "{:?}", segments[0].text);
        assert!(segments[1].text.contains("Meiosis"), "{:?}", segments[1].text);
        assert_eq!(segments[0].source.page, Some(1));
        assert_eq!(segments[1].source.page, Some(2));
        assert_eq!(segments[1].source.filename, "lecture.pdf");
    }

    #[test]
    fn test_corrupt_pdf_is_load_error() {
        let doc = Document::new("broken.pdf", b"%PDF-1.4 not really".to_vec());
        match load_document(&doc) {
            Err(AppError::Load { file, .. }) => assert_eq!(file, "broken.pdf"),
            other => panic!("Expected Load error, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_docx_is_load_error() {
        let doc = Document::new("broken.docx", b"PK not a zip".to_vec());
        assert!(matches!(load_document(&doc), Err(AppError::Load { .. })));
    }

    #[test]
    fn test_docx_paragraphs_and_tables() {
        use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

        let table = Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Cell A"))),
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Cell B"))),
        ])]);
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Chapter 1")))
            .add_table(table)
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("The end")));

        let doc = Document::new("notes.docx", docx_bytes(docx));
        let segments = load_document(&doc).unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Chapter 1\nCell A\nCell B\nThe end");
        assert_eq!(segments[0].source.page, None);
    }

    #[test]
    fn test_batch_skips_bad_files() {
        let docs = vec![
            Document::new("a.txt", b"alpha".to_vec()),
            Document::new("b.xyz", b"beta".to_vec()),
            Document::new("c.pdf", b"garbage".to_vec()),
            Document::new("d.md", b"# delta".to_vec()),
        ];

        let (segments, report) = load_documents(docs).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "alpha");
        assert_eq!(segments[1].text, "# delta");
        assert_eq!(report.loaded.len(), 2);
        assert_eq!(report.segment_count(), 2);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].filename, "b.xyz");
        assert_eq!(report.skipped[1].filename, "c.pdf");
    }

    #[test]
    fn test_batch_with_nothing_usable() {
        assert!(matches!(load_documents(Vec::new()), Err(AppError::NoDocuments)));

        let docs = vec![Document::new("only.xyz", b"text".to_vec())];
        assert!(matches!(load_documents(docs), Err(AppError::NoDocuments)));

        let docs = vec![Document::new("empty.txt", Vec::new())];
        assert!(matches!(load_documents(docs), Err(AppError::NoDocuments)));
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("chapter.txt");
        std::fs::write(&path, "Mitochondria").unwrap();

        let doc = Document::read(&path).unwrap();
        assert_eq!(doc.kind(), DocumentKind::PlainText);
        assert!(doc.filename.ends_with("chapter.txt"));
        assert_eq!(doc.bytes, b"Mitochondria");
    }
}
