//! Text extraction from various file formats

use crate::error::{Result, ResumeParserError};
use crate::input::file_detector::DocumentFormat;
use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild, TableRowChild,
};
use log::{debug, warn};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::sync::OnceLock;

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Extract plain text from in-memory document bytes.
///
/// An unrecognised format is not an error: it yields an empty string so the
/// rest of the pipeline degrades to "nothing found". Corrupt PDF or DOCX
/// containers do surface as errors.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Pdf => PdfExtractor.extract(bytes),
        DocumentFormat::Docx => DocxExtractor.extract(bytes),
        DocumentFormat::Text => PlainTextExtractor.extract(bytes),
        DocumentFormat::Markdown => MarkdownExtractor.extract(bytes),
        DocumentFormat::Unknown => {
            warn!("Unsupported document format, no text extracted");
            Ok(String::new())
        }
    }
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        match lopdf::Document::load_mem(bytes) {
            Ok(document) => Ok(Self::extract_pages(&document)),
            Err(load_error) => {
                warn!(
                    "Page-level PDF parser rejected the document ({}), falling back to whole-document extraction",
                    load_error
                );
                let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
                    ResumeParserError::PdfExtraction(format!(
                        "Failed to extract text from PDF: {}; fallback extractor: {}",
                        load_error, e
                    ))
                })?;
                Ok(text.trim().to_string())
            }
        }
    }
}

impl PdfExtractor {
    /// Join the text of every page that has any, in page order
    fn extract_pages(document: &lopdf::Document) -> String {
        let mut pages = Vec::new();

        for (page_number, _page_id) in document.get_pages() {
            match document.extract_text(&[page_number]) {
                Ok(text) if !text.trim().is_empty() => pages.push(text.trim_end().to_string()),
                Ok(_) => debug!("PDF page {} has no extractable text, skipping", page_number),
                Err(e) => debug!("PDF page {} could not be decoded ({}), skipping", page_number, e),
            }
        }

        pages.join("\n")
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| {
            ResumeParserError::DocxExtraction(format!("Failed to read DOCX archive: {}", e))
        })?;

        let mut lines = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(para) => lines.push(paragraph_text(para)),
                DocumentChild::Table(table) => push_table_lines(table, &mut lines),
                _ => {}
            }
        }

        Ok(lines.join("\n"))
    }
}

// Every paragraph inside a cell becomes its own line, row by row; nested tables recurse.
fn push_table_lines(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(para) => lines.push(paragraph_text(para)),
                    TableCellContent::Table(nested) => push_table_lines(nested, lines),
                    _ => {}
                }
            }
        }
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_paragraph_children(&para.children, &mut text);
    text
}

// Runs inside a paragraph belong to the same line; hyperlinks nest further runs.
fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let content = String::from_utf8_lossy(bytes);
        Ok(content.trim_start_matches('\u{feff}').to_string())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown_content = PlainTextExtractor.extract(bytes)?;

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(self.html_to_text(&html_output))
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> String {
        static TAG: OnceLock<Regex> = OnceLock::new();
        let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

        let text = html
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("&nbsp;", " ");
        let stripped = tag.replace_all(&text, "");
        let decoded = stripped
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");

        decoded
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
