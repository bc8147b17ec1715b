use lopdf::Document as PdfDocument;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("could not extract text from PDF: {0}")]
    ExtractionFailed(String),
}

pub struct PdfExtractor;

impl PdfExtractor {
    /// Extract plain text from PDF bytes, page by page.
    ///
    /// Pages that fail to extract are skipped with a warning; the call only
    /// fails when the document does not load or no page yields non-empty text.
    pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
        let doc = PdfDocument::load_mem(bytes)
            .map_err(|e| ExtractError::ExtractionFailed(e.to_string()))?;

        let pages = doc.get_pages();
        debug!("Extracting text from {} pages", pages.len());

        let mut content = String::new();

        for (page_num, _) in pages.iter() {
            match doc.extract_text(&[*page_num]) {
                Ok(text) => {
                    content.push_str(&text);
                    content.push('\n');
                }
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", page_num, e);
                }
            }
        }

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(ExtractError::ExtractionFailed(
                "no extraction method yielded non-empty text".to_string(),
            ));
        }

        debug!("Extracted {} characters", content.len());
        Ok(content)
    }
}
