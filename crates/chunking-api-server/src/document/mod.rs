pub mod extractor;

pub use extractor::{ExtractError, PdfExtractor};
