pub mod compress;
pub mod extractor;
pub mod handle;
pub mod model;
pub mod ocr;
pub mod route;
pub mod schema;
pub mod service;
pub mod validation;

pub use extractor::{LocalPdfExtractor, OcrImageExtractor, OcrPdfExtractor, PdfExtractor, TextExtractor};
pub use model::{UploadConfig, UploadedFile};
pub use schema::FileKind;
pub use service::ExtractionService;
