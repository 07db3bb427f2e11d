use crate::{
    api::error,
    modules::extraction::{model::UploadedFile, schema::FileKind},
    utils::format_megabytes,
};

/// Checks declared MIME type and measured size before anything is sent onward.
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_file_size: usize,
}

impl FileValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    /// Validates `file` and returns its kind. When `expected` is set, a file of
    /// the other supported kind is rejected too.
    pub fn validate(
        &self,
        file: &UploadedFile,
        expected: Option<FileKind>,
    ) -> Result<FileKind, error::SystemError> {
        let kind = match (FileKind::from_mime(&file.mime_type), expected) {
            (Some(kind), None) => kind,
            (Some(kind), Some(wanted)) if kind == wanted => kind,
            (_, Some(wanted)) => {
                return Err(error::SystemError::bad_request(wanted.wrong_type_message()));
            }
            (None, None) => {
                return Err(error::SystemError::bad_request(format!(
                    "Unsupported file type '{}'. Please upload a PDF, PNG or JPEG file.",
                    file.mime_type
                )));
            }
        };

        if file.size == 0 {
            return Err(error::SystemError::bad_request("No file provided"));
        }

        if file.size > self.max_file_size {
            return Err(error::SystemError::bad_request(format!(
                "File is too large ({}). Maximum allowed size is {}.",
                format_megabytes(file.size),
                format_megabytes(self.max_file_size)
            )));
        }

        Ok(kind)
    }
}
