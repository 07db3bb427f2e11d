use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{multipart::Form, Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OCR API request failed: {0}")]
    Status(StatusCode),

    #[error("File too large for OCR: {0}")]
    TooLarge(String),

    #[error("OCR processing failed: {0}")]
    Processing(String),
}

/// What kind of document is sent; PDFs get the `filetype=PDF` hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrDocument {
    Image { mime_type: &'static str },
    Pdf,
}

impl OcrDocument {
    fn mime_type(self) -> &'static str {
        match self {
            OcrDocument::Image { mime_type } => mime_type,
            OcrDocument::Pdf => "application/pdf",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrSpaceResponse {
    parsed_results: Option<Vec<ParsedResult>>,
    #[serde(default)]
    is_errored_on_processing: bool,
    error_message: Option<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    parsed_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    fn first(&self) -> Option<&str> {
        match self {
            ErrorMessage::One(msg) => Some(msg.as_str()),
            ErrorMessage::Many(msgs) => msgs.first().map(String::as_str),
        }
    }
}

fn is_size_complaint(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    msg.contains("file size") || msg.contains("too large")
}

/// Client for the OCR.space parse endpoint.
pub struct OcrSpaceClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OcrSpaceClient {
    pub fn new(client: Client, api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: format!("{}/parse/image", base_url.trim_end_matches('/')),
        }
    }

    /// Sends `bytes` for recognition and returns the parsed text of every
    /// page, in order.
    pub async fn parse(&self, bytes: &[u8], document: OcrDocument) -> Result<Vec<String>, OcrError> {
        let data_uri = format!("data:{};base64,{}", document.mime_type(), STANDARD.encode(bytes));

        let mut form = Form::new()
            .text("base64Image", data_uri)
            .text("language", "eng")
            .text("isOverlayRequired", "false")
            .text("detectOrientation", "true")
            .text("scale", "true")
            .text("OCREngine", "2");

        if document == OcrDocument::Pdf {
            form = form.text("filetype", "PDF");
        }

        debug!("Sending {} bytes to OCR ({:?})", bytes.len(), document);

        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("OCR API error ({}): {}", status, body);
            if status == StatusCode::PAYLOAD_TOO_LARGE {
                return Err(OcrError::TooLarge(body));
            }
            return Err(OcrError::Status(status));
        }

        let result: OcrSpaceResponse = response.json().await?;

        if result.is_errored_on_processing {
            let msg = result
                .error_message
                .as_ref()
                .and_then(ErrorMessage::first)
                .unwrap_or("OCR processing failed")
                .to_string();
            if is_size_complaint(&msg) {
                return Err(OcrError::TooLarge(msg));
            }
            return Err(OcrError::Processing(msg));
        }

        let pages = result
            .parsed_results
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.parsed_text.unwrap_or_default())
            .collect::<Vec<_>>();

        debug!("OCR returned {} page(s)", pages.len());
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> OcrSpaceClient {
        OcrSpaceClient::new(Client::new(), "test-key", &server.url())
    }

    #[actix_web::test]
    async fn returns_every_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/parse/image")
            .match_header("apikey", "test-key")
            .match_body(Matcher::Regex("filetype".to_string()))
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"ParsedResults":[{"ParsedText":"page one"},{"ParsedText":"page two"}],
                    "IsErroredOnProcessing":false}"#,
            )
            .create_async()
            .await;

        let pages = client(&server).parse(b"%PDF-1.4", OcrDocument::Pdf).await.unwrap();
        assert_eq!(pages, vec!["page one".to_string(), "page two".to_string()]);
        mock.assert_async().await;
    }

    #[actix_web::test]
    async fn sends_image_as_data_uri() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/parse/image")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("data:image/png;base64,".to_string()),
                Matcher::Regex("OCREngine".to_string()),
            ]))
            .with_body(r#"{"ParsedResults":[{"ParsedText":"Hello World"}]}"#)
            .create_async()
            .await;

        let pages = client(&server)
            .parse(b"png-bytes", OcrDocument::Image { mime_type: "image/png" })
            .await
            .unwrap();
        assert_eq!(pages, vec!["Hello World".to_string()]);
        mock.assert_async().await;
    }

    #[actix_web::test]
    async fn maps_processing_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/parse/image")
            .with_body(r#"{"IsErroredOnProcessing":true,"ErrorMessage":["Unable to recognize the file type"]}"#)
            .create_async()
            .await;

        let err = client(&server).parse(b"x", OcrDocument::Pdf).await.unwrap_err();
        assert!(matches!(err, OcrError::Processing(ref m) if m == "Unable to recognize the file type"));
    }

    #[actix_web::test]
    async fn recognises_size_complaints() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/parse/image")
            .with_body(r#"{"IsErroredOnProcessing":true,"ErrorMessage":"File size exceeds the maximum permissible file size limit of 1024 KB"}"#)
            .create_async()
            .await;

        let err = client(&server).parse(b"x", OcrDocument::Pdf).await.unwrap_err();
        assert!(matches!(err, OcrError::TooLarge(_)));
    }

    #[actix_web::test]
    async fn payload_too_large_is_a_size_complaint() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("POST", "/parse/image").with_status(413).create_async().await;

        let err = client(&server).parse(b"x", OcrDocument::Pdf).await.unwrap_err();
        assert!(matches!(err, OcrError::TooLarge(_)));
    }

    #[actix_web::test]
    async fn maps_http_failures() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("POST", "/parse/image").with_status(503).create_async().await;

        let err = client(&server).parse(b"x", OcrDocument::Pdf).await.unwrap_err();
        assert!(matches!(err, OcrError::Status(StatusCode::SERVICE_UNAVAILABLE)));
    }
}
