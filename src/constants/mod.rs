pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024; // 10MB
pub const MAX_OCR_PDF_SIZE: usize = 1024 * 1024; // OCR.space free tier
pub const COMPRESSION_THRESHOLD: usize = 900 * 1024;
pub const MAX_INLINE_IMAGE_SIZE: usize = 1024 * 1024;
pub const MAX_IMAGE_DIMENSION: u32 = 3000;
pub const PRIMARY_JPEG_QUALITY: u8 = 92;
pub const FALLBACK_JPEG_QUALITY: u8 = 80;
pub const HISTORY_LIMIT: i64 = 50;
pub const SESSION_COOKIE: &str = "session";

pub struct Env {
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ocr_api_key: String,
    pub ocr_base_url: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
}

fn optional_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Env {
    fn new() -> Self {
        let jwt_secret = std::env::var("SECRET_KEY")
            .expect("SECRET_KEY must be set in .env file or environment variable");

        let database_url = optional_var("DATABASE_URL");
        let gemini_api_key = optional_var("GEMINI_API_KEY");
        let gemini_model =
            optional_var("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.0-flash".to_string());
        let gemini_base_url = optional_var("GEMINI_BASE_URL")
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string());

        let ocr_api_key =
            optional_var("OCR_SPACE_API_KEY").unwrap_or_else(|| "helloworld".to_string());
        let ocr_base_url =
            optional_var("OCR_SPACE_BASE_URL").unwrap_or_else(|| "https://api.ocr.space".to_string());

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");
        Env {
            jwt_secret,
            database_url,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
            ocr_api_key,
            ocr_base_url,
            frontend_url,
            ip,
            port,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
