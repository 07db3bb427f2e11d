use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::{from_fn, Logger},
    web, App, HttpServer,
};
use std::sync::{Arc, LazyLock};

use crate::{
    api::error::{json_error_handler, query_error_handler},
    configs::{connect_database, http_client},
    middlewares::identify,
    modules::{
        analysis::{AnalysisService, CompletionClient, GeminiClient},
        extraction::{
            ocr::OcrSpaceClient, ExtractionService, LocalPdfExtractor, OcrImageExtractor,
            OcrPdfExtractor, PdfExtractor, UploadConfig,
        },
        pipeline::PipelineService,
        upload::{UploadPgRepository, UploadRepository, UploadService},
    },
    utils::SessionVerifier,
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool = connect_database(&ENV).await.map_err(|e| {
        log::error!("Database connection error: {}", e);
        std::io::Error::other("Database connection error")
    })?;

    let http = http_client().map_err(|e| std::io::Error::other(e.to_string()))?;
    let upload_config = UploadConfig::default();

    let ocr = Arc::new(OcrSpaceClient::new(http.clone(), ENV.ocr_api_key.as_str(), &ENV.ocr_base_url));
    let image_extractor = Arc::new(OcrImageExtractor::new(ocr.clone()));
    let pdf_extractor = Arc::new(PdfExtractor::new(
        Arc::new(LocalPdfExtractor),
        Arc::new(OcrPdfExtractor::new(ocr, upload_config.max_ocr_pdf_size)),
    ));
    let extraction_service =
        ExtractionService::with_dependencies(&upload_config, image_extractor, pdf_extractor);

    let completion = ENV.gemini_api_key.as_deref().map(|key| {
        Arc::new(GeminiClient::new(http.clone(), key, &ENV.gemini_base_url, &ENV.gemini_model))
            as Arc<dyn CompletionClient + Send + Sync>
    });
    let analysis_service = AnalysisService::with_dependencies(completion);

    let upload_repo = db_pool.map(|pool| {
        Arc::new(UploadPgRepository::new(pool)) as Arc<dyn UploadRepository + Send + Sync>
    });
    let upload_service = UploadService::with_dependencies(upload_repo);

    let pipeline_service = PipelineService::with_dependencies(
        extraction_service.clone(),
        analysis_service.clone(),
        upload_service.clone(),
    );

    let session_verifier = SessionVerifier::new(ENV.jwt_secret.as_bytes());

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::Data::new(upload_config.clone()))
            .app_data(web::Data::new(session_verifier.clone()))
            .app_data(web::Data::new(extraction_service.clone()))
            .app_data(web::Data::new(analysis_service.clone()))
            .app_data(web::Data::new(upload_service.clone()))
            .app_data(web::Data::new(pipeline_service.clone()))
            .service(health_check)
            .service(
                web::scope("/api")
                    .wrap(from_fn(identify))
                    .configure(modules::extraction::route::configure)
                    .configure(modules::analysis::route::configure)
                    .configure(modules::pipeline::route::configure)
                    .configure(modules::upload::route::configure),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
