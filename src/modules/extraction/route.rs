use crate::modules::extraction::handle::*;
use actix_web::web::ServiceConfig;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(extract_image).service(extract_pdf);
}
