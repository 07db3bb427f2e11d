use crate::middlewares::authentication;
use crate::modules::upload::handle::*;
use actix_web::{
    middleware::from_fn,
    web::{scope, ServiceConfig},
};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/uploads")
            .wrap(from_fn(authentication))
            .service(save_upload)
            .service(list_uploads),
    );
}
