//! HTTP handlers and route configuration.

mod balance;
mod health;
mod memes;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::admission::AdmissionMiddleware;
use crate::state::AppState;

/// Configure all application routes.
///
/// `/memes` runs the metered pipeline, the account routes only the rate
/// limit, and `/health` neither.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    // Middleware sits on the method route, so a 405 never reaches the pipeline.
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::resource("/memes").route(
                web::get()
                    .to(memes::get_meme)
                    .wrap(AdmissionMiddleware::new(state.metered.clone())),
            ),
        )
        .service(
            web::resource("/balance").route(
                web::get()
                    .to(balance::get_balance)
                    .wrap(AdmissionMiddleware::new(state.account.clone())),
            ),
        )
        .service(
            web::resource("/tokens").route(
                web::post()
                    .to(balance::top_up)
                    .wrap(AdmissionMiddleware::new(state.account.clone())),
            ),
        );
}
