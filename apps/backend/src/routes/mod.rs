use actix_web::web;

pub mod auth;
pub mod health;
pub mod users;

/// The single route table. Gates are attached per route inside each module.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(auth::configure_routes)
        .configure(users::configure_routes);
}
