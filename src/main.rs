use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, middleware, web, App, HttpServer};

use useradm::compose::CompositionRoot;
use useradm::config::AppConfig;
use useradm::handlers;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Bad configuration: {e}");
            std::process::exit(2);
        }
    };

    // One composition root per configured instance; repositories are built
    // once and shared by every use case behind it.
    let root = web::Data::new(CompositionRoot::new(&config.instance));

    // Session encryption key — load from SESSION_KEY env var for persistent flash across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key");
            Key::generate()
        }
    };

    log::info!("Starting server at http://{}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(root.clone())
            .route(
                "/",
                web::get().to(|| async {
                    actix_web::HttpResponse::SeeOther()
                        .insert_header(("Location", "/users"))
                        .finish()
                }),
            )
            .route("/users", web::get().to(handlers::user_handlers::list))
            .route(
                "/users/assign-roles",
                web::get().to(handlers::assign_roles_handlers::dialog),
            )
            .route(
                "/users/assign-roles",
                web::post().to(handlers::assign_roles_handlers::save),
            )
            .route("/users/copy", web::get().to(handlers::copy_handlers::dialog))
            .route("/users/copy", web::post().to(handlers::copy_handlers::save))
            .route(
                "/users/{id}/status",
                web::post().to(handlers::user_handlers::set_status),
            )
            .route("/instance", web::get().to(handlers::instance_handlers::show))
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
