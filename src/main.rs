use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tera::Tera;

use inkpost::db::establish_connection_pool;
use inkpost::models::config::ServerConfig;
use inkpost::repository::DieselRepository;
use inkpost::routes;
use inkpost::services::auth::bootstrap_admin;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ServerConfig::from_env()
        .map_err(|e| std::io::Error::other(format!("failed to read configuration: {e}")))?;

    if config.secret_key.len() < 64 {
        return Err(std::io::Error::other(
            "INKPOST_SECRET_KEY must be at least 64 characters",
        ));
    }
    let secret_key = Key::from(config.secret_key.as_bytes());

    let pool = establish_connection_pool(&config.database_url)
        .map_err(|e| std::io::Error::other(format!("failed to open database: {e}")))?;
    {
        let mut conn = pool
            .get()
            .map_err(|e| std::io::Error::other(format!("failed to get connection: {e}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| std::io::Error::other(format!("failed to run migrations: {e}")))?;
    }

    let repo = DieselRepository::new(pool);
    bootstrap_admin(&repo, config.admin_password.as_deref())
        .map_err(|e| std::io::Error::other(format!("admin bootstrap failed: {e}")))?;

    let tera = Tera::new("templates/**/*.html")
        .map_err(|e| std::io::Error::other(format!("failed to load templates: {e}")))?;

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let bind_address = (config.bind_address.clone(), config.port);
    log::info!("Starting server on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                secret_key.clone(),
            ))
            .wrap(Logger::default())
            .service(Files::new("/static", "static"))
            .service(routes::main::index)
            .service(routes::main::post_detail)
            .service(routes::main::category_view)
            .service(routes::main::tag_view)
            .service(routes::main::search)
            .service(routes::auth::login_page)
            .service(routes::auth::login)
            .service(routes::auth::logout)
            .service(routes::comments::add_comment)
            .service(routes::writer::write_page)
            .service(routes::writer::submit_post)
            .service(routes::admin::admin_page)
            .service(routes::admin::create_post)
            .service(routes::admin::edit_post_page)
            .service(routes::admin::edit_post)
            .service(routes::admin::delete_post)
            .service(routes::admin::delete_comment)
            .service(routes::admin::dashboard)
    })
    .bind(bind_address)?
    .run()
    .await
}
