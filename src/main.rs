use std::sync::Arc;

use actix_web::{middleware::Logger, App, HttpServer};
use color_eyre::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use farmhub::config::{routes, Config, CryptoService};
use farmhub::controllers::CookieSettings;
use farmhub::service::{JwtService, SmtpEmailService};
use farmhub::{AppServices, Dependencies, Repositories};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        error!("Error while loading configuration: {e:?}");
        std::process::exit(1);
    });
    let pool = config.db_pool().await.unwrap_or_else(|e| {
        error!("Error while connecting to the database: {e:?}");
        std::process::exit(1);
    });
    if let Err(e) = sqlx::migrate!().run(&pool).await {
        error!("Error while running migrations: {e:?}");
        std::process::exit(1);
    }
    info!("Connected to the database");

    let email_sender = Arc::new(SmtpEmailService::new(
        &config.smtp_host,
        &config.smtp_user,
        &config.smtp_pass,
        &config.platform_name,
        &config.otp_template_path,
    )?);

    let services = AppServices::new(Dependencies {
        repositories: Repositories::postgres(pool.clone()),
        email_sender,
        jwt: Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
        )),
        crypto: CryptoService::default(),
        otp_policy: config.otp_policy(),
        cookies: CookieSettings::for_environment(config.is_production()),
    });

    info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| services.configure(cfg))
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}
