mod config;
mod error;
mod models;
mod services;
mod handlers;

use actix_web::{web, App, HttpServer, middleware::Logger};

use config::Config;
use services::{MockDatasetGenerator, Session, SvgChartSink};
use handlers::{
    cancel_clear, click_suggestion, confirm_clear, get_chart, get_session, list_suggestions,
    request_clear, select_file, submit_text,
};

type InsightSession = Session<MockDatasetGenerator, SvgChartSink>;

/// Wire every shell entry point onto the session
fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/file")
            .route(web::post().to(select_file::<MockDatasetGenerator, SvgChartSink>)),
    )
    .service(
        web::resource("/messages")
            .route(web::post().to(submit_text::<MockDatasetGenerator, SvgChartSink>)),
    )
    .service(
        web::resource("/suggestions")
            .route(web::get().to(list_suggestions))
            .route(web::post().to(click_suggestion::<MockDatasetGenerator, SvgChartSink>)),
    )
    .service(
        web::resource("/clear")
            .route(web::post().to(request_clear::<MockDatasetGenerator, SvgChartSink>)),
    )
    .service(
        web::resource("/clear/confirm")
            .route(web::post().to(confirm_clear::<MockDatasetGenerator, SvgChartSink>)),
    )
    .service(
        web::resource("/clear/cancel")
            .route(web::post().to(cancel_clear::<MockDatasetGenerator, SvgChartSink>)),
    )
    .service(
        web::resource("/session")
            .route(web::get().to(get_session::<MockDatasetGenerator, SvgChartSink>)),
    )
    .service(
        web::resource("/chart")
            .route(web::get().to(get_chart::<MockDatasetGenerator, SvgChartSink>)),
    );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("🚀 Starting Excel Insight");

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {:#}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // One shell, one session
    let session: InsightSession = Session::new(
        MockDatasetGenerator::new(config.timings.processing_delay),
        SvgChartSink::new(),
        config.timings.clone(),
    );
    log::info!("💬 Session {} ready", session.id());

    let session_data = web::Data::new(session.clone());
    let config_data = web::Data::new(config.clone());

    let server_url = format!("http://127.0.0.1:{}", config.server_port);
    log::info!("🌐 Starting server at {}", server_url);

    let result = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(session_data.clone())
            .app_data(config_data.clone())
            .configure(routes)
    })
    .workers(1)
    .bind(("127.0.0.1", config.server_port))
    .map_err(|e| {
        log::error!("❌ Failed to bind to port {}: {}", config.server_port, e);
        e
    })?
    .run()
    .await;

    if let Err(e) = session.shutdown() {
        log::error!("❌ Failed to shut down session cleanly: {}", e);
    }
    log::warn!("🛑 Server stopped");
    result
}
