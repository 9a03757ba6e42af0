pub mod handlers;

use crate::{
    api::ApiClient,
    chain::{self, Chain, ChainOptions},
    scheduler,
    settings::Settings,
};
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use chrono::FixedOffset;
use std::{sync::Arc, time::Duration};

/// Presentation knobs shared with the handlers.
#[derive(Clone)]
pub struct RenderContext {
    pub display_offset: FixedOffset,
}

pub async fn run(settings: Settings) -> Result<(), anyhow::Error> {
    let client = Arc::new(
        ApiClient::new(settings.api.base_url.clone(), settings.api.request_timeout)
            .context("couldn't build the api client")?,
    );
    let (events, receiver) = chain::event_channel();
    let options = ChainOptions {
        category: settings.tracker.category.clone(),
        min_refresh_interval: Duration::from_secs(settings.tracker.min_refresh_interval),
    };
    let chain = Chain::new(client, options, events);
    chain::spawn_dispatcher(chain.clone(), receiver);

    supervise_startup(
        &chain,
        settings.tracker.startup_attempts,
        Duration::from_secs(settings.tracker.startup_retry_delay),
    );
    scheduler::spawn_job(
        settings.tracker.refresh_schedule.clone(),
        "refresh configuration",
        chain.config.clone(),
    );

    let display_offset = FixedOffset::east_opt(settings.tracker.display_utc_offset_hours * 3600)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
    let render = RenderContext { display_offset };

    let socket_addr = settings.server.addr;
    log::info!("motogp tracker is starting at {socket_addr}");
    let chain_data = web::Data::new(chain);
    let render_data = web::Data::new(render);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(chain_data.clone())
            .app_data(render_data.clone())
            .configure(handlers::configure)
    })
    .bind(socket_addr)?
    .run()
    .await?;
    Ok(())
}

/// One initial refresh, then a bounded wait for readiness. If the config
/// never resolves, the scheduled job keeps retrying; downstream resolvers
/// report "waiting" until then.
fn supervise_startup(chain: &Chain, attempts: u32, delay: Duration) {
    use crate::resolvers::Refresh;

    let config = chain.config.clone();
    tokio::spawn(async move {
        config.refresh().await;
        for _ in 0..attempts {
            if config.is_ready() {
                log::info!("configuration resolved, chain is running");
                return;
            }
            tokio::time::sleep(delay).await;
        }
        log::warn!(
            "configuration not ready after {attempts} checks; the scheduled refresh will retry"
        );
    });
}
