use actix_web::{test, web, App};
use chrono::FixedOffset;
use motogp_tracker::{
    api::ApiClient,
    chain::{event_channel, Chain, ChainOptions},
    http_server::{handlers, RenderContext},
    resolvers::{config::ConfigState, ResolverStatus},
};
use pretty_assertions::assert_eq;
use std::{sync::Arc, time::Duration};

fn idle_chain() -> Chain {
    let client = Arc::new(
        ApiClient::new("http://127.0.0.1:0/".parse().unwrap(), 1).expect("client should build"),
    );
    let (sender, _receiver) = event_channel();
    let options = ChainOptions {
        category: "MotoGP™".to_string(),
        min_refresh_interval: Duration::ZERO,
    };
    Chain::new(client, options, sender)
}

fn render_context() -> RenderContext {
    RenderContext {
        display_offset: FixedOffset::east_opt(2 * 3600).unwrap(),
    }
}

#[actix_web::test]
async fn health_responds_ok() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(idle_chain()))
            .app_data(web::Data::new(render_context()))
            .configure(handlers::configure),
    )
    .await;

    let request = test::TestRequest::get().uri("/health").to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());
}

#[actix_web::test]
async fn config_endpoint_reports_uninitialized_state() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(idle_chain()))
            .app_data(web::Data::new(render_context()))
            .configure(handlers::configure),
    )
    .await;

    let request = test::TestRequest::get().uri("/api/v1/config").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!("unknown", body["status"]);
    assert_eq!(false, body["is_ready"]);
    assert!(body["season_id"].is_null());
}

#[actix_web::test]
async fn event_endpoint_distinguishes_no_upcoming_event_from_waiting() {
    let chain = idle_chain();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(chain.clone()))
            .app_data(web::Data::new(render_context()))
            .configure(handlers::configure),
    )
    .await;

    chain.event.state().mark(ResolverStatus::Waiting);
    let request = test::TestRequest::get().uri("/api/v1/event").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!("waiting", body["value"]);

    chain.event.state().publish(ResolverStatus::Ok, Default::default());
    let request = test::TestRequest::get().uri("/api/v1/event").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!("no_upcoming_event", body["value"]);
    assert!(body["html"].is_null());
}

#[actix_web::test]
async fn config_endpoint_serializes_resolved_ids() {
    let chain = idle_chain();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(chain.clone()))
            .app_data(web::Data::new(render_context()))
            .configure(handlers::configure),
    )
    .await;

    chain.config.state().publish(
        ResolverStatus::Ok,
        ConfigState {
            season_id: Some("season-2025".to_string()),
            season_year: Some("2025".to_string()),
            category_id: Some("cat-motogp".to_string()),
        },
    );

    let request = test::TestRequest::get().uri("/api/v1/config").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!("ok", body["status"]);
    assert_eq!("ok", body["value"]);
    assert_eq!("season-2025", body["season_id"]);
    assert_eq!(true, body["is_ready"]);
    assert!(!body["last_update"].is_null());
}
