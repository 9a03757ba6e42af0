use super::RenderContext;
use crate::{chain::Chain, datetime, render, resolvers::ResolverStatus};
use actix_web::{web, HttpResponse};
use serde_json::json;

pub fn configure(config: &mut web::ServiceConfig) {
    config.route("/health", web::get().to(health)).service(
        web::scope("/api/v1")
            .route("/config", web::get().to(config_state))
            .route("/standings", web::get().to(standings))
            .route("/teams", web::get().to(teams))
            .route("/event", web::get().to(event))
            .route("/sessions", web::get().to(sessions))
            .route("/race-start", web::get().to(race_start))
            .route("/live-timing", web::get().to(live_timing))
            .route("/refresh", web::post().to(refresh)),
    );
}

async fn health() -> &'static str {
    "ok"
}

/// Fire-and-forget trigger for the chain head; the dispatcher takes it
/// from there.
async fn refresh(chain: web::Data<Chain>) -> HttpResponse {
    use crate::resolvers::Refresh;

    let config = chain.config.clone();
    tokio::spawn(async move { config.refresh().await });
    HttpResponse::Accepted().finish()
}

async fn config_state(chain: web::Data<Chain>) -> HttpResponse {
    let snapshot = chain.config.snapshot();
    let ready = snapshot.data.ready();
    HttpResponse::Ok().json(json!({
        "status": snapshot.status.word(),
        "value": if ready { "ok" } else { snapshot.status.word() },
        "season_id": snapshot.data.season_id,
        "year": snapshot.data.season_year,
        "category_id": snapshot.data.category_id,
        "is_ready": ready,
        "last_update": snapshot.last_update,
    }))
}

async fn standings(chain: web::Data<Chain>) -> HttpResponse {
    let snapshot = chain.standings.snapshot();
    HttpResponse::Ok().json(json!({
        "status": snapshot.status.word(),
        "value": snapshot.status.word(),
        "count": snapshot.data.entries.len(),
        "standings": snapshot.data.entries,
        "pdf_file": snapshot.data.file,
        "xml_file": snapshot.data.xml_file,
        "html": render::standings_table(&snapshot.data.entries),
        "last_update": snapshot.last_update,
    }))
}

async fn teams(chain: web::Data<Chain>) -> HttpResponse {
    let snapshot = chain.teams.snapshot();
    HttpResponse::Ok().json(json!({
        "status": snapshot.status.word(),
        "value": snapshot.status.word(),
        "count": snapshot.data.entries.len(),
        "teams_standings": snapshot.data.entries,
        "html": render::teams_table(&snapshot.data.entries),
        "last_update": snapshot.last_update,
    }))
}

async fn event(chain: web::Data<Chain>, render_ctx: web::Data<RenderContext>) -> HttpResponse {
    let snapshot = chain.event.snapshot();
    let value = match (snapshot.status, &snapshot.data.event) {
        (ResolverStatus::Ok, Some(event)) => event.name.clone(),
        (ResolverStatus::Ok, None) => "no_upcoming_event".to_string(),
        (status, _) => status.word().to_string(),
    };
    let html = snapshot
        .data
        .event
        .as_ref()
        .map(|event| render::event_card(event, render_ctx.display_offset));
    HttpResponse::Ok().json(json!({
        "status": snapshot.status.word(),
        "value": value,
        "event": snapshot.data.event,
        "html": html,
        "last_update": snapshot.last_update,
    }))
}

async fn sessions(chain: web::Data<Chain>, render_ctx: web::Data<RenderContext>) -> HttpResponse {
    let snapshot = chain.sessions.snapshot();
    HttpResponse::Ok().json(json!({
        "status": snapshot.status.word(),
        "value": snapshot.status.word(),
        "event_id": snapshot.data.event_id,
        "count": snapshot.data.sessions.len(),
        "sessions": snapshot.data.sessions,
        "race_session_id": snapshot.data.race_session_id,
        "html": render::sessions_table(&snapshot.data.sessions, render_ctx.display_offset),
        "last_update": snapshot.last_update,
    }))
}

async fn race_start(chain: web::Data<Chain>, render_ctx: web::Data<RenderContext>) -> HttpResponse {
    let snapshot = chain.race_start.snapshot();
    let value = match (snapshot.status, &snapshot.data.race) {
        (ResolverStatus::Ok, Some(race)) => {
            datetime::to_display(race.start, render_ctx.display_offset)
        }
        (ResolverStatus::Ok, None) => "no_race_found".to_string(),
        (status, _) => status.word().to_string(),
    };
    HttpResponse::Ok().json(json!({
        "status": snapshot.status.word(),
        "value": value,
        "race": snapshot.data.race,
        "last_update": snapshot.last_update,
    }))
}

async fn live_timing(chain: web::Data<Chain>) -> HttpResponse {
    let snapshot = chain.live_timing.snapshot();
    HttpResponse::Ok().json(json!({
        "status": snapshot.status.word(),
        "value": snapshot.status.word(),
        "count": snapshot.data.rows.len(),
        "race_session_id": snapshot.data.race_session_id,
        "session_status": snapshot.data.session_status,
        "total_laps": snapshot.data.total_laps,
        "classification": snapshot.data.rows,
        "html": render::live_table(&snapshot.data.rows),
        "last_update": snapshot.last_update,
    }))
}
