use super::{config::ConfigState, Refresh, ResolverStatus, Shared, Snapshot};
use crate::{
    api::{types::StandingsResponse, ApiClient},
    chain::{ChainEvent, EventSender},
};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct RiderEntry {
    pub position: u32,
    pub rider_name: String,
    pub team_name: String,
    pub points: i64,
    pub wins: u32,
    pub podiums: u32,
    pub country_code: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StandingsState {
    pub entries: Vec<RiderEntry>,
    pub file: Option<String>,
    pub xml_file: Option<String>,
}

impl StandingsState {
    fn from_response(response: StandingsResponse) -> Self {
        let (rows, file, xml_file) = match response {
            StandingsResponse::Classification {
                classification,
                file,
                xml_file,
            } => (classification, file, xml_file),
            StandingsResponse::Items { items } => (items, None, None),
            StandingsResponse::Bare(rows) => (rows, None, None),
            StandingsResponse::Unrecognized(value) => {
                log::warn!("[standings] unrecognized response shape: {value}");
                (Vec::new(), None, None)
            }
        };
        let entries = rows
            .into_iter()
            .map(|row| RiderEntry {
                position: row.position,
                rider_name: row
                    .rider
                    .as_ref()
                    .map(|rider| rider.full_name.clone())
                    .unwrap_or_default(),
                team_name: row
                    .team
                    .as_ref()
                    .map(|team| team.name.clone())
                    .unwrap_or_default(),
                points: row.points,
                wins: row.race_wins,
                podiums: row.podiums,
                country_code: row
                    .rider
                    .as_ref()
                    .and_then(|rider| rider.country.as_ref())
                    .map(|country| country.iso.to_lowercase())
                    .unwrap_or_default(),
            })
            .collect();
        Self {
            entries,
            file,
            xml_file,
        }
    }
}

/// Fetches the rider points table for the resolved (season, category).
pub struct StandingsResolver {
    client: Arc<ApiClient>,
    config: Shared<ConfigState>,
    state: Shared<StandingsState>,
    events: EventSender,
}

impl StandingsResolver {
    pub fn new(client: Arc<ApiClient>, config: Shared<ConfigState>, events: EventSender) -> Self {
        Self {
            client,
            config,
            state: Shared::new(),
            events,
        }
    }

    pub fn state(&self) -> &Shared<StandingsState> {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot<StandingsState> {
        self.state.snapshot()
    }
}

#[async_trait]
impl Refresh for StandingsResolver {
    async fn refresh(&self) {
        let config = self.config.snapshot().data;
        let (Some(season_id), Some(category_id)) = (config.season_id, config.category_id) else {
            log::debug!("[standings] waiting for configuration");
            self.state.mark(ResolverStatus::Waiting);
            return;
        };

        let response = match self.client.standings(&season_id, &category_id).await {
            Ok(response) => response,
            Err(err) => {
                log::error!("[standings] fetch failed: {err}");
                self.state.mark(ResolverStatus::Unavailable);
                return;
            }
        };

        let data = StandingsState::from_response(response);
        log::debug!("[standings] {} entries", data.entries.len());
        self.state.publish(ResolverStatus::Ok, data);
        self.events.emit(ChainEvent::StandingsUpdated);
    }
}
