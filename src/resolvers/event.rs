use super::{config::ConfigState, Refresh, ResolverStatus, Shared, Snapshot};
use crate::{
    api::{types::ApiEvent, ApiClient},
    chain::{ChainEvent, EventSender},
    circuits, datetime,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct NextEvent {
    pub event_id: String,
    pub name: String,
    pub country_name: String,
    pub country_iso: String,
    pub circuit_name: String,
    pub circuit_slug: String,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub status: String,
}

/// `event: None` with status `Ok` is the explicit "no upcoming event"
/// state; it is not an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventState {
    pub event: Option<NextEvent>,
}

/// Determines the next (or currently ongoing) event of the season.
pub struct EventResolver {
    client: Arc<ApiClient>,
    config: Shared<ConfigState>,
    state: Shared<EventState>,
    events: EventSender,
}

impl EventResolver {
    pub fn new(client: Arc<ApiClient>, config: Shared<ConfigState>, events: EventSender) -> Self {
        Self {
            client,
            config,
            state: Shared::new(),
            events,
        }
    }

    pub fn state(&self) -> &Shared<EventState> {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot<EventState> {
        self.state.snapshot()
    }
}

#[async_trait]
impl Refresh for EventResolver {
    async fn refresh(&self) {
        let config = self.config.snapshot().data;
        if !config.ready() {
            log::debug!("[event] waiting for configuration");
            self.state.mark(ResolverStatus::Waiting);
            return;
        }
        let season_id = config.season_id.unwrap_or_default();

        let all_events = match self.client.events(&season_id).await {
            Ok(events) => events,
            Err(err) => {
                log::error!("[event] fetch failed: {err}");
                self.state.mark(ResolverStatus::Unavailable);
                return;
            }
        };

        let Some(selected) = select_event(&all_events, Utc::now()) else {
            log::info!("[event] no upcoming event in season {season_id}");
            self.state.publish(ResolverStatus::Ok, EventState::default());
            return;
        };

        let Some(event_id) = selected.event_id() else {
            log::warn!("[event] selected event '{}' carries no id", selected.name);
            self.state.publish(ResolverStatus::Ok, EventState::default());
            return;
        };

        let circuit_name = selected
            .circuit
            .as_ref()
            .map(|circuit| {
                if circuit.name.is_empty() {
                    circuit.place.clone()
                } else {
                    circuit.name.clone()
                }
            })
            .unwrap_or_default();
        let circuit_slug = circuits::slug_for(&circuit_name).unwrap_or_else(|| {
            log::warn!("[event] no slug for circuit '{circuit_name}'");
            ""
        });

        let next = NextEvent {
            event_id: event_id.to_string(),
            name: selected.name.clone(),
            country_name: selected
                .country
                .as_ref()
                .map(|country| country.name.clone())
                .unwrap_or_default(),
            country_iso: selected
                .country
                .as_ref()
                .map(|country| country.iso.to_lowercase())
                .unwrap_or_default(),
            circuit_name,
            circuit_slug: circuit_slug.to_string(),
            date_start: selected.date_start.as_deref().and_then(datetime::parse_utc),
            date_end: selected.date_end.as_deref().and_then(datetime::parse_utc),
            status: selected.status.clone(),
        };
        log::info!(
            "[event] next event: {} ({:?}), slug: '{}'",
            next.name,
            next.date_start,
            next.circuit_slug
        );
        self.state
            .publish(ResolverStatus::Ok, EventState { event: Some(next) });
        self.events.emit(ChainEvent::EventResolved);
    }
}

/// Selection rule: an event with status CURRENT always wins (multiple
/// CURRENT entries are not guarded upstream; the last one encountered wins,
/// as an arbitrary tie-break). Otherwise the earliest start among events
/// that are NOT-STARTED/UPCOMING or start strictly after `now`. Events
/// without a parseable start date are skipped.
pub fn select_event(events: &[ApiEvent], now: DateTime<Utc>) -> Option<&ApiEvent> {
    let mut ongoing = None;
    let mut upcoming: Option<(DateTime<Utc>, &ApiEvent)> = None;
    for event in events {
        let status = event.status.to_ascii_uppercase();
        let Some(start) = event.date_start.as_deref().and_then(datetime::parse_utc) else {
            log::debug!("[event] skipping '{}', unparseable start date", event.name);
            continue;
        };
        if status == "CURRENT" {
            ongoing = Some(event);
        } else if matches!(status.as_str(), "NOT-STARTED" | "UPCOMING") || start > now {
            match upcoming {
                Some((best, _)) if best <= start => {}
                _ => upcoming = Some((start, event)),
            }
        }
    }
    ongoing.or(upcoming.map(|(_, event)| event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn event(name: &str, status: &str, start: &str) -> ApiEvent {
        serde_json::from_value(json!({
            "id": name,
            "name": name,
            "status": status,
            "date_start": start,
        }))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        datetime::parse_utc("2025-06-15T12:00:00Z").unwrap()
    }

    #[test]
    fn current_wins_regardless_of_ordering() {
        let events = vec![
            event("finished", "FINISHED", "2025-06-05T12:00:00Z"),
            event("current", "CURRENT", "2025-06-14T12:00:00Z"),
            event("upcoming", "UPCOMING", "2025-06-20T12:00:00Z"),
        ];
        assert_eq!("current", select_event(&events, now()).unwrap().name);
    }

    #[test]
    fn earliest_upcoming_without_current() {
        let events = vec![
            event("later", "UPCOMING", "2025-06-25T12:00:00Z"),
            event("sooner", "UPCOMING", "2025-06-17T12:00:00Z"),
        ];
        assert_eq!("sooner", select_event(&events, now()).unwrap().name);
    }

    #[test]
    fn future_start_counts_even_with_odd_status() {
        let events = vec![event("odd", "TBC", "2025-07-01T12:00:00Z")];
        assert_eq!("odd", select_event(&events, now()).unwrap().name);
    }

    #[test]
    fn no_candidate_yields_none() {
        let events = vec![
            event("done", "FINISHED", "2025-05-01T12:00:00Z"),
            event("broken", "UPCOMING", "not a date"),
        ];
        assert!(select_event(&events, now()).is_none());
    }

    #[test]
    fn last_current_wins_the_tie() {
        let events = vec![
            event("first-current", "CURRENT", "2025-06-14T12:00:00Z"),
            event("second-current", "CURRENT", "2025-06-14T13:00:00Z"),
        ];
        assert_eq!(
            "second-current",
            select_event(&events, now()).unwrap().name
        );
    }
}
