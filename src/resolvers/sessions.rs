use super::{
    config::ConfigState, event::EventState, Refresh, ResolverStatus, Shared, Snapshot,
};
use crate::{
    api::{types::ApiSession, ApiClient},
    chain::{ChainEvent, EventSender},
    datetime,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionKind {
    Fp,
    Pr,
    Q,
    Spr,
    Rac,
}

impl SessionKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "FP" => Some(SessionKind::Fp),
            "PR" => Some(SessionKind::Pr),
            "Q" => Some(SessionKind::Q),
            "SPR" => Some(SessionKind::Spr),
            "RAC" => Some(SessionKind::Rac),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Fp => "Free Practice",
            SessionKind::Pr => "Practice",
            SessionKind::Q => "Qualifying",
            SessionKind::Spr => "Sprint",
            SessionKind::Rac => "Race",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionEntry {
    pub id: String,
    pub kind: SessionKind,
    pub start: Option<DateTime<Utc>>,
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionListState {
    pub event_id: Option<String>,
    pub sessions: Vec<SessionEntry>,
    pub race_session_id: Option<String>,
}

/// Fetches the session list of the resolved event, keeping only the known
/// session kinds, and extracts the race session id.
pub struct SessionResolver {
    client: Arc<ApiClient>,
    config: Shared<ConfigState>,
    event: Shared<EventState>,
    state: Shared<SessionListState>,
    events: EventSender,
}

impl SessionResolver {
    pub fn new(
        client: Arc<ApiClient>,
        config: Shared<ConfigState>,
        event: Shared<EventState>,
        events: EventSender,
    ) -> Self {
        Self {
            client,
            config,
            event,
            state: Shared::new(),
            events,
        }
    }

    pub fn state(&self) -> &Shared<SessionListState> {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot<SessionListState> {
        self.state.snapshot()
    }
}

#[async_trait]
impl Refresh for SessionResolver {
    async fn refresh(&self) {
        let config = self.config.snapshot().data;
        let event_id = self
            .event
            .snapshot()
            .data
            .event
            .map(|event| event.event_id);
        let (true, Some(category_id), Some(event_id)) =
            (config.ready(), config.category_id, event_id)
        else {
            log::debug!("[sessions] waiting for configuration or event");
            self.state.mark(ResolverStatus::Waiting);
            return;
        };

        let raw = match self.client.sessions(&event_id, &category_id).await {
            Ok(raw) => raw,
            Err(err) => {
                log::error!("[sessions] fetch failed: {err}");
                self.state.mark(ResolverStatus::Unavailable);
                return;
            }
        };

        let (sessions, race_session_id) = build_session_list(raw);
        log::info!(
            "[sessions] {} sessions for event {event_id}, race session: {race_session_id:?}",
            sessions.len()
        );
        self.state.publish(
            ResolverStatus::Ok,
            SessionListState {
                event_id: Some(event_id),
                sessions,
                race_session_id,
            },
        );
        // Signalled even when no race session exists; the projector exposes
        // that as its own terminal state.
        self.events.emit(ChainEvent::SessionsUpdated);
    }
}

/// Filters to the fixed session-kind set and sorts ascending by start time.
/// Entries with unparseable start times sort last.
pub fn build_session_list(raw: Vec<ApiSession>) -> (Vec<SessionEntry>, Option<String>) {
    let mut sessions: Vec<SessionEntry> = raw
        .into_iter()
        .filter_map(|session| {
            let kind = SessionKind::parse(&session.kind)?;
            Some(SessionEntry {
                id: session.id.unwrap_or_default(),
                kind,
                start: session.date.as_deref().and_then(datetime::parse_utc),
                status: session.status,
            })
        })
        .collect();
    sessions.sort_by_key(|session| session.start.unwrap_or(DateTime::<Utc>::MAX_UTC));
    let race_session_id = sessions
        .iter()
        .find(|session| session.kind == SessionKind::Rac)
        .map(|session| session.id.clone());
    (sessions, race_session_id)
}
