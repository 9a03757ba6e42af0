use super::{sessions::SessionListState, sessions::SessionKind, ResolverStatus, Shared, Snapshot};
use crate::chain::{ChainEvent, EventSender};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RaceStart {
    pub session_id: String,
    pub start: Option<DateTime<Utc>>,
}

/// `race: None` with status `Ok` is "no race found" — a valid terminal
/// state for events without a race session, not an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RaceStartState {
    pub race: Option<RaceStart>,
}

/// Pure derivation over the session list: exposes the race session's start
/// time. No network call.
pub struct RaceStartProjector {
    sessions: Shared<SessionListState>,
    state: Shared<RaceStartState>,
    events: EventSender,
}

impl RaceStartProjector {
    pub fn new(sessions: Shared<SessionListState>, events: EventSender) -> Self {
        Self {
            sessions,
            state: Shared::new(),
            events,
        }
    }

    pub fn snapshot(&self) -> Snapshot<RaceStartState> {
        self.state.snapshot()
    }

    pub fn refresh(&self) {
        let sessions = self.sessions.snapshot().data;
        if sessions.sessions.is_empty() {
            self.state.mark(ResolverStatus::Unavailable);
            return;
        }
        let race = sessions
            .sessions
            .iter()
            .find(|session| session.kind == SessionKind::Rac)
            .map(|session| RaceStart {
                session_id: session.id.clone(),
                start: session.start,
            });
        match &race {
            Some(race) => log::info!("[race-start] next race starts at {:?}", race.start),
            None => log::info!("[race-start] no race session in the current event"),
        }
        self.state.publish(ResolverStatus::Ok, RaceStartState { race });
        self.events.emit(ChainEvent::RaceStartResolved);
    }
}
