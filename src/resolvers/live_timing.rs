use super::{sessions::SessionListState, Refresh, ResolverStatus, Shared, Snapshot};
use crate::api::{types::LiveTimingResponse, ApiClient};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Rows without a positive position (crashed, pit lane, no data) sort after
/// everyone else.
const POSITION_SENTINEL: i64 = 999;

#[derive(Debug, Clone, Serialize)]
pub struct LiveRow {
    pub position: Option<i64>,
    pub number: String,
    pub rider: String,
    pub nation: String,
    pub team: String,
    pub bike: String,
    pub laps: Option<u32>,
    pub gap_first: String,
    pub last_lap: String,
    pub status: String,
    /// `status == "RT"`; the row is kept and flagged for presentation.
    pub retired: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LiveTimingState {
    pub race_session_id: Option<String>,
    pub session_status: String,
    pub total_laps: Option<u32>,
    pub rows: Vec<LiveRow>,
}

/// Fetches the live classification of the resolved race session.
pub struct LiveTimingResolver {
    client: Arc<ApiClient>,
    sessions: Shared<SessionListState>,
    state: Shared<LiveTimingState>,
}

impl LiveTimingResolver {
    pub fn new(client: Arc<ApiClient>, sessions: Shared<SessionListState>) -> Self {
        Self {
            client,
            sessions,
            state: Shared::new(),
        }
    }

    pub fn snapshot(&self) -> Snapshot<LiveTimingState> {
        self.state.snapshot()
    }
}

#[async_trait]
impl Refresh for LiveTimingResolver {
    async fn refresh(&self) {
        let Some(race_session_id) = self.sessions.snapshot().data.race_session_id else {
            log::debug!("[live-timing] waiting for a race session id");
            self.state.mark(ResolverStatus::Waiting);
            return;
        };

        let response = match self.client.live_timing(&race_session_id).await {
            Ok(response) => response,
            Err(err) => {
                log::error!("[live-timing] fetch failed: {err}");
                self.state.mark(ResolverStatus::Unavailable);
                return;
            }
        };

        let data = build_state(race_session_id, response);
        log::info!("[live-timing] {} riders classified", data.rows.len());
        self.state.publish(ResolverStatus::Ok, data);
    }
}

fn build_state(race_session_id: String, response: LiveTimingResponse) -> LiveTimingState {
    let mut rows: Vec<LiveRow> = response
        .rider
        .into_values()
        .map(|rider| LiveRow {
            position: rider.pos,
            number: rider.rider_number,
            rider: format!("{} {}", rider.rider_name, rider.rider_surname)
                .trim()
                .to_string(),
            nation: rider.rider_nation,
            team: rider.team_name,
            bike: rider.bike_name,
            laps: rider.num_lap,
            gap_first: rider.gap_first,
            last_lap: rider.last_lap_time,
            retired: rider.status_name == "RT",
            status: rider.status_name,
        })
        .collect();
    rows.sort_by_key(|row| sort_position(row.position));
    LiveTimingState {
        race_session_id: Some(race_session_id),
        session_status: response.head.session_status_name,
        total_laps: response.head.num_laps,
        rows,
    }
}

fn sort_position(position: Option<i64>) -> i64 {
    match position {
        Some(position) if position > 0 => position,
        _ => POSITION_SENTINEL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response(riders: serde_json::Value) -> LiveTimingResponse {
        serde_json::from_value(json!({
            "head": {"session_status_name": "RACE", "num_laps": 27},
            "rider": riders,
        }))
        .unwrap()
    }

    #[test]
    fn rows_sort_by_position_with_absent_last() {
        let response = response(json!({
            "r1": {"pos": 3, "rider_name": "A", "rider_surname": "One"},
            "r2": {"pos": -1, "rider_name": "B", "rider_surname": "Two"},
            "r3": {"pos": 1, "rider_name": "C", "rider_surname": "Three"},
            "r4": {"pos": null, "rider_name": "D", "rider_surname": "Four"},
            "r5": {"pos": 2, "rider_name": "E", "rider_surname": "Five"},
        }));
        let state = build_state("race-1".into(), response);
        let positions: Vec<Option<i64>> = state.rows.iter().map(|r| r.position).collect();
        assert_eq!(Some(1), positions[0]);
        assert_eq!(Some(2), positions[1]);
        assert_eq!(Some(3), positions[2]);
        // -1 and null both land in the sentinel tail.
        assert!(positions[3].map_or(true, |p| p <= 0));
        assert!(positions[4].map_or(true, |p| p <= 0));
        assert_eq!(Some(27), state.total_laps);
        assert_eq!("RACE", state.session_status);
    }

    #[test]
    fn retired_rider_is_flagged_but_kept() {
        let response = response(json!({
            "r1": {"pos": 5, "rider_name": "A", "rider_surname": "One", "status_name": "RT"},
        }));
        let state = build_state("race-1".into(), response);
        assert_eq!(1, state.rows.len());
        assert!(state.rows[0].retired);
        assert_eq!("RT", state.rows[0].status);
    }

    #[test]
    fn rider_name_is_joined_and_trimmed() {
        let response = response(json!({
            "r1": {"pos": 1, "rider_name": "", "rider_surname": "Solo"},
        }));
        let state = build_state("race-1".into(), response);
        assert_eq!("Solo", state.rows[0].rider);
    }
}
