use super::{
    standings::{RiderEntry, StandingsState},
    ResolverStatus, Shared, Snapshot,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamEntry {
    pub team_name: String,
    pub points: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamStandingsState {
    pub entries: Vec<TeamEntry>,
}

/// Derives team totals from the standings resolver's in-memory entries.
/// No network call; recomputed wholesale on every trigger.
pub struct TeamAggregator {
    standings: Shared<StandingsState>,
    state: Shared<TeamStandingsState>,
}

impl TeamAggregator {
    pub fn new(standings: Shared<StandingsState>) -> Self {
        Self {
            standings,
            state: Shared::new(),
        }
    }

    pub fn snapshot(&self) -> Snapshot<TeamStandingsState> {
        self.state.snapshot()
    }

    pub fn refresh(&self) {
        let entries = self.standings.snapshot().data.entries;
        if entries.is_empty() {
            log::debug!("[teams] waiting for standings");
            self.state.mark(ResolverStatus::Waiting);
            return;
        }
        let totals = aggregate(&entries);
        log::debug!("[teams] {} teams ranked", totals.len());
        self.state
            .publish(ResolverStatus::Ok, TeamStandingsState { entries: totals });
    }
}

/// Groups rider points by team name (missing names fall into "Unknown")
/// and ranks by descending total. The sort is stable, so equal totals keep
/// first-seen order.
pub fn aggregate(entries: &[RiderEntry]) -> Vec<TeamEntry> {
    let mut totals: Vec<TeamEntry> = Vec::new();
    for rider in entries {
        let team = if rider.team_name.is_empty() {
            "Unknown"
        } else {
            rider.team_name.as_str()
        };
        match totals.iter_mut().find(|entry| entry.team_name == team) {
            Some(entry) => entry.points += rider.points,
            None => totals.push(TeamEntry {
                team_name: team.to_string(),
                points: rider.points,
            }),
        }
    }
    totals.sort_by(|a, b| b.points.cmp(&a.points));
    totals
}
