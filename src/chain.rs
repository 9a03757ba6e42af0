//! The update-propagation chain. Resolvers never call each other directly:
//! a successful refresh emits a [`ChainEvent`], and the dispatcher task maps
//! each event to its downstream refreshes. Fetching resolvers run as
//! independent fire-and-forget tasks; derived resolvers run inline on the
//! dispatcher task.

use crate::{
    api::ApiClient,
    resolvers::{
        config::ConfigResolver, event::EventResolver, live_timing::LiveTimingResolver,
        race_start::RaceStartProjector, sessions::SessionResolver, standings::StandingsResolver,
        teams::TeamAggregator, Refresh,
    },
};
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEvent {
    ConfigReady,
    StandingsUpdated,
    EventResolved,
    SessionsUpdated,
    RaceStartResolved,
}

#[derive(Clone)]
pub struct EventSender(UnboundedSender<ChainEvent>);

impl EventSender {
    pub fn emit(&self, event: ChainEvent) {
        if self.0.send(event).is_err() {
            log::debug!("chain dispatcher stopped, {event:?} dropped");
        }
    }
}

pub fn event_channel() -> (EventSender, UnboundedReceiver<ChainEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (EventSender(sender), receiver)
}

#[derive(Debug, Clone)]
pub struct ChainOptions {
    /// Exact category label to resolve, e.g. "MotoGP™".
    pub category: String,
    /// Config refreshes inside this interval are coalesced, not queued.
    pub min_refresh_interval: Duration,
}

#[derive(Clone)]
pub struct Chain {
    pub config: Arc<ConfigResolver>,
    pub standings: Arc<StandingsResolver>,
    pub teams: Arc<TeamAggregator>,
    pub event: Arc<EventResolver>,
    pub sessions: Arc<SessionResolver>,
    pub race_start: Arc<RaceStartProjector>,
    pub live_timing: Arc<LiveTimingResolver>,
}

impl Chain {
    /// Builds the chain bottom-up; each resolver receives read handles of
    /// the states it depends on instead of looking peers up in a registry.
    pub fn new(client: Arc<ApiClient>, options: ChainOptions, events: EventSender) -> Self {
        let config = Arc::new(ConfigResolver::new(
            client.clone(),
            options.category,
            options.min_refresh_interval,
            events.clone(),
        ));
        let standings = Arc::new(StandingsResolver::new(
            client.clone(),
            config.state().clone(),
            events.clone(),
        ));
        let teams = Arc::new(TeamAggregator::new(standings.state().clone()));
        let event = Arc::new(EventResolver::new(
            client.clone(),
            config.state().clone(),
            events.clone(),
        ));
        let sessions = Arc::new(SessionResolver::new(
            client.clone(),
            config.state().clone(),
            event.state().clone(),
            events.clone(),
        ));
        let race_start = Arc::new(RaceStartProjector::new(sessions.state().clone(), events));
        let live_timing = Arc::new(LiveTimingResolver::new(client, sessions.state().clone()));
        Self {
            config,
            standings,
            teams,
            event,
            sessions,
            race_start,
            live_timing,
        }
    }
}

fn spawn_refresh<R: Refresh + 'static>(resolver: &Arc<R>) {
    let resolver = resolver.clone();
    tokio::spawn(async move { resolver.refresh().await });
}

pub fn spawn_dispatcher(
    chain: Chain,
    mut events: UnboundedReceiver<ChainEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            log::debug!("chain event: {event:?}");
            match event {
                ChainEvent::ConfigReady => {
                    spawn_refresh(&chain.standings);
                    spawn_refresh(&chain.event);
                }
                ChainEvent::StandingsUpdated => chain.teams.refresh(),
                ChainEvent::EventResolved => spawn_refresh(&chain.sessions),
                ChainEvent::SessionsUpdated => chain.race_start.refresh(),
                ChainEvent::RaceStartResolved => spawn_refresh(&chain.live_timing),
            }
        }
        log::debug!("chain event channel closed, dispatcher exits");
    })
}
