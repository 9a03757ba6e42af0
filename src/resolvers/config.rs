use super::{Refresh, ResolverStatus, Shared, Snapshot};
use crate::{
    api::ApiClient,
    chain::{ChainEvent, EventSender},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigState {
    pub season_id: Option<String>,
    pub season_year: Option<String>,
    pub category_id: Option<String>,
}

impl ConfigState {
    /// Everything downstream is gated on this.
    pub fn ready(&self) -> bool {
        self.season_id.is_some() && self.category_id.is_some()
    }
}

/// Discovers the active season and the target category. The whole chain
/// hangs off this resolver: a refresh that ends ready emits
/// [`ChainEvent::ConfigReady`] (exactly once per refresh), which the
/// dispatcher fans out to the standings and event resolvers.
pub struct ConfigResolver {
    client: Arc<ApiClient>,
    category_name: String,
    min_refresh_interval: Duration,
    last_attempt: Mutex<Option<Instant>>,
    state: Shared<ConfigState>,
    events: EventSender,
}

impl ConfigResolver {
    pub fn new(
        client: Arc<ApiClient>,
        category_name: String,
        min_refresh_interval: Duration,
        events: EventSender,
    ) -> Self {
        Self {
            client,
            category_name,
            min_refresh_interval,
            last_attempt: Mutex::new(None),
            state: Shared::new(),
            events,
        }
    }

    pub fn state(&self) -> &Shared<ConfigState> {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot<ConfigState> {
        self.state.snapshot()
    }

    pub fn is_ready(&self) -> bool {
        self.state.snapshot().data.ready()
    }

    /// Coalesces refresh attempts: at most one per `min_refresh_interval`,
    /// calls inside the window return without fetching.
    fn begin_attempt(&self) -> bool {
        let mut last_attempt = self.last_attempt.lock();
        if let Some(previous) = *last_attempt {
            if previous.elapsed() < self.min_refresh_interval {
                return false;
            }
        }
        *last_attempt = Some(Instant::now());
        true
    }
}

#[async_trait]
impl Refresh for ConfigResolver {
    async fn refresh(&self) {
        if !self.begin_attempt() {
            log::debug!("[config] refresh coalesced, inside the minimum interval");
            return;
        }

        let seasons = match self.client.seasons().await {
            Ok(seasons) => seasons,
            Err(err) => {
                log::error!("[config] couldn't fetch seasons: {err}");
                self.state
                    .publish(ResolverStatus::Unavailable, ConfigState::default());
                return;
            }
        };

        let current = seasons.into_iter().find(|season| season.current);
        let (season_id, season_year) = match current {
            Some(season) => (Some(season.id), season.year.map(|year| year.to_string())),
            None => {
                log::warn!("[config] no season flagged current");
                (None, None)
            }
        };

        let mut category_id = None;
        if let Some(season) = season_id.as_deref() {
            match self.client.categories(season).await {
                Ok(categories) => {
                    category_id = categories
                        .into_iter()
                        .find(|category| category.name == self.category_name)
                        .map(|category| category.id);
                    if category_id.is_none() {
                        log::warn!("[config] category '{}' not found", self.category_name);
                    }
                }
                Err(err) => {
                    log::error!("[config] couldn't fetch categories: {err}");
                    self.state.publish(
                        ResolverStatus::Unavailable,
                        ConfigState {
                            season_id: Some(season.to_string()),
                            season_year,
                            category_id: None,
                        },
                    );
                    return;
                }
            }
        }

        let data = ConfigState {
            season_id,
            season_year,
            category_id,
        };
        let ready = data.ready();
        log::debug!(
            "[config] season: {:?}, category: {:?}, ready: {ready}",
            data.season_id,
            data.category_id
        );
        self.state.publish(
            if ready {
                ResolverStatus::Ok
            } else {
                ResolverStatus::Waiting
            },
            data,
        );
        if ready {
            self.events.emit(ChainEvent::ConfigReady);
        }
    }
}
