//! Pure projections of [`AppState`] into display data
//!
//! Each surface has a projection function that reads the state (and a
//! reference "now" where relative times are involved) and returns a plain
//! display structure. [`Displays`] keeps the latest projection of every
//! surface; re-rendering a surface replaces its display wholesale.

pub mod activity;
pub mod charts;
pub mod chat;
pub mod connections;
pub mod dashboard;
pub mod format;
pub mod pools;
pub mod settings;
pub mod usage;

use chrono::{DateTime, Utc};

use crate::state::AppState;

pub use activity::{ActivityDisplay, ActivityRow};
pub use charts::{DailyTokens, ProviderShare};
pub use chat::{ChatDisplay, ChatLine};
pub use connections::{ConnectionCard, ConnectionsDisplay};
pub use dashboard::DashboardDisplay;
pub use pools::{utilization, PoolCard, PoolsDisplay, Utilization};
pub use settings::SettingsDisplay;
pub use usage::{PersonalUsage, PoolContribution, UsageDisplay, UsageRow};

/// A render target whose display data is replaced as a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Dashboard,
    Activity,
    Connections,
    Pools,
    Usage,
    Chat,
    Settings,
}

impl Surface {
    pub const ALL: [Surface; 7] = [
        Surface::Dashboard,
        Surface::Activity,
        Surface::Connections,
        Surface::Pools,
        Surface::Usage,
        Surface::Chat,
        Surface::Settings,
    ];

    fn index(self) -> usize {
        match self {
            Surface::Dashboard => 0,
            Surface::Activity => 1,
            Surface::Connections => 2,
            Surface::Pools => 3,
            Surface::Usage => 4,
            Surface::Chat => 5,
            Surface::Settings => 6,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Displays {
    pub dashboard: DashboardDisplay,
    pub activity: ActivityDisplay,
    pub connections: ConnectionsDisplay,
    pub pools: PoolsDisplay,
    pub usage: UsageDisplay,
    pub chat: ChatDisplay,
    pub settings: SettingsDisplay,
    renders: [u64; 7],
}

impl Displays {
    /// Project every surface once.
    pub fn build(state: &AppState, now: DateTime<Utc>) -> Self {
        Self {
            dashboard: dashboard::dashboard(state, now),
            activity: activity::activity(state),
            connections: connections::connections(state, now),
            pools: pools::pools(state),
            usage: usage::usage(state, now),
            chat: chat::chat(state, now),
            settings: settings::settings(state),
            renders: [1; 7],
        }
    }

    pub fn render(&mut self, surface: Surface, state: &AppState, now: DateTime<Utc>) {
        match surface {
            Surface::Dashboard => self.dashboard = dashboard::dashboard(state, now),
            Surface::Activity => self.activity = activity::activity(state),
            Surface::Connections => self.connections = connections::connections(state, now),
            Surface::Pools => self.pools = pools::pools(state),
            Surface::Usage => self.usage = usage::usage(state, now),
            Surface::Chat => self.chat = chat::chat(state, now),
            Surface::Settings => self.settings = settings::settings(state),
        }
        self.renders[surface.index()] += 1;
    }

    /// How many times `surface` has been projected, including the initial build.
    pub fn render_count(&self, surface: Surface) -> u64 {
        self.renders[surface.index()]
    }
}
