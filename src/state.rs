//! Explicit state container owned by the controller

use crate::domain::{
    ActivityEvent, ChatMessage, Connection, Pool, RouterSettings, RoutingTarget, Theme,
    UsagePeriod, UsageRecord, User,
};

/// Maximum number of entries kept in the activity feed
pub const ACTIVITY_CAP: usize = 10;

/// The views a user can switch between
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewId {
    Dashboard,
    Connections,
    Pools,
    Usage,
    Chat,
    Settings,
}

impl ViewId {
    pub const ALL: [ViewId; 6] = [
        ViewId::Dashboard,
        ViewId::Connections,
        ViewId::Pools,
        ViewId::Usage,
        ViewId::Chat,
        ViewId::Settings,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "dashboard" => Some(ViewId::Dashboard),
            "connections" => Some(ViewId::Connections),
            "pools" => Some(ViewId::Pools),
            "usage" => Some(ViewId::Usage),
            "chat" => Some(ViewId::Chat),
            "settings" => Some(ViewId::Settings),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            ViewId::Dashboard => "dashboard",
            ViewId::Connections => "connections",
            ViewId::Pools => "pools",
            ViewId::Usage => "usage",
            ViewId::Chat => "chat",
            ViewId::Settings => "settings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewId::Dashboard => "Dashboard",
            ViewId::Connections => "Connections",
            ViewId::Pools => "Pools",
            ViewId::Usage => "Usage",
            ViewId::Chat => "Chat",
            ViewId::Settings => "Settings",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            ViewId::Dashboard => '1',
            ViewId::Connections => '2',
            ViewId::Pools => '3',
            ViewId::Usage => '4',
            ViewId::Chat => '5',
            ViewId::Settings => '6',
        }
    }

    pub fn from_shortcut(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.shortcut() == key)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub user: User,
    pub connections: Vec<Connection>,
    pub pools: Vec<Pool>,
    pub usage_history: Vec<UsageRecord>,
    pub chat: Vec<ChatMessage>,
    /// Set once the scripted chat intro has been scheduled
    pub chat_seeded: bool,
    /// Newest first
    pub activity: Vec<ActivityEvent>,
    pub current_view: ViewId,
    pub theme: Theme,
    pub settings: RouterSettings,
    pub routing_target: RoutingTarget,
    pub usage_period: UsagePeriod,
}

impl AppState {
    pub fn empty(user: User) -> Self {
        Self {
            user,
            connections: Vec::new(),
            pools: Vec::new(),
            usage_history: Vec::new(),
            chat: Vec::new(),
            chat_seeded: false,
            activity: Vec::new(),
            current_view: ViewId::Dashboard,
            theme: Theme::default(),
            settings: RouterSettings::default(),
            routing_target: RoutingTarget::Auto,
            usage_period: UsagePeriod::default(),
        }
    }

    /// Prepend an event and drop anything past the feed cap.
    pub fn record_activity(&mut self, event: ActivityEvent) {
        self.activity.insert(0, event);
        self.activity.truncate(ACTIVITY_CAP);
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn connection_mut(&mut self, id: &str) -> Option<&mut Connection> {
        self.connections.iter_mut().find(|c| c.id == id)
    }

    pub fn pool(&self, id: &str) -> Option<&Pool> {
        self.pools.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActivityKind;

    fn user() -> User {
        User {
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
        }
    }

    #[test]
    fn test_record_activity_caps_feed() {
        let mut state = AppState::empty(user());
        for i in 0..15 {
            state.record_activity(ActivityEvent::now(ActivityKind::Chat, format!("event {i}")));
        }
        assert_eq!(state.activity.len(), ACTIVITY_CAP);
        assert_eq!(state.activity[0].message, "event 14");
        assert_eq!(state.activity[9].message, "event 5");
    }

    #[test]
    fn test_view_parse_and_shortcuts() {
        assert_eq!(ViewId::parse("pools"), Some(ViewId::Pools));
        assert_eq!(ViewId::parse("billing"), None);
        assert_eq!(ViewId::from_shortcut('5'), Some(ViewId::Chat));
        assert_eq!(ViewId::from_shortcut('9'), None);
        for view in ViewId::ALL {
            assert_eq!(ViewId::parse(view.id()), Some(view));
        }
    }
}
