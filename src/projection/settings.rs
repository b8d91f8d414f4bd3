use crate::domain::{RouterSettings, Theme};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDisplay {
    pub user_name: String,
    pub user_email: String,
    pub theme: Theme,
    pub routing_target: String,
    pub settings: RouterSettings,
}

pub fn settings(state: &AppState) -> SettingsDisplay {
    SettingsDisplay {
        user_name: state.user.name.clone(),
        user_email: state.user.email.clone(),
        theme: state.theme,
        routing_target: state.routing_target.to_string(),
        settings: state.settings.clone(),
    }
}
