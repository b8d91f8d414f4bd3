use crate::domain::ActivityKind;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub kind: ActivityKind,
    pub icon: &'static str,
    pub message: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityDisplay {
    /// Newest first
    pub rows: Vec<ActivityRow>,
}

pub fn activity(state: &AppState) -> ActivityDisplay {
    ActivityDisplay {
        rows: state
            .activity
            .iter()
            .map(|event| ActivityRow {
                kind: event.kind,
                icon: event.kind.icon(),
                message: event.message.clone(),
                time: event.time.clone(),
            })
            .collect(),
    }
}
