#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use routerboard::app::App;
use routerboard::controller::DashboardController;
use routerboard::domain::seed::mock_state;
use routerboard::infrastructure::{ManualClock, ScriptedRandom};

/// Sunday 2025-08-24 06:30 UTC, the last day of the seeded usage history
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 24, 6, 30, 0).unwrap()
}

/// Controller over the seeded state with a manual clock and scripted draws.
/// Unscripted draws return 0.0: tests pass, background ticks stay quiet.
pub fn controller(draws: impl IntoIterator<Item = f64>) -> (DashboardController, ManualClock) {
    let clock = ManualClock::new(now());
    let controller = DashboardController::new(
        mock_state(now()),
        Box::new(clock.clone()),
        Box::new(ScriptedRandom::new(draws)),
    );
    (controller, clock)
}

pub fn app(draws: impl IntoIterator<Item = f64>) -> App {
    let (controller, _) = controller(draws);
    App::new(controller)
}
