//! Controller flows driven in virtual time
//!
//! Every test runs against the seeded state with a manual clock and a
//! scripted random source, so outcomes are exact.

mod common;

use std::time::Duration;

use chrono::Duration as ChronoDuration;

use routerboard::controller::{Answer, PoolDraft};
use routerboard::domain::{
    ActivityKind, ChatRole, ConnectionStatus, PoolRole, RouterSettings, RoutingTarget, Theme,
    UsagePeriod,
};
use routerboard::error::DashboardError;
use routerboard::projection::Surface;
use routerboard::state::ViewId;

use common::{controller, now};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// === Connections ===

#[test]
fn test_add_connection_appends_active_with_zero_usage() {
    let (mut c, _) = controller([]);
    let before = c.state().connections.len();
    let dashboard_renders = c.render_count(Surface::Dashboard);
    let pool_renders = c.render_count(Surface::Pools);

    let id = c.add_connection("openai", "My Key", "sk-xxx").unwrap();

    let state = c.state();
    assert_eq!(state.connections.len(), before + 1);
    let added = state.connection(&id).unwrap();
    assert_eq!(added.status, ConnectionStatus::Active);
    assert_eq!(added.usage.tokens, 0);
    assert_eq!(added.usage.cost, 0.0);
    assert_eq!(added.last_tested_at, now());
    assert_eq!(added.provider.name(), "OpenAI");
    assert_eq!(state.activity[0].message, "New connection added: My Key");
    assert_eq!(state.activity[0].time, "Just now");

    assert_eq!(c.render_count(Surface::Dashboard), dashboard_renders + 1);
    assert_eq!(c.render_count(Surface::Pools), pool_renders);
    assert_eq!(c.displays().dashboard.active_connections, 4);
}

#[test]
fn test_add_connection_ids_do_not_collide() {
    let (mut c, _) = controller([]);
    let first = c.add_connection("anthropic", "A", "k").unwrap();
    let second = c.add_connection("anthropic", "B", "k").unwrap();
    assert_eq!(first, "conn-4");
    assert_eq!(second, "conn-5");
}

#[test]
fn test_add_connection_rejects_blank_fields_without_change() {
    let (mut c, _) = controller([]);
    let before = c.state().clone();

    let err = c.add_connection("openai", "   ", "sk-xxx").unwrap_err();
    assert_eq!(err.to_string(), "Please fill in all required fields");
    assert!(err.is_user_visible());
    assert!(c.add_connection("openai", "Label", "").is_err());

    assert_eq!(c.state().connections, before.connections);
    assert_eq!(c.state().activity, before.activity);
}

#[test]
fn test_connection_test_uses_invocation_time_and_scripted_outcome() {
    let (mut c, clock) = controller([0.9]);
    let invoked_at = clock_now(&clock);

    c.test_connection("conn-2").unwrap();
    assert!(c.is_loading());

    clock.advance(ChronoDuration::milliseconds(999));
    c.advance(ms(999));
    assert!(c.is_loading());
    assert_eq!(
        c.state().connection("conn-2").unwrap().status,
        ConnectionStatus::Active
    );

    clock.advance(ChronoDuration::milliseconds(1));
    c.advance(ms(1));
    assert!(!c.is_loading());
    let conn = c.state().connection("conn-2").unwrap();
    assert_eq!(conn.status, ConnectionStatus::Error);
    assert_eq!(conn.last_tested_at, invoked_at);
    assert_eq!(
        c.state().activity[0].message,
        "Connection test failed for Backup Router"
    );
}

fn clock_now(clock: &routerboard::infrastructure::ManualClock) -> chrono::DateTime<chrono::Utc> {
    use routerboard::infrastructure::Clock;
    clock.now()
}

#[test]
fn test_connection_test_success_clears_error_status() {
    let (mut c, _) = controller([0.8]);
    assert_eq!(
        c.state().connection("conn-3").unwrap().status,
        ConnectionStatus::Error
    );
    c.test_connection("conn-3").unwrap();
    c.advance(ms(1000));
    assert_eq!(
        c.state().connection("conn-3").unwrap().status,
        ConnectionStatus::Active
    );
    assert_eq!(
        c.state().activity[0].message,
        "Connection test successful for Claude API"
    );
}

#[test]
fn test_same_delay_tests_complete_in_request_order() {
    let (mut c, _) = controller([0.95, 0.1]);
    c.test_connection("conn-1").unwrap();
    c.test_connection("conn-2").unwrap();
    c.advance(ms(1000));
    assert_eq!(
        c.state().connection("conn-1").unwrap().status,
        ConnectionStatus::Error
    );
    assert_eq!(
        c.state().connection("conn-2").unwrap().status,
        ConnectionStatus::Active
    );
}

#[test]
fn test_testing_unknown_connection_is_not_found() {
    let (mut c, _) = controller([]);
    let err = c.test_connection("conn-99").unwrap_err();
    assert!(matches!(err, DashboardError::NotFound { .. }));
    assert!(!err.is_user_visible());
    assert_eq!(c.pending_tasks(), 0);
}

#[test]
fn test_delete_declined_changes_nothing() {
    let (mut c, _) = controller([]);
    let before = c.state().clone();
    let renders = c.render_count(Surface::Connections);

    let mut asked = Vec::new();
    let deleted = c
        .delete_connection("conn-1", &mut |prompt: &str| {
            asked.push(prompt.to_string());
            false
        })
        .unwrap();

    assert!(!deleted);
    assert_eq!(asked.len(), 1);
    assert_eq!(c.state().connections, before.connections);
    assert_eq!(c.state().activity, before.activity);
    assert_eq!(c.render_count(Surface::Connections), renders);
}

#[test]
fn test_delete_confirmed_then_repeat_is_not_found() {
    let (mut c, _) = controller([]);
    assert!(c.delete_connection("conn-1", &mut Answer(true)).unwrap());
    assert!(c.state().connection("conn-1").is_none());
    assert_eq!(c.state().activity[0].message, "Connection deleted: My OpenAI API");

    let snapshot = c.state().clone();
    let err = c.delete_connection("conn-1", &mut Answer(true)).unwrap_err();
    assert!(matches!(err, DashboardError::NotFound { .. }));
    assert_eq!(c.state().connections, snapshot.connections);
    assert_eq!(c.state().activity, snapshot.activity);
}

#[test]
fn test_test_completing_after_delete_is_dropped() {
    let (mut c, _) = controller([0.9]);
    c.test_connection("conn-1").unwrap();
    c.delete_connection("conn-1", &mut Answer(true)).unwrap();
    let activity = c.state().activity.clone();

    c.advance(ms(1000));
    assert_eq!(c.state().activity, activity);
    assert!(c.state().connection("conn-1").is_none());
}

// === Pools ===

#[test]
fn test_create_pool_makes_caller_admin() {
    let (mut c, _) = controller([]);
    let id = c
        .create_pool(PoolDraft::new("Night Owls", 50_000, 25.0).with_description("late shift"))
        .unwrap();

    let pool = c.state().pool(&id).unwrap();
    assert_eq!(id, "pool-3");
    assert_eq!(pool.role, PoolRole::Admin);
    assert_eq!(pool.member_count, 1);
    assert_eq!(pool.usage.tokens, 0);
    assert_eq!(pool.usage.tokens_limit, 50_000);
    assert_eq!(pool.usage.cost_limit, 25.0);
    assert_eq!(c.state().activity[0].kind, ActivityKind::Pool);
    assert_eq!(c.state().activity[0].message, "New pool created: Night Owls");

    let card = c.displays().pools.cards.last().unwrap();
    assert_eq!(card.token_usage.percent, 0.0);
    assert!(card.can_manage);
}

#[test]
fn test_create_pool_requires_name() {
    let (mut c, _) = controller([]);
    let err = c.create_pool(PoolDraft::new("  ", 1, 1.0)).unwrap_err();
    assert_eq!(err.to_string(), "Please enter a pool name");
    assert_eq!(c.state().pools.len(), 2);
}

#[test]
fn test_leave_pool() {
    let (mut c, _) = controller([]);
    assert!(!c.leave_pool("pool-2", &mut Answer(false)).unwrap());
    assert_eq!(c.state().pools.len(), 2);

    assert!(c.leave_pool("pool-2", &mut Answer(true)).unwrap());
    assert!(c.state().pool("pool-2").is_none());
    assert_eq!(c.state().activity[0].message, "Left pool: Work Team");
    assert_eq!(c.displays().dashboard.pool_memberships, 1);

    assert!(c.leave_pool("pool-2", &mut Answer(true)).is_err());
}

#[test]
fn test_seeded_pool_utilization() {
    let (c, _) = controller([]);
    let study = &c.displays().pools.cards[0];
    assert_eq!(study.token_usage.percent, 62.6);
    assert!(!study.token_usage.warning);
    assert_eq!(study.token_usage.label(), "62.6%");
}

// === Chat ===

#[test]
fn test_blank_chat_messages_are_ignored() {
    let (mut c, _) = controller([]);
    let before = c.state().chat.len();
    assert!(!c.send_chat_message(""));
    assert!(!c.send_chat_message("   "));
    assert_eq!(c.state().chat.len(), before);
    assert_eq!(c.pending_tasks(), 0);
}

#[test]
fn test_chat_reply_arrives_after_delay() {
    let (mut c, _) = controller([0.0]);
    assert!(c.send_chat_message("hello"));
    let chat = &c.state().chat;
    assert_eq!(chat.last().unwrap().role, ChatRole::User);
    assert_eq!(chat.last().unwrap().content, "hello");

    c.advance(ms(1499));
    assert_eq!(c.state().chat.last().unwrap().role, ChatRole::User);

    c.advance(ms(1));
    let reply = c.state().chat.last().unwrap();
    assert_eq!(reply.role, ChatRole::Assistant);
    assert_eq!(reply.model, Some(RoutingTarget::Auto));
    assert_eq!(
        reply.content,
        "I understand your question. Let me help you with that."
    );
    assert_eq!(c.state().activity[0].message, "Chat completion via Auto-routed");
    assert_eq!(c.displays().chat.lines.last().unwrap().via, None);
}

#[test]
fn test_chat_reply_keeps_target_from_send_time() {
    let (mut c, _) = controller([]);
    c.select_routing_target(RoutingTarget::parse("gpt-4"));
    c.send_chat_message("explain");
    c.select_routing_target(RoutingTarget::Auto);
    c.advance(ms(1500));

    let reply = c.state().chat.last().unwrap();
    assert_eq!(reply.model, Some(RoutingTarget::Model("gpt-4".to_string())));
    assert_eq!(c.state().activity[0].message, "Chat completion via gpt-4");
    assert_eq!(
        c.displays().chat.lines.last().unwrap().via.as_deref(),
        Some("via gpt-4")
    );
}

#[test]
fn test_chat_intro_plays_once() {
    let (mut c, _) = controller([]);
    assert_eq!(c.state().chat.len(), 1);

    c.switch_to(ViewId::Chat);
    c.advance(ms(499));
    assert_eq!(c.state().chat.len(), 1);
    c.advance(ms(1));
    assert_eq!(c.state().chat.len(), 2);
    assert_eq!(c.state().chat[1].role, ChatRole::User);

    c.advance(ms(1000));
    let answer = &c.state().chat[2];
    assert_eq!(answer.role, ChatRole::Assistant);
    assert_eq!(answer.model, Some(RoutingTarget::Model("gpt-4".to_string())));

    c.switch_to(ViewId::Dashboard);
    c.switch_to(ViewId::Chat);
    c.advance(ms(5000));
    assert_eq!(c.state().chat.len(), 3);
}

// === Views, theme, settings ===

#[test]
fn test_switch_view_by_name() {
    let (mut c, _) = controller([]);
    assert!(c.switch_view("pools"));
    assert_eq!(c.current_view(), ViewId::Pools);
    assert!(!c.switch_view("nowhere"));
    assert_eq!(c.current_view(), ViewId::Pools);
}

#[test]
fn test_toggle_theme_rerenders_settings_only() {
    let (mut c, _) = controller([]);
    let settings = c.render_count(Surface::Settings);
    let dashboard = c.render_count(Surface::Dashboard);
    assert_eq!(c.toggle_theme(), Theme::Dark);
    assert_eq!(c.displays().settings.theme, Theme::Dark);
    assert_eq!(c.render_count(Surface::Settings), settings + 1);
    assert_eq!(c.render_count(Surface::Dashboard), dashboard);
    assert_eq!(c.toggle_theme(), Theme::Light);
}

#[test]
fn test_save_settings_validates() {
    let (mut c, _) = controller([]);
    let bad = RouterSettings {
        retry_attempts: 11,
        ..RouterSettings::default()
    };
    assert!(c.save_settings(bad).is_err());
    assert_eq!(c.state().settings, RouterSettings::default());

    let good = RouterSettings {
        retry_attempts: 5,
        daily_token_limit: 20_000,
        ..RouterSettings::default()
    };
    c.save_settings(good.clone()).unwrap();
    assert_eq!(c.displays().settings.settings, good);
}

#[test]
fn test_restore_settings_validates_and_rerenders() {
    let (mut c, _) = controller([]);
    let renders = c.render_count(Surface::Settings);
    let bad = RouterSettings {
        daily_token_limit: 0,
        ..RouterSettings::default()
    };
    assert!(c.restore_settings(bad).is_err());
    assert_eq!(c.render_count(Surface::Settings), renders);

    let stored = RouterSettings {
        retry_attempts: 2,
        ..RouterSettings::default()
    };
    c.restore_settings(stored.clone()).unwrap();
    assert_eq!(c.displays().settings.settings, stored);
    assert_eq!(c.render_count(Surface::Settings), renders + 1);
}

#[test]
fn test_usage_period_rerenders_usage() {
    let (mut c, _) = controller([]);
    let renders = c.render_count(Surface::Usage);
    c.set_usage_period(UsagePeriod::Quarter);
    assert_eq!(c.displays().usage.period, UsagePeriod::Quarter);
    assert_eq!(c.render_count(Surface::Usage), renders + 1);
}

// === Background activity ===

#[test]
fn test_activity_ticks_on_dashboard() {
    // tick 1 quiet, tick 2 emits event 0, tick 3 emits event 2
    let (mut c, _) = controller([0.5, 0.71, 0.0, 0.99, 0.9]);
    c.start_activity_updates();
    let before = c.state().activity.len();

    c.advance(Duration::from_secs(10));
    assert_eq!(c.state().activity.len(), before);

    c.advance(Duration::from_secs(10));
    assert_eq!(
        c.state().activity[0].message,
        "Background chat completion processed"
    );

    c.advance(Duration::from_secs(10));
    assert_eq!(
        c.state().activity[0].message,
        "Automatic connection health check completed"
    );
    assert_eq!(c.displays().activity.rows[0].kind, ActivityKind::Connection);
}

#[test]
fn test_activity_off_dashboard_is_deferred_until_return() {
    let (mut c, _) = controller([0.9, 0.5]);
    c.start_activity_updates();
    c.switch_to(ViewId::Usage);
    let renders = c.render_count(Surface::Activity);

    c.advance(Duration::from_secs(10));
    assert_eq!(c.state().activity[0].message, "Usage threshold warning triggered");
    assert_eq!(c.render_count(Surface::Activity), renders);
    assert_ne!(
        c.displays().activity.rows[0].message,
        "Usage threshold warning triggered"
    );

    c.switch_to(ViewId::Dashboard);
    assert_eq!(c.render_count(Surface::Activity), renders + 1);
    assert_eq!(
        c.displays().activity.rows[0].message,
        "Usage threshold warning triggered"
    );
}

#[test]
fn test_start_is_idempotent_and_stop_cancels() {
    let (mut c, _) = controller([]);
    let handle = c.start_activity_updates();
    assert_eq!(c.start_activity_updates(), handle);
    assert_eq!(c.pending_tasks(), 1);

    assert!(c.stop_activity_updates());
    assert!(!c.activity_updates_running());
    assert_eq!(c.pending_tasks(), 0);
    assert!(!c.stop_activity_updates());
}

#[test]
fn test_shutdown_drops_in_flight_work() {
    let (mut c, _) = controller([0.9]);
    c.start_activity_updates();
    c.test_connection("conn-1").unwrap();
    c.send_chat_message("hi");
    let snapshot = c.state().clone();

    c.shutdown();
    c.advance(Duration::from_secs(60));
    assert_eq!(c.pending_tasks(), 0);
    assert_eq!(c.state().connections, snapshot.connections);
    assert_eq!(c.state().chat.len(), snapshot.chat.len());
}

#[test]
fn test_feed_is_capped_newest_first() {
    let (mut c, _) = controller([]);
    for i in 0..15 {
        c.add_connection("openai", &format!("key {i}"), "sk").unwrap();
    }
    let activity = &c.state().activity;
    assert_eq!(activity.len(), 10);
    assert_eq!(activity[0].message, "New connection added: key 14");
    assert_eq!(activity[9].message, "New connection added: key 5");
    assert_eq!(c.displays().activity.rows.len(), 10);
}
