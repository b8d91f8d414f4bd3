//! Terminal dashboard for a personal AI router
//!
//! The [`controller::DashboardController`] owns all dashboard data and is
//! usable without a terminal; [`app`], [`input`] and [`ui`] put a ratatui
//! front end on top of it.

pub mod app;
pub mod config;
pub mod controller;
pub mod core;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod input;
pub mod projection;
pub mod state;
pub mod store;
pub mod ui;
