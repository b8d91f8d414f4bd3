//! Key handling for the terminal front end

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, InputMode};
use crate::state::ViewId;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.help_open = false;
        }
        return;
    }

    if app.modal.is_some() {
        handle_modal(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
        InputMode::Chat => handle_chat_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    if let KeyCode::Char(ch) = key.code {
        if let Some(view) = ViewId::from_shortcut(ch) {
            app.switch_view(view);
            return;
        }
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char(':') => app.enter_command(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Tab => app.cycle_view(true),
        KeyCode::BackTab => app.cycle_view(false),
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(true),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(false),
        KeyCode::Char('a') => {
            app.switch_view(ViewId::Connections);
            app.open_add_connection();
        }
        KeyCode::Char('n') => {
            app.switch_view(ViewId::Pools);
            app.open_create_pool();
        }
        KeyCode::Char('i') => app.enter_chat_input(),
        KeyCode::Esc => app.status = None,
        _ => handle_view_key(app, key),
    }
}

/// Keys whose meaning depends on the active view.
fn handle_view_key(app: &mut App, key: KeyEvent) {
    match (app.current_view(), key.code) {
        (ViewId::Connections, KeyCode::Char('x')) => app.test_selected_connection(),
        (ViewId::Connections | ViewId::Pools, KeyCode::Char('d') | KeyCode::Delete) => {
            app.request_delete_selected()
        }
        (ViewId::Chat, KeyCode::Enter) => app.enter_chat_input(),
        (ViewId::Chat, KeyCode::Char('m')) => app.cycle_routing_target(),
        (ViewId::Usage, KeyCode::Char('p')) => app.cycle_usage_period(),
        (
            ViewId::Settings,
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter | KeyCode::Char(' '),
        ) => app.adjust_setting(true),
        (ViewId::Settings, KeyCode::Char('h') | KeyCode::Left) => app.adjust_setting(false),
        (ViewId::Settings, KeyCode::Char('s')) => app.save_settings(),
        _ => {}
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => app.apply_command(),
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Up => {
            if let Some(last) = app.command.last.clone() {
                app.command.input = last;
            }
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
        }
        _ => {}
    }
}

fn handle_chat_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => app.submit_chat(),
        KeyCode::Tab => app.cycle_routing_target(),
        KeyCode::Backspace => {
            app.chat_input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.chat_input.push(ch);
        }
        _ => {}
    }
}

fn handle_modal(app: &mut App, key: KeyEvent) {
    use crate::app::Modal;

    match app.modal {
        Some(Modal::Confirm(_)) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.answer_confirm(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_confirm(false),
            _ => {}
        },
        Some(Modal::Alert { .. }) => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.dismiss_alert();
            }
        }
        Some(Modal::AddConnection(_)) | Some(Modal::CreatePool(_)) => match key.code {
            KeyCode::Esc => app.modal_cancel(),
            KeyCode::Enter => app.modal_submit(),
            KeyCode::Tab | KeyCode::Down => app.modal_next_field(),
            KeyCode::Left => app.modal_cycle_choice(false),
            KeyCode::Right => app.modal_cycle_choice(true),
            KeyCode::Backspace => app.modal_backspace(),
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    app.modal_char(ch);
                }
            }
            _ => {}
        },
        None => {}
    }
}
