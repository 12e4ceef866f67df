//! Keyboard and mouse input handling for the TUI.
//!
//! This module translates terminal events into application state changes.

use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use folio_core::presentation::{keyboard_action, Key, KeyAction, MenuEvent};

use crate::app::{
    can_add_password_char, can_add_username_char, App, AppState, Focus, LoginFocus, Tab,
    PAGE_SCROLL_SIZE,
};
use crate::showcase::SECTIONS;

/// Rows scrolled per mouse wheel notch on the Showcase tab
const WHEEL_ROWS: i32 = 3;

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let now = Instant::now();

    match app.state {
        AppState::LoggingIn => return handle_login_input(app, key).await,
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.delete_selected(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::Filtering => {
            handle_filter_input(app, key, now);
            return Ok(false);
        }
        AppState::EditingForm => {
            handle_form_input(app, key);
            return Ok(false);
        }
        AppState::ReplacingFile => {
            handle_path_input(app, key);
            return Ok(false);
        }
        AppState::Normal | AppState::Quitting => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('1') => {
            app.current_tab = Tab::Certificates;
            app.focus = Focus::List;
        }
        KeyCode::Char('2') => {
            app.current_tab = Tab::Showcase;
        }
        KeyCode::Left => app.current_tab = app.current_tab.prev(),
        KeyCode::Right => app.current_tab = app.current_tab.next(),
        KeyCode::Char('L') => app.logout(),
        _ => match app.current_tab {
            Tab::Certificates => handle_certificates_input(app, key, now),
            Tab::Showcase => handle_showcase_input(app, key),
        },
    }

    Ok(false)
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => {
                // On failure login_error is set and the overlay stays up
                if app.attempt_login().await.is_ok() {
                    app.reload_certificates();
                }
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.len(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

fn handle_certificates_input(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(1),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(1),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.selection = 0,
        KeyCode::End => app.selection = app.certificates.len().saturating_sub(1),
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
        }
        KeyCode::Char('/') => app.state = AppState::Filtering,
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Char('r') => app.request_reload(now),
        KeyCode::Char(']') => app.next_page(),
        KeyCode::Char('[') => app.prev_page(),
        KeyCode::Char('n') => app.open_create_form(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit_form(),
        KeyCode::Char('f') => app.start_replace_file(),
        KeyCode::Char('d') | KeyCode::Delete => app.confirm_delete(),
        _ => {}
    }
}

fn handle_filter_input(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc => app.state = AppState::Normal,
        KeyCode::Enter => {
            app.state = AppState::Normal;
            app.reload_certificates();
        }
        KeyCode::Tab => app.filter_field = app.filter_field.next(),
        KeyCode::Backspace => app.filter_pop(now),
        KeyCode::Char(c) => app.filter_push(c, now),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.close_form();
        return;
    }
    if key.code == KeyCode::Enter {
        app.submit_form();
        return;
    }

    let Some(form) = app.form.as_mut() else {
        app.state = AppState::Normal;
        return;
    };
    match key.code {
        KeyCode::Down | KeyCode::Tab => form.next_field(),
        KeyCode::Up | KeyCode::BackTab => form.prev_field(),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
}

fn handle_path_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.state = AppState::Normal,
        KeyCode::Enter => app.submit_replace_file(),
        KeyCode::Backspace => {
            app.file_input.pop();
        }
        KeyCode::Char(c) => app.push_path_char(c),
        _ => {}
    }
}

fn to_page_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Esc => Key::Escape,
        KeyCode::Home => Key::Home,
        _ => Key::Other,
    }
}

fn handle_showcase_input(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let showcase = &mut app.showcase;

    match keyboard_action(to_page_key(key.code), ctrl, &showcase.menu) {
        Some(KeyAction::CloseMenu) => {
            showcase.menu.handle(MenuEvent::Escape);
            return;
        }
        Some(KeyAction::ScrollToTop) => {
            showcase.scroll_to_top();
            return;
        }
        None => {}
    }

    if showcase.menu.is_open() {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                showcase.menu_selection = showcase.menu_selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                showcase.menu_selection = (showcase.menu_selection + 1).min(SECTIONS.len() - 1);
            }
            KeyCode::Enter => {
                let (id, _) = SECTIONS[showcase.menu_selection];
                showcase.jump_to(id);
            }
            KeyCode::Char('m') => {
                showcase.menu.handle(MenuEvent::Toggle);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => showcase.scroll_by(-1),
        KeyCode::Down | KeyCode::Char('j') => showcase.scroll_by(1),
        KeyCode::PageUp => showcase.scroll_by(-(PAGE_SCROLL_SIZE as i32)),
        KeyCode::PageDown | KeyCode::Char(' ') => showcase.scroll_by(PAGE_SCROLL_SIZE as i32),
        KeyCode::Char('m') => {
            showcase.menu.handle(MenuEvent::Toggle);
        }
        _ => {}
    }
}

/// Mouse wheel scrolls; any click while the section menu is open closes it.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.state != AppState::Normal {
        return;
    }
    match (app.current_tab, mouse.kind) {
        (Tab::Showcase, MouseEventKind::Down(_)) => {
            app.showcase.menu.handle(MenuEvent::ClickOutside);
        }
        (Tab::Showcase, MouseEventKind::ScrollDown) => app.showcase.scroll_by(WHEEL_ROWS),
        (Tab::Showcase, MouseEventKind::ScrollUp) => app.showcase.scroll_by(-WHEEL_ROWS),
        (Tab::Certificates, MouseEventKind::ScrollDown) => app.select_next(1),
        (Tab::Certificates, MouseEventKind::ScrollUp) => app.select_prev(1),
        _ => {}
    }
}
