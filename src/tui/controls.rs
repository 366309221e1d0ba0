//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
/// While the emergency-stop dialog is open it captures all keys except
/// Ctrl-C.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if let KeyCode::Char('c') = key.code {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            app.quit = true;
            return;
        }
    }
    if app.dialog_open() {
        match key.code {
            KeyCode::Char('y' | 'Y') => app.confirm_stop(),
            KeyCode::Char('n' | 'N') | KeyCode::Esc | KeyCode::Enter => app.close_dialog(),
            _ => {}
        }
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char(c @ '1'..='5') => app.select_panel(c as usize - '0' as usize),
        KeyCode::Tab | KeyCode::Right => app.next_panel(),
        KeyCode::Char('e' | 'E') => app.request_stop(),
        _ => {}
    }
}
