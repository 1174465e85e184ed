mod held;

pub use held::{HeldKey, HeldKeys};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::app::{Focus, SearchWidget};
use crate::ui;

/// Main key dispatch, routed by focus.
pub fn handle_key(widget: &mut SearchWidget, key: KeyEvent) {
    widget.held.observe(&key);
    if key.kind == KeyEventKind::Release {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        widget.should_quit = true;
        return;
    }

    match widget.focus() {
        Focus::Editor => handle_editor_key(widget, key),
        Focus::Lookup => handle_lookup_key(widget, key),
        Focus::Results => handle_results_key(widget, key),
    }
}

fn is_text_input(key: &KeyEvent) -> bool {
    !key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

// ─── Query editor ──────────────────────────────────────────

fn handle_editor_key(widget: &mut SearchWidget, key: KeyEvent) {
    if widget.held.is_jump_chord(&key) {
        widget.held.release(HeldKey::Control);
        widget.focus_lookup();
        return;
    }

    match key.code {
        KeyCode::Tab => widget.focus_lookup(),
        KeyCode::Char(c) if is_text_input(&key) => widget.editor.insert_char(c),
        KeyCode::Enter => widget.editor.insert_char('\n'),
        KeyCode::Backspace => {
            widget.editor.backspace();
        }
        KeyCode::Delete => {
            widget.editor.delete();
        }
        KeyCode::Left => widget.editor.move_left(),
        KeyCode::Right => widget.editor.move_right(),
        KeyCode::Up => widget.editor.move_up(),
        KeyCode::Down => widget.editor.move_down(),
        KeyCode::Home => widget.editor.move_home(),
        KeyCode::End => widget.editor.move_end(),
        _ => {}
    }
}

// ─── Lookup box ────────────────────────────────────────────

fn handle_lookup_key(widget: &mut SearchWidget, key: KeyEvent) {
    match key.code {
        KeyCode::Down => widget.select_next(),
        KeyCode::Up => widget.select_previous(),
        KeyCode::Enter => {
            widget.accept_selection();
        }
        KeyCode::Esc => widget.dismiss(),
        KeyCode::Tab | KeyCode::BackTab => widget.focus_editor(),
        KeyCode::Char(c) if is_text_input(&key) => {
            widget.lookup.insert_char(c);
            widget.on_lookup_edited();
        }
        KeyCode::Backspace => {
            if widget.lookup.backspace() {
                widget.on_lookup_edited();
            }
        }
        KeyCode::Delete => {
            if widget.lookup.delete() {
                widget.on_lookup_edited();
            }
        }
        KeyCode::Left => widget.lookup.move_left(),
        KeyCode::Right => widget.lookup.move_right(),
        KeyCode::Home => widget.lookup.move_home(),
        KeyCode::End => widget.lookup.move_end(),
        _ => {}
    }
}

// ─── Result list ───────────────────────────────────────────

fn handle_results_key(widget: &mut SearchWidget, key: KeyEvent) {
    match key.code {
        KeyCode::Down => widget.select_next(),
        KeyCode::Up => widget.select_previous(),
        KeyCode::Enter => {
            widget.accept_selection();
        }
        KeyCode::Esc => {
            widget.dismiss();
            widget.focus_lookup();
        }
        KeyCode::Tab | KeyCode::BackTab => widget.focus_editor(),
        KeyCode::Char(_) | KeyCode::Backspace | KeyCode::Delete => {
            // Typing goes back to the lookup box.
            widget.focus_lookup();
            handle_lookup_key(widget, key);
        }
        _ => {}
    }
}

// ─── Mouse ─────────────────────────────────────────────────

pub fn handle_mouse(widget: &mut SearchWidget, mouse: MouseEvent) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let areas = ui::screen_areas(widget.viewport(), widget);
    let pos = Position::new(mouse.column, mouse.row);

    if let Some(list) = areas.results
        && list.contains(pos)
    {
        if let Some(index) = ui::result_at(widget, list, mouse.row) {
            widget.click_result(index);
        }
        return;
    }

    if areas.editor.contains(pos) {
        widget.focus_editor();
    } else if areas.lookup.contains(pos) {
        widget.focus_lookup();
    }
}
