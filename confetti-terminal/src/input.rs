//! Translation of crossterm events into demo input

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use confetti_core::{InputEvent, Key, PointerButton};

use crate::renderer::{CELL_HEIGHT, CELL_WIDTH};

/// What a terminal event means for the running demo
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Demo(InputEvent),
    /// New grid size in cells
    Resize(u16, u16),
    Ignored,
}

pub fn translate(event: &Event) -> Input {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(cols, rows) => Input::Resize(*cols, *rows),
        _ => Input::Ignored,
    }
}

fn translate_key(key: &KeyEvent) -> Input {
    if key.kind != KeyEventKind::Press {
        return Input::Ignored;
    }
    let event = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputEvent::Quit,
        KeyCode::Esc => InputEvent::KeyDown(Key::Escape),
        KeyCode::Char('=') | KeyCode::Char('+') => InputEvent::KeyDown(Key::ZoomIn),
        KeyCode::Char('-') => InputEvent::KeyDown(Key::ZoomOut),
        KeyCode::Char('r') => InputEvent::KeyDown(Key::Reset),
        _ => InputEvent::KeyDown(Key::Other),
    };
    Input::Demo(event)
}

fn translate_mouse(mouse: &MouseEvent) -> Input {
    let (x, y) = cell_center(mouse.column, mouse.row);
    let event = match mouse.kind {
        MouseEventKind::Down(button) => InputEvent::PointerDown { button: pointer_button(button), x, y },
        MouseEventKind::Up(button) => InputEvent::PointerUp { button: pointer_button(button), x, y },
        MouseEventKind::Drag(_) | MouseEventKind::Moved => InputEvent::PointerMove { x, y },
        MouseEventKind::ScrollUp => InputEvent::Wheel { delta_y: 1.0 },
        MouseEventKind::ScrollDown => InputEvent::Wheel { delta_y: -1.0 },
        _ => return Input::Ignored,
    };
    Input::Demo(event)
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Other,
    }
}

/// Logical pixel position of a cell's centre
pub fn cell_center(column: u16, row: u16) -> (f32, f32) {
    (
        (column as u32 * CELL_WIDTH + CELL_WIDTH / 2) as f32,
        (row as u32 * CELL_HEIGHT + CELL_HEIGHT / 2) as f32,
    )
}
