//! Input Module - crossterm bridge and event routing.
//!
//! Converts crossterm events into the small event vocabulary this layer
//! cares about (pointer moves, wheel scrolls, key presses, resizes) and
//! routes them into the pointer tracker and viewport state. Key presses
//! go through a global handler registry so the host can bind shutdown and
//! anchor-navigation keys.
//!
//! # Example
//!
//! ```ignore
//! use reveal_tui::input::{poll_event, route_event};
//! use std::time::Duration;
//!
//! loop {
//!     if let Ok(Some(event)) = poll_event(Duration::from_millis(16)) {
//!         route_event(event);
//!     }
//! }
//! ```

use std::cell::RefCell;
use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers, MouseEvent as CrosstermMouseEvent,
    MouseEventKind,
};
use crossterm::execute;

use crate::pipeline::viewport::{self, WHEEL_SCROLL};
use crate::state::pointer;

// =============================================================================
// Event Types
// =============================================================================

/// A key press with the modifier this layer cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// Printable character or a named key ("Enter", "Escape", "ArrowUp", ...).
    pub key: String,
    pub ctrl: bool,
}

impl KeyPress {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: false,
        }
    }
}

/// Unified event type for this layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to screen coordinates.
    Pointer { x: f32, y: f32 },
    /// Wheel scroll by a signed vertical delta.
    Wheel { delta: f32 },
    /// Key press.
    Key(KeyPress),
    /// Viewport resized to (width, height).
    Resize(f32, f32),
    /// Unhandled event type.
    None,
}

// =============================================================================
// Conversion
// =============================================================================

/// Convert a crossterm event into an [`InputEvent`].
pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse),
        CrosstermEvent::Key(key) => convert_key_event(key),
        CrosstermEvent::Resize(width, height) => {
            InputEvent::Resize(width as f32, height as f32)
        }
        _ => InputEvent::None,
    }
}

fn convert_mouse_event(event: CrosstermMouseEvent) -> InputEvent {
    match event.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => InputEvent::Pointer {
            x: event.column as f32,
            y: event.row as f32,
        },
        MouseEventKind::ScrollUp => InputEvent::Wheel {
            delta: -WHEEL_SCROLL,
        },
        MouseEventKind::ScrollDown => InputEvent::Wheel {
            delta: WHEEL_SCROLL,
        },
        _ => InputEvent::None,
    }
}

fn convert_key_event(event: CrosstermKeyEvent) -> InputEvent {
    // Only presses and repeats drive behavior
    if event.kind == KeyEventKind::Release {
        return InputEvent::None;
    }

    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        _ => return InputEvent::None,
    };

    InputEvent::Key(KeyPress {
        key,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
    })
}

// =============================================================================
// Key Handler Registry
// =============================================================================

/// Handler for key presses. Return true to consume the event.
pub type KeyHandler = Box<dyn Fn(&KeyPress) -> bool>;

thread_local! {
    static KEY_HANDLERS: RefCell<Vec<(usize, KeyHandler)>> = RefCell::new(Vec::new());
    static NEXT_HANDLER_ID: RefCell<usize> = const { RefCell::new(0) };
}

/// Register a global key handler. Returns a cleanup function.
pub fn on_key<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&KeyPress) -> bool + 'static,
{
    let id = NEXT_HANDLER_ID.with(|next| {
        let mut next = next.borrow_mut();
        let id = *next;
        *next += 1;
        id
    });
    KEY_HANDLERS.with(|handlers| {
        handlers.borrow_mut().push((id, Box::new(handler)));
    });

    move || {
        KEY_HANDLERS.with(|handlers| {
            handlers
                .borrow_mut()
                .retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Dispatch a key press to registered handlers in registration order.
/// Returns true if any handler consumed it.
pub fn dispatch_key(press: &KeyPress) -> bool {
    KEY_HANDLERS.with(|handlers| {
        for (_, handler) in handlers.borrow().iter() {
            if handler(press) {
                return true;
            }
        }
        false
    })
}

// =============================================================================
// Polling
// =============================================================================

/// Poll for an event with timeout. Returns None if nothing arrived.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    Ok(convert_event(read()?))
}

// =============================================================================
// Routing
// =============================================================================

/// Route an event to the appropriate subsystem.
/// Returns true if the event was consumed.
pub fn route_event(event: InputEvent) -> bool {
    match event {
        InputEvent::Pointer { x, y } => {
            pointer::dispatch_pointer_move(x, y);
            true
        }
        InputEvent::Wheel { delta } => viewport::scroll_by(delta),
        InputEvent::Key(press) => dispatch_key(&press),
        InputEvent::Resize(width, height) => {
            viewport::set_viewport_size(width, height);
            false
        }
        InputEvent::None => false,
    }
}

// =============================================================================
// Mouse Capture
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// Reset
// =============================================================================

/// Reset input state (for testing).
pub fn reset_input_state() {
    KEY_HANDLERS.with(|handlers| handlers.borrow_mut().clear());
    NEXT_HANDLER_ID.with(|next| *next.borrow_mut() = 0);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::engine::{allocate_block, reset_registry, set_block_rect};
    use crate::pipeline::viewport::{reset_viewport_state, scroll_y, set_viewport_size};
    use crate::state::pointer::{latest_sample, reset_pointer_state, track_region};
    use crate::types::{BlockFlags, Rect};

    fn setup() {
        reset_registry();
        reset_input_state();
        reset_pointer_state();
        reset_viewport_state();
    }

    #[test]
    fn test_convert_mouse_move() {
        let event = CrosstermMouseEvent {
            kind: MouseEventKind::Moved,
            column: 30,
            row: 20,
            modifiers: KeyModifiers::empty(),
        };

        assert_eq!(
            convert_event(CrosstermEvent::Mouse(event)),
            InputEvent::Pointer { x: 30.0, y: 20.0 }
        );
    }

    #[test]
    fn test_convert_wheel() {
        let up = CrosstermMouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::empty(),
        };
        let down = CrosstermMouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::empty(),
        };

        assert_eq!(
            convert_event(CrosstermEvent::Mouse(up)),
            InputEvent::Wheel { delta: -WHEEL_SCROLL }
        );
        assert_eq!(
            convert_event(CrosstermEvent::Mouse(down)),
            InputEvent::Wheel { delta: WHEEL_SCROLL }
        );
    }

    #[test]
    fn test_convert_key_press() {
        let event = CrosstermKeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };

        assert_eq!(
            convert_event(CrosstermEvent::Key(event)),
            InputEvent::Key(KeyPress::new("q"))
        );
    }

    #[test]
    fn test_convert_key_release_ignored() {
        let event = CrosstermKeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Release,
            state: crossterm::event::KeyEventState::NONE,
        };

        assert_eq!(convert_event(CrosstermEvent::Key(event)), InputEvent::None);
    }

    #[test]
    fn test_convert_ctrl_modifier() {
        let event = CrosstermKeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };

        let converted = convert_event(CrosstermEvent::Key(event));
        let InputEvent::Key(press) = converted else {
            panic!("expected key event");
        };
        assert_eq!(press.key, "c");
        assert!(press.ctrl);
    }

    #[test]
    fn test_convert_resize() {
        assert_eq!(
            convert_event(CrosstermEvent::Resize(120, 40)),
            InputEvent::Resize(120.0, 40.0)
        );
    }

    #[test]
    fn test_route_pointer_to_tracker() {
        setup();

        let idx = allocate_block("skills", BlockFlags::TRACK_POINTER);
        set_block_rect(idx, Rect::new(10.0, 5.0, 40.0, 10.0));
        let _cleanup = track_region(idx);

        assert!(route_event(InputEvent::Pointer { x: 15.0, y: 8.0 }));
        let sample = latest_sample(idx).unwrap();
        assert_eq!((sample.x, sample.y), (5.0, 3.0));
    }

    #[test]
    fn test_route_wheel_scrolls_viewport() {
        setup();
        set_viewport_size(80.0, 24.0);

        let idx = allocate_block("doc", BlockFlags::NONE);
        set_block_rect(idx, Rect::new(0.0, 0.0, 80.0, 200.0));

        assert!(route_event(InputEvent::Wheel { delta: WHEEL_SCROLL }));
        assert_eq!(scroll_y(), WHEEL_SCROLL);

        // At the top boundary an upward wheel is not consumed
        assert!(route_event(InputEvent::Wheel { delta: -WHEEL_SCROLL }));
        assert!(!route_event(InputEvent::Wheel { delta: -WHEEL_SCROLL }));
    }

    #[test]
    fn test_key_handler_registration_and_cleanup() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let cleanup = on_key(move |press| {
            if press.key == "q" {
                count_clone.set(count_clone.get() + 1);
                return true;
            }
            false
        });

        assert!(route_event(InputEvent::Key(KeyPress::new("q"))));
        assert!(!route_event(InputEvent::Key(KeyPress::new("x"))));
        assert_eq!(count.get(), 1);

        cleanup();
        assert!(!route_event(InputEvent::Key(KeyPress::new("q"))));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_key_handlers_run_in_order_until_consumed() {
        setup();

        let order = Rc::new(RefCell::new(Vec::new()));
        let first = order.clone();
        let second = order.clone();

        let _c1 = on_key(move |_| {
            first.borrow_mut().push(1);
            true // Consumes
        });
        let _c2 = on_key(move |_| {
            second.borrow_mut().push(2);
            false
        });

        dispatch_key(&KeyPress::new("a"));
        assert_eq!(*order.borrow(), vec![1]);
    }

    #[test]
    fn test_route_resize_updates_viewport() {
        setup();

        route_event(InputEvent::Resize(120.0, 40.0));
        assert_eq!(viewport::viewport_size(), (120.0, 40.0));
    }
}
