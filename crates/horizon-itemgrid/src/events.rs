//! Input events delivered to the grid by the host.
//!
//! Positions are in widget-local coordinates: the grid's own top-left corner
//! is the origin, regardless of the scroll offset.

use horizon_itemgrid_render::Point;

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Control + Shift modifiers.
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        control: true,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left,
    /// Secondary button (usually right).
    Right,
    /// Middle button (scroll wheel click).
    Middle,
}

/// The keys the grid reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    F,
    G,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Enter,
    NumpadEnter,
    Tab,
    Space,
    Escape,
    /// Any other key; its text (if printable) is in [`KeyPressEvent::text`].
    Unknown,
}

/// Mouse press event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MousePressEvent {
    /// The button that was pressed.
    pub button: MouseButton,
    /// Position in widget-local coordinates.
    pub local_pos: Point,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
    /// 1 for a single click, 2 for a double click.
    pub click_count: u8,
}

impl MousePressEvent {
    /// Create a single-click press.
    pub fn new(button: MouseButton, local_pos: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            button,
            local_pos,
            modifiers,
            click_count: 1,
        }
    }

    /// Set the click count.
    pub fn with_click_count(mut self, click_count: u8) -> Self {
        self.click_count = click_count;
        self
    }
}

/// Mouse release event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseReleaseEvent {
    /// The button that was released.
    pub button: MouseButton,
    /// Position in widget-local coordinates.
    pub local_pos: Point,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
}

impl MouseReleaseEvent {
    /// Create a new mouse release event.
    pub fn new(button: MouseButton, local_pos: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            button,
            local_pos,
            modifiers,
        }
    }
}

/// Pointer motion event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMoveEvent {
    /// Position in widget-local coordinates.
    pub local_pos: Point,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
}

impl MouseMoveEvent {
    /// Create a new mouse move event.
    pub fn new(local_pos: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            local_pos,
            modifiers,
        }
    }
}

/// Key press event.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPressEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
    /// Text produced by the key, empty for non-printable keys.
    pub text: String,
}

impl KeyPressEvent {
    /// Create a new key press event.
    pub fn new(key: Key, modifiers: KeyboardModifiers, text: impl Into<String>) -> Self {
        Self {
            key,
            modifiers,
            text: text.into(),
        }
    }

    /// A key press without text.
    pub fn key(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self::new(key, modifiers, "")
    }

    /// A printable key press.
    pub fn typed(text: impl Into<String>) -> Self {
        Self::new(Key::Unknown, KeyboardModifiers::NONE, text)
    }
}

/// Scroll wheel event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Position in widget-local coordinates.
    pub local_pos: Point,
    /// Horizontal scroll delta (positive = right).
    pub delta_x: f32,
    /// Vertical scroll delta (positive = up/away from user).
    pub delta_y: f32,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
}

impl WheelEvent {
    /// Create a new wheel event.
    pub fn new(local_pos: Point, delta_x: f32, delta_y: f32) -> Self {
        Self {
            local_pos,
            delta_x,
            delta_y,
            modifiers: KeyboardModifiers::NONE,
        }
    }
}

/// Every input the grid handles.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    MousePress(MousePressEvent),
    MouseRelease(MouseReleaseEvent),
    MouseMove(MouseMoveEvent),
    /// The pointer left the grid.
    Leave,
    KeyPress(KeyPressEvent),
    Wheel(WheelEvent),
    FocusIn,
    FocusOut,
}
