//! # Browser Signals
//!
//! Raw observations the host page forwards to the detector set. The host
//! owns DOM listeners and timers; detectors only see these values.
//!
//! | Signal | DOM source |
//! |--------|------------|
//! | `WindowBlur` / `WindowFocus` | `window` blur / focus |
//! | `VisibilityChanged` | `visibilitychange` |
//! | `Copy` / `Cut` / `Paste` | clipboard events |
//! | `ContextMenu` | `contextmenu` |
//! | `KeyDown` / `KeyUp` | keyboard events |
//! | `FullscreenChanged` | `fullscreenchange` |
//! | `Click` | `click` (carries current fullscreen state) |
//! | `UserActivity` | mousedown, mousemove, keypress, scroll, touchstart |
//! | `ViewportMeasured` | periodic outer/inner size sample |
//! | `DevtoolsProbe` | console probe getter was read |
//! | `Tick` | periodic timer (inactivity check) |

use serde::{Deserialize, Serialize};

/// A key press with its modifier state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyChord {
    /// `KeyboardEvent.key` value, e.g. `"F12"`, `"I"`, `"PrintScreen"`.
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Case-insensitive key comparison.
    pub fn is(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

/// Input that counts as the student being present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityInput {
    MouseDown,
    MouseMove,
    KeyPress,
    Scroll,
    TouchStart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrowserSignal {
    WindowBlur,
    WindowFocus,
    VisibilityChanged { hidden: bool },
    Copy,
    Cut,
    Paste,
    ContextMenu,
    KeyDown(KeyChord),
    KeyUp(KeyChord),
    #[serde(rename_all = "camelCase")]
    FullscreenChanged { is_fullscreen: bool },
    #[serde(rename_all = "camelCase")]
    Click { is_fullscreen: bool },
    UserActivity { input: ActivityInput },
    #[serde(rename_all = "camelCase")]
    ViewportMeasured {
        outer_width: u32,
        inner_width: u32,
        outer_height: u32,
        inner_height: u32,
    },
    DevtoolsProbe,
    Tick,
}

impl BrowserSignal {
    pub fn key_down(chord: KeyChord) -> Self {
        Self::KeyDown(chord)
    }

    pub fn key_up(chord: KeyChord) -> Self {
        Self::KeyUp(chord)
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WindowBlur => "window_blur",
            Self::WindowFocus => "window_focus",
            Self::VisibilityChanged { .. } => "visibility_changed",
            Self::Copy => "copy",
            Self::Cut => "cut",
            Self::Paste => "paste",
            Self::ContextMenu => "context_menu",
            Self::KeyDown(_) => "key_down",
            Self::KeyUp(_) => "key_up",
            Self::FullscreenChanged { .. } => "fullscreen_changed",
            Self::Click { .. } => "click",
            Self::UserActivity { .. } => "user_activity",
            Self::ViewportMeasured { .. } => "viewport_measured",
            Self::DevtoolsProbe => "devtools_probe",
            Self::Tick => "tick",
        }
    }
}
