pub mod config;
pub mod controls;
pub mod editor;
pub mod hit;
pub mod input;
pub mod scaler;
pub mod session;
pub mod shortcuts;

pub use config::EditorConfig;
pub use controls::{ControlBindings, ControlInput};
pub use editor::{EditorEvent, Events, HostRequest, OverlayEditor};
pub use hit::CursorHint;
pub use input::{InputEvent, Modifiers, PointerButton};
pub use scaler::FontScaler;
pub use session::{DragSession, Interaction, ResizeSession};
pub use shortcuts::{ShortcutAction, ShortcutMap};
