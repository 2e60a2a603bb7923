/// Keys the runtime tracks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Other,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InputEvent {
    KeyPressed(Key),
    KeyReleased(Key),
    CloseRequested,
}

/// Exit-relevant input for one window.
///
/// Escape is sticky: once pressed it stays latched for the life of the
/// window, so a press and release that both land between two exit checks
/// still counts.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    escape_latched: bool,
    close_requested: bool,
}

impl InputState {
    pub fn apply_event(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::KeyPressed(Key::Escape) => self.escape_latched = true,
            InputEvent::KeyPressed(Key::Other) | InputEvent::KeyReleased(_) => {}
            InputEvent::CloseRequested => self.close_requested = true,
        }
    }

    /// Escape was pressed, or the window system asked to close.
    pub fn should_exit(&self) -> bool {
        self.escape_latched || self.close_requested
    }
}
