//! Input collaborator used when no controller backend is attached.

use vid_core::logging::{log, LogCategory, LogLevel};
use vid_core::EventPump;

/// Accepts keymap init and pump calls and does nothing with them.
#[derive(Debug, Default)]
pub struct NullEventPump {
    keymap_ready: bool,
    pumps: u64,
}

impl NullEventPump {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keymap_ready(&self) -> bool {
        self.keymap_ready
    }

    pub fn pumps(&self) -> u64 {
        self.pumps
    }
}

impl EventPump for NullEventPump {
    fn init_os_keymap(&mut self) {
        self.keymap_ready = true;
        log(LogCategory::Events, LogLevel::Debug, || {
            "Events: no input backend, keymap left empty".to_string()
        });
    }

    fn pump_events(&mut self) {
        self.pumps = self.pumps.wrapping_add(1);
    }
}
