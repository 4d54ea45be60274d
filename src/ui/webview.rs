use super::{Button, Screen, Ui, VideoSurface, PARTNER_NAME_ID};
use serde::Serialize;
use tauri::{AppHandle, Emitter};

#[derive(Serialize, Clone)]
struct ScreenPayload<'a> {
    id: &'a str,
    hidden: bool,
}

#[derive(Serialize, Clone)]
struct GlyphPayload<'a> {
    id: &'a str,
    glyph: &'a str,
}

#[derive(Serialize, Clone)]
struct StreamPayload<'a> {
    id: &'a str,
    stream_id: Option<&'a str>,
}

#[derive(Serialize, Clone)]
struct TextPayload<'a> {
    id: &'a str,
    text: &'a str,
}

/// Forwards UI changes to the webview as events.
pub struct TauriUi {
    app: AppHandle,
}

impl TauriUi {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn emit_state<S: Serialize + Clone>(&self, evt: &str, payload: S) {
        if let Err(e) = self.app.emit(evt, payload) {
            log::warn!("Failed to emit event {evt}: {e:?}");
        }
    }
}

impl Ui for TauriUi {
    fn set_screen_hidden(&self, screen: Screen, hidden: bool) {
        self.emit_state(
            "roulette-screen",
            ScreenPayload {
                id: screen.element_id(),
                hidden,
            },
        );
    }

    fn alert(&self, message: &str) {
        self.emit_state("roulette-alert", message);
    }

    fn set_partner_name(&self, name: &str) {
        self.emit_state(
            "roulette-text",
            TextPayload {
                id: PARTNER_NAME_ID,
                text: name,
            },
        );
    }

    fn set_button_glyph(&self, button: Button, glyph: &str) {
        self.emit_state(
            "roulette-glyph",
            GlyphPayload {
                id: button.element_id(),
                glyph,
            },
        );
    }

    fn attach_stream(&self, surface: VideoSurface, stream_id: Option<&str>) {
        self.emit_state(
            "roulette-stream",
            StreamPayload {
                id: surface.element_id(),
                stream_id,
            },
        );
    }
}
