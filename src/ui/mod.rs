#[cfg(feature = "desktop")]
pub mod webview;

pub const PARTNER_NAME_ID: &str = "partner-name";

pub const GLYPH_UNMUTED: &str = "🔇";
pub const GLYPH_MUTED: &str = "🔊";
pub const GLYPH_VIDEO_ON: &str = "📹";
pub const GLYPH_VIDEO_OFF: &str = "📵";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Waiting,
    Call,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Login, Screen::Waiting, Screen::Call];

    pub fn element_id(self) -> &'static str {
        match self {
            Screen::Login => "login-screen",
            Screen::Waiting => "waiting-screen",
            Screen::Call => "call-screen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Mute,
    Video,
}

impl Button {
    pub fn element_id(self) -> &'static str {
        match self {
            Button::Mute => "mute-btn",
            Button::Video => "video-btn",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoSurface {
    Local,
    Remote,
}

impl VideoSurface {
    pub fn element_id(self) -> &'static str {
        match self {
            VideoSurface::Local => "local-video",
            VideoSurface::Remote => "remote-video",
        }
    }
}

/// Presentation surface driven by the client.
pub trait Ui: Send + Sync {
    fn set_screen_hidden(&self, screen: Screen, hidden: bool);

    /// Blocking notice for the user.
    fn alert(&self, message: &str);

    fn set_partner_name(&self, name: &str);

    fn set_button_glyph(&self, button: Button, glyph: &str);

    /// `None` detaches whatever was shown.
    fn attach_stream(&self, surface: VideoSurface, stream_id: Option<&str>);
}

/// Hides every screen, then shows `screen`.
pub fn show_screen(ui: &dyn Ui, screen: Screen) {
    for s in Screen::ALL {
        ui.set_screen_hidden(s, true);
    }
    ui.set_screen_hidden(screen, false);
}

pub fn mute_glyph(muted: bool) -> &'static str {
    if muted {
        GLYPH_MUTED
    } else {
        GLYPH_UNMUTED
    }
}

pub fn video_glyph(enabled: bool) -> &'static str {
    if enabled {
        GLYPH_VIDEO_ON
    } else {
        GLYPH_VIDEO_OFF
    }
}
