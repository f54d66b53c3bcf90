/// UI-wide string constants (action names / defaults).
///
/// Keep these in one place to reduce scattered hard-coded strings.
pub const WINDOW_TITLE: &str = "Word Lookup";

/// Row prefilled by "Add" in the source manager.
pub const NEW_SOURCE_NAME: &str = "New Source";
pub const NEW_SOURCE_TEMPLATE: &str = "https://192.168.1.4:8443/dict.html?q={word}";

/// Window actions (registered on the window, referenced as `win.<name>`).
pub const ACTION_SOURCE: &str = "source";
pub const ACTION_MANAGE_SOURCES: &str = "manage-sources";
pub const ACTION_ZOOM_IN: &str = "zoom-in";
pub const ACTION_ZOOM_OUT: &str = "zoom-out";
pub const ACTION_ZOOM_RESET: &str = "zoom-reset";
pub const ACTION_DEVTOOLS: &str = "devtools";

/// How often the main loop drains words delivered by the coordination thread.
pub const WORD_DRAIN_INTERVAL_MS: u64 = 50;

/// Used when no monitor geometry is available.
pub const DEFAULT_WIDTH: i32 = 480;
pub const DEFAULT_HEIGHT: i32 = 900;
