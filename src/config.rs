use crate::game::GameMode;
use configparser::ini::Ini;
use log::{info, warn};
use once_cell::sync::OnceCell;

// Window
pub const WINDOW_TITLE: &str = "Arrow Lapse";
pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;

// Asset Paths
pub const BACKGROUND_TEXTURE_PATH: &str = "assets/graphics/background.png";
pub const TITLE_TEXTURE_PATH: &str = "assets/graphics/title.png";
pub const ARROW_TEXTURE_PATH: &str = "assets/graphics/arrow.png";
pub const ARCADE_FONT_TEXTURE_PATH: &str = "assets/fonts/arcade 16x6.png";
pub const DANCING_GIF_PATH: &str = "assets/gifs/dancing.gif";
pub const RANK_GIF_DIR: &str = "assets/gifs";

// Misc
pub const MAX_DELTA_TIME: f32 = 0.1;

const CONFIG_PATH: &str = "arrowlapse.ini";

#[derive(Debug, Clone)]
pub struct Config {
    pub display_width: u32,
    pub display_height: u32,
    pub vsync: bool,
    pub windowed: bool,
    pub show_stats: bool,
    pub mode: GameMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            display_width: WINDOW_WIDTH,
            display_height: WINDOW_HEIGHT,
            vsync: true,
            windowed: true,
            show_stats: false,
            mode: GameMode::Ranked,
        }
    }
}

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Reads `arrowlapse.ini` next to the binary. Any missing file, section or
/// key falls back to the default.
pub fn load() {
    let config = CONFIG.get_or_init(read_config_file);
    info!(
        "Config: {}x{} vsync={} windowed={} mode={}",
        config.display_width, config.display_height, config.vsync, config.windowed, config.mode
    );
}

pub fn get() -> &'static Config {
    CONFIG.get_or_init(read_config_file)
}

fn read_config_file() -> Config {
    let mut defaults = Config::default();

    let mut ini = Ini::new();
    if ini.load(CONFIG_PATH).is_err() {
        info!("No config file at '{}', using defaults.", CONFIG_PATH);
        return defaults;
    }

    if let Ok(Some(w)) = ini.getuint("display", "width") {
        defaults.display_width = w as u32;
    }
    if let Ok(Some(h)) = ini.getuint("display", "height") {
        defaults.display_height = h as u32;
    }
    if let Ok(Some(vsync)) = ini.getbool("display", "vsync") {
        defaults.vsync = vsync;
    }
    if let Ok(Some(windowed)) = ini.getbool("display", "windowed") {
        defaults.windowed = windowed;
    }
    if let Ok(Some(show_stats)) = ini.getbool("display", "show_stats") {
        defaults.show_stats = show_stats;
    }
    if let Some(mode) = ini.get("game", "mode") {
        match mode.parse::<GameMode>() {
            Ok(m) => defaults.mode = m,
            Err(e) => warn!("{}; keeping mode={}", e, defaults.mode),
        }
    }

    defaults
}
