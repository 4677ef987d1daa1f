use std::path::PathBuf;

/// Directory under the user's home that holds the integration config.
pub const CONFIG_DIR_NAME: &str = ".claude";
/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "qwen-config.json";

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Resolve `~/.claude` for the current user.
///
/// Returns `None` when no home directory can be determined (e.g. no HOME in
/// containers).
pub fn config_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(CONFIG_DIR_NAME))
}

/// Resolve `~/.claude/qwen-config.json`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
