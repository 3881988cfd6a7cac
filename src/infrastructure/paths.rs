//! Filesystem locations for bookscout data.
//!
//! The favorites file and span log live under the platform data directory
//! (`~/.local/share/bookscout` on Linux, `~/Library/Application Support/bookscout`
//! on macOS). When no data directory can be determined, a `.bookscout`
//! directory in the working directory is used instead.

use std::path::PathBuf;

const APP_DIR: &str = "bookscout";

/// Returns the data directory for bookscout storage.
///
/// The directory is not created here; writers create it on first use.
///
/// # Examples
///
/// ```
/// use bookscout::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert!(data_dir.ends_with("bookscout") || data_dir.ends_with(".bookscout"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(format!(".{APP_DIR}")),
        |dir| dir.join(APP_DIR),
    )
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a tilde prefix, and all paths when the home directory is
/// unknown, are returned unchanged.
///
/// # Examples
///
/// ```
/// use bookscout::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// assert_eq!(expand_tilde("relative"), PathBuf::from("relative"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };

    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_paths_resolve_under_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/books/favorites.json"), home.join("books/favorites.json"));
        }
    }

    #[test]
    fn embedded_tilde_is_untouched() {
        assert_eq!(expand_tilde("data/~/x"), PathBuf::from("data/~/x"));
        assert_eq!(expand_tilde("~user/x"), PathBuf::from("~user/x"));
    }
}
