//! Utility functions for paths and game names.

use std::path::PathBuf;

/// Joins a directory path with a file or subdirectory name.
///
/// # Examples
///
/// ```
/// let path = get_path("/var/lib/lfg-bot", "subscriptions.json");
/// assert_eq!(path, PathBuf::from("/var/lib/lfg-bot/subscriptions.json"));
/// ```
pub fn get_path(dir_path: &str, file_name: &str) -> PathBuf {
    [dir_path, file_name].iter().collect()
}

/// Normalizes a user supplied game name into a slug.
///
/// The name is trimmed and lowercased, and runs of whitespace, `_` or `-`
/// become a single `-`, so `"Rocket League"` and `"rocket_league"` both give
/// `rocket-league`.
pub fn normalize_game(game: &str) -> String {
    game.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join("-")
}

/// Human readable name of a game slug: `rocket-league` gives `Rocket League`.
pub fn game_display_name(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
