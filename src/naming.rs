//! File and directory names for downloaded audio.

use std::path::{Path, PathBuf};

use crate::catalog::{Bitrate, UNKNOWN};

/// Replace characters that are invalid in file names on common platforms.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect()
}

/// `<title>_<bitrate>kbps.mp3`
pub fn track_filename(title: &str, bitrate: Bitrate) -> String {
    let title = title.trim();
    let title = if title.is_empty() { UNKNOWN } else { title };
    format!("{}_{}.mp3", sanitize_filename(title), bitrate.label())
}

/// Per-request directory for a collection download under `root`.
pub fn collection_dir(root: &Path, title: &str, id: Option<&str>) -> PathBuf {
    let mut name = sanitize_filename(title.trim());
    if name.is_empty() {
        name = UNKNOWN.to_string();
    }
    if let Some(id) = id.filter(|id| !id.is_empty()) {
        name = format!("{} [{}]", name, sanitize_filename(id));
    }
    root.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_filename() {
        assert_eq!(
            track_filename("Tum Hi Ho", Bitrate::Kbps320),
            "Tum Hi Ho_320kbps.mp3"
        );
        assert_eq!(
            track_filename("AC/DC: Live?", Bitrate::Kbps160),
            "AC_DC_ Live__160kbps.mp3"
        );
        assert_eq!(track_filename("  ", Bitrate::Kbps320), "Unknown_320kbps.mp3");
    }

    #[test]
    fn test_collection_dir() {
        let root = Path::new("/tmp/music");
        assert_eq!(
            collection_dir(root, "Aashiqui 2", Some("1139549")),
            root.join("Aashiqui 2 [1139549]")
        );
        assert_eq!(collection_dir(root, "", None), root.join("Unknown"));
    }
}
