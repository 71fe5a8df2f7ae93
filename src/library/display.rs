//! Display-text and formatting helpers for tracks.

use std::path::Path;
use std::time::Duration;

use crate::config::TrackDisplayField;

/// Build a display string for a track according to the configured `fields`
/// and separator, falling back to `title` when no parts were produced.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Title => {
                if !title.trim().is_empty() {
                    parts.push(title.trim().to_string());
                }
            }
            TrackDisplayField::Artist => {
                if let Some(a) = artist.map(str::trim).filter(|s| !s.is_empty()) {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Album => {
                if let Some(a) = album.map(str::trim).filter(|s| !s.is_empty()) {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Filename => {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if !stem.trim().is_empty() {
                        parts.push(stem.to_string());
                    }
                }
            }
        }
    }

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}

/// Format a `Duration` as `MM:SS`. Minutes are not capped at 59.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Strip the disc-number thousands encoding some taggers use for track
/// numbers (disc 1 track 3 is stored as 1003).
pub fn normalize_track_number(track_number: u32) -> u32 {
    if track_number >= 1000 {
        track_number % 1000
    } else {
        track_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_configured_fields_in_order() {
        let s = display_from_fields(
            Path::new("/tmp/x.mp3"),
            "Song",
            Some("Artist"),
            Some("Album"),
            &[TrackDisplayField::Artist, TrackDisplayField::Title],
            " - ",
        );
        assert_eq!(s, "Artist - Song");
    }

    #[test]
    fn display_skips_empty_fields_and_falls_back_to_title() {
        let s = display_from_fields(
            Path::new("/tmp/x.mp3"),
            "Song",
            Some("   "),
            None,
            &[TrackDisplayField::Artist, TrackDisplayField::Album],
            " - ",
        );
        assert_eq!(s, "Song");
    }

    #[test]
    fn display_filename_uses_the_stem() {
        let s = display_from_fields(
            Path::new("/music/07 - take five.flac"),
            "ignored",
            None,
            None,
            &[TrackDisplayField::Filename],
            " - ",
        );
        assert_eq!(s, "07 - take five");
    }

    #[test]
    fn format_mmss_pads_and_rolls_minutes() {
        assert_eq!(format_mmss(Duration::ZERO), "00:00");
        assert_eq!(format_mmss(Duration::from_secs(65)), "01:05");
        assert_eq!(format_mmss(Duration::from_millis(240_000)), "04:00");
        assert_eq!(format_mmss(Duration::from_secs(3725)), "62:05");
    }

    #[test]
    fn normalize_track_number_strips_disc_encoding() {
        assert_eq!(normalize_track_number(3), 3);
        assert_eq!(normalize_track_number(1003), 3);
        assert_eq!(normalize_track_number(2017), 17);
        assert_eq!(normalize_track_number(999), 999);
    }
}
