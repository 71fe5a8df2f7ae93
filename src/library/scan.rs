use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::Path;
use std::time::Duration;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::ItemKey;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::{display_from_fields, normalize_track_number};
use super::model::Track;
use super::samples::sample_tracks;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Stable identifier for an artist name. Unknown artists get zero.
pub fn artist_id_of(artist: Option<&str>) -> u64 {
    match artist.map(str::trim).filter(|a| !a.is_empty()) {
        Some(a) => {
            let mut hasher = DefaultHasher::new();
            a.hash(&mut hasher);
            hasher.finish()
        }
        None => 0,
    }
}

/// Walk `dir` and build the track list. Sorted case-insensitively by
/// display string; ids are assigned after sorting so they match list order.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let min_duration = Duration::from_millis(settings.min_duration_ms);

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            let default_title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string();

            let mut title = default_title;
            let mut artist: Option<String> = None;
            let mut album: Option<String> = None;
            let mut duration: Option<Duration> = None;
            let mut track_number = 0u32;
            let mut year = 0u32;

            if let Ok(tagged) = lofty::read_from_path(path) {
                duration = Some(tagged.properties().duration());

                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.get_string(ItemKey::TrackTitle) {
                        if !v.trim().is_empty() {
                            title = v.to_string();
                        }
                    }
                    if let Some(v) = tag.get_string(ItemKey::TrackArtist) {
                        let v = v.trim();
                        if !v.is_empty() {
                            artist = Some(v.to_string());
                        }
                    }
                    if let Some(v) = tag.get_string(ItemKey::AlbumTitle) {
                        let v = v.trim();
                        if !v.is_empty() {
                            album = Some(v.to_string());
                        }
                    }
                    if let Some(v) = tag.get_string(ItemKey::TrackNumber) {
                        track_number = v.trim().parse().unwrap_or(0);
                    }
                    if let Some(v) = tag.get_string(ItemKey::Year) {
                        year = v.trim().parse().unwrap_or(0);
                    }
                }
            }

            // Skip clips shorter than the configured floor; unknown
            // durations pass so untagged files stay visible.
            if let Some(d) = duration {
                if d < min_duration {
                    continue;
                }
            }

            let display = display_from_fields(
                path,
                &title,
                artist.as_deref(),
                album.as_deref(),
                &settings.display_fields,
                &settings.display_separator,
            );

            tracks.push(Track {
                id: 0,
                title,
                artist_id: artist_id_of(artist.as_deref()),
                artist,
                album,
                duration,
                track_number: normalize_track_number(track_number),
                year,
                locator: path.to_path_buf(),
                display,
            });
        }
    }

    tracks.sort_by(|a, b| a.display.to_lowercase().cmp(&b.display.to_lowercase()));
    for (i, t) in tracks.iter_mut().enumerate() {
        t.id = i as u64 + 1;
    }
    tracks
}

/// Scan `dir`, falling back to the bundled sample list when nothing
/// playable was found (missing directory, no permission, no audio files).
pub fn load_tracks(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let tracks = scan(dir, settings);
    if tracks.is_empty() {
        eprintln!(
            "encore: no playable tracks under {}, using bundled samples",
            dir.display()
        );
        sample_tracks()
    } else {
        tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackDisplayField;
    use std::fs;
    use tempfile::tempdir;

    fn filename_settings() -> LibrarySettings {
        LibrarySettings {
            display_fields: vec![TrackDisplayField::Filename],
            min_duration_ms: 0,
            ..LibrarySettings::default()
        }
    }

    // Minimal PCM WAV (8 kHz, 8-bit mono) so lofty reports a real duration.
    fn write_wav(path: &std::path::Path, seconds: u32) {
        let sample_rate: u32 = 8000;
        let data_len = sample_rate * seconds;
        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(44 + data_len as usize, 0);
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.wav"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_filters_non_audio_sorts_and_assigns_sequential_ids() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = scan(dir.path(), &filename_settings());
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].display, "A");
        assert_eq!(tracks[1].display, "b");
        assert_eq!(tracks[0].id, 1);
        assert_eq!(tracks[1].id, 2);
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..filename_settings()
        };
        let tracks = scan(dir.path(), &settings);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].display, "visible");
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..filename_settings()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].display, "root");
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
        // With max_depth=2 we should see root + d1/*, but not d1/d2/*.
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..filename_settings()
        };
        let tracks = scan(dir.path(), &settings);

        let names: Vec<String> = tracks.iter().map(|t| t.display.clone()).collect();
        assert!(names.contains(&"root".to_string()));
        assert!(names.contains(&"one".to_string()));
        assert!(!names.contains(&"two".to_string()));
    }

    #[test]
    fn scan_skips_tracks_below_the_duration_floor() {
        let dir = tempdir().unwrap();
        write_wav(&dir.path().join("short.wav"), 1);
        // Unparseable, so its duration is unknown and it must survive.
        fs::write(dir.path().join("unknown.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            min_duration_ms: 10_000,
            ..filename_settings()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].display, "unknown");

        // Without a floor the short clip is included again.
        let tracks = scan(dir.path(), &filename_settings());
        assert_eq!(tracks.len(), 2);
    }

    #[test]
    fn load_tracks_falls_back_to_samples_when_scan_is_empty() {
        let dir = tempdir().unwrap();
        let tracks = load_tracks(dir.path(), &filename_settings());
        assert!(!tracks.is_empty());
        assert_eq!(tracks[0].id, sample_tracks()[0].id);
    }

    #[test]
    fn artist_id_is_stable_and_zero_for_unknown() {
        assert_eq!(artist_id_of(None), 0);
        assert_eq!(artist_id_of(Some("   ")), 0);
        assert_eq!(artist_id_of(Some("Nina Simone")), artist_id_of(Some("Nina Simone")));
        assert_ne!(artist_id_of(Some("Nina Simone")), artist_id_of(Some("Miles Davis")));
    }
}
