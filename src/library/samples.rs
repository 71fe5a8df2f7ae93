use std::path::PathBuf;
use std::time::Duration;

use super::model::Track;
use super::scan::artist_id_of;

struct SampleSpec {
    id: u64,
    title: &'static str,
    artist: &'static str,
    album: &'static str,
    duration_secs: u64,
    track_number: u32,
    year: u32,
    locator: &'static str,
}

const SAMPLES: &[SampleSpec] = &[
    SampleSpec {
        id: 1,
        title: "Front Center",
        artist: "ALSA Project",
        album: "Speaker Test",
        duration_secs: 2,
        track_number: 1,
        year: 2006,
        locator: "/usr/share/sounds/alsa/Front_Center.wav",
    },
    SampleSpec {
        id: 2,
        title: "Front Left",
        artist: "ALSA Project",
        album: "Speaker Test",
        duration_secs: 2,
        track_number: 2,
        year: 2006,
        locator: "/usr/share/sounds/alsa/Front_Left.wav",
    },
    SampleSpec {
        id: 3,
        title: "Front Right",
        artist: "ALSA Project",
        album: "Speaker Test",
        duration_secs: 2,
        track_number: 3,
        year: 2006,
        locator: "/usr/share/sounds/alsa/Front_Right.wav",
    },
    SampleSpec {
        id: 4,
        title: "Noise",
        artist: "ALSA Project",
        album: "Speaker Test",
        duration_secs: 4,
        track_number: 4,
        year: 2006,
        locator: "/usr/share/sounds/alsa/Noise.wav",
    },
    SampleSpec {
        id: 5,
        title: "Bell",
        artist: "freedesktop.org",
        album: "Sound Theme",
        duration_secs: 1,
        track_number: 1,
        year: 2008,
        locator: "/usr/share/sounds/freedesktop/stereo/bell.oga",
    },
    SampleSpec {
        id: 6,
        title: "Complete",
        artist: "freedesktop.org",
        album: "Sound Theme",
        duration_secs: 1,
        track_number: 2,
        year: 2008,
        locator: "/usr/share/sounds/freedesktop/stereo/complete.oga",
    },
    SampleSpec {
        id: 7,
        title: "Message",
        artist: "freedesktop.org",
        album: "Sound Theme",
        duration_secs: 1,
        track_number: 3,
        year: 2008,
        locator: "/usr/share/sounds/freedesktop/stereo/message.oga",
    },
    SampleSpec {
        id: 8,
        title: "Service Login",
        artist: "freedesktop.org",
        album: "Sound Theme",
        duration_secs: 2,
        track_number: 4,
        year: 2008,
        locator: "/usr/share/sounds/freedesktop/stereo/service-login.oga",
    },
];

/// Fixed fallback list used when a scan produces no playable tracks.
/// The locators point at sounds most desktops ship; a missing file is
/// handled the same way as any other unplayable track.
pub fn sample_tracks() -> Vec<Track> {
    SAMPLES
        .iter()
        .map(|s| Track {
            id: s.id,
            title: s.title.to_string(),
            artist: Some(s.artist.to_string()),
            album: Some(s.album.to_string()),
            duration: Some(Duration::from_secs(s.duration_secs)),
            track_number: s.track_number,
            year: s.year,
            artist_id: artist_id_of(Some(s.artist)),
            locator: PathBuf::from(s.locator),
            display: format!("{} - {}", s.artist, s.title),
        })
        .collect()
}
