use std::path::PathBuf;
use std::time::Duration;

/// A playable track. Immutable once constructed; a list of tracks is
/// produced wholesale by the scanner or the sample provider.
#[derive(Debug, Clone)]
pub struct Track {
    /// Stable identifier within the list the track came from.
    pub id: u64,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    /// Track number with the disc-thousands encoding already stripped.
    pub track_number: u32,
    pub year: u32,
    /// Stable hash of the artist name; zero when the artist is unknown.
    pub artist_id: u64,
    /// Where the audio lives. Opaque to everything except the decoder.
    pub locator: PathBuf,
    /// Precomputed list/status line text.
    pub display: String,
}
