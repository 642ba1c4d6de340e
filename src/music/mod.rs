//! Music player widget: playlist and weighted random selection

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A playable track with its selection weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub url: String,
    pub name: String,
    pub probability: f64,
    #[serde(default, rename = "isRare", alias = "is_rare")]
    pub is_rare: bool,
}

impl Song {
    fn new(url: &str, name: &str, probability: f64, is_rare: bool) -> Self {
        Self {
            url: url.to_string(),
            name: name.to_string(),
            probability,
            is_rare,
        }
    }
}

/// Built-in playlist: five common tracks and two rare ones
pub fn default_playlist() -> Vec<Song> {
    vec![
        Song::new(
            "https://soundcloud.com/thejackluo/015-memory-v3-part-1",
            "Memory V3 Part 1",
            0.18,
            false,
        ),
        Song::new("https://soundcloud.com/thejackluo/011-mom", "Mom", 0.18, false),
        Song::new(
            "https://soundcloud.com/thejackluo/007-mirrox",
            "Mirrox",
            0.18,
            false,
        ),
        Song::new(
            "https://soundcloud.com/thejackluo/005-reunion",
            "Reunion",
            0.18,
            false,
        ),
        Song::new("https://soundcloud.com/thejackluo/001-title", "Title", 0.18, false),
        Song::new(
            "https://soundcloud.com/thejackluo/memories-v2",
            "Memories V2",
            0.05,
            true,
        ),
        Song::new(
            "https://soundcloud.com/thejackluo/intersection",
            "Intersection",
            0.05,
            true,
        ),
    ]
}

/// Pick a song for a roll in `[0, 1)` by walking cumulative probabilities.
///
/// A roll past the total weight falls back to the first song.
pub fn pick(songs: &[Song], roll: f64) -> Option<&Song> {
    let mut cumulative = 0.0;
    for song in songs {
        cumulative += song.probability;
        if roll <= cumulative {
            return Some(song);
        }
    }
    songs.first()
}

/// Pick a song using the given random source
pub fn pick_with<'a, R: Rng + ?Sized>(songs: &'a [Song], rng: &mut R) -> Option<&'a Song> {
    let roll: f64 = rng.gen();
    pick(songs, roll)
}

/// Pick a song using the thread-local RNG
pub fn pick_random(songs: &[Song]) -> Option<&Song> {
    pick_with(songs, &mut rand::thread_rng())
}
