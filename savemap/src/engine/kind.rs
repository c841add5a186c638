//! Game kinds and filename-based classification.

use std::fmt;
use std::path::Path;

/// Game a save file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    /// Europa Universalis IV
    Eu4,
    /// Crusader Kings III
    Ck3,
    /// Hearts of Iron IV
    Hoi4,
    /// Imperator: Rome
    Imperator,
    /// Victoria 3
    Vic3,
}

impl GameKind {
    /// All supported kinds.
    pub const ALL: [GameKind; 5] = [
        GameKind::Eu4,
        GameKind::Ck3,
        GameKind::Hoi4,
        GameKind::Imperator,
        GameKind::Vic3,
    ];

    /// Save file extension written by the game, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Eu4 => "eu4",
            Self::Ck3 => "ck3",
            Self::Hoi4 => "hoi4",
            Self::Imperator => "rome",
            Self::Vic3 => "v3",
        }
    }

    /// Short identifier used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eu4 => "eu4",
            Self::Ck3 => "ck3",
            Self::Hoi4 => "hoi4",
            Self::Imperator => "imperator",
            Self::Vic3 => "vic3",
        }
    }

    /// Match a bare extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.extension() == ext)
    }

    /// Classify by file name alone.
    ///
    /// Returns `None` for missing or unknown extensions; callers then fall
    /// back to content sniffing.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
