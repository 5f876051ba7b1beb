use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::Category;

/// Sound the fallback variant plays for every colour line.
pub const FALLBACK_SOUND: &str = "media/WEEEEEOW.mp3";

const COLOR_SOUNDS: [(&str, &str); 11] = [
    ("red", "media/darth-vader.mp3"),
    ("orange", "media/obi-wan.mp3"),
    ("yellow", "media/jar-jar.mp3"),
    ("green", "media/yoda.mp3"),
    ("cyan", "media/x-wing.mp3"),
    ("blue", "media/luke-skywalker.mp3"),
    ("purple", "media/WEEEEEOW.mp3"),
    ("magenta", "media/tie-fighter.mp3"),
    ("black", "media/tie-fighter.mp3"),
    ("white", "media/x-wing.mp3"),
    ("gray", "media/r2d2.mp3"),
];

// Keyed the way the firmware spells colour names.
const CAPITALISED_COLOR_SOUNDS: [(&str, &str); 11] = [
    ("Red", "media/darth-vader.mp3"),
    ("Orange", "media/obi-wan.mp3"),
    ("Yellow", "media/jar-jar.mp3"),
    ("Green", "media/yoda.mp3"),
    ("Cyan", "media/x-wing.mp3"),
    ("Blue", "media/luke-skywalker.mp3"),
    ("Purple", "media/WEEEEEOW.mp3"),
    ("Magenta", "media/tie-fighter.mp3"),
    ("Black", "media/tie-fighter.mp3"),
    ("White", "media/x-wing.mp3"),
    ("Gray", "media/r2d2.mp3"),
];

const EVENT_SOUNDS: [(&str, &str); 2] = [
    ("activated", "media/lightspeed.mp3"),
    ("deactivated", "media/c3po.mp3"),
];

/// Which of the two known bridge behaviours is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Colour and event tables, keys lower-cased before lookup.
    #[default]
    Mapped,
    /// Capitalised colour table looked up verbatim, the result is ignored and
    /// [`FALLBACK_SOUND`] plays instead. Event lines are not recognised.
    Fallback,
}

impl Variant {
    /// Returns whether lines of the given category are handled at all.
    pub fn handles(self, category: Category) -> bool {
        match self {
            Variant::Mapped => true,
            Variant::Fallback => category == Category::Color,
        }
    }

    /// Normalises a raw category key the way this variant looks it up.
    pub fn normalise_key(self, raw: &str) -> String {
        match self {
            Variant::Mapped => raw.to_lowercase(),
            Variant::Fallback => raw.to_string(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Mapped => f.write_str("mapped"),
            Variant::Fallback => f.write_str("fallback"),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mapped" => Ok(Variant::Mapped),
            "fallback" => Ok(Variant::Fallback),
            other => Err(format!(
                "unknown variant `{other}` (expected `mapped` or `fallback`)"
            )),
        }
    }
}

/// Immutable mapping from category key to sound file.
#[derive(Debug, Clone, Default)]
pub struct SoundTable {
    sounds: HashMap<String, PathBuf>,
}

impl SoundTable {
    /// Builds a table from literal `(key, path)` pairs.
    pub fn from_entries(entries: &[(&str, &str)]) -> Self {
        let sounds = entries
            .iter()
            .map(|(key, path)| (key.to_string(), PathBuf::from(path)))
            .collect();
        Self { sounds }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, key: &str) -> Option<&Path> {
        self.sounds.get(key).map(PathBuf::as_path)
    }

    /// Number of mapped keys.
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Returns `true` when nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Iterates over the mapped keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sounds.keys().map(String::as_str)
    }
}

/// The set of tables a variant dispatches against. Built once at startup.
#[derive(Debug, Clone)]
pub struct SoundTables {
    colors: SoundTable,
    events: Option<SoundTable>,
}

impl SoundTables {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Mapped => Self {
                colors: SoundTable::from_entries(&COLOR_SOUNDS),
                events: Some(SoundTable::from_entries(&EVENT_SOUNDS)),
            },
            Variant::Fallback => Self {
                colors: SoundTable::from_entries(&CAPITALISED_COLOR_SOUNDS),
                events: None,
            },
        }
    }

    pub fn table(&self, category: Category) -> Option<&SoundTable> {
        match category {
            Category::Color => Some(&self.colors),
            Category::Event => self.events.as_ref(),
        }
    }

    pub fn lookup(&self, category: Category, key: &str) -> Option<&Path> {
        self.table(category).and_then(|table| table.get(key))
    }
}
