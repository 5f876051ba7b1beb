//! Text-prefix protocol spoken by the lightsaber controller.

use std::fmt;

pub const COLOR_PREFIX: &str = "Play COLOR:";
pub const EVENT_PREFIX: &str = "Play EVENT:";

/// Kind of table a command is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Color,
    Event,
}

impl Category {
    /// Line prefix that introduces commands of this category.
    pub fn prefix(self) -> &'static str {
        match self {
            Category::Color => COLOR_PREFIX,
            Category::Event => EVENT_PREFIX,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Color => f.write_str("color"),
            Category::Event => f.write_str("event"),
        }
    }
}

/// A recognised command line with its raw (trimmed, un-normalised) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    pub category: Category,
    pub key: &'a str,
}

impl<'a> Command<'a> {
    /// Classifies a received line by prefix. Returns `None` for lines that
    /// carry no recognised prefix. The key stops at a repeated prefix, so
    /// lines garbled by a doubled write still resolve to the first key.
    pub fn parse(line: &'a str) -> Option<Self> {
        [Category::Color, Category::Event]
            .into_iter()
            .find_map(|category| {
                let rest = line.strip_prefix(category.prefix())?;
                let key = rest.split(category.prefix()).next().unwrap_or(rest);
                Some(Command {
                    category,
                    key: key.trim(),
                })
            })
    }
}
