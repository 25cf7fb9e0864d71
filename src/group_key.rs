/// Bookmark-folder title encoding for archived groups
///
/// An archived group's folder carries both the group title and its
/// color in a single bookmark title, joined by `~~`:
///
/// - "Research" + blue  → "Research~~blue"
/// - "Weird~~Name" + red → "Weird~~Name~~red"
///
/// Decoding splits on the *last* separator so titles that themselves
/// contain `~~` survive a round trip. A missing or unrecognized color
/// token falls back to grey.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between the display title and the color tag.
pub const KEY_SEPARATOR: &str = "~~";

/// The browser's fixed set of tab-group colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    #[default]
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

impl GroupColor {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupColor::Grey => "grey",
            GroupColor::Blue => "blue",
            GroupColor::Red => "red",
            GroupColor::Yellow => "yellow",
            GroupColor::Green => "green",
            GroupColor::Pink => "pink",
            GroupColor::Purple => "purple",
            GroupColor::Cyan => "cyan",
            GroupColor::Orange => "orange",
        }
    }

    /// Parse a host color name. The host only ever emits lowercase.
    pub fn parse(value: &str) -> Option<GroupColor> {
        match value {
            "grey" => Some(GroupColor::Grey),
            "blue" => Some(GroupColor::Blue),
            "red" => Some(GroupColor::Red),
            "yellow" => Some(GroupColor::Yellow),
            "green" => Some(GroupColor::Green),
            "pink" => Some(GroupColor::Pink),
            "purple" => Some(GroupColor::Purple),
            "cyan" => Some(GroupColor::Cyan),
            "orange" => Some(GroupColor::Orange),
            _ => None,
        }
    }
}

impl fmt::Display for GroupColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group's display title and color, as persisted in a folder title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupKey {
    pub title: String,
    pub color: GroupColor,
}

impl GroupKey {
    pub fn new(title: impl Into<String>, color: GroupColor) -> GroupKey {
        GroupKey {
            title: title.into(),
            color,
        }
    }

    /// The bookmark-folder title for this key.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.title, KEY_SEPARATOR, self.color)
    }

    /// Recover a key from a folder title. The token after the last
    /// separator is the color; everything before it is the title.
    pub fn decode(folder_title: &str) -> GroupKey {
        match folder_title.rsplit_once(KEY_SEPARATOR) {
            Some((title, tag)) => GroupKey {
                title: title.to_string(),
                color: GroupColor::parse(tag).unwrap_or_default(),
            },
            None => GroupKey {
                title: folder_title.to_string(),
                color: GroupColor::Grey,
            },
        }
    }
}
