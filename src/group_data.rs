/// Data structures for the group organizer
use serde::{Deserialize, Serialize};

use crate::group_key::{GroupColor, GroupKey};

/// Group id the browser reports for tabs that belong to no group.
pub const TAB_GROUP_ID_NONE: i32 = -1;

/// Title of the single bookmark folder holding every archived group.
pub const ROOT_FOLDER_TITLE: &str = "_organizer_";

/// Information about a browser tab
///
/// `url` is empty while the tab is still navigating; `pending_url`
/// then carries the destination. Both empty means there is nothing to
/// persist for this tab yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub pending_url: String,
    #[serde(default = "ungrouped")]
    pub group_id: i32,
    #[serde(default)]
    pub index: i32,
    #[serde(default)]
    pub pinned: bool,
}

fn ungrouped() -> i32 {
    TAB_GROUP_ID_NONE
}

impl TabInfo {
    /// The URL an archive would persist: the settled URL, else the
    /// pending one. `None` while the tab has no destination at all.
    pub fn archive_url(&self) -> Option<&str> {
        if !self.url.is_empty() {
            Some(&self.url)
        } else if !self.pending_url.is_empty() {
            Some(&self.pending_url)
        } else {
            None
        }
    }
}

/// A live tab group as the browser reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabGroupInfo {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub color: GroupColor,
    #[serde(default)]
    pub collapsed: bool,
}

/// An active group with its member tabs, rebuilt on every refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupData {
    pub title: String,
    pub group: TabGroupInfo,
    pub tabs: Vec<TabInfo>,
}

/// A node of the host bookmark tree (folder when `url` is absent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}

/// One archived tab inside a group folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkLeaf {
    pub title: String,
    pub url: String,
}

/// An archived group: a first-level folder under the root, with its
/// decoded key and its bookmarks in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedGroup {
    pub id: String,
    pub key: GroupKey,
    pub leaves: Vec<BookmarkLeaf>,
}

/// The immutable value a refresh hands to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub active: Vec<GroupData>,
    pub archived: Vec<ArchivedGroup>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.archived.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_url_prefers_settled_url() {
        let tab = TabInfo {
            id: 1,
            title: "Docs".to_string(),
            url: "https://example.com/docs".to_string(),
            pending_url: "https://example.com/next".to_string(),
            group_id: 7,
            index: 0,
            pinned: false,
        };

        assert_eq!(tab.archive_url(), Some("https://example.com/docs"));
    }

    #[test]
    fn test_archive_url_falls_back_to_pending() {
        let tab = TabInfo {
            id: 1,
            title: String::new(),
            url: String::new(),
            pending_url: "https://example.com/loading".to_string(),
            group_id: 7,
            index: 0,
            pinned: false,
        };

        assert_eq!(tab.archive_url(), Some("https://example.com/loading"));
    }

    #[test]
    fn test_archive_url_none_while_busy() {
        let tab = TabInfo {
            id: 1,
            title: String::new(),
            url: String::new(),
            pending_url: String::new(),
            group_id: 7,
            index: 0,
            pinned: false,
        };

        assert_eq!(tab.archive_url(), None);
    }

    #[test]
    fn test_tab_deserializes_from_host_payload() {
        // The shape chrome.tabs.query hands the bridge.
        let json = r#"{
            "id": 42,
            "title": "Rust",
            "pendingUrl": "https://rust-lang.org",
            "groupId": 3,
            "index": 5,
            "pinned": false,
            "windowId": 1
        }"#;

        let tab: TabInfo = serde_json::from_str(json).unwrap();

        assert_eq!(tab.id, 42);
        assert_eq!(tab.url, "");
        assert_eq!(tab.pending_url, "https://rust-lang.org");
        assert_eq!(tab.group_id, 3);
    }

    #[test]
    fn test_bookmark_node_folder_detection() {
        let json = r#"{"id": "12", "parentId": "1", "title": "Work~~blue", "index": 0}"#;
        let folder: BookmarkNode = serde_json::from_str(json).unwrap();
        assert!(folder.is_folder());

        let json = r#"{"id": "13", "parentId": "12", "title": "Rust", "url": "https://rust-lang.org"}"#;
        let leaf: BookmarkNode = serde_json::from_str(json).unwrap();
        assert!(!leaf.is_folder());
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = Snapshot {
            active: vec![],
            archived: vec![ArchivedGroup {
                id: "12".to_string(),
                key: GroupKey::decode("Work~~blue"),
                leaves: vec![BookmarkLeaf {
                    title: "Rust".to_string(),
                    url: "https://rust-lang.org".to_string(),
                }],
            }],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(back, snapshot);
        assert!(!back.is_empty());
    }
}
