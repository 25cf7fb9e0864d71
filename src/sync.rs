/// Group synchronizer: reconciles the window's live tab groups and
/// the archive bookmark folder, and moves groups between the two.
use std::collections::HashMap;

use log::{debug, warn};

use crate::browser::{BrowserHost, HostError};
use crate::group_data::{
    ArchivedGroup, BookmarkLeaf, BookmarkNode, GroupData, Snapshot, TabGroupInfo, TabInfo,
    ROOT_FOLDER_TITLE, TAB_GROUP_ID_NONE,
};
use crate::group_key::GroupKey;

/// Result of an archive attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// The group's tabs were bookmarked under `folder_id` and closed.
    Archived { folder_id: String, tabs: usize },
    /// Some tab had no settled or pending URL; nothing was changed.
    TabsNotReady,
}

/// Result of a restore attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The folder's bookmarks were reopened as group `group_id` and
    /// the folder deleted.
    Restored { group_id: i32, tabs: usize },
    /// The folder had no bookmarks; nothing was changed.
    EmptyFolder,
}

pub struct GroupSynchronizer<H> {
    host: H,
}

impl<H: BrowserHost> GroupSynchronizer<H> {
    pub fn new(host: H) -> GroupSynchronizer<H> {
        GroupSynchronizer { host }
    }

    /// Rebuild both lists from scratch out of live browser state.
    ///
    /// Never creates the root folder; a missing root just means an
    /// empty archived list.
    pub async fn refresh(&self) -> Result<Snapshot, HostError> {
        let groups = self.host.tab_groups().await?;
        let tabs = self.host.unpinned_tabs().await?;
        let active = partition_groups(&groups, &tabs);

        let archived = match self.find_root().await? {
            Some(root) => {
                let tree = self.host.bookmark_subtree(&root.id).await?;
                archived_from_children(tree.children.as_deref().unwrap_or(&[]))
            }
            None => Vec::new(),
        };

        let snapshot = Snapshot { active, archived };
        if let Ok(json) = serde_json::to_string(&snapshot) {
            debug!("refresh: {json}");
        }
        Ok(snapshot)
    }

    /// Persist a live group as a bookmark folder and close its tabs.
    ///
    /// Leaves are created in tab display order, each before its tab's
    /// removal is issued; every removal has settled when this returns,
    /// so a single refresh afterwards sees the final state.
    pub async fn archive_group(&self, group: &GroupData) -> Result<ArchiveOutcome, HostError> {
        let mut urls = Vec::with_capacity(group.tabs.len());
        for tab in &group.tabs {
            match tab.archive_url() {
                Some(url) => urls.push(url.to_string()),
                None => {
                    warn!("archive '{}': a tab is still loading", group.title);
                    return Ok(ArchiveOutcome::TabsNotReady);
                }
            }
        }

        let root = self.ensure_root().await?;
        let key = GroupKey::new(group.title.clone(), group.group.color);
        let folder = self.resolve_group_folder(&root.id, &key).await?;

        for (i, (tab, url)) in group.tabs.iter().zip(&urls).enumerate() {
            let title = if tab.title.is_empty() { " " } else { tab.title.as_str() };
            self.host
                .create_leaf(&folder.id, title, url, i as u32)
                .await?;
            self.host.remove_tab(tab.id).await?;
        }

        Ok(ArchiveOutcome::Archived {
            folder_id: folder.id,
            tabs: group.tabs.len(),
        })
    }

    /// Reopen an archived folder as a collapsed group and consume the
    /// archive record.
    pub async fn restore_group(&self, folder: &ArchivedGroup) -> Result<RestoreOutcome, HostError> {
        if folder.leaves.is_empty() {
            warn!("restore '{}': folder has no bookmarks", folder.key.title);
            return Ok(RestoreOutcome::EmptyFolder);
        }

        let mut tab_ids = Vec::with_capacity(folder.leaves.len());
        for leaf in &folder.leaves {
            tab_ids.push(self.host.create_tab(&leaf.url, false).await?);
        }

        let group_id = self.host.group_tabs(&tab_ids).await?;
        self.host.update_group(group_id, &folder.key, true).await?;

        // Keep the restored group adjacent to the other groups instead
        // of appended at the far right.
        let tabs = self.host.unpinned_tabs().await?;
        self.host
            .move_group(group_id, leftmost_index(&tabs))
            .await?;

        self.host.remove_bookmark_tree(&folder.id).await?;

        Ok(RestoreOutcome::Restored {
            group_id,
            tabs: tab_ids.len(),
        })
    }

    /// The root folder, if it exists. Folders only; among duplicates
    /// the first the host reports wins.
    async fn find_root(&self) -> Result<Option<BookmarkNode>, HostError> {
        let matches = self.host.search_bookmarks(ROOT_FOLDER_TITLE).await?;
        let mut folders = matches.into_iter().filter(|node| node.is_folder());
        let first = folders.next();
        if folders.next().is_some() {
            warn!("multiple '{ROOT_FOLDER_TITLE}' folders exist, using the first");
        }
        Ok(first)
    }

    async fn ensure_root(&self) -> Result<BookmarkNode, HostError> {
        match self.find_root().await? {
            Some(root) => Ok(root),
            None => self.host.create_folder(None, ROOT_FOLDER_TITLE).await,
        }
    }

    /// The group's folder under `root_id`, created when absent. Only
    /// children of the root qualify; duplicates resolve to the lowest
    /// bookmark index.
    async fn resolve_group_folder(
        &self,
        root_id: &str,
        key: &GroupKey,
    ) -> Result<BookmarkNode, HostError> {
        let encoded = key.encode();
        let mut candidates: Vec<BookmarkNode> = self
            .host
            .search_bookmarks(&encoded)
            .await?
            .into_iter()
            .filter(|node| node.is_folder() && node.parent_id.as_deref() == Some(root_id))
            .collect();

        if candidates.len() > 1 {
            warn!(
                "{} folders share the title '{encoded}', using the lowest index",
                candidates.len()
            );
        }
        candidates.sort_by_key(|node| node.index.unwrap_or(u32::MAX));

        match candidates.into_iter().next() {
            Some(folder) => Ok(folder),
            None => self.host.create_folder(Some(root_id), &encoded).await,
        }
    }
}

/// Partition non-pinned tabs into their owning groups, in tab order,
/// creating each group entry on first encounter. Ungrouped tabs are
/// dropped; so are tabs naming a group the browser did not report.
pub fn partition_groups(groups: &[TabGroupInfo], tabs: &[TabInfo]) -> Vec<GroupData> {
    let by_id: HashMap<i32, &TabGroupInfo> = groups.iter().map(|group| (group.id, group)).collect();

    let mut all: Vec<GroupData> = Vec::new();
    for tab in tabs {
        if tab.group_id == TAB_GROUP_ID_NONE {
            continue;
        }
        if let Some(pos) = all.iter().position(|data| data.group.id == tab.group_id) {
            all[pos].tabs.push(tab.clone());
        } else if let Some(group) = by_id.get(&tab.group_id) {
            all.push(GroupData {
                title: group.title.clone(),
                group: (*group).clone(),
                tabs: vec![tab.clone()],
            });
        } else {
            warn!("tab {} references unknown group {}", tab.id, tab.group_id);
        }
    }
    all
}

/// First-level folders of the root become archived groups; only their
/// URL-bearing children count as leaves.
pub fn archived_from_children(children: &[BookmarkNode]) -> Vec<ArchivedGroup> {
    children
        .iter()
        .filter(|node| node.is_folder())
        .map(|folder| ArchivedGroup {
            id: folder.id.clone(),
            key: GroupKey::decode(&folder.title),
            leaves: folder
                .children
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .filter_map(|child| {
                    child.url.as_ref().map(|url| BookmarkLeaf {
                        title: child.title.clone(),
                        url: url.clone(),
                    })
                })
                .collect(),
        })
        .collect()
}

/// Window-relative index of the first non-pinned tab, 0 when none.
pub fn leftmost_index(tabs: &[TabInfo]) -> i32 {
    tabs.first().map(|tab| tab.index).unwrap_or(0)
}
