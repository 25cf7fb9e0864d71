/// Host browser collaborators: tabs, tab groups and bookmarks
///
/// Everything the synchronizer needs from the browser is named on the
/// `BrowserHost` trait. `ChromeBrowser` is the production
/// implementation, forwarding each call to a promise-returning bridge
/// function in `popup.js` and decoding the payload on the way back.
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

use crate::group_data::{BookmarkNode, TabGroupInfo, TabInfo};
use crate::group_key::GroupKey;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryTabGroups() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn createTab(url: &str, active: bool) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTab(tab_id: i32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn groupTabs(tab_ids: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn updateTabGroup(
        group_id: i32,
        title: &str,
        color: &str,
        collapsed: bool,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn moveTabGroup(group_id: i32, index: i32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn searchBookmarks(title: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn createBookmark(details: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getBookmarkSubTree(id: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeBookmarkTree(id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn delay(ms: u32) -> Result<(), JsValue>;
}

/// A host call that failed, tagged with the capability that raised it.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("{op} failed: {message}")]
    Call { op: &'static str, message: String },

    #[error("{op} returned a malformed payload: {message}")]
    Payload { op: &'static str, message: String },
}

impl HostError {
    fn call(op: &'static str, err: JsValue) -> HostError {
        HostError::Call {
            op,
            message: format!("{err:?}"),
        }
    }
}

fn from_js<T: DeserializeOwned>(op: &'static str, value: JsValue) -> Result<T, HostError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| HostError::Payload {
        op,
        message: e.to_string(),
    })
}

fn to_js<T: Serialize>(op: &'static str, value: &T) -> Result<JsValue, HostError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| HostError::Payload {
        op,
        message: e.to_string(),
    })
}

/// The browser capabilities the synchronizer consumes.
#[async_trait(?Send)]
pub trait BrowserHost {
    /// All tab groups of the current window.
    async fn tab_groups(&self) -> Result<Vec<TabGroupInfo>, HostError>;

    /// All non-pinned tabs of the current window, in display order.
    async fn unpinned_tabs(&self) -> Result<Vec<TabInfo>, HostError>;

    /// Open a tab at `url`; returns its id.
    async fn create_tab(&self, url: &str, active: bool) -> Result<i32, HostError>;

    async fn remove_tab(&self, tab_id: i32) -> Result<(), HostError>;

    /// Form a new group from the given tabs; returns the group id.
    async fn group_tabs(&self, tab_ids: &[i32]) -> Result<i32, HostError>;

    async fn update_group(
        &self,
        group_id: i32,
        key: &GroupKey,
        collapsed: bool,
    ) -> Result<(), HostError>;

    /// Reposition a group to a window-relative tab index.
    async fn move_group(&self, group_id: i32, index: i32) -> Result<(), HostError>;

    /// All bookmark nodes matching `title`, anywhere in the tree.
    async fn search_bookmarks(&self, title: &str) -> Result<Vec<BookmarkNode>, HostError>;

    /// Create a folder; a missing parent means the default bookmark bar.
    async fn create_folder(
        &self,
        parent_id: Option<&str>,
        title: &str,
    ) -> Result<BookmarkNode, HostError>;

    /// Create a bookmark under `parent_id` at `index`.
    async fn create_leaf(
        &self,
        parent_id: &str,
        title: &str,
        url: &str,
        index: u32,
    ) -> Result<BookmarkNode, HostError>;

    /// The node with `id`, with its children populated.
    async fn bookmark_subtree(&self, id: &str) -> Result<BookmarkNode, HostError>;

    async fn remove_bookmark_tree(&self, id: &str) -> Result<(), HostError>;
}

/// Creation details for `chrome.bookmarks.create`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookmarkDetails<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a str>,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<u32>,
}

/// Production host backed by the extension's JS bridge.
#[derive(Clone, Copy, Default)]
pub struct ChromeBrowser;

#[async_trait(?Send)]
impl BrowserHost for ChromeBrowser {
    async fn tab_groups(&self) -> Result<Vec<TabGroupInfo>, HostError> {
        let op = "tabGroups.query";
        let value = queryTabGroups().await.map_err(|e| HostError::call(op, e))?;
        from_js(op, value)
    }

    async fn unpinned_tabs(&self) -> Result<Vec<TabInfo>, HostError> {
        let op = "tabs.query";
        let value = queryTabs().await.map_err(|e| HostError::call(op, e))?;
        from_js(op, value)
    }

    async fn create_tab(&self, url: &str, active: bool) -> Result<i32, HostError> {
        let op = "tabs.create";
        let value = createTab(url, active)
            .await
            .map_err(|e| HostError::call(op, e))?;
        let tab: TabInfo = from_js(op, value)?;
        Ok(tab.id)
    }

    async fn remove_tab(&self, tab_id: i32) -> Result<(), HostError> {
        removeTab(tab_id)
            .await
            .map_err(|e| HostError::call("tabs.remove", e))
    }

    async fn group_tabs(&self, tab_ids: &[i32]) -> Result<i32, HostError> {
        let op = "tabs.group";
        let ids = to_js(op, &tab_ids)?;
        let value = groupTabs(ids).await.map_err(|e| HostError::call(op, e))?;
        from_js(op, value)
    }

    async fn update_group(
        &self,
        group_id: i32,
        key: &GroupKey,
        collapsed: bool,
    ) -> Result<(), HostError> {
        updateTabGroup(group_id, &key.title, key.color.as_str(), collapsed)
            .await
            .map_err(|e| HostError::call("tabGroups.update", e))
    }

    async fn move_group(&self, group_id: i32, index: i32) -> Result<(), HostError> {
        moveTabGroup(group_id, index)
            .await
            .map_err(|e| HostError::call("tabGroups.move", e))
    }

    async fn search_bookmarks(&self, title: &str) -> Result<Vec<BookmarkNode>, HostError> {
        let op = "bookmarks.search";
        let value = searchBookmarks(title)
            .await
            .map_err(|e| HostError::call(op, e))?;
        from_js(op, value)
    }

    async fn create_folder(
        &self,
        parent_id: Option<&str>,
        title: &str,
    ) -> Result<BookmarkNode, HostError> {
        let op = "bookmarks.create";
        let details = to_js(
            op,
            &CreateBookmarkDetails {
                parent_id,
                title,
                url: None,
                index: None,
            },
        )?;
        let value = createBookmark(details)
            .await
            .map_err(|e| HostError::call(op, e))?;
        from_js(op, value)
    }

    async fn create_leaf(
        &self,
        parent_id: &str,
        title: &str,
        url: &str,
        index: u32,
    ) -> Result<BookmarkNode, HostError> {
        let op = "bookmarks.create";
        let details = to_js(
            op,
            &CreateBookmarkDetails {
                parent_id: Some(parent_id),
                title,
                url: Some(url),
                index: Some(index),
            },
        )?;
        let value = createBookmark(details)
            .await
            .map_err(|e| HostError::call(op, e))?;
        from_js(op, value)
    }

    async fn bookmark_subtree(&self, id: &str) -> Result<BookmarkNode, HostError> {
        let op = "bookmarks.getSubTree";
        let value = getBookmarkSubTree(id)
            .await
            .map_err(|e| HostError::call(op, e))?;
        // The host wraps the result in a one-element array.
        let nodes: Vec<BookmarkNode> = from_js(op, value)?;
        nodes.into_iter().next().ok_or(HostError::Payload {
            op,
            message: "empty result".to_string(),
        })
    }

    async fn remove_bookmark_tree(&self, id: &str) -> Result<(), HostError> {
        removeBookmarkTree(id)
            .await
            .map_err(|e| HostError::call("bookmarks.removeTree", e))
    }
}

/// Await the bridge's timer. Used for the late refresh after a
/// restore, when the host is still settling its group indexing.
pub async fn delay_ms(ms: u32) -> Result<(), HostError> {
    delay(ms).await.map_err(|e| HostError::call("delay", e))
}
