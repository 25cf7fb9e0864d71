/// Popup UI for the group organizer extension

use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::browser::{delay_ms, ChromeBrowser};
use crate::group_data::{ArchivedGroup, GroupData, Snapshot};
use crate::sync::GroupSynchronizer;

/// Wait before the post-restore late refresh; the host reports the
/// new group's tabs asynchronously.
const LATE_REFRESH_MS: u32 = 1000;

#[derive(Clone, PartialEq)]
enum AppState {
    Loading(String),
    Idle,
    Error(String),
}

// Localization
struct Labels {
    active: &'static str,
    archived: &'static str,
    no_tabs: &'static str,
}

fn labels() -> Labels {
    let jp = web_sys::window()
        .and_then(|window| window.navigator().language())
        .map(|lang| lang.starts_with("ja"))
        .unwrap_or(false);

    if jp {
        Labels {
            active: "アクティブ",
            archived: "アーカイブ済み",
            no_tabs: "使用する前にタブ グループを作成してください",
        }
    } else {
        Labels {
            active: "Active",
            archived: "Archived",
            no_tabs: "Please create tab groups before using",
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Loading("Loading groups...".to_string()));
    let snapshot = use_state(|| None::<Snapshot>);

    // Initial refresh on mount
    {
        let state = state.clone();
        let snapshot = snapshot.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                refresh_into(snapshot, state).await;
            });
            || ()
        });
    }

    // Archive an active group
    let on_archive = {
        let state = state.clone();
        let snapshot = snapshot.clone();

        Callback::from(move |group: GroupData| {
            let state = state.clone();
            let snapshot = snapshot.clone();
            state.set(AppState::Loading(format!("Archiving {}...", group.title)));

            spawn_local(async move {
                match GroupSynchronizer::new(ChromeBrowser).archive_group(&group).await {
                    Ok(_) => refresh_into(snapshot, state).await,
                    Err(e) => state.set(AppState::Error(format!("Archive failed: {e}"))),
                }
            });
        })
    };

    // Restore an archived group
    let on_restore = {
        let state = state.clone();
        let snapshot = snapshot.clone();

        Callback::from(move |folder: ArchivedGroup| {
            let state = state.clone();
            let snapshot = snapshot.clone();
            state.set(AppState::Loading(format!("Loading {}...", folder.key.title)));

            spawn_local(async move {
                let sync = GroupSynchronizer::new(ChromeBrowser);
                match sync.restore_group(&folder).await {
                    Ok(_) => {
                        refresh_into(snapshot.clone(), state.clone()).await;
                        // The host indexes the new group's tabs lazily;
                        // look once more after it settles.
                        if delay_ms(LATE_REFRESH_MS).await.is_ok() {
                            refresh_into(snapshot, state).await;
                        }
                    }
                    Err(e) => state.set(AppState::Error(format!("Restore failed: {e}"))),
                }
            });
        })
    };

    let labels = labels();
    let is_busy = !matches!(*state, AppState::Idle);

    let (active, archived) = match &*snapshot {
        Some(snap) => (snap.active.clone(), snap.archived.clone()),
        None => (Vec::new(), Vec::new()),
    };

    html! {
        <div class="popup">
            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                AppState::Idle => html! {}
            }}

            if snapshot.is_some() && active.is_empty() && archived.is_empty() {
                <p class="empty-state">{labels.no_tabs}</p>
            }

            if !active.is_empty() {
                <p class="list-label">{labels.active}</p>
            }
            <div class="groups-container groups-active">
                {for active.iter().map(|group| {
                    let onclick = on_archive.reform({
                        let group = group.clone();
                        move |_| group.clone()
                    });
                    html! {
                        <button
                            key={group.group.id}
                            class={format!("groups-button group-{}", group.group.color)}
                            disabled={is_busy}
                            onclick={onclick}
                        >
                            {&group.title}
                        </button>
                    }
                })}
            </div>

            if !archived.is_empty() {
                <p class="list-label">{labels.archived}</p>
            }
            <div class="groups-container">
                {for archived.iter().map(|folder| {
                    let onclick = on_restore.reform({
                        let folder = folder.clone();
                        move |_| folder.clone()
                    });
                    html! {
                        <button
                            key={folder.id.clone()}
                            class={format!("groups-button group-{}", folder.key.color)}
                            disabled={is_busy}
                            onclick={onclick}
                        >
                            {&folder.key.title}
                        </button>
                    }
                })}
            </div>
        </div>
    }
}

// Helper functions

async fn refresh_into(snapshot: UseStateHandle<Option<Snapshot>>, state: UseStateHandle<AppState>) {
    match GroupSynchronizer::new(ChromeBrowser).refresh().await {
        Ok(snap) => {
            snapshot.set(Some(snap));
            state.set(AppState::Idle);
        }
        Err(e) => state.set(AppState::Error(format!("Refresh failed: {e}"))),
    }
}
