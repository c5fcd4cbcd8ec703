//! Gearshare demo
//!
//! Seeds a small organization, mounts the reassignment screen and plays a
//! scripted drag: Ann hands two of her three tents to Bo.
//!
//! Usage: gearshare [engine-config.json]
//! Data and logs go to $GEARSHARE_DATA_DIR (default ./gearshare-data).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use drag_engine::Point;
use gearshare::{
    mount, notice_channel, ControlMsg, EngineConfig, GestureEvent, GroupKey,
    ReassignmentCommitter, ScreenContext, SelectionCache,
};
use gearshare_lib::domain::{Container, Equipment, Membership, MembershipKind};
use gearshare_lib::repository::{OrganizationRepository, Repository};
use gearshare_lib::AppState;

const ORG: u32 = 1;

async fn seed(state: &AppState) -> Result<(u32, u32), String> {
    let memberships = state.memberships();
    let existing = memberships.list_by_organization(ORG).await.map_err(|e| e.to_string())?;
    if let (Some(ann), Some(bo)) = (
        existing.iter().find(|m| m.holder_name == "Ann"),
        existing.iter().find(|m| m.holder_name == "Bo"),
    ) {
        return Ok((ann.id, bo.id));
    }

    let ann = memberships
        .create(&Membership::new(0, ORG, "Ann".into(), MembershipKind::Member))
        .await
        .map_err(|e| e.to_string())?;
    let bo = memberships
        .create(&Membership::new(0, ORG, "Bo".into(), MembershipKind::Member))
        .await
        .map_err(|e| e.to_string())?;
    memberships
        .create(&Membership::new(0, ORG, "Garage".into(), MembershipKind::Storage))
        .await
        .map_err(|e| e.to_string())?;

    let equipment = state.equipment();
    for _ in 0..3 {
        equipment
            .create(&Equipment::new(0, ORG, ann.id, "Tent".into()))
            .await
            .map_err(|e| e.to_string())?;
    }
    let bag = state
        .containers()
        .create(&Container::new(0, ORG, bo.id, "Duffel".into()).with_color("#3B82F6"))
        .await
        .map_err(|e| e.to_string())?;
    equipment
        .create(&Equipment::new(0, ORG, bo.id, "Headlamp".into()).in_container(bag.id))
        .await
        .map_err(|e| e.to_string())?;
    Ok((ann.id, bo.id))
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let data_dir = std::env::var("GEARSHARE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("gearshare-data"));
    std::fs::create_dir_all(&data_dir)
        .map_err(|e| format!("Failed to create {}: {}", data_dir.display(), e))?;
    let logger = rolling_logger::init_logger(data_dir.join("logs"), "gearshare")?;

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(&PathBuf::from(path))?,
        None => EngineConfig::default(),
    };

    let state = AppState::open(&data_dir.join("gearshare.db")).await?;
    let (ann, bo) = seed(&state).await?;

    let feed = state.org_feed(ORG);
    feed.refresh().await.map_err(|e| e.to_string())?;

    let selection = SelectionCache::new();
    let (notices, mut toasts) = notice_channel();
    let store = Arc::new(state.reassignment_store(Arc::clone(&feed)));
    let committer = ReassignmentCommitter::new(store, selection.clone(), notices);
    let ctx = ScreenContext::new(ORG, ann, Some(bo));

    let layout = config.layout.clone();
    let hold = config.hold_duration();
    let screen = mount(config, &ctx, feed.subscribe(), committer, selection.clone());
    let handle = screen.handle;
    let mut events = screen.events;
    let mut view = screen.view;
    let control = tokio::spawn(screen.control.run());

    // Leave one tent behind
    selection.toggle(&GroupKey::owned(ann, "Tent"), 0, 3);
    handle.send(ControlMsg::Reaggregate);

    let tent = Point::new(layout.item_width / 2.0, layout.top_band_top + layout.item_width / 2.0);
    let below = Point::new(
        layout.screen_width / 2.0,
        layout.bottom_band_top + layout.item_width / 2.0,
    );
    handle.pointer_down(tent);
    tokio::time::sleep(hold + Duration::from_millis(100)).await;
    handle.pointer_move(below);
    handle.pointer_up(below);

    while let Some(event) = events.recv().await {
        tracing::info!("event: {:?}", event);
        if event == GestureEvent::DragEnded {
            break;
        }
    }

    // Wait for the committed move to come back through the feed
    let mut settled = false;
    for _ in 0..10 {
        if tokio::time::timeout(Duration::from_millis(500), view.changed()).await.is_err() {
            break;
        }
        let current = view.borrow_and_update().clone();
        for item in &current.bottom.items {
            tracing::info!("Bo holds {} x{}", item.name(), item.display_count());
        }
        if current.bottom.items.iter().any(|i| i.name() == "Tent") {
            settled = true;
            break;
        }
    }
    while let Ok(toast) = toasts.try_recv() {
        tracing::error!("{}", toast.notice);
    }

    handle.send(ControlMsg::Unmount);
    control.await.map_err(|e| e.to_string())?;

    tracing::info!("done (moved: {}), log at {}", settled, logger.path().display());
    Ok(())
}
