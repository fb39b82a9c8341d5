use engine_logging::{engine_debug, engine_warn};

use crate::{AppState, Behavior, Effect, Element, EventKind, Msg, Popover, RegionId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageLoaded => state.boot(),
        Msg::PollTimerFired { cycle } => state.poll_timer_fired(cycle),
        Msg::StatusFetched { cycle, result } => state.apply_status(cycle, result),
        Msg::TabActivated(tab_id) => state.activate_tab(&tab_id),
        Msg::TabFetched { tab_id, result } => {
            state.apply_tab(&tab_id, result);
            Vec::new()
        }
        Msg::ActionCompleted(result) => {
            state.apply_action(result);
            Vec::new()
        }
        Msg::Interaction { kind, target } => interact(&mut state, kind, target),
        Msg::StopPolling => state.stop_polling(),
    };

    (state, effects)
}

fn interact(state: &mut AppState, kind: EventKind, target: Element) -> Vec<Effect> {
    // Handlers only see elements of the latest render of their region.
    if !state.document().is_current(&target) {
        engine_debug!(
            "Dropping {:?} on stale <{}> from {:?}",
            kind,
            target.name,
            target.region
        );
        return Vec::new();
    }
    let Some(behavior) = state.dispatcher().resolve(kind, &target, state.document()) else {
        return Vec::new();
    };

    match behavior {
        Behavior::ShowPopover => {
            state.show_popover(Popover {
                title: target
                    .attr("data-original-title")
                    .or_else(|| target.attr("title"))
                    .map(str::to_string),
                content: target.attr("data-content").unwrap_or_default().to_string(),
            });
            Vec::new()
        }
        Behavior::OpenModal => {
            if let Some(template) = target.href_target() {
                state.open_modal(template, target.attr("data-content").unwrap_or_default());
            }
            Vec::new()
        }
        Behavior::DismissModal => {
            state.dismiss_modal(&target.region);
            Vec::new()
        }
        Behavior::ActivateTab => match target.href_target() {
            Some(tab) => state.activate_tab(tab),
            None => Vec::new(),
        },
        Behavior::SubmitAction => {
            if target.region != RegionId::Dashboard {
                return Vec::new();
            }
            let Some(action) = target.attr("action") else {
                engine_warn!("Control form without action: {}", target.html);
                return Vec::new();
            };
            match state.resolve(action) {
                Some(url) => vec![state.submit_action(url)],
                None => Vec::new(),
            }
        }
    }
}
