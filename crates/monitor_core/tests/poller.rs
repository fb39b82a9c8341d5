mod common;

use common::*;
use monitor_core::{update, Effect, FailureClass, FetchFailure, Msg, PollPhase};
use pretty_assertions::assert_eq;

fn network_failure() -> FetchFailure {
    FetchFailure::new(FailureClass::Network, "connection refused")
}

#[test]
fn page_load_issues_a_single_status_fetch() {
    let (state, effects) = booted();

    assert_eq!(status_fetches(&effects), 1);
    assert!(effects.contains(&Effect::FetchStatus {
        cycle: 1,
        url: "http://monitor.test/status".to_string(),
    }));
    assert_eq!(state.poller().phase(), PollPhase::InFlight);

    let (_state, effects) = update(state, Msg::PageLoaded);
    assert!(effects.is_empty());
}

#[test]
fn next_poll_is_scheduled_only_after_settling() {
    let (mut state, _) = booted();
    let mut outstanding = vec![1_u64];

    for step in 0..40_u64 {
        assert_eq!(outstanding.len(), 1, "exactly one fetch in flight");
        let cycle = outstanding.pop().unwrap();

        // A timer for the cycle in flight is stale and must not issue a fetch.
        let (next, effects) = update(state, Msg::PollTimerFired { cycle });
        assert!(effects.is_empty());

        let result = if step % 3 == 0 {
            Err(network_failure())
        } else {
            Ok(status(&["web"]))
        };
        let (next, effects) = update(next, Msg::StatusFetched { cycle, result });
        assert_eq!(
            effects,
            vec![Effect::SchedulePoll {
                cycle: cycle + 1,
                delay: INTERVAL,
            }]
        );
        assert!(!next.poller().in_flight());

        let (next, effects) = update(next, Msg::PollTimerFired { cycle: cycle + 1 });
        assert_eq!(status_fetches(&effects), 1);
        outstanding.push(cycle + 1);

        // Duplicate timer delivery does not stack a second request.
        let (next, effects) = update(next, Msg::PollTimerFired { cycle: cycle + 1 });
        assert!(effects.is_empty());
        state = next;
    }

    assert_eq!(state.poller().completed(), 26);
    assert_eq!(state.poller().failed(), 14);
}

#[test]
fn failed_poll_keeps_view_and_reschedules() {
    let (state, _) = booted();
    let (mut state, _) = update(
        state,
        Msg::StatusFetched {
            cycle: 1,
            result: Ok(status(&["web", "worker"])),
        },
    );
    assert!(state.consume_dirty());
    let before = state.view().dashboard_html;
    assert!(before.contains("worker"));

    let (state, _) = update(state, Msg::PollTimerFired { cycle: 2 });
    let (mut state, effects) = update(
        state,
        Msg::StatusFetched {
            cycle: 2,
            result: Err(FetchFailure::new(FailureClass::HttpStatus(502), "bad gateway")),
        },
    );

    assert_eq!(state.view().dashboard_html, before);
    assert!(!state.consume_dirty());
    assert_eq!(
        effects,
        vec![Effect::SchedulePoll {
            cycle: 3,
            delay: INTERVAL,
        }]
    );
}

#[test]
fn successful_poll_replaces_view_wholesale() {
    let (state, _) = booted();
    let (state, _) = update(
        state,
        Msg::StatusFetched {
            cycle: 1,
            result: Ok(status(&["web"])),
        },
    );
    let (state, _) = update(state, Msg::PollTimerFired { cycle: 2 });
    let (state, _) = update(
        state,
        Msg::StatusFetched {
            cycle: 2,
            result: Ok(status(&["cron"])),
        },
    );

    let html = state.view().dashboard_html;
    assert!(html.contains("cron"));
    assert!(!html.contains("web"));
}

#[test]
fn undecodable_status_counts_as_failed_cycle() {
    let (state, _) = booted();
    let (state, effects) = update(
        state,
        Msg::StatusFetched {
            cycle: 1,
            result: Err(FetchFailure::new(FailureClass::Decode, "expected value")),
        },
    );

    assert_eq!(effects.len(), 1);
    assert_eq!(state.poller().failed(), 1);
    assert!(state.view().dashboard_html.is_empty());
}

#[test]
fn stale_status_result_is_ignored() {
    let (state, _) = booted();
    let (state, effects) = update(
        state,
        Msg::StatusFetched {
            cycle: 7,
            result: Ok(status(&["web"])),
        },
    );

    assert!(effects.is_empty());
    assert!(state.view().dashboard_html.is_empty());
    assert!(state.poller().in_flight());
}

#[test]
fn stop_cancels_armed_timer() {
    let (state, _) = booted();
    let (state, _) = update(
        state,
        Msg::StatusFetched {
            cycle: 1,
            result: Ok(status(&["web"])),
        },
    );

    let (state, effects) = update(state, Msg::StopPolling);
    assert_eq!(effects, vec![Effect::CancelPoll]);
    assert_eq!(state.poller().phase(), PollPhase::Stopped);

    let (_state, effects) = update(state, Msg::PollTimerFired { cycle: 2 });
    assert!(effects.is_empty());
}

#[test]
fn stop_while_in_flight_discards_result() {
    let (state, _) = booted();
    let (state, effects) = update(state, Msg::StopPolling);
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::StatusFetched {
            cycle: 1,
            result: Ok(status(&["web"])),
        },
    );
    assert!(effects.is_empty());
    assert!(state.view().dashboard_html.is_empty());
}
