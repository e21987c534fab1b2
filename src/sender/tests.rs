//! Tests for the send window state machine, driven directly with a mock
//! transport sink and paused time so no real timer ever fires.

use super::window::SenderWindow;
use crate::{
    config::Config,
    event::WindowEvent,
    segment::Segment,
    timer::TimerTick,
    transport::MockSink,
};
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::mpsc;

struct Harness {
    window: SenderWindow<MockSink>,
    sink: Arc<MockSink>,
    #[allow(dead_code)]
    tick_rx: mpsc::Receiver<TimerTick>,
    event_rx: mpsc::UnboundedReceiver<WindowEvent>,
}

fn harness() -> Harness {
    let (tick_tx, tick_rx) = mpsc::channel(8);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let sink = Arc::new(MockSink::new());
    let window = SenderWindow::new(
        Arc::new(Config::default()),
        sink.clone(),
        tick_tx,
        event_tx,
    );
    Harness {
        window,
        sink,
        tick_rx,
        event_rx,
    }
}

/// The segment covering index `index` with the default 100-byte segment size.
fn segment(index: u32) -> Segment {
    Segment::new(index * 100 + 1, Bytes::from_static(b"payload"))
}

fn drain_events(rx: &mut mpsc::UnboundedReceiver<WindowEvent>) -> Vec<WindowEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Grows the window to `target` by feeding consecutive new cumulative acks,
/// submitting enough segments first so the store never empties.
async fn grow_window_to(h: &mut Harness, target: u32) {
    let acks = target - h.window.congestion().congestion_window();
    for index in 0..=(acks + 14) {
        h.window.submit(segment(index));
    }
    for ack in 0..acks {
        h.window.on_ack(ack).await;
    }
    assert_eq!(h.window.congestion().congestion_window(), target);
    h.sink.take_sent();
    drain_events(&mut h.event_rx);
}

#[tokio::test(start_paused = true)]
async fn test_submit_arms_timer_and_fills_window() {
    let mut h = harness();
    assert!(!h.window.is_timer_armed());
    assert!(!h.window.is_window_full());

    h.window.submit(segment(0));

    // Initial cwnd is 1, so a single outstanding segment fills the window.
    assert!(h.window.is_timer_armed());
    assert!(h.window.is_window_full());
    assert_eq!(h.window.outstanding(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_new_cumulative_ack_removes_prefix_and_rearms() {
    let mut h = harness();
    for index in 0..3 {
        h.window.submit(segment(index));
    }

    h.window.on_ack(1).await;

    assert_eq!(h.window.outstanding(), 1);
    assert!(h.window.is_timer_armed());
    // Slow start: one increment per new ack.
    assert_eq!(h.window.congestion().congestion_window(), 2);
    assert_eq!(
        drain_events(&mut h.event_rx),
        vec![WindowEvent::WindowExpand { cwnd: 2 }]
    );
    // Acks never send anything on their own.
    assert_eq!(h.sink.sent_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_ack_of_everything_disarms_timer() {
    let mut h = harness();
    h.window.submit(segment(0));
    h.window.submit(segment(1));

    h.window.on_ack(1).await;

    assert_eq!(h.window.outstanding(), 0);
    assert!(!h.window.is_timer_armed());
}

#[tokio::test(start_paused = true)]
async fn test_repeated_processed_ack_is_only_bookkeeping() {
    let mut h = harness();
    for index in 0..4 {
        h.window.submit(segment(index));
    }
    h.window.on_ack(1).await;
    let cwnd = h.window.congestion().congestion_window();
    drain_events(&mut h.event_rx);

    // A second identical ack lands in the duplicate branch: no removals,
    // no window growth, no sends.
    h.window.on_ack(1).await;

    assert_eq!(h.window.outstanding(), 2);
    assert_eq!(h.window.congestion().congestion_window(), cwnd);
    assert!(drain_events(&mut h.event_rx).is_empty());
    assert_eq!(h.sink.sent_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_triple_duplicate_ack_fast_retransmits_once() {
    let mut h = harness();
    grow_window_to(&mut h, 8).await;
    let last_ack = 6; // grow_window_to acked 0..=6 to reach cwnd 8

    // Three duplicates on top of the original ack: the classic signal.
    for _ in 0..3 {
        h.window.on_ack(last_ack).await;
    }

    // Exactly one resend, of the segment just above the repeated ack.
    let sent = h.sink.take_sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].sequence_number, (last_ack + 1) * 100 + 1);

    // Multiplicative decrease without collapsing to 1.
    assert_eq!(h.window.congestion().congestion_window(), 4);
    assert_eq!(h.window.congestion().slow_start_threshold(), 4);
    assert_eq!(
        drain_events(&mut h.event_rx),
        vec![
            WindowEvent::FastRetransmit { index: last_ack + 1 },
            WindowEvent::FastRecovery { cwnd: 4, ssthresh: 4 },
        ]
    );
    assert!(h.window.is_timer_armed());

    // A fourth duplicate does not retransmit again.
    h.window.on_ack(last_ack).await;
    assert_eq!(h.sink.sent_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_fast_recovery_applies_even_without_a_candidate() {
    let mut h = harness();
    h.window.submit(segment(0));
    h.window.on_ack(0).await;
    drain_events(&mut h.event_rx);

    // Everything is acked: index 1 is not outstanding, so the duplicate
    // signal has nothing to resend, but recovery still applies.
    for _ in 0..3 {
        h.window.on_ack(0).await;
    }

    assert_eq!(h.sink.sent_count(), 0);
    assert_eq!(h.window.congestion().congestion_window(), 2);
    assert_eq!(h.window.congestion().slow_start_threshold(), 2);
    assert_eq!(
        drain_events(&mut h.event_rx),
        vec![WindowEvent::FastRecovery { cwnd: 2, ssthresh: 2 }]
    );
    // Nothing outstanding, so the timer stays disarmed.
    assert!(!h.window.is_timer_armed());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_collapses_and_resends_lowest_outstanding() {
    let mut h = harness();
    grow_window_to(&mut h, 8).await;

    h.window.on_timeout().await;

    // ssthresh = 8 / 2, cwnd collapses to 1.
    assert_eq!(h.window.congestion().slow_start_threshold(), 4);
    assert_eq!(h.window.congestion().congestion_window(), 1);

    // Only the lowest-indexed outstanding segment fits the collapsed window.
    let sent = h.sink.take_sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].sequence_number, 7 * 100 + 1);

    let events = drain_events(&mut h.event_rx);
    assert_eq!(
        events,
        vec![
            WindowEvent::RtoCollapse { cwnd: 1, ssthresh: 4 },
            WindowEvent::Retransmit { index: 7 },
        ]
    );
    assert!(h.window.is_timer_armed());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_threshold_floor() {
    let mut h = harness();
    h.window.submit(segment(0));
    h.window.submit(segment(1));
    h.window.on_ack(0).await; // cwnd = 2
    drain_events(&mut h.event_rx);

    h.window.on_timeout().await;

    // cwnd/2 = 1 is below the floor; the threshold never drops under 2.
    assert_eq!(h.window.congestion().slow_start_threshold(), 2);
    assert_eq!(h.window.congestion().congestion_window(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_with_empty_store_leaves_timer_disarmed() {
    let mut h = harness();

    h.window.on_timeout().await;

    assert_eq!(h.sink.sent_count(), 0);
    assert!(!h.window.is_timer_armed());
    assert_eq!(h.window.congestion().congestion_window(), 1);
    assert_eq!(h.window.congestion().slow_start_threshold(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stale_generation_tick_is_ignored() {
    let mut h = harness();
    h.window.submit(segment(0));

    // A tick from a generation that was never armed (or long cancelled)
    // must not trigger loss recovery.
    h.window.on_tick(TimerTick { generation: 99 }).await;

    assert_eq!(h.sink.sent_count(), 0);
    assert_eq!(h.window.congestion().congestion_window(), 1);
    assert_eq!(h.window.congestion().slow_start_threshold(), 16);
    assert!(drain_events(&mut h.event_rx).is_empty());

    // The live generation does.
    h.window.on_tick(TimerTick { generation: 1 }).await;
    assert_eq!(h.sink.sent_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timer_armed_iff_store_non_empty() {
    let mut h = harness();
    assert_eq!(h.window.is_timer_armed(), h.window.outstanding() > 0);

    h.window.submit(segment(0));
    assert_eq!(h.window.is_timer_armed(), h.window.outstanding() > 0);
    h.window.submit(segment(1));
    assert_eq!(h.window.is_timer_armed(), h.window.outstanding() > 0);

    h.window.on_ack(0).await;
    assert_eq!(h.window.is_timer_armed(), h.window.outstanding() > 0);

    h.window.on_timeout().await;
    assert_eq!(h.window.is_timer_armed(), h.window.outstanding() > 0);

    h.window.on_ack(1).await;
    assert_eq!(h.window.is_timer_armed(), h.window.outstanding() > 0);
    assert!(!h.window.is_timer_armed());
}
