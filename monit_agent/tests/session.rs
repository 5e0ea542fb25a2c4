//! Session state machine: focus, navigation bounds, resize, quit.

mod common;

use std::sync::Arc;

use common::FakeProvider;
use monit_agent::gatekeeper::Identity;
use monit_agent::sampler::Sampler;
use monit_agent::session::{Key, Mode, Session, Viewport, DASHBOARD_CHROME_ROWS};
use monit_agent::view::Focus;

fn viewport(height: u16) -> Viewport {
    Viewport { width: 120, height }
}

async fn session_with_rows(rows: u32, height: u16) -> Session {
    let provider = FakeProvider::healthy();
    *provider.procs.lock().unwrap() = Some(common::processes(rows));
    let sampler = Sampler::new(Arc::new(provider), 10);
    let mut s = Session::new(Identity::new("alice"), viewport(height), 10);
    s.tick(&sampler).await;
    s
}

#[test]
fn starts_active_with_empty_view() {
    let s = Session::new(Identity::new("alice"), viewport(40), 10);
    assert_eq!(s.mode(), Mode::Active);
    let v = s.view("host");
    assert_eq!(v.focus, Focus::Active);
    assert_eq!(v.selected, None);
    assert!(v.sample.processes.is_empty());
    assert_eq!(v.sample.cpu.busy, 0.0);
    assert_eq!(v.sample.memory.total.value, "0");
    assert_eq!(v.sample.memory.total.unit, "B");
    assert_eq!(v.identity, "alice");
}

#[test]
fn key_names() {
    assert_eq!(Key::parse("q"), Some(Key::Quit));
    assert_eq!(Key::parse("ctrl+c"), Some(Key::Quit));
    assert_eq!(Key::parse("esc"), Some(Key::ToggleFocus));
    assert_eq!(Key::parse("k"), Some(Key::Up));
    assert_eq!(Key::parse("down"), Some(Key::Down));
    assert_eq!(Key::parse("x"), None);
}

#[tokio::test]
async fn navigation_ignored_while_unfocused() {
    let mut s = session_with_rows(5, 40).await;
    assert!(!s.press(Key::Down));
    assert!(!s.press(Key::Up));
    assert_eq!(s.selected(), 0);
}

#[tokio::test]
async fn move_down_stops_at_last_row() {
    let mut s = session_with_rows(3, 40).await;
    assert!(s.press(Key::ToggleFocus));
    assert_eq!(s.mode(), Mode::TableFocused);
    assert!(s.press(Key::Down));
    assert!(s.press(Key::Down));
    assert_eq!(s.selected(), 2);
    assert!(!s.press(Key::Down));
    assert_eq!(s.selected(), 2);
    assert_eq!(s.view("h").selected, Some(2));
}

#[tokio::test]
async fn move_up_stops_at_first_row() {
    let mut s = session_with_rows(3, 40).await;
    s.press(Key::ToggleFocus);
    assert!(!s.press(Key::Up));
    assert_eq!(s.selected(), 0);
}

#[tokio::test]
async fn selection_bounded_by_visible_rows() {
    // 12 rows fit after the chrome, but the row limit caps it at 10 and the
    // provider only reports 8; a short viewport caps it further.
    let height = DASHBOARD_CHROME_ROWS + 4;
    let mut s = session_with_rows(8, height).await;
    assert_eq!(s.visible_rows(), 4);
    s.press(Key::ToggleFocus);
    for _ in 0..10 {
        s.press(Key::Down);
    }
    assert_eq!(s.selected(), 3);
}

#[tokio::test]
async fn refocus_preserves_selection() {
    let mut s = session_with_rows(5, 40).await;
    s.press(Key::ToggleFocus);
    s.press(Key::Down);
    s.press(Key::Down);
    assert!(s.press(Key::ToggleFocus));
    assert_eq!(s.mode(), Mode::Active);
    assert_eq!(s.selected(), 2);
    assert!(s.press(Key::ToggleFocus));
    assert_eq!(s.selected(), 2);
}

#[tokio::test]
async fn resize_keeps_focus_and_selection() {
    let mut s = session_with_rows(5, 40).await;
    s.press(Key::ToggleFocus);
    s.press(Key::Down);
    assert!(s.resize(Viewport {
        width: 200,
        height: 50
    }));
    assert_eq!(s.mode(), Mode::TableFocused);
    assert_eq!(s.selected(), 1);
    assert_eq!(s.view("h").width, 200);
    assert!(!s.resize(Viewport {
        width: 200,
        height: 50
    }));
}

#[tokio::test]
async fn quit_from_either_state() {
    let mut a = session_with_rows(2, 40).await;
    assert!(a.press(Key::Quit));
    assert!(a.is_terminated());

    let mut b = session_with_rows(2, 40).await;
    b.press(Key::ToggleFocus);
    assert!(b.press(Key::Quit));
    assert!(b.is_terminated());
    assert!(!b.press(Key::ToggleFocus));
    assert_eq!(b.mode(), Mode::Terminated);
}
