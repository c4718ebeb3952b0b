#![cfg(not(feature = "hydrate"))]

use super::*;

#[test]
fn now_is_after_2024() {
    assert!(BrowserRuntime.now() > 1_704_067_200);
}

#[test]
fn spawn_drops_task_without_running_it() {
    let ran = std::rc::Rc::new(std::cell::Cell::new(false));
    let flag = ran.clone();
    BrowserRuntime.spawn(Box::pin(async move { flag.set(true) }));
    assert!(!ran.get());
}

#[test]
fn sleep_never_resolves_on_server() {
    let slept = futures::FutureExt::now_or_never(BrowserRuntime.sleep(Duration::from_millis(0)));
    assert!(slept.is_none());
}
