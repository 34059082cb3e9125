use std::path::PathBuf;
use std::time::Duration;

use notify::EventKind;
use notify::event::{DataChange, ModifyKind};
use tokio::sync::mpsc;
use tokio::time::sleep;
use watchcmd::config::MonitorSection;
use watchcmd::dispatch::{ChangeEvent, EventDispatcher};
use watchcmd::sched::TaskMan;

fn change(file: &str, n: i64) -> ChangeEvent {
    ChangeEvent {
        file: file.to_string(),
        changed: n,
        ext: ".go".to_string(),
        event: "write".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn burst_coalesces_to_last_event() {
    let (tx, mut rx) = mpsc::channel(8);
    let taskman = TaskMan::new(200, tx);

    for i in 0..5 {
        taskman.put(change(&format!("f{i}.go"), i));
        sleep(Duration::from_millis(10)).await;
    }

    let got = rx.recv().await.expect("exactly one dispatch");
    assert_eq!(got.file, "f4.go");

    // The settling window produced one dispatch, not one per event.
    sleep(Duration::from_millis(500)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn events_outside_the_window_dispatch_separately() {
    let (tx, mut rx) = mpsc::channel(8);
    let taskman = TaskMan::new(200, tx);

    taskman.put(change("first.go", 1));
    sleep(Duration::from_millis(300)).await;
    taskman.put(change("second.go", 2));

    assert_eq!(rx.recv().await.expect("first").file, "first.go");
    assert_eq!(rx.recv().await.expect("second").file, "second.go");
}

#[tokio::test(start_paused = true)]
async fn zero_delay_dispatches_each_event_unbatched() {
    let (tx, mut rx) = mpsc::channel(8);
    let taskman = TaskMan::new(0, tx);

    for i in 0..3 {
        taskman.put(change(&format!("f{i}.go"), i));
    }

    let mut got = Vec::new();
    for _ in 0..3 {
        got.push(rx.recv().await.expect("dispatch").file);
    }
    got.sort();
    assert_eq!(got, vec!["f0.go", "f1.go", "f2.go"]);
}

#[tokio::test(start_paused = true)]
async fn burst_end_to_end_filters_and_coalesces() {
    let root = PathBuf::from("/project");
    let monitor = MonitorSection {
        types: vec![".go".to_string()],
        events: vec!["write".to_string()],
        ..Default::default()
    };
    let dispatcher = EventDispatcher::new(root.clone(), &monitor);

    let (tx, mut rx) = mpsc::channel(8);
    let taskman = TaskMan::new(200, tx);

    let write = EventKind::Modify(ModifyKind::Data(DataChange::Content));
    for i in 0..5 {
        let event = notify::Event::new(write).add_path(root.join(format!("src/f{i}.go")));
        dispatcher.dispatch(&event, &taskman);

        // A .txt write in the same burst never reaches the scheduler.
        let noise = notify::Event::new(write).add_path(root.join("notes.txt"));
        dispatcher.dispatch(&noise, &taskman);

        sleep(Duration::from_millis(10)).await;
    }

    let got = rx.recv().await.expect("exactly one dispatch");
    assert_eq!(got.file, "src/f4.go");
    assert_eq!(got.event, "write");
    assert_eq!(got.ext, ".go");

    sleep(Duration::from_millis(500)).await;
    assert!(rx.try_recv().is_err());
}
