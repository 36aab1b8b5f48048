use super::*;
use std::sync::atomic::AtomicUsize;

fn counter(bus: &EventBus<CatalogueEvent>, kind: CatalogueEventKind) -> Arc<AtomicUsize> {
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = hits.clone();
    bus.subscribe(kind, move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    hits
}

#[test]
fn emit_reaches_only_matching_kind() {
    let bus: Arc<EventBus<CatalogueEvent>> = EventBus::new();
    let selected = counter(&bus, CatalogueEventKind::PhoneSelected);
    let extra = counter(&bus, CatalogueEventKind::ExtraAction);

    assert_eq!(bus.emit(CatalogueEvent::PhoneSelected("a".into())), 1);
    assert_eq!(bus.emit(CatalogueEvent::ExtraAction), 1);
    assert_eq!(bus.emit(CatalogueEvent::ExtraAction), 1);

    assert_eq!(selected.load(Ordering::SeqCst), 1);
    assert_eq!(extra.load(Ordering::SeqCst), 2);
}

#[test]
fn handlers_receive_payload() {
    let bus: Arc<EventBus<CatalogueEvent>> = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    bus.subscribe(CatalogueEventKind::PhoneSelected, move |event| {
        if let CatalogueEvent::PhoneSelected(id) = event {
            sink.lock().expect("sink").push(id.clone());
        }
    });

    bus.emit(CatalogueEvent::PhoneSelected("nexus-s".into()));
    bus.emit(CatalogueEvent::PhoneSelected("xoom".into()));

    assert_eq!(
        *seen.lock().expect("seen"),
        vec![PhoneId::from("nexus-s"), PhoneId::from("xoom")]
    );
}

#[test]
fn unsubscribe_reports_whether_handle_was_live() {
    let bus: Arc<EventBus<ViewerEvent>> = EventBus::new();
    let handle = bus.subscribe(ViewerEventKind::Back, |_| {});

    assert_eq!(bus.subscriber_count(ViewerEventKind::Back), 1);
    assert!(bus.unsubscribe(handle));
    assert!(!bus.unsubscribe(handle));
    assert_eq!(bus.emit(ViewerEvent::Back), 0);
}

#[test]
fn handler_may_unsubscribe_itself_while_running() {
    let bus: Arc<EventBus<SearchEvent>> = EventBus::new();
    let weak = Arc::downgrade(&bus);
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = hits.clone();
    bus.subscribe_with(SearchEventKind::ValueChanged, move |handle| {
        move |_: &SearchEvent| {
            if let Some(bus) = weak.upgrade() {
                bus.unsubscribe(handle);
            }
            seen.fetch_add(1, Ordering::SeqCst);
        }
    });

    bus.emit(SearchEvent::ValueChanged("a".into()));
    bus.emit(SearchEvent::ValueChanged("b".into()));

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(bus.subscriber_count(SearchEventKind::ValueChanged), 0);
}

#[tokio::test]
async fn once_resolves_a_single_time_and_detaches() {
    let bus: Arc<EventBus<CatalogueEvent>> = EventBus::new();
    let signal = bus.once(CatalogueEventKind::ExtraAction);
    assert_eq!(bus.subscriber_count(CatalogueEventKind::ExtraAction), 1);

    assert_eq!(bus.emit(CatalogueEvent::ExtraAction), 1);
    assert_eq!(bus.emit(CatalogueEvent::ExtraAction), 0);

    assert_eq!(signal.await.expect("fired"), CatalogueEvent::ExtraAction);
    assert_eq!(bus.subscriber_count(CatalogueEventKind::ExtraAction), 0);
}

#[tokio::test]
async fn each_once_listener_sees_the_same_event() {
    let bus: Arc<EventBus<CatalogueEvent>> = EventBus::new();
    let first = bus.once(CatalogueEventKind::ExtraAction);
    let second = bus.once(CatalogueEventKind::ExtraAction);
    assert_ne!(first.handle(), second.handle());

    assert_eq!(bus.emit(CatalogueEvent::ExtraAction), 2);

    assert!(first.await.is_ok());
    assert!(second.await.is_ok());
}

#[test]
fn dropping_pending_once_signal_detaches_listener() {
    let bus: Arc<EventBus<CatalogueEvent>> = EventBus::new();
    let signal = bus.once(CatalogueEventKind::ExtraAction);
    assert_eq!(bus.subscriber_count(CatalogueEventKind::ExtraAction), 1);

    drop(signal);

    assert_eq!(bus.subscriber_count(CatalogueEventKind::ExtraAction), 0);
}

#[tokio::test]
async fn once_signal_errors_when_bus_goes_away() {
    let bus: Arc<EventBus<CatalogueEvent>> = EventBus::new();
    let signal = bus.once(CatalogueEventKind::ExtraAction);

    drop(bus);

    assert!(signal.await.is_err());
}
