use crate::mock_host::{test_metrics, HostLog, MockHost};
use rat_context_menu::event::{HandleEvent, MenuEvent, MenuKey, MenuOutcome, Popup};
use rat_context_menu::geometry::{DisplayContext, Point, Rect};
use rat_context_menu::host::{MenuMetrics, Trigger};
use rat_context_menu::spec::{ActionRegistry, InvalidSpecError};
use rat_context_menu::context_menu::SUBMENU_OFFSET;
use rat_context_menu::{handle_events, ContextMenu, ContextMenuStyle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

mod mock_host;

const MENU: &str = r#"{"Open": "open", "Export": {"PDF": "pdf", "CSV": "csv"}}"#;

struct Fixture {
    menu: ContextMenu<MockHost>,
    log: Rc<RefCell<HostLog>>,
    /// Calls per action.
    calls: Rc<RefCell<Vec<String>>>,
    /// Open windows as seen by the last action.
    seen_windows: Rc<Cell<Option<usize>>>,
}

fn fixture_with(
    host: MockHost,
    config: impl FnOnce(ContextMenu<MockHost>) -> ContextMenu<MockHost>,
) -> Fixture {
    let log = host.log();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let seen_windows = Rc::new(Cell::new(None));

    let mut actions = ActionRegistry::new();
    for name in ["open", "pdf", "csv"] {
        let calls = Rc::clone(&calls);
        let seen_windows = Rc::clone(&seen_windows);
        let log = Rc::clone(&log);
        actions.register(name, move || {
            calls.borrow_mut().push(name.to_string());
            seen_windows.set(Some(log.borrow().windows.len()));
            Ok(())
        });
    }

    let menu = ContextMenu::from_json(host, MENU, &actions)
        .ok()
        .unwrap()
        .metrics(test_metrics())
        .submenu_offset((0, 0));
    let menu = config(menu);

    Fixture {
        menu,
        log,
        calls,
        seen_windows,
    }
}

fn fixture() -> Fixture {
    fixture_with(MockHost::small(), |v| v)
}

fn ev(menu: &mut ContextMenu<MockHost>, event: MenuEvent) -> MenuOutcome {
    menu.handle(&event, Popup).unwrap()
}

#[test]
fn test_bind_trigger() {
    let f = fixture();
    assert_eq!(f.log.borrow().trigger, Some(Trigger::SecondaryClick));
    assert!(!f.menu.is_open());
    assert_eq!(f.log.borrow().opened, 0);

    let host = MockHost::small();
    let log = host.log();
    let mut actions = ActionRegistry::new();
    actions.register("open", || Ok(()));
    let _menu = ContextMenu::with_trigger(
        host,
        rat_context_menu::MenuSpec::from_json(r#"{"Open": "open"}"#, &actions).unwrap(),
        Trigger::MenuKey,
    );
    assert_eq!(log.borrow().trigger, Some(Trigger::MenuKey));
}

#[test]
fn test_open_export() {
    let mut f = fixture();

    let r = ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    assert_eq!(r, MenuOutcome::Changed);
    assert_eq!(f.menu.chain_len(), 1);
    {
        let log = f.log.borrow();
        assert_eq!(log.windows.len(), 1);
        assert_eq!(log.windows[0].1, Rect::new(50, 50, 100, 40));
        assert_eq!(log.windows[0].2, vec!["Open", "Export"]);
    }

    let r = ev(&mut f.menu, MenuEvent::Moved(Point::new(60, 75)));
    assert_eq!(r, MenuOutcome::Changed);
    assert_eq!(f.menu.chain_len(), 2);
    {
        let log = f.log.borrow();
        assert_eq!(log.windows.len(), 2);
        assert_eq!(log.windows[1].1, Rect::new(150, 70, 100, 40));
        assert_eq!(log.windows[1].2, vec!["PDF", "CSV"]);
    }

    // still over Export
    let r = ev(&mut f.menu, MenuEvent::Moved(Point::new(70, 80)));
    assert_eq!(r, MenuOutcome::Unchanged);
    assert_eq!(f.log.borrow().opened, 2);

    // back to Open closes the submenu.
    let r = ev(&mut f.menu, MenuEvent::Moved(Point::new(60, 55)));
    assert_eq!(r, MenuOutcome::Changed);
    assert_eq!(f.menu.chain_len(), 1);
    assert_eq!(f.log.borrow().windows.len(), 1);

    // nowhere
    let r = ev(&mut f.menu, MenuEvent::Moved(Point::new(300, 250)));
    assert_eq!(r, MenuOutcome::Continue);
}

#[test]
fn test_submenu_flip() {
    let mut f = fixture();

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(250, 50)));
    ev(&mut f.menu, MenuEvent::Moved(Point::new(260, 75)));

    let log = f.log.borrow();
    assert_eq!(log.windows[0].1, Rect::new(250, 50, 100, 40));
    // flipped to the left of the Export entry
    assert_eq!(log.windows[1].1, Rect::new(150, 70, 100, 40));
    assert_eq!(log.windows[1].1.right(), 250);

    let sub = f.menu.root().child().unwrap();
    assert!(sub.placement.flipped.horizontal);
    assert!(!sub.placement.flipped.vertical);
}

#[test]
fn test_click_outside() {
    let mut f = fixture();

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    ev(&mut f.menu, MenuEvent::Moved(Point::new(60, 75)));
    assert_eq!(f.menu.chain_len(), 2);

    let r = ev(&mut f.menu, MenuEvent::Click(Point::new(350, 250)));
    assert_eq!(r, MenuOutcome::Hide);
    assert!(!f.menu.is_open());
    assert_eq!(f.menu.chain_len(), 0);
    assert!(f.menu.chain_context().is_none());
    {
        let log = f.log.borrow();
        assert!(log.windows.is_empty());
        assert_eq!(log.closed, 2);
    }
    assert!(f.calls.borrow().is_empty());

    // closed menu doesn't care.
    let r = ev(&mut f.menu, MenuEvent::Click(Point::new(350, 250)));
    assert_eq!(r, MenuOutcome::Continue);
    assert_eq!(f.log.borrow().closed, 2);
}

#[test]
fn test_activate_pdf() {
    let mut f = fixture();

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    ev(&mut f.menu, MenuEvent::Moved(Point::new(60, 75)));

    let r = ev(&mut f.menu, MenuEvent::Click(Point::new(160, 75)));
    assert_eq!(r, MenuOutcome::Activated(vec![1, 0]));
    assert_eq!(*f.calls.borrow(), vec!["pdf".to_string()]);
    // the chain was closed before the action ran.
    assert_eq!(f.seen_windows.get(), Some(0));
    assert!(!f.menu.is_open());
    assert!(f.log.borrow().windows.is_empty());

    // a second click doesn't run it again.
    let r = ev(&mut f.menu, MenuEvent::Click(Point::new(160, 75)));
    assert_eq!(r, MenuOutcome::Continue);
    assert_eq!(f.calls.borrow().len(), 1);
}

#[test]
fn test_click_submenu_entry() {
    let mut f = fixture();

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    let r = ev(&mut f.menu, MenuEvent::Click(Point::new(60, 75)));
    assert_eq!(r, MenuOutcome::Changed);
    assert_eq!(f.menu.chain_len(), 2);

    let r = ev(&mut f.menu, MenuEvent::Click(Point::new(60, 75)));
    assert_eq!(r, MenuOutcome::Unchanged);
    assert_eq!(f.menu.chain_len(), 2);

    let r = ev(&mut f.menu, MenuEvent::Click(Point::new(60, 55)));
    assert_eq!(r, MenuOutcome::Activated(vec![0]));
    assert_eq!(*f.calls.borrow(), vec!["open".to_string()]);
}

#[test]
fn test_click_padding() {
    let mut f = fixture_with(MockHost::small(), |v| {
        v.metrics(MenuMetrics {
            padding_y: 5,
            ..test_metrics()
        })
    });

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    assert_eq!(f.log.borrow().windows[0].1, Rect::new(50, 50, 100, 50));

    let r = ev(&mut f.menu, MenuEvent::Click(Point::new(60, 52)));
    assert_eq!(r, MenuOutcome::Unchanged);
    assert!(f.menu.is_open());

    let r = ev(&mut f.menu, MenuEvent::Click(Point::new(60, 57)));
    assert_eq!(r, MenuOutcome::Activated(vec![0]));
}

#[test]
fn test_invalid_spec() {
    let host = MockHost::small();
    let log = host.log();
    let actions = ActionRegistry::new();

    let r = ContextMenu::from_json(host, r#"{"Bad": 42}"#, &actions);
    assert_eq!(
        r.err(),
        Some(InvalidSpecError::NotAnEntry {
            path: vec!["Bad".into()],
            found: "number"
        })
    );

    let log = log.borrow();
    assert_eq!(log.trigger, None);
    assert_eq!(log.opened, 0);
}

#[test]
fn test_retrigger() {
    let mut f = fixture();

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    ev(&mut f.menu, MenuEvent::Moved(Point::new(60, 75)));

    let r = ev(&mut f.menu, MenuEvent::Trigger(Point::new(200, 100)));
    assert_eq!(r, MenuOutcome::Changed);
    assert_eq!(f.menu.chain_len(), 1);

    let log = f.log.borrow();
    assert_eq!(log.opened, 3);
    assert_eq!(log.closed, 2);
    assert_eq!(log.windows.len(), 1);
    assert_eq!(log.windows[0].1, Rect::new(200, 100, 100, 40));
}

#[test]
fn test_cancel() {
    let mut f = fixture();

    assert_eq!(
        ev(&mut f.menu, MenuEvent::Key(MenuKey::Cancel)),
        MenuOutcome::Continue
    );

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    ev(&mut f.menu, MenuEvent::Moved(Point::new(60, 75)));

    let r = ev(&mut f.menu, MenuEvent::Key(MenuKey::Cancel));
    assert_eq!(r, MenuOutcome::Hide);
    assert!(!f.menu.is_open());
    assert!(f.log.borrow().windows.is_empty());
    assert!(f.calls.borrow().is_empty());
}

#[test]
fn test_focus_lost() {
    let mut f = fixture();

    assert_eq!(
        ev(&mut f.menu, MenuEvent::FocusLost),
        MenuOutcome::Continue
    );

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    ev(&mut f.menu, MenuEvent::Moved(Point::new(60, 75)));
    assert_eq!(ev(&mut f.menu, MenuEvent::FocusLost), MenuOutcome::Hide);
    assert!(f.log.borrow().windows.is_empty());

    // can be opened again
    assert_eq!(
        ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50))),
        MenuOutcome::Changed
    );
}

#[test]
fn test_host_destroyed() {
    let mut f = fixture();

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    ev(&mut f.menu, MenuEvent::Moved(Point::new(60, 75)));
    f.log.borrow_mut().alive = false;

    let r = ev(&mut f.menu, MenuEvent::HostDestroyed);
    assert_eq!(r, MenuOutcome::Hide);
    assert!(!f.menu.is_open());
    assert!(f.menu.is_detached());
    // no calls to a dead host.
    assert_eq!(f.log.borrow().closed, 0);

    f.log.borrow_mut().alive = true;
    let r = ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    assert_eq!(r, MenuOutcome::Continue);
    assert_eq!(f.log.borrow().opened, 2);
}

#[test]
fn test_retrigger_dead_host() {
    let mut f = fixture();

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    ev(&mut f.menu, MenuEvent::Moved(Point::new(60, 75)));
    assert_eq!(f.menu.chain_len(), 2);

    // gone without a HostDestroyed
    f.log.borrow_mut().alive = false;

    let r = ev(&mut f.menu, MenuEvent::Trigger(Point::new(200, 100)));
    assert_eq!(r, MenuOutcome::Continue);
    assert!(!f.menu.is_open());
    assert_eq!(f.menu.chain_len(), 0);
    assert!(f.menu.root().window().is_none());
    assert!(f.menu.chain_context().is_none());

    let log = f.log.borrow();
    assert_eq!(log.opened, 2);
    assert_eq!(log.closed, 0);
}

#[test]
fn test_default_submenu_offset() {
    let mut f = fixture_with(MockHost::small(), |v| {
        v.styles(ContextMenuStyle {
            submenu_offset: Some(SUBMENU_OFFSET),
            ..Default::default()
        })
    });

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    ev(&mut f.menu, MenuEvent::Moved(Point::new(60, 75)));
    // overlaps the root and moves up a bit.
    assert_eq!(f.log.borrow().windows[1].1, Rect::new(146, 66, 100, 40));

    // mirrored when flipped
    ev(&mut f.menu, MenuEvent::Trigger(Point::new(250, 50)));
    ev(&mut f.menu, MenuEvent::Moved(Point::new(260, 75)));
    assert_eq!(f.log.borrow().windows[1].1, Rect::new(154, 66, 100, 40));
}

#[test]
fn test_default_style() {
    let host = MockHost::small();
    let mut actions = ActionRegistry::new();
    actions.register("open", || Ok(()));
    let mut menu = ContextMenu::from_json(host, r#"{"Open": "open"}"#, &actions)
        .ok()
        .unwrap();

    ev(&mut menu, MenuEvent::Trigger(Point::new(50, 50)));
    assert_eq!(
        menu.chain_context().map(|v| v.submenu_offset),
        Some((-4, -4))
    );
}

#[test]
fn test_hover_then_enter() {
    let mut f = fixture();

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    ev(&mut f.menu, MenuEvent::Moved(Point::new(60, 75)));
    assert_eq!(f.menu.root().child().and_then(|v| v.selected), Some(0));

    let r = ev(&mut f.menu, MenuEvent::Key(MenuKey::Enter));
    assert_eq!(r, MenuOutcome::Activated(vec![1, 0]));
    assert_eq!(*f.calls.borrow(), vec!["pdf".to_string()]);
}

#[test]
fn test_action_error() {
    let host = MockHost::small();
    let log = host.log();

    let mut actions = ActionRegistry::new();
    actions.register("open", || Err("disk full".into()));
    let mut menu = ContextMenu::from_json(host, r#"{"Open": "open"}"#, &actions)
        .ok()
        .unwrap()
        .metrics(test_metrics());

    ev(&mut menu, MenuEvent::Trigger(Point::new(50, 50)));
    let r = handle_events(&mut menu, &MenuEvent::Click(Point::new(60, 55)));
    match r {
        Err(e) => assert_eq!(e.to_string(), "disk full"),
        Ok(r) => panic!("{:?}", r),
    }
    assert!(!menu.is_open());
    assert!(log.borrow().windows.is_empty());
}

#[test]
fn test_keyboard() {
    let mut f = fixture();

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    assert_eq!(f.menu.root().selected, None);

    assert_eq!(
        ev(&mut f.menu, MenuEvent::Key(MenuKey::Down)),
        MenuOutcome::Changed
    );
    assert_eq!(f.menu.root().selected, Some(0));
    // no submenu on Open
    assert_eq!(
        ev(&mut f.menu, MenuEvent::Key(MenuKey::Right)),
        MenuOutcome::Unchanged
    );
    assert_eq!(
        ev(&mut f.menu, MenuEvent::Key(MenuKey::End)),
        MenuOutcome::Changed
    );
    assert_eq!(f.menu.root().selected, Some(1));

    assert_eq!(
        ev(&mut f.menu, MenuEvent::Key(MenuKey::Right)),
        MenuOutcome::Changed
    );
    assert_eq!(f.menu.chain_len(), 2);
    assert_eq!(f.menu.root().child().and_then(|v| v.selected), Some(0));

    assert_eq!(
        ev(&mut f.menu, MenuEvent::Key(MenuKey::Left)),
        MenuOutcome::Changed
    );
    assert_eq!(f.menu.chain_len(), 1);
    assert_eq!(
        ev(&mut f.menu, MenuEvent::Key(MenuKey::Left)),
        MenuOutcome::Unchanged
    );

    ev(&mut f.menu, MenuEvent::Key(MenuKey::Right));
    assert_eq!(
        ev(&mut f.menu, MenuEvent::Key(MenuKey::Down)),
        MenuOutcome::Changed
    );
    let r = ev(&mut f.menu, MenuEvent::Key(MenuKey::Enter));
    assert_eq!(r, MenuOutcome::Activated(vec![1, 1]));
    assert_eq!(*f.calls.borrow(), vec!["csv".to_string()]);
    assert!(!f.menu.is_open());
}

#[test]
fn test_close_idempotent() {
    let mut f = fixture();

    assert!(!f.menu.close());
    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    assert!(f.menu.close());
    assert!(!f.menu.close());
    assert_eq!(f.log.borrow().closed, 1);
}

#[test]
fn test_scale() {
    let host = MockHost::new(DisplayContext::new(2.0, Rect::new(0, 0, 800, 600)));
    let mut f = fixture_with(host, |v| v.offset((2, 3)));

    ev(&mut f.menu, MenuEvent::Trigger(Point::new(50, 50)));
    ev(&mut f.menu, MenuEvent::Moved(Point::new(60, 100)));

    assert_eq!(f.menu.chain_context().map(|v| v.display.scale), Some(2.0));
    let log = f.log.borrow();
    assert_eq!(log.windows[0].1, Rect::new(54, 56, 200, 80));
    // Export entry is (54, 96, 200, 40)
    assert_eq!(log.windows[1].1, Rect::new(254, 96, 200, 80));
}
