//!
//! Runs a scripted session against a host that only logs.
//! The log goes to context_menu1.log
//!

use anyhow::anyhow;
use log::{debug, info};
use rat_context_menu::event::{MenuEvent, MenuKey, MenuOutcome};
use rat_context_menu::geometry::{DisplayContext, Point, Rect};
use rat_context_menu::host::{MenuHost, PopupEntry, Trigger};
use rat_context_menu::spec::ActionRegistry;
use rat_context_menu::{handle_events, ContextMenu, ContextMenuStyle};
use std::fs;
use std::path::PathBuf;

const MENU: &str = r#"{
    "Open": "open",
    "Export": {
        "PDF": "export-pdf",
        "CSV": "export-csv",
        "More": {
            "Markdown": "export-md"
        }
    },
    "Close": "close"
}"#;

fn main() -> Result<(), anyhow::Error> {
    setup_logging()?;

    let mut actions = ActionRegistry::new();
    actions.register("open", || Ok(()));
    actions.register("export-pdf", || {
        info!("exporting pdf");
        Ok(())
    });
    actions.register("export-csv", || Ok(()));
    actions.register("export-md", || Err("markdown export is not available".into()));
    actions.register("close", || Ok(()));

    let host = LogHost {
        // 150% on a second monitor left of the primary one.
        display: DisplayContext::from_dpi(144, Rect::new(-1920, 0, 1920, 1080)),
        next: 0,
    };
    let mut menu = ContextMenu::from_json(host, MENU, &actions)?.styles(ContextMenuStyle {
        offset: Some((2, 2)),
        submenu_offset: Some((-2, 0)),
        ..Default::default()
    });

    let script = [
        MenuEvent::Trigger(Point::new(-100, 1000)),
        MenuEvent::Key(MenuKey::Down),
        MenuEvent::Key(MenuKey::Down),
        MenuEvent::Key(MenuKey::Right),
        MenuEvent::Key(MenuKey::Enter),
        MenuEvent::Trigger(Point::new(-1900, 20)),
        MenuEvent::Key(MenuKey::Down),
        MenuEvent::Key(MenuKey::Down),
        MenuEvent::Key(MenuKey::Right),
        MenuEvent::Key(MenuKey::End),
        MenuEvent::Key(MenuKey::Right),
        MenuEvent::Key(MenuKey::Enter),
        MenuEvent::Trigger(Point::new(-500, 500)),
        MenuEvent::Click(Point::new(0, 0)),
        MenuEvent::Trigger(Point::new(-500, 500)),
        MenuEvent::FocusLost,
        MenuEvent::HostDestroyed,
        MenuEvent::Trigger(Point::new(-500, 500)),
    ];

    for event in script {
        match handle_events(&mut menu, &event) {
            Ok(MenuOutcome::Activated(path)) => {
                println!("{:?} -> activated {:?}", event, path);
            }
            Ok(r) => {
                println!("{:?} -> {:?}", event, r);
            }
            Err(e) => {
                println!("{:?} -> failed: {}", event, e);
            }
        }
        for node in menu.chain() {
            println!("    depth {} at {:?}", node.depth(), node.area);
        }
    }

    if menu.is_open() {
        return Err(anyhow!("menu still open"));
    }
    Ok(())
}

/// Host without any windows.
#[derive(Debug)]
struct LogHost {
    display: DisplayContext,
    next: usize,
}

impl MenuHost for LogHost {
    type Window = usize;

    fn bind_trigger(&mut self, trigger: Trigger) {
        debug!("bind {:?}", trigger);
    }

    fn display_context(&mut self, _at: Point) -> DisplayContext {
        self.display
    }

    fn open_popup(&mut self, area: Rect, entries: &[PopupEntry<'_>]) -> usize {
        self.next += 1;
        debug!("window {} at {:?}", self.next, area);
        for entry in entries {
            debug!(
                "    {} {:?}{}",
                entry.label,
                entry.area,
                if entry.submenu { " >" } else { "" }
            );
        }
        self.next
    }

    fn close_popup(&mut self, window: usize) {
        debug!("close window {}", window);
    }

    fn highlight(&mut self, window: &usize, entry: Option<usize>) {
        debug!("window {} highlight {:?}", window, entry);
    }
}

fn setup_logging() -> Result<(), anyhow::Error> {
    let log = PathBuf::from("context_menu1.log");
    if log.exists() {
        fs::remove_file(&log)?;
    }
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("{} {}", record.level(), message))
        })
        .level(log::LevelFilter::Debug)
        .chain(fern::log_file(&log)?)
        .apply()?;
    Ok(())
}
