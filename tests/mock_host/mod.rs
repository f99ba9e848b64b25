#![allow(dead_code)]

use rat_context_menu::geometry::{DisplayContext, Point, Rect};
use rat_context_menu::host::{MenuHost, MenuMetrics, PopupEntry, Trigger};
use std::cell::RefCell;
use std::rc::Rc;

/// Everything the host has been asked to do.
#[derive(Debug, Default)]
pub struct HostLog {
    pub trigger: Option<Trigger>,
    /// Currently open windows as (id, area, labels).
    pub windows: Vec<(usize, Rect, Vec<String>)>,
    pub opened: usize,
    pub closed: usize,
    pub highlights: Vec<(usize, Option<usize>)>,
    pub alive: bool,
}

impl HostLog {
    pub fn window(&self, id: usize) -> Option<&(usize, Rect, Vec<String>)> {
        self.windows.iter().find(|v| v.0 == id)
    }
}

/// Host that only records.
#[derive(Debug)]
pub struct MockHost {
    pub display: DisplayContext,
    pub log: Rc<RefCell<HostLog>>,
    next_id: usize,
}

impl MockHost {
    pub fn new(display: DisplayContext) -> Self {
        Self {
            display,
            log: Rc::new(RefCell::new(HostLog {
                alive: true,
                ..Default::default()
            })),
            next_id: 0,
        }
    }

    /// Work area 400x300, scale 1.
    pub fn small() -> Self {
        Self::new(DisplayContext::new(1.0, Rect::new(0, 0, 400, 300)))
    }

    pub fn log(&self) -> Rc<RefCell<HostLog>> {
        Rc::clone(&self.log)
    }
}

impl MenuHost for MockHost {
    type Window = usize;

    fn bind_trigger(&mut self, trigger: Trigger) {
        self.log.borrow_mut().trigger = Some(trigger);
    }

    fn display_context(&mut self, _at: Point) -> DisplayContext {
        self.display
    }

    fn open_popup(&mut self, area: Rect, entries: &[PopupEntry<'_>]) -> usize {
        self.next_id += 1;
        let mut log = self.log.borrow_mut();
        log.opened += 1;
        log.windows.push((
            self.next_id,
            area,
            entries.iter().map(|v| v.label.to_string()).collect(),
        ));
        self.next_id
    }

    fn close_popup(&mut self, window: usize) {
        let mut log = self.log.borrow_mut();
        log.closed += 1;
        log.windows.retain(|v| v.0 != window);
    }

    fn highlight(&mut self, window: &usize, entry: Option<usize>) {
        self.log.borrow_mut().highlights.push((*window, entry));
    }

    fn is_alive(&self) -> bool {
        self.log.borrow().alive
    }
}

/// Entries are 100x20 for labels up to 10 chars, no border.
pub fn test_metrics() -> MenuMetrics {
    MenuMetrics {
        entry_height: 20,
        char_width: 10,
        text_padding: 0,
        min_width: 100,
        padding_x: 0,
        padding_y: 0,
        border: 0,
    }
}
