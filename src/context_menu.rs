//!
//! A context menu bound to one widget.
//!
//! [ContextMenu] owns the host, the menu structure and the chain
//! of open popups. The host reports the trigger gesture and all
//! input while the menu is open as [MenuEvent]s.
//!
//! ```
//! # use rat_context_menu::host::{MenuHost, PopupEntry, Trigger};
//! # use rat_context_menu::geometry::{DisplayContext, Point, Rect};
//! # #[derive(Debug, Default)]
//! # struct MyHost;
//! # impl MenuHost for MyHost {
//! #     type Window = ();
//! #     fn bind_trigger(&mut self, _trigger: Trigger) {}
//! #     fn display_context(&mut self, _at: Point) -> DisplayContext {
//! #         DisplayContext::new(1.0, Rect::new(0, 0, 1920, 1080))
//! #     }
//! #     fn open_popup(&mut self, _area: Rect, _entries: &[PopupEntry<'_>]) {}
//! #     fn close_popup(&mut self, _window: ()) {}
//! # }
//! use rat_context_menu::event::{HandleEvent, MenuEvent, MenuOutcome, Popup};
//! use rat_context_menu::{ContextMenu, MenuBuilder};
//!
//! let mut menu = MenuBuilder::new();
//! menu.action("Copy", || Ok(()));
//! menu.submenu("More", |m| {
//!     m.action("Paste", || Ok(()));
//! });
//!
//! let mut ctx = ContextMenu::new(MyHost, menu.build());
//! let r = ctx.handle(&MenuEvent::Trigger(Point::new(50, 50)), Popup);
//! assert_eq!(r.ok(), Some(MenuOutcome::Changed));
//! assert!(ctx.is_open());
//! ```
//!
//! ## Dismissal
//!
//! The whole chain closes on a click outside of every open popup,
//! on [MenuKey::Cancel], when the widget loses the focus or is
//! destroyed, and after an action has been activated.
//! Closing a closed menu does nothing.
//!
//! ## Actions
//!
//! When an action is activated, the chain is closed first and the
//! action runs afterward. Its error is returned as is.
//!

use crate::_private::NonExhaustive;
use crate::event::{MenuEvent, MenuKey, MenuOutcome};
use crate::geometry::{Point, Rect, Side};
use crate::host::{MenuHost, MenuMetrics, Trigger};
use crate::node::{Activation, Chain, ChainContext, MenuNode};
use crate::spec::{ActionError, ActionRegistry, InvalidSpecError, MenuSpec};
use crate::ContextMenuStyle;
use log::debug;
use rat_event::{HandleEvent, Popup};
use serde_json::Value;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Default logical offset of a submenu from its entry.
///
/// Overlaps the parent a bit and moves up, so the pointer
/// stays inside when moving over quickly.
pub const SUBMENU_OFFSET: (i32, i32) = (-4, -4);

/// Context menu controller.
pub struct ContextMenu<H>
where
    H: MenuHost,
{
    host: H,
    spec: Rc<MenuSpec>,
    trigger: Trigger,

    offset: (i32, i32),
    submenu_offset: (i32, i32),
    metrics: MenuMetrics,

    /// Snapshot for the open chain.
    chain: Option<ChainContext>,
    root: MenuNode<H::Window>,
    /// The host is gone.
    detached: bool,

    pub non_exhaustive: NonExhaustive,
}

impl<H> Debug for ContextMenu<H>
where
    H: MenuHost + Debug,
    H::Window: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextMenu")
            .field("host", &self.host)
            .field("spec", &self.spec)
            .field("trigger", &self.trigger)
            .field("offset", &self.offset)
            .field("submenu_offset", &self.submenu_offset)
            .field("metrics", &self.metrics)
            .field("chain", &self.chain)
            .field("root", &self.root)
            .field("detached", &self.detached)
            .finish()
    }
}

impl<H> ContextMenu<H>
where
    H: MenuHost,
{
    /// New context menu. Binds to a secondary click.
    pub fn new(host: H, spec: MenuSpec) -> Self {
        Self::with_trigger(host, spec, Trigger::default())
    }

    /// New context menu with the given trigger gesture.
    pub fn with_trigger(mut host: H, spec: MenuSpec, trigger: Trigger) -> Self {
        host.bind_trigger(trigger);

        let spec = Rc::new(spec);
        Self {
            host,
            root: MenuNode::new(Rc::clone(&spec), 0),
            spec,
            trigger,
            offset: (0, 0),
            submenu_offset: SUBMENU_OFFSET,
            metrics: Default::default(),
            chain: None,
            detached: false,
            non_exhaustive: NonExhaustive,
        }
    }

    /// New context menu from a nested mapping.
    ///
    /// See [MenuSpec::build]. Fails before the trigger is bound.
    pub fn from_value(
        host: H,
        value: &Value,
        actions: &ActionRegistry,
    ) -> Result<Self, InvalidSpecError> {
        let spec = MenuSpec::build(value, actions)?;
        Ok(Self::new(host, spec))
    }

    /// New context menu from json text.
    ///
    /// See [MenuSpec::from_json]. Fails before the trigger is bound.
    pub fn from_json(
        host: H,
        text: &str,
        actions: &ActionRegistry,
    ) -> Result<Self, InvalidSpecError> {
        let spec = MenuSpec::from_json(text, actions)?;
        Ok(Self::new(host, spec))
    }

    /// Set all styles.
    pub fn styles(mut self, styles: ContextMenuStyle) -> Self {
        if let Some(offset) = styles.offset {
            self.offset = offset;
        }
        if let Some(submenu_offset) = styles.submenu_offset {
            self.submenu_offset = submenu_offset;
        }
        if let Some(metrics) = styles.metrics {
            self.metrics = metrics;
        }
        self
    }

    /// Logical offset of the root menu from the trigger point.
    pub fn offset(mut self, offset: (i32, i32)) -> Self {
        self.offset = offset;
        self
    }

    /// Logical offset of submenus from their entry.
    /// Defaults to [SUBMENU_OFFSET].
    pub fn submenu_offset(mut self, offset: (i32, i32)) -> Self {
        self.submenu_offset = offset;
        self
    }

    /// Sizes for the default layout.
    pub fn metrics(mut self, metrics: MenuMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn spec(&self) -> &Rc<MenuSpec> {
        &self.spec
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// Root menu.
    pub fn root(&self) -> &MenuNode<H::Window> {
        &self.root
    }

    /// Display snapshot and layout of the open chain.
    pub fn chain_context(&self) -> Option<&ChainContext> {
        self.chain.as_ref()
    }

    /// Menu is open.
    pub fn is_open(&self) -> bool {
        self.root.is_open()
    }

    /// The host widget is gone.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// All open popups, root first.
    pub fn chain(&self) -> Chain<'_, H::Window> {
        self.root.chain()
    }

    /// Number of open popups.
    pub fn chain_len(&self) -> usize {
        self.root.chain().count()
    }

    /// Is the point inside any open popup.
    pub fn contains(&self, pos: Point) -> bool {
        self.root.chain().any(|v| v.area.contains(pos))
    }

    /// Open the menu at the given screen position.
    ///
    /// An already open menu is closed first and opened anew.
    /// After the host is gone it is only closed.
    pub fn open_at(&mut self, pos: Point) -> MenuOutcome {
        self.close();

        if self.detached || !self.host.is_alive() {
            return MenuOutcome::Continue;
        }

        let chain = ChainContext {
            display: self.host.display_context(pos),
            metrics: self.metrics,
            submenu_offset: self.submenu_offset,
        };
        debug!("context menu at {:?} scale {}", pos, chain.display.scale);
        self.root
            .open(&mut self.host, Rect::at(pos), Side::Below, self.offset, &chain);
        self.chain = Some(chain);

        MenuOutcome::Changed
    }

    /// Close the whole chain.
    ///
    /// Returns false if nothing was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.root.is_open();
        self.root.close(&mut self.host);
        self.chain = None;
        was_open
    }

    /// Pointer moved.
    pub fn hover(&mut self, pos: Point) -> MenuOutcome {
        let Some(chain) = self.chain else {
            return MenuOutcome::Continue;
        };
        let hit = self
            .root
            .node_at(pos)
            .map(|v| (v.depth(), v.entry_at(pos)));
        match hit {
            None => MenuOutcome::Continue,
            Some((_, None)) => MenuOutcome::Unchanged,
            Some((depth, Some(n))) => match self.root.node_mut(depth) {
                Some(node) => node.hover(&mut self.host, n, &chain).into(),
                None => MenuOutcome::Unchanged,
            },
        }
    }

    /// Primary click.
    ///
    /// Outside every popup of the chain the menu closes.
    pub fn click(&mut self, pos: Point) -> Result<MenuOutcome, ActionError> {
        if !self.is_open() {
            return Ok(MenuOutcome::Continue);
        }
        let hit = self
            .root
            .node_at(pos)
            .map(|v| (v.depth(), v.entry_at(pos)));
        match hit {
            None => {
                debug!("click outside {:?}", pos);
                self.close();
                Ok(MenuOutcome::Hide)
            }
            Some((_, None)) => Ok(MenuOutcome::Unchanged),
            Some((depth, Some(n))) => self.activate(depth, n),
        }
    }

    /// Activate entry n of the open popup at the given depth.
    ///
    /// A submenu opens. An action closes the chain and runs
    /// afterward.
    pub fn activate(&mut self, depth: usize, n: usize) -> Result<MenuOutcome, ActionError> {
        let Some(chain) = self.chain else {
            return Ok(MenuOutcome::Continue);
        };

        let mut path = self
            .root
            .chain()
            .take(depth)
            .filter_map(|v| v.child_index())
            .collect::<Vec<_>>();
        path.push(n);

        let Some(node) = self.root.node_mut(depth) else {
            return Ok(MenuOutcome::Unchanged);
        };
        match node.activate(&mut self.host, n, &chain) {
            Activation::Unchanged => Ok(MenuOutcome::Unchanged),
            Activation::Opened(_) => Ok(MenuOutcome::Changed),
            Activation::Action(action) => {
                self.close();
                debug!("activated {:?}", path);
                action.invoke()?;
                Ok(MenuOutcome::Activated(path))
            }
        }
    }

    /// Keyboard navigation in the innermost popup.
    pub fn key(&mut self, key: MenuKey) -> Result<MenuOutcome, ActionError> {
        let Some(chain) = self.chain else {
            return Ok(MenuOutcome::Continue);
        };

        let r = match key {
            MenuKey::Cancel => {
                self.close();
                MenuOutcome::Hide
            }
            MenuKey::Up => self.root.deepest_mut().prev_item(&mut self.host).into(),
            MenuKey::Down => self.root.deepest_mut().next_item(&mut self.host).into(),
            MenuKey::Home => {
                let node = self.root.deepest_mut();
                node.select(&mut self.host, Some(0)).into()
            }
            MenuKey::End => {
                let node = self.root.deepest_mut();
                let last = node.len().saturating_sub(1);
                node.select(&mut self.host, Some(last)).into()
            }
            MenuKey::Right => {
                let node = self.root.deepest_mut();
                match node.selected {
                    Some(n) => match node.open_child(&mut self.host, n, &chain) {
                        Activation::Opened(_) => {
                            if let Some(child) = node.child_mut() {
                                child.next_item(&mut self.host);
                            }
                            MenuOutcome::Changed
                        }
                        _ => MenuOutcome::Unchanged,
                    },
                    None => MenuOutcome::Unchanged,
                }
            }
            MenuKey::Left => {
                let depth = self.root.deepest().depth();
                if depth > 0 {
                    match self.root.node_mut(depth - 1) {
                        Some(parent) => parent.close_child(&mut self.host).into(),
                        None => MenuOutcome::Unchanged,
                    }
                } else {
                    MenuOutcome::Unchanged
                }
            }
            MenuKey::Enter => {
                let node = self.root.deepest();
                let (depth, selected) = (node.depth(), node.selected);
                match selected {
                    Some(n) => return self.activate(depth, n),
                    None => MenuOutcome::Unchanged,
                }
            }
        };
        Ok(r)
    }

    /// The widget lost the focus.
    pub fn focus_lost(&mut self) -> MenuOutcome {
        if self.close() {
            debug!("focus lost");
            MenuOutcome::Hide
        } else {
            MenuOutcome::Continue
        }
    }

    /// The widget is gone. Closes the menu and ignores
    /// any later trigger.
    pub fn detach(&mut self) -> MenuOutcome {
        self.detached = true;
        if self.close() {
            debug!("host destroyed");
            MenuOutcome::Hide
        } else {
            MenuOutcome::Continue
        }
    }
}

impl<H> HandleEvent<MenuEvent, Popup, Result<MenuOutcome, ActionError>> for ContextMenu<H>
where
    H: MenuHost,
{
    fn handle(&mut self, event: &MenuEvent, _qualifier: Popup) -> Result<MenuOutcome, ActionError> {
        match event {
            MenuEvent::Trigger(pos) => Ok(self.open_at(*pos)),
            MenuEvent::Moved(pos) => Ok(self.hover(*pos)),
            MenuEvent::Click(pos) => self.click(*pos),
            MenuEvent::Key(key) => self.key(*key),
            MenuEvent::FocusLost => Ok(self.focus_lost()),
            MenuEvent::HostDestroyed => Ok(self.detach()),
        }
    }
}

/// Handle all events.
pub fn handle_events<H>(
    state: &mut ContextMenu<H>,
    event: &MenuEvent,
) -> Result<MenuOutcome, ActionError>
where
    H: MenuHost,
{
    state.handle(event, Popup)
}
