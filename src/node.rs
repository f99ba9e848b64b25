//!
//! One popup of the menu chain.
//!
//! A [MenuNode] is the runtime side of a [MenuSpec]. It knows where
//! it is on screen, where its entries are, and it owns at most one
//! open child node. Opening a child always closes the previous one,
//! closing a node always closes its child first.
//!

use crate::_private::NonExhaustive;
use crate::geometry::{resolve, DisplayContext, PlacementResult, Point, Rect, Side};
use crate::host::{MenuHost, MenuMetrics, PopupEntry};
use crate::spec::{Action, Entry, MenuSpec};
use log::debug;
use std::rc::Rc;

/// State of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Closed,
    /// Open, no child open.
    Open,
    /// Open, and a submenu is open too.
    OpenWithChild,
}

/// Result of activating an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// Nothing happened.
    Unchanged,
    /// The submenu for this entry has been opened.
    Opened(usize),
    /// This action should run. The node doesn't run it itself,
    /// that's left to whoever owns the chain.
    Action(Action),
}

/// Snapshot of everything that is needed to place the popups
/// of one chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainContext {
    pub display: DisplayContext,
    pub metrics: MenuMetrics,
    /// Logical offset for submenus.
    pub submenu_offset: (i32, i32),
}

/// A popup of the menu chain.
#[derive(Debug)]
pub struct MenuNode<W> {
    spec: Rc<MenuSpec>,
    depth: usize,

    /// Area of the popup.
    /// __readonly__. renewed for each open.
    pub area: Rect,
    /// Areas of the entries.
    /// __readonly__. renewed for each open.
    pub entry_areas: Vec<Rect>,
    /// How the popup was placed.
    /// __readonly__. renewed for each open.
    pub placement: PlacementResult,
    /// Preferred side used for the last open.
    /// __readonly__. renewed for each open.
    pub side: Side,
    /// Highlighted entry.
    /// __read only__. use select().
    pub selected: Option<usize>,

    open: bool,
    window: Option<W>,
    child: Option<(usize, Box<MenuNode<W>>)>,

    pub non_exhaustive: NonExhaustive,
}

impl<W> MenuNode<W> {
    /// New closed node.
    pub fn new(spec: Rc<MenuSpec>, depth: usize) -> Self {
        Self {
            spec,
            depth,
            area: Default::default(),
            entry_areas: Default::default(),
            placement: Default::default(),
            side: Default::default(),
            selected: None,
            open: false,
            window: None,
            child: None,
            non_exhaustive: NonExhaustive,
        }
    }

    pub fn spec(&self) -> &Rc<MenuSpec> {
        &self.spec
    }

    /// 0 for the root menu.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn state(&self) -> NodeState {
        match (self.open, self.child.is_some()) {
            (false, _) => NodeState::Closed,
            (true, false) => NodeState::Open,
            (true, true) => NodeState::OpenWithChild,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Host window, if any.
    pub fn window(&self) -> Option<&W> {
        self.window.as_ref()
    }

    /// Open child.
    pub fn child(&self) -> Option<&MenuNode<W>> {
        self.child.as_ref().map(|(_, v)| v.as_ref())
    }

    /// Open child.
    pub fn child_mut(&mut self) -> Option<&mut MenuNode<W>> {
        self.child.as_mut().map(|(_, v)| v.as_mut())
    }

    /// Entry that opened the child.
    pub fn child_index(&self) -> Option<usize> {
        self.child.as_ref().map(|(n, _)| *n)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.spec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spec.is_empty()
    }

    /// This node and all open descendants.
    pub fn chain(&self) -> Chain<'_, W> {
        Chain { next: Some(self) }
    }

    /// Deepest open node.
    pub fn deepest(&self) -> &MenuNode<W> {
        match &self.child {
            Some((_, child)) => child.deepest(),
            None => self,
        }
    }

    /// Deepest open node.
    pub fn deepest_mut(&mut self) -> &mut MenuNode<W> {
        match self.child {
            Some((_, ref mut child)) => child.deepest_mut(),
            None => self,
        }
    }

    /// Open node by depth.
    pub fn node_mut(&mut self, depth: usize) -> Option<&mut MenuNode<W>> {
        if !self.open {
            None
        } else if self.depth == depth {
            Some(self)
        } else {
            self.child.as_mut().and_then(|(_, v)| v.node_mut(depth))
        }
    }

    /// The popup ended up left of its anchor entry.
    ///
    /// The root menu counts as rightward whatever happened.
    pub fn opens_left(&self) -> bool {
        match self.side {
            Side::Below => false,
            Side::RightOf => self.placement.flipped.horizontal,
            Side::LeftOf => !self.placement.flipped.horizontal,
        }
    }

    /// Is the point inside this popup.
    pub fn contains(&self, pos: Point) -> bool {
        self.open && self.area.contains(pos)
    }

    /// Entry at the position.
    pub fn entry_at(&self, pos: Point) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        self.entry_areas.iter().position(|v| v.contains(pos))
    }

    /// Deepest open node containing the point.
    ///
    /// Submenus may overlap their parent, the deepest one is on top.
    pub fn node_at(&self, pos: Point) -> Option<&MenuNode<W>> {
        let below = self.child().and_then(|v| v.node_at(pos));
        if below.is_some() {
            below
        } else if self.contains(pos) {
            Some(self)
        } else {
            None
        }
    }

    /// Open the popup.
    ///
    /// * anchor: Trigger point or entry area.
    /// * side: Placement relative to the anchor.
    /// * offset: Logical offset.
    ///
    /// Does nothing if the node is already open.
    pub fn open<H>(
        &mut self,
        host: &mut H,
        anchor: Rect,
        side: Side,
        offset: (i32, i32),
        chain: &ChainContext,
    ) where
        H: MenuHost<Window = W>,
    {
        if self.open {
            return;
        }

        let labels = self.spec.labels().collect::<Vec<_>>();
        let layout = host.layout(&labels, &chain.metrics, chain.display.scale);

        self.side = side;
        self.placement = resolve(anchor, layout.size, &chain.display, side, offset);
        self.area = self.placement.area;
        self.entry_areas = layout
            .entries
            .iter()
            .map(|v| v.translate(self.area.x, self.area.y))
            .collect();
        self.selected = None;
        self.open = true;

        if host.is_alive() {
            let entries = self
                .spec
                .iter()
                .zip(self.entry_areas.iter())
                .map(|((label, entry), area)| PopupEntry {
                    label,
                    area: *area,
                    submenu: entry.is_submenu(),
                })
                .collect::<Vec<_>>();
            self.window = Some(host.open_popup(self.area, &entries));
        }

        debug!(
            "open menu depth {} at {:?} flipped {:?}",
            self.depth, self.area, self.placement.flipped
        );
    }

    /// Close the popup and everything below.
    ///
    /// Closing a closed node does nothing.
    pub fn close<H>(&mut self, host: &mut H)
    where
        H: MenuHost<Window = W>,
    {
        self.close_child(host);

        if let Some(window) = self.window.take() {
            if host.is_alive() {
                host.close_popup(window);
            }
        }
        if self.open {
            debug!("close menu depth {}", self.depth);
        }
        self.open = false;
        self.selected = None;
        self.area = Default::default();
        self.entry_areas.clear();
    }

    /// Close the open child, if any.
    pub fn close_child<H>(&mut self, host: &mut H) -> bool
    where
        H: MenuHost<Window = W>,
    {
        if let Some((_, mut child)) = self.child.take() {
            child.close(host);
            true
        } else {
            false
        }
    }

    /// Open the submenu of entry n.
    ///
    /// The submenu opens right of the entry, or left of it if this
    /// popup already went leftward.
    /// Closes any other open child first. If the entry's submenu is
    /// already open nothing changes. Entries with an action are ignored.
    pub fn open_child<H>(&mut self, host: &mut H, n: usize, chain: &ChainContext) -> Activation
    where
        H: MenuHost<Window = W>,
    {
        if !self.open {
            return Activation::Unchanged;
        }
        let sub = match self.spec.entry(n) {
            Some((_, Entry::SubMenu(sub))) => Rc::clone(sub),
            _ => return Activation::Unchanged,
        };
        if self.child_index() == Some(n) {
            return Activation::Unchanged;
        }

        self.close_child(host);

        let anchor = self.entry_areas.get(n).copied().unwrap_or(self.area);
        // keep going in the same direction as the parent
        let side = if self.opens_left() {
            Side::LeftOf
        } else {
            Side::RightOf
        };
        let mut child = Box::new(MenuNode::new(sub, self.depth + 1));
        child.open(host, anchor, side, chain.submenu_offset, chain);
        self.child = Some((n, child));

        Activation::Opened(n)
    }

    /// Activate entry n.
    ///
    /// For an action this returns [Activation::Action], running it and
    /// closing the chain is up to the caller. For a submenu it opens
    /// the submenu.
    pub fn activate<H>(&mut self, host: &mut H, n: usize, chain: &ChainContext) -> Activation
    where
        H: MenuHost<Window = W>,
    {
        if !self.open {
            return Activation::Unchanged;
        }
        let action = match self.spec.entry(n) {
            None => return Activation::Unchanged,
            Some((_, Entry::Action(action))) => Some(action.clone()),
            Some((_, Entry::SubMenu(_))) => None,
        };

        self.select(host, Some(n));
        match action {
            Some(action) => Activation::Action(action),
            None => self.open_child(host, n, chain),
        }
    }

    /// Pointer is over entry n.
    ///
    /// Selects the entry. A submenu opens with its first entry
    /// selected, for an action entry any open submenu closes.
    pub fn hover<H>(&mut self, host: &mut H, n: usize, chain: &ChainContext) -> bool
    where
        H: MenuHost<Window = W>,
    {
        if !self.open || n >= self.len() {
            return false;
        }

        let mut changed = self.select(host, Some(n));
        let is_submenu = self.spec.entry(n).is_some_and(|(_, e)| e.is_submenu());
        if is_submenu {
            if let Activation::Opened(_) = self.open_child(host, n, chain) {
                if let Some(child) = self.child_mut() {
                    child.next_item(host);
                }
                changed = true;
            }
        } else {
            changed |= self.close_child(host);
        }
        changed
    }

    /// Change the selection.
    pub fn select<H>(&mut self, host: &mut H, select: Option<usize>) -> bool
    where
        H: MenuHost<Window = W>,
    {
        let select = select.filter(|v| *v < self.len());
        let old = self.selected;
        self.selected = select;
        if old != self.selected {
            if let Some(window) = &self.window {
                if host.is_alive() {
                    host.highlight(window, self.selected);
                }
            }
            true
        } else {
            false
        }
    }

    /// Select the previous entry.
    pub fn prev_item<H>(&mut self, host: &mut H) -> bool
    where
        H: MenuHost<Window = W>,
    {
        if self.is_empty() {
            return false;
        }
        let select = match self.selected {
            Some(n) => n.saturating_sub(1),
            None => self.len() - 1,
        };
        self.select(host, Some(select))
    }

    /// Select the next entry.
    pub fn next_item<H>(&mut self, host: &mut H) -> bool
    where
        H: MenuHost<Window = W>,
    {
        if self.is_empty() {
            return false;
        }
        let select = match self.selected {
            Some(n) => (n + 1).min(self.len() - 1),
            None => 0,
        };
        self.select(host, Some(select))
    }
}

/// Iterator over the open nodes, root first.
#[derive(Debug)]
pub struct Chain<'a, W> {
    next: Option<&'a MenuNode<W>>,
}

impl<'a, W> Iterator for Chain<'a, W> {
    type Item = &'a MenuNode<W>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next.filter(|v| v.open)?;
        self.next = node.child();
        Some(node)
    }
}
