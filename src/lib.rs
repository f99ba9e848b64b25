#![doc = include_str!("../readme.md")]
//
#![allow(clippy::collapsible_else_if)]

use crate::_private::NonExhaustive;
use crate::host::MenuMetrics;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

pub mod context_menu;
pub mod dpi;
pub mod geometry;
pub mod host;
pub mod node;
pub mod spec;

pub use context_menu::{handle_events, ContextMenu};
pub use geometry::{resolve, DisplayContext, PlacementResult, Point, Rect, Side, Size};
pub use host::{MenuHost, Trigger};
pub use spec::{Action, ActionError, ActionRegistry, InvalidSpecError, MenuBuilder, MenuSpec};

pub mod event {
    //!
    //! Input for the context menu and the results of handling it.
    //!
    pub use rat_event::*;

    use crate::geometry::Point;

    /// Input as delivered by the host toolkit.
    ///
    /// All positions are physical screen coordinates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MenuEvent {
        /// The trigger gesture happened on the bound widget.
        Trigger(Point),
        /// Pointer moved.
        Moved(Point),
        /// Primary click.
        Click(Point),
        /// Key press.
        Key(MenuKey),
        /// The bound widget lost the focus.
        FocusLost,
        /// The bound widget is gone.
        HostDestroyed,
    }

    /// Keys the menu reacts to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MenuKey {
        /// Escape.
        Cancel,
        Up,
        Down,
        Home,
        End,
        /// Open the selected submenu.
        Right,
        /// Close the innermost submenu.
        Left,
        /// Activate the selected entry.
        Enter,
    }

    /// Outcome for the context menu.
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
    pub enum MenuOutcome {
        /// The given event was not handled at all.
        Continue,
        /// The event was handled, no repaint necessary.
        Unchanged,
        /// The event was handled, repaint necessary.
        Changed,
        /// The menu chain has been closed.
        Hide,
        /// An action was run. Contains the entry indices from
        /// the root menu down to the activated entry.
        ///
        /// The menu chain has been closed before running the action.
        Activated(Vec<usize>),
    }

    impl ConsumedEvent for MenuOutcome {
        fn is_consumed(&self) -> bool {
            *self != MenuOutcome::Continue
        }
    }

    impl From<MenuOutcome> for Outcome {
        fn from(value: MenuOutcome) -> Self {
            match value {
                MenuOutcome::Continue => Outcome::Continue,
                MenuOutcome::Unchanged => Outcome::Unchanged,
                MenuOutcome::Changed => Outcome::Changed,
                MenuOutcome::Hide => Outcome::Changed,
                MenuOutcome::Activated(_) => Outcome::Changed,
            }
        }
    }

    impl From<Outcome> for MenuOutcome {
        fn from(value: Outcome) -> Self {
            match value {
                Outcome::Continue => MenuOutcome::Continue,
                Outcome::Unchanged => MenuOutcome::Unchanged,
                Outcome::Changed => MenuOutcome::Changed,
            }
        }
    }

    impl From<bool> for MenuOutcome {
        fn from(value: bool) -> Self {
            if value {
                MenuOutcome::Changed
            } else {
                MenuOutcome::Unchanged
            }
        }
    }
}

/// Combined styles.
///
/// Offsets are logical pixels, they are scaled with the display.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenuStyle {
    /// Offset of the root menu from the trigger point.
    pub offset: Option<(i32, i32)>,
    /// Offset of a submenu from its entry. A negative x lets the
    /// submenu overlap its parent.
    pub submenu_offset: Option<(i32, i32)>,
    /// Sizes for the default layout.
    pub metrics: Option<MenuMetrics>,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub non_exhaustive: NonExhaustive,
}

impl Default for ContextMenuStyle {
    fn default() -> Self {
        Self {
            offset: None,
            submenu_offset: None,
            metrics: None,
            non_exhaustive: NonExhaustive,
        }
    }
}

mod _private {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NonExhaustive;
}
