//!
//! What the menu needs from the widget toolkit.
//!
//! The toolkit creates and destroys the popup windows, knows the
//! displays and delivers the input. Everything else is done by
//! this crate. Implement [MenuHost] for the toolkit and feed its
//! input as [MenuEvent](crate::event::MenuEvent) to the
//! [ContextMenu](crate::context_menu::ContextMenu).
//!

use crate::dpi::scale_up;
use crate::geometry::{DisplayContext, Point, Rect, Size};
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// Gesture that opens the context menu.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Right click.
    #[default]
    SecondaryClick,
    /// Left click.
    PrimaryClick,
    /// The menu key of the keyboard.
    MenuKey,
}

/// Layout of a popup, relative to its own origin.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PopupLayout {
    /// Size of the popup.
    pub size: Size,
    /// Area for each entry.
    pub entries: Vec<Rect>,
}

/// One entry as given to [MenuHost::open_popup].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupEntry<'a> {
    pub label: &'a str,
    /// Screen area of the entry.
    pub area: Rect,
    /// Opens a submenu.
    pub submenu: bool,
}

/// Sizes for the default layout, in logical pixels.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuMetrics {
    /// Height of one entry.
    pub entry_height: i32,
    /// Width of one text column.
    pub char_width: i32,
    /// Space left and right of the label inside the entry.
    pub text_padding: i32,
    /// Minimum width of an entry.
    pub min_width: i32,
    /// Space between border and entries.
    pub padding_x: i32,
    /// Space between border and entries.
    pub padding_y: i32,
    /// Border width.
    pub border: i32,
}

impl Default for MenuMetrics {
    fn default() -> Self {
        Self {
            entry_height: 28,
            char_width: 8,
            text_padding: 16,
            min_width: 140,
            padding_x: 4,
            padding_y: 4,
            border: 1,
        }
    }
}

impl MenuMetrics {
    /// Default layout of a popup with the given labels.
    ///
    /// Entries are stacked vertically and all have the width of
    /// the widest label. The text width is estimated with the
    /// display width of the label.
    ///
    /// Every edge is computed in logical pixels and scaled separately,
    /// so the entries tile the popup without gaps.
    pub fn layout(&self, labels: &[&str], scale: f64) -> PopupLayout {
        let text_width = labels
            .iter()
            .map(|v| v.width() as i32)
            .max()
            .unwrap_or(0);
        let entry_width = (text_width * self.char_width + 2 * self.text_padding).max(self.min_width);

        let inset_x = self.border + self.padding_x;
        let inset_y = self.border + self.padding_y;
        let width = entry_width + 2 * inset_x;
        let height = labels.len() as i32 * self.entry_height + 2 * inset_y;

        let entries = (0..labels.len() as i32)
            .map(|n| {
                let x0 = scale_up(inset_x, scale);
                let x1 = scale_up(inset_x + entry_width, scale);
                let y0 = scale_up(inset_y + n * self.entry_height, scale);
                let y1 = scale_up(inset_y + (n + 1) * self.entry_height, scale);
                Rect::new(x0, y0, x1 - x0, y1 - y0)
            })
            .collect();

        PopupLayout {
            size: Size::new(scale_up(width, scale), scale_up(height, scale)),
            entries,
        }
    }
}

/// Capabilities of the widget toolkit.
///
/// All calls happen on the ui thread, in response to an event
/// given to the context menu.
pub trait MenuHost {
    /// Handle for an open popup window.
    type Window;

    /// Called once when the context menu is created.
    ///
    /// The host must report this gesture on the bound widget
    /// as [MenuEvent::Trigger](crate::event::MenuEvent::Trigger).
    fn bind_trigger(&mut self, trigger: Trigger);

    /// Scale and work area of the screen containing the point.
    fn display_context(&mut self, at: Point) -> DisplayContext;

    /// Layout of a popup with these labels.
    ///
    /// The default uses [MenuMetrics::layout]. Override this if the
    /// toolkit can measure the rendered size.
    fn layout(&mut self, labels: &[&str], metrics: &MenuMetrics, scale: f64) -> PopupLayout {
        metrics.layout(labels, scale)
    }

    /// Show a popup window at the given screen area.
    ///
    /// This must not block. It's fine if the window appears
    /// sometime later.
    fn open_popup(&mut self, area: Rect, entries: &[PopupEntry<'_>]) -> Self::Window;

    /// Remove the popup window.
    fn close_popup(&mut self, window: Self::Window);

    /// Show the highlight for an entry.
    fn highlight(&mut self, _window: &Self::Window, _entry: Option<usize>) {}

    /// The bound widget still exists.
    ///
    /// If this returns false, no more windows will be opened or closed,
    /// the handles are just dropped.
    fn is_alive(&self) -> bool {
        true
    }
}
