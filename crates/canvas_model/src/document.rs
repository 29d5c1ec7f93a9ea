//! Canvas document: ordered widgets plus page configuration
//!
//! Widget order is z-order. New widgets are appended and therefore render on
//! top; the order is preserved through serialization.

use crate::{snap, CanvasError, PageConfig, PageSize, Result, Widget, WidgetId, WidgetKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Target edge or center line for aligning a widget on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

impl FromStr for Alignment {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            "top" => Ok(Alignment::Top),
            "middle" => Ok(Alignment::Middle),
            "bottom" => Ok(Alignment::Bottom),
            _ => Err(CanvasError::InvalidAlignment(s.to_string())),
        }
    }
}

/// The full in-memory report layout
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasDocument {
    widgets: Vec<Widget>,
    page: PageConfig,
    /// Widget currently selected for editing; never persisted
    #[serde(skip)]
    active_id: Option<WidgetId>,
}

impl CanvasDocument {
    /// Create an empty document on the `free` page
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with the given page configuration
    pub fn with_page(page: PageConfig) -> Self {
        Self {
            widgets: Vec::new(),
            page,
            active_id: None,
        }
    }

    /// Build a document from loaded widgets, keeping their order
    pub fn from_widgets(widgets: Vec<Widget>, page: PageConfig) -> Self {
        Self {
            widgets,
            page,
            active_id: None,
        }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn into_widgets(self) -> Vec<Widget> {
        self.widgets
    }

    pub fn page(&self) -> &PageConfig {
        &self.page
    }

    pub fn set_page(&mut self, page: PageConfig) {
        self.page = page;
    }

    /// Resolve the page size against the measured container size
    pub fn effective_page_size(&self, measured: PageSize) -> PageSize {
        self.page.effective_size(measured)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn get(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    /// Mutable access for in-place edits. Callers changing geometry are
    /// responsible for keeping it on the grid.
    pub fn get_mut(&mut self, id: &WidgetId) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| &w.id == id)
    }

    fn index_of(&self, id: &WidgetId) -> Result<usize> {
        self.widgets
            .iter()
            .position(|w| &w.id == id)
            .ok_or_else(|| CanvasError::WidgetNotFound(id.clone()))
    }

    /// Append a widget on top of the stack and make it active
    pub fn add_widget(&mut self, widget: Widget) -> WidgetId {
        let id = widget.id.clone();
        self.widgets.push(widget);
        self.active_id = Some(id.clone());
        id
    }

    /// Remove a widget; clears the active id if it pointed at it
    pub fn remove_widget(&mut self, id: &WidgetId) -> Result<Widget> {
        let index = self.index_of(id)?;
        if self.active_id.as_ref() == Some(id) {
            self.active_id = None;
        }
        Ok(self.widgets.remove(index))
    }

    /// Replace the widget with the same id, keeping its stacking position
    pub fn replace_widget(&mut self, widget: Widget) -> Result<()> {
        let index = self.index_of(&widget.id)?;
        self.widgets[index] = widget;
        Ok(())
    }

    /// Apply a transformation to one widget in place
    pub fn update_widget<F>(&mut self, id: &WidgetId, f: F) -> Result<&Widget>
    where
        F: FnOnce(&Widget) -> Result<Widget>,
    {
        let index = self.index_of(id)?;
        let mut next = f(&self.widgets[index])?;
        // the id is the document key; transformations may not change it
        next.id = id.clone();
        self.widgets[index] = next;
        Ok(&self.widgets[index])
    }

    /// Merge-patch one property of a widget
    pub fn update_widget_property(
        &mut self,
        id: &WidgetId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<&Widget> {
        self.update_widget(id, |w| w.with_property(key, value))
    }

    pub fn active_id(&self) -> Option<&WidgetId> {
        self.active_id.as_ref()
    }

    pub fn active_widget(&self) -> Option<&Widget> {
        self.active_id.as_ref().and_then(|id| self.get(id))
    }

    /// Select a widget for editing, or clear the selection with `None`
    pub fn set_active(&mut self, id: Option<WidgetId>) -> Result<()> {
        if let Some(ref id) = id {
            self.index_of(id)?;
        }
        self.active_id = id;
        Ok(())
    }

    /// Move a widget to the top of the stack
    pub fn bring_to_front(&mut self, id: &WidgetId) -> Result<()> {
        let index = self.index_of(id)?;
        let widget = self.widgets.remove(index);
        self.widgets.push(widget);
        Ok(())
    }

    /// Move a widget to the bottom of the stack
    pub fn send_to_back(&mut self, id: &WidgetId) -> Result<()> {
        let index = self.index_of(id)?;
        let widget = self.widgets.remove(index);
        self.widgets.insert(0, widget);
        Ok(())
    }

    /// Re-center every data table on the page.
    ///
    /// Must run whenever the effective page size changes.
    pub fn recenter_data_tables(&mut self, page: PageSize) {
        for widget in self
            .widgets
            .iter_mut()
            .filter(|w| w.kind == WidgetKind::DataTable)
        {
            *widget = widget.centered_on(page);
        }
    }

    /// Align a widget to a page edge or center line; the other axis is untouched
    pub fn align_widget(&mut self, id: &WidgetId, alignment: Alignment, page: PageSize) -> Result<&Widget> {
        self.update_widget(id, |w| {
            let mut next = w.clone();
            match alignment {
                Alignment::Left => next.x = 0,
                Alignment::Center => next.x = snap((f64::from(page.width) - f64::from(w.width)) / 2.0),
                Alignment::Right => next.x = snap(f64::from(page.width) - f64::from(w.width)),
                Alignment::Top => next.y = 0,
                Alignment::Middle => next.y = snap((f64::from(page.height) - f64::from(w.height)) / 2.0),
                Alignment::Bottom => next.y = snap(f64::from(page.height) - f64::from(w.height)),
            }
            Ok(next)
        })
    }

    /// Widgets of one kind, in stacking order
    pub fn widgets_of_kind(&self, kind: WidgetKind) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(move |w| w.kind == kind)
    }

    /// Number of widgets per kind, in `WidgetKind::ALL` order, omitting zeros
    pub fn kind_counts(&self) -> Vec<(WidgetKind, usize)> {
        WidgetKind::ALL
            .iter()
            .map(|&kind| (kind, self.widgets_of_kind(kind).count()))
            .filter(|&(_, count)| count > 0)
            .collect()
    }
}
