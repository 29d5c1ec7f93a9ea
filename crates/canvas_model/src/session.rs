//! Editing session
//!
//! Owns the document being edited, the measured size of the canvas container
//! and the state of an in-flight drag. A drag is `begin` (snapshot the widget
//! and pointer), any number of `update`s (each computed from the snapshot, so
//! intermediate states never accumulate rounding drift) and `end`.

use crate::{
    CanvasDocument, CanvasError, PageConfig, PageSize, ResizeDirection, Result, Widget, WidgetId,
    WidgetKind,
};
use serde::{Deserialize, Serialize};

/// Pointer position in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Angle of this point around `center`, in radians
    pub fn angle_from(&self, center: Point) -> f64 {
        (self.y - center.y).atan2(self.x - center.x)
    }
}

/// What a drag does to its widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragKind {
    Move,
    Resize(ResizeDirection),
    /// Rotate around the given center
    Rotate { center: Point },
}

#[derive(Debug, Clone)]
struct DragState {
    kind: DragKind,
    origin: Point,
    snapshot: Widget,
}

/// An editing session over one canvas document
#[derive(Debug, Clone)]
pub struct EditorSession {
    document: CanvasDocument,
    container: PageSize,
    drag: Option<DragState>,
    last_loaded: Option<String>,
}

impl EditorSession {
    pub fn new(document: CanvasDocument, container: PageSize) -> Self {
        let mut session = Self {
            document,
            container,
            drag: None,
            last_loaded: None,
        };
        session.recenter();
        session
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut CanvasDocument {
        &mut self.document
    }

    pub fn into_document(self) -> CanvasDocument {
        self.document
    }

    pub fn container_size(&self) -> PageSize {
        self.container
    }

    /// Page size after resolving `auto` against the container
    pub fn effective_page_size(&self) -> PageSize {
        self.document.effective_page_size(self.container)
    }

    /// Record a new measured container size and re-center data tables
    pub fn set_container_size(&mut self, size: PageSize) {
        if size != self.container {
            self.container = size;
            self.recenter();
        }
    }

    /// Switch the page configuration and re-center data tables
    pub fn set_page_config(&mut self, page: PageConfig) {
        self.document.set_page(page);
        self.recenter();
    }

    /// Replace the whole document, e.g. after loading a stored layout
    pub fn replace_document(&mut self, document: CanvasDocument) {
        tracing::debug!(widgets = document.len(), "replacing canvas document");
        self.document = document;
        self.drag = None;
        self.recenter();
    }

    /// Keep the raw text of the most recently loaded layout
    pub fn remember_loaded(&mut self, raw: impl Into<String>) {
        self.last_loaded = Some(raw.into());
    }

    pub fn last_loaded(&self) -> Option<&str> {
        self.last_loaded.as_deref()
    }

    /// Drop a new widget at a position. Unknown type names are ignored.
    pub fn drop_widget(&mut self, type_name: &str, x: f64, y: f64) -> Option<WidgetId> {
        let kind = type_name.parse::<WidgetKind>().ok()?;
        Some(self.add_widget(kind, x, y))
    }

    /// Create and append a widget of a known kind
    pub fn add_widget(&mut self, kind: WidgetKind, x: f64, y: f64) -> WidgetId {
        let widget = Widget::create(kind, x, y, self.effective_page_size());
        self.document.add_widget(widget)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Start a drag on a widget; it becomes the active widget
    pub fn begin_drag(&mut self, id: &WidgetId, kind: DragKind, pointer: Point) -> Result<()> {
        let snapshot = self
            .document
            .get(id)
            .cloned()
            .ok_or_else(|| CanvasError::WidgetNotFound(id.clone()))?;
        self.document.set_active(Some(id.clone()))?;
        tracing::debug!(widget = %id, ?kind, "drag started");
        self.drag = Some(DragState {
            kind,
            origin: pointer,
            snapshot,
        });
        Ok(())
    }

    /// Recompute the dragged widget from the snapshot and the current pointer
    pub fn update_drag(&mut self, pointer: Point) -> Result<&Widget> {
        let drag = self.drag.as_ref().ok_or(CanvasError::NoActiveDrag)?;
        let dx = pointer.x - drag.origin.x;
        let dy = pointer.y - drag.origin.y;
        let next = match drag.kind {
            DragKind::Move => drag.snapshot.moved(dx, dy, self.effective_page_size()),
            DragKind::Resize(direction) => drag.snapshot.resized(direction, dx, dy),
            DragKind::Rotate { center } => drag
                .snapshot
                .rotated(drag.origin.angle_from(center), pointer.angle_from(center)),
        };
        let id = next.id.clone();
        self.document.replace_widget(next)?;
        self.document
            .get(&id)
            .ok_or(CanvasError::WidgetNotFound(id))
    }

    /// Finish the drag; returns the id of the widget that was dragged
    pub fn end_drag(&mut self) -> Option<WidgetId> {
        let drag = self.drag.take()?;
        tracing::debug!(widget = %drag.snapshot.id, "drag ended");
        Some(drag.snapshot.id)
    }

    fn recenter(&mut self) {
        let page = self.effective_page_size();
        self.document.recenter_data_tables(page);
    }
}
