//! Stored layouts
//!
//! The backend keeps each report template's layout as serialized canvas text
//! plus ownership metadata. [`LayoutRepository`] is the seam to that storage;
//! [`FileLayoutRepository`] keeps the same records as JSON files for local use.

use crate::{deserialize, serialize, LoadedCanvas, Result, SerializeOptions, StoreError};
use canvas_model::CanvasDocument;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A layout record as exchanged with the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLayout {
    pub template_id: String,
    pub name: String,
    pub user_id: String,
    pub branch_id: String,
    pub active: bool,
    /// Serialized canvas text; may arrive quote-wrapped
    pub layout: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredLayout {
    pub fn new(
        template_id: impl Into<String>,
        name: impl Into<String>,
        user_id: impl Into<String>,
        branch_id: impl Into<String>,
        layout: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            template_id: template_id.into(),
            name: name.into(),
            user_id: user_id.into(),
            branch_id: branch_id.into(),
            active: true,
            layout: layout.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Serialize a document into a new record
    pub fn from_document(
        template_id: impl Into<String>,
        name: impl Into<String>,
        user_id: impl Into<String>,
        branch_id: impl Into<String>,
        document: &CanvasDocument,
    ) -> Result<Self> {
        let layout = serialize(document, &SerializeOptions::for_document(document).with_pretty(false))?;
        Ok(Self::new(template_id, name, user_id, branch_id, layout))
    }

    /// Parse the stored canvas text
    pub fn canvas(&self) -> Result<LoadedCanvas> {
        deserialize(&self.layout)
    }

    /// Replace the layout text and bump the modification time
    pub fn set_layout(&mut self, layout: impl Into<String>) {
        self.layout = layout.into();
        self.updated_at = Utc::now();
    }
}

/// Storage of layout records keyed by template id
pub trait LayoutRepository {
    fn load(&self, template_id: &str) -> Result<StoredLayout>;

    /// Insert or replace; the creation time of an existing record is kept
    fn store(&mut self, layout: StoredLayout) -> Result<()>;

    /// Template ids with a stored layout
    fn list(&self) -> Result<Vec<String>>;
}

/// Layout records as `<template id>.json` files in a directory
pub struct FileLayoutRepository {
    root: PathBuf,
}

impl FileLayoutRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, template_id: &str) -> Result<PathBuf> {
        let valid = !template_id.is_empty()
            && template_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidFormat(format!(
                "Invalid template id: {:?}",
                template_id
            )));
        }
        Ok(self.root.join(format!("{}.json", template_id)))
    }
}

impl LayoutRepository for FileLayoutRepository {
    fn load(&self, template_id: &str) -> Result<StoredLayout> {
        let path = self.path_for(template_id)?;
        if !path.exists() {
            return Err(StoreError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn store(&mut self, mut layout: StoredLayout) -> Result<()> {
        let path = self.path_for(&layout.template_id)?;
        if path.exists() {
            match self.load(&layout.template_id) {
                Ok(existing) => layout.created_at = existing.created_at,
                Err(e) => tracing::warn!("Replacing unreadable layout record: {}", e),
            }
        }
        std::fs::create_dir_all(&self.root)?;
        let content = serde_json::to_string_pretty(&layout)?;
        std::fs::write(&path, content)?;
        tracing::debug!(template = %layout.template_id, "stored layout");
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
