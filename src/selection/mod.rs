//! Manipulator Selection
//!
//! [`SelectionRegistry`] holds the multi-selection of bindings as
//! [`SelectionRecord`] snapshots keyed by [`ManipulatorId`].
//!
//! # Two-phase commit
//!
//! Click handlers and timeline notifications only mutate the `pending` list.
//! The mode copies it to `current` once per frame in
//! [`SelectionRegistry::commit`], so drawing and drag handling never observe a
//! selection mutated mid-iteration.
//!
//! # Safe de-select
//!
//! With safe de-select enabled, every successful select, toggle or drag arms a
//! guard. The next ambiguous click on empty space only disarms it; the one
//! after that clears the selection.

pub mod timeline;

pub use timeline::{BindingId, Timeline, TimelineBinding, TrackClass, TrackId, TRACK_CLASSES};

use bitflags::bitflags;

use crate::manipulator::{ManipulatorBinding, ManipulatorId};
use crate::property::{PropertyKind, PropertyPath};

bitflags! {
    /// Modifier keys held during a viewport click.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ClickModifiers: u8 {
        const CTRL  = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT   = 1 << 2;
    }
}

/// Snapshot of a binding taken when it was selected.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRecord {
    pub id: ManipulatorId,
    /// Owner display label, matched against timeline binding names.
    pub owner_label: String,
    pub binding_name: String,
    pub property_path: PropertyPath,
    pub property_index: i32,
    pub property_kind: PropertyKind,
}

impl SelectionRecord {
    #[must_use]
    pub fn capture(owner_name: &str, owner_label: &str, binding: &ManipulatorBinding) -> Self {
        Self {
            id: binding.identity(owner_name),
            owner_label: owner_label.to_string(),
            binding_name: binding.name.clone(),
            property_path: binding.property_path.clone(),
            property_index: binding.property_index,
            property_kind: binding.property_kind,
        }
    }
}

/// What an empty-space click did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeselectOutcome {
    /// The guard swallowed the click; the selection is unchanged.
    Absorbed,
    /// The selection was cleared.
    Cleared,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionRegistry {
    current: Vec<SelectionRecord>,
    pending: Vec<SelectionRecord>,
    deselect_guard: u32,
    use_safe_deselect: bool,
    /// Edge flag: the timeline should receive the selection once.
    track_sync: bool,
}

impl SelectionRegistry {
    #[must_use]
    pub fn new(use_safe_deselect: bool) -> Self {
        Self {
            use_safe_deselect,
            ..Self::default()
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Selection committed at the last frame boundary.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &[SelectionRecord] {
        &self.current
    }

    /// Selection including changes since the last commit.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &[SelectionRecord] {
        &self.pending
    }

    /// The most recently selected committed record. It drives the widget
    /// location.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&SelectionRecord> {
        self.current.last()
    }

    /// Whether `id` is part of the pending selection.
    #[must_use]
    pub fn is_selected(&self, id: ManipulatorId) -> bool {
        self.pending.iter().any(|r| r.id == id)
    }

    /// Whether `id` was part of the selection at the last commit.
    #[must_use]
    pub fn is_current(&self, id: ManipulatorId) -> bool {
        self.current.iter().any(|r| r.id == id)
    }

    #[inline]
    #[must_use]
    pub fn deselect_guard(&self) -> u32 {
        self.deselect_guard
    }

    #[inline]
    #[must_use]
    pub fn use_safe_deselect(&self) -> bool {
        self.use_safe_deselect
    }

    // ========================================================================
    // Pending mutations
    // ========================================================================

    /// Adds a record. Bool bindings and records already selected are
    /// ignored. Returns whether the selection changed.
    pub fn add(&mut self, record: SelectionRecord) -> bool {
        if record.property_kind == PropertyKind::Bool || self.is_selected(record.id) {
            return false;
        }
        self.pending.push(record);
        true
    }

    /// Removes the record with `id`. Returns whether it was selected.
    pub fn remove(&mut self, id: ManipulatorId) -> bool {
        match self.pending.iter().position(|r| r.id == id) {
            Some(i) => {
                self.pending.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, record: SelectionRecord) {
        if !self.remove(record.id) {
            self.add(record);
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Applies a click on a draggable manipulator: ctrl toggles, shift adds,
    /// a plain click replaces the selection.
    ///
    /// Bool records are ignored entirely; they toggle instead of selecting.
    pub fn click(&mut self, record: SelectionRecord, modifiers: ClickModifiers) {
        if record.property_kind == PropertyKind::Bool {
            return;
        }
        if modifiers.contains(ClickModifiers::CTRL) {
            self.toggle(record);
        } else if modifiers.contains(ClickModifiers::SHIFT) {
            self.add(record);
        } else {
            self.clear();
            self.add(record);
        }
        self.request_track_sync();
        self.arm_guard();
    }

    /// Handles a click that hit no manipulator.
    ///
    /// Shift-clicks always clear. Otherwise an armed guard absorbs the click.
    pub fn deselect_click(&mut self, modifiers: ClickModifiers) -> DeselectOutcome {
        if !modifiers.contains(ClickModifiers::SHIFT) && self.consume_guard() {
            return DeselectOutcome::Absorbed;
        }
        if !self.pending.is_empty() {
            self.clear();
            self.request_track_sync();
        }
        DeselectOutcome::Cleared
    }

    // ========================================================================
    // Frame boundary
    // ========================================================================

    /// Copies `pending` to `current`. Returns whether the committed selection
    /// changed.
    pub fn commit(&mut self) -> bool {
        if self.current == self.pending {
            return false;
        }
        self.current.clone_from(&self.pending);
        true
    }

    // ========================================================================
    // Timeline sync
    // ========================================================================

    /// Marks the selection for one push to the timeline.
    #[inline]
    pub fn request_track_sync(&mut self) {
        self.track_sync = true;
    }

    /// Consumes the sync edge flag.
    #[inline]
    pub fn take_track_sync(&mut self) -> bool {
        std::mem::take(&mut self.track_sync)
    }

    #[inline]
    #[must_use]
    pub fn track_sync_requested(&self) -> bool {
        self.track_sync
    }

    // ========================================================================
    // Safe de-select
    // ========================================================================

    /// Arms the guard after a successful select, toggle or drag.
    pub fn arm_guard(&mut self) {
        self.deselect_guard = u32::from(self.use_safe_deselect);
    }

    /// Spends one armed guard count. Returns `true` if the event was
    /// absorbed.
    pub fn consume_guard(&mut self) -> bool {
        if !self.use_safe_deselect {
            self.deselect_guard = 0;
            return false;
        }
        if self.deselect_guard == 0 {
            return false;
        }
        self.deselect_guard -= 1;
        true
    }

    /// Enables or disables safe de-select and re-arms the guard.
    pub fn set_use_safe_deselect(&mut self, enabled: bool) {
        self.use_safe_deselect = enabled;
        self.arm_guard();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str, path: &str, kind: PropertyKind) -> SelectionRecord {
        let binding = ManipulatorBinding::new("Manipulator", path, kind).unwrap();
        SelectionRecord::capture(owner, owner, &binding)
    }

    #[test]
    fn commit_reports_changes_once() {
        let mut registry = SelectionRegistry::new(true);
        registry.add(record("Door", "pivot", PropertyKind::Transform));
        assert!(registry.current().is_empty());
        assert!(registry.commit());
        assert!(!registry.commit());
        assert_eq!(registry.current().len(), 1);
    }

    #[test]
    fn track_sync_is_edge_triggered() {
        let mut registry = SelectionRegistry::new(false);
        registry.click(record("Door", "pivot", PropertyKind::Transform), ClickModifiers::empty());
        assert!(registry.take_track_sync());
        assert!(!registry.take_track_sync());
    }
}
