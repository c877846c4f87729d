//! Timeline capability and selection synchronization.
//!
//! The host's animation timeline owns tracks bound to named objects. Local
//! selection changes are pushed to the timeline as a track selection, and
//! track selection changes made in the timeline replace the local selection.
//! Only local changes raise the push flag, so a reconciled selection is never
//! echoed back.

use super::SelectionRecord;
use crate::property::PropertyHandle;

/// Opaque track handle issued by the host timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub u64);

/// Opaque object-binding handle issued by the host timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(pub u64);

/// Property track types a manipulator can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackClass {
    Bool,
    Vector,
    Transform,
    Byte,
}

/// Track classes searched, in order, when selecting a property's track.
pub const TRACK_CLASSES: [TrackClass; 4] = [
    TrackClass::Bool,
    TrackClass::Vector,
    TrackClass::Transform,
    TrackClass::Byte,
];

/// An object binding in the focused sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineBinding {
    pub id: BindingId,
    /// Display name, equal to the bound owner's label.
    pub name: String,
}

/// The keyframing and track-selection capability of the host timeline.
pub trait Timeline {
    /// Whether the timeline records keys on property changes.
    fn auto_key_enabled(&self) -> bool;

    /// Records a key for a property that was just written on `owner`.
    fn key_property(&mut self, owner: &str, property: &PropertyHandle);

    /// Object bindings of the focused sequence.
    fn bindings(&self) -> Vec<TimelineBinding>;

    fn find_track(&self, class: TrackClass, binding: BindingId, property: &str) -> Option<TrackId>;

    /// The binding and property path a property track animates.
    fn track_binding(&self, track: TrackId) -> Option<(BindingId, String)>;

    fn empty_selection(&mut self);

    fn select_track(&mut self, track: TrackId);
}

/// Keys `property` if the timeline is in auto-key mode.
pub fn key_if_auto_key(timeline: &mut dyn Timeline, owner: &str, property: &PropertyHandle) {
    if timeline.auto_key_enabled() {
        timeline.key_property(owner, property);
    }
}

/// Replaces the timeline's track selection with the tracks of `records`.
///
/// Returns the number of tracks selected.
pub fn push_selection(timeline: &mut dyn Timeline, records: &[SelectionRecord]) -> usize {
    timeline.empty_selection();

    let bindings = timeline.bindings();
    let mut selected = 0;
    for record in records {
        let property = record.property_path.to_string();
        for binding in bindings.iter().filter(|b| b.name == record.owner_label) {
            for class in TRACK_CLASSES {
                if let Some(track) = timeline.find_track(class, binding.id, &property) {
                    timeline.select_track(track);
                    selected += 1;
                }
            }
        }
    }

    log::debug!("Pushed {} selected manipulators as {selected} timeline tracks", records.len());
    selected
}

/// Resolves tracks to `(owner label, property path)` pairs.
///
/// Tracks that are not bound property tracks are skipped.
#[must_use]
pub fn resolve_tracks(timeline: &dyn Timeline, tracks: &[TrackId]) -> Vec<(String, String)> {
    let bindings = timeline.bindings();
    tracks
        .iter()
        .filter_map(|track| timeline.track_binding(*track))
        .filter_map(|(binding, property)| {
            bindings
                .iter()
                .find(|b| b.id == binding)
                .map(|b| (b.name.clone(), property))
        })
        .collect()
}
