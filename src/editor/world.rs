//! Owner arena and the identity index.
//!
//! Owners live in a [`SlotMap`]. Removing an owner and adding it again (the
//! host rebuilding an object) yields a new key, so keys are never kept across
//! frames. Bindings are found again through their [`ManipulatorId`] via the
//! [`LiveIndex`], which the mode rebuilds every tick.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::manipulator::{ManipulatorBinding, ManipulatorId};
use crate::math::Transform;
use crate::property::PropertyAccess;

new_key_type! {
    pub struct OwnerKey;
}

/// An editable object carrying manipulator bindings.
pub struct Owner {
    /// Unique object name, part of every binding identity.
    pub name: String,
    /// Display label, matched against timeline binding names.
    pub label: String,
    pub transform: Transform,
    /// Selected in the host's outliner. Only selected owners show widgets.
    pub selected: bool,
    pub visible: bool,
    /// Attachment sockets in owner space.
    pub sockets: FxHashMap<String, Transform>,
    /// The object whose properties the bindings edit.
    pub properties: Box<dyn PropertyAccess>,
    pub manipulators: Vec<ManipulatorBinding>,
}

impl Owner {
    pub fn new(name: impl Into<String>, properties: impl PropertyAccess + 'static) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            transform: Transform::IDENTITY,
            selected: false,
            visible: true,
            sockets: FxHashMap::default(),
            properties: Box::new(properties),
            manipulators: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_socket(mut self, name: impl Into<String>, transform: Transform) -> Self {
        self.sockets.insert(name.into(), transform);
        self
    }

    #[must_use]
    pub fn with_manipulator(mut self, binding: ManipulatorBinding) -> Self {
        self.manipulators.push(binding);
        self
    }

    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Socket a binding attaches to, if it names one this owner has.
    #[must_use]
    pub fn attach_socket(&self, binding: &ManipulatorBinding) -> Option<&Transform> {
        binding
            .draw
            .extras
            .attach_socket
            .as_deref()
            .and_then(|name| self.sockets.get(name))
    }
}

/// Flat arena of owners.
#[derive(Default)]
pub struct EditorWorld {
    owners: SlotMap<OwnerKey, Owner>,
}

impl EditorWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, owner: Owner) -> OwnerKey {
        self.owners.insert(owner)
    }

    pub fn despawn(&mut self, key: OwnerKey) -> Option<Owner> {
        self.owners.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: OwnerKey) -> Option<&Owner> {
        self.owners.get(key)
    }

    pub fn get_mut(&mut self, key: OwnerKey) -> Option<&mut Owner> {
        self.owners.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OwnerKey, &Owner)> {
        self.owners.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (OwnerKey, &mut Owner)> {
        self.owners.iter_mut()
    }

    /// Owners selected in the host, in arena order.
    pub fn selected(&self) -> impl Iterator<Item = (OwnerKey, &Owner)> {
        self.owners.iter().filter(|(_, owner)| owner.selected)
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<OwnerKey> {
        self.owners
            .iter()
            .find_map(|(key, owner)| (owner.name == name).then_some(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Resolves a live reference to its owner and binding.
    #[must_use]
    pub fn binding(&self, at: ManipulatorRef) -> Option<(&Owner, &ManipulatorBinding)> {
        let owner = self.owners.get(at.owner)?;
        owner.manipulators.get(at.slot).map(|binding| (owner, binding))
    }
}

/// Where a binding currently lives. Valid for the current frame only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManipulatorRef {
    pub owner: OwnerKey,
    pub slot: usize,
}

/// Identity key to live binding lookup over the selected owners.
///
/// Also caches each slot's identity so per-frame passes do not re-derive it.
#[derive(Debug, Default)]
pub struct LiveIndex {
    map: FxHashMap<ManipulatorId, ManipulatorRef>,
    ids: FxHashMap<ManipulatorRef, ManipulatorId>,
    scratch: String,
}

impl LiveIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-scans the selected owners. The first binding wins when two share an
    /// identity.
    pub fn rebuild(&mut self, world: &EditorWorld) {
        self.map.clear();
        self.ids.clear();
        for (key, owner) in world.selected() {
            for (slot, binding) in owner.manipulators.iter().enumerate() {
                let id = binding.identity_in(&owner.name, &mut self.scratch);
                let at = ManipulatorRef { owner: key, slot };
                self.ids.insert(at, id);
                if self.map.contains_key(&id) {
                    log::warn!("Duplicate manipulator identity '{id}', ignoring slot {slot}");
                    continue;
                }
                self.map.insert(id, at);
            }
        }
    }

    /// Looks up a binding. Identities whose owner is gone, or whose slot no
    /// longer carries the same identity, resolve to `None`.
    #[must_use]
    pub fn resolve(&self, world: &EditorWorld, id: ManipulatorId) -> Option<ManipulatorRef> {
        let at = *self.map.get(&id)?;
        let (owner, binding) = world.binding(at)?;
        binding.has_identity(&owner.name, id).then_some(at)
    }

    /// Identity cached for the slot at `at` by the last rebuild.
    #[must_use]
    pub fn cached_id(&self, at: ManipulatorRef) -> Option<ManipulatorId> {
        self.ids.get(&at).copied()
    }

    /// Identity of `binding` living at `at`. Uses the cached key while it
    /// still matches and derives a fresh one otherwise.
    #[must_use]
    pub fn id_of(&self, at: ManipulatorRef, owner: &Owner, binding: &ManipulatorBinding) -> ManipulatorId {
        match self.cached_id(at) {
            Some(id) if binding.has_identity(&owner.name, id) => id,
            _ => binding.identity(&owner.name),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
