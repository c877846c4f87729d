use glam::{Mat3, Vec3};
use smallvec::SmallVec;

use super::camera::ViewportCamera;
use super::render::{draw_binding, PrimitiveDrawer};
use super::settings::ModeSettings;
use super::world::{EditorWorld, LiveIndex, ManipulatorRef, Owner, OwnerKey};
use crate::composer::{self, apply_delta, widget_pose, zoom_size_multiplier, InputDelta, WidgetPose};
use crate::manipulator::{ManipulatorBinding, ManipulatorId};
use crate::property::{self, PropertyKind};
use crate::selection::timeline::{key_if_auto_key, push_selection, resolve_tracks};
use crate::selection::{ClickModifiers, DeselectOutcome, SelectionRecord, SelectionRegistry, Timeline, TrackId};

/// What a viewport click hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// A manipulator hit region.
    Manipulator(ManipulatorId),
    /// An owner's geometry outside any manipulator.
    Owner(OwnerKey),
    Empty,
}

/// Result of [`EditorMode::handle_click`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The mode acted on the click.
    Handled,
    /// The click was swallowed by the safe de-select guard.
    Absorbed,
    /// The host should process the click itself.
    Unhandled,
}

/// A viewport editing mode driven by the host's mode manager.
///
/// The host calls [`tick`](Self::tick) once per frame before
/// [`render`](Self::render), and forwards clicks and widget drags as they
/// arrive.
pub trait EditorMode {
    /// Called when the mode becomes active.
    #[allow(unused_variables)]
    fn enter(&mut self, world: &mut EditorWorld) {}

    /// Called when the mode is deactivated.
    #[allow(unused_variables)]
    fn exit(&mut self, world: &mut EditorWorld) {}

    /// Frame boundary. Applies deferred state changes.
    fn tick(&mut self, world: &mut EditorWorld);

    /// Draws the mode's primitives.
    fn render(&mut self, world: &EditorWorld, camera: &ViewportCamera, drawer: &mut dyn PrimitiveDrawer);

    /// Handles a viewport click.
    ///
    /// # Arguments
    ///
    /// * `world` - The editable objects
    /// * `target` - What the click hit
    /// * `modifiers` - Modifier keys held during the click
    fn handle_click(&mut self, world: &mut EditorWorld, target: ClickTarget, modifiers: ClickModifiers) -> ClickOutcome;

    /// Handles one drag event of the host transform widget.
    ///
    /// # Returns
    ///
    /// `true` if the mode consumed the delta.
    fn input_delta(&mut self, world: &mut EditorWorld, delta: &InputDelta) -> bool;
}

/// The manipulator editing mode.
pub struct ManipulatorMode {
    settings: ModeSettings,
    selection: SelectionRegistry,
    index: LiveIndex,
    timeline: Option<Box<dyn Timeline>>,
}

impl ManipulatorMode {
    #[must_use]
    pub fn new(settings: ModeSettings) -> Self {
        Self {
            selection: SelectionRegistry::new(settings.use_safe_deselect),
            settings,
            index: LiveIndex::new(),
            timeline: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ModeSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> &SelectionRegistry {
        &self.selection
    }

    // ========================================================================
    // Toolkit settings
    // ========================================================================

    pub fn set_use_safe_deselect(&mut self, enabled: bool) {
        self.settings.use_safe_deselect = enabled;
        self.selection.set_use_safe_deselect(enabled);
    }

    pub fn set_lock_actor_selection(&mut self, locked: bool) {
        self.settings.lock_actor_selection = locked;
    }

    #[inline]
    #[must_use]
    pub fn is_actor_selection_locked(&self) -> bool {
        self.settings.lock_actor_selection
    }

    /// Host owner selection change. Ignored while the selection is locked.
    ///
    /// Returns whether the change was applied.
    pub fn select_owner(&mut self, world: &mut EditorWorld, key: OwnerKey, selected: bool) -> bool {
        if self.settings.lock_actor_selection {
            return false;
        }
        match world.get_mut(key) {
            Some(owner) => {
                owner.selected = selected;
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Timeline
    // ========================================================================

    /// Attaches the focused timeline. The selection is pushed to it on the
    /// next tick.
    pub fn set_timeline(&mut self, timeline: Option<Box<dyn Timeline>>) {
        self.timeline = timeline;
        self.selection.request_track_sync();
    }

    /// Replaces the local selection with the manipulators matching the
    /// tracks selected in the timeline.
    pub fn on_track_selection_changed(&mut self, world: &EditorWorld, tracks: &[TrackId]) {
        let Some(timeline) = self.timeline.as_deref() else {
            return;
        };

        for (i, (label, property)) in resolve_tracks(timeline, tracks).into_iter().enumerate() {
            if i == 0 {
                self.selection.clear();
            }
            let found = world
                .selected()
                .filter(|(_, owner)| owner.label == label)
                .find_map(|(_, owner)| {
                    owner
                        .manipulators
                        .iter()
                        .find(|b| b.property_path.to_string() == property)
                        .map(|b| SelectionRecord::capture(&owner.name, &owner.label, b))
                });
            if let Some(record) = found {
                self.selection.add(record);
            }
        }
    }

    // ========================================================================
    // Host transform widget
    // ========================================================================

    /// World position of the last selected manipulator.
    #[must_use]
    pub fn widget_location(&self, world: &EditorWorld) -> Option<Vec3> {
        self.last_pose(world).map(|(_, pose)| pose.pose.translation)
    }

    /// Orientation the host widget should draw its axes in.
    #[must_use]
    pub fn custom_coordinate_system(&self, world: &EditorWorld) -> Option<Mat3> {
        let (binding, pose) = self.last_pose(world)?;
        let drawable = !binding.property_path.is_empty() && binding.property_kind.is_draggable();
        drawable.then(|| Mat3::from_quat(pose.pose.rotation))
    }

    fn last_pose<'w>(&self, world: &'w EditorWorld) -> Option<(&'w ManipulatorBinding, WidgetPose)> {
        let record = self.selection.last()?;
        let at = self.index.resolve(world, record.id)?;
        let (owner, binding) = world.binding(at)?;
        Some((binding, pose_of(owner, binding)))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn apply_forced_requests(&mut self, world: &mut EditorWorld) {
        for (_, owner) in world.iter_mut().filter(|(_, o)| o.selected && o.visible) {
            let Owner {
                name,
                label,
                manipulators,
                ..
            } = owner;
            for binding in manipulators.iter_mut().filter(|b| b.visible) {
                if binding.request_deselect {
                    binding.request_deselect = false;
                    self.selection.remove(binding.identity(name));
                    self.selection.request_track_sync();
                }
                if binding.request_select {
                    binding.request_select = false;
                    self.selection.add(SelectionRecord::capture(name, label, binding));
                    self.selection.request_track_sync();
                }
            }
        }
    }

    fn sync_timeline(&mut self) {
        if !self.settings.auto_sync_timeline {
            return;
        }
        let Some(timeline) = self.timeline.as_deref_mut() else {
            return;
        };
        if self.selection.take_track_sync() {
            push_selection(timeline, self.selection.current());
        }
    }

    fn toggle_bool(&mut self, world: &mut EditorWorld, at: ManipulatorRef) {
        let Some(owner) = world.get_mut(at.owner) else {
            return;
        };
        let Owner {
            label,
            properties,
            manipulators,
            ..
        } = owner;
        let Some(binding) = manipulators.get(at.slot) else {
            return;
        };

        let path = &binding.property_path;
        let index = binding.property_index;
        let value = property::read::<bool>(&**properties, path, index);
        match property::write(&mut **properties, path, index, !value) {
            Ok(handle) => {
                if let Some(timeline) = self.timeline.as_deref_mut() {
                    key_if_auto_key(timeline, label, &handle);
                }
            }
            Err(err) => log::warn!("Manipulator '{}' toggle failed: {err}", binding.name),
        }
        self.selection.arm_guard();
    }
}

impl Default for ManipulatorMode {
    fn default() -> Self {
        Self::new(ModeSettings::default())
    }
}

fn pose_of(owner: &Owner, binding: &ManipulatorBinding) -> WidgetPose {
    widget_pose(
        binding,
        &*owner.properties,
        &owner.transform,
        owner.attach_socket(binding),
    )
}

impl EditorMode for ManipulatorMode {
    fn enter(&mut self, world: &mut EditorWorld) {
        self.index.rebuild(world);
        self.selection.request_track_sync();
    }

    fn exit(&mut self, world: &mut EditorWorld) {
        self.selection.clear();
        self.selection.commit();
        self.index.rebuild(world);
    }

    fn tick(&mut self, world: &mut EditorWorld) {
        self.index.rebuild(world);
        self.apply_forced_requests(world);
        if self.selection.commit() {
            log::debug!("Manipulator selection: {} item(s)", self.selection.current().len());
        }
        self.sync_timeline();
    }

    fn render(&mut self, world: &EditorWorld, camera: &ViewportCamera, drawer: &mut dyn PrimitiveDrawer) {
        for (key, owner) in world.selected().filter(|(_, o)| o.visible) {
            for (slot, binding) in owner.manipulators.iter().enumerate().filter(|(_, b)| b.visible) {
                let id = self.index.id_of(ManipulatorRef { owner: key, slot }, owner, binding);
                let pose = pose_of(owner, binding);

                let highlighted = self.selection.is_current(id)
                    || composer::bool_value(binding, &*owner.properties);
                let zoom = if binding.draw.extras.use_zoom_offset {
                    zoom_size_multiplier(camera, &pose.pose, self.settings.zoom_reference)
                } else {
                    1.0
                };

                draw_binding(drawer, binding, id, &pose.pose, binding.color(highlighted), zoom);
            }
        }
    }

    fn handle_click(&mut self, world: &mut EditorWorld, target: ClickTarget, modifiers: ClickModifiers) -> ClickOutcome {
        match target {
            ClickTarget::Manipulator(id) => {
                let Some(at) = self.index.resolve(world, id) else {
                    return ClickOutcome::Unhandled;
                };
                let Some((owner, binding)) = world.binding(at) else {
                    return ClickOutcome::Unhandled;
                };

                if binding.property_kind == PropertyKind::Bool {
                    self.toggle_bool(world, at);
                } else {
                    let record = SelectionRecord::capture(&owner.name, &owner.label, binding);
                    self.selection.click(record, modifiers);
                }
                ClickOutcome::Handled
            }
            ClickTarget::Owner(_) | ClickTarget::Empty => match self.selection.deselect_click(modifiers) {
                DeselectOutcome::Absorbed => ClickOutcome::Absorbed,
                DeselectOutcome::Cleared => ClickOutcome::Unhandled,
            },
        }
    }

    fn input_delta(&mut self, world: &mut EditorWorld, delta: &InputDelta) -> bool {
        if delta.axis.is_empty() {
            return false;
        }

        let ids: SmallVec<[ManipulatorId; 8]> = self.selection.current().iter().map(|r| r.id).collect();
        let mut applied = false;

        for id in ids {
            let Some(at) = self.index.resolve(world, id) else {
                continue;
            };
            let Some(owner) = world.get_mut(at.owner) else {
                continue;
            };
            let Owner {
                label,
                transform,
                sockets,
                properties,
                manipulators,
                ..
            } = owner;
            let Some(binding) = manipulators.get(at.slot) else {
                continue;
            };
            if binding.property_path.is_empty() {
                continue;
            }

            let socket = binding
                .draw
                .extras
                .attach_socket
                .as_deref()
                .and_then(|name| sockets.get(name));
            let pose = widget_pose(binding, &**properties, transform, socket);

            match apply_delta(binding, &mut **properties, &pose, delta) {
                Ok(Some(handle)) => {
                    if let Some(timeline) = self.timeline.as_deref_mut() {
                        key_if_auto_key(timeline, label, &handle);
                    }
                    applied = true;
                }
                Ok(None) => {}
                Err(err) => log::warn!("Manipulator '{}' rejected drag: {err}", binding.name),
            }
        }

        if applied {
            self.selection.arm_guard();
        }
        applied
    }
}
