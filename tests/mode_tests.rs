//! Editor mode tests
//!
//! Tests for:
//! - Frame order: selection commit and timeline push
//! - Timeline reconciliation without echo
//! - Stale identities after an owner is rebuilt
//! - Bool toggling, drag routing and keyframing
//! - Rendering colors and shape counts
//! - Forced select/deselect requests
//! - Host widget location and actor selection lock

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec3, Vec4};
use manipulator_tools::composer::{AxisList, InputDelta};
use manipulator_tools::editor::{
    ClickOutcome, ClickTarget, DrawList, DrawShape, EditorMode, EditorWorld, LiveIndex, ManipulatorMode, ManipulatorRef,
    ModeSettings, Owner, OwnerKey, ViewportCamera,
};
use manipulator_tools::manipulator::{ManipulatorBinding, WireDiamond};
use manipulator_tools::math::Transform;
use manipulator_tools::property::{self, PropertyBag, PropertyHandle, PropertyKind, PropertyPath, PropertyValue};
use manipulator_tools::selection::{BindingId, ClickModifiers, Timeline, TimelineBinding, TrackClass, TrackId};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

fn path(s: &str) -> PropertyPath {
    PropertyPath::parse(s).unwrap()
}

const BASE: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);
const SELECTED: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);

fn pivot_binding() -> ManipulatorBinding {
    let mut binding = ManipulatorBinding::new("Manipulator", "pivot", PropertyKind::Transform).unwrap();
    binding.set_colors(BASE, SELECTED);
    binding
}

fn open_binding() -> ManipulatorBinding {
    let mut binding = ManipulatorBinding::new("Switch", "open", PropertyKind::Bool).unwrap();
    binding.set_colors(BASE, SELECTED);
    binding.set_wire_diamond(0, WireDiamond::default());
    binding
}

fn door_owner() -> Owner {
    let bag = PropertyBag::new()
        .with(
            "pivot",
            PropertyValue::Transform(Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))),
        )
        .with("open", PropertyValue::Bool(false));
    Owner::new("Door", bag)
        .with_transform(Transform::from_translation(Vec3::new(10.0, 0.0, 0.0)))
        .with_manipulator(pivot_binding())
        .with_manipulator(open_binding())
        .with_selected(true)
}

fn lamp_owner() -> Owner {
    let bag = PropertyBag::new().with("pivot", PropertyValue::Transform(Transform::IDENTITY));
    Owner::new("Lamp", bag).with_manipulator(pivot_binding()).with_selected(true)
}

struct Scene {
    world: EditorWorld,
    mode: ManipulatorMode,
    door: OwnerKey,
    lamp: OwnerKey,
}

fn scene() -> Scene {
    init_logger();
    let mut world = EditorWorld::new();
    let door = world.spawn(door_owner());
    let lamp = world.spawn(lamp_owner());
    let mut mode = ManipulatorMode::default();
    mode.enter(&mut world);
    mode.tick(&mut world);
    Scene { world, mode, door, lamp }
}

impl Scene {
    fn click(&mut self, owner: &str, slot: usize, modifiers: ClickModifiers) -> ClickOutcome {
        let key = self.world.find_by_name(owner).unwrap();
        let id = self.world.get(key).unwrap().manipulators[slot].identity(owner);
        self.mode
            .handle_click(&mut self.world, ClickTarget::Manipulator(id), modifiers)
    }

    fn tick(&mut self) {
        self.mode.tick(&mut self.world);
    }

    fn read<T: property::PropertyType>(&self, key: OwnerKey, p: &str) -> T {
        property::read::<T>(&*self.world.get(key).unwrap().properties, &path(p), -1)
    }

    fn selected_owners(&self) -> Vec<String> {
        self.mode
            .selection()
            .current()
            .iter()
            .map(|r| r.owner_label.clone())
            .collect()
    }
}

// ============================================================================
// Fake timeline
// ============================================================================

#[derive(Default)]
struct TimelineState {
    auto_key: bool,
    pushes: usize,
    selected: Vec<TrackId>,
    keys: Vec<(String, String)>,
}

/// Door is binding 1, Lamp binding 2. Each has a transform track on `pivot`
/// (10, 20); Door also has a bool track on `open` (11).
#[derive(Clone, Default)]
struct SharedTimeline(Rc<RefCell<TimelineState>>);

impl Timeline for SharedTimeline {
    fn auto_key_enabled(&self) -> bool {
        self.0.borrow().auto_key
    }

    fn key_property(&mut self, owner: &str, property: &PropertyHandle) {
        self.0
            .borrow_mut()
            .keys
            .push((owner.to_string(), property.path.to_string()));
    }

    fn bindings(&self) -> Vec<TimelineBinding> {
        ["Door", "Lamp"]
            .iter()
            .zip(1..)
            .map(|(name, id)| TimelineBinding {
                id: BindingId(id),
                name: (*name).to_string(),
            })
            .collect()
    }

    fn find_track(&self, class: TrackClass, binding: BindingId, property: &str) -> Option<TrackId> {
        match (class, binding.0, property) {
            (TrackClass::Transform, b, "pivot") => Some(TrackId(b * 10)),
            (TrackClass::Bool, 1, "open") => Some(TrackId(11)),
            _ => None,
        }
    }

    fn track_binding(&self, track: TrackId) -> Option<(BindingId, String)> {
        match track.0 {
            10 => Some((BindingId(1), "pivot".to_string())),
            11 => Some((BindingId(1), "open".to_string())),
            20 => Some((BindingId(2), "pivot".to_string())),
            _ => None,
        }
    }

    fn empty_selection(&mut self) {
        let mut state = self.0.borrow_mut();
        state.pushes += 1;
        state.selected.clear();
    }

    fn select_track(&mut self, track: TrackId) {
        self.0.borrow_mut().selected.push(track);
    }
}

fn attach_timeline(scene: &mut Scene, auto_key: bool) -> SharedTimeline {
    let timeline = SharedTimeline::default();
    timeline.0.borrow_mut().auto_key = auto_key;
    scene.mode.set_timeline(Some(Box::new(timeline.clone())));
    timeline
}

// ============================================================================
// Frame order
// ============================================================================

#[test]
fn click_commits_on_next_tick() {
    let mut s = scene();
    assert_eq!(s.click("Door", 0, ClickModifiers::empty()), ClickOutcome::Handled);
    assert!(s.mode.selection().current().is_empty());

    s.tick();
    assert_eq!(s.selected_owners(), vec!["Door"]);
}

#[test]
fn local_change_is_pushed_to_timeline_once() {
    let mut s = scene();
    let timeline = attach_timeline(&mut s, false);
    s.tick();
    assert_eq!(timeline.0.borrow().pushes, 1);

    s.click("Door", 0, ClickModifiers::empty());
    s.click("Lamp", 0, ClickModifiers::SHIFT);
    s.tick();
    s.tick();

    let state = timeline.0.borrow();
    assert_eq!(state.pushes, 2);
    assert_eq!(state.selected, vec![TrackId(10), TrackId(20)]);
}

#[test]
fn disabled_timeline_sync_never_pushes() {
    init_logger();
    let mut world = EditorWorld::new();
    world.spawn(door_owner());
    let mut mode = ManipulatorMode::new(ModeSettings {
        auto_sync_timeline: false,
        ..Default::default()
    });
    let timeline = SharedTimeline::default();
    mode.set_timeline(Some(Box::new(timeline.clone())));
    mode.enter(&mut world);
    mode.tick(&mut world);

    assert_eq!(timeline.0.borrow().pushes, 0);
}

#[test]
fn timeline_selection_replaces_local_without_echo() {
    let mut s = scene();
    let timeline = attach_timeline(&mut s, false);
    s.click("Door", 0, ClickModifiers::empty());
    s.tick();
    let pushes = timeline.0.borrow().pushes;

    s.mode.on_track_selection_changed(&s.world, &[TrackId(20)]);
    s.tick();

    assert_eq!(s.selected_owners(), vec!["Lamp"]);
    assert_eq!(timeline.0.borrow().pushes, pushes);
}

#[test]
fn timeline_selection_of_unknown_tracks_keeps_local() {
    let mut s = scene();
    attach_timeline(&mut s, false);
    s.click("Door", 0, ClickModifiers::empty());
    s.tick();

    s.mode.on_track_selection_changed(&s.world, &[TrackId(99)]);
    s.tick();
    assert_eq!(s.selected_owners(), vec!["Door"]);
}

#[test]
fn timeline_bool_track_is_not_selected() {
    let mut s = scene();
    attach_timeline(&mut s, false);
    s.mode.on_track_selection_changed(&s.world, &[TrackId(11)]);
    s.tick();
    assert!(s.mode.selection().current().is_empty());
}

// ============================================================================
// Stale identities
// ============================================================================

#[test]
fn rebuilt_owner_is_found_again_after_tick() {
    let mut s = scene();
    s.click("Door", 0, ClickModifiers::empty());
    s.tick();

    // The host rebuilds the object: same name, new arena key.
    s.world.despawn(s.door);
    let door = s.world.spawn(door_owner());

    let delta = InputDelta::translate(Vec3::new(1.0, 0.0, 0.0), AxisList::X);
    assert!(!s.mode.input_delta(&mut s.world, &delta));
    assert_eq!(s.selected_owners(), vec!["Door"]);

    s.tick();
    assert!(s.mode.input_delta(&mut s.world, &delta));
    let pivot: Transform = s.read(door, "pivot");
    assert!(vec3_approx(pivot.translation, Vec3::new(2.0, 2.0, 3.0)));
}

#[test]
fn click_on_despawned_owner_is_unhandled() {
    let mut s = scene();
    let id = s.world.get(s.lamp).unwrap().manipulators[0].identity("Lamp");
    s.world.despawn(s.lamp);

    let outcome = s
        .mode
        .handle_click(&mut s.world, ClickTarget::Manipulator(id), ClickModifiers::empty());
    assert_eq!(outcome, ClickOutcome::Unhandled);
}

#[test]
fn index_caches_identity_per_slot() {
    let s = scene();
    let mut index = LiveIndex::new();
    index.rebuild(&s.world);
    assert_eq!(index.len(), 3);

    let door = s.world.get(s.door).unwrap();
    for (slot, binding) in door.manipulators.iter().enumerate() {
        let at = ManipulatorRef { owner: s.door, slot };
        assert_eq!(index.cached_id(at), Some(binding.identity("Door")));
        assert_eq!(index.id_of(at, door, binding), binding.identity("Door"));
        assert_eq!(index.resolve(&s.world, binding.identity("Door")), Some(at));
    }
}

#[test]
fn renamed_owner_misses_cached_identity() {
    let mut s = scene();
    let mut index = LiveIndex::new();
    index.rebuild(&s.world);
    let old = s.world.get(s.lamp).unwrap().manipulators[0].identity("Lamp");

    s.world.get_mut(s.lamp).unwrap().name = "Lamp2".to_string();
    let lamp = s.world.get(s.lamp).unwrap();
    let at = ManipulatorRef { owner: s.lamp, slot: 0 };

    assert_eq!(index.resolve(&s.world, old), None);
    assert_eq!(index.id_of(at, lamp, &lamp.manipulators[0]), lamp.manipulators[0].identity("Lamp2"));

    index.rebuild(&s.world);
    assert_eq!(index.cached_id(at), Some(lamp.manipulators[0].identity("Lamp2")));
}

#[test]
fn unselected_owners_are_not_indexed() {
    let mut s = scene();
    s.world.get_mut(s.lamp).unwrap().selected = false;
    s.tick();
    assert_eq!(s.click("Lamp", 0, ClickModifiers::empty()), ClickOutcome::Unhandled);
}

// ============================================================================
// Bool toggles and drags
// ============================================================================

#[test]
fn bool_click_toggles_and_keys() {
    let mut s = scene();
    let timeline = attach_timeline(&mut s, true);

    assert_eq!(s.click("Door", 1, ClickModifiers::empty()), ClickOutcome::Handled);
    assert!(s.read::<bool>(s.door, "open"));
    s.click("Door", 1, ClickModifiers::CTRL);
    assert!(!s.read::<bool>(s.door, "open"));

    s.tick();
    assert!(s.mode.selection().current().is_empty());
    assert_eq!(
        timeline.0.borrow().keys,
        vec![("Door".to_string(), "open".to_string()); 2]
    );
}

#[test]
fn bool_toggle_arms_safe_deselect() {
    let mut s = scene();
    assert_eq!(s.mode.selection().deselect_guard(), 0);
    s.click("Door", 1, ClickModifiers::empty());

    assert_eq!(
        s.mode.handle_click(&mut s.world, ClickTarget::Empty, ClickModifiers::empty()),
        ClickOutcome::Absorbed
    );
}

#[test]
fn drag_moves_every_selected_binding() {
    let mut s = scene();
    let timeline = attach_timeline(&mut s, true);
    s.click("Door", 0, ClickModifiers::empty());
    s.click("Lamp", 0, ClickModifiers::SHIFT);
    s.tick();

    let delta = InputDelta::translate(Vec3::new(0.0, 0.0, 5.0), AxisList::Z);
    assert!(s.mode.input_delta(&mut s.world, &delta));

    let door: Transform = s.read(s.door, "pivot");
    let lamp: Transform = s.read(s.lamp, "pivot");
    assert!(vec3_approx(door.translation, Vec3::new(1.0, 2.0, 8.0)));
    assert!(vec3_approx(lamp.translation, Vec3::new(0.0, 0.0, 5.0)));
    assert_eq!(timeline.0.borrow().keys.len(), 2);
}

#[test]
fn drag_without_axis_is_ignored() {
    let mut s = scene();
    s.click("Door", 0, ClickModifiers::empty());
    s.tick();

    let delta = InputDelta::translate(Vec3::new(50.0, 0.0, 0.0), AxisList::empty());
    assert!(!s.mode.input_delta(&mut s.world, &delta));
    let pivot: Transform = s.read(s.door, "pivot");
    assert_eq!(pivot.translation, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn rotation_drag_rotates_property() {
    let mut s = scene();
    s.click("Lamp", 0, ClickModifiers::empty());
    s.tick();

    let rotation = Quat::from_rotation_z(0.5);
    assert!(s.mode.input_delta(&mut s.world, &InputDelta::rotate(rotation, AxisList::Z)));
    let pivot: Transform = s.read(s.lamp, "pivot");
    assert!(pivot.rotation.dot(rotation).abs() > 1.0 - EPSILON);
}

// ============================================================================
// Safe de-select
// ============================================================================

#[test]
fn empty_clicks_absorb_then_clear() {
    let mut s = scene();
    s.click("Door", 0, ClickModifiers::empty());
    s.tick();

    let outcome = s
        .mode
        .handle_click(&mut s.world, ClickTarget::Owner(s.lamp), ClickModifiers::empty());
    assert_eq!(outcome, ClickOutcome::Absorbed);
    s.tick();
    assert_eq!(s.selected_owners(), vec!["Door"]);

    let outcome = s
        .mode
        .handle_click(&mut s.world, ClickTarget::Empty, ClickModifiers::empty());
    assert_eq!(outcome, ClickOutcome::Unhandled);
    s.tick();
    assert!(s.selected_owners().is_empty());
}

#[test]
fn without_safe_deselect_first_click_clears() {
    let mut s = scene();
    s.mode.set_use_safe_deselect(false);
    s.click("Door", 0, ClickModifiers::empty());
    s.tick();

    let outcome = s
        .mode
        .handle_click(&mut s.world, ClickTarget::Empty, ClickModifiers::empty());
    assert_eq!(outcome, ClickOutcome::Unhandled);
    s.tick();
    assert!(s.selected_owners().is_empty());
}

// ============================================================================
// Rendering
// ============================================================================

fn camera() -> ViewportCamera {
    let mut camera = ViewportCamera::new_perspective(60.0, 1.5, 0.1, 10_000.0);
    camera.look_at(Vec3::new(-200.0, 0.0, 50.0), Vec3::ZERO, Vec3::Z);
    camera
}

#[test]
fn render_draws_selected_owners_only() {
    let mut s = scene();
    s.world.get_mut(s.lamp).unwrap().selected = false;

    let mut list = DrawList::new();
    s.mode.render(&s.world, &camera(), &mut list);

    // Door: the pivot's default box and the switch diamond.
    assert_eq!(list.len(), 2);
    assert!(list.commands().iter().all(|c| c.color == BASE));
}

#[test]
fn render_highlights_selection_and_true_bools() {
    let mut s = scene();
    s.click("Door", 0, ClickModifiers::empty());
    s.click("Door", 1, ClickModifiers::empty());
    s.tick();

    let mut list = DrawList::new();
    s.mode.render(&s.world, &camera(), &mut list);

    let pivot = s.world.get(s.door).unwrap().manipulators[0].identity("Door");
    let switch = s.world.get(s.door).unwrap().manipulators[1].identity("Door");
    let lamp = s.world.get(s.lamp).unwrap().manipulators[0].identity("Lamp");

    assert!(list.for_hit(pivot).all(|c| c.color == SELECTED));
    assert!(list.for_hit(switch).all(|c| c.color == SELECTED));
    assert!(list.for_hit(lamp).all(|c| c.color == BASE));
    assert_eq!(list.for_hit(switch).count(), 1);
}

#[test]
fn render_places_box_at_widget_pose() {
    let mut s = scene();
    let mut list = DrawList::new();
    s.mode.render(&s.world, &camera(), &mut list);

    let pivot = s.world.get(s.door).unwrap().manipulators[0].identity("Door");
    let command = list.for_hit(pivot).next().unwrap();
    assert!(matches!(command.shape, DrawShape::WireBox { .. }));
    assert!(vec3_approx(
        command.matrix.transform_point3(Vec3::ZERO),
        Vec3::new(11.0, 2.0, 3.0)
    ));
}

#[test]
fn hidden_bindings_and_owners_are_not_drawn() {
    let mut s = scene();
    s.world.get_mut(s.door).unwrap().manipulators[1].visible = false;
    s.world.get_mut(s.lamp).unwrap().visible = false;

    let mut list = DrawList::new();
    s.mode.render(&s.world, &camera(), &mut list);
    assert_eq!(list.len(), 1);
}

// ============================================================================
// Forced requests
// ============================================================================

#[test]
fn request_select_applies_on_tick() {
    let mut s = scene();
    let timeline = attach_timeline(&mut s, false);
    s.tick();

    s.world.get_mut(s.lamp).unwrap().manipulators[0].request_select = true;
    s.tick();

    assert_eq!(s.selected_owners(), vec!["Lamp"]);
    assert!(!s.world.get(s.lamp).unwrap().manipulators[0].request_select);
    assert_eq!(timeline.0.borrow().pushes, 2);

    s.world.get_mut(s.lamp).unwrap().manipulators[0].request_deselect = true;
    s.tick();
    assert!(s.selected_owners().is_empty());
}

#[test]
fn requests_on_hidden_bindings_wait() {
    let mut s = scene();
    let binding = &mut s.world.get_mut(s.lamp).unwrap().manipulators[0];
    binding.visible = false;
    binding.request_select = true;
    s.tick();

    assert!(s.selected_owners().is_empty());
    assert!(s.world.get(s.lamp).unwrap().manipulators[0].request_select);
}

// ============================================================================
// Host widget and owner selection
// ============================================================================

#[test]
fn widget_follows_last_selected() {
    let mut s = scene();
    assert!(s.mode.widget_location(&s.world).is_none());

    s.click("Lamp", 0, ClickModifiers::empty());
    s.click("Door", 0, ClickModifiers::SHIFT);
    s.tick();

    let location = s.mode.widget_location(&s.world).unwrap();
    assert!(vec3_approx(location, Vec3::new(11.0, 2.0, 3.0)));
    let axes = s.mode.custom_coordinate_system(&s.world).unwrap();
    assert!(vec3_approx(axes.x_axis, Vec3::X));
}

#[test]
fn locked_actor_selection_ignores_host_changes() {
    let mut s = scene();
    s.mode.set_lock_actor_selection(true);
    assert!(!s.mode.select_owner(&mut s.world, s.door, false));
    assert!(s.world.get(s.door).unwrap().selected);

    s.mode.set_lock_actor_selection(false);
    assert!(s.mode.select_owner(&mut s.world, s.door, false));
    assert!(!s.world.get(s.door).unwrap().selected);
}

#[test]
fn exit_clears_selection() {
    let mut s = scene();
    s.click("Door", 0, ClickModifiers::empty());
    s.tick();

    s.mode.exit(&mut s.world);
    assert!(s.mode.selection().current().is_empty());
    assert!(s.mode.widget_location(&s.world).is_none());
}
