// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor registration: declare "this node, when interacted with, shows this text".
//!
//! ## Overview
//!
//! [`Anchors`] is an arena of [`AnchorBinding`]s addressed by generational [`AnchorId`]s.
//! Registering a binding attaches the listeners the device class calls for and registers
//! the anchor's scroll container with the controller's
//! [`ScrollRegistry`](crate::scroll::ScrollRegistry). Tearing it down undoes both and
//! hides the tooltip if the anchor owned it.
//!
//! | Device | Listeners on the anchor | Shows on | Hides on |
//! |---|---|---|---|
//! | [`Pointer`](DeviceClass::Pointer) | `PointerEnter`, `PointerLeave` | enter | leave, if still the owner |
//! | [`Touch`](DeviceClass::Touch) | `Click` | tap, unless already the owner | next tap outside the anchor's subtree |
//!
//! On touch devices the outside tap is caught by a single capturing, once-only document
//! listener, armed for the current owner. A tap inside the owner's subtree re-arms it.
//!
//! ## Dispatch
//!
//! When one of the attached listeners fires, the host calls [`Anchors::handle_event`]
//! with the listener's target and the triggering event.
//!
//! ## Declarative use
//!
//! [`TooltipRef`] owns an `(element, text, show)` triple and keeps exactly one binding in
//! sync with it.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::controller::Controller;
use crate::error::TooltipError;
use crate::geometry::{DeviceClass, is_within, scroll_parent};
use crate::host::{EventSource, Host};
use crate::overlay::Overlay;
use crate::types::{EventKind, EventTarget, InputEvent, ListenOptions, ScrollContainer};

/// Identifier for a registered anchor.
///
/// Generational like a slot-map key: once the binding is unregistered the id is stale
/// forever, even if its slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct AnchorId(u32, u32);

impl AnchorId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Listener set attached to a live anchor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ListenerSet {
    /// `PointerEnter` + `PointerLeave`.
    Hover,
    /// `Click`.
    Tap,
}

impl ListenerSet {
    /// The set a device class calls for.
    pub fn for_device(device: DeviceClass) -> Self {
        match device {
            DeviceClass::Pointer => Self::Hover,
            DeviceClass::Touch => Self::Tap,
        }
    }

    /// Event kinds in this set.
    pub fn kinds(self) -> &'static [EventKind] {
        match self {
            Self::Hover => &[EventKind::PointerEnter, EventKind::PointerLeave],
            Self::Tap => &[EventKind::Click],
        }
    }
}

/// One registered anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorBinding<K> {
    node: K,
    text: String,
    show: bool,
    listeners: Option<ListenerSet>,
    scroll_parent: Option<K>,
    serial: u64,
}

impl<K: Copy> AnchorBinding<K> {
    /// The anchor node.
    pub fn node(&self) -> K {
        self.node
    }

    /// The label shown for this anchor.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the binding was registered with `show = true`.
    pub fn show(&self) -> bool {
        self.show
    }

    /// Attached listener set; `None` for an inert (`show = false`) binding.
    pub fn listeners(&self) -> Option<ListenerSet> {
        self.listeners
    }

    /// Scroll container registered on behalf of this anchor.
    pub fn scroll_parent(&self) -> Option<K> {
        self.scroll_parent
    }

    /// Returns true if listeners are attached.
    pub fn is_live(&self) -> bool {
        self.listeners.is_some()
    }
}

const OUTSIDE_TAP: ListenOptions = ListenOptions::CAPTURE.union(ListenOptions::ONCE);

/// Arena of anchor bindings.
#[derive(Clone, Debug)]
pub struct Anchors<K> {
    bindings: Vec<Option<AnchorBinding<K>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    outside_tap: Option<K>,
    next_serial: u64,
}

impl<K> Default for Anchors<K> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            outside_tap: None,
            next_serial: 0,
        }
    }
}

impl<K: Copy + Eq + Debug> Anchors<K> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` to show `text`.
    ///
    /// With `show = false` the binding is inert: no listeners, no scroll registration.
    /// It can be brought to life later with [`Anchors::update`].
    pub fn register<O: Overlay, H: Host<K>>(
        &mut self,
        ctl: &mut Controller<K, O>,
        host: &mut H,
        node: K,
        text: impl Into<String>,
        show: bool,
    ) -> AnchorId {
        let binding = self.attach(ctl, host, node, text.into(), show);
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generations[idx] = self.generations[idx].saturating_add(1);
            self.bindings[idx] = Some(binding);
            idx
        } else {
            self.bindings.push(Some(binding));
            self.generations.push(1);
            self.bindings.len() - 1
        };
        let id = self.id_at(idx);
        tracing::debug!(?id, ?node, show, "anchor registered");
        id
    }

    /// Re-register `id` with a new node, text, or visibility.
    ///
    /// The previous binding is fully torn down first. Returns false for a stale id.
    pub fn update<O: Overlay, H: Host<K>>(
        &mut self,
        ctl: &mut Controller<K, O>,
        host: &mut H,
        id: AnchorId,
        node: K,
        text: impl Into<String>,
        show: bool,
    ) -> bool {
        let Some(old) = self.take(id) else {
            return false;
        };
        self.detach(ctl, host, &old);
        let binding = self.attach(ctl, host, node, text.into(), show);
        self.bindings[id.idx()] = Some(binding);
        tracing::debug!(?id, ?node, show, "anchor updated");
        true
    }

    /// Tear down `id`. Stale ids are ignored; returns the removed binding otherwise.
    pub fn unregister<O: Overlay, H: Host<K>>(
        &mut self,
        ctl: &mut Controller<K, O>,
        host: &mut H,
        id: AnchorId,
    ) -> Option<AnchorBinding<K>> {
        let old = self.take(id)?;
        self.detach(ctl, host, &old);
        self.free_list.push(id.idx());
        tracing::debug!(?id, node = ?old.node, "anchor unregistered");
        Some(old)
    }

    /// Tear down every binding.
    pub fn clear<O: Overlay, H: Host<K>>(&mut self, ctl: &mut Controller<K, O>, host: &mut H) {
        let ids: Vec<AnchorId> = (0..self.bindings.len())
            .filter(|&i| self.bindings[i].is_some())
            .map(|i| self.id_at(i))
            .collect();
        for id in ids {
            self.unregister(ctl, host, id);
        }
    }

    /// Returns true if `id` refers to a registered binding.
    pub fn is_alive(&self, id: AnchorId) -> bool {
        self.get(id).is_some()
    }

    /// The binding for `id`, if registered.
    pub fn get(&self, id: AnchorId) -> Option<&AnchorBinding<K>> {
        if self.generations.get(id.idx()) != Some(&id.1) {
            return None;
        }
        self.bindings.get(id.idx())?.as_ref()
    }

    /// Number of registered bindings, inert ones included.
    pub fn len(&self) -> usize {
        self.bindings.iter().filter(|b| b.is_some()).count()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Anchor node the outside-tap listener is currently armed for.
    pub fn outside_tap_owner(&self) -> Option<K> {
        self.outside_tap
    }

    /// Handle a fired listener.
    ///
    /// `target` is where the listener is attached; `event` is what triggered it.
    pub fn handle_event<O: Overlay, H: Host<K>>(
        &mut self,
        ctl: &mut Controller<K, O>,
        host: &mut H,
        target: EventTarget<K>,
        event: &InputEvent<K>,
    ) -> Result<(), TooltipError> {
        match (target, *event) {
            (EventTarget::Node(n), InputEvent::PointerEnter(_)) => {
                if let Some(b) = self.live_binding(n, ListenerSet::Hover) {
                    ctl.activate(&*host, n, b.text())?;
                }
                Ok(())
            }
            (EventTarget::Node(n), InputEvent::PointerLeave(_)) => {
                if self.live_binding(n, ListenerSet::Hover).is_some() {
                    ctl.deactivate_if_owner(n);
                }
                Ok(())
            }
            (EventTarget::Node(n), InputEvent::Click(_)) => self.on_tap(ctl, host, n),
            (EventTarget::Document, InputEvent::Click(origin)) => {
                self.on_outside_tap(ctl, host, origin);
                Ok(())
            }
            (_, InputEvent::Scroll(_)) => ctl.on_scroll(&*host),
            _ => Ok(()),
        }
    }

    fn on_tap<O: Overlay, H: Host<K>>(
        &mut self,
        ctl: &mut Controller<K, O>,
        host: &mut H,
        node: K,
    ) -> Result<(), TooltipError> {
        let Some(b) = self.live_binding(node, ListenerSet::Tap) else {
            return Ok(());
        };
        if ctl.active_anchor() == Some(node) {
            return Ok(());
        }
        ctl.activate(&*host, node, b.text())?;
        self.arm_outside_tap(host, node);
        Ok(())
    }

    fn on_outside_tap<O: Overlay, H: Host<K>>(
        &mut self,
        ctl: &mut Controller<K, O>,
        host: &mut H,
        origin: K,
    ) {
        // The host dropped the once-only listener as it fired.
        let Some(owner) = self.outside_tap.take() else {
            return;
        };
        if ctl.active_anchor() != Some(owner) {
            return;
        }
        if is_within(origin, owner, &*host) {
            self.arm_outside_tap(host, owner);
        } else {
            ctl.deactivate_if_owner(owner);
        }
    }

    fn arm_outside_tap(&mut self, events: &mut impl EventSource<K>, owner: K) {
        if self.outside_tap.replace(owner).is_none() {
            events.listen(EventTarget::Document, EventKind::Click, OUTSIDE_TAP);
        }
    }

    fn disarm_outside_tap(&mut self, events: &mut impl EventSource<K>) {
        if self.outside_tap.take().is_some() {
            events.unlisten(EventTarget::Document, EventKind::Click, OUTSIDE_TAP);
        }
    }

    fn attach<O: Overlay, H: Host<K>>(
        &mut self,
        ctl: &mut Controller<K, O>,
        host: &mut H,
        node: K,
        text: String,
        show: bool,
    ) -> AnchorBinding<K> {
        let serial = self.next_serial;
        self.next_serial += 1;
        if !show {
            return AnchorBinding {
                node,
                text,
                show,
                listeners: None,
                scroll_parent: None,
                serial,
            };
        }
        let set = ListenerSet::for_device(ctl.device());
        // Listeners on a node are shared by every live binding on it.
        if self.live_binding(node, set).is_none() {
            for &kind in set.kinds() {
                host.listen(EventTarget::Node(node), kind, ListenOptions::empty());
            }
        }
        let parent = scroll_parent(node, &*host);
        if let Some(p) = parent {
            ctl.scroll_registry_mut()
                .register(ScrollContainer::Node(p), host);
        }
        AnchorBinding {
            node,
            text,
            show,
            listeners: Some(set),
            scroll_parent: parent,
            serial,
        }
    }

    /// `binding` must already be out of the arena.
    fn detach<O: Overlay, H: Host<K>>(
        &mut self,
        ctl: &mut Controller<K, O>,
        host: &mut H,
        binding: &AnchorBinding<K>,
    ) {
        let Some(set) = binding.listeners else {
            return;
        };
        let node = binding.node;
        if self.live_binding(node, set).is_none() {
            for &kind in set.kinds() {
                host.unlisten(EventTarget::Node(node), kind, ListenOptions::empty());
            }
        }
        if let Some(p) = binding.scroll_parent {
            ctl.scroll_registry_mut()
                .unregister(ScrollContainer::Node(p), host);
        }
        if self.outside_tap == Some(node) {
            self.disarm_outside_tap(host);
        }
        ctl.deactivate_if_owner(node);
    }

    fn take(&mut self, id: AnchorId) -> Option<AnchorBinding<K>> {
        if self.generations.get(id.idx()) != Some(&id.1) {
            return None;
        }
        self.bindings.get_mut(id.idx())?.take()
    }

    /// A live binding on `node` with listener set `set`.
    ///
    /// When several bindings share a node, the most recently attached one wins.
    fn live_binding(&self, node: K, set: ListenerSet) -> Option<&AnchorBinding<K>> {
        self.bindings
            .iter()
            .flatten()
            .filter(|b| b.is_live() && b.node == node && b.listeners == Some(set))
            .max_by_key(|b| b.serial)
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "AnchorId uses 32-bit indices by design."
    )]
    fn id_at(&self, idx: usize) -> AnchorId {
        AnchorId(idx as u32, self.generations[idx])
    }
}

/// Declarative tooltip binding for an externally owned element reference.
///
/// Holds the `(element, text, show)` triple and keeps one binding registered while the
/// element is present and `show` is true. Any change tears the old binding down first.
#[derive(Clone, Debug)]
pub struct TooltipRef<K> {
    element: Option<K>,
    text: String,
    show: bool,
    binding: Option<AnchorId>,
}

impl<K: Copy + Eq + Debug> TooltipRef<K> {
    /// Create a detached reference.
    pub fn new(text: impl Into<String>, show: bool) -> Self {
        Self {
            element: None,
            text: text.into(),
            show,
            binding: None,
        }
    }

    /// The element currently referenced.
    pub fn current(&self) -> Option<K> {
        self.element
    }

    /// The binding currently registered for the element.
    pub fn binding(&self) -> Option<AnchorId> {
        self.binding
    }

    /// Current label.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Point the reference at `element` (or at nothing), keeping text and visibility.
    pub fn set_element<O: Overlay, H: Host<K>>(
        &mut self,
        anchors: &mut Anchors<K>,
        ctl: &mut Controller<K, O>,
        host: &mut H,
        element: Option<K>,
    ) {
        let text = self.text.clone();
        self.sync(anchors, ctl, host, element, &text, self.show);
    }

    /// Bring the binding in line with `(element, text, show)`.
    ///
    /// Does nothing if none of them changed.
    pub fn sync<O: Overlay, H: Host<K>>(
        &mut self,
        anchors: &mut Anchors<K>,
        ctl: &mut Controller<K, O>,
        host: &mut H,
        element: Option<K>,
        text: &str,
        show: bool,
    ) {
        if self.element == element && self.text == text && self.show == show {
            return;
        }
        if let Some(id) = self.binding.take() {
            anchors.unregister(ctl, host, id);
        }
        self.element = element;
        self.text.clear();
        self.text.push_str(text);
        self.show = show;
        if let (Some(node), true) = (element, show) {
            self.binding = Some(anchors.register(ctl, host, node, text, show));
        }
    }

    /// Tear down the binding and forget the element.
    pub fn release<O: Overlay, H: Host<K>>(
        &mut self,
        anchors: &mut Anchors<K>,
        ctl: &mut Controller<K, O>,
        host: &mut H,
    ) {
        if let Some(id) = self.binding.take() {
            anchors.unregister(ctl, host, id);
        }
        self.element = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{OverlayConfig, OverlayModel};
    use crate::position::Placement;
    use crate::scene::{NodeId, Scene};
    use kurbo::{Rect, Size, Vec2};

    const VIEW: Size = Size::new(800.0, 600.0);

    struct Fixture {
        scene: Scene,
        ctl: Controller<NodeId, OverlayModel>,
        anchors: Anchors<NodeId>,
        root: NodeId,
    }

    impl Fixture {
        fn new(device: DeviceClass) -> Self {
            let mut scene = Scene::new(VIEW);
            let root = scene.insert(None, Rect::new(0.0, 0.0, 800.0, 600.0));
            let mut ctl = Controller::new(device);
            ctl.bind(&mut scene, OverlayModel::new(OverlayConfig::default()))
                .unwrap();
            Self {
                scene,
                ctl,
                anchors: Anchors::new(),
                root,
            }
        }

        fn node(&mut self, rect: Rect) -> NodeId {
            self.scene.insert(Some(self.root), rect)
        }

        fn register(&mut self, node: NodeId, text: &str, show: bool) -> AnchorId {
            self.anchors
                .register(&mut self.ctl, &mut self.scene, node, text, show)
        }

        fn unregister(&mut self, id: AnchorId) -> Option<AnchorBinding<NodeId>> {
            self.anchors.unregister(&mut self.ctl, &mut self.scene, id)
        }

        fn send(&mut self, event: InputEvent<NodeId>) {
            self.scene
                .dispatch(&mut self.anchors, &mut self.ctl, event)
                .unwrap();
        }

        fn overlay(&self) -> &OverlayModel {
            self.ctl.overlay().unwrap()
        }
    }

    const A: Rect = Rect::new(350.0, 280.0, 450.0, 320.0);
    const B: Rect = Rect::new(100.0, 100.0, 160.0, 130.0);

    #[test]
    fn hover_shows_text_above_and_leave_hides() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let a = f.node(A);
        f.register(a, "Hello", true);
        assert!(f.scene.listeners().has(EventTarget::Node(a), EventKind::PointerEnter));
        assert!(f.scene.listeners().has(EventTarget::Node(a), EventKind::PointerLeave));
        assert!(!f.scene.listeners().has(EventTarget::Node(a), EventKind::Click));

        f.send(InputEvent::PointerEnter(a));
        assert_eq!(f.overlay().text(), "Hello");
        assert_eq!(f.overlay().placement(), Placement::above(A, VIEW));
        assert_eq!(f.ctl.active_anchor(), Some(a));

        f.send(InputEvent::PointerLeave(a));
        assert!(!f.ctl.is_visible());
        assert!(!f.overlay().is_visible());
    }

    #[test]
    fn stale_leave_after_transfer_is_ignored() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let a = f.node(A);
        let b = f.node(B);
        f.register(a, "a", true);
        f.register(b, "b", true);

        f.send(InputEvent::PointerEnter(a));
        f.send(InputEvent::PointerEnter(b));
        f.send(InputEvent::PointerLeave(a));
        assert_eq!(f.ctl.active_anchor(), Some(b));
        assert_eq!(f.overlay().text(), "b");
        assert!(f.overlay().is_visible());

        f.send(InputEvent::PointerLeave(b));
        assert!(!f.overlay().is_visible());
    }

    #[test]
    fn anchor_near_top_flips_below_after_layout() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let a = f.node(Rect::new(350.0, 5.0, 450.0, 35.0));
        f.register(a, "top", true);
        f.send(InputEvent::PointerEnter(a));
        let r = f.scene.settle(&mut f.ctl, Size::new(80.0, 30.0)).unwrap();
        assert!(matches!(r.placement, Some(Placement::Below { .. })));
        assert!(matches!(f.overlay().placement(), Placement::Below { .. }));
        // Settled: a second pass has nothing to do.
        assert!(f.scene.settle(&mut f.ctl, Size::new(80.0, 30.0)).unwrap().is_empty());
    }

    #[test]
    fn touch_tap_shows_and_outside_tap_hides() {
        let mut f = Fixture::new(DeviceClass::Touch);
        let a = f.node(A);
        let elsewhere = f.node(B);
        f.register(a, "Hello", true);
        assert!(f.scene.listeners().has(EventTarget::Node(a), EventKind::Click));
        assert!(!f.scene.listeners().has(EventTarget::Node(a), EventKind::PointerEnter));

        f.send(InputEvent::Click(a));
        assert!(f.overlay().is_visible());
        assert_eq!(f.anchors.outside_tap_owner(), Some(a));
        assert!(f.scene.listeners().has(EventTarget::Document, EventKind::Click));

        // A second tap on the owner keeps it open.
        f.send(InputEvent::Click(a));
        assert!(f.overlay().is_visible());
        assert_eq!(f.ctl.active_anchor(), Some(a));
        assert_eq!(f.anchors.outside_tap_owner(), Some(a));

        f.send(InputEvent::Click(elsewhere));
        assert!(!f.overlay().is_visible());
        assert_eq!(f.anchors.outside_tap_owner(), None);
        assert!(!f.scene.listeners().has(EventTarget::Document, EventKind::Click));

        f.send(InputEvent::Click(a));
        assert!(f.overlay().is_visible());
    }

    #[test]
    fn tap_inside_owner_subtree_rearms() {
        let mut f = Fixture::new(DeviceClass::Touch);
        let a = f.node(A);
        let icon = f.scene.insert(Some(a), Rect::new(360.0, 290.0, 370.0, 300.0));
        f.register(a, "Hello", true);

        f.send(InputEvent::Click(a));
        f.send(InputEvent::Click(icon));
        assert!(f.overlay().is_visible());
        assert_eq!(f.anchors.outside_tap_owner(), Some(a));
        assert_eq!(f.scene.listeners().count(EventKind::Click), 2);

        f.send(InputEvent::Click(f.root));
        assert!(!f.overlay().is_visible());
    }

    #[test]
    fn tap_on_other_anchor_transfers() {
        let mut f = Fixture::new(DeviceClass::Touch);
        let a = f.node(A);
        let b = f.node(B);
        f.register(a, "a", true);
        f.register(b, "b", true);

        f.send(InputEvent::Click(a));
        f.send(InputEvent::Click(b));
        assert_eq!(f.ctl.active_anchor(), Some(b));
        assert_eq!(f.overlay().text(), "b");
        assert_eq!(f.anchors.outside_tap_owner(), Some(b));
    }

    #[test]
    fn shared_scroll_container_is_refcounted() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let pane = f
            .scene
            .insert_scroll_container(Some(f.root), Rect::new(0.0, 100.0, 400.0, 500.0));
        let a = f.scene.insert(Some(pane), Rect::new(10.0, 150.0, 60.0, 180.0));
        let b = f.scene.insert(Some(pane), Rect::new(10.0, 200.0, 60.0, 230.0));
        let ia = f.register(a, "a", true);
        let ib = f.register(b, "b", true);

        let pane_scroll = ScrollContainer::Node(pane);
        assert_eq!(f.ctl.scroll_registry().count(pane_scroll), 2);
        assert_eq!(f.ctl.scroll_registry().count(ScrollContainer::Viewport), 1);
        assert!(f.scene.listeners().has(EventTarget::Node(pane), EventKind::Scroll));

        f.unregister(ia);
        assert_eq!(f.ctl.scroll_registry().count(pane_scroll), 1);
        assert!(f.scene.listeners().has(EventTarget::Node(pane), EventKind::Scroll));

        f.unregister(ib);
        assert!(!f.ctl.scroll_registry().contains(pane_scroll));
        assert!(!f.scene.listeners().has(EventTarget::Node(pane), EventKind::Scroll));
        assert!(f.scene.listeners().has(EventTarget::Window, EventKind::Scroll));
    }

    #[test]
    fn scrolling_container_repositions_active_tooltip() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let pane = f
            .scene
            .insert_scroll_container(Some(f.root), Rect::new(0.0, 100.0, 400.0, 500.0));
        let a = f.scene.insert(Some(pane), Rect::new(10.0, 250.0, 60.0, 280.0));
        f.register(a, "a", true);
        f.send(InputEvent::PointerEnter(a));
        f.scene.settle(&mut f.ctl, Size::new(40.0, 20.0)).unwrap();

        let ev = f.scene.scroll_by(ScrollContainer::Node(pane), Vec2::new(0.0, 50.0));
        f.send(ev);
        let moved = Rect::new(10.0, 200.0, 60.0, 230.0);
        assert_eq!(f.overlay().base_placement(), Placement::above(moved, VIEW));
        assert!(f.ctl.needs_layout());

        let ev = f.scene.scroll_by(ScrollContainer::Viewport, Vec2::new(0.0, 20.0));
        f.send(ev);
        let moved = Rect::new(10.0, 180.0, 60.0, 210.0);
        assert_eq!(f.overlay().base_placement(), Placement::above(moved, VIEW));
    }

    #[test]
    fn resize_and_relayout_refresh_active_tooltip() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let a = f.node(A);
        f.register(a, "a", true);
        f.send(InputEvent::PointerEnter(a));
        f.scene.settle(&mut f.ctl, Size::new(40.0, 20.0)).unwrap();
        assert!(!f.ctl.needs_layout());

        let small = Size::new(400.0, 300.0);
        let ev = f.scene.set_viewport(small);
        f.send(ev);
        assert_eq!(f.overlay().base_placement(), Placement::above(A, small));
        assert!(f.ctl.needs_layout());

        // A relayout of the anchor is picked up by the next refresh.
        let moved = Rect::new(100.0, 200.0, 180.0, 230.0);
        f.scene.set_rect(a, moved);
        let ev = f.scene.set_viewport(small);
        f.send(ev);
        assert_eq!(f.overlay().base_placement(), Placement::above(moved, small));
    }

    #[test]
    fn stale_ids_are_ignored() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let a = f.node(A);
        let id = f.register(a, "a", true);
        assert!(f.unregister(id).is_some());
        assert!(f.unregister(id).is_none());
        assert!(!f.anchors.is_alive(id));
        assert!(!f.anchors.update(&mut f.ctl, &mut f.scene, id, a, "x", true));

        let reused = f.register(a, "again", true);
        assert_ne!(reused, id);
        assert!(f.anchors.get(id).is_none());
        assert_eq!(f.anchors.get(reused).unwrap().text(), "again");
        assert_eq!(f.anchors.len(), 1);
    }

    #[test]
    fn inert_binding_attaches_nothing_until_updated() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let a = f.node(A);
        let id = f.register(a, "quiet", false);
        let b = f.anchors.get(id).unwrap();
        assert!(!b.is_live());
        assert!(!b.show());
        assert!(!f.scene.listeners().has(EventTarget::Node(a), EventKind::PointerEnter));

        f.send(InputEvent::PointerEnter(a));
        assert!(!f.ctl.is_visible());

        assert!(f.anchors.update(&mut f.ctl, &mut f.scene, id, a, "loud", true));
        assert_eq!(f.anchors.get(id).unwrap().listeners(), Some(ListenerSet::Hover));
        f.send(InputEvent::PointerEnter(a));
        assert_eq!(f.overlay().text(), "loud");
    }

    #[test]
    fn latest_binding_on_a_node_wins_after_slot_reuse() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let a = f.node(A);
        let b = f.node(B);
        let x = f.register(b, "x", true);
        f.register(a, "old", true);
        f.unregister(x);
        // Lands in the freed, lower slot.
        let newer = f.register(a, "new", true);
        assert_eq!(newer.idx(), x.idx());
        f.send(InputEvent::PointerEnter(a));
        assert_eq!(f.overlay().text(), "new");
    }

    struct Rng(u64);

    impl Rng {
        fn next(&mut self) -> u64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            x
        }

        fn below(&mut self, n: usize) -> usize {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Only used to pick small indices."
            )]
            let i = (self.next() % n as u64) as usize;
            i
        }
    }

    #[test]
    fn scroll_listeners_track_live_scroll_parents() {
        let mut f = Fixture::new(DeviceClass::Touch);
        let outer = f
            .scene
            .insert_scroll_container(Some(f.root), Rect::new(0.0, 0.0, 400.0, 600.0));
        let inner = f
            .scene
            .insert_scroll_container(Some(outer), Rect::new(0.0, 100.0, 400.0, 400.0));
        let mut leaves = Vec::new();
        for i in 0..4 {
            let y0 = 20.0 + f64::from(i) * 40.0;
            let in_outer = Rect::new(10.0, y0, 60.0, y0 + 30.0);
            let in_inner = Rect::new(100.0, y0 + 100.0, 160.0, y0 + 130.0);
            leaves.push(f.scene.insert(Some(outer), in_outer));
            leaves.push(f.scene.insert(Some(inner), in_inner));
            leaves.push(f.node(Rect::new(500.0, y0, 560.0, y0 + 30.0)));
        }

        let mut rng = Rng(0x5C01_1AB1_E5EE_D123);
        let mut live: Vec<AnchorId> = Vec::new();
        for step in 0..2000 {
            match rng.below(3) {
                0 => {
                    let node = leaves[rng.below(leaves.len())];
                    let show = rng.below(4) != 0;
                    live.push(f.register(node, "tip", show));
                }
                1 if !live.is_empty() => {
                    let id = live.swap_remove(rng.below(live.len()));
                    assert!(f.unregister(id).is_some(), "live id at step {step}");
                }
                _ => {
                    let node = leaves[rng.below(leaves.len())];
                    f.send(InputEvent::Click(node));
                }
            }

            let mut parents: Vec<NodeId> = Vec::new();
            for id in &live {
                let parent = f.anchors.get(*id).and_then(|b| b.scroll_parent());
                if let Some(p) = parent
                    && !parents.contains(&p)
                {
                    parents.push(p);
                }
            }
            assert_eq!(
                f.scene.listeners().count(EventKind::Scroll),
                parents.len() + 1,
                "step {step}"
            );
            assert_eq!(
                f.ctl.scroll_registry().len(),
                parents.len() + 1,
                "step {step}"
            );
        }
    }

    #[test]
    fn bindings_on_one_node_share_listeners() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let a = f.node(A);
        let first = f.register(a, "first", true);
        f.register(a, "second", true);
        assert_eq!(f.scene.listeners().count(EventKind::PointerEnter), 1);

        f.unregister(first);
        assert!(f.scene.listeners().has(EventTarget::Node(a), EventKind::PointerEnter));
        f.send(InputEvent::PointerEnter(a));
        assert_eq!(f.overlay().text(), "second");
    }

    #[test]
    fn tearing_down_owner_hides_tooltip() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let a = f.node(A);
        let id = f.register(a, "bye", true);
        f.send(InputEvent::PointerEnter(a));
        f.unregister(id);
        assert!(!f.ctl.is_visible());
        assert!(!f.overlay().is_visible());
        assert!(!f.scene.listeners().has(EventTarget::Node(a), EventKind::PointerEnter));
    }

    #[test]
    fn update_moves_binding_to_new_node() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let a = f.node(A);
        let b = f.node(B);
        let id = f.register(a, "a", true);
        f.send(InputEvent::PointerEnter(a));
        assert!(f.anchors.update(&mut f.ctl, &mut f.scene, id, b, "b", true));
        assert!(!f.ctl.is_visible(), "old owner torn down");
        assert!(!f.scene.listeners().has(EventTarget::Node(a), EventKind::PointerEnter));
        f.send(InputEvent::PointerEnter(b));
        assert_eq!(f.overlay().text(), "b");
    }

    #[test]
    fn clear_tears_down_everything() {
        let mut f = Fixture::new(DeviceClass::Touch);
        let a = f.node(A);
        let b = f.node(B);
        f.register(a, "a", true);
        f.register(b, "b", true);
        f.send(InputEvent::Click(a));
        f.anchors.clear(&mut f.ctl, &mut f.scene);
        assert!(f.anchors.is_empty());
        assert_eq!(f.anchors.outside_tap_owner(), None);
        assert_eq!(f.scene.listeners().count(EventKind::Click), 0);
        assert!(!f.ctl.is_visible());
    }

    #[test]
    fn tooltip_ref_follows_element_text_and_show() {
        let mut f = Fixture::new(DeviceClass::Pointer);
        let a = f.node(A);
        let b = f.node(B);
        let mut r = TooltipRef::new("Hi", true);
        assert_eq!(r.binding(), None);

        r.set_element(&mut f.anchors, &mut f.ctl, &mut f.scene, Some(a));
        let first = r.binding().unwrap();
        assert_eq!(f.anchors.get(first).unwrap().node(), a);

        // Unchanged inputs keep the binding.
        r.sync(&mut f.anchors, &mut f.ctl, &mut f.scene, Some(a), "Hi", true);
        assert_eq!(r.binding(), Some(first));

        r.sync(&mut f.anchors, &mut f.ctl, &mut f.scene, Some(a), "Hey", true);
        let second = r.binding().unwrap();
        assert!(!f.anchors.is_alive(first));
        assert_eq!(f.anchors.get(second).unwrap().text(), "Hey");
        assert_eq!(r.text(), "Hey");

        r.sync(&mut f.anchors, &mut f.ctl, &mut f.scene, Some(b), "Hey", false);
        assert_eq!(r.binding(), None);
        assert_eq!(r.current(), Some(b));
        assert!(f.anchors.is_empty());
        assert_eq!(f.scene.listeners().count(EventKind::PointerEnter), 0);

        r.sync(&mut f.anchors, &mut f.ctl, &mut f.scene, Some(b), "Hey", true);
        assert_eq!(f.anchors.len(), 1);
        r.release(&mut f.anchors, &mut f.ctl, &mut f.scene);
        assert_eq!(r.current(), None);
        assert!(f.anchors.is_empty());
    }
}
