// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`Host`](crate::host::Host): a small node tree with viewport
//! rectangles, scroll containers, and a [`ListenerTable`].
//!
//! Useful for tests, demos, and headless integrations that keep their own layout.
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_tooltip::anchor::Anchors;
//! use understory_tooltip::controller::Controller;
//! use understory_tooltip::geometry::DeviceClass;
//! use understory_tooltip::overlay::{OverlayConfig, OverlayModel};
//! use understory_tooltip::scene::Scene;
//! use understory_tooltip::types::InputEvent;
//!
//! let mut scene = Scene::new(Size::new(800.0, 600.0));
//! let root = scene.insert(None, Rect::new(0.0, 0.0, 800.0, 600.0));
//! let button = scene.insert(Some(root), Rect::new(350.0, 280.0, 450.0, 320.0));
//!
//! let mut ctl = Controller::new(DeviceClass::Pointer);
//! ctl.bind(&mut scene, OverlayModel::new(OverlayConfig::default())).unwrap();
//! let mut anchors = Anchors::new();
//! anchors.register(&mut ctl, &mut scene, button, "Hello", true);
//!
//! scene.dispatch(&mut anchors, &mut ctl, InputEvent::PointerEnter(button)).unwrap();
//! scene.settle(&mut ctl, Size::new(80.0, 30.0)).unwrap();
//! assert_eq!(ctl.overlay().unwrap().text(), "Hello");
//! ```

use alloc::vec::Vec;
use kurbo::{Rect, Size, Vec2};

use crate::anchor::Anchors;
use crate::controller::Controller;
use crate::error::TooltipError;
use crate::host::{EventSource, Geometry, ScrollLookup};
use crate::listeners::ListenerTable;
use crate::overlay::{Overlay, OverlayModel};
use crate::position::PlacementResult;
use crate::types::{
    EventKind, EventTarget, InputEvent, ListenOptions, ParentLookup, ScrollContainer,
};

/// Identifier for a node in a [`Scene`].
///
/// Generational: a removed node's id never aliases a node inserted later in the same slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct SceneNode {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
    scrolls: bool,
}

/// In-memory host.
pub struct Scene {
    nodes: Vec<Option<SceneNode>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    viewport: Size,
    listeners: ListenerTable<NodeId>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_alive", &alive)
            .field("viewport", &self.viewport)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Create an empty scene with the given viewport size.
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            viewport,
            listeners: ListenerTable::new(),
        }
    }

    /// Insert a node with viewport rectangle `rect` under `parent` (or as a root).
    pub fn insert(&mut self, parent: Option<NodeId>, rect: Rect) -> NodeId {
        let node = |generation| SceneNode {
            generation,
            parent: None,
            children: Vec::new(),
            rect,
            scrolls: false,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            (idx, generation)
        } else {
            self.nodes.push(Some(node(1)));
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId(idx as u32, generation);
        if let Some(p) = parent.filter(|p| self.is_alive(*p)) {
            self.node_mut(p).children.push(id);
            self.node_mut(id).parent = Some(p);
        }
        id
    }

    /// Insert a scroll container.
    pub fn insert_scroll_container(&mut self, parent: Option<NodeId>, rect: Rect) -> NodeId {
        let id = self.insert(parent, rect);
        self.node_mut(id).scrolls = true;
        id
    }

    /// Remove a node and its subtree, along with every listener attached to them.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.listeners.remove_target(EventTarget::Node(id));
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Move a node. Its descendants stay where they are.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if self.is_alive(id) {
            self.node_mut(id).rect = rect;
        }
    }

    /// Resize the viewport and return the event to dispatch.
    ///
    /// A resize refreshes the active placement the same way a viewport scroll does.
    pub fn set_viewport(&mut self, viewport: Size) -> InputEvent<NodeId> {
        self.viewport = viewport;
        InputEvent::Scroll(ScrollContainer::Viewport)
    }

    /// Scroll `container` by `delta` and return the event to dispatch.
    ///
    /// Content moves by `-delta`: for a node, its descendants; for the viewport, every node.
    pub fn scroll_by(
        &mut self,
        container: ScrollContainer<NodeId>,
        delta: Vec2,
    ) -> InputEvent<NodeId> {
        let moved: Vec<NodeId> = match container {
            ScrollContainer::Viewport => self.live_ids().collect(),
            ScrollContainer::Node(c) if self.is_alive(c) => self.descendants(c),
            ScrollContainer::Node(_) => Vec::new(),
        };
        for id in moved {
            let n = self.node_mut(id);
            n.rect = n.rect - delta;
        }
        InputEvent::Scroll(container)
    }

    /// Attached listeners.
    pub fn listeners(&self) -> &ListenerTable<NodeId> {
        &self.listeners
    }

    /// Deliver `event` to every listener it fires, in firing order.
    pub fn dispatch<O: Overlay>(
        &mut self,
        anchors: &mut Anchors<NodeId>,
        ctl: &mut Controller<NodeId, O>,
        event: InputEvent<NodeId>,
    ) -> Result<(), TooltipError> {
        let mut table = core::mem::take(&mut self.listeners);
        let fired = table.route(&event, &*self);
        self.listeners = table;
        for l in fired {
            anchors.handle_event(ctl, self, l.target, &event)?;
        }
        Ok(())
    }

    /// Lay out a pending placement with a text box of `text_box` and run the correction pass.
    ///
    /// Returns an empty result when nothing was pending.
    pub fn settle(
        &self,
        ctl: &mut Controller<NodeId, OverlayModel>,
        text_box: Size,
    ) -> Result<PlacementResult, TooltipError> {
        if !ctl.needs_layout() {
            return Ok(PlacementResult::default());
        }
        let layout = ctl
            .overlay()
            .and_then(|o| o.layout(self.viewport, text_box));
        match layout {
            Some(layout) => ctl.after_layout(self, layout.text),
            None => Ok(PlacementResult::default()),
        }
    }

    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = self.node(id).children.clone();
        while let Some(n) = stack.pop() {
            stack.extend_from_slice(&self.node(n).children);
            out.push(n);
        }
        out
    }

    fn live_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, n)| {
            let n = n.as_ref()?;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            let idx = i as u32;
            Some(NodeId(idx, n.generation))
        })
    }

    /// Panics if `id` is stale.
    fn node(&self, id: NodeId) -> &SceneNode {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }
}

impl ParentLookup<NodeId> for Scene {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        if !self.is_alive(*node) {
            return None;
        }
        self.node(*node).parent
    }
}

impl ScrollLookup<NodeId> for Scene {
    fn is_scroll_container(&self, node: &NodeId) -> bool {
        self.is_alive(*node) && self.node(*node).scrolls
    }
}

impl Geometry<NodeId> for Scene {
    fn rect_of(&self, node: &NodeId) -> Option<Rect> {
        self.is_alive(*node).then(|| self.node(*node).rect)
    }

    fn viewport(&self) -> Size {
        self.viewport
    }
}

impl EventSource<NodeId> for Scene {
    fn listen(&mut self, target: EventTarget<NodeId>, kind: EventKind, options: ListenOptions) {
        if let EventTarget::Node(n) = target
            && !self.is_alive(n)
        {
            return;
        }
        self.listeners.listen(target, kind, options);
    }

    fn unlisten(&mut self, target: EventTarget<NodeId>, kind: EventKind, options: ListenOptions) {
        self.listeners.unlisten(target, kind, options);
    }
}
