//! Arena-backed scene graph.
//!
//! Nodes live in generational slots. Siblings form a doubly-linked list and
//! every node keeps a back-reference to its parent plus head/tail links to its
//! own children, so append, remove and reparent are all O(1).

use super::WidgetId;
use crate::error::{SceneError, SceneResult};

/// Structural links of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Links {
    /// Owning node.
    pub parent: Option<WidgetId>,
    /// Previous sibling.
    pub prev: Option<WidgetId>,
    /// Next sibling.
    pub next: Option<WidgetId>,
    /// First child.
    pub first_child: Option<WidgetId>,
    /// Last child.
    pub last_child: Option<WidgetId>,
}

struct Entry<T> {
    links: Links,
    value: T,
}

struct Slot<T> {
    generation: u32,
    entry: Option<Entry<T>>,
}

/// Hierarchy of nodes carrying a `T` payload.
pub struct SceneGraph<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> SceneGraph<T> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Creates an empty graph with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Returns true when the graph holds no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Adds a detached node.
    #[allow(clippy::cast_possible_truncation)]
    pub fn insert(&mut self, value: T) -> WidgetId {
        let entry = Entry {
            links: Links::default(),
            value,
        };
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return WidgetId::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        WidgetId::new(index, 0)
    }

    /// Returns true if `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.entry(id).is_ok()
    }

    /// Payload of a node.
    #[must_use]
    pub fn get(&self, id: WidgetId) -> Option<&T> {
        self.entry(id).ok().map(|e| &e.value)
    }

    /// Mutable payload of a node.
    #[must_use]
    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut T> {
        self.entry_mut(id).ok().map(|e| &mut e.value)
    }

    /// Links of a node.
    #[must_use]
    pub fn links(&self, id: WidgetId) -> Option<Links> {
        self.entry(id).ok().map(|e| e.links)
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.links(id).and_then(|l| l.parent)
    }

    /// Iterates over the children of `id` in sibling order.
    #[must_use]
    pub fn children(&self, id: WidgetId) -> Children<'_, T> {
        Children {
            graph: self,
            next: self.links(id).and_then(|l| l.first_child),
        }
    }

    /// Appends `child` at the tail of `parent`'s children.
    ///
    /// # Errors
    ///
    /// Fails if either id is stale, `child` is already attached, or the link
    /// would place `child` beneath itself.
    pub fn append(&mut self, parent: WidgetId, child: WidgetId) -> SceneResult<()> {
        self.check_attachable(parent, child)?;

        let tail = self.entry(parent)?.links.last_child;
        {
            let links = &mut self.entry_mut(child)?.links;
            links.parent = Some(parent);
            links.prev = tail;
            links.next = None;
        }
        match tail {
            Some(tail) => self.entry_mut(tail)?.links.next = Some(child),
            None => self.entry_mut(parent)?.links.first_child = Some(child),
        }
        self.entry_mut(parent)?.links.last_child = Some(child);
        Ok(())
    }

    /// Inserts the detached `child` directly before `sibling`.
    ///
    /// # Errors
    ///
    /// Fails if either id is stale, `sibling` is detached, or `child` is
    /// already attached.
    pub fn insert_before(&mut self, child: WidgetId, sibling: WidgetId) -> SceneResult<()> {
        let sibling_links = self.entry(sibling)?.links;
        let parent = sibling_links.parent.ok_or(SceneError::NotAttached(sibling))?;
        self.check_attachable(parent, child)?;
        if child == sibling {
            return Err(SceneError::SelfReference(child));
        }

        {
            let links = &mut self.entry_mut(child)?.links;
            links.parent = Some(parent);
            links.prev = sibling_links.prev;
            links.next = Some(sibling);
        }
        self.entry_mut(sibling)?.links.prev = Some(child);
        match sibling_links.prev {
            Some(prev) => self.entry_mut(prev)?.links.next = Some(child),
            None => self.entry_mut(parent)?.links.first_child = Some(child),
        }
        Ok(())
    }

    /// Detaches a node from its parent, keeping its own children.
    ///
    /// # Errors
    ///
    /// Fails if the id is stale or the node is not attached.
    pub fn remove(&mut self, node: WidgetId) -> SceneResult<()> {
        let links = self.entry(node)?.links;
        let parent = links.parent.ok_or(SceneError::NotAttached(node))?;

        match links.prev {
            Some(prev) => self.entry_mut(prev)?.links.next = links.next,
            None => self.entry_mut(parent)?.links.first_child = links.next,
        }
        match links.next {
            Some(next) => self.entry_mut(next)?.links.prev = links.prev,
            None => self.entry_mut(parent)?.links.last_child = links.prev,
        }

        let own = &mut self.entry_mut(node)?.links;
        own.parent = None;
        own.prev = None;
        own.next = None;
        Ok(())
    }

    /// Moves a node to the tail of `new_parent`.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`Self::remove`] and
    /// [`Self::append`]; on failure the node is left where it was.
    pub fn reparent(&mut self, node: WidgetId, new_parent: WidgetId) -> SceneResult<()> {
        if !self.contains(new_parent) {
            return Err(SceneError::Stale(new_parent));
        }
        if self.is_ancestor_or_self(node, new_parent) {
            return Err(SceneError::SelfReference(node));
        }
        self.remove(node)?;
        self.append(new_parent, node)
    }

    /// Moves a node within its sibling chain: before `sibling`, or to the
    /// tail when `sibling` is `None`.
    ///
    /// # Errors
    ///
    /// Fails if the node is detached or `sibling` has a different parent.
    pub fn move_before(&mut self, node: WidgetId, sibling: Option<WidgetId>) -> SceneResult<()> {
        if sibling == Some(node) {
            return Ok(());
        }
        let parent = self.parent(node).ok_or(SceneError::NotAttached(node))?;
        if let Some(sibling) = sibling {
            if self.parent(sibling) != Some(parent) {
                return Err(SceneError::NotAttached(sibling));
            }
        }

        self.remove(node)?;
        match sibling {
            Some(sibling) => self.insert_before(node, sibling),
            None => self.append(parent, node),
        }
    }

    /// Removes a node and its whole subtree, children first.
    ///
    /// # Errors
    ///
    /// Fails if the id is stale.
    pub fn destroy(&mut self, node: WidgetId) -> SceneResult<Vec<(WidgetId, T)>> {
        let order = self.post_order(node)?;
        if self.parent(node).is_some() {
            self.remove(node)?;
        }

        let mut removed = Vec::with_capacity(order.len());
        for id in order {
            let slot = &mut self.slots[id.index() as usize];
            if let Some(entry) = slot.entry.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index());
                self.live -= 1;
                removed.push((id, entry.value));
            }
        }
        tracing::trace!("destroyed {} scene nodes under {}", removed.len(), node);
        Ok(removed)
    }

    /// Iterates over every live node.
    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.entry
                .as_ref()
                .map(|e| (slot_id(i, slot.generation), &e.value))
        })
    }

    /// Iterates mutably over every live node.
    ///
    /// Each payload is borrowed exactly once, so the borrows can be handed to
    /// independent jobs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (WidgetId, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.entry
                .as_mut()
                .map(|e| (slot_id(i, generation), &mut e.value))
        })
    }

    fn post_order(&self, root: WidgetId) -> SceneResult<Vec<WidgetId>> {
        self.entry(root)?;
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                out.push(id);
                continue;
            }
            stack.push((id, true));
            let children: Vec<_> = self.children(id).collect();
            for child in children.into_iter().rev() {
                stack.push((child, false));
            }
        }
        Ok(out)
    }

    fn is_ancestor_or_self(&self, ancestor: WidgetId, mut node: WidgetId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn check_attachable(&self, parent: WidgetId, child: WidgetId) -> SceneResult<()> {
        self.entry(parent)?;
        let child_links = self.entry(child)?.links;
        if child_links.parent.is_some() {
            return Err(SceneError::AlreadyAttached(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::SelfReference(child));
        }
        Ok(())
    }

    fn entry(&self, id: WidgetId) -> SceneResult<&Entry<T>> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.entry.as_ref())
            .ok_or(SceneError::Stale(id))
    }

    fn entry_mut(&mut self, id: WidgetId) -> SceneResult<&mut Entry<T>> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.entry.as_mut())
            .ok_or(SceneError::Stale(id))
    }
}

impl<T> Default for SceneGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn slot_id(index: usize, generation: u32) -> WidgetId {
    WidgetId::new(index as u32, generation)
}

/// Iterator over a node's children.
pub struct Children<'a, T> {
    graph: &'a SceneGraph<T>,
    next: Option<WidgetId>,
}

impl<T> Iterator for Children<'_, T> {
    type Item = WidgetId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.graph.links(id).and_then(|l| l.next);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(graph: &SceneGraph<u32>, parent: WidgetId) -> Vec<u32> {
        graph
            .children(parent)
            .map(|id| *graph.get(id).unwrap())
            .collect()
    }

    fn setup() -> (SceneGraph<u32>, WidgetId, Vec<WidgetId>) {
        let mut graph = SceneGraph::new();
        let root = graph.insert(0);
        let kids: Vec<_> = (1..=3).map(|v| graph.insert(v)).collect();
        for &kid in &kids {
            graph.append(root, kid).unwrap();
        }
        (graph, root, kids)
    }

    #[test]
    fn test_append_sets_back_reference() {
        let (graph, root, kids) = setup();
        assert_eq!(chain(&graph, root), vec![1, 2, 3]);
        assert_eq!(graph.parent(kids[1]), Some(root));
        assert_eq!(graph.links(root).unwrap().first_child, Some(kids[0]));
        assert_eq!(graph.links(root).unwrap().last_child, Some(kids[2]));
    }

    #[test]
    fn test_append_remove_restores_chain() {
        let (mut graph, root, kids) = setup();
        let before: Vec<_> = kids.iter().map(|&k| graph.links(k).unwrap()).collect();
        let root_before = graph.links(root).unwrap();

        // Head, middle and tail insertions.
        for anchor in [Some(kids[0]), Some(kids[1]), None] {
            let extra = graph.insert(99);
            match anchor {
                Some(sibling) => graph.insert_before(extra, sibling).unwrap(),
                None => graph.append(root, extra).unwrap(),
            }
            assert_eq!(graph.children(root).count(), 4);

            graph.remove(extra).unwrap();
            assert_eq!(chain(&graph, root), vec![1, 2, 3]);
            assert_eq!(graph.links(root).unwrap(), root_before);
            for (kid, links) in kids.iter().zip(&before) {
                assert_eq!(graph.links(*kid).unwrap(), *links);
            }
            assert_eq!(graph.links(extra).unwrap(), Links::default());
        }
    }

    #[test]
    fn test_reparent_moves_to_tail() {
        let (mut graph, root, kids) = setup();
        let other = graph.insert(10);
        graph.append(root, other).unwrap();

        graph.reparent(kids[1], other).unwrap();
        assert_eq!(chain(&graph, root), vec![1, 3, 10]);
        assert_eq!(chain(&graph, other), vec![2]);
        assert_eq!(graph.parent(kids[1]), Some(other));
    }

    #[test]
    fn test_cycles_rejected() {
        let (mut graph, root, kids) = setup();
        assert_eq!(
            graph.reparent(kids[0], kids[0]),
            Err(SceneError::SelfReference(kids[0]))
        );
        let loose = graph.insert(7);
        assert_eq!(graph.append(loose, root), Ok(()));
        assert_eq!(
            graph.reparent(loose, kids[2]),
            Err(SceneError::SelfReference(loose))
        );
    }

    #[test]
    fn test_move_before_reorders() {
        let (mut graph, root, kids) = setup();
        graph.move_before(kids[2], Some(kids[0])).unwrap();
        assert_eq!(chain(&graph, root), vec![3, 1, 2]);
        graph.move_before(kids[2], None).unwrap();
        assert_eq!(chain(&graph, root), vec![1, 2, 3]);
    }

    #[test]
    fn test_destroy_invalidates_ids() {
        let (mut graph, root, kids) = setup();
        let grandchild = graph.insert(4);
        graph.append(kids[0], grandchild).unwrap();

        let removed = graph.destroy(kids[0]).unwrap();
        assert_eq!(
            removed.iter().map(|(_, v)| *v).collect::<Vec<_>>(),
            vec![4, 1]
        );
        assert!(!graph.contains(kids[0]));
        assert!(!graph.contains(grandchild));
        assert_eq!(chain(&graph, root), vec![2, 3]);

        let reused = graph.insert(5);
        assert_eq!(reused.index(), kids[0].index());
        assert_ne!(reused, kids[0]);
        assert!(graph.get(kids[0]).is_none());
        assert_eq!(graph.len(), 4);
    }
}
