//! The beachline: the arcs currently on the front, in left-to-right order.
//!
//! Arcs live in a slab and are linked twice over the same nodes: `prev`/`next`
//! give the sequence, and a treap (heap-ordered on random priorities) gives
//! logarithmic search. Search has no stored keys; each node is compared through
//! the breakpoints with its neighbours at the current sweep position.

use std::fmt;
use std::ops::{Index, IndexMut};

use rand::{rngs::StdRng, Rng, SeedableRng};
use slab::Slab;

use crate::dcel::HalfEdgeId;
use crate::event::{EventId, SiteId};
use crate::geom::{self, TripleSite};
use crate::point::Point;

const TREAP_SEED: u64 = 0x5eed_f0a7_u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArcId(pub usize);

#[derive(Debug, Clone)]
pub struct Arc {
    pub site: SiteId,
    pub focus: Point,
    pub prev: Option<ArcId>,
    pub next: Option<ArcId>,
    /// Vertex event in which this arc vanishes, if one is pending.
    pub circle_event: Option<EventId>,
    /// Half-edge traced by the breakpoint between `prev` and this arc.
    /// Its incident face is this arc's site.
    pub left_edge: Option<HalfEdgeId>,
    parent: Option<ArcId>,
    left: Option<ArcId>,
    right: Option<ArcId>,
    priority: u64,
}

pub struct Beachline {
    arcs: Slab<Arc>,
    root: Option<ArcId>,
    priorities: StdRng,
}

impl Default for Beachline {
    fn default() -> Self {
        Beachline::new()
    }
}

impl fmt::Debug for Beachline {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|id| (id.0, self[id].site, self[id].focus)))
            .finish()
    }
}

impl Index<ArcId> for Beachline {
    type Output = Arc;

    fn index(&self, id: ArcId) -> &Arc {
        &self.arcs[id.0]
    }
}

impl IndexMut<ArcId> for Beachline {
    fn index_mut(&mut self, id: ArcId) -> &mut Arc {
        &mut self.arcs[id.0]
    }
}

impl Beachline {
    pub fn new() -> Self {
        Beachline {
            arcs: Slab::new(),
            root: None,
            priorities: StdRng::seed_from_u64(TREAP_SEED),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn get(&self, id: ArcId) -> Option<&Arc> {
        self.arcs.get(id.0)
    }

    pub fn insert_root(&mut self, site: SiteId, focus: Point) -> ArcId {
        let node = self.new_node(site, focus);
        self.root = Some(node);
        node
    }

    /// Arc whose trace covers `x` when the sweep line sits at `directrix`.
    ///
    /// Exactly on a breakpoint, the arc to its right is returned.
    pub fn find_arc_above(&self, x: f64, directrix: f64) -> Option<ArcId> {
        let mut current = self.root?;
        loop {
            let arc = &self[current];
            if let Some(prev) = arc.prev {
                if x < geom::breakpoint_x(self[prev].focus, arc.focus, directrix) {
                    match arc.left {
                        Some(left) => { current = left; continue; }
                        None => return Some(current),
                    }
                }
            }
            if let Some(next) = arc.next {
                if x >= geom::breakpoint_x(arc.focus, self[next].focus, directrix) {
                    match arc.right {
                        Some(right) => { current = right; continue; }
                        None => return Some(current),
                    }
                }
            }
            return Some(current);
        }
    }

    /// Splits `arc_above` into `[arc_above, new, copy]` and returns the new arc.
    ///
    /// The copy takes over `arc_above`'s right breakpoint; its `left_edge` is
    /// left empty for the caller to fill in along with the new arc's.
    pub fn insert_arc(&mut self, arc_above: ArcId, site: SiteId, focus: Point) -> ArcId {
        let (above_site, above_focus) = (self[arc_above].site, self[arc_above].focus);
        let new_arc = self.new_node(site, focus);
        self.link_after(arc_above, new_arc);
        let copy = self.new_node(above_site, above_focus);
        self.link_after(new_arc, copy);
        new_arc
    }

    /// Adds an arc at the right end. Used while the sweep is still on the first
    /// row of sites, where every arc is a vertical ray and nothing can be split.
    pub fn append(&mut self, site: SiteId, focus: Point) -> ArcId {
        match self.last() {
            None => self.insert_root(site, focus),
            Some(last) => {
                let node = self.new_node(site, focus);
                self.link_after(last, node);
                node
            }
        }
    }

    /// Unlinks `arc` and returns it; its former neighbours become adjacent.
    pub fn delete_arc(&mut self, arc: ArcId) -> Option<Arc> {
        if !self.arcs.contains(arc.0) {
            return None;
        }

        // push it down until it has at most one child
        while let (Some(left), Some(right)) = (self[arc].left, self[arc].right) {
            let child = if self[left].priority > self[right].priority { left } else { right };
            self.rotate_up(child);
        }
        let child = self[arc].left.or(self[arc].right);
        let parent = self[arc].parent;
        if let Some(child) = child {
            self[child].parent = parent;
        }
        self.replace_child(parent, arc, child);

        let (prev, next) = (self[arc].prev, self[arc].next);
        if let Some(prev) = prev {
            self[prev].next = next;
        }
        if let Some(next) = next {
            self[next].prev = prev;
        }

        Some(self.arcs.remove(arc.0))
    }

    pub fn first(&self) -> Option<ArcId> {
        self.root.map(|root| self.subtree_min(root))
    }

    pub fn last(&self) -> Option<ArcId> {
        let mut current = self.root?;
        while let Some(right) = self[current].right {
            current = right;
        }
        Some(current)
    }

    /// Arcs from left to right.
    pub fn iter(&self) -> impl Iterator<Item = ArcId> + '_ {
        std::iter::successors(self.first(), move |id| self[*id].next)
    }

    /// The arcs either side of `middle`, when it has both.
    pub fn neighbors(&self, middle: ArcId) -> Option<(ArcId, ArcId)> {
        let arc = self.get(middle)?;
        Some((arc.prev?, arc.next?))
    }

    /// Foci of `(prev, middle, next)`, skipped when the outer arcs share a site:
    /// those two breakpoints can never meet.
    pub fn triple(&self, middle: ArcId) -> Option<TripleSite> {
        let (left, right) = self.neighbors(middle)?;
        if self[left].site == self[right].site {
            return None;
        }
        Some((self[left].focus, self[middle].focus, self[right].focus))
    }

    /// Height of the beachline above `x` with the sweep at `directrix`.
    pub fn height_at(&self, x: f64, directrix: f64) -> Option<f64> {
        self.find_arc_above(x, directrix)
            .map(|arc| geom::parabola(self[arc].focus, directrix, x))
    }

    /// Longest root-to-leaf path in the search tree; 0 for an empty beachline.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(ArcId, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self[node].left.map(|child| (child, depth + 1)));
            stack.extend(self[node].right.map(|child| (child, depth + 1)));
        }
        deepest
    }

    fn new_node(&mut self, site: SiteId, focus: Point) -> ArcId {
        let priority = self.priorities.random::<u64>();
        ArcId(self.arcs.insert(Arc {
            site,
            focus,
            prev: None,
            next: None,
            circle_event: None,
            left_edge: None,
            parent: None,
            left: None,
            right: None,
            priority,
        }))
    }

    fn subtree_min(&self, root: ArcId) -> ArcId {
        let mut current = root;
        while let Some(left) = self[current].left {
            current = left;
        }
        current
    }

    /// Places the detached `node` right after `anchor` in both orders.
    fn link_after(&mut self, anchor: ArcId, node: ArcId) {
        let next = self[anchor].next;
        self[node].prev = Some(anchor);
        self[node].next = next;
        self[anchor].next = Some(node);
        if let Some(next) = next {
            self[next].prev = Some(node);
        }

        match self[anchor].right {
            None => {
                self[anchor].right = Some(node);
                self[node].parent = Some(anchor);
            }
            Some(right) => {
                let successor = self.subtree_min(right);
                self[successor].left = Some(node);
                self[node].parent = Some(successor);
            }
        }

        while let Some(parent) = self[node].parent {
            if self[parent].priority >= self[node].priority {
                break;
            }
            self.rotate_up(node);
        }
    }

    fn rotate_up(&mut self, node: ArcId) {
        let Some(parent) = self[node].parent else { return };
        let grandparent = self[parent].parent;

        if self[parent].left == Some(node) {
            let inner = self[node].right;
            self[parent].left = inner;
            if let Some(inner) = inner {
                self[inner].parent = Some(parent);
            }
            self[node].right = Some(parent);
        } else {
            let inner = self[node].left;
            self[parent].right = inner;
            if let Some(inner) = inner {
                self[inner].parent = Some(parent);
            }
            self[node].left = Some(parent);
        }

        self[parent].parent = Some(node);
        self[node].parent = grandparent;
        self.replace_child(grandparent, parent, Some(node));
    }

    fn replace_child(&mut self, parent: Option<ArcId>, old: ArcId, new: Option<ArcId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                if self[parent].left == Some(old) {
                    self[parent].left = new;
                } else {
                    self[parent].right = new;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_order(beachline: &Beachline) -> Vec<ArcId> {
        fn walk(beachline: &Beachline, node: Option<ArcId>, out: &mut Vec<ArcId>) {
            if let Some(node) = node {
                walk(beachline, beachline[node].left, out);
                out.push(node);
                walk(beachline, beachline[node].right, out);
            }
        }
        let mut out = vec![];
        walk(beachline, beachline.root, &mut out);
        out
    }

    fn sites(beachline: &Beachline) -> Vec<SiteId> {
        beachline.iter().map(|id| beachline[id].site).collect()
    }

    fn assert_consistent(beachline: &Beachline) {
        let listed: Vec<ArcId> = beachline.iter().collect();
        assert_eq!(in_order(beachline), listed);
        assert_eq!(listed.len(), beachline.len());
        for id in &listed {
            if let Some(parent) = beachline[*id].parent {
                assert!(beachline[parent].priority >= beachline[*id].priority);
                assert!(beachline[parent].left == Some(*id) || beachline[parent].right == Some(*id));
            } else {
                assert_eq!(beachline.root, Some(*id));
            }
        }
    }

    #[test]
    fn split_keeps_order() {
        let mut beachline = Beachline::new();
        let a = beachline.insert_root(0, Point::new(0.0, 10.0));
        let b = beachline.insert_arc(a, 1, Point::new(1.0, 0.0));
        assert_eq!(sites(&beachline), vec![0, 1, 0]);
        assert_eq!(beachline[b].prev, Some(a));
        let copy = beachline[b].next.unwrap();
        assert_eq!(beachline[copy].site, 0);
        assert_eq!(beachline.triple(b), None);
        assert_consistent(&beachline);

        let c = beachline.insert_arc(copy, 2, Point::new(4.0, -1.0));
        assert_eq!(sites(&beachline), vec![0, 1, 0, 2, 0]);
        assert_eq!(
            beachline.triple(copy),
            Some((Point::new(1.0, 0.0), Point::new(0.0, 10.0), Point::new(4.0, -1.0)))
        );
        assert_eq!(beachline.neighbors(c).map(|(l, _)| l), Some(copy));
        assert_consistent(&beachline);
    }

    #[test]
    fn finds_the_arc_above() {
        let mut beachline = Beachline::new();
        let a = beachline.insert_root(0, Point::new(0.0, 10.0));
        let b = beachline.insert_arc(a, 1, Point::new(1.0, 0.0));
        let copy = beachline[b].next.unwrap();

        // at the new site's own height its arc is a vertical ray at x = 1
        assert_eq!(beachline.find_arc_above(0.5, 0.0), Some(a));
        assert_eq!(beachline.find_arc_above(5.0, 0.0), Some(copy));

        // one unit lower it covers roughly (-2.233, 4.433)
        assert_eq!(beachline.find_arc_above(1.0, -1.0), Some(b));
        assert_eq!(beachline.find_arc_above(-2.0, -1.0), Some(b));
        assert_eq!(beachline.find_arc_above(4.4, -1.0), Some(b));
        assert_eq!(beachline.find_arc_above(-2.3, -1.0), Some(a));
        assert_eq!(beachline.find_arc_above(4.5, -1.0), Some(copy));
    }

    #[test]
    fn beachline_is_the_lower_envelope() {
        let foci = [Point::new(0.0, 10.0), Point::new(8.0, 1.0), Point::new(-3.0, 2.0)];
        let mut beachline = Beachline::new();
        let a = beachline.insert_root(0, foci[0]);
        let c = beachline.insert_arc(a, 2, foci[2]);
        let right = beachline.find_arc_above(8.0, 1.0).unwrap();
        assert_eq!(beachline[right].site, 0);
        assert_eq!(beachline[c].next, Some(right));
        beachline.insert_arc(right, 1, foci[1]);
        assert_eq!(sites(&beachline), vec![0, 2, 0, 1, 0]);

        // the middle arc of site 0 only vanishes near y = -1.84
        let directrix = -1.5;
        let mut x = -12.0;
        while x <= 12.0 {
            let envelope = foci.iter()
                .map(|f| geom::parabola(*f, directrix, x))
                .fold(f64::INFINITY, f64::min);
            let height = beachline.height_at(x, directrix).unwrap();
            assert!((height - envelope).abs() < 1e-9, "x={} height={} envelope={}", x, height, envelope);
            x += 0.25;
        }
    }

    #[test]
    fn delete_relinks_neighbours() {
        let mut beachline = Beachline::new();
        let a = beachline.insert_root(0, Point::new(0.0, 10.0));
        let b = beachline.insert_arc(a, 1, Point::new(1.0, 0.0));
        let copy = beachline[b].next.unwrap();
        let c = beachline.insert_arc(copy, 2, Point::new(4.0, -1.0));
        let copy2 = beachline[c].prev.unwrap();
        assert_eq!(copy2, copy);

        let removed = beachline.delete_arc(copy).unwrap();
        assert_eq!(removed.site, 0);
        assert_eq!(sites(&beachline), vec![0, 1, 2, 0]);
        assert_eq!(beachline[b].next, Some(c));
        assert_eq!(beachline[c].prev, Some(b));
        assert!(beachline.get(copy).is_none());
        assert!(beachline.delete_arc(copy).is_none());
        assert_consistent(&beachline);

        for id in beachline.iter().collect::<Vec<_>>() {
            beachline.delete_arc(id);
            assert_consistent(&beachline);
        }
        assert!(beachline.is_empty());
        assert_eq!(beachline.depth(), 0);
    }

    #[test]
    fn stays_shallow_under_sorted_appends() {
        let mut beachline = Beachline::new();
        for i in 0..1000 {
            beachline.append(i, Point::new(i as f64, 0.0));
        }
        assert_consistent(&beachline);
        assert_eq!(sites(&beachline), (0..1000).collect::<Vec<_>>());
        assert!(beachline.depth() < 64, "depth {}", beachline.depth());

        // remove every other arc and check the structure still holds up
        let ids: Vec<ArcId> = beachline.iter().collect();
        for id in ids.iter().step_by(2) {
            beachline.delete_arc(*id);
        }
        assert_consistent(&beachline);
        assert_eq!(beachline.len(), 500);
        assert!(beachline.depth() < 64);
    }
}
