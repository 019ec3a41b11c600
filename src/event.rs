// Site and vertex (circle) events, with lazy deletion for the speculative ones.

use std::fmt;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use log::{debug, trace};
use ordered_float::OrderedFloat;
use fnv::FnvHashSet;

use crate::beachline::ArcId;
use crate::geom::{self, Circle, TripleSite};
use crate::point::Point;

pub type EventId = usize;
pub type SiteId = usize;

#[derive(Debug, Clone, Copy)]
pub struct SiteEvent {
    pub site: SiteId,
    pub point: Point,
}

#[derive(Debug, Clone, Copy)]
pub struct VertexEvent {
    pub center: Point,
    pub radius: f64,
    pub vanishing_arc: ArcId,
    pub id: EventId,
}

impl VertexEvent {
    /// Sweep position at which the event fires: the bottom of its circle.
    pub fn trigger_y(&self) -> f64 {
        self.center.y() - self.radius
    }
}

#[derive(Clone, Copy)]
pub enum Event {
    Site(SiteEvent),
    Vertex(VertexEvent),
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Event::Site(ref data) => { write!(f, "Site {} at {:?}", data.site, data.point) },
            Event::Vertex(ref data) => {
                write!(f, "Vertex for arc {:?}, center {:?}, radius {:?}", data.vanishing_arc, data.center, data.radius)
            },
        }
    }
}

impl Event {
    pub fn get_y(&self) -> f64 {
        match *self {
            Event::Site(ref data) => data.point.y(),
            Event::Vertex(ref data) => data.trigger_y(),
        }
    }

    pub fn get_x(&self) -> f64 {
        match *self {
            Event::Site(ref data) => data.point.x(),
            Event::Vertex(ref data) => data.center.x(),
        }
    }
}

/// Heap entry. The heap is a max-heap, so "greater" means "processed sooner":
/// higher y, then lower x, then vertex before site, then older before newer.
#[derive(Debug, Clone, Copy)]
struct Queued {
    event: Event,
    seq: usize,
}

impl Queued {
    fn key(&self) -> (OrderedFloat<f64>, OrderedFloat<f64>, bool, usize) {
        let is_vertex = matches!(self.event, Event::Vertex(_));
        (
            OrderedFloat(self.event.get_y()),
            OrderedFloat(-self.event.get_x()),
            is_vertex,
            usize::MAX - self.seq,
        )
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Queued) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Queued) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Queued) -> Ordering {
        self.key().cmp(&other.key())
    }
}

#[derive(Default)]
pub struct EventQueue {
    next_event_id: usize,
    events: BinaryHeap<Queued>,
    removed_event_ids: FnvHashSet<EventId>,
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut pending: Vec<&Queued> = self.events.iter()
            .filter(|q| match q.event {
                Event::Vertex(ref data) => !self.removed_event_ids.contains(&data.id),
                Event::Site(_) => true,
            })
            .collect();
        pending.sort_by(|a, b| b.cmp(a));

        let mut queue_disp = String::new();
        for (index, queued) in pending.iter().enumerate() {
            queue_disp.push_str(format!("{}: {:?}", index, queued.event).as_str());
            queue_disp.push('\n');
        }

        write!(f, "\n{}", queue_disp)
    }
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue::default()
    }

    /// Bulk-load the site events; `sites[i]` becomes site `i`.
    pub fn push_site_events(&mut self, sites: &[Point]) {
        self.events.reserve(sites.len());
        for (site, point) in sites.iter().enumerate() {
            self.push(Event::Site(SiteEvent { site, point: *point }));
        }
    }

    /// Returns the id given to the event. Only vertex events can be invalidated through it.
    pub fn push(&mut self, mut event: Event) -> EventId {
        let event_id = self.next_event_id;
        self.next_event_id += 1;
        if let Event::Vertex(ref mut data) = event {
            data.id = event_id;
        }

        trace!("pushing event {} {:?}", event_id, event);
        self.events.push(Queued { event, seq: event_id });

        event_id
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        while let Some(queued) = self.events.pop() {
            // If this event was removed, pop another event
            if let Event::Vertex(ref data) = queued.event {
                if self.removed_event_ids.remove(&data.id) {
                    continue;
                }
            }

            return Some(queued.event);
        }
        None
    }

    pub fn invalidate(&mut self, event_id: EventId) {
        self.removed_event_ids.insert(event_id);
    }

    /// Drops whatever vertex event `slot` points at and clears the slot.
    ///
    /// `slot` is an arc's back-reference to the event in which it vanishes.
    pub fn invalidate_vertex_events(&mut self, slot: &mut Option<EventId>) {
        if let Some(event_id) = slot.take() {
            debug!("invalidating vertex event {}", event_id);
            self.invalidate(event_id);
        }
    }

    /// Schedules the vertex event of `middle` if its triple's breakpoints
    /// converge and the circle's bottom has not been passed yet.
    pub fn try_add_vertex_event(&mut self, triple: TripleSite, middle: ArcId, current_y: f64, epsilon: f64) -> Option<EventId> {
        if !geom::breakpoints_converge(triple) {
            return None;
        }
        let (a, b, c) = triple;
        let Circle { center, radius } = geom::circumcircle(a, b, c, epsilon)?;
        let bottom = center.y() - radius;
        if bottom > current_y + epsilon * radius.max(1.0) {
            debug!("circle for arc {:?} bottoms out above the sweep ({} > {})", middle, bottom, current_y);
            return None;
        }

        let id = self.push(Event::Vertex(VertexEvent {
            center,
            radius,
            vanishing_arc: middle,
            id: 0,
        }));
        debug!("scheduled vertex event {} at y={} for arc {:?}", id, bottom, middle);
        Some(id)
    }

    /// Number of entries in the heap, including invalidated ones not yet popped.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing live is left to pop.
    pub fn is_empty(&self) -> bool {
        self.events.iter().all(|q| match q.event {
            Event::Vertex(ref data) => self.removed_event_ids.contains(&data.id),
            Event::Site(_) => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_of(event: Option<Event>) -> SiteId {
        match event {
            Some(Event::Site(data)) => data.site,
            other => panic!("expected a site event, got {:?}", other),
        }
    }

    #[test]
    fn sites_pop_top_down_then_left_to_right() {
        let mut queue = EventQueue::new();
        queue.push_site_events(&[
            Point::new(2.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(0.0, 0.0),
            Point::new(5.0, 1.0),
        ]);
        assert_eq!(site_of(queue.pop_next()), 1);
        assert_eq!(site_of(queue.pop_next()), 3);
        assert_eq!(site_of(queue.pop_next()), 2);
        assert_eq!(site_of(queue.pop_next()), 0);
        assert!(queue.pop_next().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn vertex_event_goes_before_site_at_same_spot() {
        let mut queue = EventQueue::new();
        queue.push_site_events(&[Point::new(0.0, -1.0)]);
        let triple = (Point::new(-1.0, 0.0), Point::new(0.0, 1.0), Point::new(1.0, 0.0));
        let id = queue.try_add_vertex_event(triple, ArcId(7), 0.0, 1e-9).unwrap();

        match queue.pop_next() {
            Some(Event::Vertex(data)) => {
                assert_eq!(data.id, id);
                assert_eq!(data.vanishing_arc, ArcId(7));
                assert_eq!(data.trigger_y(), -1.0);
            }
            other => panic!("expected the vertex event, got {:?}", other),
        }
        assert_eq!(site_of(queue.pop_next()), 0);
    }

    #[test]
    fn invalidated_events_are_skipped() {
        let mut queue = EventQueue::new();
        let triple = (Point::new(-1.0, 0.0), Point::new(0.0, 1.0), Point::new(1.0, 0.0));
        let mut slot = queue.try_add_vertex_event(triple, ArcId(0), 0.0, 1e-9);
        assert!(slot.is_some());
        assert!(!queue.is_empty());

        queue.invalidate_vertex_events(&mut slot);
        assert_eq!(slot, None);
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 1);
        assert!(queue.pop_next().is_none());

        // clearing an empty slot is harmless
        queue.invalidate_vertex_events(&mut slot);
        assert!(queue.pop_next().is_none());
    }

    #[test]
    fn diverging_or_collinear_triples_are_not_scheduled() {
        let mut queue = EventQueue::new();
        let diverging = (Point::new(1.0, 0.0), Point::new(0.0, 1.0), Point::new(-1.0, 0.0));
        assert_eq!(queue.try_add_vertex_event(diverging, ArcId(0), 0.0, 1e-9), None);
        let collinear = (Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0));
        assert_eq!(queue.try_add_vertex_event(collinear, ArcId(0), 0.0, 1e-9), None);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn circles_above_the_sweep_are_not_scheduled() {
        let mut queue = EventQueue::new();
        let triple = (Point::new(-1.0, 0.0), Point::new(0.0, 1.0), Point::new(1.0, 0.0));
        assert_eq!(queue.try_add_vertex_event(triple, ArcId(0), -2.0, 1e-9), None);
        // exactly at the sweep still counts
        assert!(queue.try_add_vertex_event(triple, ArcId(0), -1.0, 1e-9).is_some());
    }
}
