use fnv::FnvHashMap;
use log::{debug, info, trace};

use crate::beachline::{ArcId, Beachline};
use crate::dcel::Diagram;
use crate::error::VoronoiError;
use crate::event::{Event, EventQueue, SiteEvent, VertexEvent};
use crate::point::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    /// Tolerance for collinear triples and for circles that bottom out just
    /// above the sweep line.
    pub epsilon: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig { epsilon: 1e-9 }
    }
}

impl SweepConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

/// Fortune's sweep, top to bottom.
///
/// Owns the beachline, the event queue, and the diagram under construction.
/// `process_next_event` runs one step so diagnostics can look at the state in
/// between; `finish` runs the rest and hands over the diagram.
#[derive(Debug)]
pub struct Sweep {
    event_queue: EventQueue,
    beachline: Beachline,
    output: Diagram,
    config: SweepConfig,
    sweep_y: f64,
    first_row_y: Option<f64>,
}

fn check_sites(sites: &[Point]) -> Result<(), VoronoiError> {
    if sites.is_empty() {
        return Err(VoronoiError::EmptyInput);
    }
    let mut seen = FnvHashMap::default();
    for (index, point) in sites.iter().enumerate() {
        if !point.is_finite() {
            return Err(VoronoiError::NonFiniteSite { index, point: *point });
        }
        if let Some(first) = seen.insert(*point, index) {
            return Err(VoronoiError::DuplicateSite { first, second: index, point: *point });
        }
    }
    Ok(())
}

impl Sweep {
    pub fn new(sites: &[Point], config: SweepConfig) -> Result<Self, VoronoiError> {
        check_sites(sites)?;
        let mut event_queue = EventQueue::new();
        event_queue.push_site_events(sites);
        Ok(Sweep {
            event_queue,
            beachline: Beachline::new(),
            output: Diagram::new(sites.to_vec()),
            config,
            sweep_y: f64::INFINITY,
            first_row_y: None,
        })
    }

    pub fn beachline(&self) -> &Beachline {
        &self.beachline
    }

    pub fn event_queue(&self) -> &EventQueue {
        &self.event_queue
    }

    /// Where the sweep line is; `+inf` before the first event.
    pub fn sweep_y(&self) -> f64 {
        self.sweep_y
    }

    // returns true if it still has work to do
    pub fn process_next_event(&mut self) -> Result<bool, VoronoiError> {
        let Some(event) = self.event_queue.pop_next() else {
            return Ok(false);
        };
        trace!("processing event {:?}", event);
        self.sweep_y = self.sweep_y.min(event.get_y());
        match event {
            Event::Site(data) => self.handle_site_event(data)?,
            Event::Vertex(data) => self.handle_vertex_event(data)?,
        }
        Ok(true)
    }

    pub fn run(&mut self) -> Result<(), VoronoiError> {
        while self.process_next_event()? {}
        Ok(())
    }

    /// Runs the sweep to completion. Breakpoints still on the beachline stay
    /// open-ended rays.
    pub fn finish(mut self) -> Result<Diagram, VoronoiError> {
        self.run()?;
        self.output.rewind_faces();
        info!(
            "voronoi diagram done: {} sites, {} vertices, {} edges, {} rays left on the beachline",
            self.output.sites().len(),
            self.output.vertices().len(),
            self.output.edge_count(),
            self.beachline.len().saturating_sub(1),
        );
        Ok(self.output)
    }

    fn handle_site_event(&mut self, event: SiteEvent) -> Result<(), VoronoiError> {
        let SiteEvent { site, point } = event;
        let face = self.output.face_for_site(site);

        if self.beachline.is_empty() {
            trace!("Beachline empty, inserting site {}.", site);
            self.first_row_y = Some(point.y());
            self.beachline.insert_root(site, point);
            return Ok(());
        }

        if self.first_row_y == Some(point.y()) {
            // still on the top row: every arc is a vertical ray, sites arrive left to right
            let last = self.beachline.last()
                .ok_or(VoronoiError::Inconsistent { what: "first row lost its arcs" })?;
            let left_face = self.output.face_for_site(self.beachline[last].site);
            let arc = self.beachline.append(site, point);
            let (edge, _) = self.output.new_edge_pair(face, left_face);
            self.beachline[arc].left_edge = Some(edge);
            return Ok(());
        }

        let arc_above = self.beachline.find_arc_above(point.x(), point.y())
            .ok_or(VoronoiError::Inconsistent { what: "no arc above a site" })?;
        trace!("site {} splits arc {:?}", site, arc_above);

        // remove false alarm vertex event
        self.invalidate_vertex_events(arc_above);

        let above_face = self.output.face_for_site(self.beachline[arc_above].site);
        let new_arc = self.beachline.insert_arc(arc_above, site, point);
        let copy = self.beachline[new_arc].next
            .ok_or(VoronoiError::Inconsistent { what: "split arc has no right copy" })?;

        // both new breakpoints trace the same bisector, one in each direction
        let (new_half, above_half) = self.output.new_edge_pair(face, above_face);
        self.beachline[new_arc].left_edge = Some(new_half);
        self.beachline[copy].left_edge = Some(above_half);

        self.try_add_vertex_event(arc_above, point.y());
        self.try_add_vertex_event(copy, point.y());
        Ok(())
    }

    fn handle_vertex_event(&mut self, event: VertexEvent) -> Result<(), VoronoiError> {
        let arc = event.vanishing_arc;
        let live = self.beachline.get(arc).is_some_and(|a| a.circle_event == Some(event.id));
        if !live {
            debug!("discarding stale vertex event {}", event.id);
            return Ok(());
        }
        let (left, right) = self.beachline.neighbors(arc)
            .ok_or(VoronoiError::Inconsistent { what: "vanishing arc at the end of the beachline" })?;

        // this event is the one being processed, so only the back-reference goes
        self.beachline[arc].circle_event = None;
        self.invalidate_vertex_events(left);
        self.invalidate_vertex_events(right);

        let incoming_left = self.beachline[arc].left_edge
            .ok_or(VoronoiError::Inconsistent { what: "breakpoint without an edge" })?;
        let incoming_right = self.beachline[right].left_edge
            .ok_or(VoronoiError::Inconsistent { what: "breakpoint without an edge" })?;

        let vertex = self.output.new_vertex(event.center);
        trace!("arc {:?} vanishes at {:?}", arc, event.center);
        self.beachline.delete_arc(arc);

        let left_face = self.output.face_for_site(self.beachline[left].site);
        let right_face = self.output.face_for_site(self.beachline[right].site);
        let (new_edge, new_twin) = self.output.new_edge_pair(right_face, left_face);
        self.output.set_origin(new_edge, vertex);

        let incoming_left_twin = self.output.half_edge(incoming_left).twin;
        let incoming_right_twin = self.output.half_edge(incoming_right).twin;
        // hook up the three faces meeting at the vertex: the closing one, then right, then left
        self.output.close_edge_pair(incoming_left, vertex, incoming_right_twin);
        self.output.close_edge_pair(incoming_right, vertex, new_edge);
        self.output.link(new_twin, incoming_left_twin);

        self.beachline[right].left_edge = Some(new_edge);

        let y = self.sweep_y;
        self.try_add_vertex_event(left, y);
        self.try_add_vertex_event(right, y);
        Ok(())
    }

    /// Drops the pending vertex event of `arc`, if any. Every change to an
    /// arc's neighbourhood goes through here.
    fn invalidate_vertex_events(&mut self, arc: ArcId) {
        self.event_queue.invalidate_vertex_events(&mut self.beachline[arc].circle_event);
    }

    fn try_add_vertex_event(&mut self, middle: ArcId, current_y: f64) {
        self.invalidate_vertex_events(middle);
        let Some(triple) = self.beachline.triple(middle) else { return };
        trace!("Checking triple {:?}", triple);
        if let Some(id) = self.event_queue.try_add_vertex_event(triple, middle, current_y, self.config.epsilon) {
            self.beachline[middle].circle_event = Some(id);
        }
    }
}
