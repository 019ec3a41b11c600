//! Half-edge representation of the finished diagram.
//!
//! Everything sits in flat vectors and refers to everything else by index.
//! Twins are allocated side by side, so a pair is `2k` and `2k + 1`. A half-edge
//! has its face on the left; faces are numbered like the sites they belong to.
//! An `origin` of `None` means the half-edge comes in from infinity.

use petgraph::graph::{NodeIndex, UnGraph};

use crate::event::SiteId;
use crate::geom::Segment;
use crate::point::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub position: Point,
    pub incident_edge: Option<HalfEdgeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HalfEdge {
    pub twin: HalfEdgeId,
    pub face: FaceId,
    pub origin: Option<VertexId>,
    pub next: Option<HalfEdgeId>,
    pub prev: Option<HalfEdgeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub site: SiteId,
    /// First half-edge of the boundary chain, `None` when the face is the whole plane.
    pub edge: Option<HalfEdgeId>,
}

#[derive(Debug, Clone)]
pub struct Diagram {
    sites: Vec<Point>,
    vertices: Vec<Vertex>,
    half_edges: Vec<HalfEdge>,
    faces: Vec<Face>,
}

impl Diagram {
    pub(crate) fn new(sites: Vec<Point>) -> Self {
        let faces = (0..sites.len()).map(|site| Face { site, edge: None }).collect();
        Diagram {
            sites,
            vertices: vec![],
            half_edges: vec![],
            faces,
        }
    }

    pub(crate) fn new_vertex(&mut self, position: Point) -> VertexId {
        self.vertices.push(Vertex { position, incident_edge: None });
        VertexId(self.vertices.len() - 1)
    }

    /// Creates twins; the first lies on face `a`, the second on face `b`.
    pub(crate) fn new_edge_pair(&mut self, a: FaceId, b: FaceId) -> (HalfEdgeId, HalfEdgeId) {
        let first = HalfEdgeId(self.half_edges.len());
        let second = HalfEdgeId(first.0 + 1);
        for (id, twin, face) in [(first, second, a), (second, first, b)] {
            self.half_edges.push(HalfEdge { twin, face, origin: None, next: None, prev: None });
            if self.faces[face.0].edge.is_none() {
                self.faces[face.0].edge = Some(id);
            }
        }
        (first, second)
    }

    pub(crate) fn set_origin(&mut self, edge: HalfEdgeId, vertex: VertexId) {
        self.half_edges[edge.0].origin = Some(vertex);
        if self.vertices[vertex.0].incident_edge.is_none() {
            self.vertices[vertex.0].incident_edge = Some(edge);
        }
    }

    /// Ends `incoming` at `vertex` and continues its face's boundary with `outgoing`.
    pub(crate) fn close_edge_pair(&mut self, incoming: HalfEdgeId, vertex: VertexId, outgoing: HalfEdgeId) {
        let twin = self.half_edges[incoming.0].twin;
        self.set_origin(twin, vertex);
        self.link(incoming, outgoing);
    }

    pub(crate) fn link(&mut self, prev: HalfEdgeId, next: HalfEdgeId) {
        self.half_edges[prev.0].next = Some(next);
        self.half_edges[next.0].prev = Some(prev);
    }

    /// Points every face at the start of its boundary chain, so an unbounded
    /// cell is walked from its incoming ray to its outgoing one.
    pub(crate) fn rewind_faces(&mut self) {
        for face in self.faces.iter_mut() {
            let Some(start) = face.edge else { continue };
            let mut current = start;
            for _ in 0..self.half_edges.len() {
                match self.half_edges[current.0].prev {
                    Some(prev) if prev != start => current = prev,
                    _ => break,
                }
            }
            face.edge = Some(current);
        }
    }

    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[id.0]
    }

    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }

    pub fn face_for_site(&self, site: SiteId) -> FaceId {
        FaceId(site)
    }

    pub fn site_of(&self, face: FaceId) -> Point {
        self.sites[self.faces[face.0].site]
    }

    pub fn destination(&self, edge: HalfEdgeId) -> Option<VertexId> {
        self.half_edges[self.half_edges[edge.0].twin.0].origin
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.half_edges.len() / 2
    }

    /// `(V + 1) - E + F`, closing every ray at a single vertex at infinity.
    /// A well-formed diagram gives 2.
    pub fn euler_characteristic(&self) -> i64 {
        (self.vertices.len() as i64 + 1) - self.edge_count() as i64 + self.faces.len() as i64
    }

    /// Walks the boundary of `face` along `next`, stopping at a ray or when back at the start.
    pub fn face_edges(&self, face: FaceId) -> impl Iterator<Item = HalfEdgeId> + '_ {
        let start = self.faces[face.0].edge;
        std::iter::successors(start, move |edge| {
            self.half_edges[edge.0].next.filter(|next| Some(*next) != start)
        })
        .take(self.half_edges.len())
    }

    /// Faces sharing an edge with `face`, in index order.
    pub fn neighbors(&self, face: FaceId) -> Vec<FaceId> {
        let mut out: Vec<FaceId> = self.half_edges.iter()
            .filter(|edge| edge.face == face)
            .map(|edge| self.half_edges[edge.twin.0].face)
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Unit direction of `edge`, which runs with its face on the left.
    pub fn edge_direction(&self, edge: HalfEdgeId) -> Point {
        let here = &self.half_edges[edge.0];
        let n = self.site_of(self.half_edges[here.twin.0].face) - self.site_of(here.face);
        let len = n.dot(n).sqrt();
        Point::new(-n.y() / len, n.x() / len)
    }

    /// One segment per edge; rays and full lines are cut `ray_length` away
    /// from their finite end (or from the sites' midpoint for full lines).
    pub fn segments(&self, ray_length: f64) -> Vec<Segment> {
        (0..self.edge_count())
            .map(|pair| {
                let edge = HalfEdgeId(2 * pair);
                let dir = self.edge_direction(edge) * ray_length;
                let from = self.half_edges[edge.0].origin.map(|v| self.vertices[v.0].position);
                let to = self.destination(edge).map(|v| self.vertices[v.0].position);
                match (from, to) {
                    (Some(from), Some(to)) => [from, to],
                    (Some(from), None) => [from, from + dir],
                    (None, Some(to)) => [to - dir, to],
                    (None, None) => {
                        let twin = self.half_edges[edge.0].twin;
                        let mid = self.site_of(self.half_edges[edge.0].face)
                            .midpoint(self.site_of(self.half_edges[twin.0].face));
                        [mid - dir, mid + dir]
                    }
                }
            })
            .collect()
    }

    /// The dual graph: one node per site, one edge per pair of cells sharing a
    /// boundary, weighted with one of the half-edges between them.
    pub fn site_adjacency(&self) -> UnGraph<SiteId, HalfEdgeId> {
        let mut graph = UnGraph::with_capacity(self.sites.len(), self.edge_count());
        for site in 0..self.sites.len() {
            graph.add_node(site);
        }
        for pair in 0..self.edge_count() {
            let edge = &self.half_edges[2 * pair];
            let twin = &self.half_edges[edge.twin.0];
            graph.update_edge(
                NodeIndex::new(self.faces[edge.face.0].site),
                NodeIndex::new(self.faces[twin.face.0].site),
                HalfEdgeId(2 * pair),
            );
        }
        graph
    }

    /// Face whose cell contains `point`. On a shared boundary the lower index wins.
    pub fn locate(&self, point: Point) -> Option<FaceId> {
        let mut inside = vec![true; self.faces.len()];
        for edge in &self.half_edges {
            let twin = &self.half_edges[edge.twin.0];
            let own = point.distance_squared(self.site_of(edge.face));
            let other = point.distance_squared(self.site_of(twin.face));
            if own > other + 1e-9 * own.max(other).max(1.0) {
                inside[edge.face.0] = false;
            }
        }
        inside.iter().position(|inside| *inside).map(FaceId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The triangle (0,0), (2,0), (1,2) wired by hand the way the sweep does it.
    fn triangle() -> Diagram {
        let mut diagram = Diagram::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(1.0, 2.0)]);
        let (l, m, r) = (FaceId(0), FaceId(2), FaceId(1));
        let (h_lm, _) = diagram.new_edge_pair(l, m);
        let (h_mr, _) = diagram.new_edge_pair(r, m);
        let v = diagram.new_vertex(Point::new(1.0, 0.75));
        let (h_new, t_new) = diagram.new_edge_pair(r, l);
        diagram.set_origin(h_new, v);
        let (h_ml, h_rm) = (HalfEdgeId(h_lm.0 ^ 1), HalfEdgeId(h_mr.0 ^ 1));
        // breakpoint (l, m) carries the half on face m
        diagram.close_edge_pair(h_ml, v, h_rm);
        diagram.close_edge_pair(h_mr, v, h_new);
        diagram.link(t_new, h_lm);
        diagram.rewind_faces();
        diagram
    }

    #[test]
    fn twins_are_adjacent() {
        let mut diagram = Diagram::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)]);
        let (a, b) = diagram.new_edge_pair(FaceId(0), FaceId(1));
        assert_eq!(b.0, a.0 + 1);
        assert_eq!(diagram.half_edge(a).twin, b);
        assert_eq!(diagram.half_edge(b).twin, a);
        assert_eq!(diagram.face(FaceId(0)).edge, Some(a));
        assert_eq!(diagram.face(FaceId(1)).edge, Some(b));
        assert_eq!(diagram.euler_characteristic(), 2);
    }

    #[test]
    fn hand_built_triangle_links_up() {
        let diagram = triangle();
        assert_eq!(diagram.vertices().len(), 1);
        assert_eq!(diagram.edge_count(), 3);
        assert_eq!(diagram.euler_characteristic(), 2);

        for id in 0..diagram.half_edges().len() {
            let edge = diagram.half_edge(HalfEdgeId(id));
            if let Some(next) = edge.next {
                assert_eq!(diagram.half_edge(next).prev, Some(HalfEdgeId(id)));
                assert_eq!(diagram.half_edge(next).face, edge.face);
                assert_eq!(diagram.half_edge(next).origin, diagram.destination(HalfEdgeId(id)));
            }
        }

        // every face is unbounded with an in-ray and an out-ray
        for face in 0..3 {
            let chain: Vec<HalfEdgeId> = diagram.face_edges(FaceId(face)).collect();
            assert_eq!(chain.len(), 2, "face {}", face);
            assert_eq!(diagram.half_edge(chain[0]).origin, None);
            assert_eq!(diagram.destination(chain[1]), None);
        }
    }

    #[test]
    fn segments_follow_the_bisectors() {
        let diagram = triangle();
        for [a, b] in diagram.segments(10.0) {
            let mid = a.midpoint(b);
            // every edge is the bisector of two sites, so its points sit at equal distance
            let mut d: Vec<f64> = diagram.sites().iter().map(|s| mid.distance(*s)).collect();
            d.sort_by(|x, y| x.partial_cmp(y).unwrap());
            assert!((d[0] - d[1]).abs() < 1e-9);
        }
        let down = diagram.edge_direction(HalfEdgeId(4));
        assert!((down.x()).abs() < 1e-12);
        assert!((down.y() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn adjacency_and_location() {
        let diagram = triangle();
        let graph = diagram.site_adjacency();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(diagram.neighbors(FaceId(0)), vec![FaceId(1), FaceId(2)]);

        assert_eq!(diagram.locate(Point::new(-1.0, -1.0)), Some(FaceId(0)));
        assert_eq!(diagram.locate(Point::new(3.0, -1.0)), Some(FaceId(1)));
        assert_eq!(diagram.locate(Point::new(1.0, 5.0)), Some(FaceId(2)));
    }
}
