//! Structural and metric checks on a finished [`Diagram`].

use std::fmt;

use log::debug;

use crate::dcel::{Diagram, FaceId, HalfEdgeId, VertexId};
use crate::error::TopologyError;

/// Relative tolerance used by [`validate`].
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
    pub num_sites: usize,
    pub num_vertices: usize,
    pub num_edges: usize,
    pub bounded_faces: usize,
    pub unbounded_faces: usize,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sites, {} vertices, {} edges, {} bounded / {} unbounded faces",
            self.num_sites, self.num_vertices, self.num_edges, self.bounded_faces, self.unbounded_faces
        )
    }
}

pub fn validate(diagram: &Diagram) -> Result<ValidationReport, TopologyError> {
    validate_with(diagram, DEFAULT_TOLERANCE)
}

/// Checks twin and chain links, face ownership, the Euler relation, and that
/// every vertex is the center of an empty circle through its sites.
///
/// `tolerance` is relative to the circle's radius (at least 1).
pub fn validate_with(diagram: &Diagram, tolerance: f64) -> Result<ValidationReport, TopologyError> {
    let faces = diagram.faces().len();
    let sites = diagram.sites().len();
    if faces != sites {
        return Err(TopologyError::FaceCount { faces, sites });
    }

    for (index, half) in diagram.half_edges().iter().enumerate() {
        let edge = HalfEdgeId(index);
        let twin = diagram.half_edge(half.twin);
        if twin.twin != edge {
            return Err(TopologyError::TwinMismatch { edge });
        }
        if twin.face == half.face {
            return Err(TopologyError::TwinSharesFace { edge });
        }
        if let Some(next) = half.next {
            let next_half = diagram.half_edge(next);
            if next_half.prev != Some(edge) {
                return Err(TopologyError::BrokenLink { edge });
            }
            if next_half.face != half.face {
                return Err(TopologyError::FaceMismatch { edge });
            }
            if diagram.destination(edge).is_none() || next_half.origin != diagram.destination(edge) {
                return Err(TopologyError::DisconnectedChain { edge });
            }
        }
        if let Some(prev) = half.prev {
            if diagram.half_edge(prev).next != Some(edge) {
                return Err(TopologyError::BrokenLink { edge });
            }
        }
    }

    let mut bounded_faces = 0;
    let mut unbounded_faces = 0;
    for index in 0..faces {
        let face = FaceId(index);
        let Some(start) = diagram.face(face).edge else {
            unbounded_faces += 1;
            continue;
        };
        if diagram.half_edge(start).face != face {
            return Err(TopologyError::ForeignEdge { face, edge: start });
        }
        let last = diagram.face_edges(face).last().unwrap_or(start);
        if diagram.half_edge(last).next == Some(start) {
            bounded_faces += 1;
        } else {
            unbounded_faces += 1;
        }
    }

    let actual = diagram.euler_characteristic();
    if actual != 2 {
        return Err(TopologyError::EulerMismatch {
            vertices: diagram.vertices().len(),
            edges: diagram.edge_count(),
            faces,
            actual,
        });
    }

    check_empty_circles(diagram, tolerance)?;

    let report = ValidationReport {
        num_sites: sites,
        num_vertices: diagram.vertices().len(),
        num_edges: diagram.edge_count(),
        bounded_faces,
        unbounded_faces,
    };
    debug!("diagram is valid: {}", report);
    Ok(report)
}

fn check_empty_circles(diagram: &Diagram, tolerance: f64) -> Result<(), TopologyError> {
    let mut around: Vec<Vec<FaceId>> = vec![vec![]; diagram.vertices().len()];
    for half in diagram.half_edges() {
        if let Some(origin) = half.origin {
            around[origin.0].push(half.face);
        }
    }

    for (index, faces) in around.iter().enumerate() {
        let vertex = VertexId(index);
        let center = diagram.vertex(vertex).position;
        let distances: Vec<f64> = faces.iter().map(|f| center.distance(diagram.site_of(*f))).collect();
        let (lo, hi) = distances.iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| (lo.min(*d), hi.max(*d)));
        if distances.is_empty() {
            continue;
        }
        let slack = tolerance * hi.max(1.0);
        if hi - lo > slack {
            return Err(TopologyError::OffCenterVertex { vertex, spread: hi - lo });
        }
        for (site, point) in diagram.sites().iter().enumerate() {
            if center.distance(*point) < lo - slack {
                return Err(TopologyError::NonEmptyCircle { vertex, site });
            }
        }
    }
    Ok(())
}
