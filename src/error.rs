use thiserror::Error;

use crate::dcel::{FaceId, HalfEdgeId, VertexId};
use crate::point::Point;

/// Reasons a diagram cannot be built.
///
/// The first three describe degenerate input and are reported before the
/// sweep starts. `Inconsistent` means an invariant broke mid-sweep; no partial
/// diagram is returned in that case.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum VoronoiError {
    #[error("cannot build a Voronoi diagram from an empty site list")]
    EmptyInput,

    #[error("sites {first} and {second} coincide at {point:?}")]
    DuplicateSite { first: usize, second: usize, point: Point },

    #[error("site {index} has a non-finite coordinate {point:?}")]
    NonFiniteSite { index: usize, point: Point },

    #[error("sweep state is inconsistent: {what}")]
    Inconsistent { what: &'static str },
}

/// Structural problems found by [`crate::validation::validate`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TopologyError {
    #[error("half-edge {edge:?} and its twin do not point at each other")]
    TwinMismatch { edge: HalfEdgeId },

    #[error("half-edge {edge:?} lies on the same face as its twin")]
    TwinSharesFace { edge: HalfEdgeId },

    #[error("half-edge {edge:?}: next/prev links disagree")]
    BrokenLink { edge: HalfEdgeId },

    #[error("half-edge {edge:?} continues onto another face")]
    FaceMismatch { edge: HalfEdgeId },

    #[error("half-edge {edge:?} ends somewhere other than where its successor starts")]
    DisconnectedChain { edge: HalfEdgeId },

    #[error("{faces} faces for {sites} sites")]
    FaceCount { faces: usize, sites: usize },

    #[error("face {face:?} points at half-edge {edge:?} of another face")]
    ForeignEdge { face: FaceId, edge: HalfEdgeId },

    #[error("Euler mismatch: V={vertices}, E={edges}, F={faces}, got {actual} (expected 2)")]
    EulerMismatch { vertices: usize, edges: usize, faces: usize, actual: i64 },

    #[error("vertex {vertex:?} is not equidistant from the sites around it (spread {spread})")]
    OffCenterVertex { vertex: VertexId, spread: f64 },

    #[error("site {site} lies strictly inside the empty circle of vertex {vertex:?}")]
    NonEmptyCircle { vertex: VertexId, site: usize },
}
