//! Voronoi diagrams of planar point sets, built with Fortune's sweep line
//! into a half-edge structure.
//!
//! ```
//! use fortune_voronoi::{build_voronoi, Point};
//!
//! let diagram = build_voronoi(&[
//!     Point::new(0.0, 0.0),
//!     Point::new(2.0, 0.0),
//!     Point::new(1.0, 2.0),
//! ]).unwrap();
//! assert_eq!(diagram.vertices().len(), 1);
//! assert_eq!(diagram.edge_count(), 3);
//! ```

pub mod beachline;
pub mod dcel;
pub mod error;
pub mod event;
pub mod geom;
pub mod point;
pub mod sweep;
pub mod utils;
pub mod validation;

pub use dcel::{Diagram, Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId};
pub use error::{TopologyError, VoronoiError};
pub use point::Point;
pub use sweep::{Sweep, SweepConfig};
pub use validation::{validate, ValidationReport};

/// Builds the diagram of `sites` with the default tolerance. Face `i`
/// belongs to `sites[i]`.
pub fn build_voronoi(sites: &[Point]) -> Result<Diagram, VoronoiError> {
    build_voronoi_with(sites, &SweepConfig::default())
}

pub fn build_voronoi_with(sites: &[Point], config: &SweepConfig) -> Result<Diagram, VoronoiError> {
    Sweep::new(sites, *config)?.finish()
}
