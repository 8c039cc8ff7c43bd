//! Simplex Core (engine-agnostic corrective blendshape solver)
//!
//! Turns a vector of slider values into a vector of shape weights. A rig is
//! described by a versioned JSON schema (see [`schema`]) and compiled once into
//! an immutable controller graph:
//!
//! - [`progression`] maps one scalar onto weighted shapes (linear or spline).
//! - [`controller`] holds the closed set of controller variants (slider, combo,
//!   traversal, floater) and their activation rules.
//! - [`trispace`] triangulates multi-slider regions so floaters interpolate
//!   without seams.
//! - [`solver::Simplex`] owns everything and drives the per-call pipeline.
//!
//! ```
//! use simplex_core::Simplex;
//!
//! let json = r#"{
//!     "encodingVersion": 2,
//!     "shapes": [{"name": "Smile"}, {"name": "Frown"}],
//!     "progressions": [{"name": "SmileProg", "pairs": [[1, -1.0], [null, 0.0], [0, 1.0]]}],
//!     "sliders": [{"name": "Smile", "prog": 0}]
//! }"#;
//! let mut simplex = Simplex::new(json);
//! assert!(simplex.is_built());
//! let out = simplex.solve(&[-0.5]).unwrap();
//! assert_eq!(out, vec![0.0, 0.5]);
//! ```

pub mod accumulate;
pub mod config;
pub mod controller;
pub mod error;
pub mod ids;
pub mod interp;
pub mod numeric;
pub mod progression;
pub mod rectify;
pub mod schema;
pub mod scratch;
pub mod shape;
pub mod solver;
pub mod topo;
pub mod trispace;

// Re-exports for consumers (hosts)
pub use config::SolverConfig;
pub use controller::{Controller, ControllerKind};
pub use error::{ParseError, ParseErrorKind, SolveError};
pub use ids::{ComboId, ControllerId, FloaterId, ProgressionId, ShapeId, SliderId, TraversalId};
pub use interp::Interp;
pub use numeric::{EPS, ULPS};
pub use progression::Progression;
pub use rectify::Rectified;
pub use shape::{Shape, ShapeHandle};
pub use solver::Simplex;
pub use trispace::TriSpace;
