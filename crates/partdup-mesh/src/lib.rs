//! Mesh loading and geometric signature extraction for partdup.
//!
//! Handlers implement [`MeshHandler`] and are dispatched by file extension
//! through a [`HandlerRegistry`]. The only built-in format is STL (ASCII and
//! binary), read with `stl_io`.
//!
//! A signature consists of:
//!
//! - the axis-aligned bounding box of all vertices
//! - the enclosed volume (signed tetrahedron sum)
//! - the total surface area
//! - a BLAKE3 digest of the triangle corner positions
//!
//! ```rust,no_run
//! use std::path::Path;
//! use partdup_mesh::HandlerRegistry;
//!
//! let registry = HandlerRegistry::with_defaults();
//! let component = registry.extract(Path::new("bracket.stl"), "ProjectA").unwrap();
//! println!("volume: {}", component.signature.volume);
//! ```

mod error;
mod handler;
mod hash;
pub mod measure;
mod registry;
mod stl;

pub use error::{MeshError, MeshResult};
pub use handler::MeshHandler;
pub use hash::geometry_hash;
pub use measure::{MeshProperties, Triangle};
pub use registry::HandlerRegistry;
pub use stl::StlHandler;
