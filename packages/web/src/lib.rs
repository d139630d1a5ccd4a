//! Web front-end for animal classification
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fauna_ml::{ArtifactPaths, Artifacts};
//! use fauna_web::{State, web_router};
//!
//! let artifacts = Artifacts::load(&ArtifactPaths::beside_executable()?)?;
//! let app = web_router(State::new(Arc::new(artifacts))?);
//! ```

pub mod error;
pub mod form;
pub mod page;
pub mod router;
pub mod state;


pub use error::ApiError;
pub use form::{Control, FormBuilder, Widget};
pub use router::{HealthResponse, web_router};
pub use state::{AppState, State};
