//! Configuration for directory walks.
//!
//! Traversal defaults can be set in a `.fluidpath.yaml` file, overridden by
//! `FLUIDPATH_*` environment variables, and finally by code.
//!
//! ```yaml
//! follow_symlinks: false
//! show_hidden: false
//! max_depth: 8
//! exclude_globs:
//!   - target
//!   - "*.tmp"
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use fluidpath::config::ConfigBuilder;
//! use fluidpath::SemanticPath;
//!
//! let options = ConfigBuilder::new().build()?.traverse_options();
//! for entry in SemanticPath::new("./").traverse(&options)? {
//!     println!("{}", entry?);
//! }
//! # Ok::<(), fluidpath::Error>(())
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod schema;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, CONFIG_FILE_NAME};
pub use schema::WalkConfig;
