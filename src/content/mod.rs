//! Rule content subsystem.
//!
//! # Data Flow
//! ```text
//! content directory + groups file
//!     → loader.rs (parse TOML/markdown at startup)
//!     → ContentCatalog / GroupSet (immutable, Arc-shared)
//!     → handlers read them per request
//!     → codec.rs (binary blob for /content)
//! ```

pub mod catalog;
pub mod codec;
pub mod group;
pub mod loader;
pub mod model;
pub mod value;

pub use catalog::{CatalogError, ContentCatalog};
pub use codec::{ContentEncoder, DecodingError, EncodingError};
pub use group::{Group, GroupSet};
pub use model::{GlobalRuleConfig, RuleContent, RulePluginInfo};
pub use value::ContentValue;
