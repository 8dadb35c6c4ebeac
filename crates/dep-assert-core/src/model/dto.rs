//! Serde types for the JSON model format.
//!
//! ```json
//! {
//!   "classes": [
//!     { "name": "com.acme.Api", "uses": ["com.acme.Model"] },
//!     { "name": "com.acme.Impl", "members": { "run": ["com.acme.Api"] } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root of a JSON model document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelDto {
    /// All classes of the analyzed code base.
    #[serde(default)]
    pub classes: Vec<ClassDto>,
}

/// One class entry.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClassDto {
    /// Fully qualified class name (`com.acme.Outer$Inner`).
    pub name: String,

    /// Classes used by this class as a whole.
    #[serde(default)]
    pub uses: Vec<String>,

    /// Classes used per member (method or field name).
    #[serde(default)]
    pub members: BTreeMap<String, Vec<String>>,
}
