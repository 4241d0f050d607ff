//! xfn - Argument-shape normalization for wrapped functions
//!
//! This crate wraps a target function operating on a dynamic argument list
//! (`Vec<serde_json::Value>`) and exposes a small tree of entry points that
//! preprocess arguments before delegating. It includes:
//!
//! - Argument editors (pad-and-set, arrify, pluralize, option merging)
//! - A composable argument/return pipeline
//! - Plural entry points (singular-to-plural coercion, optional un-collect)
//! - Named option presets, cross-nested with the plural entry point
//! - Receiver binding (`call_with`) at a configurable position
//!
//! ```
//! use serde_json::{json, Value};
//! use std::convert::Infallible;
//! use xfn_core::{xfn, Config};
//!
//! let config = Config::new()
//!     .with_plural_prop("all")
//!     .with_option_arg(1)
//!     .with_option_prop("strict", json!({"strict": true}));
//!
//! let f = xfn(&config, |args: Vec<Value>| Ok::<_, Infallible>(json!(args)))?;
//!
//! assert_eq!(f.call(vec![json!("a")]).unwrap(), json!([["a"]]));
//! assert_eq!(
//!     f["strict"]["all"].call(vec![json!("a")]).unwrap(),
//!     json!([["a"], {"strict": true}])
//! );
//! # Ok::<(), xfn_core::XfnError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod args;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod wrapped;

// Re-export commonly used types
pub use args::Args;
pub use config::{ArgPosition, Config, Sugar};
pub use error::{Result, XfnError};
pub use pipeline::{ArgEditor, Pipeline, ReturnEditor};
pub use wrapped::{xfn, Target, Wrapped};
