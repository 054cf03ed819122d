//! Infer Go struct declarations from sampled JSON documents.
//!
//! Pipeline: samples → [`inference::Inference`] (merged [`ir::Node`] tree,
//! widened through [`lattice::grow_type`]) → [`lower::render_declarations`]
//! (Go syntax tree) → [`codegen::Codegen`] (source text).
pub mod ast;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod inference;
pub mod ir;
pub mod jq_exec;
pub mod lattice;
pub mod lower;
pub mod path_de;

pub use config::RenderConfig;
pub use error::{Error, Result};
pub use ir::Node;
pub use lattice::{NodeType, grow_type};
