//! Compiles the particle groups of XSD complex types into flat, deterministic member lists.
//!
//! Schema modules are parsed into [`Schema`] values and registered in a [`SchemaRegistry`];
//! [`compile_content_models`] then compiles every content model the registry holds.

pub mod complex_type_def;
pub mod content_model;
pub mod context;
pub mod element_decl;
pub mod error;
pub mod import;
pub mod model_group;
pub mod particle;
pub mod registry;
pub mod schema;
pub mod xstypes;

mod builtins;
mod substitution;
mod values;

pub use builtins::{is_builtin_type, XML_NAMESPACE, XS_NAMESPACE};
pub use complex_type_def::ComplexTypeDefinition;
pub use content_model::{compile_content_models, ContentModel};
pub use context::{CompileContext, ParentContext};
pub use element_decl::{Element, ElementDeclaration, ElementType};
pub use error::XsdError;
pub use import::{FileImportResolver, ImportError, ImportResolver, MemoryImportResolver};
pub use model_group::{Compositor, ModelGroup};
pub use particle::{MaxOccurs, Particle};
pub use registry::{SchemaId, SchemaRegistry, Substitute};
pub use schema::{LoadOptions, Schema};
pub use xstypes::{QName, Reference};
