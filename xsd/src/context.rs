use super::{
    registry::{SchemaId, SchemaRegistry},
    xstypes::QName,
    Schema,
};

/// The syntactic parent of a compiled element: a relation plus the key to look the parent up
/// in the registry. This is context for code generation only and is never used to navigate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParentContext {
    /// The element is compiled outside of any content model
    Global,
    /// The element sits in the content model of the element with this name
    Element(QName),
    /// The element sits in the content model of the named complex type
    ComplexType(QName),
}

/// Everything the element and group compilers need to know about where they are.
#[derive(Clone, Debug)]
pub struct CompileContext<'a> {
    pub registry: &'a SchemaRegistry,
    /// The module whose namespace bindings apply to the names being compiled
    pub schema: SchemaId,
    pub parent: ParentContext,
}

impl<'a> CompileContext<'a> {
    pub fn new(registry: &'a SchemaRegistry, schema: SchemaId, parent: ParentContext) -> Self {
        Self {
            registry,
            schema,
            parent,
        }
    }

    pub fn current_schema(&self) -> &'a Schema {
        self.registry.schema(self.schema)
    }

    /// The same context, with names resolved in `schema` instead.
    pub(crate) fn in_schema(&self, schema: SchemaId) -> Self {
        Self {
            schema,
            ..self.clone()
        }
    }

    pub(crate) fn with_parent(&self, parent: ParentContext) -> Self {
        Self {
            parent,
            ..self.clone()
        }
    }
}
