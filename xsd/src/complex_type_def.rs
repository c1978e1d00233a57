use roxmltree::Node;
use tracing::warn;

use super::{
    context::CompileContext,
    element_decl::Element,
    error::XsdError,
    particle::Particle,
    values::attribute,
    xstypes::{NCName, Sequence},
};

/// A `<complexType>`, reduced to what the content-model compiler needs.
#[derive(Clone, Debug)]
pub struct ComplexTypeDefinition {
    /// `None` for anonymous types
    pub name: Option<NCName>,
    /// The model group of the type, if it has one
    pub content: Option<Box<Particle>>,
}

impl ComplexTypeDefinition {
    pub const TAG_NAME: &'static str = "complexType";

    pub(super) fn map_from_xml(complex_type: Node) -> Result<Self, XsdError> {
        Ok(Self {
            name: attribute(complex_type, "name")?,
            content: Self::content_particle(complex_type)?.map(Box::new),
        })
    }

    /// Finds the model group either directly among the [children] or within a
    /// `<complexContent>`'s `<extension>` or `<restriction>`.
    fn content_particle(node: Node) -> Result<Option<Particle>, XsdError> {
        for child in node.children().filter(|c| c.is_element()) {
            match child.tag_name().name() {
                "sequence" | "choice" | "all" => return Particle::map_from_xml(child),
                "complexContent" => {
                    if let Some(derivation) = child.children().find(|c| {
                        matches!(c.tag_name().name(), "extension" | "restriction")
                    }) {
                        // TODO: merge the base type's content model for extensions
                        return Self::content_particle(derivation);
                    }
                }
                "group" => {
                    warn!("model group references are not supported; content model is empty")
                }
                _ => {}
            }
        }
        Ok(None)
    }

    /// Compiles the content model of this type. A type without a model group has no members.
    pub fn compile(&self, ctx: &CompileContext) -> Result<Sequence<Element>, XsdError> {
        match &self.content {
            Some(content) => content.compile(ctx),
            None => Ok(Sequence::new()),
        }
    }
}
