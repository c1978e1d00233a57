use std::fmt;

use roxmltree::Node;
use tracing::warn;

use super::{
    context::CompileContext,
    element_decl::{Element, ElementDeclaration},
    error::XsdError,
    model_group::{Compositor, ModelGroup},
    values::{invalid, ActualValue},
    xstypes::Sequence,
};

/// A content-model node: an element or one of the three kinds of model group.
#[derive(Clone, Debug)]
pub enum Particle {
    Element(ElementDeclaration),
    Sequence(ModelGroup),
    Choice(ModelGroup),
    All(ModelGroup),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaxOccurs {
    Unbounded,
    Count(u64),
}

impl ActualValue<'_> for MaxOccurs {
    fn convert(src: &str, attribute: &'static str) -> Result<Self, XsdError> {
        // unbounded, if the maxOccurs [attribute] equals unbounded, otherwise the ·actual value·
        // of the maxOccurs [attribute]
        if src == "unbounded" {
            Ok(Self::Unbounded)
        } else {
            src.parse()
                .map(Self::Count)
                .map_err(|_| invalid(attribute, src))
        }
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

impl Particle {
    /// Maps `<element>`, `<sequence>`, `<choice>` and `<all>`. Returns `None` for children of a
    /// model group that carry no particle we model.
    pub(super) fn map_from_xml(particle: Node) -> Result<Option<Self>, XsdError> {
        let particle = match particle.tag_name().name() {
            ElementDeclaration::TAG_NAME => {
                Self::Element(ElementDeclaration::map_from_xml(particle)?)
            }
            "sequence" => Self::Sequence(ModelGroup::map_from_xml(particle)?),
            "choice" => Self::Choice(ModelGroup::map_from_xml(particle)?),
            "all" => Self::All(ModelGroup::map_from_xml(particle)?),
            "annotation" => return Ok(None),
            tag @ ("any" | "group") => {
                warn!(tag, "particle kind is not supported and is left out of the content model");
                return Ok(None);
            }
            other => return Err(XsdError::UnexpectedElement(other.to_string())),
        };
        Ok(Some(particle))
    }

    pub fn compositor(&self) -> Option<Compositor> {
        match self {
            Self::Element(_) => None,
            Self::Sequence(_) => Some(Compositor::Sequence),
            Self::Choice(_) => Some(Compositor::Choice),
            Self::All(_) => Some(Compositor::All),
        }
    }

    /// Compiles this particle to its flat, deduplicated, canonically ordered list of elements.
    pub fn compile(&self, ctx: &CompileContext) -> Result<Sequence<Element>, XsdError> {
        match self {
            Self::Element(declaration) => Ok(vec![declaration.compile(ctx)?]),
            Self::Sequence(group) => group.compile(Compositor::Sequence, ctx),
            Self::Choice(group) => group.compile(Compositor::Choice, ctx),
            Self::All(group) => group.compile(Compositor::All, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::actual_value;

    #[test]
    fn parses_max_occurs() {
        assert_eq!(
            actual_value::<MaxOccurs>("unbounded", "maxOccurs").unwrap(),
            MaxOccurs::Unbounded
        );
        assert_eq!(
            actual_value::<MaxOccurs>("7", "maxOccurs").unwrap(),
            MaxOccurs::Count(7)
        );
        assert!(actual_value::<MaxOccurs>("Unbounded", "maxOccurs").is_err());
        assert_eq!(MaxOccurs::Unbounded.to_string(), "unbounded");
    }

    #[test]
    fn skips_annotations_and_rejects_foreign_children() {
        let doc = roxmltree::Document::parse(
            r#"<xs:sequence xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:annotation/><xs:any/><xs:element name="a"/>
               </xs:sequence>"#,
        )
        .unwrap();
        let Some(Particle::Sequence(group)) = Particle::map_from_xml(doc.root_element()).unwrap()
        else {
            panic!("expected a sequence");
        };
        assert_eq!(group.particles.len(), 1);
        assert_eq!(group.particles[0].compositor(), None);

        let doc = roxmltree::Document::parse(
            r#"<xs:choice xmlns:xs="http://www.w3.org/2001/XMLSchema"><xs:attribute/></xs:choice>"#,
        )
        .unwrap();
        assert!(matches!(
            Particle::map_from_xml(doc.root_element()),
            Err(XsdError::UnexpectedElement(tag)) if tag == "attribute"
        ));
    }
}
