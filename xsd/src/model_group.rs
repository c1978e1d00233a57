use std::collections::HashSet;

use roxmltree::Node;

use crate::{
    context::CompileContext,
    element_decl::Element,
    error::XsdError,
    particle::{MaxOccurs, Particle},
    substitution,
    values::attribute,
    xstypes::Sequence,
};

/// A `<sequence>`, `<choice>` or `<all>`; which one is determined by the [`Particle`] variant
/// holding it.
#[derive(Clone, Debug, Default)]
pub struct ModelGroup {
    pub min_occurs: Option<u64>,
    pub max_occurs: Option<MaxOccurs>,
    pub particles: Sequence<Particle>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Compositor {
    All,
    Choice,
    Sequence,
}

impl ModelGroup {
    pub(super) fn map_from_xml(group: Node) -> Result<Self, XsdError> {
        // {particles}
        //   A sequence of particles corresponding to all the <all>, <choice>, <sequence>,
        //   <any>, <group> or <element> items among the [children], in order.
        let particles = group
            .children()
            .filter(|c| c.is_element())
            .filter_map(|child| Particle::map_from_xml(child).transpose())
            .collect::<Result<Sequence<_>, _>>()?;

        Ok(Self {
            min_occurs: attribute(group, "minOccurs")?,
            max_occurs: attribute(group, "maxOccurs")?,
            particles,
        })
    }

    /// Compiles this group as `compositor` into a fresh member list: direct elements, their
    /// substitutes, and the members of nested groups, deduplicated and in canonical order.
    pub fn compile(
        &self,
        compositor: Compositor,
        ctx: &CompileContext,
    ) -> Result<Sequence<Element>, XsdError> {
        let mut direct = Sequence::new();
        let mut nested = Sequence::new();

        for particle in &self.particles {
            match particle {
                Particle::Element(declaration) => {
                    let mut element = declaration.compile(ctx)?;
                    self.constrain_member(compositor, &mut element);
                    direct.push(element);
                }
                Particle::Sequence(_) | Particle::Choice(_) | Particle::All(_) => {
                    for mut element in particle.compile(ctx)? {
                        self.constrain_member(compositor, &mut element);
                        nested.push(element);
                    }
                }
            }
        }

        let substituted = substitution::expand(&direct, ctx)?;

        let mut members = deduplicate(direct.into_iter().chain(substituted).chain(nested));
        sort_canonically(&mut members);
        Ok(members)
    }

    /// Applies the occurrence rules this group imposes on one of its members. Only a choice
    /// imposes any: each alternative is individually optional, and an unbounded choice makes
    /// each alternative unbounded.
    fn constrain_member(&self, compositor: Compositor, element: &mut Element) {
        if compositor != Compositor::Choice {
            return;
        }
        if self.max_occurs == Some(MaxOccurs::Unbounded) {
            element.max_occurs = Some(MaxOccurs::Unbounded);
        }
        if element.min_occurs.is_none() {
            element.min_occurs = Some(0);
        }
    }
}

/// Keeps the first element of every identity, dropping later ones as they are.
pub(crate) fn deduplicate(elements: impl IntoIterator<Item = Element>) -> Sequence<Element> {
    let mut seen = HashSet::new();
    elements
        .into_iter()
        .filter(|element| seen.insert(element.name.clone()))
        .collect()
}

/// Orders elements by target identifier, then namespace, then local name.
pub(crate) fn sort_canonically(elements: &mut [Element]) {
    elements.sort_by_cached_key(Element::canonical_key);
}
