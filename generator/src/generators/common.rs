use std::collections::HashSet;

use xcm_xsd::{ContentModel, Element, ParentContext, QName};

pub(super) trait ContentModelVisitor: Sized {
    type ContentModelValue;
    fn visit_content_model(
        &mut self,
        context: &mut GeneratorContext,
        model: &ContentModel,
    ) -> Self::ContentModelValue;

    type ElementValue;
    fn visit_element(
        &mut self,
        context: &mut GeneratorContext,
        element: &Element,
    ) -> Self::ElementValue;
}

#[derive(Default)]
pub(super) struct GeneratorContext {
    /// Type names already handed out, so that owners sharing a local name stay distinct
    pub(super) used_type_names: HashSet<String>,
}

impl GeneratorContext {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Claims `base`, or `base` suffixed with `Inner` as often as needed to make it unique.
    pub(super) fn claim_type_name(&mut self, base: String) -> String {
        let mut name = base;
        while !self.used_type_names.insert(name.clone()) {
            name.push_str("Inner");
        }
        name
    }
}

/// The name of the element or type that owns a content model.
pub(super) fn owner_name(owner: &ParentContext) -> Option<&QName> {
    match owner {
        ParentContext::Element(name) | ParentContext::ComplexType(name) => Some(name),
        ParentContext::Global => None,
    }
}

/// The occurrence range of `element` as `[min..max]`, with absent constraints defaulted.
pub(super) fn occurs_range(element: &Element) -> String {
    format!(
        "[{}..{}]",
        element.effective_min_occurs(),
        element.effective_max_occurs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claimed_names_are_unique() {
        let mut context = GeneratorContext::new();
        assert_eq!(context.claim_type_name("Order".into()), "Order");
        assert_eq!(context.claim_type_name("Order".into()), "OrderInner");
        assert_eq!(context.claim_type_name("Order".into()), "OrderInnerInner");
        assert_eq!(context.claim_type_name("Item".into()), "Item");
    }
}
