//! Transitive expansion of substitution groups.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use super::{
    context::CompileContext,
    element_decl::{Element, ElementDeclaration},
    error::XsdError,
    xstypes::{QName, Reference, Sequence},
};

/// Computes the elements that may stand in for any of the `direct` members, transitively.
///
/// Only members written as references can be substitution-group heads. A substitute inherits the
/// occurrence constraints of the member it substitutes for. Substitutes whose defining schema
/// imports the namespace of the head are skipped; this keeps two modules that import each other
/// from expanding into one another. Every returned element has an identity distinct from the
/// `direct` members and from each other, so cyclic affiliations terminate.
pub(crate) fn expand(
    direct: &[Element],
    ctx: &CompileContext,
) -> Result<Sequence<Element>, XsdError> {
    let mut visited: HashSet<QName> = direct.iter().map(|e| e.name.clone()).collect();
    let mut worklist: VecDeque<Element> = direct.iter().cloned().collect();
    let mut substituted = Sequence::new();

    while let Some(head) = worklist.pop_front() {
        if head.reference.is_none() {
            continue;
        }

        for substitute in ctx.registry.substitutes(&head.name) {
            let head_namespace = head.name.namespace_name.as_deref();
            if ctx.registry.imports(substitute.schema, head_namespace) {
                debug!(
                    head = %head.name,
                    substitute = %substitute.name,
                    "skipping substitute whose schema imports the head's namespace"
                );
                continue;
            }

            let defining_schema = ctx.registry.schema(substitute.schema);
            let name = defining_schema.top_level_name(&substitute.name);
            if visited.contains(&name) {
                continue;
            }
            // The prefix only names the substitute; lookup goes by expanded name
            let prefix = match defining_schema.target_namespace.as_deref() {
                Some(namespace) => defining_schema.prefix_for_namespace(namespace)?,
                None => None,
            };
            let declaration = ElementDeclaration::reference(
                Reference::new(prefix, substitute.name.clone()),
                head.min_occurs,
                head.max_occurs.clone(),
            );
            let element =
                declaration.compile_resolved(name, &ctx.in_schema(substitute.schema))?;

            if visited.insert(element.name.clone()) {
                debug!(head = %head.name, substitute = %element.name, "expanded substitute");
                worklist.push_back(element.clone());
                substituted.push(element);
            }
        }
    }

    Ok(substituted)
}
