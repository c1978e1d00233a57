use tracing::debug;

use super::{
    context::{CompileContext, ParentContext},
    element_decl::{AnonymousType, Element},
    error::XsdError,
    registry::SchemaRegistry,
    xstypes::Sequence,
};

/// The compiled content model of one top-level element or named complex type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentModel {
    pub owner: ParentContext,
    pub members: Sequence<Element>,
}

/// Compiles the content model of every top-level element with an anonymous complex type and
/// every named complex type, module by module in registration order. Declarations shadowed by an
/// earlier duplicate are skipped.
pub fn compile_content_models(
    registry: &SchemaRegistry,
) -> Result<Sequence<ContentModel>, XsdError> {
    let mut models = Sequence::new();

    for (id, schema) in registry.schemas() {
        for declaration in &schema.element_declarations {
            let Some(AnonymousType::Complex(complex_type)) = &declaration.anonymous_type else {
                continue;
            };
            let name = schema.top_level_name(declaration.name());
            if !matches!(
                registry.element_declaration(&name),
                Some((_, registered)) if std::ptr::eq(registered, declaration)
            ) {
                continue;
            }
            let ctx = CompileContext::new(registry, id, ParentContext::Element(name));
            let members = complex_type.compile(&ctx)?;
            models.push(ContentModel {
                owner: ctx.parent,
                members,
            });
        }

        for complex_type in &schema.complex_type_definitions {
            let Some(local_name) = &complex_type.name else {
                continue;
            };
            let name = schema.top_level_name(local_name);
            if !matches!(
                registry.complex_type_definition(&name),
                Some((_, registered)) if std::ptr::eq(registered, complex_type)
            ) {
                continue;
            }
            let ctx = CompileContext::new(registry, id, ParentContext::ComplexType(name));
            let members = complex_type.compile(&ctx)?;
            models.push(ContentModel {
                owner: ctx.parent,
                members,
            });
        }
    }

    debug!(count = models.len(), "compiled content models");
    Ok(models)
}
