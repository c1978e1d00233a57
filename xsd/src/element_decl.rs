use std::collections::HashSet;

use heck::ToUpperCamelCase;
use roxmltree::Node;

use super::{
    builtins::{is_builtin_type, XS_ANY_TYPE_NAME},
    complex_type_def::ComplexTypeDefinition,
    context::{CompileContext, ParentContext},
    error::XsdError,
    particle::MaxOccurs,
    registry::{SchemaId, SchemaRegistry},
    schema::Form,
    values::attribute,
    xstypes::{NCName, QName, Reference, Sequence},
};

/// An `<element>` as written in a schema document, before compilation.
#[derive(Clone, Debug)]
pub struct ElementDeclaration {
    pub kind: DeclarationKind,
    pub type_name: Option<Reference>,
    pub anonymous_type: Option<AnonymousType>,
    pub substitution_group: Sequence<Reference>,
    /// `None` if the attribute is absent (which means 1)
    pub min_occurs: Option<u64>,
    /// `None` if the attribute is absent (which means 1)
    pub max_occurs: Option<MaxOccurs>,
    pub form: Option<Form>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `<element name="...">`
    Named(NCName),
    /// `<element ref="...">`
    Ref(Reference),
}

#[derive(Clone, Debug)]
pub enum AnonymousType {
    Simple,
    Complex(ComplexTypeDefinition),
}

/// A compiled element particle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// The expanded name; this is also the element's identity within a content model.
    pub name: QName,
    /// The reference as written, if the element was declared with `ref` or synthesized from a
    /// substitution group.
    pub reference: Option<Reference>,
    pub type_: ElementType,
    pub min_occurs: Option<u64>,
    pub max_occurs: Option<MaxOccurs>,
    pub parent: ParentContext,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementType {
    Builtin(QName),
    Simple(QName),
    Complex(QName),
    /// Anonymous simple type declared inline.
    AnonymousSimple,
    /// Anonymous complex type declared inline on the top-level element with this name. Its
    /// content model is compiled once, with the element as root.
    AnonymousComplex(QName),
    /// Anonymous complex type declared inline on a local element, compiled in place.
    Inline(Sequence<Element>),
}

impl Element {
    /// Deterministic identifier derived from the local name, used for canonical ordering and
    /// as the base name of generated fields.
    pub fn target_identifier(&self) -> String {
        self.name.local_name.to_upper_camel_case()
    }

    pub(crate) fn canonical_key(&self) -> (String, Option<String>, String) {
        (
            self.target_identifier(),
            self.name.namespace_name.clone(),
            self.name.local_name.clone(),
        )
    }

    pub fn effective_min_occurs(&self) -> u64 {
        self.min_occurs.unwrap_or(1)
    }

    pub fn effective_max_occurs(&self) -> MaxOccurs {
        self.max_occurs.clone().unwrap_or(MaxOccurs::Count(1))
    }

    pub fn is_optional(&self) -> bool {
        self.effective_min_occurs() == 0
    }

    pub fn is_repeated(&self) -> bool {
        match self.effective_max_occurs() {
            MaxOccurs::Unbounded => true,
            MaxOccurs::Count(count) => count > 1,
        }
    }
}

impl ElementDeclaration {
    pub const TAG_NAME: &'static str = "element";

    /// Creates the declaration `<element ref="reference">` with the given occurrence constraints.
    pub fn reference(
        reference: Reference,
        min_occurs: Option<u64>,
        max_occurs: Option<MaxOccurs>,
    ) -> Self {
        Self {
            kind: DeclarationKind::Ref(reference),
            type_name: None,
            anonymous_type: None,
            substitution_group: Sequence::new(),
            min_occurs,
            max_occurs,
            form: None,
        }
    }

    /// Local name of the declared or referenced element.
    pub fn name(&self) -> &str {
        match &self.kind {
            DeclarationKind::Named(name) => name,
            DeclarationKind::Ref(reference) => &reference.local_name,
        }
    }

    pub(super) fn map_from_xml(element: Node) -> Result<Self, XsdError> {
        let name: Option<NCName> = attribute(element, "name")?;
        let reference: Option<Reference> = attribute(element, "ref")?;
        let kind = match (name, reference) {
            (_, Some(reference)) => DeclarationKind::Ref(reference),
            (Some(name), None) => DeclarationKind::Named(name),
            (None, None) => {
                return Err(XsdError::MissingAttribute {
                    element: Self::TAG_NAME,
                    attribute: "name",
                })
            }
        };

        let mut anonymous_type = None;
        for child in element.children().filter(|c| c.is_element()) {
            match child.tag_name().name() {
                "simpleType" => anonymous_type = Some(AnonymousType::Simple),
                ComplexTypeDefinition::TAG_NAME => {
                    anonymous_type = Some(AnonymousType::Complex(
                        ComplexTypeDefinition::map_from_xml(child)?,
                    ))
                }
                _ => {}
            }
        }

        Ok(Self {
            kind,
            type_name: attribute(element, "type")?,
            anonymous_type,
            substitution_group: attribute(element, "substitutionGroup")?.unwrap_or_default(),
            min_occurs: attribute(element, "minOccurs")?,
            max_occurs: attribute(element, "maxOccurs")?,
            form: attribute(element, "form")?,
        })
    }

    pub(super) fn map_from_xml_top_level(element: Node) -> Result<Self, XsdError> {
        let declaration = Self::map_from_xml(element)?;
        match declaration.kind {
            DeclarationKind::Named(_) => Ok(declaration),
            DeclarationKind::Ref(_) => Err(XsdError::MissingAttribute {
                element: Self::TAG_NAME,
                attribute: "name",
            }),
        }
    }

    /// Resolves this declaration in the context's schema and attaches the parent context.
    /// Occurrence constraints are kept as declared.
    pub fn compile(&self, ctx: &CompileContext) -> Result<Element, XsdError> {
        let schema = ctx.current_schema();
        let local_name = match &self.kind {
            DeclarationKind::Ref(reference) => {
                return self.compile_resolved(schema.resolve(reference)?, ctx);
            }
            DeclarationKind::Named(local_name) => local_name,
        };

        let qualified = self.form.unwrap_or(schema.element_form_default) == Form::Qualified;
        let namespace_name = schema.target_namespace.as_ref().filter(|_| qualified);
        let name = QName::with_optional_namespace(namespace_name, local_name);
        let type_ = match &self.anonymous_type {
            Some(AnonymousType::Simple) => ElementType::AnonymousSimple,
            Some(AnonymousType::Complex(complex_type)) => {
                let ctx = ctx.with_parent(ParentContext::Element(name.clone()));
                ElementType::Inline(complex_type.compile(&ctx)?)
            }
            None => self.named_type(ctx.registry, ctx.schema, &mut HashSet::new())?,
        };

        Ok(Element {
            name,
            reference: None,
            type_,
            min_occurs: self.min_occurs,
            max_occurs: self.max_occurs.clone(),
            parent: ctx.parent.clone(),
        })
    }

    /// Compiles this `ref` declaration as referring to the top-level element `name`, whatever
    /// namespace bindings the context's schema has.
    pub(crate) fn compile_resolved(
        &self,
        name: QName,
        ctx: &CompileContext,
    ) -> Result<Element, XsdError> {
        let reference = match &self.kind {
            DeclarationKind::Ref(reference) => reference.clone(),
            DeclarationKind::Named(local_name) => Reference::new(None::<String>, local_name),
        };
        let (declaring_schema, declaration) = ctx
            .registry
            .element_declaration(&name)
            .ok_or_else(|| XsdError::UnresolvedReference {
                reference: reference.clone(),
                name: name.clone(),
            })?;
        let type_ = declaration.global_type(
            ctx.registry,
            declaring_schema,
            &name,
            &mut HashSet::from([name.clone()]),
        )?;

        Ok(Element {
            name,
            reference: Some(reference),
            type_,
            min_occurs: self.min_occurs,
            max_occurs: self.max_occurs.clone(),
            parent: ctx.parent.clone(),
        })
    }

    /// The {type definition} of this top-level declaration named `name`, written in `schema`.
    /// `visited` guards against cyclic substitution-group affiliations.
    pub(super) fn global_type(
        &self,
        registry: &SchemaRegistry,
        schema: SchemaId,
        name: &QName,
        visited: &mut HashSet<QName>,
    ) -> Result<ElementType, XsdError> {
        match &self.anonymous_type {
            Some(AnonymousType::Simple) => Ok(ElementType::AnonymousSimple),
            Some(AnonymousType::Complex(_)) => Ok(ElementType::AnonymousComplex(name.clone())),
            None => self.named_type(registry, schema, visited),
        }
    }

    fn named_type(
        &self,
        registry: &SchemaRegistry,
        schema: SchemaId,
        visited: &mut HashSet<QName>,
    ) -> Result<ElementType, XsdError> {
        //   The first of the following that applies:
        //   1 The type definition corresponding to the <simpleType> or <complexType> element
        //     information item in the [children], if either is present.
        //   2 The type definition ·resolved· to by the ·actual value· of the type [attribute],
        //     if it is present.
        //   3 The declared {type definition} of the Element Declaration ·resolved· to by the
        //     first QName in the ·actual value· of the substitutionGroup [attribute], if present.
        //   4 ·xs:anyType·.
        // NOTE: Case 1 is handled by the callers.
        let schema_ref = registry.schema(schema);
        if let Some(type_name) = &self.type_name {
            let type_name = schema_ref.resolve(type_name)?;
            return if is_builtin_type(&type_name) {
                Ok(ElementType::Builtin(type_name))
            } else if registry.complex_type_definition(&type_name).is_some() {
                Ok(ElementType::Complex(type_name))
            } else if registry.is_simple_type(&type_name) {
                Ok(ElementType::Simple(type_name))
            } else {
                Err(XsdError::UnresolvedType(type_name))
            };
        }

        if let Some(head) = self.substitution_group.first() {
            let head_name = schema_ref.resolve(head)?;
            if visited.insert(head_name.clone()) {
                let (head_schema, head_declaration) = registry
                    .element_declaration(&head_name)
                    .ok_or_else(|| XsdError::UnresolvedReference {
                        reference: head.clone(),
                        name: head_name.clone(),
                    })?;
                return head_declaration.global_type(registry, head_schema, &head_name, visited);
            }
        }

        Ok(ElementType::Builtin(XS_ANY_TYPE_NAME.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builtins::XS_NAMESPACE, schema::LoadOptions, Schema};

    const XS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:t""#;

    fn registry(body: &str) -> (SchemaRegistry, SchemaId) {
        let xsd = format!(r#"<xs:schema {XS} targetNamespace="urn:t">{body}</xs:schema>"#);
        let mut registry = SchemaRegistry::new();
        let id = registry
            .add(Schema::parse(&xsd, LoadOptions::default()).unwrap())
            .unwrap();
        (registry, id)
    }

    fn compile(
        registry: &SchemaRegistry,
        schema: SchemaId,
        attrs: &str,
    ) -> Result<Element, XsdError> {
        compile_xml(registry, schema, &format!("<xs:element {XS} {attrs}/>"))
    }

    fn compile_xml(
        registry: &SchemaRegistry,
        schema: SchemaId,
        xml: &str,
    ) -> Result<Element, XsdError> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        let declaration = ElementDeclaration::map_from_xml(doc.root_element()).unwrap();
        let parent = ParentContext::ComplexType(QName::with_namespace("urn:t", "Owner"));
        declaration.compile(&CompileContext::new(registry, schema, parent))
    }

    fn xs(local_name: &str) -> QName {
        QName::with_namespace(XS_NAMESPACE, local_name)
    }

    fn t(local_name: &str) -> QName {
        QName::with_namespace("urn:t", local_name)
    }

    #[test]
    fn reference_takes_type_of_declaration_and_own_occurs() {
        let (registry, id) = registry(r#"<xs:element name="Head" type="xs:int"/>"#);
        let element = compile(&registry, id, r#"ref="t:Head" minOccurs="0" maxOccurs="4""#)
            .unwrap();
        assert_eq!(element.name, t("Head"));
        assert_eq!(element.reference, Some(Reference::parse("t:Head")));
        assert_eq!(element.type_, ElementType::Builtin(xs("int")));
        assert_eq!(element.min_occurs, Some(0));
        assert_eq!(element.max_occurs, Some(MaxOccurs::Count(4)));
        assert!(element.is_optional());
        assert!(element.is_repeated());
        assert_eq!(element.parent, ParentContext::ComplexType(t("Owner")));
    }

    #[test]
    fn local_element_form() {
        let (registry, id) = registry("");
        let element = compile(&registry, id, r#"name="note" type="xs:string""#).unwrap();
        assert_eq!(element.name, QName::with_optional_namespace(None::<String>, "note"));
        assert_eq!(element.reference, None);
        assert_eq!(element.min_occurs, None);
        assert!(!element.is_optional());
        assert!(!element.is_repeated());

        let element =
            compile(&registry, id, r#"name="note" form="qualified" type="xs:string""#).unwrap();
        assert_eq!(element.name, t("note"));
    }

    #[test]
    fn named_types_resolve_to_their_kind() {
        let (registry, id) = registry(
            r#"<xs:complexType name="C"/>
               <xs:simpleType name="S"><xs:restriction base="xs:string"/></xs:simpleType>"#,
        );
        let complex = compile(&registry, id, r#"name="a" type="t:C""#).unwrap();
        assert_eq!(complex.type_, ElementType::Complex(t("C")));
        let simple = compile(&registry, id, r#"name="a" type="t:S""#).unwrap();
        assert_eq!(simple.type_, ElementType::Simple(t("S")));
        let missing = compile(&registry, id, r#"name="a" type="t:X""#);
        assert!(matches!(missing, Err(XsdError::UnresolvedType(name)) if name == t("X")));
        let misspelled = compile(&registry, id, r#"name="a" type="xs:strin""#);
        assert!(matches!(misspelled, Err(XsdError::UnresolvedType(_))));
    }

    #[test]
    fn untyped_declaration_inherits_head_type() {
        let (registry, id) = registry(
            r#"<xs:element name="Head" type="xs:date"/>
               <xs:element name="Member" substitutionGroup="t:Head"/>
               <xs:element name="Loose"/>"#,
        );
        let member = compile(&registry, id, r#"ref="t:Member""#).unwrap();
        assert_eq!(member.type_, ElementType::Builtin(xs("date")));
        let loose = compile(&registry, id, r#"ref="t:Loose""#).unwrap();
        assert_eq!(loose.type_, ElementType::Builtin(xs("anyType")));
    }

    #[test]
    fn cyclic_affiliation_falls_back_to_any_type() {
        let (registry, id) = registry(
            r#"<xs:element name="A" substitutionGroup="t:B"/>
               <xs:element name="B" substitutionGroup="t:A"/>"#,
        );
        let element = compile(&registry, id, r#"ref="t:A""#).unwrap();
        assert_eq!(element.type_, ElementType::Builtin(xs("anyType")));
    }

    #[test]
    fn anonymous_types() {
        let (registry, id) = registry(
            r#"<xs:element name="Wrapper">
                 <xs:complexType>
                   <xs:sequence><xs:element name="x" type="xs:int"/></xs:sequence>
                 </xs:complexType>
               </xs:element>"#,
        );
        let global = compile(&registry, id, r#"ref="t:Wrapper""#).unwrap();
        assert_eq!(global.type_, ElementType::AnonymousComplex(t("Wrapper")));

        let local = compile_xml(
            &registry,
            id,
            &format!(
                r#"<xs:element {XS} name="point">
                     <xs:complexType><xs:sequence>
                       <xs:element name="y" type="xs:int"/>
                       <xs:element name="x" type="xs:int"/>
                     </xs:sequence></xs:complexType>
                   </xs:element>"#
            ),
        )
        .unwrap();
        let ElementType::Inline(members) = local.type_ else {
            panic!("expected inline content, got {:?}", local.type_);
        };
        let names: Vec<_> = members.iter().map(|m| m.name.local_name.as_str()).collect();
        assert_eq!(names, ["x", "y"]);
        let point = QName::with_optional_namespace(None::<String>, "point");
        assert!(members
            .iter()
            .all(|m| m.parent == ParentContext::Element(point.clone())));

        let simple = compile_xml(
            &registry,
            id,
            &format!(
                r#"<xs:element {XS} name="code">
                     <xs:simpleType><xs:restriction base="xs:string"/></xs:simpleType>
                   </xs:element>"#
            ),
        )
        .unwrap();
        assert_eq!(simple.type_, ElementType::AnonymousSimple);
    }

    #[test]
    fn unresolved_reference_is_reported() {
        let (registry, id) = registry("");
        let result = compile(&registry, id, r#"ref="t:Missing""#);
        assert!(matches!(
            result,
            Err(XsdError::UnresolvedReference { reference, name })
                if reference.to_string() == "t:Missing" && name == t("Missing")
        ));
    }

    #[test]
    fn unknown_prefix_is_reported() {
        let (registry, id) = registry("");
        let result = compile(&registry, id, r#"ref="zz:Missing""#);
        assert!(matches!(result, Err(XsdError::NamePrefixNotResolved(p)) if p == "zz"));
    }

    #[test]
    fn element_needs_name_or_ref() {
        let text = format!(r#"<xs:element {XS} type="xs:int"/>"#);
        let doc = roxmltree::Document::parse(&text).unwrap();
        assert!(matches!(
            ElementDeclaration::map_from_xml(doc.root_element()),
            Err(XsdError::MissingAttribute { attribute: "name", .. })
        ));
    }

    #[test]
    fn invalid_occurs_are_reported() {
        let text = format!(r#"<xs:element {XS} name="a" maxOccurs="lots"/>"#);
        let doc = roxmltree::Document::parse(&text).unwrap();
        assert!(matches!(
            ElementDeclaration::map_from_xml(doc.root_element()),
            Err(XsdError::InvalidAttribute { attribute: "maxOccurs", .. })
        ));
    }
}
