use std::collections::BTreeMap;

use roxmltree::Node;
use tracing::debug;

use super::{
    builtins::XML_NAMESPACE,
    complex_type_def::ComplexTypeDefinition,
    element_decl::ElementDeclaration,
    error::XsdError,
    import::{Import, ImportKind},
    values::{attribute, invalid, required_attribute, ActualValue},
    xstypes::{AnyURI, NCName, QName, Reference, Sequence, Set},
};

/// Value of the `form` and `elementFormDefault` attributes
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Form {
    Qualified,
    #[default]
    Unqualified,
}

impl ActualValue<'_> for Form {
    fn convert(src: &str, attribute: &'static str) -> Result<Self, XsdError> {
        match src {
            "qualified" => Ok(Self::Qualified),
            "unqualified" => Ok(Self::Unqualified),
            _ => Err(invalid(attribute, src)),
        }
    }
}

/// Options passed through to the XML parser
#[derive(Copy, Clone, Debug, Default)]
pub struct LoadOptions {
    /// Allow a XML Document Type Definition (DTD) to occur
    pub allow_dtd: bool,
}

/// One schema module, as declared in a single schema document.
///
/// Names inside the module are kept as written ([`Reference`]s); they are resolved against
/// the module's namespace bindings when the content models are compiled.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    /// Canonical location the module was loaded from, if it was loaded through a resolver
    pub location: Option<String>,
    pub target_namespace: Option<AnyURI>,
    pub element_form_default: Form,
    /// Prefixed namespace bindings in scope on the `<schema>` element
    pub namespaces: BTreeMap<String, AnyURI>,
    pub default_namespace: Option<AnyURI>,
    pub imports: Sequence<Import>,
    pub element_declarations: Set<ElementDeclaration>,
    pub complex_type_definitions: Set<ComplexTypeDefinition>,
    pub simple_type_definitions: Set<NCName>,
}

impl Schema {
    pub const TAG_NAME: &'static str = "schema";

    pub fn parse(text: &str, options: LoadOptions) -> Result<Self, XsdError> {
        let parsing_options = roxmltree::ParsingOptions {
            allow_dtd: options.allow_dtd,
            ..Default::default()
        };
        let document = roxmltree::Document::parse_with_options(text, parsing_options)?;
        Self::map_from_xml(document.root_element())
    }

    pub fn map_from_xml(schema: Node) -> Result<Self, XsdError> {
        if schema.tag_name().name() != Self::TAG_NAME {
            return Err(XsdError::UnexpectedElement(
                schema.tag_name().name().to_string(),
            ));
        }

        let target_namespace = attribute(schema, "targetNamespace")?;
        let element_form_default = attribute(schema, "elementFormDefault")?.unwrap_or_default();

        let mut namespaces = BTreeMap::new();
        let mut default_namespace = None;
        for namespace in schema.namespaces() {
            match namespace.name() {
                Some(prefix) => {
                    namespaces.insert(prefix.to_string(), namespace.uri().to_string());
                }
                None => default_namespace = Some(namespace.uri().to_string()),
            }
        }

        let mut imports = Sequence::new();
        let mut element_declarations = Set::new();
        let mut complex_type_definitions = Set::new();
        let mut simple_type_definitions = Set::new();

        for top_level_element in schema.children().filter(|e| e.is_element()) {
            match top_level_element.tag_name().name() {
                Import::TAG_NAME | Import::INCLUDE_TAG_NAME => {
                    imports.push(Import::map_from_xml(top_level_element, schema)?);
                }
                ElementDeclaration::TAG_NAME => {
                    element_declarations
                        .push(ElementDeclaration::map_from_xml_top_level(top_level_element)?);
                }
                ComplexTypeDefinition::TAG_NAME => {
                    complex_type_definitions
                        .push(ComplexTypeDefinition::map_from_xml(top_level_element)?);
                }
                "simpleType" => {
                    simple_type_definitions.push(required_attribute(
                        top_level_element,
                        "simpleType",
                        "name",
                    )?);
                }
                // These tags don't contribute to content models
                "annotation" | "attribute" | "attributeGroup" | "group" | "notation"
                | "redefine" | "override" | "defaultOpenContent" => {
                    debug!(
                        tag = top_level_element.tag_name().name(),
                        "ignoring top-level declaration"
                    );
                }
                other => return Err(XsdError::UnexpectedElement(other.to_string())),
            }
        }

        Ok(Self {
            location: None,
            target_namespace,
            element_form_default,
            namespaces,
            default_namespace,
            imports,
            element_declarations,
            complex_type_definitions,
            simple_type_definitions,
        })
    }

    /// Resolves a name written in this module to its expanded name.
    pub fn resolve(&self, reference: &Reference) -> Result<QName, XsdError> {
        let namespace_name = match reference.ns_prefix() {
            // The prefix xml is by definition bound to the namespace name
            // http://www.w3.org/XML/1998/namespace.
            // (Namespaces in XML 1.0, §3, Reserved Prefixes and Namespace Names)
            Some("xml") => Some(XML_NAMESPACE.to_string()),
            Some(prefix) => Some(
                self.namespaces
                    .get(prefix)
                    .cloned()
                    .ok_or_else(|| XsdError::NamePrefixNotResolved(prefix.into()))?,
            ),
            // Unprefixed QName values take the default namespace, if any
            None => self.default_namespace.clone(),
        };
        Ok(QName {
            namespace_name,
            local_name: reference.local_name.clone(),
        })
    }

    /// The prefix this module binds to `namespace`. `Ok(None)` means the namespace is only
    /// bound as the default namespace. When several prefixes are bound to the same namespace,
    /// the lexicographically smallest one is returned.
    pub fn prefix_for_namespace(&self, namespace: &str) -> Result<Option<&str>, XsdError> {
        if let Some((prefix, _)) = self.namespaces.iter().find(|(_, uri)| *uri == namespace) {
            return Ok(Some(prefix));
        }
        if self.default_namespace.as_deref() == Some(namespace) {
            return Ok(None);
        }
        Err(XsdError::NamespacePrefixUnknown {
            schema: self.target_namespace.clone(),
            namespace: namespace.to_string(),
        })
    }

    /// Whether this module `<import>`s the given namespace.
    pub fn imports_namespace(&self, namespace: Option<&str>) -> bool {
        self.imports
            .iter()
            .any(|i| i.kind == ImportKind::Import && i.namespace.as_deref() == namespace)
    }

    /// Expanded name of a top-level declaration named `name` in this module.
    pub fn top_level_name(&self, name: &str) -> QName {
        QName::with_optional_namespace(self.target_namespace.as_ref(), name)
    }
}
