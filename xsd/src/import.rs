use std::collections::HashMap;
use std::path::{Path, PathBuf};

use roxmltree::Node;
use thiserror::Error;

use super::{
    error::XsdError,
    values::{actual_value, attribute},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImportKind {
    /// `<import>`: a module with a different target namespace
    Import,
    /// `<include>`: a module contributing to the same target namespace
    Include,
}

/// This structure represents the `import` and `include` elements; it is not a schema component.
///
/// Note that an import is allowed to have neither a `schemaLocation` nor a `namespace` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub kind: ImportKind,
    pub namespace: Option<String>,
    pub schema_location: Option<String>,
}

impl Import {
    pub const TAG_NAME: &'static str = "import";
    pub const INCLUDE_TAG_NAME: &'static str = "include";

    pub fn map_from_xml(import: Node, schema: Node) -> Result<Self, XsdError> {
        let kind = match import.tag_name().name() {
            Self::TAG_NAME => ImportKind::Import,
            Self::INCLUDE_TAG_NAME => ImportKind::Include,
            other => return Err(XsdError::UnexpectedElement(other.to_string())),
        };
        let namespace: Option<String> = attribute(import, "namespace")?;
        let schema_location = attribute(import, "schemaLocation")?;

        if kind == ImportKind::Import {
            let target_namespace = schema
                .attribute("targetNamespace")
                .map(|t| actual_value::<&str>(t, "targetNamespace"))
                .transpose()?;

            // § 4.2.6 Schema Representation Constraint: Import Constraints and Semantics
            match (namespace.as_deref(), target_namespace) {
                // 1.1 If the namespace [attribute] is present, then its ·actual value· does not
                //   match the ·actual value· of the enclosing <schema>'s targetNamespace.
                (Some(namespace), Some(target_namespace)) if namespace == target_namespace => {
                    return Err(XsdError::ImportOfOwnNamespace(namespace.to_string()));
                }
                // 1.2 If the namespace [attribute] is not present, then the enclosing <schema>
                //   has a targetNamespace [attribute]
                (None, None) => return Err(XsdError::ImportWithoutNamespace),
                _ => {}
            }
        }

        Ok(Import {
            kind,
            namespace,
            schema_location,
        })
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("the resolver does not support the import")]
    UnsupportedImport,
    #[error("no schema found at {0:?}")]
    NotFound(String),
    #[error("failed to read the schema")]
    Io(#[from] std::io::Error),
}

/// The text of a schema module together with the canonical location it was loaded from.
#[derive(Clone, Debug)]
pub struct SchemaSource {
    pub location: String,
    pub text: String,
}

pub trait ImportResolver {
    /// Loads the module at `location`, interpreted relative to the canonical location of the
    /// importing module (`base`), or as given for the entry module.
    fn resolve_import(&self, location: &str, base: Option<&str>)
        -> Result<SchemaSource, ImportError>;
}

/// Resolves schema locations as paths on the local filesystem.
#[derive(Copy, Clone, Debug, Default)]
pub struct FileImportResolver;

impl ImportResolver for FileImportResolver {
    fn resolve_import(
        &self,
        location: &str,
        base: Option<&str>,
    ) -> Result<SchemaSource, ImportError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            return Err(ImportError::UnsupportedImport);
        }
        let path = match base.and_then(|b| Path::new(b).parent()) {
            Some(dir) => dir.join(location),
            None => PathBuf::from(location),
        };
        let path = path.canonicalize().map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ImportError::NotFound(path.display().to_string()),
            _ => ImportError::Io(err),
        })?;
        let text = std::fs::read_to_string(&path)?;
        Ok(SchemaSource {
            location: path.display().to_string(),
            text,
        })
    }
}

/// Resolves schema locations against a fixed set of in-memory documents, keyed by location.
/// Locations are not interpreted relative to the importing module.
#[derive(Clone, Debug, Default)]
pub struct MemoryImportResolver {
    documents: HashMap<String, String>,
}

impl MemoryImportResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.insert(location.into(), text.into());
        self
    }
}

impl ImportResolver for MemoryImportResolver {
    fn resolve_import(
        &self,
        location: &str,
        _base: Option<&str>,
    ) -> Result<SchemaSource, ImportError> {
        self.documents
            .get(location)
            .map(|text| SchemaSource {
                location: location.to_string(),
                text: text.clone(),
            })
            .ok_or_else(|| ImportError::NotFound(location.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_import(xsd: &str) -> Result<Import, XsdError> {
        let doc = roxmltree::Document::parse(xsd).unwrap();
        let schema = doc.root_element();
        let import = schema.children().find(|c| c.is_element()).unwrap();
        Import::map_from_xml(import, schema)
    }

    #[test]
    fn maps_import() {
        let import = first_import(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:a">
                <xs:import namespace="urn:b" schemaLocation="b.xsd"/>
            </xs:schema>"#,
        )
        .unwrap();
        assert_eq!(
            import,
            Import {
                kind: ImportKind::Import,
                namespace: Some("urn:b".into()),
                schema_location: Some("b.xsd".into()),
            }
        );
    }

    #[test]
    fn rejects_import_of_own_namespace() {
        let result = first_import(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:a">
                <xs:import namespace="urn:a"/>
            </xs:schema>"#,
        );
        assert!(matches!(result, Err(XsdError::ImportOfOwnNamespace(ns)) if ns == "urn:a"));
    }

    #[test]
    fn rejects_namespaceless_import_without_target_namespace() {
        let result = first_import(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:import schemaLocation="b.xsd"/>
            </xs:schema>"#,
        );
        assert!(matches!(result, Err(XsdError::ImportWithoutNamespace)));
    }

    #[test]
    fn include_has_no_namespace_constraint() {
        let import = first_import(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:include schemaLocation="common.xsd"/>
            </xs:schema>"#,
        )
        .unwrap();
        assert_eq!(import.kind, ImportKind::Include);
    }

    #[test]
    fn memory_resolver_reports_missing_documents() {
        let resolver = MemoryImportResolver::new().with("a.xsd", "<schema/>");
        assert_eq!(resolver.resolve_import("a.xsd", None).unwrap().text, "<schema/>");
        assert!(matches!(
            resolver.resolve_import("b.xsd", Some("a.xsd")),
            Err(ImportError::NotFound(location)) if location == "b.xsd"
        ));
    }
}
