use thiserror::Error;

use super::{
    import::ImportError,
    xstypes::{QName, Reference},
};

#[derive(Debug, Error)]
pub enum XsdError {
    #[error("failed to resolve prefix {0:?} to a namespace URI")]
    NamePrefixNotResolved(String),
    #[error("schema with target namespace {schema:?} has no prefix bound to {namespace:?}")]
    NamespacePrefixUnknown {
        schema: Option<String>,
        namespace: String,
    },
    #[error("element reference {reference} ({name}) has no top-level declaration")]
    UnresolvedReference { reference: Reference, name: QName },
    #[error("type {0} is neither a built-in nor a declared type")]
    UnresolvedType(QName),
    #[error("<{element}> is missing the {attribute} attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("invalid value {value:?} for attribute {attribute}")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
    },
    #[error("<{0}> is not allowed here")]
    UnexpectedElement(String),
    #[error("import of namespace {0:?} matches the importing schema's target namespace")]
    ImportOfOwnNamespace(String),
    #[error("import without a namespace in a schema without a target namespace")]
    ImportWithoutNamespace,
    #[error("failed to parse schema document")]
    Xml(#[from] roxmltree::Error),
    #[error("failed to load schema {location:?}")]
    Import {
        location: String,
        #[source]
        source: ImportError,
    },
}
