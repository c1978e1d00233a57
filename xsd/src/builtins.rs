use std::collections::HashSet;

use lazy_static::lazy_static;

use super::xstypes::QName;

pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

lazy_static! {
    /// The `xs:anyType` qualified name
    pub static ref XS_ANY_TYPE_NAME: QName = QName::with_namespace(XS_NAMESPACE, "anyType");

    /// Local names of the built-in datatypes (XSD 1.1 Part 2, §3) plus the two ur-types.
    static ref BUILTIN_TYPE_NAMES: HashSet<&'static str> = [
        "anyType",
        "anySimpleType",
        "anyAtomicType",
        "error",
        "string",
        "boolean",
        "decimal",
        "float",
        "double",
        "duration",
        "dateTime",
        "time",
        "date",
        "gYearMonth",
        "gYear",
        "gMonthDay",
        "gDay",
        "gMonth",
        "hexBinary",
        "base64Binary",
        "anyURI",
        "QName",
        "NOTATION",
        "normalizedString",
        "token",
        "language",
        "NMTOKEN",
        "NMTOKENS",
        "Name",
        "NCName",
        "ID",
        "IDREF",
        "IDREFS",
        "ENTITY",
        "ENTITIES",
        "integer",
        "nonPositiveInteger",
        "negativeInteger",
        "long",
        "int",
        "short",
        "byte",
        "nonNegativeInteger",
        "unsignedLong",
        "unsignedInt",
        "unsignedShort",
        "unsignedByte",
        "positiveInteger",
        "yearMonthDuration",
        "dayTimeDuration",
        "dateTimeStamp",
    ]
    .into_iter()
    .collect();
}

/// Returns `true` if `name` is one of the `xs:` built-in type definitions.
pub fn is_builtin_type(name: &QName) -> bool {
    name.namespace_name.as_deref() == Some(XS_NAMESPACE)
        && BUILTIN_TYPE_NAMES.contains(name.local_name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_builtins() {
        assert!(is_builtin_type(&QName::with_namespace(XS_NAMESPACE, "string")));
        assert!(is_builtin_type(&XS_ANY_TYPE_NAME));
        assert!(!is_builtin_type(&QName::with_namespace(XS_NAMESPACE, "strng")));
        assert!(!is_builtin_type(&QName::with_namespace("urn:other", "string")));
    }
}
