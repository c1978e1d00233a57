use std::fmt;

pub type NCName = String;
pub type AnyURI = String;

/// An expanded name: a namespace URI (or none) and a local name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub namespace_name: Option<AnyURI>,
    pub local_name: NCName,
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace_name) = self.namespace_name.as_ref() {
            write!(f, "{{{}}}:{}", namespace_name, self.local_name)
        } else {
            write!(f, "{}", self.local_name)
        }
    }
}

impl QName {
    pub fn with_namespace(
        namespace_name: impl Into<String>,
        local_name: impl Into<String>,
    ) -> Self {
        Self::with_optional_namespace(Some(namespace_name), local_name)
    }

    pub fn with_optional_namespace(
        namespace_name: Option<impl Into<String>>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace_name: namespace_name.map(Into::into),
            local_name: local_name.into(),
        }
    }
}

/// A name as written in a schema document, e.g. `tns:Foo` or `Foo`.
///
/// The prefix is only meaningful relative to the namespace bindings of the schema the reference
/// was written in; see [`Schema::resolve`](crate::Schema::resolve).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reference {
    pub prefix: Option<String>,
    pub local_name: NCName,
}

impl Reference {
    pub fn new(prefix: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.map(Into::into),
            local_name: local_name.into(),
        }
    }

    pub fn parse(source: &str) -> Self {
        match source.rsplit_once(':') {
            Some((prefix, local)) => Self::new(Some(prefix), local),
            None => Self::new(None::<String>, source),
        }
    }

    pub fn ns_prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix.as_deref() {
            Some(prefix) => write!(f, "{prefix}:{}", self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

pub type Sequence<T> = Vec<T>;
pub type Set<T> = Vec<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_splits_prefix() {
        let reference = Reference::parse("tns:Foo");
        assert_eq!(reference.ns_prefix(), Some("tns"));
        assert_eq!(reference.local_name, "Foo");
        assert_eq!(reference.to_string(), "tns:Foo");
    }

    #[test]
    fn reference_without_prefix() {
        let reference = Reference::parse("Foo");
        assert_eq!(reference.ns_prefix(), None);
        assert_eq!(reference.to_string(), "Foo");
    }

    #[test]
    fn qname_display() {
        assert_eq!(QName::with_namespace("urn:a", "b").to_string(), "{urn:a}:b");
        assert_eq!(QName::with_optional_namespace(None::<String>, "b").to_string(), "b");
    }
}
