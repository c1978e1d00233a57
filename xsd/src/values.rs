use crate::{error::XsdError, xstypes::Reference};
use roxmltree::Node;

/// Conversion of an attribute's normalized value to its actual value.
pub trait ActualValue<'a>: Sized {
    fn convert(src: &'a str, attribute: &'static str) -> Result<Self, XsdError>;
}

impl<'a> ActualValue<'a> for &'a str {
    fn convert(src: &'a str, _attribute: &'static str) -> Result<Self, XsdError> {
        Ok(src)
    }
}

impl ActualValue<'_> for String {
    fn convert(src: &'_ str, _attribute: &'static str) -> Result<Self, XsdError> {
        Ok(src.to_string())
    }
}

impl ActualValue<'_> for Reference {
    fn convert(src: &'_ str, _attribute: &'static str) -> Result<Self, XsdError> {
        Ok(Reference::parse(src))
    }
}

impl<'a, T: ActualValue<'a>> ActualValue<'a> for Vec<T> {
    fn convert(src: &'a str, attribute: &'static str) -> Result<Self, XsdError> {
        // NOTE: This assumes a list with whiteSpace="collapse"
        src.split_ascii_whitespace()
            .map(|a| ActualValue::convert(a, attribute))
            .collect()
    }
}

impl ActualValue<'_> for bool {
    fn convert(src: &str, attribute: &'static str) -> Result<Self, XsdError> {
        match src {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(invalid(attribute, src)),
        }
    }
}

impl ActualValue<'_> for u64 {
    fn convert(src: &str, attribute: &'static str) -> Result<Self, XsdError> {
        src.parse().map_err(|_| invalid(attribute, src))
    }
}

pub(crate) fn invalid(attribute: &'static str, value: &str) -> XsdError {
    XsdError::InvalidAttribute {
        attribute,
        value: value.to_string(),
    }
}

pub fn actual_value<'a, T: ActualValue<'a>>(
    x: &'a str,
    attribute: &'static str,
) -> Result<T, XsdError> {
    T::convert(normalized_value(x), attribute)
}

/// Shorthand for looking up an optional attribute and converting it to its actual value.
pub fn attribute<'a, T: ActualValue<'a>>(
    node: Node<'a, '_>,
    attribute: &'static str,
) -> Result<Option<T>, XsdError> {
    node.attribute(attribute)
        .map(|value| actual_value(value, attribute))
        .transpose()
}

/// Like [`attribute()`], but a missing attribute is an error.
pub fn required_attribute<'a, T: ActualValue<'a>>(
    node: Node<'a, '_>,
    element: &'static str,
    attribute_name: &'static str,
) -> Result<T, XsdError> {
    attribute(node, attribute_name)?.ok_or(XsdError::MissingAttribute {
        element,
        attribute: attribute_name,
    })
}

pub fn normalized_value(x: &str) -> &str {
    // Every attribute we read is a collapsed token or list of tokens
    x.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_booleans() {
        assert!(actual_value::<bool>("true", "abstract").unwrap());
        assert!(!actual_value::<bool>("0", "abstract").unwrap());
        assert!(matches!(
            actual_value::<bool>("yes", "abstract"),
            Err(XsdError::InvalidAttribute { attribute: "abstract", .. })
        ));
    }

    #[test]
    fn rejects_negative_counts() {
        assert!(actual_value::<u64>("-1", "minOccurs").is_err());
        assert_eq!(actual_value::<u64>(" 3 ", "minOccurs").unwrap(), 3);
    }

    #[test]
    fn splits_lists() {
        let refs = actual_value::<Vec<Reference>>("a:x  b:y", "substitutionGroup").unwrap();
        assert_eq!(refs, vec![Reference::parse("a:x"), Reference::parse("b:y")]);
    }
}
