//! Plain-text dump of compiled content models, one owner per block:
//!
//! ```text
//! Owner
//!   member: Type [min..max]
//! ```

use xcm_xsd::{ContentModel, Element, ElementType};

use super::common::{occurs_range, owner_name, ContentModelVisitor, GeneratorContext};

#[derive(Default)]
struct ListingVisitor {
    output: String,
    depth: usize,
}

impl ListingVisitor {
    fn type_label(type_: &ElementType) -> String {
        match type_ {
            ElementType::Builtin(name) => format!("xs:{}", name.local_name),
            ElementType::Simple(name) | ElementType::Complex(name) => name.to_string(),
            ElementType::AnonymousSimple => "(anonymous simple type)".into(),
            ElementType::AnonymousComplex(name) => format!("(anonymous type of {name})"),
            ElementType::Inline(_) => "(inline)".into(),
        }
    }
}

impl ContentModelVisitor for ListingVisitor {
    type ContentModelValue = ();
    fn visit_content_model(&mut self, ctx: &mut GeneratorContext, model: &ContentModel) {
        match owner_name(&model.owner) {
            Some(name) => self.output.push_str(&name.to_string()),
            None => self.output.push_str("(global)"),
        }
        self.output.push('\n');

        self.depth = 1;
        for member in &model.members {
            self.visit_element(ctx, member);
        }
    }

    type ElementValue = ();
    fn visit_element(&mut self, ctx: &mut GeneratorContext, element: &Element) {
        self.output.push_str(&format!(
            "{}{}: {} {}\n",
            "  ".repeat(self.depth),
            element.name,
            Self::type_label(&element.type_),
            occurs_range(element),
        ));

        if let ElementType::Inline(members) = &element.type_ {
            self.depth += 1;
            for member in members {
                self.visit_element(ctx, member);
            }
            self.depth -= 1;
        }
    }
}

pub fn generate(models: &[ContentModel]) -> String {
    let mut ctx = GeneratorContext::new();
    let mut visitor = ListingVisitor::default();
    for model in models {
        visitor.visit_content_model(&mut ctx, model);
    }
    visitor.output
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use xcm_xsd::{compile_content_models, LoadOptions, Schema, SchemaRegistry};

    use super::*;

    #[test]
    fn lists_members_with_types_and_occurs() {
        let xsd = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:complexType name="Order">
                <xs:sequence>
                  <xs:element name="note" type="xs:string" minOccurs="0"/>
                  <xs:element name="line" maxOccurs="unbounded">
                    <xs:complexType>
                      <xs:sequence><xs:element name="sku" type="xs:token"/></xs:sequence>
                    </xs:complexType>
                  </xs:element>
                </xs:sequence>
              </xs:complexType>
              <xs:complexType name="Shipment">
                <xs:choice>
                  <xs:element name="parcel" type="Order"/>
                  <xs:element name="letter">
                    <xs:simpleType><xs:restriction base="xs:string"/></xs:simpleType>
                  </xs:element>
                </xs:choice>
              </xs:complexType>
            </xs:schema>"#;
        let mut registry = SchemaRegistry::new();
        registry
            .add(Schema::parse(xsd, LoadOptions::default()).unwrap())
            .unwrap();
        let models = compile_content_models(&registry).unwrap();

        assert_eq!(
            generate(&models),
            "Order\n\
             \x20 line: (inline) [1..unbounded]\n\
             \x20   sku: xs:token [1..1]\n\
             \x20 note: xs:string [0..1]\n\
             Shipment\n\
             \x20 letter: (anonymous simple type) [0..1]\n\
             \x20 parcel: Order [0..1]\n"
        );
    }
}
