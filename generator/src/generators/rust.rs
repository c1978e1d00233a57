use std::collections::{HashMap, HashSet};

use syn::{__private::Span, parse_quote, Field, FieldMutability, Ident, Item, Type};

use xcm_xsd::{ContentModel, Element, ElementType, ParentContext, QName};

use super::common::{owner_name, ContentModelVisitor, GeneratorContext};

use check_keyword::CheckKeyword;
use heck::{ToPascalCase, ToSnakeCase};

#[derive(Default)]
struct RustVisitor {
    output_items: Vec<Item>,
    /// Struct name of every content model owner, claimed before any struct is emitted
    owner_type_names: HashMap<ParentContext, Ident>,
    simple_type_names: HashMap<QName, Ident>,
}

impl RustVisitor {
    fn new() -> Self {
        Self::default()
    }

    fn name_to_ident(name: &str) -> Ident {
        if name.is_empty() {
            Ident::new("_empty", Span::call_site())
        } else if name.starts_with(|c: char| c.is_ascii_digit()) {
            Ident::new(&format!("_{name}"), Span::call_site())
        } else if ["crate", "self", "super", "Self"].contains(&name) {
            // These are keywords that are not allowed as raw identifiers
            Ident::new(&format!("{}_", name), Span::call_site())
        } else if name.is_keyword() {
            Ident::new_raw(name, Span::call_site())
        } else {
            Ident::new(name, Span::call_site())
        }
    }

    /// Rust type for a built-in datatype. Types without a primitive counterpart are kept as
    /// their lexical value.
    fn builtin_type_name(name: &QName) -> &'static str {
        match name.local_name.as_str() {
            "boolean" => "bool",
            "double" => "f64",
            "float" => "f32",
            "long" => "i64",
            "int" => "i32",
            "short" => "i16",
            "byte" => "i8",
            "unsignedLong" => "u64",
            "unsignedInt" => "u32",
            "unsignedShort" => "u16",
            "unsignedByte" => "u8",
            _ => "String",
        }
    }

    fn owner_type_ident(&self, owner: ParentContext) -> Ident {
        match self.owner_type_names.get(&owner) {
            Some(ident) => ident.clone(),
            None => {
                let local_name = owner_name(&owner).map_or("", |name| name.local_name.as_str());
                Self::name_to_ident(&local_name.to_pascal_case())
            }
        }
    }

    /// Emits `pub type Name = String;` the first time a named simple type is used.
    fn simple_type_ident(&mut self, ctx: &mut GeneratorContext, name: &QName) -> Ident {
        if let Some(ident) = self.simple_type_names.get(name) {
            return ident.clone();
        }
        let ident =
            Self::name_to_ident(&ctx.claim_type_name(name.local_name.to_pascal_case()));
        self.output_items.push(parse_quote! {
            pub type #ident = String;
        });
        self.simple_type_names.insert(name.clone(), ident.clone());
        ident
    }

    fn element_type(&mut self, ctx: &mut GeneratorContext, element: &Element) -> Type {
        match &element.type_ {
            ElementType::Builtin(name) => {
                let name = Ident::new(Self::builtin_type_name(name), Span::call_site());
                parse_quote!(#name)
            }
            ElementType::Simple(name) => {
                let name = self.simple_type_ident(ctx, name);
                parse_quote!(#name)
            }
            ElementType::AnonymousSimple => parse_quote!(String),
            // TODO: box fields whose type refers back to an enclosing struct
            ElementType::Complex(name) => {
                let name = self.owner_type_ident(ParentContext::ComplexType(name.clone()));
                parse_quote!(#name)
            }
            ElementType::AnonymousComplex(name) => {
                let name = self.owner_type_ident(ParentContext::Element(name.clone()));
                parse_quote!(#name)
            }
            ElementType::Inline(members) => {
                let name = ctx.claim_type_name(element.name.local_name.to_pascal_case());
                let name = Self::name_to_ident(&name);
                let item = self.generate_struct(ctx, &name, members);
                self.output_items.push(item);
                parse_quote!(#name)
            }
        }
    }

    fn generate_struct(
        &mut self,
        ctx: &mut GeneratorContext,
        name: &Ident,
        members: &[Element],
    ) -> Item {
        let mut field_names = HashSet::new();
        let mut fields = Vec::with_capacity(members.len());
        for member in members {
            let (field_name, ty) = self.visit_element(ctx, member);

            // Members with the same local name from different namespaces
            let mut unique_name = field_name.clone();
            let mut suffix = 2;
            while !field_names.insert(unique_name.clone()) {
                unique_name = format!("{field_name}_{suffix}");
                suffix += 1;
            }

            fields.push(Field {
                attrs: vec![],
                vis: parse_quote!(pub),
                mutability: FieldMutability::None,
                ident: Some(Self::name_to_ident(&unique_name)),
                colon_token: Some(Default::default()),
                ty,
            });
        }

        parse_quote! {
            #[derive(Debug)]
            pub struct #name {
                #(#fields),*
            }
        }
    }
}

impl ContentModelVisitor for RustVisitor {
    type ContentModelValue = ();
    fn visit_content_model(&mut self, ctx: &mut GeneratorContext, model: &ContentModel) {
        let name = self.owner_type_ident(model.owner.clone());
        let item = self.generate_struct(ctx, &name, &model.members);
        self.output_items.push(item);
    }

    /// Field name and field type of a member.
    type ElementValue = (String, Type);
    fn visit_element(&mut self, ctx: &mut GeneratorContext, element: &Element) -> (String, Type) {
        let name = element.name.local_name.to_snake_case();
        let type_ = self.element_type(ctx, element);

        if element.is_repeated() {
            (format!("{}s", name), parse_quote!(Vec<#type_>))
        } else if element.is_optional() {
            (name, parse_quote!(Option<#type_>))
        } else {
            (name, type_)
        }
    }
}

pub fn generate(models: &[ContentModel]) -> String {
    let mut ctx = GeneratorContext::new();
    let mut visitor = RustVisitor::new();

    for model in models {
        let base = owner_name(&model.owner)
            .map_or_else(|| "Global".to_string(), |name| name.local_name.to_pascal_case());
        let name = RustVisitor::name_to_ident(&ctx.claim_type_name(base));
        visitor.owner_type_names.insert(model.owner.clone(), name);
    }

    for model in models {
        visitor.visit_content_model(&mut ctx, model);
    }

    let doc_comment = concat!(
        "Generated by ",
        env!("CARGO_PKG_NAME"),
        " ",
        env!("CARGO_PKG_VERSION")
    );
    let root = syn::File {
        shebang: None,
        attrs: vec![
            parse_quote!(#![doc = #doc_comment]),
            parse_quote!(#![allow(dead_code)]),
        ],
        items: visitor.output_items,
    };
    prettyplease::unparse(&root)
}
