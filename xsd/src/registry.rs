use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use tracing::{info, warn};

use super::{
    complex_type_def::ComplexTypeDefinition,
    element_decl::ElementDeclaration,
    error::XsdError,
    import::{ImportError, ImportResolver},
    schema::{LoadOptions, Schema},
    xstypes::{NCName, QName},
};

/// Identifies a schema module within a [`SchemaRegistry`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(usize);

impl fmt::Debug for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<Schema #{}>", self.0)
    }
}

/// A member of a substitution group: the top-level element `name` declared in `schema`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Substitute {
    pub name: NCName,
    pub schema: SchemaId,
}

/// All loaded schema modules and the indices built over them.
///
/// The registry is filled with [`add()`](Self::add) (or [`load()`](Self::load)) and is only read
/// while content models are compiled.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: Vec<Schema>,
    element_declarations: HashMap<QName, (SchemaId, usize)>,
    complex_type_definitions: HashMap<QName, (SchemaId, usize)>,
    simple_type_definitions: HashSet<QName>,
    substitution_groups: HashMap<QName, Vec<Substitute>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the module at `entry` and, breadth-first, every module it imports or includes.
    /// Each canonical location is loaded once. Returns the registry and the entry module's id.
    pub fn load(
        entry: &str,
        resolver: &dyn ImportResolver,
        options: LoadOptions,
    ) -> Result<(Self, SchemaId), XsdError> {
        let mut registry = Self::new();
        let mut loaded = HashSet::new();
        let mut pending = VecDeque::from([(entry.to_string(), None::<String>)]);
        let mut entry_id = None;

        while let Some((location, base)) = pending.pop_front() {
            let source = resolver
                .resolve_import(&location, base.as_deref())
                .map_err(|source| XsdError::Import {
                    location: location.clone(),
                    source,
                })?;
            if !loaded.insert(source.location.clone()) {
                continue;
            }

            let mut schema = Schema::parse(&source.text, options)?;
            schema.location = Some(source.location.clone());
            for import in &schema.imports {
                // An import without a location only declares the dependency
                if let Some(schema_location) = &import.schema_location {
                    pending.push_back((schema_location.clone(), Some(source.location.clone())));
                }
            }

            info!(
                location = %source.location,
                target_namespace = schema.target_namespace.as_deref().unwrap_or(""),
                "loaded schema module"
            );
            let id = registry.add(schema)?;
            entry_id.get_or_insert(id);
        }

        match entry_id {
            Some(id) => Ok((registry, id)),
            // The entry location is always resolved first, so this only happens if it failed
            None => Err(XsdError::Import {
                location: entry.to_string(),
                source: ImportError::NotFound(entry.to_string()),
            }),
        }
    }

    /// Registers a module: its top-level declarations by expanded name, and its substitution
    /// group affiliations in registration order.
    pub fn add(&mut self, schema: Schema) -> Result<SchemaId, XsdError> {
        let id = SchemaId(self.schemas.len());

        // Nothing is indexed until every affiliation of the module has resolved
        let mut affiliations = Vec::new();
        for declaration in &schema.element_declarations {
            for head in &declaration.substitution_group {
                let substitute = Substitute {
                    name: declaration.name().to_string(),
                    schema: id,
                };
                affiliations.push((schema.resolve(head)?, substitute));
            }
        }
        for (head, substitute) in affiliations {
            self.substitution_groups
                .entry(head)
                .or_default()
                .push(substitute);
        }

        for (index, declaration) in schema.element_declarations.iter().enumerate() {
            let name = schema.top_level_name(declaration.name());
            if self.element_declarations.contains_key(&name) {
                warn!(%name, "duplicate top-level element declaration; keeping the first");
                continue;
            }
            self.element_declarations.insert(name, (id, index));
        }

        for (index, complex_type) in schema.complex_type_definitions.iter().enumerate() {
            let Some(name) = &complex_type.name else {
                continue;
            };
            let name = schema.top_level_name(name);
            if self.complex_type_definitions.contains_key(&name) {
                warn!(%name, "duplicate complex type definition; keeping the first");
                continue;
            }
            self.complex_type_definitions.insert(name, (id, index));
        }

        self.simple_type_definitions.extend(
            schema
                .simple_type_definitions
                .iter()
                .map(|name| schema.top_level_name(name)),
        );

        self.schemas.push(schema);
        Ok(id)
    }

    /// # Panics
    /// Panics if `id` was not handed out by this registry.
    pub fn schema(&self, id: SchemaId) -> &Schema {
        &self.schemas[id.0]
    }

    pub fn schemas(&self) -> impl Iterator<Item = (SchemaId, &Schema)> {
        self.schemas
            .iter()
            .enumerate()
            .map(|(index, schema)| (SchemaId(index), schema))
    }

    pub fn element_declaration(&self, name: &QName) -> Option<(SchemaId, &ElementDeclaration)> {
        self.element_declarations
            .get(name)
            .map(|&(id, index)| (id, &self.schema(id).element_declarations[index]))
    }

    pub fn complex_type_definition(
        &self,
        name: &QName,
    ) -> Option<(SchemaId, &ComplexTypeDefinition)> {
        self.complex_type_definitions
            .get(name)
            .map(|&(id, index)| (id, &self.schema(id).complex_type_definitions[index]))
    }

    pub fn is_simple_type(&self, name: &QName) -> bool {
        self.simple_type_definitions.contains(name)
    }

    /// The declared members of the substitution group headed by `head`, in registration order.
    /// Affiliation is not transitive here.
    pub fn substitutes(&self, head: &QName) -> &[Substitute] {
        self.substitution_groups
            .get(head)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `schema` imports the module with target namespace `namespace`.
    pub fn imports(&self, schema: SchemaId, namespace: Option<&str>) -> bool {
        self.schema(schema).imports_namespace(namespace)
    }

    /// The prefix `schema` binds to `namespace`; see [`Schema::prefix_for_namespace`].
    pub fn prefix_for_namespace(
        &self,
        schema: SchemaId,
        namespace: &str,
    ) -> Result<Option<&str>, XsdError> {
        self.schema(schema).prefix_for_namespace(namespace)
    }
}
