//! Schema objects and their category-specific payloads

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::{Capability, PayloadShape};
use crate::error::SnapshotError;
use crate::schema::Column;

/// Columns of an object, keyed by column name
pub type Columns = BTreeMap<String, Column>;

/// Capability payload of a schema object
///
/// One variant per [`PayloadShape`]. Which variant an object may carry is
/// fixed by its category, see [`crate::ObjectCategory::shape`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ObjectPayload {
    /// Tables, views, materialized views
    Relation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
        #[serde(default, with = "column_list")]
        columns: Columns,
    },

    /// Indexes, constraints
    IndexLike {
        table_name: String,
        #[serde(default, with = "column_list")]
        columns: Columns,
    },

    /// Triggers, functions, procedures, packages
    Code {
        body_hash: String,
        definition: String,
    },

    /// Types, synonyms, sequences, directories
    Definition { definition: String },

    /// Editions, mining models, jobs
    DocumentedDefinition {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
        definition: String,
    },

    /// Index types, operators
    Documentation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },
}

impl ObjectPayload {
    /// Layout of this payload
    pub fn shape(&self) -> PayloadShape {
        match self {
            Self::Relation { .. } => PayloadShape::Relation,
            Self::IndexLike { .. } => PayloadShape::IndexLike,
            Self::Code { .. } => PayloadShape::Code,
            Self::Definition { .. } => PayloadShape::Definition,
            Self::DocumentedDefinition { .. } => PayloadShape::DocumentedDefinition,
            Self::Documentation { .. } => PayloadShape::Documentation,
        }
    }

    /// Whether this payload provides a capability
    pub fn has(&self, capability: Capability) -> bool {
        self.shape().capabilities().contains(&capability)
    }

    /// Comment, if the payload is documented
    ///
    /// The outer `Option` is the capability, the inner one the value.
    pub fn doc(&self) -> Option<&Option<String>> {
        match self {
            Self::Relation { doc, .. }
            | Self::DocumentedDefinition { doc, .. }
            | Self::Documentation { doc } => Some(doc),
            _ => None,
        }
    }

    /// Columns, if the payload is columned
    pub fn columns(&self) -> Option<&Columns> {
        match self {
            Self::Relation { columns, .. } | Self::IndexLike { columns, .. } => Some(columns),
            _ => None,
        }
    }

    /// Body digest of executable objects
    pub fn body_hash(&self) -> Option<&str> {
        match self {
            Self::Code { body_hash, .. } => Some(body_hash),
            _ => None,
        }
    }

    /// Declared definition of executable or defined objects
    pub fn definition(&self) -> Option<&str> {
        match self {
            Self::Code { definition, .. }
            | Self::Definition { definition }
            | Self::DocumentedDefinition { definition, .. } => Some(definition),
            _ => None,
        }
    }

    /// Owning table of index-like objects
    pub fn table_name(&self) -> Option<&str> {
        match self {
            Self::IndexLike { table_name, .. } => Some(table_name),
            _ => None,
        }
    }
}

/// A database object identified by its qualified name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaObject {
    /// Owner/schema qualified name, e.g. `HR.EMP`
    pub name: String,

    /// Category-specific payload
    #[serde(flatten)]
    pub payload: ObjectPayload,
}

impl SchemaObject {
    /// Create an object from an already built payload
    pub fn new(name: impl Into<String>, payload: ObjectPayload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Table, view or materialized view
    pub fn relation(
        name: impl Into<String>,
        doc: Option<String>,
        columns: impl IntoIterator<Item = Column>,
    ) -> Result<Self, SnapshotError> {
        let name = name.into();
        let columns = columns_by_name(&name, columns)?;
        Ok(Self::new(name, ObjectPayload::Relation { doc, columns }))
    }

    /// Index or constraint on `table_name`
    pub fn index_like(
        name: impl Into<String>,
        table_name: impl Into<String>,
        columns: impl IntoIterator<Item = Column>,
    ) -> Result<Self, SnapshotError> {
        let name = name.into();
        let columns = columns_by_name(&name, columns)?;
        Ok(Self::new(
            name,
            ObjectPayload::IndexLike {
                table_name: table_name.into(),
                columns,
            },
        ))
    }

    /// Executable object from an already computed body digest
    pub fn code(name: impl Into<String>, body_hash: impl Into<String>, definition: impl Into<String>) -> Self {
        Self::new(
            name,
            ObjectPayload::Code {
                body_hash: body_hash.into(),
                definition: definition.into(),
            },
        )
    }

    /// Executable object, hashing `body` on the way in
    pub fn code_from_body(name: impl Into<String>, body: &str, definition: impl Into<String>) -> Self {
        Self::code(name, crate::hash::hash_body(body), definition)
    }

    /// Object described by a single definition string
    pub fn defined(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self::new(
            name,
            ObjectPayload::Definition {
                definition: definition.into(),
            },
        )
    }

    /// Object with a comment and a definition string
    pub fn documented_definition(
        name: impl Into<String>,
        doc: Option<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            ObjectPayload::DocumentedDefinition {
                doc,
                definition: definition.into(),
            },
        )
    }

    /// Object carrying only a comment
    pub fn documented(name: impl Into<String>, doc: Option<String>) -> Self {
        Self::new(name, ObjectPayload::Documentation { doc })
    }
}

/// Key columns by name, rejecting duplicates
pub fn columns_by_name(
    object: &str,
    columns: impl IntoIterator<Item = Column>,
) -> Result<Columns, SnapshotError> {
    let mut by_name = Columns::new();
    for column in columns {
        if column.name.is_empty() {
            return Err(SnapshotError::EmptyColumnName {
                object: object.to_string(),
            });
        }
        if by_name.contains_key(&column.name) {
            return Err(SnapshotError::DuplicateColumn {
                object: object.to_string(),
                column: column.name,
            });
        }
        by_name.insert(column.name.clone(), column);
    }
    Ok(by_name)
}

/// Columns travel as a JSON list so a repeated name is an error, not an overwrite
mod column_list {
    use super::{Column, Columns};
    use serde::de::{Error, SeqAccess, Visitor};
    use serde::ser::SerializeSeq;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(columns: &Columns, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(columns.len()))?;
        for column in columns.values() {
            seq.serialize_element(column)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Columns, D::Error> {
        deserializer.deserialize_seq(ColumnListVisitor)
    }

    struct ColumnListVisitor;

    impl<'de> Visitor<'de> for ColumnListVisitor {
        type Value = Columns;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a list of columns")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Columns, A::Error> {
            let mut columns = Columns::new();
            while let Some(column) = seq.next_element::<Column>()? {
                if columns.contains_key(&column.name) {
                    return Err(A::Error::custom(format!("Duplicate column '{}'", column.name)));
                }
                columns.insert(column.name.clone(), column);
            }
            Ok(columns)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Nullability;

    #[test]
    fn relation_keys_columns() {
        let table = SchemaObject::relation(
            "HR.EMP",
            Some("employees".into()),
            vec![Column::new("ID", "NUMBER"), Column::new("NAME", "VARCHAR2")],
        )
        .unwrap();

        let columns = table.payload.columns().unwrap();
        assert_eq!(columns.keys().collect::<Vec<_>>(), vec!["ID", "NAME"]);
        assert_eq!(table.payload.doc(), Some(&Some("employees".to_string())));
        assert!(table.payload.body_hash().is_none());
    }

    #[test]
    fn duplicate_column_rejected() {
        let err = SchemaObject::relation(
            "HR.EMP",
            None,
            vec![Column::new("ID", "NUMBER"), Column::new("ID", "VARCHAR2")],
        )
        .unwrap_err();

        assert_eq!(
            err,
            SnapshotError::DuplicateColumn {
                object: "HR.EMP".into(),
                column: "ID".into(),
            }
        );
    }

    #[test]
    fn capability_accessors() {
        let trigger = SchemaObject::code_from_body("HR.TRG", "BEGIN NULL; END;", "BEFORE INSERT ON HR.EMP");
        assert!(trigger.payload.has(Capability::HashedBody));
        assert!(!trigger.payload.has(Capability::Documented));
        assert_eq!(trigger.payload.definition(), Some("BEFORE INSERT ON HR.EMP"));
        assert_eq!(trigger.payload.body_hash().map(str::len), Some(64));

        let index = SchemaObject::index_like(
            "HR.EMP_PK",
            "HR.EMP",
            vec![Column::new("ID", "NUMBER").with_nullability(Nullability::No)],
        )
        .unwrap();
        assert_eq!(index.payload.table_name(), Some("HR.EMP"));
        assert!(index.payload.doc().is_none());
    }

    #[test]
    fn serialized_with_shape_tag() {
        let synonym = SchemaObject::defined("PUBLIC.EMP", "HR.EMP");
        let json = serde_json::to_value(&synonym).unwrap();
        assert_eq!(json["shape"], "definition");
        assert_eq!(json["name"], "PUBLIC.EMP");
        assert_eq!(json["definition"], "HR.EMP");

        let parsed: SchemaObject = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, synonym);
    }

    #[test]
    fn columns_serialized_as_list() {
        let table = SchemaObject::relation(
            "HR.EMP",
            None,
            vec![Column::new("NAME", "VARCHAR2"), Column::new("ID", "NUMBER")],
        )
        .unwrap();

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["columns"][0]["name"], "ID");
        assert_eq!(json["columns"][1]["name"], "NAME");
        assert_eq!(serde_json::from_value::<SchemaObject>(json).unwrap(), table);
    }
}
