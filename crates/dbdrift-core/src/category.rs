//! Object categories and the fixed category → capability table
//!
//! The declaration order of [`ObjectCategory`] is the canonical report order.
//! Do not reorder variants: `Ord` is derived from it.

use serde::{Deserialize, Serialize};

/// Category of a schema object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectCategory {
    Tables,
    Views,
    MaterializedViews,
    Editions,
    MiningModels,
    Indextypes,
    Operators,
    Triggers,
    Indexes,
    Constraints,
    Sequences,
    Synonyms,
    Functions,
    Procedures,
    Packages,
    Types,
    Jobs,
    Directories,
}

impl ObjectCategory {
    /// Every category in canonical order
    pub const ALL: [ObjectCategory; 18] = [
        Self::Tables,
        Self::Views,
        Self::MaterializedViews,
        Self::Editions,
        Self::MiningModels,
        Self::Indextypes,
        Self::Operators,
        Self::Triggers,
        Self::Indexes,
        Self::Constraints,
        Self::Sequences,
        Self::Synonyms,
        Self::Functions,
        Self::Procedures,
        Self::Packages,
        Self::Types,
        Self::Jobs,
        Self::Directories,
    ];

    /// Stable identifier, identical to the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tables => "tables",
            Self::Views => "views",
            Self::MaterializedViews => "materialized_views",
            Self::Editions => "editions",
            Self::MiningModels => "mining_models",
            Self::Indextypes => "indextypes",
            Self::Operators => "operators",
            Self::Triggers => "triggers",
            Self::Indexes => "indexes",
            Self::Constraints => "constraints",
            Self::Sequences => "sequences",
            Self::Synonyms => "synonyms",
            Self::Functions => "functions",
            Self::Procedures => "procedures",
            Self::Packages => "packages",
            Self::Types => "types",
            Self::Jobs => "jobs",
            Self::Directories => "directories",
        }
    }

    /// Human readable title used by renderers
    pub fn title(&self) -> &'static str {
        match self {
            Self::Tables => "Tables",
            Self::Views => "Views",
            Self::MaterializedViews => "Materialized Views",
            Self::Editions => "Editions",
            Self::MiningModels => "Mining Models",
            Self::Indextypes => "Index Types",
            Self::Operators => "Operators",
            Self::Triggers => "Triggers",
            Self::Indexes => "Indexes",
            Self::Constraints => "Constraints",
            Self::Sequences => "Sequences",
            Self::Synonyms => "Synonyms",
            Self::Functions => "Functions",
            Self::Procedures => "Procedures",
            Self::Packages => "Packages",
            Self::Types => "Types",
            Self::Jobs => "Jobs",
            Self::Directories => "Directories",
        }
    }

    /// Payload shape every object of this category must carry
    pub fn shape(&self) -> PayloadShape {
        match self {
            Self::Tables | Self::Views | Self::MaterializedViews => PayloadShape::Relation,
            Self::Indexes | Self::Constraints => PayloadShape::IndexLike,
            Self::Triggers | Self::Functions | Self::Procedures | Self::Packages => PayloadShape::Code,
            Self::Types | Self::Synonyms | Self::Sequences | Self::Directories => PayloadShape::Definition,
            Self::Editions | Self::MiningModels | Self::Jobs => PayloadShape::DocumentedDefinition,
            Self::Indextypes | Self::Operators => PayloadShape::Documentation,
        }
    }

    /// Capability set carried by objects of this category
    pub fn capabilities(&self) -> &'static [Capability] {
        self.shape().capabilities()
    }
}

impl std::fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ObjectCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown object category '{}'", s))
    }
}

/// A single payload capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Free-text comment
    Documented,

    /// Named columns
    Columned,

    /// Content hash of an executable body plus its declared definition
    HashedBody,

    /// A single definition string
    Defined,

    /// Owning table of an index-like object
    TableBound,
}

/// Closed set of payload layouts, one per capability combination in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    Relation,
    IndexLike,
    Code,
    Definition,
    DocumentedDefinition,
    Documentation,
}

impl PayloadShape {
    /// Capabilities provided by this shape
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Self::Relation => &[Capability::Documented, Capability::Columned],
            Self::IndexLike => &[Capability::Columned, Capability::TableBound],
            Self::Code => &[Capability::HashedBody],
            Self::Definition => &[Capability::Defined],
            Self::DocumentedDefinition => &[Capability::Documented, Capability::Defined],
            Self::Documentation => &[Capability::Documented],
        }
    }
}

impl std::fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Relation => write!(f, "relation"),
            Self::IndexLike => write!(f, "index_like"),
            Self::Code => write!(f, "code"),
            Self::Definition => write!(f, "definition"),
            Self::DocumentedDefinition => write!(f, "documented_definition"),
            Self::Documentation => write!(f, "documentation"),
        }
    }
}
