//! The [`Element`] node type and its closed [`ElementKind`] catalogue.
//!
//! Shaped after `interchange::model::{Element, ElementKind}` —
//! generalized to drop the relationship-shaped kinds (Membership, Import,
//! Specialization, ...) since this engine keeps relationships as a
//! separate record type (see [`crate::relationship`]) rather than nesting
//! them inside elements.

use crate::intern::Interned;

/// The metatype of a model element. A closed set of ~80 SysML v2 / KerML
/// node kinds; kind-specific attributes live flatly on [`Element`] with a
/// sentinel (`false`/`Direction::None`/absent string) standing in for
/// "not applicable," rather than one struct per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    // Namespaces and packages
    Namespace,
    Package,
    LibraryPackage,

    // KerML classifiers
    Class,
    DataType,
    Structure,
    Association,
    AssociationStructure,
    Interaction,
    Behavior,
    Function,
    Predicate,

    // Generic KerML classifiers
    Classifier,
    Type,

    // SysML definitions
    PartDef,
    ItemDef,
    ActionDef,
    PortDef,
    AttributeDef,
    ConnectionDef,
    InterfaceDef,
    AllocationDef,
    RequirementDef,
    ConstraintDef,
    StateDef,
    CalculationDef,
    UseCaseDef,
    AnalysisCaseDef,
    ConcernDef,
    ViewDef,
    ViewpointDef,
    RenderingDef,
    EnumerationDef,
    MetadataDef,

    // SysML usages
    PartUsage,
    ItemUsage,
    ActionUsage,
    PortUsage,
    AttributeUsage,
    ConnectionUsage,
    InterfaceUsage,
    AllocationUsage,
    RequirementUsage,
    ConstraintUsage,
    StateUsage,
    TransitionUsage,
    CalculationUsage,
    ReferenceUsage,
    OccurrenceUsage,
    FlowConnectionUsage,
    SuccessionFlowConnectionUsage,

    // KerML features
    Feature,
    Step,
    Expression,
    BooleanExpression,
    Invariant,
    Connector,
    BindingConnector,
    Succession,
    Flow,
    Parameter,

    // Multiplicity and literals
    MultiplicityRange,
    LiteralInteger,
    LiteralReal,
    LiteralInfinity,
    LiteralBoolean,
    LiteralString,
    NullExpression,

    // Expressions
    FeatureReferenceExpression,
    OperatorExpression,
    InvocationExpression,
    FeatureChainExpression,
    ConstructorExpression,

    // Comments and documentation
    Comment,
    Documentation,
    TextualRepresentation,

    // Annotations
    MetadataUsage,
    AnnotatingElement,
    Annotation,

    // Generic
    Metaclass,
    Other,
}

impl ElementKind {
    /// True for "Def"-suffixed SysML definitions and their KerML classifier
    /// counterparts — the type-like half of the definition/usage split.
    pub fn is_definition(&self) -> bool {
        matches!(
            self,
            Self::Package
                | Self::LibraryPackage
                | Self::Class
                | Self::DataType
                | Self::Structure
                | Self::Association
                | Self::AssociationStructure
                | Self::Interaction
                | Self::Behavior
                | Self::Function
                | Self::Predicate
                | Self::Classifier
                | Self::Type
                | Self::PartDef
                | Self::ItemDef
                | Self::ActionDef
                | Self::PortDef
                | Self::AttributeDef
                | Self::ConnectionDef
                | Self::InterfaceDef
                | Self::AllocationDef
                | Self::RequirementDef
                | Self::ConstraintDef
                | Self::StateDef
                | Self::CalculationDef
                | Self::UseCaseDef
                | Self::AnalysisCaseDef
                | Self::ConcernDef
                | Self::ViewDef
                | Self::ViewpointDef
                | Self::RenderingDef
                | Self::EnumerationDef
                | Self::MetadataDef
        )
    }

    /// True for "Usage"-suffixed SysML usages and KerML feature-shaped
    /// kinds — the instance-like half of the definition/usage split.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::PartUsage
                | Self::ItemUsage
                | Self::ActionUsage
                | Self::PortUsage
                | Self::AttributeUsage
                | Self::ConnectionUsage
                | Self::InterfaceUsage
                | Self::AllocationUsage
                | Self::RequirementUsage
                | Self::ConstraintUsage
                | Self::StateUsage
                | Self::TransitionUsage
                | Self::CalculationUsage
                | Self::ReferenceUsage
                | Self::OccurrenceUsage
                | Self::FlowConnectionUsage
                | Self::SuccessionFlowConnectionUsage
                | Self::Feature
                | Self::Step
                | Self::Expression
                | Self::BooleanExpression
                | Self::Invariant
                | Self::Parameter
        )
    }

    /// True for the kinds the validator treats as "the corresponding Def"
    /// of a usage kind (used to pair e.g. `PartUsage` with `PartDef`).
    pub fn matching_def(&self) -> Option<ElementKind> {
        Some(match self {
            Self::PartUsage => Self::PartDef,
            Self::ItemUsage => Self::ItemDef,
            Self::ActionUsage => Self::ActionDef,
            Self::PortUsage => Self::PortDef,
            Self::AttributeUsage => Self::AttributeDef,
            Self::ConnectionUsage => Self::ConnectionDef,
            Self::InterfaceUsage => Self::InterfaceDef,
            Self::AllocationUsage => Self::AllocationDef,
            Self::RequirementUsage => Self::RequirementDef,
            Self::ConstraintUsage => Self::ConstraintDef,
            Self::StateUsage => Self::StateDef,
            Self::CalculationUsage => Self::CalculationDef,
            _ => return None,
        })
    }
}

/// A usage's directionality (`in`/`out`/`inout`), or `None` when not
/// applicable to the element's kind. Modeled as its own variant rather than
/// folding "not applicable" into an `Option<Direction>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    None,
    In,
    Out,
    InOut,
}

/// A metadata-usage record — a `#Annotation` application, either attached
/// in an element's body (`metadata`) or as a prefix before its declaration
/// (`prefix_metadata`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataUsage {
    /// Qualified or unqualified name of the metadata definition applied.
    pub annotation: Interned,
}

/// Lexical trivia (comments, blank lines) preserved for round-trip writing.
/// Opaque to every component except the (external) text writer.
pub type Trivia = Vec<String>;

/// A byte/line/column range in a source file, for diagnostic reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceRange {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

/// An owned node representing any SysML/KerML construct.
///
/// `id` is globally unique within a [`crate::model::SemanticModel`]; every
/// other cross-reference field is an *unresolved* qualified-name string
/// until the validator or resolver looks it up.
#[derive(Clone, Debug)]
pub struct Element {
    pub id: Interned,
    pub name: Option<Interned>,
    pub kind: ElementKind,
    pub parent_id: Option<Interned>,

    pub typed_by: Vec<Interned>,
    pub specializes: Vec<Interned>,
    pub redefines: Vec<Interned>,
    pub references: Vec<Interned>,

    pub metadata: Vec<MetadataUsage>,
    pub prefix_metadata: Vec<MetadataUsage>,

    pub multiplicity_lower: Option<Interned>,
    pub multiplicity_upper: Option<Interned>,

    pub documentation: Option<String>,

    pub is_abstract: bool,
    pub is_readonly: bool,
    pub is_derived: bool,
    pub is_composite: bool,
    pub is_portion: bool,
    pub is_ref: bool,
    pub is_variation: bool,
    pub direction: Direction,

    pub leading_trivia: Trivia,
    pub trailing_trivia: Trivia,

    pub location: Option<SourceRange>,
}

impl Element {
    /// Construct a minimal element with every optional/flag field at its
    /// default ("not applicable") sentinel.
    pub fn new(id: impl Into<Interned>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind,
            parent_id: None,
            typed_by: Vec::new(),
            specializes: Vec::new(),
            redefines: Vec::new(),
            references: Vec::new(),
            metadata: Vec::new(),
            prefix_metadata: Vec::new(),
            multiplicity_lower: None,
            multiplicity_upper: None,
            documentation: None,
            is_abstract: false,
            is_readonly: false,
            is_derived: false,
            is_composite: false,
            is_portion: false,
            is_ref: false,
            is_variation: false,
            direction: Direction::None,
            leading_trivia: Vec::new(),
            trailing_trivia: Vec::new(),
            location: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<Interned>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<Interned>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// The local name — the last `::`-separated segment of `id` — falling
    /// back to `name` when `id` has no separator.
    pub fn local_name(&self) -> &str {
        match self.id.rfind("::") {
            Some(idx) => &self.id[idx + 2..],
            None => &self.id,
        }
    }
}
