//! Canonical document model for the strategic-plan authoring engine.
//!
//! - [`document`]: the [`Document`] aggregate, its seventeen branches, and
//!   [`BranchValue`], the unit of replacement.
//! - [`text`]: [`BilingualText`].
//! - [`enums`]: closed enumerations with documented defaults.

pub mod document;
pub mod enums;
pub mod text;

pub use document::{
    Action, AlignmentLink, BranchValue, BudgetItem, CanonicalKey, CanonicalKeyParseError,
    ChangeManagement, CommunicationActivity, CommunicationPlan, ContextBranch, CoreValue,
    Dependency, Document, DocumentMeta, EscalationStep, Governance, GovernanceBody, Kpi,
    ListRecord, Milestone, Objective, PestelBranch, PestelFactor, ResistancePoint, ResourcePlan,
    Risk, Scenario, ScenarioSet, StaffingNeed, Stakeholder, Statement, SwotBranch, SwotItem,
    Theme, Timeline, TimelinePhase, TrainingNeed, VisionBranch,
};
pub use enums::{
    DependencyType, Direction, EngagementLevel, Frequency, Level, Perspective, Priority,
    RiskCategory, StakeholderCategory, Trend,
};
pub use text::BilingualText;
