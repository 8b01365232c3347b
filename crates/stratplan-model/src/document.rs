//! The canonical strategic-plan document.
//!
//! A [`Document`] has one branch per planning phase, addressed by
//! [`CanonicalKey`]. Branches are either structured objects or lists of
//! records; every list record carries a synthetic `id` (see [`ListRecord`]).
//! Cross references such as `objective_index` are positional and are never
//! bounds-checked.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::enums::{
    DependencyType, Direction, EngagementLevel, Frequency, Level, Perspective, Priority,
    RiskCategory, StakeholderCategory, Trend,
};
use crate::text::BilingualText;

// ---------------------------------------------------------------------------
// Canonical keys
// ---------------------------------------------------------------------------

/// Name of one branch of the [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalKey {
    Context,
    Vision,
    Stakeholders,
    Pestel,
    Swot,
    Scenarios,
    Risks,
    Dependencies,
    Objectives,
    NationalAlignment,
    Kpis,
    Actions,
    ResourcePlan,
    Timeline,
    Governance,
    CommunicationPlan,
    ChangeManagement,
}

impl CanonicalKey {
    /// Every key, in phase order.
    pub const ALL: [CanonicalKey; 17] = [
        Self::Context,
        Self::Vision,
        Self::Stakeholders,
        Self::Pestel,
        Self::Swot,
        Self::Scenarios,
        Self::Risks,
        Self::Dependencies,
        Self::Objectives,
        Self::NationalAlignment,
        Self::Kpis,
        Self::Actions,
        Self::ResourcePlan,
        Self::Timeline,
        Self::Governance,
        Self::CommunicationPlan,
        Self::ChangeManagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Vision => "vision",
            Self::Stakeholders => "stakeholders",
            Self::Pestel => "pestel",
            Self::Swot => "swot",
            Self::Scenarios => "scenarios",
            Self::Risks => "risks",
            Self::Dependencies => "dependencies",
            Self::Objectives => "objectives",
            Self::NationalAlignment => "national_alignment",
            Self::Kpis => "kpis",
            Self::Actions => "actions",
            Self::ResourcePlan => "resource_plan",
            Self::Timeline => "timeline",
            Self::Governance => "governance",
            Self::CommunicationPlan => "communication_plan",
            Self::ChangeManagement => "change_management",
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalKey {
    type Err = CanonicalKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CanonicalKeyParseError(s.to_owned()))
    }
}

/// Error returned when parsing an invalid [`CanonicalKey`] string.
#[derive(Debug, Clone)]
pub struct CanonicalKeyParseError(pub String);

impl fmt::Display for CanonicalKeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid canonical key: {:?}", self.0)
    }
}

impl std::error::Error for CanonicalKeyParseError {}

// ---------------------------------------------------------------------------
// List records
// ---------------------------------------------------------------------------

/// A list item carrying an engine-assigned synthetic identity.
pub trait ListRecord {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! list_records {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ListRecord for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )+
    };
}

list_records!(
    Statement,
    CoreValue,
    Theme,
    Stakeholder,
    PestelFactor,
    SwotItem,
    Risk,
    Dependency,
    Objective,
    AlignmentLink,
    Kpi,
    Action,
    BudgetItem,
    StaffingNeed,
    TimelinePhase,
    Milestone,
    GovernanceBody,
    CommunicationActivity,
    ResistancePoint,
    TrainingNeed,
);

/// A single bilingual statement in a simple list (challenges, key messages,
/// assumptions, quick wins, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statement {
    pub id: String,
    pub text: BilingualText,
}

/// One rung of an escalation path. `level` is 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationStep {
    pub level: u32,
    pub role: String,
    pub trigger: String,
}

// ---------------------------------------------------------------------------
// Branches: foundation
// ---------------------------------------------------------------------------

/// Phase 1: organizational context and planning horizon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextBranch {
    pub organization_name: BilingualText,
    pub sector: String,
    pub mandate: BilingualText,
    pub current_state: BilingualText,
    pub start_year: Option<i32>,
    /// Plan horizon; KPIs and milestones inherit it as their target year.
    pub end_year: Option<i32>,
    pub challenges: Vec<Statement>,
}

/// Phase 2: vision, mission, values, and strategic themes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionBranch {
    pub vision: BilingualText,
    pub mission: BilingualText,
    pub values: Vec<CoreValue>,
    pub strategic_themes: Vec<Theme>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreValue {
    pub id: String,
    pub name: BilingualText,
    pub description: BilingualText,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub id: String,
    pub name: BilingualText,
    pub description: BilingualText,
}

/// Phase 3 record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stakeholder {
    pub id: String,
    pub name: BilingualText,
    pub category: StakeholderCategory,
    pub influence: Level,
    pub interest: Level,
    pub engagement: EngagementLevel,
    pub expectations: BilingualText,
}

// ---------------------------------------------------------------------------
// Branches: analysis
// ---------------------------------------------------------------------------

/// Phase 4: six PESTEL categories, each an independent list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PestelBranch {
    pub political: Vec<PestelFactor>,
    pub economic: Vec<PestelFactor>,
    pub social: Vec<PestelFactor>,
    pub technological: Vec<PestelFactor>,
    pub environmental: Vec<PestelFactor>,
    pub legal: Vec<PestelFactor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PestelFactor {
    pub id: String,
    pub factor: BilingualText,
    pub impact: Level,
    pub trend: Trend,
}

/// Phase 5: four SWOT quadrants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwotBranch {
    pub strengths: Vec<SwotItem>,
    pub weaknesses: Vec<SwotItem>,
    pub opportunities: Vec<SwotItem>,
    pub threats: Vec<SwotItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwotItem {
    pub id: String,
    pub text: BilingualText,
    pub priority: Priority,
}

/// Phase 6: three named scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSet {
    pub best_case: Scenario,
    pub most_likely: Scenario,
    pub worst_case: Scenario,
}

impl ScenarioSet {
    /// Fallback probability of the best-case scenario.
    pub const BEST_CASE_PROBABILITY: u8 = 20;
    /// Fallback probability of the most-likely scenario.
    pub const MOST_LIKELY_PROBABILITY: u8 = 60;
    /// Fallback probability of the worst-case scenario.
    pub const WORST_CASE_PROBABILITY: u8 = 20;
}

impl Default for ScenarioSet {
    fn default() -> Self {
        Self {
            best_case: Scenario::with_probability(Self::BEST_CASE_PROBABILITY),
            most_likely: Scenario::with_probability(Self::MOST_LIKELY_PROBABILITY),
            worst_case: Scenario::with_probability(Self::WORST_CASE_PROBABILITY),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: BilingualText,
    pub narrative: BilingualText,
    /// Percentage in `0..=100`.
    pub probability: u8,
    pub assumptions: Vec<Statement>,
    pub implications: Vec<Statement>,
}

impl Scenario {
    pub fn with_probability(probability: u8) -> Self {
        Self {
            probability,
            ..Self::default()
        }
    }
}

/// Phase 7 record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Risk {
    pub id: String,
    pub title: BilingualText,
    pub description: BilingualText,
    pub category: RiskCategory,
    pub likelihood: Level,
    pub impact: Level,
    /// `likelihood.ordinal() * impact.ordinal()`, always derived.
    pub score: u8,
    pub mitigation: BilingualText,
    pub owner: String,
    pub escalation_path: Vec<EscalationStep>,
}

/// Phase 8 record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dependency {
    pub id: String,
    pub name: BilingualText,
    pub description: BilingualText,
    pub dependency_type: DependencyType,
    pub criticality: Level,
    pub owner: String,
    pub related_objective: Option<usize>,
}

// ---------------------------------------------------------------------------
// Branches: direction
// ---------------------------------------------------------------------------

/// Phase 9 record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Objective {
    pub id: String,
    pub title: BilingualText,
    pub description: BilingualText,
    pub perspective: Perspective,
    pub priority: Priority,
    /// Position in `vision.strategic_themes`.
    pub theme_index: Option<usize>,
    pub owner: String,
}

/// Phase 10 record: links an objective to a national goal or program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentLink {
    pub id: String,
    /// Position in `objectives`.
    pub objective_index: Option<usize>,
    pub national_goal: BilingualText,
    pub program: BilingualText,
    pub strength: Level,
    pub rationale: BilingualText,
}

/// Phase 11 record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kpi {
    pub id: String,
    pub name: BilingualText,
    pub objective_index: Option<usize>,
    pub unit: String,
    pub baseline_value: String,
    pub target_value: String,
    pub target_year: Option<i32>,
    pub frequency: Frequency,
    pub direction: Direction,
    pub data_source: String,
    pub owner: String,
}

/// Phase 12 record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    pub id: String,
    pub title: BilingualText,
    pub description: BilingualText,
    pub objective_index: Option<usize>,
    pub owner: String,
    pub priority: Priority,
    pub start_date: String,
    pub end_date: String,
    pub deliverables: Vec<Statement>,
}

// ---------------------------------------------------------------------------
// Branches: delivery
// ---------------------------------------------------------------------------

/// Phase 13: budget, staffing, and funding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePlan {
    pub summary: BilingualText,
    pub total_budget: String,
    pub currency: String,
    pub budget_items: Vec<BudgetItem>,
    pub staffing: Vec<StaffingNeed>,
    pub funding_sources: Vec<Statement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetItem {
    pub id: String,
    pub category: BilingualText,
    pub amount: String,
    pub year: Option<i32>,
    pub notes: BilingualText,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffingNeed {
    pub id: String,
    pub role: BilingualText,
    pub headcount: u32,
    pub skills: BilingualText,
}

/// Phase 14: implementation waves and milestones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeline {
    pub summary: BilingualText,
    pub phases: Vec<TimelinePhase>,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelinePhase {
    pub id: String,
    pub name: BilingualText,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub focus: BilingualText,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestone {
    pub id: String,
    pub title: BilingualText,
    pub target_year: Option<i32>,
    pub quarter: String,
    pub objective_index: Option<usize>,
}

/// Phase 15: governance bodies, cadence, and escalation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Governance {
    pub model: BilingualText,
    pub bodies: Vec<GovernanceBody>,
    pub review_cycle: Frequency,
    pub decision_rights: Vec<Statement>,
    pub escalation_path: Vec<EscalationStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceBody {
    pub id: String,
    pub name: BilingualText,
    pub mandate: BilingualText,
    pub chair: String,
    pub meeting_frequency: Frequency,
}

/// Phase 16: messages and channel activities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunicationPlan {
    pub objective: BilingualText,
    pub key_messages: Vec<Statement>,
    pub activities: Vec<CommunicationActivity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunicationActivity {
    pub id: String,
    pub audience: BilingualText,
    pub channel: String,
    pub message: BilingualText,
    pub frequency: Frequency,
    pub owner: String,
}

/// Phase 17: change approach, resistance, and training.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeManagement {
    pub approach: BilingualText,
    pub readiness: Level,
    pub resistance_points: Vec<ResistancePoint>,
    pub training: Vec<TrainingNeed>,
    pub quick_wins: Vec<Statement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResistancePoint {
    pub id: String,
    pub source: BilingualText,
    pub mitigation: BilingualText,
    pub likelihood: Level,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingNeed {
    pub id: String,
    pub topic: BilingualText,
    pub audience: BilingualText,
    pub timing: String,
}

// ---------------------------------------------------------------------------
// Branch values
// ---------------------------------------------------------------------------

/// The content of exactly one branch, tagged with its key.
///
/// This is the `update` half of a normalizer result and the unit the merge
/// engine replaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "snake_case")]
pub enum BranchValue {
    Context(ContextBranch),
    Vision(VisionBranch),
    Stakeholders(Vec<Stakeholder>),
    Pestel(PestelBranch),
    Swot(SwotBranch),
    Scenarios(ScenarioSet),
    Risks(Vec<Risk>),
    Dependencies(Vec<Dependency>),
    Objectives(Vec<Objective>),
    NationalAlignment(Vec<AlignmentLink>),
    Kpis(Vec<Kpi>),
    Actions(Vec<Action>),
    ResourcePlan(ResourcePlan),
    Timeline(Timeline),
    Governance(Governance),
    CommunicationPlan(CommunicationPlan),
    ChangeManagement(ChangeManagement),
}

impl BranchValue {
    /// The branch this value belongs to.
    pub fn key(&self) -> CanonicalKey {
        match self {
            Self::Context(_) => CanonicalKey::Context,
            Self::Vision(_) => CanonicalKey::Vision,
            Self::Stakeholders(_) => CanonicalKey::Stakeholders,
            Self::Pestel(_) => CanonicalKey::Pestel,
            Self::Swot(_) => CanonicalKey::Swot,
            Self::Scenarios(_) => CanonicalKey::Scenarios,
            Self::Risks(_) => CanonicalKey::Risks,
            Self::Dependencies(_) => CanonicalKey::Dependencies,
            Self::Objectives(_) => CanonicalKey::Objectives,
            Self::NationalAlignment(_) => CanonicalKey::NationalAlignment,
            Self::Kpis(_) => CanonicalKey::Kpis,
            Self::Actions(_) => CanonicalKey::Actions,
            Self::ResourcePlan(_) => CanonicalKey::ResourcePlan,
            Self::Timeline(_) => CanonicalKey::Timeline,
            Self::Governance(_) => CanonicalKey::Governance,
            Self::CommunicationPlan(_) => CanonicalKey::CommunicationPlan,
            Self::ChangeManagement(_) => CanonicalKey::ChangeManagement,
        }
    }

    /// Number of top-level records carried, for list-shaped branches and
    /// category maps. Object branches count as one.
    pub fn record_count(&self) -> usize {
        match self {
            Self::Stakeholders(v) => v.len(),
            Self::Risks(v) => v.len(),
            Self::Dependencies(v) => v.len(),
            Self::Objectives(v) => v.len(),
            Self::NationalAlignment(v) => v.len(),
            Self::Kpis(v) => v.len(),
            Self::Actions(v) => v.len(),
            Self::Pestel(p) => {
                p.political.len()
                    + p.economic.len()
                    + p.social.len()
                    + p.technological.len()
                    + p.environmental.len()
                    + p.legal.len()
            }
            Self::Swot(s) => {
                s.strengths.len() + s.weaknesses.len() + s.opportunities.len() + s.threats.len()
            }
            Self::Scenarios(_) => 3,
            Self::Context(_)
            | Self::Vision(_)
            | Self::ResourcePlan(_)
            | Self::Timeline(_)
            | Self::Governance(_)
            | Self::CommunicationPlan(_)
            | Self::ChangeManagement(_) => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Session-level metadata. Not a branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMeta {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Branches that have been applied at least once.
    pub completed: BTreeSet<CanonicalKey>,
}

/// The aggregate strategic plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub meta: DocumentMeta,
    pub context: ContextBranch,
    pub vision: VisionBranch,
    pub stakeholders: Vec<Stakeholder>,
    pub pestel: PestelBranch,
    pub swot: SwotBranch,
    pub scenarios: ScenarioSet,
    pub risks: Vec<Risk>,
    pub dependencies: Vec<Dependency>,
    pub objectives: Vec<Objective>,
    pub national_alignment: Vec<AlignmentLink>,
    pub kpis: Vec<Kpi>,
    pub actions: Vec<Action>,
    pub resource_plan: ResourcePlan,
    pub timeline: Timeline,
    pub governance: Governance,
    pub communication_plan: CommunicationPlan,
    pub change_management: ChangeManagement,
}

impl Document {
    /// Create an empty document for a new authoring session.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            meta: DocumentMeta {
                id: Uuid::new_v4(),
                title: title.into(),
                created_at: Utc::now(),
                completed: BTreeSet::new(),
            },
            ..Self::default()
        }
    }

    /// A copy of the branch named by `key`.
    pub fn branch(&self, key: CanonicalKey) -> BranchValue {
        match key {
            CanonicalKey::Context => BranchValue::Context(self.context.clone()),
            CanonicalKey::Vision => BranchValue::Vision(self.vision.clone()),
            CanonicalKey::Stakeholders => BranchValue::Stakeholders(self.stakeholders.clone()),
            CanonicalKey::Pestel => BranchValue::Pestel(self.pestel.clone()),
            CanonicalKey::Swot => BranchValue::Swot(self.swot.clone()),
            CanonicalKey::Scenarios => BranchValue::Scenarios(self.scenarios.clone()),
            CanonicalKey::Risks => BranchValue::Risks(self.risks.clone()),
            CanonicalKey::Dependencies => BranchValue::Dependencies(self.dependencies.clone()),
            CanonicalKey::Objectives => BranchValue::Objectives(self.objectives.clone()),
            CanonicalKey::NationalAlignment => {
                BranchValue::NationalAlignment(self.national_alignment.clone())
            }
            CanonicalKey::Kpis => BranchValue::Kpis(self.kpis.clone()),
            CanonicalKey::Actions => BranchValue::Actions(self.actions.clone()),
            CanonicalKey::ResourcePlan => BranchValue::ResourcePlan(self.resource_plan.clone()),
            CanonicalKey::Timeline => BranchValue::Timeline(self.timeline.clone()),
            CanonicalKey::Governance => BranchValue::Governance(self.governance.clone()),
            CanonicalKey::CommunicationPlan => {
                BranchValue::CommunicationPlan(self.communication_plan.clone())
            }
            CanonicalKey::ChangeManagement => {
                BranchValue::ChangeManagement(self.change_management.clone())
            }
        }
    }

    /// Whether the branch has been applied at least once.
    pub fn is_completed(&self, key: CanonicalKey) -> bool {
        self.meta.completed.contains(&key)
    }

    /// SHA-256 over the canonical JSON of every branch, hex-encoded.
    ///
    /// Metadata is excluded, so two documents with identical plan content
    /// share a fingerprint regardless of session id or completion state.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let mut hasher = Sha256::new();
        for key in CanonicalKey::ALL {
            hasher.update(key.as_str().as_bytes());
            hasher.update(serde_json::to_vec(&self.branch(key))?);
        }
        Ok(hex::encode(hasher.finalize()))
    }
}
