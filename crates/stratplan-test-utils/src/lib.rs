//! Shared fixtures for stratplan integration tests.
//!
//! - [`sample_document`]: a document with a completed context branch and a
//!   plan horizon of 2030.
//! - [`raw_reply`]: a realistic reply for every phase, deliberately mixing
//!   current field names, legacy aliases, and loose shapes.
//! - [`FixedGenerator`] / [`FailingGenerator`]: [`Generator`] doubles.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};
use stratplan_core::{GenerationError, Generator, PhaseId};
use stratplan_model::{BilingualText, CanonicalKey, Document};

/// Plan horizon used by [`sample_document`].
pub const SAMPLE_END_YEAR: i32 = 2030;

/// A fresh document whose context branch is filled in.
pub fn sample_document() -> Document {
    let mut doc = Document::new("Digital Government Strategy");
    doc.context.organization_name =
        BilingualText::new("Digital Government Authority", "هيئة الحكومة الرقمية");
    doc.context.sector = "Public sector".to_string();
    doc.context.mandate = BilingualText::en("Lead the digital transformation of government");
    doc.context.start_year = Some(2025);
    doc.context.end_year = Some(SAMPLE_END_YEAR);
    doc.meta.completed.insert(CanonicalKey::Context);
    doc
}

/// A canned reply for `phase`.
pub fn raw_reply(phase: PhaseId) -> Value {
    match phase {
        PhaseId::Context => json!({
            "organization_name": {"en": "Digital Government Authority", "ar": "هيئة الحكومة الرقمية"},
            "sector": "Public sector",
            "mandate_en": "Lead the digital transformation of government",
            "start_year": 2025,
            "end_year": "2030",
            "challenges": ["Fragmented systems", {"text_en": "Skills shortage", "text_ar": "نقص المهارات"}],
        }),
        PhaseId::Vision => json!({
            "vision": {"en": "A seamless digital government", "ar": "حكومة رقمية متكاملة"},
            "mission": "Deliver simple, secure digital services",
            "core_values": ["Integrity", {"name": "Innovation", "description": "We try new things"}],
            "suggested_themes": [
                {"name_en": "Digital services", "name_ar": "الخدمات الرقمية"},
                "Data-driven decisions",
                "Capable workforce",
            ],
        }),
        PhaseId::Stakeholders => json!({
            "stakeholders": [
                {"name": "Citizens", "category": "community", "influence": "medium", "interest": "high", "engagement": "involve"},
                {"name": {"en": "Ministry of Finance", "ar": "وزارة المالية"}, "category": "government", "influence": "high"},
                "Technology vendors",
            ]
        }),
        PhaseId::Pestel => json!({
            "political": ["Government-wide digital mandate"],
            "economic": [{"factor": "Budget pressure", "impact": "high", "trend": "rising"}],
            "social": "High smartphone penetration; Young population",
            "technology": [{"factor_en": "Cloud adoption", "impact": "high", "trend": "up"}],
            "environment": [{"factor": "Water scarcity", "impact": "medium", "trend": "stable"}],
            "legal": [{"factor": "Personal data protection law", "impact": "medium"}],
        }),
        PhaseId::Swot => json!({
            "strengths": ["Strong leadership support"],
            "weaknesses": [{"text": "Legacy systems", "priority": "high"}],
            "opportunity": "Shared cloud platform; Open data",
            "threats": [{"text": {"en": "Cyber attacks", "ar": "الهجمات السيبرانية"}, "priority": "urgent"}],
        }),
        PhaseId::Scenarios => json!({
            "optimistic": {"name": "Leapfrog", "narrative": "Rapid adoption", "probability": "25%",
                           "assumptions": ["Funding secured"]},
            "most_likely": {"name": "Steady progress", "probability": 55},
            "pessimistic": {"name": "Stall", "probability": "abc", "implications": "Delays; Cost overruns"},
        }),
        PhaseId::Risks => json!({
            "risks": [
                {"title": "Budget cuts", "category": "financial", "likelihood": "high", "impact": "high",
                 "score": 1, "owner": "CFO", "escalation_path": "PMO; Steering committee; Minister"},
                {"risk": "Vendor lock-in", "likelihood": "medium", "impact": "low",
                 "escalation": ["Procurement lead", "CIO"]},
            ]
        }),
        PhaseId::Dependencies => json!({
            "dependencies": [
                {"name": "National ID platform", "type": "external", "criticality": "high", "related_objective": 0},
                {"dependency": "Cloud procurement framework", "type": "regulatory", "objective_number": 2},
            ]
        }),
        PhaseId::Objectives => json!({
            "objectives": [
                {"title": "Digitize all public services", "perspective": "customer", "priority": "critical", "theme_index": 0},
                {"title": "Build a shared data platform", "perspective": "internal process", "theme_index": "1"},
                {"objective": "Upskill civil servants", "perspective": "learning and growth", "theme_number": 3},
            ]
        }),
        PhaseId::NationalAlignment => json!({
            "alignments": [
                {"objective_index": 0, "national_goal": "Vision 2030: effective government", "strength": "high"},
                {"objective_number": 2, "goal": "Data economy", "program": "National Data Program"},
            ]
        }),
        PhaseId::Kpis => json!({
            "kpis": [
                {"name_en": "Service digitization rate", "baseline": "10", "target": "80", "unit": "%"},
                {"name": "Citizen satisfaction", "baseline_value": 62, "target_value": 85.5,
                 "target_year": 2028, "frequency": "semi annual"},
            ]
        }),
        PhaseId::Actions => json!({
            "initiatives": [
                {"title": "Launch unified services portal", "objective_index": 0, "owner": "CDO",
                 "start_date": "2025-Q2", "end_date": "2026-Q4", "deliverables": ["Portal MVP", "Mobile app"]},
                {"title": "Run digital skills academy", "deliverables": "Curriculum; First cohort"},
            ]
        }),
        PhaseId::ResourcePlan => json!({
            "summary": "Five-year investment programme",
            "total_budget": 450000000,
            "currency": "SAR",
            "budget_items": [{"category": "Platforms", "amount": 200000000, "year": 2026}],
            "staffing": [{"role": "Data engineer", "headcount": 12}, "Product manager"],
            "funding_sources": "Government budget; Public-private partnership",
        }),
        PhaseId::Timeline => json!({
            "phases": [
                {"name": "Foundation", "start_year": 2025, "end_year": 2026},
                {"name": "Scale", "start": "2027", "end": "2028"},
            ],
            "milestones": [
                {"title": "Portal live", "year": 2026, "quarter": "q4"},
                {"milestone": "All services digital"},
            ],
        }),
        PhaseId::Governance => json!({
            "model": "Steering committee with a central PMO",
            "committees": [
                {"name": "Digital Steering Committee", "chair": "Minister", "meeting_frequency": "monthly"},
            ],
            "review_cycle": "quarterly",
            "decision_rights": ["Budget reallocation above 5%"],
            "escalation": "PMO -> Steering Committee -> Council of Ministers",
        }),
        PhaseId::CommunicationPlan => json!({
            "objective": {"en": "Build awareness and adoption", "ar": "بناء الوعي والتبني"},
            "messages": ["Services in one place", "Secure by design"],
            "activities": [
                {"audience": "Citizens", "channel": "Social media", "frequency": "weekly"},
                {"audience": "Employees", "channel": "Town hall", "frequency": "quarterly", "owner": "HR"},
            ],
        }),
        PhaseId::ChangeManagement => json!({
            "approach": "ADKAR",
            "readiness": "medium",
            "resistance_points": [{"source": "Middle management", "mitigation": "Coaching", "likelihood": "high"}],
            "training": ["Data literacy", {"topic": "Agile delivery", "timing": "2025-Q3"}],
            "quick_wins": ["Digital signatures", "Online appointment booking"],
        }),
    }
}

// ---------------------------------------------------------------------------
// Generator doubles
// ---------------------------------------------------------------------------

/// Returns the same reply for every call and records the prompts it saw.
#[derive(Debug)]
pub struct FixedGenerator {
    reply: Value,
    prompts: Mutex<Vec<String>>,
}

impl FixedGenerator {
    pub fn new(reply: Value) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A generator replying with [`raw_reply`] for `phase`.
    pub fn for_phase(phase: PhaseId) -> Self {
        Self::new(raw_reply(phase))
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }
}

#[async_trait]
impl Generator for FixedGenerator {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn generate(&self, prompt: &str, _schema: &Value) -> Result<Value, GenerationError> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Always fails as if the service were down.
#[derive(Debug, Default)]
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &str, _schema: &Value) -> Result<Value, GenerationError> {
        Err(GenerationError::Unavailable {
            generator: self.name().to_string(),
            reason: "service unavailable".to_string(),
        })
    }
}
