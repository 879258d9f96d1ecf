//! Prescription scenario shared by the demo binary and its tests.

use labdesk_acquire::provider::mock::{CatalogSearch, RecordingSubmitter};
use labdesk_acquire::{
    submit, AcquireConfig, AcquireResult, AcquisitionWorkflow, ArtifactRef,
    EntityCreationBridge, FormState, LocalEntityProvider, Payload, PayloadAssembler,
    PayloadSchema,
};
use labdesk_model::{
    FormFields, SearchResultItem, SelectField, SelectionContext, SelectionFields, ValidationError,
};
use labdesk_types::SessionContext;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Medicines the in-memory search provider answers from.
pub fn demo_catalog() -> Vec<SearchResultItem> {
    let medicine = |key: &str, label: &str, kind: &str, dosage: &str| {
        SearchResultItem::new(key, label)
            .with_attribute("type", kind)
            .with_attribute("dosage", dosage)
    };
    vec![
        medicine("paracetamol-500", "Paracetamol 500mg", "tablet", "1-0-1"),
        medicine("paracetamol-syrup", "Paracetamol Syrup 120mg/5ml", "syrup", "5ml"),
        medicine("ibuprofen-400", "Ibuprofen 400mg", "tablet", "1-0-0"),
        medicine("cetirizine-10", "Cetirizine 10mg", "tablet", "0-0-1"),
        medicine("amoxicillin-500", "Amoxicillin 500mg", "capsule", "1-1-1"),
        medicine("ors", "ORS Sachet", "powder", "1 sachet"),
    ]
}

/// What to prescribe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Search text; the first hit is prescribed.
    pub query: String,
    /// Overlay fields written on the selected hit before commit.
    pub overrides: Vec<(String, String)>,
    /// Referrer created inline as `(name, phone)`.
    pub referrer: Option<(String, String)>,
    pub diagnosis: String,
}

impl Scenario {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            overrides: Vec::new(),
            referrer: None,
            diagnosis: "Viral fever".to_string(),
        }
    }
}

/// Result printed by the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub payload: Payload,
    pub artifact: ArtifactRef,
}

/// Searches, stages, commits, optionally creates a referrer, then assembles
/// and submits the prescription.
pub async fn run_scenario(
    ctx: &SessionContext,
    config: &AcquireConfig,
    scenario: &Scenario,
) -> AcquireResult<ScenarioOutcome> {
    if scenario.query.trim().is_empty() {
        return Err(ValidationError::MissingField("query".into()).into());
    }

    let provider = Arc::new(CatalogSearch::new(demo_catalog()));
    let mut medicines = AcquisitionWorkflow::new("medicines", ctx.clone(), provider, config);

    let mut rx = medicines.subscribe();
    let issued_before = rx.borrow().latest_token();
    medicines.set_query(&scenario.query);
    info!("Searching for {:?}", scenario.query);
    // Only errs once the sender is dropped, and `medicines` still owns it.
    let _ = rx
        .wait_for(|state| state.latest_token() > issued_before && !state.snapshot().busy)
        .await;

    let snapshot = medicines.search_snapshot();
    debug!("Search returned {} result(s)", snapshot.results.len());
    if let Some(hit) = snapshot.results.first() {
        let key = hit.key.clone();
        medicines.toggle(&key)?;
        for (field, value) in &scenario.overrides {
            medicines.set_override(&key, field.as_str(), value.as_str())?;
        }
    }
    medicines.commit()?;

    let mut selections = SelectionFields::new().with_field(SelectField::new("referrer"));
    if let Some((name, phone)) = &scenario.referrer {
        let mut bridge =
            EntityCreationBridge::new(ctx.clone(), Arc::new(LocalEntityProvider), config);
        bridge.open(SelectionContext::Referrer);
        bridge.submit(&referrer_fields(name, phone), &mut selections).await?;
    }

    let mut form = FormState::new().with_selections(selections);
    form.set_field("diagnosis", scenario.diagnosis.as_str());

    let schema = PayloadSchema::new()
        .require_field("diagnosis")
        .require_items("medicines");
    let payload = PayloadAssembler::new(schema).assemble(ctx, &form, &[medicines.collection()])?;

    let submitter = RecordingSubmitter::new();
    let artifact = submit(&submitter, ctx, &payload, config.request_timeout).await?;
    Ok(ScenarioOutcome { payload, artifact })
}

fn referrer_fields(name: &str, phone: &str) -> FormFields {
    let mut parts = name.split_whitespace();
    let mut fields = FormFields::new();
    if let Some(first) = parts.next() {
        fields.insert("first_name".into(), first.to_string());
    }
    let rest = parts.collect::<Vec<_>>().join(" ");
    if !rest.is_empty() {
        fields.insert("last_name".into(), rest);
    }
    fields.insert("phone".into(), phone.to_string());
    fields
}
