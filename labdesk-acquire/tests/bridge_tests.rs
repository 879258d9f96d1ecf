use async_trait::async_trait;
use labdesk_acquire::provider::mock::RejectingEntityProvider;
use labdesk_acquire::{
    AcquireConfig, AcquireError, EntityCreationBridge, EntityCreationProvider,
    LocalEntityProvider, ProviderError,
};
use labdesk_model::{
    FormFields, ReferencedEntityOption, SelectField, SelectionContext, SelectionFields,
    ValidationError,
};
use labdesk_types::{OptionId, SessionContext};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn session() -> SessionContext {
    SessionContext::new("org-1", "reception-2").with_center("center-7")
}

fn bridge(provider: Arc<dyn EntityCreationProvider>) -> EntityCreationBridge {
    EntityCreationBridge::new(session(), provider, &AcquireConfig::default())
}

fn form_selections() -> SelectionFields {
    let existing = ReferencedEntityOption::new(OptionId::new(), "Dr. Iyer");
    SelectionFields::new()
        .with_field(SelectField::new("referrer").with_options([existing]))
        .with_field(SelectField::new("collection_agent"))
        .with_field(SelectField::new("department"))
}

fn fields(pairs: &[(&str, &str)]) -> FormFields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn valid_referrer() -> FormFields {
    fields(&[
        ("title", "Dr."),
        ("first_name", "Asha"),
        ("last_name", "Menon"),
        ("phone", "+91 98450 12345"),
    ])
}

/// Never answers.
struct HangingProvider;

#[async_trait]
impl EntityCreationProvider for HangingProvider {
    async fn create_entity(
        &self,
        _ctx: &SessionContext,
        _context: &SelectionContext,
        _fields: &FormFields,
    ) -> Result<OptionId, ProviderError> {
        std::future::pending().await
    }
}

struct UnavailableProvider;

#[async_trait]
impl EntityCreationProvider for UnavailableProvider {
    async fn create_entity(
        &self,
        _ctx: &SessionContext,
        _context: &SelectionContext,
        _fields: &FormFields,
    ) -> Result<OptionId, ProviderError> {
        Err(ProviderError::Unavailable("directory offline".into()))
    }
}

// ── Surface lifecycle ────────────────────────────────────────────

#[test]
fn bridge_starts_closed() {
    let bridge = bridge(Arc::new(LocalEntityProvider));
    assert!(!bridge.is_open());
    assert!(bridge.active_context().is_none());
    assert!(bridge.error().is_none());
}

#[test]
fn open_and_close() {
    let mut bridge = bridge(Arc::new(LocalEntityProvider));
    bridge.open(SelectionContext::Referrer);
    assert!(bridge.is_open());
    assert_eq!(bridge.active_context(), Some(&SelectionContext::Referrer));

    bridge.open(SelectionContext::CollectionAgent);
    assert_eq!(bridge.active_context(), Some(&SelectionContext::CollectionAgent));

    bridge.close();
    assert!(!bridge.is_open());
}

#[tokio::test]
async fn submit_without_open_surface_fails() {
    let mut bridge = bridge(Arc::new(LocalEntityProvider));
    let mut selections = form_selections();
    let before = selections.clone();

    let err = assert_err!(bridge.submit(&valid_referrer(), &mut selections).await);
    assert!(matches!(
        err,
        AcquireError::Validation(ValidationError::NoActiveContext)
    ));
    assert_eq!(selections, before);
}

// ── Success ──────────────────────────────────────────────────────

#[tokio::test]
async fn referrer_is_created_and_selected() {
    let mut bridge = bridge(Arc::new(LocalEntityProvider));
    let mut selections = form_selections();
    bridge.open(SelectionContext::Referrer);

    let option = assert_ok!(bridge.submit(&valid_referrer(), &mut selections).await);

    assert_eq!(option.label, "Dr. Asha Menon");
    let referrer = selections.field("referrer").unwrap();
    assert_eq!(referrer.options().len(), 2);
    assert_eq!(referrer.options().last(), Some(&option));
    assert_eq!(referrer.value(), Some(option.id));
    assert_eq!(referrer.selected_option(), Some(&option));
    assert!(!bridge.is_open());
}

#[tokio::test]
async fn referrer_label_skips_blank_parts() {
    let mut bridge = bridge(Arc::new(LocalEntityProvider));
    let mut selections = form_selections();
    bridge.open(SelectionContext::Referrer);

    let input = fields(&[("title", "  "), ("first_name", "Ravi"), ("phone", "9845012345")]);
    let option = assert_ok!(bridge.submit(&input, &mut selections).await);
    assert_eq!(option.label, "Ravi");
}

#[tokio::test]
async fn collection_agent_goes_to_its_own_field() {
    let mut bridge = bridge(Arc::new(LocalEntityProvider));
    let mut selections = form_selections();
    bridge.open(SelectionContext::CollectionAgent);

    let input = fields(&[("name", "Suresh K"), ("phone", "080-2345-6789")]);
    let option = assert_ok!(bridge.submit(&input, &mut selections).await);

    assert_eq!(option.label, "Suresh K");
    assert_eq!(
        selections.field("collection_agent").unwrap().value(),
        Some(option.id)
    );
    assert_eq!(selections.field("referrer").unwrap().options().len(), 1);
    assert!(selections.field("referrer").unwrap().value().is_none());
}

#[tokio::test]
async fn catalog_link_label_includes_code() {
    let mut bridge = bridge(Arc::new(LocalEntityProvider));
    let mut selections = form_selections();
    bridge.open(SelectionContext::GenericCatalogLink {
        catalog: "department".into(),
    });

    let input = fields(&[("name", "Pathology"), ("code", "PATH")]);
    let option = assert_ok!(bridge.submit(&input, &mut selections).await);

    assert_eq!(option.label, "Pathology (PATH)");
    assert_eq!(selections.field("department").unwrap().value(), Some(option.id));
}

// ── Failure ──────────────────────────────────────────────────────

#[tokio::test]
async fn missing_required_field_stays_open() {
    let mut bridge = bridge(Arc::new(LocalEntityProvider));
    let mut selections = form_selections();
    let before = selections.clone();
    bridge.open(SelectionContext::Referrer);

    let input = fields(&[("first_name", "Asha")]);
    let err = assert_err!(bridge.submit(&input, &mut selections).await);

    assert!(matches!(
        err,
        AcquireError::Validation(ValidationError::MissingField(ref f)) if f == "phone"
    ));
    assert!(bridge.is_open());
    assert!(bridge.error().unwrap().contains("phone"));
    assert_eq!(selections, before);
}

#[tokio::test]
async fn malformed_email_stays_open() {
    let mut bridge = bridge(Arc::new(LocalEntityProvider));
    let mut selections = form_selections();
    let before = selections.clone();
    bridge.open(SelectionContext::Referrer);

    let mut input = valid_referrer();
    input.insert("email".into(), "asha-at-clinic".into());
    let err = assert_err!(bridge.submit(&input, &mut selections).await);

    assert!(matches!(
        err,
        AcquireError::Validation(ValidationError::Malformed { ref field, .. }) if field == "email"
    ));
    assert!(bridge.is_open());
    assert_eq!(selections, before);
}

#[tokio::test]
async fn provider_rejection_stays_open() {
    let mut bridge = bridge(Arc::new(RejectingEntityProvider::new("duplicate phone")));
    let mut selections = form_selections();
    let before = selections.clone();
    bridge.open(SelectionContext::Referrer);

    let err = assert_err!(bridge.submit(&valid_referrer(), &mut selections).await);

    assert!(matches!(err, AcquireError::Rejected(ref reason) if reason == "duplicate phone"));
    assert!(!err.is_retriable());
    assert!(bridge.is_open());
    assert!(bridge.error().unwrap().contains("duplicate phone"));
    assert_eq!(selections, before);
}

#[tokio::test]
async fn provider_outage_is_retriable() {
    let mut bridge = bridge(Arc::new(UnavailableProvider));
    let mut selections = form_selections();
    let before = selections.clone();
    bridge.open(SelectionContext::Referrer);

    let err = assert_err!(bridge.submit(&valid_referrer(), &mut selections).await);

    assert!(matches!(err, AcquireError::Network(ref reason) if reason == "directory offline"));
    assert!(err.is_retriable());
    assert!(bridge.is_open());
    assert_eq!(selections, before);
}

#[tokio::test(start_paused = true)]
async fn provider_timeout_stays_open() {
    let config = AcquireConfig {
        request_timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let mut bridge = EntityCreationBridge::new(session(), Arc::new(HangingProvider), &config);
    let mut selections = form_selections();
    let before = selections.clone();
    bridge.open(SelectionContext::Referrer);

    let err = assert_err!(bridge.submit(&valid_referrer(), &mut selections).await);

    assert!(matches!(err, AcquireError::Timeout));
    assert!(bridge.is_open());
    assert!(bridge.error().is_some());
    assert_eq!(selections, before);
}

#[tokio::test]
async fn missing_target_field_stays_open() {
    let mut bridge = bridge(Arc::new(LocalEntityProvider));
    let mut selections = SelectionFields::new().with_field(SelectField::new("referrer"));
    bridge.open(SelectionContext::CollectionAgent);

    let input = fields(&[("name", "Suresh"), ("phone", "9845012345")]);
    let err = assert_err!(bridge.submit(&input, &mut selections).await);

    assert!(matches!(
        err,
        AcquireError::Validation(ValidationError::UnknownSelectField(ref f)) if f == "collection_agent"
    ));
    assert!(bridge.is_open());
}

#[tokio::test]
async fn retry_after_failure_clears_error() {
    let mut bridge = bridge(Arc::new(LocalEntityProvider));
    let mut selections = form_selections();
    bridge.open(SelectionContext::Referrer);

    assert_err!(bridge.submit(&fields(&[("first_name", "Asha")]), &mut selections).await);
    assert!(bridge.error().is_some());

    assert_ok!(bridge.submit(&valid_referrer(), &mut selections).await);
    assert!(!bridge.is_open());
    assert!(bridge.error().is_none());
}
