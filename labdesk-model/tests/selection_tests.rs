use labdesk_model::{
    FieldFormat, FormFields, ReferencedEntityOption, SelectField, SelectionContext,
    SelectionFields, ValidationError,
};
use labdesk_types::OptionId;

fn fields(pairs: &[(&str, &str)]) -> FormFields {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn catalog(name: &str) -> SelectionContext {
    SelectionContext::GenericCatalogLink {
        catalog: name.to_string(),
    }
}

// ── Field sets ───────────────────────────────────────────────────

#[test]
fn referrer_requires_first_name_and_phone() {
    let required: Vec<&str> = SelectionContext::Referrer
        .fields()
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name)
        .collect();
    assert_eq!(required, vec!["first_name", "phone"]);
}

#[test]
fn collection_agent_phone_is_phone_format() {
    let phone = SelectionContext::CollectionAgent
        .fields()
        .iter()
        .find(|f| f.name == "phone")
        .unwrap();
    assert!(phone.required);
    assert_eq!(phone.format, FieldFormat::Phone);
}

#[test]
fn target_fields() {
    assert_eq!(SelectionContext::Referrer.target_field(), "referrer");
    assert_eq!(SelectionContext::CollectionAgent.target_field(), "collection_agent");
    assert_eq!(catalog("department").target_field(), "department");
}

// ── Validation ───────────────────────────────────────────────────

#[test]
fn referrer_valid() {
    let f = fields(&[("first_name", "Jane"), ("phone", "+91 98765-43210")]);
    assert!(SelectionContext::Referrer.validate(&f).is_ok());
}

#[test]
fn missing_required_field_reported_in_display_order() {
    let f = fields(&[("last_name", "Doe")]);
    assert_eq!(
        SelectionContext::Referrer.validate(&f),
        Err(ValidationError::MissingField("first_name".into()))
    );
}

#[test]
fn blank_required_field_counts_as_missing() {
    let f = fields(&[("name", "   "), ("phone", "5550100")]);
    assert_eq!(
        SelectionContext::CollectionAgent.validate(&f),
        Err(ValidationError::MissingField("name".into()))
    );
}

#[test]
fn malformed_phone() {
    let f = fields(&[("name", "Ravi"), ("phone", "call me")]);
    assert!(matches!(
        SelectionContext::CollectionAgent.validate(&f),
        Err(ValidationError::Malformed { field, .. }) if field == "phone"
    ));
}

#[test]
fn short_phone_rejected() {
    let f = fields(&[("name", "Ravi"), ("phone", "123")]);
    assert!(SelectionContext::CollectionAgent.validate(&f).is_err());
}

#[test]
fn optional_email_checked_only_when_present() {
    let ok = fields(&[("first_name", "Jane"), ("phone", "5550100"), ("email", "")]);
    assert!(SelectionContext::Referrer.validate(&ok).is_ok());

    let bad = fields(&[("first_name", "Jane"), ("phone", "5550100"), ("email", "jane@")]);
    assert!(matches!(
        SelectionContext::Referrer.validate(&bad),
        Err(ValidationError::Malformed { field, .. }) if field == "email"
    ));
}

#[test]
fn undeclared_fields_ignored() {
    let f = fields(&[("name", "Radiology"), ("colour", "blue")]);
    assert!(catalog("department").validate(&f).is_ok());
}

// ── Labels ───────────────────────────────────────────────────────

#[test]
fn referrer_label_joins_name_parts() {
    let f = fields(&[
        ("title", "Dr."),
        ("first_name", " Jane "),
        ("last_name", "Doe"),
        ("phone", "5550100"),
    ]);
    assert_eq!(SelectionContext::Referrer.label(&f), "Dr. Jane Doe");
}

#[test]
fn referrer_label_skips_empty_parts() {
    let f = fields(&[("title", ""), ("first_name", "Jane"), ("phone", "5550100")]);
    assert_eq!(SelectionContext::Referrer.label(&f), "Jane");
}

#[test]
fn catalog_label_with_code() {
    let f = fields(&[("name", "Radiology"), ("code", "RAD")]);
    assert_eq!(catalog("department").label(&f), "Radiology (RAD)");
    let f = fields(&[("name", "Radiology")]);
    assert_eq!(catalog("department").label(&f), "Radiology");
}

#[test]
fn selection_context_serde_tagged() {
    let json = serde_json::to_value(catalog("department")).unwrap();
    assert_eq!(json["kind"], "generic_catalog_link");
    assert_eq!(json["catalog"], "department");
    let back: SelectionContext = serde_json::from_value(json).unwrap();
    assert_eq!(back, catalog("department"));
}

// ── SelectField ──────────────────────────────────────────────────

#[test]
fn select_unknown_option_rejected() {
    let mut field = SelectField::new("referrer");
    let id = OptionId::new();
    assert_eq!(
        field.select(id),
        Err(ValidationError::UnknownOption {
            field: "referrer".into(),
            id
        })
    );
    assert_eq!(field.value(), None);
}

#[test]
fn insert_and_select_appends_then_selects() {
    let existing = ReferencedEntityOption::new(OptionId::new(), "Dr. House");
    let mut field = SelectField::new("referrer").with_options([existing.clone()]);
    let created = ReferencedEntityOption::new(OptionId::new(), "Dr. Jane Doe");

    field.insert_and_select(created.clone());

    assert_eq!(field.options(), &[existing, created.clone()]);
    assert_eq!(field.value(), Some(created.id));
    assert_eq!(field.selected_option(), Some(&created));
}

#[test]
fn with_options_skips_duplicate_ids() {
    let option = ReferencedEntityOption::new(OptionId::new(), "A");
    let field = SelectField::new("f").with_options([option.clone(), option]);
    assert_eq!(field.options().len(), 1);
}

#[test]
fn clear_keeps_options() {
    let option = ReferencedEntityOption::new(OptionId::new(), "A");
    let mut field = SelectField::new("f").with_options([option.clone()]);
    field.select(option.id).unwrap();
    field.clear();
    assert_eq!(field.value(), None);
    assert!(field.contains(option.id));
}

#[test]
fn selection_fields_unknown_name() {
    let mut form = SelectionFields::new().with_field(SelectField::new("referrer"));
    let option = ReferencedEntityOption::new(OptionId::new(), "A");
    assert_eq!(
        form.insert_and_select("collection_agent", option),
        Err(ValidationError::UnknownSelectField("collection_agent".into()))
    );
    assert!(form.field("referrer").unwrap().options().is_empty());
}
