//! Integration tests for the lifecycle state machine
//!
//! A minimal in-memory repository backs the processors; the full store
//! implementation lives in its own crate.

use registry_lifecycle::{
    ApproveSchemaRequest, ContextValue, CreateSchemaRequest, EngineError, ProcessorHub,
    RejectSchemaRequest, Repository, SchemaContext, SchemaEvent, StoreError, UpdateSchemaRequest,
    VersionIdGenerator,
};
use registry_model::{SchemaAttribute, SchemaDetails, SchemaKey, SchemaState, ValidationType};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MapRepository {
    records: Mutex<HashMap<String, SchemaDetails>>,
}

impl MapRepository {
    fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl Repository for MapRepository {
    fn record_exists(&self, key: &SchemaKey) -> Result<bool, StoreError> {
        Ok(self.records.lock().unwrap().contains_key(&key.reference_id()))
    }

    fn get(&self, key: &SchemaKey) -> Result<Option<SchemaDetails>, StoreError> {
        Ok(self.records.lock().unwrap().get(&key.reference_id()).cloned())
    }

    fn create(&self, details: SchemaDetails) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(details.schema_key.reference_id(), details);
        Ok(())
    }

    fn update(&self, details: SchemaDetails) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(details.schema_key.reference_id(), details);
        Ok(())
    }

    fn get_schemas(
        &self,
        namespaces: &[String],
        states: &[SchemaState],
    ) -> Result<Vec<SchemaDetails>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|details| {
                (namespaces.is_empty()
                    || namespaces.contains(&details.schema_key.namespace))
                    && (states.is_empty() || states.contains(&details.state))
            })
            .cloned()
            .collect())
    }
}

struct SequenceVersions {
    counter: AtomicU64,
}

impl SequenceVersions {
    fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }
}

impl VersionIdGenerator for SequenceVersions {
    fn generate(&self, prefix: &str) -> String {
        let next = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{prefix}{next}")
    }
}

struct FixedVersions;

impl VersionIdGenerator for FixedVersions {
    fn generate(&self, prefix: &str) -> String {
        format!("{prefix}1")
    }
}

fn attributes() -> BTreeSet<SchemaAttribute> {
    [
        SchemaAttribute::string("orderId").required(),
        SchemaAttribute::integer("quantity"),
    ]
    .into()
}

fn create_request(namespace: &str, schema_name: &str) -> CreateSchemaRequest {
    CreateSchemaRequest {
        namespace: namespace.to_string(),
        schema_name: schema_name.to_string(),
        description: "Order lifecycle events".to_string(),
        schema_type: "JSON".to_string(),
        validation_type: ValidationType::Matching,
        attributes: attributes(),
        transformation_targets: Vec::new(),
        change_log: None,
    }
}

fn hub_over(repository: Arc<MapRepository>, versions: Arc<dyn VersionIdGenerator>) -> ProcessorHub {
    ProcessorHub::builder()
        .repository(repository)
        .version_ids(versions)
        .build()
        .unwrap()
}

fn run_create(hub: &ProcessorHub, namespace: &str, schema_name: &str) -> Result<SchemaDetails, EngineError> {
    let mut context = SchemaContext::with_actor("alice", "alice@example.com");
    context.put_create_request(create_request(namespace, schema_name));
    hub.process(SchemaEvent::Create, &mut context)?;
    Ok(context.details().unwrap().clone())
}

fn run_approve(hub: &ProcessorHub, key: &SchemaKey) -> Result<SchemaDetails, EngineError> {
    let mut context = SchemaContext::with_actor("bob", "bob@example.com");
    context.put_approve_request(ApproveSchemaRequest {
        namespace: key.namespace.clone(),
        schema_name: key.schema_name.clone(),
        version: key.version.clone(),
    });
    hub.process(SchemaEvent::Approve, &mut context)?;
    Ok(context.details().unwrap().clone())
}

fn run_reject(hub: &ProcessorHub, key: &SchemaKey) -> Result<SchemaDetails, EngineError> {
    let mut context = SchemaContext::with_actor("carol", "carol@example.com");
    context.put_reject_request(RejectSchemaRequest {
        namespace: key.namespace.clone(),
        schema_name: key.schema_name.clone(),
        version: key.version.clone(),
    });
    hub.process(SchemaEvent::Reject, &mut context)?;
    Ok(context.details().unwrap().clone())
}

#[test]
fn test_create_produces_a_draft_with_generated_version() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository.clone(), Arc::new(SequenceVersions::new()));

    let details = run_create(&hub, "orders", "OrderCreated").unwrap();

    assert_eq!(details.state, SchemaState::Created);
    assert_eq!(details.schema_key.version, "V1");
    assert_eq!(details.meta.created_by, "alice");
    assert_eq!(details.history.len(), 1);
    assert_eq!(details.history[0].event, "SchemaCreated");
    assert_eq!(repository.len(), 1);
}

#[test]
fn test_duplicate_exact_key_fails_schema_already_exists() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository.clone(), Arc::new(FixedVersions));

    run_create(&hub, "orders", "OrderCreated").unwrap();
    // Approve the draft so only the exact-key check can trip.
    let key = SchemaKey::new("orders", "OrderCreated", "V1");
    run_approve(&hub, &key).unwrap();

    let result = run_create(&hub, "orders", "OrderCreated");

    match result {
        Err(error @ EngineError::SchemaAlreadyExists { .. }) => {
            assert_eq!(error.code(), "SCHEMA_ALREADY_EXISTS");
            assert_eq!(error.status(), 409);
        }
        other => panic!("expected SchemaAlreadyExists, got {other:?}"),
    }
    assert_eq!(repository.len(), 1);
}

#[test]
fn test_second_draft_for_same_name_fails_while_first_is_created() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository.clone(), Arc::new(SequenceVersions::new()));

    run_create(&hub, "orders", "OrderCreated").unwrap();
    let result = run_create(&hub, "orders", "OrderCreated");

    assert!(matches!(
        result,
        Err(EngineError::SchemaAlreadyExists { .. })
    ));
    assert_eq!(repository.len(), 1);
}

#[test]
fn test_new_draft_allowed_after_previous_version_left_created() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository.clone(), Arc::new(SequenceVersions::new()));

    let first = run_create(&hub, "orders", "OrderCreated").unwrap();
    run_approve(&hub, &first.schema_key).unwrap();

    let second = run_create(&hub, "orders", "OrderCreated").unwrap();

    assert_eq!(second.schema_key.version, "V2");
    assert_eq!(repository.len(), 2);
}

#[test]
fn test_distinct_names_may_hold_drafts_concurrently() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository, Arc::new(SequenceVersions::new()));

    run_create(&hub, "orders", "OrderCreated").unwrap();
    let result = run_create(&hub, "orders", "OrderShipped");

    assert!(result.is_ok());
}

#[test]
fn test_update_overwrites_draft_and_appends_history() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository.clone(), Arc::new(SequenceVersions::new()));

    let created = run_create(&hub, "orders", "OrderCreated").unwrap();

    let mut context = SchemaContext::with_actor("bob", "bob@example.com");
    context.put_update_request(UpdateSchemaRequest {
        namespace: "orders".to_string(),
        schema_name: "OrderCreated".to_string(),
        version: created.schema_key.version.clone(),
        description: "Now with carrier".to_string(),
        schema_type: "JSON".to_string(),
        validation_type: ValidationType::Strict,
        attributes: [
            SchemaAttribute::string("orderId").required(),
            SchemaAttribute::string("carrier"),
        ]
        .into(),
        transformation_targets: vec!["search".to_string()],
        change_log: Some("added carrier".to_string()),
    });
    hub.process(SchemaEvent::Update, &mut context).unwrap();

    let updated = context.details().unwrap();
    assert_eq!(updated.state, SchemaState::Created);
    assert_eq!(updated.description, "Now with carrier");
    assert_eq!(updated.validation_type, ValidationType::Strict);
    assert_eq!(updated.meta.updated_by, "bob");
    assert_eq!(updated.meta.created_by, "alice");
    assert_eq!(updated.history.len(), 2);
    assert_eq!(updated.history[1].event, "SchemaUpdated");

    let stored = repository.get(&created.schema_key).unwrap().unwrap();
    assert_eq!(stored.description, "Now with carrier");
}

#[test]
fn test_update_requires_a_created_record() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository, Arc::new(SequenceVersions::new()));

    let created = run_create(&hub, "orders", "OrderCreated").unwrap();
    run_approve(&hub, &created.schema_key).unwrap();

    let mut context = SchemaContext::with_actor("bob", "bob@example.com");
    context.put_update_request(UpdateSchemaRequest {
        namespace: "orders".to_string(),
        schema_name: "OrderCreated".to_string(),
        version: created.schema_key.version.clone(),
        description: "too late".to_string(),
        schema_type: "JSON".to_string(),
        validation_type: ValidationType::Matching,
        attributes: attributes(),
        transformation_targets: Vec::new(),
        change_log: None,
    });

    let result = hub.process(SchemaEvent::Update, &mut context);

    match result {
        Err(error @ EngineError::NoSchemaFound { .. }) => {
            assert_eq!(error.code(), "NO_SCHEMA_FOUND");
            assert_eq!(error.status(), 404);
        }
        other => panic!("expected NoSchemaFound, got {other:?}"),
    }
}

#[test]
fn test_approve_transitions_draft_to_terminal_approved() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository, Arc::new(SequenceVersions::new()));

    let created = run_create(&hub, "orders", "OrderCreated").unwrap();
    let approved = run_approve(&hub, &created.schema_key).unwrap();

    assert_eq!(approved.state, SchemaState::Approved);
    assert_eq!(approved.meta.updated_by, "bob");
    assert_eq!(approved.history.last().unwrap().event, "SchemaApproved");

    // Both terminal states refuse a second approval.
    let again = run_approve(&hub, &created.schema_key);
    assert!(matches!(again, Err(EngineError::NoSchemaFound { .. })));
}

#[test]
fn test_approve_on_rejected_fails_no_schema_found() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository, Arc::new(SequenceVersions::new()));

    let created = run_create(&hub, "orders", "OrderCreated").unwrap();
    run_reject(&hub, &created.schema_key).unwrap();

    let result = run_approve(&hub, &created.schema_key);

    assert!(matches!(result, Err(EngineError::NoSchemaFound { .. })));
}

#[test]
fn test_reject_succeeds_from_created_and_approved_only() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository, Arc::new(SequenceVersions::new()));

    // Reject straight from CREATED.
    let first = run_create(&hub, "orders", "OrderCreated").unwrap();
    let rejected = run_reject(&hub, &first.schema_key).unwrap();
    assert_eq!(rejected.state, SchemaState::Rejected);
    assert_eq!(rejected.history.last().unwrap().event, "SchemaRejected");

    // Reject after approval.
    let second = run_create(&hub, "orders", "OrderCreated").unwrap();
    run_approve(&hub, &second.schema_key).unwrap();
    assert!(run_reject(&hub, &second.schema_key).is_ok());

    // Rejected is terminal.
    let again = run_reject(&hub, &second.schema_key);
    assert!(matches!(again, Err(EngineError::NoSchemaFound { .. })));
}

#[test]
fn test_missing_actor_identity_is_value_not_found() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository.clone(), Arc::new(SequenceVersions::new()));

    let mut context = SchemaContext::new();
    context.put_create_request(create_request("orders", "OrderCreated"));

    let result = hub.process(SchemaEvent::Create, &mut context);

    assert!(matches!(result, Err(EngineError::ValueNotFound { .. })));
    assert_eq!(repository.len(), 0);
}

#[test]
fn test_missing_request_is_value_not_found() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository, Arc::new(SequenceVersions::new()));

    let mut context = SchemaContext::with_actor("alice", "alice@example.com");
    let result = hub.process(SchemaEvent::Create, &mut context);

    assert!(matches!(
        result,
        Err(EngineError::ValueNotFound { key }) if key == "CreateSchemaRequest"
    ));
}

#[test]
fn test_empty_attribute_set_is_rejected_before_persisting() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository.clone(), Arc::new(SequenceVersions::new()));

    let mut request = create_request("orders", "OrderCreated");
    request.attributes = BTreeSet::new();

    let mut context = SchemaContext::with_actor("alice", "alice@example.com");
    context.put_create_request(request);

    let result = hub.process(SchemaEvent::Create, &mut context);

    assert!(matches!(result, Err(EngineError::InvalidRequest { .. })));
    assert_eq!(repository.len(), 0);
}

#[test]
fn test_result_is_written_under_the_reserved_key() {
    let repository = Arc::new(MapRepository::default());
    let hub = hub_over(repository, Arc::new(SequenceVersions::new()));

    let mut context = SchemaContext::with_actor("alice", "alice@example.com");
    context.put_create_request(create_request("orders", "OrderCreated"));
    hub.process(SchemaEvent::Create, &mut context).unwrap();

    assert!(matches!(
        context.get("schemadetails"),
        Some(ContextValue::Details(_))
    ));
}
