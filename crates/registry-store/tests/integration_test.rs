//! End-to-end flow over the in-memory store
//!
//! Registers a schema through the processor hub, approves it, resolves it
//! through the cache-aware read path, and validates a payload against it.

use registry_lifecycle::{
    ApproveSchemaRequest, CreateSchemaRequest, ProcessorHub, SchemaContext, SchemaEvent,
};
use registry_model::{SchemaAttribute, SchemaState, ValidationType};
use registry_store::{CachedSchemaRetriever, CounterVersionIds, MemoryRepository};
use registry_validation::ValidationEngine;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn order_request() -> CreateSchemaRequest {
    CreateSchemaRequest {
        namespace: "orders".to_string(),
        schema_name: "OrderCreated".to_string(),
        description: "Emitted when an order is placed".to_string(),
        schema_type: "JSON".to_string(),
        validation_type: ValidationType::Strict,
        attributes: [
            SchemaAttribute::string("orderId").required(),
            SchemaAttribute::integer("quantity"),
            SchemaAttribute::enumeration("status", ["OPEN", "SHIPPED"]).required(),
        ]
        .into(),
        transformation_targets: vec!["search-index".to_string()],
        change_log: Some("initial registration".to_string()),
    }
}

#[test]
fn test_register_approve_retrieve_validate() {
    let repository = Arc::new(MemoryRepository::new());
    let hub = ProcessorHub::builder()
        .repository(repository.clone())
        .version_ids(Arc::new(CounterVersionIds::new()))
        .build()
        .unwrap();

    // Register.
    let mut context = SchemaContext::with_actor("alice", "alice@example.com");
    context.put_create_request(order_request());
    hub.process(SchemaEvent::Create, &mut context).unwrap();
    let created = context.details().unwrap().clone();
    assert_eq!(created.state, SchemaState::Created);

    // Approve.
    let mut context = SchemaContext::with_actor("bob", "bob@example.com");
    context.put_approve_request(ApproveSchemaRequest {
        namespace: "orders".to_string(),
        schema_name: "OrderCreated".to_string(),
        version: created.schema_key.version.clone(),
    });
    hub.process(SchemaEvent::Approve, &mut context).unwrap();

    // Resolve through the cache-aware read path.
    let retriever = CachedSchemaRetriever::new(
        repository,
        vec!["orders".to_string()],
        Duration::from_secs(60),
    );
    let resolved = retriever.get(&created.schema_key).unwrap().unwrap();
    assert_eq!(resolved.state, SchemaState::Approved);

    // Validate payloads against the resolved schema.
    let engine = ValidationEngine::new();

    let clean = engine.validate_payload(
        &json!({"orderId": "A-17", "quantity": 2, "status": "OPEN"}),
        resolved.validation_type,
        &resolved.attributes,
    );
    assert!(clean.is_empty());

    let broken = engine.validate_payload(
        &json!({"orderId": "A-17", "status": "LOST", "surprise": true}),
        resolved.validation_type,
        &resolved.attributes,
    );
    assert_eq!(broken.len(), 2);
}

#[test]
fn test_draft_is_invisible_to_the_read_path_until_approved() {
    let repository = Arc::new(MemoryRepository::new());
    let hub = ProcessorHub::builder()
        .repository(repository.clone())
        .version_ids(Arc::new(CounterVersionIds::new()))
        .build()
        .unwrap();

    let mut context = SchemaContext::with_actor("alice", "alice@example.com");
    context.put_create_request(order_request());
    hub.process(SchemaEvent::Create, &mut context).unwrap();
    let created = context.details().unwrap().clone();

    let retriever = CachedSchemaRetriever::new(repository, vec![], Duration::ZERO);

    assert!(retriever.get(&created.schema_key).unwrap().is_none());

    let mut context = SchemaContext::with_actor("bob", "bob@example.com");
    context.put_approve_request(ApproveSchemaRequest {
        namespace: "orders".to_string(),
        schema_name: "OrderCreated".to_string(),
        version: created.schema_key.version.clone(),
    });
    hub.process(SchemaEvent::Approve, &mut context).unwrap();

    assert!(retriever.get(&created.schema_key).unwrap().is_some());
}
