// tests/snapshot_pipeline.rs
//! End-to-end: collect a database together with the database its relation
//! property points into, then format the rows.

mod common;

use common::{database_id, SimulatedNotion, PROJECTS, TASKS};
use notion2records::{
    DatabaseQuerier, DatabaseSchema, FormattedProperty, FormattedValue, NotionFormatter, Page, SnapshotCollector,
    SnapshotSource, Strategy,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

const LAUNCH: &str = "aaaaaaaa-0000-4000-8000-000000000001";
const HIRING: &str = "aaaaaaaa-0000-4000-8000-000000000002";

fn page(value: serde_json::Value) -> Page {
    serde_json::from_value(value).unwrap()
}

fn project(id: &str, day: u32, name: &str) -> Page {
    page(json!({
        "id": id,
        "created_time": format!("2024-01-{:02}T09:00:00.000Z", day),
        "url": format!("https://www.notion.so/{}", id.replace('-', "")),
        "properties": {
            "Name": {"id": "title", "type": "title", "title": [{"plain_text": name, "href": null}]}
        }
    }))
}

fn task(n: u32, name: &str, projects: &[&str], estimate: Option<f64>) -> Page {
    let id = format!("bbbbbbbb-0000-4000-8000-{:012x}", n);
    let relation: Vec<_> = projects.iter().map(|p| json!({"id": p})).collect();
    page(json!({
        "id": id,
        "created_time": format!("2024-02-01T{:02}:00:00.000Z", n),
        "url": format!("https://www.notion.so/{}", id.replace('-', "")),
        "properties": {
            "Name": {"id": "title", "type": "title", "title": [{"plain_text": name, "href": null}]},
            "Project": {"id": "rel", "type": "relation", "relation": relation},
            "Estimate": {"id": "est", "type": "number", "number": estimate}
        }
    }))
}

fn tasks_schema() -> DatabaseSchema {
    serde_json::from_value(json!({
        "id": TASKS,
        "properties": {
            "Name": {"id": "title", "name": "Name", "type": "title"},
            "Project": {
                "id": "rel",
                "name": "Project",
                "type": "relation",
                "relation": {"database_id": PROJECTS}
            },
            "Estimate": {"id": "est", "name": "Estimate", "type": "number"}
        }
    }))
    .unwrap()
}

fn workspace() -> Arc<SimulatedNotion> {
    let tasks = vec![
        task(1, "Write docs", &[LAUNCH], Some(3.0)),
        task(2, "Interview", &[HIRING, LAUNCH], None),
        task(3, "Triage", &[], Some(0.5)),
        task(4, "Ship", &[LAUNCH], Some(8.0)),
    ];
    let projects = vec![project(LAUNCH, 2, "Launch"), project(HIRING, 3, "Hiring")];
    Arc::new(
        SimulatedNotion::new()
            .with_database(TASKS, tasks, tasks_schema())
            .with_rows(PROJECTS, projects),
    )
}

#[tokio::test]
async fn relation_targets_are_collected_and_resolved() {
    let notion = workspace();
    let collector = SnapshotCollector::new(DatabaseQuerier::new(notion.clone()), Strategy::Linear);
    let tasks = database_id(TASKS);

    let databases = collector.collect(&tasks).await.unwrap();
    assert_eq!(databases.len(), 2);
    assert_eq!(notion.schema_reads(), 2);

    let records = NotionFormatter::new(databases)
        .format_database(&tasks)
        .unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(
        serde_json::to_value(&records[1]).unwrap(),
        json!({
            "title": ["Interview"],
            "rel": ["Hiring", "Launch"],
            "est": null,
            "id": {
                "text": "bbbbbbbb-0000-4000-8000-000000000002",
                "url": "https://www.notion.so/bbbbbbbb000040008000000000000002"
            }
        })
    );
    assert_eq!(records[2]["rel"], FormattedProperty::List(Vec::new()));
}

#[tokio::test]
async fn every_strategy_collects_the_same_rows() {
    let tasks = database_id(TASKS);
    let mut collected = Vec::new();

    for strategy in [Strategy::Linear, Strategy::Partition, Strategy::Bidirectional] {
        let collector = SnapshotCollector::new(DatabaseQuerier::new(workspace()), strategy);
        let databases = collector.collect(&tasks).await.unwrap();
        collected.push(common::id_set(&databases[&tasks].pages));
    }

    assert_eq!(collected[0].len(), 4);
    assert_eq!(collected[0], collected[1]);
    assert_eq!(collected[0], collected[2]);
}

#[tokio::test]
async fn relations_can_be_left_unfollowed() {
    let notion = workspace();
    let collector = SnapshotCollector::new(DatabaseQuerier::new(notion.clone()), Strategy::Linear)
        .following_relations(false);
    let tasks = database_id(TASKS);

    let databases = collector.collect(&tasks).await.unwrap();
    assert_eq!(databases.len(), 1);
    assert_eq!(notion.schema_reads(), 1);

    let records = NotionFormatter::new(databases)
        .format_database(&tasks)
        .unwrap();
    assert_eq!(records[0]["rel"], FormattedProperty::List(Vec::new()));
    assert_eq!(
        records[0]["title"],
        FormattedProperty::List(vec![FormattedValue::Text("Write docs".to_string())])
    );
}
