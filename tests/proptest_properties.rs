//! Property-based tests for the delta engine.
//!
//! Ensures the engine handles arbitrary record collections without
//! panicking, and that report-level invariants hold across random inputs.

use cloud_delta::diff::{ChangeSeverity, DeltaConfig, DeltaEngine};
use cloud_delta::model::ResourceRecord;
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (0i64..1000).prop_map(|n| json!(n)),
        "[a-z0-9-]{0,12}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_record() -> impl Strategy<Value = ResourceRecord> {
    (
        prop::option::of("arn-[0-9]{1,2}"),
        prop_oneof![
            Just("EC2"),
            Just("RDS"),
            Just("IAM"),
            Just("S3"),
            Just("VPC"),
            Just("SQS"),
            Just("")
        ],
        prop::option::of(prop_oneof![Just("vpc-1"), Just("vpc-2")]),
        prop::collection::btree_map(
            prop_oneof![
                Just("tags".to_string()),
                Just("securityGroups".to_string()),
                Just("complianceStatus".to_string()),
                Just("encryption".to_string()),
                Just("lastSeen".to_string()),
                "[a-z]{1,10}",
            ],
            arb_value(),
            0..5,
        ),
    )
        .prop_map(|(arn, service, vpc, fields)| {
            let mut map: Map<String, Value> = fields.into_iter().collect();
            if let Some(arn) = arn {
                map.insert("arn".to_string(), json!(arn));
            }
            if !service.is_empty() {
                map.insert("service".to_string(), json!(service));
            }
            if let Some(vpc) = vpc {
                map.insert("vpcId".to_string(), json!(vpc));
            }
            ResourceRecord::new(map)
        })
}

fn arb_state() -> impl Strategy<Value = Vec<ResourceRecord>> {
    prop::collection::vec(arb_record(), 0..12)
}

fn identity_set<'a>(changes: impl Iterator<Item = &'a cloud_delta::ResourceChange>) -> BTreeSet<String> {
    changes.map(|c| c.identity.clone()).collect()
}

proptest! {
    // Each case runs a full diff, so keep the count moderate.
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn diff_never_panics(old in arb_state(), new in arb_state()) {
        let report = DeltaEngine::new().diff(&old, &new, "old", "new");
        prop_assert!(report.is_ok());
    }

    #[test]
    fn self_diff_is_empty(state in arb_state()) {
        let report = DeltaEngine::new().diff(&state, &state, "s", "s").unwrap();
        prop_assert!(!report.has_changes());
        prop_assert!(report.impact_analysis.cascade_risks.is_empty());
    }

    #[test]
    fn summary_accounts_for_every_identity(old in arb_state(), new in arb_state()) {
        let report = DeltaEngine::new().diff(&old, &new, "old", "new").unwrap();
        let s = &report.summary;
        prop_assert_eq!(s.old_total, s.removed + s.modified + s.unchanged);
        prop_assert_eq!(s.new_total, s.added + s.modified + s.unchanged);
        prop_assert_eq!(s.total_changes, s.added + s.removed + s.modified);

        let by_severity: usize = report.change_statistics.by_severity.values().sum();
        prop_assert_eq!(by_severity, s.total_changes);
    }

    #[test]
    fn reversal_swaps_added_and_removed(old in arb_state(), new in arb_state()) {
        let engine = DeltaEngine::new();
        let forward = engine.diff(&old, &new, "a", "b").unwrap();
        let backward = engine.diff(&new, &old, "b", "a").unwrap();

        prop_assert_eq!(identity_set(forward.added.iter()), identity_set(backward.removed.iter()));
        prop_assert_eq!(identity_set(forward.removed.iter()), identity_set(backward.added.iter()));
        prop_assert_eq!(identity_set(forward.modified.iter()), identity_set(backward.modified.iter()));
    }

    #[test]
    fn modified_severity_matches_attributes(old in arb_state(), new in arb_state()) {
        let report = DeltaEngine::new().diff(&old, &new, "old", "new").unwrap();
        for change in &report.modified {
            prop_assert!(!change.attribute_changes.is_empty());
            prop_assert_eq!(change.severity, change.max_attribute_severity());
        }
        for change in &report.unchanged {
            prop_assert_eq!(change.severity, ChangeSeverity::Info);
        }
    }

    #[test]
    fn ignored_field_never_appears_in_paths(old in arb_state(), new in arb_state()) {
        let engine = DeltaEngine::with_config(DeltaConfig::default().ignore_field("tags"));
        let report = engine.diff(&old, &new, "old", "new").unwrap();
        for change in &report.modified {
            for attr in &change.attribute_changes {
                let first = attr.attribute_path.split(['.', '[']).next().unwrap_or_default();
                prop_assert!(first != "tags" && first != "lastSeen", "{}", attr.attribute_path);
            }
        }
    }

    #[test]
    fn related_resources_exclude_self(old in arb_state(), new in arb_state()) {
        let report = DeltaEngine::new().diff(&old, &new, "old", "new").unwrap();
        for change in report.all_changes() {
            prop_assert!(!change.related_resources.contains(&change.identity));
        }
        for risk in &report.impact_analysis.cascade_risks {
            prop_assert!(risk.caused_by.len() > 1);
        }
    }
}
