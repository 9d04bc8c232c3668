//! End-to-end scenarios exercising `can_what` against the in-memory fixture data store.

use iam_permission_algebra::algebra::{
    can_what, DataStore, EngineOptions, GroupPolicies, InMemoryDataStore, Level, PolicyEntry,
    PrincipalPolicies,
};
use iam_permission_algebra::model::builder::{ConditionBuilder, PolicyBuilder, StatementBuilder};
use iam_permission_algebra::model::{Effect, Policy};
use iam_permission_algebra::service::{ServiceCatalog, ServiceConfig};

const PRINCIPAL: &str = "arn:aws:iam::123456789012:user/alice";

fn catalog() -> ServiceCatalog {
    ServiceCatalog::new(vec![
        ServiceConfig {
            namespace: "s3".to_string(),
            actions: vec![
                "ListBucket".to_string(),
                "GetObject".to_string(),
                "PutObject".to_string(),
            ],
            resource_types: vec![],
            condition_keys: vec![],
        },
        ServiceConfig {
            namespace: "ec2".to_string(),
            actions: vec!["RunInstances".to_string()],
            resource_types: vec![],
            condition_keys: vec![],
        },
    ])
}

fn options() -> EngineOptions {
    EngineOptions {
        shrink_action_lists: false,
        catalog: catalog(),
    }
}

fn entry(name: &str, policy: Policy) -> PolicyEntry {
    PolicyEntry {
        name: name.to_string(),
        policy,
    }
}

fn store_with(bundle: PrincipalPolicies) -> InMemoryDataStore {
    InMemoryDataStore::new().with_principal(PRINCIPAL, bundle)
}

#[test]
fn test_scenario_1_single_allow() {
    let policy: Policy = PolicyBuilder::new()
        .named("single-allow")
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:ListBucket"])
                .on_any_resource(),
        )
        .into();

    let mut bundle = PrincipalPolicies::default();
    bundle.inline_policies.push(entry("inline", policy));
    let store = store_with(bundle);

    let document = can_what(&store, PRINCIPAL, &options()).unwrap();
    assert_eq!(document.statements.len(), 1);
    assert_eq!(document.statements[0].effect, Effect::Allow);
    assert_eq!(document.statements[0].actions, vec!["s3:listbucket".to_string()]);
}

#[test]
fn test_scenario_2_boundary_narrows() {
    let identity: Policy = PolicyBuilder::new()
        .named("identity")
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:*"])
                .on_any_resource(),
        )
        .into();
    let boundary: Policy = PolicyBuilder::new()
        .named("boundary")
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:GetObject"])
                .on_any_resource(),
        )
        .into();

    let mut bundle = PrincipalPolicies::default();
    bundle.inline_policies.push(entry("inline", identity));
    bundle.permission_boundary = Some(entry("boundary", boundary));
    let store = store_with(bundle);

    let document = can_what(&store, PRINCIPAL, &options()).unwrap();
    assert_eq!(document.statements.len(), 1);
    assert_eq!(document.statements[0].actions, vec!["s3:getobject".to_string()]);
}

#[test]
fn test_scenario_3_deny_carves_by_condition() {
    let allow: Policy = PolicyBuilder::new()
        .named("allow")
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:GetObject"])
                .on_resources(vec!["arn:aws:s3:::b/*"]),
        )
        .into();
    let deny: Policy = PolicyBuilder::new()
        .named("deny")
        .evaluate_statement(
            StatementBuilder::new()
                .denies()
                .may_perform_actions(vec!["s3:GetObject"])
                .on_resources(vec!["arn:aws:s3:::b/*"])
                .if_condition(
                    ConditionBuilder::new_string_not_equals()
                        .right_hand("aws:PrincipalOrgId", "o-1"),
                ),
        )
        .into();

    let mut bundle = PrincipalPolicies::default();
    bundle.inline_policies.push(entry("allow", allow));
    bundle.inline_policies.push(entry("deny", deny));
    let store = store_with(bundle);

    let document = can_what(&store, PRINCIPAL, &options()).unwrap();
    let allows: Vec<_> = document
        .statements
        .iter()
        .filter(|s| s.effect == Effect::Allow)
        .collect();
    assert_eq!(allows.len(), 1);
    let condition = allows[0].condition.as_ref().expect("inverted condition installed");
    let operator = condition.keys().next().unwrap();
    assert_eq!(
        operator.operator,
        iam_permission_algebra::model::GlobalOperator::StringEquals
    );
    let key = iam_permission_algebra::model::QualifiedName::new_unchecked("aws:principalorgid");
    let values = condition.get(operator).unwrap().get(&key).unwrap();
    assert_eq!(values[0].to_string(), "o-1");
}

#[test]
fn test_scenario_4_scp_gating_excludes_service() {
    let identity: Policy = PolicyBuilder::new()
        .named("identity")
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:GetObject"])
                .on_resources(vec!["arn:aws:s3:::b/*"]),
        )
        .into();
    let root_scp: Policy = PolicyBuilder::new()
        .named("root-scp")
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:*"])
                .on_any_resource(),
        )
        .into();
    let ou_scp: Policy = PolicyBuilder::new()
        .named("ou-scp")
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["ec2:RunInstances"])
                .on_any_resource(),
        )
        .into();

    let mut bundle = PrincipalPolicies::default();
    bundle.inline_policies.push(entry("identity", identity));
    bundle.scps.push(Level {
        org_identifier: "root".to_string(),
        policies: vec![entry("root-scp", root_scp)],
    });
    bundle.scps.push(Level {
        org_identifier: "ou".to_string(),
        policies: vec![entry("ou-scp", ou_scp)],
    });
    let store = store_with(bundle);

    let document = can_what(&store, PRINCIPAL, &options()).unwrap();
    assert!(document.statements.iter().all(|s| s.effect != Effect::Allow));
}

#[test]
fn test_scenario_5_matching_conditions_merge_differing_keys_stay_separate() {
    let same_key: Policy = PolicyBuilder::new()
        .named("same-key")
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:ListBucket"])
                .on_resources(vec!["arn:aws:s3:::b/*"])
                .if_condition(
                    ConditionBuilder::new_string_equals().right_hand("aws:RequestTag/Project", "A"),
                ),
        )
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:ListBucket"])
                .on_resources(vec!["arn:aws:s3:::b/*"])
                .if_condition(
                    ConditionBuilder::new_string_equals().right_hand("aws:RequestTag/Project", "B"),
                ),
        )
        .into();

    let mut bundle = PrincipalPolicies::default();
    bundle.inline_policies.push(entry("same-key", same_key));
    let store = store_with(bundle);

    let document = can_what(&store, PRINCIPAL, &options()).unwrap();
    assert_eq!(document.statements.len(), 1);
    let condition = document.statements[0].condition.as_ref().unwrap();
    let (_, values) = condition.iter().next().unwrap();
    let (_, first_values) = values.iter().next().unwrap();
    let mut rendered: Vec<String> = first_values.iter().map(|v| v.to_string()).collect();
    rendered.sort();
    assert_eq!(rendered, vec!["A".to_string(), "B".to_string()]);

    let differing_key: Policy = PolicyBuilder::new()
        .named("differing-key")
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:ListBucket"])
                .on_resources(vec!["arn:aws:s3:::b/*"])
                .if_condition(
                    ConditionBuilder::new_string_equals().right_hand("aws:RequestTag/Project", "A"),
                ),
        )
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:ListBucket"])
                .on_resources(vec!["arn:aws:s3:::b/*"])
                .if_condition(
                    ConditionBuilder::new_string_equals()
                        .right_hand("aws:RequestTag/Department", "B"),
                ),
        )
        .into();

    let mut bundle2 = PrincipalPolicies::default();
    bundle2.inline_policies.push(entry("differing-key", differing_key));
    let store2 = store_with(bundle2);
    let document2 = can_what(&store2, PRINCIPAL, &options()).unwrap();
    assert_eq!(document2.statements.len(), 2);
}

#[test]
fn test_scenario_6_wildcard_absorbs_conditional_siblings() {
    let policy: Policy = PolicyBuilder::new()
        .named("wildcard-absorbs")
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:ListBucket"])
                .on_resources(vec!["arn:aws:s3:::b/*"])
                .if_condition(
                    ConditionBuilder::new_string_equals().right_hand("aws:RequestTag/A", "1"),
                ),
        )
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:ListBucket"])
                .on_resources(vec!["arn:aws:s3:::c/*"])
                .if_condition(
                    ConditionBuilder::new_string_equals().right_hand("aws:RequestTag/B", "2"),
                ),
        )
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:ListBucket"])
                .on_resources(vec!["arn:aws:s3:::d/*"])
                .if_condition(
                    ConditionBuilder::new_string_equals().right_hand("aws:RequestTag/C", "3"),
                ),
        )
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:ListBucket"])
                .on_any_resource(),
        )
        .into();

    let mut bundle = PrincipalPolicies::default();
    bundle.inline_policies.push(entry("wildcard", policy));
    let store = store_with(bundle);

    let document = can_what(&store, PRINCIPAL, &options()).unwrap();
    assert_eq!(document.statements.len(), 1);
    assert_eq!(document.statements[0].actions, vec!["s3:listbucket".to_string()]);
    assert!(document.statements[0].condition.is_none());
}

#[test]
fn test_group_policies_are_included_as_identity_policies() {
    let group_policy: Policy = PolicyBuilder::new()
        .named("group")
        .evaluate_statement(
            StatementBuilder::new()
                .allows()
                .may_perform_actions(vec!["s3:GetObject"])
                .on_any_resource(),
        )
        .into();

    let mut bundle = PrincipalPolicies::default();
    bundle.group_policies.push(GroupPolicies {
        group_name: "readers".to_string(),
        managed_policies: vec![entry("group-managed", group_policy)],
        inline_policies: vec![],
    });
    let store = store_with(bundle);

    let document = can_what(&store, PRINCIPAL, &options()).unwrap();
    assert_eq!(document.statements.len(), 1);
    assert_eq!(document.statements[0].actions, vec!["s3:getobject".to_string()]);
}

#[test]
fn test_unregistered_principal_yields_empty_document() {
    let store = InMemoryDataStore::new();
    let document = can_what(&store, "arn:aws:iam::123456789012:user/ghost", &options()).unwrap();
    assert!(document.statements.is_empty());
}

#[test]
fn test_data_store_rejects_empty_principal_arn() {
    let store = InMemoryDataStore::new();
    assert!(store.get_all_policies_for_principal("").is_err());
}
