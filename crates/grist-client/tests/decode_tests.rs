//! Response decoding integration tests
//!
//! Fixtures mirror the shapes the Grist API actually answers with,
//! including the wrapped-vs-bare member list split.

use grist_client::api::{parse_member_list, parse_org_list, parse_workspace, parse_workspace_list};
use grist_client::{AccessDelta, AccessLevel};
use rstest::rstest;

const ORG_LIST: &str = r#"[
    {"id": 54594, "name": "Prêmio da Qualidade Contábil", "domain": "qualcontabil", "access": "owners"},
    {"id": 101, "name": "Personal", "domain": null}
]"#;

const WORKSPACE_LIST: &str = r#"[
    {
        "id": 7,
        "name": "Serra",
        "docs": [
            {"id": "docA", "name": "PQC RS 24-25 (Serra)"},
            {"id": "docB", "name": "PQC RS 24-25 (Litoral)"}
        ]
    },
    {"id": 8, "name": "Arquivo", "docs": []}
]"#;

const WRAPPED_MEMBERS: &str = r#"{
    "maxInheritedRole": "owners",
    "users": [
        {"id": 1, "name": "Alice", "email": "alice@example.com", "access": "editors"},
        {"id": 2, "name": "Bob", "email": "bob@example.com", "access": null, "parentAccess": "viewers"},
        {"id": 3, "name": "Carol", "email": "carol@example.com", "access": null}
    ]
}"#;

// Some deployments answer with a bare object carrying no member collection
const BARE_RESPONSE: &str = r#"{"maxInheritedRole": "owners"}"#;

#[test]
fn test_parse_org_list() {
    let orgs = parse_org_list(ORG_LIST).unwrap();
    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[0].id, 54594);
    assert_eq!(orgs[0].name, "Prêmio da Qualidade Contábil");
    assert_eq!(orgs[0].domain.as_deref(), Some("qualcontabil"));
    assert_eq!(orgs[1].domain, None);
}

#[test]
fn test_parse_workspace_list_with_embedded_docs() {
    let workspaces = parse_workspace_list(WORKSPACE_LIST).unwrap();
    assert_eq!(workspaces.len(), 2);
    assert_eq!(workspaces[0].docs.len(), 2);
    assert_eq!(workspaces[0].docs[0].id, "docA");
    assert!(workspaces[1].docs.is_empty());
}

#[test]
fn test_parse_workspace_without_docs_field() {
    // Older responses omit the docs key entirely
    let workspace = parse_workspace(r#"{"id": 9, "name": "Empty"}"#).unwrap();
    assert!(workspace.docs.is_empty());
}

#[test]
fn test_parse_wrapped_member_list() {
    let entries = parse_member_list(WRAPPED_MEMBERS, "docA").unwrap();
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].email, "alice@example.com");
    assert_eq!(entries[0].level, Some(AccessLevel::Editor));
    assert!(!entries[0].inherited);

    assert_eq!(entries[1].level, Some(AccessLevel::Viewer));
    assert!(entries[1].inherited);

    assert_eq!(entries[2].level, None);
    assert_eq!(entries[2].resource_id, "docA");
}

#[test]
fn test_bare_response_yields_empty_list() {
    let entries = parse_member_list(BARE_RESPONSE, "54594").unwrap();
    assert!(entries.is_empty());
}

#[test]
fn test_member_list_garbage_is_a_decode_error() {
    let err = parse_member_list("not json", "x").unwrap_err();
    assert!(!err.is_retryable());
    assert!(err.to_string().contains("member list"));
}

#[rstest]
#[case("viewers", AccessLevel::Viewer)]
#[case("viewer", AccessLevel::Viewer)]
#[case("EDITORS", AccessLevel::Editor)]
#[case("owners", AccessLevel::Owner)]
#[case(" owner ", AccessLevel::Owner)]
fn test_access_level_spellings(#[case] input: &str, #[case] expected: AccessLevel) {
    assert_eq!(AccessLevel::parse(input), Some(expected));
}

#[test]
fn test_delta_patch_shape() {
    let delta = AccessDelta::new()
        .set("alice@example.com", AccessLevel::Owner)
        .clear("bob@example.com");

    let json = serde_json::to_value(&delta).unwrap();
    let users = json.get("users").unwrap();
    assert_eq!(users["alice@example.com"], "owners");
    assert!(users["bob@example.com"].is_null());
}
