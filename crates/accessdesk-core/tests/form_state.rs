mod common;

use accessdesk_core::form::RESOURCE_ERROR;
use accessdesk_core::prelude::*;
use assert_json_diff::assert_json_eq;
use serde_json::{Value, json};

use common::{FakeApi, apps, sample_policy};

async fn edit_form(api: &FakeApi) -> PolicyForm {
    PolicyForm::load(api, apps(), Some(sample_policy()), false).await
}

#[tokio::test]
async fn load_fetches_reference_data() {
    let api = FakeApi::seeded();
    let form = PolicyForm::load(&api, apps(), None, false).await;

    assert_eq!(form.all_users().len(), 3);
    assert_eq!(form.all_groups().len(), 2);
    assert_eq!(form.resource_error(), None);
    assert!(api.called("list_users"));
    assert!(api.called("list_groups"));
}

#[tokio::test]
async fn reference_data_failure_is_not_fatal() {
    let api = FakeApi::seeded();
    api.fail("list_groups");
    let mut form = PolicyForm::load(&api, apps(), None, false).await;

    assert!(form.all_users().is_empty());
    assert!(form.all_groups().is_empty());
    assert_eq!(form.resource_error(), Some(RESOURCE_ERROR));

    form.set_name("Still usable");
    assert!(form.build_payload().is_ok());
}

#[tokio::test]
async fn visibility_toggle_preserves_selections() {
    let api = FakeApi::seeded();
    let mut form = PolicyForm::load(&api, apps(), None, false).await;
    form.set_name("Toggle");
    form.add_group_row();
    form.select_group(0, "g2");
    form.add_user_row();
    form.select_user(0, "u3");

    form.set_visibility(Visibility::Everyone);
    assert_eq!(form.selected_groups().len(), 1);
    form.set_visibility(Visibility::Specific);

    let payload = form.build_payload().unwrap();
    assert_eq!(payload.visible_group_ids, Some(vec!["g2".to_string()]));
    assert_eq!(payload.visible_user_ids, Some(vec!["u3".to_string()]));
}

#[tokio::test]
async fn removing_reviewer_strips_it_from_approval_steps() {
    let api = FakeApi::seeded();
    let mut form = edit_form(&api).await;
    form.add_approval_step(ApprovalStepType::Specific);
    form.set_approval_step_users(2, vec!["u3".into()]);

    form.toggle_reviewer("u3");

    assert_eq!(form.reviewer_ids(), &["u1".to_string()]);
    for step in form.approval_steps() {
        assert!(!step.selected_user_ids.contains(&"u3".to_string()));
    }
    assert_eq!(form.approval_steps()[1].selected_user_ids, vec!["u1".to_string()]);
}

#[tokio::test]
async fn fixed_duration_needs_positive_days() {
    let api = &FakeApi::seeded();
    let mut form = PolicyForm::load(api, apps(), None, false).await;
    form.set_name("Fixed");
    form.set_duration_type(AccessDurationType::Fixed);
    form.set_duration_days(0);

    let err = form
        .submit(|payload| async move { api.create_policy(&payload).await })
        .await
        .unwrap_err();

    assert_eq!(err, SubmitError::Invalid(FormError::InvalidFixedDuration));
    assert_eq!(
        form.error(),
        Some("Please provide a valid number of days for fixed access")
    );
    assert!(!api.called("create_policy"));
}

#[tokio::test]
async fn unmodified_round_trip_matches_original() {
    let api = FakeApi::seeded();
    let original = sample_policy();
    let form = edit_form(&api).await;

    let payload = form.build_payload().unwrap();

    assert_eq!(payload, original);
    assert_json_eq!(
        serde_json::to_value(&payload).unwrap(),
        serde_json::to_value(&original).unwrap()
    );
}

async fn assert_untouched_edit_round_trips(raw: Value) {
    let api = FakeApi::seeded();
    let original: Policy = serde_json::from_value(raw.clone()).unwrap();
    let form = PolicyForm::load(&api, apps(), Some(original.clone()), false).await;

    let payload = form.build_payload().unwrap();

    assert_eq!(payload, original);
    assert_json_eq!(serde_json::to_value(&payload).unwrap(), raw);
}

#[tokio::test]
async fn round_trip_keeps_object_lists_and_nested_fields() {
    assert_untouched_edit_round_trips(json!({
        "id": "p-contractors",
        "name": "Contractor GitHub",
        "description": "",
        "appId": "a2",
        "app": {
            "id": "a2",
            "name": "GitHub",
            "ownerId": "u1",
            "createdAt": "2023-11-02T08:00:00Z"
        },
        "visibleToEveryone": false,
        "visibleGroups": [{
            "id": "g2",
            "name": "Sales",
            "note": "EMEA only",
            "createdAt": "2024-01-01T00:00:00Z"
        }],
        "accessDurationType": "USER_REQUESTED",
        "minDays": 3,
        "maxDays": 30,
        "useAppOwnerAsReviewer": true,
        "reviewers": [{
            "id": "u1",
            "email": "admin@example.com",
            "firstName": "Ada",
            "lastName": "Admin",
            "createdAt": "2024-01-01T00:00:00Z",
            "deletedAt": null
        }],
        "createdAt": "2024-05-01T09:00:00Z"
    }))
    .await;
}

#[tokio::test]
async fn round_trip_keeps_id_only_lists() {
    assert_untouched_edit_round_trips(json!({
        "id": "p-wiki",
        "name": "Wiki readers",
        "description": "Read access to the wiki",
        "appId": "a2",
        "visibleToEveryone": false,
        "visibleGroupIds": ["g1", "g9"],
        "visibleUserIds": ["u3"],
        "accessDurationType": "FIXED",
        "accessDurationDays": 7,
        "requireReason": false,
        "useAppOwnerAsReviewer": false,
        "reviewerIds": ["u2", "u7"],
        "approvalSteps": [
            {"id": "s1", "type": "specific", "escalate": false, "userIds": ["u2"]}
        ],
        "provisioningSteps": [],
        "revocationSteps": [{
            "id": "r1",
            "type": "remove_from_group",
            "target": "engineering",
            "provider": "okta"
        }]
    }))
    .await;
}

#[tokio::test]
async fn round_trip_keeps_lists_of_policy_open_to_everyone() {
    assert_untouched_edit_round_trips(json!({
        "id": "p-open",
        "name": "Slack",
        "appId": "a1",
        "visibleToEveryone": true,
        "visibleGroups": [],
        "visibleUserIds": [],
        "accessDurationType": "INDEFINITE",
        "useAppOwnerAsReviewer": true,
        "reviewerIds": [],
        "approvalSteps": [{"id": "s1", "type": "app_owner", "escalate": false}]
    }))
    .await;
}

#[tokio::test]
async fn edits_fill_in_lists_the_record_lacked() {
    let api = FakeApi::seeded();
    let original: Policy = serde_json::from_value(json!({
        "id": "p-bare",
        "name": "Bare",
        "appId": "a1",
        "accessDurationType": "FIXED",
        "accessDurationDays": 14
    }))
    .unwrap();
    let mut form = PolicyForm::load(&api, apps(), Some(original), false).await;
    form.add_group_row();
    form.select_group(0, "g1");
    form.toggle_reviewer("u2");
    form.set_duration_type(AccessDurationType::UserRequested);

    let payload = form.build_payload().unwrap();

    assert_eq!(payload.visible_group_ids, Some(vec!["g1".to_string()]));
    assert_eq!(
        payload.visible_groups.as_ref().map(|g| g[0].name.as_str()),
        Some("Engineering")
    );
    assert_eq!(payload.visible_users, None);
    assert_eq!(payload.visible_user_ids, None);
    assert_eq!(payload.reviewer_ids, Some(vec!["u2".to_string()]));
    assert_eq!(
        payload.reviewers.as_ref().map(|r| r[0].email.as_str()),
        Some("grace@example.com")
    );
    assert_eq!(payload.access_duration_days, None);
    assert_eq!((payload.min_days, payload.max_days), (Some(1), Some(90)));
    assert_eq!(payload.require_reason, None);
    assert_eq!(payload.provisioning_steps, None);
    assert_eq!(payload.approval_steps, None);
}

#[tokio::test]
async fn read_only_form_ignores_every_mutation() {
    let api = FakeApi::seeded();
    let mut form = PolicyForm::load(&api, apps(), Some(sample_policy()), true).await;

    form.set_name("changed");
    form.set_description("changed");
    form.select_app("a2");
    form.set_visibility(Visibility::Everyone);
    form.set_duration_type(AccessDurationType::Indefinite);
    form.set_use_app_owner_as_reviewer(true);
    form.toggle_reviewer("u1");
    form.add_approval_step(ApprovalStepType::AppOwner);
    form.reset_approval_steps();
    form.add_step(StepKind::Provisioning);
    form.remove_step(StepKind::Revocation, 0);
    form.update_step(StepKind::Provisioning, 0, StepField::Provider, "github");
    form.add_group_row();
    form.remove_user_row(0);

    form.set_read_only(false);
    assert_eq!(form.build_payload().unwrap(), sample_policy());
}

#[tokio::test]
async fn submit_hands_payload_to_callback() {
    let api = &FakeApi::seeded();
    let mut form = edit_form(api).await;
    form.set_name("Renamed");

    let saved = form
        .submit(|payload| async move { api.update_policy("p1", &payload).await })
        .await
        .unwrap();

    assert_eq!(saved.name, "Renamed");
    assert_eq!(saved.created_at, sample_policy().created_at);
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn backend_rejection_is_reported() {
    let api = &FakeApi::seeded();
    api.fail("update_policy");
    let mut form = edit_form(api).await;

    let err = form
        .submit(|payload| async move { api.update_policy("p1", &payload).await })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to update policy: Internal Server Error");
    assert_eq!(form.error(), None);
}
