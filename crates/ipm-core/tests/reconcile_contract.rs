//! Reconciler contract tests
//!
//! Verifies the discover → lookup → compare → swap → notify sequence against
//! scripted collaborators: label-based correlation, pure-addition swaps,
//! exactly one notification per run, and the failure-notification boundary.

mod common;

use common::{ExhaustedProbe, RecordingNotifier, ScriptedAddressSet, StaticProbe};
use ipm_core::{Error, Outcome, Reconciler, TemplateMember};
use std::net::Ipv4Addr;

const TEMPLATE_ID: &str = "ipm-abc123";
const LABEL: &str = "home-office";

fn reconciler(
    probe: StaticProbe,
    client: ScriptedAddressSet,
    notifier: RecordingNotifier,
) -> Reconciler {
    Reconciler::new(
        Box::new(probe),
        Box::new(client),
        Box::new(notifier),
        TEMPLATE_ID,
        LABEL,
    )
}

#[tokio::test]
async fn no_existing_member_performs_pure_addition() {
    let probe = StaticProbe::new(Ipv4Addr::new(203, 0, 113, 5));
    let client = ScriptedAddressSet::new(Vec::new());
    let notifier = RecordingNotifier::new();

    let outcome = reconciler(probe, client.clone(), notifier.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Updated {
            previous: None,
            current: Ipv4Addr::new(203, 0, 113, 5),
        }
    );

    let calls = client.swap_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].template_id, TEMPLATE_ID);
    assert!(calls[0].original.is_empty(), "must be a pure addition");
    assert_eq!(
        calls[0].replacement,
        vec![TemplateMember::new("203.0.113.5/32", LABEL)]
    );
}

#[tokio::test]
async fn matching_member_skips_swap_and_notifies_unchanged() {
    let probe = StaticProbe::new(Ipv4Addr::new(203, 0, 113, 5));
    let client = ScriptedAddressSet::new(vec![TemplateMember::new("203.0.113.5/32", LABEL)]);
    let notifier = RecordingNotifier::new();

    let outcome = reconciler(probe, client.clone(), notifier.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Unchanged {
            current: Ipv4Addr::new(203, 0, 113, 5),
        }
    );
    assert!(client.swap_calls().is_empty());

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("unchanged"), "got: {}", messages[0]);
}

#[tokio::test]
async fn changed_member_swaps_old_for_new() {
    let probe = StaticProbe::new(Ipv4Addr::new(203, 0, 113, 5));
    let client = ScriptedAddressSet::new(vec![TemplateMember::new("198.51.100.7/32", LABEL)]);
    let notifier = RecordingNotifier::new();

    let outcome = reconciler(probe, client.clone(), notifier.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Updated {
            previous: Some("198.51.100.7/32".to_string()),
            current: Ipv4Addr::new(203, 0, 113, 5),
        }
    );

    let calls = client.swap_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].original,
        vec![TemplateMember::new("198.51.100.7/32", LABEL)]
    );
    assert_eq!(
        calls[0].replacement,
        vec![TemplateMember::new("203.0.113.5/32", LABEL)]
    );

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("203.0.113.5"), "got: {}", messages[0]);
}

#[tokio::test]
async fn correlation_is_by_label_not_address() {
    // Another label already holds our exact address; that member is not
    // ours, so the run must still add a member under our label.
    let probe = StaticProbe::new(Ipv4Addr::new(203, 0, 113, 5));
    let client =
        ScriptedAddressSet::new(vec![TemplateMember::new("203.0.113.5/32", "someone-else")]);
    let notifier = RecordingNotifier::new();

    let outcome = reconciler(probe, client.clone(), notifier)
        .run()
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::Updated { previous: None, .. }));
    let calls = client.swap_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].original.is_empty());
    assert_eq!(calls[0].replacement[0].label, LABEL);
}

#[tokio::test]
async fn discovery_failure_notifies_and_propagates() {
    let client = ScriptedAddressSet::new(Vec::new());
    let notifier = RecordingNotifier::new();
    let reconciler = Reconciler::new(
        Box::new(ExhaustedProbe),
        Box::new(client.clone()),
        Box::new(notifier.clone()),
        TEMPLATE_ID,
        LABEL,
    );

    let err = reconciler.run().await.unwrap_err();
    assert!(matches!(err, Error::DiscoveryExhausted));

    // Nothing remote happens once discovery has already failed.
    assert_eq!(client.describe_call_count(), 0);

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("failed"), "got: {}", messages[0]);
}

#[tokio::test]
async fn lookup_failure_is_wrapped_with_context() {
    let probe = StaticProbe::new(Ipv4Addr::new(203, 0, 113, 5));
    let client = ScriptedAddressSet::failing_describe();
    let notifier = RecordingNotifier::new();

    let err = reconciler(probe, client, notifier.clone())
        .run()
        .await
        .unwrap_err();

    match err {
        Error::RemoteLookup(msg) => assert!(msg.contains(TEMPLATE_ID), "got: {msg}"),
        other => panic!("expected RemoteLookup, got {other:?}"),
    }
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn notifier_failure_never_masks_the_primary_error() {
    let probe = StaticProbe::new(Ipv4Addr::new(203, 0, 113, 5));
    let client = ScriptedAddressSet::failing_swap(Vec::new());
    let notifier = RecordingNotifier::failing();

    let err = reconciler(probe, client, notifier.clone())
        .run()
        .await
        .unwrap_err();

    // The swap failure survives even though the failure notification also
    // failed.
    assert!(matches!(err, Error::RemoteSwap(_)), "got {err:?}");
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn notifier_failure_does_not_fail_a_successful_run() {
    let probe = StaticProbe::new(Ipv4Addr::new(203, 0, 113, 5));
    let client = ScriptedAddressSet::new(vec![TemplateMember::new("203.0.113.5/32", LABEL)]);
    let notifier = RecordingNotifier::failing();

    let outcome = reconciler(probe, client, notifier).run().await.unwrap();
    assert!(matches!(outcome, Outcome::Unchanged { .. }));
}

#[tokio::test]
async fn exactly_one_notification_per_run() {
    for members in [
        Vec::new(),
        vec![TemplateMember::new("203.0.113.5/32", LABEL)],
        vec![TemplateMember::new("198.51.100.7/32", LABEL)],
    ] {
        let probe = StaticProbe::new(Ipv4Addr::new(203, 0, 113, 5));
        let client = ScriptedAddressSet::new(members);
        let notifier = RecordingNotifier::new();

        reconciler(probe, client, notifier.clone())
            .run()
            .await
            .unwrap();
        assert_eq!(notifier.messages().len(), 1);
    }
}
