//! Escalation and notification behaviour against in-memory ports.

mod support;

use grievance::domain::ports::{
    ComplaintsCommand, EscalateRequest, EscalationCommand, SetStatusRequest,
    SubmitComplaintRequest,
};
use grievance::domain::{
    AttachmentToken, ComplaintId, ComplaintStatus, DeliveryFailure, ErrorCode,
    NotificationOutcome, Urgency, Visibility,
};
use rstest::rstest;

use support::{Harness, RecordingMailer, campus, user};

async fn submit(harness: &Harness, visibility: Visibility, attachments: &[&str]) -> ComplaintId {
    harness
        .complaints
        .submit(SubmitComplaintRequest {
            actor: harness.actor(1),
            title: "Broken AC".to_owned(),
            description: "Room 204 unit not cooling".to_owned(),
            category: None,
            visibility: Some(visibility),
            attachments: attachments
                .iter()
                .map(|token| AttachmentToken::new(*token).expect("valid token"))
                .collect(),
        })
        .await
        .expect("submission accepted")
        .complaint
        .id
}

fn escalate(harness: &Harness, id: ComplaintId, role: Option<&str>, notify_all: bool) -> EscalateRequest {
    EscalateRequest {
        actor: harness.actor(2),
        complaint_id: id,
        target_role: role.map(str::to_owned),
        notify_all,
    }
}

#[rstest]
#[tokio::test]
async fn escalating_to_the_principal_after_triage() {
    let harness = Harness::new(campus(), RecordingMailer::default());
    let id = submit(&harness, Visibility::Public, &[]).await;
    harness
        .complaints
        .set_status(SetStatusRequest {
            actor: harness.actor(2),
            complaint_id: id,
            status: ComplaintStatus::UnderProcess,
        })
        .await
        .expect("status updated");

    let outcome = harness
        .escalations
        .escalate(escalate(&harness, id, Some("Principal"), false))
        .await
        .expect("escalated");

    assert!(outcome.delivered());
    assert_eq!(outcome.urgency, Urgency::High);
    assert_eq!(outcome.recipients, ["principal@example.edu"]);
    let sent = harness.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Complaint Escalated to Principal");
    assert!(sent[0].body_text.contains("Escalated By: dr.rao"));

    let stored = harness.store.complaint(id).expect("stored");
    assert_eq!(stored.urgency, Urgency::High);
    assert_eq!(stored.status, ComplaintStatus::UnderProcess);
    assert_eq!(stored.escalated_to.as_deref(), Some("principal"));
}

#[rstest]
#[tokio::test]
async fn unknown_role_fails_without_touching_urgency() {
    let harness = Harness::new(campus(), RecordingMailer::default());
    let id = submit(&harness, Visibility::Public, &[]).await;

    let err = harness
        .escalations
        .escalate(escalate(&harness, id, Some("nonexistent-role"), false))
        .await
        .expect_err("no such authority");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "no authority users found");
    let stored = harness.store.complaint(id).expect("stored");
    assert_eq!(stored.urgency, Urgency::Normal);
    assert!(stored.escalated_to.is_none());
    assert!(harness.mailer.sent().is_empty());
}

#[rstest]
#[tokio::test]
async fn notify_all_reaches_exactly_the_escalation_chain() {
    let mut users = campus();
    users.push(user(7, "dr.sen", "hod"));
    let harness = Harness::new(users, RecordingMailer::default());
    let id = submit(&harness, Visibility::Public, &[]).await;

    let outcome = harness
        .escalations
        .escalate(escalate(&harness, id, Some("faculty"), true))
        .await
        .expect("escalated");

    let mut recipients = outcome.recipients.clone();
    recipients.sort();
    assert_eq!(
        recipients,
        [
            "dr.iyer@example.edu",
            "dr.rao@example.edu",
            "dr.sen@example.edu",
            "principal@example.edu",
            "root@example.edu",
        ]
    );
    assert_eq!(outcome.escalated_to, "hod,principal,super_admin");
    assert_eq!(
        harness.mailer.sent()[0].subject,
        "Complaint Escalation - All Authorities Notified"
    );
}

#[rstest]
#[tokio::test]
async fn failing_transport_still_persists_high_urgency() {
    let harness = Harness::new(campus(), RecordingMailer::failing());
    let id = submit(&harness, Visibility::Public, &[]).await;

    let outcome = harness
        .escalations
        .escalate(escalate(&harness, id, Some("principal"), false))
        .await
        .expect("escalation stands");

    assert!(!outcome.delivered());
    assert!(matches!(
        outcome.notification,
        NotificationOutcome::Failed {
            kind: DeliveryFailure::DeliveryFailed
        }
    ));
    assert_eq!(
        harness.store.complaint(id).expect("stored").urgency,
        Urgency::High
    );
}

#[rstest]
#[tokio::test]
async fn missing_attachment_is_dropped_from_the_bundle() {
    let harness = Harness::new(campus(), RecordingMailer::default());
    harness.files.put("photo.jpg", b"jpeg bytes");
    harness.files.put("quote.pdf", b"pdf bytes");
    let id = submit(&harness, Visibility::Public, &["photo.jpg", "quote.pdf"]).await;
    harness.files.remove("quote.pdf");

    let outcome = harness
        .escalations
        .escalate(escalate(&harness, id, Some("principal"), false))
        .await
        .expect("escalated");

    assert!(outcome.delivered());
    assert_eq!(outcome.attachments_sent, 1);
    assert_eq!(outcome.attachments_dropped, 1);
    let sent = harness.mailer.sent();
    let names: Vec<&str> = sent[0]
        .attachments
        .iter()
        .map(|file| file.filename.as_str())
        .collect();
    assert_eq!(names, ["photo.jpg"]);
}

#[rstest]
#[tokio::test]
async fn anonymous_submitter_never_appears_in_mail() {
    let harness = Harness::new(campus(), RecordingMailer::default());
    let id = submit(&harness, Visibility::Anonymous, &[]).await;

    harness
        .escalations
        .escalate(escalate(&harness, id, Some("principal"), false))
        .await
        .expect("escalated");

    let mail = &harness.mailer.sent()[0];
    for body in [&mail.body_text, &mail.body_html] {
        assert!(!body.contains("asha"));
    }
}

#[rstest]
#[tokio::test]
async fn repeated_escalation_resends() {
    let harness = Harness::new(campus(), RecordingMailer::default());
    let id = submit(&harness, Visibility::Public, &[]).await;

    for _ in 0..2 {
        harness
            .escalations
            .escalate(escalate(&harness, id, Some("principal"), false))
            .await
            .expect("escalated");
    }

    assert_eq!(harness.mailer.sent().len(), 2);
}

#[rstest]
#[tokio::test]
async fn students_cannot_escalate() {
    let harness = Harness::new(campus(), RecordingMailer::default());
    let id = submit(&harness, Visibility::Public, &[]).await;
    let mut request = escalate(&harness, id, Some("principal"), false);
    request.actor = harness.actor(1);

    let err = harness
        .escalations
        .escalate(request)
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert!(harness.mailer.sent().is_empty());
}
