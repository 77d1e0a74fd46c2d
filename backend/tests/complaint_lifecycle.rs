//! End-to-end behaviour of the complaint lifecycle against in-memory ports.

mod support;

use grievance::domain::ports::{
    AddNoteRequest, AddReplyRequest, ComplaintsCommand, ComplaintsQuery, DeleteComplaintRequest,
    SetStatusRequest, SubmitComplaintRequest,
};
use grievance::domain::{
    AttachmentToken, ComplaintId, ComplaintStatus, ErrorCode, ReportFilter, ThreadOrder,
    RECENT_LIMIT, TransitionPolicy, Urgency, UserId, Visibility,
};
use rstest::{fixture, rstest};

use support::{Harness, RecordingMailer, campus};

#[fixture]
fn harness() -> Harness {
    Harness::new(campus(), RecordingMailer::default())
}

fn tokens(raw: &[&str]) -> Vec<AttachmentToken> {
    raw.iter()
        .map(|token| AttachmentToken::new(*token).expect("valid token"))
        .collect()
}

async fn submit(
    harness: &Harness,
    title: &str,
    visibility: Visibility,
    attachments: &[&str],
) -> ComplaintId {
    let student = harness.actor(1);
    harness
        .complaints
        .submit(SubmitComplaintRequest {
            actor: student,
            title: title.to_owned(),
            description: "Room 204 unit not cooling".to_owned(),
            category: Some("Facilities".to_owned()),
            visibility: Some(visibility),
            attachments: tokens(attachments),
        })
        .await
        .expect("submission accepted")
        .complaint
        .id
}

#[rstest]
#[tokio::test]
async fn submission_starts_pending_and_status_change_advances_updated_at(harness: Harness) {
    let id = submit(&harness, "Broken AC", Visibility::Public, &[]).await;
    let submitted = harness.store.complaint(id).expect("stored");
    assert_eq!(submitted.status, ComplaintStatus::Pending);
    assert_eq!(submitted.urgency, Urgency::Normal);

    let updated = harness
        .complaints
        .set_status(SetStatusRequest {
            actor: harness.actor(2),
            complaint_id: id,
            status: ComplaintStatus::UnderProcess,
        })
        .await
        .expect("status updated");

    assert_eq!(updated.status, ComplaintStatus::UnderProcess);
    assert!(updated.updated_at > submitted.updated_at);
}

#[rstest]
#[tokio::test]
async fn attachments_keep_submission_order(harness: Harness) {
    let order = ["c.png", "a.pdf", "b.jpg"];
    let id = submit(&harness, "Leaking roof", Visibility::Public, &order).await;

    let view = harness.complaints.public_view(id).await.expect("view");

    assert_eq!(view.attachments, tokens(&order));
}

#[rstest]
#[tokio::test]
async fn anonymous_identity_is_blank_in_every_outward_view(harness: Harness) {
    let id = submit(&harness, "Harassment report", Visibility::Anonymous, &[]).await;
    let staff = harness.actor(2);

    let public = harness.complaints.public_view(id).await.expect("public view");
    let detail = harness.complaints.staff_view(&staff, id).await.expect("staff view");
    let listed = harness.complaints.list_all(&staff).await.expect("listing");
    let exported = harness
        .complaints
        .export(&staff, &ReportFilter::default())
        .await
        .expect("export");

    for submitter in [&public.submitter, &detail.submitter, &listed[0].submitter] {
        assert!(submitter.username.is_empty());
        assert!(submitter.email.is_empty());
    }
    assert!(exported[0].username.is_empty());
    assert!(exported[0].email.is_empty());
    assert_eq!(exported[0].user_id, None);
}

#[rstest]
#[tokio::test]
async fn public_identity_is_shown_to_staff(harness: Harness) {
    let id = submit(&harness, "Library hours", Visibility::Public, &[]).await;

    let detail = harness
        .complaints
        .staff_view(&harness.actor(2), id)
        .await
        .expect("staff view");

    assert_eq!(detail.submitter.username, "asha");
    assert_eq!(detail.submitter.email, "asha@example.edu");
}

#[rstest]
#[tokio::test]
async fn notes_stay_private_and_replies_read_in_both_orders(harness: Harness) {
    let id = submit(&harness, "Wi-Fi outage", Visibility::Public, &[]).await;
    let staff = harness.actor(2);
    for body in ["first reply", "second reply"] {
        harness
            .complaints
            .add_reply(AddReplyRequest {
                actor: staff.clone(),
                complaint_id: id,
                body: body.to_owned(),
                order: ThreadOrder::NewestFirst,
            })
            .await
            .expect("reply added");
    }
    let notes = harness
        .complaints
        .add_note(AddNoteRequest {
            actor: staff.clone(),
            complaint_id: id,
            body: "router replaced".to_owned(),
        })
        .await
        .expect("note added");

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].author_name.as_deref(), Some("dr.rao"));

    let public = harness.complaints.public_view(id).await.expect("public view");
    assert!(public.notes.is_empty());
    let bodies: Vec<&str> = public.replies.iter().map(|entry| entry.body.as_str()).collect();
    assert_eq!(bodies, ["first reply", "second reply"]);

    let detail = harness.complaints.staff_view(&staff, id).await.expect("staff view");
    let bodies: Vec<&str> = detail.replies.iter().map(|entry| entry.body.as_str()).collect();
    assert_eq!(bodies, ["second reply", "first reply"]);
    assert_eq!(detail.notes.len(), 1);
}

#[rstest]
#[tokio::test]
async fn status_changes_leave_threads_untouched(harness: Harness) {
    let id = submit(&harness, "Cafeteria hygiene", Visibility::Public, &[]).await;
    let staff = harness.actor(2);
    harness
        .complaints
        .add_note(AddNoteRequest {
            actor: staff.clone(),
            complaint_id: id,
            body: "inspection booked".to_owned(),
        })
        .await
        .expect("note added");

    for status in [ComplaintStatus::UnderProcess, ComplaintStatus::Resolved] {
        harness
            .complaints
            .set_status(SetStatusRequest {
                actor: staff.clone(),
                complaint_id: id,
                status,
            })
            .await
            .expect("status updated");
    }

    let notes = harness.complaints.notes(&staff, id).await.expect("notes");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].body, "inspection booked");
}

#[rstest]
#[tokio::test]
async fn delete_cascades_and_missing_id_is_not_found(harness: Harness) {
    let id = submit(&harness, "Parking", Visibility::Public, &["ticket.png"]).await;
    let staff = harness.actor(2);
    harness
        .complaints
        .add_note(AddNoteRequest {
            actor: staff.clone(),
            complaint_id: id,
            body: "towing company contacted".to_owned(),
        })
        .await
        .expect("note added");

    harness
        .complaints
        .delete(DeleteComplaintRequest {
            actor: staff.clone(),
            complaint_id: id,
        })
        .await
        .expect("deleted");

    assert!(harness.store.complaint(id).is_none());
    assert_eq!(harness.store.thread_len(), 0);
    assert_eq!(harness.store.file_count(), 0);

    let err = harness
        .complaints
        .delete(DeleteComplaintRequest {
            actor: staff,
            complaint_id: id,
        })
        .await
        .expect_err("already gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn students_cannot_manage_complaints(harness: Harness) {
    let id = submit(&harness, "Exam schedule", Visibility::Public, &[]).await;

    let err = harness
        .complaints
        .set_status(SetStatusRequest {
            actor: harness.actor(1),
            complaint_id: id,
            status: ComplaintStatus::Resolved,
        })
        .await
        .expect_err("students are not staff");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(
        harness.store.complaint(id).expect("stored").status,
        ComplaintStatus::Pending
    );
}

#[rstest]
#[tokio::test]
async fn strict_policy_rejects_backwards_transitions() {
    let harness = Harness::with_policy(
        campus(),
        RecordingMailer::default(),
        TransitionPolicy::ForwardOnly,
    );
    let id = submit(&harness, "Hostel water", Visibility::Public, &[]).await;
    let staff = harness.actor(2);
    let set = |status| SetStatusRequest {
        actor: staff.clone(),
        complaint_id: id,
        status,
    };
    harness
        .complaints
        .set_status(set(ComplaintStatus::Resolved))
        .await
        .expect("forward jump allowed");

    let err = harness
        .complaints
        .set_status(set(ComplaintStatus::Pending))
        .await
        .expect_err("backwards move rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        harness.store.complaint(id).expect("stored").status,
        ComplaintStatus::Resolved
    );
}

#[rstest]
#[tokio::test]
async fn stats_count_own_and_all_complaints(harness: Harness) {
    let first = submit(&harness, "One", Visibility::Public, &[]).await;
    submit(&harness, "Two", Visibility::Public, &[]).await;
    let staff = harness.actor(2);
    harness
        .complaints
        .set_status(SetStatusRequest {
            actor: staff.clone(),
            complaint_id: first,
            status: ComplaintStatus::Resolved,
        })
        .await
        .expect("resolved");

    let summary = harness.complaints.summary(&staff).await.expect("summary");
    let own = harness
        .complaints
        .own_stats(&harness.actor(1))
        .await
        .expect("own stats");

    assert_eq!((summary.pending, summary.resolved, summary.total), (1, 1, 2));
    assert_eq!(own, summary);
}

#[rstest]
#[tokio::test]
async fn recent_listings_keep_the_newest_five(harness: Harness) {
    let mut submitted = Vec::new();
    for n in 0..7 {
        submitted.push(submit(&harness, &format!("Complaint {n}"), Visibility::Public, &[]).await);
    }
    let student = harness.actor(1);

    let own = harness
        .complaints
        .recent(&student, Some(student.id()))
        .await
        .expect("own recent");
    let everyone = harness
        .complaints
        .recent(&harness.actor(2), None)
        .await
        .expect("admin recent");

    let expected: Vec<ComplaintId> = submitted.iter().rev().take(RECENT_LIMIT).copied().collect();
    assert_eq!(own.iter().map(|c| c.id).collect::<Vec<_>>(), expected);
    assert_eq!(everyone, own);
    let err = harness
        .complaints
        .recent(&student, None)
        .await
        .expect_err("students cannot list everyone");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn per_user_stats_are_self_or_staff(harness: Harness) {
    submit(&harness, "One", Visibility::Anonymous, &[]).await;
    let student = harness.actor(1);

    let by_staff = harness
        .complaints
        .stats_for(&harness.actor(6), UserId::new(1))
        .await
        .expect("staff read");
    let by_self = harness
        .complaints
        .stats_for(&student, UserId::new(1))
        .await
        .expect("self read");
    assert_eq!((by_staff.pending, by_staff.total), (1, 1));
    assert_eq!(by_self, by_staff);

    let err = harness
        .complaints
        .stats_for(&student, UserId::new(2))
        .await
        .expect_err("another user's stats");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn export_filters_by_status_and_reports_empty_results(harness: Harness) {
    submit(&harness, "Open item", Visibility::Public, &[]).await;
    let staff = harness.actor(2);
    let resolved_only = ReportFilter {
        status: Some(ComplaintStatus::Resolved),
        ..ReportFilter::default()
    };

    let err = harness
        .complaints
        .export(&staff, &resolved_only)
        .await
        .expect_err("nothing resolved yet");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "No complaints found");
}
