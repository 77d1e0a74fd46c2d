//! Complaint lifecycle service.
//!
//! Implements [`ComplaintsCommand`] and [`ComplaintsQuery`] over the
//! complaint, attachment and thread repositories. Role checks and input
//! validation run before the first write so a rejected request leaves no
//! trace in storage.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use super::port_errors::{map_attachment_error, map_complaint_error, map_thread_error};
use super::ports::{
    AddNoteRequest, AddReplyRequest, AttachmentRepository, ComplaintRepository, ComplaintsCommand,
    ComplaintsQuery, DeleteComplaintRequest, SetStatusRequest, SubmitComplaintRequest,
    ThreadRepository,
};
use super::{
    Actor, AttachmentToken, Complaint, ComplaintId, ComplaintRecord, ComplaintView, Error,
    MAX_ATTACHMENTS, NewComplaint, NewThreadEntry, RECENT_LIMIT, ReportFilter, ReportRow,
    StatusCounts, ThreadEntry, ThreadKind, ThreadOrder, TransitionPolicy, UserId,
};

/// Complaint service implementing the complaint driving ports.
#[derive(Clone)]
pub struct ComplaintService<R, A, T> {
    complaints: Arc<R>,
    attachments: Arc<A>,
    threads: Arc<T>,
    clock: Arc<dyn Clock>,
    policy: TransitionPolicy,
}

impl<R, A, T> ComplaintService<R, A, T> {
    /// Create a service with the permissive transition policy.
    pub fn new(
        complaints: Arc<R>,
        attachments: Arc<A>,
        threads: Arc<T>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            complaints,
            attachments,
            threads,
            clock,
            policy: TransitionPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

pub(crate) fn complaint_not_found(id: ComplaintId) -> Error {
    Error::not_found(format!("complaint {id} not found")).with_details(json!({ "complaintId": id }))
}

impl<R, A, T> ComplaintService<R, A, T>
where
    R: ComplaintRepository,
    A: AttachmentRepository,
    T: ThreadRepository,
{
    async fn load(&self, id: ComplaintId) -> Result<ComplaintRecord, Error> {
        self.complaints
            .find_by_id(id)
            .await
            .map_err(map_complaint_error)?
            .ok_or_else(|| complaint_not_found(id))
    }

    async fn attachments_for(&self, id: ComplaintId) -> Result<Vec<AttachmentToken>, Error> {
        self.attachments
            .list_for(id)
            .await
            .map_err(map_attachment_error)
    }

    async fn thread(
        &self,
        id: ComplaintId,
        kind: ThreadKind,
        order: ThreadOrder,
    ) -> Result<Vec<ThreadEntry>, Error> {
        self.threads
            .list(id, kind, order)
            .await
            .map_err(map_thread_error)
    }

    async fn view(&self, record: ComplaintRecord) -> Result<ComplaintView, Error> {
        let attachments = self.attachments_for(record.complaint.id).await?;
        Ok(ComplaintView::new(record, attachments))
    }

    async fn views(&self, records: Vec<ComplaintRecord>) -> Result<Vec<ComplaintView>, Error> {
        try_join_all(records.into_iter().map(|record| self.view(record))).await
    }

    async fn append(
        &self,
        entry: NewThreadEntry,
        order: ThreadOrder,
    ) -> Result<Vec<ThreadEntry>, Error> {
        self.load(entry.complaint_id()).await?;
        let created = self
            .threads
            .append(&entry, self.clock.utc())
            .await
            .map_err(map_thread_error)?;
        info!(
            complaint_id = %created.complaint_id,
            entry_id = created.id,
            kind = created.kind.as_str(),
            "thread entry appended"
        );
        self.thread(entry.complaint_id(), entry.kind(), order).await
    }

    /// Remove a complaint whose attachment batch could not be stored.
    async fn discard(&self, id: ComplaintId) {
        match self.complaints.delete(id).await {
            Ok(_) => warn!(complaint_id = %id, "attachment write failed; submission rolled back"),
            Err(err) => error!(
                complaint_id = %id,
                error = %err,
                "attachment write failed and the complaint could not be removed"
            ),
        }
    }
}

#[async_trait]
impl<R, A, T> ComplaintsCommand for ComplaintService<R, A, T>
where
    R: ComplaintRepository,
    A: AttachmentRepository,
    T: ThreadRepository,
{
    async fn submit(&self, request: SubmitComplaintRequest) -> Result<ComplaintView, Error> {
        let SubmitComplaintRequest {
            actor,
            title,
            description,
            category,
            visibility,
            attachments,
        } = request;
        actor.require_submitter()?;
        if attachments.len() > MAX_ATTACHMENTS {
            return Err(
                Error::invalid_request(format!("at most {MAX_ATTACHMENTS} attachments allowed"))
                    .with_details(json!({ "received": attachments.len() })),
            );
        }
        let new = NewComplaint::new(
            actor.id(),
            &title,
            &description,
            category.as_deref(),
            visibility,
        )?;

        let complaint = self
            .complaints
            .insert(&new, self.clock.utc())
            .await
            .map_err(map_complaint_error)?;
        if !attachments.is_empty() {
            if let Err(err) = self.attachments.attach(complaint.id, &attachments).await {
                self.discard(complaint.id).await;
                return Err(map_attachment_error(err));
            }
        }
        info!(
            complaint_id = %complaint.id,
            submitter_id = %actor.id(),
            attachment_count = attachments.len(),
            "complaint submitted"
        );

        let record = self.load(complaint.id).await?;
        self.view(record).await
    }

    async fn set_status(&self, request: SetStatusRequest) -> Result<Complaint, Error> {
        request.actor.require_staff()?;
        let id = request.complaint_id;
        let current = self.load(id).await?;
        self.policy.check(current.complaint.status, request.status)?;

        let updated = self
            .complaints
            .update_status(id, request.status, self.clock.utc())
            .await
            .map_err(map_complaint_error)?
            .ok_or_else(|| complaint_not_found(id))?;
        info!(
            complaint_id = %id,
            from = current.complaint.status.as_str(),
            to = updated.status.as_str(),
            actor_id = %request.actor.id(),
            "complaint status updated"
        );
        Ok(updated)
    }

    async fn delete(&self, request: DeleteComplaintRequest) -> Result<(), Error> {
        request.actor.require_staff()?;
        let id = request.complaint_id;
        let deleted = self
            .complaints
            .delete(id)
            .await
            .map_err(map_complaint_error)?;
        if !deleted {
            return Err(complaint_not_found(id));
        }
        info!(complaint_id = %id, actor_id = %request.actor.id(), "complaint deleted");
        Ok(())
    }

    async fn add_note(&self, request: AddNoteRequest) -> Result<Vec<ThreadEntry>, Error> {
        request.actor.require_staff()?;
        let entry = NewThreadEntry::new(
            request.complaint_id,
            ThreadKind::Note,
            request.actor.id(),
            &request.body,
        )?;
        self.append(entry, ThreadOrder::NewestFirst).await
    }

    async fn add_reply(&self, request: AddReplyRequest) -> Result<Vec<ThreadEntry>, Error> {
        request.actor.require_staff()?;
        let entry = NewThreadEntry::new(
            request.complaint_id,
            ThreadKind::Reply,
            request.actor.id(),
            &request.body,
        )?;
        self.append(entry, request.order).await
    }
}

#[async_trait]
impl<R, A, T> ComplaintsQuery for ComplaintService<R, A, T>
where
    R: ComplaintRepository,
    A: AttachmentRepository,
    T: ThreadRepository,
{
    async fn staff_view(&self, actor: &Actor, id: ComplaintId) -> Result<ComplaintView, Error> {
        actor.require_staff()?;
        let record = self.load(id).await?;
        let replies = self
            .thread(id, ThreadKind::Reply, ThreadOrder::NewestFirst)
            .await?;
        let notes = self
            .thread(id, ThreadKind::Note, ThreadOrder::NewestFirst)
            .await?;
        Ok(self.view(record).await?.with_replies(replies).with_notes(notes))
    }

    async fn public_view(&self, id: ComplaintId) -> Result<ComplaintView, Error> {
        let record = self.load(id).await?;
        let replies = self
            .thread(id, ThreadKind::Reply, ThreadOrder::OldestFirst)
            .await?;
        Ok(self.view(record).await?.with_replies(replies))
    }

    async fn list_all(&self, actor: &Actor) -> Result<Vec<ComplaintView>, Error> {
        actor.require_staff()?;
        let records = self
            .complaints
            .list_all()
            .await
            .map_err(map_complaint_error)?;
        self.views(records).await
    }

    async fn list_own(&self, actor: &Actor) -> Result<Vec<ComplaintView>, Error> {
        let records = self
            .complaints
            .list_by_submitter(actor.id())
            .await
            .map_err(map_complaint_error)?;
        self.views(records).await
    }

    async fn notes(&self, actor: &Actor, id: ComplaintId) -> Result<Vec<ThreadEntry>, Error> {
        actor.require_staff()?;
        self.load(id).await?;
        self.thread(id, ThreadKind::Note, ThreadOrder::NewestFirst)
            .await
    }

    async fn replies(
        &self,
        id: ComplaintId,
        order: ThreadOrder,
    ) -> Result<Vec<ThreadEntry>, Error> {
        self.load(id).await?;
        self.thread(id, ThreadKind::Reply, order).await
    }

    async fn summary(&self, actor: &Actor) -> Result<StatusCounts, Error> {
        actor.require_staff()?;
        self.complaints
            .status_counts(None)
            .await
            .map_err(map_complaint_error)
    }

    async fn own_stats(&self, actor: &Actor) -> Result<StatusCounts, Error> {
        self.complaints
            .status_counts(Some(actor.id()))
            .await
            .map_err(map_complaint_error)
    }

    async fn stats_for(&self, actor: &Actor, user: UserId) -> Result<StatusCounts, Error> {
        actor.require_self_or_staff(user)?;
        self.complaints
            .status_counts(Some(user))
            .await
            .map_err(map_complaint_error)
    }

    async fn recent(
        &self,
        actor: &Actor,
        submitter: Option<UserId>,
    ) -> Result<Vec<Complaint>, Error> {
        match submitter {
            Some(user) => actor.require_self_or_staff(user)?,
            None => actor.require_staff()?,
        }
        self.complaints
            .recent(submitter, RECENT_LIMIT)
            .await
            .map_err(map_complaint_error)
    }

    async fn export(&self, actor: &Actor, filter: &ReportFilter) -> Result<Vec<ReportRow>, Error> {
        actor.require_staff()?;
        filter.validate()?;
        let records = self
            .complaints
            .export(filter)
            .await
            .map_err(map_complaint_error)?;
        if records.is_empty() {
            return Err(Error::not_found("No complaints found"));
        }
        info!(row_count = records.len(), actor_id = %actor.id(), "report exported");
        Ok(records.into_iter().map(ReportRow::from).collect())
    }
}

#[cfg(test)]
#[path = "complaint_service_tests.rs"]
mod tests;
