//! In-memory port doubles shared by the integration tests.
//!
//! Integration tests compile as separate crates, so the `mockall` mocks
//! generated under `cfg(test)` are not visible here. These doubles keep
//! just enough state to exercise the services end to end.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

use grievance::domain::ports::{
    AttachmentRepository, AttachmentRepositoryError, ComplaintRepository,
    ComplaintRepositoryError, FileStore, FileStoreError, MailTransport, MailTransportError,
    ThreadRepository, ThreadRepositoryError, UserDirectory, UserDirectoryError,
};
use grievance::domain::{
    Actor, AttachmentToken, Complaint, ComplaintId, ComplaintRecord, ComplaintService,
    ComplaintStatus, EscalationService, NewComplaint, NewThreadEntry, NotificationPorts,
    OutboundMail, Recipient, ReportFilter, Role, StatusCounts, SubmitterIdentity, ThreadEntry,
    ThreadKind, ThreadOrder, TransitionPolicy, Urgency, UserId,
};
use grievance::inbound::http::state::HttpState;

/// A row of the shared `users` table.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl UserRow {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.username.clone(), Role::parse(&self.role))
    }
}

#[derive(Default)]
struct State {
    users: Vec<UserRow>,
    complaints: BTreeMap<i64, Complaint>,
    files: Vec<(ComplaintId, AttachmentToken)>,
    threads: Vec<ThreadEntry>,
    next_complaint: i64,
    next_entry: i64,
}

impl State {
    fn user(&self, id: UserId) -> Option<&UserRow> {
        self.users.iter().find(|user| user.id == id)
    }

    fn record(&self, complaint: &Complaint) -> ComplaintRecord {
        let submitter = self
            .user(complaint.submitter_id)
            .map(|user| SubmitterIdentity::new(user.username.clone(), user.email.clone()))
            .unwrap_or_default();
        ComplaintRecord {
            complaint: complaint.clone(),
            submitter,
        }
    }

    fn records_newest_first(&self, keep: impl Fn(&Complaint) -> bool) -> Vec<ComplaintRecord> {
        let mut records: Vec<ComplaintRecord> = self
            .complaints
            .values()
            .filter(|complaint| keep(complaint))
            .map(|complaint| self.record(complaint))
            .collect();
        records.sort_by(|a, b| {
            (b.complaint.created_at, b.complaint.id.get())
                .cmp(&(a.complaint.created_at, a.complaint.id.get()))
        });
        records
    }
}

/// One store backing the complaint, attachment, thread and directory ports.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn with_users(users: Vec<UserRow>) -> Self {
        let store = Self::default();
        store.lock().users = users;
        store
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("store lock")
    }

    pub fn complaint(&self, id: ComplaintId) -> Option<Complaint> {
        self.lock().complaints.get(&id.get()).cloned()
    }

    pub fn thread_len(&self) -> usize {
        self.lock().threads.len()
    }

    pub fn file_count(&self) -> usize {
        self.lock().files.len()
    }
}

/// The export predicate the SQL adapter applies, over in-memory records.
fn report_matches(filter: &ReportFilter, record: &ComplaintRecord) -> bool {
    let complaint = &record.complaint;
    filter
        .created_window()
        .is_none_or(|(start, end)| complaint.created_at >= start && complaint.created_at < end)
        && filter.status.is_none_or(|status| complaint.status == status)
        && filter
            .visibility
            .is_none_or(|visibility| complaint.visibility == visibility)
}

#[async_trait]
impl ComplaintRepository for InMemoryStore {
    async fn insert(
        &self,
        complaint: &NewComplaint,
        at: DateTime<Utc>,
    ) -> Result<Complaint, ComplaintRepositoryError> {
        let mut state = self.lock();
        state.next_complaint += 1;
        let created = Complaint {
            id: ComplaintId::new(state.next_complaint),
            submitter_id: complaint.submitter_id(),
            title: complaint.title().to_owned(),
            description: complaint.description().to_owned(),
            category: complaint.category().map(str::to_owned),
            visibility: complaint.visibility(),
            urgency: complaint.urgency(),
            status: complaint.status(),
            escalated_to: None,
            created_at: at,
            updated_at: at,
        };
        state.complaints.insert(created.id.get(), created.clone());
        Ok(created)
    }

    async fn find_by_id(
        &self,
        id: ComplaintId,
    ) -> Result<Option<ComplaintRecord>, ComplaintRepositoryError> {
        let state = self.lock();
        Ok(state
            .complaints
            .get(&id.get())
            .map(|complaint| state.record(complaint)))
    }

    async fn list_all(&self) -> Result<Vec<ComplaintRecord>, ComplaintRepositoryError> {
        Ok(self.lock().records_newest_first(|_| true))
    }

    async fn list_by_submitter(
        &self,
        submitter: UserId,
    ) -> Result<Vec<ComplaintRecord>, ComplaintRepositoryError> {
        Ok(self
            .lock()
            .records_newest_first(|complaint| complaint.submitter_id == submitter))
    }

    async fn update_status(
        &self,
        id: ComplaintId,
        status: ComplaintStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        let mut state = self.lock();
        Ok(state.complaints.get_mut(&id.get()).map(|complaint| {
            complaint.status = status;
            complaint.updated_at = at;
            complaint.clone()
        }))
    }

    async fn mark_escalated(
        &self,
        id: ComplaintId,
        escalated_to: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        let mut state = self.lock();
        Ok(state.complaints.get_mut(&id.get()).map(|complaint| {
            complaint.urgency = Urgency::High;
            complaint.escalated_to = Some(escalated_to.to_owned());
            complaint.updated_at = at;
            complaint.clone()
        }))
    }

    async fn delete(&self, id: ComplaintId) -> Result<bool, ComplaintRepositoryError> {
        let mut state = self.lock();
        state.files.retain(|(owner, _)| *owner != id);
        state.threads.retain(|entry| entry.complaint_id != id);
        Ok(state.complaints.remove(&id.get()).is_some())
    }

    async fn recent(
        &self,
        submitter: Option<UserId>,
        limit: usize,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError> {
        let records = self
            .lock()
            .records_newest_first(|complaint| {
                submitter.is_none_or(|id| complaint.submitter_id == id)
            });
        Ok(records
            .into_iter()
            .take(limit)
            .map(|record| record.complaint)
            .collect())
    }

    async fn status_counts(
        &self,
        submitter: Option<UserId>,
    ) -> Result<StatusCounts, ComplaintRepositoryError> {
        let state = self.lock();
        Ok(StatusCounts::tally(
            state
                .complaints
                .values()
                .filter(|complaint| submitter.is_none_or(|id| complaint.submitter_id == id))
                .map(|complaint| complaint.status),
        ))
    }

    async fn export(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<ComplaintRecord>, ComplaintRepositoryError> {
        let records = self.lock().records_newest_first(|_| true);
        Ok(records
            .into_iter()
            .filter(|record| report_matches(filter, record))
            .collect())
    }
}

#[async_trait]
impl AttachmentRepository for InMemoryStore {
    async fn attach(
        &self,
        complaint: ComplaintId,
        tokens: &[AttachmentToken],
    ) -> Result<(), AttachmentRepositoryError> {
        let mut state = self.lock();
        state
            .files
            .extend(tokens.iter().cloned().map(|token| (complaint, token)));
        Ok(())
    }

    async fn list_for(
        &self,
        complaint: ComplaintId,
    ) -> Result<Vec<AttachmentToken>, AttachmentRepositoryError> {
        Ok(self
            .lock()
            .files
            .iter()
            .filter(|(owner, _)| *owner == complaint)
            .map(|(_, token)| token.clone())
            .collect())
    }
}

#[async_trait]
impl ThreadRepository for InMemoryStore {
    async fn append(
        &self,
        entry: &NewThreadEntry,
        at: DateTime<Utc>,
    ) -> Result<ThreadEntry, ThreadRepositoryError> {
        let mut state = self.lock();
        state.next_entry += 1;
        let stored = ThreadEntry {
            id: state.next_entry,
            complaint_id: entry.complaint_id(),
            kind: entry.kind(),
            author_id: entry.author_id(),
            author_name: state
                .user(entry.author_id())
                .map(|user| user.username.clone()),
            body: entry.body().to_owned(),
            created_at: at,
        };
        state.threads.push(stored.clone());
        Ok(stored)
    }

    async fn list(
        &self,
        complaint: ComplaintId,
        kind: ThreadKind,
        order: ThreadOrder,
    ) -> Result<Vec<ThreadEntry>, ThreadRepositoryError> {
        let mut entries: Vec<ThreadEntry> = self
            .lock()
            .threads
            .iter()
            .filter(|entry| entry.complaint_id == complaint && entry.kind == kind)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| (entry.created_at, entry.id));
        if order == ThreadOrder::NewestFirst {
            entries.reverse();
        }
        Ok(entries)
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_roles(&self, roles: &[Role]) -> Result<Vec<Recipient>, UserDirectoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter_map(|user| {
                let role = Role::parse(&user.role);
                roles.contains(&role).then(|| Recipient {
                    email: user.email.clone(),
                    role,
                })
            })
            .collect())
    }
}

/// Uploads keyed by token. Tokens absent from the map resolve to `None`.
#[derive(Default)]
pub struct InMemoryFiles {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryFiles {
    pub fn put(&self, token: &str, bytes: &[u8]) {
        self.files
            .lock()
            .expect("files lock")
            .insert(token.to_owned(), bytes.to_vec());
    }

    pub fn remove(&self, token: &str) {
        self.files.lock().expect("files lock").remove(token);
    }
}

#[async_trait]
impl FileStore for InMemoryFiles {
    async fn resolve(&self, token: &AttachmentToken) -> Result<Option<Vec<u8>>, FileStoreError> {
        Ok(self
            .files
            .lock()
            .expect("files lock")
            .get(token.as_str())
            .cloned())
    }
}

/// Mail transport that records every message and optionally fails.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundMail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutboundMail> {
        self.sent.lock().expect("mailer lock").clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailTransportError> {
        self.sent.lock().expect("mailer lock").push(mail.clone());
        if self.fail {
            Err(MailTransportError::delivery("relay refused connection"))
        } else {
            Ok(())
        }
    }
}

/// Clock advancing one minute on every read so timestamps strictly increase.
pub struct SteppingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self {
            start: Utc
                .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
                .single()
                .expect("valid start"),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + Duration::minutes(tick)
    }
}

pub fn user(id: i64, username: &str, role: &str) -> UserRow {
    UserRow {
        id: UserId::new(id),
        username: username.to_owned(),
        email: format!("{username}@example.edu"),
        role: role.to_owned(),
    }
}

/// Campus directory: one student, two HoDs, one principal, one super admin
/// and a faculty member who is never part of the escalation chain.
pub fn campus() -> Vec<UserRow> {
    vec![
        user(1, "asha", "student"),
        user(2, "dr.rao", "hod"),
        user(3, "dr.iyer", "HOD"),
        user(4, "principal", "Principal"),
        user(5, "root", "super_admin"),
        user(6, "prof.das", "faculty"),
    ]
}

pub type Complaints = ComplaintService<InMemoryStore, InMemoryStore, InMemoryStore>;
pub type Escalations = EscalationService<InMemoryStore, InMemoryStore>;

/// Services wired to one shared in-memory store.
pub struct Harness {
    users: Vec<UserRow>,
    pub store: InMemoryStore,
    pub files: Arc<InMemoryFiles>,
    pub mailer: Arc<RecordingMailer>,
    pub complaints: Arc<Complaints>,
    pub escalations: Arc<Escalations>,
}

impl Harness {
    pub fn new(users: Vec<UserRow>, mailer: RecordingMailer) -> Self {
        Self::with_policy(users, mailer, TransitionPolicy::default())
    }

    pub fn with_policy(users: Vec<UserRow>, mailer: RecordingMailer, policy: TransitionPolicy) -> Self {
        let store = InMemoryStore::with_users(users.clone());
        let shared = Arc::new(store.clone());
        let files = Arc::new(InMemoryFiles::default());
        let mailer = Arc::new(mailer);
        let clock: Arc<dyn Clock> = Arc::new(SteppingClock::default());
        let complaints = Arc::new(
            ComplaintService::new(
                Arc::clone(&shared),
                Arc::clone(&shared),
                Arc::clone(&shared),
                Arc::clone(&clock),
            )
            .with_policy(policy),
        );
        let escalations = Arc::new(EscalationService::new(
            Arc::clone(&shared),
            Arc::clone(&shared),
            NotificationPorts {
                directory: shared,
                files: files.clone(),
                mailer: mailer.clone(),
            },
            clock,
        ));
        Self {
            users,
            store,
            files,
            mailer,
            complaints,
            escalations,
        }
    }

    /// Actor for the seeded user with `id`.
    pub fn actor(&self, id: i64) -> Actor {
        self.users
            .iter()
            .find(|user| user.id.get() == id)
            .expect("seeded user")
            .actor()
    }

    pub fn http_state(&self) -> HttpState {
        HttpState::new(
            self.complaints.clone(),
            self.complaints.clone(),
            self.escalations.clone(),
        )
    }
}
