//! Lifecycle engine: the only writer of the content store.
//!
//! Every mutation goes to the persistence collaborator first and is applied
//! to the in-memory [`ContentStore`] only once the collaborator confirmed it.
//! A failed call therefore leaves the store exactly as it was.

use chrono::{NaiveDateTime, Utc};

use crate::domain::catalog::Catalog;
use crate::domain::content::{Content, ContentDraft};
use crate::domain::slot::{SlotAddress, SlotKey};
use crate::domain::types::{ContentId, ContentStatus, TypeConstraintError};
use crate::domain::week::DailySchedule;
use crate::forms::content::ContentAction;
use crate::repository::{ContentReader, ContentWriter, RepositoryError};
use crate::store::ContentStore;

use super::{ServiceError, ServiceResult};

/// Tunables of the lifecycle engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Extra attempts at storing a relocated record after the first failure.
    pub relocation_retries: u32,
    /// Times a save may target.
    pub schedule: DailySchedule,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            relocation_retries: 2,
            schedule: DailySchedule::default(),
        }
    }
}

/// Hands out content ids from the wall clock in milliseconds, bumped so that
/// ids stay strictly increasing.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Generator whose ids are all greater than `last`.
    pub fn starting_after(last: i64) -> Self {
        Self { last: last.max(0) }
    }

    pub fn next_id(&mut self) -> Result<ContentId, TypeConstraintError> {
        let after_last = self.last.checked_add(1).ok_or_else(|| {
            TypeConstraintError::InvalidValue(format!("no content id after {}", self.last))
        })?;
        let next = Utc::now().timestamp_millis().max(after_last);
        self.last = next;
        ContentId::new(next)
    }
}

/// A save submitted from the content modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    /// Target cell; required for every save.
    pub slot: Option<SlotAddress>,
    /// Record being edited, `None` when creating.
    pub editing: Option<ContentId>,
    pub action: ContentAction,
}

impl SaveRequest {
    pub fn new(action: ContentAction) -> Self {
        Self {
            slot: None,
            editing: None,
            action,
        }
    }
    pub fn store(draft: ContentDraft) -> Self {
        Self::new(ContentAction::Store(draft))
    }
    pub fn delete() -> Self {
        Self::new(ContentAction::Delete)
    }
    pub fn at(mut self, slot: SlotAddress) -> Self {
        self.slot = Some(slot);
        self
    }
    pub fn editing(mut self, id: ContentId) -> Self {
        self.editing = Some(id);
        self
    }
}

/// What a save did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(Content),
    /// Fields overwritten in place, same slot key.
    Updated(Content),
    /// Moved to another cell; `previous_key` no longer exists.
    Relocated {
        previous_key: SlotKey,
        content: Content,
    },
    /// Removed through the delete choice of the form.
    Deleted(Content),
    /// A delete was requested for content that is not stored.
    NothingToDelete,
}

/// `archived_at` for a record moving into `status`: kept while it stays
/// archived, stamped with `now` on entering the archive, cleared otherwise.
fn archive_stamp(
    previous: Option<&Content>,
    status: ContentStatus,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    if !status.is_archived() {
        return None;
    }
    previous
        .filter(|content| content.is_archived())
        .and_then(|content| content.archived_at)
        .or(Some(now))
}

fn compose(
    id: ContentId,
    slot_key: SlotKey,
    draft: ContentDraft,
    created_at: NaiveDateTime,
    archived_at: Option<NaiveDateTime>,
) -> Content {
    Content {
        id,
        slot_key,
        product: draft.product,
        custom_title: draft.custom_title,
        networks: draft.networks,
        format: draft.format,
        status: draft.status,
        notes: draft.notes,
        created_at,
        archived_at,
    }
}

fn unavailable(action: &str, err: RepositoryError) -> ServiceError {
    log::error!("Failed to {action}: {err}");
    ServiceError::PersistenceUnavailable(err.to_string())
}

/// Owns the content store and applies lifecycle transitions to it.
pub struct ContentScheduler<R> {
    repo: R,
    store: ContentStore,
    catalog: Catalog,
    options: SchedulerOptions,
    ids: IdGenerator,
}

impl<R> ContentScheduler<R>
where
    R: ContentReader + ContentWriter,
{
    /// Seeds the store from the collaborator's full snapshot.
    pub async fn load(repo: R, catalog: Catalog, options: SchedulerOptions) -> ServiceResult<Self> {
        let rows = repo
            .list_contents()
            .await
            .map_err(|e| unavailable("list content", e))?;
        let store = ContentStore::from_snapshot(rows);
        let last_id = store.iter().map(|content| content.id.get()).max().unwrap_or(0);
        log::info!("Loaded {} scheduled content items", store.len());

        Ok(Self {
            repo,
            store,
            catalog,
            options,
            ids: IdGenerator::starting_after(last_id),
        })
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Applies a save from the content form.
    ///
    /// Requests without a target slot, or whose slot time is outside the
    /// daily schedule, are rejected before any persistence call. A delete for
    /// content that is not stored succeeds as a no-op; an update of content
    /// that is not stored is rejected.
    pub async fn save(&mut self, request: SaveRequest) -> ServiceResult<SaveOutcome> {
        let Some(slot) = request.slot else {
            return Err(ServiceError::InvalidRequest(
                "save request has no target slot".to_string(),
            ));
        };
        if !self.options.schedule.contains(slot.time) {
            return Err(ServiceError::InvalidRequest(format!(
                "{} is outside the daily schedule",
                slot.time
            )));
        }

        match request.action {
            ContentAction::Delete => match request.editing {
                Some(id) => Ok(self
                    .delete_permanently(id)
                    .await?
                    .map_or(SaveOutcome::NothingToDelete, SaveOutcome::Deleted)),
                None => Ok(SaveOutcome::NothingToDelete),
            },
            ContentAction::Store(draft) => {
                self.catalog.check(&draft.product, &draft.networks)?;
                match request.editing {
                    Some(id) => self.update(id, slot, draft).await,
                    None => self.create(slot, draft).await,
                }
            }
        }
    }

    async fn create(&mut self, slot: SlotAddress, draft: ContentDraft) -> ServiceResult<SaveOutcome> {
        let id = self.ids.next_id()?;
        let now = Utc::now().naive_utc();
        let archived_at = archive_stamp(None, draft.status, now);
        let content = compose(id, self.store.allocate_key(&slot, id), draft, now, archived_at);

        self.repo
            .upsert_content(&content)
            .await
            .map_err(|e| unavailable("create content", e))?;
        self.apply(content.clone())?;

        log::info!("Scheduled content {} at {}", content.id, content.slot_key);
        Ok(SaveOutcome::Created(content))
    }

    async fn update(
        &mut self,
        id: ContentId,
        slot: SlotAddress,
        draft: ContentDraft,
    ) -> ServiceResult<SaveOutcome> {
        let Some(existing) = self.store.find_by_id(id).cloned() else {
            return Err(ServiceError::InvalidRequest(format!(
                "content {id} does not exist"
            )));
        };
        let archived_at = archive_stamp(Some(&existing), draft.status, Utc::now().naive_utc());

        if existing.slot_key.address() != slot {
            return self.relocate(existing, slot, draft, archived_at).await;
        }

        let content = compose(
            existing.id,
            existing.slot_key.clone(),
            draft,
            existing.created_at,
            archived_at,
        );
        self.repo
            .upsert_content(&content)
            .await
            .map_err(|e| unavailable("update content", e))?;
        self.apply(content.clone())?;

        log::debug!("Updated content {} ({})", content.id, content.status);
        Ok(SaveOutcome::Updated(content))
    }

    /// Delete-then-insert move of `existing` into `slot`.
    ///
    /// The insert is retried before giving up. When it never succeeds the
    /// record is gone from persistence, so it is dropped from the store as
    /// well and reported as [`ServiceError::OrphanedRelocation`].
    async fn relocate(
        &mut self,
        existing: Content,
        slot: SlotAddress,
        draft: ContentDraft,
        archived_at: Option<NaiveDateTime>,
    ) -> ServiceResult<SaveOutcome> {
        let content = compose(
            existing.id,
            self.store.allocate_key(&slot, existing.id),
            draft,
            existing.created_at,
            archived_at,
        );

        self.repo
            .delete_content(existing.id)
            .await
            .map_err(|e| unavailable("remove content before relocation", e))?;

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.repo.upsert_content(&content).await {
                Ok(_) => break,
                Err(e) if attempts <= self.options.relocation_retries => {
                    log::warn!(
                        "Attempt {attempts} to store relocated content {} failed: {e}",
                        content.id
                    );
                }
                Err(e) => {
                    log::error!(
                        "Content {} was deleted from {} and could not be stored at {}: {e}",
                        content.id,
                        existing.slot_key,
                        content.slot_key
                    );
                    self.store.remove_by_id(existing.id);
                    return Err(ServiceError::OrphanedRelocation {
                        content: Box::new(content),
                        attempts,
                    });
                }
            }
        }

        self.apply(content.clone())?;
        log::info!(
            "Moved content {} from {} to {}",
            content.id,
            existing.slot_key,
            content.slot_key
        );
        Ok(SaveOutcome::Relocated {
            previous_key: existing.slot_key,
            content,
        })
    }

    /// Removes a record for good, bypassing status logic.
    ///
    /// Returns `None` without calling persistence when `id` is not stored.
    pub async fn delete_permanently(&mut self, id: ContentId) -> ServiceResult<Option<Content>> {
        if self.store.find_by_id(id).is_none() {
            log::debug!("Content {id} is not stored; nothing to delete");
            return Ok(None);
        }

        self.repo
            .delete_content(id)
            .await
            .map_err(|e| unavailable("delete content", e))?;

        let removed = self.store.remove_by_id(id);
        log::info!("Deleted content {id}");
        Ok(removed)
    }

    /// [`Self::delete_permanently`] for the record stored under `key`.
    pub async fn delete_at(&mut self, key: &SlotKey) -> ServiceResult<Option<Content>> {
        match self.store.get(key).map(|content| content.id) {
            Some(id) => self.delete_permanently(id).await,
            None => Ok(None),
        }
    }

    fn apply(&mut self, content: Content) -> ServiceResult<()> {
        self.store.upsert(content).map_err(|conflict| {
            log::error!("Persisted content could not be placed in the store: {conflict}");
            conflict
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::slot::SlotTime;
    use crate::domain::types::{ContentFormat, CustomTitle, NetworkCode, ProductName};
    use crate::repository::test::TestRepository;
    use crate::services::query::{ContentFilters, is_visible, visible_week_count};
    use chrono::{DateTime, NaiveDate};

    fn slot(day: u32, hour: u32) -> SlotAddress {
        SlotAddress::new(
            NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            SlotTime::new(hour, 0).unwrap(),
        )
    }

    fn draft(status: ContentStatus) -> ContentDraft {
        ContentDraft {
            product: ProductName::new("Entre Líneas").unwrap(),
            custom_title: None,
            networks: vec![NetworkCode::new("IG").unwrap(), NetworkCode::new("FB").unwrap()],
            format: Some(ContentFormat::Post),
            status,
            notes: None,
        }
    }

    fn stored(id: i64, slot: SlotAddress) -> Content {
        Content {
            id: ContentId::new(id).unwrap(),
            slot_key: slot.key(),
            product: ProductName::new("La Cocina").unwrap(),
            custom_title: Some(CustomTitle::new("Receta").unwrap()),
            networks: vec![NetworkCode::new("IG").unwrap()],
            format: None,
            status: ContentStatus::Programado,
            notes: None,
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap().naive_utc(),
            archived_at: None,
        }
    }

    async fn scheduler(contents: Vec<Content>) -> ContentScheduler<TestRepository> {
        ContentScheduler::load(
            TestRepository::new(contents),
            Catalog::default(),
            SchedulerOptions::default(),
        )
        .await
        .unwrap()
    }

    fn created(outcome: SaveOutcome) -> Content {
        match outcome {
            SaveOutcome::Created(content) => content,
            other => panic!("expected a created outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn creates_content_at_the_primary_key() {
        let mut scheduler = scheduler(vec![]).await;

        let outcome = scheduler
            .save(SaveRequest::store(draft(ContentStatus::Programado)).at(slot(4, 9)))
            .await
            .unwrap();
        let content = created(outcome);

        assert_eq!(content.slot_key, "2024-03-04_09:00");
        assert_eq!(scheduler.store().len(), 1);
        assert!(content.archived_at.is_none());
        assert!(is_visible(&content, &ContentFilters::default(), ""));
        assert_eq!(
            visible_week_count(
                scheduler.store(),
                NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
            ),
            1
        );
        assert_eq!(scheduler.repository().stored(content.id), Some(content));
    }

    #[tokio::test]
    async fn second_create_in_a_slot_overflows() {
        let mut scheduler = scheduler(vec![]).await;

        let first = created(
            scheduler
                .save(SaveRequest::store(draft(ContentStatus::Programado)).at(slot(4, 9)))
                .await
                .unwrap(),
        );
        let second = created(
            scheduler
                .save(SaveRequest::store(draft(ContentStatus::Listo)).at(slot(4, 9)))
                .await
                .unwrap(),
        );

        assert_eq!(first.slot_key, "2024-03-04_09:00");
        assert!(second.slot_key.is_overflow_of(&first.slot_key));
        assert!(second.id > first.id);
        let occupants = scheduler.store().occupants(&slot(4, 9));
        assert_eq!(occupants.len(), 2);
        assert_eq!(occupants[0].id, first.id);
        assert_eq!(occupants[1].id, second.id);
    }

    #[tokio::test]
    async fn update_in_place_preserves_identity() {
        let original = stored(10, slot(4, 9));
        let mut scheduler = scheduler(vec![original.clone()]).await;

        let outcome = scheduler
            .save(
                SaveRequest::store(draft(ContentStatus::EnProduccion))
                    .at(slot(4, 9))
                    .editing(original.id),
            )
            .await
            .unwrap();

        let SaveOutcome::Updated(content) = outcome else {
            panic!("expected an update");
        };
        assert_eq!(content.slot_key, original.slot_key);
        assert_eq!(content.created_at, original.created_at);
        assert_eq!(content.status, ContentStatus::EnProduccion);
        assert_eq!(scheduler.store().len(), 1);
    }

    #[tokio::test]
    async fn relocation_moves_the_record() {
        let original = stored(10, slot(4, 9));
        let mut scheduler = scheduler(vec![original.clone()]).await;

        let outcome = scheduler
            .save(
                SaveRequest::store(draft(ContentStatus::Programado))
                    .at(slot(6, 15))
                    .editing(original.id),
            )
            .await
            .unwrap();

        let SaveOutcome::Relocated {
            previous_key,
            content,
        } = outcome
        else {
            panic!("expected a relocation");
        };
        assert_eq!(previous_key, original.slot_key);
        assert_eq!(content.slot_key, "2024-03-06_15:00");
        assert_eq!(content.id, original.id);
        assert_eq!(content.created_at, original.created_at);
        assert!(scheduler.store().get(&original.slot_key).is_none());
        assert_eq!(scheduler.store().len(), 1);
        assert_eq!(
            scheduler.repository().stored(original.id).unwrap().slot_key,
            content.slot_key
        );
    }

    #[tokio::test]
    async fn relocation_into_an_occupied_slot_overflows() {
        let moving = stored(10, slot(4, 9));
        let resident = stored(11, slot(5, 9));
        let mut scheduler = scheduler(vec![moving.clone(), resident.clone()]).await;

        scheduler
            .save(
                SaveRequest::store(draft(ContentStatus::Programado))
                    .at(slot(5, 9))
                    .editing(moving.id),
            )
            .await
            .unwrap();

        assert_eq!(scheduler.store().get(&slot(5, 9).key()).unwrap().id, resident.id);
        assert_eq!(
            scheduler.store().find_by_id(moving.id).unwrap().slot_key,
            "2024-03-05_09:00_10"
        );
    }

    #[tokio::test]
    async fn relocation_skips_overflow_keys_held_by_other_records() {
        let primary = stored(5, slot(4, 9));
        let mut squatter = stored(3, slot(4, 9));
        squatter.slot_key = SlotKey::overflow(&slot(4, 9), ContentId::new(9).unwrap());
        let moving = stored(9, slot(6, 10));
        let mut scheduler = scheduler(vec![primary, squatter.clone(), moving.clone()]).await;

        let outcome = scheduler
            .save(
                SaveRequest::store(draft(ContentStatus::Programado))
                    .at(slot(4, 9))
                    .editing(moving.id),
            )
            .await
            .unwrap();

        let SaveOutcome::Relocated { content, .. } = outcome else {
            panic!("expected a relocation");
        };
        assert_eq!(content.slot_key, "2024-03-04_09:00_9_1");
        assert_eq!(
            scheduler.store().find_by_id(moving.id).unwrap().slot_key,
            scheduler.repository().stored(moving.id).unwrap().slot_key
        );
        assert_eq!(scheduler.store().get(&squatter.slot_key), Some(&squatter));
        assert_eq!(scheduler.store().occupants(&slot(4, 9)).len(), 3);
    }

    #[tokio::test]
    async fn relocation_retries_the_insert() {
        let original = stored(10, slot(4, 9));
        let mut scheduler = scheduler(vec![original.clone()]).await;
        scheduler.repository().fail_next_upserts(2);

        let outcome = scheduler
            .save(
                SaveRequest::store(draft(ContentStatus::Programado))
                    .at(slot(6, 15))
                    .editing(original.id),
            )
            .await
            .unwrap();

        assert!(matches!(outcome, SaveOutcome::Relocated { .. }));
        assert!(scheduler.repository().stored(original.id).is_some());
    }

    #[tokio::test]
    async fn failed_relocation_is_reported_as_orphaned() {
        let original = stored(10, slot(4, 9));
        let mut scheduler = scheduler(vec![original.clone()]).await;
        scheduler.repository().fail_next_upserts(3);

        let err = scheduler
            .save(
                SaveRequest::store(draft(ContentStatus::Programado))
                    .at(slot(6, 15))
                    .editing(original.id),
            )
            .await
            .unwrap_err();

        let ServiceError::OrphanedRelocation { content, attempts } = err else {
            panic!("expected an orphaned relocation");
        };
        assert_eq!(attempts, 3);
        assert_eq!(content.id, original.id);
        assert_eq!(content.slot_key, "2024-03-06_15:00");
        assert!(scheduler.repository().stored(original.id).is_none());
        assert!(scheduler.store().find_by_id(original.id).is_none());
    }

    #[tokio::test]
    async fn failed_delete_step_leaves_everything_in_place() {
        let original = stored(10, slot(4, 9));
        let mut scheduler = scheduler(vec![original.clone()]).await;
        scheduler.repository().fail_deletes(true);

        let err = scheduler
            .save(
                SaveRequest::store(draft(ContentStatus::Programado))
                    .at(slot(6, 15))
                    .editing(original.id),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::PersistenceUnavailable(_)));
        assert_eq!(scheduler.store().get(&original.slot_key), Some(&original));
    }

    #[tokio::test]
    async fn failed_create_leaves_the_store_unchanged() {
        let mut scheduler = scheduler(vec![]).await;
        scheduler.repository().fail_next_upserts(1);

        let err = scheduler
            .save(SaveRequest::store(draft(ContentStatus::Programado)).at(slot(4, 9)))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::PersistenceUnavailable(_)));
        assert!(scheduler.store().is_empty());
    }

    #[tokio::test]
    async fn failed_update_leaves_the_store_unchanged() {
        let original = stored(10, slot(4, 9));
        let mut scheduler = scheduler(vec![original.clone()]).await;
        scheduler.repository().fail_next_upserts(1);

        let err = scheduler
            .save(
                SaveRequest::store(draft(ContentStatus::Listo))
                    .at(slot(4, 9))
                    .editing(original.id),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::PersistenceUnavailable(_)));
        assert_eq!(scheduler.store().get(&original.slot_key), Some(&original));
        assert_eq!(scheduler.repository().stored(original.id), Some(original));
    }

    #[tokio::test]
    async fn saves_outside_the_daily_schedule_are_rejected() {
        let original = stored(10, slot(4, 9));
        let mut scheduler = scheduler(vec![original.clone()]).await;
        let calls = scheduler.repository().calls();
        let off_schedule = SlotAddress::new(
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            SlotTime::new(3, 17).unwrap(),
        );

        let create_err = scheduler
            .save(SaveRequest::store(draft(ContentStatus::Programado)).at(off_schedule))
            .await
            .unwrap_err();
        let move_err = scheduler
            .save(
                SaveRequest::store(draft(ContentStatus::Programado))
                    .at(slot(4, 21))
                    .editing(original.id),
            )
            .await
            .unwrap_err();

        assert!(matches!(create_err, ServiceError::InvalidRequest(_)));
        assert!(matches!(move_err, ServiceError::InvalidRequest(_)));
        assert_eq!(scheduler.repository().calls(), calls);
        assert_eq!(scheduler.store().all(), vec![original]);
    }

    #[tokio::test]
    async fn custom_schedule_bounds_the_accepted_times() {
        let options = SchedulerOptions {
            schedule: DailySchedule::new(6, 22).unwrap(),
            ..SchedulerOptions::default()
        };
        let mut scheduler =
            ContentScheduler::load(TestRepository::new(vec![]), Catalog::default(), options)
                .await
                .unwrap();

        let content = created(
            scheduler
                .save(SaveRequest::store(draft(ContentStatus::Programado)).at(slot(4, 22)))
                .await
                .unwrap(),
        );
        assert_eq!(content.slot_key, "2024-03-04_22:00");
    }

    #[tokio::test]
    async fn delete_action_removes_the_record() {
        let original = stored(10, slot(4, 9));
        let mut scheduler = scheduler(vec![original.clone()]).await;

        let outcome = scheduler
            .save(SaveRequest::delete().at(slot(4, 9)).editing(original.id))
            .await
            .unwrap();

        assert_eq!(outcome, SaveOutcome::Deleted(original.clone()));
        assert!(scheduler.store().is_empty());
        assert!(scheduler.store().get(&slot(4, 9).key()).is_none());
        assert_eq!(scheduler.repository().stored_count(), 0);
    }

    #[tokio::test]
    async fn delete_of_unknown_content_is_a_no_op() {
        let mut scheduler = scheduler(vec![stored(10, slot(4, 9))]).await;
        let calls = scheduler.repository().calls();

        let outcome = scheduler
            .save(
                SaveRequest::delete()
                    .at(slot(4, 9))
                    .editing(ContentId::new(99).unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(outcome, SaveOutcome::NothingToDelete);

        let outcome = scheduler.save(SaveRequest::delete().at(slot(4, 9))).await.unwrap();
        assert_eq!(outcome, SaveOutcome::NothingToDelete);
        assert_eq!(scheduler.repository().calls(), calls);
        assert_eq!(scheduler.store().len(), 1);
    }

    #[tokio::test]
    async fn update_of_unknown_content_is_rejected() {
        let mut scheduler = scheduler(vec![]).await;

        let err = scheduler
            .save(
                SaveRequest::store(draft(ContentStatus::Programado))
                    .at(slot(4, 9))
                    .editing(ContentId::new(99).unwrap()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn saves_without_a_slot_are_rejected_before_persistence() {
        let original = stored(10, slot(4, 9));
        let mut scheduler = scheduler(vec![original.clone()]).await;
        let calls = scheduler.repository().calls();

        let store_err = scheduler
            .save(SaveRequest::store(draft(ContentStatus::Programado)))
            .await
            .unwrap_err();
        let delete_err = scheduler
            .save(SaveRequest::delete().editing(original.id))
            .await
            .unwrap_err();

        assert!(matches!(store_err, ServiceError::InvalidRequest(_)));
        assert!(matches!(delete_err, ServiceError::InvalidRequest(_)));
        assert_eq!(scheduler.repository().calls(), calls);
        assert_eq!(scheduler.store().len(), 1);
    }

    #[tokio::test]
    async fn unknown_products_are_rejected() {
        let mut scheduler = scheduler(vec![]).await;
        let mut draft = draft(ContentStatus::Programado);
        draft.product = ProductName::new("Podcast").unwrap();

        let err = scheduler
            .save(SaveRequest::store(draft).at(slot(4, 9)))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidRequest(_)));
        assert!(scheduler.store().is_empty());
    }

    #[tokio::test]
    async fn archiving_stamps_and_unarchiving_clears() {
        let original = stored(10, slot(4, 9));
        let mut scheduler = scheduler(vec![original.clone()]).await;

        let archive = SaveRequest::store(draft(ContentStatus::Archivado))
            .at(slot(4, 9))
            .editing(original.id);
        let SaveOutcome::Updated(archived) = scheduler.save(archive.clone()).await.unwrap() else {
            panic!("expected an update");
        };
        let stamp = archived.archived_at.expect("archived content is stamped");

        let SaveOutcome::Updated(still_archived) = scheduler.save(archive).await.unwrap() else {
            panic!("expected an update");
        };
        assert_eq!(still_archived.archived_at, Some(stamp));

        let restore = SaveRequest::store(draft(ContentStatus::Listo))
            .at(slot(4, 9))
            .editing(original.id);
        let SaveOutcome::Updated(restored) = scheduler.save(restore).await.unwrap() else {
            panic!("expected an update");
        };
        assert!(restored.archived_at.is_none());
    }

    #[tokio::test]
    async fn creating_archived_content_stamps_it() {
        let mut scheduler = scheduler(vec![]).await;
        let content = created(
            scheduler
                .save(SaveRequest::store(draft(ContentStatus::Archivado)).at(slot(4, 9)))
                .await
                .unwrap(),
        );
        assert!(content.archived_at.is_some());
    }

    #[tokio::test]
    async fn delete_permanently_is_idempotent() {
        let original = stored(10, slot(4, 9));
        let mut scheduler = scheduler(vec![original.clone()]).await;

        let removed = scheduler.delete_at(&original.slot_key).await.unwrap();
        assert_eq!(removed, Some(original.clone()));
        assert_eq!(scheduler.delete_permanently(original.id).await.unwrap(), None);
        assert!(scheduler.store().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_record() {
        let original = stored(10, slot(4, 9));
        let mut scheduler = scheduler(vec![original.clone()]).await;
        scheduler.repository().fail_deletes(true);

        let err = scheduler.delete_permanently(original.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::PersistenceUnavailable(_)));
        assert_eq!(scheduler.store().len(), 1);
    }

    #[tokio::test]
    async fn load_failure_is_reported() {
        let repo = TestRepository::new(vec![]);
        repo.fail_list(true);
        let result =
            ContentScheduler::load(repo, Catalog::default(), SchedulerOptions::default()).await;
        assert!(matches!(result, Err(ServiceError::PersistenceUnavailable(_))));
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let mut ids = IdGenerator::starting_after(i64::MAX / 2);
        let first = ids.next_id().unwrap();
        let second = ids.next_id().unwrap();
        assert_eq!(first.get(), i64::MAX / 2 + 1);
        assert!(second > first);
    }

    #[test]
    fn exhausted_id_space_is_an_error() {
        let mut ids = IdGenerator::starting_after(i64::MAX);
        assert!(ids.next_id().is_err());
    }

    #[tokio::test]
    async fn create_after_the_largest_id_is_rejected() {
        let mut scheduler = scheduler(vec![stored(i64::MAX, slot(4, 9))]).await;

        let err = scheduler
            .save(SaveRequest::store(draft(ContentStatus::Programado)).at(slot(5, 9)))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidRequest(_)));
        assert_eq!(scheduler.store().len(), 1);
    }
}
