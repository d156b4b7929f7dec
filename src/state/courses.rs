//! Course resource store: the user's course list and the selected course.
//!
//! DESIGN
//! ======
//! Fetches are gated on the session. While the session is `Unknown` nothing
//! is fetched; once it is `Unauthenticated` the list is cleared instead.
//! The store subscribes to the session store and resets itself whenever the
//! signed-in user goes away or changes.
//!
//! STALE RESPONSES
//! ===============
//! List and detail fetches each carry a request token; only the most
//! recently started fetch may commit. Mutations carry the store epoch,
//! which a reset bumps, so a create that resolves after logout is dropped.

use std::sync::{Arc, Mutex, PoisonError};

use super::LoadState;
use super::StoreError;
use super::ordering::next_order;
use super::session::{SessionStatus, SessionStore};
use super::store::{Reduce, Store, SubscriptionId};
use crate::net::LmsApi;
use crate::net::types::{Course, Id, Module, NewCourse, NewModule, NewUnit, Unit};

#[cfg(test)]
#[path = "courses_test.rs"]
mod tests;

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursesState {
    pub items: Vec<Course>,
    pub list: LoadState,
    pub error: Option<String>,

    /// Id of the course the detail view is showing, set as soon as it is requested.
    pub selected_id: Option<Id>,
    pub selected: Option<Course>,
    pub selected_load: LoadState,
    pub selected_error: Option<String>,

    pub create: LoadState,
    pub create_error: Option<String>,

    list_request: u64,
    detail_request: u64,
    epoch: u64,
}

impl CoursesState {
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Debug, Clone)]
pub enum CoursesAction {
    ListRequested,
    ListLoaded { request: u64, items: Vec<Course> },
    ListFailed { request: u64, error: String },
    ListCleared,
    DetailRequested { id: Id },
    DetailLoaded { request: u64, course: Course },
    DetailFailed { request: u64, error: String },
    SelectionCleared,
    CreateStarted,
    CourseCreated { epoch: u64, course: Course },
    ModuleCreated { epoch: u64 },
    UnitCreated { epoch: u64, course_id: Id, module_id: Id, unit: Unit },
    CreateFailed { epoch: u64, error: String },
    ClearError,
    ClearSelectedError,
    Reset,
}

impl Reduce for CoursesState {
    type Action = CoursesAction;

    fn reduce(&mut self, action: CoursesAction) -> bool {
        match action {
            CoursesAction::ListRequested => {
                self.list_request += 1;
                self.list = LoadState::Pending;
                self.error = None;
            }
            CoursesAction::ListLoaded { request, items } => {
                if request != self.list_request {
                    return false;
                }
                self.items = items;
                self.list = LoadState::Succeeded;
            }
            CoursesAction::ListFailed { request, error } => {
                if request != self.list_request {
                    return false;
                }
                self.items.clear();
                self.list = LoadState::Failed;
                self.error = Some(error);
            }
            CoursesAction::ListCleared => {
                self.list_request += 1;
                self.items.clear();
                self.list = LoadState::Succeeded;
                self.error = None;
            }
            CoursesAction::DetailRequested { id } => {
                self.detail_request += 1;
                if self.selected_id.as_ref() != Some(&id) {
                    self.selected = None;
                }
                self.selected_id = Some(id);
                self.selected_load = LoadState::Pending;
                self.selected_error = None;
            }
            CoursesAction::DetailLoaded { request, course } => {
                if request != self.detail_request {
                    return false;
                }
                self.selected = Some(course);
                self.selected_load = LoadState::Succeeded;
            }
            CoursesAction::DetailFailed { request, error } => {
                if request != self.detail_request {
                    return false;
                }
                self.selected = None;
                self.selected_load = LoadState::Failed;
                self.selected_error = Some(error);
            }
            CoursesAction::SelectionCleared => {
                self.detail_request += 1;
                self.selected_id = None;
                self.selected = None;
                self.selected_load = LoadState::Idle;
                self.selected_error = None;
            }
            CoursesAction::CreateStarted => {
                self.create = LoadState::Pending;
                self.create_error = None;
            }
            CoursesAction::CourseCreated { epoch, course } => {
                if epoch != self.epoch {
                    return false;
                }
                self.items.push(course);
                self.create = LoadState::Succeeded;
            }
            CoursesAction::ModuleCreated { epoch } => {
                if epoch != self.epoch {
                    return false;
                }
                self.create = LoadState::Succeeded;
            }
            CoursesAction::UnitCreated { epoch, course_id, module_id, unit } => {
                if epoch != self.epoch {
                    return false;
                }
                self.create = LoadState::Succeeded;
                if let Some(course) = self.selected.as_mut().filter(|c| c.id == course_id) {
                    if let Some(module) = course.module_mut(&module_id) {
                        module.units.push(unit);
                    }
                }
            }
            CoursesAction::CreateFailed { epoch, error } => {
                if epoch != self.epoch {
                    return false;
                }
                self.create = LoadState::Failed;
                self.create_error = Some(error);
            }
            CoursesAction::ClearError => {
                self.error = None;
                self.create_error = None;
            }
            CoursesAction::ClearSelectedError => {
                self.selected_error = None;
            }
            CoursesAction::Reset => {
                *self = Self {
                    list_request: self.list_request + 1,
                    detail_request: self.detail_request + 1,
                    epoch: self.epoch + 1,
                    ..Self::default()
                };
            }
        }
        true
    }
}

// =============================================================================
// SERVICE
// =============================================================================

/// What a gated fetch ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Session still unknown; nothing was requested.
    Skipped,
    /// Signed out; the cached data was cleared and nothing was requested.
    Cleared,
    /// The response was committed to the store.
    Applied,
    /// The response arrived after a newer request or a reset and was dropped.
    Discarded,
}

/// Query keys a mutation can mark stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Courses,
    Course(Id),
}

#[derive(Clone)]
pub struct CoursesStore {
    store: Store<CoursesState>,
    session: SessionStore,
    api: Arc<dyn LmsApi>,
    link: Arc<Mutex<Option<SubscriptionId>>>,
}

impl CoursesStore {
    #[must_use]
    pub fn new(api: Arc<dyn LmsApi>, session: SessionStore) -> Self {
        Self { store: Store::new(CoursesState::default()), session, api, link: Arc::new(Mutex::new(None)) }
    }

    /// Follow the session: reset whenever the signed-in user goes away or
    /// changes. Idempotent.
    pub fn attach(&self) {
        let mut link = self.link.lock().unwrap_or_else(PoisonError::into_inner);
        if link.is_some() {
            return;
        }
        let store = self.store.clone();
        let last_user: Mutex<Option<Id>> = Mutex::new(self.session.snapshot().user().map(|u| u.id.clone()));
        let id = self.session.subscribe(move |session| {
            let current = session.user().map(|u| u.id.clone());
            let changed = {
                let mut last = last_user.lock().unwrap_or_else(PoisonError::into_inner);
                let changed = last.is_some() && *last != current;
                *last = current;
                changed
            };
            // Guard released: Reset may notify listeners that re-enter this one.
            if changed {
                tracing::debug!("signed-in user changed; resetting course store");
                store.dispatch(CoursesAction::Reset);
            }
        });
        *link = Some(id);
    }

    /// Stop following the session. Returns `false` if not attached.
    pub fn detach(&self) -> bool {
        let mut link = self.link.lock().unwrap_or_else(PoisonError::into_inner);
        link.take()
            .is_some_and(|id| self.session.unsubscribe(id))
    }

    #[must_use]
    pub fn snapshot(&self) -> CoursesState {
        self.store.snapshot()
    }

    pub fn subscribe(&self, listener: impl Fn(&CoursesState) + Send + Sync + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    fn require_session(&self) -> Result<(), StoreError> {
        if self.session.is_authenticated() { Ok(()) } else { Err(StoreError::NotAuthenticated) }
    }

    /// Fetch the signed-in user's courses and replace the list.
    ///
    /// # Errors
    ///
    /// Returns the API error when the fetch fails; the error is also
    /// recorded in the store.
    pub async fn list_for_user(&self) -> Result<FetchOutcome, StoreError> {
        match self.session.status() {
            SessionStatus::Unknown => return Ok(FetchOutcome::Skipped),
            SessionStatus::Unauthenticated => {
                self.store.dispatch(CoursesAction::ListCleared);
                return Ok(FetchOutcome::Cleared);
            }
            SessionStatus::Authenticated(_) => {}
        }

        let request = self.store.dispatch(CoursesAction::ListRequested).list_request;
        tracing::debug!(request, "fetching course list");
        let (action, result) = match self.api.list_courses().await {
            Ok(items) => (CoursesAction::ListLoaded { request, items }, Ok(())),
            Err(e) => (CoursesAction::ListFailed { request, error: e.to_string() }, Err(e)),
        };
        let committed = self.store.dispatch(action).list_request == request;
        if !committed {
            tracing::debug!(request, "discarding stale course list response");
            return Ok(FetchOutcome::Discarded);
        }
        result.map_err(|e| {
            tracing::warn!(error = %e, "course list fetch failed");
            StoreError::from(e)
        })?;
        Ok(FetchOutcome::Applied)
    }

    /// Fetch one course with its modules and units into the detail slot.
    ///
    /// # Errors
    ///
    /// Returns the API error when the fetch fails; the error is also
    /// recorded in the store.
    pub async fn get_by_id(&self, id: &Id) -> Result<FetchOutcome, StoreError> {
        match self.session.status() {
            SessionStatus::Unknown => return Ok(FetchOutcome::Skipped),
            SessionStatus::Unauthenticated => {
                self.store.dispatch(CoursesAction::SelectionCleared);
                return Ok(FetchOutcome::Cleared);
            }
            SessionStatus::Authenticated(_) => {}
        }

        let request = self.store.dispatch(CoursesAction::DetailRequested { id: id.clone() }).detail_request;
        tracing::debug!(request, course_id = %id, "fetching course detail");
        let (action, result) = match self.api.get_course(id).await {
            Ok(course) => (CoursesAction::DetailLoaded { request, course }, Ok(())),
            Err(e) => (CoursesAction::DetailFailed { request, error: e.to_string() }, Err(e)),
        };
        if self.store.dispatch(action).detail_request != request {
            tracing::debug!(request, course_id = %id, "discarding stale course detail response");
            return Ok(FetchOutcome::Discarded);
        }
        result.map_err(|e| {
            tracing::warn!(course_id = %id, error = %e, "course detail fetch failed");
            StoreError::from(e)
        })?;
        Ok(FetchOutcome::Applied)
    }

    /// Drop the detail slot, e.g. when navigating away.
    pub fn clear_selected(&self) {
        self.store.dispatch(CoursesAction::SelectionCleared);
    }

    /// Create a course and append it to the list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a blank name and
    /// [`StoreError::NotAuthenticated`] when signed out, both without any
    /// request; otherwise the API error.
    pub async fn create(&self, input: NewCourse) -> Result<Course, StoreError> {
        if input.name.trim().is_empty() {
            return Err(StoreError::Validation("Course name is required.".into()));
        }
        self.require_session()?;

        let epoch = self.store.dispatch(CoursesAction::CreateStarted).epoch;
        match self.api.create_course(&input).await {
            Ok(course) => {
                tracing::info!(course_id = %course.id, "course created");
                self.store.dispatch(CoursesAction::CourseCreated { epoch, course: course.clone() });
                Ok(course)
            }
            Err(e) => Err(self.create_failed(epoch, e.into())),
        }
    }

    /// Create a module in `course_id`. A missing `order` is placed after the
    /// course's existing modules. The course detail is refetched afterwards
    /// when it is the one on display.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a blank title and
    /// [`StoreError::NotAuthenticated`] when signed out; otherwise the API
    /// error.
    pub async fn create_module(&self, course_id: &Id, mut input: NewModule) -> Result<Module, StoreError> {
        if input.title.trim().is_empty() {
            return Err(StoreError::Validation("Module title is required.".into()));
        }
        self.require_session()?;

        let epoch = self.store.dispatch(CoursesAction::CreateStarted).epoch;
        if input.order.is_none() {
            match self.next_module_order(course_id).await {
                Ok(order) => input.order = Some(order),
                Err(e) => return Err(self.create_failed(epoch, e)),
            }
        }

        let module = match self.api.create_module(course_id, &input).await {
            Ok(module) => module,
            Err(e) => return Err(self.create_failed(epoch, e.into())),
        };
        tracing::info!(course_id = %course_id, module_id = %module.id, "module created");
        self.store.dispatch(CoursesAction::ModuleCreated { epoch });

        if let Err(e) = self.invalidate(Tag::Course(course_id.clone())).await {
            tracing::warn!(course_id = %course_id, error = %e, "refetch after module create failed");
        }
        Ok(module)
    }

    /// Create a unit in `module_id` and merge it into the cached course
    /// detail without a refetch. A missing `order` is placed after the
    /// module's existing units.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a blank title and
    /// [`StoreError::NotAuthenticated`] when signed out; otherwise the API
    /// error.
    pub async fn create_unit(&self, course_id: &Id, module_id: &Id, mut input: NewUnit) -> Result<Unit, StoreError> {
        if input.title.trim().is_empty() {
            return Err(StoreError::Validation("Unit title is required.".into()));
        }
        self.require_session()?;

        let epoch = self.store.dispatch(CoursesAction::CreateStarted).epoch;
        if input.order.is_none() {
            match self.next_unit_order(course_id, module_id).await {
                Ok(order) => input.order = Some(order),
                Err(e) => return Err(self.create_failed(epoch, e)),
            }
        }

        match self.api.create_unit(module_id, &input).await {
            Ok(unit) => {
                tracing::info!(module_id = %module_id, unit_id = %unit.id, "unit created");
                self.store.dispatch(CoursesAction::UnitCreated {
                    epoch,
                    course_id: course_id.clone(),
                    module_id: module_id.clone(),
                    unit: unit.clone(),
                });
                Ok(unit)
            }
            Err(e) => Err(self.create_failed(epoch, e.into())),
        }
    }

    fn create_failed(&self, epoch: u64, err: StoreError) -> StoreError {
        tracing::warn!(error = %err, "create failed");
        self.store.dispatch(CoursesAction::CreateFailed { epoch, error: err.to_string() });
        err
    }

    /// Modules of a course, straight from the backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotAuthenticated`] when signed out, else the API error.
    pub async fn list_modules(&self, course_id: &Id) -> Result<Vec<Module>, StoreError> {
        self.require_session()?;
        Ok(self.api.list_modules(course_id).await?)
    }

    /// Units of a module, straight from the backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotAuthenticated`] when signed out, else the API error.
    pub async fn list_units(&self, module_id: &Id) -> Result<Vec<Unit>, StoreError> {
        self.require_session()?;
        Ok(self.api.list_units(module_id).await?)
    }

    async fn next_module_order(&self, course_id: &Id) -> Result<i64, StoreError> {
        let cached = self.store.read(|s| {
            s.selected
                .as_ref()
                .filter(|c| &c.id == course_id)
                .map(|c| next_order(&c.modules))
        });
        match cached {
            Some(order) => Ok(order),
            None => Ok(next_order(&self.api.list_modules(course_id).await?)),
        }
    }

    async fn next_unit_order(&self, course_id: &Id, module_id: &Id) -> Result<i64, StoreError> {
        let cached = self.store.read(|s| {
            s.selected
                .as_ref()
                .filter(|c| &c.id == course_id)
                .and_then(|c| c.module(module_id))
                .map(|m| next_order(&m.units))
        });
        match cached {
            Some(order) => Ok(order),
            None => Ok(next_order(&self.api.list_units(module_id).await?)),
        }
    }

    /// Refetch whatever is cached under `tag`.
    ///
    /// # Errors
    ///
    /// Returns the error of the triggered fetch.
    pub async fn invalidate(&self, tag: Tag) -> Result<FetchOutcome, StoreError> {
        match tag {
            Tag::Courses => self.list_for_user().await,
            Tag::Course(id) => {
                let shown = self.store.read(|s| s.selected_id.as_ref() == Some(&id));
                if shown { self.get_by_id(&id).await } else { Ok(FetchOutcome::Skipped) }
            }
        }
    }

    pub fn clear_error(&self) {
        self.store.dispatch(CoursesAction::ClearError);
    }

    pub fn clear_selected_error(&self) {
        self.store.dispatch(CoursesAction::ClearSelectedError);
    }

    /// Drop everything and discard in-flight responses.
    pub fn reset(&self) {
        self.store.dispatch(CoursesAction::Reset);
    }
}
