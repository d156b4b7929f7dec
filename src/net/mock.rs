//! Scripted in-memory [`LmsApi`] for store and view tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use tokio::sync::oneshot;

use super::api::LmsApi;
use super::error::ApiError;
use super::types::{Course, Id, Module, NewCourse, NewModule, NewUnit, Unit, UnitType, User};

/// Canned outcome for one mocked endpoint.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Unauthorized,
    Status(u16, &'static str),
    Network,
}

impl<T: Clone> Reply<T> {
    fn resolve(&self) -> Result<T, ApiError> {
        match self {
            Self::Ok(v) => Ok(v.clone()),
            Self::Unauthorized => Err(ApiError::Unauthorized),
            Self::Status(status, detail) => {
                Err(ApiError::Status { status: *status, detail: vec![(*detail).to_owned()] })
            }
            Self::Network => Err(ApiError::Network("connection refused".into())),
        }
    }
}

pub struct MockApi {
    pub me: Mutex<Reply<User>>,
    pub login: Mutex<Reply<Option<User>>>,
    pub logout: Mutex<Reply<()>>,
    pub courses: Mutex<Reply<Vec<Course>>>,
    pub details: Mutex<HashMap<Id, Course>>,
    pub create_failure: Mutex<Option<Reply<()>>>,
    /// Makes `list_modules` and `list_units` fail.
    pub listing_failure: Mutex<Option<Reply<()>>>,
    pub created_modules: Mutex<Vec<(Id, NewModule)>>,
    pub created_units: Mutex<Vec<(Id, NewUnit)>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    gates: Mutex<HashMap<&'static str, VecDeque<oneshot::Receiver<()>>>>,
    next_id: Mutex<u64>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            me: Mutex::new(Reply::Unauthorized),
            login: Mutex::new(Reply::Ok(Some(user()))),
            logout: Mutex::new(Reply::Ok(())),
            courses: Mutex::new(Reply::Ok(Vec::new())),
            details: Mutex::new(HashMap::new()),
            create_failure: Mutex::new(None),
            listing_failure: Mutex::new(None),
            created_modules: Mutex::new(Vec::new()),
            created_units: Mutex::new(Vec::new()),
            calls: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            next_id: Mutex::new(100),
        }
    }
}

impl MockApi {
    /// A backend that already has a valid session for [`user`].
    pub fn signed_in() -> Self {
        let api = Self::default();
        *api.me.lock().unwrap() = Reply::Ok(user());
        api
    }

    pub fn with_courses(self, courses: Vec<Course>) -> Self {
        {
            let mut details = self.details.lock().unwrap();
            for c in &courses {
                details.insert(c.id.clone(), c.clone());
            }
        }
        *self.courses.lock().unwrap() = Reply::Ok(courses);
        self
    }

    pub fn with_detail(self, course: Course) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(course.id.clone(), course);
        self
    }

    /// Number of times `op` was called.
    pub fn calls(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(op)
            .copied()
            .unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Hold the next call to `op` until the returned sender fires (or drops).
    pub fn hold(&self, op: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .push_back(rx);
        tx
    }

    async fn enter(&self, op: &'static str) {
        *self.calls.lock().unwrap().entry(op).or_default() += 1;
        let gate = self
            .gates
            .lock()
            .unwrap()
            .get_mut(op)
            .and_then(VecDeque::pop_front);
        if let Some(rx) = gate {
            let _ = rx.await;
        }
    }

    fn fresh_id(&self) -> Id {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        Id::from(*next)
    }

    fn check_create(&self) -> Result<(), ApiError> {
        match self.create_failure.lock().unwrap().as_ref() {
            Some(reply) => reply.resolve(),
            None => Ok(()),
        }
    }

    fn check_listing(&self) -> Result<(), ApiError> {
        match self.listing_failure.lock().unwrap().as_ref() {
            Some(reply) => reply.resolve(),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl LmsApi for MockApi {
    async fn current_user(&self) -> Result<User, ApiError> {
        self.enter("current_user").await;
        self.me.lock().unwrap().resolve()
    }

    async fn login_with_google(&self, _token: &str) -> Result<Option<User>, ApiError> {
        self.enter("login").await;
        let reply = self.login.lock().unwrap().clone();
        if let Reply::Ok(Some(u)) = &reply {
            *self.me.lock().unwrap() = Reply::Ok(u.clone());
        }
        reply.resolve()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.enter("logout").await;
        *self.me.lock().unwrap() = Reply::Unauthorized;
        self.logout.lock().unwrap().resolve()
    }

    async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.enter("list_courses").await;
        self.courses.lock().unwrap().resolve()
    }

    async fn get_course(&self, course_id: &Id) -> Result<Course, ApiError> {
        self.enter("get_course").await;
        self.details
            .lock()
            .unwrap()
            .get(course_id)
            .cloned()
            .ok_or_else(|| ApiError::Status { status: 404, detail: vec!["Course not found".into()] })
    }

    async fn create_course(&self, input: &NewCourse) -> Result<Course, ApiError> {
        self.enter("create_course").await;
        self.check_create()?;
        let created = Course {
            id: self.fresh_id(),
            name: input.name.clone(),
            description: input.description.clone(),
            modules: Vec::new(),
        };
        if let Reply::Ok(list) = &mut *self.courses.lock().unwrap() {
            list.push(created.clone());
        }
        self.details
            .lock()
            .unwrap()
            .insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn list_modules(&self, course_id: &Id) -> Result<Vec<Module>, ApiError> {
        self.enter("list_modules").await;
        self.check_listing()?;
        Ok(self
            .details
            .lock()
            .unwrap()
            .get(course_id)
            .map(|c| c.modules.clone())
            .unwrap_or_default())
    }

    async fn create_module(&self, course_id: &Id, input: &NewModule) -> Result<Module, ApiError> {
        self.enter("create_module").await;
        self.check_create()?;
        self.created_modules
            .lock()
            .unwrap()
            .push((course_id.clone(), input.clone()));
        let created = Module {
            id: self.fresh_id(),
            title: input.title.clone(),
            description: input.description.clone(),
            order: input.order,
            units: Vec::new(),
        };
        if let Some(course) = self.details.lock().unwrap().get_mut(course_id) {
            course.modules.push(created.clone());
        }
        Ok(created)
    }

    async fn list_units(&self, module_id: &Id) -> Result<Vec<Unit>, ApiError> {
        self.enter("list_units").await;
        self.check_listing()?;
        Ok(self
            .details
            .lock()
            .unwrap()
            .values()
            .find_map(|c| c.module(module_id).map(|m| m.units.clone()))
            .unwrap_or_default())
    }

    async fn create_unit(&self, module_id: &Id, input: &NewUnit) -> Result<Unit, ApiError> {
        self.enter("create_unit").await;
        self.check_create()?;
        self.created_units
            .lock()
            .unwrap()
            .push((module_id.clone(), input.clone()));
        Ok(Unit {
            id: self.fresh_id(),
            title: input.title.clone(),
            unit_type: input.unit_type,
            content: input.content.clone(),
            order: input.order,
        })
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn user() -> User {
    User { id: Id::from(7), email: "ada@example.test".into(), name: Some("Ada Lovelace".into()) }
}

pub fn course(id: i64, name: &str) -> Course {
    Course { id: Id::from(id), name: name.into(), description: None, modules: Vec::new() }
}

pub fn unit(id: i64, title: &str, order: Option<i64>) -> Unit {
    Unit { id: Id::from(id), title: title.into(), unit_type: UnitType::Material, content: None, order }
}

pub fn module(id: i64, title: &str, order: Option<i64>, units: Vec<Unit>) -> Module {
    Module { id: Id::from(id), title: title.into(), description: None, order, units }
}

/// Course 42 with two modules whose units arrive ordered `[2, 1]`.
pub fn course_42() -> Course {
    Course {
        id: Id::from(42),
        name: "Algebra".into(),
        description: Some("Groups and rings".into()),
        modules: vec![
            module(1, "Groups", Some(1), vec![unit(10, "Cosets", Some(2)), unit(11, "Axioms", Some(1))]),
            module(2, "Rings", Some(2), vec![unit(20, "Ideals", Some(2)), unit(21, "Definitions", Some(1))]),
        ],
    }
}
