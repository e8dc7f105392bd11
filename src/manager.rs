//! State behind the author screen: the displayed list, the form, the search box and the
//! inline error, plus the operations that move between them.

use std::fmt::Display;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    client::ApiError,
    traits::{AuthorApi, Confirm},
    types::{
        author::{Author, AuthorUpdate, NewAuthor},
        birth_date::{BirthDate, BirthDateError},
        guid::Guid,
        text::is_blank,
    },
};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this author?";

/// Optional behaviour of the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// Check names and birth date locally before sending a create or update.
    pub validation: bool,
    /// Allow searching by name.
    pub search:     bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            validation: true,
            search:     true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Search,
    Create,
    Update,
    Delete,
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Action::Load => "load the author list",
            Action::Search => "search authors",
            Action::Create => "create the author",
            Action::Update => "update the author",
            Action::Delete => "delete the author",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("First name is required")]
    MissingFirstName,
    #[error("Last name is required")]
    MissingLastName,
    #[error("Birth date is required")]
    MissingBirthDate,
    #[error(transparent)]
    MalformedBirthDate(#[from] BirthDateError),
    #[error("Birth date {0} is in the future")]
    BirthDateInFuture(NaiveDate),
}

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Could not {action}: {source}")]
    Remote {
        action: Action,
        #[source]
        source: ApiError,
    },
    #[error("No author is selected for editing")]
    NotEditing,
    #[error("Search is disabled")]
    SearchDisabled,
    #[error("No displayed author has guid {0}")]
    UnknownAuthor(Guid),
}

impl ManagerError {
    /// Load and search failures are shown inline above the table; everything else is a
    /// one-off alert.
    pub fn is_alert(&self) -> bool {
        !matches!(
            self,
            ManagerError::Remote {
                action: Action::Load | Action::Search,
                ..
            }
        )
    }
}

/// Raw form fields. `selected` is `None` in create mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthorForm {
    pub first_name: String,
    pub last_name:  String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    pub selected:   Option<Guid>,
}

impl AuthorForm {
    pub fn from_author(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            last_name:  author.last_name.clone(),
            birth_date: author.birth_date.to_form_value(),
            selected:   Some(author.guid.clone()),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.selected.is_some()
    }

    pub fn parse_birth_date(&self) -> Result<BirthDate, ValidationError> {
        if is_blank(&self.birth_date) {
            return Err(ValidationError::MissingBirthDate);
        }
        Ok(BirthDate::parse_form(&self.birth_date)?)
    }

    pub fn validate(&self, today: NaiveDate) -> Result<BirthDate, ValidationError> {
        if is_blank(&self.first_name) {
            return Err(ValidationError::MissingFirstName);
        }
        if is_blank(&self.last_name) {
            return Err(ValidationError::MissingLastName);
        }
        let birth_date = self.parse_birth_date()?;
        if birth_date.is_after(today) {
            return Err(ValidationError::BirthDateInFuture(birth_date.date()));
        }
        Ok(birth_date)
    }

    pub fn to_new_author(&self, birth_date: BirthDate) -> NewAuthor {
        NewAuthor {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date,
        }
    }

    pub fn to_update(&self, guid: Guid, birth_date: BirthDate) -> AuthorUpdate {
        AuthorUpdate {
            guid,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date,
        }
    }
}

pub struct AuthorManager<A> {
    api:         A,
    features:    Features,
    authors:     Vec<Author>,
    form:        AuthorForm,
    search_text: String,
    error:       Option<String>,
}

impl<A: AuthorApi> AuthorManager<A> {
    pub fn new(api: A, features: Features) -> Self {
        Self {
            api,
            features,
            authors: vec![],
            form: AuthorForm::default(),
            search_text: String::new(),
            error: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn form(&self) -> &AuthorForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AuthorForm {
        &mut self.form
    }

    /// Inline error shown above the table, if the last load or search failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    fn inline_failure(&mut self, action: Action, source: ApiError) -> ManagerError {
        error!("Could not {action}: {source}");
        self.error = Some(format!("Could not {action}."));
        ManagerError::Remote { action, source }
    }

    fn alert_failure(action: Action, source: ApiError) -> ManagerError {
        error!("Could not {action}: {source}");
        ManagerError::Remote { action, source }
    }

    /// Replace the displayed list with the server's. On failure the previous list stays.
    pub async fn load(&mut self) -> Result<(), ManagerError> {
        match self.api.list().await {
            Ok(authors) => {
                info!("Loaded {} authors", authors.len());
                self.authors = authors;
                self.error = None;
                Ok(())
            }
            Err(e) => Err(self.inline_failure(Action::Load, e)),
        }
    }

    /// Reload after a successful write. A failing reload is already recorded inline.
    async fn refresh(&mut self) {
        let _ = self.load().await;
    }

    fn prepare(&self, today: NaiveDate) -> Result<BirthDate, ValidationError> {
        let checked = if self.features.validation {
            self.form.validate(today)
        } else {
            self.form.parse_birth_date()
        };
        checked.map_err(|e| {
            warn!("Rejected author form: {e}");
            e
        })
    }

    /// Update in edit mode, create otherwise.
    pub async fn submit(&mut self) -> Result<(), ManagerError> {
        self.submit_on(Local::now().date_naive()).await
    }

    pub async fn submit_on(&mut self, today: NaiveDate) -> Result<(), ManagerError> {
        if self.form.is_editing() {
            self.update_on(today).await
        } else {
            self.create_on(today).await
        }
    }

    pub async fn create_on(&mut self, today: NaiveDate) -> Result<(), ManagerError> {
        let birth_date = self.prepare(today)?;
        let author = self.form.to_new_author(birth_date);
        self.api
            .create(&author)
            .await
            .map_err(|e| Self::alert_failure(Action::Create, e))?;
        info!("Created author {} {}", author.first_name, author.last_name);
        self.refresh().await;
        self.reset();
        Ok(())
    }

    pub async fn update_on(&mut self, today: NaiveDate) -> Result<(), ManagerError> {
        let guid = self.form.selected.clone().ok_or(ManagerError::NotEditing)?;
        let birth_date = self.prepare(today)?;
        let author = self.form.to_update(guid.clone(), birth_date);
        self.api
            .update(&guid, &author)
            .await
            .map_err(|e| Self::alert_failure(Action::Update, e))?;
        info!("Updated author {guid}");
        self.refresh().await;
        self.reset();
        Ok(())
    }

    /// Returns `false` when the user declined and nothing was sent.
    pub async fn delete<C: Confirm>(
        &mut self,
        guid: &Guid,
        confirm: &C,
    ) -> Result<bool, ManagerError> {
        if !confirm.confirm(DELETE_PROMPT).await {
            info!("Deletion of {guid} declined");
            return Ok(false);
        }
        self.api
            .delete(guid)
            .await
            .map_err(|e| Self::alert_failure(Action::Delete, e))?;
        info!("Deleted author {guid}");
        self.refresh().await;
        Ok(true)
    }

    /// Search by the current search text. Blank text reloads the full list.
    pub async fn search(&mut self) -> Result<(), ManagerError> {
        if !self.features.search {
            return Err(ManagerError::SearchDisabled);
        }
        if is_blank(&self.search_text) {
            return self.load().await;
        }
        match self.api.search_by_name(&self.search_text).await {
            Ok(authors) => {
                info!("Search for `{}` found {}", self.search_text, authors.len());
                self.authors = authors;
                self.error = None;
                Ok(())
            }
            Err(e) => Err(self.inline_failure(Action::Search, e)),
        }
    }

    /// Copy a displayed row into the form and switch to edit mode.
    pub fn select(&mut self, guid: &Guid) -> Result<(), ManagerError> {
        let author = self
            .authors
            .iter()
            .find(|x| &x.guid == guid)
            .ok_or_else(|| ManagerError::UnknownAuthor(guid.clone()))?;
        self.form = AuthorForm::from_author(author);
        Ok(())
    }

    /// Back to an empty form in create mode. The list is untouched.
    pub fn reset(&mut self) {
        self.form = AuthorForm::default();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        List,
        Search(String),
        Create(NewAuthor),
        Update(Guid, AuthorUpdate),
        Delete(Guid),
    }

    #[derive(Default)]
    struct FakeApi {
        authors: RefCell<Vec<Author>>,
        found:   RefCell<Vec<Author>>,
        calls:   RefCell<Vec<Call>>,
        failing: Cell<bool>,
    }

    impl FakeApi {
        fn with(authors: Vec<Author>) -> Self {
            let api = Self::default();
            *api.authors.borrow_mut() = authors;
            api
        }

        fn outcome(&self, call: Call) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(call);
            if self.failing.get() {
                return Err(ApiError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body:   "boom".into(),
                });
            }
            Ok(())
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl AuthorApi for FakeApi {
        async fn list(&self) -> Result<Vec<Author>, ApiError> {
            self.outcome(Call::List)?;
            Ok(self.authors.borrow().clone())
        }

        async fn search_by_name(&self, name: &str) -> Result<Vec<Author>, ApiError> {
            self.outcome(Call::Search(name.to_string()))?;
            Ok(self.found.borrow().clone())
        }

        async fn create(&self, author: &NewAuthor) -> Result<(), ApiError> {
            self.outcome(Call::Create(author.clone()))?;
            let mut authors = self.authors.borrow_mut();
            let id = authors.len() as i64 + 1;
            authors.push(Author {
                id,
                guid: Guid(uuid::Uuid::new_v4().to_string()),
                first_name: author.first_name.clone(),
                last_name: author.last_name.clone(),
                birth_date: author.birth_date,
            });
            Ok(())
        }

        async fn update(&self, guid: &Guid, author: &AuthorUpdate) -> Result<(), ApiError> {
            self.outcome(Call::Update(guid.clone(), author.clone()))?;
            for x in self.authors.borrow_mut().iter_mut().filter(|x| &x.guid == guid) {
                x.first_name = author.first_name.clone();
                x.last_name = author.last_name.clone();
                x.birth_date = author.birth_date;
            }
            Ok(())
        }

        async fn delete(&self, guid: &Guid) -> Result<(), ApiError> {
            self.outcome(Call::Delete(guid.clone()))?;
            self.authors.borrow_mut().retain(|x| &x.guid != guid);
            Ok(())
        }
    }

    struct Answer(bool);

    impl Confirm for Answer {
        async fn confirm(&self, message: &str) -> bool {
            assert_eq!(message, DELETE_PROMPT);
            self.0
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        ymd(2024, 6, 15)
    }

    fn author(id: i64, guid: &str, first: &str, last: &str, born: NaiveDate) -> Author {
        Author {
            id,
            guid: guid.into(),
            first_name: first.into(),
            last_name: last.into(),
            birth_date: BirthDate(born),
        }
    }

    fn ana() -> Author {
        author(1, "g1", "Ana", "Ruiz", ymd(1990, 5, 1))
    }

    fn luis() -> Author {
        author(2, "g2", "Luis", "Soto", ymd(1975, 11, 30))
    }

    fn fill(manager: &mut AuthorManager<FakeApi>, first: &str, last: &str, born: &str) {
        let form = manager.form_mut();
        form.first_name = first.into();
        form.last_name = last.into();
        form.birth_date = born.into();
    }

    #[tokio::test]
    async fn initial_load_shows_response_verbatim() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![ana(), luis()]), Features::default());
        manager.load().await.unwrap();
        assert_eq!(manager.api().calls(), vec![Call::List]);
        assert_eq!(manager.authors(), &[ana(), luis()]);
        assert_eq!(manager.error(), None);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_list() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![ana()]), Features::default());
        manager.load().await.unwrap();
        manager.api().failing.set(true);

        let err = manager.load().await.unwrap_err();
        assert!(!err.is_alert());
        assert_eq!(manager.error(), Some("Could not load the author list."));
        assert_eq!(manager.authors(), &[ana()]);

        manager.api().failing.set(false);
        manager.load().await.unwrap();
        assert_eq!(manager.error(), None);
    }

    #[tokio::test]
    async fn select_fills_the_form() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![ana()]), Features::default());
        manager.load().await.unwrap();
        manager.select(&"g1".into()).unwrap();
        assert_eq!(
            manager.form(),
            &AuthorForm {
                first_name: "Ana".into(),
                last_name:  "Ruiz".into(),
                birth_date: "1990-05-01".into(),
                selected:   Some("g1".into()),
            }
        );
        assert!(matches!(
            manager.select(&"nope".into()),
            Err(ManagerError::UnknownAuthor(_))
        ));
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_without_request() {
        let mut manager = AuthorManager::new(FakeApi::default(), Features::default());
        fill(&mut manager, "  ", "Ruiz", "1990-05-01");
        assert!(matches!(
            manager.create_on(today()).await,
            Err(ManagerError::Validation(ValidationError::MissingFirstName))
        ));
        fill(&mut manager, "Ana", "", "1990-05-01");
        assert!(matches!(
            manager.create_on(today()).await,
            Err(ManagerError::Validation(ValidationError::MissingLastName))
        ));
        fill(&mut manager, "Ana", "Ruiz", "");
        assert!(matches!(
            manager.create_on(today()).await,
            Err(ManagerError::Validation(ValidationError::MissingBirthDate))
        ));
        fill(&mut manager, "Ana", "Ruiz", "01/05/1990");
        assert!(matches!(
            manager.create_on(today()).await,
            Err(ManagerError::Validation(ValidationError::MalformedBirthDate(_)))
        ));
        assert!(manager.api().calls().is_empty());
        assert_eq!(manager.form().first_name, "Ana");
    }

    #[tokio::test]
    async fn create_rejects_future_birth_date() {
        let mut manager = AuthorManager::new(FakeApi::default(), Features::default());
        fill(&mut manager, "Ana", "Ruiz", "2024-06-16");
        let err = manager.create_on(today()).await.unwrap_err();
        assert!(err.is_alert());
        assert!(matches!(
            err,
            ManagerError::Validation(ValidationError::BirthDateInFuture(d)) if d == ymd(2024, 6, 16)
        ));
        assert!(manager.api().calls().is_empty());

        fill(&mut manager, "Ana", "Ruiz", "2024-06-15");
        manager.create_on(today()).await.unwrap();
    }

    #[tokio::test]
    async fn create_sends_fields_then_reloads_and_resets() {
        let mut manager = AuthorManager::new(FakeApi::default(), Features::default());
        fill(&mut manager, "Ana", "Ruiz", "1990-05-01");
        manager.create_on(today()).await.unwrap();

        let sent = NewAuthor {
            first_name: "Ana".into(),
            last_name:  "Ruiz".into(),
            birth_date: BirthDate(ymd(1990, 5, 1)),
        };
        assert_eq!(manager.api().calls(), vec![Call::Create(sent), Call::List]);
        assert_eq!(manager.form(), &AuthorForm::default());
        assert_eq!(manager.authors().len(), 1);
        assert_eq!(manager.authors()[0].first_name, "Ana");
    }

    #[tokio::test]
    async fn failed_create_keeps_form_and_list() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![luis()]), Features::default());
        manager.load().await.unwrap();
        manager.api().failing.set(true);
        fill(&mut manager, "Ana", "Ruiz", "1990-05-01");

        let err = manager.create_on(today()).await.unwrap_err();
        assert!(err.is_alert());
        assert_eq!(
            err.to_string(),
            "Could not create the author: server answered 500 Internal Server Error: boom"
        );
        assert_eq!(manager.api().calls().len(), 2);
        assert_eq!(manager.form().first_name, "Ana");
        assert_eq!(manager.authors(), &[luis()]);
        assert_eq!(manager.error(), None);
    }

    #[tokio::test]
    async fn without_validation_only_the_date_must_parse() {
        let features = Features {
            validation: false,
            ..Features::default()
        };
        let mut manager = AuthorManager::new(FakeApi::default(), features);
        fill(&mut manager, "", "", "2999-01-01");
        manager.create_on(today()).await.unwrap();
        assert_eq!(manager.api().calls().len(), 2);

        fill(&mut manager, "Ana", "Ruiz", "ayer");
        assert!(matches!(
            manager.create_on(today()).await,
            Err(ManagerError::Validation(ValidationError::MalformedBirthDate(_)))
        ));
    }

    #[tokio::test]
    async fn update_needs_a_selection() {
        let mut manager = AuthorManager::new(FakeApi::default(), Features::default());
        fill(&mut manager, "Ana", "Ruiz", "1990-05-01");
        assert!(matches!(
            manager.update_on(today()).await,
            Err(ManagerError::NotEditing)
        ));
        assert!(manager.api().calls().is_empty());
    }

    #[tokio::test]
    async fn submit_in_edit_mode_updates() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![ana(), luis()]), Features::default());
        manager.load().await.unwrap();
        manager.select(&"g1".into()).unwrap();
        manager.form_mut().last_name = "Ruiz Soto".into();
        manager.submit_on(today()).await.unwrap();

        let sent = AuthorUpdate {
            guid:       "g1".into(),
            first_name: "Ana".into(),
            last_name:  "Ruiz Soto".into(),
            birth_date: BirthDate(ymd(1990, 5, 1)),
        };
        assert_eq!(
            manager.api().calls(),
            vec![Call::List, Call::Update("g1".into(), sent), Call::List]
        );
        assert_eq!(manager.form(), &AuthorForm::default());
        assert_eq!(manager.authors()[0].last_name, "Ruiz Soto");
    }

    #[tokio::test]
    async fn failed_update_stays_in_edit_mode() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![ana()]), Features::default());
        manager.load().await.unwrap();
        manager.select(&"g1".into()).unwrap();
        manager.api().failing.set(true);
        assert!(manager.submit_on(today()).await.unwrap_err().is_alert());
        assert_eq!(manager.form().selected, Some("g1".into()));
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![ana()]), Features::default());
        manager.load().await.unwrap();
        assert!(!manager.delete(&"g1".into(), &Answer(false)).await.unwrap());
        assert_eq!(manager.api().calls(), vec![Call::List]);
        assert_eq!(manager.authors(), &[ana()]);
    }

    #[tokio::test]
    async fn confirmed_delete_sends_one_request_and_reloads() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![ana(), luis()]), Features::default());
        manager.load().await.unwrap();
        assert!(manager.delete(&"g1".into(), &Answer(true)).await.unwrap());
        assert_eq!(
            manager.api().calls(),
            vec![Call::List, Call::Delete("g1".into()), Call::List]
        );
        assert_eq!(manager.authors(), &[luis()]);
    }

    #[tokio::test]
    async fn failed_delete_is_an_alert() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![ana()]), Features::default());
        manager.load().await.unwrap();
        manager.api().failing.set(true);
        let err = manager.delete(&"g1".into(), &Answer(true)).await.unwrap_err();
        assert!(err.is_alert());
        assert_eq!(manager.authors(), &[ana()]);
    }

    #[tokio::test]
    async fn blank_search_reloads_everything() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![ana(), luis()]), Features::default());
        manager.set_search_text("   ");
        manager.search().await.unwrap();
        assert_eq!(manager.api().calls(), vec![Call::List]);
        assert_eq!(manager.authors(), &[ana(), luis()]);
    }

    #[tokio::test]
    async fn search_replaces_the_list() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![ana(), luis()]), Features::default());
        manager.load().await.unwrap();
        *manager.api().found.borrow_mut() = vec![luis()];
        manager.set_search_text("Luis");
        manager.search().await.unwrap();
        assert_eq!(manager.api().calls(), vec![Call::List, Call::Search("Luis".into())]);
        assert_eq!(manager.authors(), &[luis()]);
    }

    #[tokio::test]
    async fn failed_search_is_inline() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![ana()]), Features::default());
        manager.load().await.unwrap();
        manager.api().failing.set(true);
        manager.set_search_text("Ana");
        let err = manager.search().await.unwrap_err();
        assert!(!err.is_alert());
        assert_eq!(manager.error(), Some("Could not search authors."));
        assert_eq!(manager.authors(), &[ana()]);
    }

    #[tokio::test]
    async fn search_can_be_disabled() {
        let features = Features {
            search: false,
            ..Features::default()
        };
        let mut manager = AuthorManager::new(FakeApi::default(), features);
        manager.set_search_text("Ana");
        assert!(matches!(
            manager.search().await,
            Err(ManagerError::SearchDisabled)
        ));
        assert!(manager.api().calls().is_empty());
    }

    #[tokio::test]
    async fn reset_leaves_the_list_alone() {
        let mut manager = AuthorManager::new(FakeApi::with(vec![ana()]), Features::default());
        manager.load().await.unwrap();
        manager.select(&"g1".into()).unwrap();
        manager.reset();
        assert_eq!(manager.form(), &AuthorForm::default());
        assert!(!manager.form().is_editing());
        assert_eq!(manager.authors(), &[ana()]);
    }
}
