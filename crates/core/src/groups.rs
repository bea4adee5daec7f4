//! Group directory loader.
//!
//! The directory is fetched once per screen activation. A fetch is needed again
//! only when the selection is cleared from outside.

use crate::constants::GROUPS_FAILURE_MESSAGE;
use crate::error::{RegistrationError, RegistrationResult};
use crate::service::{Group, Presenter, RegistrationService};
use sobra_types::GroupId;

#[derive(Debug, Clone, Default)]
pub struct GroupDirectory {
    groups: Option<Vec<Group>>,
    selected: Option<GroupId>,
    fetched: bool,
}

impl GroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`GroupDirectory::load`] has work to do.
    pub fn needs_fetch(&self) -> bool {
        !self.fetched || self.selected.is_none()
    }

    /// Fetches the directory for `category` unless it is already loaded with a selection.
    ///
    /// On failure the fixed message is reported through `presenter`, the list is
    /// dropped so the picker is disabled, and the error is returned to the caller.
    pub async fn load(
        &mut self,
        category: &str,
        service: &dyn RegistrationService,
        presenter: &dyn Presenter,
    ) -> RegistrationResult<()> {
        if !self.needs_fetch() {
            return Ok(());
        }
        self.fetched = true;

        match service.fetch_groups(category).await {
            Ok(groups) => {
                tracing::info!(category, count = groups.len(), "loaded group directory");
                if self.selected.is_none() {
                    self.selected = groups.first().map(|g| g.id);
                }
                self.groups = Some(groups);
                Ok(())
            }
            Err(e) => {
                self.groups = None;
                presenter.report_failure(GROUPS_FAILURE_MESSAGE, &e);
                Err(RegistrationError::Service(e))
            }
        }
    }

    pub fn groups(&self) -> &[Group] {
        self.groups.as_deref().unwrap_or_default()
    }

    pub fn is_loaded(&self) -> bool {
        self.groups.is_some()
    }

    /// The picker is only usable once a list has been loaded.
    pub fn is_picker_enabled(&self) -> bool {
        self.is_loaded()
    }

    pub fn selected(&self) -> Option<GroupId> {
        self.selected
    }

    /// Display name of the selected group.
    pub fn selected_label(&self) -> Option<&str> {
        let id = self.selected?;
        self.groups()
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.group.as_str())
    }

    /// `(id, label)` pairs for a picker, in backend order.
    pub fn options(&self) -> Vec<(GroupId, &str)> {
        self.groups()
            .iter()
            .map(|g| (g.id, g.group.as_str()))
            .collect()
    }

    /// Selects a group of the loaded directory.
    pub fn select(&mut self, id: GroupId) -> RegistrationResult<()> {
        let groups = self
            .groups
            .as_ref()
            .ok_or(RegistrationError::GroupsNotLoaded)?;
        if !groups.iter().any(|g| g.id == id) {
            return Err(RegistrationError::UnknownGroup(id));
        }
        tracing::debug!(group = %id, "selected group");
        self.selected = Some(id);
        Ok(())
    }

    /// Clears the selection; the next [`GroupDirectory::load`] fetches again.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::service::{CreatePatientRequest, ProgressObserver};
    use async_trait::async_trait;
    use sobra_types::NonEmptyText;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    pub(crate) fn group(id: u64, name: &str) -> Group {
        Group {
            id: GroupId::new(id),
            group: NonEmptyText::new(name).unwrap(),
        }
    }

    struct DirectoryService {
        groups: Mutex<Option<Vec<Group>>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RegistrationService for DirectoryService {
        async fn fetch_groups(&self, category: &str) -> Result<Vec<Group>, ServiceError> {
            assert_eq!(category, "2");
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.groups
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ServiceError::Transport("offline".into()))
        }

        async fn create_patient(
            &self,
            _request: CreatePatientRequest,
            _progress: Arc<dyn ProgressObserver>,
        ) -> Result<String, ServiceError> {
            unreachable!("not used by the directory")
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        alerts: Mutex<Vec<String>>,
    }

    impl Presenter for RecordingPresenter {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
        fn navigate_back(&self) {}
    }

    fn service(groups: Option<Vec<Group>>) -> DirectoryService {
        DirectoryService {
            groups: Mutex::new(groups),
            calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_select_before_load_leaves_selection_empty() {
        let mut dir = GroupDirectory::new();
        let err = dir.select(GroupId::new(1)).expect_err("not loaded");
        assert!(matches!(err, RegistrationError::GroupsNotLoaded));
        assert_eq!(dir.selected(), None);
        assert!(!dir.is_picker_enabled());
    }

    #[tokio::test]
    async fn test_load_defaults_to_first_group() {
        let svc = service(Some(vec![group(3, "Profissionais"), group(5, "Idosos")]));
        let presenter = RecordingPresenter::default();
        let mut dir = GroupDirectory::new();

        dir.load("2", &svc, &presenter).await.unwrap();

        assert_eq!(dir.selected(), Some(GroupId::new(3)));
        assert_eq!(dir.selected_label(), Some("Profissionais"));
        assert_eq!(
            dir.options(),
            vec![(GroupId::new(3), "Profissionais"), (GroupId::new(5), "Idosos")]
        );
        assert!(presenter.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_fetches_once_per_activation() {
        let svc = service(Some(vec![group(1, "A"), group(2, "B")]));
        let presenter = RecordingPresenter::default();
        let mut dir = GroupDirectory::new();

        dir.load("2", &svc, &presenter).await.unwrap();
        dir.select(GroupId::new(2)).unwrap();
        dir.load("2", &svc, &presenter).await.unwrap();
        assert_eq!(svc.calls.load(Ordering::SeqCst), 1);
        assert_eq!(dir.selected(), Some(GroupId::new(2)));

        dir.clear_selection();
        assert!(dir.needs_fetch());
        dir.load("2", &svc, &presenter).await.unwrap();
        assert_eq!(svc.calls.load(Ordering::SeqCst), 2);
        assert_eq!(dir.selected(), Some(GroupId::new(1)));
    }

    #[tokio::test]
    async fn test_load_failure_reports_fixed_message() {
        let svc = service(None);
        let presenter = RecordingPresenter::default();
        let mut dir = GroupDirectory::new();

        let err = dir.load("2", &svc, &presenter).await.expect_err("offline");
        assert!(matches!(err, RegistrationError::Service(ServiceError::Transport(_))));
        assert!(dir.groups().is_empty());
        assert!(!dir.is_picker_enabled());
        assert_eq!(
            presenter.alerts.lock().unwrap().clone(),
            vec![GROUPS_FAILURE_MESSAGE.to_string()]
        );
    }

    #[tokio::test]
    async fn test_load_empty_directory_keeps_selection_empty() {
        let svc = service(Some(vec![]));
        let presenter = RecordingPresenter::default();
        let mut dir = GroupDirectory::new();

        dir.load("2", &svc, &presenter).await.unwrap();
        assert!(dir.is_loaded());
        assert_eq!(dir.selected(), None);
        assert_eq!(dir.selected_label(), None);
    }

    #[tokio::test]
    async fn test_select_unknown_group_is_rejected() {
        let svc = service(Some(vec![group(1, "A")]));
        let presenter = RecordingPresenter::default();
        let mut dir = GroupDirectory::new();
        dir.load("2", &svc, &presenter).await.unwrap();

        let err = dir.select(GroupId::new(99)).expect_err("unknown");
        assert!(matches!(err, RegistrationError::UnknownGroup(id) if id.get() == 99));
        assert_eq!(dir.selected(), Some(GroupId::new(1)));
    }

    #[tokio::test]
    async fn test_failed_refetch_disables_picker() {
        let svc = service(Some(vec![group(1, "A"), group(2, "B")]));
        let presenter = RecordingPresenter::default();
        let mut dir = GroupDirectory::new();
        dir.load("2", &svc, &presenter).await.unwrap();
        assert!(dir.is_picker_enabled());

        dir.clear_selection();
        *svc.groups.lock().unwrap() = None;
        dir.load("2", &svc, &presenter).await.expect_err("offline");

        assert!(!dir.is_picker_enabled());
        assert!(dir.options().is_empty());
        assert_eq!(dir.selected(), None);
        assert!(matches!(
            dir.select(GroupId::new(1)),
            Err(RegistrationError::GroupsNotLoaded)
        ));
        assert_eq!(svc.calls.load(Ordering::SeqCst), 2);
    }
}
