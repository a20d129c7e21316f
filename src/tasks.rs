use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::core::{Task, TaskPatch};
use crate::session::SessionStore;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("no task with id {0}")]
    UnknownTask(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Navigation signal raised when an operation needs a view the controller
/// does not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Auth,
}

/// At most one task is in edit mode at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub task_id: String,
    pub draft_title: String,
}

/// The task collection controller. `tasks` is a cache of server truth,
/// rebuilt by `load` and patched only after the server has acknowledged a
/// mutation; no optimistic updates. Mutations take `&mut self`, so two
/// operations cannot overlap on one controller; `busy` is display state for
/// a UI, not a lock.
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    draft_title: String,
    editing: Option<EditState>,
    busy: bool,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn draft_title(&self) -> &str {
        &self.draft_title
    }

    pub fn set_draft_title(&mut self, title: impl Into<String>) {
        self.draft_title = title.into();
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.editing.as_ref()
    }

    /// Replace the collection with the server's, in server order. Without a
    /// token no request is issued and the caller is redirected to auth.
    pub async fn load(
        &mut self,
        api: &ApiClient,
        session: &SessionStore,
    ) -> Result<Option<Redirect>, ApiError> {
        let Some(token) = session.token() else {
            log::info!("no session, redirecting to auth");
            return Ok(Some(Redirect::Auth));
        };

        self.busy = true;
        let result = api.list_tasks(token).await;
        self.busy = false;

        self.tasks = result?;
        Ok(None)
    }

    /// Create a task from the draft title. A whitespace-only draft is a
    /// no-op with no request. On success the server's task is appended and
    /// the draft cleared; on failure the draft is kept for another try.
    /// Returns whether a task was created.
    pub async fn add_task(&mut self, api: &ApiClient, token: &str) -> Result<bool, ApiError> {
        let title = self.draft_title.trim().to_string();
        if title.is_empty() {
            return Ok(false);
        }

        self.busy = true;
        let result = api.create_task(token, &title).await;
        self.busy = false;

        let task = result?;
        log::info!("created task {}", task.id);
        self.tasks.push(task);
        self.draft_title.clear();
        Ok(true)
    }

    /// Ask the server to flip `completed`, then mirror the flip locally.
    pub async fn toggle_complete(
        &mut self,
        api: &ApiClient,
        token: &str,
        id: &str,
    ) -> Result<(), TaskError> {
        let completed = self
            .tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.completed)
            .ok_or_else(|| TaskError::UnknownTask(id.to_string()))?;

        self.busy = true;
        let result = api
            .update_task(token, id, &TaskPatch::completed(!completed))
            .await;
        self.busy = false;
        result?;

        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.completed = !completed;
        }
        Ok(())
    }

    /// Enter edit mode for one task, seeding the edit draft with its current
    /// title. Selecting a different task discards any previous draft.
    /// Returns false for an unknown id.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        match self.tasks.iter().find(|t| t.id == id) {
            Some(task) => {
                self.editing = Some(EditState {
                    task_id: task.id.clone(),
                    draft_title: task.title.clone(),
                });
                true
            }
            None => false,
        }
    }

    pub fn set_edit_draft(&mut self, title: impl Into<String>) {
        if let Some(edit) = self.editing.as_mut() {
            edit.draft_title = title.into();
        }
    }

    /// Discard the pending edit without a server call.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Confirm the pending edit. With no edit pending or an empty trimmed
    /// draft, nothing is sent (the edit stays open for correction). On
    /// success the local title is replaced and edit mode cleared; on failure
    /// the edit stays open. Returns whether a rename was sent and applied.
    pub async fn rename_task(&mut self, api: &ApiClient, token: &str) -> Result<bool, TaskError> {
        let Some(edit) = self.editing.clone() else {
            return Ok(false);
        };
        let title = edit.draft_title.trim().to_string();
        if title.is_empty() {
            return Ok(false);
        }
        if !self.tasks.iter().any(|t| t.id == edit.task_id) {
            // The task vanished under the edit (deleted elsewhere).
            self.editing = None;
            return Err(TaskError::UnknownTask(edit.task_id));
        }

        self.busy = true;
        let result = api
            .update_task(token, &edit.task_id, &TaskPatch::title(&title))
            .await;
        self.busy = false;
        result?;

        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == edit.task_id) {
            task.title = title;
        }
        self.editing = None;
        Ok(true)
    }

    /// Delete on the server, then drop the matching task locally.
    pub async fn delete_task(
        &mut self,
        api: &ApiClient,
        token: &str,
        id: &str,
    ) -> Result<(), TaskError> {
        if !self.tasks.iter().any(|t| t.id == id) {
            return Err(TaskError::UnknownTask(id.to_string()));
        }

        self.busy = true;
        let result = api.delete_task(token, id).await;
        self.busy = false;
        result?;

        self.tasks.retain(|t| t.id != id);
        if self.editing.as_ref().is_some_and(|e| e.task_id == id) {
            self.editing = None;
        }
        log::info!("deleted task {}", id);
        Ok(())
    }
}
