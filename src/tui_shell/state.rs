use super::*;

pub(super) enum AppEvent {
    CatalogLoaded(ResourceCatalog),
    PreviewLoaded {
        path: String,
        result: std::result::Result<usize, String>,
    },
    /// A submission answered without touching the job board (busy).
    JobRejected(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Focus {
    Nodes,
    Models,
    Images,
    Train,
}

impl Focus {
    pub(super) fn next(self) -> Self {
        match self {
            Focus::Nodes => Focus::Models,
            Focus::Models => Focus::Images,
            Focus::Images => Focus::Train,
            Focus::Train => Focus::Nodes,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TrainField {
    ModelName,
    ModelType,
    Epochs,
    BatchSize,
    LearningRate,
}

impl TrainField {
    pub(super) const ALL: [TrainField; 5] = [
        TrainField::ModelName,
        TrainField::ModelType,
        TrainField::Epochs,
        TrainField::BatchSize,
        TrainField::LearningRate,
    ];

    pub(super) fn label(self) -> &'static str {
        match self {
            TrainField::ModelName => "New Model Name",
            TrainField::ModelType => "Model Type",
            TrainField::Epochs => "Epochs",
            TrainField::BatchSize => "Batch Size",
            TrainField::LearningRate => "Learning Rate",
        }
    }

    pub(super) fn value(self, form: &TrainForm) -> String {
        match self {
            TrainField::ModelName => form.model_name.clone(),
            TrainField::ModelType => form.model_type.label().to_string(),
            TrainField::Epochs => form.epochs.to_string(),
            TrainField::BatchSize => form.batch_size.to_string(),
            TrainField::LearningRate => form.learning_rate.to_string(),
        }
    }

    fn step(self, delta: isize) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[clamp_index(Some(idx), delta, Self::ALL.len()).unwrap_or(0)]
    }
}

/// Writes an edited value back into the form.
pub(super) fn apply_field(form: &mut TrainForm, field: TrainField, raw: &str) -> Result<(), String> {
    let raw = raw.trim();
    match field {
        TrainField::ModelName => form.model_name = raw.to_string(),
        TrainField::ModelType => form.model_type = raw.parse::<ModelType>()?,
        TrainField::Epochs => {
            form.epochs = raw
                .parse()
                .map_err(|_| format!("epochs must be a whole number, got '{}'", raw))?
        }
        TrainField::BatchSize => {
            form.batch_size = raw
                .parse()
                .map_err(|_| format!("batch size must be a whole number, got '{}'", raw))?
        }
        TrainField::LearningRate => {
            form.learning_rate = raw
                .parse()
                .map_err(|_| format!("learning rate must be a number, got '{}'", raw))?
        }
    }
    Ok(())
}

/// Moves `current` by `delta` within `0..len`; `None` when the list is empty.
pub(super) fn clamp_index(current: Option<usize>, delta: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let next = match current {
        None => 0,
        Some(i) => (i as isize + delta).clamp(0, len as isize - 1) as usize,
    };
    Some(next)
}

pub(super) struct App {
    pub(super) backend: HttpBackend,
    pub(super) catalog: ResourceCatalog,
    pub(super) catalog_loading: bool,

    pub(super) selection: SelectionController,
    pub(super) selection_rx: watch::Receiver<SelectionState>,

    pub(super) jobs: Rc<JobSubmitter<HttpBackend>>,
    pub(super) jobs_rx: watch::Receiver<JobBoard>,

    pub(super) events_tx: mpsc::UnboundedSender<AppEvent>,
    pub(super) events_rx: mpsc::UnboundedReceiver<AppEvent>,

    pub(super) focus: Focus,
    pub(super) form: TrainForm,
    pub(super) form_field: TrainField,
    pub(super) editing: Option<Input>,

    pub(super) preview: Option<String>,
    pub(super) status: Option<(String, bool)>,
    pub(super) quit: bool,
}

impl App {
    pub(super) fn new(backend: HttpBackend) -> Self {
        let selection = SelectionController::new();
        let selection_rx = selection.subscribe();
        let jobs = Rc::new(JobSubmitter::new(backend.clone()));
        let jobs_rx = jobs.subscribe();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            catalog: ResourceCatalog::new(),
            catalog_loading: false,
            selection,
            selection_rx,
            jobs,
            jobs_rx,
            events_tx,
            events_rx,
            focus: Focus::Nodes,
            form: TrainForm::default(),
            form_field: TrainField::ModelName,
            editing: None,
            preview: None,
            status: None,
            quit: false,
        }
    }

    pub(super) fn selection_state(&self) -> SelectionState {
        self.selection_rx.borrow().clone()
    }

    pub(super) fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some((msg.into(), false));
    }

    pub(super) fn set_error(&mut self, msg: impl Into<String>) {
        self.status = Some((msg.into(), true));
    }

    pub(super) fn reload_catalog(&mut self) {
        if self.catalog_loading {
            return;
        }
        self.catalog_loading = true;
        self.set_status("Loading catalog...");
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::task::spawn_local(async move {
            let mut catalog = ResourceCatalog::new();
            catalog.load(&backend).await;
            let _ = tx.send(AppEvent::CatalogLoaded(catalog));
        });
    }

    pub(super) fn handle_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::CatalogLoaded(catalog) => {
                self.catalog = catalog;
                self.catalog_loading = false;
                self.selection.catalog_loaded(self.catalog.snapshot());
                let snap = self.catalog.snapshot();
                let status = match &snap.load_error {
                    Some(err) => (
                        format!("Catalog unavailable ({}): {}", err.kind, err.message),
                        true,
                    ),
                    None => (
                        format!(
                            "Loaded {} nodes, {} images",
                            snap.nodes.len(),
                            snap.images.len()
                        ),
                        false,
                    ),
                };
                self.status = Some(status);
            }
            AppEvent::PreviewLoaded { path, result } => {
                if self.selection_state().selected_image.as_deref() != Some(path.as_str()) {
                    return;
                }
                self.preview = Some(match result {
                    Ok(len) => format!("{} ({} bytes)", self.backend.image_url(&path), len),
                    Err(msg) => format!("preview failed: {}", msg),
                });
            }
            AppEvent::JobRejected(msg) => self.set_error(format!("Error: {}", msg)),
        }
    }

    pub(super) fn move_cursor(&mut self, delta: isize) {
        let state = self.selection_state();
        let snap = self.catalog.snapshot();
        match self.focus {
            Focus::Nodes => {
                let current = state
                    .selected_node
                    .as_deref()
                    .and_then(|n| snap.node_position(n));
                if let Some(i) = clamp_index(current, delta, snap.nodes.len()) {
                    let name = snap.nodes[i].name.clone();
                    self.selection.set_node(snap, &name);
                }
            }
            Focus::Models => {
                let models = &state.available_models;
                let current = state
                    .selected_model
                    .as_deref()
                    .and_then(|m| models.position(m));
                if let Some(i) = clamp_index(current, delta, models.len()) {
                    if let Some(name) = models.iter().nth(i) {
                        self.selection.set_model(snap, name);
                    }
                }
            }
            Focus::Images => {
                let current = state
                    .selected_image
                    .as_deref()
                    .and_then(|p| snap.image_position(p));
                if let Some(i) = clamp_index(current, delta, snap.images.len()) {
                    let path = snap.images[i].clone();
                    if self.selection.set_image(snap, &path) {
                        self.request_preview(path);
                    }
                }
            }
            Focus::Train => self.form_field = self.form_field.step(delta),
        }
    }

    fn request_preview(&mut self, path: String) {
        self.preview = Some(format!("loading {}...", path));
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::task::spawn_local(async move {
            let result = backend
                .fetch_image(&path)
                .await
                .map(|bytes| bytes.len())
                .map_err(|err| normalize(err).message);
            let _ = tx.send(AppEvent::PreviewLoaded { path, result });
        });
    }

    pub(super) fn submit(&mut self, kind: JobKind) {
        let state = self.selection_state();
        let request = match kind {
            JobKind::Train => JobRequest::Train(self.form.request_for(&state)),
            JobKind::Inference => JobRequest::Inference(state.inference_request()),
        };
        debug!(%kind, "submitting from dashboard");
        let jobs = Rc::clone(&self.jobs);
        let tx = self.events_tx.clone();
        tokio::task::spawn_local(async move {
            let result = jobs.submit(request).await;
            if let Some(err) = result.error() {
                if err.kind == ErrorKind::Busy {
                    let _ = tx.send(AppEvent::JobRejected(err.message.clone()));
                }
            }
        });
    }

    pub(super) fn start_edit(&mut self) {
        if self.focus != Focus::Train {
            return;
        }
        if self.form_field == TrainField::ModelType {
            self.form.model_type = self.form.model_type.next();
            return;
        }
        let current = self.form_field.value(&self.form);
        self.editing = Some(Input::with_text(current));
    }

    pub(super) fn commit_edit(&mut self) {
        let Some(input) = self.editing.take() else {
            return;
        };
        if let Err(msg) = apply_field(&mut self.form, self.form_field, &input.buf) {
            self.set_error(msg);
        }
    }

    pub(super) fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub(super) fn in_flight(&self, kind: JobKind) -> bool {
        self.jobs.is_in_flight(kind)
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/state_tests.rs"]
mod state_tests;
