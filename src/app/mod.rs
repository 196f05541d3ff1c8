mod state;
mod ui;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::report::{build_tree_html, show_statistics, StatsRecord, TreeView, WellTree};
use crate::upload::{
    CompareRequest, FileKind, FileStatus, PageClient, TaskKind, UploadFile, UploadStatus, UploadSummary,
};
use eframe::{egui, App};
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc::{self as std_mpsc, Sender};

pub use state::{
    ActionProgress, CompareForm, CompareMode, ReportState, UploadedTable, STATS_CONTAINER, TREE_CONTAINER,
};

pub struct ReportApp {
    config: ClientConfig,
    client: PageClient,
    selected_file: Option<PathBuf>,
    file_kind: FileKind,
    download_name: String,
    state: ReportState,
    status_sender: Sender<FileStatus>,
}

impl ReportApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ClientConfig, client: PageClient) -> Self {
        Self::with_client(config, client)
    }

    pub fn with_client(config: ClientConfig, client: PageClient) -> Self {
        tracing::info!(base_url = %client.base_url(), "initializing report window");
        let (status_sender, status_receiver) = std_mpsc::channel();
        let state = ReportState {
            status_receiver: Some(status_receiver),
            ..Default::default()
        };

        Self {
            config,
            client,
            selected_file: None,
            file_kind: FileKind::default(),
            download_name: String::new(),
            state,
            status_sender,
        }
    }

    pub fn state(&self) -> &ReportState {
        &self.state
    }

    pub fn reset(&mut self) {
        tracing::info!("resetting report state");
        self.selected_file = None;
        self.download_name.clear();
        self.state.clear();
    }

    pub fn start_upload(&mut self) {
        let Some(path) = self.selected_file.clone() else {
            self.state.error_message = Some("No file selected".to_string());
            return;
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let kind = self.file_kind;

        tracing::info!(file = %name, kind = kind.as_str(), "starting upload");
        self.spawn_task(name, TaskKind::Upload(kind), move |client| async move {
            let file = UploadFile::from_path(&path).await.map_err(|e| {
                tracing::error!(path = %path.display(), error = %e, "failed to read file");
                e
            })?;
            client.upload_file(file, kind).await
        });
    }

    /// Runs a comparison over tables uploaded earlier.
    pub fn start_compare(&mut self, request: CompareRequest) {
        tracing::info!(compare = request.label(), "starting comparison");
        let name = request.label().to_string();
        self.spawn_task(name, TaskKind::Compare, move |client| async move {
            client.compare(&request).await
        });
    }

    /// Runs `job` on a worker thread with its own runtime. The details list
    /// gets a `Processing` entry now, replaced by the outcome later.
    fn spawn_task<F, Fut>(&mut self, name: String, task: TaskKind, job: F)
    where
        F: FnOnce(PageClient) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Value, Error>>,
    {
        let id = self.state.next_task_id();
        let client = self.client.clone();
        let sender = self.status_sender.clone();

        self.state.error_message = None;
        self.state.begin_task(&name);
        self.state.record_status(FileStatus {
            id,
            name: name.clone(),
            task,
            status: UploadStatus::Processing,
        });

        std::thread::spawn(move || {
            let result = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(job(client)),
                Err(e) => Err(Error::from(e)),
            };

            let status = match result {
                Ok(body) => UploadStatus::Success(body),
                Err(e) => UploadStatus::Error(e.to_string()),
            };
            let _ = sender.send(FileStatus {
                id,
                name,
                task,
                status,
            });
        });
    }

    pub fn download(&mut self, filename: &str) {
        let filename = filename.trim();
        if filename.is_empty() {
            self.state.error_message = Some("Enter a file name to download".to_string());
            return;
        }
        self.client.download_file(filename);
    }

    /// Shows the summary, statistics and tree carried by a response. Upload
    /// responses also register their `cache_key` for later comparisons.
    pub fn apply_response(&mut self, task: TaskKind, body: &Value) {
        let summary = UploadSummary::from_value(body);
        if !summary.success {
            if let Some(message) = &summary.message {
                self.state.error_message = Some(message.clone());
            }
        }
        if let (TaskKind::Upload(kind), true, Some(cache_key)) = (task, summary.success, &summary.cache_key) {
            tracing::debug!(kind = kind.as_str(), cache_key = %cache_key, "table cached by service");
            self.state.remember_table(UploadedTable {
                kind,
                cache_key: cache_key.clone(),
            });
        }
        if let Some(output_file) = &summary.output_file {
            self.download_name = output_file.clone();
        }
        self.state.summary = Some(summary);

        if let Some(stats) = body.get("statistics") {
            match StatsRecord::from_json(stats) {
                Ok(stats) => {
                    if let Err(e) = show_statistics(&stats, &mut self.state.page, STATS_CONTAINER) {
                        tracing::warn!(error = %e, "statistics not rendered");
                    }
                    self.state.stats = Some(stats);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed statistics");
                    self.state.error_message = Some(e.to_string());
                }
            }
        }

        if let Some(tree) = body.get("tree_structure") {
            match WellTree::from_json(tree) {
                Ok(tree) => {
                    tracing::debug!(
                        fields = tree.field_count(),
                        units = tree.unit_count(),
                        wells = tree.well_count(),
                        "received tree structure"
                    );
                    let _ = self
                        .state
                        .page
                        .set_inner_html(TREE_CONTAINER, build_tree_html(&tree));
                    self.state.tree = Some(TreeView::new(&tree));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed tree structure");
                    self.state.error_message = Some(e.to_string());
                }
            }
        }
    }

    /// Re-renders the tree container after the view changed.
    fn refresh_tree_html(&mut self) {
        if let Some(view) = &self.state.tree {
            let _ = self.state.page.set_inner_html(TREE_CONTAINER, view.to_html());
        }
    }

    pub fn export_report(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("report.html")
            .add_filter("HTML", &["html"])
            .save_file()
        else {
            return;
        };

        let document = self.state.page.to_document(&self.config.window_title);
        match std::fs::write(&path, document) {
            Ok(()) => tracing::info!(path = %path.display(), "exported report"),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to export report");
                self.state.error_message = Some(format!("Failed to export report: {}", e));
            }
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let mut received = Vec::new();
        if let Some(receiver) = &self.state.status_receiver {
            while let Ok(status) = receiver.try_recv() {
                received.push(status);
            }
        }

        let had_updates = !received.is_empty();
        for status in received {
            match &status.status {
                UploadStatus::Success(body) => {
                    self.state.finish_task(true);
                    self.apply_response(status.task, body);
                }
                UploadStatus::Error(err) => {
                    self.state.finish_task(false);
                    self.state.error_message = Some(format!("{}: {}", status.name, err));
                }
                UploadStatus::Processing => {}
            }
            self.state.record_status(status);
        }

        if had_updates || self.state.pending() > 0 {
            ctx.request_repaint();
        }
    }
}

impl App for ReportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
