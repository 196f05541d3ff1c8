use super::{ActionProgress, CompareMode, ReportApp};
use crate::report::{stat_label, NodeId, NodeKind, TreeView, COLLAPSED_GLYPH};
use crate::upload::{FileKind, UploadStatus};
use crate::utils::{format_number, NumberUtils};
use eframe::egui::{self, Color32, RichText};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(44, 123, 229);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const FAILURE: Color32 = Color32::from_rgb(220, 50, 50);

impl ReportApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(16.0);
                ui.vertical_centered(|ui| {
                    ui.heading(self.config.window_title.as_str());
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(format!("Service: {}", self.client.base_url()))
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(16.0);
                self.render_upload_form(ui);

                if !self.state.uploaded_tables.is_empty() {
                    ui.add_space(10.0);
                    self.render_compare_form(ui);
                }

                if !matches!(self.state.progress, ActionProgress::NotStarted) {
                    ui.add_space(10.0);
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            if self.state.pending() > 0 {
                                ui.add(egui::Spinner::new());
                            }
                            ui.label(self.state.get_status_text());
                        });
                        if let Some(summary) = &self.state.summary {
                            if let Some(message) = &summary.message {
                                ui.label(message.as_str());
                            }
                            if let Some(rows) = summary.rows {
                                ui.label(format!(
                                    "{} rows, {} columns",
                                    format_number(rows),
                                    summary.columns.len()
                                ));
                            }
                        }
                    });
                }

                if self.state.stats.is_some() {
                    ui.add_space(10.0);
                    self.render_statistics(ui);
                }

                if self.state.tree.is_some() {
                    ui.add_space(10.0);
                    self.render_tree(ui);
                }

                ui.add_space(10.0);
                self.render_downloads(ui);

                if !self.state.file_statuses.is_empty() {
                    ui.add_space(10.0);
                    self.render_details(ui);
                }

                if let Some(error) = &self.state.error_message {
                    ui.add_space(10.0);
                    ui.vertical_centered(|ui| {
                        ui.colored_label(FAILURE, error.as_str());
                    });
                }
                ui.add_space(16.0);
            });
        });
    }

    fn render_upload_form(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                if ui.button("📁 Select File").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("Spreadsheets", &["xlsx", "xls", "csv"])
                        .pick_file()
                    {
                        self.selected_file = Some(path);
                    }
                }
                if let Some(path) = &self.selected_file {
                    let size = std::fs::metadata(path)
                        .map(|m| NumberUtils::format_size(m.len()))
                        .unwrap_or_default();
                    ui.label(format!("{} {}", path.display(), size));
                }
            });

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("Table type:");
                egui::ComboBox::from_id_source("file_kind")
                    .selected_text(self.file_kind.label())
                    .show_ui(ui, |ui| {
                        for kind in FileKind::ALL {
                            ui.selectable_value(&mut self.file_kind, kind, kind.label());
                        }
                    });
            });

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.add_enabled_ui(self.selected_file.is_some(), |ui| {
                    let button =
                        egui::Button::new("📤 Upload").min_size(egui::vec2(160.0, 32.0));
                    if ui.add(button).clicked() {
                        self.start_upload();
                    }
                });
                if ui.button("🗑 Clear").clicked() {
                    self.reset();
                }
            });
        });
    }

    fn render_compare_form(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label("Compare:");
                egui::ComboBox::from_id_source("compare_mode")
                    .selected_text(self.state.compare_form.mode.label())
                    .show_ui(ui, |ui| {
                        for mode in [CompareMode::A2Sec, CompareMode::A2Years] {
                            ui.selectable_value(&mut self.state.compare_form.mode, mode, mode.label());
                        }
                    });
                let hint = self.state.compare_form.mode.period_hint();
                ui.add(
                    egui::TextEdit::singleline(&mut self.state.compare_form.period)
                        .hint_text(hint)
                        .desired_width(80.0),
                );
            });

            let (first_kind, second_kind) = self.state.compare_form.mode.key_kinds();
            let first: Vec<String> = self.state.tables_of(first_kind).map(|t| t.cache_key.clone()).collect();
            let second: Vec<String> = self.state.tables_of(second_kind).map(|t| t.cache_key.clone()).collect();

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                table_picker(ui, "compare_first", first_kind, &first, &mut self.state.compare_form.first_key);
                table_picker(ui, "compare_second", second_kind, &second, &mut self.state.compare_form.second_key);
            });

            ui.add_space(6.0);
            if ui.button("🔍 Compare").clicked() {
                match self.state.compare_form.request() {
                    Ok(request) => self.start_compare(request),
                    Err(message) => self.state.error_message = Some(message),
                }
            }
        });
    }

    fn render_statistics(&self, ui: &mut egui::Ui) {
        let Some(stats) = &self.state.stats else {
            return;
        };

        ui.horizontal_wrapped(|ui| {
            for (key, count) in stats.iter() {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_min_width(110.0);
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new(format_number(count))
                                .size(22.0)
                                .strong()
                                .color(ACCENT),
                        );
                        ui.label(stat_label(key));
                    });
                });
            }
        });
    }

    fn render_tree(&mut self, ui: &mut egui::Ui) {
        let mut clicked = None;
        if let Some(view) = &self.state.tree {
            ui.group(|ui| {
                ui.strong("Field / Unit / Well");
                ui.add_space(4.0);
                for &root in view.roots() {
                    render_tree_node(ui, view, root, &mut clicked);
                }
            });
        }

        if let Some(id) = clicked {
            if let Some(view) = self.state.tree.as_mut() {
                view.toggle(id);
            }
            self.refresh_tree_html();
        }
    }

    fn render_downloads(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.download_name)
                        .hint_text("output file name"),
                );
                if ui.button("⬇ Download").clicked() {
                    let name = self.download_name.clone();
                    self.download(&name);
                }
                if ui.button("💾 Export HTML").clicked() {
                    self.export_report();
                }
            });
        });
    }

    fn render_details(&mut self, ui: &mut egui::Ui) {
        if ui
            .button(if self.state.show_details {
                "Hide Details"
            } else {
                "Show Details"
            })
            .clicked()
        {
            self.state.show_details = !self.state.show_details;
        }

        if self.state.show_details {
            egui::ScrollArea::vertical()
                .id_source("upload_details")
                .max_height(200.0)
                .show(ui, |ui| {
                    for status in &self.state.file_statuses {
                        ui.horizontal(|ui| match &status.status {
                            UploadStatus::Processing => {
                                ui.label("⏳");
                                ui.colored_label(
                                    MUTED,
                                    format!("{} ({}) - Running...", status.name, status.task.as_str()),
                                );
                            }
                            UploadStatus::Success(_) => {
                                ui.label("✅");
                                ui.colored_label(
                                    SUCCESS,
                                    format!("{} ({})", status.name, status.task.as_str()),
                                );
                            }
                            UploadStatus::Error(err) => {
                                ui.label("❌");
                                ui.colored_label(FAILURE, format!("{} - {}", status.name, err));
                            }
                        });
                    }
                });
        }
    }
}

fn table_picker(ui: &mut egui::Ui, id: &str, kind: FileKind, keys: &[String], selected: &mut String) {
    ui.label(kind.label());
    let text = if selected.is_empty() { "select..." } else { selected.as_str() };
    egui::ComboBox::from_id_source(id)
        .selected_text(text.to_string())
        .show_ui(ui, |ui| {
            for key in keys {
                ui.selectable_value(selected, key.clone(), key.as_str());
            }
        });
}

fn render_tree_node(ui: &mut egui::Ui, view: &TreeView, id: NodeId, clicked: &mut Option<NodeId>) {
    let (Some(kind), Some(label)) = (view.kind(id), view.label(id)) else {
        return;
    };
    let count = view.children(id).len();

    match kind {
        NodeKind::Well => {
            ui.horizontal(|ui| {
                ui.colored_label(MUTED, "●");
                ui.label(label);
            });
        }
        NodeKind::Field | NodeKind::Unit => {
            ui.horizontal(|ui| {
                if ui
                    .small_button(view.glyph(id).unwrap_or(COLLAPSED_GLYPH))
                    .clicked()
                {
                    *clicked = Some(id);
                }
                if kind == NodeKind::Field {
                    ui.strong(format!("{} ({}个单元)", label, count));
                } else {
                    ui.label(format!("{} ({}口井)", label, count));
                }
            });

            if view.is_expanded(id) {
                ui.indent(id, |ui| {
                    for &child in view.children(id) {
                        render_tree_node(ui, view, child, clicked);
                    }
                });
            }
        }
    }
}
