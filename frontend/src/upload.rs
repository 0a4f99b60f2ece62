use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, FileList, HtmlInputElement};
use yew::prelude::*;

use crate::api::{ApiClient, DetectedFile, ProcessOutcome, UploadRecord};
use crate::config::AppConfig;
use crate::error::{ApiError, ValidationError};
use crate::format::{format_file_size, format_short_date};
use crate::icons::{icon_cogs, icon_file, icon_search, icon_spinner, icon_upload};
use crate::validation::validate_statement;

const DRAG_EVENTS: [&str; 4] = ["dragenter", "dragover", "dragleave", "drop"];
const NO_FILE_SELECTED: &str = "No file selected";

pub fn success_message(outcome: &ProcessOutcome) -> String {
    format!("Successfully processed {} transactions!", outcome.processed)
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Redirect {
    path: String,
    delay_ms: u32,
}

fn schedule_redirect(Redirect { path, delay_ms }: Redirect) {
    Timeout::new(delay_ms, move || {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.location().set_href(&path) {
                log::error!("redirect to {} failed: {:?}", path, err);
            }
        }
    })
    .forget();
}

/// How an upload or detected-file run ends.
#[derive(Debug, PartialEq)]
enum Completion {
    Processed { message: String, redirect: Redirect },
    Failed(String),
}

fn completion(
    result: Result<ProcessOutcome, ApiError>,
    fallback: &str,
    config: &AppConfig,
) -> Completion {
    match result {
        Ok(outcome) => {
            log::info!("processed {} transactions", outcome.processed);
            Completion::Processed {
                message: success_message(&outcome),
                redirect: Redirect {
                    path: config.dashboard_path.clone(),
                    delay_ms: config.redirect_delay_ms,
                },
            }
        }
        Err(err) => {
            log::warn!("{}: {}", fallback, err);
            Completion::Failed(err.user_message(fallback))
        }
    }
}

/// A file offered by the picker or a drop, generic over the browser handle.
#[derive(Clone, Debug, PartialEq)]
struct Candidate<F> {
    file: F,
    name: String,
    size: u64,
}

type SelectedFile = Candidate<File>;

impl SelectedFile {
    fn from_file(file: File) -> Self {
        Candidate {
            name: file.name(),
            size: file.size() as u64,
            file,
        }
    }
}

/// Only the first offered file is considered. A rejected file leaves the
/// current selection in place.
fn select<F>(
    current: Option<Candidate<F>>,
    offered: impl IntoIterator<Item = Candidate<F>>,
    limit: u64,
) -> (Option<Candidate<F>>, Option<ValidationError>) {
    let Some(first) = offered.into_iter().next() else {
        return (current, None);
    };
    match validate_statement(&first.name, first.size, limit) {
        Ok(()) => (Some(first), None),
        Err(err) => (current, Some(err)),
    }
}

/// Error and success banners. Every show schedules its own hide; earlier
/// timers are left running.
#[derive(Clone)]
struct Banners {
    error: UseStateHandle<Option<String>>,
    success: UseStateHandle<Option<String>>,
    success_visible: UseStateHandle<bool>,
    timeout_ms: u32,
}

impl Banners {
    fn show_error(&self, message: impl Into<String>) {
        self.error.set(Some(message.into()));
        let error = self.error.clone();
        Timeout::new(self.timeout_ms, move || error.set(None)).forget();
    }

    fn hide_error(&self) {
        self.error.set(None);
    }

    fn show_success(&self, message: String) {
        self.success.set(Some(message));
        self.success_visible.set(true);
        let visible = self.success_visible.clone();
        Timeout::new(self.timeout_ms, move || visible.set(false)).forget();
    }
}

/// State shared by the upload and detected-file flows.
#[derive(Clone)]
struct Progress {
    loading: UseStateHandle<Option<String>>,
    preview_visible: UseStateHandle<bool>,
    banners: Banners,
}

impl Progress {
    fn show_loading(&self, message: &str) {
        self.loading.set(Some(message.to_string()));
        self.preview_visible.set(false);
        self.banners.hide_error();
    }

    fn finish(
        &self,
        result: Result<ProcessOutcome, ApiError>,
        fallback: &str,
        config: &AppConfig,
    ) -> bool {
        self.loading.set(None);
        match completion(result, fallback, config) {
            Completion::Processed { message, redirect } => {
                self.banners.show_success(message);
                schedule_redirect(redirect);
                true
            }
            Completion::Failed(message) => {
                self.banners.show_error(message);
                false
            }
        }
    }
}

#[function_component(Upload)]
pub fn upload() -> Html {
    let config = use_context::<AppConfig>().unwrap_or_default();
    let client = ApiClient::new(&config);

    let file_input = use_node_ref();
    let selected = use_state(|| None::<SelectedFile>);
    let file_info = use_state(|| NO_FILE_SELECTED.to_string());
    let drag_active = use_state(|| false);
    let scanning = use_state(|| false);
    let detected = use_state(|| None::<Vec<DetectedFile>>);
    let history = use_state(Vec::<UploadRecord>::new);

    let banners = Banners {
        error: use_state(|| None::<String>),
        success: use_state(|| None::<String>),
        success_visible: use_state(|| false),
        timeout_ms: config.banner_timeout_ms,
    };
    let progress = Progress {
        loading: use_state(|| None::<String>),
        preview_visible: use_state(|| false),
        banners: banners.clone(),
    };

    // Keep the browser from opening files dropped outside the drop area.
    use_effect_with_deps(
        |_| {
            let listeners: Vec<EventListener> = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.body())
                .map(|body| {
                    DRAG_EVENTS
                        .iter()
                        .map(|event| {
                            EventListener::new_with_options(
                                &body,
                                *event,
                                EventListenerOptions::enable_prevent_default(),
                                |e| {
                                    e.prevent_default();
                                    e.stop_propagation();
                                },
                            )
                        })
                        .collect()
                })
                .unwrap_or_default();
            move || drop(listeners)
        },
        (),
    );

    {
        let client = client.clone();
        let history = history.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match client.upload_history().await {
                        Ok(records) => history.set(records),
                        Err(err) => log::warn!("Error loading upload history: {}", err),
                    }
                });
                || ()
            },
            (),
        );
    }

    let clear_selection = {
        let selected = selected.clone();
        let file_input = file_input.clone();
        let file_info = file_info.clone();
        let preview_visible = progress.preview_visible.clone();
        move || {
            selected.set(None);
            if let Some(input) = file_input.cast::<HtmlInputElement>() {
                input.set_value("");
            }
            file_info.set(NO_FILE_SELECTED.to_string());
            preview_visible.set(false);
        }
    };

    let handle_files = {
        let selected = selected.clone();
        let file_info = file_info.clone();
        let preview_visible = progress.preview_visible.clone();
        let banners = banners.clone();
        let limit = config.max_upload_bytes;
        Callback::from(move |files: FileList| {
            let offered = (0..files.length())
                .filter_map(|index| files.get(index))
                .map(SelectedFile::from_file);
            match select((*selected).clone(), offered, limit) {
                (_, Some(err)) => banners.show_error(err.to_string()),
                (Some(file), None) => {
                    file_info.set(format!("Selected: {}", file.name));
                    preview_visible.set(true);
                    selected.set(Some(file));
                }
                (None, None) => {}
            }
        })
    };

    let on_file_change = {
        let handle_files = handle_files.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(files) = input.files().filter(|files| files.length() > 0) {
                handle_files.emit(files);
            }
        })
    };

    let on_drag_over = {
        let drag_active = drag_active.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            e.stop_propagation();
            drag_active.set(true);
        })
    };

    let on_drag_leave = {
        let drag_active = drag_active.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            e.stop_propagation();
            drag_active.set(false);
        })
    };

    let on_drop = {
        let drag_active = drag_active.clone();
        let handle_files = handle_files.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            e.stop_propagation();
            drag_active.set(false);
            let files = e
                .data_transfer()
                .and_then(|transfer| transfer.files())
                .filter(|files| files.length() > 0);
            if let Some(files) = files {
                handle_files.emit(files);
            }
        })
    };

    let on_drop_area_click = {
        let file_input = file_input.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = file_input.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let on_change_file = {
        let clear_selection = clear_selection.clone();
        let banners = banners.clone();
        Callback::from(move |_: MouseEvent| {
            clear_selection();
            banners.hide_error();
        })
    };

    let on_upload = {
        let selected = selected.clone();
        let client = client.clone();
        let progress = progress.clone();
        let config = config.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(selection) = (*selected).clone() else {
                progress.banners.show_error("Please select a file first");
                return;
            };
            let client = client.clone();
            let progress = progress.clone();
            let config = config.clone();
            let clear_selection = clear_selection.clone();
            log::info!("uploading {} ({} bytes)", selection.name, selection.size);
            progress.show_loading("Uploading and processing file...");
            spawn_local(async move {
                let result = client.upload(&selection.file).await;
                if progress.finish(result, "Error uploading file", &config) {
                    clear_selection();
                }
            });
        })
    };

    let on_process = {
        let client = client.clone();
        let progress = progress.clone();
        let config = config.clone();
        Callback::from(move |path: String| {
            let client = client.clone();
            let progress = progress.clone();
            let config = config.clone();
            progress.show_loading("Processing detected file...");
            spawn_local(async move {
                let result = client.process_detected_file(&path).await;
                progress.finish(result, "Error processing file", &config);
            });
        })
    };

    let on_detect = {
        let client = client.clone();
        let scanning = scanning.clone();
        let detected = detected.clone();
        let banners = banners.clone();
        Callback::from(move |_: MouseEvent| {
            let client = client.clone();
            let scanning = scanning.clone();
            let detected = detected.clone();
            let banners = banners.clone();
            scanning.set(true);
            spawn_local(async move {
                match client.detect_files().await {
                    Ok(files) if !files.is_empty() => detected.set(Some(files)),
                    Ok(_) => {
                        banners.show_error("No XML files found in the data directory");
                        detected.set(None);
                    }
                    Err(err) => {
                        banners.show_error(format!("Error scanning for files: {}", err.detail()))
                    }
                }
                scanning.set(false);
            });
        })
    };

    let preview = (*selected).clone().filter(|_| *progress.preview_visible);

    html! {
        <div class="upload-page">
            if let Some(message) = &*banners.success {
                <div
                    id="success-message"
                    class="success-message"
                    style={if *banners.success_visible { "display: block" } else { "display: none" }}
                >
                    { message.clone() }
                </div>
            }

            <div class="detect-section">
                <button id="detect-btn" class="secondary-btn" disabled={*scanning} onclick={on_detect}>
                    if *scanning {
                        { icon_spinner() }
                        <span>{"Scanning..."}</span>
                    } else {
                        { icon_search() }
                        <span>{"Scan for Files"}</span>
                    }
                </button>
                <div id="detected-files" class={classes!(detected.is_none().then_some("hidden"))}>
                    <DetectedFileList files={(*detected).clone().unwrap_or_default()} on_process={on_process} />
                </div>
            </div>

            <div
                id="drop-area"
                class={classes!("drop-area", (*drag_active).then_some("active"))}
                ondragenter={on_drag_over.clone()}
                ondragover={on_drag_over}
                ondragleave={on_drag_leave}
                ondrop={on_drop}
                onclick={on_drop_area_click}
            >
                { icon_upload() }
                <p>{"Drag & drop your XML statement here, or click to browse"}</p>
                <p id="file-info" class="file-info">{ (*file_info).clone() }</p>
                <input
                    id="file-input"
                    type="file"
                    accept=".xml"
                    class="hidden"
                    ref={file_input}
                    onchange={on_file_change}
                />
            </div>

            <div id="preview-container" class={classes!("preview-container", preview.is_none().then_some("hidden"))}>
                if let Some(file) = &preview {
                    <div class="file-preview">
                        { icon_file() }
                        <div class="file-details">
                            <div id="filename-preview" class="file-name">{ file.name.clone() }</div>
                            <div id="filesize-preview" class="file-size">{ format_file_size(file.size) }</div>
                        </div>
                    </div>
                }
                <div class="preview-actions">
                    <button id="change-file-btn" class="secondary-btn" onclick={on_change_file}>{"Change File"}</button>
                    <button id="upload-btn" class="primary-btn" disabled={selected.is_none()} onclick={on_upload}>
                        {"Upload & Process"}
                    </button>
                </div>
            </div>

            <div id="loading-container" class={classes!("loading-container", progress.loading.is_none().then_some("hidden"))}>
                <div class="spinner">{ icon_spinner() }</div>
                <p id="loading-status">{ (*progress.loading).clone().unwrap_or_default() }</p>
            </div>

            <div id="error-message" class={classes!("error-message", banners.error.is_none().then_some("hidden"))}>
                <span id="error-text">{ (*banners.error).clone().unwrap_or_default() }</span>
            </div>

            <UploadHistory records={(*history).clone()} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct DetectedFileListProps {
    files: Vec<DetectedFile>,
    on_process: Callback<String>,
}

#[function_component(DetectedFileList)]
fn detected_file_list(props: &DetectedFileListProps) -> Html {
    html! {
        <div id="files-list">
            { for props.files.iter().map(|file| {
                let on_process = props.on_process.clone();
                let path = file.path.clone();
                html! {
                    <div class="file-item">
                        <div class="file-details-mini">
                            <div class="file-name">{ file.name.clone() }</div>
                            <div class="file-meta">
                                { format!("Size: {} | Modified: {}", file.size, format_short_date(&file.modified)) }
                            </div>
                        </div>
                        <button
                            class="process-file-btn primary-btn"
                            data-file-path={file.path.clone()}
                            onclick={Callback::from(move |_: MouseEvent| on_process.emit(path.clone()))}
                        >
                            { icon_cogs() }
                            <span>{"Process"}</span>
                        </button>
                    </div>
                }
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct UploadHistoryProps {
    records: Vec<UploadRecord>,
}

#[function_component(UploadHistory)]
fn upload_history(props: &UploadHistoryProps) -> Html {
    if props.records.is_empty() {
        return html! {};
    }

    html! {
        <div class="upload-history">
            <h3>{"Recent Uploads"}</h3>
            <ul>
                { for props.records.iter().map(|record| html! {
                    <li key={record.id.to_string()} class="history-item">
                        <span class="history-name">{ record.filename.clone() }</span>
                        <span class="history-count">
                            { format!("{} / {} messages", record.processed_messages, record.total_messages) }
                        </span>
                        <span class="history-status">{ record.status.clone() }</span>
                        <span class="history-date">{ format_short_date(&record.upload_date) }</span>
                    </li>
                }) }
            </ul>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::MAX_UPLOAD_BYTES;

    #[test]
    fn success_message_reports_processed_count() {
        let outcome = ProcessOutcome { processed: 5 };
        let message = success_message(&outcome);
        assert!(message.contains('5'));
        assert_eq!(message, "Successfully processed 5 transactions!");
    }

    #[test]
    fn processed_upload_redirects_to_the_dashboard() {
        let result = Ok(ProcessOutcome { processed: 5 });
        match completion(result, "Error uploading file", &AppConfig::default()) {
            Completion::Processed { message, redirect } => {
                assert!(message.contains('5'));
                assert_eq!(
                    redirect,
                    Redirect {
                        path: "/dashboard".to_string(),
                        delay_ms: 2_000,
                    }
                );
            }
            other => panic!("unexpected completion: {other:?}"),
        }
    }

    #[test]
    fn rejected_upload_shows_backend_error_without_redirect() {
        let result = Err(ApiError::Rejected {
            status: 400,
            message: Some("Invalid XML file".to_string()),
        });
        assert_eq!(
            completion(result, "Error uploading file", &AppConfig::default()),
            Completion::Failed("Invalid XML file".to_string())
        );

        let result = Err(ApiError::Rejected {
            status: 500,
            message: None,
        });
        assert_eq!(
            completion(result, "Error processing file", &AppConfig::default()),
            Completion::Failed("Error processing file".to_string())
        );
    }

    fn candidate(name: &str, size: u64) -> Candidate<()> {
        Candidate {
            file: (),
            name: name.to_string(),
            size,
        }
    }

    #[test]
    fn only_the_first_offered_file_is_considered() {
        let offered = vec![candidate("first.xml", 10), candidate("second.xml", 20)];
        let (selection, rejection) = select(None, offered, MAX_UPLOAD_BYTES);
        assert_eq!(selection, Some(candidate("first.xml", 10)));
        assert_eq!(rejection, None);

        let offered = vec![candidate("notes.txt", 10), candidate("sms.xml", 20)];
        let (selection, rejection) = select(None, offered, MAX_UPLOAD_BYTES);
        assert_eq!(selection, None);
        assert_eq!(rejection, Some(ValidationError::NotXml));
    }

    #[test]
    fn rejected_file_keeps_the_current_selection() {
        let current = Some(candidate("sms.xml", 1_024));

        let (selection, rejection) =
            select(current.clone(), vec![candidate("photo.png", 10)], MAX_UPLOAD_BYTES);
        assert_eq!(selection, current);
        assert_eq!(rejection, Some(ValidationError::NotXml));

        let too_large = candidate("big.xml", MAX_UPLOAD_BYTES + 1);
        let (selection, rejection) = select(current.clone(), vec![too_large], MAX_UPLOAD_BYTES);
        assert_eq!(selection, current);
        assert!(matches!(rejection, Some(ValidationError::TooLarge { .. })));
    }

    #[test]
    fn accepted_file_replaces_the_selection() {
        let current = Some(candidate("old.xml", 1_024));
        let (selection, rejection) =
            select(current, vec![candidate("new.XML", MAX_UPLOAD_BYTES)], MAX_UPLOAD_BYTES);
        assert_eq!(selection, Some(candidate("new.XML", MAX_UPLOAD_BYTES)));
        assert_eq!(rejection, None);

        let (selection, rejection) = select(selection, Vec::new(), MAX_UPLOAD_BYTES);
        assert_eq!(selection, Some(candidate("new.XML", MAX_UPLOAD_BYTES)));
        assert_eq!(rejection, None);
    }
}
