use chrono::{DateTime, Local};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::hooks::{use_navigate, use_params_map};
use leptos_router::path;
use lucide_leptos::{Cpu, Database, FlaskConical, Play, Trash2, TriangleAlert};
use serde_json::Value;
use web_sys::{AbortController, AbortSignal};

use mlplay_core::models::{
    is_classification_task, Algorithm, CreateExperimentRequest, Dataset, Experiment,
    ExperimentStatus, HyperparameterSpec, ParamType,
};
use mlplay_core::response::{detail_message, normalize_list};
use mlplay_core::schema::{self, IntListInput};
use mlplay_core::wizard::WizardState;
use mlplay_core::ApiError;

// ── HTTP client ───────────────────────────────────────────────────────────────

/// HTTP collaborator for the backend API.
///
/// Identity is injected here once (an optional bearer token minted by the
/// login flow); components below never touch browser storage themselves.
#[derive(Clone, Debug, PartialEq)]
struct ApiClient {
    base: String,
    token: Option<String>,
}

impl ApiClient {
    fn from_window() -> Self {
        let token = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item("access_token").ok().flatten())
            .filter(|t| !t.is_empty());
        Self {
            base: "/api".to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn with_auth(&self, request: gloo_net::http::RequestBuilder) -> gloo_net::http::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }

    async fn get_value(&self, path: &str) -> Result<Value, ApiError> {
        // Dropping the in-flight future (view teardown, dependency change)
        // drops the guard and aborts the request at the browser level.
        let guard = AbortOnDrop::new();
        let response = self
            .with_auth(gloo_net::http::Request::get(&self.url(path)))
            .abort_signal(guard.signal().as_ref())
            .send()
            .await
            .map_err(classify)?;
        body_value(response).await
    }

    async fn list_datasets(&self) -> Result<Vec<Dataset>, ApiError> {
        Ok(normalize_list(self.get_value("/datasets/").await?)?)
    }

    async fn list_algorithms(&self) -> Result<Vec<Algorithm>, ApiError> {
        Ok(normalize_list(self.get_value("/algorithms/").await?)?)
    }

    async fn list_experiments(&self) -> Result<Vec<Experiment>, ApiError> {
        Ok(normalize_list(self.get_value("/experiments/").await?)?)
    }

    async fn get_experiment(&self, id: i64) -> Result<Experiment, ApiError> {
        let body = self.get_value(&format!("/experiments/{id}/")).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn create_experiment(
        &self,
        request: &CreateExperimentRequest,
    ) -> Result<Experiment, ApiError> {
        let guard = AbortOnDrop::new();
        let response = self
            .with_auth(gloo_net::http::Request::post(&self.url("/experiments/")))
            .abort_signal(guard.signal().as_ref())
            .json(request)
            .map_err(classify)?
            .send()
            .await
            .map_err(classify)?;
        let body = body_value(response).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn delete_experiment(&self, id: i64) -> Result<(), ApiError> {
        let guard = AbortOnDrop::new();
        let response = self
            .with_auth(gloo_net::http::Request::delete(
                &self.url(&format!("/experiments/{id}/")),
            ))
            .abort_signal(guard.signal().as_ref())
            .send()
            .await
            .map_err(classify)?;
        if !response.ok() {
            let text = response.text().await.unwrap_or_default();
            let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
            return Err(ApiError::Api {
                status: response.status(),
                detail: detail_message(&body),
            });
        }
        Ok(())
    }
}

/// Decode a response body, turning non-2xx statuses into `ApiError::Api`
/// with the backend's `detail` message when one is present.
async fn body_value(response: gloo_net::http::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let ok = response.ok();
    let text = response.text().await.map_err(classify)?;
    let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
    if !ok {
        return Err(ApiError::Api {
            status,
            detail: detail_message(&body),
        });
    }
    Ok(body)
}

/// Map transport-layer failures into the client taxonomy. An abort raised
/// by [`AbortOnDrop`] surfaces as `AbortError` and becomes `Cancelled`.
fn classify(err: gloo_net::Error) -> ApiError {
    match err {
        gloo_net::Error::JsError(js) if js.name == "AbortError" => ApiError::Cancelled,
        other => ApiError::Network(other.to_string()),
    }
}

/// Aborts the associated fetch when dropped.
struct AbortOnDrop {
    controller: Option<AbortController>,
}

impl AbortOnDrop {
    fn new() -> Self {
        Self {
            controller: AbortController::new().ok(),
        }
    }

    fn signal(&self) -> Option<AbortSignal> {
        self.controller.as_ref().map(|c| c.signal())
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if let Some(controller) = self.controller.take() {
            controller.abort();
        }
    }
}

fn expect_api() -> ApiClient {
    use_context::<ApiClient>().expect("ApiClient not provided")
}

// ── Formatting helpers ────────────────────────────────────────────────────────

fn format_date(iso: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        let local = dt.with_timezone(&Local);
        local.format("%H:%M, %d %b, %Y").to_string()
    } else {
        iso.to_string()
    }
}

fn format_task(task: &str) -> String {
    if task.is_empty() {
        "—".to_string()
    } else {
        task.replace('_', " ")
    }
}

fn format_list_preview(list: Option<&Vec<String>>, max: usize) -> String {
    match list {
        Some(items) if !items.is_empty() => {
            let shown: Vec<&str> = items.iter().take(max).map(String::as_str).collect();
            let rest = items.len().saturating_sub(shown.len());
            if rest > 0 {
                format!("{} (+{} more)", shown.join(", "), rest)
            } else {
                shown.join(", ")
            }
        }
        _ => "—".to_string(),
    }
}

fn status_badge_class(status: ExperimentStatus) -> &'static str {
    match status {
        ExperimentStatus::Finished => "bg-emerald-900/40 text-emerald-200 border-emerald-700/60",
        ExperimentStatus::Failed => "bg-red-950/40 text-red-200 border-red-800/60",
        ExperimentStatus::Running => "bg-amber-950/40 text-amber-200 border-amber-800/60",
        _ => "bg-slate-800 text-slate-200 border-slate-700",
    }
}

/// Headline metric label and formatted value for one experiment.
fn metric_display(experiment: &Experiment) -> (&'static str, String) {
    let label = if is_classification_task(&experiment.task) {
        "Accuracy"
    } else if experiment.task.contains("regression") {
        "R²"
    } else {
        "Metric"
    };
    let value = match experiment.primary_metric() {
        Some(("accuracy", v)) => format!("{:.1}%", v * 100.0),
        Some((_, v)) => format!("{v:.4}"),
        None => "—".to_string(),
    };
    (label, value)
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .map(|w| w.confirm_with_message(message).unwrap_or(false))
        .unwrap_or(false)
}

// ── Shared UI ─────────────────────────────────────────────────────────────────

#[component]
fn ErrorBanner(message: String) -> impl IntoView {
    view! {
        <div class="flex items-start space-x-3 rounded-xl border border-red-800/60 bg-red-950/40 p-4 text-red-200">
            <div class="mt-0.5 text-red-400">
                <TriangleAlert size=18 />
            </div>
            <span>{message}</span>
        </div>
    }
}

#[component]
fn LoadingCard(label: &'static str) -> impl IntoView {
    view! {
        <div class="animate-pulse rounded-2xl border border-slate-800 bg-slate-900/60 p-6 text-slate-400">
            {label}
        </div>
    }
}

#[component]
fn EmptyState(message: &'static str) -> impl IntoView {
    view! {
        <div class="rounded-2xl border border-slate-800 bg-slate-900/60 p-6 text-slate-300">
            {message}
        </div>
    }
}

#[component]
fn Stat(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="rounded-xl bg-slate-950/40 p-4">
            <div class="text-xs text-slate-400">{label}</div>
            <div class="mt-1 text-sm font-medium text-slate-200">{value}</div>
        </div>
    }
}

#[component]
fn NavItem(href: &'static str, label: &'static str, children: Children) -> impl IntoView {
    view! {
        <A
            href=href
            attr:class="flex items-center space-x-3 px-4 py-3 rounded-xl hover:bg-slate-800 transition-all duration-200 text-slate-400 hover:text-white group"
        >
            <div class="group-hover:text-indigo-400 transition-colors">{children()}</div>
            <span class="font-medium">{label}</span>
        </A>
    }
}

// ── App shell ─────────────────────────────────────────────────────────────────

#[component]
fn App() -> impl IntoView {
    provide_context(ApiClient::from_window());

    view! {
        <Router>
            <div class="flex h-screen bg-slate-950 text-slate-100 font-sans">
                <nav class="w-64 border-r border-slate-800 flex flex-col p-4 bg-slate-900/50">
                    <div class="flex items-center space-x-3 px-2 py-6 mb-6">
                        <div class="p-2 bg-indigo-600 rounded-lg shadow-lg shadow-indigo-900/20">
                            <FlaskConical size=24 />
                        </div>
                        <span class="text-2xl font-bold tracking-tight text-white">"ML Playground"</span>
                    </div>

                    <div class="space-y-1">
                        <NavItem href="/" label="Experiments">
                            <FlaskConical size=20 />
                        </NavItem>
                        <NavItem href="/datasets" label="Datasets">
                            <Database size=20 />
                        </NavItem>
                        <NavItem href="/algorithms" label="Algorithms">
                            <Cpu size=20 />
                        </NavItem>
                        <NavItem href="/run" label="New experiment">
                            <Play size=20 />
                        </NavItem>
                    </div>
                </nav>

                <main class="flex-grow overflow-auto p-8">
                    <Routes fallback=|| view! { <NotFound /> }.into_any()>
                        <Route path=path!("/") view=|| view! { <ExperimentsPage /> } />
                        <Route path=path!("/datasets") view=|| view! { <DatasetsPage /> } />
                        <Route path=path!("/algorithms") view=|| view! { <AlgorithmsPage /> } />
                        <Route path=path!("/run") view=|| view! { <ExperimentCreatorWizard /> } />
                        <Route path=path!("/experiments/:id") view=|| view! { <ExperimentDetailPage /> } />
                    </Routes>
                </main>
            </div>
        </Router>
    }
    .into_any()
}

// ── Experiments ───────────────────────────────────────────────────────────────

#[component]
fn ExperimentsPage() -> impl IntoView {
    let api = expect_api();
    let experiments = LocalResource::new({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.list_experiments().await }
        }
    });

    let (action_error, set_action_error) = signal(String::new());
    let (deleting_id, set_deleting_id) = signal(None::<i64>);

    let delete = {
        let api = api.clone();
        move |id: i64| {
            if !confirm(&format!("Delete experiment #{id}? This cannot be undone.")) {
                return;
            }
            set_deleting_id.set(Some(id));
            set_action_error.set(String::new());
            let api = api.clone();
            spawn_local(async move {
                match api.delete_experiment(id).await {
                    Ok(()) => experiments.refetch(),
                    Err(err) if err.is_cancelled() => {}
                    Err(err) => set_action_error
                        .set(err.message_or("Failed to delete experiment. Please try again.")),
                }
                set_deleting_id.set(None);
            });
        }
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold text-white">"Your experiments"</h1>
                    <p class="mt-1 text-slate-400">"History of your experiments."</p>
                </div>
                <A
                    href="/run"
                    attr:class="flex items-center space-x-2 rounded-lg bg-indigo-600 hover:bg-indigo-500 px-4 py-2 text-sm font-semibold text-white transition-colors"
                >
                    <Play size=16 />
                    <span>"New experiment"</span>
                </A>
            </div>

            {move || {
                let message = action_error.get();
                (!message.is_empty()).then(|| view! { <ErrorBanner message=message /> })
            }}

            <Suspense fallback=|| view! { <LoadingCard label="Loading experiments..." /> }>
                {move || {
                    let delete = delete.clone();
                    Suspend::new(async move {
                        match experiments.await {
                            Ok(items) if items.is_empty() => {
                                view! { <EmptyState message="No experiments yet." /> }.into_any()
                            }
                            Ok(items) => view! {
                                <div class="space-y-4">
                                    {items
                                        .into_iter()
                                        .map(|experiment| {
                                            let on_delete = delete.clone();
                                            view! {
                                                <ExperimentCard
                                                    experiment=experiment
                                                    deleting_id=deleting_id
                                                    on_delete=on_delete
                                                />
                                            }
                                        })
                                        .collect_view()}
                                </div>
                            }
                            .into_any(),
                            Err(err) if err.is_cancelled() => view! { <div></div> }.into_any(),
                            Err(err) => view! {
                                <ErrorBanner message=err
                                    .message_or("Failed to load experiments. Please try again.") />
                            }
                            .into_any(),
                        }
                    })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn ExperimentCard<F>(
    experiment: Experiment,
    deleting_id: ReadSignal<Option<i64>>,
    on_delete: F,
) -> impl IntoView
where
    F: Fn(i64) + 'static,
{
    let id = experiment.id;
    let (metric_label, metric_value) = metric_display(&experiment);
    let deleting = Signal::derive(move || deleting_id.get() == Some(id));
    let created = if experiment.created_at.is_empty() {
        "—".to_string()
    } else {
        format_date(&experiment.created_at)
    };

    view! {
        <div class="rounded-2xl border border-slate-800 bg-slate-900/60 p-5 shadow-sm">
            <div class="flex items-start justify-between gap-4">
                <div>
                    <div class="text-sm text-slate-400">"Experiment #" {id}</div>
                    <h3 class="mt-1 text-lg font-semibold text-white">
                        <A
                            href=format!("/experiments/{id}")
                            attr:class="hover:text-indigo-300 transition-colors"
                        >
                            {experiment.algorithm.name.clone()}
                        </A>
                    </h3>
                    <p class="mt-1 text-slate-300">
                        "Dataset: "
                        <span class="text-slate-200">{experiment.dataset.name.clone()}</span>
                    </p>
                </div>

                <div class="flex flex-col items-end gap-2">
                    <span class=format!(
                        "inline-flex items-center rounded-lg border px-3 py-1 text-xs font-semibold {}",
                        status_badge_class(experiment.status),
                    )>{experiment.status.to_string()}</span>

                    <button
                        on:click=move |_| on_delete(id)
                        disabled=move || deleting.get()
                        class="flex items-center space-x-1 rounded-lg border border-red-800/60 bg-red-950/30 px-3 py-1.5 text-sm font-semibold text-red-200 hover:bg-red-950/50 disabled:opacity-50 disabled:cursor-not-allowed transition"
                        title="Delete experiment"
                    >
                        <Trash2 size=14 />
                        <span>{move || if deleting.get() { "Deleting..." } else { "Delete" }}</span>
                    </button>
                </div>
            </div>

            <div class="mt-4 grid grid-cols-1 gap-3 sm:grid-cols-3">
                <Stat label="Task" value=format_task(&experiment.task) />
                <Stat label=metric_label value=metric_value />
                <Stat label="Created" value=created />
            </div>
        </div>
    }
}

#[component]
fn ExperimentDetailPage() -> impl IntoView {
    let params = use_params_map();
    let id = move || {
        params
            .read()
            .get("id")
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or_default()
    };

    let api = expect_api();
    let navigate = use_navigate();
    let (action_error, set_action_error) = signal(String::new());
    let (deleting, set_deleting) = signal(false);

    let experiment = LocalResource::new({
        let api = api.clone();
        move || {
            let api = api.clone();
            let id = id();
            async move { api.get_experiment(id).await }
        }
    });

    let delete = {
        let api = api.clone();
        move |id: i64| {
            if !confirm("Delete this experiment? This action cannot be undone.") {
                return;
            }
            set_deleting.set(true);
            set_action_error.set(String::new());
            let api = api.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                match api.delete_experiment(id).await {
                    Ok(()) => navigate("/", Default::default()),
                    Err(err) if err.is_cancelled() => set_deleting.set(false),
                    Err(err) => {
                        set_action_error.set(err.message_or("Failed to delete experiment."));
                        set_deleting.set(false);
                    }
                }
            });
        }
    };

    view! {
        <div class="mx-auto w-full max-w-5xl space-y-6">
            {move || {
                let message = action_error.get();
                (!message.is_empty()).then(|| view! { <ErrorBanner message=message /> })
            }}

            <Suspense fallback=|| view! { <LoadingCard label="Loading experiment..." /> }>
                {move || {
                    let delete = delete.clone();
                    Suspend::new(async move {
                        match experiment.await {
                            Err(err) if err.is_cancelled() => view! { <div></div> }.into_any(),
                            Err(err) => view! {
                                <div class="space-y-4">
                                    <ErrorBanner message=err
                                        .message_or("Failed to load experiment details.") />
                                    <A href="/" attr:class="text-slate-200 underline">
                                        "Back to experiments"
                                    </A>
                                </div>
                            }
                            .into_any(),
                            Ok(experiment) => {
                                let (metric_label, metric_value) = metric_display(&experiment);
                                let experiment_id = experiment.id;
                                let hyperparameters = serde_json::to_string_pretty(&Value::Object(
                                    experiment.hyperparameters.clone().unwrap_or_default(),
                                ))
                                .unwrap_or_default();
                                let metrics = serde_json::to_string_pretty(&Value::Object(
                                    experiment.metrics.clone().unwrap_or_default(),
                                ))
                                .unwrap_or_default();
                                let predictions = experiment
                                    .predictions
                                    .as_ref()
                                    .map(|p| serde_json::to_string_pretty(p).unwrap_or_default());

                                view! {
                                    <div class="flex items-start justify-between gap-4">
                                        <div>
                                            <A href="/" attr:class="text-slate-300 hover:text-white underline">
                                                "← Back to experiments"
                                            </A>
                                            <h1 class="mt-3 text-3xl font-extrabold text-white">
                                                "Experiment #" {experiment_id}
                                            </h1>
                                            <div class="mt-2 flex flex-wrap items-center gap-2">
                                                <span class=format!(
                                                    "inline-flex items-center rounded-lg border px-3 py-1 text-xs font-semibold {}",
                                                    status_badge_class(experiment.status),
                                                )>{experiment.status.to_string()}</span>
                                                <span class="rounded-lg border border-slate-700 bg-slate-800 px-3 py-1 text-xs font-semibold text-slate-200">
                                                    {format_task(&experiment.task)}
                                                </span>
                                                <span class="rounded-lg border border-slate-700 bg-slate-800 px-3 py-1 text-xs font-semibold text-slate-200">
                                                    {experiment.dataset.name.clone()}
                                                </span>
                                                <span class="rounded-lg border border-slate-700 bg-slate-800 px-3 py-1 text-xs font-semibold text-slate-200">
                                                    {experiment.algorithm.name.clone()}
                                                </span>
                                            </div>
                                            <p class="mt-2 text-sm text-slate-300">
                                                "Created at: "
                                                {format_date(&experiment.created_at)}
                                            </p>
                                        </div>

                                        <button
                                            on:click=move |_| delete(experiment_id)
                                            disabled=move || deleting.get()
                                            class="rounded-lg border border-red-800/60 bg-red-950/30 px-4 py-2 text-sm font-semibold text-red-200 hover:bg-red-950/50 disabled:opacity-50 disabled:cursor-not-allowed transition"
                                        >
                                            {move || if deleting.get() { "Deleting..." } else { "Delete" }}
                                        </button>
                                    </div>

                                    <section class="rounded-2xl border border-slate-800 bg-slate-900/60 p-6 space-y-4">
                                        <h2 class="text-xl font-bold text-white">"Summary"</h2>
                                        <div class="grid grid-cols-1 gap-3 sm:grid-cols-3">
                                            <Stat label=metric_label value=metric_value />
                                            <Stat
                                                label="Test size"
                                                value=experiment
                                                    .test_size
                                                    .map(|v| v.to_string())
                                                    .unwrap_or_else(|| "—".to_string())
                                            />
                                            <Stat
                                                label="Random state"
                                                value=experiment
                                                    .random_state
                                                    .map(|v| v.to_string())
                                                    .unwrap_or_else(|| "—".to_string())
                                            />
                                        </div>
                                    </section>

                                    <section class="rounded-2xl border border-slate-800 bg-slate-900/60 p-6 space-y-4">
                                        <h2 class="text-xl font-bold text-white">"Hyperparameters"</h2>
                                        <pre class="overflow-auto rounded-xl bg-slate-950/40 p-4 text-sm text-slate-200">
                                            {hyperparameters}
                                        </pre>
                                    </section>

                                    <section class="rounded-2xl border border-slate-800 bg-slate-900/60 p-6 space-y-4">
                                        <h2 class="text-xl font-bold text-white">"Metrics"</h2>
                                        <pre class="overflow-auto rounded-xl bg-slate-950/40 p-4 text-sm text-slate-200">
                                            {metrics}
                                        </pre>
                                    </section>

                                    {predictions
                                        .map(|predictions| {
                                            view! {
                                                <section class="rounded-2xl border border-slate-800 bg-slate-900/60 p-6 space-y-4">
                                                    <h2 class="text-xl font-bold text-white">"Predictions"</h2>
                                                    <pre class="overflow-auto rounded-xl bg-slate-950/40 p-4 text-sm text-slate-200">
                                                        {predictions}
                                                    </pre>
                                                </section>
                                            }
                                        })}
                                }
                                .into_any()
                            }
                        }
                    })
                }}
            </Suspense>
        </div>
    }
}

// ── Datasets ──────────────────────────────────────────────────────────────────

#[component]
fn DatasetsPage() -> impl IntoView {
    let api = expect_api();
    let datasets = LocalResource::new({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.list_datasets().await }
        }
    });

    view! {
        <div class="space-y-6">
            <div>
                <h1 class="text-3xl font-bold text-white">"Datasets"</h1>
                <p class="mt-1 text-slate-400">"Datasets available for new experiments."</p>
            </div>

            <Suspense fallback=|| view! { <LoadingCard label="Loading datasets..." /> }>
                {move || Suspend::new(async move {
                    match datasets.await {
                        Ok(items) if items.is_empty() => {
                            view! { <EmptyState message="No datasets available." /> }.into_any()
                        }
                        Ok(items) => view! {
                            <div class="space-y-4">
                                {items
                                    .into_iter()
                                    .map(|dataset| view! { <DatasetCard dataset=dataset /> })
                                    .collect_view()}
                            </div>
                        }
                        .into_any(),
                        Err(err) if err.is_cancelled() => view! { <div></div> }.into_any(),
                        Err(err) => view! {
                            <ErrorBanner message=err
                                .message_or("Failed to load datasets. Please try again.") />
                        }
                        .into_any(),
                    }
                })}
            </Suspense>
        </div>
    }
}

#[component]
fn DatasetCard(dataset: Dataset) -> impl IntoView {
    let classification = is_classification_task(&dataset.task);
    let class_labels = format_list_preview(dataset.class_labels.as_ref(), 6);
    let feature_names = format_list_preview(dataset.feature_names.as_ref(), 6);

    view! {
        <div class="rounded-2xl border border-slate-800 bg-slate-900/60 p-5 shadow-sm">
            <div class="flex items-start justify-between gap-4">
                <div>
                    <div class="text-sm text-slate-400">{dataset.code.clone()}</div>
                    <h3 class="mt-1 text-lg font-semibold text-white">{dataset.name.clone()}</h3>
                </div>
                <span class="rounded-lg bg-slate-800 px-3 py-1 text-sm font-semibold text-slate-200">
                    {format_task(&dataset.task)}
                </span>
            </div>

            <div class="mt-4 grid grid-cols-1 gap-3 sm:grid-cols-3">
                <Stat label="Samples" value=dataset.n_samples.to_string() />
                <Stat label="Features" value=dataset.n_features.to_string() />
                {if classification {
                    view! {
                        <Stat
                            label="Classes"
                            value=dataset
                                .n_classes
                                .map(|n| n.to_string())
                                .unwrap_or_else(|| "—".to_string())
                        />
                    }
                    .into_any()
                } else {
                    view! {
                        <Stat
                            label="Target"
                            value=dataset.target_name.clone().unwrap_or_else(|| "—".to_string())
                        />
                    }
                    .into_any()
                }}
            </div>

            <div class="mt-4 space-y-3">
                {classification
                    .then(|| view! {
                        <div class="rounded-xl bg-slate-950/40 p-4">
                            <div class="text-xs text-slate-400">"Class labels"</div>
                            <div class="mt-1 text-sm text-slate-200">{class_labels.clone()}</div>
                        </div>
                    })}
                <div class="rounded-xl bg-slate-950/40 p-4">
                    <div class="text-xs text-slate-400">"Feature names"</div>
                    <div class="mt-1 text-sm text-slate-200">{feature_names}</div>
                </div>
            </div>
        </div>
    }
}

// ── Algorithms ────────────────────────────────────────────────────────────────

#[component]
fn AlgorithmsPage() -> impl IntoView {
    let api = expect_api();
    let algorithms = LocalResource::new({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.list_algorithms().await }
        }
    });

    view! {
        <div class="space-y-6">
            <div>
                <h1 class="text-3xl font-bold text-white">"Algorithms"</h1>
                <p class="mt-1 text-slate-400">"Algorithms available in the playground."</p>
            </div>

            <Suspense fallback=|| view! { <LoadingCard label="Loading algorithms..." /> }>
                {move || Suspend::new(async move {
                    match algorithms.await {
                        Ok(items) if items.is_empty() => {
                            view! { <EmptyState message="No algorithms available." /> }.into_any()
                        }
                        Ok(items) => view! {
                            <div class="space-y-4">
                                {items
                                    .into_iter()
                                    .map(|algorithm| view! { <AlgorithmCard algorithm=algorithm /> })
                                    .collect_view()}
                            </div>
                        }
                        .into_any(),
                        Err(err) if err.is_cancelled() => view! { <div></div> }.into_any(),
                        Err(err) => view! {
                            <ErrorBanner message=err
                                .message_or("Failed to load algorithms. Please try again.") />
                        }
                        .into_any(),
                    }
                })}
            </Suspense>
        </div>
    }
}

#[component]
fn AlgorithmCard(algorithm: Algorithm) -> impl IntoView {
    let supported: Vec<String> = algorithm
        .supported_tasks()
        .into_iter()
        .map(format_task)
        .collect();
    let spec_count = algorithm.hyperparameter_specs.len();

    view! {
        <div class="rounded-2xl border border-slate-800 bg-slate-900/60 p-5 shadow-sm">
            <div class="flex items-start justify-between gap-4">
                <div>
                    <div class="text-sm text-slate-400">{algorithm.code.clone()}</div>
                    <h3 class="mt-1 text-lg font-semibold text-white">{algorithm.name.clone()}</h3>
                    {(!algorithm.description.is_empty())
                        .then(|| view! {
                            <p class="mt-2 text-sm text-slate-300">{algorithm.description.clone()}</p>
                        })}
                </div>
                <span class="rounded-md bg-indigo-900/40 px-2 py-1 text-xs font-semibold text-indigo-200">
                    {algorithm.kind.to_string()}
                </span>
            </div>

            <div class="mt-4 flex flex-wrap items-center gap-2">
                {if supported.is_empty() {
                    view! { <span class="text-sm text-slate-300">"Tasks: —"</span> }.into_any()
                } else {
                    supported
                        .into_iter()
                        .map(|task| view! {
                            <span class="rounded-md bg-slate-800 px-2 py-1 text-xs font-semibold text-slate-200">
                                {task}
                            </span>
                        })
                        .collect_view()
                        .into_any()
                }}
            </div>

            <div class="mt-4 text-sm text-slate-300">
                "Hyperparameters: "
                <span class="font-semibold text-slate-200">{spec_count}</span>
            </div>
        </div>
    }
}

// ── Experiment creator wizard ─────────────────────────────────────────────────

#[component]
fn ExperimentCreatorWizard() -> impl IntoView {
    let api = expect_api();
    let navigate = use_navigate();

    // Reference data loads concurrently; each feeds a disjoint piece of
    // state and neither blocks the other.
    let datasets = LocalResource::new({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.list_datasets().await }
        }
    });
    let algorithms = LocalResource::new({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.list_algorithms().await }
        }
    });

    let state = RwSignal::new(WizardState::new());
    let (submit_error, set_submit_error) = signal(String::new());
    let (validation_error, set_validation_error) = signal(String::new());

    let dataset_items = move || {
        datasets
            .get()
            .unwrap_or(Ok(Vec::new()))
            .unwrap_or_default()
    };
    let algorithm_items = move || {
        algorithms
            .get()
            .unwrap_or(Ok(Vec::new()))
            .unwrap_or_default()
    };
    let load_error = move || {
        let dataset_error = datasets.get().and_then(|r| {
            r.as_ref()
                .err()
                .filter(|e| !e.is_cancelled())
                .map(|e| e.message_or("Failed to load datasets. Please try again."))
        });
        let algorithm_error = algorithms.get().and_then(|r| {
            r.as_ref()
                .err()
                .filter(|e| !e.is_cancelled())
                .map(|e| e.message_or("Failed to load algorithms. Please try again."))
        });
        dataset_error.or(algorithm_error).unwrap_or_default()
    };

    let selected_dataset = move || -> Option<Dataset> {
        let id = state.with(|s| s.dataset_id)?;
        dataset_items().into_iter().find(|d| d.id == id)
    };
    let selected_algorithm = move || -> Option<Algorithm> {
        let id = state.with(|s| s.algorithm_id)?;
        algorithm_items().into_iter().find(|a| a.id == id)
    };
    let current_task = move || selected_dataset().map(|d| d.task);

    let on_submit = {
        let api = api.clone();
        let navigate = navigate.clone();
        move |_| {
            set_submit_error.set(String::new());
            set_validation_error.set(String::new());

            let snapshot = state.get();
            if let Err(err) = snapshot.validate() {
                set_validation_error.set(err.to_string());
                return;
            }
            let (Some(dataset), Some(algorithm)) = (selected_dataset(), selected_algorithm())
            else {
                return;
            };

            let request = snapshot.build_request(&dataset, &algorithm);
            state.update(|s| s.submitting = true);

            let api = api.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                match api.create_experiment(&request).await {
                    Ok(created) => {
                        log::info!("experiment {} submitted", created.id);
                        navigate("/", Default::default());
                    }
                    Err(err) if err.is_cancelled() => {}
                    Err(err) => {
                        set_submit_error.set(
                            err.message_or("Failed to create experiment. Please try again."),
                        );
                        state.update(|s| s.submitting = false);
                    }
                }
            });
        }
    };

    view! {
        <div class="mx-auto w-full max-w-5xl space-y-6">
            <div>
                <h1 class="text-3xl font-bold text-white">"Experiment Creator"</h1>
                <p class="mt-1 text-slate-400">
                    "Configure dataset, algorithm and hyperparameters, then run the experiment."
                </p>
            </div>

            {move || {
                let message = load_error();
                (!message.is_empty()).then(|| view! { <ErrorBanner message=message /> })
            }}
            {move || {
                let message = submit_error.get();
                (!message.is_empty()).then(|| view! { <ErrorBanner message=message /> })
            }}

            // 1) Dataset
            {move || {
                if datasets.get().is_none() {
                    return view! { <LoadingCard label="Loading datasets..." /> }.into_any();
                }
                let items = dataset_items();
                let selected = selected_dataset();
                view! {
                    <section class="rounded-2xl border border-slate-800 bg-slate-900/60 p-6">
                        <div class="flex items-start justify-between gap-4">
                            <div>
                                <h2 class="text-xl font-bold text-white">"1) Choose dataset"</h2>
                                <p class="mt-1 text-sm text-slate-300">
                                    "Select a dataset to define the experiment task type."
                                </p>
                            </div>
                            {selected
                                .as_ref()
                                .map(|d| {
                                    view! {
                                        <span class="rounded-lg bg-slate-800 px-3 py-1 text-sm font-semibold text-slate-200">
                                            "Task: " {format_task(&d.task)}
                                        </span>
                                    }
                                })}
                        </div>

                        <div class="mt-5">
                            <label class="text-sm font-semibold text-slate-200">"Dataset"</label>
                            <select
                                class="mt-2 w-full rounded-xl border border-slate-700 bg-slate-950/40 p-3 text-slate-200 focus:outline-none focus:ring-2 focus:ring-indigo-500"
                                prop:value=move || {
                                    state
                                        .with(|s| s.dataset_id)
                                        .map(|id| id.to_string())
                                        .unwrap_or_default()
                                }
                                on:change=move |ev| {
                                    let raw = event_target_value(&ev);
                                    state
                                        .update(|s| match raw.parse::<i64>() {
                                            Ok(id) => s.select_dataset(id),
                                            Err(_) => s.clear_dataset(),
                                        });
                                }
                            >
                                <option value="">"Select dataset..."</option>
                                {items
                                    .into_iter()
                                    .map(|d| {
                                        view! {
                                            <option value=d.id.to_string()>{d.name.clone()}</option>
                                        }
                                    })
                                    .collect_view()}
                            </select>

                            {selected
                                .map(|d| {
                                    view! {
                                        <div class="mt-4 grid grid-cols-1 gap-3 sm:grid-cols-2">
                                            <Stat label="Dataset" value=d.name.clone() />
                                            <Stat label="Task" value=format_task(&d.task) />
                                        </div>
                                    }
                                })}
                        </div>
                    </section>
                }
                .into_any()
            }}

            // 2) Algorithm, filtered by the dataset's task
            {move || {
                let task = current_task()?;
                if algorithms.get().is_none() {
                    return Some(view! { <LoadingCard label="Loading algorithms..." /> }.into_any());
                }
                let compatible: Vec<Algorithm> = algorithm_items()
                    .into_iter()
                    .filter(|a| a.declares_task(&task))
                    .collect();
                Some(
                    view! {
                        <section class="space-y-4">
                            <div>
                                <h2 class="text-xl font-bold text-white">"2) Choose algorithm"</h2>
                                <p class="mt-1 text-sm text-slate-300">
                                    "Pick an algorithm compatible with the selected dataset task."
                                </p>
                            </div>

                            {if compatible.is_empty() {
                                view! {
                                    <EmptyState message="No compatible algorithms for this task." />
                                }
                                .into_any()
                            } else {
                                view! {
                                    <div class="space-y-4">
                                        {compatible
                                            .into_iter()
                                    .map(|algorithm| {
                                        let task = task.clone();
                                        let selected = Signal::derive({
                                            let id = algorithm.id;
                                            move || state.with(|s| s.algorithm_id == Some(id))
                                        });
                                        let on_pick = {
                                            let algorithm = algorithm.clone();
                                            move |_| {
                                                state
                                                    .update(|s| {
                                                        s.select_algorithm(
                                                            &algorithm,
                                                            Some(task.as_str()),
                                                        )
                                                    });
                                            }
                                        };
                                        view! {
                                            <button
                                                type="button"
                                                on:click=on_pick
                                                class=move || format!(
                                                    "w-full text-left rounded-2xl border p-5 shadow-sm transition cursor-pointer bg-slate-900/60 hover:bg-slate-900/80 {}",
                                                    if selected.get() {
                                                        "border-emerald-500/70 ring-2 ring-emerald-500/40"
                                                    } else {
                                                        "border-slate-700"
                                                    },
                                                )
                                            >
                                                <div class="flex items-start justify-between gap-4">
                                                    <div>
                                                        <div class="text-sm text-slate-400">{algorithm.code.clone()}</div>
                                                        <h3 class="mt-1 text-lg font-semibold text-white">
                                                            {algorithm.name.clone()}
                                                        </h3>
                                                        {(!algorithm.description.is_empty())
                                                            .then(|| {
                                                                view! {
                                                                    <p class="mt-2 text-sm text-slate-300">
                                                                        {algorithm.description.clone()}
                                                                    </p>
                                                                }
                                                            })}
                                                    </div>
                                                    <span class="rounded-md bg-slate-800 px-2 py-1 text-xs font-semibold text-slate-200">
                                                        {algorithm.kind.to_string()}
                                                    </span>
                                                </div>
                                            </button>
                                        }
                                    })
                                    .collect_view()}
                                    </div>
                                }
                                .into_any()
                            }}
                        </section>
                    }
                    .into_any(),
                )
            }}

            // 3) Hyperparameters + run options
            {move || {
                let algorithm = selected_algorithm()?;
                let task = current_task();
                let on_submit = on_submit.clone();
                Some(
                    view! {
                        <HyperparametersForm
                            state=state
                            specs=algorithm.hyperparameter_specs.clone()
                            task=task.clone()
                        />

                        <section class="rounded-2xl border border-slate-800 bg-slate-900/60 p-6 space-y-5">
                            <div>
                                <h2 class="text-xl font-bold text-white">"3) Run options"</h2>
                                <p class="mt-1 text-sm text-slate-300">
                                    "Train/test split and output options."
                                </p>
                            </div>

                            <div class="grid grid-cols-1 gap-4 md:grid-cols-2">
                                <div class="space-y-1">
                                    <label class="text-sm font-semibold text-slate-200">"Test size"</label>
                                    <p class="text-xs text-slate-400">
                                        "Fraction of samples held out for evaluation, strictly between 0 and 1."
                                    </p>
                                    <input
                                        type="number"
                                        step="0.05"
                                        class="w-full rounded-xl border border-slate-700 bg-slate-950/40 p-3 text-slate-200 focus:outline-none focus:ring-2 focus:ring-indigo-500"
                                        prop:value=move || {
                                            state
                                                .with(|s| {
                                                    if s.test_size.is_finite() {
                                                        s.test_size.to_string()
                                                    } else {
                                                        String::new()
                                                    }
                                                })
                                        }
                                        on:input=move |ev| {
                                            let raw = event_target_value(&ev);
                                            state
                                                .update(|s| {
                                                    s.test_size = raw.trim().parse().unwrap_or(f64::NAN);
                                                });
                                        }
                                    />
                                </div>

                                <div class="space-y-1">
                                    <label class="text-sm font-semibold text-slate-200">"Random state"</label>
                                    <p class="text-xs text-slate-400">"Seed for the train/test split."</p>
                                    <input
                                        type="number"
                                        step="1"
                                        class="w-full rounded-xl border border-slate-700 bg-slate-950/40 p-3 text-slate-200 focus:outline-none focus:ring-2 focus:ring-indigo-500"
                                        prop:value=move || state.with(|s| s.random_state.to_string())
                                        on:input=move |ev| {
                                            if let Ok(value) = event_target_value(&ev).trim().parse() {
                                                state.update(|s| s.random_state = value);
                                            }
                                        }
                                    />
                                </div>
                            </div>

                            <div class="space-y-3">
                                <label class="flex items-center space-x-3 text-sm text-slate-200">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || state.with(|s| s.include_predictions)
                                        on:change=move |ev| {
                                            let checked = event_target_checked(&ev);
                                            state.update(|s| s.include_predictions = checked);
                                        }
                                    />
                                    <span>"Include predictions in the result"</span>
                                </label>

                                {move || {
                                    current_task()
                                        .filter(|t| is_classification_task(t))
                                        .map(|_| {
                                            view! {
                                                <label class="flex items-center space-x-3 text-sm text-slate-200">
                                                    <input
                                                        type="checkbox"
                                                        prop:checked=move || {
                                                            state.with(|s| s.include_probabilities)
                                                        }
                                                        on:change=move |ev| {
                                                            let checked = event_target_checked(&ev);
                                                            state.update(|s| s.include_probabilities = checked);
                                                        }
                                                    />
                                                    <span>"Include class probabilities in the result"</span>
                                                </label>
                                            }
                                        })
                                }}
                            </div>

                            {move || {
                                let message = validation_error.get();
                                (!message.is_empty())
                                    .then(|| {
                                        view! {
                                            <p class="text-sm font-semibold text-red-300">{message}</p>
                                        }
                                    })
                            }}

                            <button
                                type="button"
                                on:click=on_submit
                                disabled=move || state.with(|s| s.submitting)
                                class="flex items-center space-x-2 rounded-lg bg-indigo-600 hover:bg-indigo-500 px-6 py-3 font-semibold text-white transition-colors disabled:opacity-50 disabled:cursor-not-allowed"
                            >
                                <Play size=16 />
                                <span>
                                    {move || {
                                        if state.with(|s| s.submitting) {
                                            "Submitting..."
                                        } else {
                                            "Run experiment"
                                        }
                                    }}
                                </span>
                            </button>
                        </section>
                    }
                    .into_any(),
                )
            }}
        </div>
    }
}

/// Form generated from the hyperparameter schema: one field per applicable
/// spec, rendered and coerced per declared type.
#[component]
fn HyperparametersForm(
    state: RwSignal<WizardState>,
    specs: Vec<HyperparameterSpec>,
    task: Option<String>,
) -> impl IntoView {
    let applicable: Vec<HyperparameterSpec> = schema::applicable_specs(&specs, task.as_deref())
        .into_iter()
        .cloned()
        .collect();

    view! {
        <section class="rounded-2xl border border-slate-800 bg-slate-900/60 p-6 space-y-5">
            <div>
                <h2 class="text-xl font-bold text-white">"Hyperparameters"</h2>
                <p class="mt-1 text-sm text-slate-300">
                    "Configure hyperparameters for the selected algorithm."
                </p>
            </div>

            {if applicable.is_empty() {
                view! {
                    <div class="rounded-xl bg-slate-950/40 p-4 text-slate-200">
                        "No hyperparameters available for this task."
                    </div>
                }
                .into_any()
            } else {
                view! {
                    <div class="grid grid-cols-1 gap-4 md:grid-cols-2">
                        {applicable
                            .into_iter()
                            .map(|spec| view! { <HyperparameterField state=state spec=spec /> })
                            .collect_view()}
                    </div>
                }
                .into_any()
            }}
        </section>
    }
}

#[component]
fn FieldWrapper(label: String, description: Option<String>, children: Children) -> impl IntoView {
    view! {
        <div class="space-y-1">
            <label class="text-sm font-semibold text-slate-200">{label}</label>
            {description
                .filter(|d| !d.is_empty())
                .map(|d| view! { <p class="text-xs text-slate-400">{d}</p> })}
            {children()}
        </div>
    }
}

#[component]
fn HyperparameterField(state: RwSignal<WizardState>, spec: HyperparameterSpec) -> impl IntoView {
    const INPUT_CLASS: &str = "w-full rounded-xl border border-slate-700 bg-slate-950/40 p-3 text-slate-200 focus:outline-none focus:ring-2 focus:ring-indigo-500";

    let name = spec.name.clone();
    let label = spec.label().to_string();
    let description = spec.description.clone();
    let current = {
        let spec = spec.clone();
        Signal::derive(move || state.with(|s| schema::current_value(&spec, &s.values)))
    };

    match spec.ty {
        ParamType::Bool => view! {
            <div class="rounded-xl bg-slate-950/40 p-4">
                <div class="flex items-start justify-between gap-4">
                    <div>
                        <div class="text-sm font-semibold text-slate-200">{label}</div>
                        {description
                            .filter(|d| !d.is_empty())
                            .map(|d| view! { <div class="mt-1 text-xs text-slate-400">{d}</div> })}
                    </div>
                    <input
                        type="checkbox"
                        prop:checked=move || schema::as_bool(&current.get())
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            state.update(|s| s.set_value(&name, Value::Bool(checked)));
                        }
                    />
                </div>
            </div>
        }
        .into_any(),

        ParamType::Choice => {
            let choices = spec.choices.clone().unwrap_or_default();
            view! {
                <FieldWrapper label=label description=description>
                    <select
                        class=INPUT_CLASS
                        prop:value=move || schema::display_text(&current.get())
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            state.update(|s| s.set_value(&name, Value::String(value)));
                        }
                    >
                        {choices
                            .into_iter()
                            .map(|choice| {
                                view! { <option value=choice.clone()>{choice.clone()}</option> }
                            })
                            .collect_view()}
                    </select>
                </FieldWrapper>
            }
            .into_any()
        }

        ParamType::IntList => view! {
            <FieldWrapper label=label description=description>
                <input
                    class=format!("{INPUT_CLASS} font-mono text-sm")
                    prop:value=move || schema::int_list_text(&current.get())
                    on:input=move |ev| {
                        let raw = event_target_value(&ev);
                        state.update(|s| s.set_value(&name, IntListInput::parse(&raw).into_value()));
                    }
                    placeholder="[64, 64]"
                />
                <p class="text-xs text-slate-400">
                    "Provide a JSON array of integers, e.g. "
                    <span class="font-mono">"[64, 64]"</span>
                </p>
            </FieldWrapper>
        }
        .into_any(),

        ParamType::NumberOrString => {
            let allowed = spec
                .choices
                .as_ref()
                .filter(|c| !c.is_empty())
                .map(|c| c.join(", "));
            view! {
                <FieldWrapper label=label description=description>
                    <input
                        class=INPUT_CLASS
                        prop:value=move || schema::display_text(&current.get())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            state.update(|s| s.set_value(&name, Value::String(value)));
                        }
                        placeholder=schema::display_text(&spec.default)
                    />
                    {allowed
                        .map(|allowed| {
                            view! {
                                <p class="text-xs text-slate-400">
                                    "Allowed strings: " {allowed} " (or a numeric value)"
                                </p>
                            }
                        })}
                </FieldWrapper>
            }
            .into_any()
        }

        ParamType::Int | ParamType::Float => {
            let ty = spec.ty;
            view! {
                <FieldWrapper label=label description=description>
                    <input
                        class=INPUT_CLASS
                        type="number"
                        step=if ty == ParamType::Int { "1".to_string() } else { "any".to_string() }
                        min=spec.min.map(|m| m.to_string())
                        max=spec.max.map(|m| m.to_string())
                        prop:value=move || schema::display_text(&current.get())
                        on:input=move |ev| {
                            let raw = event_target_value(&ev);
                            state.update(|s| s.set_value(&name, schema::coerce_numeric(&raw, ty)));
                        }
                    />
                </FieldWrapper>
            }
            .into_any()
        }

        ParamType::Text => view! {
            <FieldWrapper label=label description=description>
                <input
                    class=INPUT_CLASS
                    prop:value=move || schema::display_text(&current.get())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| s.set_value(&name, Value::String(value)));
                    }
                />
            </FieldWrapper>
        }
        .into_any(),
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center h-full space-y-4">
            <h1 class="text-4xl font-bold">"404"</h1>
            <p class="text-slate-400">"Page not found"</p>
            <A href="/" attr:class="text-indigo-400 hover:underline">"Back to experiments"</A>
        </div>
    }
    .into_any()
}

fn main() {
    let debug_enabled = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item("debug_enabled").ok().flatten())
        == Some("true".to_string());

    let level = if debug_enabled {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    _ = console_log::init_with_level(level);
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
