#![cfg(target_arch = "wasm32")]

use gloo_net::http::Request;
use leptos::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::time::Duration;

use crate::cell::placeholder_fill;
use crate::{
    Briefing, Catalog, CatalogManifest, Event, ImageAsset, Notice, Presenter, RoundInstance,
    SelectionState, TimeDisplay, Variant, Verdict, Verifier, check_full_playthrough,
    demo_catalog,
};

const MANIFEST_URL: &str = "assets/manifest.json";
const ASSET_BASE: &str = "assets";

type WebVerifier = Verifier<Catalog, StdRng>;

#[derive(Clone, PartialEq, Eq)]
struct RoundScreen {
    cols: usize,
    cells: Vec<ImageAsset>,
    briefing: Briefing,
}

/// Signals the grid renders from, plus the verifier they are fed by.
#[derive(Clone, Copy)]
struct Ui {
    round: RwSignal<Option<RoundScreen>>,
    selected: RwSignal<Vec<usize>>,
    incorrect: RwSignal<Vec<usize>>,
    broken: RwSignal<HashSet<usize>>,
    time: RwSignal<Option<TimeDisplay>>,
    points: RwSignal<u32>,
    error: RwSignal<Option<String>>,
    verifier: StoredValue<Option<WebVerifier>>,
    ticker: StoredValue<Option<IntervalHandle>>,
}

impl Ui {
    fn new() -> Self {
        Self {
            round: create_rw_signal(None),
            selected: create_rw_signal(Vec::new()),
            incorrect: create_rw_signal(Vec::new()),
            broken: create_rw_signal(HashSet::new()),
            time: create_rw_signal(None),
            points: create_rw_signal(0),
            error: create_rw_signal(None),
            verifier: store_value(None),
            ticker: store_value(None),
        }
    }

    fn begin(self, verifier: WebVerifier) {
        let mut presenter = self;
        self.verifier.update_value(|slot| {
            let verifier = slot.insert(verifier);
            if let Err(error) = verifier.start(&mut presenter) {
                presenter.error.set(Some(error.to_string()));
            }
        });
    }

    fn dispatch(self, event: Event) {
        let mut presenter = self;
        self.verifier.update_value(|slot| {
            if let Some(verifier) = slot.as_mut() {
                if let Err(error) = verifier.handle(event, &mut presenter) {
                    presenter.error.set(Some(error.to_string()));
                }
            }
        });
    }

    fn stop_ticker(self) {
        if let Some(handle) = self.ticker.get_value() {
            handle.clear();
        }
        self.ticker.set_value(None);
    }

    fn restart_ticker(self) {
        self.stop_ticker();
        let handle =
            set_interval_with_handle(move || self.dispatch(Event::Tick), Duration::from_secs(1))
                .ok();
        self.ticker.set_value(handle);
    }
}

impl Presenter for Ui {
    fn show_round(&mut self, instance: &RoundInstance, briefing: &Briefing) {
        self.incorrect.set(Vec::new());
        self.broken.set(HashSet::new());
        self.points.set(briefing.points);
        self.round.set(Some(RoundScreen {
            cols: instance.spec().cols,
            cells: instance.cells().to_vec(),
            briefing: briefing.clone(),
        }));

        if briefing.time_limit.is_some() {
            self.restart_ticker();
        } else {
            self.stop_ticker();
            self.time.set(None);
        }
    }

    fn show_selection(&mut self, selection: &SelectionState) {
        self.selected.set(selection.positions().collect());
    }

    fn show_verdict(&mut self, verdict: &Verdict) {
        self.stop_ticker();
        self.incorrect.set(verdict.incorrect_positions.clone());
        self.points.update(|points| *points += verdict.points_awarded);
    }

    fn show_time(&mut self, display: &TimeDisplay) {
        self.time.set(Some(display.clone()));
    }

    fn alert(&mut self, notice: &Notice) {
        if let Notice::TimeExpired { .. } = notice {
            self.stop_ticker();
        }
        let _ = window().alert_with_message(&format!("{}\n\n{}", notice.title(), notice.message()));
    }
}

async fn fetch_catalog() -> Catalog {
    let manifest = match Request::get(MANIFEST_URL).send().await {
        Ok(response) => response.json::<CatalogManifest>().await,
        Err(error) => Err(error),
    };

    match manifest.map(|manifest| Catalog::from_manifest(manifest.rebased(ASSET_BASE))) {
        Ok(Ok(catalog)) => match check_full_playthrough(&catalog) {
            Ok(()) => catalog,
            Err(error) => {
                tracing::warn!(%error, "manifest too small; using demo catalog");
                demo_catalog()
            }
        },
        Ok(Err(error)) => {
            tracing::warn!(%error, "manifest rejected; using demo catalog");
            demo_catalog()
        }
        Err(error) => {
            tracing::warn!(%error, "manifest unavailable; using demo catalog");
            demo_catalog()
        }
    }
}

#[component]
fn GridCell(ui: Ui, position: usize, asset: ImageAsset) -> impl IntoView {
    let fill = placeholder_fill(asset.category);
    let caption = asset.display_name().to_string();
    let source = asset.identifier.clone();

    let content = move || {
        if ui.broken.with(|broken| broken.contains(&position)) {
            view! {
                <div class="cell-placeholder" style=format!("background:{fill}")>
                    {caption.clone()}
                </div>
            }
            .into_view()
        } else {
            view! {
                <img
                    class="cell-image"
                    src=source.clone()
                    alt=""
                    on:error=move |_| ui.broken.update(|broken| {
                        broken.insert(position);
                    })
                />
            }
            .into_view()
        }
    };

    view! {
        <button
            type="button"
            class="cell"
            class:selected=move || ui.selected.with(|selected| selected.contains(&position))
            class:incorrect=move || ui.incorrect.with(|incorrect| incorrect.contains(&position))
            on:click=move |_| ui.dispatch(Event::Toggle(position))
        >
            {content}
        </button>
    }
}

#[component]
fn App() -> impl IntoView {
    let ui = Ui::new();

    spawn_local(async move {
        let catalog = fetch_catalog().await;
        ui.begin(Verifier::new(catalog, StdRng::from_entropy(), Variant::Timed));
    });

    let grid = move || {
        ui.round.get().map(|screen| {
            let style = format!("grid-template-columns: repeat({}, 1fr)", screen.cols);
            view! {
                <div class="grid" style=style>
                    {screen
                        .cells
                        .into_iter()
                        .enumerate()
                        .map(|(position, asset)| view! { <GridCell ui=ui position=position asset=asset /> })
                        .collect_view()}
                </div>
            }
        })
    };

    view! {
        <main class="page">
            <header class="page-header">
                <h1 class="headline">"Campus Verification System"</h1>
                <div class="info-row">
                    <span class="points">{move || format!("Total Points: {}", ui.points.get())}</span>
                    <span
                        class="timer"
                        class:urgent=move || ui.time.with(|time| time.as_ref().is_some_and(|time| time.urgent))
                    >
                        {move || ui.time.get().map(|time| time.to_string()).unwrap_or_default()}
                    </span>
                </div>
            </header>
            <p class="instructions">
                {move || ui.round.with(|screen| screen.as_ref().map(|screen| screen.briefing.instructions.clone()))}
            </p>
            {grid}
            <div class="controls-row">
                <button
                    class="btn btn-primary"
                    type="button"
                    disabled=move || ui.selected.with(Vec::is_empty)
                    on:click=move |_| ui.dispatch(Event::Submit)
                >
                    "Submit Selection"
                </button>
            </div>
            {move || ui.error.get().map(|message| view! { <p class="error-body">{message}</p> })}
            <footer class="status-bar">
                {move || ui.round.with(|screen| screen.as_ref().map(|screen| screen.briefing.status.clone()))}
            </footer>
        </main>
    }
}

pub fn mount() {
    mount_to_body(|| view! { <App /> });
}
