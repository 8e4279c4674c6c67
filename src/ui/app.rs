use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context as _, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::actions;
use crate::api::ApiClient;
use crate::error::ClientError;
use crate::nav::NavCursor;
use crate::state::{Store, ToastKind};
use crate::types::{BuildingDetails, BuildingOffer, ResourceDetails, BUILDING_CATALOG, RESOURCE_CATALOG};
use crate::ui::{modal, views};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_AMOUNT_DIGITS: usize = 6;

/// Terminal input, the repaint tick, and completed detail fetches all merge
/// into one stream. The run loop awaits nothing else, so a slow server can
/// never stall input handling or repaints.
pub(crate) enum AppEvent {
    Input(Event),
    Tick,
    BuildingDetails {
        name: &'static str,
        result: Result<BuildingDetails>,
    },
    ResourceDetails {
        name: &'static str,
        result: Result<ResourceDetails>,
    },
    BuildOffers(Result<Vec<BuildingOffer>>),
}

/// Which modal is up. Summary data for the detail modals always renders from
/// the store's grid cache; these variants carry only what the detail fetch
/// adds on top.
enum Modal {
    None,
    Onboarding { nickname: String, error: Option<String> },
    Building { details: Option<BuildingDetails> },
    Resource { details: Option<ResourceDetails>, amount: String },
    Build { offers: Vec<BuildingOffer>, selected: usize },
}

pub struct App {
    api: Arc<ApiClient>,
    store: Arc<Store>,
    cancel: CancellationToken,
    building_nav: NavCursor,
    resource_nav: NavCursor,
    modal: Modal,
    should_quit: bool,
}

impl App {
    pub fn new(api: Arc<ApiClient>, store: Arc<Store>, cancel: CancellationToken) -> Self {
        let modal = if store.is_ready() {
            Modal::None
        } else {
            Modal::Onboarding {
                nickname: String::new(),
                error: None,
            }
        };
        Self {
            api,
            store,
            cancel,
            building_nav: NavCursor::new(&BUILDING_CATALOG),
            resource_nav: NavCursor::new(&RESOURCE_CATALOG),
            modal,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }

            match event_rx.recv().await {
                Some(AppEvent::Input(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    self.handle_key(key, &event_tx).await;
                }
                Some(AppEvent::Input(_)) | Some(AppEvent::Tick) => {}
                Some(AppEvent::BuildingDetails { name, result }) => {
                    self.apply_building_details(name, result);
                }
                Some(AppEvent::ResourceDetails { name, result }) => {
                    self.apply_resource_details(name, result);
                }
                Some(AppEvent::BuildOffers(result)) => self.apply_build_offers(result),
                None => break,
            }

            if self.should_quit {
                break;
            }
        }

        self.cancel.cancel();
        restore_terminal(&mut terminal)?;
        Ok(())
    }

    pub(crate) async fn handle_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppEvent>) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match &self.modal {
            Modal::None => self.handle_main_key(key, tx),
            Modal::Onboarding { .. } => self.handle_onboarding_key(key).await,
            Modal::Building { .. } => self.handle_building_key(key, tx).await,
            Modal::Resource { .. } => self.handle_resource_key(key, tx).await,
            Modal::Build { .. } => self.handle_build_key(key).await,
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppEvent>) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('b') => {
                self.building_nav.open(BUILDING_CATALOG[0]);
                self.show_building(tx);
            }
            KeyCode::Char('r') => {
                self.resource_nav.open(RESOURCE_CATALOG[0]);
                self.show_resource(tx);
            }
            KeyCode::Char('c') => self.open_build_offers(tx),
            _ => {}
        }
    }

    async fn handle_onboarding_key(&mut self, key: KeyEvent) {
        let Modal::Onboarding { nickname, error } = &mut self.modal else {
            return;
        };
        match key.code {
            KeyCode::Enter => {
                let entered = nickname.clone();
                match actions::submit_onboarding(&self.api, &self.store, &entered, None).await {
                    Ok(()) => self.modal = Modal::None,
                    Err(e) => {
                        tracing::warn!(error = %e, "onboarding failed");
                        if let Modal::Onboarding { error, .. } = &mut self.modal {
                            *error = Some(e.to_string());
                        }
                    }
                }
            }
            KeyCode::Backspace => {
                nickname.pop();
                *error = None;
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                nickname.push(ch);
                *error = None;
            }
            _ => {}
        }
    }

    async fn handle_building_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppEvent>) {
        match key.code {
            KeyCode::Esc => {
                self.building_nav.close();
                self.modal = Modal::None;
            }
            KeyCode::Left => {
                if self.building_nav.prev().is_some() {
                    self.show_building(tx);
                }
            }
            KeyCode::Right => {
                if self.building_nav.next().is_some() {
                    self.show_building(tx);
                }
            }
            KeyCode::Char('x') => self.sell_current_building().await,
            _ => {}
        }
    }

    async fn handle_resource_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppEvent>) {
        match key.code {
            KeyCode::Esc => {
                self.resource_nav.close();
                self.modal = Modal::None;
            }
            KeyCode::Left => {
                if self.resource_nav.prev().is_some() {
                    self.show_resource(tx);
                }
            }
            KeyCode::Right => {
                if self.resource_nav.next().is_some() {
                    self.show_resource(tx);
                }
            }
            KeyCode::Backspace => {
                if let Modal::Resource { amount, .. } = &mut self.modal {
                    amount.pop();
                }
            }
            KeyCode::Char('+') => self.trade_current_resource(true).await,
            KeyCode::Char('-') => self.trade_current_resource(false).await,
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                if let Modal::Resource { amount, .. } = &mut self.modal {
                    if amount.len() < MAX_AMOUNT_DIGITS {
                        amount.push(ch);
                    }
                }
            }
            _ => {}
        }
    }

    async fn handle_build_key(&mut self, key: KeyEvent) {
        let Modal::Build { offers, selected } = &mut self.modal else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.modal = Modal::None,
            KeyCode::Down | KeyCode::Char('j') => {
                if *selected + 1 < offers.len() {
                    *selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                *selected = selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                let Some(offer) = offers.get(*selected) else {
                    return;
                };
                if !offer.can_build {
                    // Mirrors the disabled confirm control: no request is sent.
                    self.store
                        .push_toast(ToastKind::Error, "Недостаточно ресурсов");
                    return;
                }
                let name = offer.name.clone();
                match actions::build(&self.api, &self.store, &name).await {
                    Ok(()) => self.modal = Modal::None,
                    Err(e) => self.toast_error(e),
                }
            }
            _ => {}
        }
    }

    /// Opens (or repages) the building modal. The modal is up and painted from
    /// the cached grid summary on the very next frame; the owners column fills
    /// in when the spawned fetch reports back through the event channel.
    fn show_building(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let Some(name) = self.building_nav.current() else {
            return;
        };
        self.modal = Modal::Building { details: None };
        let api = self.api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = api.building_details(name).await;
            let _ = tx.send(AppEvent::BuildingDetails { name, result }).await;
        });
    }

    fn show_resource(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let Some(name) = self.resource_nav.current() else {
            return;
        };
        let amount = match &self.modal {
            Modal::Resource { amount, .. } => amount.clone(),
            _ => "1".to_string(),
        };
        self.modal = Modal::Resource {
            details: None,
            amount,
        };
        let api = self.api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = api.resource_details(name).await;
            let _ = tx.send(AppEvent::ResourceDetails { name, result }).await;
        });
    }

    fn open_build_offers(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.modal = Modal::Build {
            offers: Vec::new(),
            selected: 0,
        };
        let api = self.api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = api.building_offers().await;
            let _ = tx.send(AppEvent::BuildOffers(result)).await;
        });
    }

    /// A detail response is applied only while its modal is still up and the
    /// cursor still points at the same entity; anything else is a late reply
    /// for a page the user already left, and is dropped.
    pub(crate) fn apply_building_details(&mut self, name: &str, result: Result<BuildingDetails>) {
        if self.building_nav.current() != Some(name) {
            return;
        }
        let Modal::Building { details } = &mut self.modal else {
            return;
        };
        match result {
            Ok(fetched) => {
                if let Some(error) = &fetched.error {
                    tracing::warn!(building = name, error = %error, "building details error");
                } else {
                    *details = Some(fetched);
                }
            }
            Err(e) => tracing::warn!(building = name, error = %e, "building details fetch failed"),
        }
    }

    pub(crate) fn apply_resource_details(&mut self, name: &str, result: Result<ResourceDetails>) {
        if self.resource_nav.current() != Some(name) {
            return;
        }
        let Modal::Resource { details, .. } = &mut self.modal else {
            return;
        };
        match result {
            Ok(fetched) => {
                if let Some(error) = &fetched.error {
                    tracing::warn!(resource = name, error = %error, "resource details error");
                } else {
                    *details = Some(fetched);
                }
            }
            Err(e) => tracing::warn!(resource = name, error = %e, "resource details fetch failed"),
        }
    }

    pub(crate) fn apply_build_offers(&mut self, result: Result<Vec<BuildingOffer>>) {
        let Modal::Build { offers, selected } = &mut self.modal else {
            return;
        };
        match result {
            Ok(fetched) => {
                *offers = fetched;
                *selected = 0;
            }
            Err(e) => {
                tracing::warn!(error = %e, "building offers fetch failed");
                self.store
                    .push_toast(ToastKind::Error, "Ошибка загрузки объектов");
                self.modal = Modal::None;
            }
        }
    }

    async fn trade_current_resource(&mut self, buy: bool) {
        let Some(name) = self.resource_nav.current() else {
            return;
        };
        let Modal::Resource { amount, .. } = &self.modal else {
            return;
        };
        let amount = amount.clone();
        let result = if buy {
            actions::buy_resource(&self.api, &self.store, name, &amount).await
        } else {
            actions::sell_resource(&self.api, &self.store, name, &amount).await
        };
        match result {
            Ok(()) => {
                self.resource_nav.close();
                self.modal = Modal::None;
            }
            Err(e) => self.toast_error(e),
        }
    }

    async fn sell_current_building(&mut self) {
        let Some(name) = self.building_nav.current() else {
            return;
        };
        let player = self.store.player();
        let Some(building) = player.sellable_building(name) else {
            self.store
                .push_toast(ToastKind::Error, "У вас нет объектов для продажи");
            return;
        };
        match actions::sell_building(&self.api, &self.store, &building.id).await {
            Ok(()) => {
                self.building_nav.close();
                self.modal = Modal::None;
            }
            Err(e) => self.toast_error(e),
        }
    }

    fn toast_error(&self, error: ClientError) {
        self.store.push_toast(ToastKind::Error, error.to_string());
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.store.snapshot();
        let player = self.store.player();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(12),
                Constraint::Length(4),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(frame.size());

        views::draw_header(frame, chunks[0], &snapshot, &player);

        let upper = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        views::draw_prices(frame, upper[0], &snapshot.prices);
        views::draw_leaderboard(frame, upper[1], &snapshot.leaderboard);

        views::draw_resources(frame, chunks[2], &player);
        views::draw_buildings(frame, chunks[3], &snapshot.buildings);
        views::draw_footer(frame, chunks[4], self.store.active_toast().as_ref());

        match &self.modal {
            Modal::None => {}
            Modal::Onboarding { nickname, error } => {
                modal::draw_onboarding(frame, nickname, error.as_deref());
            }
            Modal::Building { details } => {
                if let Some(name) = self.building_nav.current() {
                    modal::draw_building(
                        frame,
                        name,
                        self.store.building_summary(name),
                        &player.buildings_of(name),
                        details.as_ref(),
                        self.building_nav.can_prev(),
                        self.building_nav.can_next(),
                    );
                }
            }
            Modal::Resource { details, amount } => {
                if let Some(name) = self.resource_nav.current() {
                    modal::draw_resource(
                        frame,
                        name,
                        player.resource_amount(name),
                        self.store.price_quote(name).as_ref(),
                        details.as_ref(),
                        amount,
                        self.resource_nav.can_prev(),
                        self.resource_nav.can_next(),
                    );
                }
            }
            Modal::Build { offers, selected } => {
                modal::draw_build_offers(frame, offers, *selected);
            }
        }
    }
}

#[cfg(test)]
impl App {
    pub(crate) fn building_modal_has_details(&self) -> Option<bool> {
        match &self.modal {
            Modal::Building { details } => Some(details.is_some()),
            _ => None,
        }
    }

    pub(crate) fn resource_modal_has_details(&self) -> Option<bool> {
        match &self.modal {
            Modal::Resource { details, .. } => Some(details.is_some()),
            _ => None,
        }
    }

    pub(crate) fn offer_names(&self) -> Option<Vec<&str>> {
        match &self.modal {
            Modal::Build { offers, .. } => {
                Some(offers.iter().map(|o| o.name.as_str()).collect())
            }
            _ => None,
        }
    }

    pub(crate) fn modal_closed(&self) -> bool {
        matches!(self.modal, Modal::None)
    }
}

/// Input runs on a dedicated thread so terminal events and async work merge
/// through one channel; ticks keep the UI repainting while transport tasks
/// update the store in the background.
fn spawn_input_thread(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        let has_input = event::poll(TICK_RATE).unwrap_or(false);
        let app_event = if has_input {
            match event::read() {
                Ok(ev) => AppEvent::Input(ev),
                Err(_) => AppEvent::Tick,
            }
        } else {
            AppEvent::Tick
        };
        if tx.blocking_send(app_event).is_err() {
            break;
        }
    });
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to leave raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}
