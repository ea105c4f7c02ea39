//! Application state and key handling.

use crate::{FormState, ListState, Record};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use storefront_core::{Category, Product};

/// Default lifetime of an alert.
pub const DEFAULT_ALERT_DURATION: Duration = Duration::from_secs(5);

/// Resource shown in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
pub enum Resource {
    /// Category administration
    Categories,
    /// Product administration
    Products,
}

impl Resource {
    /// The other resource.
    pub fn toggle(self) -> Self {
        match self {
            Resource::Categories => Resource::Products,
            Resource::Products => Resource::Categories,
        }
    }

    /// Singular name used in messages.
    pub fn singular(self) -> &'static str {
        match self {
            Resource::Categories => "Category",
            Resource::Products => "Product",
        }
    }
}

/// Application mode determines which view is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppMode {
    /// Browse rows
    List,
    /// Typing into the search box
    Search,
    /// Create/edit modal open
    Form,
    /// Waiting for delete confirmation of the given id
    ConfirmDelete(i64),
    /// Server denied access; nothing else is shown
    Forbidden,
}

/// Dismissible message that expires on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Text shown
    pub message: String,
    /// When the alert disappears
    pub expires_at: Instant,
}

/// Work the runner has to perform against the backend after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Open an empty create form
    OpenCreate,
    /// Open the edit form for a row
    OpenEdit(i64),
    /// Send the open form
    Submit,
    /// Delete a row after confirmation
    Delete(i64),
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Active resource
    pub resource: Resource,
    /// Current mode
    pub mode: AppMode,
    /// Category list
    pub categories: ListState<Category>,
    /// Product list
    pub products: ListState<Product>,
    /// Open form, if any
    pub form: Option<FormState>,
    /// Active alert, if any
    pub alert: Option<Alert>,
    /// Status line text
    pub status_message: String,
    /// Whether to quit the application
    pub should_quit: bool,
    alert_duration: Duration,
}

impl Default for App {
    fn default() -> Self {
        Self::new(crate::DEFAULT_DEBOUNCE, DEFAULT_ALERT_DURATION)
    }
}

impl App {
    /// Empty state with the given search debounce and alert lifetime.
    pub fn new(debounce: Duration, alert_duration: Duration) -> Self {
        Self {
            resource: Resource::Categories,
            mode: AppMode::List,
            categories: ListState::with_debounce(debounce),
            products: ListState::with_debounce(debounce),
            form: None,
            alert: None,
            status_message: String::from("Press ? for keys"),
            should_quit: false,
            alert_duration,
        }
    }

    /// Show an alert that expires after the configured duration.
    pub fn raise_alert(&mut self, message: impl Into<String>, now: Instant) {
        self.alert = Some(Alert {
            message: message.into(),
            expires_at: now + self.alert_duration,
        });
    }

    /// Dismiss the alert.
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Switch to the Forbidden view.
    pub fn forbid(&mut self) {
        self.mode = AppMode::Forbidden;
        self.form = None;
    }

    /// Advance timers: debounced search for both lists and alert expiry.
    pub fn tick(&mut self, now: Instant) {
        self.categories.tick(now);
        self.products.tick(now);
        if self.alert.as_ref().is_some_and(|a| now >= a.expires_at) {
            self.alert = None;
        }
    }

    /// Id of the highlighted row of the active list.
    pub fn selected_id(&self) -> Option<i64> {
        match self.resource {
            Resource::Categories => self.categories.selected_row().map(Record::id),
            Resource::Products => self.products.selected_row().map(Record::id),
        }
    }

    /// Request a reload of the active list.
    pub fn request_reload(&mut self) {
        match self.resource {
            Resource::Categories => self.categories.request_reload(),
            Resource::Products => self.products.request_reload(),
        }
    }

    /// Whether the active list is loading.
    pub fn is_loading(&self) -> bool {
        match self.resource {
            Resource::Categories => self.categories.loading,
            Resource::Products => self.products.loading,
        }
    }

    /// Open a form and switch to form mode.
    pub fn open_form(&mut self, form: FormState) {
        self.form = Some(form);
        self.mode = AppMode::Form;
    }

    /// Close the form without sending it.
    pub fn close_form(&mut self) {
        self.form = None;
        self.mode = AppMode::List;
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn with_list<R>(
        &mut self,
        categories: impl FnOnce(&mut ListState<Category>) -> R,
        products: impl FnOnce(&mut ListState<Product>) -> R,
    ) -> R {
        match self.resource {
            Resource::Categories => categories(&mut self.categories),
            Resource::Products => products(&mut self.products),
        }
    }

    /// Apply a key press; returns backend work for the runner.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        match self.mode {
            AppMode::Forbidden => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.quit();
                }
                None
            }
            AppMode::Search => {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter => self.mode = AppMode::List,
                    KeyCode::Backspace => self.with_list(|l| l.pop_search(now), |l| l.pop_search(now)),
                    KeyCode::Char(ch) => {
                        self.with_list(|l| l.push_search(ch, now), |l| l.push_search(ch, now))
                    }
                    _ => {}
                }
                None
            }
            AppMode::ConfirmDelete(id) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.mode = AppMode::List;
                    Some(Action::Delete(id))
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.mode = AppMode::List;
                    self.status_message = "Delete cancelled".to_string();
                    None
                }
                _ => None,
            },
            AppMode::Form => self.handle_form_key(key),
            AppMode::List => self.handle_list_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.form.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.close_form();
                None
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Submit)
            }
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Tab | KeyCode::Down => {
                form.focus_next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.focus_previous();
                None
            }
            KeyCode::Backspace => {
                form.backspace();
                None
            }
            KeyCode::Char(ch) => {
                form.insert_char(ch);
                None
            }
            _ => None,
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Tab => {
                self.resource = self.resource.toggle();
                self.status_message = format!("Viewing {}", self.resource);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.with_list(ListState::select_previous, ListState::select_previous)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.with_list(ListState::select_next, ListState::select_next)
            }
            KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => {
                self.with_list(ListState::next_page, ListState::next_page)
            }
            KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => {
                self.with_list(ListState::previous_page, ListState::previous_page)
            }
            KeyCode::Char('+') => self.with_list(|l| l.cycle_per_page(true), |l| l.cycle_per_page(true)),
            KeyCode::Char('-') => {
                self.with_list(|l| l.cycle_per_page(false), |l| l.cycle_per_page(false))
            }
            KeyCode::Char('/') => self.mode = AppMode::Search,
            KeyCode::Char('r') => self.request_reload(),
            KeyCode::Char('x') => self.dismiss_alert(),
            KeyCode::Char('?') => {
                self.status_message = "Tab: switch | / search | a add | e edit | d delete | n/p page | +/- size | r reload | x dismiss | q quit".to_string();
            }
            KeyCode::Char('a') => return Some(Action::OpenCreate),
            KeyCode::Char('e') | KeyCode::Enter => return self.selected_id().map(Action::OpenEdit),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.mode = AppMode::ConfirmDelete(id);
                }
            }
            _ => {}
        }
        None
    }
}
