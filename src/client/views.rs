//! Terminal views: inventory list, create and edit forms, health check.
//!
//! Each view owns only its own request status and last result. Every user
//! action issues one request; nothing is cached between actions.

use indexmap::IndexMap;
use tracing::warn;

use super::{ApiClient, ClientError};
use crate::models::{Health, Item};
use crate::validation::NAME_MAX_CHARS;

const NAME_MIN_CHARS: usize = 2;

/// Request lifecycle shared by all views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

// ── List view ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total_items: usize,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    /// The item was gone by the time the request arrived.
    AlreadyGone,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct ListView {
    items: Vec<Item>,
    status: Status,
    error: Option<String>,
    notice: Option<String>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Result of the last delete action, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Fetch the list. On failure the previously loaded rows are kept.
    pub async fn load(&mut self, api: &ApiClient) {
        self.status = Status::Loading;
        match api.list_items().await {
            Ok(items) => {
                self.items = items;
                self.error = None;
                self.status = Status::Success;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load inventory items");
                self.error = Some("Failed to fetch items".to_string());
                self.status = Status::Error;
            }
        }
    }

    /// Derived from whatever list is currently held.
    pub fn summary(&self) -> Summary {
        Summary {
            total_items: self.items.len(),
            total_quantity: self.items.iter().map(|i| i64::from(i.quantity)).sum(),
        }
    }

    /// Delete `id` once `confirm` agrees, then refetch the list.
    pub async fn delete<F>(&mut self, api: &ApiClient, id: i64, confirm: F) -> DeleteOutcome
    where
        F: FnOnce(Option<&Item>) -> bool,
    {
        if !confirm(self.items.iter().find(|i| i.id == id)) {
            return DeleteOutcome::Cancelled;
        }

        let outcome = match api.delete_item(id).await {
            Ok(()) => {
                self.notice = Some("Item deleted successfully!".to_string());
                DeleteOutcome::Deleted
            }
            Err(ClientError::NotFound(_)) => {
                self.notice = Some("Item not found. It may have already been deleted.".to_string());
                DeleteOutcome::AlreadyGone
            }
            Err(e) => {
                let message = e.user_message();
                self.notice = Some(format!("Failed to delete item: {message}"));
                return DeleteOutcome::Failed(message);
            }
        };

        self.load(api).await;
        outcome
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Inventory Items\n");
        out.push_str("===============\n");

        if self.status == Status::Loading {
            out.push_str("Loading inventory...\n");
            return out;
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("! {error}\n"));
        }

        if self.items.is_empty() {
            out.push_str("No items in inventory.\n");
            out.push_str("Add your first item with `inventory-cli add`.\n");
        } else {
            let name_width = self
                .items
                .iter()
                .map(|i| i.name.chars().count())
                .max()
                .unwrap_or(0)
                .clamp(4, 40);

            out.push_str(&format!(
                "{:>6}  {:<name_width$}  {:>8}  {:<10}  {}\n",
                "ID", "Name", "Quantity", "Created At", "Actions"
            ));
            out.push_str(&"-".repeat(6 + name_width + 8 + 10 + 7 + 8));
            out.push('\n');
            for item in &self.items {
                out.push_str(&format!(
                    "{:>6}  {:<name_width$}  {:>8}  {:<10}  edit/delete {}\n",
                    item.id,
                    truncate(&item.name, name_width),
                    item.quantity,
                    item.created_at.format("%Y-%m-%d").to_string(),
                    item.id,
                ));
            }
        }

        let summary = self.summary();
        out.push_str(&format!("\nTotal Items: {}\n", summary.total_items));
        out.push_str(&format!("Total Quantity: {}\n", summary.total_quantity));
        out
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

// ── Item forms ────────────────────────────────────────────────────────────────

/// Raw field text and per-field messages shared by the create and edit forms.
#[derive(Debug, Default)]
struct FormFields {
    name: String,
    quantity: String,
    errors: IndexMap<String, String>,
}

impl FormFields {
    fn set_name(&mut self, value: String) {
        self.name = value;
        self.errors.shift_remove("name");
    }

    fn set_quantity(&mut self, value: String) {
        self.quantity = value;
        self.errors.shift_remove("quantity");
    }

    fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Client-side checks; a stricter superset of the server's rules.
    /// Returns the trimmed name and parsed quantity when both pass.
    fn validate(&mut self) -> Option<(String, i64)> {
        self.errors.clear();

        let name = self.name.trim();
        let name_len = name.chars().count();
        if name.is_empty() {
            self.errors.insert("name".into(), "Item name is required".into());
        } else if name_len < NAME_MIN_CHARS {
            self.errors
                .insert("name".into(), "Item name must be at least 2 characters".into());
        } else if name_len > NAME_MAX_CHARS {
            self.errors
                .insert("name".into(), "Item name must not exceed 255 characters".into());
        }

        let quantity = match parse_quantity(&self.quantity) {
            Ok(quantity) => Some(quantity),
            Err(message) => {
                self.errors.insert("quantity".into(), message.into());
                None
            }
        };

        match quantity {
            Some(quantity) if self.errors.is_empty() => Some((name.to_string(), quantity)),
            _ => None,
        }
    }

    /// Route a failed request: field errors land on the form, anything else
    /// becomes the returned alert text.
    fn absorb(&mut self, err: ClientError, not_found: &str, action: &str) -> Option<String> {
        match err {
            ClientError::Validation { errors, .. } if !errors.is_empty() => {
                self.errors = first_messages(&errors);
                None
            }
            ClientError::NotFound(_) => Some(not_found.to_string()),
            other => Some(format!("Error {action} item: {}", other.user_message())),
        }
    }
}

#[derive(Debug, Default)]
pub struct CreateForm {
    fields: FormFields,
    alert: Option<String>,
    status: Status,
}

impl CreateForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.fields.set_name(value.into());
    }

    pub fn set_quantity(&mut self, value: impl Into<String>) {
        self.fields.set_quantity(value.into());
    }

    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.fields.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.fields.error(field)
    }

    /// Non-field failure to show the user (transport, 404, 5xx).
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn validate(&mut self) -> bool {
        self.fields.validate().is_some()
    }

    /// Validate and post. Returns the created item on success so the caller
    /// can navigate back to the list.
    pub async fn submit(&mut self, api: &ApiClient) -> Option<Item> {
        self.alert = None;
        let (name, quantity) = self.fields.validate()?;

        self.status = Status::Loading;
        match api.create_item(&name, quantity).await {
            Ok(item) => {
                self.status = Status::Success;
                Some(item)
            }
            Err(e) => {
                self.status = Status::Error;
                self.alert = self.fields.absorb(e, "Error: Resource not found", "creating");
                None
            }
        }
    }
}

/// Edit an existing item: the form starts pre-filled and submits a full PUT.
#[derive(Debug)]
pub struct EditForm {
    id: i64,
    fields: FormFields,
    alert: Option<String>,
    status: Status,
}

impl EditForm {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.id,
            fields: FormFields {
                name: item.name.clone(),
                quantity: item.quantity.to_string(),
                errors: IndexMap::new(),
            },
            alert: None,
            status: Status::Idle,
        }
    }

    /// Fetch the current record and pre-fill the form from it.
    pub async fn load(api: &ApiClient, id: i64) -> Result<Self, ClientError> {
        let item = api.get_item(id).await?;
        Ok(Self::from_item(&item))
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn quantity(&self) -> &str {
        &self.fields.quantity
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.fields.set_name(value.into());
    }

    pub fn set_quantity(&mut self, value: impl Into<String>) {
        self.fields.set_quantity(value.into());
    }

    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.fields.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.fields.error(field)
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn validate(&mut self) -> bool {
        self.fields.validate().is_some()
    }

    pub async fn submit(&mut self, api: &ApiClient) -> Option<Item> {
        self.alert = None;
        let (name, quantity) = self.fields.validate()?;

        self.status = Status::Loading;
        match api.update_item(self.id, &name, quantity).await {
            Ok(item) => {
                self.status = Status::Success;
                Some(item)
            }
            Err(e) => {
                self.status = Status::Error;
                self.alert = self.fields.absorb(
                    e,
                    "Item not found. It may have already been deleted.",
                    "saving",
                );
                None
            }
        }
    }
}

/// Parse the quantity text the way the form's number input would.
fn parse_quantity(raw: &str) -> Result<i64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Quantity is required");
    }
    let value: f64 = raw
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or("Quantity must be a number")?;
    if value.trunc() < 0.0 {
        return Err("Quantity must be non-negative");
    }
    if value.fract() != 0.0 {
        return Err("Quantity must be a whole number");
    }
    Ok(value as i64)
}

/// Keep only the first server message for each field.
pub fn first_messages(errors: &IndexMap<String, Vec<String>>) -> IndexMap<String, String> {
    errors
        .iter()
        .filter_map(|(field, messages)| messages.first().map(|m| (field.clone(), m.clone())))
        .collect()
}

// ── Health view ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct HealthView {
    status: Status,
    health: Option<Health>,
}

impl HealthView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn health(&self) -> Option<&Health> {
        self.health.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.status == Status::Success
    }

    pub async fn refresh(&mut self, api: &ApiClient) {
        self.status = Status::Loading;
        match api.health().await {
            Ok(health) => {
                self.health = Some(health);
                self.status = Status::Success;
            }
            Err(e) => {
                warn!(error = %e, "API connection error");
                self.health = None;
                self.status = Status::Error;
            }
        }
    }

    pub fn headline(&self) -> String {
        match (self.status, &self.health) {
            (Status::Success, Some(health)) => format!("Connected! {}", health.message),
            (Status::Error, _) => "Not connected. Make sure the backend is running.".to_string(),
            _ => "Checking...".to_string(),
        }
    }

    pub fn render(&self, api_url: &str) -> String {
        let mut out = String::new();
        out.push_str("System Health Check\n");
        out.push_str("===================\n");
        out.push_str(&format!("Backend API Status: {}\n", self.headline()));
        if let Some(health) = &self.health {
            out.push_str(&format!("  status:    {}\n", health.status));
            out.push_str(&format!("  version:   {}\n", health.version));
            out.push_str(&format!("  timestamp: {}\n", health.timestamp.to_rfc3339()));
        }
        out.push_str(&format!("Backend API: {api_url}\n"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(id: i64, name: &str, quantity: i32) -> Item {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Item {
            id,
            name: name.to_string(),
            quantity,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn loaded(items: Vec<Item>) -> ListView {
        ListView {
            items,
            status: Status::Success,
            ..ListView::default()
        }
    }

    // ── List ───────────────────────────────────────────────────────────────────

    #[test]
    fn summary_counts_rows_and_sums_quantities() {
        let view = loaded(vec![item(2, "Gadget", 5), item(1, "Widget", 10)]);
        assert_eq!(
            view.summary(),
            Summary {
                total_items: 2,
                total_quantity: 15
            }
        );
    }

    #[test]
    fn summary_does_not_overflow_i32() {
        let view = loaded(vec![item(1, "A", i32::MAX), item(2, "B", i32::MAX)]);
        assert_eq!(view.summary().total_quantity, 2 * i64::from(i32::MAX));
    }

    #[test]
    fn render_table_lists_rows_and_totals() {
        let view = loaded(vec![item(7, "Widget", 10)]);
        let out = view.render();
        assert!(out.contains("Quantity"));
        assert!(out.contains("Widget"));
        assert!(out.contains("2024-03-01"));
        assert!(out.contains("edit/delete 7"));
        assert!(out.contains("Total Items: 1"));
        assert!(out.contains("Total Quantity: 10"));
    }

    #[test]
    fn render_empty_state() {
        let out = loaded(vec![]).render();
        assert!(out.contains("No items in inventory."));
        assert!(out.contains("Total Quantity: 0"));
    }

    #[test]
    fn render_keeps_rows_when_refetch_failed() {
        let mut view = loaded(vec![item(1, "Widget", 3)]);
        view.status = Status::Error;
        view.error = Some("Failed to fetch items".to_string());
        let out = view.render();
        assert!(out.contains("Failed to fetch items"));
        assert!(out.contains("Widget"));
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }

    // ── Create form ────────────────────────────────────────────────────────────

    #[test]
    fn form_name_rules() {
        let mut form = CreateForm::new();
        form.set_quantity("1");

        form.set_name("   ");
        assert!(!form.validate());
        assert_eq!(form.error("name"), Some("Item name is required"));

        form.set_name(" a ");
        assert!(!form.validate());
        assert_eq!(form.error("name"), Some("Item name must be at least 2 characters"));

        form.set_name("x".repeat(256));
        assert!(!form.validate());
        assert_eq!(form.error("name"), Some("Item name must not exceed 255 characters"));

        form.set_name("Widget");
        assert!(form.validate());
    }

    #[test]
    fn form_quantity_rules() {
        assert_eq!(parse_quantity(""), Err("Quantity is required"));
        assert_eq!(parse_quantity("abc"), Err("Quantity must be a number"));
        assert_eq!(parse_quantity("inf"), Err("Quantity must be a number"));
        assert_eq!(parse_quantity("-1"), Err("Quantity must be non-negative"));
        assert_eq!(parse_quantity("2.5"), Err("Quantity must be a whole number"));
        assert_eq!(parse_quantity(" 12 "), Ok(12));
        assert_eq!(parse_quantity("0"), Ok(0));
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut form = CreateForm::new();
        assert!(!form.validate());
        assert!(form.error("name").is_some());
        assert!(form.error("quantity").is_some());

        form.set_name("Widget");
        assert!(form.error("name").is_none());
        assert!(form.error("quantity").is_some(), "other field errors stay");
    }

    #[test]
    fn server_errors_collapse_to_first_message() {
        let mut errors = IndexMap::new();
        errors.insert(
            "name".to_string(),
            vec!["first".to_string(), "second".to_string()],
        );
        errors.insert("quantity".to_string(), vec![]);

        let flat = first_messages(&errors);
        assert_eq!(flat.get("name").map(String::as_str), Some("first"));
        assert!(!flat.contains_key("quantity"));
    }

    // ── Edit form ──────────────────────────────────────────────────────────────

    #[test]
    fn edit_form_starts_from_the_current_record() {
        let mut form = EditForm::from_item(&item(4, "Widget", 10));
        assert_eq!(form.id(), 4);
        assert_eq!(form.name(), "Widget");
        assert_eq!(form.quantity(), "10");
        assert_eq!(form.status(), Status::Idle);
        assert!(form.validate());
    }

    #[test]
    fn edit_form_uses_the_create_rules() {
        let mut form = EditForm::from_item(&item(4, "Widget", 10));
        form.set_name("a");
        form.set_quantity("-3");
        assert!(!form.validate());
        assert_eq!(form.error("name"), Some("Item name must be at least 2 characters"));
        assert_eq!(form.error("quantity"), Some("Quantity must be non-negative"));

        form.set_quantity("3");
        assert!(form.error("quantity").is_none());
        assert!(form.error("name").is_some());
    }

    // ── Health ─────────────────────────────────────────────────────────────────

    #[test]
    fn health_headline_per_state() {
        let mut view = HealthView::new();
        assert_eq!(view.headline(), "Checking...");

        view.status = Status::Error;
        assert_eq!(view.headline(), "Not connected. Make sure the backend is running.");
        assert!(!view.is_connected());

        view.status = Status::Success;
        view.health = Some(Health::ok());
        assert_eq!(view.headline(), "Connected! Backend API is running");
        assert!(view.render("http://localhost:8001/api").contains("version:   1.0.0"));
    }
}
