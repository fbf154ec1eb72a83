//! Form state with field watchers.
//!
//! Watchers observe every value change and answer with follow-up updates
//! instead of mutating the state themselves, so a change and its cascade are
//! applied in one place. Registration returns a [`WatchSubscription`]; the
//! watcher stays installed exactly as long as that guard is alive.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, Weak};

use tracing::{trace, warn};

use super::fields::{Field, FieldErrors, FieldRules, FormValues, TextField, check_field};
use crate::domain::posts::ImageUpload;
use crate::util::lock::mutex_lock;

const SOURCE: &str = "application::post_form::state";
const MAX_CASCADE: usize = 16;

/// A value change delivered to watchers, with the values after the change.
pub struct WatchEvent<'a> {
    pub field: Field,
    pub values: &'a FormValues,
}

/// A follow-up write requested by a watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub field: TextField,
    pub value: String,
    pub should_validate: bool,
}

impl FieldUpdate {
    pub fn validated(field: TextField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            should_validate: true,
        }
    }
}

type WatchCallback = dyn Fn(&WatchEvent<'_>) -> Vec<FieldUpdate> + Send + Sync;

#[derive(Default)]
struct WatchRegistry {
    next_id: u64,
    watchers: BTreeMap<u64, Box<WatchCallback>>,
}

/// Keeps a watcher registered; dropping it removes the watcher.
#[must_use = "dropping the subscription immediately removes the watcher"]
pub struct WatchSubscription {
    id: u64,
    registry: Weak<Mutex<WatchRegistry>>,
}

impl WatchSubscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for WatchSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            mutex_lock(&registry, SOURCE, "unsubscribe")
                .watchers
                .remove(&self.id);
            trace!(target = SOURCE, watcher = self.id, "watcher released");
        }
    }
}

pub struct FormState {
    values: FormValues,
    errors: FieldErrors,
    rules: FieldRules,
    registry: Arc<Mutex<WatchRegistry>>,
}

impl FormState {
    pub fn new(values: FormValues, rules: FieldRules) -> Self {
        Self {
            values,
            errors: FieldErrors::default(),
            rules,
            registry: Arc::new(Mutex::new(WatchRegistry::default())),
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn rules(&self) -> FieldRules {
        self.rules
    }

    /// Register a watcher that sees every subsequent value change.
    pub fn watch<F>(&self, callback: F) -> WatchSubscription
    where
        F: Fn(&WatchEvent<'_>) -> Vec<FieldUpdate> + Send + Sync + 'static,
    {
        let mut registry = mutex_lock(&self.registry, SOURCE, "watch");
        let id = registry.next_id;
        registry.next_id += 1;
        registry.watchers.insert(id, Box::new(callback));
        trace!(target = SOURCE, watcher = id, "watcher registered");

        WatchSubscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn watcher_count(&self) -> usize {
        mutex_lock(&self.registry, SOURCE, "watcher_count")
            .watchers
            .len()
    }

    /// Write a text value, then apply whatever the watchers request in turn.
    pub fn set_value(&mut self, field: TextField, value: impl Into<String>, should_validate: bool) {
        let mut pending = VecDeque::from([FieldUpdate {
            field,
            value: value.into(),
            should_validate,
        }]);
        let mut applied = 0;

        while let Some(update) = pending.pop_front() {
            if applied == MAX_CASCADE {
                warn!(
                    target = SOURCE,
                    field = Field::from(update.field).name(),
                    dropped = pending.len() + 1,
                    "watcher cascade limit reached"
                );
                break;
            }
            applied += 1;

            *self.values.text_mut(update.field) = update.value;
            if update.should_validate {
                self.validate_field(update.field.into());
            }
            pending.extend(self.notify(update.field.into()));
        }
    }

    pub fn set_image(&mut self, image: Option<ImageUpload>, should_validate: bool) {
        self.values.image = image;
        if should_validate {
            self.validate_field(Field::Image);
        }
        let follow_ups = self.notify(Field::Image);
        for update in follow_ups {
            self.set_value(update.field, update.value, update.should_validate);
        }
    }

    pub fn validate_field(&mut self, field: Field) -> bool {
        let message = check_field(field, &self.values, self.rules);
        self.errors.set(field, message);
        message.is_none()
    }

    /// Validate every field, returning whether the form may be submitted.
    pub fn validate_all(&mut self) -> bool {
        [
            Field::Title,
            Field::Slug,
            Field::Content,
            Field::Status,
            Field::Image,
        ]
        .into_iter()
        .fold(true, |valid, field| self.validate_field(field) && valid)
    }

    fn notify(&self, field: Field) -> Vec<FieldUpdate> {
        let registry = mutex_lock(&self.registry, SOURCE, "notify");
        let event = WatchEvent {
            field,
            values: &self.values,
        };
        registry
            .watchers
            .values()
            .flat_map(|watcher| watcher(&event))
            .collect()
    }
}
