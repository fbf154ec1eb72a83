//! The post editor form: field state, title-to-slug watch and submission.

mod fields;
mod form;
mod service;
mod state;

pub use fields::{Field, FieldErrors, FieldRules, FormValues, TextField};
pub use form::{FormMode, PostForm, PostFormInput};
pub use service::{
    CREATE_EMPTY, FALLBACK_ERROR, MISSING_IMAGE, MISSING_USER, PostFormService, SUBMIT_METRIC,
    SubmitOutcome,
};
pub use state::{FieldUpdate, FormState, WatchEvent, WatchSubscription};
