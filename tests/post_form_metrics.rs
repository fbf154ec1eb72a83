mod common;

use std::sync::Arc;

use megablog::application::{
    post_form::{PostForm, PostFormService, SUBMIT_METRIC, SubmitOutcome},
    repos::AuthStore,
};
use megablog::domain::posts::UserData;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use common::{InMemoryBackend, existing_post};

struct SignedIn;

impl AuthStore for SignedIn {
    fn current_user(&self) -> Option<UserData> {
        Some(UserData {
            id: "user-1".into(),
        })
    }
}

#[tokio::test]
async fn submissions_are_counted_by_mode_and_outcome() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let backend = Arc::new(InMemoryBackend::with_post(existing_post()));
    let service = PostFormService::new(backend.clone(), backend);

    let mut rejected = PostForm::mount(None);
    assert_eq!(
        service.submit(&mut rejected, &SignedIn).await,
        SubmitOutcome::Rejected
    );

    let mut edit = PostForm::mount(Some(existing_post()));
    edit.input_content("<p>Edited</p>");
    assert_eq!(
        service.submit(&mut edit, &SignedIn).await,
        SubmitOutcome::Navigate("/post/hello-world".into())
    );

    let counters: Vec<(String, Vec<(String, String)>, u64)> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(key, _, _, value)| {
            let key = key.key();
            if key.name() != SUBMIT_METRIC {
                return None;
            }
            let mut labels: Vec<(String, String)> = key
                .labels()
                .map(|label| (label.key().to_string(), label.value().to_string()))
                .collect();
            labels.sort();
            match value {
                DebugValue::Counter(count) => Some((key.name().to_string(), labels, count)),
                _ => None,
            }
        })
        .collect();

    let find = |mode: &str, outcome: &str| {
        counters.iter().find_map(|(_, labels, count)| {
            let expected = vec![
                ("mode".to_string(), mode.to_string()),
                ("outcome".to_string(), outcome.to_string()),
            ];
            (*labels == expected).then_some(*count)
        })
    };

    assert_eq!(find("create", "rejected"), Some(1));
    assert_eq!(find("edit", "navigate"), Some(1));
}
