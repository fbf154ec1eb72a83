use askama::Template;

#[derive(Clone)]
pub struct AdminMetaView {
    pub title: String,
}

#[derive(Clone)]
pub struct StatusOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Clone)]
pub struct ImagePreviewView {
    pub src: String,
    pub alt: String,
}

/// Everything the post editor template needs, already resolved to strings.
#[derive(Clone)]
pub struct PostEditorView {
    pub heading: &'static str,
    pub form_action: String,
    pub submit_label: &'static str,
    pub error: Option<String>,
    pub title: String,
    pub title_error: Option<String>,
    pub slug: String,
    pub slug_error: Option<String>,
    pub content: String,
    pub status_options: Vec<StatusOptionView>,
    pub status_error: Option<String>,
    pub image_required: bool,
    pub image_accept: String,
    pub image_error: Option<String>,
    pub preview: Option<ImagePreviewView>,
    /// Initial datastar signals, serialised as JSON.
    pub signals: String,
    pub slug_from_title_action: &'static str,
    pub slug_manual_action: &'static str,
}

#[derive(Template)]
#[template(path = "admin/post_form.html")]
pub struct PostEditorTemplate {
    pub meta: AdminMetaView,
    pub content: PostEditorView,
}
