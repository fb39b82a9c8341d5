//! Template rendering for the dashboard regions.
//!
//! Templates are compiled once when the page is bootstrapped. A missing or
//! malformed template is reported at that point; after setup, rendering is a
//! pure function of template id and data and never yields a partial fragment.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use mustache::Template;
use serde::Serialize;
use serde_json::Value;

use crate::action::Severity;

/// Renders the job/report records of a tab.
pub const REPORTS_TEMPLATE: &str = "dj_reports_template";
/// Renders the full status snapshot into the dashboard view.
pub const DASHBOARD_TEMPLATE: &str = "daemontools_app_template";
/// Renders the outcome of a control action into the message view.
pub const MESSAGE_TEMPLATE: &str = "daemontools_message_template";

/// Templates every page must provide.
pub const REQUIRED_TEMPLATES: [&str; 3] = [REPORTS_TEMPLATE, DASHBOARD_TEMPLATE, MESSAGE_TEMPLATE];

/// Shown in a tab whose report sequence is empty.
pub const NO_JOBS_HTML: &str = "<div class='alert centered'>No Jobs</div>";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template `{0}` is not defined")]
    Missing(String),
    #[error("template `{id}` is malformed: {source}")]
    Malformed {
        id: String,
        #[source]
        source: mustache::Error,
    },
    #[error("template `{id}` failed to render: {source}")]
    Failed {
        id: String,
        #[source]
        source: mustache::Error,
    },
}

/// Compiled Mustache templates keyed by id, cheap to clone.
#[derive(Clone)]
pub struct TemplateSet {
    templates: Arc<BTreeMap<String, Template>>,
}

impl TemplateSet {
    /// Compiles every `(id, source)` pair. `{{name}}` output is HTML-escaped;
    /// `{{{name}}}` is emitted verbatim.
    pub fn compile<I, K, V>(sources: I) -> Result<Self, RenderError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut templates = BTreeMap::new();
        for (id, source) in sources {
            let id = id.into();
            let template = mustache::compile_str(source.as_ref()).map_err(|source| {
                RenderError::Malformed {
                    id: id.clone(),
                    source,
                }
            })?;
            templates.insert(id, template);
        }

        Ok(Self {
            templates: Arc::new(templates),
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Fails with the first id in `required` that was not compiled.
    pub fn require(&self, required: &[&str]) -> Result<(), RenderError> {
        match required.iter().find(|id| !self.contains(id)) {
            Some(missing) => Err(RenderError::Missing((*missing).to_string())),
            None => Ok(()),
        }
    }

    pub fn render<S: Serialize>(&self, id: &str, data: &S) -> Result<String, RenderError> {
        let template = self
            .templates
            .get(id)
            .ok_or_else(|| RenderError::Missing(id.to_string()))?;
        let mut out = Vec::new();
        template
            .render(&mut out, data)
            .map_err(|source| RenderError::Failed {
                id: id.to_string(),
                source,
            })?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn render_dashboard(&self, status: &Value) -> Result<String, RenderError> {
        self.render(DASHBOARD_TEMPLATE, status)
    }

    /// The record sequence itself is the root context, so templates iterate it
    /// with `{{#.}}...{{/.}}`. Empty sequences render the no-data indicator.
    pub fn render_reports(&self, records: &[Value]) -> Result<String, RenderError> {
        if records.is_empty() {
            return Ok(NO_JOBS_HTML.to_string());
        }
        self.render(REPORTS_TEMPLATE, &records)
    }

    pub fn render_message(&self, severity: Severity, body: &str) -> Result<String, RenderError> {
        self.render(
            MESSAGE_TEMPLATE,
            &MessageContext {
                level: severity.as_str(),
                data: body,
                severity: severity.as_str(),
                body,
            },
        )
    }

    pub fn render_modal(&self, id: &str, content: &str) -> Result<String, RenderError> {
        self.render(id, &ModalContext { content })
    }
}

impl fmt::Debug for TemplateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSet")
            .field("ids", &self.templates.keys().collect::<Vec<_>>())
            .finish()
    }
}

// Page templates read `level`/`data`; `severity`/`body` are the same values
// under clearer names.
#[derive(Serialize)]
struct MessageContext<'a> {
    level: &'a str,
    data: &'a str,
    severity: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct ModalContext<'a> {
    content: &'a str,
}
