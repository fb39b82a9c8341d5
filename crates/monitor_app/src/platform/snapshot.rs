//! Static HTML rendition of the dashboard, rewritten after every visible change.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use monitor_core::{AppViewModel, TabLoadState};
use mustache::Template;
use serde::Serialize;
use tempfile::NamedTempFile;

const SNAPSHOT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Supervisor monitor</title></head>
<body>
<div id="daemontools-message-view">{{{message}}}</div>
<div id="daemontools-app-view">{{{dashboard}}}</div>
<ul class="nav nav-tabs">{{#tabs}}
  <li{{#active}} class="active"{{/active}}><a href="#{{id}}" data-toggle="tab">{{id}}</a></li>{{/tabs}}
</ul>
<div class="tab-content">{{#tabs}}
  <div class="tab-pane{{#active}} active{{/active}}" id="{{id}}" data-state="{{state}}">{{{html}}}</div>{{/tabs}}
</div>{{#modals}}
{{{.}}}{{/modals}}{{#popover}}
<div class="popover">{{#title}}<h3 class="popover-title">{{title}}</h3>{{/title}}<div class="popover-content">{{content}}</div></div>{{/popover}}
<footer>poll cycle {{poll.cycle}} ({{poll.phase}}): {{poll.completed}} ok, {{poll.failed}} failed</footer>
</body>
</html>
"##;

#[derive(Serialize)]
struct SnapshotContext<'a> {
    message: &'a str,
    dashboard: &'a str,
    tabs: Vec<TabContext<'a>>,
    modals: &'a [String],
    popover: Option<PopoverContext<'a>>,
    poll: PollContext,
}

#[derive(Serialize)]
struct TabContext<'a> {
    id: &'a str,
    active: bool,
    state: &'static str,
    html: &'a str,
}

#[derive(Serialize)]
struct PopoverContext<'a> {
    title: Option<&'a str>,
    content: &'a str,
}

#[derive(Serialize)]
struct PollContext {
    cycle: u64,
    phase: String,
    completed: u64,
    failed: u64,
}

/// Renders the view model and replaces `{dir}/{filename}` with it, so readers
/// never observe a half-written snapshot.
pub struct SnapshotSink {
    template: Template,
    dir: PathBuf,
    filename: String,
}

impl SnapshotSink {
    pub fn new(dir: PathBuf, filename: impl Into<String>) -> anyhow::Result<Self> {
        let template = mustache::compile_str(SNAPSHOT_TEMPLATE).context("snapshot template")?;
        Ok(Self {
            template,
            dir,
            filename: filename.into(),
        })
    }

    pub fn compose(&self, view: &AppViewModel) -> anyhow::Result<String> {
        let context = SnapshotContext {
            message: &view.message_html,
            dashboard: &view.dashboard_html,
            tabs: view
                .tabs
                .iter()
                .map(|tab| TabContext {
                    id: &tab.id,
                    active: view.active_tab.as_ref() == Some(&tab.id),
                    state: load_state(tab.state),
                    html: &tab.html,
                })
                .collect(),
            modals: &view.modals,
            popover: view.popover.as_ref().map(|popover| PopoverContext {
                title: popover.title.as_deref(),
                content: &popover.content,
            }),
            poll: PollContext {
                cycle: view.poll.cycle,
                phase: format!("{:?}", view.poll.phase).to_lowercase(),
                completed: view.poll.completed,
                failed: view.poll.failed,
            },
        };
        let mut out = Vec::new();
        self.template
            .render(&mut out, &context)
            .context("rendering snapshot")?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Composes `view`, writes it to a temp file next to the snapshot, syncs it
    /// and renames it over the previous snapshot.
    pub fn write(&self, view: &AppViewModel) -> anyhow::Result<PathBuf> {
        let html = self.compose(view)?;
        if self.dir.exists() && !self.dir.is_dir() {
            bail!("output path {} is not a directory", self.dir.display());
        }
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating output dir {}", self.dir.display()))?;

        let target = self.dir.join(&self.filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("temp file in {}", self.dir.display()))?;
        tmp.write_all(html.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target)
            .with_context(|| format!("replacing {}", target.display()))?;
        Ok(target)
    }
}

fn load_state(state: TabLoadState) -> &'static str {
    match state {
        TabLoadState::Unloaded => "unloaded",
        TabLoadState::Loading => "loading",
        TabLoadState::Loaded => "loaded",
    }
}
