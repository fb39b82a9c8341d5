//! Line-oriented stand-in for pointer and form events.

use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use monitor_core::{AppState, Element, EventKind, Msg};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Tab(String),
    Click(usize),
    Hover(usize),
    Submit(usize),
    Stop,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try list, tab, click, hover, submit, stop, quit)")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not an element index")]
    BadIndex(String),
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();
        let command = match word {
            "list" | "ls" => Command::List,
            "tab" => Command::Tab(arg.ok_or(CommandError::MissingArgument("tab"))?.to_string()),
            "click" => Command::Click(index(arg, "click")?),
            "hover" => Command::Hover(index(arg, "hover")?),
            "submit" => Command::Submit(index(arg, "submit")?),
            "stop" => Command::Stop,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn index(arg: Option<&str>, command: &'static str) -> Result<usize, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArgument(command))?;
    arg.parse()
        .map_err(|_| CommandError::BadIndex(arg.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleOutcome {
    Dispatch(Msg),
    Print(String),
    Quit,
}

/// Remembers the element list printed by the last `list`, so later commands
/// can refer to elements by index.
#[derive(Debug, Default)]
pub struct Console {
    listed: Vec<Element>,
}

impl Console {
    pub fn handle(&mut self, command: Command, state: &AppState) -> ConsoleOutcome {
        match command {
            Command::List => ConsoleOutcome::Print(self.list(state)),
            Command::Tab(id) => ConsoleOutcome::Dispatch(Msg::TabActivated(id)),
            Command::Click(n) => self.interaction(EventKind::Click, n),
            Command::Hover(n) => self.interaction(EventKind::PointerEnter, n),
            Command::Submit(n) => self.interaction(EventKind::Submit, n),
            Command::Stop => ConsoleOutcome::Dispatch(Msg::StopPolling),
            Command::Quit => ConsoleOutcome::Quit,
        }
    }

    fn list(&mut self, state: &AppState) -> String {
        let targets = state.dispatcher().targets(state.document());
        self.listed.clear();
        let mut out = String::new();
        for (kind, behavior, element) in targets {
            out.push_str(&format!(
                "[{}] {} {:?}: {}\n",
                self.listed.len(),
                verb(kind),
                behavior,
                describe(&element)
            ));
            self.listed.push(element);
        }
        if out.is_empty() {
            out.push_str("no interactive elements\n");
        }
        out
    }

    fn interaction(&self, kind: EventKind, n: usize) -> ConsoleOutcome {
        match self.listed.get(n) {
            Some(target) => ConsoleOutcome::Dispatch(Msg::Interaction {
                kind,
                target: target.clone(),
            }),
            None => ConsoleOutcome::Print(format!("no element [{n}]; run `list` first\n")),
        }
    }
}

fn verb(kind: EventKind) -> &'static str {
    match kind {
        EventKind::PointerEnter => "hover",
        EventKind::Click => "click",
        EventKind::Submit => "submit",
    }
}

fn describe(element: &Element) -> String {
    let mut text = format!("<{}", element.name);
    for name in ["href", "action", "rel", "data-toggle", "data-dismiss"] {
        if let Some(value) = element.attr(name) {
            text.push_str(&format!(" {name}=\"{value}\""));
        }
    }
    text.push_str(&format!("> in {:?}", element.region));
    text
}

/// Forwards stdin lines to `tx` until stdin closes or the receiver is gone.
pub fn spawn_stdin_reader(tx: mpsc::Sender<String>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::{update, ClientSettings, Page};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use url::Url;

    const PAGE: &str = r##"<html><body>
<ul class="nav nav-tabs">
  <li class="active"><a href="#running" data-toggle="tab">Running</a></li>
</ul>
<div class="tab-pane" id="running" data-url="reports/running"></div>
<script type="text/template" id="dj_reports_template"><ul>{{#.}}<li>{{id}}</li>{{/.}}</ul></script>
<script type="text/template" id="daemontools_app_template">{{#daemons}}<form action="daemons/{{name}}/restart"></form>{{/daemons}}</script>
<script type="text/template" id="daemontools_message_template"><p>{{level}}: {{data}}</p></script>
</body></html>"##;

    fn state() -> AppState {
        let page = Page::parse(PAGE).unwrap();
        AppState::new(page, ClientSettings::new(Url::parse("http://monitor.test/").unwrap()))
            .unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("  "), Ok(None));
        assert_eq!(Command::parse("list"), Ok(Some(Command::List)));
        assert_eq!(
            Command::parse("tab failed"),
            Ok(Some(Command::Tab("failed".to_string())))
        );
        assert_eq!(Command::parse("submit 3"), Ok(Some(Command::Submit(3))));
        assert_eq!(Command::parse("quit"), Ok(Some(Command::Quit)));
        assert_eq!(
            Command::parse("click"),
            Err(CommandError::MissingArgument("click"))
        );
        assert_eq!(
            Command::parse("hover x"),
            Err(CommandError::BadIndex("x".to_string()))
        );
        assert_eq!(
            Command::parse("restart web"),
            Err(CommandError::Unknown("restart".to_string()))
        );
    }

    #[test]
    fn indices_refer_to_last_listing() {
        let state = state();
        let mut console = Console::default();

        assert_eq!(
            console.handle(Command::Click(0), &state),
            ConsoleOutcome::Print("no element [0]; run `list` first\n".to_string())
        );

        let ConsoleOutcome::Print(listing) = console.handle(Command::List, &state) else {
            panic!("list prints");
        };
        assert!(listing.starts_with("[0] click ActivateTab: <a href=\"#running\""));

        let ConsoleOutcome::Dispatch(Msg::Interaction { kind, target }) =
            console.handle(Command::Click(0), &state)
        else {
            panic!("click dispatches");
        };
        assert_eq!(kind, EventKind::Click);
        assert_eq!(target.href_target(), Some("running"));
    }

    #[test]
    fn listed_forms_submit_control_actions() {
        let (state, _) = update(state(), Msg::PageLoaded);
        let cycle = state.poller().cycle();
        let (state, _) = update(
            state,
            Msg::StatusFetched {
                cycle,
                result: Ok(json!({"daemons": [{"name": "web"}]})),
            },
        );
        let mut console = Console::default();
        let ConsoleOutcome::Print(listing) = console.handle(Command::List, &state) else {
            panic!("list prints");
        };
        assert!(listing.contains("[1] submit SubmitAction: <form action=\"daemons/web/restart\""));

        let ConsoleOutcome::Dispatch(msg) = console.handle(Command::Submit(1), &state) else {
            panic!("submit dispatches");
        };
        let (_, effects) = update(state, msg);
        assert_eq!(
            effects,
            vec![monitor_core::Effect::SubmitAction {
                url: "http://monitor.test/daemons/web/restart".to_string()
            }]
        );
    }
}
