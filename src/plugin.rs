//! The `php` command: `phpbot: php strlen` answers with a notice holding
//! the function's synopsis and description.

use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::thread;

use crate::event_stream::{Handler, Replier, Response};
use crate::php::{ManualEntry, ManualSource};
use crate::protocol::{Dest, Notice, Privmsg};

static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^php\s+(\S.*?)\s*$").expect("command regex"));

/// Picks the function name out of a `php <name>` command.
pub fn parse_command(msg: &str) -> Option<&str> {
    COMMAND_RE.captures(msg).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// The text sent back for a lookup of `name`.
pub fn format_reply(name: &str, entry: Option<&ManualEntry>) -> String {
    match entry {
        Some(entry) if !entry.description.is_empty() => format!("{} - {}", entry.synopsis, entry.description),
        Some(entry) => entry.synopsis.clone(),
        None => format!("Search for {} returned no results.", name),
    }
}

pub struct PhpPlugin {
    source: Arc<ManualSource>,
    nick: String,
}

impl PhpPlugin {

    pub fn new(source: Arc<ManualSource>, nick: &str) -> PhpPlugin {
        PhpPlugin{
            source: source,
            nick: nick.to_string(),
        }
    }

    /// Looks `name` up and formats the answer.  Blocks on the manual.
    pub fn lookup(&self, name: &str) -> String {
        format_reply(name, self.source.find_function(name).as_ref())
    }

    /// Turns the plugin into an event loop handler.  Every lookup runs on
    /// its own thread and answers through `replier`, so a slow manual
    /// never holds up the event loop or other lookups.
    pub fn handler(self, replier: Replier) -> Handler {
        let plugin = Arc::new(self);
        Box::new(move |line: &str| {
            let pm = match Privmsg::parse(line).and_then(|pm| pm.targeted_msg(&plugin.nick)) {
                Some(pm) => pm,
                None => return Response::nothing(),
            };
            let (name, requester) = match (parse_command(pm.msg), pm.sender()) {
                (Some(name), Some(requester)) => (name.to_string(), requester.to_string()),
                _ => return Response::nothing(),
            };

            info!("{} asked for {}.", requester, name);
            let plugin = plugin.clone();
            let replier = replier.clone();
            thread::spawn(move || {
                let reply = plugin.lookup(&name);
                let notice = Notice::new(Dest::Nick(&requester), &reply).format();
                if let Err(e) = replier.send(&notice) {
                    warn!("Could not answer {}: {}", requester, e);
                }
            });
            Response::handled()
        })
    }

}
