use regex::Regex;
use std::io;
use std::io::prelude::*;
use std::sync::LazyLock;
use super::event_stream::{Action, HandlerAction, Response, EventStream};

static MODE_WALLOPS: u16 = 4;
static MODE_INVISIBLE: u16 = 8;

static WELCOME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^:([^\s]+)\s+001\s").expect("welcome regex"));
static USER_INFO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\[\]\\`_^{|}a-zA-Z][\[\]\\`_^{|}a-zA-Z0-9-]*)((!([^ @]+))?@(.*))?$").expect("user info regex")
});
static CHAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[#+&!][^,:]+$").expect("channel regex"));
static PRIVMSG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:([^\s]+)\s+PRIVMSG\s+([^\s]+)\s+:?(.*)$").expect("privmsg regex")
});

fn mode_for(invisible: bool, wallops: bool) -> u16 {
    (if invisible { MODE_INVISIBLE } else { 0 }) + (if wallops { MODE_WALLOPS } else { 0 })
}

fn disconnected<E>(_: E) -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "Connection closed while waiting for the server.")
}

pub fn pong_handler(line: &str) -> Response {
    if line.starts_with("PING") {
        let resp = format!("PONG {}\r\n", line.split(' ').nth(1).unwrap_or(""));
        Response::respond(resp)
    } else {
        Response::nothing()
    }
}

pub fn timeout_handler(line: &str) -> Response {
    if line.starts_with("ERROR :Closing Link:") {
        Response(None, HandlerAction::Keep, Action::Stop)
    } else {
        Response::nothing()
    }
}

/// Registers with the server and waits for its welcome.  Returns the
/// name the server calls itself.
pub fn login(stream: &mut EventStream, nick: &str,
             user: &str, realname: &str,
             invisible: bool, wallops: bool) -> io::Result<String> {
    let mut server_responses = stream.await_lines(vec![Regex::clone(&WELCOME_RE)]);

    write!(stream, "NICK {}\r\n", nick)?;
    write!(stream, "USER {} {} * :{}\r\n", user, mode_for(invisible, wallops), realname)?;

    let welcome = server_responses.remove(0).recv().map_err(disconnected)?;
    WELCOME_RE.captures(&welcome)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, format!("Bad welcome \"{}\"", welcome)))
}

pub fn join(stream: &mut EventStream, channels: &[&str]) -> io::Result<()> {
    let regexes = channels.iter()
        .map(|chan| Regex::new(&format!(r"JOIN\s+:?{}$", regex::escape(chan))))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let responses = stream.await_lines(regexes);

    for chan in channels.iter() {
        info!("Joining channel {}...", chan);
        write!(stream, "JOIN {}\r\n", chan)?;
    }
    for (chan, response) in channels.iter().zip(responses) {
        response.recv().map_err(disconnected)?;
        info!("Joined channel {}!", chan);
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UserInfo<'a> {
    pub nick: &'a str,
    pub user: Option<&'a str>,
    pub host: Option<&'a str>,
}

impl<'a> UserInfo<'a> {

    pub fn parse(s: &'a str) -> Option<UserInfo<'a>> {
        USER_INFO_RE.captures(s).and_then(|c| {
            Some(UserInfo{
                nick: c.get(1)?.as_str(),
                user: c.get(4).map(|m| m.as_str()),
                host: c.get(5).map(|m| m.as_str()),
            })
        })
    }

}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Source<'a> {
    Server(&'a str),
    User(UserInfo<'a>),
}

impl<'a> Source<'a> {

    pub fn parse(s: &'a str) -> Source<'a> {
        UserInfo::parse(s).map(Source::User)
            .unwrap_or(Source::Server(s))
    }

    pub fn nick(&self) -> Option<&'a str> {
        match *self {
            Source::User(ref user_info) => Some(user_info.nick),
            Source::Server(_) => None,
        }
    }

}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Dest<'a> {
    Nick(&'a str),
    Chan(&'a str),
}

impl<'a> Dest<'a> {

    pub fn parse(s: &'a str) -> Dest<'a> {
        if CHAN_RE.is_match(s) {
            Dest::Chan(s)
        } else {
            Dest::Nick(s)
        }
    }

    pub fn format(&self) -> String {
        match *self {
            Dest::Nick(n) => n.to_string(),
            Dest::Chan(c) => c.to_string(),
        }
    }

}

pub struct Privmsg<'a> {
    pub src: Option<Source<'a>>,
    pub dst: Dest<'a>,
    pub msg: &'a str,
}

impl<'a> Privmsg<'a> {

    pub fn parse(line: &'a str) -> Option<Privmsg<'a>> {
        let c = PRIVMSG_RE.captures(line)?;
        Some(Privmsg{
            src: Some(Source::parse(c.get(1)?.as_str())),
            dst: Dest::parse(c.get(2)?.as_str()),
            msg: c.get(3)?.as_str(),
        })
    }

    /// The nick of the user who sent this, if it came from a user.
    pub fn sender(&self) -> Option<&'a str> {
        self.src.and_then(|src| src.nick())
    }

    /// Keeps only messages meant for `nick`: private messages, and
    /// channel messages starting with `nick:` or `nick,`, which get that
    /// prefix removed.
    pub fn targeted_msg(self, nick: &str) -> Option<Privmsg<'a>> {
        match self.dst {
            Dest::Nick(n) if n == nick => Some(self),
            Dest::Nick(_) => None,
            Dest::Chan(_) => {
                let re = Regex::new(&format!(r"(?i)^{}[:,]?\s+(.*?)\s*$", regex::escape(nick))).ok()?;
                let msg = re.captures(self.msg)?.get(1)?.as_str();
                Some(Privmsg{
                    src: self.src,
                    dst: self.dst,
                    msg: msg,
                })
            },
        }
    }

}

pub struct Notice<'a> {
    pub dst: Dest<'a>,
    pub msg: &'a str,
}

impl<'a> Notice<'a> {

    pub fn new(dst: Dest<'a>, msg: &'a str) -> Notice<'a> {
        Notice{
            dst: dst,
            msg: msg,
        }
    }

    pub fn format(&self) -> String {
        format!("NOTICE {} :{}", self.dst.format(), self.msg)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes() {
        assert_eq!(mode_for(false, false), 0);
        assert_eq!(mode_for(true, false), 8);
        assert_eq!(mode_for(false, true), 4);
        assert_eq!(mode_for(true, true), 12);
    }

    #[test]
    fn pong_echoes_token() {
        match pong_handler("PING :irc.example.net") {
            Response(Some(s), _, Action::Skip) => assert_eq!(s, "PONG :irc.example.net\r\n"),
            _ => panic!("expected a PONG"),
        }
        assert!(matches!(pong_handler(":a PRIVMSG #b :PING"), Response(None, _, Action::Continue)));
    }

    #[test]
    fn closing_link_stops() {
        assert!(matches!(timeout_handler("ERROR :Closing Link: bot (Ping timeout)"), Response(None, _, Action::Stop)));
        assert!(matches!(timeout_handler("ERROR :something else"), Response(None, _, Action::Continue)));
    }

    #[test]
    fn parses_channel_privmsg() {
        let pm = Privmsg::parse(":alice!ali@example.org PRIVMSG #php :phpbot: php strlen").unwrap();
        assert_eq!(pm.src, Some(Source::User(UserInfo{ nick: "alice", user: Some("ali"), host: Some("example.org") })));
        assert_eq!(pm.dst, Dest::Chan("#php"));
        assert_eq!(pm.msg, "phpbot: php strlen");
        assert_eq!(pm.sender(), Some("alice"));
    }

    #[test]
    fn server_sources() {
        assert_eq!(Source::parse("irc.example.net"), Source::Server("irc.example.net"));
        assert_eq!(Source::parse("irc.example.net").nick(), None);
    }

    #[test]
    fn private_messages_are_targeted() {
        let pm = Privmsg::parse(":bob!b@host PRIVMSG phpbot :php strpos").unwrap();
        assert_eq!(pm.sender(), Some("bob"));
        let pm = pm.targeted_msg("phpbot").unwrap();
        assert_eq!(pm.msg, "php strpos");
    }

    #[test]
    fn targeted_channel_messages() {
        for line in [":bob!b@h PRIVMSG #c :phpbot: php strlen ",
                     ":bob!b@h PRIVMSG #c :PhpBot, php strlen",
                     ":bob!b@h PRIVMSG #c :phpbot php strlen"] {
            let pm = Privmsg::parse(line).unwrap().targeted_msg("phpbot").unwrap();
            assert_eq!(pm.msg, "php strlen");
        }
        assert!(Privmsg::parse(":bob!b@h PRIVMSG #c :php strlen").unwrap().targeted_msg("phpbot").is_none());
        assert!(Privmsg::parse(":bob!b@h PRIVMSG other :hi").unwrap().targeted_msg("phpbot").is_none());
    }

    #[test]
    fn nicks_with_regex_characters() {
        let pm = Privmsg::parse(":bob!b@h PRIVMSG #c :[bot]: php strlen").unwrap();
        assert_eq!(pm.targeted_msg("[bot]").unwrap().msg, "php strlen");
    }

    #[test]
    fn formatting() {
        assert_eq!(Notice::new(Dest::Chan("#php"), "hi").format(), "NOTICE #php :hi");
        assert_eq!(Notice::new(Dest::Nick("alice"), "strlen(string $string): int").format(),
                   "NOTICE alice :strlen(string $string): int");
    }
}
