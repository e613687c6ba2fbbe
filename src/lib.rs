//! Provides some basic functionality for connecting to IRC servers
//! and answering questions about PHP functions from the PHP manual.
//!
//! # Example:
//! ```no_run
//! use std::sync::Arc;
//! use irc_phpdoc::php::{ManualSource, ManualSourceConfig};
//! use irc_phpdoc::plugin::PhpPlugin;
//!
//! let addr = ("irc.libera.chat", 6667);
//! let nick = "phpbot_test";
//! let channels = ["#phpbot_test"];
//!
//! let source = ManualSource::from_config(&ManualSourceConfig::default())
//!     .expect("Bad manual configuration.");
//!
//! let (mut client, join_handle) = irc_phpdoc::Client::connect(
//!     &addr, nick, &channels, "phpbot", "php manual robot")
//!     .expect("Error connecting.");
//!
//! let replier = client.replier();
//! client.add_handler(PhpPlugin::new(Arc::new(source), nick).handler(replier));
//! join_handle.join().unwrap();
//! ```

use event_stream::{Handler, EventStream, Replier, Response};
use std::fmt;
use std::io;
use std::net;
use std::thread;

mod channels;
pub mod error;
pub mod event_stream;
pub mod php;
pub mod plugin;
pub mod protocol;

#[macro_use]
extern crate log;

/// The top-level IRC client.
pub struct Client {
    stream: EventStream,
    server: String,
}

impl Client {

    /// Connects to an IRC server.
    ///
    /// Returns a `Client` object to which you can add handlers, and a
    /// `thread::JoinHandle` which will join when the thread handling
    /// IRC events finishes.
    pub fn connect<A: net::ToSocketAddrs + fmt::Debug>(addr: &A,
                                                       nick: &str, channels: &[&str],
                                                       user: &str, realname: &str) -> io::Result<(Client, thread::JoinHandle<()>)> {
        Client::connect_mode(addr, nick, channels, user, realname, false, true)
    }

    /// Connects to an IRC server with additional options `invisible` and `wallops`.
    ///
    /// See `Client::connect` and the IRC protocol RFC for details.
    pub fn connect_mode<A: net::ToSocketAddrs + fmt::Debug>(addr: &A,
                                                            nick: &str, channels: &[&str],
                                                            user: &str, realname: &str,
                                                            invisible: bool, wallops: bool) -> io::Result<(Client, thread::JoinHandle<()>)> {
        let default_handlers: Vec<Handler> = vec![
            Box::new(protocol::pong_handler) as Handler,
            Box::new(protocol::timeout_handler) as Handler,
            ];

        debug!("Connecting to {:?}...", addr);
        let conn = net::TcpStream::connect(addr)?;
        let conn_copy = conn.try_clone()?;

        let (mut stream, join_handle) = EventStream::new(conn, conn_copy, default_handlers);
        info!("Connected to {:?}!", addr);

        let server = protocol::login(&mut stream, nick, user, realname, invisible, wallops)?;
        info!("Logged in at \"{}\"!", server);

        protocol::join(&mut stream, channels)?;

        let client = Client{
            stream: stream,
            server: server,
        };
        Ok((client, join_handle))
    }

    /// The name the server gave itself when we logged in.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Adds a new handler to the event loop.  Lines it responds with
    /// are terminated before being sent.
    pub fn add_handler(&mut self, handler: Handler) {
        let mut handler_mut = handler;
        self.stream.add_handler(Box::new(move |line: &str| {
            let Response(msg, ha, a) = handler_mut(line);
            Response(msg.map(|s| format!("{}\r\n", s)), ha, a)
        }));
    }

    /// A handle for sending lines from other threads.
    pub fn replier(&self) -> Replier {
        self.stream.replier()
    }

}

impl Drop for Client {

    /// Sends a QUIT message before dropping.
    fn drop(&mut self) {
        use std::io::Write;

        info!("Quitting from server...");
        if let Err(e) = write!(&mut self.stream, "QUIT :adios\r\n") {
            error!("Error quitting: {:?}", e);
        }
    }

}
