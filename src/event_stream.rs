use regex::Regex;
use std::io;
use std::io::prelude::*;
use std::str::from_utf8;
use std::sync::{Arc, Mutex, PoisonError};
use std::sync::mpsc;
use std::sync::mpsc::{channel, Sender, Receiver};
use std::thread;
use super::channels;

/// What should we do next?
pub enum Action {
    /// Don't run any more handlers on this line.
    Skip,
    /// Try the rest of the handlers on this line.
    Continue,
    /// Quit the event loop.
    Stop,
}

pub enum HandlerAction {
    Add(Handler),
    Swap(Handler),
    Keep,
    Remove,
}

/// Optionally respond with a message, then take the given next `Action`.
pub struct Response(pub Option<String>, pub HandlerAction, pub Action);

impl Response {

    pub fn respond(s: String) -> Response {
        Response(Some(s), HandlerAction::Keep, Action::Skip)
    }

    pub fn nothing() -> Response {
        Response(None, HandlerAction::Keep, Action::Continue)
    }

    /// Handled the line without anything to say right now, e.g. because
    /// the answer will be sent later through a `Replier`.
    pub fn handled() -> Response {
        Response(None, HandlerAction::Keep, Action::Skip)
    }
}

/// A `Handler` examines a line of input read from a stream, and
/// produces an optional `Response` to send, an additional `Handler`
/// to install (perhaps to wait for a response), and a next `Action`
/// to take after processing the line.
pub type Handler = Box<dyn FnMut(&str) -> Response + Send>;

/// Sends lines to the server from outside the event loop, for example
/// from a thread doing a slow lookup.  Cheap to clone.
#[derive(Clone)]
pub struct Replier {
    writer: Sender<String>,
}

impl Replier {

    pub fn new(writer: Sender<String>) -> Replier {
        Replier{ writer: writer }
    }

    /// Sends one IRC command; the line terminator is added here.
    pub fn send(&self, msg: &str) -> io::Result<()> {
        self.writer.send(format!("{}\r\n", msg))
            .map_err(|_| io::Error::new(io::ErrorKind::NotConnected, "Send failed, channel is disconnected."))
    }

}

/// `EventStream` wraps a stream and will loop, reading lines and
/// processing them with `Handler`s, which are allowed to write back
/// to the stream and install additional `Handler`s.
///
/// It implements `Write` so you can still write manually, and you can
/// install additional `Handler`s when you want.
pub struct EventStream {
    writer: Sender<String>,
    handlers: Arc<Mutex<Vec<Handler>>>,
}

impl EventStream {

    /// Creates a new event stream with initial handlers.  You should
    /// pass the `Read` and `Write` parts separately, for example using
    /// `TcpStream::try_clone`.
    pub fn new<R: Read + Send + 'static, W: Write + Send + 'static>(inner_reader: R, inner_writer: W, init_handlers: Vec<Handler>) -> (EventStream, thread::JoinHandle<()>) {
        let reader = channels::reader(inner_reader);
        let writer = channels::writer(inner_writer);
        let handlers = Arc::new(Mutex::new(init_handlers));
        let thread_writer = writer.clone();
        let thread_handlers = handlers.clone();
        let join_handle = thread::spawn(move || {
            match event_loop(reader, thread_writer, thread_handlers) {
                Err(channels::ChanError::SendError(mpsc::SendError(l))) => {
                    error!("Send of \"{}\" failed, channel is disconnected.", l.trim());
                },
                Err(channels::ChanError::RecvError(_)) => {
                    error!("Receive on channel failed, channel is disconnected.");
                },
                Ok(()) => (),
            }
        });
        let stream = EventStream{
            writer: writer,
            handlers: handlers,
        };
        (stream, join_handle)
    }

    pub fn add_handler(&mut self, handler: Handler) {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner).push(handler);
    }

    pub fn replier(&self) -> Replier {
        Replier::new(self.writer.clone())
    }

    /// Installs a one-shot handler per regex.  Each returned `Receiver`
    /// yields the first line matching its regex.
    pub fn await_lines(&mut self, expectations: Vec<Regex>) -> Vec<Receiver<String>> {
        expectations.into_iter().map(|expectation| {
            let (tx, rx) = channel();
            self.add_handler(Box::new(move |line: &str| {
                if expectation.is_match(line) {
                    if tx.send(line.to_string()).is_err() {
                        debug!("Nobody is waiting for \"{}\" anymore.", line);
                    }
                    Response(None, HandlerAction::Remove, Action::Skip)
                } else {
                    Response::nothing()
                }
            }));
            rx
        }).collect()
    }

}

impl Write for EventStream {

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = from_utf8(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
            .to_string();
        self.writer.send(line)
            .map(|_| buf.len())
            .map_err(|_| io::Error::new(io::ErrorKind::NotConnected, "Send failed, channel is disconnected."))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

}

fn process_one_event(line: &str, writer: &Sender<String>, handlers: &mut Vec<Handler>) -> Result<Action, mpsc::SendError<String>> {
    let mut i: usize = 0;
    while i < handlers.len() {
        let Response(msg, handler_action, action) = {
            let h = &mut handlers[i];
            h(line)
        };
        // Send a message, if any.
        if let Some(m) = msg {
            writer.send(m)?;
        }
        // Modify handlers, if needed.  A removed handler's slot is taken
        // by the last one, which still has to see this line.
        match handler_action {
            HandlerAction::Add(h) => {
                handlers.push(h);
                i += 1;
            },
            HandlerAction::Swap(h) => {
                handlers[i] = h;
                i += 1;
            },
            HandlerAction::Remove => {
                drop(handlers.swap_remove(i));
            },
            HandlerAction::Keep => {
                i += 1;
            },
        };
        // Exit early, if requested.
        match action {
            Action::Continue => (),
            _ => {
                return Ok(action);
            },
        };
    }
    Ok(Action::Continue)
}

fn event_loop(reader: Receiver<String>, writer: Sender<String>, handlers: Arc<Mutex<Vec<Handler>>>) -> Result<(), channels::ChanError<String>> {
    loop {
        let line = reader.recv()?;
        let mut handlers = handlers.lock().unwrap_or_else(PoisonError::into_inner);
        if let Action::Stop = process_one_event(&line, &writer, &mut handlers)? {
            info!("Exiting event loop...");
            break;
        }
    }
    Ok(())
}
