use std::io;
use std::io::prelude::*;
use std::sync::mpsc;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

#[derive(Debug)]
pub enum ChanError<T> {
    RecvError(mpsc::RecvError),
    SendError(mpsc::SendError<T>),
}

impl<T> From<mpsc::SendError<T>> for ChanError<T> {
    fn from(e: mpsc::SendError<T>) -> ChanError<T> {
        ChanError::SendError(e)
    }
}

impl<T> From<mpsc::RecvError> for ChanError<T> {
    fn from(e: mpsc::RecvError) -> ChanError<T> {
        ChanError::RecvError(e)
    }
}

fn reader_loop<R: Read>(r: R, tx: Sender<String>) -> io::Result<()> {
    let mut reader = io::BufReader::new(r);
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            debug!("Reached end of stream.");
            return Ok(());
        }
        let line = line.trim().to_string();
        debug!("Read \"{}\".", line);
        if let Err(mpsc::SendError(l)) = tx.send(line) {
            debug!("Send of \"{}\" failed, channel is disconnected.", l);
            return Ok(());
        }
    }
}

/// Reads lines from the provided `Read` and sends them into a
/// channel.  Returns the `Receiver` of that channel.
pub fn reader<R: Read + Send + 'static>(r: R) -> Receiver<String> {
    let (tx, rx) = channel();
    thread::spawn(move || {
        if let Err(e) = reader_loop(r, tx) {
            error!("Fatal I/O error \"{:?}\".", e);
        }
    });
    rx
}

fn writer_loop<W: Write>(w: W, rx: Receiver<String>) -> io::Result<()> {
    let mut writer = io::LineWriter::new(w);
    for line in rx.iter() {
        debug!("Sending \"{}\"...", line.trim());
        writer.write_all(line.as_bytes())?;
    }
    Ok(())
}

/// Creates a channel that will write lines it receives to the
/// provided `Write`.  Returns the `Sender` half of the channel.
pub fn writer<W: Write + Send + 'static>(w: W) -> Sender<String> {
    let (tx, rx) = channel();
    thread::spawn(move || {
        if let Err(e) = writer_loop(w, rx) {
            error!("Fatal I/O error \"{:?}\".", e);
        }
    });
    tx
}
