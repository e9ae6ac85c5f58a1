use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use log::{debug, warn};

/// Everything the reading phase can observe. Lines and Ctrl-C arrive on the
/// same channel so an interrupt ends reading even while stdin is blocked.
#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    End,
    Interrupted,
}

/// Sends each line of `reader` as an event, then `End`. Bytes that are not
/// valid UTF-8 are replaced rather than aborting the transfer, since only hex
/// digits survive filtering anyway.
pub fn forward_lines<R: BufRead>(mut reader: R, tx: &Sender<InputEvent>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).into_owned();
                if tx.send(InputEvent::Line(line)).is_err() {
                    // receiver stopped listening
                    return;
                }
            }
            Err(e) => {
                warn!("Reading input failed, treating as end of input: {}", e);
                break;
            }
        }
    }
    let _ = tx.send(InputEvent::End);
}

/// Starts the stdin reader thread and installs the Ctrl-C handler. The reader
/// thread is detached: after an interrupt it may still be parked in a read.
pub fn listen_stdin() -> Receiver<InputEvent> {
    let (tx, rx) = mpsc::channel();

    let interrupt_tx = tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(InputEvent::Interrupted);
    }) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    thread::spawn(move || {
        let stdin = std::io::stdin();
        forward_lines(stdin.lock(), &tx);
        debug!("stdin reached end of stream");
    });

    rx
}
