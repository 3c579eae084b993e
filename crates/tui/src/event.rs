use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use log::{debug, error};
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::store;

/// An event our app may receive
#[derive(Debug)]
pub enum Event {
    /// Key press.
    Key(KeyEvent),

    /// Terminal resize. We redraw anyway, so this only wakes the loop up.
    Resize,

    /// A result from the store worker.
    Store(store::Event),
}

/// The event bus aggregates events from multiple threads, and joins them all back when dropped.
#[derive(Debug)]
pub struct EventBus {
    sender: mpsc::Sender<Event>,
    receiver: mpsc::Receiver<Event>,
    running: Arc<AtomicBool>,
    handles: RefCell<Vec<thread::JoinHandle<()>>>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(true)),
            handles: Default::default(),
        }
    }

    /// Receive the next event, blocking until there is one.
    pub fn next(&self) -> Result<Event> {
        Ok(self.receiver.recv()?)
    }

    /// Spawn a new thread that can publish to this event bus
    pub fn spawn<F>(&self, name: impl ToString, f: F)
    where
        F: 'static + Send + FnOnce(Arc<AtomicBool>, Sender<Event>),
    {
        let sender = self.sender.clone();
        let running = self.running.clone();
        let name = name.to_string();
        match thread::Builder::new()
            .name(name.clone())
            .spawn(move || f(running, sender))
        {
            Ok(h) => self.handles.borrow_mut().push(h),
            Err(e) => error!("couldn't spawn thread {}: {}", name, e),
        }
    }

    /// Spawn a thread to publish terminal events to this bus
    pub fn spawn_terminal_listener(&self) {
        self.spawn("terminal_events", |running, sender| {
            if let Err(e) = Self::terminal_events(running, sender) {
                error!("terminal listener stopped: {:?}", e);
            }
        })
    }

    /// Polls for terminal events and sends them to the given sender, until we stop running.
    fn terminal_events(running: Arc<AtomicBool>, sender: Sender<Event>) -> Result<()> {
        while running.load(Ordering::Relaxed) {
            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            match event::read()? {
                CrosstermEvent::Key(e) => sender.send(Event::Key(e))?,
                CrosstermEvent::Resize(_, _) => sender.send(Event::Resize)?,
                _ => (),
            }
        }

        Ok(())
    }
}

impl Drop for EventBus {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);

        // The store worker exits once the store's sender is dropped, which happens before this.
        self.handles.borrow_mut().drain(..).for_each(|h| {
            debug!("joining thread {:?}", h.thread().name());
            if h.join().is_err() {
                error!("thread panicked");
            }
        });
    }
}
