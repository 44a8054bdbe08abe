//! Fire-and-forget disk persistence.
//!
//! `put` must never block on disk I/O, so saves are queued over an MPSC
//! channel to a single writer thread that owns all disk writes. Dropping
//! the queue closes the channel; the writer drains what is queued and
//! exits, so pending saves are not lost on clean shutdown.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use armory_core::AssetRecord;

use crate::disk::DiskTier;

enum Job {
    Save(String, AssetRecord),
    /// Ack once every job queued before this one has been written.
    Flush(Sender<()>),
}

pub struct PersistQueue {
    sender: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl PersistQueue {
    pub fn new(disk: Arc<DiskTier>) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let handle = thread::spawn(move || Self::writer_thread(disk, receiver));
        Self {
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    /// Queues a save and returns immediately.
    pub fn queue_save(&self, key: String, record: AssetRecord) {
        if let Some(sender) = &self.sender {
            // Send only fails when the writer is gone (shutdown); the save
            // becomes a dropped best-effort write, same as an I/O failure.
            let _ = sender.send(Job::Save(key, record));
        }
    }

    /// Blocks until every save queued before this call has hit disk.
    pub fn flush(&self) {
        if let Some(sender) = &self.sender {
            let (ack, done) = mpsc::channel();
            if sender.send(Job::Flush(ack)).is_ok() {
                let _ = done.recv();
            }
        }
    }

    fn writer_thread(disk: Arc<DiskTier>, receiver: Receiver<Job>) {
        let mut written = 0usize;
        for job in receiver {
            match job {
                Job::Save(key, record) => {
                    disk.save(&key, &record);
                    written += 1;
                }
                Job::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
        debug!(written, "persist queue drained");
    }
}

impl Drop for PersistQueue {
    fn drop(&mut self) {
        // Closing the channel lets the writer drain and exit.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
