//! Worker channel - the single owner of the SQLite connection.
//!
//! Every store operation is a closure over `&mut Connection` submitted to
//! one background thread. Operations run one at a time in submission order.
//! Each submission carries its own reply channel, so a caller only ever sees
//! the result of its own operation.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use rusqlite::Connection;

use crate::{Error, Result};

type Job = Box<dyn FnOnce(&mut Connection) -> Option<String> + Send>;

enum Message {
    Run { seq: u64, job: Job },
    Shutdown,
}

/// Where the worker opens its connection
#[derive(Debug, Clone)]
pub enum Location {
    File(PathBuf),
    Memory,
}

impl Location {
    fn open(&self) -> rusqlite::Result<Connection> {
        let conn = match self {
            Location::File(path) => Connection::open(path)?,
            Location::Memory => Connection::open_in_memory()?,
        };
        conn.pragma_update(None, "foreign_keys", "OFF")?;
        Ok(conn)
    }
}

/// Handle to the background store worker
pub struct Worker {
    tx: Sender<Message>,
    handle: Option<JoinHandle<()>>,
    next_seq: std::sync::atomic::AtomicU64,
}

impl Worker {
    /// Spawn the worker and open its connection.
    ///
    /// Returns only after the connection is open, so an unreadable store
    /// file is reported here rather than on the first operation.
    pub fn spawn(location: Location) -> Result<Self> {
        let (tx, rx) = channel::unbounded::<Message>();
        let (ready_tx, ready_rx) = channel::bounded::<std::result::Result<(), String>>(1);

        let handle = thread::Builder::new()
            .name("aufmass-store".to_string())
            .spawn(move || match location.open() {
                Ok(mut conn) => {
                    let _ = ready_tx.send(Ok(()));
                    run_loop(&mut conn, &rx);
                    if let Err((_, e)) = conn.close() {
                        tracing::warn!("Closing store connection failed: {}", e);
                    }
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                }
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                tx,
                handle: Some(handle),
                next_seq: std::sync::atomic::AtomicU64::new(1),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(Error::WorkerFailed(format!("could not open store: {}", e)))
            }
            Err(_) => {
                let _ = handle.join();
                Err(Error::WorkerFailed("store worker exited during startup".into()))
            }
        }
    }

    /// Run `op` on the worker and block until its result arrives.
    pub fn submit<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let seq = self
            .next_seq
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let (reply_tx, reply_rx) = channel::bounded::<Result<T>>(1);

        let job: Job = Box::new(move |conn: &mut Connection| {
            let outcome = op(conn);
            let failure = outcome.as_ref().err().map(|e| e.to_string());
            let _ = reply_tx.send(outcome);
            failure
        });

        self.tx
            .send(Message::Run { seq, job })
            .map_err(|_| Error::WorkerFailed("store worker is shut down".into()))?;

        reply_rx
            .recv()
            .map_err(|_| Error::WorkerFailed(format!("task {} aborted", seq)))?
    }

    /// Stop the worker after the already-queued work and wait for it.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.tx.send(Message::Shutdown);
        if handle.join().is_err() {
            tracing::error!("Store worker thread panicked");
        }
        tracing::debug!("Store worker stopped");
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop(conn: &mut Connection, rx: &Receiver<Message>) {
    for message in rx.iter() {
        match message {
            Message::Shutdown => break,
            Message::Run { seq, job } => {
                match panic::catch_unwind(AssertUnwindSafe(|| job(conn))) {
                    Ok(None) => {}
                    Ok(Some(failure)) => {
                        tracing::error!(task = seq, "Store operation failed: {}", failure);
                    }
                    Err(cause) => {
                        let msg = cause
                            .downcast_ref::<&str>()
                            .map(|s| s.to_string())
                            .or_else(|| cause.downcast_ref::<String>().cloned())
                            .unwrap_or_else(|| "unknown panic".to_string());
                        tracing::error!(task = seq, "Store operation panicked: {}", msg);
                        // a panic can leave a transaction open
                        if !conn.is_autocommit() {
                            let _ = conn.execute_batch("ROLLBACK");
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_submit_returns_result() {
        let worker = Worker::spawn(Location::Memory).unwrap();
        let value: i64 = worker
            .submit(|conn| Ok(conn.query_row("SELECT 40 + 2", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_failure_reaches_only_its_caller() {
        let worker = Worker::spawn(Location::Memory).unwrap();
        let failed = worker.submit(|conn| {
            conn.execute("INSERT INTO missing_table VALUES (1)", [])?;
            Ok(())
        });
        assert!(matches!(failed, Err(Error::Storage(_))));

        let ok: i64 = worker
            .submit(|conn| Ok(conn.query_row("SELECT 1", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(ok, 1);
    }

    #[test]
    fn test_panic_does_not_kill_loop() {
        let worker = Worker::spawn(Location::Memory).unwrap();
        let failed: Result<()> = worker.submit(|_| panic!("boom"));
        assert!(matches!(failed, Err(Error::WorkerFailed(_))));
        assert!(worker.submit(|_| Ok(true)).unwrap());
    }

    #[test]
    fn test_fifo_order_across_threads() {
        let worker = Arc::new(Worker::spawn(Location::Memory).unwrap());
        worker
            .submit(|conn| {
                conn.execute("CREATE TABLE log (n INTEGER)", [])?;
                Ok(())
            })
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let worker = Arc::clone(&worker);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        let n = t * 100 + i;
                        worker
                            .submit(move |conn| {
                                conn.execute("INSERT INTO log (n) VALUES (?1)", [n])?;
                                Ok(())
                            })
                            .unwrap();
                        let seen: i64 = worker
                            .submit(move |conn| {
                                Ok(conn.query_row("SELECT COUNT(*) FROM log WHERE n = ?1", [n], |row| row.get(0))?)
                            })
                            .unwrap();
                        assert_eq!(seen, 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let total: i64 = worker
            .submit(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM log", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let mut worker = Worker::spawn(Location::Memory).unwrap();
        worker.shutdown();
        assert!(!worker.is_running());
        assert!(matches!(worker.submit(|_| Ok(())), Err(Error::WorkerFailed(_))));
    }
}
