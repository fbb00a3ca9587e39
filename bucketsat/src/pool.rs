//! Fixed size pool of worker threads.
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{unbounded, Receiver, Sender};
use log::debug;

type Job<R> = Box<dyn FnOnce() -> R + Send>;

/// Worker threads executing submitted jobs.
///
/// Results are received in the order the jobs finish. A panic inside a job resumes on the thread
/// receiving its result. Dropping the pool raises the cancellation flag and joins all workers.
pub struct WorkerPool<R> {
    jobs: Option<Sender<Job<R>>>,
    results: Receiver<thread::Result<R>>,
    workers: Vec<JoinHandle<()>>,
    cancel: Arc<AtomicBool>,
}

impl<R: Send + 'static> WorkerPool<R> {
    /// Start `size` worker threads.
    pub fn new(size: usize) -> io::Result<WorkerPool<R>> {
        assert!(size > 0, "worker pool without workers");

        let (job_sender, job_receiver) = unbounded::<Job<R>>();
        let (result_sender, result_receiver) = unbounded();

        let mut pool = WorkerPool {
            jobs: Some(job_sender),
            results: result_receiver,
            workers: Vec::with_capacity(size),
            cancel: Arc::new(AtomicBool::new(false)),
        };

        for number in 0..size {
            let jobs = job_receiver.clone();
            let results = result_sender.clone();
            let worker = thread::Builder::new()
                .name(format!("bucketsat-worker-{}", number))
                .spawn(move || {
                    for job in jobs.iter() {
                        let result = panic::catch_unwind(AssertUnwindSafe(job));
                        if results.send(result).is_err() {
                            break;
                        }
                    }
                })?;
            pool.workers.push(worker);
        }

        debug!("Started {} worker threads", size);

        Ok(pool)
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Flag checked by jobs to stop early.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Ask running and queued jobs to stop.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Queue a job for execution.
    pub fn submit(&self, job: impl FnOnce() -> R + Send + 'static) {
        if let Some(jobs) = &self.jobs {
            if jobs.send(Box::new(job)).is_err() {
                panic!("worker threads terminated");
            }
        }
    }

    /// Wait for the next job to finish.
    ///
    /// Resumes the panic of a job that panicked.
    pub fn next_result(&self) -> R {
        match self.results.recv() {
            Ok(Ok(result)) => result,
            Ok(Err(payload)) => panic::resume_unwind(payload),
            Err(_) => panic!("worker threads terminated"),
        }
    }
}

impl<R> Drop for WorkerPool<R> {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        // Workers leave their loop once the job channel is closed and drained.
        self.jobs = None;
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    #[test]
    fn results_in_completion_order() {
        let pool = WorkerPool::new(2).unwrap();
        pool.submit(|| {
            thread::sleep(Duration::from_millis(300));
            1
        });
        pool.submit(|| 2);

        assert_eq!(pool.next_result(), 2);
        assert_eq!(pool.next_result(), 1);
    }

    #[test]
    fn runs_more_jobs_than_workers() {
        let pool = WorkerPool::new(3).unwrap();
        assert_eq!(pool.size(), 3);
        for job in 0..20u64 {
            pool.submit(move || job * job);
        }
        let sum: u64 = (0..20).map(|_| pool.next_result()).sum();
        assert_eq!(sum, (0..20u64).map(|job| job * job).sum());
    }

    #[test]
    #[should_panic(expected = "job failed")]
    fn forwards_panics() {
        let pool = WorkerPool::<()>::new(1).unwrap();
        pool.submit(|| panic!("job failed"));
        pool.next_result();
    }

    #[test]
    fn drop_cancels_jobs() {
        let pool = WorkerPool::new(2).unwrap();
        for _ in 0..4 {
            let cancel = pool.cancel_flag();
            pool.submit(move || {
                while !cancel.load(Ordering::Relaxed) {
                    thread::sleep(Duration::from_millis(1));
                }
            });
        }
        assert!(!pool.is_cancelled());
        drop(pool);
    }
}
