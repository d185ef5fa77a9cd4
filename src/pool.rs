//! Build batches in parallel, completed batches are send to a consumer as soon as they are ready.

/* project use */
use crate::batch;
use crate::config::GenerationConfig;
use crate::error;

/// Fixed number of worker build batch
///
/// Batches are send to consumer by a bounded channel, consumer run on the calling thread.
/// Dispatch is hold when too many batches wait for an earlier one, so memory use doesn't depend on run size.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    worker_count: usize,
    capacity: usize,
}

impl WorkerPool {
    /// Create a pool of `worker_count` threads
    pub fn new(worker_count: usize) -> error::Result<Self> {
        let worker_count = worker_count.max(1);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|index| format!("make_polyx-worker-{}", index))
            .build()
            .map_err(|source| error::Error::WorkerPool { source })?;

        Ok(Self {
            pool,
            worker_count,
            capacity: worker_count * 2,
        })
    }

    /// Number of worker in pool
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Max number of batches dispatch ahead of the first batch not yet delivered
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Build each descriptor exactly once and give each batch to `consumer`
    ///
    /// Batches reach `consumer` in completion order. Descriptors are dispatch in order and at most `2 * worker_count`
    /// batches are in flight or delivered ahead of the first batch not yet delivered.
    /// First error, from a worker or from `consumer`, stop dispatch of new descriptors and is returned when in-flight workers are done.
    pub fn execute<F>(
        &self,
        descriptors: Vec<batch::Descriptor>,
        config: &GenerationConfig,
        mut consumer: F,
    ) -> error::Result<()>
    where
        F: FnMut(batch::Batch) -> error::Result<()>,
    {
        log::debug!(
            "Dispatch {} batches on {} workers",
            descriptors.len(),
            self.worker_count
        );

        self.pool.in_place_scope(|scope| {
            let (sender, receiver) = crossbeam::channel::bounded::<(
                usize,
                error::Result<batch::Batch>,
            )>(self.capacity);

            let mut descriptors = descriptors.into_iter().enumerate();
            let mut dispatched = 0;
            let mut in_flight = 0;
            // every position before `retired` is delivered
            let mut retired = 0;
            let mut delivered = rustc_hash::FxHashSet::default();

            loop {
                while dispatched < retired + self.capacity {
                    let (position, descriptor) = match descriptors.next() {
                        Some(next) => next,
                        None => break,
                    };

                    let sender = sender.clone();
                    scope.spawn(move |_| {
                        let result = batch::build(&descriptor, config);
                        if let Err(e) = &result {
                            log::debug!("Batch {} failed: {}", descriptor.batch_index, e);
                        }

                        // receiver is drop after first error
                        let _ = sender.send((position, result));
                    });

                    dispatched += 1;
                    in_flight += 1;
                }

                if in_flight == 0 {
                    break;
                }

                let (position, result) = match receiver.recv() {
                    Ok(message) => message,
                    Err(_) => break,
                };
                in_flight -= 1;

                if let Err(e) = result.and_then(&mut consumer) {
                    log::debug!("Stop dispatch of batches");
                    return Err(e);
                }

                delivered.insert(position);
                while delivered.remove(&retired) {
                    retired += 1;
                }
            }

            Ok(())
        })
    }
}
