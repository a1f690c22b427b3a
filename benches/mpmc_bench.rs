use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ring_queue::{QueueConfig, RingQueue, WaitStrategy};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const ITEMS_PER_THREAD_TARGET: usize = 20_000;
const THREAD_COUNTS_TO_TEST: &[(usize, usize)] = &[(1, 1), (2, 2), (4, 4)];
const MAX_BENCH_SPIN_RETRY_ATTEMPTS: usize = 100_000_000;

trait BenchMpmcQueue<T: Send>: Send + Sync + 'static {
    fn bench_push(&self, item: T);
    fn bench_pop(&self) -> Option<T>;
}

impl<T: Send + 'static> BenchMpmcQueue<T> for RingQueue<T> {
    fn bench_push(&self, item: T) {
        self.push(item)
    }

    fn bench_pop(&self) -> Option<T> {
        self.pop()
    }
}

// Baseline: the standard blocking mutex around a VecDeque.
struct MutexDeque<T>(Mutex<VecDeque<T>>);

impl<T: Send + 'static> BenchMpmcQueue<T> for MutexDeque<T> {
    fn bench_push(&self, item: T) {
        if let Ok(mut q) = self.0.lock() {
            q.push_back(item);
        }
    }

    fn bench_pop(&self) -> Option<T> {
        self.0.lock().ok()?.pop_front()
    }
}

fn run_mpmc<Q: BenchMpmcQueue<usize>>(
    queue: Arc<Q>,
    num_producers: usize,
    num_consumers: usize,
    items_per_thread: usize,
) -> Duration {
    let total_items = num_producers * items_per_thread;
    let consumed = Arc::new(AtomicUsize::new(0));
    let gave_up = Arc::new(AtomicBool::new(false));
    let start = Arc::new(Barrier::new(num_producers + num_consumers + 1));
    let mut handles = Vec::with_capacity(num_producers + num_consumers);

    for producer_id in 0..num_producers {
        let queue = Arc::clone(&queue);
        let start = Arc::clone(&start);
        handles.push(thread::spawn(move || {
            start.wait();
            for i in 0..items_per_thread {
                queue.bench_push(producer_id * items_per_thread + i);
            }
        }));
    }

    for _ in 0..num_consumers {
        let queue = Arc::clone(&queue);
        let start = Arc::clone(&start);
        let consumed = Arc::clone(&consumed);
        let gave_up = Arc::clone(&gave_up);
        handles.push(thread::spawn(move || {
            start.wait();
            let mut spins = 0;
            while consumed.load(Ordering::Relaxed) < total_items {
                match queue.bench_pop() {
                    Some(item) => {
                        std::hint::black_box(item);
                        consumed.fetch_add(1, Ordering::Relaxed);
                        spins = 0;
                    }
                    None => {
                        spins += 1;
                        if spins > MAX_BENCH_SPIN_RETRY_ATTEMPTS {
                            gave_up.store(true, Ordering::Relaxed);
                            break;
                        }
                        std::hint::spin_loop();
                    }
                }
            }
        }));
    }

    start.wait();
    let t0 = Instant::now();
    for handle in handles {
        handle.join().expect("bench thread panicked");
    }
    let elapsed = t0.elapsed();

    if gave_up.load(Ordering::Relaxed) {
        eprintln!(
            "warning: consumer gave up after {} empty polls ({} of {} items consumed)",
            MAX_BENCH_SPIN_RETRY_ATTEMPTS,
            consumed.load(Ordering::Relaxed),
            total_items
        );
    }
    elapsed
}

fn ring_queue(wait: WaitStrategy) -> Arc<RingQueue<usize>> {
    let queue = RingQueue::with_config(0, QueueConfig::new().with_wait(wait));
    // start from the empty residual state
    let _ = queue.pop();
    Arc::new(queue)
}

fn bench_mpmc(c: &mut Criterion) {
    let mut group = c.benchmark_group("MPMC");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    let strategies = [
        ("RingQueue/Spin", WaitStrategy::Spin),
        ("RingQueue/Backoff", WaitStrategy::Backoff),
        ("RingQueue/SpinThenYield", WaitStrategy::SpinThenYield { spins: 64 }),
    ];

    for &(producers, consumers) in THREAD_COUNTS_TO_TEST {
        let param = format!("{}P_{}C", producers, consumers);

        for (name, wait) in strategies {
            group.bench_function(BenchmarkId::new(name, &param), |b| {
                b.iter_custom(|iters| {
                    let mut total = Duration::ZERO;
                    for _ in 0..iters {
                        total += run_mpmc(
                            ring_queue(wait),
                            producers,
                            consumers,
                            ITEMS_PER_THREAD_TARGET,
                        );
                    }
                    total
                })
            });
        }

        group.bench_function(BenchmarkId::new("MutexVecDeque", &param), |b| {
            b.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let queue = Arc::new(MutexDeque(Mutex::new(VecDeque::new())));
                    total += run_mpmc(queue, producers, consumers, ITEMS_PER_THREAD_TARGET);
                }
                total
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mpmc);
criterion_main!(benches);
