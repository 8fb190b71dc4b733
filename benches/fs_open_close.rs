/* Benchmarks for the fd server. In general, I'm not doing results checking
 * beyond cheap assertions, to avoid adding bias to the results. */

use criterion::{criterion_group, criterion_main, Criterion};

use rustvfs::vfserver::boot;
use rustvfs::vfserver::bootfs::BootfsImage;
use rustvfs::vfserver::syscalls::fs_constants::*;

// Using this to include my criterion settings from a single shared file.
// benches/ isn't in the crate's usual namespace and making a separate crate
// for one tiny file isn't worth it.
mod global_criterion_settings;

pub fn run_benchmark(c: &mut Criterion) {
    // Boot the same way the unit tests do; all system calls are methods of
    // the task object, so that reference is all the benchmarks need.
    let image = BootfsImage::build(&[("/a/file.bin", &[0u8; 4])]);
    let server = boot::boot(&image, &["/a"]).expect("bench boot failed");
    let task = server.task();

    let mut group = c.benchmark_group("fs:open+close");
    group.bench_function("open+close", |b| {
        b.iter(|| {
            let fd = task.open_syscall("/foo", O_CREAT | O_TRUNC | O_WRONLY, S_IRWXA);
            assert!(fd > 2); // Ensure we didn't get an error or an odd fd
            assert_eq!(task.close_syscall(fd), 0); // close the file w/o error
        })
    });
    group.finish();

    let mut group = c.benchmark_group("fs:dup+close");
    let fd = task.open_syscall("/bar", O_CREAT | O_RDWR, S_IRWXA);
    assert!(fd > 2);
    group.bench_function("dup+close", |b| {
        b.iter(|| {
            let dupfd = task.dup_syscall(fd);
            assert!(dupfd > 2);
            assert_eq!(task.close_syscall(dupfd), 0);
        })
    });
    group.finish();
}

criterion_group!(name=benches;
                 // Keep the global settings here so we don't type it everywhere
                 config=global_criterion_settings::get_criterion();
                 targets=run_benchmark);
criterion_main!(benches);
