use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sysdash::system::{account, process, session};

fn make_ps_output(n: usize) -> String {
    (0..n)
        .map(|i| {
            let rss = if i % 10 == 0 { 0 } else { (n - i) * 1024 };
            let vsz = if rss == 0 { 0 } else { rss * 4 };
            format!(
                "user{}    {}  {:.1}  {:.1} {} {} ?        Ss   Oct16   0:{:02} /usr/bin/proc_{} --work --id {}\n",
                i % 8,
                i + 1,
                (i % 100) as f64 / 10.0,
                (i % 50) as f64 / 10.0,
                vsz,
                rss,
                i % 60,
                i,
                i
            )
        })
        .collect()
}

fn make_w_output(n: usize) -> String {
    (0..n)
        .map(|i| {
            format!(
                "user{i}    pts/{i}    10.0.{}.{}     09:12    3:05   0.21s  0.21s vim /tmp/file{i}\n",
                i / 256,
                i % 256
            )
        })
        .collect()
}

fn make_passwd_output(n: usize) -> String {
    (0..n)
        .map(|i| {
            let kind = if i < 40 { "system" } else { "user" };
            format!("{kind};account{i};Account {i},,,;/home/account{i};/bin/sh\n")
        })
        .collect()
}

fn bench_ps_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("ps_table_500_1000_2000");

    for size in [500usize, 1000, 2000] {
        let output = make_ps_output(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &output, |b, output| {
            b.iter(|| {
                let processes = process::parse_table(black_box(output)).expect("ps rows parse");
                black_box(processes);
            })
        });
    }

    group.finish();
}

fn bench_w_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("w_sessions_50_200");

    for size in [50usize, 200] {
        let output = make_w_output(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &output, |b, output| {
            b.iter(|| {
                let sessions = session::parse(black_box(output)).expect("w rows parse");
                black_box(sessions);
            })
        });
    }

    group.finish();
}

fn bench_account_directory(c: &mut Criterion) {
    let mut group = c.benchmark_group("account_directory_100_1000");

    for size in [100usize, 1000] {
        let output = make_passwd_output(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &output, |b, output| {
            b.iter(|| {
                let users = account::parse(black_box(output)).expect("passwd rows parse");
                black_box(users);
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ps_table,
    bench_w_sessions,
    bench_account_directory
);
criterion_main!(benches);
