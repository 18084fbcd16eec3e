use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use configs::Limits;
use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::repository::mock::MockAuthRepository;
use service::auth::AuthService;

fn bench_authenticate(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let svc = AuthService::new(repo, Arc::new(Limits::default()));

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(svc.register(RegisterInput { username: "bencher".into(), password: "Benchmark1".into() })).unwrap();

    c.bench_function("auth_known_user", |b| {
        b.iter(|| {
            let found = rt
                .block_on(svc.authenticate(LoginInput { username: "bencher".into(), password: "Benchmark1".into() }))
                .unwrap();
            assert!(found.is_some());
        });
    });

    // should cost about the same as the known-user path
    c.bench_function("auth_unknown_user", |b| {
        b.iter(|| {
            let found = rt
                .block_on(svc.authenticate(LoginInput { username: "nobody".into(), password: "Benchmark1".into() }))
                .unwrap();
            assert!(found.is_none());
        });
    });
}

criterion_group!(benches, bench_authenticate);
criterion_main!(benches);
