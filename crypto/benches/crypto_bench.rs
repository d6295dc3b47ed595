use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn pss_verify_bench(c: &mut Criterion) {
    let kp = devreg_crypto::generate_keypair(devreg_crypto::DEFAULT_KEY_BITS).unwrap();
    let msg = [42u8; 128];
    let sig = devreg_crypto::sign_message(&msg, &kp.private).unwrap();

    c.bench_function("rsa_pss_verify_2048_128B", |b| {
        b.iter(|| devreg_crypto::verify_signature(&kp.public, black_box(&msg), &sig))
    });
}

fn evidence_verify_bench(c: &mut Criterion) {
    let kp = devreg_crypto::generate_keypair(devreg_crypto::DEFAULT_KEY_BITS).unwrap();
    let sig = devreg_crypto::sign_evidence("QmBenchPhoto", "bench", "1700000000", &kp.private)
        .unwrap();

    c.bench_function("rsa_pss_verify_evidence", |b| {
        b.iter(|| {
            devreg_crypto::verify_evidence(
                &kp.public,
                black_box("QmBenchPhoto"),
                "bench",
                "1700000000",
                &sig,
            )
        })
    });
}

fn sha256_1kb_bench(c: &mut Criterion) {
    let data = vec![0xCDu8; 1024];

    c.bench_function("sha256_1KB", |b| {
        b.iter(|| devreg_crypto::sha256(black_box(&data)))
    });
}

criterion_group!(benches, pss_verify_bench, evidence_verify_bench, sha256_1kb_bench);
criterion_main!(benches);
