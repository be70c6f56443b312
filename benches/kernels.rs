use archmage::SimdToken;
use criterion::{BenchmarkGroup, Criterion, Throughput, measurement::WallTime};
use pixmill::{FilterMode, Plane, PlaneMut, YuvConstants};

// === SIMD tier detection ===

fn probe<T: SimdToken>() -> &'static str {
    if T::summon().is_some() {
        "available"
    } else {
        "not available"
    }
}

fn print_simd_info() {
    eprintln!("=== SIMD Tier Detection ===");
    #[cfg(target_arch = "x86_64")]
    {
        eprintln!(
            "  AVX2+FMA (x86-64-v3):    {}",
            probe::<archmage::X64V3Token>()
        );
    }
    #[cfg(target_arch = "aarch64")]
    {
        eprintln!(
            "  Arm64-v2:                {}",
            probe::<archmage::Arm64V2Token>()
        );
    }
    eprintln!("  Scalar:                  always available");
    eprintln!("===========================");
}

fn disable_all_simd() {
    let _ = archmage::dangerously_disable_tokens_except_wasm(true);
}

fn enable_all_simd() {
    let _ = archmage::dangerously_disable_tokens_except_wasm(false);
}

// === Naive baselines ===

fn naive_transpose(src: &[u8], dst: &mut [u8], w: usize, h: usize) {
    for y in 0..h {
        for x in 0..w {
            dst[x * h + y] = src[y * w + x];
        }
    }
}

fn naive_sse(a: &[u8], b: &[u8]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            (d * d) as u64
        })
        .sum()
}

// === Benchmark helpers ===

const W: usize = 1920;
const H: usize = 1080;

fn pattern(n: usize, seed: usize) -> Vec<u8> {
    (0..n).map(|i| ((i * 7 + seed) % 251) as u8).collect()
}

/// Run `f` once with the best tier and once with SIMD disabled.
fn bench_tiers(group: &mut BenchmarkGroup<WallTime>, mut f: impl FnMut()) {
    group.bench_function("pixmill", |b| b.iter(&mut f));

    disable_all_simd();
    group.bench_function("pixmill_scalar", |b| b.iter(&mut f));
    enable_all_simd();
}

// === Benchmark groups ===

fn bench_i422_to_argb(c: &mut Criterion) {
    let mut group = c.benchmark_group("i422_to_argb_plane");
    group.throughput(Throughput::Bytes((W * H * 4) as u64));
    let y = pattern(W * H, 0);
    let u = pattern(W / 2 * H, 1);
    let v = pattern(W / 2 * H, 2);
    let mut dst = vec![0u8; W * H * 4];
    let consts = YuvConstants::BT709;
    bench_tiers(&mut group, || {
        pixmill::i422_to_argb_plane(
            Plane::packed(&y, W, H).unwrap(),
            Plane::packed(&u, W / 2, H).unwrap(),
            Plane::packed(&v, W / 2, H).unwrap(),
            PlaneMut::packed(&mut dst, W * 4, H).unwrap(),
            &consts,
        )
        .unwrap();
    });
    group.finish();
}

fn bench_scale(c: &mut Criterion, name: &str, dw: usize, dh: usize, filter: FilterMode) {
    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Bytes((W * H) as u64));
    let src = pattern(W * H, 3);
    let mut dst = vec![0u8; dw * dh];
    bench_tiers(&mut group, || {
        pixmill::scale_plane(
            Plane::packed(&src, W, H).unwrap(),
            PlaneMut::packed(&mut dst, dw, dh).unwrap(),
            filter,
        )
        .unwrap();
    });
    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose_plane");
    group.throughput(Throughput::Bytes((W * H) as u64));
    let src = pattern(W * H, 4);
    let mut dst = vec![0u8; W * H];
    bench_tiers(&mut group, || {
        pixmill::transpose_plane(
            Plane::packed(&src, W, H).unwrap(),
            PlaneMut::packed(&mut dst, H, W).unwrap(),
        )
        .unwrap();
    });
    group.bench_function("naive", |b| b.iter(|| naive_transpose(&src, &mut dst, W, H)));
    group.finish();
}

fn bench_sse(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_sum_square_error");
    group.throughput(Throughput::Bytes((W * H) as u64));
    let a = pattern(W * H, 5);
    let b = pattern(W * H, 6);
    bench_tiers(&mut group, || {
        std::hint::black_box(pixmill::compute_sum_square_error_u64(&a, &b).unwrap());
    });
    group.bench_function("naive", |bench| bench.iter(|| naive_sse(&a, &b)));
    group.finish();
}

// === Custom main for tier detection before criterion runs ===

fn main() {
    print_simd_info();

    let mut criterion = Criterion::default().configure_from_args();
    bench_i422_to_argb(&mut criterion);
    bench_scale(&mut criterion, "scale_half_box", W / 2, H / 2, FilterMode::Box);
    bench_scale(&mut criterion, "scale_3_4_bilinear", W * 3 / 4, H * 3 / 4, FilterMode::Bilinear);
    bench_scale(&mut criterion, "scale_to_720p_bilinear", 1280, 720, FilterMode::Bilinear);
    bench_scale(&mut criterion, "scale_to_360p_box", 640, 360, FilterMode::Box);
    bench_transpose(&mut criterion);
    bench_sse(&mut criterion);
    criterion.final_summary();
}
