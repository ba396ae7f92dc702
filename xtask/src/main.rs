use anyhow::{anyhow, bail, Context, Result};
use num_complex::Complex32;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sonar_dsp::kernel::KernelLifecycle;
use sonar_dsp::signal::bandpass::{BandpassConfig, BandpassKernel};
use sonar_dsp::signal::convolve::{ConvolveConfig, ConvolveKernel};
use sonar_dsp::signal::correlate::xcorr_init;
use sonar_dsp::signal::fft::{FftConfig, FftKernel};
use sonar_dsp::signal::hilbert::{HilbertConfig, HilbertKernel};
use sonar_dsp::signal::resample::{ResampleConfig, ResampleKernel};
use sonar_dsp::signal::spectrum::{RealFftConfig, RealFftKernel};
use sonar_dsp::signal::traits::{
    Analytic1D, Convolve1D, Correlate1D, RealSpectrum1D, Resample1D, SpectralFilter,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const DEFAULT_PYTHON_BIN: &str = "python";

// numpy replicas of each kernel; complex outputs are interleaved re/im.
const PY_SIGNAL_SCRIPT: &str = r#"
import json
import sys
import time
import numpy as np

env = json.loads(sys.stdin.read())
op = env["op"]
iters = int(env["iters"])
p = env["payload"]

def _as_array(key):
    return np.asarray(p[key], dtype=np.float64)

def _padded(key, n):
    x = np.zeros(n)
    v = _as_array(key)
    x[: len(v)] = v
    return x

def _interleave(z):
    return np.column_stack((z.real, z.imag)).reshape(-1)

def _compute():
    n = int(p.get("size", 0))
    if op == "fft":
        return _interleave(np.fft.fft(_padded("x", n)))
    if op == "ifft":
        z = _as_array("re") + 1j * _as_array("im")
        return _interleave(np.fft.ifft(z))
    if op == "bandpass":
        z = np.fft.fft(_padded("x", n))
        i0, i1, i2, i3 = (int(v) for v in p["bounds"])
        z[:i0] = 0
        z[i1 + 1 : i2] = 0
        z[i3 + 1 :] = 0
        return _interleave(z)
    if op == "convolve":
        a = np.fft.fft(_padded("a", n))
        b = np.fft.fft(_padded("b", n))
        return np.fft.ifft(a * b).real
    if op == "xcorr":
        h = np.conj(np.fft.fft(_padded("reference", n)))
        s = np.fft.fft(_padded("x", n))
        mag = np.abs(s)
        w = np.where(mag > 0, s / np.where(mag > 0, mag, 1), 0)
        return np.fft.ifft(w * h).real
    if op == "resample":
        times = int(p["times"])
        size1 = int(p["size1"])
        step = int(p["step"])
        z = np.fft.fft(_padded("x", n))
        wide = np.zeros(n * times, dtype=complex)
        half = n // 2
        wide[: n - half] = z[: n - half]
        if half > 0:
            wide[n * times - half :] = z[half:]
        y = np.fft.ifft(wide).real
        out = np.zeros(size1)
        src = y[::step][:size1]
        out[: len(src)] = src
        return out
    if op == "hilbert":
        x = _as_array("x")
        z = np.fft.fft(_padded("x", n))
        z[1 : n // 2] *= -1j
        z[n // 2 + 1 :] *= 1j
        q = np.fft.ifft(z).real[: len(x)]
        return _interleave(x + 1j * q)
    raise ValueError(f"unsupported op: {op}")

y = _compute()

t0 = time.perf_counter_ns()
for _ in range(iters):
    _compute()
t1 = time.perf_counter_ns()

print(json.dumps({
    "output": np.asarray(y, dtype=np.float64).reshape(-1).tolist(),
    "avg_ns": (t1 - t0) / max(iters, 1),
    "python_version": sys.version.split()[0],
    "numpy_version": np.__version__,
}))
"#;

#[derive(Debug, Serialize, Deserialize, Clone)]
struct PythonEval {
    output: Vec<f64>,
    avg_ns: f64,
    python_version: String,
    numpy_version: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ContractRow {
    case_id: String,
    pearson_r: f64,
    mae: f64,
    rmse: f64,
    max_abs: f64,
    baseline_max_abs: f64,
    rust_candidate_ns: f64,
    rust_baseline_ns: f64,
    python_ns: f64,
    speedup_vs_baseline: f64,
    speedup_vs_python: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContractBundle {
    generated_epoch_seconds: u64,
    python_executable: String,
    python_version: String,
    numpy_version: String,
    rows: Vec<ContractRow>,
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("contracts") => run_contracts(),
        _ => {
            eprintln!("Usage:");
            eprintln!("  cargo run -p xtask -- contracts");
            Ok(())
        }
    }
}

/// One kernel under test, with its independent rustfft baseline.
struct Case<'a> {
    id: &'a str,
    op: &'a str,
    payload: serde_json::Value,
    candidate: Box<dyn Fn() -> Result<Vec<f64>> + 'a>,
    baseline: Box<dyn Fn() -> Vec<f64> + 'a>,
}

fn run_contracts() -> Result<()> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let out_dir = PathBuf::from(format!("target/contracts/{ts}"));
    fs::create_dir_all(&out_dir).context("creating contract output directory")?;

    let python_bin = detect_python_bin();
    let versions = python_versions(&python_bin)?;

    let n = 4096usize;
    let fs_hz = 48_000.0f32;
    let pulse = chirp(2_000.0, 8_000.0, 0.01, fs_hz);
    let offset = 1500;
    let mut rx: Vec<f32> = (0..n)
        .map(|i| {
            let t = i as f32 / fs_hz;
            0.05 * (2.0 * std::f32::consts::PI * 11_000.0 * t).sin()
        })
        .collect();
    for (dst, &p) in rx[offset..].iter_mut().zip(&pulse) {
        *dst += p;
    }

    let fft_kernel = FftKernel::try_new(FftConfig { size: n })?;
    let real_fft = RealFftKernel::try_new(RealFftConfig::direct(n))?;
    let band = BandpassKernel::try_new(BandpassConfig {
        size: n,
        fs: 48_000,
        f0: 5_000,
        bw: 6_000,
    })?;
    let conv = ConvolveKernel::try_new(ConvolveConfig { size: n })?;
    let filter = xcorr_init(&pulse, n)?;
    let resampler = ResampleKernel::try_new(ResampleConfig {
        size0: n,
        size1: n / 2,
        times: 4,
        f0: fs_hz,
        f1: fs_hz / 2.0,
    })?;
    let hilbert = HilbertKernel::try_new(HilbertConfig { size: n })?;

    let spectrum = real_fft
        .run_alloc(rx.as_slice())
        .map_err(|e| anyhow!("reference spectrum failed: {e}"))?;
    let (spec_re, spec_im): (Vec<f32>, Vec<f32>) = spectrum.iter().map(|z| (z.re, z.im)).unzip();

    let cases = vec![
        Case {
            id: "fft_4096",
            op: "fft",
            payload: json!({ "size": n, "x": rx }),
            candidate: Box::new(|| {
                let mut buf = lift(&rx, n);
                fft_kernel
                    .forward(&mut buf)
                    .map_err(|e| anyhow!("fft candidate failed: {e}"))?;
                Ok(interleave(&buf))
            }),
            baseline: Box::new(|| interleave(&rustfft_forward(&rx, n))),
        },
        Case {
            id: "ifft_4096",
            op: "ifft",
            payload: json!({ "re": spec_re, "im": spec_im }),
            candidate: Box::new(|| {
                let mut buf = spectrum.clone();
                fft_kernel
                    .inverse(&mut buf)
                    .map_err(|e| anyhow!("ifft candidate failed: {e}"))?;
                Ok(interleave(&buf))
            }),
            baseline: Box::new(|| interleave(&rustfft_inverse(&spectrum))),
        },
        Case {
            id: "bandpass_4096",
            op: "bandpass",
            payload: json!({ "size": n, "x": rx, "bounds": band.bounds() }),
            candidate: Box::new(|| {
                let mut buf = real_fft
                    .run_alloc(rx.as_slice())
                    .map_err(|e| anyhow!("bandpass forward failed: {e}"))?;
                band.apply(buf.as_mut_slice())
                    .map_err(|e| anyhow!("bandpass candidate failed: {e}"))?;
                Ok(interleave(&buf))
            }),
            baseline: Box::new(|| {
                let mut buf = rustfft_forward(&rx, n);
                let [i0, i1, i2, i3] = band.bounds();
                buf[..i0].fill(Complex32::new(0.0, 0.0));
                buf[i1 + 1..i2].fill(Complex32::new(0.0, 0.0));
                buf[i3 + 1..].fill(Complex32::new(0.0, 0.0));
                interleave(&buf)
            }),
        },
        Case {
            id: "convolve_circular_4096",
            op: "convolve",
            payload: json!({ "size": n, "a": rx, "b": pulse }),
            candidate: Box::new(|| {
                conv.run_alloc(rx.as_slice(), pulse.as_slice())
                    .map(|y| widen(&y))
                    .map_err(|e| anyhow!("convolve candidate failed: {e}"))
            }),
            baseline: Box::new(|| {
                let a = rustfft_forward(&rx, n);
                let b = rustfft_forward(&pulse, n);
                let product = a.iter().zip(&b).map(|(x, y)| x * y).collect::<Vec<_>>();
                real_parts(&rustfft_inverse(&product))
            }),
        },
        Case {
            id: "xcorr_whitened_4096",
            op: "xcorr",
            payload: json!({ "size": n, "x": rx, "reference": pulse }),
            candidate: Box::new(|| {
                filter
                    .run_alloc(rx.as_slice())
                    .map(|y| widen(&y))
                    .map_err(|e| anyhow!("xcorr candidate failed: {e}"))
            }),
            baseline: Box::new(|| {
                let h = rustfft_forward(&pulse, n);
                let s = rustfft_forward(&rx, n);
                let product = s
                    .iter()
                    .zip(&h)
                    .map(|(x, y)| {
                        let m = x.norm();
                        let w = if m > 0.0 { x / m } else { *x };
                        w * y.conj()
                    })
                    .collect::<Vec<_>>();
                real_parts(&rustfft_inverse(&product))
            }),
        },
        Case {
            id: "resample_x4_half_rate",
            op: "resample",
            payload: json!({
                "size": n,
                "x": rx,
                "times": 4,
                "size1": n / 2,
                "step": resampler.step(),
            }),
            candidate: Box::new(|| {
                resampler
                    .run_alloc(rx.as_slice())
                    .map(|y| widen(&y))
                    .map_err(|e| anyhow!("resample candidate failed: {e}"))
            }),
            baseline: Box::new(|| {
                let z = rustfft_forward(&rx, n);
                let half = n / 2;
                let mut wide = vec![Complex32::new(0.0, 0.0); 4 * n];
                wide[..half].copy_from_slice(&z[..half]);
                wide[4 * n - half..].copy_from_slice(&z[half..]);
                let y = rustfft_inverse(&wide);
                let mut out = vec![0.0; n / 2];
                for (dst, src) in out.iter_mut().zip(y.iter().step_by(resampler.step())) {
                    *dst = f64::from(src.re);
                }
                out
            }),
        },
        Case {
            id: "hilbert_4096",
            op: "hilbert",
            payload: json!({ "size": n, "x": rx }),
            candidate: Box::new(|| {
                hilbert
                    .run_alloc(rx.as_slice())
                    .map(|z| interleave(&z))
                    .map_err(|e| anyhow!("hilbert candidate failed: {e}"))
            }),
            baseline: Box::new(|| {
                let mut z = rustfft_forward(&rx, n);
                for bin in &mut z[1..n / 2] {
                    *bin *= Complex32::new(0.0, -1.0);
                }
                for bin in &mut z[n / 2 + 1..] {
                    *bin *= Complex32::new(0.0, 1.0);
                }
                let q = rustfft_inverse(&z);
                rx.iter()
                    .zip(&q)
                    .flat_map(|(&x, q)| [f64::from(x), f64::from(q.re)])
                    .collect()
            }),
        },
    ];

    let mut rows = Vec::with_capacity(cases.len());
    for case in &cases {
        rows.push(run_case(&python_bin, case)?);
        println!("  {} ok", case.id);
    }

    let bundle = ContractBundle {
        generated_epoch_seconds: ts,
        python_executable: python_bin.display().to_string(),
        python_version: versions.python_version,
        numpy_version: versions.numpy_version,
        rows,
    };

    let json_path = out_dir.join("summary.json");
    fs::write(
        &json_path,
        serde_json::to_vec_pretty(&bundle).context("serializing contract summary")?,
    )
    .with_context(|| format!("writing {}", json_path.display()))?;
    write_summary_csv(&out_dir.join("summary.csv"), &bundle.rows)?;

    println!("Contract artifacts written:");
    println!("  - {}", out_dir.join("summary.csv").display());
    println!("  - {}", json_path.display());
    println!("  - cases: {}", bundle.rows.len());

    Ok(())
}

fn run_case(python_bin: &Path, case: &Case<'_>) -> Result<ContractRow> {
    let candidate = (case.candidate)()?;
    let baseline = (case.baseline)();
    let py = python_signal_eval(python_bin, case.op, case.payload.clone(), 50)?;
    ensure_same_length(case.id, &candidate, &baseline)?;
    ensure_same_length(case.id, &candidate, &py.output)?;

    let candidate_ns = benchmark_avg_ns(50, || (case.candidate)().map(|_| ()))?;
    let baseline_ns = benchmark_avg_ns(50, || {
        let _ = (case.baseline)();
        Ok(())
    })?;

    Ok(ContractRow {
        case_id: case.id.to_string(),
        pearson_r: pearson(&candidate, &py.output),
        mae: mean_abs_error(&candidate, &py.output),
        rmse: root_mean_squared_error(&candidate, &py.output),
        max_abs: max_abs_error(&candidate, &py.output),
        baseline_max_abs: max_abs_error(&candidate, &baseline),
        rust_candidate_ns: candidate_ns,
        rust_baseline_ns: baseline_ns,
        python_ns: py.avg_ns,
        speedup_vs_baseline: baseline_ns / candidate_ns,
        speedup_vs_python: py.avg_ns / candidate_ns,
    })
}

// Linear sweep from f0 to f1 Hz over `seconds`, sampled at `fs`.
fn chirp(f0: f32, f1: f32, seconds: f32, fs: f32) -> Vec<f32> {
    let k = (f1 - f0) / seconds / 2.0;
    (0..(seconds * fs).round() as usize)
        .map(|i| {
            let t = i as f32 / fs;
            (2.0 * std::f32::consts::PI * (k * t + f0) * t).sin()
        })
        .collect()
}

fn lift(x: &[f32], n: usize) -> Vec<Complex32> {
    let mut buf = vec![Complex32::new(0.0, 0.0); n];
    for (dst, &v) in buf.iter_mut().zip(x) {
        *dst = Complex32::new(v, 0.0);
    }
    buf
}

fn rustfft_forward(x: &[f32], n: usize) -> Vec<Complex32> {
    let mut buf = lift(x, n);
    FftPlanner::<f32>::new()
        .plan_fft_forward(n)
        .process(&mut buf);
    buf
}

fn rustfft_inverse(z: &[Complex32]) -> Vec<Complex32> {
    let mut buf = z.to_vec();
    FftPlanner::<f32>::new()
        .plan_fft_inverse(buf.len())
        .process(&mut buf);
    let n = buf.len() as f32;
    buf.iter_mut().for_each(|v| *v /= n);
    buf
}

fn interleave(z: &[Complex32]) -> Vec<f64> {
    z.iter()
        .flat_map(|v| [f64::from(v.re), f64::from(v.im)])
        .collect()
}

fn real_parts(z: &[Complex32]) -> Vec<f64> {
    z.iter().map(|v| f64::from(v.re)).collect()
}

fn widen(x: &[f32]) -> Vec<f64> {
    x.iter().copied().map(f64::from).collect()
}

fn detect_python_bin() -> PathBuf {
    std::env::var_os("PYTHON")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PYTHON_BIN))
}

fn python_versions(python_bin: &Path) -> Result<PythonEval> {
    run_python_eval(
        python_bin,
        r#"
import json, sys
import numpy
payload = json.loads(sys.stdin.read())
print(json.dumps({
    "output": [],
    "avg_ns": 0.0,
    "python_version": sys.version.split()[0],
    "numpy_version": numpy.__version__,
}))
"#,
        json!({}),
    )
}

fn python_signal_eval(
    python_bin: &Path,
    op: &str,
    payload: serde_json::Value,
    iters: usize,
) -> Result<PythonEval> {
    run_python_eval(
        python_bin,
        PY_SIGNAL_SCRIPT,
        json!({
            "op": op,
            "iters": iters,
            "payload": payload
        }),
    )
}

fn run_python_eval(
    python_bin: &Path,
    script: &str,
    payload: serde_json::Value,
) -> Result<PythonEval> {
    let mut child = Command::new(python_bin)
        .arg("-c")
        .arg(script)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning python interpreter at {}", python_bin.display()))?;

    {
        let stdin = child.stdin.as_mut().context("opening python stdin")?;
        let payload_bytes = serde_json::to_vec(&payload).context("serializing python payload")?;
        stdin
            .write_all(&payload_bytes)
            .context("writing payload to python stdin")?;
    }

    let output = child
        .wait_with_output()
        .context("waiting for python process")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("python execution failed: {stderr}");
    }
    let stdout = String::from_utf8(output.stdout).context("parsing python stdout utf8")?;
    let parsed: PythonEval = serde_json::from_str(stdout.trim()).context("parsing python json")?;
    Ok(parsed)
}

fn ensure_same_length(case_id: &str, a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        bail!(
            "case {case_id} has mismatched output lengths: left={}, right={}",
            a.len(),
            b.len()
        );
    }
    Ok(())
}

fn benchmark_avg_ns<F>(iters: usize, mut f: F) -> Result<f64>
where
    F: FnMut() -> Result<()>,
{
    let start = Instant::now();
    for _ in 0..iters {
        f()?;
    }
    Ok(start.elapsed().as_nanos() as f64 / iters as f64)
}

fn mean_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .sum::<f64>()
        / a.len() as f64
}

fn root_mean_squared_error(a: &[f64], b: &[f64]) -> f64 {
    (a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        / a.len() as f64)
        .sqrt()
}

fn max_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let da = *x - mean_a;
        let db = *y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        if a == b {
            1.0
        } else {
            0.0
        }
    } else {
        cov / (var_a.sqrt() * var_b.sqrt())
    }
}

fn write_summary_csv(path: &Path, rows: &[ContractRow]) -> Result<()> {
    let mut out = String::new();
    out.push_str("case_id,pearson_r,mae,rmse,max_abs,baseline_max_abs,rust_candidate_ns,rust_baseline_ns,python_ns,speedup_vs_baseline,speedup_vs_python\n");
    for row in rows {
        out.push_str(&format!(
            "{},{:.12},{:.12},{:.12},{:.12},{:.12},{:.3},{:.3},{:.3},{:.6},{:.6}\n",
            row.case_id,
            row.pearson_r,
            row.mae,
            row.rmse,
            row.max_abs,
            row.baseline_max_abs,
            row.rust_candidate_ns,
            row.rust_baseline_ns,
            row.python_ns,
            row.speedup_vs_baseline,
            row.speedup_vs_python,
        ));
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}
