//! microcircuit — a small multi-threaded run recorded by the ASCII backend.
//!
//! A population of leaky neurons driven by Poisson input is spread round-robin
//! over the worker threads.  Every thread carries its own replica of a spike
//! recorder (stepped time) and a voltmeter (continuous time), so each device
//! produces one file per virtual process:
//!
//! ```text
//! output/microcircuit/mc_spike_recorder-401-0.dat
//! output/microcircuit/mc_spike_recorder-401-1.dat
//! output/microcircuit/mc_v_exc-402-0.dat
//! ...
//! ```
//!
//! Enrollment and the write phase run on Rayon, one task per registry
//! partition.  Set `RUST_LOG=debug` to see enrollment and lifecycle events.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rec_core::{
    CoreResult, DeviceSpec, Event, IoSettings, KernelContext, NodeId, SimTime, ThreadId,
    TimeMode, Vp,
};
use rec_output::{AsciiBackend, Dictionary, OutputResult, RecordingBackend, ThreadFiles};

// ── Constants ─────────────────────────────────────────────────────────────────

const NUM_THREADS:        u32   = 4;
const NEURON_COUNT:       u64   = 400;
const SEED:               u64   = 55;
const RESOLUTION_MS:      f64   = SimTime::DEFAULT_RESOLUTION_MS;
const T_SIM_MS:           f64   = 1_000.0;
const INPUT_RATE_HZ:      f64   = 800.0; // summed Poisson input per neuron
const SAMPLE_EVERY_STEPS: i64   = 10;   // voltmeter interval: 1 ms
const TRACED_PER_THREAD:  usize = 4;    // neurons per thread seen by the voltmeter

// Membrane model (mV, ms).
const E_L:     f64 = -65.0;
const V_RESET: f64 = -70.0;
const TAU_M:   f64 = 10.0;
const DRIVE:   f64 = 4.0;  // PSP amplitude
const V_TH:    f64 = -50.0;

const SPIKE_RECORDER: NodeId = NodeId(NEURON_COUNT + 1);
const VOLTMETER:      NodeId = NodeId(NEURON_COUNT + 2);

/// 64-bit fractional golden-ratio constant for per-thread seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── Network ───────────────────────────────────────────────────────────────────

struct Neuron {
    gid: NodeId,
    v_m: f64,
}

/// The recorders living on one thread.
struct Recorders {
    spikes:    DeviceSpec,
    voltmeter: DeviceSpec,
}

/// Deal neurons round-robin over virtual processes, as the kernel does.
fn create_neurons(kernel: &KernelContext) -> CoreResult<Vec<Vec<Neuron>>> {
    let vps = u64::from(kernel.num_virtual_processes().unwrap_or(1));
    let mut local: Vec<Vec<Neuron>> = (0..kernel.num_threads).map(|_| Vec::new()).collect();
    for gid in 1..=NEURON_COUNT {
        let vp = Vp(((gid - 1) % vps) as u32);
        let thread = kernel.thread_of_vp(vp)?;
        local[thread.index()].push(Neuron { gid: NodeId(gid), v_m: E_L });
    }
    Ok(local)
}

/// One replica of each recorder per thread, sharing the global id.
fn create_recorders(kernel: &KernelContext) -> CoreResult<Vec<Recorders>> {
    (0..kernel.num_threads)
        .map(|t| {
            let thread = ThreadId(t);
            let vp = kernel.vp_for(thread, 0)?;
            Ok(Recorders {
                spikes: DeviceSpec::new("spike_recorder", SPIKE_RECORDER)
                    .with_thread(thread)
                    .with_vp(vp)
                    .with_time_mode(TimeMode::Stepped),
                voltmeter: DeviceSpec::new("voltmeter", VOLTMETER)
                    .with_thread(thread)
                    .with_vp(vp)
                    .with_label("v_exc"),
            })
        })
        .collect()
}

// ── Per-thread run ────────────────────────────────────────────────────────────

/// Advance this thread's neurons for `steps` steps, writing spikes and
/// sampled membrane potentials.  Returns the spike count.
fn simulate_thread(
    files:   &mut ThreadFiles,
    neurons: &mut [Neuron],
    rec:     &Recorders,
    steps:   i64,
) -> usize {
    let mut rng = SmallRng::seed_from_u64(
        SEED ^ u64::from(files.thread().0).wrapping_mul(MIXING_CONSTANT),
    );
    let p_input = (INPUT_RATE_HZ * RESOLUTION_MS * 1e-3).min(1.0);
    let decay = (-RESOLUTION_MS / TAU_M).exp();
    let mut spikes = 0;

    for step in 0..steps {
        let stamp = SimTime::from_steps(step, RESOLUTION_MS);
        for n in neurons.iter_mut() {
            n.v_m = E_L + (n.v_m - E_L) * decay;
            if rng.gen_bool(p_input) {
                n.v_m += DRIVE * rng.gen_range(0.5..1.5);
            }
            if n.v_m >= V_TH {
                let offset = rng.gen_range(0.0..stamp.resolution_ms());
                files.write(&rec.spikes, &Event::new(n.gid, stamp, offset), &[], &[]);
                n.v_m = V_RESET;
                spikes += 1;
            }
        }
        if step % SAMPLE_EVERY_STEPS == 0 {
            for n in neurons.iter().take(TRACED_PER_THREAD) {
                files.write(&rec.voltmeter, &Event::new(n.gid, stamp, 0.0), &[n.v_m], &[]);
            }
        }
    }
    spikes
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let time_start = Instant::now();

    // 1. Kernel and backend.
    let out_dir = PathBuf::from("output/microcircuit");
    std::fs::create_dir_all(&out_dir)?;
    let kernel = KernelContext {
        num_threads:   NUM_THREADS,
        num_processes: 1,
        node_count:    NEURON_COUNT + 2,
        io: IoSettings {
            data_path:       out_dir,
            data_prefix:     "mc_".to_owned(),
            overwrite_files: true,
        },
    };
    kernel.validate()?;

    let mut backend = AsciiBackend::new();
    let params: Dictionary = serde_json::from_value(json!({ "precision": 4 }))?;
    backend.set_status(&params)?;
    backend.prepare();
    backend.pre_run_hook(&kernel)?;
    let time_network = Instant::now();

    // 2. Create nodes.
    let mut neurons = create_neurons(&kernel)?;
    let recorders = create_recorders(&kernel)?;
    info!(neurons = NEURON_COUNT, threads = NUM_THREADS, "network created");
    let time_create = Instant::now();

    // 3. Enroll recorders, one Rayon task per thread partition.
    let ctx = backend.enroll_context(&kernel);
    backend
        .par_threads_mut()
        .zip(recorders.par_iter())
        .try_for_each(|(files, rec)| -> OutputResult<()> {
            files.enroll(&ctx, &rec.spikes, &[], &[])?;
            files.enroll(&ctx, &rec.voltmeter, &["V_m"], &[])?;
            Ok(())
        })?;
    let time_connect = Instant::now();

    // 4. Simulate.
    let steps = (T_SIM_MS / RESOLUTION_MS).round() as i64;
    let spikes: usize = backend
        .par_threads_mut()
        .zip(neurons.par_iter_mut())
        .zip(recorders.par_iter())
        .map(|((files, local), rec)| simulate_thread(files, local, rec, steps))
        .sum();
    backend.synchronize();
    backend.post_run_hook()?;
    let time_simulate = Instant::now();

    // 5. Evaluate.
    let mut status = Dictionary::new();
    for rec in &recorders {
        backend.get_device_status(&rec.spikes, &mut status);
        backend.get_device_status(&rec.voltmeter, &mut status);
    }
    let rate = spikes as f64 / NEURON_COUNT as f64 / (T_SIM_MS * 1e-3);
    info!(spikes, files = backend.open_file_count(), "simulation finished");
    backend.cleanup()?;
    let time_evaluate = Instant::now();

    println!("Mean firing rate: {rate:.2} spikes/s");
    println!("Recorded to:");
    if let Some(files) = status.get("filenames").and_then(|v| v.as_array()) {
        for f in files.iter().filter_map(|f| f.as_str()) {
            println!("  {f}");
        }
    }
    println!();
    println!("Times:");
    println!("  Total time:         {:.3} s", (time_evaluate - time_start).as_secs_f64());
    println!("  Time to initialize: {:.3} s", (time_network - time_start).as_secs_f64());
    println!("  Time to create:     {:.3} s", (time_create - time_network).as_secs_f64());
    println!("  Time to connect:    {:.3} s", (time_connect - time_create).as_secs_f64());
    println!("  Time to simulate:   {:.3} s", (time_simulate - time_connect).as_secs_f64());
    println!("  Time to evaluate:   {:.3} s", (time_evaluate - time_simulate).as_secs_f64());

    Ok(())
}
