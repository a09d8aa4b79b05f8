//! `par-strassen` - multiplies two random square matrices with parallel
//! Strassen and the naive triple loop, times both and compares the results.

mod cpu_time;
mod data_type;
mod generate;
mod logging;
mod verify;

use std::time::Instant;

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use num_traits::{FromPrimitive, ToPrimitive};
use ps_matrix::{Matrix, Scalar};
use ps_multiply::config::{DEFAULT_MAX_PARALLEL_LEVEL, DEFAULT_ROW_GRAIN};
use ps_multiply::{Multiplier, NaiveMultiplier, StrassenConfig, StrassenMultiplier};
use tracing::{debug, info};

use crate::cpu_time::process_cpu_time;
use crate::data_type::{Algorithm, DataType};
use crate::generate::{create_rng, random_matrix};
use crate::verify::{first_mismatch, magnitude_bound};

#[derive(Parser, Debug)]
#[command(
    name = "par-strassen",
    version,
    about = "Multiply random square matrices with parallel Strassen and the naive triple loop"
)]
struct Args {
    /// Row length N of the N x N operands.
    size: usize,

    /// Element type of the operands.
    #[arg(short, long, value_enum, default_value_t = DataType::I32)]
    data_type: DataType,

    /// Seed for the random entries. Drawn from the OS when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Which products to compute.
    #[arg(short, long, value_enum, default_value_t = Algorithm::Both)]
    algorithm: Algorithm,

    /// Worker threads for Strassen. Uses rayon's global pool when omitted.
    #[arg(short, long, env = "NUM_THREADS")]
    threads: Option<usize>,

    /// Deepest recursion level that still splits into seven sub-products.
    #[arg(long, default_value_t = DEFAULT_MAX_PARALLEL_LEVEL)]
    max_level: usize,

    /// Elementwise loops over fewer rows than this stay on one thread.
    #[arg(long, default_value_t = DEFAULT_ROW_GRAIN)]
    row_grain: usize,

    /// Print the operands and every product.
    #[arg(short, long)]
    print: bool,

    /// Skip comparing the two products.
    #[arg(long)]
    no_verify: bool,

    /// Log more detail; repeat for trace output. `RUST_LOG` overrides this.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn strassen_config(&self) -> StrassenConfig {
        StrassenConfig {
            max_parallel_level: self.max_level,
            row_grain: self.row_grain,
            num_threads: self.threads,
        }
    }
}

fn timed_product<T: Scalar>(
    backend: &dyn Multiplier<T>,
    a: &Matrix<T>,
    b: &Matrix<T>,
    print: bool,
) -> Result<Matrix<T>> {
    let cpu_start = process_cpu_time();
    let start = Instant::now();
    let c = backend
        .product(a, b)
        .with_context(|| format!("{} product failed", backend.name()))?;
    let elapsed = start.elapsed();
    let cpu = cpu_start.zip(process_cpu_time()).map(|(s, e)| e.saturating_sub(s));

    if print {
        println!("C using {}:\n{}", backend.name(), c);
    }
    match cpu {
        Some(cpu) => println!(
            "{} took {:.6} seconds wall, {:.2} seconds CPU",
            backend.name(),
            elapsed.as_secs_f64(),
            cpu.as_secs_f64()
        ),
        None => println!("{} took {:.6} seconds wall", backend.name(), elapsed.as_secs_f64()),
    }
    Ok(c)
}

fn run_for_type<T>(args: &Args) -> Result<()>
where
    T: Scalar + FromPrimitive + ToPrimitive,
{
    ensure!(args.size > 0, "size must be > 0");
    let n = args.size;

    let mut rng = create_rng(args.seed);
    let a: Matrix<T> = random_matrix(n, &mut rng)?;
    let b: Matrix<T> = random_matrix(n, &mut rng)?;
    debug!(size = n, seed = ?args.seed, "generated operands");

    if args.print {
        println!("A:\n{}", a);
        println!("B:\n{}", b);
    }

    let strassen_result = if args.algorithm.runs_strassen() {
        let backend = StrassenMultiplier::new(args.strassen_config())
            .context("invalid Strassen configuration")?;
        info!(
            threads = backend.num_threads(),
            max_level = args.max_level,
            row_grain = args.row_grain,
            "running parallel Strassen"
        );
        Some(timed_product(&backend, &a, &b, args.print)?)
    } else {
        None
    };

    let naive_result = if args.algorithm.runs_naive() {
        Some(timed_product(&NaiveMultiplier::new(), &a, &b, args.print)?)
    } else {
        None
    };

    if let (Some(strassen), Some(naive), false) = (&strassen_result, &naive_result, args.no_verify)
    {
        if let Some(mismatch) = first_mismatch(naive, strassen, magnitude_bound(&a, &b)) {
            bail!("{}", mismatch);
        }
        println!("results match");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_subscriber(logging::level_for(args.verbose));

    let kind = args.data_type.kind();
    info!(
        size = args.size,
        %kind,
        operand_bytes = args.size.saturating_mul(args.size).saturating_mul(kind.size_in_bytes()),
        "generating operands"
    );

    match args.data_type {
        DataType::I32 => run_for_type::<i32>(&args),
        DataType::I64 => run_for_type::<i64>(&args),
        DataType::F32 => run_for_type::<f32>(&args),
        DataType::F64 => run_for_type::<f64>(&args),
    }
}
